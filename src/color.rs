use std::iter::Sum;
use std::ops::{ Add, Sub, Mul };

use crate::feq;
use crate::consts::COLOR_EPSILON;
use crate::tuple::Tuple3D;

/// Light intensity, or the color of a pixel, in red, green and blue.
///
/// A channel value of 1.0 is full brightness on screen. Light accumulated by
/// the tracer is not bounded and may exceed 1.0; `Canvas` clamps it when the
/// image is written.
///
/// # Examples
///
/// ```
/// # use lumen_tracer::color::Color;
/// let red = Color::red();
/// assert_eq!(red, Color::rgb(1.0, 0.0, 0.0));
/// ```
///
/// Averaging a bundle of samples:
///
/// ```
/// # use lumen_tracer::color::Color;
/// let samples = vec![Color::green(), Color::blue()];
/// let blend = samples.iter().copied().sum::<Color>().reduce(samples.len());
/// assert_eq!(blend, Color::rgb(0.0, 0.5, 0.5));
/// ```
#[derive(Copy, Clone, Debug, Default, PartialOrd)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

/// Channels are compared with `feq`, so rounding noise from the tracer does
/// not make two colors differ.
impl PartialEq for Color {
    fn eq(&self, other: &Color) -> bool {
        feq(self.r, other.r) && feq(self.g, other.g) && feq(self.b, other.b)
    }
}

impl From<[f64; 3]> for Color {
    fn from([r, g, b]: [f64; 3]) -> Color {
        Color { r, g, b }
    }
}

impl Color {
    pub fn rgb(r: f64, g: f64, b: f64) -> Color {
        Color { r, g, b }
    }

    /// A gray with every channel set to `v`.
    pub fn gray(v: f64) -> Color {
        Color::rgb(v, v, v)
    }

    pub fn black() -> Color { Color::gray(0.0) }
    pub fn white() -> Color { Color::gray(1.0) }
    pub fn red() -> Color { Color::rgb(1.0, 0.0, 0.0) }
    pub fn green() -> Color { Color::rgb(0.0, 1.0, 0.0) }
    pub fn blue() -> Color { Color::rgb(0.0, 0.0, 1.0) }

    fn map<F: Fn(f64) -> f64>(self, f: F) -> Color {
        Color::rgb(f(self.r), f(self.g), f(self.b))
    }

    fn zip<F: Fn(f64, f64) -> f64>(self, other: Color, f: F) -> Color {
        Color::rgb(f(self.r, other.r), f(self.g, other.g), f(self.b, other.b))
    }

    /// Divides every channel by a sample count. Zero samples give black.
    pub fn reduce(&self, n: usize) -> Color {
        if n == 0 {
            return Color::black();
        }

        let n = n as f64;
        self.map(|c| c / n)
    }

    /// Checks whether two colors differ by less than `COLOR_EPSILON` on
    /// every channel.
    ///
    /// This is much coarser than `==`. Adaptive supersampling uses it to
    /// decide whether a region's corners agree.
    pub fn is_almost_equal(&self, other: &Color) -> bool {
        (self.r - other.r).abs() < COLOR_EPSILON
            && (self.g - other.g).abs() < COLOR_EPSILON
            && (self.b - other.b).abs() < COLOR_EPSILON
    }
}

impl Add for Color {
    type Output = Color;

    fn add(self, other: Color) -> Color {
        self.zip(other, |a, b| a + b)
    }
}

impl Sub for Color {
    type Output = Color;

    fn sub(self, other: Color) -> Color {
        self.zip(other, |a, b| a - b)
    }
}

impl Mul<f64> for Color {
    type Output = Color;

    fn mul(self, k: f64) -> Color {
        self.map(|c| c * k)
    }
}

impl Mul<Color> for f64 {
    type Output = Color;

    fn mul(self, color: Color) -> Color {
        color * self
    }
}

/// Filters one light by another, channel by channel.
impl Mul for Color {
    type Output = Color;

    fn mul(self, other: Color) -> Color {
        self.zip(other, |a, b| a * b)
    }
}

/// Scales a color channel by channel with a coefficient triple.
///
/// Red is scaled by `x`, green by `y` and blue by `z`. Material coefficients
/// attenuate light this way.
///
/// ```
/// # use lumen_tracer::color::Color;
/// # use lumen_tracer::tuple::Tuple3D;
/// let kd = Tuple3D::new(0.5, 0.25, 0.0);
/// assert_eq!(Color::white() * kd, Color::rgb(0.5, 0.25, 0.0));
/// ```
impl Mul<Tuple3D> for Color {
    type Output = Color;

    fn mul(self, k: Tuple3D) -> Color {
        Color::rgb(self.r * k.x, self.g * k.y, self.b * k.z)
    }
}

impl Sum for Color {
    fn sum<I: Iterator<Item = Color>>(iter: I) -> Color {
        iter.fold(Color::black(), |acc, c| acc + c)
    }
}

#[test]
fn color_arithmetic() {
    let warm = Color::rgb(0.8, 0.5, 0.25);
    let cool = Color::rgb(0.1, 0.25, 0.5);

    assert_eq!(warm + cool, Color::rgb(0.9, 0.75, 0.75));
    assert_eq!(warm - cool, Color::rgb(0.7, 0.25, -0.25));
    assert_eq!(warm * 2.0, Color::rgb(1.6, 1.0, 0.5));
    assert_eq!(0.5 * cool, Color::rgb(0.05, 0.125, 0.25));
}

#[test]
fn colors_filter_each_other() {
    let yellow = Color::rgb(1.0, 1.0, 0.0);
    let purple = Color::rgb(1.0, 0.0, 1.0);

    assert_eq!(yellow * purple, Color::red());
    assert_eq!(Color::gray(0.5) * Color::rgb(0.2, 0.4, 0.8), Color::rgb(0.1, 0.2, 0.4));
}

#[test]
fn colors_from_arrays() {
    assert_eq!(Color::from([0.1, 0.2, 0.3]), Color::rgb(0.1, 0.2, 0.3));
    assert_eq!(Color::default(), Color::black());
}

#[test]
fn reduce_colors() {
    let c = Color::rgb(0.9, 0.6, 0.3);

    assert_eq!(c.reduce(3), Color::rgb(0.3, 0.2, 0.1));
    assert_eq!(c.reduce(1), c);
    assert_eq!(c.reduce(0), Color::black());
}

#[test]
fn almost_equal_colors() {
    let c = Color::rgb(0.5, 0.5, 0.5);

    assert!(c.is_almost_equal(&Color::rgb(0.5005, 0.4995, 0.5)));
    assert!(!c.is_almost_equal(&Color::rgb(0.51, 0.5, 0.5)));
    assert_ne!(c, Color::rgb(0.5005, 0.4995, 0.5));
}
