use std::io;
use std::io::{ BufWriter, Write };
use std::fs::File;
use std::path::Path;

use log::info;

use crate::color::Color;

/// Longest line allowed in a PPM file.
const PPM_LINE_WIDTH: usize = 70;

/// A canvas for drawing pixels.
///
/// This structure stores the results of the ray tracer. A render writes one
/// color per pixel, then the canvas can be saved to an image file.
///
/// For now, only PPM images are supported.
#[derive(Clone, Default, Debug, PartialEq)]
pub struct Canvas {
    /// The width of the canvas, in pixels.
    pub width: usize,

    /// The height of the canvas, in pixels.
    pub height: usize,

    /// The pixels of the canvas, stored as a flattened vector.
    pixels: Vec<Color>,
}

/// Scales a color channel in `[0, 1]` to `0..=255`, clamping out-of-range
/// values.
fn to_byte(channel: f64) -> usize {
    (channel * 255.0).clamp(0.0, 255.0).round() as usize
}

impl Canvas {
    /// Creates a new black canvas with specified width and height.
    pub fn new(width: usize, height: usize) -> Canvas {
        Canvas {
            width,
            height,
            pixels: vec![Color::black(); width * height]
        }
    }

    /// Writes the canvas as a plain PPM (`P3`) image.
    ///
    /// Lines are clamped to 70 columns. If some channel would pass the 70
    /// column mark on a line, it is moved to the next line over.
    pub fn write_ppm<W: Write>(&self, mut out: W) -> io::Result<()> {
        writeln!(out, "P3")?;
        writeln!(out, "{} {}", self.width, self.height)?;
        writeln!(out, "255")?;

        let mut col = 0;
        for pixel in self.pixels.iter() {
            for channel in [pixel.r, pixel.g, pixel.b] {
                let value = to_byte(channel).to_string();

                if col == 0 {
                    write!(out, "{}", value)?;
                    col = value.len();
                } else if col + 1 + value.len() > PPM_LINE_WIDTH {
                    write!(out, "\n{}", value)?;
                    col = value.len();
                } else {
                    write!(out, " {}", value)?;
                    col += 1 + value.len();
                }
            }
        }

        writeln!(out)?;
        out.flush()
    }

    /// Saves the canvas to a PPM file at `path`.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let path = path.as_ref();
        let out = BufWriter::new(File::create(path)?);
        self.write_ppm(out)?;

        info!("saved {}x{} image to {}", self.width, self.height, path.display());
        Ok(())
    }

    /// Writes a color to a location on the `Canvas`.
    ///
    /// Out-of-bounds pixels are ignored. `x` is the column of the pixel and
    /// `y` is the row. Rows and columns are zero-indexed.
    ///
    /// # Examples
    ///
    /// Writing a pixel to the fourth column, second row on an 8-by-8 canvas:
    ///
    /// ```
    /// # use lumen_tracer::color::Color;
    /// # use lumen_tracer::canvas::Canvas;
    /// let purple = Color::rgb(1.0, 0.0, 1.0);
    /// let mut canvas = Canvas::new(8, 8);
    /// canvas.write_pixel(4, 2, &purple);
    /// assert_eq!(canvas.read_pixel(4, 2).unwrap(), purple);
    /// ```
    pub fn write_pixel(&mut self, x: usize, y: usize, pixel: &Color) {
        if x >= self.width || y >= self.height {
            return;
        }

        self.pixels[(y * self.width) + x] = *pixel;
    }

    /// Reads a color from a location on the `Canvas`.
    ///
    /// Returns `None` if the location is out-of-bounds.
    pub fn read_pixel(&self, x: usize, y: usize) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None
        }

        Some(self.pixels[(y * self.width) + x])
    }

    /// Draws a grid line every `interval` pixels in both directions.
    ///
    /// ```
    /// # use lumen_tracer::color::Color;
    /// # use lumen_tracer::canvas::Canvas;
    /// let mut canvas = Canvas::new(5, 5);
    /// canvas.print_grid(2, &Color::red());
    /// assert_eq!(canvas.read_pixel(2, 3), Some(Color::red()));
    /// assert_eq!(canvas.read_pixel(1, 3), Some(Color::black()));
    /// ```
    pub fn print_grid(&mut self, interval: usize, color: &Color) {
        if interval == 0 {
            return;
        }

        for y in 0..self.height {
            for x in 0..self.width {
                if x % interval == 0 || y % interval == 0 {
                    self.write_pixel(x, y, color);
                }
            }
        }
    }
}

#[cfg(test)]
fn ppm_string(canvas: &Canvas) -> String {
    let mut out = Vec::new();
    canvas.write_ppm(&mut out).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn ppm_header() {
    let canvas = Canvas::new(5, 3);
    let ppm = ppm_string(&canvas);

    let header: Vec<_> = ppm.lines().take(3).collect();
    assert_eq!(header, vec!["P3", "5 3", "255"]);
}

#[test]
fn ppm_pixels_are_scaled_and_clamped() {
    let mut canvas = Canvas::new(3, 1);
    canvas.write_pixel(0, 0, &Color::rgb(1.5, 0.0, 0.0));
    canvas.write_pixel(1, 0, &Color::rgb(0.0, 0.5, 0.0));
    canvas.write_pixel(2, 0, &Color::rgb(-0.5, 0.0, 1.0));

    let ppm = ppm_string(&canvas);
    assert_eq!(ppm.lines().nth(3), Some("255 0 0 0 128 0 0 0 255"));
    assert!(ppm.ends_with('\n'));
}

#[test]
fn ppm_lines_stay_short() {
    let mut canvas = Canvas::new(10, 2);
    for y in 0..2 {
        for x in 0..10 {
            canvas.write_pixel(x, y, &Color::rgb(1.0, 0.8, 0.6));
        }
    }

    let ppm = ppm_string(&canvas);
    assert!(ppm.lines().all(|line| line.len() <= 70));

    let values: Vec<_> = ppm.lines().skip(3).flat_map(str::split_whitespace).collect();
    assert_eq!(values.len(), 10 * 2 * 3);
    assert_eq!(&values[..3], &["255", "204", "153"]);
}

#[test]
fn out_of_bounds_pixels() {
    let mut canvas = Canvas::new(2, 2);
    canvas.write_pixel(2, 0, &Color::white());
    canvas.write_pixel(0, 2, &Color::white());

    assert_eq!(canvas, Canvas::new(2, 2));
    assert_eq!(canvas.read_pixel(2, 0), None);
}

#[test]
fn grid_lines() {
    let mut canvas = Canvas::new(4, 4);
    canvas.print_grid(3, &Color::white());

    for y in 0..4 {
        for x in 0..4 {
            let expected = if x % 3 == 0 || y % 3 == 0 {
                Color::white()
            } else {
                Color::black()
            };
            assert_eq!(canvas.read_pixel(x, y), Some(expected));
        }
    }

    // A zero interval draws nothing.
    let mut canvas = Canvas::new(4, 4);
    canvas.print_grid(0, &Color::white());
    assert_eq!(canvas, Canvas::new(4, 4));
}
