use crate::align_zero;
use crate::color::Color;
use crate::tuple::{ Point, Tuple3D, Vector };

/// A material record.
///
/// Coefficients follow the Phong reflection model, split per color channel:
/// diffuse `kd`, specular `ks`, transmission `kt` and reflection `kr`, each
/// expected in `[0, 1]`. `shininess` is the specular exponent.
///
/// The default material absorbs everything: all coefficients are zero.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Material {
    pub kd: Tuple3D,
    pub ks: Tuple3D,
    pub kt: Tuple3D,
    pub kr: Tuple3D,
    pub shininess: i32,
}

/// Uniform light reaching every point regardless of geometry.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct AmbientLight {
    pub intensity: Color,
}

impl AmbientLight {
    /// Creates an ambient light from a base color and a per-channel factor.
    pub fn new(color: Color, ka: Tuple3D) -> AmbientLight {
        AmbientLight { intensity: color * ka }
    }

    /// Creates an ambient light from a base color and a single factor.
    pub fn uniform(color: Color, ka: f64) -> AmbientLight {
        AmbientLight { intensity: color * ka }
    }

    /// No ambient light at all.
    pub fn none() -> AmbientLight {
        AmbientLight { intensity: Color::black() }
    }
}

/// A light that varies with the point it illuminates.
pub trait LightSource {
    /// The light's intensity on arrival at `point`.
    fn intensity_at(&self, point: &Point) -> Color;

    /// The unit direction the light travels to reach `point`.
    ///
    /// `None` when `point` coincides with the light's position.
    fn direction_at(&self, point: &Point) -> Option<Vector>;

    /// Distance from the light to `point`. Infinite for directional lights.
    fn distance_at(&self, point: &Point) -> f64;
}

/// A light infinitely far away, shining in one direction.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DirectionalLight {
    pub intensity: Color,
    direction: Vector,
}

impl DirectionalLight {
    pub fn new(intensity: Color, direction: Vector) -> DirectionalLight {
        DirectionalLight { intensity, direction: direction.normalize() }
    }

    pub fn direction(&self) -> Vector {
        self.direction
    }
}

impl LightSource for DirectionalLight {
    fn intensity_at(&self, _point: &Point) -> Color {
        self.intensity
    }

    fn direction_at(&self, _point: &Point) -> Option<Vector> {
        Some(self.direction)
    }

    fn distance_at(&self, _point: &Point) -> f64 {
        f64::INFINITY
    }
}

/// A point light.
///
/// Shines equally in every direction from `position`. Intensity falls off
/// with distance `d` as `1 / (kc + kl*d + kq*d^2)`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PointLight {
    pub intensity: Color,
    pub position: Point,
    pub kc: f64,
    pub kl: f64,
    pub kq: f64,
}

impl PointLight {
    /// Creates a point light with no distance falloff.
    pub fn new(intensity: Color, position: Point) -> PointLight {
        PointLight { intensity, position, kc: 1.0, kl: 0.0, kq: 0.0 }
    }

    /// Sets the constant, linear and quadratic attenuation factors.
    pub fn with_attenuation(self, kc: f64, kl: f64, kq: f64) -> PointLight {
        PointLight { kc, kl, kq, ..self }
    }
}

impl LightSource for PointLight {
    fn intensity_at(&self, point: &Point) -> Color {
        let d = self.position.distance(point);
        self.intensity * (1.0 / (self.kc + self.kl * d + self.kq * d * d))
    }

    fn direction_at(&self, point: &Point) -> Option<Vector> {
        point.subtract(&self.position).ok().map(|v| v.normalize())
    }

    fn distance_at(&self, point: &Point) -> f64 {
        self.position.distance(point)
    }
}

/// A point light that shines mostly along one direction.
///
/// The point light's intensity is scaled by `max(0, cos θ)^narrowness`, where
/// θ is the angle between the spot direction and the light's path.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SpotLight {
    pub light: PointLight,
    direction: Vector,
    pub narrowness: i32,
}

impl SpotLight {
    pub fn new(intensity: Color, position: Point, direction: Vector) -> SpotLight {
        SpotLight {
            light: PointLight::new(intensity, position),
            direction: direction.normalize(),
            narrowness: 1,
        }
    }

    pub fn with_attenuation(self, kc: f64, kl: f64, kq: f64) -> SpotLight {
        SpotLight { light: self.light.with_attenuation(kc, kl, kq), ..self }
    }

    pub fn with_narrowness(self, narrowness: i32) -> SpotLight {
        SpotLight { narrowness, ..self }
    }

    pub fn direction(&self) -> Vector {
        self.direction
    }
}

impl LightSource for SpotLight {
    fn intensity_at(&self, point: &Point) -> Color {
        let cos = match self.light.direction_at(point) {
            Some(l) => align_zero(self.direction.dot(&l)),
            None => 0.0,
        };

        if cos <= 0.0 {
            return Color::black();
        }

        self.light.intensity_at(point) * cos.powi(self.narrowness)
    }

    fn direction_at(&self, point: &Point) -> Option<Vector> {
        self.light.direction_at(point)
    }

    fn distance_at(&self, point: &Point) -> f64 {
        self.light.distance_at(point)
    }
}

/// Any of the lights a scene can hold besides its ambient light.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Light {
    Directional(DirectionalLight),
    Point(PointLight),
    Spot(SpotLight),
}

impl LightSource for Light {
    fn intensity_at(&self, point: &Point) -> Color {
        match self {
            Light::Directional(l) => l.intensity_at(point),
            Light::Point(l) => l.intensity_at(point),
            Light::Spot(l) => l.intensity_at(point),
        }
    }

    fn direction_at(&self, point: &Point) -> Option<Vector> {
        match self {
            Light::Directional(l) => l.direction_at(point),
            Light::Point(l) => l.direction_at(point),
            Light::Spot(l) => l.direction_at(point),
        }
    }

    fn distance_at(&self, point: &Point) -> f64 {
        match self {
            Light::Directional(l) => l.distance_at(point),
            Light::Point(l) => l.distance_at(point),
            Light::Spot(l) => l.distance_at(point),
        }
    }
}

impl From<DirectionalLight> for Light {
    fn from(l: DirectionalLight) -> Light {
        Light::Directional(l)
    }
}

impl From<PointLight> for Light {
    fn from(l: PointLight) -> Light {
        Light::Point(l)
    }
}

impl From<SpotLight> for Light {
    fn from(l: SpotLight) -> Light {
        Light::Spot(l)
    }
}

#[test]
fn ambient_light_scales_color() {
    let a = AmbientLight::new(Color::rgb(0.5, 1.0, 0.2), Tuple3D::new(0.2, 0.5, 1.0));
    assert_eq!(a.intensity, Color::rgb(0.1, 0.5, 0.2));

    let a = AmbientLight::uniform(Color::white(), 0.15);
    assert_eq!(a.intensity, Color::gray(0.15));

    assert_eq!(AmbientLight::none().intensity, Color::black());
}

#[test]
fn directional_light_is_uniform() {
    let light = DirectionalLight::new(
        Color::white(),
        Vector::new(0.0, -2.0, 0.0).unwrap()
    );
    let p = Point::new(3.0, -7.0, 12.0);

    assert_eq!(light.intensity_at(&p), Color::white());
    assert_eq!(light.direction_at(&p), Some(-Vector::Y));
    assert!(light.distance_at(&p).is_infinite());
}

#[test]
fn point_light_attenuation() {
    let light = PointLight::new(Color::white(), Point::ORIGIN)
        .with_attenuation(1.0, 0.5, 0.25);
    let p = Point::new(0.0, 2.0, 0.0);

    // 1 / (1 + 0.5 * 2 + 0.25 * 4)
    assert_eq!(light.intensity_at(&p), Color::gray(1.0 / 3.0));
    assert_eq!(light.direction_at(&p), Some(Vector::Y));
    assert!(crate::feq(light.distance_at(&p), 2.0));

    // No direction from a light to its own position.
    assert_eq!(light.direction_at(&Point::ORIGIN), None);
}

#[test]
fn point_light_defaults_to_no_falloff() {
    let light = PointLight::new(Color::rgb(0.2, 0.4, 0.6), Point::ORIGIN);
    let far = Point::new(100.0, -50.0, 20.0);

    assert_eq!(light.intensity_at(&far), Color::rgb(0.2, 0.4, 0.6));
}

#[test]
fn spot_light_cone() {
    let light = SpotLight::new(
        Color::white(),
        Point::ORIGIN,
        Vector::new(0.0, 0.0, -1.0).unwrap()
    ).with_narrowness(2);

    // Straight ahead: same as a point light.
    let ahead = Point::new(0.0, 0.0, -2.0);
    assert_eq!(light.intensity_at(&ahead), Color::white());

    // 45 degrees off the axis: cos^2 = 0.5.
    let side = Point::new(2.0, 0.0, -2.0);
    assert_eq!(light.intensity_at(&side), Color::gray(0.5));

    // Behind the spot.
    let behind = Point::new(0.0, 0.0, 2.0);
    assert_eq!(light.intensity_at(&behind), Color::black());
}

#[test]
fn light_enum_forwards() {
    let point = PointLight::new(Color::white(), Point::new(0.0, 10.0, 0.0));
    let light: Light = point.into();
    let p = Point::ORIGIN;

    assert_eq!(light.intensity_at(&p), point.intensity_at(&p));
    assert_eq!(light.direction_at(&p), Some(-Vector::Y));
    assert!(crate::feq(light.distance_at(&p), 10.0));
}
