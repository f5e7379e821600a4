use crate::color::Color;
use crate::intersect::{ GeoPoint, Intersections };
use crate::light::{ AmbientLight, Light };
use crate::ray::Ray;
use crate::shape::Shape;

/// An ordered collection of shapes, intersected as one.
///
/// Intersection is a linear scan: every shape is tested against every ray.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Geometries {
    shapes: Vec<Shape>,
}

impl Geometries {
    pub fn new() -> Geometries {
        Geometries { shapes: Vec::new() }
    }

    pub fn add(&mut self, shape: Shape) {
        self.shapes.push(shape);
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Shape> {
        self.shapes.iter()
    }

    /// Intersects a ray against all shapes, keeping hits closer than
    /// `max_distance`.
    ///
    /// Intersections are listed shape by shape, in insertion order.
    pub fn find_geo_intersections(&self, ray: &Ray, max_distance: f64)
        -> Intersections {
        let mut intersections = Intersections::new();
        for shape in self.shapes.iter() {
            let mut is = shape.intersect(ray, max_distance);
            intersections.append(&mut is);
        }

        intersections
    }

    /// Intersects a ray against all shapes, with no distance limit.
    pub fn find_intersections(&self, ray: &Ray) -> Intersections {
        self.find_geo_intersections(ray, f64::INFINITY)
    }

    /// Finds the hit closest to the ray's origin, if any.
    pub fn find_closest_intersection(&self, ray: &Ray) -> Option<GeoPoint> {
        self.find_intersections(ray).closest_to(&ray.origin())
    }
}

impl From<Vec<Shape>> for Geometries {
    fn from(shapes: Vec<Shape>) -> Geometries {
        Geometries { shapes }
    }
}

/// A world with shapes and lights.
///
/// Worlds collect everything a render needs besides the camera. They are
/// built once, then shared read-only by every render thread.
#[derive(Clone, Debug, PartialEq)]
pub struct World {
    pub name: String,
    pub geometries: Geometries,
    pub lights: Vec<Light>,
    pub ambient_light: AmbientLight,
    pub background: Color,
}

impl Default for World {
    fn default() -> World {
        World {
            name: String::new(),
            geometries: Geometries::new(),
            lights: Vec::new(),
            ambient_light: AmbientLight::none(),
            background: Color::black(),
        }
    }
}

impl World {
    /// Creates an empty, unlit world with a black background.
    pub fn empty() -> World {
        Default::default()
    }

    /// Creates an empty world with a name.
    pub fn named(name: &str) -> World {
        World { name: name.to_string(), ..Default::default() }
    }
}

#[test]
fn geometries_union_in_order() {
    use crate::tuple::{ Point, Vector };

    let geometries: Geometries = vec![
        Shape::sphere(Point::new(0.0, 0.0, -3.0), 1.0).unwrap(),
        Shape::plane(Point::new(0.0, 0.0, -10.0), Vector::Z),
        Shape::sphere(Point::new(0.0, 5.0, -3.0), 1.0).unwrap(),
    ].into();

    let r = Ray::new(Point::ORIGIN, -Vector::Z);
    let is = geometries.find_intersections(&r);

    assert_eq!(is.points(), vec![
        Point::new(0.0, 0.0, -2.0),
        Point::new(0.0, 0.0, -4.0),
        Point::new(0.0, 0.0, -10.0),
    ]);

    // Distance bound applies to every member.
    assert_eq!(geometries.find_geo_intersections(&r, 5.0).len(), 2);
    assert!(geometries.find_geo_intersections(&r, 1.0).is_empty());
}

#[test]
fn closest_intersection_in_world() {
    use crate::tuple::{ Point, Vector };

    let geometries: Geometries = vec![
        Shape::plane(Point::new(0.0, 0.0, -10.0), Vector::Z),
        Shape::sphere(Point::new(0.0, 0.0, -3.0), 1.0).unwrap(),
    ].into();

    let r = Ray::new(Point::ORIGIN, -Vector::Z);
    let gp = geometries.find_closest_intersection(&r).unwrap();
    assert_eq!(gp.point, Point::new(0.0, 0.0, -2.0));
    assert!(std::ptr::eq(gp.geometry, geometries.iter().nth(1).unwrap()));

    let r = Ray::new(Point::ORIGIN, Vector::Z);
    assert_eq!(geometries.find_closest_intersection(&r), None);
}

#[test]
fn empty_world() {
    let w = World::empty();

    assert!(w.geometries.is_empty());
    assert!(w.lights.is_empty());
    assert_eq!(w.ambient_light.intensity, Color::black());
    assert_eq!(w.background, Color::black());
}
