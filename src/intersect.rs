use crate::shape::Shape;
use crate::tuple::{ Point, Vector };

/// A point where a ray hit the scene, together with the shape that was hit.
#[derive(Copy, Clone, Debug)]
pub struct GeoPoint<'a> {
    pub geometry: &'a Shape,
    pub point: Point,
}

/// Implements partial equality on a GeoPoint.
///
/// Two GeoPoints are equal if their points are equivalent, and if they refer
/// to the very same shape (pointer equality, not value equality).
impl<'a> PartialEq for GeoPoint<'a> {
    fn eq(&self, other: &GeoPoint<'a>) -> bool {
        self.point == other.point && std::ptr::eq(self.geometry, other.geometry)
    }
}

impl<'a> GeoPoint<'a> {
    pub fn new(geometry: &'a Shape, point: Point) -> GeoPoint<'a> {
        GeoPoint { geometry, point }
    }

    /// The surface normal of the hit shape at this point.
    pub fn normal(&self) -> Vector {
        self.geometry.normal_at(&self.point)
    }
}

/// A collection of intersections.
///
/// Mostly a wrapper for a vector of `GeoPoint`s, kept in the order the shapes
/// reported them. An empty collection means the ray missed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Intersections<'a> {
    pub intersections: Vec<GeoPoint<'a>>,
}

impl<'a> Intersections<'a> {
    /// Creates a new list of intersections.
    pub fn new() -> Intersections<'a> {
        Intersections { intersections: Vec::new() }
    }

    pub fn is_empty(&self) -> bool {
        self.intersections.is_empty()
    }

    pub fn len(&self) -> usize {
        self.intersections.len()
    }

    pub fn push(&mut self, gp: GeoPoint<'a>) {
        self.intersections.push(gp);
    }

    /// Moves every intersection of `other` to the end of this list.
    pub fn append(&mut self, other: &mut Intersections<'a>) {
        self.intersections.append(&mut other.intersections);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, GeoPoint<'a>> {
        self.intersections.iter()
    }

    /// The points of every intersection, without their shapes.
    pub fn points(&self) -> Vec<Point> {
        self.intersections.iter().map(|gp| gp.point).collect()
    }

    /// Finds the intersection nearest to `origin`.
    ///
    /// If no hit is registered, this function returns `None`.
    pub fn closest_to(&self, origin: &Point) -> Option<GeoPoint<'a>> {
        self.intersections.iter()
            .map(|gp| (gp.point.distance_squared(origin), gp))
            .min_by(|(a, _), (b, _)|
                a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal)
            )
            .map(|(_, gp)| *gp)
    }
}

#[test]
fn closest_intersection() {
    let s1 = Shape::sphere(Point::new(0.0, 0.0, -5.0), 1.0).unwrap();
    let s2 = Shape::sphere(Point::new(0.0, 0.0, -3.0), 1.0).unwrap();

    let is = Intersections {
        intersections: vec![
            GeoPoint::new(&s1, Point::new(0.0, 0.0, -4.0)),
            GeoPoint::new(&s2, Point::new(0.0, 0.0, -2.0)),
            GeoPoint::new(&s1, Point::new(0.0, 0.0, -6.0)),
        ]
    };

    let closest = is.closest_to(&Point::ORIGIN).unwrap();
    assert_eq!(closest, GeoPoint::new(&s2, Point::new(0.0, 0.0, -2.0)));
    assert_eq!(Intersections::new().closest_to(&Point::ORIGIN), None);
}

#[test]
fn geo_points_compare_shape_identity() {
    let s1 = Shape::sphere(Point::ORIGIN, 1.0).unwrap();
    let s2 = s1.clone();
    let p = Point::new(1.0, 0.0, 0.0);

    assert_eq!(GeoPoint::new(&s1, p), GeoPoint::new(&s1, p));
    assert_ne!(GeoPoint::new(&s1, p), GeoPoint::new(&s2, p));
}
