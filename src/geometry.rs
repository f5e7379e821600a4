use crate::is_zero;
use crate::error::GeometryError;
use crate::ray::Ray;
use crate::tuple::{ Point, Vector };

/// An infinite plane, described by a point on it and a unit normal.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PlaneInfo {
    pub point: Point,
    pub normal: Vector,
}

impl PlaneInfo {
    pub fn new(point: Point, normal: Vector) -> PlaneInfo {
        PlaneInfo { point, normal: normal.normalize() }
    }

    /// Creates the plane passing through three points.
    ///
    /// The normal follows the right-hand rule: `(p2 - p1) x (p3 - p1)`.
    pub fn from_points(p1: Point, p2: Point, p3: Point)
        -> Result<PlaneInfo, GeometryError> {
        if p1 == p2 || p2 == p3 || p1 == p3 {
            return Err(GeometryError::CoincidentPoints);
        }

        let normal = p2.subtract(&p1)?
            .cross(&p3.subtract(&p1)?)
            .map_err(|_| GeometryError::CollinearPoints)?;

        Ok(PlaneInfo { point: p1, normal: normal.normalize() })
    }
}

/// A flat, convex polygon. Triangles are polygons with three vertices.
///
/// Vertices are ordered along the polygon's edge path, and the supporting
/// plane is the one through the first three vertices.
#[derive(Clone, Debug, PartialEq)]
pub struct PolygonInfo {
    pub vertices: Vec<Point>,
    pub plane: PlaneInfo,
}

impl PolygonInfo {
    /// Validates and creates a polygon.
    ///
    /// Fails if there are fewer than three vertices, if two consecutive
    /// vertices coincide, if the vertices are not all in one plane, if a
    /// vertex lies on the line of its neighbours, or if the polygon is not
    /// convex in the given order.
    pub fn new(vertices: Vec<Point>) -> Result<PolygonInfo, GeometryError> {
        if vertices.len() < 3 {
            return Err(GeometryError::TooFewVertices(vertices.len()));
        }

        let plane = PlaneInfo::from_points(vertices[0], vertices[1], vertices[2])?;
        if vertices.len() == 3 {
            return Ok(PolygonInfo { vertices, plane });
        }

        let n = plane.normal;
        let last = vertices.len() - 1;

        // Orientation of the corner at the first vertex. Every other corner
        // must turn the same way for the polygon to be convex.
        let mut edge1 = vertices[last].subtract(&vertices[last - 1])?;
        let mut edge2 = vertices[0].subtract(&vertices[last])?;
        let positive = edge1.cross(&edge2)?.dot(&n) > 0.0;

        for i in 1..vertices.len() {
            if !is_zero((vertices[i] - vertices[0]).dot(&n.xyz())) {
                return Err(GeometryError::NonCoplanarVertices);
            }

            edge1 = edge2;
            edge2 = vertices[i].subtract(&vertices[i - 1])?;
            if positive != (edge1.cross(&edge2)?.dot(&n) > 0.0) {
                return Err(GeometryError::NonConvexPolygon);
            }
        }

        Ok(PolygonInfo { vertices, plane })
    }
}

/// The shared data of tubes and cylinders: an axis ray and a radius.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TubeInfo {
    pub axis: Ray,
    pub radius: f64,
}

impl TubeInfo {
    pub fn new(axis: Ray, radius: f64) -> Result<TubeInfo, GeometryError> {
        if !(radius > 0.0) {
            return Err(GeometryError::NonPositiveRadius(radius));
        }

        Ok(TubeInfo { axis, radius })
    }

    /// The signed distance of `point` along the axis, from the axis origin.
    pub fn axial_offset(&self, point: &Point) -> f64 {
        (*point - self.axis.origin()).dot(&self.axis.direction().xyz())
    }
}

#[test]
fn plane_from_points() {
    let plane = PlaneInfo::from_points(
        Point::new(0.0, 0.0, 1.0),
        Point::new(0.0, 1.0, 0.0),
        Point::new(1.0, 0.0, 0.0),
    ).unwrap();

    let sqrt3 = 3.0f64.sqrt();
    let n = Vector::new(1.0 / sqrt3, 1.0 / sqrt3, 1.0 / sqrt3).unwrap();
    assert!(plane.normal == n || plane.normal == -n);
    assert!(crate::feq(plane.normal.length(), 1.0));
}

#[test]
fn degenerate_plane_points() {
    let p1 = Point::new(1.0, 2.0, 3.0);
    let p2 = Point::new(2.0, 4.0, 6.0);
    let p3 = Point::new(3.0, 6.0, 9.0);

    assert_eq!(PlaneInfo::from_points(p1, p1, p3),
        Err(GeometryError::CoincidentPoints));
    assert_eq!(PlaneInfo::from_points(p1, p2, p3),
        Err(GeometryError::CollinearPoints));
}

#[test]
fn valid_quadrangle() {
    let polygon = PolygonInfo::new(vec![
        Point::new(0.0, 0.0, 1.0),
        Point::new(1.0, 0.0, 0.0),
        Point::new(0.0, 1.0, 0.0),
        Point::new(-1.0, 1.0, 1.0),
    ]);

    assert!(polygon.is_ok());
}

#[test]
fn invalid_polygons() {
    // Too few vertices.
    assert_eq!(PolygonInfo::new(vec![Point::ORIGIN, Point::new(1.0, 0.0, 0.0)]),
        Err(GeometryError::TooFewVertices(2)));

    // Wrong vertex order.
    assert!(PolygonInfo::new(vec![
        Point::new(0.0, 0.0, 1.0),
        Point::new(0.0, 1.0, 0.0),
        Point::new(1.0, 0.0, 0.0),
        Point::new(-1.0, 1.0, 1.0),
    ]).is_err());

    // Last vertex out of the plane.
    assert_eq!(PolygonInfo::new(vec![
        Point::new(0.0, 0.0, 1.0),
        Point::new(1.0, 0.0, 0.0),
        Point::new(0.0, 1.0, 0.0),
        Point::new(0.0, 2.0, 2.0),
    ]), Err(GeometryError::NonCoplanarVertices));

    // Concave quadrangle.
    assert_eq!(PolygonInfo::new(vec![
        Point::new(0.0, 0.0, 1.0),
        Point::new(1.0, 0.0, 0.0),
        Point::new(0.0, 1.0, 0.0),
        Point::new(0.25, 0.25, 0.5),
    ]), Err(GeometryError::NonConvexPolygon));

    // Vertex on a side.
    assert!(PolygonInfo::new(vec![
        Point::new(0.0, 0.0, 1.0),
        Point::new(1.0, 0.0, 0.0),
        Point::new(0.0, 1.0, 0.0),
        Point::new(0.0, 0.5, 0.5),
    ]).is_err());

    // Last vertex repeats the first.
    assert!(PolygonInfo::new(vec![
        Point::new(0.0, 0.0, 1.0),
        Point::new(1.0, 0.0, 0.0),
        Point::new(0.0, 1.0, 0.0),
        Point::new(0.0, 0.0, 1.0),
    ]).is_err());

    // Repeated vertex.
    assert!(PolygonInfo::new(vec![
        Point::new(0.0, 0.0, 1.0),
        Point::new(1.0, 0.0, 0.0),
        Point::new(0.0, 1.0, 0.0),
        Point::new(0.0, 1.0, 0.0),
    ]).is_err());
}

#[test]
fn tube_requires_positive_radius() {
    let axis = Ray::new(Point::ORIGIN, Vector::Y);

    assert_eq!(TubeInfo::new(axis, 0.0), Err(GeometryError::NonPositiveRadius(0.0)));
    assert_eq!(TubeInfo::new(axis, -1.0), Err(GeometryError::NonPositiveRadius(-1.0)));
    assert!(TubeInfo::new(axis, 0.5).is_ok());
}
