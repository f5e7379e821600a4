use crate::{ align_zero, is_zero };
use crate::color::Color;
use crate::error::GeometryError;
use crate::geometry::{ PlaneInfo, PolygonInfo, TubeInfo };
use crate::intersect::{ GeoPoint, Intersections };
use crate::light::Material;
use crate::ray::Ray;
use crate::tuple::{ Point, Vector };

#[derive(Debug, Clone, PartialEq)]
pub enum ShapeType {
    /// A sphere with a center and a radius.
    Sphere { center: Point, radius: f64 },

    /// A plane through a point, with a unit normal.
    Plane(PlaneInfo),

    /// A triangle. See PolygonInfo for further explanation.
    Triangle(PolygonInfo),

    /// A convex polygon with any number (three or more) of vertices.
    Polygon(PolygonInfo),

    /// An infinite tube around an axis.
    Tube(TubeInfo),

    /// A tube cut at its axis origin and at `height` along its axis, closed
    /// by two flat caps.
    Cylinder(TubeInfo, f64),
}

/// A renderable primitive: geometry plus surface attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    pub ty: ShapeType,
    pub material: Material,
    pub emission: Color,
}

impl Shape {
    fn with_type(ty: ShapeType) -> Shape {
        Shape {
            ty,
            material: Default::default(),
            emission: Color::black(),
        }
    }

    /// Creates a sphere with default material and no emission.
    pub fn sphere(center: Point, radius: f64) -> Result<Shape, GeometryError> {
        if !(radius > 0.0) {
            return Err(GeometryError::NonPositiveRadius(radius));
        }

        Ok(Shape::with_type(ShapeType::Sphere { center, radius }))
    }

    /// Creates a plane through `point` with the given normal.
    pub fn plane(point: Point, normal: Vector) -> Shape {
        Shape::with_type(ShapeType::Plane(PlaneInfo::new(point, normal)))
    }

    /// Creates the plane passing through three points.
    pub fn plane_from_points(p1: Point, p2: Point, p3: Point)
        -> Result<Shape, GeometryError> {
        Ok(Shape::with_type(ShapeType::Plane(PlaneInfo::from_points(p1, p2, p3)?)))
    }

    pub fn triangle(p1: Point, p2: Point, p3: Point)
        -> Result<Shape, GeometryError> {
        Ok(Shape::with_type(ShapeType::Triangle(PolygonInfo::new(vec![p1, p2, p3])?)))
    }

    /// Creates a convex polygon. See `PolygonInfo::new` for the checks made.
    pub fn polygon(vertices: Vec<Point>) -> Result<Shape, GeometryError> {
        Ok(Shape::with_type(ShapeType::Polygon(PolygonInfo::new(vertices)?)))
    }

    pub fn tube(axis: Ray, radius: f64) -> Result<Shape, GeometryError> {
        Ok(Shape::with_type(ShapeType::Tube(TubeInfo::new(axis, radius)?)))
    }

    /// Creates a capped cylinder starting at the axis origin and extending
    /// `height` along the axis direction.
    pub fn cylinder(axis: Ray, radius: f64, height: f64)
        -> Result<Shape, GeometryError> {
        if !(height > 0.0) {
            return Err(GeometryError::NonPositiveHeight(height));
        }

        Ok(Shape::with_type(ShapeType::Cylinder(TubeInfo::new(axis, radius)?, height)))
    }

    pub fn with_material(self, material: Material) -> Shape {
        Shape { material, ..self }
    }

    pub fn with_emission(self, emission: Color) -> Shape {
        Shape { emission, ..self }
    }

    /// Intersects a ray with a Shape, ignoring hits at `max_distance` or
    /// beyond.
    ///
    /// Only hits strictly in front of the ray origin are reported.
    pub fn intersect(&self, ray: &Ray, max_distance: f64) -> Intersections {
        match self.ty {
            ShapeType::Sphere { .. } => self.intersect_sphere(ray, max_distance),
            ShapeType::Plane(_) => self.intersect_plane(ray, max_distance),
            ShapeType::Triangle(_)
                | ShapeType::Polygon(_) => self.intersect_polygon(ray, max_distance),
            ShapeType::Tube(_) => self.intersect_tube(ray, max_distance),
            ShapeType::Cylinder(_, _) => self.intersect_cylinder(ray, max_distance),
        }
    }

    /// Intersects a ray with a Shape with no distance limit, returning only
    /// the points.
    pub fn find_intersections(&self, ray: &Ray) -> Vec<Point> {
        self.intersect(ray, f64::INFINITY).points()
    }

    /// Obtain the unit normal vector of a Shape at a point on its surface.
    pub fn normal_at(&self, point: &Point) -> Vector {
        match self.ty {
            ShapeType::Sphere { .. } => self.normal_at_sphere(point),
            ShapeType::Plane(ref plane) => plane.normal,
            ShapeType::Triangle(ref polygon)
                | ShapeType::Polygon(ref polygon) => polygon.plane.normal,
            ShapeType::Tube(ref tube) => Self::normal_at_tube(tube, point),
            ShapeType::Cylinder(_, _) => self.normal_at_cylinder(point),
        }
    }

    /// Checks that `t` lies strictly between the ray origin and `max_distance`.
    fn in_range(t: f64, max_distance: f64) -> bool {
        align_zero(t) > 0.0 && align_zero(t - max_distance) < 0.0
    }

    fn hits_at<'a>(&'a self, ray: &Ray, ts: &[f64], max_distance: f64)
        -> Intersections<'a> {
        let mut is = Intersections::new();
        for &t in ts {
            if Self::in_range(t, max_distance) {
                is.push(GeoPoint::new(self, ray.point_at(t)));
            }
        }

        is
    }

    /// Intersects a ray with a sphere.
    ///
    /// Returns zero, one or two hits. A ray that only grazes the sphere
    /// (tangent) does not hit it.
    fn intersect_sphere(&self, ray: &Ray, max_distance: f64) -> Intersections {
        let (center, radius) = match self.ty {
            ShapeType::Sphere { center, radius } => (center, radius),
            _ => unreachable!(),
        };

        // From the center there is exactly one way out.
        if ray.origin() == center {
            return self.hits_at(ray, &[radius], max_distance);
        }

        let u = center - ray.origin();
        let tm = ray.direction().xyz().dot(&u);
        let d_squared = (u.length_squared() - tm * tm).max(0.0);

        if align_zero(d_squared.sqrt() - radius) >= 0.0 {
            return Intersections::new();
        }

        let th = (radius * radius - d_squared).sqrt();
        self.hits_at(ray, &[tm - th, tm + th], max_distance)
    }

    fn normal_at_sphere(&self, point: &Point) -> Vector {
        let center = match self.ty {
            ShapeType::Sphere { center, .. } => center,
            _ => unreachable!(),
        };

        match point.subtract(&center) {
            Ok(v) => v.normalize(),
            // The center has no normal; any direction will do.
            Err(_) => Vector::Z,
        }
    }

    /// Intersects a ray with the infinite plane carrying `plane`.
    ///
    /// Rays parallel to the plane, or starting at its reference point, miss.
    fn intersect_flat(&self, plane: &PlaneInfo, ray: &Ray, max_distance: f64)
        -> Intersections {
        if ray.origin() == plane.point {
            return Intersections::new();
        }

        let nv = align_zero(plane.normal.dot(&ray.direction()));
        if nv == 0.0 {
            return Intersections::new();
        }

        let t = align_zero(
            plane.normal.xyz().dot(&(plane.point - ray.origin())) / nv
        );
        self.hits_at(ray, &[t], max_distance)
    }

    fn intersect_plane(&self, ray: &Ray, max_distance: f64) -> Intersections {
        let plane = match self.ty {
            ShapeType::Plane(ref p) => p,
            _ => unreachable!(),
        };

        self.intersect_flat(plane, ray, max_distance)
    }

    /// Intersects a ray with a convex polygon (or triangle).
    ///
    /// After hitting the supporting plane, the ray must pass strictly inside
    /// every edge: the triple products of the ray direction with consecutive
    /// vertex vectors must all share one sign. A zero product means the ray
    /// passes through an edge or a vertex, which counts as a miss.
    fn intersect_polygon(&self, ray: &Ray, max_distance: f64) -> Intersections {
        let polygon = match self.ty {
            ShapeType::Triangle(ref p) | ShapeType::Polygon(ref p) => p,
            _ => unreachable!(),
        };

        let hits = self.intersect_flat(&polygon.plane, ray, max_distance);
        if hits.is_empty() {
            return hits;
        }

        let p0 = ray.origin();
        let v = ray.direction().xyz();
        let vertices = &polygon.vertices;

        let mut v1 = vertices[1] - p0;
        let mut v2 = vertices[0] - p0;
        let sign = align_zero(v.dot(&v1.cross(&v2)));
        if sign == 0.0 {
            return Intersections::new();
        }

        let positive = sign > 0.0;
        for vertex in vertices.iter().skip(1).rev() {
            v1 = v2;
            v2 = *vertex - p0;

            let sign = align_zero(v.dot(&v1.cross(&v2)));
            if sign == 0.0 || positive != (sign > 0.0) {
                return Intersections::new();
            }
        }

        hits
    }

    /// Solves the ray-tube quadratic in the plane perpendicular to the axis.
    ///
    /// Returns both roots, or nothing if the ray runs parallel to the axis or
    /// only touches the tube.
    fn tube_roots(tube: &TubeInfo, ray: &Ray) -> Option<(f64, f64)> {
        let va = tube.axis.direction().xyz();
        let v = ray.direction().xyz();
        let dp = ray.origin() - tube.axis.origin();

        let v_perp = v - va * v.dot(&va);
        let dp_perp = dp - va * dp.dot(&va);

        let a = v_perp.length_squared();
        if is_zero(a) {
            return None;
        }

        let b = 2.0 * v_perp.dot(&dp_perp);
        let c = dp_perp.length_squared() - tube.radius * tube.radius;
        let disc = align_zero(b * b - 4.0 * a * c);
        if disc <= 0.0 {
            return None;
        }

        let root = disc.sqrt();
        Some(((-b - root) / (2.0 * a), (-b + root) / (2.0 * a)))
    }

    fn intersect_tube(&self, ray: &Ray, max_distance: f64) -> Intersections {
        let tube = match self.ty {
            ShapeType::Tube(ref t) => t,
            _ => unreachable!(),
        };

        match Self::tube_roots(tube, ray) {
            Some((t0, t1)) => self.hits_at(ray, &[t0, t1], max_distance),
            None => Intersections::new(),
        }
    }

    fn intersect_cylinder(&self, ray: &Ray, max_distance: f64) -> Intersections {
        let (tube, height) = match self.ty {
            ShapeType::Cylinder(ref t, h) => (t, h),
            _ => unreachable!(),
        };

        let mut is = Intersections::new();

        // Side hits, kept only between the two caps.
        if let Some((t0, t1)) = Self::tube_roots(tube, ray) {
            for t in [t0, t1] {
                if !Self::in_range(t, max_distance) {
                    continue;
                }

                let p = ray.point_at(t);
                let offset = align_zero(tube.axial_offset(&p));
                if offset > 0.0 && align_zero(offset - height) < 0.0 {
                    is.push(GeoPoint::new(self, p));
                }
            }
        }

        // Cap hits.
        let axis = tube.axis;
        let nv = align_zero(axis.direction().dot(&ray.direction()));
        if nv != 0.0 {
            for center in [axis.origin(), axis.point_at(height)] {
                let t = align_zero(
                    axis.direction().xyz().dot(&(center - ray.origin())) / nv
                );
                if !Self::in_range(t, max_distance) {
                    continue;
                }

                let p = ray.point_at(t);
                if align_zero(p.distance_squared(&center)
                    - tube.radius * tube.radius) < 0.0 {
                    is.push(GeoPoint::new(self, p));
                }
            }
        }

        is
    }

    /// Returns the normal of a tube at a point on its surface.
    ///
    /// The point is projected onto the axis; the normal runs from that
    /// projection to the point.
    fn normal_at_tube(tube: &TubeInfo, point: &Point) -> Vector {
        let t = tube.axial_offset(point);
        let o = if is_zero(t) {
            tube.axis.origin()
        } else {
            tube.axis.point_at(t)
        };

        match point.subtract(&o) {
            Ok(v) => v.normalize(),
            // On the axis itself; only reachable through a cap center.
            Err(_) => tube.axis.direction(),
        }
    }

    /// Returns the normal of a cylinder, taking the caps into account.
    fn normal_at_cylinder(&self, point: &Point) -> Vector {
        let (tube, height) = match self.ty {
            ShapeType::Cylinder(ref t, h) => (t, h),
            _ => unreachable!(),
        };

        let dir = tube.axis.direction();
        if *point == tube.axis.origin() {
            return -dir;
        }

        let t = tube.axial_offset(point);
        if is_zero(t) {
            -dir
        } else if is_zero(t - height) {
            dir
        } else {
            Self::normal_at_tube(tube, point)
        }
    }
}

#[cfg(test)]
fn v(x: f64, y: f64, z: f64) -> Vector {
    Vector::new(x, y, z).unwrap()
}

#[test]
fn ray_misses_sphere() {
    let s = Shape::sphere(Point::new(1.0, 0.0, 0.0), 1.0).unwrap();
    let r = Ray::new(Point::new(-1.0, 0.0, 0.0), v(1.0, 1.0, 0.0));

    assert!(s.find_intersections(&r).is_empty());
}

#[test]
fn ray_crosses_sphere() {
    let s = Shape::sphere(Point::new(1.0, 0.0, 0.0), 1.0).unwrap();
    let r = Ray::new(Point::new(-1.0, 0.0, 0.0), v(3.0, 1.0, 0.0));

    let points = s.find_intersections(&r);
    assert_eq!(points, vec![
        Point::new(0.0651530771650466, 0.355051025721682, 0.0),
        Point::new(1.53484692283495, 0.844948974278318, 0.0),
    ]);
}

#[test]
fn ray_starts_inside_sphere() {
    let s = Shape::sphere(Point::new(1.0, 0.0, 0.0), 1.0).unwrap();
    let r = Ray::new(Point::new(0.5, 0.0, 0.0), Vector::X);

    assert_eq!(s.find_intersections(&r), vec![Point::new(2.0, 0.0, 0.0)]);
}

#[test]
fn ray_starts_at_sphere_center() {
    let s = Shape::sphere(Point::new(1.0, 0.0, 0.0), 1.0).unwrap();
    let r = Ray::new(Point::new(1.0, 0.0, 0.0), Vector::Z);

    assert_eq!(s.find_intersections(&r), vec![Point::new(1.0, 0.0, 1.0)]);
}

#[test]
fn ray_through_sphere_center_is_symmetric() {
    let s = Shape::sphere(Point::new(1.0, 0.0, 0.0), 1.0).unwrap();
    let r = Ray::new(Point::new(1.0, 0.0, -3.0), Vector::Z);

    assert_eq!(s.find_intersections(&r), vec![
        Point::new(1.0, 0.0, -1.0),
        Point::new(1.0, 0.0, 1.0),
    ]);
}

#[test]
fn ray_is_tangent_to_sphere() {
    let s = Shape::sphere(Point::new(1.0, 0.0, 0.0), 1.0).unwrap();
    let r = Ray::new(Point::new(1.0, 1.0, -2.0), Vector::Z);

    assert!(s.find_intersections(&r).is_empty());
}

#[test]
fn sphere_is_behind_ray() {
    let s = Shape::sphere(Point::new(1.0, 0.0, 0.0), 1.0).unwrap();
    let r = Ray::new(Point::new(1.0, 0.0, 2.0), Vector::Z);

    assert!(s.find_intersections(&r).is_empty());
}

#[test]
fn sphere_distance_bound() {
    let s = Shape::sphere(Point::new(1.0, 0.0, 0.0), 1.0).unwrap();
    let r = Ray::new(Point::new(1.0, 0.0, -3.0), Vector::Z);

    assert_eq!(s.intersect(&r, 3.0).points(), vec![Point::new(1.0, 0.0, -1.0)]);
    assert!(s.intersect(&r, 2.0).is_empty());
    assert!(s.intersect(&r, 1.0).is_empty());
}

#[test]
fn normal_on_sphere() {
    let s = Shape::sphere(Point::new(0.0, 0.0, 1.0), 1.0).unwrap();

    assert_eq!(s.normal_at(&Point::new(0.0, 0.0, 2.0)), Vector::Z);
    assert_eq!(s.normal_at(&Point::new(1.0, 0.0, 1.0)), Vector::X);
}

#[test]
fn ray_intersects_plane() {
    let s = Shape::plane_from_points(
        Point::new(0.0, 0.0, 1.0),
        Point::new(0.0, 1.0, 0.0),
        Point::new(1.0, 0.0, 0.0),
    ).unwrap();

    let r = Ray::new(Point::new(2.0, 0.0, 0.0), v(-5.0, 0.0, 2.0));
    assert_eq!(s.find_intersections(&r), vec![Point::new(1.0 / 3.0, 0.0, 2.0 / 3.0)]);

    // Pointing away from the plane.
    let r = Ray::new(Point::new(2.0, 0.0, 0.0), v(5.0, 0.0, 2.0));
    assert!(s.find_intersections(&r).is_empty());
}

#[test]
fn ray_parallel_to_plane() {
    let s = Shape::plane(Point::ORIGIN, Vector::Y);

    // Inside the plane.
    let r = Ray::new(Point::new(1.0, 0.0, 1.0), Vector::X);
    assert!(s.find_intersections(&r).is_empty());

    // Above the plane.
    let r = Ray::new(Point::new(1.0, 1.0, 1.0), Vector::X);
    assert!(s.find_intersections(&r).is_empty());
}

#[test]
fn ray_starts_on_plane() {
    let s = Shape::plane(Point::ORIGIN, Vector::Y);

    // At the reference point.
    let r = Ray::new(Point::ORIGIN, v(1.0, 1.0, 0.0));
    assert!(s.find_intersections(&r).is_empty());

    // Anywhere else on the plane.
    let r = Ray::new(Point::new(1.0, 0.0, 1.0), v(1.0, -1.0, 0.0));
    assert!(s.find_intersections(&r).is_empty());
}

#[test]
fn plane_distance_bound() {
    let s = Shape::plane_from_points(
        Point::new(1.0, 0.0, 0.0),
        Point::new(-2.0, 0.0, -2.0),
        Point::new(0.0, 0.0, 2.0),
    ).unwrap();
    let r = Ray::new(Point::new(0.0, 2.0, 0.0), -Vector::Y);

    assert_eq!(s.intersect(&r, 3.0).len(), 1);
    assert!(s.intersect(&r, 2.0).is_empty());
    assert!(s.intersect(&r, 1.0).is_empty());
}

#[test]
fn ray_inside_triangle() {
    let s = Shape::triangle(
        Point::new(0.0, 0.0, 1.0),
        Point::new(0.0, 1.0, 0.0),
        Point::new(1.0, 0.0, 0.0),
    ).unwrap();
    let r = Ray::new(Point::new(0.5, 0.5, 1.0), v(-0.5, -1.0, -1.0));

    assert_eq!(s.find_intersections(&r), vec![Point::new(0.3, 0.1, 0.6)]);
}

#[test]
fn ray_outside_triangle() {
    let s = Shape::triangle(
        Point::new(0.0, 0.0, 1.0),
        Point::new(0.0, 1.0, 0.0),
        Point::new(1.0, 0.0, 0.0),
    ).unwrap();
    let p0 = Point::new(0.5, 0.5, 1.0);

    // Against an edge.
    assert!(s.find_intersections(&Ray::new(p0, v(-2.0, -0.5, -1.0))).is_empty());
    // Against a vertex.
    assert!(s.find_intersections(&Ray::new(p0, v(1.0, -0.5, -1.0))).is_empty());
}

#[test]
fn ray_on_triangle_boundary() {
    let s = Shape::triangle(
        Point::new(0.0, 0.0, 1.0),
        Point::new(0.0, 1.0, 0.0),
        Point::new(1.0, 0.0, 0.0),
    ).unwrap();
    let p0 = Point::new(0.5, 0.5, 1.0);

    // On an edge.
    assert!(s.find_intersections(&Ray::new(p0, v(-0.5, -0.1, -0.4))).is_empty());
    // On a vertex.
    assert!(s.find_intersections(&Ray::new(p0, v(-0.5, 0.5, -1.0))).is_empty());
    // On an edge's continuation.
    assert!(s.find_intersections(&Ray::new(p0, v(-0.5, -1.0, 0.5))).is_empty());
}

#[test]
fn triangle_distance_bound() {
    let s = Shape::triangle(
        Point::new(1.0, 0.0, 0.0),
        Point::new(-2.0, 0.0, -2.0),
        Point::new(0.0, 0.0, 2.0),
    ).unwrap();
    let r = Ray::new(Point::new(0.0, 2.0, 0.0), -Vector::Y);

    assert_eq!(s.intersect(&r, 3.0).len(), 1);
    assert!(s.intersect(&r, 2.0).is_empty());
    assert!(s.intersect(&r, 1.0).is_empty());
}

#[test]
fn ray_hits_polygon() {
    let s = Shape::polygon(vec![
        Point::new(0.0, 0.0, 1.0),
        Point::new(1.0, 0.0, 0.0),
        Point::new(0.0, 1.0, 0.0),
        Point::new(-1.0, 1.0, 1.0),
    ]).unwrap();

    // Through the middle of the quadrangle, coming from the front.
    let r = Ray::new(Point::new(0.0, 1.0, 1.0), v(0.0, -0.75, -0.5));
    let points = s.find_intersections(&r);
    assert_eq!(points.len(), 1);
    assert!(crate::feq(points[0].x + points[0].y + points[0].z, 1.0));

    // Aimed at a vertex.
    let r = Ray::new(Point::new(0.0, 1.0, 1.0), v(0.0, 0.0, -1.0));
    assert!(s.find_intersections(&r).is_empty());
}

#[test]
fn polygon_normal_is_plane_normal() {
    let s = Shape::polygon(vec![
        Point::new(0.0, 0.0, 1.0),
        Point::new(1.0, 0.0, 0.0),
        Point::new(0.0, 1.0, 0.0),
        Point::new(-1.0, 1.0, 1.0),
    ]).unwrap();

    let sqrt3 = 3.0f64.sqrt();
    let n = s.normal_at(&Point::new(0.0, 0.0, 1.0));
    assert!(n == v(1.0 / sqrt3, 1.0 / sqrt3, 1.0 / sqrt3)
        || n == v(-1.0 / sqrt3, -1.0 / sqrt3, -1.0 / sqrt3));
}

#[test]
fn tube_normal() {
    let s = Shape::tube(Ray::new(Point::new(0.0, 0.0, 1.0), Vector::Y), 1.0).unwrap();

    assert_eq!(s.normal_at(&Point::new(0.0, 0.5, 2.0)), Vector::Z);
    // Level with the axis origin.
    assert_eq!(s.normal_at(&Point::new(1.0, 0.0, 1.0)), Vector::X);
}

#[test]
fn ray_crosses_tube() {
    let s = Shape::tube(Ray::new(Point::ORIGIN, Vector::Y), 1.0).unwrap();

    let r = Ray::new(Point::new(-3.0, 5.0, 0.0), Vector::X);
    assert_eq!(s.find_intersections(&r), vec![
        Point::new(-1.0, 5.0, 0.0),
        Point::new(1.0, 5.0, 0.0),
    ]);

    // Tangent.
    let r = Ray::new(Point::new(-3.0, 5.0, 1.0), Vector::X);
    assert!(s.find_intersections(&r).is_empty());

    // Parallel to the axis, inside.
    let r = Ray::new(Point::new(0.5, 0.0, 0.0), Vector::Y);
    assert!(s.find_intersections(&r).is_empty());

    // From inside, bounded.
    let r = Ray::new(Point::ORIGIN, Vector::X);
    assert_eq!(s.find_intersections(&r), vec![Point::new(1.0, 0.0, 0.0)]);
    assert!(s.intersect(&r, 1.0).is_empty());
}

#[test]
fn cylinder_normals() {
    let s = Shape::cylinder(Ray::new(Point::new(1.0, 1.0, 1.0), Vector::Y), 1.0, 5.0)
        .unwrap();

    // Side.
    assert_eq!(s.normal_at(&Point::new(1.0, 3.0, 2.0)), Vector::Z);
    // Bottom cap.
    assert_eq!(s.normal_at(&Point::new(1.0, 1.0, 1.5)), -Vector::Y);
    // Top cap.
    assert_eq!(s.normal_at(&Point::new(1.0, 6.0, 1.5)), Vector::Y);
    // Centers of both caps.
    assert_eq!(s.normal_at(&Point::new(1.0, 1.0, 1.0)), -Vector::Y);
    assert_eq!(s.normal_at(&Point::new(1.0, 6.0, 1.0)), Vector::Y);
}

#[test]
fn ray_crosses_cylinder() {
    let s = Shape::cylinder(Ray::new(Point::ORIGIN, Vector::Y), 1.0, 2.0).unwrap();

    // Through both sides.
    let r = Ray::new(Point::new(-3.0, 1.0, 0.0), Vector::X);
    assert_eq!(s.find_intersections(&r), vec![
        Point::new(-1.0, 1.0, 0.0),
        Point::new(1.0, 1.0, 0.0),
    ]);

    // Above the top cap.
    let r = Ray::new(Point::new(-3.0, 3.0, 0.0), Vector::X);
    assert!(s.find_intersections(&r).is_empty());

    // Along the axis, through both caps.
    let r = Ray::new(Point::new(0.0, -1.0, 0.0), Vector::Y);
    assert_eq!(s.find_intersections(&r), vec![
        Point::new(0.0, 0.0, 0.0),
        Point::new(0.0, 2.0, 0.0),
    ]);

    // Through the bottom cap and out the side.
    let r = Ray::new(Point::new(0.0, -1.0, 0.0), v(1.0, 2.0, 0.0));
    let points = s.find_intersections(&r);
    assert_eq!(points.len(), 2);
    assert!(points.contains(&Point::new(0.5, 0.0, 0.0)));
    assert!(points.contains(&Point::new(1.0, 1.0, 0.0)));
}

#[test]
fn invalid_shapes() {
    assert_eq!(Shape::sphere(Point::ORIGIN, 0.0),
        Err(GeometryError::NonPositiveRadius(0.0)));
    assert_eq!(Shape::cylinder(Ray::new(Point::ORIGIN, Vector::Y), 1.0, -1.0),
        Err(GeometryError::NonPositiveHeight(-1.0)));
    assert!(Shape::triangle(Point::ORIGIN, Point::ORIGIN, Point::new(1.0, 0.0, 0.0))
        .is_err());
}
