use crate::{ align_zero, is_zero };
use crate::consts::DELTA;
use crate::tuple::{ Point, Vector };

/// A half-line with an origin and a unit direction.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Ray {
    origin: Point,
    direction: Vector,
}

impl Ray {
    /// Creates a ray. The direction is normalized.
    pub fn new(origin: Point, direction: Vector) -> Ray {
        Ray { origin, direction: direction.normalize() }
    }

    /// Creates a secondary ray leaving a surface.
    ///
    /// The origin is pushed `DELTA` along `normal`, toward the side of the
    /// surface that `direction` points into, so the ray does not hit the
    /// surface it starts on. A direction tangent to the surface leaves the
    /// origin in place.
    pub fn biased(origin: Point, direction: Vector, normal: &Vector) -> Ray {
        let nv = align_zero(normal.dot(&direction));
        let origin = if nv == 0.0 {
            origin
        } else {
            let offset = if nv > 0.0 { DELTA } else { -DELTA };
            origin + *normal * offset
        };

        Ray::new(origin, direction)
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn direction(&self) -> Vector {
        self.direction
    }

    /// The point at distance `t` along the ray.
    pub fn point_at(&self, t: f64) -> Point {
        if is_zero(t) {
            self.origin
        } else {
            self.origin + self.direction * t
        }
    }
}

#[test]
fn ray_direction_is_normalized() {
    let r = Ray::new(Point::ORIGIN, Vector::new(0.0, 3.0, 4.0).unwrap());

    assert_eq!(r.direction(), Vector::new(0.0, 0.6, 0.8).unwrap());
}

#[test]
fn ray_point_at() {
    let r = Ray::new(Point::new(2.0, 3.0, 4.0), Vector::X);

    assert_eq!(r.point_at(0.0), Point::new(2.0, 3.0, 4.0));
    assert_eq!(r.point_at(1.0), Point::new(3.0, 3.0, 4.0));
    assert_eq!(r.point_at(-1.0), Point::new(1.0, 3.0, 4.0));
    assert_eq!(r.point_at(2.5), Point::new(4.5, 3.0, 4.0));
}

#[test]
fn biased_ray_moves_along_normal() {
    let p = Point::new(0.0, 0.0, 0.0);
    let n = Vector::Y;

    // Leaving the front of the surface.
    let up = Ray::biased(p, Vector::new(1.0, 1.0, 0.0).unwrap(), &n);
    assert_eq!(up.origin(), Point::new(0.0, DELTA, 0.0));

    // Passing through to the back of the surface.
    let down = Ray::biased(p, Vector::new(1.0, -1.0, 0.0).unwrap(), &n);
    assert_eq!(down.origin(), Point::new(0.0, -DELTA, 0.0));

    // Tangent to the surface.
    let flat = Ray::biased(p, Vector::X, &n);
    assert_eq!(flat.origin(), p);
}
