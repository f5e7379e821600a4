use std::ops::{ Add, Sub, Neg, Mul };

use crate::{ feq, is_zero };
use crate::error::GeometryError;

/// A raw triple of numbers.
///
/// Carries no geometric meaning by itself. It is the result of point
/// differences and vector scaling, and doubles as the per-channel coefficient
/// type of a `Material`.
#[derive(Debug, Default, Copy, Clone, PartialOrd)]
pub struct Tuple3D {
    pub x: f64,
    pub y: f64,
    pub z: f64
}

impl PartialEq for Tuple3D {
    fn eq(&self, other: &Tuple3D) -> bool {
        feq(self.x, other.x) &&
            feq(self.y, other.y) &&
            feq(self.z, other.z)
    }
}

impl Tuple3D {
    pub const ZERO: Tuple3D = Tuple3D { x: 0.0, y: 0.0, z: 0.0 };
    pub const ONE: Tuple3D = Tuple3D { x: 1.0, y: 1.0, z: 1.0 };

    pub fn new(x: f64, y: f64, z: f64) -> Tuple3D {
        Tuple3D { x, y, z }
    }

    /// Creates a triple with the same value in every component.
    pub fn splat(k: f64) -> Tuple3D {
        Tuple3D { x: k, y: k, z: k }
    }

    /// Checks whether every component is (close to) zero.
    pub fn is_zero(&self) -> bool {
        is_zero(self.x) && is_zero(self.y) && is_zero(self.z)
    }

    pub fn length_squared(&self) -> f64 {
        self.dot(self)
    }

    pub fn length(&self) -> f64 {
        self.length_squared().sqrt()
    }

    pub fn dot(&self, other: &Tuple3D) -> f64 {
        self.x * other.x
            + self.y * other.y
            + self.z * other.z
    }

    /// The cross product of two triples. May be the zero triple.
    pub fn cross(&self, other: &Tuple3D) -> Tuple3D {
        Tuple3D {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    /// Multiplies two triples component by component.
    ///
    /// # Examples
    ///
    /// ```
    /// # use lumen_tracer::tuple::Tuple3D;
    /// let kr = Tuple3D::new(0.5, 1.0, 0.2);
    /// let k = Tuple3D::splat(0.5);
    /// assert_eq!(kr.product(&k), Tuple3D::new(0.25, 0.5, 0.1));
    /// ```
    pub fn product(&self, other: &Tuple3D) -> Tuple3D {
        Tuple3D {
            x: self.x * other.x,
            y: self.y * other.y,
            z: self.z * other.z,
        }
    }

    /// Checks whether every component is strictly lower than `k`.
    pub fn lower_than(&self, k: f64) -> bool {
        self.x < k && self.y < k && self.z < k
    }
}

impl From<[f64; 3]> for Tuple3D {
    fn from(v: [f64; 3]) -> Tuple3D {
        Tuple3D { x: v[0], y: v[1], z: v[2] }
    }
}

impl Add for Tuple3D {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }
}

impl Sub for Tuple3D {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }
}

impl Neg for Tuple3D {
    type Output = Self;

    fn neg(self) -> Self {
        Self { x: -self.x, y: -self.y, z: -self.z }
    }
}

impl Mul<f64> for Tuple3D {
    type Output = Self;

    fn mul(self, k: f64) -> Self {
        Self { x: self.x * k, y: self.y * k, z: self.z * k }
    }
}

impl Mul<Tuple3D> for f64 {
    type Output = Tuple3D;

    fn mul(self, t: Tuple3D) -> Tuple3D {
        t * self
    }
}

/// A position in space.
#[derive(Debug, Default, Copy, Clone)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub z: f64
}

impl PartialEq for Point {
    fn eq(&self, other: &Point) -> bool {
        feq(self.x, other.x) &&
            feq(self.y, other.y) &&
            feq(self.z, other.z)
    }
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0, z: 0.0 };

    pub fn new(x: f64, y: f64, z: f64) -> Point {
        Point { x, y, z }
    }

    pub fn xyz(&self) -> Tuple3D {
        Tuple3D { x: self.x, y: self.y, z: self.z }
    }

    /// The vector leading from `other` to `self`.
    ///
    /// Fails when both points are the same, since there is no zero vector.
    ///
    /// # Examples
    ///
    /// ```
    /// # use lumen_tracer::tuple::{ Point, Vector };
    /// let p = Point::new(1.0, 2.0, 3.0);
    /// let v = p.subtract(&Point::new(1.0, 0.0, 3.0)).unwrap();
    /// assert_eq!(v, Vector::new(0.0, 2.0, 0.0).unwrap());
    /// assert!(p.subtract(&p).is_err());
    /// ```
    pub fn subtract(&self, other: &Point) -> Result<Vector, GeometryError> {
        Vector::try_from(*self - *other)
    }

    pub fn distance_squared(&self, other: &Point) -> f64 {
        (*self - *other).length_squared()
    }

    pub fn distance(&self, other: &Point) -> f64 {
        self.distance_squared(other).sqrt()
    }
}

impl From<Tuple3D> for Point {
    fn from(t: Tuple3D) -> Point {
        Point { x: t.x, y: t.y, z: t.z }
    }
}

impl From<[f64; 3]> for Point {
    fn from(v: [f64; 3]) -> Point {
        Point { x: v[0], y: v[1], z: v[2] }
    }
}

/// The raw difference between two points.
impl Sub<Point> for Point {
    type Output = Tuple3D;

    fn sub(self, other: Point) -> Tuple3D {
        self.xyz() - other.xyz()
    }
}

impl Add<Vector> for Point {
    type Output = Point;

    fn add(self, v: Vector) -> Point {
        (self.xyz() + v.xyz()).into()
    }
}

impl Add<Tuple3D> for Point {
    type Output = Point;

    fn add(self, t: Tuple3D) -> Point {
        (self.xyz() + t).into()
    }
}

/// A direction in space.
///
/// A `Vector` is never the zero vector; every constructor that could produce
/// one returns `GeometryError::ZeroVector` instead. Fields are private so the
/// invariant cannot be bypassed.
#[derive(Debug, Copy, Clone)]
pub struct Vector {
    x: f64,
    y: f64,
    z: f64
}

impl PartialEq for Vector {
    fn eq(&self, other: &Vector) -> bool {
        feq(self.x, other.x) &&
            feq(self.y, other.y) &&
            feq(self.z, other.z)
    }
}

impl TryFrom<Tuple3D> for Vector {
    type Error = GeometryError;

    fn try_from(t: Tuple3D) -> Result<Vector, GeometryError> {
        if t.is_zero() {
            return Err(GeometryError::ZeroVector);
        }

        Ok(Vector { x: t.x, y: t.y, z: t.z })
    }
}

impl Vector {
    pub const X: Vector = Vector { x: 1.0, y: 0.0, z: 0.0 };
    pub const Y: Vector = Vector { x: 0.0, y: 1.0, z: 0.0 };
    pub const Z: Vector = Vector { x: 0.0, y: 0.0, z: 1.0 };

    pub fn new(x: f64, y: f64, z: f64) -> Result<Vector, GeometryError> {
        Vector::try_from(Tuple3D { x, y, z })
    }

    pub fn x(&self) -> f64 { self.x }
    pub fn y(&self) -> f64 { self.y }
    pub fn z(&self) -> f64 { self.z }

    pub fn xyz(&self) -> Tuple3D {
        Tuple3D { x: self.x, y: self.y, z: self.z }
    }

    pub fn length_squared(&self) -> f64 {
        self.xyz().length_squared()
    }

    pub fn length(&self) -> f64 {
        self.length_squared().sqrt()
    }

    pub fn dot(&self, other: &Vector) -> f64 {
        self.xyz().dot(&other.xyz())
    }

    /// The cross product of two vectors. Parallel vectors have none.
    pub fn cross(&self, other: &Vector) -> Result<Vector, GeometryError> {
        Vector::try_from(self.xyz().cross(&other.xyz()))
    }

    pub fn add(&self, other: &Vector) -> Result<Vector, GeometryError> {
        Vector::try_from(self.xyz() + other.xyz())
    }

    pub fn scale(&self, k: f64) -> Result<Vector, GeometryError> {
        Vector::try_from(self.xyz() * k)
    }

    pub fn normalize(&self) -> Vector {
        let len = self.length();

        Vector {
            x: self.x / len,
            y: self.y / len,
            z: self.z / len,
        }
    }

    /// Reflects a vector across a unit normal.
    ///
    /// The result keeps the length of `self`, so it is never zero.
    pub fn reflect(&self, normal: &Vector) -> Vector {
        let t = self.xyz() - normal.xyz() * (2.0 * self.dot(normal));
        Vector { x: t.x, y: t.y, z: t.z }
    }
}

impl Neg for Vector {
    type Output = Vector;

    fn neg(self) -> Vector {
        Vector { x: -self.x, y: -self.y, z: -self.z }
    }
}

/// Scaling a vector yields a raw triple, since the scale may be zero.
impl Mul<f64> for Vector {
    type Output = Tuple3D;

    fn mul(self, k: f64) -> Tuple3D {
        self.xyz() * k
    }
}

/* Tests */

#[test]
fn zero_vector_is_rejected() {
    assert_eq!(Vector::new(0.0, 0.0, 0.0), Err(GeometryError::ZeroVector));
    assert_eq!(Vector::new(1e-12, 0.0, -1e-12), Err(GeometryError::ZeroVector));

    let v = Vector::new(1.0, 2.0, 3.0).unwrap();
    assert_eq!(v.add(&-v), Err(GeometryError::ZeroVector));
    assert_eq!(v.scale(0.0), Err(GeometryError::ZeroVector));
}

#[test]
fn point_arithmetic() {
    let p1 = Point::new(1.0, 2.0, 3.0);
    let p2 = Point::new(2.0, 3.0, 4.0);
    let v = Vector::new(-1.0, -2.0, -3.0).unwrap();

    assert_eq!(p2 - p1, Tuple3D::new(1.0, 1.0, 1.0));
    assert_eq!(p1 + v, Point::ORIGIN);
    assert_eq!(p1.subtract(&p2), Vector::new(-1.0, -1.0, -1.0));
    assert_eq!(p1.subtract(&p1), Err(GeometryError::ZeroVector));
}

#[test]
fn point_distances() {
    let p1 = Point::new(1.0, 2.0, 3.0);
    let p2 = Point::new(4.0, 6.0, 3.0);

    assert!(feq(p1.distance_squared(&p2), 25.0));
    assert!(feq(p1.distance(&p2), 5.0));
    assert!(feq(p1.distance(&p1), 0.0));
}

#[test]
fn vector_products() {
    let v1 = Vector::new(1.0, 2.0, 3.0).unwrap();
    let v2 = Vector::new(-2.0, -4.0, -6.0).unwrap();
    let v3 = Vector::new(0.0, 3.0, -2.0).unwrap();

    assert!(feq(v1.length_squared(), 14.0));
    assert!(feq(v1.dot(&v2), -28.0));
    assert!(feq(v1.dot(&v3), 0.0));

    // Parallel vectors have no cross product.
    assert_eq!(v1.cross(&v2), Err(GeometryError::ZeroVector));

    let c = v1.cross(&v3).unwrap();
    assert!(feq(c.length(), v1.length() * v3.length()));
    assert!(feq(c.dot(&v1), 0.0));
    assert!(feq(c.dot(&v3), 0.0));
}

#[test]
fn vector_normalization() {
    let v = Vector::new(1.0, 2.0, 3.0).unwrap();
    let u = v.normalize();

    assert!(feq(u.length(), 1.0));
    assert!(v.cross(&u).is_err());
    assert!(v.dot(&u) > 0.0);
}

#[test]
fn vector_reflection() {
    let v = Vector::new(1.0, -1.0, 0.0).unwrap();
    let n = Vector::Y;

    assert_eq!(v.reflect(&n), Vector::new(1.0, 1.0, 0.0).unwrap());

    let n = Vector::new(1.0, 1.0, 0.0).unwrap().normalize();
    let v = Vector::new(0.0, -1.0, 0.0).unwrap();
    assert_eq!(v.reflect(&n), Vector::X);
}

#[test]
fn triple_coefficients() {
    let k = Tuple3D::new(0.001, 0.0005, 0.0);
    assert!(k.lower_than(0.002));
    assert!(!k.lower_than(0.001));
    assert_eq!(Tuple3D::ONE.product(&k), k);
}
