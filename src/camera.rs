use log::debug;

use crate::{ is_zero, align_zero };
use crate::color::Color;
use crate::consts::{ DEFAULT_PROGRESS_INTERVAL, DEFAULT_THREADS };
use crate::error::{ CameraError, RenderError };
use crate::canvas::Canvas;
use crate::parallel;
use crate::ray::Ray;
use crate::tracer::RayTracer;
use crate::tuple::{ Point, Vector };
use crate::world::World;

/// A pinhole camera looking through a rectangular view plane.
///
/// The view plane sits `distance` in front of the camera along `v_to`, is
/// `width` by `height` in world units, and is divided into as many pixels as
/// the target image has. Cameras are only made through `CameraBuilder`.
#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    position: Point,
    v_to: Vector,
    v_up: Vector,
    v_right: Vector,

    width: f64,
    height: f64,
    distance: f64,

    /// Samples per pixel along each axis.
    anti_aliasing: usize,
    adaptive: bool,

    /// Worker threads for `render`. Zero renders on the calling thread.
    threads: usize,
    progress_interval: f64,
}

/// Collects camera settings, checking them all at once in `build`.
#[derive(Clone, Debug)]
pub struct CameraBuilder {
    position: Option<Point>,
    direction: Option<(Vector, Vector)>,
    size: Option<(f64, f64)>,
    distance: Option<f64>,
    anti_aliasing: usize,
    adaptive: bool,
    threads: usize,
    progress_interval: f64,
}

impl Default for CameraBuilder {
    fn default() -> CameraBuilder {
        CameraBuilder {
            position: None,
            direction: None,
            size: None,
            distance: None,
            anti_aliasing: 1,
            adaptive: false,
            threads: DEFAULT_THREADS,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }
}

impl CameraBuilder {
    pub fn location(self, position: Point) -> CameraBuilder {
        CameraBuilder { position: Some(position), ..self }
    }

    /// Sets where the camera looks (`to`) and which way is up (`up`). The two
    /// must be perpendicular.
    pub fn direction(self, to: Vector, up: Vector) -> CameraBuilder {
        CameraBuilder { direction: Some((to, up)), ..self }
    }

    pub fn vp_size(self, width: f64, height: f64) -> CameraBuilder {
        CameraBuilder { size: Some((width, height)), ..self }
    }

    pub fn vp_distance(self, distance: f64) -> CameraBuilder {
        CameraBuilder { distance: Some(distance), ..self }
    }

    /// Sets the number of samples per pixel along each axis.
    pub fn anti_aliasing(self, anti_aliasing: usize) -> CameraBuilder {
        CameraBuilder { anti_aliasing, ..self }
    }

    /// Enables adaptive supersampling instead of a full sample grid.
    pub fn adaptive(self, adaptive: bool) -> CameraBuilder {
        CameraBuilder { adaptive, ..self }
    }

    pub fn threads(self, threads: usize) -> CameraBuilder {
        CameraBuilder { threads, ..self }
    }

    /// Sets how often, in percent of pixels, progress is logged. Zero
    /// disables progress logging.
    pub fn progress_interval(self, progress_interval: f64) -> CameraBuilder {
        CameraBuilder { progress_interval, ..self }
    }

    pub fn build(self) -> Result<Camera, CameraError> {
        let position = self.position.ok_or(CameraError::Missing("location"))?;
        let (to, up) = self.direction.ok_or(CameraError::Missing("direction"))?;
        let (width, height) = self.size.ok_or(CameraError::Missing("view plane size"))?;
        let distance = self.distance.ok_or(CameraError::Missing("view plane distance"))?;

        if !is_zero(up.dot(&to)) {
            return Err(CameraError::NotOrthogonal);
        }

        for (what, value) in [("width", width), ("height", height), ("distance", distance)] {
            if !(value > 0.0) {
                return Err(CameraError::NonPositive { what, value });
            }
        }

        if self.anti_aliasing == 0 {
            return Err(CameraError::ZeroAntiAliasing);
        }

        let v_to = to.normalize();
        let v_up = up.normalize();
        let v_right = v_to.cross(&v_up)?.normalize();

        let camera = Camera {
            position,
            v_to,
            v_up,
            v_right,
            width,
            height,
            distance,
            anti_aliasing: self.anti_aliasing,
            adaptive: self.adaptive,
            threads: self.threads,
            progress_interval: self.progress_interval,
        };
        debug!("built camera {:?}", camera);

        Ok(camera)
    }
}

impl Camera {
    pub fn builder() -> CameraBuilder {
        Default::default()
    }

    pub fn position(&self) -> Point { self.position }
    pub fn v_to(&self) -> Vector { self.v_to }
    pub fn v_up(&self) -> Vector { self.v_up }
    pub fn v_right(&self) -> Vector { self.v_right }
    pub fn anti_aliasing(&self) -> usize { self.anti_aliasing }
    pub fn is_adaptive(&self) -> bool { self.adaptive }
    pub fn threads(&self) -> usize { self.threads }
    pub fn progress_interval(&self) -> f64 { self.progress_interval }

    /// Returns a copy of this camera using a different number of threads.
    pub fn with_threads(&self, threads: usize) -> Camera {
        Camera { threads, ..self.clone() }
    }

    /// Width and height of one pixel on the view plane.
    pub fn pixel_size(&self, nx: usize, ny: usize) -> (f64, f64) {
        (self.width / nx as f64, self.height / ny as f64)
    }

    /// Offsets `from` by `x` along `v_right` and `y` along `v_up`.
    fn offset(&self, from: Point, x: f64, y: f64) -> Point {
        let mut p = from;
        if !is_zero(x) {
            p = p + self.v_right * x;
        }
        if !is_zero(y) {
            p = p + self.v_up * y;
        }

        p
    }

    /// The center of pixel (`j`, `i`) on the view plane, where `j` is the
    /// column and `i` is the row of an `nx` by `ny` image.
    pub fn pixel_center(&self, nx: usize, ny: usize, j: usize, i: usize) -> Point {
        let (rx, ry) = self.pixel_size(nx, ny);
        let pc = self.position + self.v_to * self.distance;

        let y_i = -(i as f64 - (ny as f64 - 1.0) / 2.0) * ry;
        let x_j = (j as f64 - (nx as f64 - 1.0) / 2.0) * rx;

        self.offset(pc, x_j, y_i)
    }

    /// The ray from the camera through `target`.
    fn ray_through(&self, target: Point) -> Ray {
        match target.subtract(&self.position) {
            Ok(direction) => Ray::new(self.position, direction),
            Err(_) => Ray::new(self.position, self.v_to),
        }
    }

    /// Builds the ray through the center of pixel (`j`, `i`).
    pub fn construct_ray(&self, nx: usize, ny: usize, j: usize, i: usize) -> Ray {
        self.ray_through(self.pixel_center(nx, ny, j, i))
    }

    /// Builds the rays through an evenly spaced `N` by `N` grid of points
    /// covering pixel (`j`, `i`), where `N` is the anti-aliasing factor.
    ///
    /// With a factor of 1 this is just `construct_ray`.
    pub fn construct_rays(&self, nx: usize, ny: usize, j: usize, i: usize) -> Vec<Ray> {
        let n = self.anti_aliasing;
        let center = self.pixel_center(nx, ny, j, i);
        if n == 1 {
            return vec![self.ray_through(center)];
        }

        let (rx, ry) = self.pixel_size(nx, ny);
        let (sub_x, sub_y) = (rx / n as f64, ry / n as f64);
        let mid = (n as f64 - 1.0) / 2.0;

        let mut rays = Vec::with_capacity(n * n);
        for row in 0..n {
            for col in 0..n {
                let x = (col as f64 - mid) * sub_x;
                let y = -(row as f64 - mid) * sub_y;
                rays.push(self.ray_through(self.offset(center, x, y)));
            }
        }

        rays
    }

    /// Colors pixel (`j`, `i`) by adaptive supersampling.
    ///
    /// The pixel's corners are sampled first. If they agree the pixel is
    /// done; otherwise each quarter of the pixel is sampled the same way,
    /// down to sub-pixels `1/N` the size of the pixel.
    pub fn adaptive_color<F>(&self, nx: usize, ny: usize, j: usize, i: usize, trace: F)
        -> Color
        where F: Fn(&Ray) -> Color {
        let (rx, ry) = self.pixel_size(nx, ny);
        let n = self.anti_aliasing as f64;
        let center = self.pixel_center(nx, ny, j, i);

        let mut sampled = Vec::new();
        self.adaptive_sample(center, rx, ry, rx / n, ry / n, &trace, &mut sampled)
    }

    /// Samples the rectangle of size `width` by `height` centered at `center`.
    ///
    /// `sampled` remembers the color of every corner traced so far, so that
    /// corners shared by neighbouring quarters are only traced once.
    fn adaptive_sample<F>(&self, center: Point, width: f64, height: f64,
        min_width: f64, min_height: f64, trace: &F,
        sampled: &mut Vec<(Point, Color)>) -> Color
        where F: Fn(&Ray) -> Color {
        if align_zero(width - 2.0 * min_width) < 0.0
            || align_zero(height - 2.0 * min_height) < 0.0 {
            return trace(&self.ray_through(center));
        }

        let mut colors = Vec::with_capacity(4);
        let mut quarters = Vec::with_capacity(4);
        for (sx, sy) in [(-1.0, -1.0), (-1.0, 1.0), (1.0, -1.0), (1.0, 1.0)] {
            let corner = self.offset(center, sx * width / 2.0, sy * height / 2.0);
            let known = sampled.iter()
                .find(|(p, _)| *p == corner)
                .map(|&(_, c)| c);
            let color = match known {
                Some(c) => c,
                None => {
                    let c = trace(&self.ray_through(corner));
                    sampled.push((corner, c));
                    c
                }
            };

            colors.push(color);
            quarters.push(self.offset(center, sx * width / 4.0, sy * height / 4.0));
        }

        if colors.iter().all(|c| c.is_almost_equal(&colors[0])) {
            return colors[0];
        }

        quarters.into_iter()
            .map(|q| self.adaptive_sample(q, width / 2.0, height / 2.0,
                min_width, min_height, trace, sampled))
            .sum::<Color>()
            .reduce(4)
    }

    /// Colors pixel (`j`, `i`) using the camera's sampling settings.
    pub fn pixel_color(&self, tracer: &RayTracer, nx: usize, ny: usize,
        j: usize, i: usize) -> Color {
        if self.adaptive {
            self.adaptive_color(nx, ny, j, i, |ray| tracer.trace_ray(ray))
        } else if self.anti_aliasing == 1 {
            tracer.trace_ray(&self.construct_ray(nx, ny, j, i))
        } else {
            tracer.trace_rays(&self.construct_rays(nx, ny, j, i))
        }
    }

    /// Renders `world` onto every pixel of `canvas`.
    ///
    /// See `parallel::render` for how the work is split between threads.
    pub fn render(&self, world: &World, canvas: &mut Canvas) -> Result<(), RenderError> {
        parallel::render(world, self, canvas)
    }
}

/* Tests */

#[cfg(test)]
fn v(x: f64, y: f64, z: f64) -> Vector {
    Vector::new(x, y, z).unwrap()
}

#[cfg(test)]
fn test_camera(size: f64) -> Camera {
    Camera::builder()
        .location(Point::ORIGIN)
        .direction(v(0.0, 0.0, -1.0), v(0.0, -1.0, 0.0))
        .vp_distance(10.0)
        .vp_size(size, size)
        .build()
        .unwrap()
}

#[test]
fn rays_through_even_view_plane() {
    let camera = test_camera(8.0);

    // Center of a 4x4 view plane: no pixel sits on the axis.
    assert_eq!(camera.construct_ray(4, 4, 1, 1),
        Ray::new(Point::ORIGIN, v(1.0, -1.0, -10.0)));
    // Corner.
    assert_eq!(camera.construct_ray(4, 4, 0, 0),
        Ray::new(Point::ORIGIN, v(3.0, -3.0, -10.0)));
    // Edge.
    assert_eq!(camera.construct_ray(4, 4, 1, 0),
        Ray::new(Point::ORIGIN, v(1.0, -3.0, -10.0)));
}

#[test]
fn rays_through_odd_view_plane() {
    let camera = test_camera(6.0);

    // Center.
    assert_eq!(camera.construct_ray(3, 3, 1, 1),
        Ray::new(Point::ORIGIN, v(0.0, 0.0, -10.0)));
    // Edges.
    assert_eq!(camera.construct_ray(3, 3, 1, 0),
        Ray::new(Point::ORIGIN, v(0.0, -2.0, -10.0)));
    assert_eq!(camera.construct_ray(3, 3, 0, 1),
        Ray::new(Point::ORIGIN, v(2.0, 0.0, -10.0)));
    // Corner.
    assert_eq!(camera.construct_ray(3, 3, 0, 0),
        Ray::new(Point::ORIGIN, v(2.0, -2.0, -10.0)));
}

#[test]
fn builder_rejects_bad_settings() {
    let base = Camera::builder()
        .location(Point::ORIGIN)
        .direction(v(0.0, 0.0, -1.0), v(0.0, 1.0, 0.0))
        .vp_distance(1.0)
        .vp_size(2.0, 2.0);

    assert!(base.clone().build().is_ok());

    assert_eq!(base.clone().direction(v(0.0, 0.0, -1.0), v(0.0, 1.0, 1.0)).build(),
        Err(CameraError::NotOrthogonal));
    assert_eq!(base.clone().vp_distance(0.0).build(),
        Err(CameraError::NonPositive { what: "distance", value: 0.0 }));
    assert_eq!(base.clone().vp_size(2.0, -1.0).build(),
        Err(CameraError::NonPositive { what: "height", value: -1.0 }));
    assert_eq!(base.clone().anti_aliasing(0).build(),
        Err(CameraError::ZeroAntiAliasing));

    assert_eq!(Camera::builder().vp_size(1.0, 1.0).build(),
        Err(CameraError::Missing("location")));
}

#[test]
fn camera_basis_is_right_handed() {
    let camera = Camera::builder()
        .location(Point::ORIGIN)
        .direction(v(0.0, 0.0, -3.0), v(0.0, 2.0, 0.0))
        .vp_distance(1.0)
        .vp_size(2.0, 2.0)
        .build()
        .unwrap();

    assert_eq!(camera.v_to(), v(0.0, 0.0, -1.0));
    assert_eq!(camera.v_up(), Vector::Y);
    assert_eq!(camera.v_right(), Vector::X);
}

#[test]
fn anti_aliasing_grid() {
    let camera = Camera::builder()
        .location(Point::ORIGIN)
        .direction(v(0.0, 0.0, -1.0), v(0.0, 1.0, 0.0))
        .vp_distance(1.0)
        .vp_size(2.0, 2.0)
        .anti_aliasing(2)
        .build()
        .unwrap();

    // One pixel covering the whole view plane, sampled at quarter points.
    let rays = camera.construct_rays(1, 1, 0, 0);
    assert_eq!(rays, vec![
        Ray::new(Point::ORIGIN, v(-0.5, 0.5, -1.0)),
        Ray::new(Point::ORIGIN, v(0.5, 0.5, -1.0)),
        Ray::new(Point::ORIGIN, v(-0.5, -0.5, -1.0)),
        Ray::new(Point::ORIGIN, v(0.5, -0.5, -1.0)),
    ]);

    let single = Camera { anti_aliasing: 1, ..camera };
    assert_eq!(single.construct_rays(1, 1, 0, 0),
        vec![single.construct_ray(1, 1, 0, 0)]);
}

#[test]
fn adaptive_sampling_stops_on_uniform_pixel() {
    use std::cell::Cell;

    let camera = Camera::builder()
        .location(Point::ORIGIN)
        .direction(v(0.0, 0.0, -1.0), v(0.0, 1.0, 0.0))
        .vp_distance(1.0)
        .vp_size(2.0, 2.0)
        .anti_aliasing(8)
        .adaptive(true)
        .build()
        .unwrap();

    let calls = Cell::new(0);
    let color = camera.adaptive_color(1, 1, 0, 0, |_| {
        calls.set(calls.get() + 1);
        Color::gray(0.5)
    });

    assert_eq!(color, Color::gray(0.5));
    assert_eq!(calls.get(), 4);
}

#[test]
fn adaptive_sampling_refines_edges() {
    use std::cell::Cell;

    let camera = Camera::builder()
        .location(Point::ORIGIN)
        .direction(v(0.0, 0.0, -1.0), v(0.0, 1.0, 0.0))
        .vp_distance(1.0)
        .vp_size(2.0, 2.0)
        .anti_aliasing(4)
        .adaptive(true)
        .build()
        .unwrap();

    // Left half white, right half black.
    let calls = Cell::new(0);
    let color = camera.adaptive_color(1, 1, 0, 0, |ray| {
        calls.set(calls.get() + 1);
        if ray.direction().x() < 0.0 { Color::white() } else { Color::black() }
    });

    assert_eq!(color, Color::gray(0.5));
    // 4 pixel corners, then 3 + 1 + 1 + 0 new corners for the quarters. The
    // two quarters touching the edge are split once more, tracing 4 centers
    // each.
    assert_eq!(calls.get(), 17);
}

#[test]
fn adaptive_sampling_without_anti_aliasing_traces_center() {
    use std::cell::Cell;

    let camera = Camera::builder()
        .location(Point::ORIGIN)
        .direction(v(0.0, 0.0, -1.0), v(0.0, 1.0, 0.0))
        .vp_distance(1.0)
        .vp_size(2.0, 2.0)
        .adaptive(true)
        .build()
        .unwrap();

    let calls = Cell::new(0);
    let center = camera.adaptive_color(1, 1, 0, 0, |ray| {
        calls.set(calls.get() + 1);
        assert_eq!(*ray, camera.construct_ray(1, 1, 0, 0));
        Color::red()
    });

    assert_eq!(center, Color::red());
    assert_eq!(calls.get(), 1);
}

#[cfg(test)]
fn count_view_plane_hits(shape: &crate::shape::Shape, location: Point) -> usize {
    let camera = Camera::builder()
        .location(location)
        .direction(v(0.0, 0.0, -1.0), v(0.0, -1.0, 0.0))
        .vp_size(3.0, 3.0)
        .vp_distance(1.0)
        .build()
        .unwrap();

    let mut count = 0;
    for i in 0..3 {
        for j in 0..3 {
            count += shape.find_intersections(&camera.construct_ray(3, 3, j, i)).len();
        }
    }

    count
}

#[test]
fn view_plane_rays_hit_spheres() {
    use crate::shape::Shape;

    let s = |x, y, z, r| Shape::sphere(Point::new(x, y, z), r).unwrap();
    let behind = Point::new(0.0, 0.0, 0.5);

    assert_eq!(count_view_plane_hits(&s(0.0, 0.0, -3.0, 1.0), Point::ORIGIN), 2);
    assert_eq!(count_view_plane_hits(&s(0.0, 0.0, -2.5, 2.5), behind), 18);
    assert_eq!(count_view_plane_hits(&s(0.0, 0.0, -2.0, 2.0), behind), 10);
    // Camera inside the sphere.
    assert_eq!(count_view_plane_hits(&s(0.0, 0.0, -1.0, 4.0), Point::ORIGIN), 9);
    // Sphere behind the camera.
    assert_eq!(count_view_plane_hits(&s(0.0, 0.0, 1.0, 0.5), Point::ORIGIN), 0);
}

#[test]
fn view_plane_rays_hit_triangles() {
    use crate::shape::Shape;

    let small = Shape::triangle(
        Point::new(0.0, 1.0, -2.0),
        Point::new(1.0, -1.0, -2.0),
        Point::new(-1.0, -1.0, -2.0),
    ).unwrap();
    assert_eq!(count_view_plane_hits(&small, Point::ORIGIN), 1);

    let tall = Shape::triangle(
        Point::new(0.0, 20.0, -2.0),
        Point::new(1.0, -1.0, -2.0),
        Point::new(-1.0, -1.0, -2.0),
    ).unwrap();
    assert_eq!(count_view_plane_hits(&tall, Point::ORIGIN), 2);
}

#[test]
fn view_plane_rays_hit_planes() {
    use crate::shape::Shape;

    let p = Point::new(0.0, 0.0, -3.0);

    // Facing the camera.
    assert_eq!(count_view_plane_hits(&Shape::plane(p, v(0.0, 0.0, 1.0)), Point::ORIGIN), 9);
    // Slightly tilted.
    assert_eq!(count_view_plane_hits(&Shape::plane(p, v(0.0, 0.2, -1.0)), Point::ORIGIN), 9);
    // Tilted so one row of rays runs parallel to it.
    assert_eq!(count_view_plane_hits(&Shape::plane(p, v(0.0, 1.0, -1.0)), Point::ORIGIN), 6);
}

#[cfg(test)]
fn unit_view_plane() -> CameraBuilder {
    Camera::builder()
        .location(Point::ORIGIN)
        .direction(v(0.0, 0.0, -1.0), v(0.0, 1.0, 0.0))
        .vp_distance(1.0)
        .vp_size(2.0, 2.0)
}

#[test]
fn single_pixel_render_shows_ambient_and_emission() {
    use crate::light::AmbientLight;
    use crate::shape::Shape;

    let mut world = World::empty();
    world.ambient_light = AmbientLight::uniform(Color::white(), 0.1);
    world.geometries.add(
        Shape::sphere(Point::new(0.0, 0.0, -3.0), 1.0).unwrap()
            .with_emission(Color::rgb(0.2, 0.3, 0.4))
    );

    let camera = unit_view_plane().build().unwrap();
    let mut canvas = Canvas::new(1, 1);
    camera.render(&world, &mut canvas).unwrap();

    assert_eq!(canvas.read_pixel(0, 0), Some(Color::rgb(0.3, 0.4, 0.5)));
}

#[test]
fn anti_aliasing_over_uniform_background() {
    let mut world = World::empty();
    world.background = Color::rgb(0.3, 0.6, 0.9);
    let tracer = RayTracer::new(&world);

    let camera = unit_view_plane().anti_aliasing(5).build().unwrap();
    assert_eq!(camera.construct_rays(3, 3, 1, 1).len(), 25);
    assert_eq!(camera.pixel_color(&tracer, 3, 3, 1, 1), Color::rgb(0.3, 0.6, 0.9));
    assert_eq!(camera.pixel_color(&tracer, 3, 3, 0, 2), Color::rgb(0.3, 0.6, 0.9));
}
