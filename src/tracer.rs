use crate::align_zero;
use crate::color::Color;
use crate::consts::{ MAX_CALC_COLOR_LEVEL, MIN_CALC_COLOR_K };
use crate::intersect::GeoPoint;
use crate::light::{ Light, LightSource, Material };
use crate::ray::Ray;
use crate::tuple::{ Tuple3D, Vector };
use crate::world::World;

/// Recursive ray tracer over a `World`.
///
/// Colors are the sum of local effects (emission, plus diffuse and specular
/// light from each source, dimmed by whatever stands between the point and
/// the light) and global effects (reflected and transmitted rays traced
/// recursively). Recursion stops after `max_level` bounces, or as soon as the
/// accumulated attenuation `k` of a branch drops below `min_k` on every
/// channel.
#[derive(Copy, Clone, Debug)]
pub struct RayTracer<'a> {
    world: &'a World,
    max_level: usize,
    min_k: f64,
}

impl<'a> RayTracer<'a> {
    pub fn new(world: &'a World) -> RayTracer<'a> {
        RayTracer {
            world,
            max_level: MAX_CALC_COLOR_LEVEL,
            min_k: MIN_CALC_COLOR_K,
        }
    }

    /// Overrides the recursion depth and attenuation cutoff.
    pub fn with_limits(self, max_level: usize, min_k: f64) -> RayTracer<'a> {
        RayTracer { max_level: max_level.max(1), min_k, ..self }
    }

    /// Computes the color seen along a ray.
    ///
    /// Rays that hit nothing see the world's background.
    pub fn trace_ray(&self, ray: &Ray) -> Color {
        match self.world.geometries.find_closest_intersection(ray) {
            Some(gp) => self.calc_color(&gp, ray),
            None => self.world.background,
        }
    }

    /// Averages the colors seen along a bundle of rays.
    pub fn trace_rays(&self, rays: &[Ray]) -> Color {
        rays.iter()
            .map(|ray| self.trace_ray(ray))
            .sum::<Color>()
            .reduce(rays.len())
    }

    /// The full color at a hit: ambient light plus the recursive color.
    pub fn calc_color(&self, gp: &GeoPoint, ray: &Ray) -> Color {
        self.world.ambient_light.intensity
            + self.calc_color_at(gp, ray, self.max_level, Tuple3D::ONE)
    }

    fn calc_color_at(&self, gp: &GeoPoint, ray: &Ray, level: usize, k: Tuple3D)
        -> Color {
        let color = self.local_effects(gp, ray, k);
        if level <= 1 {
            return color;
        }

        color + self.global_effects(gp, ray, level, k)
    }

    fn local_effects(&self, gp: &GeoPoint, ray: &Ray, k: Tuple3D) -> Color {
        let mut color = gp.geometry.emission;

        let n = gp.normal();
        let v = ray.direction();
        let nv = align_zero(n.dot(&v));
        if nv == 0.0 {
            return color;
        }

        let material = &gp.geometry.material;
        for light in self.world.lights.iter() {
            let l = match light.direction_at(&gp.point) {
                Some(l) => l,
                None => continue,
            };

            // Only lights on the same side of the surface as the viewer count.
            let nl = align_zero(n.dot(&l));
            if align_zero(nl * nv) <= 0.0 {
                continue;
            }

            let ktr = self.transparency(gp, light, &l, &n);
            if ktr.product(&k).lower_than(self.min_k) {
                continue;
            }

            let il = light.intensity_at(&gp.point) * ktr;
            color = color
                + il * Self::diffuse(material, nl)
                + il * Self::specular(material, &n, &l, nl, &v);
        }

        color
    }

    fn diffuse(material: &Material, nl: f64) -> Tuple3D {
        material.kd * nl.abs()
    }

    fn specular(material: &Material, n: &Vector, l: &Vector, nl: f64, v: &Vector)
        -> Tuple3D {
        let r = l.xyz() - n.xyz() * (2.0 * nl);
        let minus_vr = align_zero(-v.xyz().dot(&r));
        if minus_vr <= 0.0 {
            return Tuple3D::ZERO;
        }

        material.ks * minus_vr.powi(material.shininess)
    }

    /// How much of a light gets through to a point.
    ///
    /// Every surface between the point and the light multiplies the light by
    /// its transmission coefficient, so opaque occluders cast full shadows
    /// and translucent ones cast partial shadows.
    fn transparency(&self, gp: &GeoPoint, light: &Light, l: &Vector, n: &Vector)
        -> Tuple3D {
        let light_ray = Ray::biased(gp.point, -*l, n);
        let light_distance = light.distance_at(&gp.point);

        self.world.geometries
            .find_geo_intersections(&light_ray, light_distance)
            .iter()
            .filter(|hit| hit.point.distance(&gp.point) < light_distance)
            .fold(Tuple3D::ONE, |ktr, hit| ktr.product(&hit.geometry.material.kt))
    }

    fn global_effects(&self, gp: &GeoPoint, ray: &Ray, level: usize, k: Tuple3D)
        -> Color {
        let material = &gp.geometry.material;
        let n = gp.normal();

        self.global_effect(&Self::refracted_ray(gp, ray, &n), material.kt, level, k)
            + self.global_effect(&Self::reflected_ray(gp, ray, &n), material.kr, level, k)
    }

    /// Traces one secondary ray, weighted by coefficient `kx`.
    ///
    /// Branches whose accumulated attenuation falls under the cutoff are not
    /// traced at all.
    fn global_effect(&self, ray: &Ray, kx: Tuple3D, level: usize, k: Tuple3D)
        -> Color {
        let kkx = kx.product(&k);
        if kkx.lower_than(self.min_k) {
            return Color::black();
        }

        let color = match self.world.geometries.find_closest_intersection(ray) {
            Some(gp) => self.calc_color_at(&gp, ray, level - 1, kkx),
            None => self.world.background,
        };

        color * kx
    }

    /// The transmitted ray. It continues in the same direction; there is no
    /// bending at the surface.
    fn refracted_ray(gp: &GeoPoint, ray: &Ray, n: &Vector) -> Ray {
        Ray::biased(gp.point, ray.direction(), n)
    }

    fn reflected_ray(gp: &GeoPoint, ray: &Ray, n: &Vector) -> Ray {
        Ray::biased(gp.point, ray.direction().reflect(n), n)
    }
}

/* Tests */

#[cfg(test)]
use crate::light::{ DirectionalLight, PointLight, AmbientLight };
#[cfg(test)]
use crate::shape::Shape;
#[cfg(test)]
use crate::tuple::Point;

#[test]
fn miss_returns_background() {
    let mut world = World::empty();
    world.background = Color::rgb(0.1, 0.2, 0.3);

    let tracer = RayTracer::new(&world);
    let r = Ray::new(Point::ORIGIN, -Vector::Z);
    assert_eq!(tracer.trace_ray(&r), Color::rgb(0.1, 0.2, 0.3));
}

#[test]
fn unlit_world_shows_ambient_and_emission() {
    let mut world = World::empty();
    world.ambient_light = AmbientLight::uniform(Color::white(), 0.1);
    world.geometries.add(
        Shape::sphere(Point::new(0.0, 0.0, -3.0), 1.0).unwrap()
            .with_emission(Color::rgb(0.2, 0.3, 0.4))
    );

    let tracer = RayTracer::new(&world);
    let r = Ray::new(Point::ORIGIN, -Vector::Z);
    assert_eq!(tracer.trace_ray(&r), Color::rgb(0.3, 0.4, 0.5));
}

#[cfg(test)]
fn lit_sphere(material: Material) -> World {
    let mut world = World::empty();
    world.geometries.add(
        Shape::sphere(Point::new(0.0, 0.0, -3.0), 1.0).unwrap()
            .with_material(material)
    );
    world.lights.push(DirectionalLight::new(Color::white(), -Vector::Z).into());

    world
}

#[test]
fn diffuse_lighting() {
    let world = lit_sphere(Material { kd: Tuple3D::splat(0.5), ..Default::default() });

    let tracer = RayTracer::new(&world);
    let r = Ray::new(Point::ORIGIN, -Vector::Z);
    assert_eq!(tracer.trace_ray(&r), Color::gray(0.5));
}

#[test]
fn diffuse_and_specular_lighting() {
    let world = lit_sphere(Material {
        kd: Tuple3D::splat(0.5),
        ks: Tuple3D::splat(0.5),
        shininess: 10,
        ..Default::default()
    });

    let tracer = RayTracer::new(&world);
    let r = Ray::new(Point::ORIGIN, -Vector::Z);
    assert_eq!(tracer.trace_ray(&r), Color::white());
}

#[test]
fn oblique_light_follows_cosine_and_shininess() {
    // Light at 60 degrees to the floor normal, viewed from straight above:
    // n.l = 0.5 and the mirrored light direction gives -v.r = 0.5.
    let floor = |shininess| {
        let mut world = World::empty();
        world.geometries.add(
            Shape::plane(Point::ORIGIN, Vector::Y)
                .with_material(Material {
                    kd: Tuple3D::splat(0.5),
                    ks: Tuple3D::splat(0.5),
                    shininess,
                    ..Default::default()
                })
        );
        let l = Vector::new(0.0, -1.0, 3.0_f64.sqrt()).unwrap();
        world.lights.push(DirectionalLight::new(Color::white(), l).into());
        world
    };
    let r = Ray::new(Point::new(0.0, 5.0, 0.0), -Vector::Y);

    let world = floor(1);
    assert_eq!(RayTracer::new(&world).trace_ray(&r), Color::gray(0.5 * 0.5 + 0.5 * 0.5));

    let world = floor(2);
    assert_eq!(RayTracer::new(&world).trace_ray(&r), Color::gray(0.5 * 0.5 + 0.5 * 0.25));
}

#[test]
fn light_behind_surface_is_ignored() {
    let mut world = lit_sphere(Material { kd: Tuple3D::ONE, ..Default::default() });
    world.lights = vec![DirectionalLight::new(Color::white(), Vector::Z).into()];

    let tracer = RayTracer::new(&world);
    let r = Ray::new(Point::ORIGIN, -Vector::Z);
    assert_eq!(tracer.trace_ray(&r), Color::black());
}

#[cfg(test)]
fn shadowed_floor(occluder_kt: Tuple3D) -> World {
    let mut world = World::empty();
    world.geometries.add(
        Shape::plane(Point::ORIGIN, Vector::Y)
            .with_material(Material { kd: Tuple3D::ONE, ..Default::default() })
    );
    world.geometries.add(
        Shape::sphere(Point::new(0.0, 5.0, 0.0), 1.0).unwrap()
            .with_material(Material { kt: occluder_kt, ..Default::default() })
    );
    world.lights.push(PointLight::new(Color::white(), Point::new(0.0, 10.0, 0.0)).into());

    world
}

#[test]
fn unobstructed_floor_is_lit() {
    let mut world = shadowed_floor(Tuple3D::ZERO);
    world.lights = vec![PointLight::new(Color::white(), Point::new(0.0, 3.0, 0.0)).into()];

    let tracer = RayTracer::new(&world);
    let r = Ray::new(Point::new(0.0, 5.0, -5.0), Vector::new(0.0, -1.0, 1.0).unwrap());
    assert_eq!(tracer.trace_ray(&r), Color::white());
}

#[test]
fn opaque_occluder_casts_shadow() {
    let world = shadowed_floor(Tuple3D::ZERO);

    let tracer = RayTracer::new(&world);
    let r = Ray::new(Point::new(0.0, 5.0, -5.0), Vector::new(0.0, -1.0, 1.0).unwrap());
    assert_eq!(tracer.trace_ray(&r), Color::black());
}

#[test]
fn translucent_occluder_dims_light() {
    // The shadow ray crosses the sphere twice.
    let world = shadowed_floor(Tuple3D::splat(0.5));

    let tracer = RayTracer::new(&world);
    let r = Ray::new(Point::new(0.0, 5.0, -5.0), Vector::new(0.0, -1.0, 1.0).unwrap());
    assert_eq!(tracer.trace_ray(&r), Color::gray(0.25));
}

#[cfg(test)]
fn mirror_floor() -> World {
    let mut world = World::empty();
    world.geometries.add(
        Shape::plane(Point::ORIGIN, Vector::Y)
            .with_material(Material { kr: Tuple3D::ONE, ..Default::default() })
    );
    world.geometries.add(
        Shape::sphere(Point::new(0.0, 5.0, 5.0), 1.0).unwrap()
            .with_emission(Color::rgb(0.8, 0.0, 0.0))
    );

    world
}

#[test]
fn mirror_reflects_emitter() {
    let world = mirror_floor();

    let tracer = RayTracer::new(&world);
    let r = Ray::new(Point::new(0.0, 5.0, -5.0), Vector::new(0.0, -1.0, 1.0).unwrap());
    assert_eq!(tracer.trace_ray(&r), Color::rgb(0.8, 0.0, 0.0));
}

#[test]
fn single_level_has_no_global_effects() {
    let world = mirror_floor();

    let tracer = RayTracer::new(&world).with_limits(1, MIN_CALC_COLOR_K);
    let r = Ray::new(Point::new(0.0, 5.0, -5.0), Vector::new(0.0, -1.0, 1.0).unwrap());
    assert_eq!(tracer.trace_ray(&r), Color::black());
}

#[test]
fn negligible_branch_is_pruned() {
    let world = mirror_floor();
    let tracer = RayTracer::new(&world);

    // Aimed straight at the emitter, but with almost no weight left.
    let r = Ray::new(Point::new(0.0, 5.0, 0.0), Vector::Z);
    let tiny = Tuple3D::splat(MIN_CALC_COLOR_K / 10.0);
    assert_eq!(tracer.global_effect(&r, Tuple3D::ONE, 5, tiny), Color::black());
    assert_eq!(tracer.global_effect(&r, Tuple3D::ONE, 5, Tuple3D::ONE),
        Color::rgb(0.8, 0.0, 0.0));
}

#[test]
fn transparent_sphere_passes_light_straight_through() {
    let mut world = World::empty();
    world.geometries.add(
        Shape::sphere(Point::new(0.0, 0.0, -3.0), 1.0).unwrap()
            .with_material(Material { kt: Tuple3D::splat(0.5), ..Default::default() })
    );
    world.geometries.add(
        Shape::plane(Point::new(0.0, 0.0, -10.0), Vector::Z)
            .with_emission(Color::blue())
    );

    // Entering and leaving the sphere each halve the light.
    let tracer = RayTracer::new(&world);
    let r = Ray::new(Point::ORIGIN, -Vector::Z);
    assert_eq!(tracer.trace_ray(&r), Color::rgb(0.0, 0.0, 0.25));
}

#[test]
fn bundle_is_averaged() {
    let mut world = World::empty();
    world.background = Color::white();
    world.geometries.add(
        Shape::sphere(Point::new(0.0, 0.0, -3.0), 1.0).unwrap()
    );

    let tracer = RayTracer::new(&world);
    let rays = [
        Ray::new(Point::ORIGIN, -Vector::Z),
        Ray::new(Point::ORIGIN, Vector::Z),
    ];
    assert_eq!(tracer.trace_rays(&rays), Color::gray(0.5));
    assert_eq!(tracer.trace_rays(&[]), Color::black());
}
