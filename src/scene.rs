use std::fs;
use std::path::Path;

use log::{ debug, info };
use serde::{ Serialize, Deserialize };

use crate::camera::Camera;
use crate::canvas::Canvas;
use crate::color::Color;
use crate::error::{ GeometryError, RenderError, SceneError };
use crate::light::{ AmbientLight, DirectionalLight, Light, Material, PointLight, SpotLight };
use crate::ray::Ray;
use crate::shape::Shape;
use crate::tuple::{ Point, Tuple3D, Vector };
use crate::world::World;

/// Everything needed to render an image: a world, a camera and the
/// resolution of the image.
#[derive(Clone, Debug)]
pub struct Scene {
    pub world: World,
    pub camera: Camera,
    pub width: usize,
    pub height: usize,
}

impl Scene {
    /// Reads and converts a JSON scene description.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Scene, SceneError> {
        let path = path.as_ref();
        info!("loading scene from {}", path.display());

        let contents = fs::read_to_string(path)?;
        Scene::from_json_str(&contents)
    }

    /// Converts a JSON scene description held in a string.
    pub fn from_json_str(json: &str) -> Result<Scene, SceneError> {
        let scene_json: SceneJson = serde_json::from_str(json)?;
        Scene::try_from(scene_json)
    }

    /// Renders the scene onto a fresh canvas of the scene's resolution.
    pub fn render(&self) -> Result<Canvas, RenderError> {
        let mut canvas = Canvas::new(self.width, self.height);
        self.camera.render(&self.world, &mut canvas)?;

        Ok(canvas)
    }
}

impl TryFrom<SceneJson> for Scene {
    type Error = SceneError;

    fn try_from(scene_json: SceneJson) -> Result<Scene, SceneError> {
        let camera = scene_json.camera.into_camera()?;

        let mut world = match scene_json.name {
            Some(name) => World::named(&name),
            None => World::empty(),
        };

        if let Some(background) = scene_json.background {
            world.background = background.into();
        }

        if let Some(ambient) = scene_json.ambient {
            world.ambient_light = AmbientLight::new(ambient.color.into(), ambient.ka.into());
        }

        for light_json in scene_json.lights {
            world.lights.push(Light::try_from(light_json)?);
        }

        for geometry_json in scene_json.geometries {
            let shape = Shape::try_from(geometry_json)?;
            debug!("adding {:?}", shape.ty);
            world.geometries.add(shape);
        }

        info!("loaded scene {:?}: {} geometries, {} lights, {}x{} pixels",
            world.name, world.geometries.len(), world.lights.len(),
            scene_json.width, scene_json.height);

        Ok(Scene {
            world,
            camera,
            width: scene_json.width,
            height: scene_json.height,
        })
    }
}

fn vector(v: [f64; 3]) -> Result<Vector, GeometryError> {
    Vector::new(v[0], v[1], v[2])
}

#[derive(Serialize, Deserialize)]
pub struct SceneJson {
    #[serde(default)]
    name: Option<String>,

    width: usize,
    height: usize,
    camera: CameraJson,

    #[serde(default)]
    background: Option<[f64; 3]>,
    #[serde(default)]
    ambient: Option<AmbientJson>,

    #[serde(default)]
    lights: Vec<LightJson>,
    #[serde(default)]
    geometries: Vec<GeometryJson>,
}

#[derive(Clone, Serialize, Deserialize)]
struct CameraJson {
    location: [f64; 3],
    to: [f64; 3],
    up: [f64; 3],
    vp_width: f64,
    vp_height: f64,
    vp_distance: f64,

    #[serde(default)]
    anti_aliasing: Option<usize>,
    #[serde(default)]
    adaptive: Option<bool>,
    #[serde(default)]
    threads: Option<usize>,
    #[serde(default)]
    progress_interval: Option<f64>,
}

impl CameraJson {
    fn into_camera(self) -> Result<Camera, SceneError> {
        let mut builder = Camera::builder()
            .location(self.location.into())
            .direction(vector(self.to)?, vector(self.up)?)
            .vp_size(self.vp_width, self.vp_height)
            .vp_distance(self.vp_distance);

        if let Some(anti_aliasing) = self.anti_aliasing {
            builder = builder.anti_aliasing(anti_aliasing);
        }
        if let Some(adaptive) = self.adaptive {
            builder = builder.adaptive(adaptive);
        }
        if let Some(threads) = self.threads {
            builder = builder.threads(threads);
        }
        if let Some(progress_interval) = self.progress_interval {
            builder = builder.progress_interval(progress_interval);
        }

        Ok(builder.build()?)
    }
}

/// A coefficient given either once for all channels or per channel.
#[derive(Clone, Copy, Serialize, Deserialize)]
#[serde(untagged)]
enum CoefficientJson {
    Uniform(f64),
    PerChannel([f64; 3]),
}

impl Default for CoefficientJson {
    fn default() -> CoefficientJson {
        CoefficientJson::Uniform(0.0)
    }
}

impl From<CoefficientJson> for Tuple3D {
    fn from(k: CoefficientJson) -> Tuple3D {
        match k {
            CoefficientJson::Uniform(k) => Tuple3D::splat(k),
            CoefficientJson::PerChannel(k) => k.into(),
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
struct AmbientJson {
    color: [f64; 3],
    ka: CoefficientJson,
}

fn one() -> f64 {
    1.0
}

fn one_i32() -> i32 {
    1
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum LightJson {
    Directional {
        intensity: [f64; 3],
        direction: [f64; 3],
    },
    Point {
        intensity: [f64; 3],
        position: [f64; 3],
        #[serde(default = "one")]
        kc: f64,
        #[serde(default)]
        kl: f64,
        #[serde(default)]
        kq: f64,
    },
    Spot {
        intensity: [f64; 3],
        position: [f64; 3],
        direction: [f64; 3],
        #[serde(default = "one")]
        kc: f64,
        #[serde(default)]
        kl: f64,
        #[serde(default)]
        kq: f64,
        #[serde(default = "one_i32")]
        narrowness: i32,
    },
}

impl TryFrom<LightJson> for Light {
    type Error = GeometryError;

    fn try_from(light_json: LightJson) -> Result<Light, GeometryError> {
        let light = match light_json {
            LightJson::Directional { intensity, direction } =>
                DirectionalLight::new(intensity.into(), vector(direction)?).into(),
            LightJson::Point { intensity, position, kc, kl, kq } =>
                PointLight::new(intensity.into(), position.into())
                    .with_attenuation(kc, kl, kq)
                    .into(),
            LightJson::Spot { intensity, position, direction, kc, kl, kq, narrowness } =>
                SpotLight::new(intensity.into(), position.into(), vector(direction)?)
                    .with_attenuation(kc, kl, kq)
                    .with_narrowness(narrowness)
                    .into(),
        };

        Ok(light)
    }
}

#[derive(Clone, Default, Serialize, Deserialize)]
struct MaterialJson {
    #[serde(default)]
    kd: CoefficientJson,
    #[serde(default)]
    ks: CoefficientJson,
    #[serde(default)]
    kt: CoefficientJson,
    #[serde(default)]
    kr: CoefficientJson,
    #[serde(default)]
    shininess: i32,
}

impl From<MaterialJson> for Material {
    fn from(m: MaterialJson) -> Material {
        Material {
            kd: m.kd.into(),
            ks: m.ks.into(),
            kt: m.kt.into(),
            kr: m.kr.into(),
            shininess: m.shininess,
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ShapeJson {
    Sphere {
        center: [f64; 3],
        radius: f64,
    },
    Plane {
        point: [f64; 3],
        normal: [f64; 3],
    },
    Triangle {
        vertices: [[f64; 3]; 3],
    },
    Polygon {
        vertices: Vec<[f64; 3]>,
    },
    Tube {
        origin: [f64; 3],
        direction: [f64; 3],
        radius: f64,
    },
    Cylinder {
        origin: [f64; 3],
        direction: [f64; 3],
        radius: f64,
        height: f64,
    },
}

#[derive(Clone, Serialize, Deserialize)]
struct GeometryJson {
    #[serde(flatten)]
    shape: ShapeJson,

    #[serde(default)]
    emission: Option<[f64; 3]>,
    #[serde(default)]
    material: MaterialJson,
}

impl TryFrom<GeometryJson> for Shape {
    type Error = GeometryError;

    fn try_from(geometry_json: GeometryJson) -> Result<Shape, GeometryError> {
        let shape = match geometry_json.shape {
            ShapeJson::Sphere { center, radius } =>
                Shape::sphere(center.into(), radius)?,
            ShapeJson::Plane { point, normal } =>
                Shape::plane(point.into(), vector(normal)?),
            ShapeJson::Triangle { vertices: [a, b, c] } =>
                Shape::triangle(a.into(), b.into(), c.into())?,
            ShapeJson::Polygon { vertices } =>
                Shape::polygon(vertices.into_iter().map(Point::from).collect())?,
            ShapeJson::Tube { origin, direction, radius } =>
                Shape::tube(Ray::new(origin.into(), vector(direction)?), radius)?,
            ShapeJson::Cylinder { origin, direction, radius, height } =>
                Shape::cylinder(Ray::new(origin.into(), vector(direction)?), radius, height)?,
        };

        let emission = geometry_json.emission.map_or(Color::black(), Color::from);
        Ok(shape
            .with_material(geometry_json.material.into())
            .with_emission(emission))
    }
}

/* Tests */

#[cfg(test)]
use crate::error::CameraError;

#[cfg(test)]
const CAMERA_JSON: &str = r#"{
    "location": [0, 0, 0],
    "to": [0, 0, -1],
    "up": [0, 1, 0],
    "vp_width": 2,
    "vp_height": 2,
    "vp_distance": 1
}"#;

#[test]
fn scene_with_every_kind_of_object() {
    let json = format!(r#"{{
        "name": "everything",
        "width": 4,
        "height": 3,
        "camera": {},
        "background": [0.1, 0.2, 0.3],
        "ambient": {{ "color": [1, 1, 1], "ka": 0.1 }},
        "lights": [
            {{ "type": "directional", "intensity": [1, 1, 1], "direction": [0, -1, 0] }},
            {{ "type": "point", "intensity": [1, 1, 1], "position": [0, 5, 0], "kl": 0.01 }},
            {{ "type": "spot", "intensity": [1, 1, 1], "position": [0, 5, 0],
               "direction": [0, -1, 0], "narrowness": 4 }}
        ],
        "geometries": [
            {{ "type": "sphere", "center": [0, 0, -5], "radius": 1,
               "material": {{ "kd": 0.5, "ks": [0.1, 0.2, 0.3], "shininess": 30 }} }},
            {{ "type": "plane", "point": [0, -1, 0], "normal": [0, 1, 0],
               "emission": [0.2, 0, 0] }},
            {{ "type": "triangle", "vertices": [[0, 0, -3], [1, 0, -3], [0, 1, -3]] }},
            {{ "type": "polygon", "vertices": [[0, 0, -4], [1, 0, -4], [1, 1, -4], [0, 1, -4]] }},
            {{ "type": "tube", "origin": [3, 0, 0], "direction": [0, 1, 0], "radius": 0.5 }},
            {{ "type": "cylinder", "origin": [-3, 0, 0], "direction": [0, 1, 0],
               "radius": 0.5, "height": 2 }}
        ]
    }}"#, CAMERA_JSON);

    let scene = Scene::from_json_str(&json).unwrap();

    assert_eq!((scene.width, scene.height), (4, 3));
    assert_eq!(scene.world.name, "everything");
    assert_eq!(scene.world.background, Color::rgb(0.1, 0.2, 0.3));
    assert_eq!(scene.world.ambient_light.intensity, Color::gray(0.1));
    assert_eq!(scene.world.lights.len(), 3);
    assert_eq!(scene.world.geometries.len(), 6);
    assert_eq!(scene.camera.v_right(), Vector::X);

    let sphere = scene.world.geometries.iter().next().unwrap();
    assert_eq!(sphere.material, Material {
        kd: Tuple3D::splat(0.5),
        ks: Tuple3D::new(0.1, 0.2, 0.3),
        shininess: 30,
        ..Default::default()
    });

    let plane = scene.world.geometries.iter().nth(1).unwrap();
    assert_eq!(plane.emission, Color::rgb(0.2, 0.0, 0.0));
    assert_eq!(plane.material, Material::default());

    assert_eq!(scene.world.lights[1], Light::from(
        PointLight::new(Color::white(), Point::new(0.0, 5.0, 0.0))
            .with_attenuation(1.0, 0.01, 0.0)));
}

#[test]
fn scene_defaults() {
    let json = format!(r#"{{ "width": 2, "height": 2, "camera": {} }}"#, CAMERA_JSON);
    let scene = Scene::from_json_str(&json).unwrap();

    assert_eq!(scene.world, World::empty());
    assert_eq!(scene.camera.anti_aliasing(), 1);
    assert!(!scene.camera.is_adaptive());
}

#[test]
fn scene_with_bad_geometry() {
    let json = format!(r#"{{
        "width": 2, "height": 2, "camera": {},
        "geometries": [ {{ "type": "polygon", "vertices": [[0, 0, 0], [1, 0, 0]] }} ]
    }}"#, CAMERA_JSON);

    assert!(matches!(Scene::from_json_str(&json),
        Err(SceneError::Geometry(GeometryError::TooFewVertices(2)))));

    let json = format!(r#"{{
        "width": 2, "height": 2, "camera": {},
        "geometries": [ {{ "type": "sphere", "center": [0, 0, 0], "radius": -1 }} ]
    }}"#, CAMERA_JSON);

    assert!(matches!(Scene::from_json_str(&json),
        Err(SceneError::Geometry(GeometryError::NonPositiveRadius(_)))));
}

#[test]
fn scene_with_bad_camera() {
    let json = r#"{
        "width": 2, "height": 2,
        "camera": {
            "location": [0, 0, 0], "to": [0, 0, -1], "up": [0, 1, 1],
            "vp_width": 2, "vp_height": 2, "vp_distance": 1
        }
    }"#;

    assert!(matches!(Scene::from_json_str(json),
        Err(SceneError::Camera(CameraError::NotOrthogonal))));
}

#[test]
fn malformed_scene() {
    assert!(matches!(Scene::from_json_str("{ \"width\": 2 }"), Err(SceneError::Json(_))));

    let json = format!(r#"{{
        "width": 2, "height": 2, "camera": {},
        "geometries": [ {{ "type": "cone" }} ]
    }}"#, CAMERA_JSON);
    assert!(matches!(Scene::from_json_str(&json), Err(SceneError::Json(_))));
}

#[test]
fn bundled_scene_loads() {
    let scene = Scene::from_json_str(include_str!("../scenes/spheres.json")).unwrap();

    assert!(!scene.world.geometries.is_empty());
    assert!(!scene.world.lights.is_empty());
}
