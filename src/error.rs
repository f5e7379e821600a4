use std::io;

use thiserror::Error;

/// Errors raised while constructing algebra values or primitives.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum GeometryError {
    #[error("vector must not be the zero vector")]
    ZeroVector,

    #[error("points must be distinct")]
    CoincidentPoints,

    #[error("points must not lie on a single line")]
    CollinearPoints,

    #[error("a polygon needs at least 3 vertices, got {0}")]
    TooFewVertices(usize),

    #[error("all polygon vertices must lie in the same plane")]
    NonCoplanarVertices,

    #[error("polygon vertices must form a convex polygon in a consistent order")]
    NonConvexPolygon,

    #[error("radius must be positive, got {0}")]
    NonPositiveRadius(f64),

    #[error("height must be positive, got {0}")]
    NonPositiveHeight(f64),
}

/// Errors raised by `CameraBuilder::build`.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum CameraError {
    #[error("camera is missing its {0}")]
    Missing(&'static str),

    #[error("camera `up` and `to` vectors must be orthogonal")]
    NotOrthogonal,

    #[error("camera {what} must be positive, got {value}")]
    NonPositive { what: &'static str, value: f64 },

    #[error("anti-aliasing factor must be at least 1")]
    ZeroAntiAliasing,

    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

/// Errors raised while loading a scene description.
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("failed to read scene description")]
    Io(#[from] io::Error),

    #[error("malformed scene description")]
    Json(#[from] serde_json::Error),

    #[error("invalid geometry in scene description")]
    Geometry(#[from] GeometryError),

    #[error("invalid camera in scene description")]
    Camera(#[from] CameraError),
}

/// Errors raised by a render job.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum RenderError {
    #[error("a render worker panicked")]
    WorkerPanicked,

    #[error("render was cancelled before every pixel was traced")]
    Cancelled,
}
