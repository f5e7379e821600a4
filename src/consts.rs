// Floating point comparisons
pub const EPSILON: f64 = 1e-10;
pub const COLOR_EPSILON: f64 = 0.002;

// Offset applied to secondary ray origins along the surface normal
pub const DELTA: f64 = 0.1;

// Recursion limits for global effects
pub const MAX_CALC_COLOR_LEVEL: usize = 10;
pub const MIN_CALC_COLOR_K: f64 = 0.001;

// Runtime defaults
pub const DEFAULT_THREADS: usize = 0;
pub const DEFAULT_PROGRESS_INTERVAL: f64 = 10.0;
pub const OUT_FILE: &str = "./out.ppm";
