//! Shared geodetic and rasterization constants.

/// Meters per degree of latitude (nearly constant across the globe).
pub const METERS_PER_DEGREE: f64 = 111_320.0;

/// Map rasterization canvas scale (pixels per meter).
pub const CANVAS_PIXELS_PER_METER: f64 = 1.0;
