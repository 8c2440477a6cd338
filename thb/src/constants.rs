/// Mean earth radius (meters) used for refraction and curvature terms.
pub const MEAN_EARTH_RADIUS: f64 = 6_370_000.0;

/// Full circle in gon.
pub const FULL_CIRCLE_GON: f64 = 400.0;

/// cc (0.1 mgon) per gon.
pub const CC_PER_GON: f64 = 10_000.0;
