//! A-priori accuracy estimate of a reciprocal height determination.

use crate::{angle::gon_to_rad, constants::MEAN_EARTH_RADIUS};
use serde::Serialize;
use std::f64::consts::{PI, SQRT_2};

/// Instrument and setup accuracies the preanalysis is based on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PreanalysisConfig {
    /// Constant part of the distance accuracy (mm).
    pub distance_mm: f64,

    /// Distance dependent part of the distance accuracy (ppm).
    pub distance_ppm: f64,

    /// Zenith angle accuracy (mgon).
    pub zenith_mgon: f64,

    /// Uncertainty of the refraction coefficient.
    pub refraction: f64,

    /// Instrument height accuracy (mm).
    pub instrument_height_mm: f64,

    /// Signal height accuracy (mm).
    pub signal_height_mm: f64,
}

impl Default for PreanalysisConfig {
    fn default() -> Self {
        Self {
            distance_mm: 0.6,
            distance_ppm: 1.0,
            zenith_mgon: 0.15,
            refraction: 0.06,
            instrument_height_mm: 1.0,
            signal_height_mm: 1.0,
        }
    }
}

/// Error budget of one sight, all components in millimeters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Preanalysis {
    pub distance_mm: f64,
    pub zenith_mm: f64,
    pub refraction_mm: f64,
    pub instrument_height_mm: f64,
    pub signal_height_mm: f64,
}

impl Preanalysis {
    /// Builds the budget for a sight of `slant_m` meters at vertical
    /// angle `vertical_gon`.
    pub fn new(slant_m: f64, vertical_gon: f64, config: &PreanalysisConfig) -> Self {
        let (sin_v, cos_v) = gon_to_rad(vertical_gon).sin_cos();
        let slant_mm = slant_m * 1000.0;
        let horizontal_m = slant_m * sin_v;
        Self {
            distance_mm: cos_v * (config.distance_mm + slant_mm * config.distance_ppm / 1e6),
            zenith_mm: sin_v * slant_mm * (config.zenith_mgon / 1000.0) / 200.0 * PI,
            refraction_mm: -(horizontal_m.powi(2) / (2.0 * MEAN_EARTH_RADIUS))
                * config.refraction
                * 1000.0,
            instrument_height_mm: config.instrument_height_mm,
            signal_height_mm: config.signal_height_mm,
        }
    }

    /// Expected 1σ accuracy of the height difference (mm).
    ///
    /// The refraction component cancels in simultaneous reciprocal
    /// observations and is left out.
    pub fn accuracy_mm(&self) -> f64 {
        (self.distance_mm.powi(2)
            + self.zenith_mm.powi(2)
            + self.instrument_height_mm.powi(2)
            + self.signal_height_mm.powi(2))
        .sqrt()
            / SQRT_2
    }

    /// Components in report order: distance, zenith angle, refraction,
    /// instrument height, signal height.
    pub fn components(&self) -> [f64; 5] {
        [
            self.distance_mm,
            self.zenith_mm,
            self.refraction_mm,
            self.instrument_height_mm,
            self.signal_height_mm,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::{Preanalysis, PreanalysisConfig};
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    #[test]
    fn test_horizontal_sight() {
        let p = Preanalysis::new(1000.0, 100.0, &PreanalysisConfig::default());
        // cos(100 gon) vanishes.
        assert_relative_eq!(p.distance_mm, 0.0, epsilon = 1e-12);
        // 0.15 mgon over 1 km.
        assert_relative_eq!(p.zenith_mm, 1e6 * 0.15e-3 / 200.0 * PI, epsilon = 1e-12);
        assert_relative_eq!(p.refraction_mm, -1e6 / 12_740_000.0 * 60.0, epsilon = 1e-9);
        assert_eq!(p.instrument_height_mm, 1.0);
        assert_eq!(p.signal_height_mm, 1.0);
    }

    #[test]
    fn test_accuracy_excludes_refraction() {
        let p = Preanalysis {
            distance_mm: 3.0,
            zenith_mm: 4.0,
            refraction_mm: -1000.0,
            instrument_height_mm: 0.0,
            signal_height_mm: 0.0,
        };
        assert_relative_eq!(p.accuracy_mm(), 5.0 / 2.0_f64.sqrt());
    }

    #[test]
    fn test_inclined_sight() {
        let p = Preanalysis::new(500.0, 90.0, &PreanalysisConfig::default());
        let v = 90.0 * PI / 200.0;
        assert_relative_eq!(p.distance_mm, v.cos() * (0.6 + 0.5), epsilon = 1e-12);
        assert_relative_eq!(p.zenith_mm, v.sin() * 500_000.0 * 0.15e-3 / 200.0 * PI, epsilon = 1e-12);
        let expected = (p.distance_mm.powi(2) + p.zenith_mm.powi(2) + 2.0).sqrt() / 2.0_f64.sqrt();
        assert_relative_eq!(p.accuracy_mm(), expected);
        assert_eq!(p.components()[2], p.refraction_mm);
    }

    #[test]
    fn test_configured_heights() {
        let config = PreanalysisConfig {
            instrument_height_mm: 0.5,
            signal_height_mm: 2.0,
            ..PreanalysisConfig::default()
        };
        let p = Preanalysis::new(200.0, 100.0, &config);
        assert_eq!(p.instrument_height_mm, 0.5);
        assert_eq!(p.signal_height_mm, 2.0);
    }
}
