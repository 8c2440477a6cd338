//! NaN-aware summary statistics over corrected shots.

use crate::{
    records::Face,
    shot::{CorrectedShot, ShotFace},
};
use serde::Serialize;

/// Mean and sample standard deviation of a population.
///
/// NaN samples are skipped. With no samples both values are NaN, with
/// a single sample the standard deviation is NaN.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Summary {
    pub mean: f64,
    pub std: f64,
}

impl Summary {
    pub fn of<I>(samples: I) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        let samples: Vec<f64> = samples.into_iter().filter(|v| !v.is_nan()).collect();
        let n = samples.len();
        if n == 0 {
            return Self {
                mean: f64::NAN,
                std: f64::NAN,
            };
        }
        #[allow(clippy::cast_precision_loss)]
        let mean = samples.iter().sum::<f64>() / n as f64;
        let std = if n < 2 {
            f64::NAN
        } else {
            #[allow(clippy::cast_precision_loss)]
            let var = samples.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
            var.sqrt()
        };
        Self { mean, std }
    }
}

/// Statistics of one quantity, over all shots and split by face.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QuantityStats {
    pub overall: Summary,
    pub face_one: Summary,
    pub face_two: Summary,
}

impl QuantityStats {
    /// Summarises `quantity` over `shots`.
    ///
    /// Shots whose face is unavailable or mismatched only count
    /// towards `overall`.
    pub fn of<F>(shots: &[CorrectedShot], quantity: F) -> Self
    where
        F: Fn(&CorrectedShot) -> f64,
    {
        let on_face = |face: Face| {
            Summary::of(
                shots
                    .iter()
                    .filter(|shot| shot.face == ShotFace::Known(face))
                    .map(&quantity),
            )
        };
        Self {
            overall: Summary::of(shots.iter().map(&quantity)),
            face_one: on_face(Face::One),
            face_two: on_face(Face::Two),
        }
    }
}

/// Statistics for one visur.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SummaryStatistics {
    /// Height difference from the reference elevations of both points
    /// (meters, magnitude).
    pub approx_height_diff_m: f64,
    pub height_diff_m: QuantityStats,
    pub refraction: QuantityStats,
    pub mean_slant_m: QuantityStats,
}

impl SummaryStatistics {
    pub fn new(shots: &[CorrectedShot], approx_height_diff_m: f64) -> Self {
        Self {
            approx_height_diff_m,
            height_diff_m: QuantityStats::of(shots, |shot| shot.height_diff_m),
            refraction: QuantityStats::of(shots, |shot| shot.refraction),
            mean_slant_m: QuantityStats::of(shots, |shot| shot.mean_slant_m),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{QuantityStats, Summary};
    use crate::{
        records::Face,
        shot::{CorrectedShot, ShotFace},
    };
    use approx::assert_relative_eq;

    fn shot(face: ShotFace, height_diff_m: f64) -> CorrectedShot {
        CorrectedShot {
            id: String::new(),
            face,
            slant_ab_m: f64::NAN,
            slant_ba_m: f64::NAN,
            mean_slant_m: f64::NAN,
            vertical_ab_gon: f64::NAN,
            vertical_ba_gon: f64::NAN,
            height_diff_m,
            refraction: f64::NAN,
        }
    }

    #[test]
    fn test_summary() {
        let s = Summary::of([2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert_relative_eq!(s.mean, 5.0);
        assert_relative_eq!(s.std, (32.0_f64 / 7.0).sqrt());
    }

    #[test]
    fn test_summary_skips_nan() {
        let s = Summary::of([1.0, f64::NAN, 3.0]);
        assert_relative_eq!(s.mean, 2.0);
        assert_relative_eq!(s.std, 2.0_f64.sqrt());
    }

    #[test]
    fn test_summary_degenerate() {
        let empty = Summary::of([]);
        assert!(empty.mean.is_nan() && empty.std.is_nan());
        let all_nan = Summary::of([f64::NAN, f64::NAN]);
        assert!(all_nan.mean.is_nan() && all_nan.std.is_nan());
        let single = Summary::of([3.5]);
        assert_eq!(single.mean, 3.5);
        assert!(single.std.is_nan());
    }

    #[test]
    fn test_per_face_split() {
        let shots = [
            shot(ShotFace::Known(Face::One), 10.0),
            shot(ShotFace::Known(Face::One), 12.0),
            shot(ShotFace::Mismatch, 100.0),
            shot(ShotFace::Unavailable, 20.0),
        ];
        let stats = QuantityStats::of(&shots, |s| s.height_diff_m);
        assert_relative_eq!(stats.overall.mean, 35.5);
        assert_relative_eq!(stats.face_one.mean, 11.0);
        assert_relative_eq!(stats.face_one.std, 2.0_f64.sqrt());
        // No face-two shots at all.
        assert!(stats.face_two.mean.is_nan());
        assert!(stats.face_two.std.is_nan());
    }
}
