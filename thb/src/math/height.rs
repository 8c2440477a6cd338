use crate::angle::gon_to_rad;
use num_traits::{Float, FloatConst};

/// Returns the magnitude of the height difference (meters) between
/// stations A and B from a reciprocal observation.
///
/// # Parameters
///
/// - `mean_slant_m`: mean of the corrected slant distances (meters)
/// - `vertical_ab_gon`: corrected vertical angle observed at A towards B (gon)
/// - `vertical_ba_gon`: corrected vertical angle observed at B towards A (gon)
/// - `instrument_a_m`, `instrument_b_m`: instrument heights (meters)
/// - `signal_a_m`, `signal_b_m`: signal heights (meters)
///
/// Only the magnitude is returned; direction follows from which
/// station is A.
pub fn height_difference<T>(
    mean_slant_m: T,
    vertical_ab_gon: T,
    vertical_ba_gon: T,
    instrument_a_m: T,
    instrument_b_m: T,
    signal_a_m: T,
    signal_b_m: T,
) -> T
where
    T: Float + FloatConst,
{
    let half = T::one() / (T::one() + T::one());
    let ab = gon_to_rad(vertical_ab_gon);
    let ba = gon_to_rad(vertical_ba_gon);
    let sight = mean_slant_m * ((T::FRAC_PI_2() - ab).sin() - (T::FRAC_PI_2() - ba).sin());
    let delta_h =
        half * (sight + (instrument_a_m - instrument_b_m) + (signal_a_m - signal_b_m));
    delta_h.abs()
}

#[cfg(test)]
mod tests {
    use super::height_difference;
    use approx::assert_relative_eq;

    #[test]
    fn test_flat_sight() {
        let dh = height_difference(500.0, 100.0, 100.0, 1.5, 1.5, 1.6, 1.6);
        assert_relative_eq!(dh, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_flat_sight_unequal_heights() {
        let dh = height_difference(500.0, 100.0, 100.0, 1.45, 1.5, 1.6, 1.7);
        assert_relative_eq!(dh, 0.075, epsilon = 1e-12);
    }

    #[test]
    fn test_inclined_sight() {
        // 2 gon elevation at A, 2 gon depression at B.
        let d = 1000.0;
        let dh = height_difference(d, 98.0, 102.0, 0.0, 0.0, 0.0, 0.0);
        let expected = d * (2.0_f64 * std::f64::consts::PI / 200.0).sin();
        assert_relative_eq!(dh, expected, epsilon = 1e-9);
    }

    #[test]
    fn test_symmetric_under_station_swap() {
        let forward = height_difference(731.2, 99.123, 100.889, 1.41, 1.52, 1.63, 1.74);
        let swapped = height_difference(731.2, 100.889, 99.123, 1.52, 1.41, 1.74, 1.63);
        assert_relative_eq!(forward, swapped, epsilon = 1e-12);
        assert!(forward > 0.0);
    }
}
