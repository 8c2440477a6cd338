use crate::{
    angle::{gon_to_rad, rad_to_gon},
    constants::CC_PER_GON,
};
use num_traits::{Float, FloatConst};

/// Returns `vertical_gon` corrected for the deflection of the vertical
/// at the station.
///
/// # Parameters
///
/// - `xi_cc`: north-south deflection component (cc, 0.1 mgon)
/// - `eta_cc`: east-west deflection component (cc, 0.1 mgon)
/// - `azimuth_gon`: azimuth of the sight (gon)
/// - `vertical_gon`: observed vertical angle (gon)
pub fn deflection_correction<T>(xi_cc: T, eta_cc: T, azimuth_gon: T, vertical_gon: T) -> T
where
    T: Float + FloatConst,
{
    let cc_per_gon = T::from(CC_PER_GON).unwrap();
    let xi = gon_to_rad(xi_cc / cc_per_gon);
    let eta = gon_to_rad(eta_cc / cc_per_gon);
    let (sin_az, cos_az) = gon_to_rad(azimuth_gon).sin_cos();
    // Deflection component along the line of sight.
    let theta = xi * cos_az + eta * sin_az;
    rad_to_gon(gon_to_rad(vertical_gon) + theta)
}

/// Applies [`deflection_correction`] to every angle in `vertical_gon`.
pub fn deflection_correction_batch<T>(
    xi_cc: T,
    eta_cc: T,
    azimuth_gon: T,
    vertical_gon: &[T],
) -> Vec<T>
where
    T: Float + FloatConst,
{
    vertical_gon
        .iter()
        .map(|&v| deflection_correction(xi_cc, eta_cc, azimuth_gon, v))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{deflection_correction, deflection_correction_batch};
    use approx::assert_relative_eq;

    #[test]
    fn test_no_deflection() {
        assert_relative_eq!(deflection_correction(0.0, 0.0, 123.4, 98.765_43), 98.765_43);
    }

    #[test]
    fn test_xi_along_north() {
        // 25cc of xi looking due north is a 0.0025 gon tilt.
        let v = deflection_correction(25.0, -40.0, 0.0, 100.0);
        assert_relative_eq!(v, 100.0025, epsilon = 1e-12);
    }

    #[test]
    fn test_eta_along_east() {
        let v = deflection_correction(25.0, -40.0, 100.0, 100.0);
        assert_relative_eq!(v, 99.996, epsilon = 1e-12);
    }

    #[test]
    fn test_opposite_sights_cancel() {
        let forward = deflection_correction(12.0, 7.0, 37.5, 99.9);
        let backward = deflection_correction(12.0, 7.0, 237.5, 100.1);
        assert_relative_eq!(forward + backward, 200.0, epsilon = 1e-12);
    }

    #[test]
    fn test_batch_matches_scalar() {
        let angles = [99.1, 100.0, 100.9];
        let batch = deflection_correction_batch(3.0, -8.0, 310.0, &angles);
        assert_eq!(batch.len(), angles.len());
        for (corrected, raw) in batch.iter().zip(angles) {
            assert_eq!(*corrected, deflection_correction(3.0, -8.0, 310.0, raw));
        }
    }
}
