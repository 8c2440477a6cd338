use crate::angle::{gon_to_rad, rad_to_gon};
use num_traits::{Float, FloatConst};

/// Largest amount by which a cosine may overshoot `[-1, 1]` and still
/// be treated as rounding noise.
const COS_ROUNDING_SLACK: f64 = 1e-12;

/// Reduces a slant distance and vertical angle measured to an offset
/// prism mount onto the tilting axis of the far instrument.
///
/// The measured distance, the mount offset and the corrected distance
/// form a triangle. Returns `(slant_m, vertical_gon)` where the
/// corrected distance follows from the law of cosines and the vertical
/// angle is increased by the angle between measured and corrected
/// distance.
///
/// A triangle that cannot be closed yields NaN in both values.
pub fn prism_mount_correction<T>(slant_m: T, offset_m: T, vertical_gon: T) -> (T, T)
where
    T: Float + FloatConst,
{
    let two = T::one() + T::one();
    let vertical = gon_to_rad(vertical_gon);
    let corrected_m = (offset_m.powi(2) + slant_m.powi(2)
        - two * offset_m * slant_m * vertical.cos())
    .sqrt();
    let cos_beta = (slant_m.powi(2) + corrected_m.powi(2) - offset_m.powi(2))
        / (two * slant_m * corrected_m);
    let beta = clamp_rounding(cos_beta).acos();
    (corrected_m, rad_to_gon(vertical + beta))
}

/// Applies [`prism_mount_correction`] to every `(slant_m,
/// vertical_gon)` pair.
pub fn prism_mount_correction_batch<T>(
    slant_m: &[T],
    offset_m: T,
    vertical_gon: &[T],
) -> Vec<(T, T)>
where
    T: Float + FloatConst,
{
    debug_assert_eq!(slant_m.len(), vertical_gon.len());
    slant_m
        .iter()
        .zip(vertical_gon)
        .map(|(&d, &v)| prism_mount_correction(d, offset_m, v))
        .collect()
}

fn clamp_rounding<T: Float>(cos: T) -> T {
    let slack = T::from(COS_ROUNDING_SLACK).unwrap();
    if cos > T::one() && cos <= T::one() + slack {
        T::one()
    } else if cos < -T::one() && cos >= -T::one() - slack {
        -T::one()
    } else {
        cos
    }
}
