use crate::{angle::gon_to_rad, constants::MEAN_EARTH_RADIUS};
use num_traits::{Float, FloatConst};

/// Returns the refraction coefficient `k` of a reciprocal sight.
///
/// `vertical_ab_gon` and `vertical_ba_gon` are the corrected vertical
/// angles at both ends, `mean_slant_m` the mean slant distance.
///
/// Not guarded: a sight at zenith or nadir (`sin(vertical_ab) = 0`)
/// returns an infinite or NaN value.
pub fn refraction_coefficient<T>(mean_slant_m: T, vertical_ab_gon: T, vertical_ba_gon: T) -> T
where
    T: Float + FloatConst,
{
    let earth_radius = T::from(MEAN_EARTH_RADIUS).unwrap();
    let ab = gon_to_rad(vertical_ab_gon);
    let ba = gon_to_rad(vertical_ba_gon);
    T::one() - (ab + ba - T::PI()) * earth_radius / (mean_slant_m * ab.sin())
}
