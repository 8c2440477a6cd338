use crate::angle::rad_to_gon;
use geo::{Coord, CoordFloat};
use num_traits::FloatConst;

/// Returns the grid azimuth (gon, clockwise from north) from `start`
/// to `end`, where `x` is easting and `y` is northing.
///
/// The result lies in `[0, 400)`. Returns `None` when both points
/// share the same coordinates, as the direction is undefined.
pub fn azimuth<T>(start: Coord<T>, end: Coord<T>) -> Option<T>
where
    T: CoordFloat + FloatConst,
{
    let delta_east = end.x - start.x;
    let delta_north = end.y - start.y;
    if delta_east == T::zero() && delta_north == T::zero() {
        return None;
    }
    let azimuth = rad_to_gon(delta_east.atan2(delta_north));
    if azimuth < T::zero() {
        Some(azimuth + T::from(400).unwrap())
    } else {
        // Folds -0.0 into 0.0.
        Some(azimuth + T::zero())
    }
}
