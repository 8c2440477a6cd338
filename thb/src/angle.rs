//! Gon/radian conversion.
//!
//! Every angle that enters or leaves this crate is in gon (400 gon
//! per full circle); trigonometry happens in radians.

use num_traits::{Float, FloatConst};

/// Gon per radian (200/π).
pub const RHO_GON: f64 = 63.661_977_236_758_13;

fn two_hundred<T: Float>() -> T {
    T::from(200).unwrap()
}

/// Converts `gon` to radians.
pub fn gon_to_rad<T>(gon: T) -> T
where
    T: Float + FloatConst,
{
    gon * T::PI() / two_hundred()
}

/// Converts `rad` to gon.
pub fn rad_to_gon<T>(rad: T) -> T
where
    T: Float + FloatConst,
{
    rad * two_hundred() / T::PI()
}
