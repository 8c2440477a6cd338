mod azimuth;
mod deflection;
mod height;
mod prism_mount;
mod refraction;

pub use {
    azimuth::azimuth,
    deflection::{deflection_correction, deflection_correction_batch},
    height::height_difference,
    prism_mount::{prism_mount_correction, prism_mount_correction_batch},
    refraction::refraction_coefficient,
};
