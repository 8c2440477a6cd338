//! # Trigonometric Height Determination
//!
//! `thb` reduces reciprocal total-station observations between two
//! survey points to a height difference and refraction coefficient.
//!
//! Angles are in gon, distances and heights in meters, deflections of
//! the vertical in cc (0.1 mgon).

pub mod angle;
mod constants;
mod error;
pub mod math;
mod master;
mod preanalysis;
mod records;
mod shot;
mod stats;

pub use crate::{
    constants::MEAN_EARTH_RADIUS,
    error::ThbError,
    master::{master_thb, ResultRow, Thb, ThbBuilder, VisurInfo},
    preanalysis::{Preanalysis, PreanalysisConfig},
    records::{DirectionSet, Face, Observation, ReferencePoint, ReferencePoints, StationParams},
    shot::{CorrectedShot, ShotFace, FACE_MISMATCH},
    stats::{QuantityStats, Summary, SummaryStatistics},
};
pub use geo;
