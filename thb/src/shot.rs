use crate::records::Face;
use serde::{Serialize, Serializer};
use std::fmt;

/// Marker written in place of the face when both directions disagree.
pub const FACE_MISMATCH: &str = "FEHLER";

/// Face of a merged shot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShotFace {
    /// Both directions agree (or only one direction observed the shot).
    Known(Face),

    /// No direction recorded a face.
    Unavailable,

    /// The directions recorded different faces.
    Mismatch,
}

impl ShotFace {
    /// Reconciles the faces recorded for the same shot id in both
    /// directions. `None` on the outside means the shot is missing in
    /// that direction.
    pub fn reconcile(forward: Option<Option<Face>>, backward: Option<Option<Face>>) -> Self {
        match (forward, backward) {
            (Some(f), Some(b)) if f == b => f.map_or(Self::Unavailable, Self::Known),
            (Some(_), Some(_)) => Self::Mismatch,
            (Some(only), None) | (None, Some(only)) => only.map_or(Self::Unavailable, Self::Known),
            (None, None) => Self::Unavailable,
        }
    }
}

impl fmt::Display for ShotFace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Known(face) => fmt::Display::fmt(face, f),
            Self::Unavailable => f.write_str("n/a"),
            Self::Mismatch => f.write_str(FACE_MISMATCH),
        }
    }
}

impl Serialize for ShotFace {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A shot after correction and merging of both directions.
///
/// Values from a direction that did not observe the shot are NaN, as
/// is everything derived from them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrectedShot {
    pub id: String,
    pub face: ShotFace,
    pub slant_ab_m: f64,
    pub slant_ba_m: f64,
    pub mean_slant_m: f64,
    pub vertical_ab_gon: f64,
    pub vertical_ba_gon: f64,
    /// Magnitude of the height difference.
    pub height_diff_m: f64,
    /// Refraction coefficient `k`, NaN when undefined.
    pub refraction: f64,
}
