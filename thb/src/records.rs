//! Input records: observations, reference points and station setup.

use crate::ThbError;
use geo::Coord;
use log::warn;
use serde::Serialize;
use std::{collections::HashMap, fmt};

/// Telescope face ("Lage") of a double-face observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Face {
    One,
    Two,
}

impl Face {
    /// Returns the face for a raw "Lage" value, `None` for anything but
    /// 1 or 2.
    pub fn from_lage(lage: i64) -> Option<Self> {
        match lage {
            1 => Some(Self::One),
            2 => Some(Self::Two),
            _ => None,
        }
    }
}

impl fmt::Display for Face {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::One => f.write_str("1"),
            Self::Two => f.write_str("2"),
        }
    }
}

/// A single shot from one station towards the other.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    /// Shot identifier, unique within a [`DirectionSet`].
    pub id: String,

    /// Telescope face, `None` when not recorded.
    pub face: Option<Face>,

    /// Vertical (zenith) angle in gon.
    pub vertical_gon: f64,

    /// Slant distance in meters, atmosphere corrected.
    pub slant_m: f64,
}

/// All shots observed from `station` towards `target`.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectionSet {
    pub station: String,
    pub target: String,
    pub observations: Vec<Observation>,
}

/// Approximate coordinates of a survey point.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferencePoint {
    /// Point number ("PktNr").
    pub id: String,

    /// Easting (`x`) and northing (`y`) in meters.
    pub coord: Coord<f64>,

    /// Elevation in meters.
    pub height_m: f64,

    /// Geoid undulation in meters.
    pub geoid_m: f64,

    /// Deflection of the vertical, north-south component (cc).
    pub xi_cc: f64,

    /// Deflection of the vertical, east-west component (cc).
    pub eta_cc: f64,
}

/// Read-only lookup of reference points by point number.
#[derive(Debug, Clone, Default)]
pub struct ReferencePoints {
    points: HashMap<String, ReferencePoint>,
}

impl ReferencePoints {
    /// Returns the point numbered `id`.
    pub fn get(&self, id: &str) -> Result<&ReferencePoint, ThbError> {
        self.points
            .get(id)
            .ok_or_else(|| ThbError::MissingPoint(id.to_string()))
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl FromIterator<ReferencePoint> for ReferencePoints {
    /// Collects points; on duplicate numbers the first one wins.
    fn from_iter<I: IntoIterator<Item = ReferencePoint>>(iter: I) -> Self {
        let mut points = HashMap::new();
        for point in iter {
            if points.contains_key(&point.id) {
                warn!("duplicate reference point {}, keeping first", point.id);
                continue;
            }
            points.insert(point.id.clone(), point);
        }
        Self { points }
    }
}

/// Signal heights and prism-mount offsets of both stations (meters).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StationParams {
    pub signal_a: f64,
    pub offset_a: f64,
    pub signal_b: f64,
    pub offset_b: f64,
}

impl StationParams {
    /// Instrument height at A: signal height less the mount offset.
    pub fn instrument_a(&self) -> f64 {
        self.signal_a - self.offset_a
    }

    /// Instrument height at B: signal height less the mount offset.
    pub fn instrument_b(&self) -> f64 {
        self.signal_b - self.offset_b
    }
}

#[cfg(test)]
mod tests {
    use super::{Face, ReferencePoint, ReferencePoints, StationParams};
    use crate::ThbError;
    use geo::coord;

    fn point(id: &str, height_m: f64) -> ReferencePoint {
        ReferencePoint {
            id: id.to_string(),
            coord: coord! { x: 0.0, y: 0.0 },
            height_m,
            geoid_m: 0.0,
            xi_cc: 0.0,
            eta_cc: 0.0,
        }
    }

    #[test]
    fn test_face_from_lage() {
        assert_eq!(Face::from_lage(1), Some(Face::One));
        assert_eq!(Face::from_lage(2), Some(Face::Two));
        assert_eq!(Face::from_lage(0), None);
        assert_eq!(Face::from_lage(3), None);
        assert_eq!(Face::Two.to_string(), "2");
    }

    #[test]
    fn test_lookup() {
        let points: ReferencePoints = [point("1001", 412.0), point("1002", 455.5)]
            .into_iter()
            .collect();
        assert_eq!(points.len(), 2);
        assert_eq!(points.get("1002").unwrap().height_m, 455.5);
        assert!(matches!(
            points.get("9999"),
            Err(ThbError::MissingPoint(id)) if id == "9999"
        ));
    }

    #[test]
    fn test_duplicate_keeps_first() {
        let points: ReferencePoints = [point("1001", 1.0), point("1001", 2.0)]
            .into_iter()
            .collect();
        assert_eq!(points.len(), 1);
        assert_eq!(points.get("1001").unwrap().height_m, 1.0);
    }

    #[test]
    fn test_instrument_heights() {
        let params = StationParams {
            signal_a: 1.65,
            offset_a: 0.15,
            signal_b: 1.70,
            offset_b: 0.20,
        };
        assert!((params.instrument_a() - 1.5).abs() < 1e-12);
        assert!((params.instrument_b() - 1.5).abs() < 1e-12);
    }
}
