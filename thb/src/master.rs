use crate::{
    constants::FULL_CIRCLE_GON,
    error::ThbError,
    math::{
        azimuth, deflection_correction_batch, height_difference, prism_mount_correction_batch,
        refraction_coefficient,
    },
    preanalysis::{Preanalysis, PreanalysisConfig},
    records::{DirectionSet, Face, ReferencePoint, ReferencePoints, StationParams},
    shot::{CorrectedShot, ShotFace},
    stats::SummaryStatistics,
};
use log::{debug, info, warn};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

const FORWARD: &str = "A->B";
const BACKWARD: &str = "B->A";

/// Reciprocal trigonometric height determination of one visur.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Thb {
    /// "Visur_{start}-{end}".
    pub visur_id: String,

    /// Start/end points and preanalysis.
    pub info: VisurInfo,

    /// Station setup the computation used.
    pub stations: StationParams,

    /// Merged shots in ascending id order.
    pub shots: Vec<CorrectedShot>,

    pub statistics: SummaryStatistics,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisurInfo {
    /// Station of the forward direction (A).
    pub start: String,

    /// Target of the forward direction (B).
    pub end: String,

    /// Budget of the first merged shot.
    pub preanalysis: Preanalysis,
}

impl VisurInfo {
    /// Expected 1σ accuracy of the height difference (mm).
    pub fn accuracy_mm(&self) -> f64 {
        self.preanalysis.accuracy_mm()
    }
}

/// One row of the result table, rounded for reporting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultRow {
    #[serde(rename = "ID Visur")]
    pub visur_id: String,
    #[serde(rename = "ID Messung")]
    pub shot_id: String,
    #[serde(rename = "Lage")]
    pub face: ShotFace,
    #[serde(rename = "Schrägdistanz A→B")]
    pub slant_ab_m: f64,
    #[serde(rename = "Schrägdistanz B→A")]
    pub slant_ba_m: f64,
    #[serde(rename = "Mittlere Schrägdistanz")]
    pub mean_slant_m: f64,
    #[serde(rename = "V-Winkel A→B")]
    pub vertical_ab_gon: f64,
    #[serde(rename = "V-Winkel B→A")]
    pub vertical_ba_gon: f64,
    #[serde(rename = "Höhendifferenz")]
    pub height_diff_m: f64,
    #[serde(rename = "Refraktionskoeffizient k")]
    pub refraction: f64,
}

impl Thb {
    pub fn builder<'a>() -> ThbBuilder<'a> {
        ThbBuilder {
            forward: None,
            backward: None,
            stations: None,
            preanalysis: PreanalysisConfig::default(),
        }
    }

    /// Returns the result table: distances and heights rounded to 4
    /// decimals, `k` to 2, angles as computed.
    pub fn table(&self) -> Vec<ResultRow> {
        self.shots
            .iter()
            .map(|shot| ResultRow {
                visur_id: self.visur_id.clone(),
                shot_id: shot.id.clone(),
                face: shot.face,
                slant_ab_m: round_to(shot.slant_ab_m, 4),
                slant_ba_m: round_to(shot.slant_ba_m, 4),
                mean_slant_m: round_to(shot.mean_slant_m, 4),
                vertical_ab_gon: shot.vertical_ab_gon,
                vertical_ba_gon: shot.vertical_ba_gon,
                height_diff_m: round_to(shot.height_diff_m, 4),
                refraction: round_to(shot.refraction, 2),
            })
            .collect()
    }
}

/// Runs the full height determination with the default preanalysis
/// accuracies.
///
/// `forward` holds the shots from A to B, `backward` those from B to A.
pub fn master_thb(
    forward: &DirectionSet,
    backward: &DirectionSet,
    points: &ReferencePoints,
    stations: StationParams,
) -> Result<Thb, ThbError> {
    Thb::builder()
        .forward(forward)
        .backward(backward)
        .stations(stations)
        .build(points)
}

pub struct ThbBuilder<'a> {
    /// Shots from A to B (required).
    forward: Option<&'a DirectionSet>,

    /// Shots from B to A (required).
    backward: Option<&'a DirectionSet>,

    /// Signal heights and mount offsets (required).
    stations: Option<StationParams>,

    /// Preanalysis accuracies (defaults to [`PreanalysisConfig::default`]).
    preanalysis: PreanalysisConfig,
}

impl<'a> ThbBuilder<'a> {
    /// Shots from A to B (required).
    #[must_use]
    pub fn forward(mut self, set: &'a DirectionSet) -> Self {
        self.forward = Some(set);
        self
    }

    /// Shots from B to A (required).
    #[must_use]
    pub fn backward(mut self, set: &'a DirectionSet) -> Self {
        self.backward = Some(set);
        self
    }

    /// Signal heights and mount offsets (required).
    #[must_use]
    pub fn stations(mut self, stations: StationParams) -> Self {
        self.stations = Some(stations);
        self
    }

    /// Preanalysis accuracies (optional).
    #[must_use]
    pub fn preanalysis(mut self, config: PreanalysisConfig) -> Self {
        self.preanalysis = config;
        self
    }

    pub fn build(&self, points: &ReferencePoints) -> Result<Thb, ThbError> {
        let forward = self.forward.ok_or(ThbError::Builder("forward"))?;
        let backward = self.backward.ok_or(ThbError::Builder("backward"))?;
        let stations = self.stations.ok_or(ThbError::Builder("stations"))?;

        let start = points.get(&forward.station)?;
        let end = points.get(&forward.target)?;
        let back_station = points.get(&backward.station)?;
        let back_target = points.get(&backward.target)?;
        let visur_id = format!("Visur_{}-{}", start.id, end.id);

        let now = std::time::Instant::now();
        // The prism mount sits at the far end of each sight.
        let corrected_ab = correct_direction(FORWARD, forward, start, end, stations.offset_b)?;
        let corrected_ba = correct_direction(
            BACKWARD,
            backward,
            back_station,
            back_target,
            stations.offset_a,
        )?;
        let correction_runtime = now.elapsed();

        let now = std::time::Instant::now();
        let shots = merge(&visur_id, &corrected_ab, &corrected_ba, &stations);
        let merge_runtime = now.elapsed();

        debug!(
            "{visur_id}; shots: {}, correction_exec: {:?}, merge_exec: {:?}",
            shots.len(),
            correction_runtime,
            merge_runtime
        );

        let statistics = SummaryStatistics::new(&shots, (end.height_m - start.height_m).abs());
        // Both directions are non-empty, so is the merge.
        let first = &shots[0];
        let preanalysis = Preanalysis::new(first.mean_slant_m, first.vertical_ab_gon, &self.preanalysis);
        if preanalysis.accuracy_mm().is_nan() {
            warn!(
                "{visur_id}; preanalysis undefined, first shot {} lacks a reciprocal observation",
                first.id
            );
        }

        info!(
            "{visur_id}; n: {}, dh: {:.4} m ± {:.4} m, k: {:.2} ± {:.2}, preanalysis: {:.2} mm",
            shots.len(),
            statistics.height_diff_m.overall.mean,
            statistics.height_diff_m.overall.std,
            statistics.refraction.overall.mean,
            statistics.refraction.overall.std,
            preanalysis.accuracy_mm()
        );

        Ok(Thb {
            visur_id,
            info: VisurInfo {
                start: start.id.clone(),
                end: end.id.clone(),
                preanalysis,
            },
            stations,
            shots,
            statistics,
        })
    }
}

/// A shot of one direction after all corrections.
#[derive(Debug, Clone, Copy)]
struct Corrected {
    face: Option<Face>,
    slant_m: f64,
    vertical_gon: f64,
}

/// Applies face, deflection and prism-mount corrections to every shot
/// of `set`, keyed by shot id.
fn correct_direction(
    direction: &'static str,
    set: &DirectionSet,
    station: &ReferencePoint,
    target: &ReferencePoint,
    offset_m: f64,
) -> Result<BTreeMap<String, Corrected>, ThbError> {
    if set.observations.is_empty() {
        return Err(ThbError::EmptyDirection(direction));
    }
    let azimuth_gon = azimuth(station.coord, target.coord)
        .ok_or_else(|| ThbError::CoincidentPoints(station.id.clone()))?;

    let vertical_gon: Vec<f64> = set
        .observations
        .iter()
        .map(|obs| match obs.face {
            Some(Face::Two) => FULL_CIRCLE_GON - obs.vertical_gon,
            _ => obs.vertical_gon,
        })
        .collect();
    let vertical_gon =
        deflection_correction_batch(station.xi_cc, station.eta_cc, azimuth_gon, &vertical_gon);
    let slant_m: Vec<f64> = set.observations.iter().map(|obs| obs.slant_m).collect();
    let corrected = prism_mount_correction_batch(&slant_m, offset_m, &vertical_gon);

    let mut shots = BTreeMap::new();
    for (obs, (slant_m, vertical_gon)) in set.observations.iter().zip(corrected) {
        let shot = Corrected {
            face: obs.face,
            slant_m,
            vertical_gon,
        };
        if shots.insert(obs.id.clone(), shot).is_some() {
            return Err(ThbError::DuplicateShot {
                direction,
                id: obs.id.clone(),
            });
        }
    }
    debug!(
        "{direction}; station: {}, azimuth: {azimuth_gon:.5} gon, shots: {}",
        station.id,
        shots.len()
    );
    Ok(shots)
}

/// Outer-joins both directions on shot id and derives height
/// difference and refraction per shot.
fn merge(
    visur_id: &str,
    forward: &BTreeMap<String, Corrected>,
    backward: &BTreeMap<String, Corrected>,
    stations: &StationParams,
) -> Vec<CorrectedShot> {
    let ids: BTreeSet<&String> = forward.keys().chain(backward.keys()).collect();
    ids.into_iter()
        .map(|id| {
            let ab = forward.get(id);
            let ba = backward.get(id);
            if ab.is_none() || ba.is_none() {
                warn!(
                    "{visur_id}; shot {id} only observed in {} direction",
                    if ab.is_some() { FORWARD } else { BACKWARD }
                );
            }
            let face = ShotFace::reconcile(ab.map(|s| s.face), ba.map(|s| s.face));
            if face == ShotFace::Mismatch {
                warn!("{visur_id}; shot {id} has different faces in both directions");
            }

            let slant_ab_m = ab.map_or(f64::NAN, |s| s.slant_m);
            let slant_ba_m = ba.map_or(f64::NAN, |s| s.slant_m);
            let vertical_ab_gon = ab.map_or(f64::NAN, |s| s.vertical_gon);
            let vertical_ba_gon = ba.map_or(f64::NAN, |s| s.vertical_gon);
            let mean_slant_m = (slant_ab_m + slant_ba_m) / 2.0;

            let height_diff_m = height_difference(
                mean_slant_m,
                vertical_ab_gon,
                vertical_ba_gon,
                stations.instrument_a(),
                stations.instrument_b(),
                stations.signal_a,
                stations.signal_b,
            );
            let refraction = {
                let k = refraction_coefficient(mean_slant_m, vertical_ab_gon, vertical_ba_gon);
                if k.is_finite() {
                    k
                } else {
                    f64::NAN
                }
            };

            CorrectedShot {
                id: id.clone(),
                face,
                slant_ab_m,
                slant_ba_m,
                mean_slant_m,
                vertical_ab_gon,
                vertical_ba_gon,
                height_diff_m,
                refraction,
            }
        })
        .collect()
}

/// Rounds half to even at `decimals` places.
fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10_f64.powi(decimals);
    (value * scale).round_ties_even() / scale
}
