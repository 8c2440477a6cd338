//! Readers for total-station exports, approximate coordinates and
//! station parameters. All inputs are `;` separated.

use anyhow::{anyhow, bail, Context, Result};
use log::debug;
use serde::{de::DeserializeOwned, Deserialize};
use std::{fs, ops::Range, path::Path};
use thb::{
    geo::coord, DirectionSet, Face, Observation, ReferencePoint, ReferencePoints, StationParams,
};

/// Point class of station records, which carry no shot.
const STATION_CLASS: &str = "REF";

const STATION_CHARS: Range<usize> = 0..4;
const TARGET_CHARS: Range<usize> = 5..9;
const SHOT_CHARS: Range<usize> = 10..15;

#[derive(Debug, Deserialize)]
struct RawMeasurement {
    #[serde(rename = "PunktNr")]
    point_nr: String,
    #[serde(rename = "Punktklasse", default)]
    point_class: Option<String>,
    #[serde(rename = "Lage", default)]
    lage: Option<i64>,
    #[serde(rename = "V-Winkel")]
    vertical_gon: Option<f64>,
    #[serde(rename = "Schrägdistanz")]
    slant_raw_m: Option<f64>,
    #[serde(rename = "Atmos PPM")]
    ppm: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawPoint {
    #[serde(rename = "PktNr")]
    id: String,
    #[serde(rename = "E-Koord")]
    east: f64,
    #[serde(rename = "N-Koord")]
    north: f64,
    #[serde(rename = "Hoehe")]
    height: f64,
    #[serde(rename = "Geoid", default)]
    geoid: f64,
    #[serde(rename = "Xi")]
    xi: f64,
    #[serde(rename = "Eta")]
    eta: f64,
}

#[derive(Debug, Deserialize)]
struct RawStations {
    #[serde(rename = "Nr")]
    index: usize,
    #[serde(rename = "signal_A")]
    signal_a: f64,
    #[serde(rename = "offset_A")]
    offset_a: f64,
    #[serde(rename = "signal_B")]
    signal_b: f64,
    #[serde(rename = "offset_B")]
    offset_b: f64,
}

/// Reads one direction of a visur from a total-station export.
pub fn direction_set(path: &Path) -> Result<DirectionSet> {
    let text = read_text(path)?;
    parse_direction_set(&text).with_context(|| format!("reading {}", path.display()))
}

/// Reads the approximate coordinate table.
pub fn reference_points(path: &Path) -> Result<ReferencePoints> {
    let text = read_text(path)?;
    parse_reference_points(&text).with_context(|| format!("reading {}", path.display()))
}

/// Reads the station parameters of visur `index`.
pub fn station_params(path: &Path, index: usize) -> Result<StationParams> {
    let text = read_text(path)?;
    parse_station_params(&text, index).with_context(|| format!("reading {}", path.display()))
}

fn parse_direction_set(text: &str) -> Result<DirectionSet> {
    let mut stations: Option<(String, String)> = None;
    let mut observations = Vec::new();

    for raw in records::<RawMeasurement>(text)? {
        if raw.point_class.as_deref() == Some(STATION_CLASS) {
            continue;
        }
        let nr = &raw.point_nr;
        let station = splice(nr, STATION_CHARS)
            .ok_or_else(|| anyhow!("point number {nr} has no station"))?;
        let target =
            splice(nr, TARGET_CHARS).ok_or_else(|| anyhow!("point number {nr} has no target"))?;
        let id = splice(nr, SHOT_CHARS).ok_or_else(|| anyhow!("point number {nr} has no shot id"))?;

        let (s, t) = stations.get_or_insert_with(|| (station.clone(), target.clone()));
        if *s != station || *t != target {
            bail!("shot {nr} is not from {s} to {t}");
        }

        let vertical_gon = raw
            .vertical_gon
            .ok_or_else(|| anyhow!("shot {nr} has no vertical angle"))?;
        let slant_raw_m = raw
            .slant_raw_m
            .ok_or_else(|| anyhow!("shot {nr} has no slant distance"))?;
        let ppm = raw.ppm.ok_or_else(|| anyhow!("shot {nr} has no atmospheric ppm"))?;

        observations.push(Observation {
            id,
            face: raw.lage.and_then(Face::from_lage),
            vertical_gon,
            slant_m: atmospheric_correction(slant_raw_m, ppm),
        });
    }

    let (station, target) = stations.ok_or_else(|| anyhow!("no shots"))?;
    debug!("{station} -> {target}; {} shots", observations.len());
    Ok(DirectionSet {
        station,
        target,
        observations,
    })
}

fn parse_reference_points(text: &str) -> Result<ReferencePoints> {
    let points: ReferencePoints = records::<RawPoint>(text)?
        .into_iter()
        .map(|raw| ReferencePoint {
            id: raw.id,
            coord: coord! { x: raw.east, y: raw.north },
            height_m: raw.height,
            geoid_m: raw.geoid,
            xi_cc: raw.xi,
            eta_cc: raw.eta,
        })
        .collect();
    debug!("{} reference points", points.len());
    Ok(points)
}

fn parse_station_params(text: &str, index: usize) -> Result<StationParams> {
    records::<RawStations>(text)?
        .into_iter()
        .find(|raw| raw.index == index)
        .map(|raw| StationParams {
            signal_a: raw.signal_a,
            offset_a: raw.offset_a,
            signal_b: raw.signal_b,
            offset_b: raw.offset_b,
        })
        .ok_or_else(|| anyhow!("no station parameters for visur {index}"))
}

fn records<T: DeserializeOwned>(text: &str) -> Result<Vec<T>> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(b';')
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());
    rdr.deserialize()
        .collect::<Result<Vec<T>, csv::Error>>()
        .map_err(Into::into)
}

/// Applies the atmospheric scale correction `ppm` to `slant_raw_m`.
fn atmospheric_correction(slant_raw_m: f64, ppm: f64) -> f64 {
    slant_raw_m + ((slant_raw_m / 1_000.0) * ppm) / 1_000.0
}

/// Returns the characters of `s` in `range`, clipped to the end of
/// `s`, or `None` if nothing is left.
fn splice(s: &str, range: Range<usize>) -> Option<String> {
    let part: String = s.chars().skip(range.start).take(range.len()).collect();
    (!part.is_empty()).then_some(part)
}

/// Windows-1252 characters for bytes 0x80 to 0x9F. Unassigned bytes map
/// to the C1 control of the same value.
const CP1252_C1: [char; 32] = [
    '\u{20AC}', '\u{81}', '\u{201A}', '\u{192}', '\u{201E}', '\u{2026}', '\u{2020}', '\u{2021}',
    '\u{2C6}', '\u{2030}', '\u{160}', '\u{2039}', '\u{152}', '\u{8D}', '\u{17D}', '\u{8F}',
    '\u{90}', '\u{2018}', '\u{2019}', '\u{201C}', '\u{201D}', '\u{2022}', '\u{2013}', '\u{2014}',
    '\u{2DC}', '\u{2122}', '\u{161}', '\u{203A}', '\u{153}', '\u{9D}', '\u{17E}', '\u{178}',
];

/// Reads `path` as UTF-8, falling back to Windows-1252 for exports
/// written with the Windows code page.
fn read_text(path: &Path) -> Result<String> {
    let bytes = fs::read(path).with_context(|| format!("opening {}", path.display()))?;
    Ok(match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => e.into_bytes().into_iter().map(cp1252_char).collect(),
    })
}

fn cp1252_char(byte: u8) -> char {
    match byte {
        0x80..=0x9F => CP1252_C1[usize::from(byte - 0x80)],
        _ => char::from(byte),
    }
}
