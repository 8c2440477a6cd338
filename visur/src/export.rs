//! Protocol, CSV and JSON output of an evaluated visur.

use crate::discover::Visur;
use anyhow::Result;
use chrono::{DateTime, Local};
use serde::Serialize;
use std::{
    fmt::Write as _,
    fs,
    io::Write,
    path::{Path, PathBuf},
};
use thb::{QuantityStats, ResultRow, Thb};

const RULE: &str = "<<---------------------------------------------------------------->>";

/// Writes `Protokoll_{name}.txt` into the visur directory.
pub fn write_protocol(thb: &Thb, visur: &Visur) -> Result<PathBuf> {
    let path = visur.dir.join(format!("Protokoll_{}.txt", visur.name));
    fs::write(&path, protocol(thb, &visur.name, Local::now()))?;
    Ok(path)
}

/// Writes `Ergebnisse_{name}.csv` into the visur directory.
pub fn write_csv(thb: &Thb, visur: &Visur) -> Result<PathBuf> {
    let path = visur.dir.join(format!("Ergebnisse_{}.csv", visur.name));
    write_table(&thb.table(), &path)?;
    Ok(path)
}

/// Prints the evaluation of `visur` as JSON to stdout.
pub fn print_json(thb: &Thb, visur: &Visur) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    write_json(thb, &visur.name, &mut stdout)?;
    writeln!(stdout)?;
    Ok(())
}

/// Writes the full evaluation, unrounded shots and the rounded result
/// table. NaN becomes `null`.
fn write_json<W: Write>(thb: &Thb, name: &str, wtr: W) -> Result<()> {
    #[derive(Serialize)]
    struct JsonReport<'a> {
        visur: &'a str,
        #[serde(flatten)]
        thb: &'a Thb,
        accuracy_mm: f64,
        table: Vec<ResultRow>,
    }

    let report = JsonReport {
        visur: name,
        thb,
        accuracy_mm: thb.info.accuracy_mm(),
        table: thb.table(),
    };
    serde_json::to_writer_pretty(wtr, &report)?;
    Ok(())
}

fn write_table(rows: &[ResultRow], path: &Path) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new().delimiter(b';').from_path(path)?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Renders the evaluation protocol.
fn protocol(thb: &Thb, name: &str, evaluated: DateTime<Local>) -> String {
    let mut out = String::new();
    let stats = &thb.statistics;
    let info = &thb.info;
    let pre = &info.preanalysis;

    // Writing to a String can't fail.
    let _ = writeln!(out, "Trigonometrische Höhenbestimmung - Protokoll der Auswertung");
    let _ = writeln!(
        out,
        "Visur ID: {} ({name}), Ausgewertet am {}",
        thb.visur_id,
        evaluated.format("%d.%m.%Y / %H:%M")
    );
    let _ = writeln!(out, "{RULE}\n");

    let _ = writeln!(
        out,
        "{:>10} | {:^6} | {:>12} | {:>12} | {:>12} | {:>10} | {:>6}",
        "ID Messung", "Lage", "Ds A→B [m]", "Ds B→A [m]", "Ds Mittel [m]", "Δh [m]", "k"
    );
    let _ = writeln!(out, "{}", "-".repeat(92));
    for row in thb.table() {
        let _ = writeln!(
            out,
            "{:>10} | {:^6} | {:>12} | {:>12} | {:>12} | {:>10} | {:>6}",
            row.shot_id,
            row.face.to_string(),
            num(row.slant_ab_m, 4),
            num(row.slant_ba_m, 4),
            num(row.mean_slant_m, 4),
            num(row.height_diff_m, 4),
            num(row.refraction, 2),
        );
    }

    let _ = writeln!(out, "\n{RULE}");
    let _ = writeln!(
        out,
        "Startpunkt (A): {} // Endpunkt (B): {}",
        info.start, info.end
    );
    let _ = writeln!(
        out,
        "Höhendifferenz berechnet aus Näherungskoordinaten: {} m",
        num(stats.approx_height_diff_m, 4)
    );
    let _ = writeln!(
        out,
        "Mittlere Schrägdistanz inkl. 1σ: {}",
        mean_std(&stats.mean_slant_m, 4, " m")
    );
    let _ = writeln!(
        out,
        "Mittlere Höhendifferenz über Trig. Höhenbestimmung inkl. 1σ: {}",
        mean_std(&stats.height_diff_m, 4, " m")
    );
    let _ = writeln!(
        out,
        "Mittlerer Refraktionskoeffizient k inkl. 1σ: {}",
        mean_std(&stats.refraction, 2, "")
    );
    for (label, quantity, decimals, unit) in [
        ("Höhendifferenz", &stats.height_diff_m, 4, " m"),
        ("Refraktionskoeffizient k", &stats.refraction, 2, ""),
    ] {
        let _ = writeln!(
            out,
            " - {label} Lage 1: {} // Lage 2: {}",
            face_mean_std(quantity.face_one.mean, quantity.face_one.std, decimals, unit),
            face_mean_std(quantity.face_two.mean, quantity.face_two.std, decimals, unit),
        );
    }
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(
        out,
        "Die Präanalyse ergibt eine Genauigkeit der Höhenbestimmung von ca. {} mm // {} m",
        num(pre.accuracy_mm(), 2),
        num(pre.accuracy_mm() / 1000.0, 4)
    );
    let _ = writeln!(out, "Die Komponenten der Präanalyse sind (in mm):");
    let _ = writeln!(out, " - Distanzkomponente: {} mm", num(pre.distance_mm, 2));
    let _ = writeln!(out, " - Zenitwinkelkomponente: {} mm", num(pre.zenith_mm, 2));
    let _ = writeln!(
        out,
        " - Refraktionskomponente: {} mm (wird bei gegenseitig gleichzeitiger Messung vernachlässigt)",
        num(pre.refraction_mm, 2)
    );
    let _ = writeln!(
        out,
        " - Genauigkeit Instrumentenhöhe: {} mm",
        num(pre.instrument_height_mm, 2)
    );
    let _ = writeln!(out, " - Genauigkeit Signalhöhe: {} mm", num(pre.signal_height_mm, 2));
    let _ = writeln!(out, "{RULE}");
    let s = &thb.stations;
    let _ = writeln!(
        out,
        "Signalhöhe A: {:.4} m // Offset A: {:.4} m // Signalhöhe B: {:.4} m // Offset B: {:.4} m",
        s.signal_a, s.offset_a, s.signal_b, s.offset_b
    );
    out
}

fn mean_std(quantity: &QuantityStats, decimals: usize, unit: &str) -> String {
    face_mean_std(quantity.overall.mean, quantity.overall.std, decimals, unit)
}

fn face_mean_std(mean: f64, std: f64, decimals: usize, unit: &str) -> String {
    format!("{}{unit} ± {}{unit}", num(mean, decimals), num(std, decimals))
}

/// Formats `value` with `decimals` places, `n/a` when undefined.
fn num(value: f64, decimals: usize) -> String {
    if value.is_nan() {
        "n/a".to_string()
    } else {
        format!("{value:.decimals$}")
    }
}
