mod discover;
mod export;
mod import;
mod options;
mod plot;
mod progress;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use discover::Visur;
use indicatif::{MultiProgress, ProgressDrawTarget};
use log::{info, warn};
use options::{Cli, Command as CliCmd};
use rayon::prelude::*;
use std::path::Path;
use thb::{PreanalysisConfig, ReferencePoints, Thb};

fn main() -> Result<()> {
    let Cli {
        base_dir,
        fix,
        instruments,
        accuracy,
        cmd,
    } = Cli::parse();

    env_logger::init();

    let visurs = discover::discover(&base_dir)?;
    let points = import::reference_points(&fix)?;
    let ctx = Campaign {
        points: &points,
        instruments: &instruments,
        config: accuracy.config(),
    };

    match cmd {
        CliCmd::List => {
            for visur in &visurs {
                println!(
                    "{:>3}  {}  ({}, {})",
                    visur.index,
                    visur.name,
                    file_name(&visur.forward),
                    file_name(&visur.backward)
                );
            }
        }
        CliCmd::Run { index: Some(index) } => {
            let visur = select(&visurs, index)?;
            write_results(&ctx.evaluate(visur)?, visur)?;
        }
        CliCmd::Run { index: None } => {
            let failed = run_all(&ctx, &visurs);
            if !failed.is_empty() {
                warn!("failed visurs: {}", failed.join(", "));
            }
        }
        CliCmd::Json { index } => {
            let visur = select(&visurs, index)?;
            export::print_json(&ctx.evaluate(visur)?, visur)?;
        }
        CliCmd::Plot { index } => {
            let visur = select(&visurs, index)?;
            plot::plot_ascii(&ctx.evaluate(visur)?);
        }
    }
    Ok(())
}

/// Inputs shared by all visurs of a campaign.
struct Campaign<'a> {
    points: &'a ReferencePoints,
    instruments: &'a Path,
    config: PreanalysisConfig,
}

impl Campaign<'_> {
    fn evaluate(&self, visur: &Visur) -> Result<Thb> {
        let forward = import::direction_set(&visur.forward)?;
        let backward = import::direction_set(&visur.backward)?;
        let stations = import::station_params(self.instruments, visur.index)?;
        let thb = Thb::builder()
            .forward(&forward)
            .backward(&backward)
            .stations(stations)
            .preanalysis(self.config)
            .build(self.points)
            .with_context(|| visur.name.clone())?;
        Ok(thb)
    }
}

/// Evaluates every visur in parallel and returns the names of those
/// that failed. A failing visur is reported and doesn't stop the others.
fn run_all(ctx: &Campaign<'_>, visurs: &[Visur]) -> Vec<String> {
    let progress_group = MultiProgress::with_draw_target(ProgressDrawTarget::stderr_with_hz(4));
    let pb = progress_group.add(progress::bar(
        "Evaluate visurs".to_string(),
        visurs.len() as u64,
    ));
    let failed: Vec<String> = visurs
        .par_iter()
        .filter_map(|visur| {
            pb.set_message(visur.name.clone());
            let result = ctx
                .evaluate(visur)
                .and_then(|thb| write_results(&thb, visur));
            pb.inc(1);
            result.err().map(|e| {
                warn!("{}: {e:#}", visur.name);
                visur.name.clone()
            })
        })
        .collect();
    pb.finish_and_clear();
    info!(
        "evaluated {} of {} visurs",
        visurs.len() - failed.len(),
        visurs.len()
    );
    failed
}

fn write_results(thb: &Thb, visur: &Visur) -> Result<()> {
    let protocol = export::write_protocol(thb, visur)?;
    let csv = export::write_csv(thb, visur)?;
    info!("wrote {} and {}", protocol.display(), csv.display());
    Ok(())
}

fn select(visurs: &[Visur], index: usize) -> Result<&Visur> {
    visurs
        .get(index)
        .ok_or_else(|| anyhow!("no visur {index}, found {}", visurs.len()))
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |name| name.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::{run_all, Campaign};
    use crate::{discover, import};
    use std::{fs, path::Path};
    use thb::PreanalysisConfig;

    const HEADER: &str = "PunktNr;Punktklasse;Lage;V-Winkel;Schrägdistanz;Atmos PPM\n";

    fn export(station: &str, target: &str, vertical_gon: f64) -> String {
        let mut text = format!("{HEADER}{station};REF;;;;\n");
        for shot in ["1_1_1", "1_2_1"] {
            text.push_str(&format!(
                "{station}_{target}_{shot};MES;1;{vertical_gon};500.000;0\n"
            ));
        }
        text
    }

    fn write_visur(base: &Path, name: &str, a: &str, b: &str) {
        let dir = base.join(name);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(format!("{a}-{b}.csv")), export(a, b, 99.9)).unwrap();
        fs::write(dir.join(format!("{b}-{a}.csv")), export(b, a, 100.1)).unwrap();
    }

    #[test]
    fn test_failed_visur_does_not_stop_campaign() {
        let dir = std::env::temp_dir().join(format!("visur-campaign-{}", std::process::id()));
        if dir.exists() {
            fs::remove_dir_all(&dir).unwrap();
        }
        let base = dir.join("campaign");
        write_visur(&base, "V01", "1001", "1002");
        // 9999 has no approximate coordinates.
        write_visur(&base, "V02", "1001", "9999");

        let fix = dir.join("fix.csv");
        fs::write(
            &fix,
            "PktNr;E-Koord;N-Koord;Hoehe;Geoid;Xi;Eta\n\
             1001;2600000.0;1200000.0;500.0;49.0;0.0;0.0\n\
             1002;2600000.0;1200500.0;501.5;49.0;0.0;0.0\n",
        )
        .unwrap();
        let instruments = dir.join("instruments.csv");
        fs::write(
            &instruments,
            "Nr;signal_A;offset_A;signal_B;offset_B\n0;1.6;0.0;1.6;0.0\n1;1.6;0.0;1.6;0.0\n",
        )
        .unwrap();

        let visurs = discover::discover(&base).unwrap();
        let points = import::reference_points(&fix).unwrap();
        let ctx = Campaign {
            points: &points,
            instruments: &instruments,
            config: PreanalysisConfig::default(),
        };
        let failed = run_all(&ctx, &visurs);

        let protocol = base.join("V01").join("Protokoll_V01.txt").exists();
        let results = base.join("V01").join("Ergebnisse_V01.csv").exists();
        let failed_outputs = base.join("V02").join("Protokoll_V02.txt").exists();
        fs::remove_dir_all(&dir).unwrap();

        assert_eq!(visurs.len(), 2);
        assert_eq!(failed, vec!["V02".to_string()]);
        assert!(protocol);
        assert!(results);
        assert!(!failed_outputs);
    }
}
