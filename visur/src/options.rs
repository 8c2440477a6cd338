use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use thb::PreanalysisConfig;

/// Evaluate reciprocal trigonometric height determinations.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Campaign directory, one sub directory per visur.
    #[arg(short, long)]
    pub base_dir: PathBuf,

    /// Approximate coordinates ("PktNr;E-Koord;N-Koord;Hoehe;Geoid;Xi;Eta").
    #[arg(short, long)]
    pub fix: PathBuf,

    /// Signal heights and mount offsets per visur
    /// ("Nr;signal_A;offset_A;signal_B;offset_B").
    #[arg(short, long)]
    pub instruments: PathBuf,

    #[command(flatten)]
    pub accuracy: Accuracy,

    #[command(subcommand)]
    pub cmd: Command,
}

/// Accuracies assumed by the preanalysis.
#[derive(Debug, Clone, Args)]
pub struct Accuracy {
    /// Instrument height accuracy (mm).
    #[arg(long, default_value_t = 1.0)]
    pub sigma_instrument_mm: f64,

    /// Signal height accuracy (mm).
    #[arg(long, default_value_t = 1.0)]
    pub sigma_signal_mm: f64,
}

impl Accuracy {
    pub fn config(&self) -> PreanalysisConfig {
        PreanalysisConfig {
            instrument_height_mm: self.sigma_instrument_mm,
            signal_height_mm: self.sigma_signal_mm,
            ..PreanalysisConfig::default()
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the visurs found in the campaign directory.
    List,

    /// Evaluate and write protocol and result CSV into each visur
    /// directory.
    Run {
        /// Only evaluate the visur at this index.
        index: Option<usize>,
    },

    /// Print the evaluation of one visur as JSON.
    Json { index: usize },

    /// Plot the height differences of one visur to the terminal.
    Plot { index: usize },
}
