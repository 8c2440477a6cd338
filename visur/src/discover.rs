//! Campaign directory layout.

use anyhow::{Context, Result};
use log::warn;
use std::{
    ffi::OsStr,
    fs,
    path::{Path, PathBuf},
};

/// Sub directory holding campaign-wide data rather than a visur.
const ALL_DATA_DIR: &str = "_all-data";

/// A visur directory with its two reciprocal measurement files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Visur {
    /// Position in the campaign, also the row number ("Nr") in the
    /// station parameter table.
    pub index: usize,

    /// Directory name.
    pub name: String,

    pub dir: PathBuf,

    /// Shots from A to B (first CSV file by name).
    pub forward: PathBuf,

    /// Shots from B to A (second CSV file by name).
    pub backward: PathBuf,
}

/// Returns all visurs in `base_dir`, sorted by directory name.
///
/// Directories with fewer than two CSV files are skipped with a
/// warning.
pub fn discover(base_dir: &Path) -> Result<Vec<Visur>> {
    let mut dirs = sorted_entries(base_dir, |path| path.is_dir())?;
    dirs.retain(|dir| dir.file_name() != Some(OsStr::new(ALL_DATA_DIR)));

    let mut visurs = Vec::with_capacity(dirs.len());
    for dir in dirs {
        let name = dir
            .file_name()
            .and_then(OsStr::to_str)
            .map(str::to_string)
            .unwrap_or_else(|| dir.display().to_string());
        let csv_files = sorted_entries(&dir, |path| {
            path.is_file() && path.extension().and_then(OsStr::to_str) == Some("csv")
        })?;
        if let [forward, backward, ..] = csv_files.as_slice() {
            visurs.push(Visur {
                index: visurs.len(),
                name,
                forward: forward.clone(),
                backward: backward.clone(),
                dir,
            });
        } else {
            warn!("fewer than two CSV files in {name}, skipping");
        }
    }
    Ok(visurs)
}

fn sorted_entries<F>(dir: &Path, keep: F) -> Result<Vec<PathBuf>>
where
    F: Fn(&Path) -> bool,
{
    let mut paths = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("listing {}", dir.display()))? {
        let path = entry?.path();
        if keep(&path) {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::discover;
    use std::{fs, path::PathBuf};

    fn campaign_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("visur-discover-{}", std::process::id()));
        if dir.exists() {
            fs::remove_dir_all(&dir).unwrap();
        }
        for (sub, files) in [
            ("V02", &["b.csv", "a.csv", "notes.txt"][..]),
            ("V01", &["1001-1002.csv", "1002-1001.csv"][..]),
            ("V03", &["only.csv"][..]),
            ("_all-data", &["x.csv", "y.csv"][..]),
        ] {
            let sub = dir.join(sub);
            fs::create_dir_all(&sub).unwrap();
            for file in files {
                fs::write(sub.join(file), "").unwrap();
            }
        }
        dir
    }

    #[test]
    fn test_discover() {
        let dir = campaign_dir();
        let visurs = discover(&dir).unwrap();
        fs::remove_dir_all(&dir).unwrap();

        assert_eq!(visurs.len(), 2);
        assert_eq!(visurs[0].index, 0);
        assert_eq!(visurs[0].name, "V01");
        assert!(visurs[0].forward.ends_with("V01/1001-1002.csv"));
        assert!(visurs[0].backward.ends_with("V01/1002-1001.csv"));
        assert_eq!(visurs[1].index, 1);
        assert_eq!(visurs[1].name, "V02");
        assert!(visurs[1].forward.ends_with("a.csv"));
        assert!(visurs[1].backward.ends_with("b.csv"));
    }

    #[test]
    fn test_missing_base_dir() {
        let dir = std::env::temp_dir().join("visur-discover-does-not-exist");
        assert!(discover(&dir).is_err());
    }
}
