//! Locating the dataset file in a data directory.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::SystemTime;

use forecast_grid::ForecastDataset;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::error::{IngestError, Result};
use crate::loader::CsvLoader;

/// Which `.csv` file in the data directory is treated as the dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatasetSelection {
    /// Least recently modified file. Matches the dashboard's historical pick.
    #[default]
    Oldest,
    /// Most recently modified file.
    Newest,
}

impl DatasetSelection {
    pub fn as_str(&self) -> &'static str {
        match self {
            DatasetSelection::Oldest => "oldest",
            DatasetSelection::Newest => "newest",
        }
    }
}

impl FromStr for DatasetSelection {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "oldest" => Ok(DatasetSelection::Oldest),
            "newest" | "latest" => Ok(DatasetSelection::Newest),
            other => Err(format!(
                "unknown dataset selection '{}' (expected 'oldest' or 'newest')",
                other
            )),
        }
    }
}

impl fmt::Display for DatasetSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A dataset together with the file it was read from.
#[derive(Debug, Clone)]
pub struct LoadedDataset {
    pub source: PathBuf,
    pub dataset: ForecastDataset,
}

/// Pick a `.csv` file directly inside `dir` by modification time.
///
/// Ties on modification time are broken by file name (smallest for
/// [`DatasetSelection::Oldest`], greatest for [`DatasetSelection::Newest`])
/// so the choice is stable.
pub fn find_dataset_file(dir: &Path, selection: DatasetSelection) -> Result<PathBuf> {
    let mut chosen: Option<(SystemTime, PathBuf)> = None;

    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|e| {
            e.into_io_error()
                .map(IngestError::FileRead)
                .unwrap_or_else(|| IngestError::NoDataFiles(dir.to_path_buf()))
        })?;

        if !entry.file_type().is_file() || !is_csv(entry.path()) {
            continue;
        }

        let modified = entry.metadata().ok().and_then(|m| m.modified().ok());
        let modified = modified.unwrap_or(SystemTime::UNIX_EPOCH);
        let path = entry.into_path();
        debug!(path = %path.display(), "Found candidate data file");

        let replace = match &chosen {
            None => true,
            Some((time, current)) => {
                let candidate = (modified, &path);
                let current = (*time, current);
                match selection {
                    DatasetSelection::Oldest => candidate < current,
                    DatasetSelection::Newest => candidate > current,
                }
            }
        };
        if replace {
            chosen = Some((modified, path));
        }
    }

    chosen
        .map(|(_, path)| path)
        .ok_or_else(|| IngestError::NoDataFiles(dir.to_path_buf()))
}

fn is_csv(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}

/// Select and load the dataset file in `dir`.
pub fn load_dataset(dir: &Path, selection: DatasetSelection) -> Result<LoadedDataset> {
    load_dataset_with(dir, selection, &CsvLoader::default())
}

/// Select and load the dataset file in `dir` with a configured loader.
pub fn load_dataset_with(
    dir: &Path,
    selection: DatasetSelection,
    loader: &CsvLoader,
) -> Result<LoadedDataset> {
    let source = find_dataset_file(dir, selection)?;
    info!(source = %source.display(), selection = %selection, "Selected dataset file");

    let dataset = loader.load_path(&source)?;
    Ok(LoadedDataset { source, dataset })
}
