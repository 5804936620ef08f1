use std::fs;
use std::path::{Path, PathBuf};

use crate::csv_rows::{CsvRowsError, read_flows, read_locations};
use crate::records::Dataset;

/// BIXI Montreal bike-share rides, the demo's default dataset.
pub const DEFAULT_DATA_BASE_URL: &str = "https://gist.githubusercontent.com/ilyabo/68d3dba61d86164b940ffe60e9d36931/raw/a72938b5d51b6df9fa7bba9aa1fb7df00cd0f06a";

pub const LOCATIONS_FILE_NAME: &str = "locations.csv";
pub const FLOWS_FILE_NAME: &str = "flows.csv";

/// Where the two tables of a dataset live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetSource {
    pub base_url: String,
}

impl Default for DatasetSource {
    fn default() -> Self {
        Self::new(DEFAULT_DATA_BASE_URL)
    }
}

impl DatasetSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    pub fn locations_url(&self) -> String {
        self.join(LOCATIONS_FILE_NAME)
    }

    pub fn flows_url(&self) -> String {
        self.join(FLOWS_FILE_NAME)
    }

    fn join(&self, file: &str) -> String {
        format!("{}/{file}", self.base_url.trim_end_matches('/'))
    }
}

#[derive(Debug)]
pub enum DatasetLoadError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        source: CsvRowsError,
    },
}

impl std::fmt::Display for DatasetLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DatasetLoadError::Io { path, source } => {
                write!(f, "failed to read {}: {source}", path.display())
            }
            DatasetLoadError::Parse { path, source } => {
                write!(f, "failed to parse {}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for DatasetLoadError {}

/// Loads both tables from local files.
pub fn load_dataset_files(
    locations: impl AsRef<Path>,
    flows: impl AsRef<Path>,
) -> Result<Dataset, DatasetLoadError> {
    let locations_path = locations.as_ref();
    let flows_path = flows.as_ref();

    let file = open(locations_path)?;
    let locations = read_locations(file).map_err(|e| DatasetLoadError::Parse {
        path: locations_path.to_path_buf(),
        source: e,
    })?;

    let file = open(flows_path)?;
    let flows = read_flows(file).map_err(|e| DatasetLoadError::Parse {
        path: flows_path.to_path_buf(),
        source: e,
    })?;

    Ok(Dataset::new(locations, flows))
}

fn open(path: &Path) -> Result<fs::File, DatasetLoadError> {
    fs::File::open(path).map_err(|e| DatasetLoadError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}
