use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use payroll_core::{RateTable, RateTableError, check_windows};

/// Error returned when loading a rate file.
#[derive(Debug, Error)]
pub enum RateFileError {
    #[error("failed to read rate file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse rate file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("rate file contains no [[tables]] entries")]
    Empty,

    #[error("rate table valid from {valid_from} is invalid: {source}")]
    InvalidTable {
        valid_from: NaiveDate,
        #[source]
        source: RateTableError,
    },

    #[error("rate tables conflict: {0}")]
    OverlappingTables(#[source] RateTableError),
}

/// On-disk layout: a list of `[[tables]]`.
#[derive(Debug, Deserialize)]
struct RateFile {
    #[serde(default)]
    tables: Vec<RateTable>,
}

/// Parses rate tables from TOML text, validates each one and rejects
/// validity windows that overlap.
///
/// Decimal fields are written as quoted strings so no precision is lost.
/// `employer_charges`, `provisions` and `bonus` may be omitted to use the
/// standard rates.
pub fn load_from_str(content: &str) -> Result<Vec<RateTable>, RateFileError> {
    let file: RateFile = toml::from_str(content)?;
    if file.tables.is_empty() {
        return Err(RateFileError::Empty);
    }

    for table in &file.tables {
        table
            .validate()
            .map_err(|source| RateFileError::InvalidTable {
                valid_from: table.valid_from,
                source,
            })?;
    }

    check_windows(&file.tables).map_err(RateFileError::OverlappingTables)?;

    debug!(count = file.tables.len(), "loaded rate tables");
    Ok(file.tables)
}

/// Reads and parses a rate file from disk.
pub fn load_from_file(path: &Path) -> Result<Vec<RateTable>, RateFileError> {
    let content = fs::read_to_string(path).map_err(|source| RateFileError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_from_str(&content)
}
