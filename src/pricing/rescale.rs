//! Price rescaling
//!
//! Rewrites every price-like field of a JSON document by a flat factor.
//! A field is price-like when its key contains "price" in any case.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;

/// Suffix appended to a data file's name for its backup copy
pub const BACKUP_SUFFIX: &str = ".bak";

#[derive(Debug, Error)]
pub enum RescaleError {
    #[error("file not found: {0}")]
    NotFound(PathBuf),
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to write backup {path}: {source}")]
    Backup {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize {path}: {source}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result of processing one file
#[derive(Debug)]
pub enum FileOutcome {
    Updated { path: PathBuf, count: usize },
    Missing { path: PathBuf },
    Failed { path: PathBuf, error: RescaleError },
}

impl FileOutcome {
    pub fn path(&self) -> &Path {
        match self {
            FileOutcome::Updated { path, .. } => path,
            FileOutcome::Missing { path } => path,
            FileOutcome::Failed { path, .. } => path,
        }
    }
}

/// Summary of a rescaling run
#[derive(Debug, Default)]
pub struct RescaleReport {
    pub outcomes: Vec<FileOutcome>,
    /// Fields rewritten across every processed file
    pub total: usize,
}

impl RescaleReport {
    pub fn updated_files(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, FileOutcome::Updated { .. }))
            .count()
    }
}

/// Rescale every price-like field under `value`, returning how many were
/// rewritten.
pub fn rescale_prices(value: &mut Value, factor: f64) -> usize {
    match value {
        Value::Array(items) => items.iter_mut().map(|item| rescale_prices(item, factor)).sum(),
        Value::Object(map) => {
            let mut count = 0;
            for (key, field) in map.iter_mut() {
                if is_price_key(key) {
                    if let Some(scaled) = scale_field(field, factor) {
                        *field = scaled;
                        count += 1;
                        continue;
                    }
                }
                if field.is_object() || field.is_array() {
                    count += rescale_prices(field, factor);
                }
            }
            count
        }
        _ => 0,
    }
}

pub fn is_price_key(key: &str) -> bool {
    key.to_lowercase().contains("price")
}

/// Round to two decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Parse a price written as text, e.g. "1,000 coins".
///
/// Everything but digits, '-' and '.' is dropped before parsing.
pub fn parse_price_text(text: &str) -> Option<f64> {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '-' || *c == '.')
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|n| n.is_finite())
}

fn scale_field(field: &Value, factor: f64) -> Option<Value> {
    let amount = match field {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => parse_price_text(s)?,
        _ => return None,
    };
    to_json_number(round2(amount * factor))
}

/// Whole values become JSON integers so `10.0` is written as `10`
fn to_json_number(value: f64) -> Option<Value> {
    const MAX_EXACT: f64 = 9_007_199_254_740_992.0;

    if !value.is_finite() {
        return None;
    }
    if value.fract() == 0.0 && value.abs() < MAX_EXACT {
        return Some(Value::from(value as i64));
    }
    serde_json::Number::from_f64(value).map(Value::Number)
}

/// `armour.json` -> `armour.json.bak`
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(BACKUP_SUFFIX);
    PathBuf::from(name)
}

/// Back up and rewrite one file, returning the number of fields rewritten.
///
/// The original bytes are written to the backup path before the file is
/// touched; if the backup fails the file is left alone.
pub fn rescale_file(path: &Path, factor: f64) -> Result<usize, RescaleError> {
    if !path.exists() {
        return Err(RescaleError::NotFound(path.to_path_buf()));
    }

    let raw = fs::read(path).map_err(|source| RescaleError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let mut data: Value = serde_json::from_slice(&raw).map_err(|source| RescaleError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    let backup = backup_path(path);
    fs::write(&backup, &raw).map_err(|source| RescaleError::Backup { path: backup, source })?;

    let count = rescale_prices(&mut data, factor);

    let mut output = serde_json::to_string_pretty(&data).map_err(|source| RescaleError::Serialize {
        path: path.to_path_buf(),
        source,
    })?;
    output.push('\n');
    fs::write(path, output).map_err(|source| RescaleError::Write {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(count)
}

/// Process each file independently; failures are logged and skipped.
pub fn rescale_files(paths: &[PathBuf], factor: f64) -> RescaleReport {
    let mut report = RescaleReport::default();

    for path in paths {
        let outcome = match rescale_file(path, factor) {
            Ok(count) => {
                let file_name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string());
                log::info!("Updated {} price-like fields in {}", count, file_name);
                report.total += count;
                FileOutcome::Updated { path: path.clone(), count }
            }
            Err(RescaleError::NotFound(path)) => {
                log::warn!("File not found: {}", path.display());
                FileOutcome::Missing { path }
            }
            Err(error) => {
                log::error!("Skipping {}: {}", path.display(), error);
                FileOutcome::Failed { path: path.clone(), error }
            }
        };
        report.outcomes.push(outcome);
    }

    log::info!("Total updated fields: {}", report.total);
    report
}
