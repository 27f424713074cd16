use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use super::raw::{RawAid, RawBeneficiary, RawDependent, RawProgram, RawTransaction};
use super::types::{AidRecord, BeneficiaryRecord, DependentRecord, ProgramRecord, TransactionRecord};

/// Where the table snapshots live.
#[derive(Debug, Clone)]
pub struct SnapshotPaths {
    pub beneficiaries: String,
    pub dependents: String,
    pub transactions: String,
    pub aids: String,
    pub programs: String,
}

impl SnapshotPaths {
    /// Default snapshot names inside a data directory
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            beneficiaries: dir.join("beneficiaries.json").display().to_string(),
            dependents: dir.join("dependents.json").display().to_string(),
            transactions: dir.join("transactions.json").display().to_string(),
            aids: dir.join("aids.json").display().to_string(),
            programs: dir.join("programs.json").display().to_string(),
        }
    }
}

/// Get the default data directory (~/.config/charity-desk/data/)
pub fn get_data_dir() -> PathBuf {
    crate::config::get_config_dir().join("data")
}

pub fn load_beneficiaries(pattern: &str) -> Result<Vec<BeneficiaryRecord>> {
    let rows: Vec<RawBeneficiary> = load_rows(pattern, "beneficiaries")?;
    Ok(rows.into_iter().map(RawBeneficiary::into_record).collect())
}

pub fn load_dependents(pattern: &str) -> Result<Vec<DependentRecord>> {
    let rows: Vec<RawDependent> = load_rows(pattern, "dependents")?;
    Ok(rows.into_iter().map(RawDependent::into_record).collect())
}

pub fn load_transactions(pattern: &str) -> Result<Vec<TransactionRecord>> {
    let rows: Vec<RawTransaction> = load_rows(pattern, "transactions")?;
    Ok(rows.into_iter().map(RawTransaction::into_record).collect())
}

pub fn load_aids(pattern: &str) -> Result<Vec<AidRecord>> {
    let rows: Vec<RawAid> = load_rows(pattern, "aids")?;
    Ok(rows.into_iter().map(RawAid::into_record).collect())
}

pub fn load_programs(pattern: &str) -> Result<Vec<ProgramRecord>> {
    let rows: Vec<RawProgram> = load_rows(pattern, "programs")?;
    Ok(rows.into_iter().map(RawProgram::into_record).collect())
}

/// Resolve a path or glob pattern to the snapshot files it names, sorted.
///
/// A plain path that does not exist is an error; a pattern that matches
/// nothing is too, since an empty table is written as `[]`, never omitted.
pub fn resolve_snapshot_files(pattern: &str) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = glob::glob(pattern)
        .with_context(|| format!("Invalid snapshot path pattern '{}'", pattern))?
        .filter_map(|entry| match entry {
            Ok(path) => Some(path),
            Err(e) => {
                warn!("Skipping unreadable snapshot path: {}", e);
                None
            }
        })
        .collect();

    if files.is_empty() {
        anyhow::bail!("No snapshot file found at {}", pattern);
    }

    files.sort();
    Ok(files)
}

/// Load and concatenate the rows of every snapshot file matching `pattern`.
///
/// Each file must hold a JSON array. Elements that are not objects, or whose
/// fields cannot be read at all, are skipped with a warning.
fn load_rows<T: DeserializeOwned>(pattern: &str, table: &str) -> Result<Vec<T>> {
    let mut rows = Vec::new();

    for path in resolve_snapshot_files(pattern)? {
        let file = File::open(&path)
            .with_context(|| format!("Failed to open {} snapshot at {}", table, path.display()))?;
        let values: Vec<Value> = serde_json::from_reader(BufReader::new(file)).with_context(|| {
            format!(
                "Failed to parse {} snapshot: expected a JSON array in {}",
                table,
                path.display()
            )
        })?;

        let total = values.len();
        for (i, value) in values.into_iter().enumerate() {
            if !value.is_object() {
                warn!("{}[{}] in {} is not an object, skipped", table, i, path.display());
                continue;
            }
            match serde_json::from_value::<T>(value) {
                Ok(row) => rows.push(row),
                Err(e) => warn!("{}[{}] in {} skipped: {}", table, i, path.display(), e),
            }
        }
        debug!("Loaded {} {} rows from {}", total, table, path.display());
    }

    Ok(rows)
}
