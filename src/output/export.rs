use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use chrono::NaiveDate;
use std::io::Write;
use std::path::{Path, PathBuf};

use super::formatter::{format_month_amount, format_total, MONTH_LABELS};
use crate::dates::file_stamp;
use crate::matrix::MatrixOutcome;
use crate::roster::RosterEntry;

/// Default export file name: `<stem>_<DD-MM-YYYY>.csv`
pub fn default_export_name(stem: &str, date: NaiveDate) -> PathBuf {
    PathBuf::from(format!("{}_{}.csv", stem, file_stamp(date)))
}

/// Write roster rows as CSV, in display order
pub fn write_roster_csv<W: Write>(writer: W, entries: &[RosterEntry]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record([
        "Score",
        "Tier",
        "Name",
        "National ID",
        "Phone",
        "City",
        "Monthly income",
        "Dependents",
    ])?;

    for entry in entries {
        let b = &entry.beneficiary;
        wtr.write_record([
            entry.result.score.to_string(),
            entry.tier.label().to_string(),
            b.full_name.clone(),
            b.national_id.clone().unwrap_or_default(),
            b.phone.clone().unwrap_or_default(),
            b.city.clone().unwrap_or_default(),
            b.monthly_income.to_string(),
            entry.dependents.to_string(),
        ])?;
    }

    wtr.flush().context("Failed to write roster CSV")?;
    Ok(())
}

/// Write the contribution matrix as CSV. Cells follow the on-screen rules
/// (blank for no payment); the last column is the row currency code.
pub fn write_matrix_csv<W: Write>(writer: W, outcome: &MatrixOutcome) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    let mut header = vec!["Donor".to_string()];
    header.extend(MONTH_LABELS.iter().map(|m| m.to_string()));
    header.push("Total".to_string());
    header.push("Currency".to_string());
    wtr.write_record(&header)?;

    for row in outcome.rows() {
        let mut record = vec![row.donor_name.clone()];
        record.extend(row.months.iter().map(|c| format_month_amount(c.amount)));
        record.push(format_total(row.total));
        record.push(row.currency.code().to_string());
        wtr.write_record(&record)?;
    }

    wtr.flush().context("Failed to write matrix CSV")?;
    Ok(())
}

/// Write an export file atomically; a failed write leaves any existing file untouched
pub fn save_export<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut AtomicWriteFile) -> Result<()>,
{
    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open export file at {}", path.display()))?;

    write(&mut file)?;

    file.commit()
        .with_context(|| format!("Failed to save export to {}", path.display()))?;

    Ok(())
}
