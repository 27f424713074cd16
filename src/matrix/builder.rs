use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

use super::nature::is_membership_dues;
use crate::currency::Currency;
use crate::records::TransactionRecord;

/// Donor name used when a donation carries none.
pub const UNKNOWN_DONOR: &str = "unknown";

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct MonthCell {
    pub amount: f64,
    pub currency: Currency,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContributionRow {
    pub donor_name: String,
    /// January first
    pub months: [MonthCell; 12],
    pub total: f64,
    /// Currency of the first non-empty month, local currency if all are empty
    pub currency: Currency,
}

/// Result of rolling up one year of membership dues.
///
/// `NoData` is a normal outcome, reported to the user as such.
#[derive(Debug, Clone, PartialEq)]
pub enum MatrixOutcome {
    NoData { year: i32 },
    Rows(Vec<ContributionRow>),
}

impl MatrixOutcome {
    pub fn rows(&self) -> &[ContributionRow] {
        match self {
            MatrixOutcome::NoData { .. } => &[],
            MatrixOutcome::Rows(rows) => rows,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, MatrixOutcome::NoData { .. })
    }
}

/// Month indices a membership payment covers.
///
/// Annual payments cover the whole year, otherwise the flagged months; a
/// payment with no flags at all is booked to January.
pub fn target_months(transaction: &TransactionRecord) -> Vec<usize> {
    if transaction.annual {
        return (0..12).collect();
    }
    let flagged: Vec<usize> = transaction
        .months
        .iter()
        .enumerate()
        .filter(|(_, set)| **set)
        .map(|(idx, _)| idx)
        .collect();
    if flagged.is_empty() {
        vec![0]
    } else {
        flagged
    }
}

/// Roll membership dues for `year` into one row per donor.
///
/// Each payment is split evenly across the months it covers. Rows keep the
/// order in which donors first appear. Amounts are not converted: a cell
/// takes the currency of the last payment written to it.
pub fn build_matrix(transactions: &[TransactionRecord], year: i32) -> MatrixOutcome {
    let dues: Vec<&TransactionRecord> = transactions
        .iter()
        .filter(|t| t.year == Some(year) && is_membership_dues(t.nature.as_deref()))
        .collect();

    debug!(
        "{} of {} transactions are membership dues for {}",
        dues.len(),
        transactions.len(),
        year
    );

    if dues.is_empty() {
        return MatrixOutcome::NoData { year };
    }

    let mut rows: Vec<ContributionRow> = Vec::new();
    let mut index_by_donor: HashMap<&str, usize> = HashMap::new();

    for transaction in dues {
        let name = transaction.donor_name.as_deref().unwrap_or(UNKNOWN_DONOR);
        let idx = *index_by_donor.entry(name).or_insert_with(|| {
            rows.push(ContributionRow {
                donor_name: name.to_string(),
                months: [MonthCell::default(); 12],
                total: 0.0,
                currency: Currency::default(),
            });
            rows.len() - 1
        });

        let months = target_months(transaction);
        let share = transaction.amount / months.len() as f64;
        for month in months {
            let cell = &mut rows[idx].months[month];
            cell.amount += share;
            cell.currency = transaction.currency;
        }
    }

    for row in &mut rows {
        row.total = row.months.iter().map(|cell| cell.amount).sum();
        row.currency = row
            .months
            .iter()
            .find(|cell| cell.amount != 0.0)
            .map(|cell| cell.currency)
            .unwrap_or_default();
    }

    MatrixOutcome::Rows(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dues(donor: &str, amount: f64, currency: Currency, year: i32) -> TransactionRecord {
        TransactionRecord {
            id: format!("{}-{}", donor, amount),
            amount,
            currency,
            donor_name: Some(donor.to_string()),
            nature: Some("Adhésion".to_string()),
            year: Some(year),
            date: None,
            annual: false,
            months: [false; 12],
        }
    }

    fn only_row(outcome: &MatrixOutcome) -> &ContributionRow {
        let rows = outcome.rows();
        assert_eq!(rows.len(), 1);
        &rows[0]
    }

    #[test]
    fn test_annual_payment_spread_over_year() {
        let mut t = dues("Said", 1200.0, Currency::Euro, 2024);
        t.annual = true;

        let outcome = build_matrix(&[t], 2024);
        let row = only_row(&outcome);
        assert!(row.months.iter().all(|cell| cell.amount == 100.0));
        assert!(row.months.iter().all(|cell| cell.currency == Currency::Euro));
        assert_eq!(row.total, 1200.0);
        assert_eq!(row.currency, Currency::Euro);
    }

    #[test]
    fn test_no_flags_books_to_january() {
        let t = dues("Said", 600.0, Currency::Dirham, 2024);

        let outcome = build_matrix(&[t], 2024);
        let row = only_row(&outcome);
        assert_eq!(row.months[0].amount, 600.0);
        assert!(row.months[1..].iter().all(|cell| cell.amount == 0.0));
        assert_eq!(row.total, 600.0);
    }

    #[test]
    fn test_flagged_months_split_evenly() {
        let mut t = dues("Said", 300.0, Currency::Dirham, 2024);
        t.months[2] = true;
        t.months[5] = true;
        t.months[8] = true;

        let outcome = build_matrix(&[t], 2024);
        let row = only_row(&outcome);
        assert_eq!(row.months[2].amount, 100.0);
        assert_eq!(row.months[5].amount, 100.0);
        assert_eq!(row.months[8].amount, 100.0);
        assert_eq!(row.months[0].amount, 0.0);
        assert_eq!(row.total, 300.0);
    }

    #[test]
    fn test_annual_flag_overrides_month_flags() {
        let mut t = dues("Said", 120.0, Currency::Dirham, 2024);
        t.annual = true;
        t.months[3] = true;

        assert_eq!(target_months(&t).len(), 12);
    }

    #[test]
    fn test_other_natures_excluded() {
        let mut t = dues("Said", 5000.0, Currency::Dirham, 2024);
        t.nature = Some("Donation".to_string());

        assert_eq!(build_matrix(&[t], 2024), MatrixOutcome::NoData { year: 2024 });
    }

    #[test]
    fn test_missing_nature_counts_as_dues() {
        let mut t = dues("Said", 50.0, Currency::Dirham, 2024);
        t.nature = None;

        let outcome = build_matrix(&[t], 2024);
        assert_eq!(only_row(&outcome).total, 50.0);
    }

    #[test]
    fn test_empty_input_is_no_data() {
        let outcome = build_matrix(&[], 2024);
        assert_eq!(outcome, MatrixOutcome::NoData { year: 2024 });
        assert!(outcome.is_empty());
        assert!(outcome.rows().is_empty());
    }

    #[test]
    fn test_year_mismatch_is_no_data() {
        let t = dues("Said", 100.0, Currency::Dirham, 2023);
        assert_eq!(build_matrix(&[t], 2024), MatrixOutcome::NoData { year: 2024 });
    }

    #[test]
    fn test_missing_year_excluded() {
        let mut t = dues("Said", 100.0, Currency::Dirham, 2024);
        t.year = None;
        assert!(build_matrix(&[t], 2024).is_empty());
    }

    #[test]
    fn test_groups_by_donor_in_first_seen_order() {
        let transactions = vec![
            dues("Zineb", 10.0, Currency::Dirham, 2024),
            dues("Ahmed", 20.0, Currency::Dirham, 2024),
            dues("Zineb", 5.0, Currency::Dirham, 2024),
        ];

        let outcome = build_matrix(&transactions, 2024);
        let rows = outcome.rows();
        let names: Vec<&str> = rows.iter().map(|r| r.donor_name.as_str()).collect();
        assert_eq!(names, vec!["Zineb", "Ahmed"]);
        assert_eq!(rows[0].months[0].amount, 15.0);
        assert_eq!(rows[0].total, 15.0);
        assert_eq!(rows[1].total, 20.0);
    }

    #[test]
    fn test_missing_donor_grouped_as_unknown() {
        let mut a = dues("x", 10.0, Currency::Dirham, 2024);
        a.donor_name = None;
        let mut b = dues("y", 30.0, Currency::Dirham, 2024);
        b.donor_name = None;

        let outcome = build_matrix(&[a, b], 2024);
        let row = only_row(&outcome);
        assert_eq!(row.donor_name, UNKNOWN_DONOR);
        assert_eq!(row.total, 40.0);
    }

    #[test]
    fn test_last_currency_wins_per_cell() {
        let a = dues("Said", 100.0, Currency::Dirham, 2024);
        let b = dues("Said", 10.0, Currency::Euro, 2024);

        let outcome = build_matrix(&[a, b], 2024);
        let row = only_row(&outcome);
        // No conversion inside the matrix
        assert_eq!(row.months[0].amount, 110.0);
        assert_eq!(row.months[0].currency, Currency::Euro);
    }

    #[test]
    fn test_row_currency_from_first_non_empty_month() {
        let mut march = dues("Said", 30.0, Currency::Euro, 2024);
        march.months[2] = true;
        let mut june = dues("Said", 300.0, Currency::Dirham, 2024);
        june.months[5] = true;

        let outcome = build_matrix(&[june, march], 2024);
        assert_eq!(only_row(&outcome).currency, Currency::Euro);
    }

    #[test]
    fn test_zero_amount_row_uses_default_currency() {
        let t = dues("Said", 0.0, Currency::Euro, 2024);

        let outcome = build_matrix(&[t], 2024);
        let row = only_row(&outcome);
        assert_eq!(row.total, 0.0);
        assert_eq!(row.currency, Currency::Dirham);
    }

    #[test]
    fn test_uneven_split_keeps_precision() {
        let mut t = dues("Said", 100.0, Currency::Dirham, 2024);
        t.months[0] = true;
        t.months[1] = true;
        t.months[2] = true;

        let outcome = build_matrix(&[t], 2024);
        let row = only_row(&outcome);
        assert!((row.months[0].amount - 33.333_333).abs() < 1e-4);
        assert!((row.total - 100.0).abs() < 1e-9);
    }
}
