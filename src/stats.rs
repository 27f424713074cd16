//! Dashboard figures over the donations and aid tables.

use chrono::{Datelike, NaiveDate};
use std::collections::{HashMap, HashSet};

use crate::currency::{convert, Currency};
use crate::matrix::UNKNOWN_DONOR;
use crate::records::{
    AidRecord, BeneficiaryRecord, DependentRecord, ProgramRecord, TransactionRecord,
};

#[derive(Debug, Clone, PartialEq)]
pub struct LastDonation {
    pub amount: f64,
    pub currency: Currency,
    pub date: NaiveDate,
    pub days_ago: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DonationStats {
    /// Currency every total is expressed in
    pub currency: Currency,
    pub year: i32,
    pub total_year: f64,
    pub total_last_year: f64,
    /// Rounded percentage change against last year, None when last year is empty
    pub change_percent: Option<i64>,
    pub active_donors: usize,
    pub donors_this_month: usize,
    pub last_donation: Option<LastDonation>,
}

impl DonationStats {
    pub fn compute(transactions: &[TransactionRecord], today: NaiveDate, currency: Currency) -> Self {
        let year = today.year();
        let total_for = |y: i32| -> f64 {
            transactions
                .iter()
                .filter(|t| t.year == Some(y))
                .map(|t| convert(t.amount, t.currency, currency))
                .sum()
        };
        let total_year = total_for(year);
        let total_last_year = total_for(year - 1);

        let change_percent = (total_last_year > 0.0)
            .then(|| ((total_year - total_last_year) / total_last_year * 100.0).round() as i64);

        let active_donors: HashSet<&str> = transactions
            .iter()
            .filter(|t| t.amount > 0.0)
            .filter_map(|t| t.donor_name.as_deref())
            .collect();

        let donors_this_month: HashSet<&str> = transactions
            .iter()
            .filter(|t| {
                t.date
                    .is_some_and(|d| d.year() == year && d.month() == today.month())
            })
            .map(|t| t.donor_name.as_deref().unwrap_or(UNKNOWN_DONOR))
            .collect();

        let last_donation = transactions
            .iter()
            .filter_map(|t| t.date.map(|date| (t, date)))
            .max_by_key(|(_, date)| *date)
            .map(|(t, date)| LastDonation {
                amount: t.amount,
                currency: t.currency,
                date,
                days_ago: (today - date).num_days().abs(),
            });

        Self {
            currency,
            year,
            total_year,
            total_last_year,
            change_percent,
            active_donors: active_donors.len(),
            donors_this_month: donors_this_month.len(),
            last_donation,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DonorTotal {
    pub donor_name: String,
    pub total: f64,
}

/// Cumulative giving per donor in `currency`, largest first.
///
/// Donors with equal totals keep the order in which they first appear.
pub fn rank_donors(transactions: &[TransactionRecord], currency: Currency) -> Vec<DonorTotal> {
    let mut totals: Vec<DonorTotal> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for t in transactions {
        let name = t.donor_name.as_deref().unwrap_or(UNKNOWN_DONOR);
        let idx = *index.entry(name).or_insert_with(|| {
            totals.push(DonorTotal {
                donor_name: name.to_string(),
                total: 0.0,
            });
            totals.len() - 1
        });
        totals[idx].total += convert(t.amount, t.currency, currency);
    }

    totals.sort_by(|a, b| b.total.partial_cmp(&a.total).unwrap_or(std::cmp::Ordering::Equal));
    totals
}

#[derive(Debug, Clone, PartialEq)]
pub struct LastAid {
    pub amount: f64,
    pub currency: Currency,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AidStats {
    pub currency: Currency,
    pub year: i32,
    /// Aid attributed during `year`, converted into `currency`
    pub total_year: f64,
    /// Distinct recipients (beneficiary or dependent) with a positive amount
    pub active_recipients: usize,
    pub last_aid: Option<LastAid>,
}

impl AidStats {
    pub fn compute(aids: &[AidRecord], today: NaiveDate, currency: Currency) -> Self {
        let year = today.year();

        let total_year = aids
            .iter()
            .filter(|a| a.date.is_some_and(|d| d.year() == year))
            .map(|a| convert(a.amount, a.currency, currency))
            .sum();

        let active: HashSet<&str> = aids
            .iter()
            .filter(|a| a.amount > 0.0)
            .filter_map(AidRecord::recipient_id)
            .collect();

        let last_aid = aids
            .iter()
            .filter_map(|a| a.date.map(|date| (a, date)))
            .max_by_key(|(_, date)| *date)
            .map(|(a, date)| LastAid {
                amount: a.amount,
                currency: a.currency,
                date,
            });

        Self {
            currency,
            year,
            total_year,
            active_recipients: active.len(),
            last_aid,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecipientKind {
    Widow,
    Orphan,
}

impl RecipientKind {
    pub fn label(&self) -> &'static str {
        match self {
            RecipientKind::Widow => "widow",
            RecipientKind::Orphan => "orphan",
        }
    }
}

/// One line of the attribution history
#[derive(Debug, Clone, PartialEq)]
pub struct AidEntry {
    pub aid: AidRecord,
    /// Nature of the aid, else its programme's name, else "unknown"
    pub label: String,
    pub recipient_kind: RecipientKind,
    pub recipient_name: Option<String>,
}

/// Most recent attributions first (undated rows last), at most `limit` of them
pub fn recent_aids(
    aids: &[AidRecord],
    programs: &[ProgramRecord],
    beneficiaries: &[BeneficiaryRecord],
    dependents: &[DependentRecord],
    limit: usize,
) -> Vec<AidEntry> {
    let program_names: HashMap<&str, &str> =
        programs.iter().map(|p| (p.id.as_str(), p.name.as_str())).collect();
    let widows: HashMap<&str, &str> = beneficiaries
        .iter()
        .map(|b| (b.id.as_str(), b.full_name.as_str()))
        .collect();
    let orphans: HashMap<&str, &str> = dependents
        .iter()
        .map(|d| (d.id.as_str(), d.full_name.as_str()))
        .collect();

    let mut sorted: Vec<&AidRecord> = aids.iter().collect();
    // Stable, so same-day rows keep snapshot order
    sorted.sort_by(|a, b| b.date.cmp(&a.date));

    sorted
        .into_iter()
        .take(limit)
        .map(|aid| {
            let label = aid
                .nature
                .clone()
                .or_else(|| {
                    aid.program_id
                        .as_deref()
                        .and_then(|id| program_names.get(id))
                        .map(|name| name.to_string())
                })
                .unwrap_or_else(|| "unknown".to_string());
            let (recipient_kind, recipient_name) = match aid.beneficiary_id.as_deref() {
                Some(id) => (RecipientKind::Widow, widows.get(id)),
                None => (
                    RecipientKind::Orphan,
                    aid.dependent_id.as_deref().and_then(|id| orphans.get(id)),
                ),
            };
            AidEntry {
                aid: aid.clone(),
                label,
                recipient_kind,
                recipient_name: recipient_name.map(|name| name.to_string()),
            }
        })
        .collect()
}
