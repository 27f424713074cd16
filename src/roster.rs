//! Scored beneficiary listing: search, city filter, sort and pagination.

use chrono::NaiveDate;
use clap::ValueEnum;
use std::cmp::Ordering;
use std::collections::HashMap;

use crate::records::{BeneficiaryRecord, DependentRecord};
use crate::scoring::{calculate_score_on, PriorityConfig, PriorityTier, ScoreResult};
use crate::text::{contains_folded, fold};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SortField {
    #[default]
    Priority,
    Name,
    City,
    Income,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// What to show from the roster. Passed explicitly to every listing call.
#[derive(Debug, Clone, Default)]
pub struct RosterQuery {
    /// Matched against name, national id and phone
    pub search: Option<String>,
    pub city: Option<String>,
    pub sort_by: SortField,
    pub order: SortOrder,
}

impl RosterQuery {
    fn matches(&self, beneficiary: &BeneficiaryRecord) -> bool {
        let search_ok = match self.search.as_deref() {
            None => true,
            Some(needle) => {
                contains_folded(&beneficiary.full_name, needle)
                    || beneficiary
                        .national_id
                        .as_deref()
                        .is_some_and(|id| contains_folded(id, needle))
                    || beneficiary
                        .phone
                        .as_deref()
                        .is_some_and(|phone| contains_folded(phone, needle))
            }
        };

        let city_ok = match self.city.as_deref() {
            None => true,
            Some(city) => beneficiary
                .city
                .as_deref()
                .is_some_and(|c| fold(c) == fold(city)),
        };

        search_ok && city_ok
    }
}

#[derive(Debug, Clone)]
pub struct RosterEntry {
    pub beneficiary: BeneficiaryRecord,
    pub dependents: usize,
    pub result: ScoreResult,
    pub tier: PriorityTier,
}

/// Score every beneficiary matching `query` and sort the result.
///
/// Dependents are attached by their owning beneficiary id. Sorting is stable,
/// so ties keep the snapshot order.
pub fn build_roster(
    beneficiaries: &[BeneficiaryRecord],
    dependents: &[DependentRecord],
    query: &RosterQuery,
    priority: &PriorityConfig,
    today: NaiveDate,
) -> Vec<RosterEntry> {
    let by_beneficiary = group_dependents(dependents);

    let mut entries: Vec<RosterEntry> = beneficiaries
        .iter()
        .filter(|b| query.matches(b))
        .map(|b| {
            let own = by_beneficiary
                .get(b.id.as_str())
                .map(Vec::as_slice)
                .unwrap_or_default();
            let result = calculate_score_on(b, own.iter().copied(), today);
            let tier = priority.tier_for(result.score);
            RosterEntry {
                beneficiary: b.clone(),
                dependents: own.len(),
                result,
                tier,
            }
        })
        .collect();

    entries.sort_by(|a, b| {
        let ord = compare(a, b, query.sort_by);
        match query.order {
            SortOrder::Asc => ord,
            SortOrder::Desc => ord.reverse(),
        }
    });

    entries
}

fn compare(a: &RosterEntry, b: &RosterEntry, field: SortField) -> Ordering {
    match field {
        SortField::Priority => a.result.score.cmp(&b.result.score),
        SortField::Name => fold(&a.beneficiary.full_name).cmp(&fold(&b.beneficiary.full_name)),
        SortField::City => {
            let city = |e: &RosterEntry| e.beneficiary.city.as_deref().map(fold).unwrap_or_default();
            city(a).cmp(&city(b))
        }
        SortField::Income => a
            .beneficiary
            .monthly_income
            .partial_cmp(&b.beneficiary.monthly_income)
            .unwrap_or(Ordering::Equal),
    }
}

/// Index dependents by the beneficiary they belong to
pub fn group_dependents(dependents: &[DependentRecord]) -> HashMap<&str, Vec<&DependentRecord>> {
    let mut grouped: HashMap<&str, Vec<&DependentRecord>> = HashMap::new();
    for dependent in dependents {
        grouped
            .entry(dependent.beneficiary_id.as_str())
            .or_default()
            .push(dependent);
    }
    grouped
}

/// Cities present in the roster, in first-seen order, for filter choices
pub fn distinct_cities(beneficiaries: &[BeneficiaryRecord]) -> Vec<String> {
    let mut seen = Vec::<String>::new();
    for city in beneficiaries.iter().filter_map(|b| b.city.as_deref()) {
        if !seen.iter().any(|s| fold(s) == fold(city)) {
            seen.push(city.to_string());
        }
    }
    seen
}

/// Page cursor over a listing. Out-of-range moves are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pagination {
    pub total_items: usize,
    pub per_page: usize,
    pub current_page: usize,
}

impl Pagination {
    pub fn new(total_items: usize, per_page: usize) -> Self {
        Self {
            total_items,
            per_page: per_page.max(1),
            current_page: 1,
        }
    }

    pub fn total_pages(&self) -> usize {
        self.total_items.div_ceil(self.per_page)
    }

    /// Index of the first item on the current page
    pub fn offset(&self) -> usize {
        (self.current_page - 1) * self.per_page
    }

    pub fn next_page(&mut self) {
        if self.current_page < self.total_pages() {
            self.current_page += 1;
        }
    }

    pub fn prev_page(&mut self) {
        if self.current_page > 1 {
            self.current_page -= 1;
        }
    }

    /// Returns false (and stays put) when `page` is out of range
    pub fn go_to_page(&mut self, page: usize) -> bool {
        if page >= 1 && page <= self.total_pages() {
            self.current_page = page;
            true
        } else {
            false
        }
    }

    pub fn page_of<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let start = self.offset().min(items.len());
        let end = (start + self.per_page).min(items.len());
        &items[start..end]
    }
}
