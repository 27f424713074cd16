//! Dependent (orphan) listing with name, city, schooling and age filters.

use chrono::NaiveDate;
use std::collections::HashMap;

use crate::dates::age_in_years;
use crate::records::{BeneficiaryRecord, DependentRecord};
use crate::text::{contains_folded, fold};

#[derive(Debug, Clone, Default)]
pub struct OrphanQuery {
    /// Matched against the dependent's name
    pub search: Option<String>,
    pub city: Option<String>,
    pub schooling: Option<String>,
    /// Inclusive age bounds in whole years
    pub age_min: Option<i32>,
    pub age_max: Option<i32>,
}

impl OrphanQuery {
    fn has_age_bounds(&self) -> bool {
        self.age_min.is_some() || self.age_max.is_some()
    }

    fn matches(&self, dependent: &DependentRecord, age: Option<i32>) -> bool {
        if let Some(needle) = self.search.as_deref() {
            if !contains_folded(&dependent.full_name, needle) {
                return false;
            }
        }
        if !same_folded(dependent.city.as_deref(), self.city.as_deref()) {
            return false;
        }
        if !same_folded(dependent.schooling.as_deref(), self.schooling.as_deref()) {
            return false;
        }

        if !self.has_age_bounds() {
            return true;
        }
        // With an age bound set, an unknown age never matches
        match age {
            Some(age) => {
                age >= self.age_min.unwrap_or(0) && age <= self.age_max.unwrap_or(i32::MAX)
            }
            None => false,
        }
    }
}

fn same_folded(value: Option<&str>, wanted: Option<&str>) -> bool {
    match wanted {
        None => true,
        Some(wanted) => value.is_some_and(|v| fold(v) == fold(wanted)),
    }
}

#[derive(Debug, Clone)]
pub struct OrphanEntry {
    pub dependent: DependentRecord,
    pub age: Option<i32>,
    /// Name of the beneficiary the dependent belongs to, when known
    pub mother_name: Option<String>,
}

/// Filter dependents by `query`, keeping snapshot order.
pub fn list_orphans(
    dependents: &[DependentRecord],
    beneficiaries: &[BeneficiaryRecord],
    query: &OrphanQuery,
    today: NaiveDate,
) -> Vec<OrphanEntry> {
    let mothers: HashMap<&str, &str> = beneficiaries
        .iter()
        .map(|b| (b.id.as_str(), b.full_name.as_str()))
        .collect();

    dependents
        .iter()
        .filter_map(|d| {
            let age = d.birth_date.map(|birth| age_in_years(birth, today));
            query.matches(d, age).then(|| OrphanEntry {
                dependent: d.clone(),
                age,
                mother_name: mothers
                    .get(d.beneficiary_id.as_str())
                    .map(|name| name.to_string()),
            })
        })
        .collect()
}

/// Schooling levels present in the data, first-seen order, blanks skipped
pub fn distinct_schooling(dependents: &[DependentRecord]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for level in dependents.iter().filter_map(|d| d.schooling.as_deref()) {
        if !seen.iter().any(|s| fold(s) == fold(level)) {
            seen.push(level.to_string());
        }
    }
    seen
}
