use chrono::NaiveDate;

use super::factors::{
    age_points, employment_points, housing_points, income_points, support_points, HEALTH_POINTS,
};
use crate::dates::{age_in_years, today};
use crate::records::{BeneficiaryRecord, DependentRecord};

#[derive(Debug, Clone, PartialEq)]
pub struct FactorContribution {
    pub label: String,       // e.g. "Income", "Housing", "Dependents"
    pub description: String, // e.g. "850 DH/month", "3 dependents, 2 with a known age"
    pub points: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreResult {
    pub score: u32,
    pub breakdown: Vec<FactorContribution>,
}

/// Priority score of a beneficiary and her dependents, as of today.
pub fn calculate_score<'a, I>(beneficiary: &BeneficiaryRecord, dependents: I) -> ScoreResult
where
    I: IntoIterator<Item = &'a DependentRecord>,
{
    calculate_score_on(beneficiary, dependents, today())
}

/// Priority score with an explicit reference date for dependents' ages.
///
/// Six additive factors: income, employment, housing, social support, the
/// age of each dependent, and a one-off bonus when any dependent is ill or
/// disabled. Missing data scores 0 for its factor; this never fails.
pub fn calculate_score_on<'a, I>(
    beneficiary: &BeneficiaryRecord,
    dependents: I,
    today: NaiveDate,
) -> ScoreResult
where
    I: IntoIterator<Item = &'a DependentRecord>,
{
    let dependents: Vec<&DependentRecord> = dependents.into_iter().collect();
    let mut score: i64 = 0;
    let mut breakdown = Vec::new();

    let mut push = |label: &str, description: String, points: i64| {
        score += points;
        breakdown.push(FactorContribution {
            label: label.to_string(),
            description,
            points: points.max(0) as u32,
        });
    };

    let income = beneficiary.monthly_income;
    push("Income", format!("{} DH/month", income), income_points(income));

    push(
        "Employment",
        beneficiary
            .employment
            .map(|e| e.label())
            .unwrap_or("unset")
            .to_string(),
        employment_points(beneficiary.employment),
    );

    push(
        "Housing",
        beneficiary
            .housing
            .map(|h| h.label())
            .unwrap_or("unset")
            .to_string(),
        housing_points(beneficiary.housing),
    );

    let supported = beneficiary.has_support();
    push(
        "Social support",
        (if supported { "receives support" } else { "no support" }).to_string(),
        support_points(supported),
    );

    // Dependents without a birth date contribute nothing here
    let ages: Vec<i32> = dependents
        .iter()
        .filter_map(|d| d.birth_date)
        .map(|birth| age_in_years(birth, today))
        .collect();
    let age_total: i64 = ages.iter().map(|age| age_points(*age)).sum();
    push(
        "Dependents",
        format!(
            "{} dependents, {} with a known age",
            dependents.len(),
            ages.len()
        ),
        age_total,
    );

    let unwell = dependents.iter().filter(|d| d.has_health_issue()).count();
    let health = if unwell > 0 { HEALTH_POINTS } else { 0 };
    push(
        "Health",
        format!("{} dependents with illness or disability", unwell),
        health,
    );

    ScoreResult {
        score: floor_score(score),
        breakdown,
    }
}

fn floor_score(total: i64) -> u32 {
    u32::try_from(total.max(0)).unwrap_or(u32::MAX)
}
