use crate::records::{EmploymentStatus, HousingType};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RangeOp<T> {
    LessThan(T),
    LessEqual(T),
    Equal(T),
}

impl<T: PartialOrd> RangeOp<T> {
    pub fn matches(&self, value: T) -> bool {
        match self {
            RangeOp::LessThan(n) => value < *n,
            RangeOp::LessEqual(n) => value <= *n,
            RangeOp::Equal(n) => value == *n,
        }
    }
}

/// A range paired with the points it awards. Tables are checked in order;
/// the first matching bucket wins and no match scores 0.
pub type Bucket<T> = (RangeOp<T>, i64);

/// Monthly income (local currency). 2000 itself falls in the 2000-3000 band.
pub const INCOME_BUCKETS: &[Bucket<f64>] = &[
    (RangeOp::Equal(0.0), 10),
    (RangeOp::LessThan(1000.0), 8),
    (RangeOp::LessThan(2000.0), 6),
    (RangeOp::LessEqual(3000.0), 2),
];

/// Age of one dependent in whole years. 15 is still counted.
pub const AGE_BUCKETS: &[Bucket<i32>] = &[
    (RangeOp::LessThan(2), 10),
    (RangeOp::LessThan(6), 8),
    (RangeOp::LessThan(12), 6),
    (RangeOp::LessEqual(15), 4),
];

pub const NO_SUPPORT_POINTS: i64 = 10;
pub const HEALTH_POINTS: i64 = 2;

pub fn bucket_points<T: PartialOrd + Copy>(value: T, buckets: &[Bucket<T>]) -> i64 {
    buckets
        .iter()
        .find(|(range, _)| range.matches(value))
        .map(|(_, points)| *points)
        .unwrap_or(0)
}

pub fn income_points(income: f64) -> i64 {
    bucket_points(income, INCOME_BUCKETS)
}

pub fn age_points(age: i32) -> i64 {
    bucket_points(age, AGE_BUCKETS)
}

pub fn employment_points(status: Option<EmploymentStatus>) -> i64 {
    match status {
        Some(EmploymentStatus::Unemployed) => 5,
        Some(EmploymentStatus::Occasional) => 3,
        Some(EmploymentStatus::Permanent) | Some(EmploymentStatus::Other) | None => 0,
    }
}

pub fn housing_points(housing: Option<HousingType>) -> i64 {
    match housing {
        Some(HousingType::Tenant) => 10,
        Some(HousingType::Precarious) => 8,
        Some(HousingType::FamilyHousing) => 6,
        Some(HousingType::Owner) | Some(HousingType::Other) | None => 0,
    }
}

pub fn support_points(has_support: bool) -> i64 {
    if has_support {
        0
    } else {
        NO_SUPPORT_POINTS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_less_than() {
        let range = RangeOp::LessThan(100);
        assert!(range.matches(50));
        assert!(!range.matches(100));
    }

    #[test]
    fn test_range_less_equal() {
        let range = RangeOp::LessEqual(15);
        assert!(range.matches(15));
        assert!(!range.matches(16));
    }

    #[test]
    fn test_range_equal() {
        let range = RangeOp::Equal(0.0);
        assert!(range.matches(0.0));
        assert!(!range.matches(0.5));
    }

    #[test]
    fn test_income_brackets() {
        assert_eq!(income_points(0.0), 10);
        assert_eq!(income_points(0.01), 8);
        assert_eq!(income_points(999.99), 8);
        assert_eq!(income_points(1000.0), 6);
        assert_eq!(income_points(1999.99), 6);
        assert_eq!(income_points(2000.0), 2);
        assert_eq!(income_points(3000.0), 2);
        assert_eq!(income_points(3000.01), 0);
        assert_eq!(income_points(3001.0), 0);
    }

    #[test]
    fn test_negative_income_scores_as_low_income() {
        assert_eq!(income_points(-50.0), 8);
    }

    #[test]
    fn test_age_brackets() {
        assert_eq!(age_points(0), 10);
        assert_eq!(age_points(1), 10);
        assert_eq!(age_points(2), 8);
        assert_eq!(age_points(5), 8);
        assert_eq!(age_points(6), 6);
        assert_eq!(age_points(11), 6);
        assert_eq!(age_points(12), 4);
        assert_eq!(age_points(15), 4);
        assert_eq!(age_points(16), 0);
    }

    #[test]
    fn test_first_bucket_wins() {
        let buckets: &[Bucket<i32>] = &[(RangeOp::LessThan(10), 1), (RangeOp::LessThan(20), 5)];
        assert_eq!(bucket_points(5, buckets), 1);
        assert_eq!(bucket_points(15, buckets), 5);
        assert_eq!(bucket_points(25, buckets), 0);
    }

    #[test]
    fn test_employment_points() {
        assert_eq!(employment_points(Some(EmploymentStatus::Unemployed)), 5);
        assert_eq!(employment_points(Some(EmploymentStatus::Occasional)), 3);
        assert_eq!(employment_points(Some(EmploymentStatus::Permanent)), 0);
        assert_eq!(employment_points(Some(EmploymentStatus::Other)), 0);
        assert_eq!(employment_points(None), 0);
    }

    #[test]
    fn test_housing_points() {
        assert_eq!(housing_points(Some(HousingType::Tenant)), 10);
        assert_eq!(housing_points(Some(HousingType::Precarious)), 8);
        assert_eq!(housing_points(Some(HousingType::FamilyHousing)), 6);
        assert_eq!(housing_points(Some(HousingType::Owner)), 0);
        assert_eq!(housing_points(Some(HousingType::Other)), 0);
        assert_eq!(housing_points(None), 0);
    }

    #[test]
    fn test_support_points() {
        assert_eq!(support_points(true), 0);
        assert_eq!(support_points(false), 10);
    }
}
