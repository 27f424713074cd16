use chrono::NaiveDate;
use serde::Serialize;

use crate::currency::Currency;
use crate::text::fold;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EmploymentStatus {
    Unemployed,
    Occasional,
    Permanent,
    Other,
}

impl EmploymentStatus {
    /// Parse a storage or English label. Unknown labels map to `Other`.
    pub fn from_label(label: &str) -> Self {
        match fold(label).as_str() {
            "sans emploi" | "unemployed" => EmploymentStatus::Unemployed,
            "emploi occasionnelle" | "emploi occasionnel" | "occasional" => {
                EmploymentStatus::Occasional
            }
            "emploi permanent" | "permanent" => EmploymentStatus::Permanent,
            _ => EmploymentStatus::Other,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EmploymentStatus::Unemployed => "unemployed",
            EmploymentStatus::Occasional => "occasional",
            EmploymentStatus::Permanent => "permanent",
            EmploymentStatus::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HousingType {
    Tenant,
    Precarious,
    FamilyHousing,
    Owner,
    Other,
}

impl HousingType {
    /// Parse a storage or English label. Unknown labels map to `Other`.
    pub fn from_label(label: &str) -> Self {
        match fold(label).as_str() {
            "locataire" | "tenant" => HousingType::Tenant,
            "precaire" | "precarious" => HousingType::Precarious,
            "logement familial" | "family_housing" | "family housing" => {
                HousingType::FamilyHousing
            }
            "proprietaire" | "owner" => HousingType::Owner,
            _ => HousingType::Other,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            HousingType::Tenant => "tenant",
            HousingType::Precarious => "precarious",
            HousingType::FamilyHousing => "family housing",
            HousingType::Owner => "owner",
            HousingType::Other => "other",
        }
    }
}

/// A widow eligible for aid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BeneficiaryRecord {
    pub id: String,
    pub full_name: String,
    pub national_id: Option<String>,
    pub phone: Option<String>,
    pub city: Option<String>,
    /// Always finite; missing or non-numeric values load as 0. Negative values are kept.
    pub monthly_income: f64,
    pub employment: Option<EmploymentStatus>,
    pub housing: Option<HousingType>,
    pub direct_support: bool,
    pub support_amount: f64,
}

impl BeneficiaryRecord {
    /// Receives social support, either flagged directly or through a paid amount
    pub fn has_support(&self) -> bool {
        self.direct_support || self.support_amount > 0.0
    }
}

/// An orphan, linked to exactly one beneficiary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DependentRecord {
    pub id: String,
    pub full_name: String,
    pub beneficiary_id: String,
    pub birth_date: Option<NaiveDate>,
    pub city: Option<String>,
    /// Free-text schooling level as entered ("primaire", "collège", ...)
    pub schooling: Option<String>,
    pub chronic_illness: bool,
    pub disability: bool,
}

impl DependentRecord {
    pub fn has_health_issue(&self) -> bool {
        self.chronic_illness || self.disability
    }
}

/// A donation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionRecord {
    pub id: String,
    pub amount: f64,
    pub currency: Currency,
    /// Grouping key for donor views; never empty when present
    pub donor_name: Option<String>,
    pub nature: Option<String>,
    pub year: Option<i32>,
    pub date: Option<NaiveDate>,
    pub annual: bool,
    /// Month flags, January first. Only meaningful for membership dues.
    pub months: [bool; 12],
}

/// An aid programme that attributions can be booked against.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgramRecord {
    pub id: String,
    pub name: String,
}

/// Aid handed to a beneficiary or to one of her dependents.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AidRecord {
    pub id: String,
    pub amount: f64,
    /// Aid is booked in euros unless the row says otherwise
    pub currency: Currency,
    pub beneficiary_id: Option<String>,
    pub dependent_id: Option<String>,
    pub program_id: Option<String>,
    pub nature: Option<String>,
    /// Aid date, falling back to the row's creation date
    pub date: Option<NaiveDate>,
}

impl AidRecord {
    /// Who received the aid: the beneficiary when set, else the dependent
    pub fn recipient_id(&self) -> Option<&str> {
        self.beneficiary_id
            .as_deref()
            .or(self.dependent_id.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aid_recipient_prefers_beneficiary() {
        let mut aid = AidRecord {
            id: "a1".to_string(),
            amount: 100.0,
            currency: Currency::Euro,
            beneficiary_id: Some("b1".to_string()),
            dependent_id: Some("o1".to_string()),
            program_id: None,
            nature: None,
            date: None,
        };
        assert_eq!(aid.recipient_id(), Some("b1"));
        aid.beneficiary_id = None;
        assert_eq!(aid.recipient_id(), Some("o1"));
        aid.dependent_id = None;
        assert_eq!(aid.recipient_id(), None);
    }

    #[test]
    fn test_employment_from_storage_labels() {
        assert_eq!(
            EmploymentStatus::from_label("Sans emploi"),
            EmploymentStatus::Unemployed
        );
        assert_eq!(
            EmploymentStatus::from_label("Emploi occasionnelle"),
            EmploymentStatus::Occasional
        );
        assert_eq!(
            EmploymentStatus::from_label("Emploi permanent"),
            EmploymentStatus::Permanent
        );
    }

    #[test]
    fn test_employment_from_english_labels() {
        assert_eq!(
            EmploymentStatus::from_label("UNEMPLOYED"),
            EmploymentStatus::Unemployed
        );
        assert_eq!(
            EmploymentStatus::from_label("occasional"),
            EmploymentStatus::Occasional
        );
    }

    #[test]
    fn test_employment_unknown_is_other() {
        assert_eq!(
            EmploymentStatus::from_label("retired"),
            EmploymentStatus::Other
        );
    }

    #[test]
    fn test_housing_labels_ignore_accents() {
        assert_eq!(HousingType::from_label("Précaire"), HousingType::Precarious);
        assert_eq!(HousingType::from_label("precaire"), HousingType::Precarious);
        assert_eq!(HousingType::from_label("Propriétaire"), HousingType::Owner);
        assert_eq!(
            HousingType::from_label("Logement familial"),
            HousingType::FamilyHousing
        );
        assert_eq!(HousingType::from_label("Locataire"), HousingType::Tenant);
        assert_eq!(HousingType::from_label("tent"), HousingType::Other);
    }

    #[test]
    fn test_has_support_from_amount() {
        let beneficiary = BeneficiaryRecord {
            id: "v1".to_string(),
            full_name: "Amina".to_string(),
            national_id: None,
            phone: None,
            city: None,
            monthly_income: 0.0,
            employment: None,
            housing: None,
            direct_support: false,
            support_amount: 300.0,
        };
        assert!(beneficiary.has_support());
    }
}
