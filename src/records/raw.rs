//! Loose table rows as the store exports them, and their conversion into
//! typed records.
//!
//! Every field is optional and loosely typed here. Defaulting happens in the
//! `into_record` conversions so that nothing downstream has to guess.

use chrono::{Datelike, NaiveDate};
use serde::Deserialize;
use serde_json::Value;

use super::types::{
    AidRecord, BeneficiaryRecord, DependentRecord, EmploymentStatus, HousingType, ProgramRecord,
    TransactionRecord,
};
use crate::currency::Currency;
use crate::dates::parse_date;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawBeneficiary {
    pub id: Option<Value>,
    #[serde(alias = "nom_complet")]
    pub full_name: Option<String>,
    #[serde(alias = "numero_identification")]
    pub national_id: Option<String>,
    #[serde(alias = "telephone")]
    pub phone: Option<String>,
    #[serde(alias = "ville")]
    pub city: Option<String>,
    #[serde(alias = "revenu_mensuel")]
    pub monthly_income: Option<Value>,
    #[serde(alias = "situation_professionnelle")]
    pub employment: Option<String>,
    #[serde(alias = "type_logement")]
    pub housing: Option<String>,
    #[serde(alias = "soutien_social_direct")]
    pub direct_support: Option<Value>,
    #[serde(alias = "montant_soutien_social")]
    pub support_amount: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawDependent {
    pub id: Option<Value>,
    #[serde(alias = "nom_complet")]
    pub full_name: Option<String>,
    #[serde(alias = "id_mere")]
    pub beneficiary_id: Option<Value>,
    #[serde(alias = "date_naissance")]
    pub birth_date: Option<String>,
    #[serde(alias = "ville")]
    pub city: Option<String>,
    #[serde(alias = "niveau_scolaire")]
    pub schooling: Option<String>,
    #[serde(alias = "maladie_chronique")]
    pub chronic_illness: Option<Value>,
    #[serde(alias = "handicap")]
    pub disability: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawTransaction {
    pub id: Option<Value>,
    #[serde(alias = "montant")]
    pub amount: Option<Value>,
    #[serde(alias = "devise")]
    pub currency: Option<String>,
    #[serde(alias = "nom_donateur")]
    pub donor_name: Option<String>,
    #[serde(alias = "nature_don")]
    pub nature: Option<String>,
    #[serde(alias = "annee_don")]
    pub year: Option<Value>,
    #[serde(alias = "date_don")]
    pub date: Option<String>,
    #[serde(alias = "adhesion_annuelle")]
    pub annual: Option<Value>,
    #[serde(alias = "adhesion_jan")]
    pub jan: Option<Value>,
    #[serde(alias = "adhesion_feb")]
    pub feb: Option<Value>,
    #[serde(alias = "adhesion_mar")]
    pub mar: Option<Value>,
    #[serde(alias = "adhesion_apr")]
    pub apr: Option<Value>,
    #[serde(alias = "adhesion_may")]
    pub may: Option<Value>,
    #[serde(alias = "adhesion_jun")]
    pub jun: Option<Value>,
    #[serde(alias = "adhesion_jul")]
    pub jul: Option<Value>,
    #[serde(alias = "adhesion_aug")]
    pub aug: Option<Value>,
    #[serde(alias = "adhesion_sep")]
    pub sep: Option<Value>,
    #[serde(alias = "adhesion_oct")]
    pub oct: Option<Value>,
    #[serde(alias = "adhesion_nov")]
    pub nov: Option<Value>,
    #[serde(alias = "adhesion_dec")]
    pub dec: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawAid {
    pub id: Option<Value>,
    #[serde(alias = "montant")]
    pub amount: Option<Value>,
    #[serde(alias = "devise")]
    pub currency: Option<String>,
    #[serde(alias = "id_veuve")]
    pub beneficiary_id: Option<Value>,
    #[serde(alias = "id_orphelin")]
    pub dependent_id: Option<Value>,
    #[serde(alias = "id_programme")]
    pub program_id: Option<Value>,
    #[serde(alias = "nature_aide")]
    pub nature: Option<String>,
    #[serde(alias = "date_aide")]
    pub date: Option<String>,
    pub created_at: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawProgram {
    pub id: Option<Value>,
    #[serde(alias = "nom_programme")]
    pub name: Option<String>,
}

impl RawBeneficiary {
    pub fn into_record(self) -> BeneficiaryRecord {
        BeneficiaryRecord {
            id: loose_id(self.id.as_ref()),
            full_name: self.full_name.unwrap_or_default().trim().to_string(),
            national_id: non_empty(self.national_id),
            phone: non_empty(self.phone),
            city: non_empty(self.city),
            // Negative incomes are kept as entered and scored like any income under 1000
            monthly_income: loose_number(self.monthly_income.as_ref()).unwrap_or(0.0),
            employment: non_empty(self.employment).map(|s| EmploymentStatus::from_label(&s)),
            housing: non_empty(self.housing).map(|s| HousingType::from_label(&s)),
            direct_support: loose_bool(self.direct_support.as_ref()),
            support_amount: loose_amount(self.support_amount.as_ref()),
        }
    }
}

impl RawDependent {
    pub fn into_record(self) -> DependentRecord {
        DependentRecord {
            id: loose_id(self.id.as_ref()),
            full_name: self.full_name.unwrap_or_default().trim().to_string(),
            beneficiary_id: loose_id(self.beneficiary_id.as_ref()),
            birth_date: self.birth_date.as_deref().and_then(parse_date),
            city: non_empty(self.city),
            schooling: non_empty(self.schooling),
            chronic_illness: loose_bool(self.chronic_illness.as_ref()),
            disability: loose_bool(self.disability.as_ref()),
        }
    }
}

impl RawTransaction {
    pub fn into_record(self) -> TransactionRecord {
        let date: Option<NaiveDate> = self.date.as_deref().and_then(parse_date);
        // Rows saved without a year fall back to the donation date's year
        let year = loose_year(self.year.as_ref()).or_else(|| date.map(|d| d.year()));
        let flags = [
            &self.jan, &self.feb, &self.mar, &self.apr, &self.may, &self.jun, &self.jul,
            &self.aug, &self.sep, &self.oct, &self.nov, &self.dec,
        ];
        let mut months = [false; 12];
        for (slot, flag) in months.iter_mut().zip(flags) {
            *slot = loose_bool(flag.as_ref());
        }

        TransactionRecord {
            id: loose_id(self.id.as_ref()),
            amount: loose_number(self.amount.as_ref()).unwrap_or(0.0),
            currency: self
                .currency
                .as_deref()
                .and_then(Currency::parse)
                .unwrap_or_default(),
            donor_name: non_empty(self.donor_name),
            nature: non_empty(self.nature),
            year,
            date,
            annual: loose_bool(self.annual.as_ref()),
            months,
        }
    }
}

impl RawAid {
    pub fn into_record(self) -> AidRecord {
        let date = self
            .date
            .as_deref()
            .and_then(parse_date)
            .or_else(|| self.created_at.as_deref().and_then(parse_date));

        AidRecord {
            id: loose_id(self.id.as_ref()),
            amount: loose_number(self.amount.as_ref()).unwrap_or(0.0),
            currency: self
                .currency
                .as_deref()
                .and_then(Currency::parse)
                .unwrap_or(Currency::Euro),
            beneficiary_id: optional_id(self.beneficiary_id.as_ref()),
            dependent_id: optional_id(self.dependent_id.as_ref()),
            program_id: optional_id(self.program_id.as_ref()),
            nature: non_empty(self.nature),
            date,
        }
    }
}

impl RawProgram {
    pub fn into_record(self) -> ProgramRecord {
        ProgramRecord {
            id: loose_id(self.id.as_ref()),
            name: self.name.unwrap_or_default().trim().to_string(),
        }
    }
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// Ids arrive as strings (uuid) or integers depending on the table
fn loose_id(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

fn optional_id(value: Option<&Value>) -> Option<String> {
    Some(loose_id(value)).filter(|id| !id.is_empty())
}

/// Checkbox columns hold `true`, `"true"` or `"on"`
fn loose_bool(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => {
            let s = s.trim();
            s.eq_ignore_ascii_case("true") || s.eq_ignore_ascii_case("on")
        }
        _ => false,
    }
}

fn loose_number(value: Option<&Value>) -> Option<f64> {
    let n = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    n.is_finite().then_some(n)
}

/// Non-negative finite amount, 0 otherwise
fn loose_amount(value: Option<&Value>) -> f64 {
    loose_number(value).filter(|n| *n > 0.0).unwrap_or(0.0)
}

fn loose_year(value: Option<&Value>) -> Option<i32> {
    let n = loose_number(value)?;
    (n >= 1.0 && n <= 9999.0).then(|| n.trunc() as i32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_beneficiary_from_storage_columns() {
        let raw: RawBeneficiary = serde_json::from_value(json!({
            "id": "b-1",
            "nom_complet": "Khadija Benali",
            "ville": "Fès",
            "revenu_mensuel": "850",
            "situation_professionnelle": "Sans emploi",
            "type_logement": "Locataire",
            "soutien_social_direct": false
        }))
        .unwrap();
        let record = raw.into_record();

        assert_eq!(record.id, "b-1");
        assert_eq!(record.full_name, "Khadija Benali");
        assert_eq!(record.city.as_deref(), Some("Fès"));
        assert_eq!(record.monthly_income, 850.0);
        assert_eq!(record.employment, Some(EmploymentStatus::Unemployed));
        assert_eq!(record.housing, Some(HousingType::Tenant));
        assert!(!record.direct_support);
        assert_eq!(record.support_amount, 0.0);
    }

    #[test]
    fn test_beneficiary_from_english_fields() {
        let raw: RawBeneficiary = serde_json::from_value(json!({
            "id": 7,
            "full_name": "Amina",
            "monthly_income": 2500,
            "employment": "permanent",
            "housing": "owner",
            "direct_support": "on"
        }))
        .unwrap();
        let record = raw.into_record();

        assert_eq!(record.id, "7");
        assert_eq!(record.monthly_income, 2500.0);
        assert_eq!(record.employment, Some(EmploymentStatus::Permanent));
        assert_eq!(record.housing, Some(HousingType::Owner));
        assert!(record.direct_support);
    }

    #[test]
    fn test_beneficiary_garbage_income_is_zero() {
        for income in [json!("abc"), json!(null), json!("NaN"), json!({})] {
            let raw: RawBeneficiary =
                serde_json::from_value(json!({ "monthly_income": income })).unwrap();
            assert_eq!(raw.into_record().monthly_income, 0.0);
        }
    }

    #[test]
    fn test_beneficiary_negative_income_kept() {
        let raw: RawBeneficiary =
            serde_json::from_value(json!({ "revenu_mensuel": -50 })).unwrap();
        let record = raw.into_record();
        assert_eq!(record.monthly_income, -50.0);
        assert_eq!(crate::scoring::factors::income_points(record.monthly_income), 8);
    }

    #[test]
    fn test_beneficiary_blank_labels_are_unset() {
        let raw: RawBeneficiary = serde_json::from_value(json!({
            "employment": "  ",
            "housing": ""
        }))
        .unwrap();
        let record = raw.into_record();
        assert_eq!(record.employment, None);
        assert_eq!(record.housing, None);
    }

    #[test]
    fn test_dependent_from_storage_columns() {
        let raw: RawDependent = serde_json::from_value(json!({
            "id": "o-1",
            "id_mere": "b-1",
            "date_naissance": "2019-04-12",
            "ville": "Meknès",
            "niveau_scolaire": " Primaire ",
            "maladie_chronique": "true",
            "handicap": null
        }))
        .unwrap();
        let record = raw.into_record();

        assert_eq!(record.beneficiary_id, "b-1");
        assert_eq!(record.birth_date, NaiveDate::from_ymd_opt(2019, 4, 12));
        assert_eq!(record.city.as_deref(), Some("Meknès"));
        assert_eq!(record.schooling.as_deref(), Some("Primaire"));
        assert!(record.chronic_illness);
        assert!(!record.disability);
    }

    #[test]
    fn test_dependent_bad_date_is_none() {
        let raw: RawDependent =
            serde_json::from_value(json!({ "birth_date": "sometime" })).unwrap();
        assert_eq!(raw.into_record().birth_date, None);
    }

    #[test]
    fn test_transaction_month_flags() {
        let raw: RawTransaction = serde_json::from_value(json!({
            "montant": 300,
            "devise": "€",
            "nom_donateur": "Said",
            "nature_don": "Adhésion",
            "annee_don": "2024",
            "adhesion_jan": "on",
            "adhesion_mar": true,
            "adhesion_dec": "false"
        }))
        .unwrap();
        let record = raw.into_record();

        assert_eq!(record.amount, 300.0);
        assert_eq!(record.currency, Currency::Euro);
        assert_eq!(record.year, Some(2024));
        assert!(!record.annual);
        assert!(record.months[0]);
        assert!(!record.months[1]);
        assert!(record.months[2]);
        assert!(!record.months[11]);
    }

    #[test]
    fn test_transaction_defaults() {
        let raw: RawTransaction = serde_json::from_value(json!({
            "nom_donateur": "   ",
            "devise": "USD"
        }))
        .unwrap();
        let record = raw.into_record();

        assert_eq!(record.amount, 0.0);
        assert_eq!(record.currency, Currency::Dirham);
        assert_eq!(record.donor_name, None);
        assert_eq!(record.year, None);
    }

    #[test]
    fn test_transaction_year_from_date() {
        let raw: RawTransaction =
            serde_json::from_value(json!({ "date_don": "2023-11-02T09:00:00Z" })).unwrap();
        let record = raw.into_record();
        assert_eq!(record.year, Some(2023));
        assert_eq!(record.date, NaiveDate::from_ymd_opt(2023, 11, 2));
    }

    #[test]
    fn test_aid_from_storage_columns() {
        let raw: RawAid = serde_json::from_value(json!({
            "id": 12,
            "montant": "250",
            "id_veuve": null,
            "id_orphelin": "o-3",
            "id_programme": "p-1",
            "nature_aide": "Rentrée scolaire",
            "date_aide": "2024-09-02"
        }))
        .unwrap();
        let record = raw.into_record();

        assert_eq!(record.id, "12");
        assert_eq!(record.amount, 250.0);
        assert_eq!(record.currency, Currency::Euro);
        assert_eq!(record.beneficiary_id, None);
        assert_eq!(record.dependent_id.as_deref(), Some("o-3"));
        assert_eq!(record.program_id.as_deref(), Some("p-1"));
        assert_eq!(record.nature.as_deref(), Some("Rentrée scolaire"));
        assert_eq!(record.date, NaiveDate::from_ymd_opt(2024, 9, 2));
    }

    #[test]
    fn test_aid_date_falls_back_to_creation() {
        let raw: RawAid = serde_json::from_value(json!({
            "id_veuve": " ",
            "devise": "DH",
            "created_at": "2024-03-01T10:00:00+00:00"
        }))
        .unwrap();
        let record = raw.into_record();

        assert_eq!(record.beneficiary_id, None);
        assert_eq!(record.currency, Currency::Dirham);
        assert_eq!(record.date, NaiveDate::from_ymd_opt(2024, 3, 1));
    }

    #[test]
    fn test_program_from_storage_columns() {
        let raw: RawProgram =
            serde_json::from_value(json!({ "id": "p-1", "nom_programme": " Ramadan " })).unwrap();
        let record = raw.into_record();
        assert_eq!(record.id, "p-1");
        assert_eq!(record.name, "Ramadan");
    }

    #[test]
    fn test_transaction_explicit_year_wins_over_date() {
        let raw: RawTransaction = serde_json::from_value(json!({
            "annee_don": 2024,
            "date_don": "2023-12-30"
        }))
        .unwrap();
        assert_eq!(raw.into_record().year, Some(2024));
    }
}
