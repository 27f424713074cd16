use serde::{Deserialize, Serialize};
use std::fmt;

/// Currencies the association books donations in.
///
/// Each variant carries its rate against the local currency, so converting
/// between any pair is `amount * rate(from) / rate(to)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Currency {
    /// Moroccan dirham, the local currency
    #[default]
    #[serde(rename = "DH", alias = "MAD")]
    Dirham,
    #[serde(rename = "EUR", alias = "€")]
    Euro,
}

/// Units of local currency per unit of each currency.
const RATES: &[(Currency, f64)] = &[(Currency::Dirham, 1.0), (Currency::Euro, 10.0)];

impl Currency {
    pub const ALL: [Currency; 2] = [Currency::Dirham, Currency::Euro];

    /// Parse a currency code or symbol, case-insensitively.
    /// Returns None for codes outside the table.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "DH" | "MAD" | "DHS" => Some(Currency::Dirham),
            "EUR" | "€" | "EURO" => Some(Currency::Euro),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Currency::Dirham => "DH",
            Currency::Euro => "EUR",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::Dirham => "DH",
            Currency::Euro => "€",
        }
    }

    /// Rate against the local currency
    pub fn local_rate(&self) -> f64 {
        RATES
            .iter()
            .find(|(c, _)| c == self)
            .map(|(_, rate)| *rate)
            .unwrap_or(1.0)
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl std::str::FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Currency::parse(s).ok_or_else(|| format!("unknown currency '{}' (expected DH or EUR)", s))
    }
}

/// Convert an amount between two currencies using the fixed rate table.
pub fn convert(amount: f64, from: Currency, to: Currency) -> f64 {
    if from == to {
        return amount;
    }
    amount * from.local_rate() / to.local_rate()
}

/// Format an amount with two decimals and the currency symbol: "1200.00 €"
pub fn format_amount(amount: f64, currency: Currency) -> String {
    format!("{:.2} {}", amount, currency.symbol())
}
