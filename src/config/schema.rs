use serde::{Deserialize, Serialize};

use crate::currency::Currency;
use crate::scoring::PriorityConfig;

pub const DEFAULT_PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Snapshot locations; each entry may be a glob pattern
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub display: DisplayConfig,

    #[serde(default)]
    pub priority: Option<PriorityConfig>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DataConfig {
    #[serde(default)]
    pub dir: Option<String>,
    #[serde(default)]
    pub beneficiaries: Option<String>,
    #[serde(default)]
    pub dependents: Option<String>,
    #[serde(default)]
    pub transactions: Option<String>,
    #[serde(default)]
    pub aids: Option<String>,
    #[serde(default)]
    pub programs: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DisplayConfig {
    /// Currency used for dashboard totals (default: EUR)
    #[serde(default)]
    pub currency: Option<Currency>,

    /// Roster rows per page (default: 10)
    #[serde(default)]
    pub page_size: Option<usize>,
}

impl DisplayConfig {
    pub fn currency(&self) -> Currency {
        self.currency.unwrap_or(Currency::Euro)
    }

    pub fn page_size(&self) -> usize {
        self.page_size.unwrap_or(DEFAULT_PAGE_SIZE)
    }
}
