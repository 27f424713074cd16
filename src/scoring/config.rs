use serde::{Deserialize, Serialize};

pub const DEFAULT_HIGH_THRESHOLD: u32 = 40;
pub const DEFAULT_MEDIUM_THRESHOLD: u32 = 25;

/// Display band of a priority score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PriorityTier {
    Low,
    Medium,
    High,
}

impl PriorityTier {
    pub fn label(&self) -> &'static str {
        match self {
            PriorityTier::Low => "low",
            PriorityTier::Medium => "medium",
            PriorityTier::High => "high",
        }
    }
}

/// Priority tier thresholds.
///
/// The score itself is fixed policy; only the bands used to highlight it are
/// configurable.
///
/// Example YAML:
/// ```yaml
/// priority:
///   high: 40
///   medium: 25
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PriorityConfig {
    /// Scores at or above this are high priority (default: 40)
    #[serde(default)]
    pub high: Option<i64>,

    /// Scores at or above this are medium priority (default: 25)
    #[serde(default)]
    pub medium: Option<i64>,
}

impl Default for PriorityConfig {
    fn default() -> Self {
        Self {
            high: Some(DEFAULT_HIGH_THRESHOLD as i64),
            medium: Some(DEFAULT_MEDIUM_THRESHOLD as i64),
        }
    }
}

impl PriorityConfig {
    pub fn high_threshold(&self) -> i64 {
        self.high.unwrap_or(DEFAULT_HIGH_THRESHOLD as i64)
    }

    pub fn medium_threshold(&self) -> i64 {
        self.medium.unwrap_or(DEFAULT_MEDIUM_THRESHOLD as i64)
    }

    pub fn tier_for(&self, score: u32) -> PriorityTier {
        let score = score as i64;
        if score >= self.high_threshold() {
            PriorityTier::High
        } else if score >= self.medium_threshold() {
            PriorityTier::Medium
        } else {
            PriorityTier::Low
        }
    }
}
