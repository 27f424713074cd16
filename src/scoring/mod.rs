pub mod config;
pub mod engine;
pub mod factors;
pub mod validation;

pub use config::{PriorityConfig, PriorityTier};
pub use engine::{calculate_score, calculate_score_on, FactorContribution, ScoreResult};
pub use validation::validate_priority;
