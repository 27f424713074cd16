pub mod builder;
pub mod nature;

pub use builder::{
    build_matrix, target_months, ContributionRow, MatrixOutcome, MonthCell, UNKNOWN_DONOR,
};
pub use nature::is_membership_dues;
