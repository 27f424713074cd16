pub mod raw;
pub mod storage;
pub mod types;

pub use storage::{
    get_data_dir, load_aids, load_beneficiaries, load_dependents, load_programs,
    load_transactions, SnapshotPaths,
};
pub use types::{
    AidRecord, BeneficiaryRecord, DependentRecord, EmploymentStatus, HousingType, ProgramRecord,
    TransactionRecord,
};
