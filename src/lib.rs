pub mod config;
pub mod currency;
pub mod dates;
pub mod matrix;
pub mod orphans;
pub mod output;
pub mod records;
pub mod roster;
pub mod scoring;
pub mod stats;
pub mod text;
