//! CLI subcommand implementations

pub mod billing;
pub mod estimate;
pub mod rates;
