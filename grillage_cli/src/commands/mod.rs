//! Subcommand implementations

pub mod calc;
pub mod project;
