//! Subcommand implementations.

pub mod profile;
pub mod push;
