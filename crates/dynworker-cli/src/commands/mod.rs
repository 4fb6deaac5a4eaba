//! Subcommand implementations.

pub(crate) mod config;
pub(crate) mod invoke;
pub(crate) mod resolve;
