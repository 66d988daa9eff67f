//! CLI module for the mongolens binary

pub mod commands;
pub mod error;
pub mod output;

pub use error::CliError;
