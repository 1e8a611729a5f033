//! Command-line front end for langtable.

pub mod commands;
pub mod config;

pub use config::{Settings, parse_language};
