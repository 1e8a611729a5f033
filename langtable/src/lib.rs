#![forbid(unsafe_code)]
//! Translation matrix toolkit for Rust.
//!
//! Turns a CSV spreadsheet (one row per key, one column per language) into
//! per-language resource files, and a set of per-language resource files back
//! into one CSV. All conversion goes through the [`TranslationMatrix`] model.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use langtable::{ColumnRequest, ConversionOptions, FormatType, csv_file_to_resources};
//!
//! // key in column 0, state in column 1, English in 2, French in 3
//! let request = ColumnRequest::new()
//!     .with_state_column(Some(1))
//!     .with_language("en", 2)
//!     .with_language("fr", 3);
//! let options = ConversionOptions {
//!     excluded_states: ["draft".to_string()].into_iter().collect(),
//!     default_language: Some("en".to_string()),
//!     ..Default::default()
//! };
//! csv_file_to_resources("translations.csv", &request, FormatType::Strings, &options)?;
//! # Ok::<(), langtable::Error>(())
//! ```
//!
//! # Supported Formats
//!
//! - **Apple `.strings`**: `"key" = "value";` lines
//! - **Android `strings.xml`**: `<string name="key">value</string>` elements
//! - **JSON**: a flat object of key/value pairs
//! - **PHP**: an associative array literal

pub mod columns;
pub mod converter;
pub mod error;
pub mod filter;
pub mod formats;
pub mod traits;
pub mod types;

// Re-export most used types for easy consumption
pub use crate::{
    columns::{ColumnRequest, ColumnSpec},
    converter::{
        ConversionOptions, GeneratedFile, csv_file_to_resources, csv_to_resources,
        resources_to_csv, resources_to_matrix,
    },
    error::Error,
    formats::{FormatType, csv::DuplicateKeys},
    types::{Catalog, Row, TranslationMatrix},
};
