//! All supported localization file formats for langtable.
//!
//! This module re-exports the main types for each format and provides
//! the [`FormatType`] enum for generic format handling across the crate.

pub mod android_strings;
pub mod csv;
pub mod json;
pub mod php;
pub mod strings;

use std::{
    fmt::{Display, Formatter},
    path::Path,
};

// Reexporting the formats for easier access
pub use android_strings::Format as AndroidStringsFormat;
pub use json::Format as JsonFormat;
pub use php::Format as PhpFormat;
pub use strings::Format as StringsFormat;

use crate::{error::Error, traits::Parser, types::Catalog};

/// The closed set of per-language resource formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatType {
    /// Apple `.strings`: `"key" = "value";` lines.
    Strings,
    /// Android `strings.xml`.
    AndroidStrings,
    /// Flat JSON object.
    Json,
    /// PHP associative array.
    Php,
}

impl FormatType {
    pub const ALL: [FormatType; 4] = [
        FormatType::Strings,
        FormatType::AndroidStrings,
        FormatType::Json,
        FormatType::Php,
    ];

    /// Returns the file extension for this format, including the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            FormatType::Strings => ".strings",
            FormatType::AndroidStrings => ".xml",
            FormatType::Json => ".json",
            FormatType::Php => ".php",
        }
    }

    /// Parses one resource file into a catalog labelled `language`.
    pub fn read_catalog<P: AsRef<Path>>(&self, path: P, language: &str) -> Result<Catalog, Error> {
        let catalog: Catalog = match self {
            FormatType::Strings => StringsFormat::read_from(&path)?.into(),
            FormatType::AndroidStrings => AndroidStringsFormat::read_from(&path)?.into(),
            FormatType::Json => JsonFormat::read_from(&path)?.into(),
            FormatType::Php => PhpFormat::read_from(&path)?.into(),
        };
        Ok(catalog.with_language(language))
    }

    /// Renders a catalog as file content.
    pub fn render(&self, catalog: Catalog) -> Result<String, Error> {
        match self {
            FormatType::Strings => StringsFormat::from(catalog).to_string_content(),
            FormatType::AndroidStrings => AndroidStringsFormat::from(catalog).to_string_content(),
            FormatType::Json => JsonFormat::from(catalog).to_string_content(),
            FormatType::Php => PhpFormat::from(catalog).to_string_content(),
        }
    }
}

/// Implements [`std::fmt::Display`] for [`FormatType`].
///
/// # Example
/// ```rust
/// use langtable::formats::FormatType;
/// assert_eq!(FormatType::AndroidStrings.to_string(), "android");
/// assert_eq!(FormatType::Strings.to_string(), "strings");
/// ```
impl Display for FormatType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FormatType::Strings => write!(f, "strings"),
            FormatType::AndroidStrings => write!(f, "android"),
            FormatType::Json => write!(f, "json"),
            FormatType::Php => write!(f, "php"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_type_display() {
        assert_eq!(FormatType::AndroidStrings.to_string(), "android");
        assert_eq!(FormatType::Strings.to_string(), "strings");
        assert_eq!(FormatType::Json.to_string(), "json");
        assert_eq!(FormatType::Php.to_string(), "php");
    }

    #[test]
    fn test_format_type_extension() {
        assert_eq!(FormatType::Strings.extension(), ".strings");
        assert_eq!(FormatType::AndroidStrings.extension(), ".xml");
        assert_eq!(FormatType::Json.extension(), ".json");
        assert_eq!(FormatType::Php.extension(), ".php");
    }

    #[test]
    fn test_render_and_read_each_format() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = Catalog::from_entries("en", [("hello", "Hello"), ("bye", "Bye")]);
        for format in FormatType::ALL {
            let path = dir.path().join(format!("file{}", format.extension()));
            std::fs::write(&path, format.render(catalog.clone()).unwrap()).unwrap();
            let parsed = format.read_catalog(&path, "English").unwrap();
            assert_eq!(parsed.language, "English");
            assert_eq!(parsed.entries(), catalog.entries(), "format {}", format);
        }
    }
}
