//! Persisted defaults (`.langtable.toml`) and their merge with command-line
//! options.
//!
//! Every field is optional. Command-line values are turned into a
//! [`Settings`] too, so the merge is a field-by-field `or`.

use std::{
    fs,
    path::{Path, PathBuf},
};

use langtable::{ColumnRequest, ConversionOptions, DuplicateKeys, Error};
use serde::Deserialize;
use tracing::debug;

/// Looked up in the working directory when no `--config` is given.
pub const DEFAULT_SETTINGS_FILE: &str = ".langtable.toml";

/// CSV written by the `*2csv` commands when no `--csv-filename` is given.
pub const DEFAULT_CSV_FILENAME: &str = "translations.csv";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// `Label` or `Label:index` entries.
    pub langs: Option<Vec<String>>,
    pub excluded_states: Option<Vec<String>>,
    pub state_column: Option<usize>,
    pub keys_column: Option<usize>,
    pub default_lang: Option<String>,
    pub default_path: Option<PathBuf>,
    pub header_row: Option<bool>,
    pub delimiter: Option<char>,
    pub duplicates: Option<DuplicateKeys>,
    pub parallel: Option<bool>,
    pub dry_run: Option<bool>,
    pub csv_filename: Option<PathBuf>,
    pub headers: Option<Vec<String>>,
}

impl Settings {
    /// Reads a settings file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Settings, Error> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let settings = toml::from_str(&content).map_err(|e| {
            Error::configuration(format!("invalid settings file `{}`: {}", path.display(), e))
        })?;
        debug!(path = %path.display(), "loaded settings");
        Ok(settings)
    }

    /// Reads `path` when given. Otherwise reads [`DEFAULT_SETTINGS_FILE`] if
    /// it exists, or returns empty settings.
    pub fn load_or_default(path: Option<&Path>) -> Result<Settings, Error> {
        match path {
            Some(path) => Settings::load(path),
            None => {
                let path = Path::new(DEFAULT_SETTINGS_FILE);
                if path.is_file() {
                    Settings::load(path)
                } else {
                    Ok(Settings::default())
                }
            }
        }
    }

    /// Combines persisted defaults with explicit options. A field set in
    /// `explicit` always wins.
    pub fn merge(defaults: Settings, explicit: Settings) -> Settings {
        Settings {
            langs: explicit.langs.or(defaults.langs),
            excluded_states: explicit.excluded_states.or(defaults.excluded_states),
            state_column: explicit.state_column.or(defaults.state_column),
            keys_column: explicit.keys_column.or(defaults.keys_column),
            default_lang: explicit.default_lang.or(defaults.default_lang),
            default_path: explicit.default_path.or(defaults.default_path),
            header_row: explicit.header_row.or(defaults.header_row),
            delimiter: explicit.delimiter.or(defaults.delimiter),
            duplicates: explicit.duplicates.or(defaults.duplicates),
            parallel: explicit.parallel.or(defaults.parallel),
            dry_run: explicit.dry_run.or(defaults.dry_run),
            csv_filename: explicit.csv_filename.or(defaults.csv_filename),
            headers: explicit.headers.or(defaults.headers),
        }
    }

    /// Builds the column request for the `csv2*` commands.
    pub fn column_request(&self) -> Result<ColumnRequest, Error> {
        let langs = self.langs.as_deref().unwrap_or_default();
        if langs.is_empty() {
            return Err(Error::configuration(
                "no languages given; pass -L/--langs Label[:index]",
            ));
        }

        let mut request = ColumnRequest::new()
            .with_key_column(self.keys_column.unwrap_or(0))
            .with_state_column(self.state_column)
            .with_header(self.header_row.unwrap_or(false));
        for lang in langs {
            request = match parse_language(lang)? {
                (label, Some(column)) => request.with_language(label, column),
                (label, None) => request.with_header_language(label),
            };
        }
        Ok(request)
    }

    pub fn conversion_options(&self) -> Result<ConversionOptions, Error> {
        let defaults = ConversionOptions::default();
        Ok(ConversionOptions {
            excluded_states: self
                .excluded_states
                .iter()
                .flatten()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            default_language: self.default_lang.clone(),
            output_path: self.default_path.clone().unwrap_or(defaults.output_path),
            header_overrides: self.headers.clone(),
            dry_run: self.dry_run.unwrap_or(false),
            duplicates: self.duplicates.unwrap_or_default(),
            delimiter: match self.delimiter {
                Some(c) => delimiter_byte(c)?,
                None => defaults.delimiter,
            },
            parallel: self.parallel.unwrap_or(false),
        })
    }

    pub fn csv_filename(&self) -> PathBuf {
        self.csv_filename
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CSV_FILENAME))
    }
}

/// Parses `Label` or `Label:index`.
pub fn parse_language(s: &str) -> Result<(String, Option<usize>), Error> {
    let s = s.trim();
    let (label, column) = match s.rsplit_once(':') {
        Some((label, index)) => {
            let column = index.trim().parse::<usize>().map_err(|_| {
                Error::configuration(format!("invalid column index in language `{}`", s))
            })?;
            (label.trim(), Some(column))
        }
        None => (s, None),
    };
    if label.is_empty() {
        return Err(Error::configuration(format!("empty language label in `{}`", s)));
    }
    Ok((label.to_string(), column))
}

fn delimiter_byte(c: char) -> Result<u8, Error> {
    if c.is_ascii() {
        Ok(c as u8)
    } else {
        Err(Error::configuration(format!(
            "delimiter `{}` is not a single ASCII character",
            c
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_explicit_wins() {
        let defaults = Settings {
            default_lang: Some("English".into()),
            keys_column: Some(1),
            parallel: Some(true),
            ..Default::default()
        };
        let explicit = Settings {
            default_lang: Some("French".into()),
            ..Default::default()
        };
        let merged = Settings::merge(defaults, explicit);
        assert_eq!(merged.default_lang.as_deref(), Some("French"));
        assert_eq!(merged.keys_column, Some(1));
        assert_eq!(merged.parallel, Some(true));
    }

    #[test]
    fn test_merge_with_empty_defaults_is_identity() {
        let explicit = Settings {
            langs: Some(vec!["en:2".into()]),
            delimiter: Some(';'),
            ..Default::default()
        };
        assert_eq!(Settings::merge(Settings::default(), explicit.clone()), explicit);
    }

    #[test]
    fn test_load_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        fs::write(
            &path,
            "langs = [\"English:2\", \"French:3\"]\nexcluded_states = [\"draft\"]\nstate_column = 1\ndelimiter = \";\"\nduplicates = \"keep_last\"\n",
        )
        .unwrap();
        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.state_column, Some(1));
        assert_eq!(settings.delimiter, Some(';'));
        assert_eq!(settings.duplicates, Some(DuplicateKeys::KeepLast));
        assert_eq!(settings.langs.unwrap().len(), 2);
    }

    #[test]
    fn test_load_rejects_unknown_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        fs::write(&path, "colour = \"blue\"\n").unwrap();
        assert!(matches!(Settings::load(&path), Err(Error::Configuration(_))));
    }

    #[test]
    fn test_parse_language() {
        assert_eq!(parse_language("English:2").unwrap(), ("English".to_string(), Some(2)));
        assert_eq!(parse_language(" fr ").unwrap(), ("fr".to_string(), None));
        assert!(parse_language("English:two").is_err());
        assert!(parse_language(":3").is_err());
    }

    #[test]
    fn test_column_request_requires_languages() {
        assert!(matches!(
            Settings::default().column_request(),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn test_conversion_options_defaults() {
        let options = Settings::default().conversion_options().unwrap();
        assert_eq!(options, ConversionOptions::default());
    }

    #[test]
    fn test_conversion_options_from_settings() {
        let settings = Settings {
            excluded_states: Some(vec!["draft".into(), " ".into()]),
            default_path: Some("out".into()),
            delimiter: Some('\t'),
            ..Default::default()
        };
        let options = settings.conversion_options().unwrap();
        assert_eq!(options.excluded_states.len(), 1);
        assert!(options.excluded_states.contains("draft"));
        assert_eq!(options.output_path, PathBuf::from("out"));
        assert_eq!(options.delimiter, b'\t');
    }

    #[test]
    fn test_non_ascii_delimiter_is_rejected() {
        let settings = Settings {
            delimiter: Some('§'),
            ..Default::default()
        };
        assert!(settings.conversion_options().is_err());
    }
}
