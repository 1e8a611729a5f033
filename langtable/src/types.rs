//! Core, format-agnostic types for langtable.
//! The CSV reader and the format parsers decode into these; the writers
//! serialize these.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One translation key with its per-language values.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Row {
    /// Translation key, as looked up by the target platform.
    pub key: String,

    /// Workflow state tag (`approved`, `draft`, ...), when a state column
    /// was configured.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub state: Option<String>,

    /// Map from language label to value. A missing entry means the key is
    /// absent for that language; an empty string is a present, empty value.
    pub translations: HashMap<String, String>,
}

impl Row {
    /// Creates a row with no translations.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            state: None,
            translations: HashMap::new(),
        }
    }

    /// Builder-style state setter.
    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    /// Builder-style translation setter.
    pub fn with_translation(mut self, language: impl Into<String>, value: impl Into<String>) -> Self {
        self.translations.insert(language.into(), value.into());
        self
    }

    /// Gets a translation for a specific language.
    pub fn get_translation(&self, language: &str) -> Option<&str> {
        self.translations.get(language).map(String::as_str)
    }

    /// Gets a translation, treating an absent entry as empty.
    pub fn value_or_empty(&self, language: &str) -> &str {
        self.get_translation(language).unwrap_or_default()
    }
}

/// The in-memory translation table: ordered languages and ordered rows.
///
/// Row order is significant and is preserved by every transformation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct TranslationMatrix {
    /// Language labels, in column order.
    pub languages: Vec<String>,

    /// Rows, in source order.
    pub rows: Vec<Row>,
}

impl TranslationMatrix {
    /// Creates an empty matrix over the given languages.
    pub fn new(languages: Vec<String>) -> Self {
        Self {
            languages,
            rows: Vec::new(),
        }
    }

    pub fn push(&mut self, row: Row) {
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_language(&self, language: &str) -> bool {
        self.languages.iter().any(|l| l == language)
    }

    pub fn find_row(&self, key: &str) -> Option<&Row> {
        self.rows.iter().find(|r| r.key == key)
    }

    /// Keys in row order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|r| r.key.as_str())
    }

    /// The (key, value) pairs of one language, in row order, skipping keys
    /// absent for that language.
    pub fn pairs_for<'a>(&'a self, language: &'a str) -> impl Iterator<Item = (&'a str, &'a str)> {
        self.rows.iter().filter_map(move |row| {
            row.get_translation(language)
                .map(|value| (row.key.as_str(), value))
        })
    }

    /// Extracts one language as a [`Catalog`].
    pub fn catalog(&self, language: &str) -> Catalog {
        let mut catalog = Catalog::new(language);
        for (key, value) in self.pairs_for(language) {
            catalog.insert(key, value);
        }
        catalog
    }

    /// Builds a matrix from per-language catalogs.
    ///
    /// The key set is the union of all catalog keys, in first-seen order
    /// across the catalogs as supplied. A key missing from a catalog gets the
    /// empty string for that language.
    pub fn align(catalogs: Vec<Catalog>) -> Self {
        let languages: Vec<String> = catalogs.iter().map(|c| c.language.clone()).collect();
        let mut matrix = TranslationMatrix::new(languages.clone());
        let mut index: HashMap<String, usize> = HashMap::new();

        for catalog in catalogs {
            let (language, entries) = catalog.into_parts();
            for (key, value) in entries {
                let position = match index.get(&key).copied() {
                    Some(position) => position,
                    None => {
                        let mut row = Row::new(key.clone());
                        for language in &languages {
                            row.translations.insert(language.clone(), String::new());
                        }
                        matrix.rows.push(row);
                        index.insert(key, matrix.rows.len() - 1);
                        matrix.rows.len() - 1
                    }
                };
                matrix.rows[position]
                    .translations
                    .insert(language.clone(), value);
            }
        }

        matrix
    }

    /// Header record followed by one record per row: `[key, values...]`.
    ///
    /// This is the row-by-row form written to CSV and printed by dry runs.
    pub fn to_records(&self, key_header: &str) -> Vec<Vec<String>> {
        let mut records = Vec::with_capacity(self.rows.len() + 1);
        let mut header = vec![key_header.to_string()];
        header.extend(self.languages.iter().cloned());
        records.push(header);
        for row in &self.rows {
            let mut record = vec![row.key.clone()];
            record.extend(
                self.languages
                    .iter()
                    .map(|language| row.value_or_empty(language).to_string()),
            );
            records.push(record);
        }
        records
    }
}

/// One language's resource file content: ordered key/value pairs.
///
/// Keys are unique; a repeated insert keeps the first position.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Catalog {
    pub language: String,
    entries: Vec<(String, String)>,
    index: HashMap<String, usize>,
}

impl Catalog {
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Builds a catalog from pairs in order, with [`Catalog::insert`]
    /// semantics for repeated keys.
    pub fn from_entries<I, K, V>(language: impl Into<String>, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut catalog = Catalog::new(language);
        for (key, value) in entries {
            catalog.insert(key, value);
        }
        catalog
    }

    /// Inserts a pair. A repeated key keeps its first position and takes the
    /// new value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.index.get(&key).copied() {
            Some(position) => self.entries[position].1 = value,
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, value));
            }
        }
    }

    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }

    /// Splits into the language label and the ordered pairs.
    pub fn into_parts(self) -> (String, Vec<(String, String)>) {
        (self.language, self.entries)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Replaces the language label.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }
}
