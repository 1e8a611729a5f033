//! Column resolution: maps CSV column positions to semantic roles.

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// What the caller asked for, before it is checked against the table.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct ColumnRequest {
    /// Position of the key column.
    pub key_column: usize,
    /// Position of the state column, if any.
    pub state_column: Option<usize>,
    /// Requested languages, in output order. A language without a position
    /// can only be resolved through the header row.
    pub languages: Vec<(String, Option<usize>)>,
    /// Whether the first CSV record is a header rather than data.
    pub has_header: bool,
}

impl ColumnRequest {
    /// Creates a request with the key in column 0 and no languages.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_key_column(mut self, key_column: usize) -> Self {
        self.key_column = key_column;
        self
    }

    pub fn with_state_column(mut self, state_column: Option<usize>) -> Self {
        self.state_column = state_column;
        self
    }

    /// Adds a language bound to a column position.
    pub fn with_language(mut self, label: impl Into<String>, column: usize) -> Self {
        self.languages.push((label.into(), Some(column)));
        self
    }

    /// Adds a language to be looked up in the header row.
    pub fn with_header_language(mut self, label: impl Into<String>) -> Self {
        self.languages.push((label.into(), None));
        self
    }

    pub fn with_header(mut self, has_header: bool) -> Self {
        self.has_header = has_header;
        self
    }

    /// Resolves the request against the shape of a table.
    ///
    /// `header` is the first record when `has_header` is set; `width` is the
    /// number of columns of the widest record, or `None` when the table has
    /// no data records. Without data records no column can be out of range.
    pub fn resolve(
        &self,
        header: Option<&[String]>,
        width: Option<usize>,
    ) -> Result<ColumnSpec, Error> {
        if self.languages.is_empty() {
            return Err(Error::configuration("at least one language must be requested"));
        }
        let width = width.unwrap_or(usize::MAX);
        if self.key_column >= width {
            return Err(Error::configuration(format!(
                "key column {} is out of range (table has {} columns)",
                self.key_column, width
            )));
        }
        if let Some(state_column) = self.state_column {
            if state_column >= width {
                return Err(Error::configuration(format!(
                    "state column {} is absent (table has {} columns)",
                    state_column, width
                )));
            }
        }

        let mut language_columns: Vec<(String, usize)> = Vec::with_capacity(self.languages.len());
        for (label, column) in &self.languages {
            if language_columns.iter().any(|(l, _)| l == label) {
                return Err(Error::configuration(format!(
                    "language `{}` is requested twice",
                    label
                )));
            }
            let column = match column {
                Some(column) => *column,
                None => find_in_header(label, header).ok_or_else(|| {
                    Error::configuration(format!("language `{}` has no column index", label))
                })?,
            };
            if column >= width {
                return Err(Error::configuration(format!(
                    "language `{}` has no column {} (table has {} columns)",
                    label, column, width
                )));
            }
            language_columns.push((label.clone(), column));
        }

        Ok(ColumnSpec {
            key_column: self.key_column,
            state_column: self.state_column,
            language_columns,
        })
    }
}

fn find_in_header(label: &str, header: Option<&[String]>) -> Option<usize> {
    header?.iter().position(|cell| cell.trim() == label)
}

/// Resolved column layout, immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnSpec {
    pub(crate) key_column: usize,
    pub(crate) state_column: Option<usize>,
    pub(crate) language_columns: Vec<(String, usize)>,
}

impl ColumnSpec {
    pub fn key_column(&self) -> usize {
        self.key_column
    }

    pub fn state_column(&self) -> Option<usize> {
        self.state_column
    }

    /// `(label, column)` pairs in requested order.
    pub fn language_columns(&self) -> &[(String, usize)] {
        &self.language_columns
    }

    pub fn languages(&self) -> Vec<String> {
        self.language_columns.iter().map(|(l, _)| l.clone()).collect()
    }

    /// Minimum number of cells a row needs to be readable.
    pub fn required_width(&self) -> usize {
        let mut max = self.key_column;
        if let Some(state_column) = self.state_column {
            max = max.max(state_column);
        }
        for (_, column) in &self.language_columns {
            max = max.max(*column);
        }
        max + 1
    }
}
