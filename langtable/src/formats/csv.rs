//! Support for the CSV translation matrix.
//!
//! Columns are addressed by position only; the first record is a header only
//! when the caller says so. Provides reading into and writing from
//! [`TranslationMatrix`].

use std::{
    collections::HashMap,
    fmt::{Display, Formatter},
    io::{Read, Write},
    str::FromStr,
};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    columns::{ColumnRequest, ColumnSpec},
    error::Error,
    types::{Row, TranslationMatrix},
};

/// Label of the key column in CSV files produced from resource files.
pub const KEY_HEADER: &str = "Variables";

/// What to do when the same key appears on more than one row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateKeys {
    /// Fail with a configuration error naming both rows.
    #[default]
    Reject,
    /// Keep the first row, drop later ones.
    KeepFirst,
    /// Keep the last row's content at the first row's position.
    KeepLast,
}

impl FromStr for DuplicateKeys {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "reject" => Ok(DuplicateKeys::Reject),
            "first" | "keep_first" => Ok(DuplicateKeys::KeepFirst),
            "last" | "keep_last" => Ok(DuplicateKeys::KeepLast),
            other => Err(Error::configuration(format!(
                "unknown duplicate key policy `{}` (expected reject, first or last)",
                other
            ))),
        }
    }
}

impl Display for DuplicateKeys {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            DuplicateKeys::Reject => write!(f, "reject"),
            DuplicateKeys::KeepFirst => write!(f, "first"),
            DuplicateKeys::KeepLast => write!(f, "last"),
        }
    }
}

/// Raw CSV records, before any column has a meaning.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Table {
    records: Vec<Vec<String>>,
}

impl Table {
    /// Reads every record. Rows may have different lengths.
    pub fn from_reader<R: Read>(reader: R, delimiter: u8) -> Result<Self, Error> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(delimiter)
            .from_reader(reader);

        let mut records = Vec::new();
        for (index, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| Error::from_csv_read(e, index + 1))?;
            records.push(record.iter().map(str::to_string).collect());
        }
        Ok(Table { records })
    }

    pub fn records(&self) -> &[Vec<String>] {
        &self.records
    }

    /// Number of columns of the widest record.
    pub fn width(&self) -> usize {
        self.records.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Resolves a column request against this table's shape. Column range
    /// checks only apply when there is at least one data record.
    pub fn resolve(&self, request: &ColumnRequest) -> Result<ColumnSpec, Error> {
        let header = if request.has_header {
            self.records.first().map(Vec::as_slice)
        } else {
            None
        };
        let has_data = self.records.len() > usize::from(request.has_header);
        request.resolve(header, has_data.then(|| self.width()))
    }

    /// Builds the matrix from the data records.
    ///
    /// Row numbers in errors are 1-based and count the header record.
    pub fn to_matrix(
        &self,
        spec: &ColumnSpec,
        has_header: bool,
        duplicates: DuplicateKeys,
    ) -> Result<TranslationMatrix, Error> {
        let required = spec.required_width();
        let mut matrix = TranslationMatrix::new(spec.languages());
        let mut first_seen: HashMap<String, (usize, usize)> = HashMap::new();

        let skip = usize::from(has_header);
        for (index, record) in self.records.iter().enumerate().skip(skip) {
            let row_number = index + 1;
            if record.len() < required {
                return Err(Error::MalformedRow {
                    row: row_number,
                    message: format!(
                        "expected at least {} columns, found {}",
                        required,
                        record.len()
                    ),
                });
            }

            let mut row = Row::new(record[spec.key_column()].trim());
            if let Some(state_column) = spec.state_column() {
                row.state = Some(record[state_column].trim().to_string());
            }
            for (language, column) in spec.language_columns() {
                row.translations
                    .insert(language.clone(), record[*column].clone());
            }

            match first_seen.get(&row.key).copied() {
                None => {
                    first_seen.insert(row.key.clone(), (matrix.len(), row_number));
                    matrix.push(row);
                }
                Some((position, first_row)) => match duplicates {
                    DuplicateKeys::Reject => {
                        return Err(Error::configuration(format!(
                            "duplicate key `{}` on rows {} and {}",
                            row.key, first_row, row_number
                        )));
                    }
                    DuplicateKeys::KeepFirst => {
                        debug!(key = %row.key, row = row_number, "dropping duplicate key");
                    }
                    DuplicateKeys::KeepLast => {
                        debug!(key = %row.key, row = row_number, "replacing duplicate key");
                        matrix.rows[position] = row;
                    }
                },
            }
        }

        Ok(matrix)
    }
}

/// Reads a CSV matrix: records, column resolution, rows.
pub fn read_matrix<R: Read>(
    reader: R,
    request: &ColumnRequest,
    delimiter: u8,
    duplicates: DuplicateKeys,
) -> Result<TranslationMatrix, Error> {
    let table = Table::from_reader(reader, delimiter)?;
    let spec = table.resolve(request)?;
    debug!(?spec, records = table.records().len(), "resolved columns");
    table.to_matrix(&spec, request.has_header, duplicates)
}

/// Writes the matrix as CSV: a header record (`key_header`, then the
/// languages) and one record per row.
pub fn write_matrix<W: Write>(
    matrix: &TranslationMatrix,
    key_header: &str,
    writer: W,
    delimiter: u8,
) -> Result<(), Error> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(writer);
    for record in matrix.to_records(key_header) {
        wtr.write_record(&record).map_err(Error::from_csv_write)?;
    }
    wtr.flush()?;
    Ok(())
}
