//! All error types for the langtable crate.
//!
//! These are returned from all fallible operations (column resolution, CSV
//! reading, resource parsing, writing).

use std::path::Path;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("malformed row {row}: {message}")]
    MalformedRow { row: usize, message: String },

    #[error("{}", format_parse_message(.file, .position, .message))]
    FormatParse {
        file: String,
        position: Option<String>,
        message: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn format_parse_message(file: &str, position: &Option<String>, message: &str) -> String {
    let file = if file.is_empty() { "<input>" } else { file };
    match position {
        Some(position) => format!("parse error in {} ({}): {}", file, position, message),
        None => format!("parse error in {}: {}", file, message),
    }
}

impl Error {
    /// Creates a new configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration(message.into())
    }

    /// Creates a new parse error. The file is filled in by [`Error::in_file`]
    /// once the caller knows which file was being read.
    pub fn parse(position: Option<String>, message: impl Into<String>) -> Self {
        Error::FormatParse {
            file: String::new(),
            position,
            message: message.into(),
        }
    }

    /// Parse error located at a 1-based line.
    pub fn parse_at_line(line: usize, message: impl Into<String>) -> Self {
        Error::parse(Some(format!("line {}", line)), message)
    }

    /// Attaches a file name to a parse error. Other kinds pass through.
    pub fn in_file<P: AsRef<Path>>(self, path: P) -> Self {
        match self {
            Error::FormatParse {
                position, message, ..
            } => Error::FormatParse {
                file: path.as_ref().display().to_string(),
                position,
                message,
            },
            other => other,
        }
    }

    /// Maps a csv error raised while reading the record at `row` (1-based).
    pub(crate) fn from_csv_read(err: csv::Error, row: usize) -> Self {
        let message = err.to_string();
        match err.into_kind() {
            csv::ErrorKind::Io(e) => Error::Io(e),
            _ => Error::MalformedRow { row, message },
        }
    }

    /// Maps a csv error raised while writing.
    pub(crate) fn from_csv_write(err: csv::Error) -> Self {
        let message = err.to_string();
        match err.into_kind() {
            csv::ErrorKind::Io(e) => Error::Io(e),
            _ => Error::Io(std::io::Error::other(message)),
        }
    }
}
