//! End-to-end conversions between a CSV matrix and per-language resource
//! files.
//!
//! CSV → resources: read, exclude states, fill from the default language,
//! render one file per language, write each file atomically.
//!
//! Resources → CSV: parse each file, align keys across files, write one CSV
//! (or just return its records on a dry run).

use std::{
    collections::HashSet,
    fs,
    io::{Read, Write},
    path::{Path, PathBuf},
};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    columns::ColumnRequest,
    error::Error,
    filter::{apply_fallback, exclude_states},
    formats::{
        FormatType,
        csv::{DuplicateKeys, KEY_HEADER, read_matrix, write_matrix},
    },
    traits::write_atomically,
    types::{Catalog, TranslationMatrix},
};

/// Options shared by both conversion directions.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ConversionOptions {
    /// Rows whose state is in this set are dropped.
    pub excluded_states: HashSet<String>,
    /// Language whose value fills empty cells of the other languages.
    pub default_language: Option<String>,
    /// Directory receiving the per-language files.
    pub output_path: PathBuf,
    /// Column headers used instead of the input file names, one per file.
    pub header_overrides: Option<Vec<String>>,
    /// Compute everything, write nothing.
    pub dry_run: bool,
    /// Policy for keys repeated in the CSV.
    pub duplicates: DuplicateKeys,
    /// CSV field delimiter.
    pub delimiter: u8,
    /// Write per-language files on the rayon pool.
    pub parallel: bool,
}

impl Default for ConversionOptions {
    fn default() -> Self {
        Self {
            excluded_states: HashSet::new(),
            default_language: None,
            output_path: PathBuf::from("."),
            header_overrides: None,
            dry_run: false,
            duplicates: DuplicateKeys::default(),
            delimiter: b',',
            parallel: false,
        }
    }
}

/// One rendered resource file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub language: String,
    pub path: PathBuf,
    pub content: String,
}

/// `<output_path>/<language><extension>`.
///
/// The language label becomes a file name, so it must not contain a path
/// separator or be `.`/`..`.
pub fn output_file_path(
    output_path: &Path,
    language: &str,
    format: FormatType,
) -> Result<PathBuf, Error> {
    if language.is_empty()
        || language == "."
        || language == ".."
        || language.contains(['/', '\\'])
    {
        return Err(Error::configuration(format!(
            "language `{}` cannot be used as a file name",
            language
        )));
    }
    Ok(output_path.join(format!("{}{}", language, format.extension())))
}

/// Applies state exclusion, then default-language fallback.
pub fn prepare_matrix(
    matrix: TranslationMatrix,
    options: &ConversionOptions,
) -> Result<TranslationMatrix, Error> {
    let matrix = exclude_states(matrix, &options.excluded_states);
    apply_fallback(matrix, options.default_language.as_deref())
}

/// Renders one file's content for `language`.
pub fn render_language(
    matrix: &TranslationMatrix,
    language: &str,
    format: FormatType,
) -> Result<String, Error> {
    format.render(matrix.catalog(language))
}

/// Renders every language of the matrix, in language order.
pub fn render_all(
    matrix: &TranslationMatrix,
    format: FormatType,
    output_path: &Path,
) -> Result<Vec<GeneratedFile>, Error> {
    matrix
        .languages
        .iter()
        .map(|language| {
            Ok(GeneratedFile {
                language: language.clone(),
                path: output_file_path(output_path, language, format)?,
                content: render_language(matrix, language, format)?,
            })
        })
        .collect()
}

/// Writes rendered files, each one atomically.
///
/// Sequential mode stops at the first failure; parallel mode reports the
/// first failure it sees. Files already written stay in place.
pub fn write_files(files: &[GeneratedFile], parallel: bool) -> Result<(), Error> {
    let write = |file: &GeneratedFile| -> Result<(), Error> {
        write_atomically(&file.path, |w| {
            w.write_all(file.content.as_bytes())?;
            Ok(())
        })?;
        info!(path = %file.path.display(), language = %file.language, "wrote resource file");
        Ok(())
    };

    if parallel {
        files.par_iter().try_for_each(write)
    } else {
        files.iter().try_for_each(write)
    }
}

/// Converts CSV text to one resource file per requested language.
///
/// Returns the generated files; with `dry_run` nothing is written.
pub fn csv_to_resources<R: Read>(
    reader: R,
    request: &ColumnRequest,
    format: FormatType,
    options: &ConversionOptions,
) -> Result<Vec<GeneratedFile>, Error> {
    let matrix = read_matrix(reader, request, options.delimiter, options.duplicates)?;
    debug!(rows = matrix.len(), "read translation matrix");
    let matrix = prepare_matrix(matrix, options)?;
    let files = render_all(&matrix, format, &options.output_path)?;

    if !options.dry_run {
        fs::create_dir_all(&options.output_path)?;
        write_files(&files, options.parallel)?;
    }
    Ok(files)
}

/// Same as [`csv_to_resources`], reading the CSV from a file.
pub fn csv_file_to_resources<P: AsRef<Path>>(
    csv_path: P,
    request: &ColumnRequest,
    format: FormatType,
    options: &ConversionOptions,
) -> Result<Vec<GeneratedFile>, Error> {
    let file = fs::File::open(&csv_path)?;
    info!(path = %csv_path.as_ref().display(), %format, "converting CSV");
    csv_to_resources(file, request, format, options)
}

/// Column headers for the input files: the overrides when given, otherwise
/// each file's name without extension.
pub fn column_headers<P: AsRef<Path>>(
    files: &[P],
    header_overrides: Option<&[String]>,
) -> Result<Vec<String>, Error> {
    let headers: Vec<String> = match header_overrides {
        Some(overrides) => {
            if overrides.len() != files.len() {
                return Err(Error::configuration(format!(
                    "{} headers given for {} input files",
                    overrides.len(),
                    files.len()
                )));
            }
            overrides.to_vec()
        }
        None => files
            .iter()
            .map(|path| {
                path.as_ref()
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .map(str::to_string)
                    .ok_or_else(|| {
                        Error::configuration(format!(
                            "cannot derive a column header from `{}`",
                            path.as_ref().display()
                        ))
                    })
            })
            .collect::<Result<_, _>>()?,
    };

    let mut seen = HashSet::new();
    for header in &headers {
        if !seen.insert(header.as_str()) {
            return Err(Error::configuration(format!(
                "column header `{}` is used twice; pass distinct headers",
                header
            )));
        }
    }
    Ok(headers)
}

/// Parses the resource files and aligns their keys into one matrix.
pub fn resources_to_matrix<P: AsRef<Path>>(
    files: &[P],
    format: FormatType,
    header_overrides: Option<&[String]>,
) -> Result<TranslationMatrix, Error> {
    let headers = column_headers(files, header_overrides)?;
    let catalogs = files
        .iter()
        .zip(headers.iter())
        .map(|(path, header)| {
            let catalog = format.read_catalog(path, header)?;
            debug!(path = %path.as_ref().display(), entries = catalog.len(), "parsed resource file");
            Ok(catalog)
        })
        .collect::<Result<Vec<Catalog>, Error>>()?;
    Ok(TranslationMatrix::align(catalogs))
}

/// Converts resource files to one CSV at `csv_path`.
///
/// Returns the records (header first). With `dry_run` the CSV is not written.
pub fn resources_to_csv<P: AsRef<Path>>(
    files: &[P],
    format: FormatType,
    csv_path: &Path,
    options: &ConversionOptions,
) -> Result<Vec<Vec<String>>, Error> {
    let matrix = resources_to_matrix(files, format, options.header_overrides.as_deref())?;
    let records = matrix.to_records(KEY_HEADER);

    if !options.dry_run {
        write_atomically(csv_path, |w| {
            write_matrix(&matrix, KEY_HEADER, w, options.delimiter)
        })?;
        info!(path = %csv_path.display(), rows = matrix.len(), "wrote CSV");
    }
    Ok(records)
}
