//! Subcommand bodies. Each one takes the merged [`Settings`] and prints what
//! it did to stdout.

use std::path::{Path, PathBuf};

use langtable::{Error, FormatType, csv_file_to_resources, resources_to_csv};
use tracing::info;

use crate::config::Settings;

/// `csv2<format>`: writes one resource file per language.
pub fn csv_to_format(
    format: FormatType,
    filename: &Path,
    settings: &Settings,
) -> Result<(), Error> {
    let request = settings.column_request()?;
    let options = settings.conversion_options()?;
    let files = csv_file_to_resources(filename, &request, format, &options)?;

    for file in &files {
        if options.dry_run {
            println!("{}:", file.path.display());
            print!("{}", file.content);
        } else {
            println!("{}", file.path.display());
        }
    }
    info!(files = files.len(), %format, dry_run = options.dry_run, "done");
    Ok(())
}

/// `<format>2csv`: merges per-language files into one CSV.
pub fn format_to_csv(
    format: FormatType,
    filenames: &[PathBuf],
    settings: &Settings,
) -> Result<(), Error> {
    let options = settings.conversion_options()?;
    let csv_path = settings.csv_filename();
    let records = resources_to_csv(filenames, format, &csv_path, &options)?;

    if options.dry_run {
        for record in &records {
            println!("{:?}", record);
        }
    } else {
        println!("{}", csv_path.display());
    }
    Ok(())
}
