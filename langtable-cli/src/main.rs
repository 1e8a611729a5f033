use std::{path::PathBuf, process};

use clap::{Args as ClapArgs, Parser, Subcommand};
use langtable::{DuplicateKeys, Error, FormatType};
use langtable_cli::{
    commands::{csv_to_format, format_to_csv},
    config::Settings,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Log every row decision to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Defaults file (TOML). `.langtable.toml` is used when present
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    commands: Commands,
}

/// Supported subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert a CSV matrix to Apple .strings files.
    #[command(name = "csv2strings")]
    Csv2strings(ToResources),
    /// Convert a CSV matrix to Android strings.xml files.
    #[command(name = "csv2android")]
    Csv2android(ToResources),
    /// Convert a CSV matrix to JSON files.
    #[command(name = "csv2json")]
    Csv2json(ToResources),
    /// Convert a CSV matrix to PHP files.
    #[command(name = "csv2php")]
    Csv2php(ToResources),
    /// Merge Apple .strings files into one CSV.
    #[command(name = "strings2csv")]
    Strings2csv(ToCsv),
    /// Merge Android strings.xml files into one CSV.
    #[command(name = "android2csv")]
    Android2csv(ToCsv),
    /// Merge JSON files into one CSV.
    #[command(name = "json2csv")]
    Json2csv(ToCsv),
    /// Merge PHP files into one CSV.
    #[command(name = "php2csv")]
    Php2csv(ToCsv),
    /// Print the version.
    Version,
}

#[derive(ClapArgs, Debug)]
struct ToResources {
    /// The CSV file to read
    #[arg(long)]
    filename: PathBuf,

    /// Languages as `Label:index`, or `Label` with --header-row
    #[arg(short = 'L', long, value_delimiter = ',')]
    langs: Vec<String>,

    /// Drop rows whose state is one of these
    #[arg(short = 'x', long, value_delimiter = ',')]
    excluded_states: Vec<String>,

    /// Column holding the row state
    #[arg(short, long)]
    state_column: Option<usize>,

    /// Column holding the keys (default 0)
    #[arg(short, long)]
    keys_column: Option<usize>,

    /// Language used to fill empty values
    #[arg(short = 'l', long)]
    default_lang: Option<String>,

    /// Output directory (default `.`)
    #[arg(short = 'p', long)]
    default_path: Option<PathBuf>,

    /// Treat the first CSV record as a header row
    #[arg(long)]
    header_row: bool,

    #[arg(long)]
    delimiter: Option<char>,

    /// What to do with repeated keys: reject, first or last
    #[arg(long)]
    duplicates: Option<String>,

    /// Write the language files in parallel
    #[arg(long)]
    parallel: bool,

    /// Print the files instead of writing them
    #[arg(short = 'n', long)]
    dryrun: bool,
}

#[derive(ClapArgs, Debug)]
struct ToCsv {
    /// One resource file per language
    #[arg(short = 'i', long, num_args = 1.., required = true)]
    filenames: Vec<PathBuf>,

    /// The CSV file to write (default `translations.csv`)
    #[arg(short = 'o', long)]
    csv_filename: Option<PathBuf>,

    /// Column headers, one per input file
    #[arg(short = 'H', long, value_delimiter = ',')]
    headers: Vec<String>,

    #[arg(long)]
    delimiter: Option<char>,

    /// Print the CSV rows instead of writing the file
    #[arg(short = 'n', long)]
    dryrun: bool,
}

fn non_empty<T>(values: Vec<T>) -> Option<Vec<T>> {
    if values.is_empty() { None } else { Some(values) }
}

fn flag(set: bool) -> Option<bool> {
    set.then_some(true)
}

impl ToResources {
    fn settings(&self) -> Result<Settings, Error> {
        Ok(Settings {
            langs: non_empty(self.langs.clone()),
            excluded_states: non_empty(self.excluded_states.clone()),
            state_column: self.state_column,
            keys_column: self.keys_column,
            default_lang: self.default_lang.clone(),
            default_path: self.default_path.clone(),
            header_row: flag(self.header_row),
            delimiter: self.delimiter,
            duplicates: self
                .duplicates
                .as_deref()
                .map(str::parse::<DuplicateKeys>)
                .transpose()?,
            parallel: flag(self.parallel),
            dry_run: flag(self.dryrun),
            ..Default::default()
        })
    }
}

impl ToCsv {
    fn settings(&self) -> Settings {
        Settings {
            csv_filename: self.csv_filename.clone(),
            headers: non_empty(self.headers.clone()),
            delimiter: self.delimiter,
            dry_run: flag(self.dryrun),
            ..Default::default()
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: Args) -> Result<(), Error> {
    let to_resources = |format: FormatType, command: &ToResources| -> Result<(), Error> {
        let defaults = Settings::load_or_default(args.config.as_deref())?;
        let settings = Settings::merge(defaults, command.settings()?);
        csv_to_format(format, &command.filename, &settings)
    };
    let to_csv = |format: FormatType, command: &ToCsv| -> Result<(), Error> {
        let defaults = Settings::load_or_default(args.config.as_deref())?;
        let settings = Settings::merge(defaults, command.settings());
        format_to_csv(format, &command.filenames, &settings)
    };

    match &args.commands {
        Commands::Csv2strings(command) => to_resources(FormatType::Strings, command),
        Commands::Csv2android(command) => to_resources(FormatType::AndroidStrings, command),
        Commands::Csv2json(command) => to_resources(FormatType::Json, command),
        Commands::Csv2php(command) => to_resources(FormatType::Php, command),
        Commands::Strings2csv(command) => to_csv(FormatType::Strings, command),
        Commands::Android2csv(command) => to_csv(FormatType::AndroidStrings, command),
        Commands::Json2csv(command) => to_csv(FormatType::Json, command),
        Commands::Php2csv(command) => to_csv(FormatType::Php, command),
        Commands::Version => {
            println!("langtable {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
