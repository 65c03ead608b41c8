//! The `canonicalize` command as a library call.
//!
//! Load, canonicalize, report, then write. The target is only touched once
//! every card has been canonicalized and every identifier is unique.

use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::canon::{canonicalize, CanonError};
use crate::db::{load_records, write_records_sqlite, DbError};
use crate::models::{CanonParams, CanonSummary};
use crate::output::{
    print_duplicates, print_records, print_summary, write_csv_file, write_json_file, OutputError,
    OutputFormat,
};

#[derive(Error, Debug)]
pub enum RunError {
    #[error(transparent)]
    Db(#[from] DbError),
    #[error(transparent)]
    Canon(#[from] CanonError),
    #[error(transparent)]
    Output(#[from] OutputError),
}

/// Options for one canonicalization run
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub input: PathBuf,
    /// Target path; see [`default_output_path`] when `None`
    pub output: Option<PathBuf>,
    pub format: OutputFormat,
    pub dry_run: bool,
    pub show_progress: bool,
    /// Print this many canonical records after the summary
    pub show_records: Option<usize>,
}

impl RunOptions {
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: None,
            format: OutputFormat::Json,
            dry_run: false,
            show_progress: false,
            show_records: None,
        }
    }
}

/// What a successful run did
#[derive(Debug)]
pub struct RunOutcome {
    pub summary: CanonSummary,
    /// `None` for a dry run
    pub written: Option<PathBuf>,
}

/// Where the canonical deck goes when no output path is given.
///
/// JSON replaces a JSON input in place; other formats sit next to the input.
pub fn default_output_path(input: &Path, format: OutputFormat) -> PathBuf {
    match format {
        OutputFormat::Json => {
            let is_json = input
                .extension()
                .map_or(false, |e| e.eq_ignore_ascii_case("json"));
            if is_json {
                input.to_path_buf()
            } else {
                input.with_extension("json")
            }
        }
        OutputFormat::Csv => input.with_extension("csv"),
        OutputFormat::Sqlite => input.with_extension("db"),
    }
}

/// Run the whole load → canonicalize → write cycle.
///
/// On a duplicate-ID failure the summary is printed before the duplicate
/// listing. Nothing is written unless the run succeeds and `dry_run` is off.
pub fn run(options: &RunOptions, params: &CanonParams) -> Result<RunOutcome, RunError> {
    if options.show_progress {
        eprintln!("Loading {}...", options.input.display());
    }
    let records = load_records(&options.input)?;

    let result = match canonicalize(&records, params, options.show_progress) {
        Ok(result) => result,
        Err(CanonError::DuplicateIds {
            duplicates,
            summary,
        }) => {
            print_summary(&summary);
            print_duplicates(&duplicates);
            return Err(CanonError::DuplicateIds {
                duplicates,
                summary,
            }
            .into());
        }
        Err(e) => return Err(e.into()),
    };

    print_summary(&result.summary);

    if let Some(limit) = options.show_records {
        println!("\n=== Sample Records ===");
        print_records(&result.records, Some(limit));
    }

    if options.dry_run {
        eprintln!("\nDry run: nothing written");
        return Ok(RunOutcome {
            summary: result.summary,
            written: None,
        });
    }

    let output = options
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&options.input, options.format));
    match options.format {
        OutputFormat::Json => write_json_file(&result.records, &output)?,
        OutputFormat::Csv => write_csv_file(&result.records, &output)?,
        OutputFormat::Sqlite => {
            write_records_sqlite(&result.records, &output)?;
        }
    }

    Ok(RunOutcome {
        summary: result.summary,
        written: Some(output),
    })
}
