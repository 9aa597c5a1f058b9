// pairoff CLI - headless opposite-amount matching for ledger documents

mod console;
mod document;
mod exit_codes;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};

use pairoff_engine::{
    MatchConfig, ResultStrategy, SheetSelection, StopStrategy, TargetColumn,
};

use console::Console;
use document::{load_document, resolve_output, save_document};
use exit_codes::{engine_exit_code, EXIT_ERROR, EXIT_IO, EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "pairoff")]
#[command(about = "Flag offsetting amount pairs in spreadsheet ledgers")]
#[command(long_version = long_version())]
#[command(version)]
#[command(subcommand_required = false)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Pair offsetting amounts and write match indices into the document
    #[command(after_help = "\
Examples:
  pairoff match ledger.xlsx -t 'Q1 Ledger'
  pairoff match ledger.xlsx -t Receivables -t Payables -o flagged.xlsx
  pairoff match ledger.xlsx -i 2 --column-pattern '^Net.*' --partition-column 5
  pairoff match legacy.xlsb -i 1 --row-stop at-row-index --row-stop-index 500
  pairoff match ledger.csv --job nightly.toml --json")]
    Match {
        /// Input document (xlsx, xlsm, xlsb, xls, ods, csv, tsv)
        input: PathBuf,

        /// Output file (defaults to the input path; xlsb/xls/xlsm/ods
        /// inputs switch to a sibling .xlsx)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Tab to process, by name. Repeatable.
        #[arg(long = "tab", short = 't', value_name = "NAME")]
        tabs: Vec<String>,

        /// Tab to process, by 1-based position. Repeatable.
        #[arg(long = "tab-index", short = 'i', value_name = "N")]
        tab_indices: Vec<u32>,

        /// Regex the amount header must start with
        #[arg(long, alias = "col-regex", default_value = "^Amount.*", value_name = "REGEX")]
        column_pattern: String,

        /// 1-based amount column, bypassing the header scan
        #[arg(long, alias = "col-idx", value_name = "N", conflicts_with = "column_pattern")]
        column_index: Option<u32>,

        /// First data row (1-based; row 1 is assumed to hold headers)
        #[arg(long, default_value_t = 2, value_name = "N")]
        row_start: u32,

        /// When the row scan ends
        #[arg(long, value_enum, default_value = "on-blank")]
        row_stop: RowStop,

        /// Last row to scan (requires --row-stop at-row-index)
        #[arg(long, value_name = "N")]
        row_stop_index: Option<u32>,

        /// Where match indices are written
        #[arg(long, value_enum, default_value = "insert-right")]
        result: ResultPlacement,

        /// 1-based column for match indices (requires --result explicit-index)
        #[arg(long, value_name = "N")]
        result_index: Option<u32>,

        /// 1-based column whose text splits rows into independent partitions
        #[arg(long, alias = "part-col", value_name = "N")]
        partition_column: Option<u32>,

        /// Load the whole job from a TOML file instead of per-option flags
        #[arg(long, value_name = "FILE", conflicts_with_all = [
            "tabs", "tab_indices", "column_pattern", "column_index", "row_start",
            "row_stop", "row_stop_index", "result", "result_index", "partition_column",
        ])]
        job: Option<PathBuf>,

        /// Print the run report as JSON to stdout
        #[arg(long)]
        json: bool,

        /// Verbosity on stderr: 0 errors/warnings only, 1 progress, 2 debug
        #[arg(
            long, short = 'v', default_value_t = 1, value_name = "LEVEL",
            value_parser = clap::value_parser!(u8).range(0..=2),
        )]
        verbose: u8,
    },

    /// List the tabs in a document
    #[command(after_help = "\
Examples:
  pairoff sheets ledger.xlsx
  pairoff sheets ledger.xlsx --json")]
    Sheets {
        /// Input document (xlsx, xlsm, xlsb, xls, ods, csv, tsv)
        input: PathBuf,

        /// Print tab metadata as JSON to stdout
        #[arg(long)]
        json: bool,
    },

    /// Check a TOML job file without touching any document
    #[command(after_help = "\
Examples:
  pairoff validate nightly.toml")]
    Validate {
        /// Path to the TOML job file
        job: PathBuf,
    },
}

/// CLI spelling of the row scan stop strategies.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum RowStop {
    OnBlank,
    EndOfSheet,
    AtRowIndex,
}

impl From<RowStop> for StopStrategy {
    fn from(stop: RowStop) -> Self {
        match stop {
            RowStop::OnBlank => StopStrategy::OnBlank,
            RowStop::EndOfSheet => StopStrategy::EndOfSheet,
            RowStop::AtRowIndex => StopStrategy::AtRowIndex,
        }
    }
}

/// CLI spelling of the result column strategies.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum ResultPlacement {
    InsertRight,
    AddEnd,
    ExplicitIndex,
}

impl From<ResultPlacement> for ResultStrategy {
    fn from(placement: ResultPlacement) -> Self {
        match placement {
            ResultPlacement::InsertRight => ResultStrategy::InsertRight,
            ResultPlacement::AddEnd => ResultStrategy::AddEnd,
            ResultPlacement::ExplicitIndex => ResultStrategy::ExplicitIndex,
        }
    }
}

fn long_version() -> &'static str {
    if cfg!(debug_assertions) {
        concat!(
            env!("CARGO_PKG_VERSION"),
            " (", env!("GIT_COMMIT_HASH"), ")",
            "\nengine:  pairoff-engine ", env!("CARGO_PKG_VERSION"),
            "\nbuild:   debug",
            "\ntarget:  ", env!("TARGET"),
        )
    } else {
        concat!(
            env!("CARGO_PKG_VERSION"),
            " (", env!("GIT_COMMIT_HASH"), ")",
            "\nengine:  pairoff-engine ", env!("CARGO_PKG_VERSION"),
            "\nbuild:   release",
            "\ntarget:  ", env!("TARGET"),
        )
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        None => {
            // No subcommand = show usage
            eprintln!("Usage: pairoff <command> [options]");
            eprintln!("       pairoff --help for more information");
            Ok(())
        }
        Some(Commands::Match {
            input,
            output,
            tabs,
            tab_indices,
            column_pattern,
            column_index,
            row_start,
            row_stop,
            row_stop_index,
            result,
            result_index,
            partition_column,
            job,
            json,
            verbose,
        }) => cmd_match(
            input, output, tabs, tab_indices, column_pattern, column_index,
            row_start, row_stop, row_stop_index, result, result_index,
            partition_column, job, json, Console::new(verbose),
        ),
        Some(Commands::Sheets { input, json }) => cmd_sheets(input, json),
        Some(Commands::Validate { job }) => cmd_validate(job),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn usage(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self { code: EXIT_IO, message: msg.into(), hint: None }
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self { code: EXIT_ERROR, message: msg.into(), hint: None }
    }

    /// Attach a hint line shown under the error message.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Wrap an engine error with its registered exit code.
fn engine_err(err: pairoff_engine::EngineError) -> CliError {
    CliError { code: engine_exit_code(&err), message: err.to_string(), hint: None }
}

// ============================================================================
// match
// ============================================================================

#[allow(clippy::too_many_arguments)]
fn cmd_match(
    input: PathBuf,
    output: Option<PathBuf>,
    tabs: Vec<String>,
    tab_indices: Vec<u32>,
    column_pattern: String,
    column_index: Option<u32>,
    row_start: u32,
    row_stop: RowStop,
    row_stop_index: Option<u32>,
    result: ResultPlacement,
    result_index: Option<u32>,
    partition_column: Option<u32>,
    job: Option<PathBuf>,
    json: bool,
    console: Console,
) -> Result<(), CliError> {
    let config = match job {
        Some(path) => {
            let job_str = std::fs::read_to_string(&path).map_err(|e| {
                CliError::io(format!("cannot read job file {}: {e}", path.display()))
            })?;
            MatchConfig::from_toml(&job_str).map_err(engine_err)?
        }
        None => flag_config(
            tabs, tab_indices, column_pattern, column_index, row_start,
            row_stop, row_stop_index, result, result_index, partition_column,
        )?,
    };

    let mut workbook = load_document(&input)?;
    let output = resolve_output(&input, output, &console)?;

    let report = pairoff_engine::run(&mut workbook, &config).map_err(engine_err)?;

    for warning in &report.warnings {
        console.warn(warning);
    }
    for sheet in &report.sheets {
        console.debug(&format!(
            "tab '{}': amounts in column {}, results in column {}",
            sheet.sheet, sheet.target_column, sheet.result_column,
        ));
        console.info(&format!(
            "tab '{}': {} rows scanned, {} pairs, {} unmatched",
            sheet.sheet, sheet.rows_scanned, sheet.pairs, sheet.unmatched,
        ));
    }

    save_document(&workbook, &output)?;
    console.info(&format!("wrote {}", output.display()));

    if json {
        let json_str = serde_json::to_string_pretty(&report)
            .map_err(|e| CliError::internal(format!("JSON serialization error: {e}")))?;
        println!("{json_str}");
    }

    console.info(&report.summary());
    Ok(())
}

/// Assemble a job config from per-option flags. Validation itself stays
/// in the engine so the TOML path and the flag path reject the same way.
fn flag_config(
    tabs: Vec<String>,
    tab_indices: Vec<u32>,
    column_pattern: String,
    column_index: Option<u32>,
    row_start: u32,
    row_stop: RowStop,
    row_stop_index: Option<u32>,
    result: ResultPlacement,
    result_index: Option<u32>,
    partition_column: Option<u32>,
) -> Result<MatchConfig, CliError> {
    if tabs.is_empty() && tab_indices.is_empty() {
        return Err(CliError::usage("at least one tab must be selected")
            .with_hint("use -t <NAME> or -i <N>, repeatable"));
    }

    let target_column = match column_index {
        Some(index) => TargetColumn::Index(index),
        None => TargetColumn::Pattern(column_pattern),
    };

    let config = MatchConfig {
        sheets: SheetSelection { names: tabs, positions: tab_indices },
        target_column,
        start_row: row_start,
        stop_strategy: row_stop.into(),
        stop_row: row_stop_index,
        result_strategy: result.into(),
        result_column: result_index,
        partition_column,
    };
    config.validate().map_err(engine_err)?;
    Ok(config)
}

// ============================================================================
// sheets
// ============================================================================

fn cmd_sheets(input: PathBuf, json: bool) -> Result<(), CliError> {
    let workbook = load_document(&input)?;

    if json {
        #[derive(serde::Serialize)]
        struct TabInfo<'a> {
            index: u32,
            name: &'a str,
            rows: u32,
            columns: u32,
        }

        let tabs: Vec<TabInfo> = workbook
            .sheets()
            .iter()
            .enumerate()
            .map(|(i, sheet)| TabInfo {
                index: i as u32 + 1,
                name: sheet.name(),
                rows: sheet.last_row(),
                columns: sheet.last_column(),
            })
            .collect();

        let json_str = serde_json::to_string_pretty(&tabs)
            .map_err(|e| CliError::internal(format!("JSON serialization error: {e}")))?;
        println!("{json_str}");
        return Ok(());
    }

    for (i, sheet) in workbook.sheets().iter().enumerate() {
        println!(
            "{:>3}  {}  ({} rows, {} columns)",
            i + 1,
            sheet.name(),
            sheet.last_row(),
            sheet.last_column(),
        );
    }
    Ok(())
}

// ============================================================================
// validate
// ============================================================================

fn cmd_validate(job: PathBuf) -> Result<(), CliError> {
    let job_str = std::fs::read_to_string(&job)
        .map_err(|e| CliError::io(format!("cannot read job file {}: {e}", job.display())))?;

    let config = MatchConfig::from_toml(&job_str).map_err(engine_err)?;

    let count = config.sheets.names.len() + config.sheets.positions.len();
    let tabs = format!("{} tab selector{}", count, if count == 1 { "" } else { "s" });
    let placement = match config.result_strategy {
        ResultStrategy::InsertRight => "inserted right of the amount column".to_string(),
        ResultStrategy::AddEnd => "appended after the last column".to_string(),
        ResultStrategy::ExplicitIndex => match config.result_column {
            Some(column) => format!("written to column {column}"),
            None => "written to an explicit column".to_string(),
        },
    };

    eprintln!(
        "valid: amounts by {}, scan from row {}, {}, results {}",
        config.target_column, config.start_row, tabs, placement,
    );
    Ok(())
}
