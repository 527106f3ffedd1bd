//! CLI argument definitions for `reportkit`.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use reportkit_cli::commands::ExportRequest;

#[derive(Parser)]
#[command(
    name = "reportkit",
    version,
    about = "Render named record datasets into an XLSX workbook or a PDF report",
    long_about = "Render named record datasets into an XLSX workbook or a PDF report.\n\n\
                  Input is a JSON object mapping dataset names to arrays of flat records.\n\
                  Each dataset becomes one worksheet (xlsx) or one section (pdf)."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors.
    #[arg(short = 'q', long = "quiet", global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format.
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "compact",
        global = true
    )]
    pub log_format: LogFormatArg,
}

#[derive(Subcommand)]
pub enum Command {
    /// Export a JSON bundle to a document.
    Export(ExportArgs),

    /// List supported export formats.
    Formats,
}

#[derive(Parser)]
pub struct ExportArgs {
    /// JSON file mapping dataset names to record arrays.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Format token: excel, xlsx or pdf (default: xlsx).
    #[arg(short = 'f', long = "format", value_name = "TOKEN")]
    pub format: Option<String>,

    /// Exact output file path.
    #[arg(short = 'o', long = "output", value_name = "PATH", conflicts_with = "output_dir")]
    pub output: Option<PathBuf>,

    /// Directory for the generated `<prefix>_<timestamp>.<ext>` file.
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// File name prefix (default: input file stem).
    #[arg(long = "prefix", value_name = "NAME")]
    pub prefix: Option<String>,
}

impl From<ExportArgs> for ExportRequest {
    fn from(args: ExportArgs) -> Self {
        Self {
            input: args.input,
            format: args.format,
            output: args.output,
            output_dir: args.output_dir,
            prefix: args.prefix,
        }
    }
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
