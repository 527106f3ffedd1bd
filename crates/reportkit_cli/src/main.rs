//! `reportkit` CLI.

use std::io::{self, IsTerminal};
use std::process::ExitCode;

use chrono::Utc;
use clap::Parser;
use reportkit_cli::commands::{ExportOutcome, ExportRequest, describe_formats, run_export};
use reportkit_cli::logging::{LogConfig, LogFormat, init_logging};

mod cli;

use crate::cli::{Cli, Command, LogFormatArg};

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(error) = init_logging(&log_config_from_cli(&cli)) {
        eprintln!("error: {error:#}");
        return ExitCode::FAILURE;
    }

    let result = match cli.command {
        Command::Export(args) => run_export(&ExportRequest::from(args), Utc::now()).map(|outcome| {
            print_outcome(&outcome);
        }),
        Command::Formats => {
            for c_line in describe_formats() {
                println!("{c_line}");
            }
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error:#}");
            ExitCode::FAILURE
        }
    }
}

fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    LogConfig::from_verbosity(cli.verbose, cli.quiet)
        .with_format(format)
        .with_ansi(io::stderr().is_terminal())
}

fn print_outcome(outcome: &ExportOutcome) {
    println!(
        "{} ({}, {} bytes, {} sections)",
        outcome.path.display(),
        outcome.format,
        outcome.n_bytes,
        outcome.report.sections.len()
    );
    for section in &outcome.report.sections {
        println!(
            "  {:<31}  {} rows x {} cols",
            section.section_name, section.n_rows, section.n_cols
        );
    }
    for c_warning in &outcome.report.warnings {
        println!("warning: {c_warning}");
    }
}
