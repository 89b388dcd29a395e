//! SQLFlow CLI - SQL lineage extractor

use sqlflow_cli::cli::{Args, OutputFormat};
use sqlflow_cli::config::{self, Settings};
use sqlflow_cli::input;
use sqlflow_cli::output::{format_json, format_mermaid, format_table};

use anyhow::{Context, Result};
use clap::Parser;
use sqlflow_core::{
    analyze, analyze_statements, api_schema, AnalysisOptions, AnalyzeRequest, AnalyzeResult,
    Dialect, FileSource, LineageError, Severity,
};
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// SQL could not be parsed or normalized.
const EXIT_FAILURE: u8 = 1;
/// Configuration or input error (bad config file, unreadable input).
const EXIT_CONFIG_ERROR: u8 = 66;

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    if args.list_dialects {
        print_dialects();
        return ExitCode::SUCCESS;
    }

    if args.schema {
        return match print_schema() {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("sqlflow: error: {e:#}");
                ExitCode::from(EXIT_FAILURE)
            }
        };
    }

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("sqlflow: error: {e:#}");
            if e.downcast_ref::<LineageError>().is_some() {
                ExitCode::from(EXIT_FAILURE)
            } else {
                ExitCode::from(EXIT_CONFIG_ERROR)
            }
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("warn")
        }
    });

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

fn print_dialects() {
    for dialect in Dialect::ALL {
        println!("{:<12} {}", dialect.as_str(), dialect.label());
    }
}

fn print_schema() -> Result<()> {
    let schema =
        serde_json::to_string_pretty(&api_schema()).context("Failed to serialize JSON Schema")?;
    println!("{schema}");
    Ok(())
}

fn run(args: Args) -> Result<()> {
    let config = config::load_config(args.config.as_deref())?;
    let settings = Settings::resolve(&args, config.as_ref());
    tracing::debug!(
        dialect = settings.dialect.as_str(),
        format = ?settings.format,
        "resolved settings"
    );

    let sources = input::read_input(&args.files)?;

    let result = if args.statements {
        let statements = input::read_statements(&sources)?;
        analyze_statements(&statements, &settings.options)
    } else {
        analyze(&build_request(sources, settings.dialect, settings.options))?
    };

    let output_str = match settings.format {
        OutputFormat::Json => format_json(&result, args.compact).context("Failed to export JSON")?,
        OutputFormat::Table => format_table(&result, args.quiet, !args.quiet),
        OutputFormat::Mermaid => format_mermaid(&result),
    };

    write_output(&args.output, &output_str)?;

    // The table report lists issues itself and JSON carries them in the document.
    if !args.quiet && settings.format == OutputFormat::Mermaid && result.has_issues() {
        print_issues_to_stderr(&result);
    }

    Ok(())
}

fn build_request(
    sources: Vec<FileSource>,
    dialect: Dialect,
    options: AnalysisOptions,
) -> AnalyzeRequest {
    if let [source] = sources.as_slice() {
        AnalyzeRequest {
            sql: source.content.clone(),
            files: None,
            dialect,
            source_name: Some(source.name.clone()),
            options: Some(options),
        }
    } else {
        AnalyzeRequest {
            sql: String::new(),
            files: Some(sources),
            dialect,
            source_name: None,
            options: Some(options),
        }
    }
}

fn write_output(path: &Option<PathBuf>, content: &str) -> Result<()> {
    if let Some(path) = path {
        fs::write(path, content)
            .with_context(|| format!("Failed to write to {}", path.display()))?;
    } else {
        io::stdout()
            .write_all(content.as_bytes())
            .context("Failed to write to stdout")?;
        // Ensure newline at end for terminal output
        if !content.ends_with('\n') {
            println!();
        }
    }
    Ok(())
}

fn print_issues_to_stderr(result: &AnalyzeResult) {
    for issue in &result.issues {
        let level = match issue.severity {
            Severity::Warning => "warning",
            Severity::Info => "info",
        };

        let location = issue
            .source_name
            .as_deref()
            .map(|name| format!(" {name}:"))
            .unwrap_or_default();

        eprintln!("sqlflow: {level}:{location} {}", issue.message);
    }
}
