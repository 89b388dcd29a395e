//! CLI argument parsing using clap.

use clap::{Parser, ValueEnum};
use serde::Deserialize;
use sqlflow_core::{Dialect, SourceLinking};
use std::path::PathBuf;

/// SQLFlow - table and column lineage for SQL scripts
#[derive(Parser, Debug)]
#[command(name = "sqlflow")]
#[command(about = "Extract table and column lineage from SQL scripts", long_about = None)]
#[command(version)]
pub struct Args {
    /// SQL files to analyze (reads from stdin if none provided)
    #[arg(value_name = "FILES")]
    pub files: Vec<PathBuf>,

    /// SQL dialect [default: generic]
    #[arg(short, long, value_enum)]
    pub dialect: Option<DialectArg>,

    /// Output format [default: table]
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Output file (defaults to stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Compact JSON output (no pretty-printing)
    #[arg(short, long)]
    pub compact: bool,

    /// Suppress warnings on stderr
    #[arg(short, long)]
    pub quiet: bool,

    /// Treat input as JSON-encoded normalized statements instead of SQL
    #[arg(long)]
    pub statements: bool,

    /// Which tables feed INSERT and CREATE VIEW targets [default: all-known-sources]
    #[arg(long, value_enum)]
    pub source_linking: Option<SourceLinkingArg>,

    /// Descend into AND/OR predicates when inferring joins
    #[arg(long)]
    pub recurse_conditions: bool,

    /// Configuration file (defaults to ./sqlflow.toml when present)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// List supported dialects and exit
    #[arg(long)]
    pub list_dialects: bool,

    /// Print the JSON Schema of the request and result types and exit
    #[arg(long)]
    pub schema: bool,

    /// Enable debug logging on stderr
    #[arg(short, long)]
    pub verbose: bool,
}

/// SQL dialect options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DialectArg {
    Generic,
    Ansi,
    Bigquery,
    Clickhouse,
    Databricks,
    Duckdb,
    Hive,
    Mssql,
    #[value(alias = "mariadb")]
    Mysql,
    #[value(alias = "postgresql")]
    Postgres,
    Redshift,
    Snowflake,
    Sqlite,
}

impl From<DialectArg> for Dialect {
    fn from(d: DialectArg) -> Self {
        match d {
            DialectArg::Generic => Dialect::Generic,
            DialectArg::Ansi => Dialect::Ansi,
            DialectArg::Bigquery => Dialect::Bigquery,
            DialectArg::Clickhouse => Dialect::Clickhouse,
            DialectArg::Databricks => Dialect::Databricks,
            DialectArg::Duckdb => Dialect::Duckdb,
            DialectArg::Hive => Dialect::Hive,
            DialectArg::Mssql => Dialect::Mssql,
            DialectArg::Mysql => Dialect::Mysql,
            DialectArg::Postgres => Dialect::Postgres,
            DialectArg::Redshift => Dialect::Redshift,
            DialectArg::Snowflake => Dialect::Snowflake,
            DialectArg::Sqlite => Dialect::Sqlite,
        }
    }
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// JSON graph document
    Json,
    /// Mermaid flowchart
    Mermaid,
}

/// Source linking policy options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SourceLinkingArg {
    /// Link every source table seen so far in the script
    AllKnownSources,
    /// Link only the tables read by the statement itself
    StatementSources,
}

impl From<SourceLinkingArg> for SourceLinking {
    fn from(value: SourceLinkingArg) -> Self {
        match value {
            SourceLinkingArg::AllKnownSources => SourceLinking::AllKnownSources,
            SourceLinkingArg::StatementSources => SourceLinking::StatementSources,
        }
    }
}
