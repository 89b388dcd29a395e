//! Request types for the SQL lineage API.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A request to build a lineage graph from SQL text.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    /// The SQL code to analyze (UTF-8 string, multi-statement supported)
    #[serde(default)]
    pub sql: String,

    /// Optional list of source files, analyzed before `sql`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<FileSource>>,

    /// SQL dialect
    #[serde(default)]
    pub dialect: Dialect,

    /// Optional source name (file path or script identifier) for inline `sql`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_name: Option<String>,

    /// Optional analysis options
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<AnalysisOptions>,
}

impl AnalyzeRequest {
    /// Request for a single inline script.
    pub fn new(sql: impl Into<String>, dialect: Dialect) -> Self {
        Self {
            sql: sql.into(),
            dialect,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FileSource {
    pub name: String,
    pub content: String,
}

/// SQL dialect used to parse the input text.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    #[default]
    Generic,
    Ansi,
    Bigquery,
    Clickhouse,
    Databricks,
    Duckdb,
    Hive,
    Mssql,
    #[serde(alias = "mariadb")]
    Mysql,
    #[serde(alias = "postgresql")]
    Postgres,
    Redshift,
    Snowflake,
    Sqlite,
}

impl Dialect {
    /// Every supported dialect, in display order.
    pub const ALL: [Dialect; 13] = [
        Dialect::Generic,
        Dialect::Ansi,
        Dialect::Bigquery,
        Dialect::Clickhouse,
        Dialect::Databricks,
        Dialect::Duckdb,
        Dialect::Hive,
        Dialect::Mssql,
        Dialect::Mysql,
        Dialect::Postgres,
        Dialect::Redshift,
        Dialect::Snowflake,
        Dialect::Sqlite,
    ];

    pub fn to_sqlparser_dialect(&self) -> Box<dyn sqlparser::dialect::Dialect> {
        use sqlparser::dialect::{
            AnsiDialect, BigQueryDialect, ClickHouseDialect, DatabricksDialect, DuckDbDialect,
            GenericDialect, HiveDialect, MsSqlDialect, MySqlDialect, PostgreSqlDialect,
            RedshiftSqlDialect, SQLiteDialect, SnowflakeDialect,
        };
        match self {
            Self::Generic => Box::new(GenericDialect {}),
            Self::Ansi => Box::new(AnsiDialect {}),
            Self::Bigquery => Box::new(BigQueryDialect {}),
            Self::Clickhouse => Box::new(ClickHouseDialect {}),
            Self::Databricks => Box::new(DatabricksDialect {}),
            Self::Duckdb => Box::new(DuckDbDialect {}),
            Self::Hive => Box::new(HiveDialect {}),
            Self::Mssql => Box::new(MsSqlDialect {}),
            Self::Mysql => Box::new(MySqlDialect {}),
            Self::Postgres => Box::new(PostgreSqlDialect {}),
            Self::Redshift => Box::new(RedshiftSqlDialect {}),
            Self::Snowflake => Box::new(SnowflakeDialect {}),
            Self::Sqlite => Box::new(SQLiteDialect {}),
        }
    }

    /// The identifier used on the wire and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Generic => "generic",
            Self::Ansi => "ansi",
            Self::Bigquery => "bigquery",
            Self::Clickhouse => "clickhouse",
            Self::Databricks => "databricks",
            Self::Duckdb => "duckdb",
            Self::Hive => "hive",
            Self::Mssql => "mssql",
            Self::Mysql => "mysql",
            Self::Postgres => "postgres",
            Self::Redshift => "redshift",
            Self::Snowflake => "snowflake",
            Self::Sqlite => "sqlite",
        }
    }

    /// Human-readable product name.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Generic => "Generic SQL",
            Self::Ansi => "ANSI SQL",
            Self::Bigquery => "Google BigQuery",
            Self::Clickhouse => "ClickHouse",
            Self::Databricks => "Databricks",
            Self::Duckdb => "DuckDB",
            Self::Hive => "Apache Hive",
            Self::Mssql => "Microsoft SQL Server",
            Self::Mysql => "MySQL / MariaDB",
            Self::Postgres => "PostgreSQL",
            Self::Redshift => "Amazon Redshift",
            Self::Snowflake => "Snowflake",
            Self::Sqlite => "SQLite",
        }
    }
}

/// Which source tables an INSERT ... SELECT or CREATE VIEW is linked from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "camelCase")]
pub enum SourceLinking {
    /// Every table classified as `source` so far in the run, including tables
    /// read by earlier statements.
    #[default]
    AllKnownSources,
    /// Only the tables read by the statement's own query.
    StatementSources,
}

/// Options controlling the analysis behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisOptions {
    /// Source-table policy for insert and view-dependency edges
    #[serde(default)]
    pub source_linking: SourceLinking,

    /// Descend into AND/OR predicates when inferring join relationships
    #[serde(default)]
    pub recurse_conditions: bool,
}
