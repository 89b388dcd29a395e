//! Table and column lineage extraction for SQL scripts.
//!
//! [`analyze`] parses SQL with `sqlparser`, lowers each statement into the
//! [`LineageStatement`] model and accumulates tables, columns and the
//! relationships between them into a [`FlowGraph`].

pub mod analyzer;
pub mod error;
pub mod parser;
pub mod schema;
pub mod statement;
pub mod types;

pub use analyzer::{analyze, analyze_statements, UNKNOWN_TABLE};
pub use error::{LineageError, ParseError};
pub use parser::{parse_sql, parse_sql_with_dialect};
pub use schema::api_schema;
pub use statement::{lower_statement, lower_statements, LineageStatement};

pub use types::{
    issue_codes, AnalysisOptions, AnalyzeRequest, AnalyzeResult, ColumnEntry, ColumnNodeData,
    ColumnRole, Dialect, EdgeData, FileSource, FlowGraph, GraphEdge, GraphNode, GraphSummary,
    Issue, NodeData, NodeType, RelationshipKind, Severity, SourceLinking, TableKind,
    TableNodeData,
};
