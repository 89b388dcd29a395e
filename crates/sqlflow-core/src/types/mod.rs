//! Types for the SQL lineage API.
//!
//! Requests carry SQL text (or pre-parsed statements) plus options; results carry
//! the node/edge graph consumed by visualization clients.

mod common;
mod graph;
mod request;

pub use common::{issue_codes, Issue, Severity};
pub use graph::{
    AnalyzeResult, ColumnEntry, ColumnNodeData, ColumnRole, EdgeData, FlowGraph, GraphEdge,
    GraphNode, GraphSummary, NodeData, NodeType, RelationshipKind, TableKind, TableNodeData,
};
pub use request::{AnalysisOptions, AnalyzeRequest, Dialect, FileSource, SourceLinking};
