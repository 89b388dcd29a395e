#![allow(dead_code)]

use sqlflow_core::{analyze, AnalysisOptions, AnalyzeRequest, AnalyzeResult, Dialect, FlowGraph};

pub fn run(sql: &str) -> AnalyzeResult {
    run_with(sql, Dialect::Generic, AnalysisOptions::default())
}

pub fn run_with(sql: &str, dialect: Dialect, options: AnalysisOptions) -> AnalyzeResult {
    let mut request = AnalyzeRequest::new(sql, dialect);
    request.options = Some(options);
    analyze(&request).expect("analysis should succeed")
}

/// Edges as `(source label, kind, target label)` triples.
pub fn edge_triples(graph: &FlowGraph) -> Vec<(String, String, String)> {
    graph
        .edges
        .iter()
        .map(|edge| {
            let kind = serde_json::to_value(edge.data.kind).expect("kind serializes");
            (
                graph
                    .table_label(&edge.data.source)
                    .unwrap_or_default()
                    .to_string(),
                kind.as_str().unwrap_or_default().to_string(),
                graph
                    .table_label(&edge.data.target)
                    .unwrap_or_default()
                    .to_string(),
            )
        })
        .collect()
}

/// Table labels with their kind, in emission order.
pub fn table_kinds(graph: &FlowGraph) -> Vec<(String, String)> {
    graph
        .tables()
        .map(|table| {
            let kind = serde_json::to_value(table.kind).expect("kind serializes");
            (
                table.label.clone(),
                kind.as_str().unwrap_or_default().to_string(),
            )
        })
        .collect()
}
