//! Mermaid flowchart generation.

use sqlflow_core::{AnalyzeResult, RelationshipKind, TableKind};

/// Format the table-level graph as a Mermaid flowchart.
///
/// Views are drawn with rounded nodes; join edges are dotted since they carry
/// no direction of data flow.
pub fn format_mermaid(result: &AnalyzeResult) -> String {
    let graph = &result.graph;
    let mut lines = vec!["flowchart LR".to_string()];

    for table in graph.tables() {
        let id = sanitize_id(&table.id);
        let label = escape_label(&table.label);
        lines.push(match table.kind {
            TableKind::View => format!("    {id}(\"{label}\")"),
            _ => format!("    {id}[\"{label}\"]"),
        });
    }

    for edge in &graph.edges {
        let data = &edge.data;
        let arrow = match data.kind {
            RelationshipKind::Join => "-.->",
            _ => "-->",
        };
        lines.push(format!(
            "    {} {arrow}|{}| {}",
            sanitize_id(&data.source),
            relationship_label(data.kind),
            sanitize_id(&data.target)
        ));
    }

    lines.join("\n")
}

fn relationship_label(kind: RelationshipKind) -> &'static str {
    match kind {
        RelationshipKind::Join => "join",
        RelationshipKind::Insert => "insert",
        RelationshipKind::ViewDependency => "view_dependency",
        RelationshipKind::ForeignKey => "foreign_key",
    }
}

/// Sanitize node ID for Mermaid (remove special chars)
fn sanitize_id(id: &str) -> String {
    id.chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

fn escape_label(label: &str) -> String {
    label.replace('"', "#quot;").replace('\n', " ")
}
