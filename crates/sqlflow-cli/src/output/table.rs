//! Human-readable table output formatting.

use is_terminal::IsTerminal;
use owo_colors::OwoColorize;
use sqlflow_core::{
    AnalyzeResult, ColumnEntry, ColumnRole, RelationshipKind, Severity, TableKind,
};
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Tabled)]
struct TableRow {
    #[tabled(rename = "Table")]
    name: String,
    #[tabled(rename = "Type")]
    kind: &'static str,
    #[tabled(rename = "Columns")]
    columns: String,
}

#[derive(Tabled)]
struct RelationshipRow {
    #[tabled(rename = "Source")]
    source: String,
    #[tabled(rename = "Relationship")]
    kind: &'static str,
    #[tabled(rename = "Target")]
    target: String,
}

/// Format the analysis result as human-readable text with optional colors.
pub fn format_table(result: &AnalyzeResult, quiet: bool, use_colors: bool) -> String {
    let colored = use_colors && std::io::stdout().is_terminal();
    let mut out = String::new();

    write_header(&mut out, colored);
    write_summary(&mut out, result, colored);
    write_tables(&mut out, result, colored);
    write_relationships(&mut out, result, colored);

    if !quiet {
        write_issues(&mut out, result, colored);
    }

    out
}

fn push_line(out: &mut String, line: &str) {
    out.push_str(line);
    out.push('\n');
}

fn heading(text: &str, colored: bool) -> String {
    if colored {
        text.bold().to_string()
    } else {
        text.to_string()
    }
}

fn write_header(out: &mut String, colored: bool) {
    let line = "═".repeat(50);
    push_line(out, &heading("SQLFlow Analysis", colored));
    if colored {
        push_line(out, &line.dimmed().to_string());
    } else {
        push_line(out, &line);
    }
}

fn write_summary(out: &mut String, result: &AnalyzeResult, colored: bool) {
    let summary = &result.graph.summary;
    let stats = format!(
        "Summary: {} tables | {} relationships",
        summary.total_tables, summary.total_relationships
    );

    push_line(out, "");
    if colored {
        push_line(out, &stats.cyan().to_string());
    } else {
        push_line(out, &stats);
    }

    if !summary.table_types.is_empty() {
        let kinds: Vec<String> = summary
            .table_types
            .iter()
            .map(|(kind, count)| format!("{}: {count}", kind_label(*kind)))
            .collect();
        push_line(out, &format!("Types: {}", kinds.join(", ")));
    }
    push_line(out, "");
}

fn write_tables(out: &mut String, result: &AnalyzeResult, colored: bool) {
    let rows: Vec<TableRow> = result
        .graph
        .tables()
        .map(|table| TableRow {
            name: table.label.clone(),
            kind: kind_label(table.kind),
            columns: describe_columns(&table.columns),
        })
        .collect();

    if rows.is_empty() {
        push_line(out, "No tables found.");
        return;
    }

    push_line(out, &heading("Tables:", colored));
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    push_line(out, &table.to_string());
    push_line(out, "");
}

fn write_relationships(out: &mut String, result: &AnalyzeResult, colored: bool) {
    let graph = &result.graph;
    let rows: Vec<RelationshipRow> = graph
        .edges
        .iter()
        .map(|edge| RelationshipRow {
            source: graph
                .table_label(&edge.data.source)
                .unwrap_or(&edge.data.source)
                .to_string(),
            kind: relationship_label(edge.data.kind),
            target: graph
                .table_label(&edge.data.target)
                .unwrap_or(&edge.data.target)
                .to_string(),
        })
        .collect();

    if rows.is_empty() {
        return;
    }

    push_line(out, &heading("Relationships:", colored));
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    push_line(out, &table.to_string());
    push_line(out, "");
}

fn write_issues(out: &mut String, result: &AnalyzeResult, colored: bool) {
    if result.issues.is_empty() {
        return;
    }

    push_line(
        out,
        &heading(&format!("Issues ({}):", result.issues.len()), colored),
    );

    for issue in &result.issues {
        let (label, text) = match issue.severity {
            Severity::Warning => ("WARN", "WARN".yellow().to_string()),
            Severity::Info => ("INFO", "INFO".blue().to_string()),
        };
        let severity = if colored { text } else { label.to_string() };

        let location = issue
            .statement_index
            .map(|index| format!(" statement {index}:"))
            .unwrap_or_default();

        push_line(
            out,
            &format!("  [{severity}]{location} {}", issue.message),
        );
    }
}

fn describe_columns(columns: &[ColumnEntry]) -> String {
    columns
        .iter()
        .map(|column| format!("{} ({})", column.name, role_label(column.role)))
        .collect::<Vec<_>>()
        .join(", ")
}

fn kind_label(kind: TableKind) -> &'static str {
    match kind {
        TableKind::Table => "table",
        TableKind::View => "view",
        TableKind::Source => "source",
        TableKind::Target => "target",
    }
}

fn role_label(role: ColumnRole) -> &'static str {
    match role {
        ColumnRole::Column => "column",
        ColumnRole::Selected => "selected",
        ColumnRole::Condition => "condition",
        ColumnRole::Target => "target",
    }
}

fn relationship_label(kind: RelationshipKind) -> &'static str {
    match kind {
        RelationshipKind::Join => "join",
        RelationshipKind::Insert => "insert",
        RelationshipKind::ViewDependency => "view_dependency",
        RelationshipKind::ForeignKey => "foreign_key",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlflow_core::{analyze, AnalyzeRequest, Dialect};

    fn run(sql: &str) -> AnalyzeResult {
        analyze(&AnalyzeRequest::new(sql, Dialect::Generic)).unwrap()
    }

    #[test]
    fn test_format_table_basic() {
        let output = format_table(
            &run("SELECT u.id FROM users u JOIN orders o ON u.id = o.user_id"),
            false,
            false,
        );
        assert!(output.contains("SQLFlow Analysis"));
        assert!(output.contains("Summary: 2 tables | 1 relationships"));
        assert!(output.contains("Types: source: 2"));
        assert!(output.contains("id (selected)"));
        assert!(output.contains("user_id (condition)"));
        assert!(output.contains("join"));
    }

    #[test]
    fn test_format_table_quiet_hides_issues() {
        let result = run("DROP TABLE users");
        let quiet = format_table(&result, true, false);
        let verbose = format_table(&result, false, false);

        assert!(!quiet.contains("Issues"));
        assert!(verbose.contains("Issues (1):"));
        assert!(verbose.contains("[WARN] statement 0:"));
        assert!(quiet.contains("No tables found."));
    }
}
