//! Serializes the registry into the node/edge graph contract.

use std::collections::BTreeMap;

use super::state::{AnalysisState, Table};
use crate::types::{
    ColumnEntry, ColumnNodeData, EdgeData, FlowGraph, GraphEdge, GraphNode, GraphSummary,
    NodeData, NodeType, TableNodeData,
};
#[cfg(feature = "tracing")]
use tracing::debug;

fn table_node_id(table: &Table) -> String {
    format!("table_{}", table.id)
}

/// Each table node is followed by its column nodes; edges come last.
///
/// Relationships whose endpoints were never registered as tables (joins on
/// the `unknown` placeholder) are dropped here and not counted.
pub(crate) fn build_graph(state: &AnalysisState) -> FlowGraph {
    let mut nodes = Vec::new();
    let mut table_types: BTreeMap<_, usize> = BTreeMap::new();

    for table in state.tables() {
        let table_id = table_node_id(table);
        *table_types.entry(table.kind).or_default() += 1;

        nodes.push(GraphNode {
            data: NodeData::Table(TableNodeData {
                id: table_id.clone(),
                label: table.name.clone(),
                kind: table.kind,
                columns: table
                    .columns
                    .iter()
                    .map(|column| ColumnEntry {
                        id: column.id,
                        name: column.name.clone(),
                        role: column.role,
                    })
                    .collect(),
                node_type: NodeType::Table,
            }),
        });

        nodes.extend(table.columns.iter().map(|column| GraphNode {
            data: NodeData::Column(ColumnNodeData {
                id: format!("column_{}", column.id),
                label: column.name.clone(),
                role: column.role,
                parent: table_id.clone(),
                node_type: NodeType::Column,
            }),
        }));
    }

    let mut edges = Vec::new();
    for relationship in state.relationships() {
        let (Some(source), Some(target)) = (
            state.table(&relationship.source),
            state.table(&relationship.target),
        ) else {
            #[cfg(feature = "tracing")]
            debug!(
                source = relationship.source.as_str(),
                target = relationship.target.as_str(),
                "dropping relationship with unregistered endpoint"
            );
            continue;
        };

        edges.push(GraphEdge {
            data: EdgeData {
                id: format!("edge_{}", relationship.id),
                source: table_node_id(source),
                target: table_node_id(target),
                label: relationship.kind,
                kind: relationship.kind,
            },
        });
    }

    let summary = GraphSummary {
        total_tables: state.tables().len(),
        total_relationships: edges.len(),
        table_types,
    };

    FlowGraph {
        nodes,
        edges,
        summary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::UNKNOWN_TABLE;
    use crate::types::{ColumnRole, RelationshipKind, TableKind};

    #[test]
    fn test_columns_follow_their_table() {
        let mut state = AnalysisState::new();
        state.ensure_column("users", "id", ColumnRole::Selected);
        state.ensure_column("orders", "user_id", ColumnRole::Condition);
        state.ensure_column("users", "name", ColumnRole::Selected);

        let graph = build_graph(&state);
        let ids: Vec<_> = graph.nodes.iter().map(|n| n.data.id().to_string()).collect();
        assert_eq!(
            ids,
            vec!["table_1", "column_2", "column_5", "table_3", "column_4"]
        );
    }

    #[test]
    fn test_edges_with_missing_endpoint_are_dropped_and_not_counted() {
        let mut state = AnalysisState::new();
        state.ensure_table("users", TableKind::Source);
        state.add_relationship(UNKNOWN_TABLE, "users", RelationshipKind::Join);
        state.ensure_table("orders", TableKind::Source);
        state.add_relationship("users", "orders", RelationshipKind::Join);

        let graph = build_graph(&state);
        assert_eq!(graph.edges.len(), 1);
        assert_eq!(graph.edges[0].data.id, "edge_4");
        assert_eq!(graph.edges[0].data.source, "table_1");
        assert_eq!(graph.edges[0].data.target, "table_3");
        assert_eq!(graph.summary.total_relationships, 1);
    }

    #[test]
    fn test_summary_counts_kinds() {
        let mut state = AnalysisState::new();
        state.ensure_table("v", TableKind::View);
        state.ensure_table("a", TableKind::Source);
        state.ensure_table("b", TableKind::Source);

        let summary = build_graph(&state).summary;
        assert_eq!(summary.total_tables, 3);
        assert_eq!(summary.table_types.get(&TableKind::Source), Some(&2));
        assert_eq!(summary.table_types.get(&TableKind::View), Some(&1));
        assert_eq!(summary.table_types.get(&TableKind::Table), None);
    }

    #[test]
    fn test_build_graph_is_repeatable() {
        let mut state = AnalysisState::new();
        state.ensure_column("a", "id", ColumnRole::Condition);
        state.add_relationship("a", "b", RelationshipKind::Insert);
        assert_eq!(build_graph(&state), build_graph(&state));
    }
}
