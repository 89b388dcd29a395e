//! The node/edge graph contract produced by the analyzer.
//!
//! Field order here is part of the wire format: serialized output must be
//! byte-for-byte stable for identical input.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::common::Issue;

/// Classification of a table node.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum TableKind {
    /// Declared by CREATE TABLE or ALTER TABLE
    Table,
    /// Declared by CREATE VIEW
    View,
    /// Read from without being declared in the script
    Source,
    /// Written by INSERT, UPDATE or DELETE
    Target,
}

/// Why a column was observed. This is not a SQL data type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ColumnRole {
    /// Declared in a CREATE TABLE column list
    Column,
    /// Projected by a SELECT
    Selected,
    /// Compared in a WHERE or ON predicate
    Condition,
    /// Written by INSERT or UPDATE
    Target,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipKind {
    Join,
    Insert,
    ViewDependency,
    ForeignKey,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    Table,
    Column,
}

/// Complete lineage graph for one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, Default)]
pub struct FlowGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
    pub summary: GraphSummary,
}

impl FlowGraph {
    /// Table nodes in emission order.
    pub fn tables(&self) -> impl Iterator<Item = &TableNodeData> {
        self.nodes.iter().filter_map(|node| match &node.data {
            NodeData::Table(table) => Some(table),
            NodeData::Column(_) => None,
        })
    }

    /// Looks up a table node by its label.
    pub fn table(&self, label: &str) -> Option<&TableNodeData> {
        self.tables().find(|table| table.label == label)
    }

    /// Label of the table node with the given node id.
    pub fn table_label(&self, id: &str) -> Option<&str> {
        self.tables()
            .find(|table| table.id == id)
            .map(|table| table.label.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct GraphNode {
    pub data: NodeData,
}

/// Node payload. Table nodes carry `columns`; column nodes carry `parent`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum NodeData {
    Table(TableNodeData),
    Column(ColumnNodeData),
}

impl NodeData {
    pub fn id(&self) -> &str {
        match self {
            Self::Table(table) => &table.id,
            Self::Column(column) => &column.id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TableNodeData {
    /// `table_<n>`
    pub id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub kind: TableKind,
    pub columns: Vec<ColumnEntry>,
    pub node_type: NodeType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ColumnNodeData {
    /// `column_<n>`
    pub id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub role: ColumnRole,
    /// Id of the owning table node
    pub parent: String,
    pub node_type: NodeType,
}

/// A column as listed inside its table node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ColumnEntry {
    pub id: u64,
    pub name: String,
    #[serde(rename = "type")]
    pub role: ColumnRole,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct GraphEdge {
    pub data: EdgeData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct EdgeData {
    /// `edge_<n>`
    pub id: String,
    /// Source table node id
    pub source: String,
    /// Target table node id
    pub target: String,
    pub label: RelationshipKind,
    #[serde(rename = "type")]
    pub kind: RelationshipKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct GraphSummary {
    pub total_tables: usize,
    /// Number of edges actually emitted
    pub total_relationships: usize,
    /// Table count per kind, keys in declaration order of [`TableKind`]
    pub table_types: BTreeMap<TableKind, usize>,
}

/// Result of an analysis call: the graph plus any non-fatal issues.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, Default)]
pub struct AnalyzeResult {
    #[serde(flatten)]
    pub graph: FlowGraph,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<Issue>,
}

impl AnalyzeResult {
    pub fn has_issues(&self) -> bool {
        !self.issues.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_node_field_order() {
        let node = GraphNode {
            data: NodeData::Table(TableNodeData {
                id: "table_1".to_string(),
                label: "users".to_string(),
                kind: TableKind::Source,
                columns: vec![ColumnEntry {
                    id: 2,
                    name: "id".to_string(),
                    role: ColumnRole::Selected,
                }],
                node_type: NodeType::Table,
            }),
        };
        assert_eq!(
            serde_json::to_string(&node).unwrap(),
            r#"{"data":{"id":"table_1","label":"users","type":"source","columns":[{"id":2,"name":"id","type":"selected"}],"nodeType":"table"}}"#
        );
    }

    #[test]
    fn test_column_node_round_trips_as_column() {
        let json = r#"{"data":{"id":"column_2","label":"id","type":"target","parent":"table_1","nodeType":"column"}}"#;
        let node: GraphNode = serde_json::from_str(json).unwrap();
        assert!(matches!(node.data, NodeData::Column(ref c) if c.role == ColumnRole::Target));
        assert_eq!(serde_json::to_string(&node).unwrap(), json);
    }

    #[test]
    fn test_summary_table_types_are_sorted_by_kind() {
        let mut summary = GraphSummary::default();
        summary.table_types.insert(TableKind::Target, 1);
        summary.table_types.insert(TableKind::Table, 2);
        assert_eq!(
            serde_json::to_string(&summary).unwrap(),
            r#"{"totalTables":0,"totalRelationships":0,"tableTypes":{"table":2,"target":1}}"#
        );
    }

    #[test]
    fn test_edge_label_and_type_share_kind() {
        let edge = EdgeData {
            id: "edge_7".to_string(),
            source: "table_2".to_string(),
            target: "table_1".to_string(),
            label: RelationshipKind::ViewDependency,
            kind: RelationshipKind::ViewDependency,
        };
        assert_eq!(
            serde_json::to_string(&edge).unwrap(),
            r#"{"id":"edge_7","source":"table_2","target":"table_1","label":"view_dependency","type":"view_dependency"}"#
        );
    }
}
