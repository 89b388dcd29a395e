use std::collections::HashSet;

use proptest::prelude::*;
use sqlflow_core::{NodeData, UNKNOWN_TABLE};

mod common;
use common::run;

proptest! {
    #[test]
    fn join_between_distinct_tables_yields_one_edge(
        table_a in "[a-z]{1,8}",
        table_b in "[a-z]{1,8}",
        col_a in "[a-z]{1,8}",
        col_b in "[a-z]{1,8}",
    ) {
        prop_assume!(table_a != table_b);

        let sql = format!(
            "SELECT \"{ta}\".\"{ca}\" FROM \"{ta}\" JOIN \"{tb}\" ON \"{ta}\".\"{ca}\" = \"{tb}\".\"{cb}\"",
            ta = table_a,
            tb = table_b,
            ca = col_a,
            cb = col_b,
        );
        let result = run(&sql);

        prop_assert_eq!(result.graph.summary.total_tables, 2);
        prop_assert_eq!(result.graph.summary.total_relationships, 1);
        prop_assert!(result.graph.table(&table_a).is_some());
        prop_assert!(result.graph.table(&table_b).is_some());
    }

    #[test]
    fn graphs_are_well_formed(
        tables in prop::collection::vec("[a-z]{1,6}", 1..5),
        column in "[a-z]{1,6}",
        target in "[a-z]{1,6}",
    ) {
        let from = tables
            .iter()
            .map(|t| format!("\"{t}\""))
            .collect::<Vec<_>>()
            .join(", ");
        let predicate = format!("\"{}\".\"{column}\" = \"{}\".\"{column}\"", tables[0], tables[tables.len() - 1]);
        let sql = format!(
            "INSERT INTO \"{target}\" SELECT \"{column}\" FROM {from} WHERE {predicate}; \
             SELECT * FROM {from} WHERE {predicate}"
        );

        let first = run(&sql);
        let second = run(&sql);
        prop_assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );

        let graph = &first.graph;
        let table_ids: HashSet<&str> = graph.tables().map(|t| t.id.as_str()).collect();
        let mut labels = HashSet::new();
        for table in graph.tables() {
            prop_assert!(labels.insert(table.label.as_str()), "duplicate table {}", table.label);
            prop_assert_ne!(table.label.as_str(), UNKNOWN_TABLE);
        }
        for node in &graph.nodes {
            if let NodeData::Column(column) = &node.data {
                prop_assert!(table_ids.contains(column.parent.as_str()));
            }
        }
        for edge in &graph.edges {
            prop_assert_ne!(&edge.data.source, &edge.data.target);
            prop_assert!(table_ids.contains(edge.data.source.as_str()));
            prop_assert!(table_ids.contains(edge.data.target.as_str()));
        }

        prop_assert_eq!(graph.summary.total_tables, table_ids.len());
        prop_assert_eq!(graph.summary.total_relationships, graph.edges.len());
        prop_assert_eq!(
            graph.summary.table_types.values().sum::<usize>(),
            graph.summary.total_tables
        );
    }
}
