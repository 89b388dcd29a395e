//! Entity registry for one analysis run.
//!
//! Tables, columns and relationships all draw ids from a single counter that
//! starts at 1, so ids reflect discovery order across entity kinds.

use std::collections::HashMap;

use crate::types::{ColumnRole, RelationshipKind, TableKind};

/// Placeholder owner for column references whose table cannot be determined.
pub const UNKNOWN_TABLE: &str = "unknown";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Table {
    pub(crate) id: u64,
    pub(crate) name: String,
    pub(crate) kind: TableKind,
    pub(crate) columns: Vec<Column>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Column {
    pub(crate) id: u64,
    pub(crate) name: String,
    pub(crate) role: ColumnRole,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Relationship {
    pub(crate) id: u64,
    pub(crate) source: String,
    pub(crate) target: String,
    pub(crate) kind: RelationshipKind,
}

#[derive(Debug)]
pub(crate) struct AnalysisState {
    /// Insertion ordered; `index` maps names to positions.
    tables: Vec<Table>,
    index: HashMap<String, usize>,
    relationships: Vec<Relationship>,
    next_id: u64,
}

impl Default for AnalysisState {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalysisState {
    pub(crate) fn new() -> Self {
        Self {
            tables: Vec::new(),
            index: HashMap::new(),
            relationships: Vec::new(),
            next_id: 1,
        }
    }

    fn allocate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Returns the table named `name`, creating it with `kind` on first sight.
    /// A repeat call never changes the recorded kind.
    pub(crate) fn ensure_table(&mut self, name: &str, kind: TableKind) -> &Table {
        let position = match self.index.get(name) {
            Some(&position) => position,
            None => {
                let id = self.allocate_id();
                self.tables.push(Table {
                    id,
                    name: name.to_string(),
                    kind,
                    columns: Vec::new(),
                });
                let position = self.tables.len() - 1;
                self.index.insert(name.to_string(), position);
                position
            }
        };
        &self.tables[position]
    }

    /// Returns the column, creating it (and its table, as a source) on first sight.
    ///
    /// Columns on [`UNKNOWN_TABLE`] are dropped and `None` is returned.
    pub(crate) fn ensure_column(
        &mut self,
        table: &str,
        column: &str,
        role: ColumnRole,
    ) -> Option<&Column> {
        if table == UNKNOWN_TABLE {
            return None;
        }

        self.ensure_table(table, TableKind::Source);
        let position = *self.index.get(table)?;

        let existing = self.tables[position]
            .columns
            .iter()
            .position(|c| c.name == column);
        let column_position = match existing {
            Some(column_position) => column_position,
            None => {
                let id = self.allocate_id();
                let columns = &mut self.tables[position].columns;
                columns.push(Column {
                    id,
                    name: column.to_string(),
                    role,
                });
                columns.len() - 1
            }
        };
        Some(&self.tables[position].columns[column_position])
    }

    /// Records a relationship. Self relationships are discarded.
    ///
    /// Endpoints are not required to exist; serialization drops edges whose
    /// tables are missing.
    pub(crate) fn add_relationship(
        &mut self,
        source: &str,
        target: &str,
        kind: RelationshipKind,
    ) -> Option<&Relationship> {
        if source == target {
            return None;
        }

        let id = self.allocate_id();
        self.relationships.push(Relationship {
            id,
            source: source.to_string(),
            target: target.to_string(),
            kind,
        });
        self.relationships.last()
    }

    pub(crate) fn table(&self, name: &str) -> Option<&Table> {
        self.index.get(name).map(|&position| &self.tables[position])
    }

    pub(crate) fn tables(&self) -> &[Table] {
        &self.tables
    }

    pub(crate) fn relationships(&self) -> &[Relationship] {
        &self.relationships
    }

    /// Names of all tables currently classified as `kind`, in discovery order.
    pub(crate) fn table_names_of_kind(&self, kind: TableKind) -> Vec<String> {
        self.tables
            .iter()
            .filter(|table| table.kind == kind)
            .map(|table| table.name.clone())
            .collect()
    }
}
