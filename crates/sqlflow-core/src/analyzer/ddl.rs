//! DDL handlers: CREATE TABLE, CREATE VIEW and ALTER TABLE.

use super::scope::Scope;
use super::Analyzer;
use crate::statement::{CreateTableStatement, CreateViewStatement, TableRef};
use crate::types::{ColumnRole, RelationshipKind, TableKind};

impl Analyzer {
    pub(super) fn analyze_create_table(&mut self, create: &CreateTableStatement) {
        let table = create.table.as_str();
        self.state.ensure_table(table, TableKind::Table);

        for column in &create.columns {
            self.state
                .ensure_column(table, &column.name, ColumnRole::Column);
            if let Some(referenced) = &column.references {
                self.add_foreign_key(table, referenced);
            }
        }

        for foreign_key in &create.foreign_keys {
            self.add_foreign_key(table, &foreign_key.references);
        }

        if let Some(query) = &create.query {
            let reads = self.analyze_select(query, &Scope::default());
            self.link_sources(&reads, table, RelationshipKind::Insert);
        }
    }

    fn add_foreign_key(&mut self, table: &str, referenced: &str) {
        self.state.ensure_table(referenced, TableKind::Table);
        self.state
            .add_relationship(table, referenced, RelationshipKind::ForeignKey);
    }

    pub(super) fn analyze_create_view(&mut self, create: &CreateViewStatement) {
        self.state.ensure_table(&create.view, TableKind::View);
        let reads = self.analyze_select(&create.query, &Scope::default());
        self.link_sources(&reads, &create.view, RelationshipKind::ViewDependency);
    }

    pub(super) fn analyze_alter_table(&mut self, table: &TableRef) {
        self.state.ensure_table(&table.name, TableKind::Table);
    }
}
