//! Statement dispatch and the DML handlers.

use super::input::StatementInput;
use super::scope::Scope;
use super::Analyzer;
use crate::statement::{
    CommonTableExpr, DeleteStatement, Expression, FromItem, InsertSource, InsertStatement,
    LineageStatement, SelectStatement, TableSource, UpdateStatement,
};
use crate::types::{issue_codes, ColumnRole, Issue, RelationshipKind, SourceLinking, TableKind};
#[cfg(feature = "tracing")]
use tracing::debug;

impl Analyzer {
    pub(super) fn analyze_statement(&mut self, index: usize, input: &StatementInput) {
        match &input.statement {
            LineageStatement::Select(select) => {
                self.analyze_select(select, &Scope::default());
            }
            LineageStatement::Insert(insert) => self.analyze_insert(insert),
            LineageStatement::Update(update) => self.analyze_update(update),
            LineageStatement::Delete(delete) => self.analyze_delete(delete),
            LineageStatement::CreateTable(create) => self.analyze_create_table(create),
            LineageStatement::CreateView(create) => self.analyze_create_view(create),
            LineageStatement::AlterTable(table) => self.analyze_alter_table(table),
            LineageStatement::Unsupported { kind } => {
                #[cfg(feature = "tracing")]
                debug!(index, kind = kind.as_str(), "skipping statement without lineage");

                self.issues.push(
                    Issue::warning(
                        issue_codes::UNSUPPORTED_STATEMENT,
                        format!("{kind} statement has no lineage semantics and was skipped"),
                    )
                    .with_statement(index)
                    .with_source_name(input.source_name.clone()),
                );
            }
        }
    }

    /// Processes a query block and returns the tables it read, in order.
    pub(super) fn analyze_select(&mut self, select: &SelectStatement, parent: &Scope) -> Vec<String> {
        let mut scope = parent.child();
        let mut reads = Vec::new();

        self.analyze_ctes(&select.with, &mut scope, &mut reads);
        let branch_scope = scope.clone();

        self.register_relations(&select.from, &mut scope, &mut reads);

        for expr in &select.columns {
            if let Expression::ColumnRef { table, column } = expr {
                let table = scope.resolve(table.as_deref());
                self.state.ensure_column(&table, column, ColumnRole::Selected);
            }
        }

        self.analyze_join_conditions(&select.from, &scope);
        if let Some(selection) = &select.selection {
            self.infer_from_condition(selection, &scope);
        }

        for branch in &select.union {
            reads.extend(self.analyze_select(branch, &branch_scope));
        }

        reads
    }

    /// Processes CTE bodies in order; each name is visible to the CTEs after it.
    pub(super) fn analyze_ctes(
        &mut self,
        ctes: &[CommonTableExpr],
        scope: &mut Scope,
        reads: &mut Vec<String>,
    ) {
        for cte in ctes {
            reads.extend(self.analyze_select(&cte.query, scope));
            scope.add_cte(&cte.name);
        }
    }

    /// Registers FROM relations as sources and binds their aliases.
    pub(super) fn register_relations(
        &mut self,
        items: &[FromItem],
        scope: &mut Scope,
        reads: &mut Vec<String>,
    ) {
        for item in items {
            match &item.source {
                TableSource::Table { name } if scope.is_cte(name) => {
                    scope.bind_derived(item.alias.as_deref().unwrap_or(name));
                }
                TableSource::Table { name } => {
                    self.state.ensure_table(name, TableKind::Source);
                    scope.bind_table(name, item.alias.as_deref());
                    reads.push(name.clone());
                }
                TableSource::Subquery { query } => {
                    reads.extend(self.analyze_select(query, scope));
                    if let Some(alias) = &item.alias {
                        scope.bind_derived(alias);
                    }
                }
            }
        }
    }

    pub(super) fn analyze_join_conditions(&mut self, items: &[FromItem], scope: &Scope) {
        for item in items.iter().filter(|item| item.join) {
            if let Some(on) = &item.on {
                self.infer_from_condition(on, scope);
            }
        }
    }

    /// Adds `kind` relationships into `target` according to the source-linking policy.
    pub(super) fn link_sources(&mut self, reads: &[String], target: &str, kind: RelationshipKind) {
        let sources = match self.options.source_linking {
            SourceLinking::AllKnownSources => self.state.table_names_of_kind(TableKind::Source),
            SourceLinking::StatementSources => {
                let mut unique: Vec<String> = Vec::with_capacity(reads.len());
                for name in reads {
                    if !unique.contains(name) {
                        unique.push(name.clone());
                    }
                }
                unique
            }
        };

        for source in sources {
            self.state.add_relationship(&source, target, kind);
        }
    }

    fn analyze_insert(&mut self, insert: &InsertStatement) {
        self.state.ensure_table(&insert.table, TableKind::Target);

        let mut scope = Scope::default();
        let mut reads = Vec::new();
        self.analyze_ctes(&insert.with, &mut scope, &mut reads);

        match &insert.source {
            InsertSource::Values => {
                for column in &insert.columns {
                    self.state
                        .ensure_column(&insert.table, column, ColumnRole::Target);
                }
            }
            InsertSource::Query { query } => {
                reads.extend(self.analyze_select(query, &scope));
                self.link_sources(&reads, &insert.table, RelationshipKind::Insert);
            }
            InsertSource::DefaultValues => {}
        }
    }

    fn analyze_update(&mut self, update: &UpdateStatement) {
        let table = &update.table;
        self.state.ensure_table(&table.name, TableKind::Target);

        let mut scope = Scope::default();
        let mut reads = Vec::new();
        self.analyze_ctes(&update.with, &mut scope, &mut reads);
        scope.bind_table(&table.name, table.alias.as_deref());

        for column in &update.assignments {
            self.state
                .ensure_column(&table.name, column, ColumnRole::Target);
        }

        self.register_relations(&update.from, &mut scope, &mut reads);
        self.analyze_join_conditions(&update.from, &scope);

        if let Some(selection) = &update.selection {
            self.infer_from_condition(selection, &scope);
        }
    }

    fn analyze_delete(&mut self, delete: &DeleteStatement) {
        let table = &delete.table;
        self.state.ensure_table(&table.name, TableKind::Target);

        let mut scope = Scope::default();
        let mut reads = Vec::new();
        self.analyze_ctes(&delete.with, &mut scope, &mut reads);
        scope.bind_table(&table.name, table.alias.as_deref());

        self.register_relations(&delete.using, &mut scope, &mut reads);
        self.analyze_join_conditions(&delete.using, &scope);

        if let Some(selection) = &delete.selection {
            self.infer_from_condition(selection, &scope);
        }
    }
}
