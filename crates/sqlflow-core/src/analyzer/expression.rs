//! Join inference from WHERE and ON predicates.

use super::scope::Scope;
use super::Analyzer;
use crate::statement::Expression;
use crate::types::{ColumnRole, RelationshipKind};

impl Analyzer {
    /// Infers relationships from a predicate.
    ///
    /// Only comparisons are inspected. Each column-reference operand is recorded
    /// with the `condition` role, and a comparison between columns of two
    /// different tables adds a `join` from the left table to the right one.
    /// `AND`/`OR` trees are descended only when `recurse_conditions` is set.
    pub(super) fn infer_from_condition(&mut self, expr: &Expression, scope: &Scope) {
        let Expression::Binary {
            operator,
            left,
            right,
        } = expr
        else {
            return;
        };

        if operator.is_logical() {
            if self.options.recurse_conditions {
                self.infer_from_condition(left, scope);
                self.infer_from_condition(right, scope);
            }
            return;
        }

        let left_table = self.register_condition_operand(left, scope);
        let right_table = self.register_condition_operand(right, scope);

        if let (Some(left_table), Some(right_table)) = (left_table, right_table) {
            if left_table != right_table {
                self.state
                    .add_relationship(&left_table, &right_table, RelationshipKind::Join);
            }
        }
    }

    /// Records a column operand and returns its resolved table name.
    fn register_condition_operand(&mut self, operand: &Expression, scope: &Scope) -> Option<String> {
        let Expression::ColumnRef { table, column } = operand else {
            return None;
        };
        let table = scope.resolve(table.as_deref());
        self.state
            .ensure_column(&table, column, ColumnRole::Condition);
        Some(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::UNKNOWN_TABLE;
    use crate::statement::BinaryOperator;
    use crate::types::{AnalysisOptions, TableKind};

    fn eq(left: Expression, right: Expression) -> Expression {
        Expression::binary(BinaryOperator::Eq, left, right)
    }

    fn analyzer(recurse_conditions: bool) -> Analyzer {
        Analyzer::new(AnalysisOptions {
            recurse_conditions,
            ..AnalysisOptions::default()
        })
    }

    #[test]
    fn test_comparison_between_tables_adds_join_in_operand_order() {
        let mut analyzer = analyzer(false);
        analyzer.infer_from_condition(
            &eq(
                Expression::column(Some("orders"), "user_id"),
                Expression::column(Some("users"), "id"),
            ),
            &Scope::default(),
        );

        let relationships = analyzer.state.relationships();
        assert_eq!(relationships.len(), 1);
        assert_eq!(relationships[0].source, "orders");
        assert_eq!(relationships[0].target, "users");
        assert_eq!(
            analyzer.state.table("orders").map(|t| t.kind),
            Some(TableKind::Source)
        );
    }

    #[test]
    fn test_same_table_comparison_adds_no_join() {
        let mut analyzer = analyzer(false);
        analyzer.infer_from_condition(
            &Expression::binary(
                BinaryOperator::Lt,
                Expression::column(Some("t"), "start"),
                Expression::column(Some("t"), "finish"),
            ),
            &Scope::default(),
        );
        assert!(analyzer.state.relationships().is_empty());
        assert_eq!(analyzer.state.table("t").map(|t| t.columns.len()), Some(2));
    }

    #[test]
    fn test_literal_operand_only_registers_column() {
        let mut analyzer = analyzer(false);
        analyzer.infer_from_condition(
            &eq(Expression::column(Some("t"), "status"), Expression::Other),
            &Scope::default(),
        );
        assert!(analyzer.state.relationships().is_empty());
        assert_eq!(analyzer.state.tables().len(), 1);
    }

    #[test]
    fn test_unqualified_operand_never_creates_unknown_table() {
        let mut analyzer = analyzer(false);
        analyzer.infer_from_condition(
            &eq(
                Expression::column(None, "id"),
                Expression::column(Some("users"), "id"),
            ),
            &Scope::default(),
        );
        assert!(analyzer.state.table(UNKNOWN_TABLE).is_none());
        assert_eq!(analyzer.state.tables().len(), 1);
    }

    #[test]
    fn test_compound_predicates_respect_recursion_option() {
        let predicate = Expression::binary(
            BinaryOperator::And,
            eq(
                Expression::column(Some("a"), "id"),
                Expression::column(Some("b"), "a_id"),
            ),
            eq(
                Expression::column(Some("b"), "id"),
                Expression::column(Some("c"), "b_id"),
            ),
        );

        let mut flat = analyzer(false);
        flat.infer_from_condition(&predicate, &Scope::default());
        assert!(flat.state.relationships().is_empty());
        assert!(flat.state.tables().is_empty());

        let mut recursive = analyzer(true);
        recursive.infer_from_condition(&predicate, &Scope::default());
        assert_eq!(recursive.state.relationships().len(), 2);
    }
}
