//! Normalized statement model.
//!
//! `sqlparser` trees are lowered once into [`LineageStatement`], a closed set of
//! statement shapes carrying only what lineage extraction reads. Table references
//! become plain dotted names here so the analyzer never inspects parser nodes.

mod lower;
mod model;

pub use lower::{lower_statement, lower_statements};
pub use model::{
    BinaryOperator, ColumnDefinition, CommonTableExpr, CreateTableStatement, CreateViewStatement,
    DeleteStatement, Expression, ForeignKey, FromItem, InsertSource, InsertStatement,
    LineageStatement, SelectStatement, TableRef, TableSource, UpdateStatement,
};
