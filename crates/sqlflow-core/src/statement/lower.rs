//! Lowering from `sqlparser` trees into the lineage statement model.

use sqlparser::ast::{
    self, AssignmentTarget, ColumnOption, Expr, FromTable, JoinConstraint, JoinOperator,
    ObjectName, Query, Select, SelectItem, SelectItemQualifiedWildcardKind, SetExpr, Statement,
    TableAlias, TableConstraint, TableFactor, TableObject, TableWithJoins, UpdateTableFromKind,
};

use super::model::*;
use crate::error::LineageError;

/// Lowers a parsed script, keeping statement order.
pub fn lower_statements(statements: &[Statement]) -> Result<Vec<LineageStatement>, LineageError> {
    statements
        .iter()
        .enumerate()
        .map(|(index, statement)| lower_statement(statement, index))
        .collect()
}

/// Lowers one statement. `index` is only used to label errors.
pub fn lower_statement(
    statement: &Statement,
    index: usize,
) -> Result<LineageStatement, LineageError> {
    let lowered = match statement {
        Statement::Query(query) => match query.body.as_ref() {
            // `WITH ... INSERT/UPDATE/DELETE` arrives as a query whose body is the
            // data-modifying statement.
            SetExpr::Insert(inner) | SetExpr::Update(inner) | SetExpr::Delete(inner) => {
                let mut lowered = lower_statement(inner, index)?;
                attach_ctes(&mut lowered, lower_ctes(query));
                lowered
            }
            _ => LineageStatement::Select(lower_query(query)),
        },
        Statement::Insert(insert) => {
            let table = match &insert.table {
                TableObject::TableName(name) => object_name(name),
                TableObject::TableFunction(function) => {
                    return Err(LineageError::malformed(
                        index,
                        format!("INSERT target `{function}` is a table function"),
                    ));
                }
            };
            let source = match &insert.source {
                None => InsertSource::DefaultValues,
                Some(query) if matches!(query.body.as_ref(), SetExpr::Values(_)) => {
                    InsertSource::Values
                }
                Some(query) => InsertSource::Query {
                    query: Box::new(lower_query(query)),
                },
            };
            LineageStatement::Insert(InsertStatement {
                with: Vec::new(),
                table,
                columns: insert.columns.iter().map(|c| c.value.clone()).collect(),
                source,
            })
        }
        Statement::Update {
            table,
            assignments,
            from,
            selection,
            ..
        } => {
            let mut relations = Vec::new();
            lower_table_with_joins(table, &mut relations);
            let (name, alias) = match take_first(&mut relations) {
                Some(FromItem {
                    source: TableSource::Table { name },
                    alias,
                    ..
                }) => (name, alias),
                _ => {
                    return Err(LineageError::malformed(
                        index,
                        format!("UPDATE target `{table}` is not a named table"),
                    ));
                }
            };

            if let Some(
                UpdateTableFromKind::BeforeSet(tables) | UpdateTableFromKind::AfterSet(tables),
            ) = from
            {
                for twj in tables {
                    lower_table_with_joins(twj, &mut relations);
                }
            }

            LineageStatement::Update(UpdateStatement {
                with: Vec::new(),
                table: TableRef { name, alias },
                assignments: assignments
                    .iter()
                    .flat_map(|assignment| match &assignment.target {
                        AssignmentTarget::ColumnName(column) => vec![last_part(column)],
                        AssignmentTarget::Tuple(columns) => columns.iter().map(last_part).collect(),
                    })
                    .collect(),
                from: relations,
                selection: selection.as_ref().map(lower_expr),
            })
        }
        Statement::Delete(delete) => {
            let mut relations = Vec::new();
            let (FromTable::WithFromKeyword(tables) | FromTable::WithoutKeyword(tables)) =
                &delete.from;
            for twj in tables {
                lower_table_with_joins(twj, &mut relations);
            }
            if let Some(using) = &delete.using {
                for twj in using {
                    lower_table_with_joins(twj, &mut relations);
                }
            }

            // MySQL multi-table form names the target before FROM and keeps every
            // relation as a source.
            let table = match delete.tables.first() {
                Some(target) => {
                    let target = object_name(target);
                    relations
                        .iter()
                        .find_map(|item| match &item.source {
                            TableSource::Table { name }
                                if *name == target || item.alias.as_deref() == Some(&target) =>
                            {
                                Some(TableRef {
                                    name: name.clone(),
                                    alias: item.alias.clone(),
                                })
                            }
                            _ => None,
                        })
                        .unwrap_or_else(|| TableRef::new(target))
                }
                None => match take_first(&mut relations) {
                    Some(FromItem {
                        source: TableSource::Table { name },
                        alias,
                        ..
                    }) => TableRef { name, alias },
                    _ => {
                        return Err(LineageError::malformed(
                            index,
                            "DELETE has no named target table",
                        ));
                    }
                },
            };

            LineageStatement::Delete(DeleteStatement {
                with: Vec::new(),
                table,
                using: relations,
                selection: delete.selection.as_ref().map(lower_expr),
            })
        }
        Statement::CreateTable(create) => {
            let columns = create
                .columns
                .iter()
                .map(|column| ColumnDefinition {
                    name: column.name.value.clone(),
                    references: column.options.iter().find_map(|option| match &option.option {
                        ColumnOption::ForeignKey { foreign_table, .. } => {
                            Some(object_name(foreign_table))
                        }
                        _ => None,
                    }),
                })
                .collect();
            let foreign_keys = create
                .constraints
                .iter()
                .filter_map(|constraint| match constraint {
                    TableConstraint::ForeignKey {
                        columns,
                        foreign_table,
                        ..
                    } => Some(ForeignKey {
                        columns: columns.iter().map(|c| c.value.clone()).collect(),
                        references: object_name(foreign_table),
                    }),
                    _ => None,
                })
                .collect();

            LineageStatement::CreateTable(CreateTableStatement {
                table: object_name(&create.name),
                columns,
                foreign_keys,
                query: create.query.as_ref().map(|q| Box::new(lower_query(q))),
            })
        }
        Statement::CreateView { name, query, .. } => {
            LineageStatement::CreateView(CreateViewStatement {
                view: object_name(name),
                query: lower_query(query),
            })
        }
        Statement::AlterTable { name, .. } => {
            LineageStatement::AlterTable(TableRef::new(object_name(name)))
        }
        other => LineageStatement::Unsupported {
            kind: statement_keyword(other),
        },
    };
    Ok(lowered)
}

fn lower_query(query: &Query) -> SelectStatement {
    let mut select = lower_set_expr(&query.body);
    let mut ctes = lower_ctes(query);
    ctes.append(&mut select.with);
    select.with = ctes;
    select
}

fn lower_ctes(query: &Query) -> Vec<CommonTableExpr> {
    query
        .with
        .iter()
        .flat_map(|with| &with.cte_tables)
        .map(|cte| CommonTableExpr {
            name: cte.alias.name.value.clone(),
            query: lower_query(&cte.query),
        })
        .collect()
}

/// Prepends the CTEs of an enclosing query to a data-modifying statement.
fn attach_ctes(statement: &mut LineageStatement, mut ctes: Vec<CommonTableExpr>) {
    let with = match statement {
        LineageStatement::Insert(insert) => &mut insert.with,
        LineageStatement::Update(update) => &mut update.with,
        LineageStatement::Delete(delete) => &mut delete.with,
        _ => return,
    };
    ctes.append(with);
    *with = ctes;
}

fn lower_set_expr(body: &SetExpr) -> SelectStatement {
    match body {
        SetExpr::Select(select) => lower_select(select),
        SetExpr::Query(query) => lower_query(query),
        SetExpr::SetOperation { left, right, .. } => {
            let mut select = lower_set_expr(left);
            let mut branch = lower_set_expr(right);
            let nested = std::mem::take(&mut branch.union);
            select.union.push(branch);
            select.union.extend(nested);
            select
        }
        _ => SelectStatement::default(),
    }
}

fn lower_select(select: &Select) -> SelectStatement {
    let mut from = Vec::new();
    for twj in &select.from {
        lower_table_with_joins(twj, &mut from);
    }

    SelectStatement {
        with: Vec::new(),
        from,
        columns: select.projection.iter().map(lower_select_item).collect(),
        selection: select.selection.as_ref().map(lower_expr),
        union: Vec::new(),
    }
}

fn lower_select_item(item: &SelectItem) -> Expression {
    match item {
        SelectItem::UnnamedExpr(expr) | SelectItem::ExprWithAlias { expr, .. } => lower_expr(expr),
        SelectItem::QualifiedWildcard(SelectItemQualifiedWildcardKind::ObjectName(name), _) => {
            Expression::column(Some(&object_name(name)), "*")
        }
        SelectItem::QualifiedWildcard(SelectItemQualifiedWildcardKind::Expr(_), _) => {
            Expression::Other
        }
        SelectItem::Wildcard(_) => Expression::column(None, "*"),
    }
}

fn lower_table_with_joins(twj: &TableWithJoins, items: &mut Vec<FromItem>) {
    lower_table_factor(&twj.relation, false, None, items);
    for join in &twj.joins {
        let on = join_on_expr(&join.join_operator).map(lower_expr);
        lower_table_factor(&join.relation, true, on, items);
    }
}

fn lower_table_factor(
    factor: &TableFactor,
    join: bool,
    on: Option<Expression>,
    items: &mut Vec<FromItem>,
) {
    match factor {
        TableFactor::Table { name, alias, .. } => items.push(FromItem {
            source: TableSource::Table {
                name: object_name(name),
            },
            alias: alias_name(alias),
            join,
            on,
        }),
        TableFactor::Derived {
            subquery, alias, ..
        } => items.push(FromItem {
            source: TableSource::Subquery {
                query: Box::new(lower_query(subquery)),
            },
            alias: alias_name(alias),
            join,
            on,
        }),
        TableFactor::NestedJoin {
            table_with_joins, ..
        } => {
            let start = items.len();
            lower_table_with_joins(table_with_joins, items);
            // The outer condition belongs to the parenthesized group as a whole.
            if let Some(first) = items.get_mut(start) {
                first.join |= join;
                if first.on.is_none() {
                    first.on = on;
                }
            }
        }
        // Table functions, UNNEST, PIVOT and friends name no table.
        _ => {}
    }
}

fn join_on_expr(join_operator: &JoinOperator) -> Option<&Expr> {
    let constraint = match join_operator {
        JoinOperator::Join(constraint)
        | JoinOperator::Inner(constraint)
        | JoinOperator::Left(constraint)
        | JoinOperator::LeftOuter(constraint)
        | JoinOperator::Right(constraint)
        | JoinOperator::RightOuter(constraint)
        | JoinOperator::FullOuter(constraint)
        | JoinOperator::CrossJoin(constraint)
        | JoinOperator::Semi(constraint)
        | JoinOperator::LeftSemi(constraint)
        | JoinOperator::RightSemi(constraint)
        | JoinOperator::Anti(constraint)
        | JoinOperator::LeftAnti(constraint)
        | JoinOperator::RightAnti(constraint)
        | JoinOperator::StraightJoin(constraint) => constraint,
        JoinOperator::AsOf { constraint, .. } => constraint,
        JoinOperator::CrossApply | JoinOperator::OuterApply => return None,
    };

    match constraint {
        JoinConstraint::On(expr) => Some(expr),
        _ => None,
    }
}

fn lower_expr(expr: &Expr) -> Expression {
    match expr {
        Expr::Identifier(ident) => Expression::column(None, ident.value.clone()),
        Expr::CompoundIdentifier(parts) => match parts.split_last() {
            Some((column, [])) => Expression::column(None, column.value.clone()),
            Some((column, qualifier)) => {
                let table = qualifier
                    .iter()
                    .map(|ident| ident.value.as_str())
                    .collect::<Vec<_>>()
                    .join(".");
                Expression::column(Some(&table), column.value.clone())
            }
            None => Expression::Other,
        },
        Expr::Nested(inner) => lower_expr(inner),
        Expr::BinaryOp { left, op, right } => match lower_operator(op) {
            Some(operator) => Expression::binary(operator, lower_expr(left), lower_expr(right)),
            None => Expression::Other,
        },
        _ => Expression::Other,
    }
}

fn lower_operator(op: &ast::BinaryOperator) -> Option<BinaryOperator> {
    Some(match op {
        ast::BinaryOperator::Eq => BinaryOperator::Eq,
        ast::BinaryOperator::NotEq => BinaryOperator::NotEq,
        ast::BinaryOperator::Lt => BinaryOperator::Lt,
        ast::BinaryOperator::LtEq => BinaryOperator::LtEq,
        ast::BinaryOperator::Gt => BinaryOperator::Gt,
        ast::BinaryOperator::GtEq => BinaryOperator::GtEq,
        ast::BinaryOperator::And => BinaryOperator::And,
        ast::BinaryOperator::Or => BinaryOperator::Or,
        _ => return None,
    })
}

/// Dotted name built from identifier values, without quoting.
fn object_name(name: &ObjectName) -> String {
    name.0
        .iter()
        .map(|part| {
            part.as_ident()
                .map(|ident| ident.value.clone())
                .unwrap_or_else(|| part.to_string())
        })
        .collect::<Vec<_>>()
        .join(".")
}

fn last_part(name: &ObjectName) -> String {
    name.0
        .last()
        .map(|part| {
            part.as_ident()
                .map(|ident| ident.value.clone())
                .unwrap_or_else(|| part.to_string())
        })
        .unwrap_or_default()
}

fn take_first(items: &mut Vec<FromItem>) -> Option<FromItem> {
    (!items.is_empty()).then(|| items.remove(0))
}

fn alias_name(alias: &Option<TableAlias>) -> Option<String> {
    alias.as_ref().map(|alias| alias.name.value.clone())
}

/// Leading upper-case keywords of the rendered statement, e.g. `DROP TABLE`.
fn statement_keyword(statement: &Statement) -> String {
    let rendered = statement.to_string();
    let keyword = rendered
        .split_whitespace()
        .take_while(|word| word.chars().all(|c| c.is_ascii_uppercase() || c == '_'))
        .take(2)
        .collect::<Vec<_>>()
        .join(" ");
    if keyword.is_empty() {
        "UNKNOWN".to_string()
    } else {
        keyword
    }
}
