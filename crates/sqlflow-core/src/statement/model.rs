use schemars::JsonSchema;
use serde::{de, Deserialize, Deserializer, Serialize};

/// One statement as seen by the lineage analyzer.
///
/// Serialized with a `type` tag, so pre-parsed statement lists can be supplied
/// as JSON instead of SQL text. An unrecognized tag deserializes to
/// [`LineageStatement::Unsupported`] carrying the tag as its kind.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LineageStatement {
    Select(SelectStatement),
    Insert(InsertStatement),
    Update(UpdateStatement),
    Delete(DeleteStatement),
    CreateTable(CreateTableStatement),
    CreateView(CreateViewStatement),
    AlterTable(TableRef),
    /// Any statement without lineage semantics (DROP, GRANT, SET, ...).
    Unsupported { kind: String },
}

impl LineageStatement {
    /// Short name used in diagnostics and tracing.
    pub fn kind(&self) -> &str {
        match self {
            Self::Select(_) => "SELECT",
            Self::Insert(_) => "INSERT",
            Self::Update(_) => "UPDATE",
            Self::Delete(_) => "DELETE",
            Self::CreateTable(_) => "CREATE TABLE",
            Self::CreateView(_) => "CREATE VIEW",
            Self::AlterTable(_) => "ALTER TABLE",
            Self::Unsupported { kind } => kind,
        }
    }
}

/// Deserialization mirror of [`LineageStatement`] for the known tags.
#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum TaggedStatement {
    Select(SelectStatement),
    Insert(InsertStatement),
    Update(UpdateStatement),
    Delete(DeleteStatement),
    CreateTable(CreateTableStatement),
    CreateView(CreateViewStatement),
    AlterTable(TableRef),
    Unsupported { kind: String },
}

impl TaggedStatement {
    const TAGS: &'static [&'static str] = &[
        "select",
        "insert",
        "update",
        "delete",
        "create_table",
        "create_view",
        "alter_table",
        "unsupported",
    ];
}

impl From<TaggedStatement> for LineageStatement {
    fn from(statement: TaggedStatement) -> Self {
        match statement {
            TaggedStatement::Select(s) => Self::Select(s),
            TaggedStatement::Insert(s) => Self::Insert(s),
            TaggedStatement::Update(s) => Self::Update(s),
            TaggedStatement::Delete(s) => Self::Delete(s),
            TaggedStatement::CreateTable(s) => Self::CreateTable(s),
            TaggedStatement::CreateView(s) => Self::CreateView(s),
            TaggedStatement::AlterTable(s) => Self::AlterTable(s),
            TaggedStatement::Unsupported { kind } => Self::Unsupported { kind },
        }
    }
}

impl<'de> Deserialize<'de> for LineageStatement {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        let tag = match value.get("type") {
            Some(serde_json::Value::String(tag)) => tag.clone(),
            _ => return Err(de::Error::missing_field("type")),
        };

        if TaggedStatement::TAGS.contains(&tag.as_str()) {
            TaggedStatement::deserialize(value)
                .map(Self::from)
                .map_err(de::Error::custom)
        } else {
            Ok(Self::Unsupported { kind: tag })
        }
    }
}

/// A query block. Set operations keep their additional branches in `union`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub struct SelectStatement {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub with: Vec<CommonTableExpr>,
    #[serde(default)]
    pub from: Vec<FromItem>,
    #[serde(default)]
    pub columns: Vec<Expression>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selection: Option<Expression>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub union: Vec<SelectStatement>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CommonTableExpr {
    pub name: String,
    pub query: SelectStatement,
}

/// One relation in a FROM list. Joined relations follow their left-hand side
/// and carry the join condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FromItem {
    pub source: TableSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    /// True when this relation was introduced by a JOIN
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub join: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on: Option<Expression>,
}

impl FromItem {
    pub fn table(name: impl Into<String>, alias: Option<String>) -> Self {
        Self {
            source: TableSource::Table { name: name.into() },
            alias,
            join: false,
            on: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TableSource {
    Table { name: String },
    Subquery { query: Box<SelectStatement> },
}

/// A named table, optionally aliased.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TableRef {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

impl TableRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct InsertStatement {
    /// CTEs declared ahead of the INSERT keyword
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub with: Vec<CommonTableExpr>,
    pub table: String,
    #[serde(default)]
    pub columns: Vec<String>,
    pub source: InsertSource,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InsertSource {
    Values,
    Query { query: Box<SelectStatement> },
    DefaultValues,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct UpdateStatement {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub with: Vec<CommonTableExpr>,
    pub table: TableRef,
    /// Assigned column names
    #[serde(default)]
    pub assignments: Vec<String>,
    /// Extra relations from `UPDATE ... FROM`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub from: Vec<FromItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selection: Option<Expression>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DeleteStatement {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub with: Vec<CommonTableExpr>,
    pub table: TableRef,
    /// Extra relations from `DELETE ... USING` or a multi-table FROM
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub using: Vec<FromItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selection: Option<Expression>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CreateTableStatement {
    pub table: String,
    #[serde(default)]
    pub columns: Vec<ColumnDefinition>,
    /// Table-level `FOREIGN KEY (...) REFERENCES ...` constraints
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub foreign_keys: Vec<ForeignKey>,
    /// `CREATE TABLE ... AS SELECT`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<Box<SelectStatement>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ColumnDefinition {
    pub name: String,
    /// Table named by an inline `REFERENCES` clause
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub references: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ForeignKey {
    #[serde(default)]
    pub columns: Vec<String>,
    pub references: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CreateViewStatement {
    pub view: String,
    pub query: SelectStatement,
}

/// The part of an expression tree the extractor looks at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Expression {
    /// `column` or `qualifier.column`. The qualifier is a table name or alias
    /// exactly as written.
    ColumnRef {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        table: Option<String>,
        column: String,
    },
    Binary {
        operator: BinaryOperator,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    #[serde(other)]
    Other,
}

impl Expression {
    pub fn column(table: Option<&str>, column: impl Into<String>) -> Self {
        Self::ColumnRef {
            table: table.map(str::to_string),
            column: column.into(),
        }
    }

    pub fn binary(operator: BinaryOperator, left: Expression, right: Expression) -> Self {
        Self::Binary {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum BinaryOperator {
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    And,
    Or,
}

impl BinaryOperator {
    pub fn is_logical(self) -> bool {
        matches!(self, Self::And | Self::Or)
    }
}
