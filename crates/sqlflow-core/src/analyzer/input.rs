//! Input collection: parses and lowers every SQL source of a request.

use crate::error::LineageError;
use crate::parser::parse_sql_with_dialect;
use crate::statement::{lower_statement, LineageStatement};
use crate::types::{issue_codes, AnalyzeRequest, Issue};

/// A normalized statement alongside its source file, if any.
pub(crate) struct StatementInput {
    pub(crate) statement: LineageStatement,
    pub(crate) source_name: Option<String>,
}

/// Collects statements from `request.files` (in order) followed by `request.sql`.
///
/// Statement indices in errors are positions in the combined list. An empty
/// request is not an error: it yields no statements and an info issue.
pub(crate) fn collect_statements(
    request: &AnalyzeRequest,
) -> Result<(Vec<StatementInput>, Vec<Issue>), LineageError> {
    let mut statements = Vec::new();
    let mut issues = Vec::new();

    let has_sql = !request.sql.trim().is_empty();
    let has_files = request
        .files
        .as_ref()
        .map(|files| files.iter().any(|file| !file.content.trim().is_empty()))
        .unwrap_or(false);

    if !has_sql && !has_files {
        issues.push(Issue::info(
            issue_codes::EMPTY_INPUT,
            "No SQL statements to analyze",
        ));
        return Ok((statements, issues));
    }

    for file in request.files.iter().flatten() {
        let parsed = parse_sql_with_dialect(&file.content, request.dialect).map_err(|source| {
            LineageError::ParseSource {
                name: file.name.clone(),
                source,
            }
        })?;
        for statement in &parsed {
            statements.push(StatementInput {
                statement: lower_statement(statement, statements.len())?,
                source_name: Some(file.name.clone()),
            });
        }
    }

    if has_sql {
        let parsed = parse_sql_with_dialect(&request.sql, request.dialect)?;
        for statement in &parsed {
            statements.push(StatementInput {
                statement: lower_statement(statement, statements.len())?,
                source_name: request.source_name.clone(),
            });
        }
    }

    Ok((statements, issues))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Dialect, FileSource};

    fn file(name: &str, content: &str) -> FileSource {
        FileSource {
            name: name.to_string(),
            content: content.to_string(),
        }
    }

    #[test]
    fn test_files_precede_inline_sql() {
        let request = AnalyzeRequest {
            sql: "SELECT * FROM inline_table".to_string(),
            files: Some(vec![file("a.sql", "SELECT * FROM a; SELECT * FROM b")]),
            dialect: Dialect::Generic,
            source_name: Some("inline".to_string()),
            options: None,
        };

        let (statements, issues) = collect_statements(&request).unwrap();
        assert!(issues.is_empty());
        let sources: Vec<_> = statements
            .iter()
            .map(|s| s.source_name.as_deref())
            .collect();
        assert_eq!(sources, vec![Some("a.sql"), Some("a.sql"), Some("inline")]);
    }

    #[test]
    fn test_empty_request_yields_info_issue() {
        let (statements, issues) = collect_statements(&AnalyzeRequest::default()).unwrap();
        assert!(statements.is_empty());
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].code, issue_codes::EMPTY_INPUT);
    }

    #[test]
    fn test_file_parse_error_names_the_file() {
        let request = AnalyzeRequest {
            files: Some(vec![file("broken.sql", "SELECT * FROM")]),
            ..AnalyzeRequest::default()
        };
        let err = collect_statements(&request).err().unwrap();
        assert!(err.to_string().starts_with("failed to parse broken.sql"));
    }

    #[test]
    fn test_inline_parse_error_is_terminal() {
        let request = AnalyzeRequest::new("SELECT * FROM ok; SELEC nope", Dialect::Generic);
        assert!(matches!(
            collect_statements(&request),
            Err(LineageError::Parse(_))
        ));
    }
}
