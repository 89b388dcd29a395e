//! Error types for SQL parsing and lineage extraction.
//!
//! Two kinds of failure exist:
//!
//! - [`LineageError`]: terminal. Unparseable SQL or a statement tree that cannot be
//!   normalized aborts the whole analysis call; no partial graph is returned.
//!
//! - [`crate::types::Issue`]: non-fatal diagnostics (for example a skipped
//!   statement kind) collected next to the graph in the analysis result.

use crate::types::Dialect;
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;
use thiserror::Error;
#[cfg(feature = "tracing")]
use tracing::trace;

/// Terminal failure of an analysis call.
#[derive(Debug, Error)]
pub enum LineageError {
    /// Inline SQL could not be parsed.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// A named input file could not be parsed.
    #[error("failed to parse {name}: {source}")]
    ParseSource {
        name: String,
        #[source]
        source: ParseError,
    },

    /// The parser produced a statement the lineage model cannot represent,
    /// such as an INSERT whose destination is a table function.
    #[error("statement {index}: {message}")]
    MalformedStatement { index: usize, message: String },
}

impl LineageError {
    pub fn malformed(index: usize, message: impl Into<String>) -> Self {
        Self::MalformedStatement {
            index,
            message: message.into(),
        }
    }
}

/// Error encountered during SQL parsing.
///
/// Keeps the structured information reported by `sqlparser`, including the
/// position when the message carries one.
#[derive(Debug, Clone)]
pub struct ParseError {
    /// Human-readable error message.
    pub message: String,
    /// Line/column where the error occurred, if available.
    pub position: Option<Position>,
    /// The SQL dialect being parsed when the error occurred.
    pub dialect: Option<Dialect>,
}

/// Position information for a parse error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed).
    pub column: usize,
}

impl ParseError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            position: None,
            dialect: None,
        }
    }

    pub fn with_position(message: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            position: Some(Position { line, column }),
            ..Self::new(message)
        }
    }

    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = Some(dialect);
        self
    }

    /// Extracts `Line: X, Column: Y` from a sqlparser message.
    ///
    /// Coupled to sqlparser's message format; returns `None` when it changes.
    fn parse_position_from_message(message: &str) -> Option<Position> {
        static POSITION_REGEX: OnceLock<Option<Regex>> = OnceLock::new();
        let re = POSITION_REGEX
            .get_or_init(|| Regex::new(r"Line:\s*(\d+)\s*,\s*Column:\s*(\d+)").ok())
            .as_ref()?;

        let result = re.captures(message).and_then(|caps| {
            let line: usize = caps.get(1)?.as_str().parse().ok()?;
            let column: usize = caps.get(2)?.as_str().parse().ok()?;
            Some(Position { line, column })
        });

        #[cfg(feature = "tracing")]
        if result.is_none() && message.contains("Line") {
            trace!("no position found in parser message: {}", message);
        }

        result
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Parse error")?;

        if let Some(dialect) = self.dialect {
            write!(f, " ({})", dialect.label())?;
        }

        if let Some(pos) = self.position {
            write!(f, " at line {}, column {}", pos.line, pos.column)?;
        }

        write!(f, ": {}", self.message)
    }
}

impl std::error::Error for ParseError {}

impl From<sqlparser::parser::ParserError> for ParseError {
    fn from(err: sqlparser::parser::ParserError) -> Self {
        let message = err.to_string();
        let position = Self::parse_position_from_message(&message);

        Self {
            message,
            position,
            dialect: None,
        }
    }
}
