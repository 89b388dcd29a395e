use crate::error::LineageError;
use crate::statement::LineageStatement;
use crate::types::*;
#[cfg(feature = "tracing")]
use tracing::info_span;

mod ddl;
mod expression;
mod graph;
mod input;
mod scope;
mod state;
mod statements;

pub use state::UNKNOWN_TABLE;

use input::{collect_statements, StatementInput};
use state::AnalysisState;

/// Main entry point: parses the request's SQL and builds its lineage graph.
///
/// Files are processed before inline SQL, all against one registry, so
/// entities with the same name merge across statements and files. A parse
/// failure anywhere aborts the call.
pub fn analyze(request: &AnalyzeRequest) -> Result<AnalyzeResult, LineageError> {
    #[cfg(feature = "tracing")]
    let _span = info_span!("analyze_request", dialect = request.dialect.as_str()).entered();

    let (inputs, issues) = collect_statements(request)?;
    let options = request.options.unwrap_or_default();

    let mut analyzer = Analyzer::new(options);
    analyzer.issues = issues;
    Ok(analyzer.run(&inputs))
}

/// Builds the lineage graph for already-normalized statements.
pub fn analyze_statements(
    statements: &[LineageStatement],
    options: &AnalysisOptions,
) -> AnalyzeResult {
    #[cfg(feature = "tracing")]
    let _span = info_span!("analyze_statements", count = statements.len()).entered();

    let inputs: Vec<StatementInput> = statements
        .iter()
        .cloned()
        .map(|statement| StatementInput {
            statement,
            source_name: None,
        })
        .collect();
    Analyzer::new(*options).run(&inputs)
}

/// Per-call analyzer. Owns the registry for exactly one run.
pub(crate) struct Analyzer {
    pub(crate) options: AnalysisOptions,
    pub(crate) state: AnalysisState,
    pub(crate) issues: Vec<Issue>,
}

impl Analyzer {
    fn new(options: AnalysisOptions) -> Self {
        Self {
            options,
            state: AnalysisState::new(),
            issues: Vec::new(),
        }
    }

    fn run(mut self, inputs: &[StatementInput]) -> AnalyzeResult {
        for (index, input) in inputs.iter().enumerate() {
            #[cfg(feature = "tracing")]
            let _stmt_span = info_span!(
                "analyze_statement",
                index,
                source = input.source_name.as_deref().unwrap_or("inline"),
                kind = input.statement.kind()
            )
            .entered();

            self.analyze_statement(index, input);
        }

        AnalyzeResult {
            graph: graph::build_graph(&self.state),
            issues: self.issues,
        }
    }
}
