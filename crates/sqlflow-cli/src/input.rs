//! Input handling for file reading and stdin support.

use anyhow::{Context, Result};
use serde::Deserialize;
use sqlflow_core::{FileSource, LineageStatement};
use std::io::{self, Read};
use std::path::PathBuf;

/// Name given to input read from stdin.
pub const STDIN_NAME: &str = "<stdin>";

/// Read input from files or stdin.
///
/// If no files are provided, reads from stdin.
/// Returns a vector of FileSource for multi-file analysis.
pub fn read_input(files: &[PathBuf]) -> Result<Vec<FileSource>> {
    if files.is_empty() {
        read_from_stdin()
    } else {
        read_from_files(files)
    }
}

fn read_from_stdin() -> Result<Vec<FileSource>> {
    let mut content = String::new();
    io::stdin()
        .read_to_string(&mut content)
        .context("Failed to read from stdin")?;

    Ok(vec![FileSource {
        name: STDIN_NAME.to_string(),
        content,
    }])
}

fn read_from_files(files: &[PathBuf]) -> Result<Vec<FileSource>> {
    files
        .iter()
        .map(|path| {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read file: {}", path.display()))?;

            Ok(FileSource {
                name: path.display().to_string(),
                content,
            })
        })
        .collect()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StatementDocument {
    Many(Vec<LineageStatement>),
    One(LineageStatement),
}

/// Decodes normalized statements from JSON sources, in source order.
///
/// Each source holds either one statement object or an array of them.
pub fn read_statements(sources: &[FileSource]) -> Result<Vec<LineageStatement>> {
    let mut statements = Vec::new();
    for source in sources {
        if source.content.trim().is_empty() {
            continue;
        }
        let document: StatementDocument = serde_json::from_str(&source.content)
            .with_context(|| format!("Invalid statement JSON in {}", source.name))?;
        match document {
            StatementDocument::Many(many) => statements.extend(many),
            StatementDocument::One(one) => statements.push(one),
        }
    }
    Ok(statements)
}
