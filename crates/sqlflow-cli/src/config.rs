//! Optional `sqlflow.toml` defaults, merged under command-line flags.

use anyhow::Context;
use serde::Deserialize;
use sqlflow_core::{AnalysisOptions, Dialect, SourceLinking};
use std::path::{Path, PathBuf};

use crate::cli::{Args, OutputFormat};

/// Contents of a `sqlflow.toml` file. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct SqlflowConfig {
    pub dialect: Option<Dialect>,
    pub format: Option<OutputFormat>,
    /// `allKnownSources` or `statementSources`
    pub source_linking: Option<SourceLinking>,
    pub recurse_conditions: Option<bool>,
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("sqlflow.toml")
}

/// Loads the config file.
///
/// A missing default file is not an error; a missing explicit `--config`
/// path is.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<Option<SqlflowConfig>> {
    let explicit = path.is_some();
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        if explicit {
            anyhow::bail!("config file not found: {}", path.display());
        }
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let config: SqlflowConfig = toml::from_str(&contents)
        .with_context(|| format!("Invalid config file: {}", path.display()))?;
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(Some(config))
}

/// Effective settings for one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    pub dialect: Dialect,
    pub format: OutputFormat,
    pub options: AnalysisOptions,
}

impl Settings {
    /// Flags win over the config file, which wins over built-in defaults.
    pub fn resolve(args: &Args, config: Option<&SqlflowConfig>) -> Self {
        let file = config.cloned().unwrap_or_default();
        let defaults = AnalysisOptions::default();

        Self {
            dialect: args.dialect.map(Dialect::from).or(file.dialect).unwrap_or_default(),
            format: args.format.or(file.format).unwrap_or_default(),
            options: AnalysisOptions {
                source_linking: args
                    .source_linking
                    .map(SourceLinking::from)
                    .or(file.source_linking)
                    .unwrap_or(defaults.source_linking),
                recurse_conditions: args.recurse_conditions
                    || file.recurse_conditions.unwrap_or(defaults.recurse_conditions),
            },
        }
    }
}
