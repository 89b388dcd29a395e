//! SQLFlow CLI library.
//!
//! This module exposes internal types for testing purposes.
//! The main entry point is the `sqlflow` binary.

pub mod cli;
pub mod config;
pub mod input;
pub mod output;

pub use cli::Args;
pub use config::{Settings, SqlflowConfig};
