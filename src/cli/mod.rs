//! CLI support for csql
//!
//! Provides programmatic access to the `csql` command so other tools can
//! run queries over delimited text without spawning a process.

mod delimited;
mod run;

pub use delimited::{decode_input, read_rows, rows_to_string, write_rows};
pub use run::{RunOptions, RunResult, execute_run};

use std::io;

use crate::{ExecError, ParseError};

/// Errors that can occur during CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("execution error: {0}")]
    Exec(#[from] ExecError),

    /// Malformed delimited input or output failure
    #[error("invalid delimited data: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] io::Error),

    #[error("{input} is not valid UTF-8 (first invalid byte at offset {offset})")]
    InvalidUtf8 { input: String, offset: usize },

    #[error("no input provided, use --input or pipe data to stdin")]
    NoInput,

    #[error("separator must be a single ASCII character, got '{0}'")]
    InvalidSeparator(char),
}
