//! Parse and execute a query against delimited input

use log::debug;

use super::{CliError, read_rows};
use crate::{Options, Query, ResultSet, execute, parse_query};

/// Options for a single run
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// The query text, one step per line
    pub query: String,
    /// Delimited input text
    pub input: Option<String>,
    pub options: Options,
    /// Only validate syntax, don't execute
    pub syntax_only: bool,
}

/// Result of a run
#[derive(Debug)]
pub enum RunResult {
    /// Syntax validation passed
    SyntaxValid(Query),
    /// Query executed successfully
    Success { query: Query, result: ResultSet },
}

/// Parse the query, then read and transform the input.
///
/// The query is parsed before any input is touched, so a malformed query
/// fails even when no input is available.
pub fn execute_run(options: &RunOptions) -> Result<RunResult, CliError> {
    let separator = options.options.separator;
    let delimiter = options
        .options
        .delimiter()
        .ok_or(CliError::InvalidSeparator(separator))?;

    let query = parse_query(&options.query)?;
    debug!("parsed {} step(s)", query.steps.len());

    if options.syntax_only {
        return Ok(RunResult::SyntaxValid(query));
    }

    let input = options.input.as_ref().ok_or(CliError::NoInput)?;
    let rows = read_rows(input.as_bytes(), delimiter)?;
    debug!("read {} row(s) separated by {:?}", rows.len(), separator);

    let result = execute(&query, rows, &options.options)?;
    Ok(RunResult::Success { query, result })
}
