//! Build errors for table and engine builders.

use crate::validate::TableIssue;
use thiserror::Error;

/// Errors that can occur when building tables.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Table '{0}' has no transitions. Add at least one with .transition()")]
    NoTransitions(&'static str),

    #[error("Table '{table}' failed validation: {}", render(.issues))]
    Invalid {
        table: &'static str,
        issues: Vec<TableIssue>,
    },
}

fn render(issues: &[TableIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
