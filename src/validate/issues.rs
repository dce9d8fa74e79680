//! Structural problems found in transition tables.

use crate::core::StateId;
use thiserror::Error;

/// A problem that makes a table fail or behave unexpectedly
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TableIssue {
    #[error("Table '{table}' has no transition from the initial state 0")]
    MissingInitialState { table: &'static str },

    #[error("Table '{table}' has no accepting transition and can never succeed")]
    NoAcceptingTransition { table: &'static str },

    #[error("Transition {index} of '{table}' has an empty character set and can never match")]
    EmptyCharacterSet { table: &'static str, index: usize },

    #[error("Table '{table}' declares {count} transition(s) after its sentinel")]
    UnreachableAfterSentinel { table: &'static str, count: usize },

    #[error("Transition {index} of '{table}' moves to state {state}, which has no transitions, without accepting")]
    DeadEnd {
        table: &'static str,
        index: usize,
        state: StateId,
    },

    #[error("Transition {index} of '{table}' halts without accepting")]
    HaltWithoutAccept { table: &'static str, index: usize },
}

impl TableIssue {
    /// Name of the table the issue was found in.
    pub fn table(&self) -> &'static str {
        match self {
            Self::MissingInitialState { table }
            | Self::NoAcceptingTransition { table }
            | Self::EmptyCharacterSet { table, .. }
            | Self::UnreachableAfterSentinel { table, .. }
            | Self::DeadEnd { table, .. }
            | Self::HaltWithoutAccept { table, .. } => table,
        }
    }
}
