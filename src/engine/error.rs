//! Run failure types.

use crate::context::ContextError;
use crate::core::StateId;
use crate::validate::TableIssue;
use thiserror::Error;

/// Why a run did not accept.
///
/// Offsets are absolute positions within the input buffer where the
/// failing table was scanning.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RunError {
    /// No transition from `state` matched and the last transition taken
    /// was not accepting.
    #[error("No transition from state {state} of '{table}' matched at offset {offset}")]
    NoTransition {
        table: &'static str,
        state: StateId,
        offset: usize,
    },

    /// A transition halted the table without accepting.
    #[error("Table '{table}' halted from state {state} at offset {offset} without accepting")]
    NotAccepted {
        table: &'static str,
        state: StateId,
        offset: usize,
    },

    /// A reject transition was taken. Fatal at every nesting level.
    #[error("Rejected by {} in state {state} of '{table}' at offset {offset}", .label.unwrap_or("an unlabelled transition"))]
    Rejected {
        table: &'static str,
        state: StateId,
        offset: usize,
        label: Option<&'static str>,
    },

    /// The context could not be duplicated for the run.
    #[error(transparent)]
    Context(#[from] ContextError),

    /// Table checking is enabled and the grammar has structural issues.
    #[error("Table '{table}' failed validation with {} issue(s)", .issues.len())]
    InvalidTable {
        table: &'static str,
        issues: Vec<TableIssue>,
    },
}

impl RunError {
    /// Whether this failure must propagate past enclosing alternatives
    /// instead of counting as a guard mismatch.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }

    /// Offset where the failure was detected, if it is tied to the input.
    pub fn offset(&self) -> Option<usize> {
        match self {
            Self::NoTransition { offset, .. }
            | Self::NotAccepted { offset, .. }
            | Self::Rejected { offset, .. } => Some(*offset),
            Self::Context(_) | Self::InvalidTable { .. } => None,
        }
    }
}
