//! Validation of transition tables.
//!
//! Tables are plain data, so mistakes such as an unreachable initial state
//! or a row that can never match only show up as puzzling run failures.
//! This module lints tables up front using Stillwater's `Validation` type,
//! which accumulates ALL issues instead of stopping at the first one.
//!
//! # Example
//!
//! ```rust
//! use tablefsm::validate::{collect_issues, validate, TableIssue};
//! use tablefsm::{Table, Transition};
//!
//! static NO_ACCEPT: Table<()> = Table {
//!     name: "no-accept",
//!     transitions: &[Transition::on(0).exact(b"a").to(0)],
//! };
//!
//! let found = collect_issues(&validate(&NO_ACCEPT));
//! assert_eq!(found, vec![TableIssue::NoAcceptingTransition { table: "no-accept" }]);
//! ```

pub mod issues;
pub mod rules;

pub use issues::TableIssue;
pub use rules::{collect_issues, validate, validate_reachable, TableValidation};
