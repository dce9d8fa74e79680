//! Tablefsm: table-driven automata for byte-level parsing
//!
//! Grammars are written as static transition tables. A table lists, per
//! state, the transitions to try in order; each transition has a guard (a
//! literal, a character set, a nested table, or a function), a target
//! state, and an optional callback that sees the matched bytes. Tables may
//! nest and recurse, which gives recursive-descent power while keeping the
//! grammar itself plain data.
//!
//! # Core Concepts
//!
//! - **Table**: immutable rows of [`Transition`]s, usually a `static`
//! - **Engine**: runs a table over a [`Cursor`] with a caller-owned context
//! - **Context manager**: isolates nested attempts so a failed alternative
//!   leaves no trace in the context
//! - **Validation**: lints tables up front, reporting every issue at once
//!
//! # Example
//!
//! ```rust
//! use tablefsm::{run, table, Cursor, Table};
//!
//! #[derive(Clone, Default)]
//! struct Number {
//!     negative: bool,
//!     value: i64,
//! }
//!
//! table! {
//!     static NUMBER: Table<Number> = "number" {
//!         0 => exact(b"-").to(1).then(negate),
//!         0 => epsilon().to(1),
//!         1 => one_of(b"0123456789").to(1).accept().then(push),
//!     };
//! }
//!
//! fn negate(_: Cursor<'_>, _: usize, n: &mut Number, _: Option<&'static ()>) {
//!     n.negative = true;
//! }
//!
//! fn push(cursor: Cursor<'_>, _: usize, n: &mut Number, _: Option<&'static ()>) {
//!     if let Some(digit) = cursor.peek() {
//!         n.value = n.value * 10 + i64::from(digit - b'0');
//!     }
//! }
//!
//! let mut cursor = Cursor::new(b"-2010 GMT");
//! let mut n = Number::default();
//!
//! assert_eq!(run(&NUMBER, &mut cursor, &mut n), Ok(5));
//! assert!(n.negative);
//! assert_eq!(n.value, 2010);
//! assert_eq!(cursor.rest(), b" GMT");
//!
//! // A lone sign is not a number; nothing is consumed or changed.
//! let mut cursor = Cursor::new(b"-");
//! let mut n = Number::default();
//! assert!(run(&NUMBER, &mut cursor, &mut n).is_err());
//! assert!(!n.negative);
//! assert_eq!(cursor.offset(), 0);
//! ```

pub mod builder;
pub mod context;
pub mod core;
pub mod engine;
pub mod grammars;
pub mod validate;

// Re-export commonly used types
pub use context::{ContextError, ContextManager};
pub use crate::core::{Callback, Class, Cursor, Guard, GuardFn, Next, StateId, Table, Transition};
pub use engine::{recognize, run, Engine, Report, RunError, Step};
