//! Core automaton data types.
//!
//! This module contains the static, side-effect free part of the engine:
//! - `Cursor`, a copyable read position into the input
//! - `Transition` and `Guard`, one row of a table and its condition
//! - `Table`, an immutable ordered set of transitions
//! - the matcher for literal and character-set guards

mod cursor;
pub mod matcher;
pub(crate) mod table;
mod transition;

pub use cursor::Cursor;
pub use table::Table;
pub use transition::{Callback, Class, Guard, GuardFn, Next, StateId, Transition};
