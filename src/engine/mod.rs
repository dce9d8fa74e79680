//! Automaton execution.
//!
//! The engine walks a [`Table`] over a [`Cursor`], evaluating guards in
//! declaration order, recursing into nested automata, and isolating every
//! nested or function guard behind the context manager.
//!
//! # Outcome of a run
//!
//! - A run succeeds iff it halts while the most recent transition taken
//!   was an `Accept` transition. The flag is sticky: a table may keep
//!   scanning after an accepting transition and still succeed when no
//!   further transition matches.
//! - A `Reject` transition fails the run as soon as its guard matches.
//!   Its callback is never invoked, so even a shared context sees no write
//!   from it. The failure propagates through every enclosing automaton.
//! - A failed run leaves the cursor, and with a transactional context
//!   manager the context, exactly as they were.

mod error;
mod executor;
mod report;

pub use error::RunError;
pub use executor::Engine;
pub use report::{Report, Step};

use crate::core::{Cursor, Table};

/// Run `table` with a cloning engine.
///
/// # Example
///
/// ```rust
/// use tablefsm::{run, Cursor, Table, Transition};
///
/// static GREETING: Table<()> = Table {
///     name: "greeting",
///     transitions: &[Transition::on(0).exact(b"hello").accept()],
/// };
///
/// let mut cursor = Cursor::new(b"hello world");
/// assert_eq!(run(&GREETING, &mut cursor, &mut ()), Ok(5));
/// assert_eq!(cursor.rest(), b" world");
/// ```
pub fn run<C: Clone + 'static, A: 'static>(
    table: &Table<C, A>,
    cursor: &mut Cursor<'_>,
    context: &mut C,
) -> Result<usize, RunError> {
    Engine::cloning().run(table, cursor, context)
}

/// Recognize a prefix of `input` with a context-free table.
///
/// Returns the length of the recognized prefix.
pub fn recognize<A: 'static>(table: &Table<(), A>, input: &[u8]) -> Result<usize, RunError> {
    Engine::shared().run(table, &mut Cursor::new(input), &mut ())
}
