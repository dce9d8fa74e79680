//! Pure guard evaluation for literal and character-set guards.
//!
//! Nested automata and function guards need the context manager and are
//! evaluated by the engine. Nothing here reads or writes the context.

use super::cursor::Cursor;

/// Match a literal at the cursor. The empty literal always matches.
#[inline]
pub fn match_exact(cursor: Cursor<'_>, literal: &[u8]) -> Option<usize> {
    cursor
        .rest()
        .starts_with(literal)
        .then_some(literal.len())
}

/// Match one byte from `set` at the cursor.
#[inline]
pub fn match_one_of(cursor: Cursor<'_>, set: &[u8]) -> Option<usize> {
    cursor.peek().filter(|b| set.contains(b)).map(|_| 1)
}
