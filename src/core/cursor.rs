//! Read position into an input buffer.

/// A position within an immutable byte buffer.
///
/// Cursors are `Copy`: the executor probes guards against throwaway
/// copies and only writes a cursor back once a transition is committed.
/// The offset is absolute within the original buffer, so callbacks can
/// record byte ranges that remain valid for the caller.
///
/// # Example
///
/// ```rust
/// use tablefsm::Cursor;
///
/// let mut cursor = Cursor::new(b"i42e");
/// assert_eq!(cursor.peek(), Some(b'i'));
/// cursor.advance(1);
/// assert_eq!(cursor.rest(), b"42e");
/// assert_eq!(cursor.offset(), 1);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cursor<'a> {
    input: &'a [u8],
    offset: usize,
}

impl<'a> Cursor<'a> {
    /// Create a cursor at the start of `input`.
    pub fn new(input: &'a [u8]) -> Self {
        Self { input, offset: 0 }
    }

    /// Create a cursor at `offset`, clamped to the end of `input`.
    pub fn at(input: &'a [u8], offset: usize) -> Self {
        Self {
            input,
            offset: offset.min(input.len()),
        }
    }

    /// The whole underlying buffer.
    pub fn input(&self) -> &'a [u8] {
        self.input
    }

    /// Absolute position within the buffer.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Bytes not yet consumed.
    #[inline]
    pub fn rest(&self) -> &'a [u8] {
        &self.input[self.offset..]
    }

    /// Number of bytes not yet consumed.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.input.len() - self.offset
    }

    pub fn is_at_end(&self) -> bool {
        self.remaining() == 0
    }

    /// The next byte, if any.
    #[inline]
    pub fn peek(&self) -> Option<u8> {
        self.rest().first().copied()
    }

    /// The next `n` bytes, or `None` if fewer remain.
    pub fn take(&self, n: usize) -> Option<&'a [u8]> {
        self.rest().get(..n)
    }

    /// Move forward by `n` bytes.
    ///
    /// Callers must only advance by counts a guard has verified.
    pub fn advance(&mut self, n: usize) {
        debug_assert!(
            n <= self.remaining(),
            "cursor advance {} past end (remaining {})",
            n,
            self.remaining()
        );
        self.offset = (self.offset + n).min(self.input.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_cursor_starts_at_zero() {
        let cursor = Cursor::new(b"abc");
        assert_eq!(cursor.offset(), 0);
        assert_eq!(cursor.remaining(), 3);
        assert!(!cursor.is_at_end());
    }

    #[test]
    fn advance_moves_forward() {
        let mut cursor = Cursor::new(b"abc");
        cursor.advance(2);
        assert_eq!(cursor.rest(), b"c");
        assert_eq!(cursor.peek(), Some(b'c'));
        cursor.advance(1);
        assert!(cursor.is_at_end());
        assert_eq!(cursor.peek(), None);
    }

    #[test]
    fn take_respects_bounds() {
        let cursor = Cursor::at(b"hello", 3);
        assert_eq!(cursor.take(2), Some(&b"lo"[..]));
        assert_eq!(cursor.take(3), None);
        assert_eq!(cursor.take(0), Some(&b""[..]));
    }

    #[test]
    fn at_clamps_offset() {
        let cursor = Cursor::at(b"ab", 10);
        assert_eq!(cursor.offset(), 2);
        assert!(cursor.is_at_end());
    }

    #[test]
    fn copies_are_independent() {
        let original = Cursor::new(b"xyz");
        let mut probe = original;
        probe.advance(2);
        assert_eq!(original.offset(), 0);
        assert_eq!(probe.offset(), 2);
    }
}
