use crate::{
    error::{Result, StrError},
    str_ty::Str,
    utf8::{self, Decode},
};
use std::fmt;

/// A bidirectional cursor over the codepoints of a string's byte buffer.
///
/// A cursor sits at the buffer begin, at an interior codepoint boundary,
/// or at the buffer end; those are the only three classes of position.
/// Moves past a boundary, or over malformed bytes, clamp to the nearest
/// boundary instead of failing, so iterating a buffer with an invalid
/// tail always terminates.
///
/// Two cursors compare equal iff their byte offsets are equal; comparing
/// cursors from different buffers is meaningless.
#[derive(Clone, Copy)]
pub struct Cursor<'buf> {
    bytes: &'buf [u8],
    offset: usize,
}

impl PartialEq for Cursor<'_> {
    #[inline]
    fn eq(&self, other: &Cursor<'_>) -> bool {
        self.offset == other.offset
    }
}

impl Eq for Cursor<'_> {}

impl fmt::Debug for Cursor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Cursor({}/{})", self.offset, self.bytes.len())
    }
}

impl<'buf> Cursor<'buf> {
    pub(crate) fn at_begin(bytes: &'buf [u8]) -> Self {
        Cursor { bytes, offset: 0 }
    }

    pub(crate) fn at_end(bytes: &'buf [u8]) -> Self {
        Cursor {
            bytes,
            offset: bytes.len(),
        }
    }

    /// Current byte offset into the buffer.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Whether the cursor sits at the buffer begin.
    pub fn is_begin(&self) -> bool {
        self.offset == 0
    }

    /// Whether the cursor sits at the buffer end.
    pub fn is_end(&self) -> bool {
        self.offset == self.bytes.len()
    }

    /// Move forward by one codepoint.
    ///
    /// A no-op at the end; clamps to the end when the bytes at the
    /// current position do not decode.
    pub fn advance(&mut self) {
        match utf8::decode_forward(self.bytes, self.offset) {
            Decode::Scalar { len, .. } => self.offset += len,
            Decode::End => {}
            Decode::Malformed => self.offset = self.bytes.len(),
        }
    }

    /// Move backward by one codepoint.
    ///
    /// A no-op at the begin; clamps to the begin when no well-formed
    /// sequence ends at the current position.
    pub fn retreat(&mut self) {
        match utf8::decode_backward(self.bytes, self.offset) {
            Decode::Scalar { len, .. } => self.offset -= len,
            Decode::End => {}
            Decode::Malformed => self.offset = 0,
        }
    }

    /// The codepoint at the cursor, or `None` at the end or on malformed
    /// bytes. Does not move the cursor.
    pub fn peek(&self) -> Option<char> {
        match utf8::decode_forward(self.bytes, self.offset) {
            Decode::Scalar { ch, .. } => Some(ch),
            _ => None,
        }
    }

    /// The codepoint ending at the cursor position, or `None` at the
    /// begin or on malformed bytes. Does not move the cursor.
    pub fn peek_back(&self) -> Option<char> {
        match utf8::decode_backward(self.bytes, self.offset) {
            Decode::Scalar { ch, .. } => Some(ch),
            _ => None,
        }
    }

    /// Materialize the codepoint under the cursor as a one-codepoint
    /// [`Str`].
    ///
    /// Fails with [`StrError::NoValueAvailable`] at the buffer end, or
    /// when the bytes at the current position do not decode to a complete
    /// codepoint before the end.
    pub fn get(&self) -> Result<Str> {
        self.peek().map(Str::from).ok_or(StrError::NoValueAvailable)
    }
}

/// An iterator over the decodable codepoints of a [`Str`].
///
/// Iteration terminates at the first malformed position from either
/// direction, per the cursor's clamping behavior.
#[derive(Clone)]
pub struct Chars<'buf> {
    front: Cursor<'buf>,
    back: Cursor<'buf>,
}

impl<'buf> Chars<'buf> {
    pub(crate) fn new(bytes: &'buf [u8]) -> Self {
        Chars {
            front: Cursor::at_begin(bytes),
            back: Cursor::at_end(bytes),
        }
    }
}

impl Iterator for Chars<'_> {
    type Item = char;

    fn next(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }
        let ch = self.front.peek()?;
        self.front.advance();
        Some(ch)
    }
}

impl DoubleEndedIterator for Chars<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }
        let ch = self.back.peek_back()?;
        self.back.retreat();
        Some(ch)
    }
}

impl fmt::Debug for Chars<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Chars(")?;
        f.debug_list().entries(self.clone()).finish()?;
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use crate::{Str, StrError};

    #[test]
    fn test_advance_and_retreat() {
        let s = Str::from("a\u{6d4b}\u{8bd5}");
        let mut it = s.cursor_begin();
        assert_eq!(it.get().unwrap(), Str::from("a"));
        it.advance();
        assert_eq!(it.get().unwrap(), Str::from("\u{6d4b}"));
        it.advance();
        assert_eq!(it.get().unwrap(), Str::from("\u{8bd5}"));
        it.advance();
        assert!(it.is_end());
        it.advance();
        assert!(it.is_end());

        it.retreat();
        assert_eq!(it.get().unwrap(), Str::from("\u{8bd5}"));
        let mut it = s.cursor_begin();
        it.retreat();
        assert!(it.is_begin());
    }

    #[test]
    fn test_get_at_end() {
        let s = Str::from("ab");
        let it = s.cursor_end();
        assert_eq!(it.get(), Err(StrError::NoValueAvailable));

        let empty = Str::new();
        assert_eq!(empty.cursor_begin(), empty.cursor_end());
    }

    #[test]
    fn test_malformed_tail_clamps() {
        // 'a' followed by a truncated three-byte sequence
        let s = Str::from(&b"a\xE6\xB5"[..]);
        let mut it = s.cursor_begin();
        it.advance();
        assert_eq!(it.get(), Err(StrError::NoValueAvailable));
        it.advance();
        assert!(it.is_end());
        // retreating over the malformed tail clamps to the begin
        let mut it = s.cursor_end();
        it.retreat();
        assert!(it.is_begin());
    }

    #[test]
    fn test_chars_both_ends() {
        let s = Str::from("a\u{6d4b}z");
        assert_eq!(s.chars().collect::<String>(), "a\u{6d4b}z");
        assert_eq!(s.chars().rev().collect::<String>(), "z\u{6d4b}a");
    }
}
