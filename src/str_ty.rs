use crate::{
    cursor::{Chars, Cursor},
    error::{Result, StrError},
    utf8,
};
use std::{
    fmt,
    iter::FromIterator,
    num::{IntErrorKind, ParseIntError},
    ops,
    str::FromStr,
};

/// A Python-style, codepoint-indexed string value backed by a UTF-8 byte
/// buffer.
///
/// Logical indices address codepoints, never bytes; the buffer itself is
/// permitted to carry an invalid tail, which decoding operations detect
/// rather than silently skip past. Every mutating-looking operation
/// produces a fresh buffer, so no two values ever alias a buffer that
/// either side writes to.
///
/// Equality, ordering and hashing compare the raw byte sequences, which
/// for valid UTF-8 coincides with codepoint ordering.
#[derive(Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Str(pub(crate) Vec<u8>);

impl fmt::Display for Str {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.0))
    }
}

impl fmt::Debug for Str {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"")?;
        for ch in String::from_utf8_lossy(&self.0).chars() {
            write!(f, "{}", ch.escape_debug())?;
        }
        write!(f, "\"")
    }
}

impl From<&str> for Str {
    fn from(s: &str) -> Self {
        Str(s.as_bytes().to_vec())
    }
}

impl From<String> for Str {
    fn from(s: String) -> Self {
        Str(s.into_bytes())
    }
}

impl From<&[u8]> for Str {
    fn from(bytes: &[u8]) -> Self {
        Str(bytes.to_vec())
    }
}

impl From<Vec<u8>> for Str {
    fn from(bytes: Vec<u8>) -> Self {
        Str(bytes)
    }
}

impl From<char> for Str {
    fn from(ch: char) -> Self {
        Str(utf8::encode(ch).to_vec())
    }
}

/// An absent value renders as the literal text `"nullptr"`, kept for
/// compatibility with callers that format optional values directly.
impl<T: Into<Str>> From<Option<T>> for Str {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(inner) => inner.into(),
            None => Str::from("nullptr"),
        }
    }
}

impl FromIterator<char> for Str {
    fn from_iter<I: IntoIterator<Item = char>>(iter: I) -> Self {
        let mut s = Str::new();
        s.extend(iter);
        s
    }
}

impl FromIterator<Str> for Str {
    fn from_iter<I: IntoIterator<Item = Str>>(iter: I) -> Self {
        let mut s = Str::new();
        for piece in iter {
            s.push_str(&piece);
        }
        s
    }
}

impl Extend<char> for Str {
    fn extend<I: IntoIterator<Item = char>>(&mut self, iter: I) {
        for ch in iter {
            self.push(ch);
        }
    }
}

impl PartialEq<str> for Str {
    #[inline]
    fn eq(&self, other: &str) -> bool {
        self.0 == other.as_bytes()
    }
}

impl PartialEq<&str> for Str {
    #[inline]
    fn eq(&self, other: &&str) -> bool {
        self.0 == other.as_bytes()
    }
}

impl ops::Add<&Str> for Str {
    type Output = Str;

    fn add(mut self, rhs: &Str) -> Str {
        self.push_str(rhs);
        self
    }
}

impl ops::AddAssign<&Str> for Str {
    fn add_assign(&mut self, rhs: &Str) {
        self.push_str(rhs);
    }
}

impl ops::Mul<usize> for &Str {
    type Output = Str;

    fn mul(self, count: usize) -> Str {
        self.repeat(count)
    }
}

impl ops::Mul<usize> for Str {
    type Output = Str;

    fn mul(self, count: usize) -> Str {
        self.repeat(count)
    }
}

impl ops::Mul<&Str> for usize {
    type Output = Str;

    fn mul(self, rhs: &Str) -> Str {
        rhs.repeat(self)
    }
}

impl ops::MulAssign<usize> for Str {
    fn mul_assign(&mut self, count: usize) {
        *self = self.repeat(count);
    }
}

impl Str {
    /// Creates a new empty `Str`.
    pub const fn new() -> Self {
        Str(Vec::new())
    }

    /// Builds a string from a fixed-width wide-character sequence,
    /// re-encoding it as UTF-8.
    pub fn from_wide(wide: &[char]) -> Self {
        wide.iter().copied().collect()
    }

    /// Concatenates the dereferenced codepoints of a cursor range.
    ///
    /// Both cursors must come from the same buffer. The walk stops at the
    /// first position that does not decode.
    pub fn between(begin: &Cursor<'_>, end: &Cursor<'_>) -> Self {
        let mut result = Str::new();
        let mut it = *begin;
        while it != *end {
            match it.peek() {
                Some(ch) => {
                    result.push(ch);
                    it.advance();
                }
                None => break,
            }
        }
        result
    }

    /// The raw byte buffer.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Consumes the value, returning the byte buffer.
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    /// Views the content as `&str`, failing with a value error when the
    /// buffer is not valid UTF-8.
    pub fn as_utf8(&self) -> Result<&str> {
        std::str::from_utf8(&self.0)
            .map_err(|_| StrError::Value("string contains invalid utf-8".into()))
    }

    /// Converts the content to a wide-character sequence, failing with a
    /// value error when the buffer is not valid UTF-8.
    pub fn to_wide(&self) -> Result<Vec<char>> {
        Ok(self.as_utf8()?.chars().collect())
    }

    /// A cursor at the first codepoint.
    pub fn cursor_begin(&self) -> Cursor<'_> {
        Cursor::at_begin(&self.0)
    }

    /// A cursor one past the last codepoint.
    pub fn cursor_end(&self) -> Cursor<'_> {
        Cursor::at_end(&self.0)
    }

    /// An iterator over the decodable codepoints.
    pub fn chars(&self) -> Chars<'_> {
        Chars::new(&self.0)
    }

    /// Counts codepoints by full iteration; O(n) in bytes, not cached.
    pub fn len(&self) -> usize {
        let mut len = 0;
        let mut it = self.cursor_begin();
        while !it.is_end() {
            it.advance();
            len += 1;
        }
        len
    }

    /// The raw buffer length in bytes; O(1).
    pub fn byte_len(&self) -> usize {
        self.0.len()
    }

    /// Whether the buffer holds no bytes.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Appends one codepoint.
    pub fn push(&mut self, ch: char) {
        self.0.extend_from_slice(&utf8::encode(ch));
    }

    /// Appends another string's bytes.
    pub fn push_str(&mut self, other: &Str) {
        self.0.extend_from_slice(&other.0);
    }

    pub(crate) fn push_display(&mut self, value: &dyn fmt::Display) {
        use fmt::Write;
        let mut buf = String::new();
        let _ = write!(buf, "{value}");
        self.0.extend_from_slice(buf.as_bytes());
    }

    /// Repeats the content `count` times.
    pub fn repeat(&self, count: usize) -> Str {
        if self.0.is_empty() || count == 0 {
            return Str::new();
        }
        let mut result = Str::new();
        result.0.reserve(self.0.len().saturating_mul(count));
        for _ in 0..count {
            result.push_str(self);
        }
        result
    }

    /// Truthiness: a non-empty string is true.
    pub fn to_bool(&self) -> bool {
        !self.is_empty()
    }

    fn parse_int<T>(&self, target: &'static str) -> Result<T>
    where
        T: FromStr<Err = ParseIntError>,
    {
        let text = self
            .as_utf8()
            .map_err(|_| self.convert_value_error(target))?;
        text.parse::<T>().map_err(|err| match err.kind() {
            IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => StrError::OutOfRange(target),
            _ => self.convert_value_error(target),
        })
    }

    fn convert_value_error(&self, target: &'static str) -> StrError {
        StrError::Value(format!("could not convert string to {target}: {self:?}"))
    }

    /// Parses the full content as an `i32`.
    pub fn to_i32(&self) -> Result<i32> {
        self.parse_int("i32")
    }

    /// Parses the full content as an `i64`.
    pub fn to_i64(&self) -> Result<i64> {
        self.parse_int("i64")
    }

    /// Parses the full content as an `f32`.
    pub fn to_f32(&self) -> Result<f32> {
        let text = self
            .as_utf8()
            .map_err(|_| self.convert_value_error("f32"))?;
        let value = text
            .parse::<f32>()
            .map_err(|_| self.convert_value_error("f32"))?;
        if value.is_infinite() && !is_infinity_literal(text) {
            return Err(StrError::OutOfRange("f32"));
        }
        Ok(value)
    }

    /// Parses the full content as an `f64`.
    pub fn to_f64(&self) -> Result<f64> {
        let text = self
            .as_utf8()
            .map_err(|_| self.convert_value_error("f64"))?;
        let value = text
            .parse::<f64>()
            .map_err(|_| self.convert_value_error("f64"))?;
        if value.is_infinite() && !is_infinity_literal(text) {
            return Err(StrError::OutOfRange("f64"));
        }
        Ok(value)
    }

    /// Applies a codepoint-to-codepoint mapping to the wide form and
    /// reassembles the result.
    pub fn map_codepoints(&self, f: impl Fn(char) -> char) -> Result<Str> {
        Ok(self.to_wide()?.into_iter().map(f).collect())
    }

    /// Upper-cases every codepoint with the one-to-one simple mapping.
    pub fn upper(&self) -> Result<Str> {
        self.map_codepoints(simple_upper)
    }

    /// Lower-cases every codepoint with the one-to-one simple mapping.
    pub fn lower(&self) -> Result<Str> {
        self.map_codepoints(simple_lower)
    }

    /// Whether the value equals its own upper-cased form. A string with
    /// no cased codepoints is both upper and lower.
    pub fn is_upper(&self) -> Result<bool> {
        Ok(*self == self.upper()?)
    }

    /// Whether the value equals its own lower-cased form.
    pub fn is_lower(&self) -> Result<bool> {
        Ok(*self == self.lower()?)
    }

    /// Byte-level substring search reported as a codepoint index, or `-1`
    /// when absent. An empty needle matches at position 0.
    pub fn find(&self, needle: &Str) -> isize {
        if needle.is_empty() {
            return 0;
        }
        match find_sub(&self.0, &needle.0) {
            Some(pos) => self.codepoint_index_of(pos) as isize,
            None => -1,
        }
    }

    /// Backward counterpart of [`Str::find`]. An empty needle matches at
    /// the end position.
    pub fn rfind(&self, needle: &Str) -> isize {
        if needle.is_empty() {
            return self.len() as isize;
        }
        match rfind_sub(&self.0, &needle.0) {
            Some(pos) => self.codepoint_index_of(pos) as isize,
            None => -1,
        }
    }

    /// Whether the content contains `needle` as a byte-level substring.
    pub fn contains(&self, needle: &Str) -> bool {
        needle.is_empty() || find_sub(&self.0, &needle.0).is_some()
    }

    /// Whether the content starts with `prefix`.
    pub fn starts_with(&self, prefix: &Str) -> bool {
        self.0.starts_with(&prefix.0)
    }

    /// Whether the content ends with `suffix`.
    pub fn ends_with(&self, suffix: &Str) -> bool {
        self.0.ends_with(&suffix.0)
    }

    /// Concatenates the items with the receiver as separator, converting
    /// each item to text first. Zero items yield an empty result; one
    /// item is returned unchanged.
    pub fn join<I>(&self, items: I) -> Str
    where
        I: IntoIterator,
        I::Item: fmt::Display,
    {
        let mut result = Str::new();
        for (i, item) in items.into_iter().enumerate() {
            if i > 0 {
                result.push_str(self);
            }
            result.push_display(&item);
        }
        result
    }

    /// Replaces all non-overlapping occurrences of `old` left-to-right.
    /// An empty `old` matches between every pair of adjacent codepoints
    /// and at both ends.
    pub fn replace(&self, old: &Str, new: &Str) -> Str {
        self.replacen(old, new, -1)
    }

    /// Replaces up to `count` non-overlapping occurrences of `old`
    /// left-to-right; a negative `count` means unlimited.
    pub fn replacen(&self, old: &Str, new: &Str, count: isize) -> Str {
        if count == 0 {
            return self.clone();
        }
        if old.is_empty() {
            return self.replace_boundaries(new, count);
        }
        let mut result = Str::new();
        let mut from = 0;
        let mut remaining = count;
        while remaining != 0 {
            match find_sub(&self.0[from..], &old.0) {
                Some(pos) => {
                    result.0.extend_from_slice(&self.0[from..from + pos]);
                    result.push_str(new);
                    from += pos + old.0.len();
                    if remaining > 0 {
                        remaining -= 1;
                    }
                }
                None => break,
            }
        }
        result.0.extend_from_slice(&self.0[from..]);
        result
    }

    fn replace_boundaries(&self, new: &Str, count: isize) -> Str {
        let mut result = new.clone();
        let mut remaining = count;
        if remaining > 0 {
            remaining -= 1;
        }
        let mut it = self.cursor_begin();
        let mut copied_to = 0;
        while !it.is_end() && remaining != 0 {
            let start = it.offset();
            it.advance();
            result.0.extend_from_slice(&self.0[start..it.offset()]);
            result.push_str(new);
            if remaining > 0 {
                remaining -= 1;
            }
            copied_to = it.offset();
        }
        result.0.extend_from_slice(&self.0[copied_to..]);
        result
    }

    /// Codepoint index of a byte position, counting boundaries before it.
    fn codepoint_index_of(&self, byte_pos: usize) -> usize {
        let mut index = 0;
        let mut it = self.cursor_begin();
        while it.offset() < byte_pos && !it.is_end() {
            it.advance();
            index += 1;
        }
        index
    }
}

fn is_infinity_literal(text: &str) -> bool {
    let body = text.trim().trim_start_matches(['+', '-']);
    body.eq_ignore_ascii_case("inf") || body.eq_ignore_ascii_case("infinity")
}

fn simple_upper(ch: char) -> char {
    let mut mapped = ch.to_uppercase();
    match (mapped.next(), mapped.next()) {
        (Some(up), None) => up,
        // multi-codepoint expansions are outside the one-to-one mapping
        _ => ch,
    }
}

fn simple_lower(ch: char) -> char {
    let mut mapped = ch.to_lowercase();
    match (mapped.next(), mapped.next()) {
        (Some(low), None) => low,
        _ => ch,
    }
}

pub(crate) fn find_sub(hay: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    if needle.len() > hay.len() {
        return None;
    }
    hay.windows(needle.len()).position(|w| w == needle)
}

pub(crate) fn rfind_sub(hay: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() {
        return Some(hay.len());
    }
    if needle.len() > hay.len() {
        return None;
    }
    hay.windows(needle.len()).rposition(|w| w == needle)
}
