use crate::{
    cursor::Cursor,
    error::{Result, StrError},
    str_ty::{find_sub, rfind_sub, Str},
};
use regex::bytes::Regex;
use smallvec::SmallVec;
use std::fmt;

/// How segmenting operations classify a codepoint as a delimiter.
///
/// The three variants are alternate construction paths for the same
/// underlying scan: a caller-supplied predicate, membership in a fixed
/// set of codepoints, or the default Unicode whitespace test.
pub enum Matcher<'a> {
    /// A predicate over a single codepoint.
    Func(&'a dyn Fn(char) -> bool),
    /// Membership in a fixed set of codepoints.
    CharSet(SmallVec<[char; 8]>),
    /// Unicode whitespace.
    Whitespace,
}

impl<'a> Matcher<'a> {
    /// A matcher from a codepoint predicate.
    pub fn func(f: &'a dyn Fn(char) -> bool) -> Self {
        Matcher::Func(f)
    }

    /// A matcher testing membership in the codepoints of `chars`.
    pub fn char_set(chars: &Str) -> Matcher<'static> {
        Matcher::CharSet(chars.chars().collect())
    }

    /// The default whitespace matcher.
    pub fn whitespace() -> Matcher<'static> {
        Matcher::Whitespace
    }

    /// Whether `ch` is a delimiter under this matcher.
    pub fn matches(&self, ch: char) -> bool {
        match self {
            Matcher::Func(f) => f(ch),
            Matcher::CharSet(set) => set.contains(&ch),
            Matcher::Whitespace => ch.is_whitespace(),
        }
    }
}

impl fmt::Debug for Matcher<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Matcher::Func(_) => write!(f, "Matcher::Func"),
            Matcher::CharSet(set) => write!(f, "Matcher::CharSet({set:?})"),
            Matcher::Whitespace => write!(f, "Matcher::Whitespace"),
        }
    }
}

impl Str {
    /// Trims a maximal prefix (if `left`) and/or suffix (if `right`) of
    /// codepoints matching `m`, returning the remaining middle span.
    pub fn strip_matching(&self, m: &Matcher<'_>, left: bool, right: bool) -> Str {
        let bytes = self.as_bytes();
        let mut begin = Cursor::at_begin(bytes);
        let end = Cursor::at_end(bytes);
        if left {
            while begin != end {
                match begin.peek() {
                    Some(ch) if m.matches(ch) => begin.advance(),
                    _ => break,
                }
            }
        }
        let mut back = end;
        if right {
            while back != begin {
                match back.peek_back() {
                    Some(ch) if m.matches(ch) => back.retreat(),
                    _ => break,
                }
            }
        }
        Str::from(&bytes[begin.offset()..back.offset()])
    }

    /// Trims whitespace from both ends.
    pub fn strip(&self) -> Str {
        self.strip_matching(&Matcher::Whitespace, true, true)
    }

    /// Trims whitespace from the left end.
    pub fn lstrip(&self) -> Str {
        self.strip_matching(&Matcher::Whitespace, true, false)
    }

    /// Trims whitespace from the right end.
    pub fn rstrip(&self) -> Str {
        self.strip_matching(&Matcher::Whitespace, false, true)
    }

    /// Trims codepoints contained in `chars` from both ends.
    pub fn strip_set(&self, chars: &Str) -> Str {
        self.strip_matching(&Matcher::char_set(chars), true, true)
    }

    /// Trims codepoints contained in `chars` from the left end.
    pub fn lstrip_set(&self, chars: &Str) -> Str {
        self.strip_matching(&Matcher::char_set(chars), true, false)
    }

    /// Trims codepoints contained in `chars` from the right end.
    pub fn rstrip_set(&self, chars: &Str) -> Str {
        self.strip_matching(&Matcher::char_set(chars), false, true)
    }

    /// Trims codepoints satisfying `f` from both ends.
    pub fn strip_when(&self, f: impl Fn(char) -> bool) -> Str {
        self.strip_matching(&Matcher::Func(&f), true, true)
    }

    /// Splits on maximal runs of codepoints matching `m`, scanning
    /// forward. Adjacent delimiters collapse, so no empty segments are
    /// produced; an empty (or all-delimiter) string yields no segments.
    ///
    /// A negative `maxsplit` means unlimited. `maxsplit == 0` performs no
    /// splits and returns the remainder past any leading delimiter run as
    /// the only segment. Otherwise at most `maxsplit` delimiter runs are
    /// consumed and the tail becomes the final segment.
    pub fn split_matching(&self, m: &Matcher<'_>, maxsplit: isize) -> Vec<Str> {
        let bytes = self.as_bytes();
        let mut parts = Vec::new();
        let mut cur = Cursor::at_begin(bytes);
        let mut remaining = maxsplit;
        loop {
            // skip the delimiter run
            while let Some(ch) = cur.peek() {
                if !m.matches(ch) {
                    break;
                }
                cur.advance();
            }
            if cur.is_end() {
                break;
            }
            let part_begin = cur.offset();
            if remaining == 0 {
                parts.push(Str::from(&bytes[part_begin..]));
                break;
            }
            // scan the content run; malformed bytes count as content and
            // clamp the cursor to the end
            loop {
                match cur.peek() {
                    Some(ch) if m.matches(ch) => break,
                    Some(_) => cur.advance(),
                    None if cur.is_end() => break,
                    None => cur.advance(),
                }
            }
            parts.push(Str::from(&bytes[part_begin..cur.offset()]));
            if remaining > 0 {
                remaining -= 1;
            }
        }
        parts
    }

    /// Splits on whitespace runs. See [`Str::split_matching`].
    pub fn split(&self, maxsplit: isize) -> Vec<Str> {
        self.split_matching(&Matcher::Whitespace, maxsplit)
    }

    /// Splits on runs of codepoints satisfying `f`.
    pub fn split_when(&self, f: impl Fn(char) -> bool, maxsplit: isize) -> Vec<Str> {
        self.split_matching(&Matcher::Func(&f), maxsplit)
    }

    /// Splits on runs of codepoints contained in `chars`.
    pub fn split_set(&self, chars: &Str, maxsplit: isize) -> Vec<Str> {
        self.split_matching(&Matcher::char_set(chars), maxsplit)
    }

    /// Mirror of [`Str::split_matching`], scanning from the end. When
    /// `maxsplit` limits the number of splits, the leftmost remaining
    /// text merges into a single segment.
    pub fn rsplit_matching(&self, m: &Matcher<'_>, maxsplit: isize) -> Vec<Str> {
        let bytes = self.as_bytes();
        let mut parts = Vec::new();
        let mut cur = Cursor::at_end(bytes);
        let mut remaining = maxsplit;
        loop {
            while let Some(ch) = cur.peek_back() {
                if !m.matches(ch) {
                    break;
                }
                cur.retreat();
            }
            if cur.is_begin() {
                break;
            }
            let part_end = cur.offset();
            if remaining == 0 {
                parts.push(Str::from(&bytes[..part_end]));
                break;
            }
            loop {
                match cur.peek_back() {
                    Some(ch) if m.matches(ch) => break,
                    Some(_) => cur.retreat(),
                    None if cur.is_begin() => break,
                    None => cur.retreat(),
                }
            }
            parts.push(Str::from(&bytes[cur.offset()..part_end]));
            if remaining > 0 {
                remaining -= 1;
            }
        }
        parts.reverse();
        parts
    }

    /// Splits on whitespace runs from the end. See
    /// [`Str::rsplit_matching`].
    pub fn rsplit(&self, maxsplit: isize) -> Vec<Str> {
        self.rsplit_matching(&Matcher::Whitespace, maxsplit)
    }

    /// Splits on runs of codepoints satisfying `f`, from the end.
    pub fn rsplit_when(&self, f: impl Fn(char) -> bool, maxsplit: isize) -> Vec<Str> {
        self.rsplit_matching(&Matcher::Func(&f), maxsplit)
    }

    /// Splits on runs of codepoints contained in `chars`, from the end.
    pub fn rsplit_set(&self, chars: &Str, maxsplit: isize) -> Vec<Str> {
        self.rsplit_matching(&Matcher::char_set(chars), maxsplit)
    }

    /// Splits on an explicit literal separator, scanning forward.
    ///
    /// Unlike the run-collapsing predicate split, adjacent occurrences of
    /// the separator produce empty segments, and an empty input yields a
    /// single empty segment. An empty separator denotes no well-defined
    /// segmentation and fails with [`StrError::InvalidArgument`].
    pub fn split_sep(&self, sep: &Str, maxsplit: isize) -> Result<Vec<Str>> {
        if sep.is_empty() {
            return Err(StrError::InvalidArgument("empty separator"));
        }
        let bytes = self.as_bytes();
        let mut parts = Vec::new();
        let mut from = 0;
        let mut remaining = maxsplit;
        while remaining != 0 {
            match find_sub(&bytes[from..], sep.as_bytes()) {
                Some(pos) => {
                    parts.push(Str::from(&bytes[from..from + pos]));
                    from += pos + sep.byte_len();
                    if remaining > 0 {
                        remaining -= 1;
                    }
                }
                None => break,
            }
        }
        parts.push(Str::from(&bytes[from..]));
        Ok(parts)
    }

    /// Mirror of [`Str::split_sep`], scanning from the end, so a limiting
    /// `maxsplit` merges the leftmost text into one segment.
    pub fn rsplit_sep(&self, sep: &Str, maxsplit: isize) -> Result<Vec<Str>> {
        if sep.is_empty() {
            return Err(StrError::InvalidArgument("empty separator"));
        }
        let bytes = self.as_bytes();
        let mut parts = Vec::new();
        let mut end = bytes.len();
        let mut remaining = maxsplit;
        while remaining != 0 {
            match rfind_sub(&bytes[..end], sep.as_bytes()) {
                Some(pos) => {
                    parts.push(Str::from(&bytes[pos + sep.byte_len()..end]));
                    end = pos;
                    if remaining > 0 {
                        remaining -= 1;
                    }
                }
                None => break,
            }
        }
        parts.push(Str::from(&bytes[..end]));
        parts.reverse();
        Ok(parts)
    }

    /// Splits at each non-overlapping match of `pattern`, scanning
    /// forward.
    ///
    /// Matches behave like literal separator occurrences: adjacent
    /// matches produce empty segments, a match at the buffer end leaves a
    /// trailing empty segment, and a pattern with no match yields the
    /// whole string as the only segment. `maxsplit` follows
    /// [`Str::split_sep`]: negative means unlimited, `0` performs no
    /// splits.
    ///
    /// The pattern runs over the raw bytes, so a malformed trailing
    /// sequence stays inside its enclosing segment like in the other
    /// segmenting scans.
    pub fn split_pattern(&self, pattern: &Regex, maxsplit: isize) -> Vec<Str> {
        let bytes = self.as_bytes();
        let mut parts = Vec::new();
        let mut from = 0;
        let mut remaining = maxsplit;
        for m in pattern.find_iter(bytes) {
            if remaining == 0 {
                break;
            }
            parts.push(Str::from(&bytes[from..m.start()]));
            from = m.end();
            if remaining > 0 {
                remaining -= 1;
            }
        }
        parts.push(Str::from(&bytes[from..]));
        parts
    }

    /// Mirror of [`Str::split_pattern`]: when `maxsplit` limits the
    /// number of splits, only the last matches count as boundaries and
    /// the leftmost text merges into one segment.
    pub fn rsplit_pattern(&self, pattern: &Regex, maxsplit: isize) -> Vec<Str> {
        let bytes = self.as_bytes();
        let mut boundaries: Vec<(usize, usize)> = pattern
            .find_iter(bytes)
            .map(|m| (m.start(), m.end()))
            .collect();
        if maxsplit >= 0 {
            let keep = maxsplit as usize;
            if boundaries.len() > keep {
                boundaries.drain(..boundaries.len() - keep);
            }
        }
        let mut parts = Vec::new();
        let mut from = 0;
        for (start, end) in boundaries {
            parts.push(Str::from(&bytes[from..start]));
            from = end;
        }
        parts.push(Str::from(&bytes[from..]));
        parts
    }

    /// Splits at each CR, LF, or CRLF line terminator.
    ///
    /// Adjacent terminators are not collapsed: every terminator produces
    /// a boundary, so `"\r\r\n\n"` yields three boundaries. With
    /// `keepends`, each segment retains its own terminating sequence.
    pub fn splitlines(&self, keepends: bool) -> Vec<Str> {
        let bytes = self.as_bytes();
        let mut parts = Vec::new();
        let mut start = 0;
        let mut i = 0;
        while i < bytes.len() {
            let term_len = match bytes[i] {
                b'\r' if bytes.get(i + 1) == Some(&b'\n') => 2,
                b'\r' | b'\n' => 1,
                _ => {
                    i += 1;
                    continue;
                }
            };
            let cut = if keepends { i + term_len } else { i };
            parts.push(Str::from(&bytes[start..cut]));
            start = i + term_len;
            i = start;
        }
        if start < bytes.len() {
            parts.push(Str::from(&bytes[start..]));
        }
        parts
    }
}

#[cfg(test)]
mod tests {
    use super::Matcher;
    use crate::{Str, StrError};
    use regex::bytes::Regex;

    fn s(text: &str) -> Str {
        Str::from(text)
    }

    #[test]
    fn test_strip_predicate() {
        assert_eq!(
            s("111222333").strip_when(|ch| ch == '1' || ch == '3'),
            "222"
        );
    }

    #[test]
    fn test_strip_whitespace_and_sets() {
        assert_eq!(s("   abc   \t\n").strip(), "abc");
        assert_eq!(s("abc").strip(), "abc");
        assert_eq!(s("aaabaabc").strip_set(&s("ac")), "baab");

        assert_eq!(s("   a   ").lstrip(), "a   ");
        assert_eq!(s("111a   ").lstrip_set(&s("1")), "a   ");
        assert_eq!(s("   a   ").rstrip(), "   a");
        assert_eq!(s("111a   ").rstrip_set(&s("1")), "111a   ");
        assert_eq!(s("111a   ").rstrip_set(&s(" \t")), "111a");

        assert_eq!(
            s("\u{4f60}\u{4f60}\u{597d}\u{554a}\u{554a}").strip_set(&s("\u{4f60}\u{554a}")),
            "\u{597d}"
        );
        assert_eq!(s("").strip(), "");
    }

    #[test]
    fn test_strip_matching_directions() {
        let m = Matcher::char_set(&s("x"));
        assert_eq!(s("xxaxx").strip_matching(&m, true, true), "a");
        assert_eq!(s("xxaxx").strip_matching(&m, true, false), "axx");
        assert_eq!(s("xxaxx").strip_matching(&m, false, true), "xxa");
        assert_eq!(s("xxxx").strip_matching(&m, true, true), "");
    }

    #[test]
    fn test_split_predicate() {
        let sp = s("   \u{6d4b} \u{8bd5}  ").split_when(|ch| ch == ' ', -1);
        assert_eq!(sp, vec![s("\u{6d4b}"), s("\u{8bd5}")]);

        let space = |ch: char| ch == ' ';
        let sp = s("a b").split_matching(&Matcher::func(&space), -1);
        assert_eq!(sp, vec![s("a"), s("b")]);

        let sp = s("   \u{6d4b} \n\u{8bd5}   \t").split(-1);
        assert_eq!(sp, vec![s("\u{6d4b}"), s("\u{8bd5}")]);

        assert!(Str::new().split(-1).is_empty());
        assert!(s("  \t ").split(-1).is_empty());
    }

    #[test]
    fn test_split_maxsplit() {
        assert_eq!(
            s("a b c d").split(1),
            vec![s("a"), s("b c d")]
        );
        assert_eq!(s(" a b ").split(0), vec![s("a b ")]);
        assert_eq!(
            s("a  b  c").split(-1),
            vec![s("a"), s("b"), s("c")]
        );
    }

    #[test]
    fn test_split_literal_separator() {
        let sp = s("11232123123321123").split_sep(&s("123"), -1).unwrap();
        assert_eq!(sp.len(), 5);
        assert_eq!(sp[0], "1");
        assert_eq!(sp[2], "");
        assert_eq!(sp[4], "");

        let sp = s("1123\u{6d4b} \u{8bd5}123123...123")
            .split_sep(&s("123"), 2)
            .unwrap();
        assert_eq!(sp, vec![s("1"), s("\u{6d4b} \u{8bd5}"), s("123...123")]);

        let sp = s("\u{4f60}\u{597d}\u{4f60}\u{597d}\u{4f60}\u{597d}")
            .split_sep(&s("\u{4f60}"), -1)
            .unwrap();
        assert_eq!(sp.len(), 4);

        assert_eq!(Str::new().split_sep(&s("abc"), -1).unwrap(), vec![s("")]);
        assert!(matches!(
            Str::new().split_sep(&Str::new(), -1),
            Err(StrError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_rsplit_predicate() {
        let sp = s("   \u{6d4b} \u{8bd5}  ").rsplit_when(|ch| ch == ' ', -1);
        assert_eq!(sp, vec![s("\u{6d4b}"), s("\u{8bd5}")]);

        let sp = s("   \u{6d4b} \n\u{8bd5}   \t").rsplit(-1);
        assert_eq!(sp, vec![s("\u{6d4b}"), s("\u{8bd5}")]);

        assert!(Str::new().rsplit(-1).is_empty());
    }

    #[test]
    fn test_rsplit_maxsplit_merges_left() {
        assert_eq!(
            s("a b c d").rsplit(1),
            vec![s("a b c"), s("d")]
        );
        assert_eq!(s(" a b ").rsplit(0), vec![s(" a b")]);
    }

    #[test]
    fn test_rsplit_literal_separator() {
        let sp = s("11232123123321123").rsplit_sep(&s("123"), -1).unwrap();
        assert_eq!(sp.len(), 5);
        assert_eq!(sp[0], "1");
        assert_eq!(sp[2], "");
        assert_eq!(sp[4], "");

        let sp = s("1123\u{6d4b} \u{8bd5}123123...123")
            .rsplit_sep(&s("123"), 2)
            .unwrap();
        assert_eq!(
            sp,
            vec![s("1123\u{6d4b} \u{8bd5}123"), s("..."), s("")]
        );

        assert_eq!(Str::new().rsplit_sep(&s("abc"), -1).unwrap(), vec![s("")]);
        assert!(matches!(
            Str::new().rsplit_sep(&Str::new(), -1),
            Err(StrError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_pattern_split() {
        let re = Regex::new(r"\d+").unwrap();
        let sp = s("\u{4f60}\u{597d}123abc0").split_pattern(&re, -1);
        assert_eq!(sp.len(), 3);
        assert_eq!(sp[0], "\u{4f60}\u{597d}");
        assert_eq!(sp[2], "");

        let sp = s("\u{4f60}\u{597d}123abc0").split_pattern(&Regex::new("non-exist").unwrap(), -1);
        assert_eq!(sp.len(), 1);

        let sp = s("\u{4f60}\u{597d}123abc0").split_pattern(&Regex::new("(?i)ABc").unwrap(), -1);
        assert_eq!(sp.len(), 2);
        assert_eq!(sp[1], "0");

        let sp = s("\u{4f60}\u{597d}123abc0").split_pattern(&re, 0);
        assert_eq!(sp.len(), 1);
        let sp = s("\u{4f60}\u{597d}123abc0").split_pattern(&re, 1);
        assert_eq!(sp.len(), 2);
        assert_eq!(sp[1], "abc0");

        assert_eq!(Str::new().split_pattern(&re, -1), vec![s("")]);
    }

    #[test]
    fn test_pattern_rsplit_merges_left() {
        let re = Regex::new(r"\d+").unwrap();
        let sp = s("\u{4f60}\u{597d}123abc0").rsplit_pattern(&re, -1);
        assert_eq!(
            sp,
            vec![s("\u{4f60}\u{597d}"), s("abc"), s("")]
        );

        let sp = s("\u{4f60}\u{597d}123abc0").rsplit_pattern(&re, 1);
        assert_eq!(sp, vec![s("\u{4f60}\u{597d}123abc"), s("")]);
        let sp = s("\u{4f60}\u{597d}123abc0").rsplit_pattern(&re, 0);
        assert_eq!(sp.len(), 1);
    }

    #[test]
    fn test_splitlines() {
        let text = s("   123\r\r\n\n abc \n\n\r");
        let sp = text.splitlines(false);
        assert_eq!(
            sp,
            vec![s("   123"), s(""), s(""), s(" abc "), s(""), s("")]
        );

        let sp = text.splitlines(true);
        assert_eq!(sp.len(), 6);
        assert_eq!(sp[0], "   123\r");
        assert_eq!(sp[1], "\r\n");
        assert_eq!(sp[5], "\r");

        assert_eq!(s("abc").splitlines(false), vec![s("abc")]);
        assert!(Str::new().splitlines(false).is_empty());
    }
}
