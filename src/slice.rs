use crate::{
    error::{Result, StrError},
    str_ty::Str,
};

/// A Python-style `(start, stop, stride)` slice descriptor.
///
/// Negative bounds count from the end of the string; a negative stride
/// walks backward. When the stop bound is left at its default, it
/// resolves to the string's length at use time, so `[start:]` means "to
/// the end" rather than "to zero". A zero stride is rejected when the
/// slice is applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Slice {
    start: isize,
    stop: isize,
    stride: isize,
    use_default_stop: bool,
}

impl Default for Slice {
    fn default() -> Self {
        Slice::full()
    }
}

impl Slice {
    /// The full-copy slice `[:]`.
    pub const fn full() -> Self {
        Slice {
            start: 0,
            stop: 0,
            stride: 1,
            use_default_stop: true,
        }
    }

    /// `[start:]`
    pub const fn from_start(start: isize) -> Self {
        Slice {
            start,
            stop: 0,
            stride: 1,
            use_default_stop: true,
        }
    }

    /// `[start:stop]`
    pub const fn range(start: isize, stop: isize) -> Self {
        Slice {
            start,
            stop,
            stride: 1,
            use_default_stop: false,
        }
    }

    /// `[start:stop:stride]`
    pub const fn range_step(start: isize, stop: isize, stride: isize) -> Self {
        Slice {
            start,
            stop,
            stride,
            use_default_stop: false,
        }
    }

    /// `[start::stride]`
    pub const fn from_start_step(start: isize, stride: isize) -> Self {
        Slice {
            start,
            stop: 0,
            stride,
            use_default_stop: true,
        }
    }
}

impl Str {
    /// Looks up the codepoint at a signed logical index.
    ///
    /// Index 0 is the first codepoint, index -1 the last. Indices are
    /// resolved against the current codepoint length; any miss, including
    /// every index into an empty string, fails with
    /// [`StrError::IndexOutOfRange`].
    pub fn at(&self, idx: isize) -> Result<Str> {
        let begin = self.cursor_begin();
        let end = self.cursor_end();

        if begin == end {
            // empty string has no elements
            return Err(StrError::IndexOutOfRange);
        }

        let mut it;
        if idx >= 0 {
            it = begin;
            for _ in 0..idx {
                if it == end {
                    // reached the end before walking to the index
                    return Err(StrError::IndexOutOfRange);
                }
                it.advance();
            }
        } else {
            it = end;
            // walking from the end, the begin may be reached exactly once,
            // on the final step
            let mut reached_begin = false;
            for _ in 0..idx.unsigned_abs() {
                it.retreat();
                if it == begin {
                    if reached_begin {
                        return Err(StrError::IndexOutOfRange);
                    }
                    reached_begin = true;
                }
            }
        }

        it.get().map_err(|_| StrError::IndexOutOfRange)
    }

    /// Materializes the sub-string selected by a slice descriptor.
    ///
    /// Out-of-range bounds are tolerated and produce an empty result; a
    /// zero stride fails with [`StrError::InvalidArgument`], and a decode
    /// failure while emitting fails with [`StrError::InvalidSubstring`].
    pub fn slice(&self, slc: Slice) -> Result<Str> {
        if slc.stride == 0 {
            return Err(StrError::InvalidArgument(
                "slice stride (step) cannot be zero",
            ));
        }

        let len = self.len() as isize;
        if len == 0 {
            return Ok(Str::new());
        }

        let mut start = slc.start;
        // convert [x::y] to [x:len:y]
        let mut stop = if slc.use_default_stop { len } else { slc.stop };

        // convert negative indices to positive ones
        if start < 0 {
            start += len;
        }
        if stop < 0 {
            stop += len;
        }

        if start == stop
            || (start > stop && slc.stride > 0)
            || (start < stop && slc.stride < 0)
        {
            // the given range is empty
            return Ok(Str::new());
        }

        let mut result = Str::new();

        if slc.stride > 0 {
            if stop <= 0 || start >= len {
                // the given range has no intersection with the string
                return Ok(Str::new());
            }

            start = start.max(0);
            stop = stop.min(len);

            let mut it = self.cursor_begin();
            for _ in 0..start {
                it.advance();
            }

            let mut i = start;
            while i < stop {
                let piece = it.get().map_err(|_| StrError::InvalidSubstring)?;
                result.push_str(&piece);
                for _ in 0..slc.stride {
                    it.advance();
                }
                i += slc.stride;
            }
        } else {
            if start <= -1 || stop >= len - 1 {
                // the given range has no intersection with the string
                return Ok(Str::new());
            }

            start = start.min(len - 1);
            stop = stop.max(-1);

            let mut it = self.cursor_end();
            for _ in 0..(len - start) {
                it.retreat();
            }

            let mut i = start;
            while i > stop {
                let piece = it.get().map_err(|_| StrError::InvalidSubstring)?;
                result.push_str(&piece);
                for _ in 0..-slc.stride {
                    it.retreat();
                }
                i += slc.stride;
            }
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::Slice;
    use crate::{Str, StrError};

    #[test]
    fn test_index_empty() {
        let s = Str::new();
        assert_eq!(s.at(0), Err(StrError::IndexOutOfRange));
        assert_eq!(s.at(-1), Err(StrError::IndexOutOfRange));
    }

    #[test]
    fn test_index() {
        let s = Str::from("\u{6d4b}\u{8bd5}123");
        let len = s.len() as isize;

        assert_eq!(s.at(0).unwrap(), "\u{6d4b}");
        assert_eq!(s.at(-len).unwrap(), "\u{6d4b}");
        assert_eq!(s.at(-1).unwrap(), "3");
        assert_eq!(s.at(len - 1).unwrap(), "3");

        assert_eq!(s.at(len), Err(StrError::IndexOutOfRange));
        assert_eq!(s.at(-len - 1), Err(StrError::IndexOutOfRange));
    }

    #[test]
    fn test_slice_forward() {
        let s = Str::from("\u{6d4b}\u{8bd5}123");

        assert_eq!(s.slice(Slice::full()).unwrap(), s);
        assert_eq!(s.slice(Slice::from_start(1)).unwrap(), "\u{8bd5}123");
        assert_eq!(s.slice(Slice::range(1, 3)).unwrap(), "\u{8bd5}1");
        assert_eq!(s.slice(Slice::range(1, -1)).unwrap(), "\u{8bd5}12");
        assert_eq!(s.slice(Slice::range(-4, 0)).unwrap(), "");
        assert_eq!(s.slice(Slice::range(-3, 4)).unwrap(), "12");
        assert_eq!(s.slice(Slice::range(-4, -1)).unwrap(), "\u{8bd5}12");
        assert_eq!(s.slice(Slice::range_step(1, -1, 2)).unwrap(), "\u{8bd5}2");
        assert_eq!(s.slice(Slice::from_start_step(0, 2)).unwrap(), "\u{6d4b}13");
    }

    #[test]
    fn test_slice_backward() {
        let s = Str::from("\u{6d4b}\u{8bd5}123");
        let len = s.len() as isize;

        assert_eq!(s.slice(Slice::range_step(1, 10, -1)).unwrap(), "");
        assert_eq!(
            s.slice(Slice::range_step(4, 0, -1)).unwrap(),
            "321\u{8bd5}"
        );
        assert_eq!(
            s.slice(Slice::range_step(-1, 0, -1)).unwrap(),
            "321\u{8bd5}"
        );
        assert_eq!(
            s.slice(Slice::range_step(-1, -len - 1, -1)).unwrap(),
            "321\u{8bd5}\u{6d4b}"
        );
    }

    #[test]
    fn test_slice_zero_stride() {
        let s = Str::from("\u{6d4b}\u{8bd5}123");
        assert!(matches!(
            s.slice(Slice::range_step(1, 2, 0)),
            Err(StrError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_slice_empty_string() {
        let s = Str::new();
        assert_eq!(s.slice(Slice::range(0, 10)).unwrap(), "");
        assert_eq!(s.slice(Slice::full()).unwrap(), "");
    }

    #[test]
    fn test_slice_malformed_tail() {
        // two codepoints followed by a truncated sequence
        let s = Str::from(&b"ab\xE6\xB5"[..]);
        // len counts the clamped tail as one step
        assert_eq!(s.len(), 3);
        assert_eq!(
            s.slice(Slice::full()),
            Err(StrError::InvalidSubstring)
        );
        assert_eq!(s.slice(Slice::range(0, 2)).unwrap(), "ab");
    }
}
