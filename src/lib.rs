#![deny(unsafe_op_in_unsafe_fn)]
#![warn(missing_docs, missing_debug_implementations)]
//! Python-style, codepoint-indexed text operations over UTF-8 byte buffers.
//!
//! The [`Str`] type owns a contiguous byte buffer and exposes index,
//! slice, split, strip and format semantics defined in terms of
//! *codepoints*, not bytes. Data stays compact as UTF-8; operations that
//! need fixed-width characters (case mapping, numeric parsing) convert to
//! the wide representation and back on demand.
//!
//! Logical indices are signed and Python-like: index 0 is the first
//! codepoint, index -1 the last. Slices are `(start, stop, stride)`
//! descriptors with half-open, possibly-reversed, possibly-strided
//! interval semantics, described by [`Slice`].
//!
//! A buffer is permitted to carry an invalid trailing byte sequence.
//! The bidirectional [`Cursor`] clamps to the nearest buffer boundary
//! when it runs into malformed bytes, so iteration always terminates;
//! operations that would have to *materialize* malformed bytes report a
//! typed error instead.
//!
//! # Example
//!
//! ```
//! use pystr::{Slice, Str};
//!
//! let s = Str::from("  hello, world\n");
//! assert_eq!(s.strip(), "hello, world");
//! assert_eq!(s.strip().at(-1).unwrap(), "d");
//! assert_eq!(
//!     s.strip().slice(Slice::range_step(0, 5, 2)).unwrap(),
//!     "hlo"
//! );
//! ```

pub(crate) mod utf8;

pub(crate) mod error;

pub(crate) mod cursor;

pub(crate) mod str_ty;

pub(crate) mod slice;

pub(crate) mod segment;

pub(crate) mod format;

pub use cursor::{Chars, Cursor};

pub use error::{Result, StrError};

pub use segment::Matcher;

pub use slice::Slice;

pub use str_ty::Str;
