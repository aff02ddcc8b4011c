use thiserror::Error;

/// Errors raised by the fallible string operations.
///
/// Decode-level soft failures (a cursor moving past malformed trailing
/// bytes) are absorbed by clamping and never surface through this type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StrError {
    /// A logical index addressed a codepoint outside the string.
    #[error("index out of range")]
    IndexOutOfRange,
    /// An argument violated a structural requirement of the operation,
    /// such as a zero slice stride or an empty literal separator.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
    /// The content could not be interpreted as requested.
    #[error("{0}")]
    Value(String),
    /// A parsed numeral exceeded the range of the target numeric type.
    #[error("converted value out of range of {0}")]
    OutOfRange(&'static str),
    /// Malformed bytes were encountered while materializing a slice result.
    #[error("invalid unicode substring")]
    InvalidSubstring,
    /// A cursor positioned at a buffer boundary was dereferenced.
    #[error("no valid value available")]
    NoValueAvailable,
}

/// Convenience alias for results of string operations.
pub type Result<T> = core::result::Result<T, StrError>;
