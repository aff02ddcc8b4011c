use crate::{
    error::{Result, StrError},
    str_ty::Str,
};
use std::fmt;

#[derive(Clone, Copy, PartialEq, Eq)]
enum PlaceholderStyle {
    Unset,
    Auto,
    Explicit,
}

impl Str {
    /// Renders `{}` and `{n}` placeholders with the supplied arguments.
    ///
    /// Automatic placeholders (`{}`) consume arguments left-to-right;
    /// explicit placeholders (`{0}`, `{1}`) may be repeated. Mixing the
    /// two styles in one call is a value error. An explicit index past
    /// the argument list, or more automatic placeholders than arguments,
    /// is an index error. `{{` and `}}` escape literal braces; any other
    /// malformed placeholder is a value error.
    pub fn format(&self, args: &[&dyn fmt::Display]) -> Result<Str> {
        let bytes = self.as_bytes();
        let mut result = Str::new();
        let mut style = PlaceholderStyle::Unset;
        let mut next_auto = 0;
        let mut i = 0;
        while i < bytes.len() {
            match bytes[i] {
                b'{' if bytes.get(i + 1) == Some(&b'{') => {
                    result.0.push(b'{');
                    i += 2;
                }
                b'{' => {
                    let close = find_close(bytes, i + 1).ok_or_else(|| {
                        StrError::Value("unmatched '{' in format string".into())
                    })?;
                    let field = &bytes[i + 1..close];
                    let index = if field.is_empty() {
                        if style == PlaceholderStyle::Explicit {
                            return Err(mixed_style_error());
                        }
                        style = PlaceholderStyle::Auto;
                        let index = next_auto;
                        next_auto += 1;
                        index
                    } else {
                        if style == PlaceholderStyle::Auto {
                            return Err(mixed_style_error());
                        }
                        style = PlaceholderStyle::Explicit;
                        parse_index(field)?
                    };
                    let arg = args.get(index).ok_or(StrError::IndexOutOfRange)?;
                    result.push_display(arg);
                    i = close + 1;
                }
                b'}' if bytes.get(i + 1) == Some(&b'}') => {
                    result.0.push(b'}');
                    i += 2;
                }
                b'}' => {
                    return Err(StrError::Value(
                        "single '}' encountered in format string".into(),
                    ));
                }
                other => {
                    result.0.push(other);
                    i += 1;
                }
            }
        }
        Ok(result)
    }
}

fn find_close(bytes: &[u8], from: usize) -> Option<usize> {
    bytes[from..].iter().position(|&b| b == b'}').map(|p| from + p)
}

fn parse_index(field: &[u8]) -> Result<usize> {
    if !field.iter().all(u8::is_ascii_digit) {
        return Err(StrError::Value(
            "placeholder index must be a non-negative integer".into(),
        ));
    }
    std::str::from_utf8(field)
        .ok()
        .and_then(|text| text.parse().ok())
        .ok_or_else(|| StrError::Value("placeholder index must be a non-negative integer".into()))
}

fn mixed_style_error() -> StrError {
    StrError::Value("cannot mix automatic and explicit placeholders".into())
}
