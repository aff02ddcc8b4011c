//! Single-codepoint UTF-8 decoding and encoding.
//!
//! All functions here are pure queries over a byte buffer. Failure is
//! reported through the tri-state [`Decode`] result instead of an error
//! type, since running into the buffer end or a malformed tail is an
//! expected case for the cursor that sits on top of this module.

pub(crate) const MAX_BYTE_COUNT: usize = 4;

const TAG_CONT: u8 = 0b1000_0000;
const TAG_TWO_B: u8 = 0b1100_0000;
const TAG_THREE_B: u8 = 0b1110_0000;
const TAG_FOUR_B: u8 = 0b1111_0000;
const END_ONE_B: u32 = 0x80;
const END_TWO_B: u32 = 0x800;
const END_THREE_B: u32 = 0x10000;

const CONT_PREFIX_MASK: u8 = 0b1100_0000;
const CONT_VALUE_MASK: u8 = 0b0011_1111;

/// Encode buffer for a single codepoint.
pub(crate) type CodepointBuf = smallvec::SmallVec<[u8; MAX_BYTE_COUNT]>;

/// Outcome of decoding one codepoint at a byte position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Decode {
    /// A complete scalar value occupying `len` bytes.
    Scalar { ch: char, len: usize },
    /// The position is at the buffer boundary; there is nothing to decode.
    End,
    /// The bytes at the position do not form a complete, well-formed
    /// sequence before the buffer end.
    Malformed,
}

fn cont_len_from_first_byte(v: u8) -> Option<usize> {
    if v < 128 {
        Some(0)
    } else if v & TAG_FOUR_B == TAG_THREE_B {
        Some(2)
    } else if v & TAG_THREE_B == TAG_TWO_B {
        Some(1)
    } else if v & 0b1111_1000 == TAG_FOUR_B {
        Some(3)
    } else {
        // continuation byte, or a lead byte of a sequence longer than
        // UTF-8 permits
        None
    }
}

pub(crate) fn is_cont_byte(v: u8) -> bool {
    v & CONT_PREFIX_MASK == TAG_CONT
}

#[inline]
fn first_byte_value(byte: u8, cont_len: u32) -> u32 {
    (byte & (0x7F >> cont_len)) as u32
}

#[inline]
fn acc_cont_byte(ch: u32, byte: u8) -> u32 {
    (ch << 6) | (byte & CONT_VALUE_MASK) as u32
}

/// Decode exactly one codepoint starting at `pos`.
pub(crate) fn decode_forward(bytes: &[u8], pos: usize) -> Decode {
    if pos >= bytes.len() {
        return Decode::End;
    }
    let head = bytes[pos];
    let Some(cont_len) = cont_len_from_first_byte(head) else {
        return Decode::Malformed;
    };
    let tail = &bytes[pos + 1..];
    if tail.len() < cont_len {
        // not enough room before the buffer end
        return Decode::Malformed;
    }
    let cont = &tail[..cont_len];
    if !cont.iter().all(|&b| is_cont_byte(b)) {
        return Decode::Malformed;
    }
    let mut value = first_byte_value(head, cont_len as u32);
    for &b in cont {
        value = acc_cont_byte(value, b);
    }
    let min_value = match cont_len {
        0 => 0,
        1 => END_ONE_B,
        2 => END_TWO_B,
        _ => END_THREE_B,
    };
    if value < min_value {
        // overlong encoding
        return Decode::Malformed;
    }
    match char::from_u32(value) {
        Some(ch) => Decode::Scalar {
            ch,
            len: cont_len + 1,
        },
        None => Decode::Malformed,
    }
}

/// Decode the codepoint that ends right before `pos`, scanning backward
/// over at most [`MAX_BYTE_COUNT`] bytes for the sequence start.
pub(crate) fn decode_backward(bytes: &[u8], pos: usize) -> Decode {
    if pos == 0 {
        return Decode::End;
    }
    let scan_begin = pos.saturating_sub(MAX_BYTE_COUNT);
    let mut start = pos - 1;
    while start > scan_begin && is_cont_byte(bytes[start]) {
        start -= 1;
    }
    match decode_forward(bytes, start) {
        Decode::Scalar { ch, len } if start + len == pos => Decode::Scalar { ch, len },
        _ => Decode::Malformed,
    }
}

/// Encode one scalar value as UTF-8.
pub(crate) fn encode(ch: char) -> CodepointBuf {
    let code = ch as u32;
    let mut buf = CodepointBuf::new();
    if code < END_ONE_B {
        buf.push(code as u8);
    } else if code < END_TWO_B {
        buf.push((code >> 6 & 0x1F) as u8 | TAG_TWO_B);
        buf.push((code & 0x3F) as u8 | TAG_CONT);
    } else if code < END_THREE_B {
        buf.push((code >> 12 & 0x0F) as u8 | TAG_THREE_B);
        buf.push((code >> 6 & 0x3F) as u8 | TAG_CONT);
        buf.push((code & 0x3F) as u8 | TAG_CONT);
    } else {
        buf.push((code >> 18 & 0x07) as u8 | TAG_FOUR_B);
        buf.push((code >> 12 & 0x3F) as u8 | TAG_CONT);
        buf.push((code >> 6 & 0x3F) as u8 | TAG_CONT);
        buf.push((code & 0x3F) as u8 | TAG_CONT);
    }
    buf
}

#[cfg(test)]
mod tests {
    use super::{decode_backward, decode_forward, encode, Decode};

    #[test]
    fn test_decode_forward() {
        let bytes = "a\u{6d4b}".as_bytes();
        assert_eq!(decode_forward(bytes, 0), Decode::Scalar { ch: 'a', len: 1 });
        assert_eq!(
            decode_forward(bytes, 1),
            Decode::Scalar {
                ch: '\u{6d4b}',
                len: 3
            }
        );
        assert_eq!(decode_forward(bytes, 4), Decode::End);
    }

    #[test]
    fn test_decode_forward_malformed() {
        // truncated three-byte sequence
        assert_eq!(decode_forward(&[0xE6, 0xB5], 0), Decode::Malformed);
        // lone continuation byte
        assert_eq!(decode_forward(&[0x85], 0), Decode::Malformed);
        // lead byte of a five-byte sequence
        assert_eq!(decode_forward(&[0xF8, 0x80, 0x80, 0x80], 0), Decode::Malformed);
        // overlong two-byte encoding of NUL
        assert_eq!(decode_forward(&[0xC0, 0x80], 0), Decode::Malformed);
        // surrogate
        assert_eq!(decode_forward(&[0xED, 0xA0, 0x80], 0), Decode::Malformed);
    }

    #[test]
    fn test_decode_backward() {
        let bytes = "a\u{6d4b}z".as_bytes();
        assert_eq!(decode_backward(bytes, 0), Decode::End);
        assert_eq!(
            decode_backward(bytes, 1),
            Decode::Scalar { ch: 'a', len: 1 }
        );
        assert_eq!(
            decode_backward(bytes, 4),
            Decode::Scalar {
                ch: '\u{6d4b}',
                len: 3
            }
        );
        // a position inside a sequence does not decode
        assert_eq!(decode_backward(bytes, 2), Decode::Malformed);
    }

    #[test]
    fn test_encode_round_trip() {
        for ch in ['a', '\u{df}', '\u{6d4b}', '\u{1f600}'] {
            let buf = encode(ch);
            assert_eq!(
                decode_forward(&buf, 0),
                Decode::Scalar { ch, len: buf.len() }
            );
        }
    }
}
