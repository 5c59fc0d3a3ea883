use alloc::{string::String, vec::Vec};

use crate::{CharRead, StrSource};

/// Hands out at most `max` characters per read, to force refills at
/// arbitrary positions.
pub(crate) struct Trickle {
    inner: StrSource,
    max: usize,
}

impl Trickle {
    pub(crate) fn new(text: &str, max: usize) -> Self {
        Self {
            inner: StrSource::new(text),
            max: max.max(1),
        }
    }
}

impl CharRead for Trickle {
    type Error = core::convert::Infallible;

    fn read_chars(&mut self, buf: &mut [char]) -> Result<usize, Self::Error> {
        let n = buf.len().min(self.max);
        self.inner.read_chars(&mut buf[..n])
    }
}

/// Straightforward splitter used as the oracle for `LineReader`.
pub(crate) fn reference_lines(text: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut pending = false;
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\r' | '\n' => {
                if c == '\r' && chars.peek() == Some(&'\n') {
                    chars.next();
                }
                lines.push(core::mem::take(&mut current));
                pending = false;
            }
            _ => {
                current.push(c);
                pending = true;
            }
        }
    }
    if pending {
        lines.push(current);
    }
    lines
}

/// Undo percent-encoding, returning the raw bytes.
pub(crate) fn percent_decode(encoded: &str) -> Option<Vec<u8>> {
    let bytes = encoded.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = core::str::from_utf8(bytes.get(i + 1..i + 3)?).ok()?;
            out.push(u8::from_str_radix(hex, 16).ok()?);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    Some(out)
}

#[test]
fn reference_lines_examples() {
    assert_eq!(reference_lines("a\r\nb\nc\rd"), ["a", "b", "c", "d"]);
    assert_eq!(reference_lines("\n\r\r\n"), ["", "", ""]);
    assert_eq!(reference_lines("x\r"), ["x"]);
    assert!(reference_lines("").is_empty());
}

#[test]
fn percent_decode_examples() {
    assert_eq!(percent_decode("a%20b").as_deref(), Some(&b"a b"[..]));
    assert_eq!(percent_decode("%c3%A9").as_deref(), Some(&[0xC3, 0xA9][..]));
    assert_eq!(percent_decode("%2"), None);
}
