#![no_main]
use core::convert::Infallible;
use core::num::NonZeroUsize;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use textwire::{CharRead, LineReader, LineReaderOptions, MarkBuffer, StrSource};

#[derive(Debug, Arbitrary)]
struct Input {
    text: String,
    max_line_length: u8,
    read_size: u8,
}

/// Hands out at most `max` characters per read.
struct Trickle {
    inner: StrSource,
    max: usize,
}

impl CharRead for Trickle {
    type Error = Infallible;

    fn read_chars(&mut self, buf: &mut [char]) -> Result<usize, Self::Error> {
        let n = buf.len().min(self.max);
        self.inner.read_chars(&mut buf[..n])
    }
}

/// Straightforward splitter the reader must agree with.
fn expected_lines(text: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();
    let mut pending = false;
    while let Some(c) = chars.next() {
        match c {
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                lines.push(std::mem::take(&mut current));
                pending = false;
            }
            '\n' => {
                lines.push(std::mem::take(&mut current));
                pending = false;
            }
            c => {
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

fn run(input: Input) {
    let Some(max) = NonZeroUsize::new(usize::from(input.max_line_length)) else {
        return;
    };
    let options = LineReaderOptions { max_line_length: max };
    let source = MarkBuffer::with_capacity(
        Trickle {
            inner: StrSource::new(&input.text),
            max: usize::from(input.read_size).max(1),
        },
        options.read_ahead(),
    );
    let mut reader = LineReader::with_options(source, options);

    let mut actual = Vec::new();
    while let Some(line) = reader.read_line().unwrap() {
        actual.push(line);
    }
    assert_eq!(actual, expected_lines(&input.text));
    assert_eq!(reader.read_line().unwrap(), None);
}

fuzz_target!(|input: Input| run(input));
