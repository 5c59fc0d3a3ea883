//! Percent-encodes every line read from stdin.
//!
//! Lines may end in `\n`, `\r` or `\r\n`; each encoded line is printed with
//! a plain `\n`. The first argument names the encoding stdin is read in and
//! the second the encoding escapes are produced in. Both default to UTF-8.
//!
//! Run with
//!
//! ```bash
//! printf 'caf\xe9 /menu\r\n' | cargo run -p textwire --example encode_lines -- latin1 utf-8
//! ```

use std::io::{self, Write};

use encoding_rs::{Encoding, UTF_8};
use textwire::{DecodingReader, LineReader, MarkBuffer, PercentEncoder};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let input_label = args.next();
    let target_label = args.next().unwrap_or_else(|| "utf-8".to_string());

    let input_encoding = match input_label {
        Some(label) => Encoding::for_label(label.as_bytes())
            .ok_or_else(|| format!("unknown input encoding {label:?}"))?,
        None => UTF_8,
    };

    let source = MarkBuffer::new(DecodingReader::with_encoding(io::stdin().lock(), input_encoding));
    let mut reader = LineReader::new(source);

    let mut encoder = PercentEncoder::new();
    encoder.set_target_encoding(target_label);
    encoder.add_safe_character('/')?;

    let mut stdout = io::stdout().lock();
    let mut encoded = String::new();
    while let Some(line) = reader.read_line()? {
        encoded.clear();
        encoder.encode(&mut encoded, &line, true)?;
        writeln!(stdout, "{encoded}")?;
    }
    Ok(())
}
