#![no_main]
use arbitrary::Arbitrary;
use encoding_rs::{Encoding, UTF_8};
use libfuzzer_sys::fuzz_target;
use textwire::{EncoderOptions, PercentEncoder};

const TARGETS: &[&str] = &["UTF8", "windows-1252", "shift_jis", "euc-kr", "iso-2022-jp", "gb18030"];

#[derive(Debug, Arbitrary)]
struct Input {
    units: Vec<u16>,
    extra_safe: Vec<u8>,
    target: u8,
    upper: bool,
}

fn decode_escapes(encoded: &str) -> Vec<u8> {
    let bytes = encoded.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = std::str::from_utf8(&bytes[i + 1..i + 3]).unwrap();
            out.push(u8::from_str_radix(hex, 16).unwrap());
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    out
}

fn run(input: Input) {
    let label = TARGETS[usize::from(input.target) % TARGETS.len()];
    let mut encoder = PercentEncoder::with_options(EncoderOptions {
        target_encoding: label.to_string(),
    });
    // '%' stays escaped so the output can be parsed back.
    for b in input.extra_safe.into_iter().filter(|&b| b != b'%') {
        let added = encoder.add_safe_character(char::from(b));
        assert_eq!(added.is_ok(), b.is_ascii());
    }

    let mut out = String::new();
    encoder.encode_utf16(&mut out, &input.units, input.upper).unwrap();

    // Only safe ASCII and well-formed escapes in the requested case.
    let bytes = out.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            for &h in &bytes[i + 1..i + 3] {
                assert!(h.is_ascii_digit() || (h.is_ascii_hexdigit() && h.is_ascii_uppercase() == input.upper));
            }
            i += 3;
        } else {
            assert!(encoder.safe_characters().contains(char::from(bytes[i])));
            i += 1;
        }
    }

    // ISO-2022-JP is left out below: its decoder rejects the back-to-back
    // escape sequences that per-character encoding produces.
    if label == "iso-2022-jp" {
        return;
    }
    let encoding = Encoding::for_label(label.as_bytes()).unwrap();
    let raw = decode_escapes(&out);
    let (text, _malformed) = encoding.decode_without_bom_handling(&raw);

    if encoding == UTF_8 {
        let expected: String = char::decode_utf16(input.units.iter().copied())
            .map(|c| c.unwrap_or('?'))
            .collect();
        assert_eq!(text, expected);
    }

    // Encoding the decoded text again yields the same bytes. Compared after
    // unescaping, since a character may map onto a safe one.
    let mut again = String::new();
    encoder.encode(&mut again, &text, input.upper).unwrap();
    assert_eq!(decode_escapes(&again), raw);
}

fuzz_target!(|input: Input| run(input));
