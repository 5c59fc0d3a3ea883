//! Character to byte conversion for the percent-encoder.

use alloc::{string::ToString, vec::Vec};

use encoding_rs::{Encoder, EncoderResult, Encoding, UTF_8};

use crate::{EncodeError, TranscodeError};

/// Longest byte sequence any supported encoding emits for one character,
/// including ISO-2022-JP shift sequences on both sides.
const MAX_CHAR_BYTES: usize = 16;

/// Converts one character at a time into bytes of some target encoding.
pub trait Transcoder {
    /// Append the encoded form of `ch` to `dst`.
    ///
    /// # Errors
    ///
    /// Implementations decide which characters they cannot represent.
    fn transcode(&mut self, ch: char, dst: &mut Vec<u8>) -> Result<(), TranscodeError>;
}

impl<T: Transcoder + ?Sized> Transcoder for alloc::boxed::Box<T> {
    fn transcode(&mut self, ch: char, dst: &mut Vec<u8>) -> Result<(), TranscodeError> {
        (**self).transcode(ch, dst)
    }
}

/// Plain UTF-8.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Utf8Transcoder;

impl Transcoder for Utf8Transcoder {
    fn transcode(&mut self, ch: char, dst: &mut Vec<u8>) -> Result<(), TranscodeError> {
        let mut utf8 = [0; 4];
        dst.extend_from_slice(ch.encode_utf8(&mut utf8).as_bytes());
        Ok(())
    }
}

/// Any encoding `encoding_rs` can encode to.
///
/// UTF-16 and the `replacement` encoding map to UTF-8, as in the WHATWG
/// encoding standard. Characters the target cannot represent become `?`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodingTranscoder {
    encoding: &'static Encoding,
}

impl EncodingTranscoder {
    /// Transcoder producing bytes in `encoding`'s output encoding.
    #[must_use]
    pub fn new(encoding: &'static Encoding) -> Self {
        Self {
            encoding: encoding.output_encoding(),
        }
    }

    /// The encoding bytes are produced in.
    #[must_use]
    pub fn encoding(&self) -> &'static Encoding {
        self.encoding
    }

    fn encode_into(
        encoder: &mut Encoder,
        ch: char,
        src: &str,
        out: &mut [u8; MAX_CHAR_BYTES],
    ) -> Result<usize, TranscodeError> {
        let (result, _read, mut written) =
            encoder.encode_from_utf8_without_replacement(src, out, true);
        match result {
            EncoderResult::InputEmpty => return Ok(written),
            EncoderResult::OutputFull => return Err(TranscodeError::Overflow(ch)),
            EncoderResult::Unmappable(_) => {}
        }

        // Flush any shift state before the ASCII replacement.
        let (result, _read, flushed) =
            encoder.encode_from_utf8_without_replacement("", &mut out[written..], true);
        if result != EncoderResult::InputEmpty {
            return Err(TranscodeError::Overflow(ch));
        }
        written += flushed;
        let slot = out.get_mut(written).ok_or(TranscodeError::Overflow(ch))?;
        *slot = b'?';
        Ok(written + 1)
    }
}

impl Default for EncodingTranscoder {
    fn default() -> Self {
        Self::new(UTF_8)
    }
}

impl Transcoder for EncodingTranscoder {
    fn transcode(&mut self, ch: char, dst: &mut Vec<u8>) -> Result<(), TranscodeError> {
        let mut utf8 = [0; 4];
        let src: &str = ch.encode_utf8(&mut utf8);
        if self.encoding == UTF_8 {
            dst.extend_from_slice(src.as_bytes());
            return Ok(());
        }

        // Encoders are stateful (ISO-2022-JP); a fresh one per character
        // keeps each escape self-contained.
        let mut encoder = self.encoding.new_encoder();
        let mut out = [0; MAX_CHAR_BYTES];
        let written = Self::encode_into(&mut encoder, ch, src, &mut out)?;
        dst.extend_from_slice(&out[..written]);
        Ok(())
    }
}

/// Look up an encoding by WHATWG label, e.g. `"UTF8"`, `"utf-8"`,
/// `"latin1"` or `"Shift_JIS"`. Surrounding whitespace and case are
/// ignored.
///
/// # Errors
///
/// [`EncodeError::UnsupportedEncoding`] for unknown labels.
pub fn resolve_encoding(label: &str) -> Result<&'static Encoding, EncodeError> {
    Encoding::for_label(label.as_bytes())
        .ok_or_else(|| EncodeError::UnsupportedEncoding(label.to_string()))
}
