//! Percent-encoding with a per-encoder safe set and target encoding.

use alloc::{boxed::Box, string::String, vec::Vec};
use core::{
    fmt::{self, Write},
    ops::RangeInclusive,
};

use crate::{
    EncodeError, EncoderOptions, EncodingTranscoder, SafeCharacterSet, Transcoder,
    resolve_encoding,
};

const HEX_UPPER: &[u8; 16] = b"0123456789ABCDEF";
const HEX_LOWER: &[u8; 16] = b"0123456789abcdef";

const HIGH_SURROGATES: RangeInclusive<u16> = 0xD800..=0xDBFF;
const LOW_SURROGATES: RangeInclusive<u16> = 0xDC00..=0xDFFF;

/// Stands in for a surrogate with no partner, as for unmappable characters.
const UNPAIRED: char = '?';

/// Write every byte of `bytes` as a `%XY` triplet.
///
/// ```rust
/// let mut out = String::new();
/// textwire::escape_bytes(&mut out, &[b' ', 0x00, 0xFF], false).unwrap();
/// assert_eq!(out, "%20%00%ff");
/// ```
///
/// # Errors
///
/// Propagates failures of `out`.
pub fn escape_bytes<W: Write + ?Sized>(
    out: &mut W,
    bytes: &[u8],
    upper_case_hex: bool,
) -> fmt::Result {
    let hex = if upper_case_hex { HEX_UPPER } else { HEX_LOWER };
    for &b in bytes {
        out.write_char('%')?;
        out.write_char(char::from(hex[usize::from(b >> 4)]))?;
        out.write_char(char::from(hex[usize::from(b & 0x0F)]))?;
    }
    Ok(())
}

fn combine_surrogates(high: u16, low: u16) -> char {
    let code = 0x1_0000 + ((u32::from(high) - 0xD800) << 10) + (u32::from(low) - 0xDC00);
    char::from_u32(code).unwrap_or(UNPAIRED)
}

enum Backend {
    /// Resolved from the label on first use.
    Named {
        label: String,
        resolved: Option<EncodingTranscoder>,
    },
    Custom(Box<dyn Transcoder>),
}

impl Backend {
    fn transcoder(&mut self) -> Result<&mut dyn Transcoder, EncodeError> {
        match self {
            Backend::Named { label, resolved } => {
                let transcoder = match resolved.take() {
                    Some(t) => t,
                    None => {
                        let encoding = resolve_encoding(label)?;
                        #[cfg(feature = "tracing")]
                        tracing::debug!(label = %label, encoding = encoding.name(), "target encoding resolved");
                        EncodingTranscoder::new(encoding)
                    }
                };
                let transcoder: &mut dyn Transcoder = resolved.insert(transcoder);
                Ok(transcoder)
            }
            Backend::Custom(t) => Ok(&mut **t),
        }
    }
}

impl fmt::Debug for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::Named { label, resolved } => f
                .debug_struct("Named")
                .field("label", label)
                .field("resolved", &resolved.as_ref().map(|t| t.encoding().name()))
                .finish(),
            Backend::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Percent-encodes text for use in URLs.
///
/// Characters in the encoder's [`SafeCharacterSet`] are copied; everything
/// else is transcoded to the target encoding and written as `%XY` triplets.
/// Input is walked as UTF-16 code units: a surrogate pair is transcoded as
/// the one character it stands for, and a lone surrogate as `?`. No other
/// rewriting happens (in particular, space is not turned into `+`).
///
/// An encoder keeps a scratch buffer and its safe set as mutable state, so
/// each thread or request should own its own.
///
/// # Examples
///
/// ```rust
/// use textwire::PercentEncoder;
///
/// let mut encoder = PercentEncoder::new();
/// assert_eq!(encoder.encode_to_string("a b", false), "a%20b");
/// assert_eq!(encoder.encode_to_string("a/b", false), "a%2fb");
///
/// encoder.add_safe_character('/').unwrap();
/// assert_eq!(encoder.encode_to_string("a/b", false), "a/b");
/// ```
#[derive(Debug)]
pub struct PercentEncoder {
    safe: SafeCharacterSet,
    backend: Backend,
    scratch: Vec<u8>,
}

impl Default for PercentEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl PercentEncoder {
    /// Encoder with the default safe set, targeting UTF-8.
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(EncoderOptions::default())
    }

    /// Encoder with the default safe set and the configured target encoding.
    #[must_use]
    pub fn with_options(options: EncoderOptions) -> Self {
        Self {
            safe: SafeCharacterSet::DEFAULT,
            backend: Backend::Named {
                label: options.target_encoding,
                resolved: None,
            },
            scratch: Vec::with_capacity(16),
        }
    }

    /// Encoder with the default safe set and a caller-supplied transcoder.
    pub fn with_transcoder<T: Transcoder + 'static>(transcoder: T) -> Self {
        Self {
            safe: SafeCharacterSet::DEFAULT,
            backend: Backend::Custom(Box::new(transcoder)),
            scratch: Vec::with_capacity(16),
        }
    }

    /// Characters this encoder writes through unchanged.
    #[must_use]
    pub fn safe_characters(&self) -> &SafeCharacterSet {
        &self.safe
    }

    /// Stop escaping `c` in this encoder. Other encoders and
    /// [`SafeCharacterSet::DEFAULT`] are unaffected.
    ///
    /// # Errors
    ///
    /// [`EncodeError::NonAsciiSafeCharacter`] if `c` is not ASCII.
    pub fn add_safe_character(&mut self, c: char) -> Result<(), EncodeError> {
        if self.safe.insert(c) {
            Ok(())
        } else {
            Err(EncodeError::NonAsciiSafeCharacter(c))
        }
    }

    /// Select the target encoding by WHATWG label. Replaces any custom
    /// transcoder. The label is checked by the next encode call.
    pub fn set_target_encoding(&mut self, label: impl Into<String>) {
        self.backend = Backend::Named {
            label: label.into(),
            resolved: None,
        };
    }

    /// The configured encoding label, or `None` with a custom transcoder.
    #[must_use]
    pub fn target_encoding(&self) -> Option<&str> {
        match &self.backend {
            Backend::Named { label, .. } => Some(label),
            Backend::Custom(_) => None,
        }
    }

    /// Write the escaped form of `input` to `out`.
    ///
    /// # Errors
    ///
    /// - [`EncodeError::UnsupportedEncoding`] if the target label is unknown,
    ///   even when `input` needs no escaping.
    /// - [`EncodeError::Transcode`] if the transcoder rejects a character.
    /// - [`EncodeError::Sink`] if `out` fails.
    ///
    /// Output written before the failure stays in `out`.
    pub fn encode<W: Write + ?Sized>(
        &mut self,
        out: &mut W,
        input: &str,
        upper_case_hex: bool,
    ) -> Result<(), EncodeError> {
        self.encode_units(out, input.encode_utf16(), upper_case_hex)
    }

    /// Like [`PercentEncoder::encode`] over raw UTF-16, which may hold
    /// unpaired surrogates.
    ///
    /// # Errors
    ///
    /// As for [`PercentEncoder::encode`].
    pub fn encode_utf16<W: Write + ?Sized>(
        &mut self,
        out: &mut W,
        units: &[u16],
        upper_case_hex: bool,
    ) -> Result<(), EncodeError> {
        self.encode_units(out, units.iter().copied(), upper_case_hex)
    }

    /// Best-effort convenience form of [`PercentEncoder::encode`].
    ///
    /// Any failure, including an unknown target encoding, yields an empty
    /// string instead of an error. Use [`PercentEncoder::encode`] when
    /// failures must be seen.
    pub fn encode_to_string(&mut self, input: &str, upper_case_hex: bool) -> String {
        let mut out = String::with_capacity(input.len());
        match self.encode(&mut out, input, upper_case_hex) {
            Ok(()) => out,
            Err(_err) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(error = %_err, "percent-encoding failed, returning empty string");
                String::new()
            }
        }
    }

    fn encode_units<W: Write + ?Sized, I: Iterator<Item = u16>>(
        &mut self,
        out: &mut W,
        units: I,
        upper_case_hex: bool,
    ) -> Result<(), EncodeError> {
        let transcoder = self.backend.transcoder()?;
        let mut units = units.peekable();

        while let Some(unit) = units.next() {
            if self.safe.contains_unit(unit) {
                // Safe units are ASCII.
                out.write_char(char::from(unit as u8))?;
                continue;
            }

            let ch = if HIGH_SURROGATES.contains(&unit) {
                match units.peek() {
                    Some(&low) if LOW_SURROGATES.contains(&low) => {
                        units.next();
                        combine_surrogates(unit, low)
                    }
                    _ => UNPAIRED,
                }
            } else {
                char::from_u32(u32::from(unit)).unwrap_or(UNPAIRED)
            };

            self.scratch.clear();
            let result = transcoder
                .transcode(ch, &mut self.scratch)
                .map_err(EncodeError::from)
                .and_then(|()| {
                    escape_bytes(out, &self.scratch, upper_case_hex).map_err(EncodeError::from)
                });
            #[cfg(feature = "tracing")]
            tracing::trace!(unit, bytes = self.scratch.len(), "escaped");
            self.scratch.clear();
            result?;
        }
        Ok(())
    }
}
