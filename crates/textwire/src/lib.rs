//! Line reading and percent-encoding for text protocols.
//!
//! Two independent pieces live here:
//!
//! - [`LineReader`] pulls logical lines out of any [`CharSource`], treating
//!   `\n`, `\r` and `\r\n` as the same terminator. Lines up to the configured
//!   maximum length are assembled in a fixed buffer that is reused between
//!   calls; longer lines spill into a growable accumulator.
//! - [`PercentEncoder`] escapes text for use inside URLs. Characters outside
//!   its [`SafeCharacterSet`] are transcoded with a pluggable [`Transcoder`]
//!   (UTF-8 by default, any WHATWG encoding by label) and written as `%XY`
//!   triplets.
//!
//! ```rust
//! use textwire::{LineReader, PercentEncoder, StrSource};
//!
//! let mut reader = LineReader::new(StrSource::new("a b\r\nc/d"));
//! let mut encoder = PercentEncoder::new();
//! encoder.add_safe_character('/').unwrap();
//!
//! let mut encoded = Vec::new();
//! while let Some(line) = reader.read_line().unwrap() {
//!     encoded.push(encoder.encode_to_string(&line, true));
//! }
//! assert_eq!(encoded, ["a%20b", "c/d"]);
//! ```

#![no_std]
extern crate alloc;

#[cfg(any(test, feature = "std"))]
extern crate std;

mod error;
mod line_reader;
mod mark_buffer;
mod options;
mod percent;
mod safe_set;
mod source;
mod transcoder;

#[cfg(feature = "std")]
mod decoding;

#[cfg(test)]
mod tests;

#[cfg(feature = "std")]
pub use decoding::DecodingReader;
pub use error::{EncodeError, LineReaderError, SourceError, TranscodeError};
pub use line_reader::{LineReader, Lines};
pub use mark_buffer::MarkBuffer;
pub use options::{DEFAULT_MAX_LINE_LENGTH, DEFAULT_TARGET_ENCODING, EncoderOptions, LineReaderOptions};
pub use percent::{PercentEncoder, escape_bytes};
pub use safe_set::SafeCharacterSet;
pub use source::{CharRead, CharSource, StrSource};
pub use transcoder::{EncodingTranscoder, Transcoder, Utf8Transcoder, resolve_encoding};
