use alloc::string::{String, ToString};
use core::num::NonZeroUsize;

/// Default capacity of the line buffer, in characters.
pub const DEFAULT_MAX_LINE_LENGTH: usize = 4096;

/// Encoding label used by [`PercentEncoder`](crate::PercentEncoder) until
/// another one is configured.
pub const DEFAULT_TARGET_ENCODING: &str = "UTF8";

/// Configuration for [`LineReader`](crate::LineReader).
///
/// # Examples
///
/// ```rust
/// use core::num::NonZeroUsize;
/// use textwire::{LineReader, LineReaderOptions, StrSource};
///
/// let options = LineReaderOptions {
///     max_line_length: NonZeroUsize::new(16).unwrap(),
/// };
/// let mut reader = LineReader::with_options(StrSource::new("short\n"), options);
/// assert_eq!(reader.read_line().unwrap().as_deref(), Some("short"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LineReaderOptions {
    /// Capacity of the fixed scan buffer.
    ///
    /// Lines longer than this are still returned intact, but each extra
    /// buffer's worth of characters costs an allocation. The source must be
    /// able to look ahead one character further than this.
    ///
    /// # Default
    ///
    /// `4096`
    pub max_line_length: NonZeroUsize,
}

impl Default for LineReaderOptions {
    fn default() -> Self {
        Self {
            max_line_length: NonZeroUsize::new(DEFAULT_MAX_LINE_LENGTH)
                .unwrap_or(NonZeroUsize::MIN),
        }
    }
}

impl LineReaderOptions {
    /// Number of characters the reader asks its source to keep for
    /// `reset`: the buffer capacity plus one character of look-ahead for a
    /// `\r\n` that straddles a refill.
    #[must_use]
    pub fn read_ahead(&self) -> usize {
        self.max_line_length.get().saturating_add(1)
    }
}

/// Configuration for [`PercentEncoder`](crate::PercentEncoder).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EncoderOptions {
    /// WHATWG label of the encoding used for characters that need escaping,
    /// e.g. `"utf-8"`, `"latin1"` or `"shift_jis"`.
    ///
    /// The label is resolved on first use, so an unknown label surfaces as
    /// an error from the first encode call rather than from construction.
    ///
    /// # Default
    ///
    /// `"UTF8"`
    pub target_encoding: String,
}

impl Default for EncoderOptions {
    fn default() -> Self {
        Self {
            target_encoding: DEFAULT_TARGET_ENCODING.to_string(),
        }
    }
}
