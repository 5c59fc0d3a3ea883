use alloc::string::String;
use core::fmt;

use thiserror::Error;

/// Failure while reading a line from a [`CharSource`](crate::CharSource).
#[derive(Error, Debug, PartialEq, Eq)]
pub enum LineReaderError<E> {
    /// The underlying source failed. The reader itself stays usable.
    #[error("source error: {0}")]
    Source(E),
    /// The source cannot look far enough ahead for the configured line
    /// length.
    #[error("read-ahead of {requested} characters exceeds the source limit of {supported}")]
    MarkLimitExceeded {
        /// `max_line_length + 1`.
        requested: usize,
        /// What [`CharSource::read_ahead_limit`](crate::CharSource::read_ahead_limit) reported.
        supported: usize,
    },
    /// After rewinding, the source skipped fewer characters than the line
    /// occupied.
    #[error("source skipped {skipped} of {expected} characters after reset")]
    ShortSkip {
        /// Characters covering the line and its terminator.
        expected: usize,
        /// Characters the source actually skipped.
        skipped: usize,
    },
}

/// Failure reported by [`MarkBuffer`](crate::MarkBuffer).
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SourceError<E> {
    /// The wrapped reader failed.
    #[error("read error: {0}")]
    Read(E),
    /// `mark` asked for more look-ahead than the buffer holds.
    #[error("mark of {requested} characters exceeds the buffer capacity of {supported}")]
    MarkLimitExceeded {
        /// Limit passed to `mark`.
        requested: usize,
        /// Capacity of the buffer.
        supported: usize,
    },
    /// `reset` was called without a mark, or after more characters than the
    /// mark's limit were read.
    #[error("reset without a valid mark")]
    InvalidMark,
}

/// Failure while transcoding a single character to bytes.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranscodeError {
    /// The target encoding has no representation for the character.
    #[error("character {0:?} cannot be represented in the target encoding")]
    Unmappable(char),
    /// The encoded form is longer than any supported encoding produces.
    #[error("transcoded form of {0:?} does not fit the scratch buffer")]
    Overflow(char),
}

/// Failure reported by [`PercentEncoder`](crate::PercentEncoder).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// No encoding is known by this label.
    #[error("unsupported target encoding {0:?}")]
    UnsupportedEncoding(String),
    /// Only ASCII characters can be added to a [`SafeCharacterSet`](crate::SafeCharacterSet).
    #[error("safe characters must be ASCII, got {0:?}")]
    NonAsciiSafeCharacter(char),
    /// The transcoder rejected a character.
    #[error("transcode error: {0}")]
    Transcode(#[from] TranscodeError),
    /// The output sink failed.
    #[error("sink error")]
    Sink(#[from] fmt::Error),
}
