//! Line splitting over a [`CharSource`].
//!
//! The reader scans into a fixed buffer that is allocated on the first call
//! and reused afterwards. Each call marks the source, scans forward until it
//! finds `\r` or `\n`, then rewinds and skips exactly the characters that
//! belong to the line and its terminator. That rewind is what lets the reader
//! look one character past a trailing `\r` without losing it when no `\n`
//! follows, even when the `\r` is the last character of a refill.
//!
//! A line that does not fit is moved to an overflow `String` one buffer at a
//! time, and the scan continues with a fresh mark. The source never has to
//! remember more than `max_line_length + 1` characters.

use alloc::{string::String, vec, vec::Vec};

use crate::{CharRead, CharSource, LineReaderError, LineReaderOptions};

/// Outcome of scanning one buffer's worth of characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Fill {
    /// A terminator was found at `end`; `skip` characters (counted from the
    /// mark) cover the line content and its terminator.
    Terminated { end: usize, skip: usize },
    /// The source ended after `len` characters without a terminator.
    Exhausted { len: usize },
    /// The buffer filled without a terminator.
    Full,
}

fn is_terminator(c: char) -> bool {
    c == '\r' || c == '\n'
}

fn fill<S: CharSource>(source: &mut S, buf: &mut [char]) -> Result<Fill, S::Error> {
    let mut pos = 0;
    while pos < buf.len() {
        let n = source.read_chars(&mut buf[pos..])?;
        if n == 0 {
            return Ok(Fill::Exhausted { len: pos });
        }
        let filled = pos + n;

        if let Some(offset) = buf[pos..filled].iter().position(|&c| is_terminator(c)) {
            let end = pos + offset;
            let mut skip = end + 1;
            if buf[end] == '\r' {
                // A `\r` closing this read needs one more character to tell
                // `\r` from `\r\n`. The rewind afterwards puts it back.
                let next = if end + 1 < filled {
                    Some(buf[end + 1])
                } else {
                    source.read_char()?
                };
                if next == Some('\n') {
                    skip += 1;
                }
            }
            return Ok(Fill::Terminated { end, skip });
        }

        pos = filled;
    }
    Ok(Fill::Full)
}

/// Reads `\n`, `\r` or `\r\n` terminated lines from a [`CharSource`].
///
/// Not meant to be shared: every call mutates the scan buffer and the
/// source position.
///
/// # Examples
///
/// ```rust
/// use textwire::{LineReader, StrSource};
///
/// let mut reader = LineReader::new(StrSource::new("a\r\nb\nc\rd"));
/// let lines: Vec<String> = reader.lines().map(Result::unwrap).collect();
/// assert_eq!(lines, ["a", "b", "c", "d"]);
/// assert_eq!(reader.read_line().unwrap(), None);
/// ```
#[derive(Debug)]
pub struct LineReader<S> {
    source: S,
    options: LineReaderOptions,
    line_buffer: Option<Vec<char>>,
}

impl<S: CharSource> LineReader<S> {
    /// Create a reader with the default line length of
    /// [`DEFAULT_MAX_LINE_LENGTH`](crate::DEFAULT_MAX_LINE_LENGTH).
    pub fn new(source: S) -> Self {
        Self::with_options(source, LineReaderOptions::default())
    }

    /// Create a reader with explicit options.
    pub fn with_options(source: S, options: LineReaderOptions) -> Self {
        Self {
            source,
            options,
            line_buffer: None,
        }
    }

    /// Options the reader was created with.
    pub fn options(&self) -> &LineReaderOptions {
        &self.options
    }

    /// The wrapped source.
    pub fn get_ref(&self) -> &S {
        &self.source
    }

    /// The wrapped source. Reading from it between lines is fine; reading
    /// during a failed call leaves the position wherever the failure did.
    pub fn get_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Drop the scan buffer and hand back the source, positioned just after
    /// the last line returned.
    pub fn into_inner(self) -> S {
        self.source
    }

    /// Read the next line without its terminator.
    ///
    /// Returns `Ok(None)` once the source is exhausted. Characters after the
    /// last terminator are returned as a final line.
    ///
    /// # Errors
    ///
    /// - [`LineReaderError::MarkLimitExceeded`] if the source cannot look
    ///   `max_line_length + 1` characters ahead. Nothing is read in that case.
    /// - [`LineReaderError::Source`] if the source fails. The reader can be
    ///   used again afterwards.
    /// - [`LineReaderError::ShortSkip`] if the source loses characters
    ///   between mark and reset.
    pub fn read_line(&mut self) -> Result<Option<String>, LineReaderError<S::Error>> {
        let capacity = self.options.max_line_length.get();
        let read_ahead = self.options.read_ahead();
        let supported = self.source.read_ahead_limit();
        if read_ahead > supported {
            return Err(LineReaderError::MarkLimitExceeded {
                requested: read_ahead,
                supported,
            });
        }

        let buf = self.line_buffer.get_or_insert_with(|| vec!['\0'; capacity]);
        let source = &mut self.source;
        let mut overflow: Option<String> = None;

        let (end, skip) = loop {
            source.mark(read_ahead).map_err(LineReaderError::Source)?;
            match fill(source, buf).map_err(LineReaderError::Source)? {
                Fill::Terminated { end, skip } => break (end, skip),
                Fill::Exhausted { len: 0 } if overflow.is_none() => return Ok(None),
                Fill::Exhausted { len } => break (len, len),
                Fill::Full => {
                    let spill = overflow.get_or_insert_with(String::new);
                    spill.extend(buf.iter());
                    #[cfg(feature = "tracing")]
                    tracing::trace!(capacity, spilled = spill.len(), "line exceeds buffer");
                }
            }
        };

        source.reset().map_err(LineReaderError::Source)?;
        let skipped = source.skip(skip).map_err(LineReaderError::Source)?;
        if skipped != skip {
            return Err(LineReaderError::ShortSkip {
                expected: skip,
                skipped,
            });
        }

        let mut line = overflow.unwrap_or_else(|| String::with_capacity(end));
        line.extend(&buf[..end]);
        #[cfg(feature = "tracing")]
        tracing::trace!(len = line.len(), terminator = skip - end, "line read");
        Ok(Some(line))
    }

    /// Iterate over the remaining lines.
    ///
    /// Errors are yielded as items and do not end the iteration, so a
    /// source that keeps failing keeps producing errors.
    pub fn lines(&mut self) -> Lines<'_, S> {
        Lines { reader: self }
    }
}

/// Iterator returned by [`LineReader::lines`].
#[derive(Debug)]
pub struct Lines<'a, S> {
    reader: &'a mut LineReader<S>,
}

impl<S: CharSource> Iterator for Lines<'_, S> {
    type Item = Result<String, LineReaderError<S::Error>>;

    fn next(&mut self) -> Option<Self::Item> {
        self.reader.read_line().transpose()
    }
}

impl<S: CharSource> CharRead for LineReader<S> {
    type Error = S::Error;

    fn read_chars(&mut self, buf: &mut [char]) -> Result<usize, Self::Error> {
        self.source.read_chars(buf)
    }

    fn read_char(&mut self) -> Result<Option<char>, Self::Error> {
        self.source.read_char()
    }

    fn skip(&mut self, n: usize) -> Result<usize, Self::Error> {
        self.source.skip(n)
    }
}

impl<S: CharSource> CharSource for LineReader<S> {
    fn read_ahead_limit(&self) -> usize {
        self.source.read_ahead_limit()
    }

    fn mark(&mut self, read_ahead_limit: usize) -> Result<(), Self::Error> {
        self.source.mark(read_ahead_limit)
    }

    fn reset(&mut self) -> Result<(), Self::Error> {
        self.source.reset()
    }
}

#[cfg(test)]
mod tests {
    use alloc::{string::String, vec::Vec};
    use core::num::NonZeroUsize;

    use super::{Fill, LineReader, fill};
    use crate::{CharRead, LineReaderOptions, StrSource};

    fn small(max: usize) -> LineReaderOptions {
        LineReaderOptions {
            max_line_length: NonZeroUsize::new(max).unwrap(),
        }
    }

    #[test]
    fn buffer_is_allocated_lazily_and_reused() {
        let mut reader = LineReader::with_options(StrSource::new("ab\ncd\n"), small(8));
        assert!(reader.line_buffer.is_none());

        assert_eq!(reader.read_line().unwrap().as_deref(), Some("ab"));
        let first = reader.line_buffer.as_ref().map(Vec::as_ptr);
        assert_eq!(reader.line_buffer.as_ref().map(Vec::len), Some(8));

        assert_eq!(reader.read_line().unwrap().as_deref(), Some("cd"));
        assert_eq!(reader.line_buffer.as_ref().map(Vec::as_ptr), first);
    }

    #[test]
    fn fill_peeks_inside_the_buffer_for_crlf() {
        let mut src = StrSource::new("ab\r\ncd");
        let mut buf = ['\0'; 8];
        assert_eq!(fill(&mut src, &mut buf), Ok(Fill::Terminated { end: 2, skip: 4 }));
    }

    #[test]
    fn fill_reads_past_a_trailing_cr() {
        let mut src = StrSource::new("abc\r\nd");
        let mut buf = ['\0'; 4];
        assert_eq!(fill(&mut src, &mut buf), Ok(Fill::Terminated { end: 3, skip: 5 }));

        let mut src = StrSource::new("abc\rd");
        let mut buf = ['\0'; 4];
        assert_eq!(fill(&mut src, &mut buf), Ok(Fill::Terminated { end: 3, skip: 4 }));
    }

    #[test]
    fn fill_reports_full_and_exhausted() {
        let mut buf = ['\0'; 3];
        assert_eq!(fill(&mut StrSource::new("abcd"), &mut buf), Ok(Fill::Full));
        assert_eq!(fill(&mut StrSource::new("ab"), &mut buf), Ok(Fill::Exhausted { len: 2 }));
        assert_eq!(fill(&mut StrSource::new(""), &mut buf), Ok(Fill::Exhausted { len: 0 }));
    }

    #[test]
    fn source_sits_after_the_terminator() {
        let mut reader = LineReader::new(StrSource::new("one\r\ntwo"));
        assert_eq!(reader.read_line().unwrap().as_deref(), Some("one"));
        let mut rest = String::new();
        while let Some(c) = reader.read_char().unwrap() {
            rest.push(c);
        }
        assert_eq!(rest, "two");
    }

    #[test]
    fn crlf_split_across_a_refill() {
        // "abcd" fills the buffer; the terminator opens the second fill.
        let mut reader = LineReader::with_options(StrSource::new("abcd\r\nef"), small(4));
        let lines: Vec<String> = reader.lines().map(Result::unwrap).collect();
        assert_eq!(lines, ["abcd", "ef"]);
    }
}
