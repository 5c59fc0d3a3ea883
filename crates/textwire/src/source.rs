use alloc::vec::Vec;
use core::convert::Infallible;

/// A sequential source of characters.
pub trait CharRead {
    /// Error reported by the underlying source.
    type Error;

    /// Read up to `buf.len()` characters into `buf`.
    ///
    /// Returns the number of characters written. `Ok(0)` for a non-empty
    /// `buf` means end of stream.
    ///
    /// # Errors
    ///
    /// Propagates failures of the underlying source.
    fn read_chars(&mut self, buf: &mut [char]) -> Result<usize, Self::Error>;

    /// Read a single character, or `None` at end of stream.
    ///
    /// # Errors
    ///
    /// Propagates failures of the underlying source.
    fn read_char(&mut self) -> Result<Option<char>, Self::Error> {
        let mut one = ['\0'];
        let n = self.read_chars(&mut one)?;
        Ok((n == 1).then_some(one[0]))
    }

    /// Discard up to `n` characters, returning how many were discarded.
    /// Fewer than `n` means the stream ended.
    ///
    /// # Errors
    ///
    /// Propagates failures of the underlying source.
    fn skip(&mut self, n: usize) -> Result<usize, Self::Error> {
        let mut scratch = ['\0'; 64];
        let mut skipped = 0;
        while skipped < n {
            let want = (n - skipped).min(scratch.len());
            let got = self.read_chars(&mut scratch[..want])?;
            if got == 0 {
                break;
            }
            skipped += got;
        }
        Ok(skipped)
    }
}

/// A [`CharRead`] that can remember a position and rewind to it.
pub trait CharSource: CharRead {
    /// Largest `read_ahead_limit` accepted by [`CharSource::mark`].
    fn read_ahead_limit(&self) -> usize;

    /// Remember the current position. A later [`CharSource::reset`] rewinds
    /// here as long as at most `read_ahead_limit` characters were read in
    /// between.
    ///
    /// # Errors
    ///
    /// Fails if the limit exceeds [`CharSource::read_ahead_limit`] or the
    /// source cannot mark.
    fn mark(&mut self, read_ahead_limit: usize) -> Result<(), Self::Error>;

    /// Rewind to the most recent mark.
    ///
    /// # Errors
    ///
    /// Fails if there is no valid mark.
    fn reset(&mut self) -> Result<(), Self::Error>;
}

impl<T: CharRead + ?Sized> CharRead for &mut T {
    type Error = T::Error;

    fn read_chars(&mut self, buf: &mut [char]) -> Result<usize, Self::Error> {
        (**self).read_chars(buf)
    }

    fn read_char(&mut self) -> Result<Option<char>, Self::Error> {
        (**self).read_char()
    }

    fn skip(&mut self, n: usize) -> Result<usize, Self::Error> {
        (**self).skip(n)
    }
}

impl<T: CharSource + ?Sized> CharSource for &mut T {
    fn read_ahead_limit(&self) -> usize {
        (**self).read_ahead_limit()
    }

    fn mark(&mut self, read_ahead_limit: usize) -> Result<(), Self::Error> {
        (**self).mark(read_ahead_limit)
    }

    fn reset(&mut self) -> Result<(), Self::Error> {
        (**self).reset()
    }
}

/// In-memory [`CharSource`] over a string.
///
/// Look-ahead is unbounded, and `reset` without a prior mark rewinds to the
/// start of the text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StrSource {
    chars: Vec<char>,
    pos: usize,
    mark: usize,
}

impl StrSource {
    /// Source positioned at the start of `text`.
    #[must_use]
    pub fn new(text: &str) -> Self {
        Self {
            chars: text.chars().collect(),
            pos: 0,
            mark: 0,
        }
    }

    /// Characters not yet read.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.chars.len() - self.pos
    }
}

impl From<&str> for StrSource {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl CharRead for StrSource {
    type Error = Infallible;

    fn read_chars(&mut self, buf: &mut [char]) -> Result<usize, Self::Error> {
        let n = buf.len().min(self.remaining());
        buf[..n].copy_from_slice(&self.chars[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }

    fn skip(&mut self, n: usize) -> Result<usize, Self::Error> {
        let n = n.min(self.remaining());
        self.pos += n;
        Ok(n)
    }
}

impl CharSource for StrSource {
    fn read_ahead_limit(&self) -> usize {
        usize::MAX
    }

    fn mark(&mut self, _read_ahead_limit: usize) -> Result<(), Self::Error> {
        self.mark = self.pos;
        Ok(())
    }

    fn reset(&mut self) -> Result<(), Self::Error> {
        self.pos = self.mark;
        Ok(())
    }
}
