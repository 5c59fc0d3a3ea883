//! Bounded mark/reset on top of a plain [`CharRead`].

use alloc::vec::Vec;

use crate::{
    CharRead, CharSource, DEFAULT_MAX_LINE_LENGTH, SourceError,
};

/// Adds [`CharSource`] capabilities to any [`CharRead`].
///
/// While a mark is active every character handed out is also retained, so
/// [`CharSource::reset`] can replay it. Reading more than the mark's limit
/// drops the mark and the retained characters; a later `reset` then fails
/// with [`SourceError::InvalidMark`].
#[derive(Debug)]
pub struct MarkBuffer<R> {
    inner: R,
    retained: Vec<char>,
    pos: usize,
    mark_limit: Option<usize>,
    capacity: usize,
}

impl<R: CharRead> MarkBuffer<R> {
    /// Wrap `inner` with enough capacity for a
    /// [`LineReader`](crate::LineReader) using the default line length.
    pub fn new(inner: R) -> Self {
        Self::with_capacity(inner, DEFAULT_MAX_LINE_LENGTH + 1)
    }

    /// Wrap `inner`, accepting marks of up to `capacity` characters.
    pub fn with_capacity(inner: R, capacity: usize) -> Self {
        Self {
            inner,
            retained: Vec::new(),
            pos: 0,
            mark_limit: None,
            capacity,
        }
    }

    /// The wrapped reader.
    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    /// The wrapped reader. Reading from it directly bypasses the mark.
    pub fn get_mut(&mut self) -> &mut R {
        &mut self.inner
    }

    /// Unwrap the inner reader. Characters retained for a pending reset are
    /// lost.
    pub fn into_inner(self) -> R {
        self.inner
    }

    fn settle(&mut self) {
        if self.mark_limit.is_some_and(|limit| self.pos > limit) {
            self.mark_limit = None;
        }
        if self.mark_limit.is_none() && self.pos > 0 {
            self.retained.drain(..self.pos);
            self.pos = 0;
        }
    }
}

impl<R: CharRead> CharRead for MarkBuffer<R> {
    type Error = SourceError<R::Error>;

    fn read_chars(&mut self, buf: &mut [char]) -> Result<usize, Self::Error> {
        if buf.is_empty() {
            return Ok(0);
        }

        let n = if self.pos < self.retained.len() {
            let n = buf.len().min(self.retained.len() - self.pos);
            buf[..n].copy_from_slice(&self.retained[self.pos..self.pos + n]);
            self.pos += n;
            n
        } else {
            let n = self.inner.read_chars(buf).map_err(SourceError::Read)?;
            if self.mark_limit.is_some() {
                self.retained.extend_from_slice(&buf[..n]);
                self.pos += n;
            }
            n
        };

        self.settle();
        Ok(n)
    }
}

impl<R: CharRead> CharSource for MarkBuffer<R> {
    fn read_ahead_limit(&self) -> usize {
        self.capacity
    }

    fn mark(&mut self, read_ahead_limit: usize) -> Result<(), Self::Error> {
        if read_ahead_limit > self.capacity {
            return Err(SourceError::MarkLimitExceeded {
                requested: read_ahead_limit,
                supported: self.capacity,
            });
        }
        self.retained.drain(..self.pos);
        self.pos = 0;
        self.mark_limit = Some(read_ahead_limit);
        Ok(())
    }

    fn reset(&mut self) -> Result<(), Self::Error> {
        if self.mark_limit.is_none() {
            return Err(SourceError::InvalidMark);
        }
        self.pos = 0;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use super::MarkBuffer;
    use crate::{CharRead, CharSource, SourceError, StrSource};

    fn read_all<R: CharRead>(r: &mut R) -> String
    where
        R::Error: core::fmt::Debug,
    {
        let mut out = String::new();
        while let Some(c) = r.read_char().unwrap() {
            out.push(c);
        }
        out
    }

    #[test]
    fn replays_after_reset() {
        let mut src = MarkBuffer::with_capacity(StrSource::new("abcdef"), 4);
        assert_eq!(src.read_char(), Ok(Some('a')));
        src.mark(4).unwrap();
        let mut buf = ['\0'; 3];
        assert_eq!(src.read_chars(&mut buf), Ok(3));
        assert_eq!(buf, ['b', 'c', 'd']);
        src.reset().unwrap();
        assert_eq!(read_all(&mut src), "bcdef");
    }

    #[test]
    fn reading_past_the_limit_invalidates_the_mark() {
        let mut src = MarkBuffer::with_capacity(StrSource::new("abcdef"), 8);
        src.mark(2).unwrap();
        assert_eq!(src.skip(3), Ok(3));
        assert_eq!(src.reset(), Err(SourceError::InvalidMark));
        assert_eq!(read_all(&mut src), "def");
    }

    #[test]
    fn reset_without_mark_fails() {
        let mut src = MarkBuffer::new(StrSource::new("x"));
        assert_eq!(src.reset(), Err(SourceError::InvalidMark));
    }

    #[test]
    fn mark_beyond_capacity_fails_loudly() {
        let mut src = MarkBuffer::with_capacity(StrSource::new("x"), 3);
        assert_eq!(
            src.mark(4),
            Err(SourceError::MarkLimitExceeded {
                requested: 4,
                supported: 3
            })
        );
    }

    #[test]
    fn mark_can_be_reset_repeatedly() {
        let mut src = MarkBuffer::with_capacity(StrSource::new("xyz"), 3);
        src.mark(3).unwrap();
        assert_eq!(src.skip(2), Ok(2));
        src.reset().unwrap();
        assert_eq!(src.read_char(), Ok(Some('x')));
        src.reset().unwrap();
        assert_eq!(read_all(&mut src), "xyz");
    }
}
