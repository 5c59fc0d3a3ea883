#![allow(dead_code)]

use textwire::{CharRead, CharSource, StrSource};

/// Hands out at most `max` characters per read.
pub struct Chunked {
    inner: StrSource,
    max: usize,
}

impl Chunked {
    pub fn new(text: &str, max: usize) -> Self {
        Self {
            inner: StrSource::new(text),
            max,
        }
    }
}

impl CharRead for Chunked {
    type Error = core::convert::Infallible;

    fn read_chars(&mut self, buf: &mut [char]) -> Result<usize, Self::Error> {
        let n = buf.len().min(self.max);
        self.inner.read_chars(&mut buf[..n])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Boom;

impl core::fmt::Display for Boom {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("boom")
    }
}

/// Fails the read calls listed in `fail_on` (1-based), otherwise behaves
/// like a `StrSource`.
pub struct Flaky {
    inner: StrSource,
    calls: usize,
    fail_on: Vec<usize>,
}

impl Flaky {
    pub fn new(text: &str, fail_on: &[usize]) -> Self {
        Self {
            inner: StrSource::new(text),
            calls: 0,
            fail_on: fail_on.to_vec(),
        }
    }
}

impl CharRead for Flaky {
    type Error = Boom;

    fn read_chars(&mut self, buf: &mut [char]) -> Result<usize, Self::Error> {
        self.calls += 1;
        if self.fail_on.contains(&self.calls) {
            return Err(Boom);
        }
        Ok(self.inner.read_chars(buf).unwrap_or_else(|never| match never {}))
    }

    fn skip(&mut self, n: usize) -> Result<usize, Self::Error> {
        Ok(self.inner.skip(n).unwrap_or_else(|never| match never {}))
    }
}

impl CharSource for Flaky {
    fn read_ahead_limit(&self) -> usize {
        usize::MAX
    }

    fn mark(&mut self, read_ahead_limit: usize) -> Result<(), Self::Error> {
        self.inner.mark(read_ahead_limit).unwrap_or_else(|never| match never {});
        Ok(())
    }

    fn reset(&mut self) -> Result<(), Self::Error> {
        self.inner.reset().unwrap_or_else(|never| match never {});
        Ok(())
    }
}

/// Claims to skip one character fewer than asked.
pub struct ShortSkipper(pub StrSource);

impl CharRead for ShortSkipper {
    type Error = core::convert::Infallible;

    fn read_chars(&mut self, buf: &mut [char]) -> Result<usize, Self::Error> {
        self.0.read_chars(buf)
    }

    fn skip(&mut self, n: usize) -> Result<usize, Self::Error> {
        self.0.skip(n.saturating_sub(1))
    }
}

impl CharSource for ShortSkipper {
    fn read_ahead_limit(&self) -> usize {
        self.0.read_ahead_limit()
    }

    fn mark(&mut self, read_ahead_limit: usize) -> Result<(), Self::Error> {
        self.0.mark(read_ahead_limit)
    }

    fn reset(&mut self) -> Result<(), Self::Error> {
        self.0.reset()
    }
}
