//! Byte stream to character stream decoding.

use alloc::{string::String, vec, vec::Vec};
use std::io::{self, ErrorKind, Read};

use encoding_rs::{Decoder, Encoding, UTF_8};

use crate::CharRead;

const READ_CHUNK: usize = 8 * 1024;

/// [`CharRead`] over a byte reader, decoding with any WHATWG encoding.
///
/// Malformed byte sequences become U+FFFD. A byte order mark at the start of
/// the stream overrides the configured encoding, as `encoding_rs` does by
/// default. Wrap in a [`MarkBuffer`](crate::MarkBuffer) to use with
/// [`LineReader`](crate::LineReader).
pub struct DecodingReader<R> {
    inner: R,
    decoder: Decoder,
    bytes: Vec<u8>,
    text: String,
    text_pos: usize,
    finished: bool,
}

impl<R: Read> DecodingReader<R> {
    /// Decode `inner` as UTF-8.
    pub fn new(inner: R) -> Self {
        Self::with_encoding(inner, UTF_8)
    }

    /// Decode `inner` as `encoding`, unless a byte order mark says otherwise.
    pub fn with_encoding(inner: R, encoding: &'static Encoding) -> Self {
        Self {
            inner,
            decoder: encoding.new_decoder(),
            bytes: vec![0; READ_CHUNK],
            text: String::new(),
            text_pos: 0,
            finished: false,
        }
    }

    /// The byte reader.
    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    /// Unwrap the byte reader. Decoded characters not yet read are lost.
    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Decode the next chunk into `text`. Returns `false` once the stream is
    /// exhausted and nothing more was produced.
    fn fill(&mut self) -> io::Result<bool> {
        while !self.finished {
            let n = match self.inner.read(&mut self.bytes) {
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            let last = n == 0;

            self.text.clear();
            self.text_pos = 0;
            let needed = self
                .decoder
                .max_utf8_buffer_length(n)
                .ok_or_else(|| io::Error::new(ErrorKind::OutOfMemory, "decoded chunk too large"))?;
            self.text.reserve(needed);
            let (_result, _read, _replaced) =
                self.decoder
                    .decode_to_string(&self.bytes[..n], &mut self.text, last);
            self.finished = last;

            if !self.text.is_empty() {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

impl<R: Read> CharRead for DecodingReader<R> {
    type Error = io::Error;

    fn read_chars(&mut self, buf: &mut [char]) -> Result<usize, Self::Error> {
        if buf.is_empty() {
            return Ok(0);
        }
        if self.text_pos >= self.text.len() && !self.fill()? {
            return Ok(0);
        }

        let mut n = 0;
        let mut consumed = 0;
        for (slot, ch) in buf.iter_mut().zip(self.text[self.text_pos..].chars()) {
            *slot = ch;
            n += 1;
            consumed += ch.len_utf8();
        }
        self.text_pos += consumed;
        Ok(n)
    }
}

impl<R> core::fmt::Debug for DecodingReader<R> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DecodingReader")
            .field("encoding", &self.decoder.encoding().name())
            .field("pending", &(self.text.len() - self.text_pos))
            .field("finished", &self.finished)
            .finish_non_exhaustive()
    }
}
