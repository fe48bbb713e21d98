//! Pull-based character sources.
//!
//! [`CharRead`] is the character counterpart of [`std::io::Read`]: a consumer
//! hands in a destination slice and gets back how many characters were
//! written, with `0` meaning the source is exhausted. Streaming char filters
//! both consume and implement it, so they stack.

use std::io::Read;

use crate::error::{CjkAnalysisError, Result};

/// A source of characters read in bounded chunks.
pub trait CharRead {
    /// Fill a prefix of `buf` and return its length; `0` signals end of input.
    ///
    /// Blocks until at least one character, end of input or an error is
    /// available. An empty `buf` is an `InvalidArgument` error, since `0` is
    /// reserved for end of input.
    fn read_chars(&mut self, buf: &mut [char]) -> Result<usize>;
}

impl<R: CharRead + ?Sized> CharRead for &mut R {
    fn read_chars(&mut self, buf: &mut [char]) -> Result<usize> {
        (**self).read_chars(buf)
    }
}

impl<R: CharRead + ?Sized> CharRead for Box<R> {
    fn read_chars(&mut self, buf: &mut [char]) -> Result<usize> {
        (**self).read_chars(buf)
    }
}

/// Drain a character source into a `String`.
pub fn read_to_string<R: CharRead>(reader: &mut R) -> Result<String> {
    let mut output = String::new();
    let mut buf = ['\0'; 256];
    loop {
        let n = reader.read_chars(&mut buf)?;
        if n == 0 {
            return Ok(output);
        }
        output.extend(&buf[..n]);
    }
}

pub(crate) fn check_destination(buf: &[char]) -> Result<()> {
    if buf.is_empty() {
        return Err(CjkAnalysisError::invalid_argument(
            "destination buffer must hold at least one character",
        ));
    }
    Ok(())
}

/// An in-memory character source.
///
/// `with_max_chunk` caps how many characters a single read returns, which is
/// how tests place chunk boundaries at arbitrary points.
#[derive(Debug, Clone)]
pub struct StrReader {
    chars: Vec<char>,
    pos: usize,
    max_chunk: usize,
}

impl StrReader {
    pub fn new(text: &str) -> Self {
        StrReader {
            chars: text.chars().collect(),
            pos: 0,
            max_chunk: usize::MAX,
        }
    }

    /// Limit every read to at most `max_chunk` characters (minimum 1).
    pub fn with_max_chunk(mut self, max_chunk: usize) -> Self {
        self.max_chunk = max_chunk.max(1);
        self
    }

    /// Characters not yet read.
    pub fn remaining(&self) -> usize {
        self.chars.len() - self.pos
    }
}

impl CharRead for StrReader {
    fn read_chars(&mut self, buf: &mut [char]) -> Result<usize> {
        check_destination(buf)?;
        let n = buf.len().min(self.max_chunk).min(self.remaining());
        buf[..n].copy_from_slice(&self.chars[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}

/// Decodes UTF-8 from a byte reader, one bounded chunk at a time.
///
/// Multi-byte sequences split across reads are carried over to the next read.
/// Invalid or truncated UTF-8 is reported as an I/O error of kind
/// `InvalidData`.
#[derive(Debug)]
pub struct Utf8Reader<R> {
    inner: R,
    bytes: Vec<u8>,
    /// Start of undecoded bytes in `bytes`.
    start: usize,
    eof: bool,
}

const UTF8_READ_SIZE: usize = 4096;

impl<R: Read> Utf8Reader<R> {
    pub fn new(inner: R) -> Self {
        Utf8Reader {
            inner,
            bytes: Vec::with_capacity(UTF8_READ_SIZE),
            start: 0,
            eof: false,
        }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    fn fill(&mut self) -> Result<()> {
        self.bytes.drain(..self.start);
        self.start = 0;

        let len = self.bytes.len();
        self.bytes.resize(len + UTF8_READ_SIZE, 0);
        let read = loop {
            match self.inner.read(&mut self.bytes[len..]) {
                Ok(n) => break n,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    self.bytes.truncate(len);
                    return Err(e.into());
                }
            }
        };
        self.bytes.truncate(len + read);
        if read == 0 {
            self.eof = true;
        }
        Ok(())
    }
}

impl<R: Read> CharRead for Utf8Reader<R> {
    fn read_chars(&mut self, buf: &mut [char]) -> Result<usize> {
        check_destination(buf)?;

        loop {
            let pending = &self.bytes[self.start..];
            let (valid, error) = match std::str::from_utf8(pending) {
                Ok(s) => (s, None),
                Err(e) => (
                    // Safe split: everything before valid_up_to() is UTF-8.
                    std::str::from_utf8(&pending[..e.valid_up_to()]).unwrap_or_default(),
                    Some(e),
                ),
            };

            if !valid.is_empty() {
                let mut n = 0;
                let mut used = 0;
                for c in valid.chars().take(buf.len()) {
                    buf[n] = c;
                    n += 1;
                    used += c.len_utf8();
                }
                self.start += used;
                return Ok(n);
            }

            if let Some(e) = error {
                // A definite error, or a truncated sequence at end of input.
                if e.error_len().is_some() || self.eof {
                    return Err(CjkAnalysisError::from(std::io::Error::new(
                        std::io::ErrorKind::InvalidData,
                        format!("invalid UTF-8 in character stream: {e}"),
                    )));
                }
            }

            if self.eof {
                return Ok(0);
            }
            self.fill()?;
        }
    }
}
