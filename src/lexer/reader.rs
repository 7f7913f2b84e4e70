//! Pull-based byte source for the lexer.
//!
//! A [`Reader`] asks its [`Pull`] source for one block of bytes at a time and
//! hands them out one byte per call. Once the source reports no more data the
//! reader stays at end of stream for good.

use std::io::Read;

/// Block size used by [`IoSource`]
pub const IO_CHUNK_SIZE: usize = 4096;

/// A producer of byte blocks.
///
/// Returning `None` or an empty block signals permanent end of stream.
pub trait Pull {
    fn pull(&mut self) -> Option<Vec<u8>>;
}

impl<F> Pull for F
where
    F: FnMut() -> Option<Vec<u8>>,
{
    fn pull(&mut self) -> Option<Vec<u8>> {
        self()
    }
}

/// Source backed by one in-memory string, returned whole on the first pull.
#[derive(Debug, Clone)]
pub struct StringSource {
    data: Option<String>,
}

impl StringSource {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            data: Some(source.into()),
        }
    }
}

impl Pull for StringSource {
    fn pull(&mut self) -> Option<Vec<u8>> {
        self.data.take().map(String::into_bytes)
    }
}

/// Source reading fixed-size chunks from any [`Read`] implementation.
pub struct IoSource<R> {
    inner: R,
}

impl<R: Read> IoSource<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }
}

impl<R: Read> Pull for IoSource<R> {
    fn pull(&mut self) -> Option<Vec<u8>> {
        let mut chunk = vec![0; IO_CHUNK_SIZE];
        loop {
            match self.inner.read(&mut chunk) {
                Ok(read) => {
                    chunk.truncate(read);
                    return Some(chunk);
                }
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    log::warn!("read failed, treating as end of stream: {}", e);
                    return None;
                }
            }
        }
    }
}

/// Byte-at-a-time view over a [`Pull`] source.
pub struct Reader<S> {
    source: S,
    block: Vec<u8>,
    pos: usize,
    exhausted: bool,
}

impl<S: Pull> Reader<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            block: Vec::new(),
            pos: 0,
            exhausted: false,
        }
    }

    /// Next byte, or `None` at end of stream.
    pub fn get_char(&mut self) -> Option<u8> {
        if self.pos >= self.block.len() && !self.fill() {
            return None;
        }

        let byte = self.block[self.pos];
        self.pos += 1;
        Some(byte)
    }

    fn fill(&mut self) -> bool {
        if self.exhausted {
            return false;
        }

        match self.source.pull() {
            Some(block) if !block.is_empty() => {
                self.block = block;
                self.pos = 0;
                true
            }
            _ => {
                self.exhausted = true;
                self.block.clear();
                self.pos = 0;
                false
            }
        }
    }
}

impl Reader<StringSource> {
    /// Reader over an in-memory string
    pub fn from_string(source: impl Into<String>) -> Self {
        Self::new(StringSource::new(source))
    }
}

impl<R: Read> Reader<IoSource<R>> {
    /// Reader over any [`Read`] implementation (files, stdin, ...)
    pub fn from_read(inner: R) -> Self {
        Self::new(IoSource::new(inner))
    }
}
