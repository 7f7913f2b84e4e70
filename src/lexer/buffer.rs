//! Staging buffer used while a token is being scanned

use std::borrow::Cow;

/// Initial capacity of a fresh staging buffer
pub const INITIAL_CAPACITY: usize = 8;

/// Growable byte accumulator, reset (not reallocated) at the start of each scan.
#[derive(Debug, Clone)]
pub struct StagingBuffer {
    bytes: Vec<u8>,
}

impl Default for StagingBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl StagingBuffer {
    pub fn new() -> Self {
        Self {
            bytes: Vec::with_capacity(INITIAL_CAPACITY),
        }
    }

    pub fn reset(&mut self) {
        self.bytes.clear();
    }

    pub fn push(&mut self, byte: u8) {
        self.bytes.push(byte);
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Current content as text; invalid UTF-8 is replaced.
    pub fn as_str(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.bytes)
    }

    /// Owned copy of the content, leaving the buffer untouched
    pub fn to_text(&self) -> String {
        self.as_str().into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_keeps_allocation() {
        let mut buf = StagingBuffer::new();
        for b in b"a fairly long identifier" {
            buf.push(*b);
        }
        let capacity = buf.bytes.capacity();

        buf.reset();
        assert!(buf.is_empty());
        assert_eq!(buf.bytes.capacity(), capacity);
    }

    #[test]
    fn test_lossy_text() {
        let mut buf = StagingBuffer::new();
        buf.push(b'o');
        buf.push(b'k');
        assert_eq!(buf.to_text(), "ok");
        assert_eq!(buf.len(), 2);

        buf.push(0xff);
        assert_eq!(buf.as_str(), "ok\u{fffd}");
    }
}
