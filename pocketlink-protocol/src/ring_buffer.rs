//! Fixed-capacity byte FIFO between the UART receive path and the parser.
//!
//! Writes that do not fit are truncated without error; reads and peeks return
//! whatever is available. Nothing here blocks.

/// Circular byte queue with `N` bytes of inline storage.
///
/// `count` alone decides fullness and emptiness, so `head == tail` is never
/// ambiguous.
#[derive(Debug, Clone)]
pub struct RingBuffer<const N: usize> {
    buffer: [u8; N],
    /// Next write index
    head: usize,
    /// Next read index
    tail: usize,
    count: usize,
}

impl<const N: usize> Default for RingBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> RingBuffer<N> {
    /// Create an empty buffer
    pub const fn new() -> Self {
        Self {
            buffer: [0; N],
            head: 0,
            tail: 0,
            count: 0,
        }
    }

    /// Total capacity in bytes
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Bytes currently queued
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn is_full(&self) -> bool {
        self.count == N
    }

    /// Bytes that can still be written
    pub fn free_space(&self) -> usize {
        N - self.count
    }

    /// Drop everything queued
    pub fn clear(&mut self) {
        self.head = 0;
        self.tail = 0;
        self.count = 0;
    }

    /// Append as much of `data` as fits.
    ///
    /// Returns the number of bytes stored; the rest is discarded.
    pub fn write(&mut self, data: &[u8]) -> usize {
        let len = data.len().min(self.free_space());
        for &byte in &data[..len] {
            self.buffer[self.head] = byte;
            self.head = (self.head + 1) % N;
        }
        self.count += len;
        len
    }

    /// Append a single byte. Returns `false` if the buffer was full.
    pub fn push(&mut self, byte: u8) -> bool {
        self.write(&[byte]) == 1
    }

    /// Move up to `out.len()` bytes out of the buffer.
    pub fn read(&mut self, out: &mut [u8]) -> usize {
        let len = out.len().min(self.count);
        for slot in &mut out[..len] {
            *slot = self.buffer[self.tail];
            self.tail = (self.tail + 1) % N;
        }
        self.count -= len;
        len
    }

    /// Remove the oldest byte
    pub fn pop(&mut self) -> Option<u8> {
        let mut byte = [0u8; 1];
        match self.read(&mut byte) {
            0 => None,
            _ => Some(byte[0]),
        }
    }

    /// Copy up to `out.len()` bytes without consuming them.
    pub fn peek(&self, out: &mut [u8]) -> usize {
        let len = out.len().min(self.count);
        let mut index = self.tail;
        for slot in &mut out[..len] {
            *slot = self.buffer[index];
            index = (index + 1) % N;
        }
        len
    }
}

/// Anything the frame parser can pull bytes from, oldest first.
pub trait ByteQueue {
    /// Remove and return the oldest queued byte
    fn pop(&mut self) -> Option<u8>;
}

impl<const N: usize> ByteQueue for RingBuffer<N> {
    fn pop(&mut self) -> Option<u8> {
        RingBuffer::pop(self)
    }
}
