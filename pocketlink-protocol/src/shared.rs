//! Ring buffer shared between an interrupt-side producer and the main loop.
//!
//! Every access takes a critical section, so the producer's `push` and the
//! consumer's `pop` never interleave with a half-updated `count`. This is the
//! single-producer/single-consumer discipline needed once the producer can
//! preempt the parser.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;

use crate::ring_buffer::{ByteQueue, RingBuffer};

/// Interrupt-safe wrapper around [`RingBuffer`], usable as a `static`.
pub struct SharedRingBuffer<const N: usize> {
    inner: Mutex<CriticalSectionRawMutex, RefCell<RingBuffer<N>>>,
}

impl<const N: usize> Default for SharedRingBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> SharedRingBuffer<N> {
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(RingBuffer::new())),
        }
    }

    /// Producer side: queue one received byte.
    ///
    /// Returns `false` when the byte was dropped because the buffer is full.
    pub fn push(&self, byte: u8) -> bool {
        self.inner.lock(|rb| rb.borrow_mut().push(byte))
    }

    /// Producer side: queue a burst, truncating what does not fit.
    pub fn write(&self, data: &[u8]) -> usize {
        self.inner.lock(|rb| rb.borrow_mut().write(data))
    }

    /// Consumer side: take the oldest byte.
    pub fn pop(&self) -> Option<u8> {
        self.inner.lock(|rb| rb.borrow_mut().pop())
    }

    pub fn len(&self) -> usize {
        self.inner.lock(|rb| rb.borrow().len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn free_space(&self) -> usize {
        self.inner.lock(|rb| rb.borrow().free_space())
    }
}

impl<const N: usize> ByteQueue for &SharedRingBuffer<N> {
    fn pop(&mut self) -> Option<u8> {
        SharedRingBuffer::pop(*self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static RX: SharedRingBuffer<8> = SharedRingBuffer::new();

    #[test]
    fn test_static_push_pop() {
        assert!(RX.push(0xAA));
        assert!(RX.push(0x04));
        assert_eq!(RX.len(), 2);
        assert_eq!(RX.pop(), Some(0xAA));
        assert_eq!(RX.pop(), Some(0x04));
        assert_eq!(RX.pop(), None);
    }

    #[test]
    fn test_overflow_is_dropped() {
        let rb = SharedRingBuffer::<2>::new();
        assert!(rb.push(1));
        assert!(rb.push(2));
        assert!(!rb.push(3));
        assert_eq!(rb.free_space(), 0);
        assert_eq!(rb.write(&[4, 5]), 0);
    }

    #[test]
    fn test_threaded_producer_keeps_order() {
        let rb = SharedRingBuffer::<16>::new();
        let mut received = std::vec::Vec::new();

        std::thread::scope(|s| {
            s.spawn(|| {
                for byte in 0..=200u8 {
                    while !rb.push(byte) {
                        std::thread::yield_now();
                    }
                }
            });

            let mut queue = &rb;
            while received.len() < 201 {
                match ByteQueue::pop(&mut queue) {
                    Some(b) => received.push(b),
                    None => std::thread::yield_now(),
                }
            }
        });

        let expected: std::vec::Vec<u8> = (0..=200u8).collect();
        assert_eq!(received, expected);
        assert!(rb.is_empty());
    }
}
