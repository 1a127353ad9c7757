//! Link layer: parser and dispatch registry wired together.
//!
//! ```text
//! UART RX ─► RingBuffer ─► FrameParser ─► CommandRegistry ─► handler
//!                                                              │
//! UART TX ◄──────────────────── FrameSink ◄────────────────────┘
//! ```
//!
//! The receive queue and the transmit sink are owned by the caller and passed
//! into [`LinkLayer::process`], so several independent links can coexist.

use crate::frame::{FrameParser, ParseState, DEFAULT_CAPACITY};
use crate::registry::{CommandHandler, CommandRegistry, Dispatch, RegistryError, MAX_COMMANDS};
use crate::ring_buffer::ByteQueue;
use crate::transmit::{FrameSink, SendError};

/// What one [`LinkLayer::process`] call did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ProcessReport {
    /// Bytes drained from the receive queue
    pub bytes: usize,
    /// Frames routed to a registered handler
    pub handled: usize,
    /// Frames answered with an unknown-command reply
    pub unknown: usize,
    /// Frames dropped at an out-of-range length byte
    pub length_errors: usize,
    /// Frames dropped for a bad CRC
    pub crc_errors: usize,
}

impl ProcessReport {
    /// Frames silently discarded
    pub fn dropped(&self) -> usize {
        self.length_errors + self.crc_errors
    }
}

/// Frame parser plus command registry
///
/// `N` is the receive capacity (scratch frame buffer), `M` the number of
/// registry slots.
pub struct LinkLayer<'a, const N: usize = DEFAULT_CAPACITY, const M: usize = MAX_COMMANDS> {
    parser: FrameParser<N>,
    registry: CommandRegistry<'a, M>,
}

impl<const N: usize, const M: usize> Default for LinkLayer<'_, N, M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, const N: usize, const M: usize> LinkLayer<'a, N, M> {
    pub const fn new() -> Self {
        Self {
            parser: FrameParser::new(),
            registry: CommandRegistry::new(),
        }
    }

    /// Register a handler; see [`CommandRegistry::register`]
    pub fn register(
        &mut self,
        command: u8,
        handler: &'a mut dyn CommandHandler,
    ) -> Result<(), RegistryError> {
        self.registry.register(command, handler)
    }

    pub fn registry(&self) -> &CommandRegistry<'a, M> {
        &self.registry
    }

    pub fn parser_state(&self) -> ParseState {
        self.parser.state()
    }

    /// Force the parser back to header search, dropping any partial frame
    pub fn resync(&mut self) {
        self.parser.reset();
    }

    /// Drain `rx` completely and dispatch every valid frame in arrival order.
    ///
    /// Meant to be called once per main-loop iteration. A slow handler delays
    /// the rest of the drain.
    pub fn process<Q, S>(&mut self, rx: &mut Q, tx: &mut S) -> ProcessReport
    where
        Q: ByteQueue + ?Sized,
        S: FrameSink,
    {
        let mut handled = 0;
        let mut unknown = 0;
        let registry = &mut self.registry;

        let drained = self.parser.drain(rx, |command, data| {
            match registry.dispatch(command, data, &mut *tx) {
                Dispatch::Handled => handled += 1,
                Dispatch::Unknown => unknown += 1,
            }
        });

        ProcessReport {
            bytes: drained.bytes,
            handled,
            unknown,
            length_errors: drained.length_errors,
            crc_errors: drained.crc_errors,
        }
    }

    /// Send a frame on `tx`
    pub fn send_frame<S: FrameSink>(tx: &mut S, command: u8, data: &[u8]) -> Result<(), SendError> {
        tx.send_frame(command, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{CMD_GET_STATUS, CMD_UNKNOWN};
    use crate::frame::{encode_frame, MAX_FRAME_SIZE, MAX_PAYLOAD_SIZE};
    use crate::ring_buffer::RingBuffer;
    use crate::shared::SharedRingBuffer;
    use std::vec::Vec;

    /// Records every frame and also keeps the raw bytes that would hit the wire.
    #[derive(Default)]
    struct Wire {
        frames: Vec<(u8, Vec<u8>)>,
        bytes: Vec<u8>,
    }

    impl FrameSink for Wire {
        fn send_frame(&mut self, command: u8, data: &[u8]) -> Result<(), SendError> {
            let mut buf = [0u8; MAX_FRAME_SIZE];
            let len = encode_frame(command, data, &mut buf)?;
            self.bytes.extend_from_slice(&buf[..len]);
            self.frames.push((command, data.to_vec()));
            Ok(())
        }
    }

    fn frame_bytes(command: u8, data: &[u8]) -> Vec<u8> {
        let mut wire = Wire::default();
        wire.send_frame(command, data).unwrap();
        wire.bytes
    }

    #[test]
    fn test_round_trip_dispatch() {
        let mut seen = Vec::new();
        let mut handler = |data: &[u8], _: &mut dyn FrameSink| seen.push(data.to_vec());

        let mut rx = RingBuffer::<256>::new();
        let mut tx = Wire::default();
        let report = {
            let mut link = LinkLayer::<256, 4>::new();
            link.register(0x10, &mut handler).unwrap();
            rx.write(&frame_bytes(0x10, &[1, 2, 3, 4]));
            link.process(&mut rx, &mut tx)
        };

        assert_eq!(seen, [std::vec![1, 2, 3, 4]]);
        assert_eq!(report.handled, 1);
        assert_eq!(report.dropped(), 0);
        assert!(tx.frames.is_empty());
    }

    #[test]
    fn test_handler_reply_is_decodable_by_peer() {
        let mut status = |_: &[u8], tx: &mut dyn FrameSink| {
            let _ = tx.send_frame(CMD_GET_STATUS, b"STATUS: System OK");
        };
        let mut device_rx = RingBuffer::<256>::new();
        let mut device_tx = Wire::default();
        let mut device = LinkLayer::<256, 4>::new();
        device.register(CMD_GET_STATUS, &mut status).unwrap();

        device_rx.write(&frame_bytes(CMD_GET_STATUS, &[]));
        device.process(&mut device_rx, &mut device_tx);

        // Feed the device's output into a second, independent link
        let mut reply = Vec::new();
        let mut catch_all = |data: &[u8], _: &mut dyn FrameSink| reply.extend_from_slice(data);
        let mut host_rx = RingBuffer::<256>::new();
        let mut host_tx = Wire::default();
        {
            let mut host = LinkLayer::<256, 4>::new();
            host.register(CMD_GET_STATUS, &mut catch_all).unwrap();
            host_rx.write(&device_tx.bytes);
            let report = host.process(&mut host_rx, &mut host_tx);
            assert_eq!(report.handled, 1);
        }
        assert_eq!(reply, b"STATUS: System OK");
    }

    #[test]
    fn test_unknown_command_round_trip() {
        let mut rx = RingBuffer::<256>::new();
        let mut tx = Wire::default();
        let mut link = LinkLayer::<256, 4>::new();

        rx.write(&frame_bytes(0x42, &[]));
        let report = link.process(&mut rx, &mut tx);

        assert_eq!(report.unknown, 1);
        assert_eq!(tx.frames, [(CMD_UNKNOWN, std::vec![0x42])]);
    }

    #[test]
    fn test_byte_at_a_time_across_calls() {
        let mut count = 0;
        let mut handler = |_: &[u8], _: &mut dyn FrameSink| count += 1;
        let mut rx = RingBuffer::<8>::new();
        let mut tx = Wire::default();
        {
            let mut link = LinkLayer::<256, 4>::new();
            link.register(0x01, &mut handler).unwrap();
            for byte in frame_bytes(0x01, &[5, 6]) {
                assert!(rx.push(byte));
                link.process(&mut rx, &mut tx);
            }
            assert_eq!(link.parser_state(), ParseState::AwaitingHeader);
        }
        assert_eq!(count, 1);
    }

    #[test]
    fn test_corrupt_frame_then_valid_frame() {
        let mut count = 0;
        let mut handler = |_: &[u8], _: &mut dyn FrameSink| count += 1;
        let mut rx = RingBuffer::<256>::new();
        let mut tx = Wire::default();
        let report = {
            let mut link = LinkLayer::<256, 4>::new();
            link.register(0x01, &mut handler).unwrap();

            let mut bad = frame_bytes(0x01, &[1, 2, 3]);
            bad[5] ^= 0x80;
            rx.write(&bad);
            rx.write(&frame_bytes(0x01, &[1, 2, 3]));
            link.process(&mut rx, &mut tx)
        };
        assert_eq!(count, 1);
        assert_eq!(report.crc_errors, 1);
        assert!(tx.frames.is_empty());
    }

    #[test]
    fn test_shared_queue_source() {
        let rx = SharedRingBuffer::<64>::new();
        for byte in frame_bytes(0x77, &[]) {
            rx.push(byte);
        }

        let mut tx = Wire::default();
        let mut link = LinkLayer::<64, 2>::new();
        let report = link.process(&mut &rx, &mut tx);
        assert_eq!(report.unknown, 1);
        assert!(rx.is_empty());
    }

    #[test]
    fn test_producer_keeps_queuing_during_slow_handler() {
        use std::time::{Duration, Instant};

        let rx = SharedRingBuffer::<256>::new();
        let mut seen = Vec::new();
        let mut slow = |data: &[u8], _: &mut dyn FrameSink| {
            std::thread::sleep(Duration::from_millis(2));
            seen.push(data[0]);
        };
        let mut tx = Wire::default();

        std::thread::scope(|s| {
            s.spawn(|| {
                for i in 0..10u8 {
                    for byte in frame_bytes(0x05, &[i]) {
                        assert!(rx.push(byte));
                    }
                    std::thread::sleep(Duration::from_micros(500));
                }
            });

            let mut link = LinkLayer::<256, 2>::new();
            link.register(0x05, &mut slow).unwrap();
            let deadline = Instant::now() + Duration::from_secs(5);
            let mut handled = 0;
            while handled < 10 && Instant::now() < deadline {
                let report = link.process(&mut &rx, &mut tx);
                assert_eq!(report.dropped(), 0);
                handled += report.handled;
            }
        });

        assert_eq!(seen, (0..10).collect::<Vec<u8>>());
        assert!(tx.frames.is_empty());
    }

    #[test]
    fn test_resync_clears_partial_frame() {
        let mut rx = RingBuffer::<64>::new();
        let mut tx = Wire::default();
        let mut link = LinkLayer::<64, 2>::new();

        rx.write(&frame_bytes(0x01, &[1, 2, 3])[..4]);
        link.process(&mut rx, &mut tx);
        assert_eq!(link.parser_state(), ParseState::AwaitingData);

        link.resync();
        assert_eq!(link.parser_state(), ParseState::AwaitingHeader);
    }

    #[test]
    fn test_send_frame_rejects_oversized_payload() {
        let mut tx = Wire::default();
        let data = [0u8; MAX_PAYLOAD_SIZE + 1];
        assert_eq!(
            LinkLayer::<256, 4>::send_frame(&mut tx, 0x01, &data),
            Err(SendError::PayloadTooLarge)
        );
        assert!(tx.bytes.is_empty());
    }
}
