//! Frame encoding and the receive-side parser state machine.
//!
//! Frame format:
//! - HEADER (1 byte): 0xAA synchronization byte
//! - LENGTH (1 byte): bytes that follow, from SEQUENCE through CRC inclusive
//! - SEQUENCE (1 byte): reserved, always 0 on transmit
//! - COMMAND (1 byte): command identifier
//! - PAYLOAD (LENGTH - 4 bytes): command-specific data
//! - CRC (2 bytes, little-endian): CRC-16/CCITT-FALSE of every preceding byte

use heapless::Vec;

use crate::crc::crc16;
use crate::ring_buffer::ByteQueue;

/// Frame synchronization byte
pub const FRAME_HEADER: u8 = 0xAA;

/// Maximum payload size in bytes
pub const MAX_PAYLOAD_SIZE: usize = 250;

/// Header, length, sequence, command and the two CRC bytes
pub const FRAME_OVERHEAD: usize = 6;

/// Maximum complete frame size
pub const MAX_FRAME_SIZE: usize = FRAME_OVERHEAD + MAX_PAYLOAD_SIZE;

/// Smallest legal LENGTH value: sequence + command + CRC
pub const MIN_LENGTH: u8 = 4;

/// Default receive capacity, matching the largest frame
pub const DEFAULT_CAPACITY: usize = 256;

/// Errors that can occur during frame parsing or encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Payload exceeds maximum allowed size
    PayloadTooLarge,
    /// Buffer too small for encoding
    BufferTooSmall,
    /// Declared LENGTH outside `4..=capacity-2`
    InvalidLength(u8),
    /// CRC over the received bytes did not match the trailing CRC
    CrcMismatch { expected: u16, received: u16 },
}

/// Write a complete frame for `command` carrying `data` into `buffer`.
///
/// Returns the number of bytes written.
pub fn encode_frame(command: u8, data: &[u8], buffer: &mut [u8]) -> Result<usize, FrameError> {
    if data.len() > MAX_PAYLOAD_SIZE {
        return Err(FrameError::PayloadTooLarge);
    }
    let frame_len = FRAME_OVERHEAD + data.len();
    if buffer.len() < frame_len {
        return Err(FrameError::BufferTooSmall);
    }

    let body = frame_len - 2;
    buffer[0] = FRAME_HEADER;
    buffer[1] = (data.len() + MIN_LENGTH as usize) as u8;
    buffer[2] = 0; // sequence
    buffer[3] = command;
    buffer[4..body].copy_from_slice(data);

    let crc = crc16(&buffer[..body]);
    buffer[body..frame_len].copy_from_slice(&crc.to_le_bytes());

    Ok(frame_len)
}

/// An owned frame
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Frame {
    /// Command identifier
    pub command: u8,
    /// Payload data
    pub payload: Vec<u8, MAX_PAYLOAD_SIZE>,
}

impl Frame {
    /// Create a new frame with the given command and payload
    pub fn new(command: u8, payload: &[u8]) -> Result<Self, FrameError> {
        let payload = Vec::from_slice(payload).map_err(|_| FrameError::PayloadTooLarge)?;
        Ok(Self { command, payload })
    }

    /// Create a frame with no payload
    pub fn empty(command: u8) -> Self {
        Self {
            command,
            payload: Vec::new(),
        }
    }

    /// Size of this frame on the wire
    pub fn encoded_len(&self) -> usize {
        FRAME_OVERHEAD + self.payload.len()
    }

    /// Encode this frame into a byte buffer
    ///
    /// Returns the number of bytes written
    pub fn encode(&self, buffer: &mut [u8]) -> Result<usize, FrameError> {
        encode_frame(self.command, &self.payload, buffer)
    }

    /// Encode this frame into a heapless Vec
    pub fn encode_to_vec(&self) -> Result<Vec<u8, MAX_FRAME_SIZE>, FrameError> {
        let mut buffer = [0u8; MAX_FRAME_SIZE];
        let len = self.encode(&mut buffer)?;
        Vec::from_slice(&buffer[..len]).map_err(|_| FrameError::BufferTooSmall)
    }
}

/// A validated frame borrowed from the parser's scratch buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameView<'a> {
    pub sequence: u8,
    pub command: u8,
    pub payload: &'a [u8],
}

impl FrameView<'_> {
    /// Copy into an owned [`Frame`]
    pub fn to_frame(&self) -> Result<Frame, FrameError> {
        Frame::new(self.command, self.payload)
    }
}

/// Parser states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseState {
    /// Discarding bytes until HEADER
    AwaitingHeader,
    /// Got HEADER, next byte is LENGTH
    AwaitingLength,
    /// Collecting sequence, command, payload and CRC
    AwaitingData,
}

/// What a call to [`FrameParser::drain`] did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DrainReport {
    /// Bytes pulled from the queue
    pub bytes: usize,
    /// Frames that passed the CRC check
    pub frames: usize,
    /// Frames abandoned at an out-of-range LENGTH
    pub length_errors: usize,
    /// Frames dropped for a bad CRC
    pub crc_errors: usize,
}

/// Receive-side state machine with an `N`-byte scratch frame buffer.
///
/// Always returns to [`ParseState::AwaitingHeader`] after a frame attempt,
/// whether it succeeded or not. There is no timeout: a frame that stops
/// arriving halfway leaves the parser in [`ParseState::AwaitingData`] until
/// more bytes come in or [`FrameParser::reset`] is called.
///
/// `N` must hold at least an empty-payload frame:
///
/// ```compile_fail
/// let _parser = pocketlink_protocol::FrameParser::<5>::new();
/// ```
#[derive(Debug, Clone)]
pub struct FrameParser<const N: usize = DEFAULT_CAPACITY> {
    state: ParseState,
    buffer: [u8; N],
    received: usize,
    length: u8,
}

impl<const N: usize> Default for FrameParser<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> FrameParser<N> {
    const HOLDS_MIN_FRAME: () = assert!(
        N >= FRAME_OVERHEAD,
        "FrameParser capacity must hold an empty-payload frame"
    );

    /// Create a new frame parser
    pub const fn new() -> Self {
        let () = Self::HOLDS_MIN_FRAME;
        Self {
            state: ParseState::AwaitingHeader,
            buffer: [0; N],
            received: 0,
            length: 0,
        }
    }

    /// Largest LENGTH value the scratch buffer can hold
    pub const fn max_length() -> u8 {
        let max = N.saturating_sub(2);
        if max > u8::MAX as usize {
            u8::MAX
        } else {
            max as u8
        }
    }

    pub fn state(&self) -> ParseState {
        self.state
    }

    /// Abandon any partial frame and hunt for the next header
    pub fn reset(&mut self) {
        self.state = ParseState::AwaitingHeader;
        self.received = 0;
        self.length = 0;
    }

    /// Feed a single byte to the parser
    ///
    /// Returns `Ok(Some(frame))` when a complete valid frame is parsed,
    /// `Ok(None)` when more bytes are needed, or `Err` when the frame in
    /// progress was discarded.
    pub fn feed(&mut self, byte: u8) -> Result<Option<FrameView<'_>>, FrameError> {
        match self.state {
            ParseState::AwaitingHeader => {
                // Anything but a header is line noise
                if byte == FRAME_HEADER {
                    self.buffer[0] = byte;
                    self.received = 1;
                    self.state = ParseState::AwaitingLength;
                }
                Ok(None)
            }
            ParseState::AwaitingLength => {
                if byte < MIN_LENGTH || byte > Self::max_length() {
                    self.reset();
                    return Err(FrameError::InvalidLength(byte));
                }
                self.buffer[1] = byte;
                self.received = 2;
                self.length = byte;
                self.state = ParseState::AwaitingData;
                Ok(None)
            }
            ParseState::AwaitingData => {
                self.buffer[self.received] = byte;
                self.received += 1;
                if self.received < self.length as usize + 2 {
                    return Ok(None);
                }

                self.state = ParseState::AwaitingHeader;
                let body = self.received - 2;
                let received = u16::from_le_bytes([self.buffer[body], self.buffer[body + 1]]);
                let expected = crc16(&self.buffer[..body]);
                if received != expected {
                    return Err(FrameError::CrcMismatch { expected, received });
                }

                Ok(Some(FrameView {
                    sequence: self.buffer[2],
                    command: self.buffer[3],
                    payload: &self.buffer[4..body],
                }))
            }
        }
    }

    /// Consume every byte currently in `queue`, calling `on_frame` with the
    /// command and payload of each valid frame in arrival order.
    ///
    /// Malformed and corrupt frames are dropped and only counted.
    pub fn drain<Q, F>(&mut self, queue: &mut Q, mut on_frame: F) -> DrainReport
    where
        Q: ByteQueue + ?Sized,
        F: FnMut(u8, &[u8]),
    {
        let mut report = DrainReport::default();
        while let Some(byte) = queue.pop() {
            report.bytes += 1;
            match self.feed(byte) {
                Ok(Some(frame)) => {
                    report.frames += 1;
                    on_frame(frame.command, frame.payload);
                }
                Ok(None) => {}
                Err(FrameError::InvalidLength(_)) => report.length_errors += 1,
                Err(FrameError::CrcMismatch { .. }) => report.crc_errors += 1,
                Err(_) => {}
            }
        }
        report
    }
}
