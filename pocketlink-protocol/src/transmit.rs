//! Outbound side of the link: turning `(command, data)` into bytes on a UART.

use pocketlink_hal::UartTx;

use crate::frame::{encode_frame, FrameError, MAX_FRAME_SIZE, MAX_PAYLOAD_SIZE};

/// Why a frame was not sent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SendError {
    /// Payload longer than [`MAX_PAYLOAD_SIZE`]; nothing was written
    PayloadTooLarge,
    /// The underlying transport rejected the write
    Transport,
}

impl From<FrameError> for SendError {
    fn from(e: FrameError) -> Self {
        match e {
            FrameError::PayloadTooLarge => SendError::PayloadTooLarge,
            _ => SendError::Transport,
        }
    }
}

/// Something that can transmit a frame.
///
/// Handlers reply through this, and the dispatch registry uses it for the
/// unknown-command response.
pub trait FrameSink {
    fn send_frame(&mut self, command: u8, data: &[u8]) -> Result<(), SendError>;
}

/// [`FrameSink`] that encodes into a stack buffer and writes it to a UART.
pub struct UartFrameSink<T: UartTx> {
    uart: T,
}

impl<T: UartTx> UartFrameSink<T> {
    pub fn new(uart: T) -> Self {
        Self { uart }
    }

    pub fn inner(&mut self) -> &mut T {
        &mut self.uart
    }

    pub fn into_inner(self) -> T {
        self.uart
    }
}

impl<T: UartTx> FrameSink for UartFrameSink<T> {
    fn send_frame(&mut self, command: u8, data: &[u8]) -> Result<(), SendError> {
        if data.len() > MAX_PAYLOAD_SIZE {
            return Err(SendError::PayloadTooLarge);
        }
        let mut buffer = [0u8; MAX_FRAME_SIZE];
        let len = encode_frame(command, data, &mut buffer)?;
        self.uart
            .write_blocking(&buffer[..len])
            .map_err(|_| SendError::Transport)
    }
}

impl<S: FrameSink + ?Sized> FrameSink for &mut S {
    fn send_frame(&mut self, command: u8, data: &[u8]) -> Result<(), SendError> {
        (**self).send_frame(command, data)
    }
}
