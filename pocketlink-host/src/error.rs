//! Client error types.

use pocketlink_protocol::FrameError;
use thiserror::Error;

/// Client errors.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serial port error: {0}")]
    Serial(#[from] serialport::Error),

    #[error("frame error: {0:?}")]
    Frame(FrameError),

    #[error("no frame before the deadline")]
    Timeout,

    #[error("port closed")]
    ConnectionClosed,

    #[error("device does not implement command 0x{0:02x}")]
    UnknownCommand(u8),

    #[error("device error: {0}")]
    Device(String),

    #[error("expected reply to 0x{expected:02x}, got 0x{received:02x}")]
    UnexpectedReply { expected: u8, received: u8 },

    #[error("unexpected payload: {0}")]
    UnexpectedPayload(String),
}

impl From<FrameError> for ClientError {
    fn from(e: FrameError) -> Self {
        ClientError::Frame(e)
    }
}

impl ClientError {
    /// Returns whether retrying the same request could succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ClientError::Timeout | ClientError::Frame(_) | ClientError::Device(_)
        )
    }
}
