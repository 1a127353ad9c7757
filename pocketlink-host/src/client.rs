//! Blocking request/response client.

use std::collections::VecDeque;
use std::io::{self, Read, Write};
use std::time::{Duration, Instant};

use pocketlink_core::handlers::ir::IR_ACK;
use pocketlink_core::handlers::nfc::{NFC_SCAN_STARTED, NFC_STATUS_OK};
use pocketlink_core::handlers::status::STATUS_OK;
use pocketlink_core::onewire::RomId;
use pocketlink_protocol::commands::{
    CMD_GET_STATUS, CMD_IBUTTON_READ_ID, CMD_NFC_SCAN, CMD_NFC_STATUS, CMD_SEND_IR, CMD_UNKNOWN,
};
use pocketlink_protocol::{Frame, FrameParser};
use tracing::{debug, trace, warn};

use crate::error::ClientError;

const READ_CHUNK: usize = 64;

/// Client for one device on `port`.
///
/// Bytes read past the end of a frame are kept for the next receive, so
/// back-to-back replies are not lost.
pub struct Client<P> {
    port: P,
    parser: FrameParser,
    pending: VecDeque<u8>,
    timeout: Duration,
}

impl<P: Read + Write> Client<P> {
    /// Creates a client; `timeout` is the default per-frame receive deadline.
    pub fn new(port: P, timeout: Duration) -> Self {
        Self {
            port,
            parser: FrameParser::new(),
            pending: VecDeque::new(),
            timeout,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn port_mut(&mut self) -> &mut P {
        &mut self.port
    }

    pub fn into_inner(self) -> P {
        self.port
    }

    /// Encodes and writes one frame.
    pub fn send_frame(&mut self, command: u8, data: &[u8]) -> Result<(), ClientError> {
        let bytes = Frame::new(command, data)?.encode_to_vec()?;
        trace!(command, bytes = %hex::encode(&bytes), "tx");
        self.port.write_all(&bytes)?;
        self.port.flush()?;
        Ok(())
    }

    /// Waits up to the default timeout for the next valid frame.
    pub fn receive_frame(&mut self) -> Result<Frame, ClientError> {
        self.receive_frame_timeout(self.timeout)
    }

    /// Waits up to `timeout` for the next valid frame.
    ///
    /// A corrupted frame (bad length or CRC) ends the wait with
    /// [`ClientError::Frame`]; the parser is already resynchronised for the
    /// next call.
    pub fn receive_frame_timeout(&mut self, timeout: Duration) -> Result<Frame, ClientError> {
        let deadline = Instant::now() + timeout;
        let mut chunk = [0u8; READ_CHUNK];

        loop {
            while let Some(byte) = self.pending.pop_front() {
                match self.parser.feed(byte) {
                    Ok(Some(view)) => {
                        let frame = view.to_frame()?;
                        debug!(command = frame.command, len = frame.payload.len(), "rx frame");
                        return Ok(frame);
                    }
                    Ok(None) => {}
                    Err(e) => {
                        warn!(error = ?e, "dropped corrupt frame");
                        return Err(ClientError::Frame(e));
                    }
                }
            }

            if Instant::now() >= deadline {
                return Err(ClientError::Timeout);
            }

            match self.port.read(&mut chunk) {
                Ok(0) => return Err(ClientError::ConnectionClosed),
                Ok(n) => self.pending.extend(&chunk[..n]),
                Err(e)
                    if matches!(
                        e.kind(),
                        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted
                    ) => {}
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Sends a request and returns the reply carrying the same command id.
    ///
    /// Error frames are turned into [`ClientError::UnknownCommand`] or
    /// [`ClientError::Device`].
    pub fn request(&mut self, command: u8, data: &[u8]) -> Result<Frame, ClientError> {
        self.send_frame(command, data)?;
        let reply = self.receive_frame()?;

        if reply.command == CMD_UNKNOWN && command != CMD_UNKNOWN {
            if reply.payload.as_slice() == [command] {
                return Err(ClientError::UnknownCommand(command));
            }
            return Err(ClientError::Device(text(&reply)));
        }
        if reply.command != command {
            return Err(ClientError::UnexpectedReply {
                expected: command,
                received: reply.command,
            });
        }
        Ok(reply)
    }

    /// Queries device status and checks for the healthy reply.
    pub fn status(&mut self) -> Result<String, ClientError> {
        self.expect_text(CMD_GET_STATUS, &[], STATUS_OK)
    }

    /// Transmits an NEC infrared code.
    pub fn send_ir(&mut self, address: u16, command: u16) -> Result<String, ClientError> {
        let mut data = [0u8; 4];
        data[..2].copy_from_slice(&address.to_le_bytes());
        data[2..].copy_from_slice(&command.to_le_bytes());
        self.expect_text(CMD_SEND_IR, &data, IR_ACK)
    }

    pub fn nfc_status(&mut self) -> Result<String, ClientError> {
        self.expect_text(CMD_NFC_STATUS, &[], NFC_STATUS_OK)
    }

    pub fn nfc_scan(&mut self) -> Result<String, ClientError> {
        self.expect_text(CMD_NFC_SCAN, &[], NFC_SCAN_STARTED)
    }

    /// Reads the iButton ROM id and re-checks its CRC-8.
    pub fn read_ibutton(&mut self) -> Result<RomId, ClientError> {
        let reply = self.request(CMD_IBUTTON_READ_ID, &[])?;
        let bytes: [u8; 8] = reply
            .payload
            .as_slice()
            .try_into()
            .map_err(|_| ClientError::UnexpectedPayload(hex::encode(&reply.payload)))?;
        RomId::from_bytes(bytes).map_err(|_| ClientError::UnexpectedPayload(hex::encode(bytes)))
    }

    fn expect_text(&mut self, command: u8, data: &[u8], expected: &str) -> Result<String, ClientError> {
        let reply = self.request(command, data)?;
        let message = text(&reply);
        if message != expected {
            return Err(ClientError::UnexpectedPayload(message));
        }
        Ok(message)
    }
}

fn text(frame: &Frame) -> String {
    String::from_utf8_lossy(&frame.payload).into_owned()
}
