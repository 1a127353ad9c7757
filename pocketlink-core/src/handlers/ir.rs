//! Infrared send command
//!
//! Payload: address (u16 LE) followed by command (u16 LE). Extra bytes are
//! ignored.

use pocketlink_protocol::commands::CMD_SEND_IR;
use pocketlink_protocol::{CommandHandler, FrameSink};

use super::send_error;
use crate::traits::IrTransmitter;

pub const IR_ACK: &str = "ACK: IR signal sent.";
pub const IR_PAYLOAD_TOO_SHORT: &str = "ERROR: IR command requires 4-byte payload.";
pub const IR_TRANSMIT_FAILED: &str = "ERROR: IR transmit failed.";

/// Answers [`CMD_SEND_IR`] by forwarding the code to an [`IrTransmitter`]
pub struct IrSendHandler<T> {
    transmitter: T,
}

impl<T: IrTransmitter> IrSendHandler<T> {
    pub fn new(transmitter: T) -> Self {
        Self { transmitter }
    }

    pub fn transmitter(&self) -> &T {
        &self.transmitter
    }
}

impl<T: IrTransmitter> CommandHandler for IrSendHandler<T> {
    fn handle(&mut self, data: &[u8], tx: &mut dyn FrameSink) {
        if data.len() < 4 {
            send_error(tx, IR_PAYLOAD_TOO_SHORT);
            return;
        }

        let address = u16::from_le_bytes([data[0], data[1]]);
        let command = u16::from_le_bytes([data[2], data[3]]);

        match self.transmitter.send_nec(address, command) {
            Ok(()) => {
                let _ = tx.send_frame(CMD_SEND_IR, IR_ACK.as_bytes());
            }
            Err(_) => send_error(tx, IR_TRANSMIT_FAILED),
        }
    }
}
