//! Placeholder peripherals
//!
//! The reference board has no IR LED, NFC front end or 1-Wire pull-up
//! fitted yet. These drivers log what they were asked to do so the link can
//! be exercised end to end from the host.

use defmt::*;
use pocketlink_core::traits::{
    IButtonError, IButtonReader, IrError, IrTransmitter, NfcError, NfcReader,
};

/// IR transmitter that logs each NEC code
pub struct LoggingIr {
    sent: u32,
}

impl LoggingIr {
    pub const fn new() -> Self {
        Self { sent: 0 }
    }
}

impl IrTransmitter for LoggingIr {
    fn send_nec(&mut self, address: u16, command: u16) -> Result<(), IrError> {
        self.sent = self.sent.wrapping_add(1);
        info!(
            "IR: NEC address=0x{:04x} command=0x{:04x} (#{})",
            address, command, self.sent
        );
        Ok(())
    }
}

/// NFC reader that logs scan requests and never finds a card
pub struct LoggingNfc {
    scans: u32,
}

impl LoggingNfc {
    pub const fn new() -> Self {
        Self { scans: 0 }
    }
}

impl NfcReader for LoggingNfc {
    fn start_scan(&mut self) -> Result<(), NfcError> {
        self.scans = self.scans.wrapping_add(1);
        info!("NFC: scan #{} started", self.scans);
        Ok(())
    }
}

/// 1-Wire master with nothing on the bus
pub struct LoggingIButton;

impl IButtonReader for LoggingIButton {
    fn read_rom(&mut self) -> Result<[u8; 8], IButtonError> {
        debug!("iButton: no presence pulse");
        Err(IButtonError::NoDevice)
    }
}
