//! iButton read command
//!
//! Replies with the 8 ROM bytes in bus order (family code first), which is
//! the little-endian encoding of the 64-bit id.

use pocketlink_protocol::commands::CMD_IBUTTON_READ_ID;
use pocketlink_protocol::{CommandHandler, FrameSink};

use super::send_error;
use crate::onewire::RomId;
use crate::traits::IButtonReader;

pub const IBUTTON_READ_FAILED: &str = "ERROR: Failed to read iButton ID.";

/// Answers [`CMD_IBUTTON_READ_ID`]
pub struct IButtonReadHandler<R> {
    reader: R,
}

impl<R: IButtonReader> IButtonReadHandler<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: IButtonReader> CommandHandler for IButtonReadHandler<R> {
    fn handle(&mut self, _data: &[u8], tx: &mut dyn FrameSink) {
        match self.reader.read_rom().and_then(RomId::from_bytes) {
            Ok(rom) => {
                let _ = tx.send_frame(CMD_IBUTTON_READ_ID, rom.as_bytes());
            }
            Err(_) => send_error(tx, IBUTTON_READ_FAILED),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::testing::RecordingSink;
    use crate::traits::IButtonError;
    use pocketlink_protocol::commands::CMD_UNKNOWN;

    struct FixedRom(Result<[u8; 8], IButtonError>);

    impl IButtonReader for FixedRom {
        fn read_rom(&mut self) -> Result<[u8; 8], IButtonError> {
            self.0
        }
    }

    #[test]
    fn test_valid_rom_is_returned() {
        let rom = [0x01, 0x23, 0x45, 0x67, 0x89, 0xAB, 0xCD, 0xE9];
        let mut handler = IButtonReadHandler::new(FixedRom(Ok(rom)));
        let mut sink = RecordingSink::default();
        handler.handle(&[], &mut sink);

        assert_eq!(sink.sent, [(CMD_IBUTTON_READ_ID, rom.to_vec())]);
    }

    #[test]
    fn test_crc_failure_reports_error() {
        let rom = [0x01, 0x23, 0x45, 0x67, 0x89, 0xAB, 0xCD, 0x00];
        let mut handler = IButtonReadHandler::new(FixedRom(Ok(rom)));
        let mut sink = RecordingSink::default();
        handler.handle(&[], &mut sink);

        assert_eq!(sink.single_text(), (CMD_UNKNOWN, IBUTTON_READ_FAILED));
    }

    #[test]
    fn test_no_device_reports_error() {
        let mut handler = IButtonReadHandler::new(FixedRom(Err(IButtonError::NoDevice)));
        let mut sink = RecordingSink::default();
        handler.handle(&[], &mut sink);

        assert_eq!(sink.single_text(), (CMD_UNKNOWN, IBUTTON_READ_FAILED));
    }
}
