//! NFC status and scan commands

use pocketlink_protocol::commands::{CMD_NFC_SCAN, CMD_NFC_STATUS};
use pocketlink_protocol::{CommandHandler, FrameSink};

use super::send_error;
use crate::traits::NfcReader;

pub const NFC_STATUS_OK: &str = "ACK: NFC Status: OK";
pub const NFC_SCAN_STARTED: &str = "ACK: NFC Scan initiated...";
pub const NFC_SCAN_FAILED: &str = "ERROR: NFC scan failed.";

/// Answers [`CMD_NFC_STATUS`]
#[derive(Debug, Default, Clone, Copy)]
pub struct NfcStatusHandler;

impl CommandHandler for NfcStatusHandler {
    fn handle(&mut self, _data: &[u8], tx: &mut dyn FrameSink) {
        let _ = tx.send_frame(CMD_NFC_STATUS, NFC_STATUS_OK.as_bytes());
    }
}

/// Answers [`CMD_NFC_SCAN`] by arming the reader.
///
/// Only the acknowledgement is sent from here; the card data arrives later
/// in a separate, unsolicited frame.
pub struct NfcScanHandler<R> {
    reader: R,
}

impl<R: NfcReader> NfcScanHandler<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    pub fn reader(&self) -> &R {
        &self.reader
    }
}

impl<R: NfcReader> CommandHandler for NfcScanHandler<R> {
    fn handle(&mut self, _data: &[u8], tx: &mut dyn FrameSink) {
        match self.reader.start_scan() {
            Ok(()) => {
                let _ = tx.send_frame(CMD_NFC_SCAN, NFC_SCAN_STARTED.as_bytes());
            }
            Err(_) => send_error(tx, NFC_SCAN_FAILED),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::testing::RecordingSink;
    use crate::traits::NfcError;
    use pocketlink_protocol::commands::CMD_UNKNOWN;

    struct MockReader {
        scanning: bool,
    }

    impl NfcReader for MockReader {
        fn start_scan(&mut self) -> Result<(), NfcError> {
            if self.scanning {
                return Err(NfcError::Busy);
            }
            self.scanning = true;
            Ok(())
        }
    }

    #[test]
    fn test_status() {
        let mut sink = RecordingSink::default();
        NfcStatusHandler.handle(&[], &mut sink);
        assert_eq!(sink.single_text(), (CMD_NFC_STATUS, NFC_STATUS_OK));
    }

    #[test]
    fn test_scan_arms_reader() {
        let mut handler = NfcScanHandler::new(MockReader { scanning: false });
        let mut sink = RecordingSink::default();
        handler.handle(&[], &mut sink);

        assert!(handler.reader().scanning);
        assert_eq!(sink.single_text(), (CMD_NFC_SCAN, NFC_SCAN_STARTED));
    }

    #[test]
    fn test_scan_while_busy() {
        let mut handler = NfcScanHandler::new(MockReader { scanning: true });
        let mut sink = RecordingSink::default();
        handler.handle(&[], &mut sink);

        assert_eq!(sink.single_text(), (CMD_UNKNOWN, NFC_SCAN_FAILED));
    }
}
