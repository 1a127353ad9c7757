//! Command handlers for each feature module
//!
//! Every handler answers on the id it was called with, or with a
//! [`CMD_UNKNOWN`] frame carrying an ASCII message when the request could not
//! be carried out.

pub mod ibutton;
pub mod ir;
pub mod nfc;
pub mod status;

pub use ibutton::IButtonReadHandler;
pub use ir::IrSendHandler;
pub use nfc::{NfcScanHandler, NfcStatusHandler};
pub use status::StatusHandler;

use pocketlink_protocol::commands::{
    CMD_GET_STATUS, CMD_IBUTTON_READ_ID, CMD_NFC_SCAN, CMD_NFC_STATUS, CMD_SEND_IR, CMD_UNKNOWN,
};
use pocketlink_protocol::{FrameSink, LinkLayer, RegistryError};

use crate::traits::{IButtonReader, IrTransmitter, NfcReader};

/// Reply with an error frame. Delivery is best effort.
pub(crate) fn send_error(tx: &mut dyn FrameSink, message: &str) {
    let _ = tx.send_frame(CMD_UNKNOWN, message.as_bytes());
}

/// Every feature module's handler, owned in one place so the link layer can
/// borrow them for the lifetime of the program.
pub struct FeatureHandlers<I, N, B> {
    pub status: StatusHandler,
    pub ir: IrSendHandler<I>,
    pub nfc_status: NfcStatusHandler,
    pub nfc_scan: NfcScanHandler<N>,
    pub ibutton: IButtonReadHandler<B>,
}

impl<I, N, B> FeatureHandlers<I, N, B>
where
    I: IrTransmitter,
    N: NfcReader,
    B: IButtonReader,
{
    pub fn new(ir: I, nfc: N, ibutton: B) -> Self {
        Self {
            status: StatusHandler,
            ir: IrSendHandler::new(ir),
            nfc_status: NfcStatusHandler,
            nfc_scan: NfcScanHandler::new(nfc),
            ibutton: IButtonReadHandler::new(ibutton),
        }
    }

    /// Register every command with `link`.
    ///
    /// A `RegistryFull` here means some feature is unreachable; startup
    /// should treat it as fatal.
    pub fn register_all<'a, const C: usize, const M: usize>(
        &'a mut self,
        link: &mut LinkLayer<'a, C, M>,
    ) -> Result<(), RegistryError> {
        link.register(CMD_GET_STATUS, &mut self.status)?;
        link.register(CMD_SEND_IR, &mut self.ir)?;
        link.register(CMD_NFC_STATUS, &mut self.nfc_status)?;
        link.register(CMD_NFC_SCAN, &mut self.nfc_scan)?;
        link.register(CMD_IBUTTON_READ_ID, &mut self.ibutton)?;
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use pocketlink_protocol::{FrameSink, SendError};

    /// Sink that remembers every frame sent through it
    #[derive(Default)]
    pub struct RecordingSink {
        pub sent: Vec<(u8, Vec<u8>)>,
    }

    impl RecordingSink {
        /// The only frame sent, as `(command, text)`
        pub fn single_text(&self) -> (u8, &str) {
            assert_eq!(self.sent.len(), 1, "expected exactly one frame");
            let (command, data) = &self.sent[0];
            (*command, core::str::from_utf8(data).unwrap())
        }
    }

    impl FrameSink for RecordingSink {
        fn send_frame(&mut self, command: u8, data: &[u8]) -> Result<(), SendError> {
            self.sent.push((command, data.to_vec()));
            Ok(())
        }
    }
}
