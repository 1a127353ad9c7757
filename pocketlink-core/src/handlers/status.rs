//! System status command

use pocketlink_protocol::commands::CMD_GET_STATUS;
use pocketlink_protocol::{CommandHandler, FrameSink};

/// Reply text for a healthy device
pub const STATUS_OK: &str = "STATUS: System OK";

/// Answers [`CMD_GET_STATUS`]; the request payload is ignored
#[derive(Debug, Default, Clone, Copy)]
pub struct StatusHandler;

impl CommandHandler for StatusHandler {
    fn handle(&mut self, _data: &[u8], tx: &mut dyn FrameSink) {
        let _ = tx.send_frame(CMD_GET_STATUS, STATUS_OK.as_bytes());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::testing::RecordingSink;

    #[test]
    fn test_replies_with_status() {
        let mut sink = RecordingSink::default();
        StatusHandler.handle(&[0xDE, 0xAD], &mut sink);
        assert_eq!(sink.single_text(), (CMD_GET_STATUS, STATUS_OK));
    }
}
