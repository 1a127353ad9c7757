//! Command identifiers
//!
//! Requests from the host and the device's replies share an id; the reply to
//! a request always carries the request's command id, except for errors.

/// Device status query
pub const CMD_GET_STATUS: u8 = 0x01;

/// Transmit an NEC infrared code (payload: address LE u16, command LE u16)
pub const CMD_SEND_IR: u8 = 0x10;

/// NFC reader status
pub const CMD_NFC_STATUS: u8 = 0x20;

/// Start a non-blocking NFC card scan
pub const CMD_NFC_SCAN: u8 = 0x21;

/// Read the 64-bit ROM id of an iButton on the 1-Wire bus
pub const CMD_IBUTTON_READ_ID: u8 = 0x30;

/// Reserved: unknown command (payload is the rejected id) or handler error
/// (payload is an ASCII message)
pub const CMD_UNKNOWN: u8 = 0xFF;

/// Human-readable name for a command id
pub fn command_name(id: u8) -> &'static str {
    match id {
        CMD_GET_STATUS => "get-status",
        CMD_SEND_IR => "send-ir",
        CMD_NFC_STATUS => "nfc-status",
        CMD_NFC_SCAN => "nfc-scan",
        CMD_IBUTTON_READ_ID => "ibutton-read-id",
        CMD_UNKNOWN => "error",
        _ => "unassigned",
    }
}
