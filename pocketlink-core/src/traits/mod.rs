//! Peripheral traits
//!
//! These traits define the interface between the command handlers and the
//! hardware-specific drivers. Every method is called from inside the link
//! layer's dispatch loop and must return promptly.

pub mod ibutton;
pub mod ir;
pub mod nfc;

pub use ibutton::{IButtonError, IButtonReader};
pub use ir::{IrError, IrTransmitter};
pub use nfc::{NfcError, NfcReader};
