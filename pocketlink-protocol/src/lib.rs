//! Pocketlink serial link layer
//!
//! Point-to-point command/response protocol between a host and the device
//! over a byte-oriented UART.
//!
//! # Protocol Overview
//!
//! All messages use a simple binary frame format:
//! ```text
//! ┌────────┬────────┬─────┬─────────┬─────────────┬──────────┐
//! │ HEADER │ LENGTH │ SEQ │ COMMAND │ PAYLOAD     │ CRC16 LE │
//! │ 1B     │ 1B     │ 1B  │ 1B      │ 0–250B      │ 2B       │
//! └────────┴────────┴─────┴─────────┴─────────────┴──────────┘
//! ```
//!
//! LENGTH counts SEQ through CRC. The CRC is CRC-16/CCITT-FALSE over HEADER
//! through PAYLOAD.
//!
//! The link is lossy and best-effort: overflowing bytes, malformed lengths
//! and CRC failures are all dropped without notifying the sender. Only an
//! unregistered command is reported back, with a [`commands::CMD_UNKNOWN`]
//! frame.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod commands;
pub mod crc;
pub mod frame;
pub mod link;
pub mod registry;
pub mod ring_buffer;
pub mod shared;
pub mod transmit;

pub use crc::crc16;
pub use frame::{
    encode_frame, DrainReport, Frame, FrameError, FrameParser, FrameView, ParseState,
    DEFAULT_CAPACITY, FRAME_HEADER, MAX_FRAME_SIZE, MAX_PAYLOAD_SIZE,
};
pub use link::{LinkLayer, ProcessReport};
pub use registry::{CommandHandler, CommandRegistry, Dispatch, RegistryError, MAX_COMMANDS};
pub use ring_buffer::{ByteQueue, RingBuffer};
pub use shared::SharedRingBuffer;
pub use transmit::{FrameSink, SendError, UartFrameSink};
