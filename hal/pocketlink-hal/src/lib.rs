//! Pocketlink Hardware Abstraction Layer
//!
//! Traits that chip-specific HALs implement so the link layer and the
//! feature modules never touch peripheral registers directly.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │  pocketlink-protocol / pocketlink-firmware   │
//! └──────────────────────────────────────────────┘
//!                       │
//!                       ▼
//! ┌──────────────────────────────────────────────┐
//! │  pocketlink-hal (this crate - traits)        │
//! └──────────────────────────────────────────────┘
//!                       │
//!                       ▼
//!              ┌──────────────────┐
//!              │ pocketlink-hal-  │
//!              │     stm32f0      │
//!              └──────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`uart::UartTx`] - Serial transmit
//! - [`uart::UartConfig`] - Line settings

#![no_std]
#![deny(unsafe_code)]

pub mod uart;

pub use uart::{DataBits, Parity, StopBits, UartConfig, UartTx};
