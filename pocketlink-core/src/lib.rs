//! Board-agnostic feature modules for the pocketlink device
//!
//! This crate contains everything above the link layer that does not depend
//! on a specific chip:
//!
//! - Peripheral traits (IR transmitter, NFC reader, iButton reader)
//! - Command handlers for each feature module
//! - 1-Wire ROM id decoding and CRC-8
//!
//! Feature modules register their handlers with a
//! [`pocketlink_protocol::LinkLayer`] at startup; see
//! [`handlers::FeatureHandlers::register_all`].

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod handlers;
pub mod onewire;
pub mod traits;
