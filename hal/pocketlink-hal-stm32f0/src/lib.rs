//! STM32F0-specific HAL for pocketlink
//!
//! Implements the `pocketlink-hal` traits on top of `embassy-stm32`
//! peripherals.
//!
//! # Features
//!
//! - `stm32f042k6` - STM32F042K6 (reference board)
//! - `stm32f030k6` - STM32F030K6
//! - `defmt` - Enable debug formatting support

#![no_std]

pub mod uart;

pub use uart::{usart_config, Stm32UartTx, UartBusError};
