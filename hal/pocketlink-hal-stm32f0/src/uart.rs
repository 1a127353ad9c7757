//! USART transmit adapter for STM32F0
//!
//! Reception stays on the embassy async driver; the link layer only needs a
//! blocking writer for finished frames.

use embassy_stm32::mode::Mode;
use embassy_stm32::usart::{self, Error as UsartError, UartTx};
use pocketlink_hal::{DataBits, Parity, StopBits, UartConfig};

/// Error from USART operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UartBusError {
    /// Framing error
    Framing,
    /// Noise error
    Noise,
    /// Overrun error
    Overrun,
    /// Parity error
    Parity,
    /// Buffer too small
    BufferTooSmall,
    /// Other error
    Other,
}

impl From<UsartError> for UartBusError {
    fn from(e: UsartError) -> Self {
        match e {
            UsartError::Framing => UartBusError::Framing,
            UsartError::Noise => UartBusError::Noise,
            UsartError::Overrun => UartBusError::Overrun,
            UsartError::Parity => UartBusError::Parity,
            UsartError::BufferTooLong => UartBusError::BufferTooSmall,
            _ => UartBusError::Other,
        }
    }
}

/// Translate link settings into an embassy USART config
pub fn usart_config(config: &UartConfig) -> usart::Config {
    let mut out = usart::Config::default();
    out.baudrate = config.baudrate;
    out.data_bits = match config.data_bits {
        DataBits::Seven => usart::DataBits::DataBits7,
        DataBits::Eight => usart::DataBits::DataBits8,
        DataBits::Nine => usart::DataBits::DataBits9,
    };
    out.parity = match config.parity {
        Parity::None => usart::Parity::ParityNone,
        Parity::Even => usart::Parity::ParityEven,
        Parity::Odd => usart::Parity::ParityOdd,
    };
    out.stop_bits = match config.stop_bits {
        StopBits::One => usart::StopBits::STOP1,
        StopBits::Two => usart::StopBits::STOP2,
    };
    out
}

/// [`pocketlink_hal::UartTx`] over an embassy USART transmitter
pub struct Stm32UartTx<'d, M: Mode> {
    tx: UartTx<'d, M>,
}

impl<'d, M: Mode> Stm32UartTx<'d, M> {
    pub fn new(tx: UartTx<'d, M>) -> Self {
        Self { tx }
    }
}

impl<M: Mode> pocketlink_hal::UartTx for Stm32UartTx<'_, M> {
    type Error = UartBusError;

    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        self.tx.blocking_write(data).map_err(UartBusError::from)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.tx.blocking_flush().map_err(UartBusError::from)
    }
}
