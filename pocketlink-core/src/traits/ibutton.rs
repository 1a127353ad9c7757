//! iButton (1-Wire) reader trait

/// Errors from the iButton reader
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IButtonError {
    /// No presence pulse after reset
    NoDevice,
    /// ROM CRC-8 did not match
    CrcMismatch,
    /// Bus stuck low or similar electrical fault
    Bus,
}

/// 1-Wire bus master that can issue READ ROM
pub trait IButtonReader {
    /// Read the raw 8-byte ROM (family, 6-byte serial, CRC) in bus order
    fn read_rom(&mut self) -> Result<[u8; 8], IButtonError>;
}
