//! Infrared transmitter trait

/// Errors from the IR transmitter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IrError {
    /// A previous code is still being sent
    Busy,
    /// Carrier timer or LED driver fault
    Hardware,
}

/// Sends NEC-encoded infrared codes.
///
/// Implementations queue the code and return; the waveform itself is
/// produced by a timer, not by blocking the caller for the ~68ms a frame
/// takes on the air.
pub trait IrTransmitter {
    /// Queue one NEC code
    fn send_nec(&mut self, address: u16, command: u16) -> Result<(), IrError>;
}
