//! NFC reader trait

/// Errors from the NFC reader
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NfcError {
    /// A scan is already running
    Busy,
    /// Reader did not respond
    NotResponding,
}

/// Contactless card reader
pub trait NfcReader {
    /// Start a card scan in the background.
    ///
    /// The result is reported later in its own frame; this call only arms
    /// the reader.
    fn start_scan(&mut self) -> Result<(), NfcError>;
}
