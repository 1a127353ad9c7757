//! 1-Wire ROM ids and the Dallas/Maxim CRC-8

use crate::traits::IButtonError;

/// Dallas/Maxim CRC-8: polynomial x^8 + x^5 + x^4 + 1, reflected (0x8C), init 0.
pub fn crc8_maxim(data: &[u8]) -> u8 {
    let mut crc = 0u8;
    for &byte in data {
        let mut byte = byte;
        for _ in 0..8 {
            let mix = (crc ^ byte) & 0x01;
            crc >>= 1;
            if mix != 0 {
                crc ^= 0x8C;
            }
            byte >>= 1;
        }
    }
    crc
}

/// A 64-bit 1-Wire registration number with a verified CRC
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RomId {
    bytes: [u8; 8],
}

impl RomId {
    /// Validate a ROM as read off the bus
    pub fn from_bytes(bytes: [u8; 8]) -> Result<Self, IButtonError> {
        if crc8_maxim(&bytes[..7]) != bytes[7] {
            return Err(IButtonError::CrcMismatch);
        }
        Ok(Self { bytes })
    }

    /// Device family code
    pub fn family(&self) -> u8 {
        self.bytes[0]
    }

    /// 48-bit serial number, LSB first
    pub fn serial(&self) -> [u8; 6] {
        let mut serial = [0u8; 6];
        serial.copy_from_slice(&self.bytes[1..7]);
        serial
    }

    pub fn crc(&self) -> u8 {
        self.bytes[7]
    }

    /// Bytes in bus order
    pub fn as_bytes(&self) -> &[u8; 8] {
        &self.bytes
    }

    /// The whole ROM as a little-endian integer
    pub fn to_u64(&self) -> u64 {
        u64::from_le_bytes(self.bytes)
    }
}
