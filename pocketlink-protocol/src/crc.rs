//! CRC-16/CCITT-FALSE
//!
//! Polynomial 0x1021, initial value 0xFFFF, MSB first, no reflection and no
//! final XOR. Both ends compute it bit-by-bit with no negotiation, so the bit
//! order here is part of the wire format.

/// Initial register value
pub const CRC16_INIT: u16 = 0xFFFF;

/// Generator polynomial
pub const CRC16_POLY: u16 = 0x1021;

/// Compute the CRC over `data`.
pub fn crc16(data: &[u8]) -> u16 {
    crc16_update(CRC16_INIT, data)
}

/// Continue a CRC computation from a previous register value.
///
/// `crc16_update(crc16(a), b) == crc16(a ++ b)`.
pub fn crc16_update(mut crc: u16, data: &[u8]) -> u16 {
    for &byte in data {
        crc ^= (byte as u16) << 8;
        for _ in 0..8 {
            if crc & 0x8000 != 0 {
                crc = (crc << 1) ^ CRC16_POLY;
            } else {
                crc <<= 1;
            }
        }
    }
    crc
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_check_value() {
        assert_eq!(crc16(b"123456789"), 0x29B1);
    }

    #[test]
    fn test_empty_input_is_init() {
        assert_eq!(crc16(&[]), 0xFFFF);
    }

    #[test]
    fn test_known_frame() {
        // Status request: header, length 4, seq 0, command 0x01
        assert_eq!(crc16(&[0xAA, 0x04, 0x00, 0x01]), 0xCAFC);
    }

    proptest! {
        #[test]
        fn prop_incremental_matches_oneshot(a in proptest::collection::vec(any::<u8>(), 0..64),
                                            b in proptest::collection::vec(any::<u8>(), 0..64)) {
            let mut whole = a.clone();
            whole.extend_from_slice(&b);
            prop_assert_eq!(crc16_update(crc16(&a), &b), crc16(&whole));
        }

        #[test]
        fn prop_single_byte_flip_detected(data in proptest::collection::vec(any::<u8>(), 1..64),
                                          idx in any::<proptest::sample::Index>(),
                                          flip in 1u8..=255) {
            let mut corrupted = data.clone();
            let i = idx.index(corrupted.len());
            corrupted[i] ^= flip;
            prop_assert_ne!(crc16(&data), crc16(&corrupted));
        }
    }
}
