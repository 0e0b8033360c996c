use crate::framing::Frame;

/// CRC-8 with polynomial 0x07 (x^8 + x^2 + x + 1), zero init, no reflection,
/// no final XOR
pub fn crc8(data: &[u8]) -> u8 {
    const POLYNOMIAL: u8 = 0x07;
    let mut crc = 0u8;

    for &byte in data {
        crc ^= byte;
        for _ in 0..8 {
            if (crc & 0x80) != 0 {
                crc = (crc << 1) ^ POLYNOMIAL;
            } else {
                crc <<= 1;
            }
        }
    }
    crc
}

/// Outcome of checking a frame's trailer against its payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntegrityCheck {
    /// Trailer as received
    pub received: u8,
    /// CRC-8 recomputed over the payload bytes
    pub computed: u8,
}

impl IntegrityCheck {
    pub fn matched(&self) -> bool {
        self.received == self.computed
    }
}

/// Compare the frame's trailer with the CRC-8 of its payload bytes
///
/// Both sides are plain `u8` values; the payload is hashed in the same
/// left-padded byte form the renderer decodes.
pub fn validate(frame: &Frame) -> IntegrityCheck {
    IntegrityCheck {
        received: frame.trailer(),
        computed: crc8(&frame.payload_bytes()),
    }
}
