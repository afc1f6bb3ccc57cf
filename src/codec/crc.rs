//! CRC-8 frame checksum.
//!
//! Polynomial `0x07`, initial value `0x00`, no reflection, no final XOR
//! (check value over `"123456789"` is `0xF4`). Every byte of a frame up to
//! but excluding the checksum byte is folded in, sync marker included.

/// CRC-8 generator polynomial.
pub const CRC8_POLY: u8 = 0x07;

const fn build_table() -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut i = 0;
    while i < 256 {
        let mut crc = i as u8;
        let mut bit = 0;
        while bit < 8 {
            crc = if crc & 0x80 != 0 {
                (crc << 1) ^ CRC8_POLY
            } else {
                crc << 1
            };
            bit += 1;
        }
        table[i] = crc;
        i += 1;
    }
    table
}

static CRC8_TABLE: [u8; 256] = build_table();

/// Fold one byte into a running CRC.
#[inline]
pub fn crc8_byte(crc: u8, byte: u8) -> u8 {
    CRC8_TABLE[(crc ^ byte) as usize]
}

/// Fold a byte slice into a running CRC.
pub fn crc8(crc: u8, data: &[u8]) -> u8 {
    data.iter().fold(crc, |acc, &b| crc8_byte(acc, b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_value() {
        // Standard CRC-8 check value.
        assert_eq!(crc8(0, b"123456789"), 0xF4);
    }

    #[test]
    fn test_table_spot_values() {
        // Values from the canonical protocol table.
        assert_eq!(crc8_byte(0, 0x00), 0x00);
        assert_eq!(crc8_byte(0, 0x01), 0x07);
        assert_eq!(crc8_byte(0, 0x3C), 0xB4);
        assert_eq!(crc8_byte(0, 0xFF), 0xF3);
    }

    #[test]
    fn test_incremental_matches_slice() {
        let data = hex::decode("3c20130078563412aabbcc").unwrap();
        let whole = crc8(0, &data);
        let byte_at_a_time = data.iter().fold(0, |acc, &b| crc8_byte(acc, b));
        assert_eq!(whole, byte_at_a_time);
    }

    #[test]
    fn test_single_bit_sensitivity() {
        let data = [0x3C, 0x20, 0x0A, 0x00];
        let reference = crc8(0, &data);
        for i in 0..data.len() {
            for bit in 0..8 {
                let mut corrupted = data;
                corrupted[i] ^= 1 << bit;
                assert_ne!(crc8(0, &corrupted), reference);
            }
        }
    }
}
