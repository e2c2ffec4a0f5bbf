use std::ops::Range;

pub trait BitExtraction {
    /// Extract the half-open bit range [`start`, `end`) from `self`.
    #[must_use]
    fn extract_bit_range(self, range: Range<u32>) -> u64;

    /// Extract the low `num_bits` bits from `self`.
    #[must_use]
    fn low_bits(self, num_bits: u32) -> u64;

    /// Sign-extend `self` from the given sign bit.
    #[must_use]
    fn sign_extend(self, sign_bit: u32) -> u64;
}

impl BitExtraction for u64 {
    fn extract_bit_range(self, range: Range<u32>) -> u64 {
        if range.start == 0 && range.end == u64::BITS {
            return self;
        }
        debug_assert!(range.start < range.end);
        (self >> range.start) & ((1 << range.len()) - 1)
    }

    fn low_bits(self, num_bits: u32) -> u64 {
        self & ((1 << num_bits) - 1)
    }

    fn sign_extend(self, sign_bit: u32) -> u64 {
        if self & (1 << sign_bit) != 0 {
            self | !((2 << sign_bit) - 1)
        } else {
            self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_bit_range() {
        assert_eq!(0xa, 0xabcdu64.extract_bit_range(12..16));
        assert_eq!(0xbcd, 0xabcdu64.extract_bit_range(0..12));
        assert_eq!(u64::MAX, u64::MAX.extract_bit_range(0..64));
    }

    #[test]
    fn test_low_bits() {
        assert_eq!(0x234567, 0x01234567u64.low_bits(24));
        assert_eq!(0, 0xff000000u64.low_bits(24));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic]
    #[allow(clippy::reversed_empty_ranges)]
    fn test_extract_bits_wrong_range() {
        let _ = 0u64.extract_bit_range(5..2);
    }

    #[test]
    fn test_sign_extend() {
        assert_eq!(0x7fffffu64.sign_extend(23) as i64, 0x7fffff);
        assert_eq!(0x800000u64.sign_extend(23) as i64, -0x800000);
        assert_eq!(0xffffffu64.sign_extend(23) as i64, -1);
    }
}
