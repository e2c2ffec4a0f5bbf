// Return u32 from the first four bytes of a slice, little-endian.
#[must_use]
pub fn u32_from_slice(data: &[u8]) -> u32 {
    u32::from_le_bytes(*data.first_chunk::<4>().unwrap())
}

// Merge `mask_bytes` into `dest` using a byte-wise OR. Bits already set in
// `dest` are never cleared.
pub fn or_from_slice(dest: &mut [u8], mask_bytes: &[u8]) {
    for (i, v) in mask_bytes.iter().enumerate() {
        dest[i] |= *v;
    }
}
