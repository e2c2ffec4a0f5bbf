//! Encoded-instruction fragments and the fixups attached to them.

use crate::expr::TargetExpr;

/// A placeholder marking where a not-yet-known value must be patched into
/// the fragment's bytes. Created during lowering, consumed exactly once
/// when the fragment is finalised.
#[derive(Debug, Clone)]
pub struct Fixup {
    /// Raw fixup kind, generic or target-specific.
    pub kind: u32,
    /// Byte offset of the affected instruction word within the fragment.
    pub offset: u64,
    pub expr: TargetExpr,
}

/// A contiguous run of encoded instruction bytes plus the fixups still
/// pending against them. The byte buffer is owned here; the applier only
/// ever sees it as a scoped mutable slice for the duration of one apply
/// call.
#[derive(Debug, Default)]
pub struct Fragment {
    bytes: Vec<u8>,
    fixups: Vec<Fixup>,
}

impl Fragment {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> u64 {
        self.bytes.len() as u64
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Scoped mutable view of the fragment bytes, handed to the fixup
    /// applier for the duration of one call.
    pub(crate) fn bytes_mut(&mut self) -> &mut [u8] {
        &mut self.bytes
    }

    /// Appends one 4-byte instruction word, little-endian, returning the
    /// byte offset it was placed at.
    pub fn push_word(&mut self, word: u32) -> u64 {
        let offset = self.len();
        self.bytes.extend_from_slice(&word.to_le_bytes());
        offset
    }

    pub fn add_fixup(&mut self, fixup: Fixup) {
        self.fixups.push(fixup);
    }

    #[must_use]
    pub fn fixups(&self) -> &[Fixup] {
        &self.fixups
    }

    /// Detaches the pending fixups for resolution. After this the fragment
    /// is plain bytes.
    pub(crate) fn take_fixups(&mut self) -> Vec<Fixup> {
        core::mem::take(&mut self.fixups)
    }
}
