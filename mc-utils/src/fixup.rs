//! The fixup-kind space shared between the generic assembler machinery and
//! target backends.
//!
//! Kinds are raw numeric values so that a target table can be indexed by
//! `kind - FIRST_TARGET_FIXUP_KIND`. Kinds below the target base belong to
//! the generic backend and cover plain data emissions.

use anyhow::Result;

/// No fixup required.
pub const FK_NONE: u32 = 0;
/// A one-byte data fixup.
pub const FK_DATA_1: u32 = 1;
/// A two-byte data fixup.
pub const FK_DATA_2: u32 = 2;
/// A four-byte data fixup.
pub const FK_DATA_4: u32 = 3;
/// An eight-byte data fixup.
pub const FK_DATA_8: u32 = 4;

/// First value available for target-specific fixup kinds.
pub const FIRST_TARGET_FIXUP_KIND: u32 = 128;

/// Bit-layout metadata for one fixup kind.
#[derive(Clone, Copy, Debug)]
pub struct FixupKindInfo {
    pub name: &'static str,
    /// Offset in bits of the encoded field within the instruction word.
    pub bit_offset: u32,
    /// Width in bits of the encoded field.
    pub bit_size: u32,
    pub flags: FixupFlags,
}

impl FixupKindInfo {
    /// Checks that an adjusted value stays within the bits this kind is
    /// declared to occupy. A failure here means the adjuster and the kind
    /// table have drifted apart.
    pub fn verify(&self, packed: u64) -> Result<()> {
        anyhow::ensure!(
            self.bit_offset + self.bit_size >= 64
                || packed >> (self.bit_offset + self.bit_size) == 0,
            "adjusted value {packed:#x} does not fit {} ({} bits at offset {})",
            self.name,
            self.bit_size,
            self.bit_offset,
        );
        Ok(())
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub struct FixupFlags(u32);

/// Fixup flag bit values.
pub mod fkf {
    use super::FixupFlags;

    /// The value is an offset from the fixup's own address.
    pub const IS_PC_REL: FixupFlags = FixupFlags::from_u32(1);
}

impl FixupFlags {
    #[must_use]
    pub const fn empty() -> Self {
        Self(0)
    }

    #[must_use]
    pub const fn from_u32(raw: u32) -> FixupFlags {
        FixupFlags(raw)
    }

    #[must_use]
    pub fn contains(self, flag: FixupFlags) -> bool {
        self.0 & flag.0 != 0
    }

    /// Returns self with the specified flags set.
    #[must_use]
    pub const fn with(self, flags: FixupFlags) -> FixupFlags {
        FixupFlags(self.0 | flags.0)
    }
}

impl std::fmt::Display for FixupFlags {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.contains(fkf::IS_PC_REL) {
            f.write_str("P")?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for FixupFlags {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self, f)
    }
}

/// Metadata for the generic (sub-target-base) fixup kinds. Indexed by kind
/// value, so the order must match the `FK_*` constants above.
const GENERIC_FIXUP_KINDS: [FixupKindInfo; 5] = [
    FixupKindInfo {
        name: "FK_NONE",
        bit_offset: 0,
        bit_size: 0,
        flags: FixupFlags::empty(),
    },
    FixupKindInfo {
        name: "FK_Data_1",
        bit_offset: 0,
        bit_size: 8,
        flags: FixupFlags::empty(),
    },
    FixupKindInfo {
        name: "FK_Data_2",
        bit_offset: 0,
        bit_size: 16,
        flags: FixupFlags::empty(),
    },
    FixupKindInfo {
        name: "FK_Data_4",
        bit_offset: 0,
        bit_size: 32,
        flags: FixupFlags::empty(),
    },
    FixupKindInfo {
        name: "FK_Data_8",
        bit_offset: 0,
        bit_size: 64,
        flags: FixupFlags::empty(),
    },
];

/// Returns the metadata for a generic fixup kind, or `None` if `kind` is
/// target-specific or out of range.
#[must_use]
pub fn generic_fixup_kind_info(kind: u32) -> Option<&'static FixupKindInfo> {
    if kind >= FIRST_TARGET_FIXUP_KIND {
        return None;
    }
    GENERIC_FIXUP_KINDS.get(kind as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generic_kind_lookup() {
        assert_eq!(generic_fixup_kind_info(FK_DATA_4).unwrap().name, "FK_Data_4");
        assert_eq!(generic_fixup_kind_info(FK_DATA_4).unwrap().bit_size, 32);
        assert!(generic_fixup_kind_info(FIRST_TARGET_FIXUP_KIND).is_none());
        assert!(generic_fixup_kind_info(99).is_none());
    }

    #[test]
    fn test_verify_packed_width() {
        let call = FixupKindInfo {
            name: "fixup_test_call",
            bit_offset: 0,
            bit_size: 24,
            flags: FixupFlags::empty(),
        };
        assert!(call.verify(0xffffff).is_ok());
        assert!(call.verify(0x1000000).is_err());
    }

    #[test]
    fn test_flags_display() {
        assert_eq!(fkf::IS_PC_REL.to_string(), "P");
        assert_eq!(FixupFlags::empty().to_string(), "");
        assert!(FixupFlags::empty().with(fkf::IS_PC_REL).contains(fkf::IS_PC_REL));
    }
}
