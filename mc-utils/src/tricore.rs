//! TriCore-specific fixup kinds and the pure value adjuster.

use crate::bit_misc::BitExtraction;
use crate::fixup::FIRST_TARGET_FIXUP_KIND;
use crate::fixup::FixupFlags;
use crate::fixup::FixupKindInfo;
use crate::fixup::fkf;
use crate::fixup::generic_fixup_kind_info;

/// PC-relative `movh`-style immediate, taking the high 16 bits of the value.
pub const FIXUP_MOV_HI16_PCREL: u32 = FIRST_TARGET_FIXUP_KIND;
/// PC-relative `mov`-style immediate, taking the low 16 bits of the value.
pub const FIXUP_MOV_LO16_PCREL: u32 = FIRST_TARGET_FIXUP_KIND + 1;
/// 24-bit absolute call target.
pub const FIXUP_CALL: u32 = FIRST_TARGET_FIXUP_KIND + 2;

pub const NUM_TARGET_FIXUP_KINDS: usize = 3;

/// Metadata for the target fixup kinds. This table must stay in the order
/// the `FIXUP_*` kind constants are declared in; lookups subtract
/// `FIRST_TARGET_FIXUP_KIND` and index straight into it.
const TARGET_FIXUP_KINDS: [FixupKindInfo; NUM_TARGET_FIXUP_KINDS] = [
    FixupKindInfo {
        name: "fixup_tricore_mov_hi16_pcrel",
        bit_offset: 0,
        bit_size: 32,
        flags: fkf::IS_PC_REL,
    },
    FixupKindInfo {
        name: "fixup_tricore_mov_lo16_pcrel",
        bit_offset: 0,
        bit_size: 32,
        flags: fkf::IS_PC_REL,
    },
    FixupKindInfo {
        name: "fixup_tricore_call",
        bit_offset: 0,
        bit_size: 24,
        flags: FixupFlags::empty(),
    },
];

/// Returns the metadata for `kind`, consulting the generic table for kinds
/// below the target base. `None` means the kind is outside both ranges,
/// which callers must treat as a registration bug, not user input.
#[must_use]
pub fn fixup_kind_info(kind: u32) -> Option<&'static FixupKindInfo> {
    if kind < FIRST_TARGET_FIXUP_KIND {
        return generic_fixup_kind_info(kind);
    }
    TARGET_FIXUP_KINDS.get((kind - FIRST_TARGET_FIXUP_KIND) as usize)
}

/// Packs a 16-bit immediate the way the mov/movh instruction formats store
/// it: the high nibble of the value lands in instruction bits 19..16, the
/// low 12 bits in instruction bits 11..0. The field is non-contiguous, so
/// the packed form has a hole at bits 15..12.
fn pack_mov_imm16(value: u64) -> u64 {
    let hi4 = value.extract_bit_range(12..16);
    let lo12 = value.low_bits(12);
    (hi4 << 16) | lo12
}

/// Adjusts a resolved fixup value into the bit pattern the instruction word
/// physically stores. Pure; returns `None` for kinds this backend never
/// encodes, which the caller must escalate to a fatal diagnostic rather
/// than emit silently wrong bytes.
#[must_use]
pub fn adjust_fixup_value(kind: u32, value: u64) -> Option<u64> {
    match kind {
        FIXUP_CALL => Some(value.low_bits(24)),
        // The hi16 form encodes the upper half of the value using the same
        // split as the lo16 form.
        FIXUP_MOV_HI16_PCREL => Some(pack_mov_imm16(value >> 16)),
        FIXUP_MOV_LO16_PCREL => Some(pack_mov_imm16(value)),
        _ => None,
    }
}

// TriCore ELF relocation numbers, from the TriCore EABI. The `object` crate
// does not carry processor-specific constants for this machine.
pub const R_TRICORE_NONE: u32 = 0;
pub const R_TRICORE_32REL: u32 = 1;
pub const R_TRICORE_32ABS: u32 = 2;
pub const R_TRICORE_24REL: u32 = 3;
pub const R_TRICORE_24ABS: u32 = 4;
pub const R_TRICORE_16SM: u32 = 5;
pub const R_TRICORE_HI: u32 = 6;
pub const R_TRICORE_LO: u32 = 7;
pub const R_TRICORE_LO2: u32 = 8;
pub const R_TRICORE_18ABS: u32 = 9;
pub const R_TRICORE_10SM: u32 = 10;
pub const R_TRICORE_15REL: u32 = 11;
pub const R_TRICORE_16ABS: u32 = 23;
