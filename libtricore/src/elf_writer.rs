//! ELF object-target parameters and relocation records for TriCore.
//!
//! The target writes 32-bit little-endian ELF using REL-style relocations:
//! there is no explicit addend field, so any addend has to be folded into
//! the encoded bytes before the relocation is emitted.

use crate::error::Result;
use anyhow::bail;
use mc_utils::fixup::FK_DATA_2;
use mc_utils::fixup::FK_DATA_4;
use mc_utils::tricore::FIXUP_CALL;
use mc_utils::tricore::FIXUP_MOV_HI16_PCREL;
use mc_utils::tricore::FIXUP_MOV_LO16_PCREL;
use mc_utils::tricore::R_TRICORE_16ABS;
use mc_utils::tricore::R_TRICORE_24REL;
use mc_utils::tricore::R_TRICORE_32ABS;
use mc_utils::tricore::R_TRICORE_HI;
use mc_utils::tricore::R_TRICORE_LO;
use object::LittleEndian;
use object::U32;

/// Operating systems this backend knows an ELF OSABI tag for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetOs {
    None,
    Linux,
    FreeBsd,
}

#[must_use]
pub fn osabi_for_os(os: TargetOs) -> u8 {
    match os {
        TargetOs::None => object::elf::ELFOSABI_NONE,
        TargetOs::Linux => object::elf::ELFOSABI_GNU,
        TargetOs::FreeBsd => object::elf::ELFOSABI_FREEBSD,
    }
}

/// Parameters handed to the generic relocatable-object serialiser.
/// Constructed once per output object.
#[derive(Debug, Clone, Copy)]
pub struct ElfTargetWriter {
    is_64_bit: bool,
    osabi: u8,
    machine: u16,
    has_relocation_addend: bool,
}

impl ElfTargetWriter {
    #[must_use]
    pub fn new(osabi: u8) -> Self {
        Self {
            is_64_bit: false,
            osabi,
            machine: object::elf::EM_TRICORE,
            has_relocation_addend: false,
        }
    }

    #[must_use]
    pub fn is_64_bit(&self) -> bool {
        self.is_64_bit
    }

    #[must_use]
    pub fn osabi(&self) -> u8 {
        self.osabi
    }

    #[must_use]
    pub fn machine(&self) -> u16 {
        self.machine
    }

    #[must_use]
    pub fn has_relocation_addend(&self) -> bool {
        self.has_relocation_addend
    }
}

/// A fixup that could not be resolved at assembly time, deferred to link
/// time. The addend is not recorded here; it has already been folded into
/// the instruction bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelocationRecord {
    /// Byte offset of the fixup within its section.
    pub offset: u64,
    /// Index of the target symbol in the object's symbol table.
    pub symbol_index: u32,
    pub r_type: u32,
}

/// Maps a fixup kind to the ELF relocation type that describes it to the
/// linker. Kinds with no relocation representation are registration bugs.
pub fn relocation_type_for_fixup(kind: u32) -> Result<u32> {
    let r_type = match kind {
        FIXUP_CALL => R_TRICORE_24REL,
        FIXUP_MOV_HI16_PCREL => R_TRICORE_HI,
        FIXUP_MOV_LO16_PCREL => R_TRICORE_LO,
        FK_DATA_4 => R_TRICORE_32ABS,
        FK_DATA_2 => R_TRICORE_16ABS,
        _ => bail!("no relocation type for fixup kind {kind}"),
    };
    Ok(r_type)
}

impl RelocationRecord {
    /// Serialises as an ELF32 REL entry: `r_info = (sym << 8) | type`.
    #[must_use]
    pub fn to_rel32(&self) -> object::elf::Rel32<LittleEndian> {
        let e = LittleEndian;
        object::elf::Rel32 {
            r_offset: U32::new(e, self.offset as u32),
            r_info: U32::new(e, (self.symbol_index << 8) | (self.r_type & 0xff)),
        }
    }
}
