//! The assembler-backend capability surface for TriCore: fixup metadata
//! queries, the evaluate/apply split, and the (deliberately empty)
//! relaxation policy.

use crate::elf_writer::ElfTargetWriter;
use crate::error::Result;
use crate::expr::TargetExpr;
use crate::fragment::Fixup;
use crate::fragment::Fragment;
use crate::lowering::LoweredInst;
use anyhow::bail;
use anyhow::ensure;
use mc_utils::fixup::FixupKindInfo;
use mc_utils::tricore::NUM_TARGET_FIXUP_KINDS;
use mc_utils::tricore::adjust_fixup_value;
use mc_utils::tricore::fixup_kind_info;
use mc_utils::utils::or_from_slice;

/// Instruction words on this target are always encoded 4 bytes at a time.
const INSTRUCTION_WORD_BYTES: usize = 4;

/// Outcome of pre-layout fixup evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixupEval {
    /// Whether the fixup value is considered resolved.
    pub resolved: bool,
    /// Whether resolution was forced rather than proven. This backend
    /// forces resolution unconditionally; see DESIGN.md.
    pub was_forced: bool,
}

/// Backend-wide encoding policy. Carries no per-fragment state; one value
/// serves a whole compilation. Constructed for a specific OS ABI, which is
/// the only object-format variation this target has.
#[derive(Debug, Clone, Copy)]
pub struct TriCoreAsmBackend {
    osabi: u8,
}

impl TriCoreAsmBackend {
    #[must_use]
    pub fn new(osabi: u8) -> Self {
        Self { osabi }
    }

    #[must_use]
    pub fn osabi(&self) -> u8 {
        self.osabi
    }

    #[must_use]
    pub fn pointer_size(&self) -> u32 {
        4
    }

    /// Parameters for the relocatable-object serialiser that matches this
    /// backend's encoding decisions.
    #[must_use]
    pub fn object_target_writer(&self) -> ElfTargetWriter {
        ElfTargetWriter::new(self.osabi)
    }

    #[must_use]
    pub fn num_fixup_kinds(&self) -> usize {
        NUM_TARGET_FIXUP_KINDS
    }

    /// Metadata lookup for any fixup kind, generic or target-specific. A
    /// kind outside both ranges is a registration bug in whoever created
    /// the fixup, so it is reported as an error rather than a lookup miss.
    pub fn fixup_kind_info(&self, kind: u32) -> Result<&'static FixupKindInfo> {
        match fixup_kind_info(kind) {
            Some(info) => Ok(info),
            None => bail!("invalid fixup kind {kind}"),
        }
    }

    /// Pre-layout evaluation hook. Resolution is always forced on this
    /// target; the only work done here is running the adjuster against the
    /// candidate value so that an unknown kind is caught before any bytes
    /// are written. Must not touch fragment bytes.
    pub fn evaluate_target_fixup(
        &self,
        fixup: &Fixup,
        _fragment: &Fragment,
        _target: &TargetExpr,
        value: u64,
    ) -> Result<FixupEval> {
        // The adjusted value is discarded; we only care that the kind and
        // value are mutually consistent at this point.
        if adjust_fixup_value(fixup.kind, value).is_none() {
            bail!(
                "cannot evaluate fixup of unknown kind {} at offset {:#x}",
                fixup.kind,
                fixup.offset
            );
        }
        Ok(FixupEval {
            resolved: true,
            was_forced: true,
        })
    }

    /// Merges the resolved value of `fixup` into `data`. The packed value
    /// is OR-ed byte-wise over the existing instruction word so opcode bits
    /// already encoded in the same bytes survive. A packed value of zero
    /// changes no encoding and returns early.
    pub fn apply_fixup(
        &self,
        fixup: &Fixup,
        data: &mut [u8],
        value: u64,
        _is_resolved: bool,
    ) -> Result {
        let Some(packed) = adjust_fixup_value(fixup.kind, value) else {
            bail!(
                "cannot apply fixup of unknown kind {} at offset {:#x}",
                fixup.kind,
                fixup.offset
            );
        };
        if packed == 0 {
            // Doesn't change the encoding.
            return Ok(());
        }
        self.fixup_kind_info(fixup.kind)?.verify(packed)?;

        let offset = fixup.offset as usize;
        // Offset inconsistencies mean an upstream layout computation is
        // corrupt; nothing downstream of that can be trusted.
        ensure!(
            offset + INSTRUCTION_WORD_BYTES <= data.len(),
            "fixup at offset {:#x} overruns fragment of {} bytes",
            fixup.offset,
            data.len()
        );

        or_from_slice(
            &mut data[offset..offset + INSTRUCTION_WORD_BYTES],
            &(packed as u32).to_le_bytes(),
        );
        Ok(())
    }

    /// This target makes all instruction-size decisions at selection time.
    #[must_use]
    pub fn fixup_needs_relaxation(&self, _fixup: &Fixup, _value: u64) -> bool {
        false
    }

    pub fn relax_instruction(&self, _inst: &mut LoweredInst) {}

    /// Nop padding is unsupported; only a zero-length request can be
    /// satisfied. Callers are expected to check the return value.
    #[must_use]
    pub fn write_nop_data(&self, count: u64) -> bool {
        count == 0
    }
}
