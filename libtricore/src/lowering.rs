//! Boundary with instruction selection.
//!
//! Instructions arrive here already selected and finalised; operands are
//! either concrete (a register number or an immediate that the metadata
//! layer folded into the base encoding) or symbolic, in which case this
//! glue attaches a fixup at the instruction's byte offset. The instruction
//! bit layouts and register numbering themselves live in static metadata
//! tables this module only indexes into.

use crate::debug_assert_bail;
use crate::error::Result;
use crate::expr::TargetExpr;
use crate::fragment::Fixup;
use crate::fragment::Fragment;
use anyhow::bail;

/// A finalised machine instruction as handed over by instruction selection.
#[derive(Debug, Clone)]
pub struct LoweredInst {
    /// Opaque opcode index into the instruction metadata table.
    pub opcode: u16,
    pub operands: Vec<Operand>,
}

#[derive(Debug, Clone)]
pub enum Operand {
    /// Opaque register number, already mapped by the register metadata.
    Reg(u8),
    /// Concrete immediate, already folded into the base encoding bits.
    Imm(i64),
    /// A value not known until layout or link time; encoded via a fixup.
    Sym { expr: TargetExpr, fixup_kind: u32 },
}

/// The static instruction/register metadata tables, seen from this core as
/// a lookup keyed by opaque indices.
pub trait InstrEncodings {
    /// Base encoding bits for the instruction, with all concrete operands
    /// already folded in. `None` for an opcode the table doesn't know.
    fn base_bits(&self, opcode: u16) -> Option<u32>;
}

/// Appends the instruction's 4-byte word to `fragment` and records one
/// fixup per symbolic operand, each anchored at the word's byte offset.
pub fn emit_instruction(
    fragment: &mut Fragment,
    inst: &LoweredInst,
    encodings: &dyn InstrEncodings,
) -> Result {
    let Some(base) = encodings.base_bits(inst.opcode) else {
        bail!("opcode {} missing from the instruction encoding table", inst.opcode);
    };
    debug_assert_bail!(
        fragment.len() % 4 == 0,
        "instruction emitted at unaligned fragment offset {}",
        fragment.len()
    );
    let offset = fragment.push_word(base);
    for operand in &inst.operands {
        if let Operand::Sym { expr, fixup_kind } = operand {
            fragment.add_fixup(Fixup {
                kind: *fixup_kind,
                offset,
                expr: expr.clone(),
            });
        }
    }
    Ok(())
}
