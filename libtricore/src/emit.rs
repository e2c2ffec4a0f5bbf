//! The per-fragment fixup resolution pass.
//!
//! Runs once per fragment after layout has assigned it an address. Fixups
//! are processed strictly in sequence; the fragment's byte buffer has a
//! single writer for the duration of the pass. Each fixup either has its
//! bits merged into the fragment or becomes a relocation record for the
//! linker to finish.

use crate::asm_backend::TriCoreAsmBackend;
use crate::elf_writer::RelocationRecord;
use crate::elf_writer::relocation_type_for_fixup;
use crate::error::Result;
use crate::fragment::Fragment;
use anyhow::Context as _;
use mc_utils::fixup::fkf;

/// Resolves symbol names to addresses and symbol-table indices. Unresolved
/// names turn fixups into relocations.
pub trait SymbolResolver {
    fn address_of(&self, name: &str) -> Option<u64>;

    /// Index of the symbol in the output object's symbol table, for
    /// relocation records against symbols defined elsewhere.
    fn symbol_index(&self, name: &str) -> Option<u32>;
}

/// Applies every pending fixup of `fragment`, which layout has placed at
/// `fragment_address`. Returns the relocation records for fixups that had
/// to be deferred to link time. Any bit-level inconsistency aborts the
/// whole pass; a wrong relocation silently corrupts the output binary.
pub fn apply_fragment_fixups(
    backend: &TriCoreAsmBackend,
    fragment: &mut Fragment,
    fragment_address: u64,
    symbols: &dyn SymbolResolver,
) -> Result<Vec<RelocationRecord>> {
    let mut relocations = Vec::new();

    for fixup in fragment.take_fixups() {
        let info = backend.fixup_kind_info(fixup.kind)?;
        let pc_rel = info.flags.contains(fkf::IS_PC_REL);
        let place = fragment_address + fixup.offset;

        match fixup.expr.resolve(|name| symbols.address_of(name), place, pc_rel) {
            Some(value) => {
                backend
                    .evaluate_target_fixup(&fixup, fragment, &fixup.expr, value)
                    .with_context(|| format!("evaluating {}", info.name))?;
                tracing::debug!(kind = info.name, offset = fixup.offset, value, "apply fixup");
                backend.apply_fixup(&fixup, fragment.bytes_mut(), value, true)?;
            }
            None => {
                // Relocations on this target carry no addend field, so the
                // constant part of the expression is encoded into the bytes
                // now and the symbol part is left to the linker.
                let symbol = fixup.expr.symbol.as_deref().unwrap_or_default();
                let symbol_index = symbols
                    .symbol_index(symbol)
                    .with_context(|| format!("undefined symbol {symbol} has no symbol-table entry"))?;
                backend.apply_fixup(
                    &fixup,
                    fragment.bytes_mut(),
                    fixup.expr.constant as u64,
                    false,
                )?;
                let r_type = relocation_type_for_fixup(fixup.kind)?;
                tracing::debug!(kind = info.name, offset = fixup.offset, r_type, "defer fixup");
                relocations.push(RelocationRecord {
                    offset: fixup.offset,
                    symbol_index,
                    r_type,
                });
            }
        }
    }

    Ok(relocations)
}
