//! End-to-end emission: lower instructions with symbolic operands, lay the
//! fragment out at an address, resolve fixups, and check the final bytes
//! and relocation records.

use libtricore::TargetOs;
use libtricore::elf_writer::osabi_for_os;
use libtricore::emit::SymbolResolver;
use libtricore::emit::apply_fragment_fixups;
use libtricore::expr::TargetExpr;
use libtricore::fragment::Fragment;
use libtricore::lowering::InstrEncodings;
use libtricore::lowering::LoweredInst;
use libtricore::lowering::Operand;
use libtricore::lowering::emit_instruction;
use libtricore::registry::create_asm_backend;
use mc_utils::tricore::FIXUP_CALL;
use mc_utils::tricore::FIXUP_MOV_HI16_PCREL;
use mc_utils::tricore::FIXUP_MOV_LO16_PCREL;
use mc_utils::tricore::R_TRICORE_24REL;
use mc_utils::utils::u32_from_slice;
use std::collections::HashMap;

const OP_CALL: u16 = 0;
const OP_MOVH: u16 = 1;
const OP_MOV: u16 = 2;

struct Encodings;

impl InstrEncodings for Encodings {
    fn base_bits(&self, opcode: u16) -> Option<u32> {
        match opcode {
            OP_CALL => Some(0x0000006d),
            OP_MOVH => Some(0x00200091),
            OP_MOV => Some(0x0020003b),
            _ => None,
        }
    }
}

#[derive(Default)]
struct Symbols {
    addresses: HashMap<&'static str, u64>,
    indices: HashMap<&'static str, u32>,
}

impl SymbolResolver for Symbols {
    fn address_of(&self, name: &str) -> Option<u64> {
        self.addresses.get(name).copied()
    }

    fn symbol_index(&self, name: &str) -> Option<u32> {
        self.indices.get(name).copied()
    }
}

fn call_inst(target: &str) -> LoweredInst {
    LoweredInst {
        opcode: OP_CALL,
        operands: vec![Operand::Sym {
            expr: TargetExpr::symbol_ref(target, 0),
            fixup_kind: FIXUP_CALL,
        }],
    }
}

#[test]
fn resolved_fixups_patch_bytes_and_emit_no_relocations() {
    let backend = create_asm_backend(TargetOs::Linux);
    let mut fragment = Fragment::new();

    // movh/mov pair materialising the PC-relative address of `data`,
    // followed by a call to `callee`.
    emit_instruction(
        &mut fragment,
        &LoweredInst {
            opcode: OP_MOVH,
            operands: vec![
                Operand::Reg(2),
                Operand::Sym {
                    expr: TargetExpr::symbol_ref("data", 0),
                    fixup_kind: FIXUP_MOV_HI16_PCREL,
                },
            ],
        },
        &Encodings,
    )
    .unwrap();
    emit_instruction(
        &mut fragment,
        &LoweredInst {
            opcode: OP_MOV,
            operands: vec![
                Operand::Reg(2),
                Operand::Sym {
                    expr: TargetExpr::symbol_ref("data", 0),
                    fixup_kind: FIXUP_MOV_LO16_PCREL,
                },
            ],
        },
        &Encodings,
    )
    .unwrap();
    emit_instruction(&mut fragment, &call_inst("callee"), &Encodings).unwrap();

    let fragment_address = 0x8000_0000;
    let mut symbols = Symbols::default();
    // data sits 0x1234abcd past the movh.
    symbols.addresses.insert("data", fragment_address + 0x1234_abcd);
    symbols.addresses.insert("callee", 0x0020_0400);

    let relocations =
        apply_fragment_fixups(&backend, &mut fragment, fragment_address, &symbols).unwrap();
    assert!(relocations.is_empty());

    let bytes = fragment.bytes();

    // movh at offset 0: value 0x1234abcd, high half 0x1234 split into
    // nibble 1 at bits 19..16 and 0x234 at bits 11..0.
    assert_eq!(u32_from_slice(&bytes[0..4]), 0x00200091 | 0x00010234);

    // mov at offset 4: PC-relative value is 0x1234abcd - 4 = 0x1234abc9,
    // low half 0xabc9 split into nibble 0xa and 0xbc9.
    assert_eq!(u32_from_slice(&bytes[4..8]), 0x0020003b | 0x000a0bc9);

    // call at offset 8: absolute target masked to 24 bits.
    assert_eq!(u32_from_slice(&bytes[8..12]), 0x0000006d | 0x00200400);
}

#[test]
fn unresolved_symbol_defers_to_relocation() {
    let backend = create_asm_backend(TargetOs::None);
    let mut fragment = Fragment::new();
    emit_instruction(&mut fragment, &call_inst("external"), &Encodings).unwrap();

    let mut symbols = Symbols::default();
    symbols.indices.insert("external", 3);

    let relocations = apply_fragment_fixups(&backend, &mut fragment, 0x1000, &symbols).unwrap();
    assert_eq!(relocations.len(), 1);
    assert_eq!(relocations[0].offset, 0);
    assert_eq!(relocations[0].symbol_index, 3);
    assert_eq!(relocations[0].r_type, R_TRICORE_24REL);

    // With a zero addend nothing was merged; only the base opcode remains.
    assert_eq!(u32_from_slice(fragment.bytes()), 0x0000006d);

    let rel = relocations[0].to_rel32();
    let e = object::LittleEndian;
    assert_eq!(rel.r_info.get(e), (3 << 8) | R_TRICORE_24REL);
}

#[test]
fn unresolved_symbol_without_table_entry_is_fatal() {
    let backend = create_asm_backend(TargetOs::None);
    let mut fragment = Fragment::new();
    emit_instruction(&mut fragment, &call_inst("nowhere"), &Encodings).unwrap();

    let symbols = Symbols::default();
    assert!(apply_fragment_fixups(&backend, &mut fragment, 0, &symbols).is_err());
}
