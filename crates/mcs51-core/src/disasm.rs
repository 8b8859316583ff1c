//! Read-only disassembly mirroring the execute engine's opcode space.
//!
//! Decoding walks the same [`classify_opcode`] table the engine
//! dispatches on, so every opcode the engine handles renders here with
//! the same byte length; bytes outside the table render as a `.byte`
//! row flagged unimplemented.

use std::fmt;

use crate::bus::SystemBus;
use crate::encoding::{classify_opcode, Opcode};
use crate::memory::BIT_REGION_RAM_BASE;
use crate::symbols::SymbolTable;

/// One decoded instruction in textual form.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct DisassembledInstruction {
    /// Instruction mnemonic, or `.byte` for unimplemented encodings.
    pub mnemonic: String,
    /// Formatted operand text; empty when the form takes none.
    pub operands: String,
    /// Instruction length in bytes, opcode byte included.
    pub len_bytes: u8,
    /// `false` when the byte has no handler in the engine.
    pub is_implemented: bool,
}

impl fmt::Display for DisassembledInstruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.operands.is_empty() {
            write!(f, "{}", self.mnemonic)
        } else {
            write!(f, "{} {}", self.mnemonic, self.operands)
        }
    }
}

/// Disassembles one instruction through an arbitrary program-byte
/// reader. The reader sees the exact addresses the engine would fetch.
#[must_use]
pub fn disassemble_with<F>(
    mut read: F,
    symbols: &SymbolTable,
    addr: u16,
) -> DisassembledInstruction
where
    F: FnMut(u16) -> u8,
{
    let opcode_byte = read(addr);
    let Some(opcode) = classify_opcode(opcode_byte) else {
        return DisassembledInstruction {
            mnemonic: ".byte".to_string(),
            operands: format!("${opcode_byte:02x} ; unimplemented"),
            len_bytes: 1,
            is_implemented: false,
        };
    };

    let first = read(addr.wrapping_add(1));
    let second = read(addr.wrapping_add(2));
    let past_two = addr.wrapping_add(2);

    let (mnemonic, operands) = match opcode {
        Opcode::Ljmp => {
            let target = u16::from_be_bytes([first, second]);
            ("ljmp", format!("${target:04x}"))
        }
        Opcode::AddDirect => ("add", format!("a, {}", direct_operand(symbols, first))),
        Opcode::MovAImm => ("mov", format!("a, #${first:02x}")),
        Opcode::MovDirectImm => (
            "mov",
            format!("{}, #${second:02x}", direct_operand(symbols, first)),
        ),
        Opcode::MovRegImm(index) => ("mov", format!("r{index}, #${first:02x}")),
        Opcode::Sjmp => ("sjmp", format!("${:04x}", relative_target(past_two, first))),
        Opcode::ClrBit => ("clr", bit_operand(symbols, first)),
        Opcode::SetbBit => ("setb", bit_operand(symbols, first)),
        Opcode::DjnzReg(index) => (
            "djnz",
            format!("r{index}, ${:04x}", relative_target(past_two, first)),
        ),
        Opcode::MovADirect => ("mov", format!("a, {}", direct_operand(symbols, first))),
        Opcode::MovAIndirect(pointer) => ("mov", format!("a, @r{pointer}")),
        Opcode::MovAReg(index) => ("mov", format!("a, r{index}")),
        Opcode::MovDirectA => ("mov", format!("{}, a", direct_operand(symbols, first))),
        Opcode::MovIndirectA(pointer) => ("mov", format!("@r{pointer}, a")),
        Opcode::MovRegA(index) => ("mov", format!("r{index}, a")),
    };

    DisassembledInstruction {
        mnemonic: mnemonic.to_string(),
        operands,
        len_bytes: opcode.length_bytes(),
        is_implemented: true,
    }
}

/// Disassembles one instruction by reading program bytes from the host
/// boundary. Core state is never touched.
pub fn disassemble(
    bus: &mut dyn SystemBus,
    symbols: &SymbolTable,
    addr: u16,
) -> DisassembledInstruction {
    disassemble_with(|byte_addr| bus.read_program_byte(byte_addr), symbols, addr)
}

#[allow(clippy::cast_possible_wrap)]
fn relative_target(past_instruction: u16, offset: u8) -> u16 {
    past_instruction.wrapping_add_signed(i16::from(offset as i8))
}

fn direct_operand(symbols: &SymbolTable, addr: u8) -> String {
    if addr >= 0x80 {
        if let Some(name) = symbols.sfr_name(addr) {
            return name.to_string();
        }
    }
    format!("${addr:02x}")
}

fn bit_operand(symbols: &SymbolTable, bit_addr: u8) -> String {
    let bit_pos = bit_addr & 0x7;
    if bit_addr < 0x80 {
        let byte_addr = BIT_REGION_RAM_BASE + ((bit_addr & 0x78) >> 3);
        return format!("${byte_addr:02x}.{bit_pos}");
    }
    if let Some(name) = symbols.bit_name(bit_addr) {
        return name.to_string();
    }
    let byte_addr = bit_addr & 0xF8;
    symbols.sfr_name(byte_addr).map_or_else(
        || format!("${byte_addr:02x}.{bit_pos}"),
        |name| format!("{name}.{bit_pos}"),
    )
}
