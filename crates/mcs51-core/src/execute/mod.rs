//! Opcode handlers for the implemented MCS-51 subset.
//!
//! Each handler consumes its operand bytes through the fetch path (which
//! advances the program counter), resolves its addressing mode, and
//! mutates the memory model. Handlers run to completion synchronously;
//! an instruction either retires fully or reports a fault with the core
//! left halted.

mod flags;

pub use flags::{add_with_carry, AluFlags};

use crate::bus::SystemBus;
use crate::cpu::Mcs51;
use crate::encoding::Opcode;
use crate::fault::Fault;
use crate::regs::{PSW_AC, PSW_CY, PSW_OV};

/// Dispatches one classified opcode to its handler.
pub(crate) fn execute(
    cpu: &mut Mcs51,
    bus: &mut dyn SystemBus,
    opcode: Opcode,
) -> Result<(), Fault> {
    match opcode {
        Opcode::Ljmp => ljmp(cpu, bus),
        Opcode::AddDirect => add_direct(cpu, bus),
        Opcode::MovAImm => mov_a_imm(cpu, bus),
        Opcode::MovDirectImm => mov_direct_imm(cpu, bus),
        Opcode::MovRegImm(index) => mov_reg_imm(cpu, bus, index),
        Opcode::Sjmp => sjmp(cpu, bus),
        Opcode::ClrBit => write_bit(cpu, bus, false),
        Opcode::SetbBit => write_bit(cpu, bus, true),
        Opcode::DjnzReg(index) => djnz_reg(cpu, bus, index),
        Opcode::MovADirect => mov_a_direct(cpu, bus),
        Opcode::MovAIndirect(pointer) => mov_a_indirect(cpu, pointer),
        Opcode::MovAReg(index) => mov_a_reg(cpu, index),
        Opcode::MovDirectA => mov_direct_a(cpu, bus),
        Opcode::MovIndirectA(pointer) => mov_indirect_a(cpu, pointer),
        Opcode::MovRegA(index) => mov_reg_a(cpu, index),
    }
}

fn ljmp(cpu: &mut Mcs51, bus: &mut dyn SystemBus) -> Result<(), Fault> {
    let high = cpu.fetch_byte(bus);
    let low = cpu.fetch_byte(bus);
    cpu.pc = u16::from_be_bytes([high, low]);
    Ok(())
}

fn sjmp(cpu: &mut Mcs51, bus: &mut dyn SystemBus) -> Result<(), Fault> {
    let offset = fetch_offset(cpu, bus);
    // The offset is relative to the counter after the offset byte.
    cpu.pc = cpu.pc.wrapping_add_signed(i16::from(offset));
    Ok(())
}

fn add_direct(cpu: &mut Mcs51, bus: &mut dyn SystemBus) -> Result<(), Fault> {
    let addr = cpu.fetch_byte(bus);
    let operand = cpu.data.read_direct(bus, addr)?;
    let (sum, alu) = add_with_carry(cpu.data.accum(), operand, false);
    cpu.data.set_flag(PSW_CY, alu.carry);
    cpu.data.set_flag(PSW_AC, alu.aux_carry);
    cpu.data.set_flag(PSW_OV, alu.overflow);
    cpu.data.set_accum(sum);
    Ok(())
}

fn mov_a_imm(cpu: &mut Mcs51, bus: &mut dyn SystemBus) -> Result<(), Fault> {
    let value = cpu.fetch_byte(bus);
    cpu.data.set_accum(value);
    Ok(())
}

fn mov_direct_imm(cpu: &mut Mcs51, bus: &mut dyn SystemBus) -> Result<(), Fault> {
    let addr = cpu.fetch_byte(bus);
    let value = cpu.fetch_byte(bus);
    cpu.data.write_direct(bus, addr, value)
}

fn mov_reg_imm(cpu: &mut Mcs51, bus: &mut dyn SystemBus, index: u8) -> Result<(), Fault> {
    let value = cpu.fetch_byte(bus);
    cpu.data.set_reg(index, value)
}

fn write_bit(cpu: &mut Mcs51, bus: &mut dyn SystemBus, set: bool) -> Result<(), Fault> {
    let bit_addr = cpu.fetch_byte(bus);
    cpu.data.write_bit(bus, bit_addr, set)
}

fn djnz_reg(cpu: &mut Mcs51, bus: &mut dyn SystemBus, index: u8) -> Result<(), Fault> {
    let offset = fetch_offset(cpu, bus);
    let value = cpu.data.reg(index)?.wrapping_sub(1);
    cpu.data.set_reg(index, value)?;
    if value != 0 {
        cpu.pc = cpu.pc.wrapping_add_signed(i16::from(offset));
    }
    Ok(())
}

fn mov_a_direct(cpu: &mut Mcs51, bus: &mut dyn SystemBus) -> Result<(), Fault> {
    let addr = cpu.fetch_byte(bus);
    let value = cpu.data.read_direct(bus, addr)?;
    cpu.data.set_accum(value);
    Ok(())
}

fn mov_direct_a(cpu: &mut Mcs51, bus: &mut dyn SystemBus) -> Result<(), Fault> {
    let addr = cpu.fetch_byte(bus);
    let value = cpu.data.accum();
    cpu.data.write_direct(bus, addr, value)
}

fn mov_a_reg(cpu: &mut Mcs51, index: u8) -> Result<(), Fault> {
    let value = cpu.data.reg(index)?;
    cpu.data.set_accum(value);
    Ok(())
}

fn mov_reg_a(cpu: &mut Mcs51, index: u8) -> Result<(), Fault> {
    let value = cpu.data.accum();
    cpu.data.set_reg(index, value)
}

fn mov_a_indirect(cpu: &mut Mcs51, pointer: u8) -> Result<(), Fault> {
    let addr = cpu.data.reg(pointer)?;
    let value = cpu.data.read_indirect(addr)?;
    cpu.data.set_accum(value);
    Ok(())
}

fn mov_indirect_a(cpu: &mut Mcs51, pointer: u8) -> Result<(), Fault> {
    let addr = cpu.data.reg(pointer)?;
    let value = cpu.data.accum();
    cpu.data.write_indirect(addr, value)
}

#[allow(clippy::cast_possible_wrap)]
fn fetch_offset(cpu: &mut Mcs51, bus: &mut dyn SystemBus) -> i8 {
    cpu.fetch_byte(bus) as i8
}
