//! Instruction timing in architectural machine cycles.

use crate::encoding::Opcode;

/// Clock cycles per machine cycle; the engine reports all timing in
/// clock-cycle units.
pub const CLOCKS_PER_MACHINE_CYCLE: u32 = 12;

/// Machine cycles consumed by one instruction.
///
/// Costs are fixed per opcode; `DJNZ` pays its two-cycle cost whether or
/// not the branch is taken.
#[must_use]
pub const fn machine_cycles(opcode: Opcode) -> u32 {
    match opcode {
        Opcode::Ljmp | Opcode::Sjmp | Opcode::DjnzReg(_) | Opcode::MovDirectImm => 2,
        Opcode::AddDirect
        | Opcode::MovAImm
        | Opcode::MovRegImm(_)
        | Opcode::ClrBit
        | Opcode::SetbBit
        | Opcode::MovADirect
        | Opcode::MovAIndirect(_)
        | Opcode::MovAReg(_)
        | Opcode::MovDirectA
        | Opcode::MovIndirectA(_)
        | Opcode::MovRegA(_) => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::{machine_cycles, CLOCKS_PER_MACHINE_CYCLE};
    use crate::encoding::{classify_opcode, Opcode};

    #[test]
    fn branching_and_two_byte_store_forms_cost_two_cycles() {
        assert_eq!(machine_cycles(Opcode::Ljmp), 2);
        assert_eq!(machine_cycles(Opcode::Sjmp), 2);
        assert_eq!(machine_cycles(Opcode::DjnzReg(5)), 2);
        assert_eq!(machine_cycles(Opcode::MovDirectImm), 2);
    }

    #[test]
    fn remaining_forms_cost_one_cycle() {
        assert_eq!(machine_cycles(Opcode::AddDirect), 1);
        assert_eq!(machine_cycles(Opcode::MovAImm), 1);
        assert_eq!(machine_cycles(Opcode::SetbBit), 1);
        assert_eq!(machine_cycles(Opcode::MovRegA(7)), 1);
    }

    #[test]
    fn every_implemented_opcode_has_a_positive_cost() {
        for byte in 0_u8..=0xFF {
            if let Some(opcode) = classify_opcode(byte) {
                let clocks = machine_cycles(opcode) * CLOCKS_PER_MACHINE_CYCLE;
                assert!(clocks == 12 || clocks == 24, "opcode 0x{byte:02X}");
            }
        }
    }
}
