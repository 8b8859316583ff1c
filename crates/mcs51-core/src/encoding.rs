//! Closed opcode classification shared by the execute engine and the
//! disassembler, keeping the two isomorphic by construction.
//!
//! The table covers the instruction families the simulator implements;
//! any byte outside it decodes to `None` and surfaces as
//! [`crate::Fault::UnimplementedOpcode`]. New opcodes extend this enum
//! and its two lookup functions without touching any interface.

/// Handler identity of one implemented opcode.
///
/// Register-operand families carry the register (or pointer-register)
/// index decoded from the low opcode bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum Opcode {
    /// `LJMP addr16`: absolute 16-bit jump.
    Ljmp,
    /// `ADD A, direct`: add a direct-addressed byte to the accumulator.
    AddDirect,
    /// `MOV A, #imm`: load the accumulator with an immediate.
    MovAImm,
    /// `MOV direct, #imm`: store an immediate to a direct address.
    MovDirectImm,
    /// `MOV Rn, #imm`: load register `n` with an immediate.
    MovRegImm(u8),
    /// `SJMP rel`: short jump by a signed 8-bit offset.
    Sjmp,
    /// `CLR bit`: clear a bit through the read-modify-write path.
    ClrBit,
    /// `SETB bit`: set a bit through the read-modify-write path.
    SetbBit,
    /// `DJNZ Rn, rel`: decrement register `n`, branch while non-zero.
    DjnzReg(u8),
    /// `MOV A, direct`.
    MovADirect,
    /// `MOV A, @Ri`: load the accumulator register-indirectly.
    MovAIndirect(u8),
    /// `MOV A, Rn`.
    MovAReg(u8),
    /// `MOV direct, A`.
    MovDirectA,
    /// `MOV @Ri, A`: store the accumulator register-indirectly.
    MovIndirectA(u8),
    /// `MOV Rn, A`.
    MovRegA(u8),
}

/// Classifies one opcode byte into its handler identity, or `None` for
/// bytes outside the implemented subset.
#[must_use]
pub const fn classify_opcode(byte: u8) -> Option<Opcode> {
    match byte {
        0x02 => Some(Opcode::Ljmp),
        0x25 => Some(Opcode::AddDirect),
        0x74 => Some(Opcode::MovAImm),
        0x75 => Some(Opcode::MovDirectImm),
        0x78..=0x7F => Some(Opcode::MovRegImm(byte & 0x7)),
        0x80 => Some(Opcode::Sjmp),
        0xC2 => Some(Opcode::ClrBit),
        0xD2 => Some(Opcode::SetbBit),
        0xD8..=0xDF => Some(Opcode::DjnzReg(byte & 0x7)),
        0xE5 => Some(Opcode::MovADirect),
        0xE6 | 0xE7 => Some(Opcode::MovAIndirect(byte & 0x1)),
        0xE8..=0xEF => Some(Opcode::MovAReg(byte & 0x7)),
        0xF5 => Some(Opcode::MovDirectA),
        0xF6 | 0xF7 => Some(Opcode::MovIndirectA(byte & 0x1)),
        0xF8..=0xFF => Some(Opcode::MovRegA(byte & 0x7)),
        _ => None,
    }
}

impl Opcode {
    /// Total instruction length in bytes, opcode byte included.
    #[must_use]
    pub const fn length_bytes(self) -> u8 {
        match self {
            Self::Ljmp | Self::MovDirectImm => 3,
            Self::AddDirect
            | Self::MovAImm
            | Self::MovRegImm(_)
            | Self::Sjmp
            | Self::ClrBit
            | Self::SetbBit
            | Self::DjnzReg(_)
            | Self::MovADirect
            | Self::MovDirectA => 2,
            Self::MovAIndirect(_) | Self::MovAReg(_) | Self::MovIndirectA(_) | Self::MovRegA(_) => {
                1
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{classify_opcode, Opcode};

    #[test]
    fn implemented_subset_has_the_expected_population() {
        let implemented = (0_u8..=0xFF)
            .filter(|byte| classify_opcode(*byte).is_some())
            .count();
        assert_eq!(implemented, 45);
    }

    #[test]
    fn register_families_decode_the_low_bits() {
        assert_eq!(classify_opcode(0x78), Some(Opcode::MovRegImm(0)));
        assert_eq!(classify_opcode(0x7F), Some(Opcode::MovRegImm(7)));
        assert_eq!(classify_opcode(0xDA), Some(Opcode::DjnzReg(2)));
        assert_eq!(classify_opcode(0xE7), Some(Opcode::MovAIndirect(1)));
        assert_eq!(classify_opcode(0xFC), Some(Opcode::MovRegA(4)));
    }

    #[test]
    fn unimplemented_bytes_classify_to_none() {
        assert_eq!(classify_opcode(0x00), None);
        assert_eq!(classify_opcode(0x01), None);
        assert_eq!(classify_opcode(0xA5), None);
    }

    #[test]
    fn lengths_match_operand_counts() {
        assert_eq!(Opcode::Ljmp.length_bytes(), 3);
        assert_eq!(Opcode::MovDirectImm.length_bytes(), 3);
        assert_eq!(Opcode::MovAImm.length_bytes(), 2);
        assert_eq!(Opcode::SetbBit.length_bytes(), 2);
        assert_eq!(Opcode::DjnzReg(0).length_bytes(), 2);
        assert_eq!(Opcode::MovAReg(3).length_bytes(), 1);
        assert_eq!(Opcode::MovIndirectA(0).length_bytes(), 1);
    }
}
