//! Arithmetic flag derivation backing every arithmetic opcode.

/// Flag outputs of one 8-bit addition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AluFlags {
    /// Carry out of bit 7.
    pub carry: bool,
    /// Carry out of bit 3 into bit 4 (nibble carry).
    pub aux_carry: bool,
    /// Two's-complement signed overflow.
    pub overflow: bool,
}

/// Adds `a + b + carry_in` and derives the PSW arithmetic flags.
///
/// The carry-propagation vector `a ^ b ^ sum` exposes the per-bit
/// carries: bit 8 is the carry out, bit 4 the nibble carry, and overflow
/// is the carry into bit 7 differing from the carry out of it.
#[must_use]
#[allow(clippy::cast_lossless, clippy::cast_possible_truncation)]
pub const fn add_with_carry(a: u8, b: u8, carry_in: bool) -> (u8, AluFlags) {
    let sum = a as u16 + b as u16 + carry_in as u16;
    let carries = (a as u16) ^ (b as u16) ^ sum;
    let carry = sum & 0x100 != 0;
    (
        sum as u8,
        AluFlags {
            carry,
            aux_carry: carries & 0x10 != 0,
            overflow: (carries & 0x80 != 0) != carry,
        },
    )
}
