//! Register and flag accessors: semantic views layered over the memory
//! model. None of these hold state of their own; every accessor reads or
//! writes the SFR window or banked RAM on each call.

use crate::fault::Fault;
use crate::memory::DataSpace;

/// Port 0 latch SFR address.
pub const SFR_P0: u8 = 0x80;
/// Stack pointer SFR address.
pub const SFR_SP: u8 = 0x81;
/// Port 1 latch SFR address.
pub const SFR_P1: u8 = 0x90;
/// Port 2 latch SFR address.
pub const SFR_P2: u8 = 0xA0;
/// Port 3 latch SFR address.
pub const SFR_P3: u8 = 0xB0;
/// Program status word SFR address.
pub const SFR_PSW: u8 = 0xD0;
/// Accumulator SFR address.
pub const SFR_ACC: u8 = 0xE0;

/// PSW bit position of the carry flag.
pub const PSW_CY: u8 = 7;
/// PSW bit position of the auxiliary-carry flag.
pub const PSW_AC: u8 = 6;
/// PSW bit position of the overflow flag.
pub const PSW_OV: u8 = 2;
/// PSW bit position of the parity flag.
pub const PSW_P: u8 = 0;
/// PSW mask of the register-bank-select bits (RS1:RS0).
pub const PSW_BANK_MASK: u8 = 0x18;

/// Computes the internal RAM address of banked register `index` for a
/// given PSW value. Bank selection is implicit in every register access.
#[must_use]
pub const fn bank_register_addr(psw: u8, index: u8) -> u8 {
    (psw & PSW_BANK_MASK) | (index & 0x7)
}

impl DataSpace {
    /// Reads the accumulator.
    #[must_use]
    pub fn accum(&self) -> u8 {
        self.sfr_read(SFR_ACC)
    }

    /// Writes the accumulator.
    pub fn set_accum(&mut self, value: u8) {
        self.sfr_write(SFR_ACC, value);
    }

    /// Reads the program status word.
    #[must_use]
    pub fn psw(&self) -> u8 {
        self.sfr_read(SFR_PSW)
    }

    /// Writes the program status word.
    pub fn set_psw(&mut self, value: u8) {
        self.sfr_write(SFR_PSW, value);
    }

    /// Reads the stack pointer.
    #[must_use]
    pub fn sp(&self) -> u8 {
        self.sfr_read(SFR_SP)
    }

    /// Writes the stack pointer.
    pub fn set_sp(&mut self, value: u8) {
        self.sfr_write(SFR_SP, value);
    }

    /// Reads the stored latch of port `0..=3`, without sampling pins.
    #[must_use]
    pub fn port_latch(&self, port: u8) -> u8 {
        self.sfr_read(SFR_P0 + (port & 3) * 0x10)
    }

    /// Returns a single PSW flag bit.
    #[must_use]
    pub fn flag(&self, bit: u8) -> bool {
        self.psw() & (1 << bit) != 0
    }

    /// Sets or clears a single PSW flag bit.
    pub fn set_flag(&mut self, bit: u8, set: bool) {
        let psw = self.psw();
        if set {
            self.set_psw(psw | (1 << bit));
        } else {
            self.set_psw(psw & !(1 << bit));
        }
    }

    /// Reads banked register `R0..=R7` through the current PSW bank bits.
    ///
    /// # Errors
    ///
    /// Returns [`Fault::AddressOutOfRange`] when internal RAM is
    /// unallocated.
    pub fn reg(&self, index: u8) -> Result<u8, Fault> {
        let addr = bank_register_addr(self.psw(), index);
        self.read_byte(u16::from(addr))
    }

    /// Writes banked register `R0..=R7` through the current PSW bank bits.
    ///
    /// # Errors
    ///
    /// Returns [`Fault::AddressOutOfRange`] when internal RAM is
    /// unallocated.
    pub fn set_reg(&mut self, index: u8, value: u8) -> Result<(), Fault> {
        let addr = bank_register_addr(self.psw(), index);
        self.write_byte(u16::from(addr), value)
    }

    /// Recomputes PSW parity from the accumulator's bit pattern.
    ///
    /// The parity bit is the XOR of all eight accumulator bits; the
    /// engine invokes this after every instruction, whether or not the
    /// instruction touched the accumulator.
    pub fn recompute_parity(&mut self) {
        let odd = self.accum().count_ones() & 1 == 1;
        self.set_flag(PSW_P, odd);
    }
}

#[cfg(test)]
mod tests {
    use super::{bank_register_addr, PSW_CY, PSW_P};
    use crate::memory::DataSpace;

    fn allocated() -> DataSpace {
        let mut data = DataSpace::new(7);
        data.allocate();
        data
    }

    #[test]
    fn bank_address_combines_psw_bits_with_register_index() {
        assert_eq!(bank_register_addr(0x00, 0), 0x00);
        assert_eq!(bank_register_addr(0x00, 7), 0x07);
        assert_eq!(bank_register_addr(0x08, 0), 0x08);
        assert_eq!(bank_register_addr(0x10, 3), 0x13);
        assert_eq!(bank_register_addr(0x18, 7), 0x1F);
        // Only the bank-select bits of PSW participate.
        assert_eq!(bank_register_addr(0xE7, 2), 0x02);
    }

    #[test]
    fn register_access_is_a_view_into_banked_ram() {
        let mut data = allocated();
        data.set_reg(1, 0xAB).unwrap();
        assert_eq!(data.read_byte(0x0001), Ok(0xAB));

        data.set_psw(0x08);
        data.set_reg(1, 0xCD).unwrap();
        assert_eq!(data.read_byte(0x0009), Ok(0xCD));

        // Bank 0 contents survive the switch.
        data.set_psw(0x00);
        assert_eq!(data.reg(1), Ok(0xAB));
    }

    #[test]
    fn flag_bits_round_trip_through_psw() {
        let mut data = allocated();
        data.set_flag(PSW_CY, true);
        assert!(data.flag(PSW_CY));
        assert_eq!(data.psw(), 0x80);
        data.set_flag(PSW_CY, false);
        assert_eq!(data.psw(), 0x00);
    }

    #[test]
    fn parity_is_the_xor_of_accumulator_bits() {
        let mut data = allocated();

        data.set_accum(0xFF);
        data.recompute_parity();
        assert!(!data.flag(PSW_P));

        data.set_accum(0x01);
        data.recompute_parity();
        assert!(data.flag(PSW_P));

        data.set_accum(0x00);
        data.recompute_parity();
        assert!(!data.flag(PSW_P));
    }

    #[test]
    fn port_latches_are_sfr_aliases() {
        let mut data = allocated();
        data.sfr_write(super::SFR_P2, 0x5A);
        assert_eq!(data.port_latch(2), 0x5A);
    }
}
