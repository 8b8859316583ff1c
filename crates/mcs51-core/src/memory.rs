//! Memory model: internal RAM, the SFR window, and the four 8051
//! addressing paths (unified, direct, register-indirect, bit).
//!
//! The unified data space places internal RAM at `0x000..2^data_bits` and
//! the 256-byte SFR window at [`SFR_WINDOW_BASE`]`..`[`SFR_WINDOW_END`].
//! Direct 8-bit addresses split at [`DIRECT_SFR_THRESHOLD`]: below it they
//! resolve to RAM, at or above it to the SFR window. Register-indirect
//! addressing reaches RAM only, never the SFR window, which models the
//! hardware distinction between the two paths.

use crate::bus::SystemBus;
use crate::fault::Fault;
use crate::regs::{SFR_P0, SFR_P1, SFR_P2, SFR_P3};

/// First unified address of the SFR window.
pub const SFR_WINDOW_BASE: u16 = 0x100;
/// One past the last unified address of the SFR window.
pub const SFR_WINDOW_END: u16 = 0x200;
/// Direct addresses at or above this value resolve to the SFR window.
pub const DIRECT_SFR_THRESHOLD: u8 = 0x80;

/// First bit-addressable byte in low internal RAM.
pub const BIT_REGION_RAM_BASE: u8 = 0x20;
/// First bit-addressable byte in the SFR space.
pub const BIT_REGION_SFR_BASE: u8 = 0x80;

/// Resolves a bit-address number to its enclosing byte address and bit
/// position.
///
/// Bit addresses below `0x80` map into the low-RAM bit region (bytes
/// `0x20..=0x2F`, one byte per group); addresses at or above `0x80` map
/// into the bit-addressable SFRs (bytes `0x80, 0x88, .., 0xF8`, eight
/// bytes per group).
#[must_use]
pub const fn bit_location(bit_addr: u8) -> (u8, u8) {
    let group = (bit_addr & 0x78) >> 3;
    let byte_addr = if bit_addr >= DIRECT_SFR_THRESHOLD {
        BIT_REGION_SFR_BASE + group * 8
    } else {
        BIT_REGION_RAM_BASE + group
    };
    (byte_addr, bit_addr & 0x7)
}

/// Owned data space of one simulated core: internal RAM plus the SFR
/// window, reached through the four hardware addressing paths.
///
/// RAM is unallocated until [`DataSpace::allocate`] runs (the core calls
/// it from `initialize`); accesses that hit a claimed-valid RAM address
/// while unallocated report [`Fault::AddressOutOfRange`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataSpace {
    iram: Box<[u8]>,
    sfr: [u8; 256],
    data_bits: u8,
    rwm: bool,
}

impl DataSpace {
    /// Creates a data space for a `data_bits`-wide internal address bus.
    ///
    /// No RAM is allocated yet; see [`DataSpace::allocate`].
    #[must_use]
    pub fn new(data_bits: u8) -> Self {
        Self {
            iram: Box::default(),
            sfr: [0; 256],
            data_bits,
            rwm: false,
        }
    }

    /// Allocates and zeroes `2^data_bits` bytes of internal RAM and
    /// clears the SFR window.
    pub fn allocate(&mut self) {
        self.iram = vec![0; self.ram_size()].into_boxed_slice();
        self.sfr = [0; 256];
        self.rwm = false;
    }

    /// Releases internal RAM.
    pub fn release(&mut self) {
        self.iram = Box::default();
    }

    /// Configured internal RAM size in bytes (`2^data_bits`).
    #[must_use]
    pub const fn ram_size(&self) -> usize {
        1 << self.data_bits
    }

    /// Returns `true` while internal RAM is allocated.
    #[must_use]
    pub const fn is_allocated(&self) -> bool {
        !self.iram.is_empty()
    }

    /// Reads one byte from the unified data space.
    ///
    /// Routes to internal RAM below `2^data_bits`, to the SFR backing
    /// store inside the SFR window, and reads 0 everywhere else. This
    /// path never samples port pins; it sees the stored latch.
    ///
    /// # Errors
    ///
    /// Returns [`Fault::AddressOutOfRange`] when `addr` claims a RAM
    /// location but no RAM is allocated.
    pub fn read_byte(&self, addr: u16) -> Result<u8, Fault> {
        if usize::from(addr) < self.ram_size() {
            return self
                .iram
                .get(usize::from(addr))
                .copied()
                .ok_or(Fault::AddressOutOfRange { addr });
        }
        if (SFR_WINDOW_BASE..SFR_WINDOW_END).contains(&addr) {
            return Ok(self.sfr[usize::from(addr & 0xFF)]);
        }
        Ok(0)
    }

    /// Writes one byte into the unified data space.
    ///
    /// Same routing as [`DataSpace::read_byte`]; writes outside both
    /// regions are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`Fault::AddressOutOfRange`] when `addr` claims a RAM
    /// location but no RAM is allocated.
    pub fn write_byte(&mut self, addr: u16, value: u8) -> Result<(), Fault> {
        if usize::from(addr) < self.ram_size() {
            return self
                .iram
                .get_mut(usize::from(addr))
                .map(|slot| *slot = value)
                .ok_or(Fault::AddressOutOfRange { addr });
        }
        if (SFR_WINDOW_BASE..SFR_WINDOW_END).contains(&addr) {
            self.sfr[usize::from(addr & 0xFF)] = value;
        }
        Ok(())
    }

    /// Reads through the direct addressing path used by most opcodes.
    ///
    /// Addresses below [`DIRECT_SFR_THRESHOLD`] resolve to internal RAM;
    /// the rest resolve to the SFR window, where port registers sample
    /// external pins ANDed with the latch (latch only while a bit
    /// read-modify-write is in flight).
    ///
    /// # Errors
    ///
    /// Returns [`Fault::AddressOutOfRange`] when RAM is unallocated.
    pub fn read_direct(&self, bus: &mut dyn SystemBus, addr: u8) -> Result<u8, Fault> {
        if addr < DIRECT_SFR_THRESHOLD {
            self.read_byte(u16::from(addr))
        } else {
            self.read_sfr(bus, addr)
        }
    }

    /// Writes through the direct addressing path.
    ///
    /// # Errors
    ///
    /// Returns [`Fault::AddressOutOfRange`] when RAM is unallocated.
    pub fn write_direct(
        &mut self,
        bus: &mut dyn SystemBus,
        addr: u8,
        value: u8,
    ) -> Result<(), Fault> {
        if addr < DIRECT_SFR_THRESHOLD {
            self.write_byte(u16::from(addr), value)
        } else {
            self.write_sfr(bus, addr, value)
        }
    }

    /// Reads through the register-indirect path.
    ///
    /// Indirect addressing reaches internal RAM only; addresses that
    /// would alias an SFR in direct mode read 0 here.
    ///
    /// # Errors
    ///
    /// Returns [`Fault::AddressOutOfRange`] when RAM is unallocated.
    pub fn read_indirect(&self, addr: u8) -> Result<u8, Fault> {
        if usize::from(addr) < self.ram_size() {
            self.iram
                .get(usize::from(addr))
                .copied()
                .ok_or(Fault::AddressOutOfRange {
                    addr: u16::from(addr),
                })
        } else {
            Ok(0)
        }
    }

    /// Writes through the register-indirect path; writes beyond the RAM
    /// region are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`Fault::AddressOutOfRange`] when RAM is unallocated.
    pub fn write_indirect(&mut self, addr: u8, value: u8) -> Result<(), Fault> {
        if usize::from(addr) < self.ram_size() {
            self.iram
                .get_mut(usize::from(addr))
                .map(|slot| *slot = value)
                .ok_or(Fault::AddressOutOfRange {
                    addr: u16::from(addr),
                })
        } else {
            Ok(())
        }
    }

    /// Reads a single bit through the bit addressing path.
    ///
    /// Port bits sample external pins like any other direct read.
    ///
    /// # Errors
    ///
    /// Returns [`Fault::AddressOutOfRange`] when RAM is unallocated.
    pub fn read_bit(&self, bus: &mut dyn SystemBus, bit_addr: u8) -> Result<bool, Fault> {
        let (byte_addr, bit_pos) = bit_location(bit_addr);
        let value = self.read_direct(bus, byte_addr)?;
        Ok(value & (1 << bit_pos) != 0)
    }

    /// Sets or clears a single bit through the read-modify-write path.
    ///
    /// While the read/modify/write sequence is in flight the RMW flag is
    /// raised, so the enclosing-byte read returns the port latch instead
    /// of sampling pins, as the hardware does.
    ///
    /// # Errors
    ///
    /// Returns [`Fault::AddressOutOfRange`] when RAM is unallocated.
    pub fn write_bit(&mut self, bus: &mut dyn SystemBus, bit_addr: u8, set: bool) -> Result<(), Fault> {
        let (byte_addr, bit_pos) = bit_location(bit_addr);
        self.rwm = true;
        let outcome = match self.read_direct(bus, byte_addr) {
            Ok(value) => {
                let value = if set {
                    value | (1 << bit_pos)
                } else {
                    value & !(1 << bit_pos)
                };
                self.write_direct(bus, byte_addr, value)
            }
            Err(fault) => Err(fault),
        };
        self.rwm = false;
        outcome
    }

    /// Raw SFR backing-store read, bypassing port pin sampling.
    pub(crate) fn sfr_read(&self, addr: u8) -> u8 {
        self.sfr[usize::from(addr)]
    }

    /// Raw SFR backing-store write, bypassing port drives.
    pub(crate) fn sfr_write(&mut self, addr: u8, value: u8) {
        self.sfr[usize::from(addr)] = value;
    }

    fn read_sfr(&self, bus: &mut dyn SystemBus, addr: u8) -> Result<u8, Fault> {
        let latch = self.read_byte(SFR_WINDOW_BASE | u16::from(addr))?;
        if matches!(addr, SFR_P0 | SFR_P1 | SFR_P2 | SFR_P3) && !self.rwm {
            return Ok(latch & bus.read_port(port_index(addr)));
        }
        Ok(latch)
    }

    fn write_sfr(&mut self, bus: &mut dyn SystemBus, addr: u8, value: u8) -> Result<(), Fault> {
        // No SFR exists below the threshold; such writes are rejected.
        if addr < DIRECT_SFR_THRESHOLD {
            return Ok(());
        }
        if matches!(addr, SFR_P0 | SFR_P1 | SFR_P2 | SFR_P3) {
            bus.write_port(port_index(addr), value);
        }
        self.write_byte(SFR_WINDOW_BASE | u16::from(addr), value)
    }
}

const fn port_index(sfr_addr: u8) -> u8 {
    (sfr_addr - 0x80) >> 4
}
