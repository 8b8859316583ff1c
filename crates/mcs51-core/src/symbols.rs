//! Display names for SFR and bit addresses, used only by the
//! disassembler; execution never consults this table.

use std::collections::HashMap;

/// Standard 8051 names keyed by unified data-space address.
///
/// SFR byte names live at `0x100 | sfr_addr`; bit names at
/// `0x100 | bit_addr` (here the P3.6/P3.7 strobe pins).
const DEFAULT_NAMES: &[(u16, &str)] = &[
    (0x180, "p0"),
    (0x181, "sp"),
    (0x182, "dpl"),
    (0x183, "dph"),
    (0x190, "p1"),
    (0x1A0, "p2"),
    (0x1B0, "p3"),
    (0x1D0, "psw"),
    (0x1E0, "acc"),
    (0x1F0, "b"),
    (0x1B6, "wr"),
    (0x1B7, "rd"),
];

/// Address-to-mnemonic mapping for disassembly output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct SymbolTable {
    names: HashMap<u16, String>,
}

impl SymbolTable {
    /// Creates an empty table; unresolved addresses render as raw hex.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a table preloaded with the standard 8051 register and
    /// strobe-pin names.
    #[must_use]
    pub fn with_default_names() -> Self {
        let mut table = Self::new();
        for (addr, name) in DEFAULT_NAMES {
            table.insert(*addr, *name);
        }
        table
    }

    /// Inserts or replaces the name at a unified data-space address.
    pub fn insert(&mut self, unified_addr: u16, name: impl Into<String>) {
        self.names.insert(unified_addr, name.into());
    }

    /// Looks up the name of an SFR direct address.
    #[must_use]
    pub fn sfr_name(&self, addr: u8) -> Option<&str> {
        self.lookup(0x100 | u16::from(addr))
    }

    /// Looks up the name of a bit address in the SFR bit region.
    #[must_use]
    pub fn bit_name(&self, bit_addr: u8) -> Option<&str> {
        self.lookup(0x100 | u16::from(bit_addr))
    }

    fn lookup(&self, unified_addr: u16) -> Option<&str> {
        self.names.get(&unified_addr).map(String::as_str)
    }
}
