//! Chip-variant parameter sets.
//!
//! A variant is purely a parameter set: bus widths and a symbol-table
//! overlay. Variants never fork decode or execution logic.

use crate::symbols::SymbolTable;

/// Parameters distinguishing one chip variant.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct VariantConfig {
    /// Program address-bus width in bits; fetch addresses are masked to
    /// this width. 0 disables masking.
    pub program_addr_bits: u8,
    /// Internal data address-bus width in bits; RAM size is
    /// `2^data_addr_bits`.
    pub data_addr_bits: u8,
    /// Symbol overlay consumed by the disassembler.
    pub symbols: SymbolTable,
}

impl VariantConfig {
    /// The 8051 mask-ROM part: 12-bit program bus, 128 bytes of RAM.
    #[must_use]
    pub fn i8051() -> Self {
        Self {
            program_addr_bits: 12,
            data_addr_bits: 7,
            symbols: SymbolTable::with_default_names(),
        }
    }

    /// The 8751 EPROM part. Electrically a different package; as far as
    /// the simulator is concerned the parameters match the 8051.
    #[must_use]
    pub fn i8751() -> Self {
        Self::i8051()
    }
}

impl Default for VariantConfig {
    fn default() -> Self {
        Self::i8051()
    }
}
