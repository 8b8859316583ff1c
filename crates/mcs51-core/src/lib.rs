//! Instruction-set simulator core for the MCS-51 (8051) family.
//!
//! The crate models one core: fetch, decode, execute, the unified data
//! space with its SFR window and bit addressing, flag derivation, and a
//! read-only disassembler sharing the engine's decode table. Program
//! memory and port pins stay on the host side of the [`SystemBus`]
//! boundary.

/// Host-side I/O boundary for program memory and port pins.
pub mod bus;
pub use bus::{NullBus, SystemBus, PORT_COUNT};

/// Fault taxonomy surfaced from the step engine.
pub mod fault;
pub use fault::Fault;

/// Memory model: internal RAM, the SFR window, and the addressing paths.
pub mod memory;
pub use memory::{
    bit_location, DataSpace, BIT_REGION_RAM_BASE, BIT_REGION_SFR_BASE, DIRECT_SFR_THRESHOLD,
    SFR_WINDOW_BASE, SFR_WINDOW_END,
};

/// Register and flag accessors layered over the memory model.
pub mod regs;
pub use regs::{
    bank_register_addr, PSW_AC, PSW_BANK_MASK, PSW_CY, PSW_OV, PSW_P, SFR_ACC, SFR_P0, SFR_P1,
    SFR_P2, SFR_P3, SFR_PSW, SFR_SP,
};

/// Opcode classification shared by the engine and the disassembler.
pub mod encoding;
pub use encoding::{classify_opcode, Opcode};

/// Instruction timing in machine cycles.
pub mod timing;
pub use timing::{machine_cycles, CLOCKS_PER_MACHINE_CYCLE};

/// Opcode handlers and arithmetic flag derivation.
pub mod execute;
pub use execute::{add_with_carry, AluFlags};

/// Read-only disassembly of the implemented opcode subset.
pub mod disasm;
pub use disasm::{disassemble, disassemble_with, DisassembledInstruction};

/// Display names for SFR and bit addresses.
pub mod symbols;
pub use symbols::SymbolTable;

/// Chip-variant parameter sets.
pub mod variant;
pub use variant::VariantConfig;

/// The simulated core and its step engine.
pub mod cpu;
pub use cpu::{DebugSnapshot, Mcs51, RunState};

#[cfg(test)]
use proptest as _;
#[cfg(test)]
use rstest as _;
