//! The simulated core: program counter, run state, and the step engine
//! tying fetch, decode, execute, and timing together.

use crate::bus::{SystemBus, PORT_COUNT};
use crate::disasm::{disassemble_with, DisassembledInstruction};
use crate::encoding::classify_opcode;
use crate::execute;
use crate::fault::Fault;
use crate::memory::DataSpace;
use crate::regs::SFR_P0;
use crate::timing::{machine_cycles, CLOCKS_PER_MACHINE_CYCLE};
use crate::variant::VariantConfig;

/// Execution state of the core.
///
/// A fault latches [`RunState::Halted`]; every later [`Mcs51::step`]
/// returns the same fault until [`Mcs51::initialize`] resets the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum RunState {
    /// The core accepts step requests.
    Running,
    /// The core refused to continue after the contained fault.
    Halted(Fault),
}

impl RunState {
    /// The latched fault, if the core has halted.
    #[must_use]
    pub const fn latched_fault(self) -> Option<Fault> {
        match self {
            Self::Running => None,
            Self::Halted(fault) => Some(fault),
        }
    }
}

/// Point-in-time view of the architecturally visible core state, read
/// leniently so it works against an uninitialized core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct DebugSnapshot {
    /// Program counter.
    pub pc: u16,
    /// Program status word.
    pub psw: u8,
    /// Accumulator.
    pub accum: u8,
    /// Stack pointer.
    pub sp: u8,
    /// The currently selected register bank, `R0..=R7`.
    pub registers: [u8; 8],
}

/// One simulated MCS-51 core.
///
/// The core owns its program counter and data space; program memory and
/// port pins live on the host side of the [`SystemBus`] boundary, passed
/// into each call that needs them.
#[derive(Debug)]
pub struct Mcs51 {
    pub(crate) pc: u16,
    pub(crate) data: DataSpace,
    run_state: RunState,
    variant: VariantConfig,
}

impl Mcs51 {
    /// Creates a core for the given variant. No RAM is allocated until
    /// [`Mcs51::initialize`] runs; stepping before that faults.
    #[must_use]
    pub fn new(variant: VariantConfig) -> Self {
        let data = DataSpace::new(variant.data_addr_bits);
        Self {
            pc: 0,
            data,
            run_state: RunState::Running,
            variant,
        }
    }

    /// Resets the core to its power-on state.
    ///
    /// Internal RAM is allocated and zeroed, the program counter, PSW,
    /// and accumulator clear, the stack pointer loads `0x07`, and all
    /// four port latches load `0xFF`. Reset touches latches only; no pin
    /// drive reaches the boundary.
    pub fn initialize(&mut self) {
        self.data.allocate();
        self.pc = 0;
        self.data.set_sp(0x07);
        for port in 0..PORT_COUNT {
            self.data.sfr_write(SFR_P0 + port * 0x10, 0xFF);
        }
        self.run_state = RunState::Running;
    }

    /// Releases internal RAM. The core keeps its configuration and can
    /// be re-initialized, but stepping a shut-down core faults.
    pub fn shutdown(&mut self) {
        self.data.release();
    }

    /// Executes one instruction and reports its cost in clock cycles.
    ///
    /// The instruction retires fully before this returns; there is no
    /// partial progress. After every instruction the PSW parity bit is
    /// recomputed from the accumulator.
    ///
    /// # Errors
    ///
    /// Returns [`Fault::UnimplementedOpcode`] for bytes outside the
    /// implemented subset and [`Fault::AddressOutOfRange`] for RAM access
    /// against an uninitialized core. Either fault halts the core, and
    /// later calls keep returning the latched fault.
    pub fn step(&mut self, bus: &mut dyn SystemBus) -> Result<u32, Fault> {
        if let Some(fault) = self.run_state.latched_fault() {
            return Err(fault);
        }

        let fetch_pc = self.pc & self.program_mask();
        let opcode_byte = self.fetch_byte(bus);
        let Some(opcode) = classify_opcode(opcode_byte) else {
            return Err(self.halt(Fault::UnimplementedOpcode {
                opcode: opcode_byte,
                pc: fetch_pc,
            }));
        };

        if let Err(fault) = execute::execute(self, bus, opcode) {
            return Err(self.halt(fault));
        }
        self.data.recompute_parity();
        Ok(machine_cycles(opcode) * CLOCKS_PER_MACHINE_CYCLE)
    }

    /// Disassembles the instruction at `addr` without touching core
    /// state. Fetches follow the same program-bus masking as execution.
    pub fn disassemble(&self, bus: &mut dyn SystemBus, addr: u16) -> DisassembledInstruction {
        let mask = self.program_mask();
        disassemble_with(
            |byte_addr| bus.read_program_byte(byte_addr & mask),
            &self.variant.symbols,
            addr,
        )
    }

    /// Captures the architecturally visible state for inspection.
    ///
    /// Reads are lenient: against an unallocated core the banked
    /// registers report 0 rather than faulting.
    #[must_use]
    pub fn debug_snapshot(&self) -> DebugSnapshot {
        let mut registers = [0; 8];
        for (index, slot) in registers.iter_mut().enumerate() {
            #[allow(clippy::cast_possible_truncation)]
            let reg = self.data.reg(index as u8);
            *slot = reg.unwrap_or_default();
        }
        DebugSnapshot {
            pc: self.pc,
            psw: self.data.psw(),
            accum: self.data.accum(),
            sp: self.data.sp(),
            registers,
        }
    }

    /// Current program counter.
    #[must_use]
    pub const fn pc(&self) -> u16 {
        self.pc
    }

    /// Current run state.
    #[must_use]
    pub const fn run_state(&self) -> RunState {
        self.run_state
    }

    /// The variant this core was built for.
    #[must_use]
    pub const fn variant(&self) -> &VariantConfig {
        &self.variant
    }

    /// Read access to the data space.
    #[must_use]
    pub const fn data(&self) -> &DataSpace {
        &self.data
    }

    /// Mutable access to the data space, for hosts seeding RAM or SFRs.
    #[allow(clippy::missing_const_for_fn)]
    pub fn data_mut(&mut self) -> &mut DataSpace {
        &mut self.data
    }

    /// Fetches the program byte at the masked program counter and
    /// advances the counter. Masking applies per fetch, not to the
    /// stored counter value.
    pub(crate) fn fetch_byte(&mut self, bus: &mut dyn SystemBus) -> u8 {
        let byte = bus.read_program_byte(self.pc & self.program_mask());
        self.pc = self.pc.wrapping_add(1);
        byte
    }

    const fn program_mask(&self) -> u16 {
        let bits = self.variant.program_addr_bits;
        if bits == 0 || bits >= 16 {
            0xFFFF
        } else {
            (1 << bits) - 1
        }
    }

    #[allow(clippy::missing_const_for_fn)]
    fn halt(&mut self, fault: Fault) -> Fault {
        self.run_state = RunState::Halted(fault);
        fault
    }
}

#[cfg(test)]
mod tests {
    use super::{Mcs51, RunState};
    use crate::bus::{NullBus, SystemBus};
    use crate::fault::Fault;
    use crate::variant::VariantConfig;

    struct RomBus {
        rom: Vec<u8>,
        fetches: Vec<u16>,
    }

    impl RomBus {
        fn new(rom: &[u8]) -> Self {
            Self {
                rom: rom.to_vec(),
                fetches: Vec::new(),
            }
        }
    }

    impl SystemBus for RomBus {
        fn read_program_byte(&mut self, addr: u16) -> u8 {
            self.fetches.push(addr);
            self.rom.get(usize::from(addr)).copied().unwrap_or(0)
        }
    }

    fn initialized() -> Mcs51 {
        let mut cpu = Mcs51::new(VariantConfig::i8051());
        cpu.initialize();
        cpu
    }

    #[test]
    fn initialize_applies_the_reset_values() {
        let cpu = initialized();
        let snapshot = cpu.debug_snapshot();
        assert_eq!(snapshot.pc, 0);
        assert_eq!(snapshot.psw, 0);
        assert_eq!(snapshot.accum, 0);
        assert_eq!(snapshot.sp, 0x07);
        for port in 0..4 {
            assert_eq!(cpu.data().port_latch(port), 0xFF);
        }
    }

    #[test]
    fn fetch_masks_the_program_counter_per_read() {
        let mut cpu = initialized();
        let mut bus = RomBus::new(&[0x74, 0xAA]);
        // A 12-bit program bus wraps 0x1000 to 0x0000 on fetch.
        cpu.pc = 0x1000;
        cpu.step(&mut bus).unwrap();
        assert_eq!(bus.fetches, vec![0x0000, 0x0001]);
        assert_eq!(cpu.pc(), 0x1002);
        assert_eq!(cpu.data().accum(), 0xAA);
    }

    #[test]
    fn unimplemented_opcode_halts_and_latches() {
        let mut cpu = initialized();
        let mut bus = NullBus;

        let fault = Fault::UnimplementedOpcode { opcode: 0, pc: 0 };
        assert_eq!(cpu.step(&mut bus), Err(fault));
        assert_eq!(cpu.run_state(), RunState::Halted(fault));
        assert_eq!(cpu.run_state().latched_fault(), Some(fault));

        // The latch holds across further steps.
        assert_eq!(cpu.step(&mut bus), Err(fault));
        assert_eq!(cpu.step(&mut bus), Err(fault));
    }

    #[test]
    fn initialize_clears_a_latched_fault() {
        let mut cpu = initialized();
        let mut bus = NullBus;
        assert!(cpu.step(&mut bus).is_err());

        cpu.initialize();
        assert_eq!(cpu.run_state(), RunState::Running);
        let mut bus = RomBus::new(&[0x74, 0x01]);
        assert_eq!(cpu.step(&mut bus), Ok(12));
    }

    #[test]
    fn stepping_a_shut_down_core_reports_address_out_of_range() {
        let mut cpu = initialized();
        cpu.shutdown();
        // MOV Rn, #imm writes banked RAM, which is gone.
        let mut bus = RomBus::new(&[0x78, 0x42]);
        assert_eq!(
            cpu.step(&mut bus),
            Err(Fault::AddressOutOfRange { addr: 0x0000 })
        );
        assert!(cpu.run_state().latched_fault().is_some());
    }

    #[test]
    fn snapshot_reads_are_lenient_before_initialize() {
        let cpu = Mcs51::new(VariantConfig::i8051());
        let snapshot = cpu.debug_snapshot();
        assert_eq!(snapshot.registers, [0; 8]);
        assert_eq!(snapshot.sp, 0);
    }

    #[test]
    fn disassemble_applies_program_masking_without_state_changes() {
        let cpu = initialized();
        let mut bus = RomBus::new(&[0x02, 0x0A, 0xBC]);
        let row = cpu.disassemble(&mut bus, 0x1000);
        assert_eq!(row.to_string(), "ljmp $0abc");
        assert_eq!(bus.fetches, vec![0x0000, 0x0001, 0x0002]);
        assert_eq!(cpu.pc(), 0);
    }
}
