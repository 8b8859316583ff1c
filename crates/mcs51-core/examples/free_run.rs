//! Runs a small countdown program against a ROM-backed bus and prints a
//! per-instruction trace with disassembly and the final core state.

use mcs51_core::{Mcs51, SystemBus, VariantConfig};
use proptest as _;
use rstest as _;
#[cfg(feature = "serde")]
use serde as _;
use thiserror as _;

struct RomBus {
    rom: Vec<u8>,
}

impl SystemBus for RomBus {
    fn read_program_byte(&mut self, addr: u16) -> u8 {
        self.rom.get(usize::from(addr)).copied().unwrap_or(0)
    }

    fn write_port(&mut self, port: u8, value: u8) {
        println!("        port P{port} <- {value:#04x}");
    }
}

fn main() {
    // MOV R2, #3; loop: MOV A, R2; ADD A, ACC; MOV P1, A;
    // DJNZ R2, loop; SJMP $ (self-loop terminates the run below).
    let rom = vec![
        0x7A, 0x03, // mov r2, #$03
        0xEA, // mov a, r2
        0x25, 0xE0, // add a, acc
        0xF5, 0x90, // mov p1, a
        0xDA, 0xF9, // djnz r2, loop
        0x80, 0xFE, // sjmp self
    ];
    let mut bus = RomBus { rom };

    let mut cpu = Mcs51::new(VariantConfig::i8051());
    cpu.initialize();

    let mut total_clocks: u64 = 0;
    for _ in 0..32 {
        let pc = cpu.pc();
        let row = cpu.disassemble(&mut bus, pc);
        match cpu.step(&mut bus) {
            Ok(clocks) => {
                total_clocks += u64::from(clocks);
                println!("{pc:04x}    {row}");
            }
            Err(fault) => {
                println!("{pc:04x}    halted: {fault}");
                break;
            }
        }
        // The terminating self-loop makes no further progress.
        if cpu.pc() == pc {
            break;
        }
    }

    let snapshot = cpu.debug_snapshot();
    println!();
    println!("clocks: {total_clocks}");
    println!(
        "pc={:04x} acc={:02x} psw={:02x} sp={:02x} r2={:02x}",
        snapshot.pc, snapshot.accum, snapshot.psw, snapshot.sp, snapshot.registers[2]
    );
}
