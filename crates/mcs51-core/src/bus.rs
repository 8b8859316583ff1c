//! Host-side I/O boundary for program memory and port pins.

/// Number of 8-bit port groups exposed by the core (`P0..=P3`).
pub const PORT_COUNT: u8 = 4;

/// Capability interface the core calls into for every external effect.
///
/// Hosts implement whichever methods their system wires up. The defaults
/// reproduce the unbound-boundary fallback: program reads return 0, pin
/// samples return 0, and pin drives are dropped.
pub trait SystemBus {
    /// Fetches one byte of program memory.
    fn read_program_byte(&mut self, addr: u16) -> u8 {
        let _ = addr;
        0
    }

    /// Samples the external pin state of a port group (`0..=3`).
    fn read_port(&mut self, port: u8) -> u8 {
        let _ = port;
        0
    }

    /// Drives the external pin state of a port group (`0..=3`).
    fn write_port(&mut self, port: u8, value: u8) {
        let _ = (port, value);
    }
}

/// Boundary used when the host has not attached one.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullBus;

impl SystemBus for NullBus {}

#[cfg(test)]
mod tests {
    use super::{NullBus, SystemBus};

    #[test]
    fn unbound_boundary_reads_zero_and_drops_writes() {
        let mut bus = NullBus;
        assert_eq!(bus.read_program_byte(0x0000), 0);
        assert_eq!(bus.read_program_byte(0xFFFF), 0);
        assert_eq!(bus.read_port(3), 0);
        bus.write_port(0, 0xFF);
    }
}
