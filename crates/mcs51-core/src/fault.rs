use thiserror::Error;

/// Errors surfaced to the host from [`crate::Mcs51::step`].
///
/// Both conditions are fatal to the simulation: the engine latches the
/// halted run state and keeps returning the same fault from later steps.
/// The host decides whether to log, reset, or stop its loop; the core
/// never terminates the hosting process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum Fault {
    /// Decode encountered an opcode byte with no registered handler.
    ///
    /// This is a simulation-fidelity gap, not a runtime fault of the
    /// simulated program.
    #[error("unimplemented opcode 0x{opcode:02X} at 0x{pc:04X}")]
    UnimplementedOpcode {
        /// The opcode byte that failed to decode.
        opcode: u8,
        /// Program-counter value the byte was fetched from.
        pc: u16,
    },
    /// A claimed-valid data address resolved to unallocated internal RAM.
    ///
    /// Correct decode logic cannot produce this against an initialized
    /// core; it fires only when stepping before [`crate::Mcs51::initialize`]
    /// or after [`crate::Mcs51::shutdown`].
    #[error("internal RAM access at 0x{addr:04X} outside allocated range")]
    AddressOutOfRange {
        /// Unified data-space address of the failed access.
        addr: u16,
    },
}

#[cfg(test)]
mod tests {
    use super::Fault;

    #[test]
    fn fault_messages_carry_addresses() {
        let fault = Fault::UnimplementedOpcode {
            opcode: 0xA5,
            pc: 0x0123,
        };
        assert_eq!(fault.to_string(), "unimplemented opcode 0xA5 at 0x0123");

        let fault = Fault::AddressOutOfRange { addr: 0x20 };
        assert_eq!(
            fault.to_string(),
            "internal RAM access at 0x0020 outside allocated range"
        );
    }
}
