use std::borrow::Cow;

use enum_repr::EnumRepr;

/// Command identifiers seen in the first four (little-endian) bytes of a
/// packet.
#[EnumRepr(type = "u32")]
#[derive(Debug, Eq, PartialEq)]
pub enum CommandId {
    Handshake0      = 0x0000_0000,
    Handshake1      = 0x0000_0001,
    Setpoint        = 0x0000_0002,
    ReadRegisters   = 0x0000_0003,
    ControlRegister = 0x0000_0004,
    BulkWrite       = 0x0000_0005,
}

impl CommandId {
    pub fn name(&self) -> &'static str {
        match self {
            CommandId::Handshake0 => "Handshake0",
            CommandId::Handshake1 => "Handshake1",
            CommandId::Setpoint => "WriteRegister",
            CommandId::ReadRegisters => "ReadRegisters",
            CommandId::ControlRegister => "WriteControlRegister",
            CommandId::BulkWrite => "BulkWrite",
        }
    }

    /// Commands that carry register writes (and their single-byte acks).
    pub fn is_write(&self) -> bool {
        match self {
            CommandId::Setpoint | CommandId::ControlRegister | CommandId::BulkWrite => true,
            CommandId::Handshake0 | CommandId::Handshake1 | CommandId::ReadRegisters => false,
        }
    }
}

/// Display name for a raw command id; ids outside the table render as
/// `Unknown(0x<HEX>)`.
pub fn command_name(command_id: u32) -> Cow<'static, str> {
    match CommandId::from_repr(command_id) {
        Some(command) => Cow::Borrowed(command.name()),
        None => Cow::Owned(format!("Unknown(0x{:X})", command_id)),
    }
}

/// One register address/value pair, both big-endian on the wire.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct RegisterValue {
    pub address: u16,
    pub value: u16,
}

impl RegisterValue {
    pub fn new(address: u16, value: u16) -> Self {
        RegisterValue { address, value }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_id_repr_test() {
        assert_eq!(CommandId::from_repr(3), Some(CommandId::ReadRegisters));
        assert_eq!(CommandId::BulkWrite.repr(), 5);
        assert_eq!(CommandId::from_repr(0x42), None);
    }

    #[test]
    fn command_name_test() {
        assert_eq!(command_name(0), "Handshake0");
        assert_eq!(command_name(2), "WriteRegister");
        assert_eq!(command_name(4), "WriteControlRegister");
        assert_eq!(command_name(0xdead_beef), "Unknown(0xDEADBEEF)");
        assert_eq!(command_name(0x1a), "Unknown(0x1A)");
    }

    #[test]
    fn write_family_test() {
        assert!(CommandId::Setpoint.is_write());
        assert!(CommandId::BulkWrite.is_write());
        assert!(!CommandId::ReadRegisters.is_write());
        assert!(!CommandId::Handshake1.is_write());
    }
}
