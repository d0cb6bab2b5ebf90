//! Names for the registers observed so far. Display only; decoding never
//! depends on this table.

#[derive(Debug, Eq, PartialEq)]
pub struct RegisterInfo {
    pub address: u16,
    pub name: &'static str,
    pub description: &'static str,
}

static REGISTERS: &[RegisterInfo] = &[
    RegisterInfo {
        address: 0x1000,
        name: "PowerState",
        description: "Observed as 0x0001 when the system is running",
    },
    RegisterInfo {
        address: 0x1001,
        name: "OperationMode",
        description: "0=Auto, 1=Cool, 2=Dry, 3=Fan, 4=Heat",
    },
    // Scaling is unconfirmed; only the raw value is ever reported.
    RegisterInfo {
        address: 0x1002,
        name: "TemperatureSetpoint",
        description: "Raw setpoint; 0x00C8 seen at 68F (tentative scaling)",
    },
    RegisterInfo {
        address: 0x1003,
        name: "FanSpeed",
        description: "0=Auto, 2=Quiet, 5=Low, 8=Medium, 11=High",
    },
    RegisterInfo {
        address: 0x1108,
        name: "EnergySavingFan",
        description: "1 enables low-energy fan mode",
    },
];

pub fn lookup(address: u16) -> Option<&'static RegisterInfo> {
    REGISTERS.iter().find(|r| r.address == address)
}
