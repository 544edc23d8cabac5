//! Controller command opcodes

/// Command opcodes of the 7.5" black/white/red panel controller
pub struct Cmd;

#[allow(missing_docs)]
impl Cmd {
    // Init
    pub const PANEL_SETTING: u8 = 0x00;
    pub const POWER_SETTING: u8 = 0x01;
    pub const POWER_ON: u8 = 0x04;
    pub const RESOLUTION_SETTING: u8 = 0x61;

    // Update
    pub const DATA_START_TRANSMISSION_1: u8 = 0x10;
    pub const DATA_START_TRANSMISSION_2: u8 = 0x13;
    pub const DISPLAY_REFRESH: u8 = 0x12;
    pub const PARTIAL_WINDOW: u8 = 0x90;
    pub const PARTIAL_IN: u8 = 0x91;
    pub const PARTIAL_OUT: u8 = 0x92;

    // Status and power
    pub const GET_STATUS: u8 = 0x71;
    pub const POWER_OFF: u8 = 0x02;
    pub const DEEP_SLEEP: u8 = 0x07;
}

impl Cmd {
    /// Human readable opcode name for logs
    pub fn name(command: u8) -> &'static str {
        match command {
            Self::PANEL_SETTING => "PANEL_SETTING",
            Self::POWER_SETTING => "POWER_SETTING",
            Self::POWER_ON => "POWER_ON",
            Self::RESOLUTION_SETTING => "RESOLUTION_SETTING",
            Self::DATA_START_TRANSMISSION_1 => "DATA_START_TRANSMISSION_1",
            Self::DATA_START_TRANSMISSION_2 => "DATA_START_TRANSMISSION_2",
            Self::DISPLAY_REFRESH => "DISPLAY_REFRESH",
            Self::PARTIAL_WINDOW => "PARTIAL_WINDOW",
            Self::PARTIAL_IN => "PARTIAL_IN",
            Self::PARTIAL_OUT => "PARTIAL_OUT",
            Self::GET_STATUS => "GET_STATUS",
            Self::POWER_OFF => "POWER_OFF",
            Self::DEEP_SLEEP => "DEEP_SLEEP",
            _ => "UNKNOWN",
        }
    }
}
