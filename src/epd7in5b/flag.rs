//! Parameter bytes sent after fixed-argument commands

/// Fixed parameter bytes that follow some of the commands in [`super::cmd::Cmd`]
pub struct Flag;

impl Flag {
    /// Power Setting (0x01): internal power for VDS/VDG, VGH/VGL = ±20V,
    /// VDH = 15V, VDL = -15V
    pub const POWER_SETTING: [u8; 4] = [0x07, 0x07, 0x3F, 0x3F];

    /// Panel Setting (0x00): LUT from OTP, KWR (3-color) mode, scan up,
    /// shift right, booster on, no soft reset
    pub const PANEL_SETTING_KWR_OTP: u8 = 0x0F;

    /// Deep Sleep (0x07) check code, anything else is ignored by the controller
    pub const DEEP_SLEEP_CHECK: u8 = 0xA5;

    /// Partial Window (0x90) last byte: gates scan both inside and outside the window
    pub const PT_SCAN: u8 = 0x01;
}
