//! Pin assignment of the panel HAT on a Raspberry Pi
//!
//! BCM numbering, i.e. the line offsets on `/dev/gpiochip0`.

/// GPIO lines wired to the panel
pub struct Pins;

impl Pins {
    /// Reset, active low
    pub const RST: u32 = 17;
    /// Data/Command select (high for data, low for command)
    pub const DC: u32 = 25;
    /// Chip select. Driven by spidev as CE0, listed for completeness.
    pub const CS: u32 = 8;
    /// Busy input, low while the controller is working
    pub const BUSY: u32 = 24;
}
