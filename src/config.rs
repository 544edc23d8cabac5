//! Panel geometry, handshake timings and device paths

use crate::epd7in5b::{HEIGHT, WIDTH};

/// Everything the panel session needs to know that is not a wire constant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelConfig {
    /// Panel width in pixels, multiple of 8
    pub width: u32,
    /// Panel height in pixels
    pub height: u32,
    /// Gap between two Get-Status polls
    pub busy_poll_interval_ms: u32,
    /// Extra wait once the busy line reports ready
    pub busy_settle_ms: u32,
    /// Wait after Display-Refresh before polling
    pub refresh_settle_ms: u32,
    /// Wait after Power-On before polling
    pub power_on_settle_ms: u32,
    /// Wait after the Partial-Window parameters
    pub partial_window_settle_ms: u32,
    /// Get-Status polls before a busy-wait gives up
    pub max_busy_polls: u32,
    /// Largest data burst sent in one SPI transaction
    pub max_burst: usize,
    /// SPI device node
    pub spi_path: String,
    /// GPIO character device
    pub gpio_path: String,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            width: WIDTH,
            height: HEIGHT,
            busy_poll_interval_ms: 1,
            busy_settle_ms: 200,
            refresh_settle_ms: 100,
            power_on_settle_ms: 100,
            partial_window_settle_ms: 2,
            // A full refresh takes ~15 s on this panel; allow a minute of 1 ms polls
            max_busy_polls: 60_000,
            // spidev refuses transfers above one page by default
            max_burst: 4096,
            spi_path: "/dev/spidev0.0".to_string(),
            gpio_path: "/dev/gpiochip0".to_string(),
        }
    }
}

impl PanelConfig {
    /// Same timings, different panel size
    pub fn with_size(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }
}
