//! Waveshare 7.5" black/white/red e-paper panel driver
//!
//! Used in the kitchen dashboard, 800x480 pixels with the controller
//! wired to a Raspberry Pi SPI bus.
//!
//! ### Usage
//! This driver does not hide that you're working with two buffers, one for
//! black/white and one for red. To display something you:
//!
//! 1. create a [`driver::PanelSession`] over the SPI device and pins, then
//!    `open` and `init` it
//! 1. draw onto [`driver::PanelSession::framebuffer_mut`], preferably with
//!    [`embedded_graphics`](https://github.com/jamwaffles/embedded-graphics)
//! 1. kick off a display update using [`driver::PanelSession::display_refresh`]
//! 1. put the panel to sleep with [`driver::PanelSession::sleep`]

pub mod cmd;
pub mod driver;
pub mod flag;
pub mod interface;
pub mod pins;

#[cfg(feature = "linux")]
pub mod linux;

/// Display width, pixels horizontally
pub const WIDTH: u32 = 800;

/// Display height, pixels vertically
pub const HEIGHT: u32 = 480;
