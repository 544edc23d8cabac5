//! Error type shared by the framebuffer, compositing and panel code

use core::convert::Infallible;
use std::path::PathBuf;

pub use display_interface::DisplayError;

use crate::epd7in5b::driver::SessionState;

/// Everything that can go wrong between composing a frame and putting it on the panel
#[derive(Debug)]
pub enum PaperError {
    /// Framebuffer width is not a multiple of 8
    UnalignedWidth {
        /// Requested width in pixels
        width: u32,
    },
    /// Control lines or the SPI channel could not be claimed
    HardwareAcquisition(String),
    /// The busy line never reported ready
    HardwareTimeout {
        /// Get-Status polls issued before giving up
        attempts: u32,
    },
    /// The busy line could not be read
    BusyLine,
    /// A bus or pin operation failed mid-command
    Interface(DisplayError),
    /// A protocol step was requested in a state that does not allow it
    Sequence {
        /// The step that was refused
        operation: &'static str,
        /// State the session was in
        state: SessionState,
    },
    /// Partial-refresh window with an x origin or width off the 8-pixel grid
    MisalignedWindow {
        /// Window x origin
        x: u32,
        /// Window width
        width: u32,
    },
    /// Partial-refresh window that is empty or extends past the panel
    WindowOutOfBounds {
        /// Window x origin
        x: u32,
        /// Window y origin
        y: u32,
        /// Window width
        width: u32,
        /// Window height
        height: u32,
    },
    /// Photo bytes could not be decoded
    Decode(image::ImageError),
    /// No photo to show
    MissingSource {
        /// Where we looked
        path: PathBuf,
        /// Why nothing came back
        reason: String,
    },
}

impl core::fmt::Display for PaperError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::UnalignedWidth { width } => {
                write!(f, "framebuffer width {} is not a multiple of 8", width)
            }
            Self::HardwareAcquisition(reason) => {
                write!(f, "acquiring panel control lines: {}", reason)
            }
            Self::HardwareTimeout { attempts } => {
                write!(f, "panel still busy after {} status polls", attempts)
            }
            Self::BusyLine => f.write_str("reading the panel busy line failed"),
            Self::Interface(e) => write!(f, "panel interface error: {:?}", e),
            Self::Sequence { operation, state } => {
                write!(f, "cannot {} while the panel session is {}", operation, state)
            }
            Self::MisalignedWindow { x, width } => write!(
                f,
                "partial window x={} width={} is not aligned to 8 pixels",
                x, width
            ),
            Self::WindowOutOfBounds {
                x,
                y,
                width,
                height,
            } => write!(
                f,
                "partial window {}x{} at ({}, {}) is empty or outside the panel",
                width, height, x, y
            ),
            Self::Decode(e) => write!(f, "decoding photo: {}", e),
            Self::MissingSource { path, reason } => {
                write!(f, "no photo from {}: {}", path.display(), reason)
            }
        }
    }
}

impl std::error::Error for PaperError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Decode(e) => Some(e),
            _ => None,
        }
    }
}

impl From<DisplayError> for PaperError {
    fn from(e: DisplayError) -> Self {
        Self::Interface(e)
    }
}

impl From<image::ImageError> for PaperError {
    fn from(e: image::ImageError) -> Self {
        Self::Decode(e)
    }
}

impl From<Infallible> for PaperError {
    fn from(e: Infallible) -> Self {
        match e {}
    }
}
