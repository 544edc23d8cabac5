//! Kitchen dashboard on a 7.5" black/white/red e-paper panel
//!
//! A frame is composed in a [`Framebuffer`] (text through [`layout`], a
//! dithered photo through a [`Region`]) and then pushed to the panel by a
//! [`PanelSession`].
//!
//! ```no_run
//! # fn main() -> Result<(), kitchenthing::PaperError> {
//! use kitchenthing::{Framebuffer, Info, RandomPick, Renderer};
//!
//! let mut fb = Framebuffer::new(800, 480)?;
//! let info = Info {
//!     today: "Sat 17 Oct".into(),
//!     ..Info::default()
//! };
//! let photo_area = Renderer::default().render(&mut fb, &info, None, &mut RandomPick)?;
//! # let _ = photo_area;
//! # Ok(())
//! # }
//! ```
#![deny(missing_docs)]

pub mod color;
pub mod config;
pub mod dither;
pub mod epd7in5b;
pub mod error;
pub mod framebuffer;
pub mod layout;
pub mod photo;
pub mod region;
pub mod render;

pub use crate::color::Color;
pub use crate::config::PanelConfig;
pub use crate::epd7in5b::driver::{PanelSession, SessionState};
pub use crate::error::PaperError;
pub use crate::framebuffer::{Framebuffer, Plane};
pub use crate::layout::{Anchor, Placement, TextBox, TextFace};
pub use crate::photo::{Photo, RandomPick, Selector};
pub use crate::region::Region;
pub use crate::render::{Info, Item, Renderer};
