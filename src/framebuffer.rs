//! Two-plane bit-packed framebuffer
//!
//! The panel takes one bit per pixel per ink. Both planes are stored exactly
//! as they go over the wire: row-major, 8 pixels per byte, MSB = leftmost.
//!
//! | color | `bw` | `red` |
//! |-------|------|-------|
//! | White | 1    | 0     |
//! | Black | 0    | 0     |
//! | Red   | 1    | 1     |
//!
//! Reading prefers red, then black, then white.

use core::convert::Infallible;

use embedded_graphics::image::GetPixel;
use embedded_graphics::prelude::*;
use image::RgbImage;

use crate::color::Color;
use crate::error::PaperError;

/// One bit-per-pixel bitmap for one ink channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plane {
    bits: Vec<u8>,
    width: u32,
    height: u32,
}

impl Plane {
    /// Create an all-off plane. `width` must be a multiple of 8.
    pub fn new(width: u32, height: u32) -> Result<Self, PaperError> {
        if width % 8 != 0 {
            return Err(PaperError::UnalignedWidth { width });
        }
        Ok(Self {
            bits: vec![0; (width as usize / 8) * height as usize],
            width,
            height,
        })
    }

    /// Width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Packed bytes, ready for transmission
    pub fn bytes(&self) -> &[u8] {
        &self.bits
    }

    /// Turn every pixel on
    pub fn set_all(&mut self) {
        self.bits.fill(0xFF);
    }

    /// Turn every pixel off
    pub fn clear_all(&mut self) {
        self.bits.fill(0x00);
    }

    /// Byte index and bit mask of a pixel, `None` when out of bounds
    fn locate(&self, x: u32, y: u32) -> Option<(usize, u8)> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let off = x as usize + y as usize * self.width as usize;
        Some((off / 8, 0x80 >> (off & 0x07)))
    }

    /// Turn one pixel on. Out-of-bounds coordinates are ignored.
    pub fn set(&mut self, x: u32, y: u32) {
        if let Some((i, mask)) = self.locate(x, y) {
            self.bits[i] |= mask;
        }
    }

    /// Turn one pixel off. Out-of-bounds coordinates are ignored.
    pub fn clear(&mut self, x: u32, y: u32) {
        if let Some((i, mask)) = self.locate(x, y) {
            self.bits[i] &= !mask;
        }
    }

    /// Whether a pixel is on. Out of bounds reads as off.
    pub fn get(&self, x: u32, y: u32) -> bool {
        self.locate(x, y)
            .map(|(i, mask)| self.bits[i] & mask != 0)
            .unwrap_or(false)
    }

    /// Bytes of row `y` covering pixels `x..x + width`.
    ///
    /// `x` and `width` must be multiples of 8 and the span must fit the row;
    /// anything else returns `None`.
    pub fn subrow(&self, x: u32, y: u32, width: u32) -> Option<&[u8]> {
        if x % 8 != 0 || width % 8 != 0 || y >= self.height {
            return None;
        }
        if x.checked_add(width)? > self.width {
            return None;
        }
        let start = (x as usize + y as usize * self.width as usize) / 8;
        self.bits.get(start..start + width as usize / 8)
    }
}

/// Black/white plane plus red plane, sized for one panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Framebuffer {
    bw: Plane,
    red: Plane,
}

impl Framebuffer {
    /// Create an all-white framebuffer.
    ///
    /// Fails with [`PaperError::UnalignedWidth`] when `width` is not a multiple of 8.
    pub fn new(width: u32, height: u32) -> Result<Self, PaperError> {
        let mut fb = Self {
            bw: Plane::new(width, height)?,
            red: Plane::new(width, height)?,
        };
        fb.clear();
        Ok(fb)
    }

    /// Width in pixels
    pub fn width(&self) -> u32 {
        self.bw.width
    }

    /// Height in pixels
    pub fn height(&self) -> u32 {
        self.bw.height
    }

    /// Black/white plane (1 = white)
    pub fn bw(&self) -> &Plane {
        &self.bw
    }

    /// Red plane (1 = red)
    pub fn red(&self) -> &Plane {
        &self.red
    }

    /// Mutable access to the black/white plane
    pub fn bw_mut(&mut self) -> &mut Plane {
        &mut self.bw
    }

    /// Mutable access to the red plane
    pub fn red_mut(&mut self) -> &mut Plane {
        &mut self.red
    }

    /// Reset every pixel to white
    pub fn clear(&mut self) {
        self.bw.set_all();
        self.red.clear_all();
    }

    /// Paint one pixel. Out-of-bounds coordinates are ignored.
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Color) {
        match color {
            Color::White => {
                self.bw.set(x, y);
                self.red.clear(x, y);
            }
            Color::Black => {
                self.bw.clear(x, y);
                self.red.clear(x, y);
            }
            Color::Red => {
                self.bw.set(x, y);
                self.red.set(x, y);
            }
        }
    }

    /// Read one pixel back. Out-of-bounds coordinates read as white.
    pub fn get_pixel(&self, x: u32, y: u32) -> Color {
        if self.red.get(x, y) {
            Color::Red
        } else if !self.bw.get(x, y) && x < self.width() && y < self.height() {
            Color::Black
        } else {
            Color::White
        }
    }

    /// Render the logical colors into an RGB image for previews
    pub fn to_rgb_image(&self) -> RgbImage {
        RgbImage::from_fn(self.width(), self.height(), |x, y| {
            image::Rgb(self.get_pixel(x, y).rgb8())
        })
    }

    fn point_in_bounds(&self, p: Point) -> Option<(u32, u32)> {
        let x = u32::try_from(p.x).ok()?;
        let y = u32::try_from(p.y).ok()?;
        (x < self.width() && y < self.height()).then_some((x, y))
    }
}

impl OriginDimensions for Framebuffer {
    fn size(&self) -> Size {
        Size::new(self.width(), self.height())
    }
}

impl DrawTarget for Framebuffer {
    type Color = Color;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if let Some((x, y)) = self.point_in_bounds(point) {
                self.set_pixel(x, y, color);
            }
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        match color {
            Color::White => {
                self.bw.set_all();
                self.red.clear_all();
            }
            Color::Black => {
                self.bw.clear_all();
                self.red.clear_all();
            }
            Color::Red => {
                self.bw.set_all();
                self.red.set_all();
            }
        }
        Ok(())
    }
}

impl GetPixel for Framebuffer {
    type Color = Color;

    fn pixel(&self, p: Point) -> Option<Self::Color> {
        self.point_in_bounds(p)
            .map(|(x, y)| self.get_pixel(x, y))
    }
}
