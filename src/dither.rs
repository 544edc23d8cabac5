//! Floyd–Steinberg dithering onto the three-ink palette
//!
//! The source photo is scaled to cover the destination (cropping the axis
//! with slack, centered), sampled nearest-neighbor, and each destination
//! pixel is rounded onto [`Color`] with the rounding residual spread to the
//! unvisited neighbors:
//!
//! ```text
//!         .    X   7/16
//!       3/16 5/16  1/16
//! ```
//!
//! Neighbors outside the destination are dropped.

use embedded_graphics::prelude::*;
use image::{GenericImageView, Rgb};

use crate::color::{Color, CHANNEL_MAX};
use crate::error::PaperError;
use crate::photo;
use crate::region::Region;

/// (dx, dy, weight out of 16)
const FLOYD_STEINBERG: [(i64, i64, i32); 4] = [(1, 0, 7), (-1, 1, 3), (0, 1, 5), (1, 1, 1)];

/// Quantization residual carried to one destination pixel
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColorError([i32; 3]);

impl ColorError {
    /// Bound on each component, either sign
    pub const LIMIT: i32 = CHANNEL_MAX;

    /// Per-channel error
    pub fn components(&self) -> [i32; 3] {
        self.0
    }

    /// Add `weight / 16` of `residual`, saturating at [`Self::LIMIT`]
    pub fn accumulate(&mut self, residual: [i32; 3], weight: i32) {
        for (acc, r) in self.0.iter_mut().zip(residual) {
            *acc = (*acc + r * weight / 16).clamp(-Self::LIMIT, Self::LIMIT);
        }
    }

    /// Apply to a sample, saturating to the channel range
    fn correct(&self, sample: [i32; 3]) -> [i32; 3] {
        core::array::from_fn(|i| (sample[i] + self.0[i]).clamp(0, CHANNEL_MAX))
    }
}

/// Error accumulator for one pass over a `width` x `height` destination
#[derive(Debug)]
struct Diffusion {
    width: u32,
    height: u32,
    errors: Vec<ColorError>,
}

impl Diffusion {
    fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            errors: vec![ColorError::default(); width as usize * height as usize],
        }
    }

    fn index(&self, x: i64, y: i64) -> Option<usize> {
        if x < 0 || y < 0 || x >= i64::from(self.width) || y >= i64::from(self.height) {
            return None;
        }
        Some(x as usize + y as usize * self.width as usize)
    }

    /// Quantize the sample at (x, y) and diffuse what rounding lost
    fn step(&mut self, x: u32, y: u32, sample: [i32; 3]) -> Color {
        let (x, y) = (i64::from(x), i64::from(y));
        let here = self
            .index(x, y)
            .map(|i| self.errors[i])
            .unwrap_or_default();

        let corrected = here.correct(sample);
        let quantized = Color::quantize(corrected);
        let target = quantized.rgb16();
        let residual: [i32; 3] = core::array::from_fn(|i| corrected[i] - target[i]);

        if residual != [0; 3] {
            for (dx, dy, weight) in FLOYD_STEINBERG {
                if let Some(i) = self.index(x + dx, y + dy) {
                    self.errors[i].accumulate(residual, weight);
                }
            }
        }
        quantized
    }
}

/// Part of a `src_w` x `src_h` source that covers a `dst_w` x `dst_h`
/// destination without stretching: `(x, y, width, height)`
pub fn crop_window(src_w: u32, src_h: u32, dst_w: u32, dst_h: u32) -> (u32, u32, u32, u32) {
    let (sw, sh) = (u64::from(src_w), u64::from(src_h));
    let (dw, dh) = (u64::from(dst_w.max(1)), u64::from(dst_h.max(1)));
    if sw * dh > sh * dw {
        // Source is relatively wider: trim left and right
        let w = (sh * dw / dh).clamp(1, sw.max(1));
        (((sw - w) / 2) as u32, 0, w as u32, src_h)
    } else {
        let h = (sw * dh / dw).clamp(1, sh.max(1));
        (0, ((sh - h) / 2) as u32, src_w, h as u32)
    }
}

/// Dither `src` into every pixel of `dst`.
///
/// An empty destination or source leaves `dst` untouched.
pub fn dither<I, T>(src: &I, dst: &mut Region<'_, T>) -> Result<(), T::Error>
where
    I: GenericImageView<Pixel = Rgb<u16>>,
    T: DrawTarget<Color = Color>,
{
    run(src, dst).map(|_| ())
}

/// Decode `bytes` and dither the result into `dst`.
///
/// Nothing is drawn when decoding fails.
pub fn dither_encoded<T>(bytes: &[u8], dst: &mut Region<'_, T>) -> Result<(), PaperError>
where
    T: DrawTarget<Color = Color>,
    PaperError: From<T::Error>,
{
    let src = photo::decode(bytes)?;
    dither(&src, dst)?;
    Ok(())
}

fn run<I, T>(src: &I, dst: &mut Region<'_, T>) -> Result<Diffusion, T::Error>
where
    I: GenericImageView<Pixel = Rgb<u16>>,
    T: DrawTarget<Color = Color>,
{
    let area = dst.bounds();
    let Size {
        width: dw,
        height: dh,
    } = area.size;
    let (sw, sh) = src.dimensions();
    if dw == 0 || dh == 0 || sw == 0 || sh == 0 {
        log::debug!("Nothing to dither: {}x{} onto {}x{}", sw, sh, dw, dh);
        return Ok(Diffusion::new(0, 0));
    }

    let (cx, cy, cw, ch) = crop_window(sw, sh, dw, dh);
    log::debug!(
        "Dithering {}x{} photo (crop {}x{} at {},{}) onto {}x{}",
        sw,
        sh,
        cw,
        ch,
        cx,
        cy,
        dw,
        dh
    );
    let view = src.view(cx, cy, cw, ch);

    let mut diffusion = Diffusion::new(dw, dh);
    for y in 0..dh {
        let sy = (u64::from(y) * u64::from(ch) / u64::from(dh)) as u32;
        for x in 0..dw {
            let sx = (u64::from(x) * u64::from(cw) / u64::from(dw)) as u32;
            let Rgb(px) = view.get_pixel(sx, sy);
            let color = diffusion.step(x, y, px.map(i32::from));
            dst.set_pixel(area.top_left + Point::new(x as i32, y as i32), color)?;
        }
    }
    Ok(diffusion)
}
