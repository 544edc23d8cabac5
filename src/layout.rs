//! Anchor-based text placement
//!
//! A [`Placement`] pins one corner of a string's bounding box to an origin.
//! The origin is relative to the destination's bounding box: positive
//! components count from its top-left corner, negative ones from the
//! right/bottom edge (`-1` is the far edge itself, `-2` the last pixel
//! column/row). Placing a string returns the opposite corner in the
//! destination's coordinates, so lines can be chained:
//!
//! ```text
//! topLeft ----------- topRight
//!    |    Text here      |
//! bottomLeft -------- bottomRight   <- baseline
//! ```
//!
//! All geometry is pure; only [`draw_text`] touches the destination.

use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use embedded_graphics::text::{Baseline, Text};

use crate::color::Color;

/// Which corner of the text box the origin pins
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    /// Origin is the top-left corner
    TopLeft,
    /// Origin is the top-right corner
    TopRight,
    /// Origin is the bottom-left corner (left end of the baseline)
    BottomLeft,
    /// Origin is the bottom-right corner (right end of the baseline)
    BottomRight,
}

/// Font metrics and glyph drawing
pub trait TextFace {
    /// Advance width and ascent height of `text`
    fn measure(&self, text: &str) -> Size;

    /// Draw `text` with its baseline starting at `baseline`
    fn draw<D>(&self, text: &str, baseline: Point, color: Color, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Color>;
}

// embedded-graphics puts the alphabetic baseline ON the last ink row, while
// boxes here end just above the baseline. The ascent therefore includes the
// baseline row, and glyphs are drawn one row up.
impl TextFace for MonoFont<'_> {
    fn measure(&self, text: &str) -> Size {
        let n = text.chars().count() as u32;
        let width = match n {
            0 => 0,
            n => n * self.character_size.width + (n - 1) * self.character_spacing,
        };
        Size::new(width, self.baseline + 1)
    }

    fn draw<D>(&self, text: &str, baseline: Point, color: Color, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Color>,
    {
        let style = MonoTextStyle::new(self, color);
        Text::with_baseline(text, baseline - Point::new(0, 1), style, Baseline::Alphabetic)
            .draw(target)
            .map(|_| ())
    }
}

/// A request to put one string somewhere
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement<'t> {
    /// Pinned corner; negative components count from the far edge
    pub origin: Point,
    /// Which corner `origin` pins
    pub anchor: Anchor,
    /// Ink
    pub color: Color,
    /// What to write
    pub text: &'t str,
}

impl<'t> Placement<'t> {
    /// Black text pinned by its top-left corner
    pub fn new(origin: Point, text: &'t str) -> Self {
        Self {
            origin,
            anchor: Anchor::TopLeft,
            color: Color::Black,
            text,
        }
    }

    /// Pin a different corner
    pub fn anchored(mut self, anchor: Anchor) -> Self {
        self.anchor = anchor;
        self
    }

    /// Use a different ink
    pub fn colored(mut self, color: Color) -> Self {
        self.color = color;
        self
    }
}

/// Where a placement ends up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextBox {
    /// Left end of the baseline, as the glyph renderer wants it
    pub baseline: Point,
    /// Corner diagonally opposite the pinned one
    pub opposite: Point,
    /// Full box, top-left plus measured size
    pub area: Rectangle,
}

/// Resolve one origin component against the span `start..start + extent`
pub fn resolve(v: i32, start: i32, extent: u32) -> i32 {
    if v < 0 {
        start + extent as i32 + v + 1
    } else {
        start + v
    }
}

/// Compute where `text` of measured `size` lands in the destination `dest`
///
/// The origin is taken relative to `dest`'s top-left corner; the returned box
/// is in `dest`'s own coordinates.
pub fn place(origin: Point, anchor: Anchor, size: Size, dest: Rectangle) -> TextBox {
    let x = resolve(origin.x, dest.top_left.x, dest.size.width);
    let y = resolve(origin.y, dest.top_left.y, dest.size.height);
    let (w, h) = (size.width as i32, size.height as i32);

    let (left, bottom) = match anchor {
        Anchor::TopLeft => (x, y + h),
        Anchor::TopRight => (x - w, y + h),
        Anchor::BottomLeft => (x, y),
        Anchor::BottomRight => (x - w, y),
    };
    let opposite = match anchor {
        Anchor::TopLeft => Point::new(x + w, y + h),
        Anchor::TopRight => Point::new(x - w, y + h),
        Anchor::BottomLeft => Point::new(x + w, y - h),
        Anchor::BottomRight => Point::new(x - w, y - h),
    };

    TextBox {
        baseline: Point::new(left, bottom),
        opposite,
        area: Rectangle::new(Point::new(left, bottom - h), size),
    }
}

/// Measure and position a placement without drawing it
pub fn layout<F: TextFace + ?Sized>(face: &F, placement: &Placement<'_>, dest: Rectangle) -> TextBox {
    place(
        placement.origin,
        placement.anchor,
        face.measure(placement.text),
        dest,
    )
}

/// Draw a placement and return where it landed
///
/// Chained placements feed a returned corner back in as an origin, which
/// only lines up on a destination based at (0, 0); shift a [`Region`] first
/// when drawing into a sub-area.
///
/// [`Region`]: crate::region::Region
pub fn draw_text<F, D>(face: &F, placement: &Placement<'_>, target: &mut D) -> Result<TextBox, D::Error>
where
    F: TextFace + ?Sized,
    D: DrawTarget<Color = Color>,
{
    let placed = layout(face, placement, target.bounding_box());
    log::debug!(
        "Text {:?} at {:?} ({:?}), box {:?}",
        placement.text,
        placement.origin,
        placement.anchor,
        placed.area
    );
    face.draw(placement.text, placed.baseline, placement.color, target)?;
    Ok(placed)
}
