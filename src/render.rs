//! Kitchen dashboard layout
//!
//! Date in the top-right corner, a headline, one line per item with an
//! optional red note chained after it, and a small footer in the bottom-right
//! corner. Whatever height is left between the text and the footer goes to
//! the photo.

use embedded_graphics::mono_font::{iso_8859_15, MonoFont};
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use crate::color::Color;
use crate::dither::dither;
use crate::layout::{draw_text, Anchor, Placement, TextFace};
use crate::photo::{Photo, Selector};
use crate::region::Region;

/// Gap between stacked blocks, in pixels
const GAP: i32 = 4;

/// One line of the list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    /// Main text, black
    pub text: String,
    /// Trailing note, red and smaller
    pub note: Option<String>,
}

impl Item {
    /// Item without a note
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            note: None,
        }
    }

    /// Parse `text|note`; an empty note counts as none
    pub fn parse(line: &str) -> Self {
        match line.split_once('|') {
            Some((text, note)) if !note.trim().is_empty() => Self {
                text: text.trim().to_string(),
                note: Some(note.trim().to_string()),
            },
            Some((text, _)) => Self::new(text.trim()),
            None => Self::new(line.trim()),
        }
    }
}

/// What goes on the panel this cycle
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Info {
    /// Date line, already formatted
    pub today: String,
    /// Fixed headline; picked from [`headlines`] when `None`
    pub headline: Option<String>,
    /// The list
    pub items: Vec<Item>,
    /// Bottom-right footer, e.g. the next update time
    pub footer: String,
}

/// Headline phrases that fit a list of `n` items
pub fn headlines(n: usize) -> &'static [&'static str] {
    match n {
        0 => &["No tasks for today!", "Nothing on the list today."],
        1 => &["Just one more thing to do:", "Only one thing left:"],
        2 => &["A couple of tasks to tick off:", "Two things to sort out:"],
        3..=5 => &["A few things that need doing:"],
        _ => &["Quite a bit to get done, eh?"],
    }
}

/// Faces used for each part of the dashboard
pub struct Renderer<'f, F: ?Sized> {
    /// Date line
    pub date: &'f F,
    /// Headline
    pub headline: &'f F,
    /// Item text
    pub item: &'f F,
    /// Red notes after items
    pub note: &'f F,
    /// Footer
    pub footer: &'f F,
}

impl Default for Renderer<'static, MonoFont<'static>> {
    fn default() -> Self {
        Self {
            date: &iso_8859_15::FONT_10X20,
            headline: &iso_8859_15::FONT_9X18_BOLD,
            item: &iso_8859_15::FONT_8X13,
            note: &iso_8859_15::FONT_6X10,
            footer: &iso_8859_15::FONT_5X8,
        }
    }
}

impl<F> Renderer<'_, F>
where
    F: TextFace + ?Sized,
{
    /// Lay out `info` on `target` and dither `photo` into the space left over.
    ///
    /// Returns the photo rectangle in `target`'s coordinates, zero-sized when
    /// the text leaves no room.
    pub fn render<D, S>(
        &self,
        target: &mut D,
        info: &Info,
        photo: Option<&Photo>,
        selector: &mut S,
    ) -> Result<Rectangle, D::Error>
    where
        D: DrawTarget<Color = Color>,
        S: Selector + ?Sized,
    {
        let origin = target.bounding_box().top_left;
        let mut view = Region::new(target).shift();
        let target = &mut view;
        let frame = target.bounding_box();

        let date = draw_text(
            self.date,
            &Placement::new(Point::new(-2, 2), &info.today).anchored(Anchor::TopRight),
            target,
        )?;

        let headline = match &info.headline {
            Some(h) => h.as_str(),
            None => {
                let phrases = headlines(info.items.len());
                let i = selector.pick(phrases.len()).unwrap_or(0);
                phrases.get(i).copied().unwrap_or_default()
            }
        };
        let head = draw_text(
            self.headline,
            &Placement::new(Point::new(2, date.opposite.y + GAP), headline),
            target,
        )?;

        let mut y = head.opposite.y + GAP;
        for item in &info.items {
            let line = format!("- {}", item.text);
            let placed = draw_text(self.item, &Placement::new(Point::new(10, y), &line), target)?;
            if let Some(note) = &item.note {
                let after = Point::new(placed.opposite.x + 10, placed.baseline.y);
                draw_text(
                    self.note,
                    &Placement::new(after, note)
                        .anchored(Anchor::BottomLeft)
                        .colored(Color::Red),
                    target,
                )?;
            }
            y = placed.opposite.y + GAP / 2;
        }

        let footer = draw_text(
            self.footer,
            &Placement::new(Point::new(-2, -2), &info.footer).anchored(Anchor::BottomRight),
            target,
        )?;

        let top = y + GAP;
        let bottom = footer.area.top_left.y - GAP;
        let area = if bottom > top {
            Rectangle::with_corners(
                Point::new(frame.top_left.x, top),
                Point::new(frame.top_left.x + frame.size.width as i32 - 1, bottom - 1),
            )
        } else {
            Rectangle::new(Point::new(frame.top_left.x, top), Size::zero())
        };
        let area = frame.intersection(&area);

        match photo {
            Some(photo) if !area.is_zero_sized() => {
                log::debug!("Dithering photo into {:?}", area);
                let mut region = target.clipped(area).shift();
                dither(photo, &mut region)?;
            }
            Some(_) => log::warn!("No room left for the photo"),
            None => {}
        }
        Ok(area.translate(origin))
    }
}
