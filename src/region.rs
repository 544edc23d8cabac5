//! Rectangular views onto a pixel sink
//!
//! A [`Region`] is a borrowed sink plus one composed transform: the bounds it
//! exposes and the offset from its local coordinates to the sink's. Clipping
//! narrows the bounds and leaves coordinates alone; shifting moves the
//! bounds' top-left corner to local (0, 0). Any chain of clips and shifts
//! folds into a single `Region`, so there is never a stack of wrappers.

use embedded_graphics::image::GetPixel;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

/// A clipped and/or shifted view onto `T`
pub struct Region<'a, T> {
    sink: &'a mut T,
    /// Exposed area, in local coordinates
    bounds: Rectangle,
    /// Added to a local point to get the sink point
    offset: Point,
}

impl<'a, T> Region<'a, T>
where
    T: Dimensions,
{
    /// View the whole sink, with the sink's own coordinates
    pub fn new(sink: &'a mut T) -> Self {
        let bounds = sink.bounding_box();
        Self {
            sink,
            bounds,
            offset: Point::zero(),
        }
    }
}

impl<'a, T> Region<'a, T> {
    /// Narrow the view to `area` (in this view's coordinates)
    pub fn clip(mut self, area: Rectangle) -> Self {
        self.bounds = self.bounds.intersection(&area);
        self
    }

    /// Re-base the view so its top-left corner is local (0, 0)
    pub fn shift(mut self) -> Self {
        self.offset += self.bounds.top_left;
        self.bounds = Rectangle::new(Point::zero(), self.bounds.size);
        self
    }

    /// A clipped view that borrows this one
    pub fn clipped(&mut self, area: Rectangle) -> Region<'_, T> {
        self.reborrow().clip(area)
    }

    /// A shifted view that borrows this one
    pub fn shifted(&mut self) -> Region<'_, T> {
        self.reborrow().shift()
    }

    fn reborrow(&mut self) -> Region<'_, T> {
        Region {
            sink: &mut *self.sink,
            bounds: self.bounds,
            offset: self.offset,
        }
    }

    /// Exposed area in local coordinates
    pub fn bounds(&self) -> Rectangle {
        self.bounds
    }

    /// Exposed area in the sink's coordinates
    pub fn sink_area(&self) -> Rectangle {
        Rectangle::new(self.bounds.top_left + self.offset, self.bounds.size)
    }

    /// Sink coordinates of a local point, `None` when outside the view
    pub fn to_sink(&self, p: Point) -> Option<Point> {
        self.bounds.contains(p).then(|| p + self.offset)
    }
}

impl<T> Region<'_, T>
where
    T: DrawTarget,
{
    /// Paint one local pixel. Pixels outside the view are dropped.
    pub fn set_pixel(&mut self, p: Point, color: T::Color) -> Result<(), T::Error> {
        match self.to_sink(p) {
            Some(q) => self.sink.draw_iter(core::iter::once(Pixel(q, color))),
            None => Ok(()),
        }
    }
}

impl<T> Dimensions for Region<'_, T> {
    fn bounding_box(&self) -> Rectangle {
        self.bounds
    }
}

impl<T> DrawTarget for Region<'_, T>
where
    T: DrawTarget,
{
    type Color = T::Color;
    type Error = T::Error;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let bounds = self.bounds;
        let offset = self.offset;
        self.sink.draw_iter(
            pixels
                .into_iter()
                .filter(|Pixel(p, _)| bounds.contains(*p))
                .map(|Pixel(p, c)| Pixel(p + offset, c)),
        )
    }
}

impl<T> GetPixel for Region<'_, T>
where
    T: GetPixel,
{
    type Color = T::Color;

    fn pixel(&self, p: Point) -> Option<Self::Color> {
        self.to_sink(p).and_then(|q| self.sink.pixel(q))
    }
}
