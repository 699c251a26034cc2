//! RAM framebuffer with per-pixel change detection.
//!
//! The watchface draws into this buffer instead of the panel. After drawing
//! completes, only the rectangular region containing changed pixels is
//! flushed to the real display in a single `fill_contiguous` call.

extern crate alloc;

use alloc::vec;
use alloc::vec::Vec;
use core::convert::Infallible;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PointsIter, Rectangle};
use log::debug;

use crate::layout::{SCREEN_HEIGHT_PX, SCREEN_WIDTH_PX};

const WIDTH: usize = SCREEN_WIDTH_PX as usize;
const HEIGHT: usize = SCREEN_HEIGHT_PX as usize;

/// Total number of pixels in the framebuffer (144 x 168 = 24,192).
const PIXEL_COUNT: usize = WIDTH * HEIGHT;

/// Bounding box of pixels that have changed since the last flush.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DirtyRect {
    min_x: usize,
    min_y: usize,
    max_x: usize,
    max_y: usize,
}

impl DirtyRect {
    /// Expand the dirty region to include the given pixel coordinate.
    fn expand(&mut self, x: usize, y: usize) {
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
    }

    /// Create a new dirty rect covering a single pixel.
    fn from_point(x: usize, y: usize) -> Self {
        Self {
            min_x: x,
            min_y: y,
            max_x: x,
            max_y: y,
        }
    }

    fn to_rectangle(self) -> Rectangle {
        Rectangle::new(
            Point::new(self.min_x as i32, self.min_y as i32),
            Size::new(
                (self.max_x - self.min_x + 1) as u32,
                (self.max_y - self.min_y + 1) as u32,
            ),
        )
    }
}

/// Screen-sized framebuffer implementing `DrawTarget` for any pixel type.
///
/// Tracks a dirty bounding box so that only changed pixels are flushed to
/// the panel.
pub struct FrameBuffer<C: PixelColor> {
    pixels: Vec<C>,
    dirty: Option<DirtyRect>,
}

impl<C: PixelColor> FrameBuffer<C> {
    /// Allocate a new framebuffer filled with `background`.
    pub fn new(background: C) -> Self {
        Self {
            pixels: vec![background; PIXEL_COUNT],
            dirty: None,
        }
    }

    /// Read back a pixel; `None` outside the screen.
    pub fn pixel(&self, x: i32, y: i32) -> Option<C> {
        if x < 0 || y < 0 || x as usize >= WIDTH || y as usize >= HEIGHT {
            return None;
        }
        self.pixels.get(y as usize * WIDTH + x as usize).copied()
    }

    /// Number of pixels currently holding `color`.
    pub fn count(&self, color: C) -> usize {
        self.pixels.iter().filter(|&&p| p == color).count()
    }

    /// Number of pixels inside `area` holding `color`.
    pub fn count_in(&self, area: &Rectangle, color: C) -> usize {
        area.points()
            .filter(|p| self.pixel(p.x, p.y) == Some(color))
            .count()
    }

    /// Region changed since the last flush, if any.
    pub fn dirty_area(&self) -> Option<Rectangle> {
        self.dirty.map(DirtyRect::to_rectangle)
    }

    /// Raw pixel rows, top to bottom.
    pub fn as_slice(&self) -> &[C] {
        &self.pixels
    }

    /// Write a single pixel, expanding the dirty rect only if the color changed.
    #[inline]
    fn set_pixel(&mut self, x: usize, y: usize, color: C) {
        let idx = y * WIDTH + x;
        if self.pixels[idx] != color {
            self.pixels[idx] = color;
            match &mut self.dirty {
                Some(rect) => rect.expand(x, y),
                None => self.dirty = Some(DirtyRect::from_point(x, y)),
            }
        }
    }

    /// Flush the dirty region to a panel, then reset the dirty state.
    ///
    /// Only the bounding rectangle of changed pixels is sent. If nothing
    /// changed, this is a no-op.
    pub fn flush<D>(&mut self, display: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = C>,
    {
        let Some(rect) = self.dirty.take() else {
            return Ok(());
        };

        let area = rect.to_rectangle();
        let width = area.size.width as usize;

        debug!(
            "Flushing {}x{} dirty region at ({}, {})",
            area.size.width, area.size.height, rect.min_x, rect.min_y
        );

        // Borrow the pixel slice so the closure captures a shared reference,
        // avoiding the `FnMut` escaping-reference issue with `&mut self`.
        let pixels = &self.pixels;
        let pixel_iter = (rect.min_y..=rect.max_y).flat_map(move |y| {
            let row_start = y * WIDTH + rect.min_x;
            pixels[row_start..row_start + width].iter().copied()
        });

        display.fill_contiguous(&area, pixel_iter)
    }
}

impl<C: PixelColor> OriginDimensions for FrameBuffer<C> {
    fn size(&self) -> Size {
        Size::new(SCREEN_WIDTH_PX, SCREEN_HEIGHT_PX)
    }
}

impl<C: PixelColor> DrawTarget for FrameBuffer<C> {
    type Color = C;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(coord, color) in pixels {
            let x = coord.x;
            let y = coord.y;
            if x >= 0 && y >= 0 && (x as usize) < WIDTH && (y as usize) < HEIGHT {
                self.set_pixel(x as usize, y as usize, color);
            }
        }
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        // Clamp the area to display bounds
        let clamp = |v: i64, max: usize| v.clamp(0, max as i64) as usize;
        let left = i64::from(area.top_left.x);
        let top = i64::from(area.top_left.y);
        let x_start = clamp(left, WIDTH);
        let y_start = clamp(top, HEIGHT);
        let x_end = clamp(left + i64::from(area.size.width), WIDTH);
        let y_end = clamp(top + i64::from(area.size.height), HEIGHT);

        for y in y_start..y_end {
            for x in x_start..x_end {
                self.set_pixel(x, y, color);
            }
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        for y in 0..HEIGHT {
            for x in 0..WIDTH {
                self.set_pixel(x, y, color);
            }
        }
        Ok(())
    }
}
