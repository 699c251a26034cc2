//! Drawable layers of the watchface.
//!
//! The face is a stack of fixed rectangles (bars, date, Bluetooth glyph,
//! battery text and gauge). Every layer reads the shared [`AppState`] and the
//! time of the paint through a [`RenderContext`]; none of them cache what
//! they draw.

use chrono::NaiveDateTime;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use crate::app_state::AppState;
use crate::color::ColorDepth;

/// Inputs for one paint
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub state: &'a AppState,
    /// Wall-clock time read when the paint started
    pub now: NaiveDateTime,
}

impl<'a> RenderContext<'a> {
    pub fn new(state: &'a AppState, now: NaiveDateTime) -> Self {
        Self { state, now }
    }

    /// Foreground color in the panel's pixel type
    pub fn foreground<P: ColorDepth>(&self) -> P::Color {
        P::from_hex(self.state.config.foreground_color)
    }

    /// Background color in the panel's pixel type
    pub fn background<P: ColorDepth>(&self) -> P::Color {
        P::from_hex(self.state.config.background_color)
    }

    pub fn status_bar_visible(&self) -> bool {
        self.state.config.status_bar
    }
}

/// A fixed region of the face that paints itself from a [`RenderContext`].
pub trait Layer {
    /// Area the layer may paint into.
    fn bounds(&self) -> Rectangle;

    /// Paint the layer. Nothing underneath is cleared; the caller paints
    /// the background first.
    fn draw_layer<P, D>(&self, ctx: &RenderContext<'_>, display: &mut D) -> Result<(), D::Error>
    where
        P: ColorDepth,
        D: DrawTarget<Color = P::Color>;
}
