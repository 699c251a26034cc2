//! Bluetooth connection glyph

use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use crate::color::ColorDepth;
use crate::layer::{Layer, RenderContext};

/// Glyph box, centered in the status bar
pub const GLYPH_BOUNDS: Rectangle = Rectangle::new(Point::new(68, 1), Size::new(8, 10));

/// Open outline of the Bluetooth rune, relative to [`GLYPH_BOUNDS`]
pub const GLYPH: [Point; 8] = [
    Point::new(0, 2),
    Point::new(5, 7),
    Point::new(3, 9),
    Point::new(2, 9),
    Point::new(2, 0),
    Point::new(3, 0),
    Point::new(5, 2),
    Point::new(0, 7),
];

/// Shows the glyph while a phone is connected, nothing otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BluetoothIndicator {
    bounds: Rectangle,
}

impl Default for BluetoothIndicator {
    fn default() -> Self {
        Self::new(GLYPH_BOUNDS)
    }
}

impl BluetoothIndicator {
    pub const fn new(bounds: Rectangle) -> Self {
        Self { bounds }
    }
}

impl Layer for BluetoothIndicator {
    fn bounds(&self) -> Rectangle {
        self.bounds
    }

    fn draw_layer<P, D>(&self, ctx: &RenderContext<'_>, display: &mut D) -> Result<(), D::Error>
    where
        P: ColorDepth,
        D: DrawTarget<Color = P::Color>,
    {
        if !ctx.status_bar_visible() || !ctx.state.status.bluetooth_connected {
            return Ok(());
        }

        P::stroke_open_path(
            display,
            self.bounds.top_left,
            &GLYPH,
            ctx.foreground::<P>(),
        )
    }
}
