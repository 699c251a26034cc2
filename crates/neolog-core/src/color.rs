//! Color depth strategies
//!
//! Settings carry colors as 24-bit `0xRRGGBB` integers regardless of the
//! panel. A [`ColorDepth`] turns them into the panel's pixel type and knows
//! how that panel draws outlines:
//!
//! - [`ColorDisplay`]: RGB565, low battery shown in red
//! - [`MonochromeDisplay`]: black/white, everything in the foreground color
//!
//! # RGB565 Format
//! - Red: 5 bits (0-31)
//! - Green: 6 bits (0-63)
//! - Blue: 5 bits (0-31)
//!
//! To convert from 8-bit RGB: R>>3, G>>2, B>>3

use embedded_graphics::pixelcolor::{BinaryColor, Rgb565};
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Line, PrimitiveStyle, Polyline};

/// Stroke width used for outlines
pub const STROKE_WIDTH_PX: u32 = 1;

/// Warning color for the battery gauge on color panels
pub const WARNING_RED: Rgb565 = Rgb565::new(31, 0, 0);

/// Black as a 24-bit setting value
pub const HEX_BLACK: u32 = 0x000000;

/// White as a 24-bit setting value
pub const HEX_WHITE: u32 = 0xFFFFFF;

/// Convert a `0xRRGGBB` value to RGB565. Bits above 24 are ignored.
pub const fn rgb565_from_hex(hex: u32) -> Rgb565 {
    let r = ((hex >> 16) & 0xFF) as u8;
    let g = ((hex >> 8) & 0xFF) as u8;
    let b = (hex & 0xFF) as u8;
    Rgb565::new(r >> 3, g >> 2, b >> 3)
}

/// Rendering capability of a panel, selected once at construction.
pub trait ColorDepth {
    /// Pixel type of the panel
    type Color: PixelColor;

    /// Human-readable name for logs
    const NAME: &'static str;

    /// Map a 24-bit setting value to a panel color.
    fn from_hex(hex: u32) -> Self::Color;

    /// Color for low-battery warnings, given the configured foreground.
    fn warning(foreground: u32) -> Self::Color;

    /// Draw the open outline through `points`, offset by `origin`.
    fn stroke_open_path<D>(
        display: &mut D,
        origin: Point,
        points: &[Point],
        color: Self::Color,
    ) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Self::Color>;
}

/// 16-bit color panel
#[derive(Debug, Clone, Copy, Default)]
pub struct ColorDisplay;

impl ColorDepth for ColorDisplay {
    type Color = Rgb565;

    const NAME: &'static str = "color";

    fn from_hex(hex: u32) -> Rgb565 {
        rgb565_from_hex(hex)
    }

    fn warning(_foreground: u32) -> Rgb565 {
        WARNING_RED
    }

    fn stroke_open_path<D>(
        display: &mut D,
        origin: Point,
        points: &[Point],
        color: Rgb565,
    ) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        Polyline::new(points)
            .translate(origin)
            .into_styled(PrimitiveStyle::with_stroke(color, STROKE_WIDTH_PX))
            .draw(display)
    }
}

/// 1-bit black and white panel
///
/// Any non-zero setting value is white.
#[derive(Debug, Clone, Copy, Default)]
pub struct MonochromeDisplay;

impl ColorDepth for MonochromeDisplay {
    type Color = BinaryColor;

    const NAME: &'static str = "monochrome";

    fn from_hex(hex: u32) -> BinaryColor {
        if hex == HEX_BLACK {
            BinaryColor::Off
        } else {
            BinaryColor::On
        }
    }

    fn warning(foreground: u32) -> BinaryColor {
        Self::from_hex(foreground)
    }

    fn stroke_open_path<D>(
        display: &mut D,
        origin: Point,
        points: &[Point],
        color: BinaryColor,
    ) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = BinaryColor>,
    {
        let style = PrimitiveStyle::with_stroke(color, STROKE_WIDTH_PX);
        for segment in points.windows(2) {
            Line::new(segment[0] + origin, segment[1] + origin)
                .into_styled(style)
                .draw(display)?;
        }
        Ok(())
    }
}
