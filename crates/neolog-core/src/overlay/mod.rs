//! Status bar along the top edge: date, Bluetooth glyph and battery.
//!
//! Everything here is drawn only while the status bar setting is on, and
//! always from the cached state, so toggling the setting reproduces the same
//! output without fresh sensor readings.

pub mod battery;
pub mod bluetooth;
pub mod date;

pub use battery::{BatteryIndicator, battery_text, fill_width};
pub use bluetooth::BluetoothIndicator;
pub use date::{DateFormat, DateLabel, format_date};

use embedded_graphics::mono_font::{MonoFont, MonoTextStyle, ascii::FONT_6X10};
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use embedded_graphics::text::{Alignment, Baseline, Text, TextStyleBuilder};

use crate::color::ColorDepth;
use crate::layer::{Layer, RenderContext};

/// Capacity of the status bar text buffers
pub const LABEL_TEXT_LEN: usize = 16;

/// Font of the status bar
pub const STATUS_FONT: &MonoFont<'static> = &FONT_6X10;

/// Draw `text` inside `bounds`, top-aligned. Empty text draws nothing.
pub(crate) fn draw_label<C, D>(
    text: &str,
    bounds: Rectangle,
    alignment: Alignment,
    color: C,
    display: &mut D,
) -> Result<(), D::Error>
where
    C: PixelColor,
    D: DrawTarget<Color = C>,
{
    if text.is_empty() {
        return Ok(());
    }

    let anchor = match alignment {
        Alignment::Left => bounds.top_left,
        Alignment::Center => bounds.top_left + Point::new(bounds.size.width as i32 / 2, 0),
        Alignment::Right => bounds.top_left + Point::new(bounds.size.width as i32 - 1, 0),
    };
    let text_style = TextStyleBuilder::new()
        .alignment(alignment)
        .baseline(Baseline::Top)
        .build();

    Text::with_text_style(text, anchor, MonoTextStyle::new(STATUS_FONT, color), text_style)
        .draw(display)?;
    Ok(())
}

/// The three status bar elements in paint order
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusOverlay {
    pub date: DateLabel,
    pub bluetooth: BluetoothIndicator,
    pub battery: BatteryIndicator,
}

impl StatusOverlay {
    /// Bounding box of everything the overlay may touch
    pub fn bounds(&self) -> Rectangle {
        let gauge = self.battery.bounds();
        let right = gauge.top_left.x + gauge.size.width as i32 - 1;
        let bottom = [
            self.date.bounds(),
            self.bluetooth.bounds(),
            gauge,
            self.battery.label_bounds(),
        ]
        .iter()
        .map(|r| r.top_left.y + r.size.height as i32 - 1)
        .max()
        .unwrap_or(0);
        Rectangle::with_corners(Point::zero(), Point::new(right, bottom))
    }

    pub fn draw<P, D>(&self, ctx: &RenderContext<'_>, display: &mut D) -> Result<(), D::Error>
    where
        P: ColorDepth,
        D: DrawTarget<Color = P::Color>,
    {
        self.date.draw_layer::<P, _>(ctx, display)?;
        self.bluetooth.draw_layer::<P, _>(ctx, display)?;
        self.battery.draw_layer::<P, _>(ctx, display)
    }
}
