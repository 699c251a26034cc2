//! Battery gauge and percentage label

use core::fmt::Write;

use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use embedded_graphics::text::Alignment;

use super::{LABEL_TEXT_LEN, draw_label};
use crate::color::{ColorDepth, STROKE_WIDTH_PX};
use crate::layer::{Layer, RenderContext};

/// Gauge box in the top-right corner
pub const GAUGE_BOUNDS: Rectangle = Rectangle::new(Point::new(120, 2), Size::new(20, 8));

/// Percentage text, right-aligned against the gauge
pub const LABEL_BOUNDS: Rectangle = Rectangle::new(Point::new(85, 0), Size::new(30, 10));

/// At or below this charge the gauge switches to the warning color
pub const LOW_BATTERY_PERCENT: u8 = 20;

/// Width of the gauge fill for a charge of `percent` out of `inner_width`.
///
/// Integer arithmetic, rounded down; charges above 100 count as 100.
pub const fn fill_width(percent: u8, inner_width: u32) -> u32 {
    let percent = if percent > 100 { 100 } else { percent };
    percent as u32 * inner_width / 100
}

pub const fn is_low(percent: u8) -> bool {
    percent <= LOW_BATTERY_PERCENT
}

/// `"<percent> %"`
pub fn battery_text(percent: u8) -> heapless::String<LABEL_TEXT_LEN> {
    let mut text = heapless::String::new();
    write!(text, "{} %", percent).ok();
    text
}

/// Outlined battery with a proportional fill and a label next to it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatteryIndicator {
    gauge: Rectangle,
    label: Rectangle,
}

impl Default for BatteryIndicator {
    fn default() -> Self {
        Self::new(GAUGE_BOUNDS, LABEL_BOUNDS)
    }
}

impl BatteryIndicator {
    pub const fn new(gauge: Rectangle, label: Rectangle) -> Self {
        Self { gauge, label }
    }

    /// Width available to the fill inside the outline
    pub const fn inner_width(&self) -> u32 {
        self.gauge.size.width.saturating_sub(6)
    }

    pub const fn label_bounds(&self) -> Rectangle {
        self.label
    }

    /// Text shown next to the gauge; empty while the status bar is hidden.
    pub fn label_text(&self, ctx: &RenderContext<'_>) -> heapless::String<LABEL_TEXT_LEN> {
        if ctx.status_bar_visible() {
            battery_text(ctx.state.status.charge_percent)
        } else {
            heapless::String::new()
        }
    }

    fn color<P: ColorDepth>(ctx: &RenderContext<'_>) -> P::Color {
        let foreground = ctx.state.config.foreground_color;
        if is_low(ctx.state.status.charge_percent) {
            P::warning(foreground)
        } else {
            P::from_hex(foreground)
        }
    }
}

impl Layer for BatteryIndicator {
    fn bounds(&self) -> Rectangle {
        self.gauge
    }

    fn draw_layer<P, D>(&self, ctx: &RenderContext<'_>, display: &mut D) -> Result<(), D::Error>
    where
        P: ColorDepth,
        D: DrawTarget<Color = P::Color>,
    {
        if !ctx.status_bar_visible() {
            return Ok(());
        }

        let color = Self::color::<P>(ctx);
        let origin = self.gauge.top_left;
        let width = self.gauge.size.width;
        let height = self.gauge.size.height;
        let inner_height = height.saturating_sub(4);

        // Outline
        Rectangle::new(origin, Size::new(width.saturating_sub(2), height))
            .into_styled(PrimitiveStyle::with_stroke(color, STROKE_WIDTH_PX))
            .draw(display)?;

        // Charge
        let fill = fill_width(ctx.state.status.charge_percent, self.inner_width());
        Rectangle::new(origin + Point::new(2, 2), Size::new(fill, inner_height))
            .into_styled(PrimitiveStyle::with_fill(color))
            .draw(display)?;

        // Terminal nub, clipped to the gauge box
        Rectangle::new(
            origin + Point::new(width as i32 - 2, 2),
            Size::new(3, inner_height),
        )
        .intersection(&self.gauge)
        .into_styled(PrimitiveStyle::with_fill(color))
        .draw(display)?;

        draw_label(
            &self.label_text(ctx),
            self.label,
            Alignment::Right,
            color,
            display,
        )
    }
}
