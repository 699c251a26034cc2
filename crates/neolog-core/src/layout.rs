//! Bar geometry
//!
//! Each group is a column of 40x6 bars stacked upward from a common baseline.
//! Bars are separated by a small internal gap, and every third bar adds a
//! larger external gap so the column reads like a tally.
//!
//! The rectangles are computed once when a [`BarLayout`] is built and live as
//! long as it does; redraws only change how many bars of each group get
//! painted.

use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use heapless::Vec;
use log::debug;

use crate::time::{BarCounts, HOUR_BARS, MINUTE_BARS, TEN_MINUTE_BARS};

/// Screen width of the watch in pixels
pub const SCREEN_WIDTH_PX: u32 = 144;

/// Screen height of the watch in pixels
pub const SCREEN_HEIGHT_PX: u32 = 168;

pub const BAR_WIDTH_PX: u32 = 40;
pub const BAR_HEIGHT_PX: u32 = 6;

/// Gap between two consecutive bars
pub const INTERNAL_GAP_PX: i32 = 4;

/// Extra gap inserted after every [`BARS_PER_BLOCK`] bars
pub const EXTERNAL_GAP_PX: i32 = 7;

pub const BARS_PER_BLOCK: usize = 3;

/// Lower edge of every bar group
pub const BASELINE_Y: i32 = 162;

pub const HOURS_X: i32 = 6;
pub const TENS_X: i32 = 52;
pub const MINUTES_X: i32 = 98;

/// Full-screen bounding rectangle.
pub const fn screen_bounds() -> Rectangle {
    Rectangle::new(Point::zero(), Size::new(SCREEN_WIDTH_PX, SCREEN_HEIGHT_PX))
}

/// Top-left corner of bar `index` (zero-based, counted from the baseline up)
/// in a group whose left edge is at `x`.
pub const fn bar_origin(index: usize, x: i32) -> Point {
    let i = index as i32;
    let blocks = (index / BARS_PER_BLOCK) as i32;
    let y = BASELINE_Y
        - (i + 1) * BAR_HEIGHT_PX as i32
        - blocks * EXTERNAL_GAP_PX
        - i * INTERNAL_GAP_PX;
    Point::new(x, y)
}

/// The three bar groups of the face
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKind {
    Hours,
    TenMinutes,
    Minutes,
}

impl GroupKind {
    /// Left edge of the group
    pub const fn x(self) -> i32 {
        match self {
            Self::Hours => HOURS_X,
            Self::TenMinutes => TENS_X,
            Self::Minutes => MINUTES_X,
        }
    }

    /// Number of bars in the group
    pub const fn capacity(self) -> usize {
        match self {
            Self::Hours => HOUR_BARS,
            Self::TenMinutes => TEN_MINUTE_BARS,
            Self::Minutes => MINUTE_BARS,
        }
    }
}

/// Precomputed rectangles of a single group, ordered from the baseline up.
#[derive(Debug, Clone)]
pub struct BarGroup {
    kind: GroupKind,
    bars: Vec<Rectangle, HOUR_BARS>,
}

impl BarGroup {
    pub fn new(kind: GroupKind) -> Self {
        let mut bars = Vec::new();
        for index in 0..kind.capacity() {
            bars.push(Rectangle::new(
                bar_origin(index, kind.x()),
                Size::new(BAR_WIDTH_PX, BAR_HEIGHT_PX),
            ))
            .ok();
        }

        Self { kind, bars }
    }

    pub fn kind(&self) -> GroupKind {
        self.kind
    }

    pub fn bars(&self) -> &[Rectangle] {
        &self.bars
    }

    /// Smallest rectangle containing every bar of the group.
    pub fn bounds(&self) -> Rectangle {
        match (self.bars.first(), self.bars.last()) {
            (Some(bottom), Some(top)) => Rectangle::with_corners(
                top.top_left,
                bottom.bottom_right().unwrap_or(bottom.top_left),
            ),
            _ => Rectangle::zero(),
        }
    }

    /// Fill the first `count` bars with `color`.
    ///
    /// `count` larger than the group is clamped.
    pub fn draw_prefix<C, D>(
        &self,
        count: usize,
        color: C,
        display: &mut D,
    ) -> Result<(), D::Error>
    where
        C: PixelColor,
        D: DrawTarget<Color = C>,
    {
        let style = PrimitiveStyle::with_fill(color);
        for bar in self.bars.iter().take(count) {
            bar.into_styled(style).draw(display)?;
        }
        Ok(())
    }
}

/// Geometry of all three groups.
#[derive(Debug, Clone)]
pub struct BarLayout {
    hours: BarGroup,
    tens: BarGroup,
    minutes: BarGroup,
}

impl Default for BarLayout {
    fn default() -> Self {
        Self::new()
    }
}

impl BarLayout {
    pub fn new() -> Self {
        debug!(
            "Building bar layout: {} + {} + {} bars",
            HOUR_BARS, TEN_MINUTE_BARS, MINUTE_BARS
        );
        Self {
            hours: BarGroup::new(GroupKind::Hours),
            tens: BarGroup::new(GroupKind::TenMinutes),
            minutes: BarGroup::new(GroupKind::Minutes),
        }
    }

    pub fn group(&self, kind: GroupKind) -> &BarGroup {
        match kind {
            GroupKind::Hours => &self.hours,
            GroupKind::TenMinutes => &self.tens,
            GroupKind::Minutes => &self.minutes,
        }
    }

    /// Groups in paint order: hours, tens, minutes
    pub fn groups(&self) -> [&BarGroup; 3] {
        [&self.hours, &self.tens, &self.minutes]
    }

    /// Paint the lit prefix of every group.
    pub fn draw<C, D>(&self, counts: BarCounts, color: C, display: &mut D) -> Result<(), D::Error>
    where
        C: PixelColor,
        D: DrawTarget<Color = C>,
    {
        self.hours.draw_prefix(counts.hours, color, display)?;
        self.tens.draw_prefix(counts.tens, color, display)?;
        self.minutes.draw_prefix(counts.minutes, color, display)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::primitives::ContainsPoint;

    #[test]
    fn test_first_bars_positions() {
        assert_eq!(bar_origin(0, HOURS_X), Point::new(6, 156));
        assert_eq!(bar_origin(1, HOURS_X), Point::new(6, 146));
        assert_eq!(bar_origin(2, HOURS_X), Point::new(6, 136));
        // external gap kicks in at the fourth bar
        assert_eq!(bar_origin(3, HOURS_X), Point::new(6, 119));
        assert_eq!(bar_origin(11, HOURS_X), Point::new(6, 25));
    }

    #[test]
    fn test_bars_move_up_strictly() {
        let layout = BarLayout::new();
        for group in layout.groups() {
            assert_eq!(group.bars().len(), group.kind().capacity());
            for pair in group.bars().windows(2) {
                assert!(pair[1].top_left.y < pair[0].top_left.y);
            }
        }
    }

    #[test]
    fn test_bars_never_overlap() {
        let layout = BarLayout::new();
        for group in layout.groups() {
            for pair in group.bars().windows(2) {
                let lower = pair[0];
                let upper = pair[1];
                let upper_bottom = upper.top_left.y + BAR_HEIGHT_PX as i32;
                assert!(upper_bottom <= lower.top_left.y);
                assert!(lower.top_left.y - upper_bottom >= INTERNAL_GAP_PX);
            }
        }
    }

    #[test]
    fn test_groups_do_not_overlap_horizontally() {
        let layout = BarLayout::new();
        let [hours, tens, minutes] = layout.groups();
        assert!(hours.bounds().intersection(&tens.bounds()).is_zero_sized());
        assert!(tens.bounds().intersection(&minutes.bounds()).is_zero_sized());
    }

    #[test]
    fn test_layout_fits_below_status_bar() {
        let layout = BarLayout::new();
        for group in layout.groups() {
            let bounds = group.bounds();
            assert!(bounds.top_left.y >= 20);
            assert!(screen_bounds().contains(bounds.top_left));
        }
    }
}
