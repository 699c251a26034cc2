//! Localized short date

use core::fmt::Write;

use chrono::{Datelike, NaiveDate};
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use embedded_graphics::text::Alignment;

use super::{LABEL_TEXT_LEN, draw_label};
use crate::color::ColorDepth;
use crate::layer::{Layer, RenderContext};

/// Date text box in the top-left corner
pub const DATE_BOUNDS: Rectangle = Rectangle::new(Point::new(3, 0), Size::new(50, 10));

/// Order of the date fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFormat {
    /// `07.03.15`
    DayMonthYear,
    /// `03/07/15`
    MonthDayYear,
}

impl DateFormat {
    /// German, French and Spanish use day-first dates; everyone else gets
    /// the US order.
    pub fn for_locale(locale: &str) -> Self {
        match locale {
            "de_DE" | "fr_FR" | "es_ES" => Self::DayMonthYear,
            _ => Self::MonthDayYear,
        }
    }

    pub fn format(self, date: NaiveDate) -> heapless::String<LABEL_TEXT_LEN> {
        let day = date.day();
        let month = date.month();
        let year = date.year().rem_euclid(100);

        let mut text = heapless::String::new();
        match self {
            Self::DayMonthYear => write!(text, "{:02}.{:02}.{:02}", day, month, year),
            Self::MonthDayYear => write!(text, "{:02}/{:02}/{:02}", month, day, year),
        }
        .ok();
        text
    }
}

/// Format `date` for `locale`.
pub fn format_date(date: NaiveDate, locale: &str) -> heapless::String<LABEL_TEXT_LEN> {
    DateFormat::for_locale(locale).format(date)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateLabel {
    bounds: Rectangle,
}

impl Default for DateLabel {
    fn default() -> Self {
        Self::new(DATE_BOUNDS)
    }
}

impl DateLabel {
    pub const fn new(bounds: Rectangle) -> Self {
        Self { bounds }
    }

    /// Text for the current paint; empty while the status bar is hidden.
    pub fn text(&self, ctx: &RenderContext<'_>) -> heapless::String<LABEL_TEXT_LEN> {
        if ctx.status_bar_visible() {
            format_date(ctx.now.date(), ctx.state.locale())
        } else {
            heapless::String::new()
        }
    }
}

impl Layer for DateLabel {
    fn bounds(&self) -> Rectangle {
        self.bounds
    }

    fn draw_layer<P, D>(&self, ctx: &RenderContext<'_>, display: &mut D) -> Result<(), D::Error>
    where
        P: ColorDepth,
        D: DrawTarget<Color = P::Color>,
    {
        draw_label(
            &self.text(ctx),
            self.bounds,
            Alignment::Left,
            ctx.foreground::<P>(),
            display,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app_state::AppState;

    fn march_7() -> NaiveDate {
        NaiveDate::from_ymd_opt(2015, 3, 7).unwrap()
    }

    #[test]
    fn test_day_first_locales() {
        for locale in ["de_DE", "fr_FR", "es_ES"] {
            assert_eq!(format_date(march_7(), locale).as_str(), "07.03.15");
        }
    }

    #[test]
    fn test_other_locales_fall_back_to_month_first() {
        for locale in ["en_US", "zh_CN", "", "de_AT"] {
            assert_eq!(format_date(march_7(), locale).as_str(), "03/07/15");
        }
    }

    #[test]
    fn test_two_digit_year() {
        let date = NaiveDate::from_ymd_opt(2000, 12, 31).unwrap();
        assert_eq!(format_date(date, "fr_FR").as_str(), "31.12.00");
        let date = NaiveDate::from_ymd_opt(1999, 1, 2).unwrap();
        assert_eq!(format_date(date, "en_US").as_str(), "01/02/99");
    }

    #[test]
    fn test_text_follows_visibility() {
        let mut state = AppState::default();
        state.set_locale("de_DE");
        let now = march_7().and_hms_opt(8, 15, 0).unwrap();
        let label = DateLabel::default();

        assert_eq!(label.text(&RenderContext::new(&state, now)).as_str(), "");
        state.config.status_bar = true;
        assert_eq!(
            label.text(&RenderContext::new(&state, now)).as_str(),
            "07.03.15"
        );
    }
}
