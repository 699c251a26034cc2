//! Time-to-bars encoding
//!
//! A wall-clock time is shown as three groups of lit bars: hours, tens of
//! minutes and single minutes. 13:47 lights one hour bar, four ten-minute
//! bars and seven minute bars.

use chrono::{NaiveDateTime, Timelike};

/// Bars available in the hour group
pub const HOUR_BARS: usize = 12;

/// Bars available in the tens-of-minutes group (0-5 lit)
pub const TEN_MINUTE_BARS: usize = 5;

/// Bars available in the single-minutes group (0-9 lit)
pub const MINUTE_BARS: usize = 9;

/// How the hour group treats the hours that fall on a multiple of twelve.
///
/// The two policies disagree at midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HourPolicy {
    /// `hour % 12`, with noon and midnight lighting the whole group.
    #[default]
    Wrap,
    /// Noon counts as 13 and is capped to the group; every other hour is
    /// `hour % 12`, so midnight lights no hour bars.
    NoonOverflow,
}

impl HourPolicy {
    /// Short label used in logs and on the simulator command line
    pub const fn label(self) -> &'static str {
        match self {
            Self::Wrap => "wrap",
            Self::NoonOverflow => "noon-overflow",
        }
    }

    /// Number of hour bars lit for `hour` (reduced modulo 24).
    pub const fn hours_lit(self, hour: u32) -> usize {
        let hour = hour % 24;
        let raw = match self {
            Self::Wrap => match hour % 12 {
                0 => HOUR_BARS,
                h => h as usize,
            },
            Self::NoonOverflow => {
                if hour == 12 {
                    HOUR_BARS + 1
                } else {
                    (hour % 12) as usize
                }
            }
        };

        if raw > HOUR_BARS { HOUR_BARS } else { raw }
    }
}

/// Number of lit bars in each group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BarCounts {
    pub hours: usize,
    pub tens: usize,
    pub minutes: usize,
}

impl BarCounts {
    /// Encode an hour (0-23) and minute (0-59).
    ///
    /// Total over all inputs: values outside the range are reduced modulo
    /// 24 and 60 first.
    pub const fn encode(hour: u32, minute: u32, policy: HourPolicy) -> Self {
        let minute = minute % 60;
        Self {
            hours: policy.hours_lit(hour),
            tens: (minute / 10) as usize,
            minutes: (minute % 10) as usize,
        }
    }

    /// Encode the hour and minute of a timestamp.
    pub fn from_time(time: &NaiveDateTime, policy: HourPolicy) -> Self {
        Self::encode(time.hour(), time.minute(), policy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_afternoon_example() {
        let counts = BarCounts::encode(13, 47, HourPolicy::Wrap);
        assert_eq!(
            counts,
            BarCounts {
                hours: 1,
                tens: 4,
                minutes: 7
            }
        );
        assert_eq!(counts, BarCounts::encode(13, 47, HourPolicy::NoonOverflow));
    }

    #[test]
    fn test_midnight_lights_full_hour_group_when_wrapping() {
        let counts = BarCounts::encode(0, 0, HourPolicy::Wrap);
        assert_eq!(counts.hours, HOUR_BARS);
        assert_eq!(counts.tens, 0);
        assert_eq!(counts.minutes, 0);
    }

    #[test]
    fn test_policies_differ_at_midnight_only() {
        assert_eq!(HourPolicy::NoonOverflow.hours_lit(0), 0);
        for hour in 1..24 {
            assert_eq!(
                HourPolicy::Wrap.hours_lit(hour),
                HourPolicy::NoonOverflow.hours_lit(hour),
                "hour {hour}"
            );
        }
    }

    #[test]
    fn test_noon_overflow_is_capped() {
        assert_eq!(HourPolicy::NoonOverflow.hours_lit(12), HOUR_BARS);
        assert_eq!(HourPolicy::Wrap.hours_lit(12), HOUR_BARS);
    }

    #[test]
    fn test_counts_stay_within_group_bounds() {
        for policy in [HourPolicy::Wrap, HourPolicy::NoonOverflow] {
            for hour in 0..24 {
                for minute in 0..60 {
                    let counts = BarCounts::encode(hour, minute, policy);
                    assert!(counts.hours <= HOUR_BARS);
                    assert!(counts.tens <= TEN_MINUTE_BARS);
                    assert!(counts.minutes <= MINUTE_BARS);
                    assert_eq!(counts.tens * 10 + counts.minutes, minute as usize);
                }
            }
        }
    }

    #[test]
    fn test_out_of_range_inputs_wrap() {
        assert_eq!(
            BarCounts::encode(25, 61, HourPolicy::Wrap),
            BarCounts::encode(1, 1, HourPolicy::Wrap)
        );
    }

    #[test]
    fn test_from_time() {
        let time = NaiveDate::from_ymd_opt(2015, 3, 7)
            .unwrap()
            .and_hms_opt(22, 5, 30)
            .unwrap();
        let counts = BarCounts::from_time(&time, HourPolicy::Wrap);
        assert_eq!(
            counts,
            BarCounts {
                hours: 10,
                tens: 0,
                minutes: 5
            }
        );
    }
}
