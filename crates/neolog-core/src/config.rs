//! Display configuration and the phone's configuration message
//!
//! The companion app sends any subset of three fields; each one present is
//! persisted and applied on arrival. Absent fields leave the current value
//! alone.

use log::warn;
use serde::{Deserialize, Serialize};
use thiserror_no_std::Error;

use crate::color::{HEX_BLACK, HEX_WHITE};
use crate::storage::{SettingKey, SettingsStore};

pub const DEFAULT_BACKGROUND_COLOR: u32 = HEX_BLACK;
pub const DEFAULT_FOREGROUND_COLOR: u32 = HEX_WHITE;
pub const DEFAULT_STATUS_BAR: bool = false;

/// Largest value a 24-bit color setting can hold
pub const MAX_COLOR: u32 = 0xFF_FFFF;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    #[error("color value is not a hex number")]
    InvalidColor,
    #[error("color value {0:#x} does not fit in 24 bits")]
    ColorOutOfRange(u32),
}

/// Colors and status bar visibility chosen by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Window background, `0xRRGGBB`
    pub background_color: u32,
    /// Bars, glyphs and text, `0xRRGGBB`
    pub foreground_color: u32,
    /// Whether the date, Bluetooth glyph and battery gauge are shown
    pub status_bar: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            background_color: DEFAULT_BACKGROUND_COLOR,
            foreground_color: DEFAULT_FOREGROUND_COLOR,
            status_bar: DEFAULT_STATUS_BAR,
        }
    }
}

impl DisplayConfig {
    /// Read persisted settings, falling back to the defaults for missing keys.
    pub fn load<S: SettingsStore>(store: &S) -> Self {
        let defaults = Self::default();
        Self {
            background_color: store
                .read_int(SettingKey::BackgroundColor)
                .map_or(defaults.background_color, |c| c as u32),
            foreground_color: store
                .read_int(SettingKey::ForegroundColor)
                .map_or(defaults.foreground_color, |c| c as u32),
            status_bar: store
                .read_bool(SettingKey::StatusBar)
                .unwrap_or(defaults.status_bar),
        }
    }
}

/// Parse a color as sent by the companion configuration page (`"ff8800"`).
///
/// A leading `#` or `0x` is accepted.
pub fn parse_hex_color(text: &str) -> Result<u32, ConfigError> {
    let text = text.trim();
    let digits = text
        .strip_prefix('#')
        .or_else(|| text.strip_prefix("0x"))
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text);

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(ConfigError::InvalidColor);
    }

    let value = u32::from_str_radix(digits, 16).map_err(|_| ConfigError::InvalidColor)?;
    if value > MAX_COLOR {
        return Err(ConfigError::ColorOutOfRange(value));
    }
    Ok(value)
}

/// A value inside a phone message dictionary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TupleValue<'a> {
    Int(i32),
    UInt(u32),
    Bytes(&'a [u8]),
    CString(&'a str),
}

/// One key/value pair of a phone message dictionary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tuple<'a> {
    pub key: u32,
    pub value: TupleValue<'a>,
}

impl<'a> Tuple<'a> {
    pub const fn new(key: u32, value: TupleValue<'a>) -> Self {
        Self { key, value }
    }

    fn as_int(&self) -> Option<i32> {
        match self.value {
            TupleValue::Int(v) => Some(v),
            TupleValue::UInt(v) => Some(v as i32),
            TupleValue::Bytes(_) | TupleValue::CString(_) => None,
        }
    }
}

/// Partial configuration update received from the phone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConfigMessage {
    pub background_color: Option<i32>,
    pub foreground_color: Option<i32>,
    pub status_bar: Option<bool>,
}

impl ConfigMessage {
    pub fn is_empty(&self) -> bool {
        self.background_color.is_none()
            && self.foreground_color.is_none()
            && self.status_bar.is_none()
    }

    /// Decode a message dictionary.
    ///
    /// Unknown keys are skipped. A known key carrying a non-integer value is
    /// skipped with a warning; the remaining fields still apply.
    pub fn from_tuples(tuples: &[Tuple<'_>]) -> Self {
        let mut message = Self::default();

        for tuple in tuples {
            let Some(key) = SettingKey::from_id(tuple.key) else {
                continue;
            };
            let Some(value) = tuple.as_int() else {
                warn!("Ignoring {:?}: unexpected value {:?}", key, tuple.value);
                continue;
            };

            match key {
                SettingKey::BackgroundColor => message.background_color = Some(value),
                SettingKey::ForegroundColor => message.foreground_color = Some(value),
                SettingKey::StatusBar => message.status_bar = Some(value != 0),
            }
        }

        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn test_defaults_when_nothing_persisted() {
        let config = DisplayConfig::load(&MemoryStore::new());
        assert_eq!(config, DisplayConfig::default());
        assert_eq!(config.background_color, 0x000000);
        assert_eq!(config.foreground_color, 0xFFFFFF);
        assert!(!config.status_bar);
    }

    #[test]
    fn test_persisted_values_override_defaults() {
        let mut store = MemoryStore::new();
        store.write_int(SettingKey::ForegroundColor, 0x00AAFF).unwrap();
        store.write_int(SettingKey::StatusBar, 1).unwrap();

        let config = DisplayConfig::load(&store);
        assert_eq!(config.background_color, DEFAULT_BACKGROUND_COLOR);
        assert_eq!(config.foreground_color, 0x00AAFF);
        assert!(config.status_bar);
    }

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("ff8800"), Ok(0xFF8800));
        assert_eq!(parse_hex_color("#00FF00"), Ok(0x00FF00));
        assert_eq!(parse_hex_color("0x0000ff"), Ok(0x0000FF));
        assert_eq!(parse_hex_color(" 0 "), Ok(0));
        assert_eq!(parse_hex_color(""), Err(ConfigError::InvalidColor));
        assert_eq!(parse_hex_color("#"), Err(ConfigError::InvalidColor));
        assert_eq!(parse_hex_color("red"), Err(ConfigError::InvalidColor));
        assert_eq!(parse_hex_color("+12"), Err(ConfigError::InvalidColor));
        assert_eq!(
            parse_hex_color("1000000"),
            Err(ConfigError::ColorOutOfRange(0x1000000))
        );
    }

    #[test]
    fn test_message_with_all_fields() {
        let tuples = [
            Tuple::new(0, TupleValue::Int(0x112233)),
            Tuple::new(1, TupleValue::UInt(0xFFFFFF)),
            Tuple::new(2, TupleValue::Int(1)),
        ];
        let message = ConfigMessage::from_tuples(&tuples);
        assert_eq!(
            message,
            ConfigMessage {
                background_color: Some(0x112233),
                foreground_color: Some(0xFFFFFF),
                status_bar: Some(true),
            }
        );
    }

    #[test]
    fn test_message_subset_and_unknown_keys() {
        let tuples = [
            Tuple::new(2, TupleValue::Int(0)),
            Tuple::new(42, TupleValue::Int(7)),
        ];
        let message = ConfigMessage::from_tuples(&tuples);
        assert_eq!(message.background_color, None);
        assert_eq!(message.foreground_color, None);
        assert_eq!(message.status_bar, Some(false));
    }

    #[test]
    fn test_wrongly_typed_field_is_skipped() {
        let tuples = [
            Tuple::new(0, TupleValue::CString("ff0000")),
            Tuple::new(1, TupleValue::Int(0x00FF00)),
        ];
        let message = ConfigMessage::from_tuples(&tuples);
        assert_eq!(message.background_color, None);
        assert_eq!(message.foreground_color, Some(0x00FF00));
    }

    #[test]
    fn test_empty_message() {
        assert!(ConfigMessage::from_tuples(&[]).is_empty());
    }
}
