//! Application-wide state and error types for neolog

use log::warn;
use thiserror_no_std::Error;

use crate::config::{ConfigError, DisplayConfig};
use crate::storage::StoreError;
use crate::time::HourPolicy;

/// Longest locale tag kept (e.g. `de_DE`, `zh_CN`)
pub const LOCALE_LEN: usize = 16;

/// Locale assumed until the host reports one
pub const DEFAULT_LOCALE: &str = "en_US";

/// Readings pushed by the platform's battery and Bluetooth services
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusState {
    /// Battery charge, 0-100
    pub charge_percent: u8,
    pub bluetooth_connected: bool,
}

impl Default for StatusState {
    fn default() -> Self {
        Self {
            charge_percent: 100,
            bluetooth_connected: false,
        }
    }
}

/// Everything the watchface renders from, besides the clock.
///
/// Owned by the [`Watchface`](crate::watchface::Watchface) and handed by
/// reference to every layer when drawing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    pub config: DisplayConfig,
    pub status: StatusState,
    pub hour_policy: HourPolicy,
    locale: heapless::String<LOCALE_LEN>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(DisplayConfig::default(), HourPolicy::default())
    }
}

impl AppState {
    pub fn new(config: DisplayConfig, hour_policy: HourPolicy) -> Self {
        let mut state = Self {
            config,
            status: StatusState::default(),
            hour_policy,
            locale: heapless::String::new(),
        };
        state.set_locale(DEFAULT_LOCALE);
        state
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Replace the locale. Tags longer than [`LOCALE_LEN`] are dropped and
    /// the locale becomes empty, which formats like any unknown locale.
    pub fn set_locale(&mut self, locale: &str) {
        self.locale.clear();
        if self.locale.push_str(locale).is_err() {
            warn!("Locale tag too long, ignoring: {}", locale);
        }
    }
}

#[derive(Error, Debug)]
pub enum WatchError {
    #[error("settings store error: {0}")]
    Store(StoreError),
    #[error("configuration error: {0}")]
    Config(ConfigError),
}

impl From<StoreError> for WatchError {
    fn from(err: StoreError) -> Self {
        Self::Store(err)
    }
}

impl From<ConfigError> for WatchError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}
