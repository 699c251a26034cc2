//! Companion configuration page response.
//!
//! The phone-side settings page returns a JSON object such as
//! `{"backgroundColor":"000000","foregroundColor":"ffffff","displayStatusBar":true}`.
//! Colors are hex strings without a prefix. The companion only forwards a
//! message to the watch when `backgroundColor` is present.

use anyhow::{Context, Result, anyhow};
use log::{debug, info};
use serde::Deserialize;

use neolog_core::config::{ConfigMessage, parse_hex_color};

#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebConfig {
    pub background_color: Option<String>,
    pub foreground_color: Option<String>,
    pub display_status_bar: Option<bool>,
}

impl WebConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("companion response is not valid JSON")
    }

    /// Turn the page response into the message sent to the watch.
    ///
    /// `None` when the response carries no background color. Empty strings
    /// count as absent.
    pub fn into_message(self) -> Result<Option<ConfigMessage>> {
        let Some(background) = present(self.background_color.as_deref()) else {
            info!("Companion response has no backgroundColor, nothing sent");
            return Ok(None);
        };

        let message = ConfigMessage {
            background_color: Some(parse_color("backgroundColor", background)?),
            foreground_color: present(self.foreground_color.as_deref())
                .map(|hex| parse_color("foregroundColor", hex))
                .transpose()?,
            status_bar: self.display_status_bar,
        };
        debug!("Companion message: {:?}", message);
        Ok(Some(message))
    }
}

/// The page sends `""` for untouched color pickers
fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.trim().is_empty())
}

fn parse_color(field: &str, hex: &str) -> Result<i32> {
    let color = parse_hex_color(hex).map_err(|e| anyhow!("{field} {hex:?}: {e}"))?;
    Ok(color as i32)
}
