//! Power mode for light control.

use serde::{Deserialize, Serialize};

/// Power state for the strip.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum PowerMode {
    /// Turn the light on
    On,
    /// Turn the light off
    Off,
}

impl PowerMode {
    const ON: &'static str = "ON";
    const OFF: &'static str = "OFF";

    /// Decode a power command.
    ///
    /// Only the exact literal `ON` switches the light on; anything else,
    /// including an empty payload, switches it off.
    ///
    /// # Examples
    ///
    /// ```
    /// use rgbw_strip_rs::PowerMode;
    ///
    /// assert_eq!(PowerMode::from_payload("ON"), PowerMode::On);
    /// assert_eq!(PowerMode::from_payload("on"), PowerMode::Off);
    /// assert_eq!(PowerMode::from_payload(""), PowerMode::Off);
    /// ```
    pub fn from_payload(payload: &str) -> Self {
        if payload == Self::ON {
            PowerMode::On
        } else {
            PowerMode::Off
        }
    }

    pub fn is_on(&self) -> bool {
        matches!(self, PowerMode::On)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PowerMode::On => Self::ON,
            PowerMode::Off => Self::OFF,
        }
    }
}

impl From<bool> for PowerMode {
    fn from(on: bool) -> Self {
        if on { PowerMode::On } else { PowerMode::Off }
    }
}
