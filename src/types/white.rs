//! Auxiliary white channel level.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::Error;
use crate::types::parse_component;

/// White LED intensity, from 0 to 255.
///
/// The strip has a dedicated white channel next to the RGB channels. It is
/// driven independently and only rendered while no effect is active.
#[derive(Default, Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(transparent)]
pub struct White {
    pub(crate) value: u8,
}

impl White {
    pub fn new(value: u8) -> Self {
        White { value }
    }

    /// Get the white value.
    pub fn value(&self) -> u8 {
        self.value
    }
}

impl FromStr for White {
    type Err = Error;

    /// Parse a single decimal integer.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::str::FromStr;
    /// use rgbw_strip_rs::White;
    ///
    /// assert_eq!(White::from_str("128").unwrap().value(), 128);
    /// assert!(White::from_str("256").is_err());
    /// assert!(White::from_str("bright").is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Error> {
        parse_component("white", s).map(White::new)
    }
}

impl fmt::Display for White {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}
