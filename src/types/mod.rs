//! Value types for light state and output channels.

mod channel;
mod color;
mod power;
mod white;

pub use channel::{CHANNEL_COUNT, Channel, DutyCycle, Intensities};
pub use color::Color;
pub use power::PowerMode;
pub use white::White;

use crate::errors::Error;

/// Check that a decoded number fits a single 8-bit channel.
pub(crate) fn component(field: &str, value: i64) -> Result<u8, Error> {
    u8::try_from(value).map_err(|_| Error::out_of_range(field, value))
}

/// Parse a decimal channel value, tolerating surrounding whitespace.
pub(crate) fn parse_component(field: &str, text: &str) -> Result<u8, Error> {
    let trimmed = text.trim();
    let value: i64 = trimmed
        .parse()
        .map_err(|_| Error::invalid_integer(field, trimmed))?;
    component(field, value)
}
