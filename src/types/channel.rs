//! Physical output channels and their duty cycles.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

/// Number of physical output channels on the strip.
pub const CHANNEL_COUNT: usize = 4;

/// Normalized per-channel intensities, indexed by [`Channel::index`].
pub type Intensities = [f32; CHANNEL_COUNT];

/// One of the four PWM outputs driving the strip.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, EnumIter, Display, PartialEq, Eq, Hash)]
#[strum(serialize_all = "lowercase")]
pub enum Channel {
    Red = 0,
    Green = 1,
    Blue = 2,
    White = 3,
}

impl Channel {
    pub fn index(&self) -> usize {
        *self as usize
    }
}

/// Raw PWM duty cycle for one channel, from 0 to the configured maximum.
#[derive(Default, Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[serde(transparent)]
pub struct DutyCycle(pub(crate) u16);

impl DutyCycle {
    pub const ZERO: DutyCycle = DutyCycle(0);

    pub fn new(value: u16) -> Self {
        DutyCycle(value)
    }

    pub fn value(&self) -> u16 {
        self.0
    }
}
