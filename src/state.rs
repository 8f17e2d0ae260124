//! Canonical light state.

use serde::Serialize;

use crate::effect::EffectId;
use crate::types::{Color, PowerMode, White};

/// What the strip should show.
///
/// While `effect` is set, `color` and `white` are kept but not rendered.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LightState {
    pub(crate) power: bool,
    pub(crate) color: Color,
    pub(crate) white: White,
    #[serde(skip)]
    pub(crate) effect: Option<EffectId>,
}

impl LightState {
    /// Boot state: off, all channels zero, no effect.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn power(&self) -> bool {
        self.power
    }

    pub fn power_mode(&self) -> PowerMode {
        PowerMode::from(self.power)
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn white(&self) -> White {
        self.white
    }

    pub fn effect(&self) -> Option<EffectId> {
        self.effect
    }
}
