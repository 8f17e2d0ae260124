//! Heartbeat blink of the on-board status LED.

use crate::clock::time_at_or_after;
use crate::config::IndicatorConfig;

/// Lights the LED briefly at the end of every period.
#[derive(Debug, Clone, Copy)]
pub struct StatusIndicator {
    period_ms: u32,
    lit_ms: u32,
    last_blink_at: u32,
    lit: bool,
}

impl StatusIndicator {
    pub fn new(config: IndicatorConfig, now: u32) -> Self {
        StatusIndicator {
            period_ms: config.period_ms,
            lit_ms: config.lit_ms.min(config.period_ms),
            last_blink_at: now,
            lit: false,
        }
    }

    pub fn is_lit(&self) -> bool {
        self.lit
    }

    /// Advance to `now` and return whether the LED should be lit.
    pub fn update(&mut self, now: u32) -> bool {
        let lit_at = self
            .last_blink_at
            .wrapping_add(self.period_ms - self.lit_ms);
        if time_at_or_after(lit_at, now) {
            self.lit = true;
        }
        if time_at_or_after(self.last_blink_at.wrapping_add(self.period_ms), now) {
            self.last_blink_at = now;
            self.lit = false;
        }
        self.lit
    }
}
