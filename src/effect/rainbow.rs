//! Slow color cycle across the RGB channels.

use std::f32::consts::FRAC_PI_2;

use crate::effect::EffectBehavior;
use crate::types::{Channel, Intensities};

/// Phase-shifted sine waves on red, green and blue; white stays dark.
///
/// Each color channel swings between 0.1 and 1.0 with a period of about
/// 6.3 seconds.
#[derive(Debug, Default, Clone, Copy)]
pub struct RainbowEffect;

impl RainbowEffect {
    pub const NAME: &'static str = "rainbow";

    /// Angular speed in radians per millisecond.
    const OMEGA: f32 = 0.001;
    const FLOOR: f32 = 0.1;
}

impl EffectBehavior for RainbowEffect {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn render(&self, elapsed_ms: u32) -> Intensities {
        let t = elapsed_ms as f32;
        let mut out = [0.0; 4];
        for (i, level) in out.iter_mut().take(Channel::White.index()).enumerate() {
            let wave = (1.0 + (Self::OMEGA * t + i as f32 * FRAC_PI_2).sin()) / 2.0;
            *level = Self::FLOOR + (1.0 - Self::FLOOR) * wave;
        }
        out[Channel::White.index()] = 0.0;
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn test_start_of_cycle() {
        let frame = RainbowEffect.render(0);
        // sin(0) = 0, sin(pi/2) = 1, sin(pi) = 0
        assert!(close(frame[0], 0.55));
        assert!(close(frame[1], 1.0));
        assert!(close(frame[2], 0.55));
        assert_eq!(frame[3], 0.0);
    }

    #[test]
    fn test_is_pure() {
        assert_eq!(RainbowEffect.render(0), RainbowEffect.render(0));
        assert_eq!(RainbowEffect.render(12_345), RainbowEffect.render(12_345));
    }

    #[test]
    fn test_white_always_dark_and_colors_bounded() {
        for t in (0..20_000).step_by(137) {
            let frame = RainbowEffect.render(t);
            assert_eq!(frame[3], 0.0);
            for level in &frame[..3] {
                assert!((0.1 - 1e-4..=1.0 + 1e-4).contains(level));
            }
        }
    }

    #[test]
    fn test_changes_over_time() {
        assert_ne!(RainbowEffect.render(0), RainbowEffect.render(1_000));
    }
}
