//! Device state controller.

use log::debug;

use crate::clock::elapsed;
use crate::effect::{EffectBehavior, EffectId, EffectRegistry};
use crate::output::OutputMapper;
use crate::payload::Command;
use crate::state::LightState;
use crate::types::{CHANNEL_COUNT, Color, DutyCycle, White};

/// Owns the [`LightState`] and renders it.
///
/// All mutators take already validated values and report whether the state
/// actually changed.
#[derive(Debug)]
pub struct LightController {
    state: LightState,
    effects: EffectRegistry,
    mapper: OutputMapper,
    boot_millis: u32,
}

impl LightController {
    pub fn new(effects: EffectRegistry, mapper: OutputMapper, boot_millis: u32) -> Self {
        LightController {
            state: LightState::new(),
            effects,
            mapper,
            boot_millis,
        }
    }

    pub fn state(&self) -> &LightState {
        &self.state
    }

    pub fn effects(&self) -> &EffectRegistry {
        &self.effects
    }

    /// Register an extra effect behavior.
    pub fn register_effect(&mut self, behavior: Box<dyn EffectBehavior>) -> EffectId {
        self.effects.register(behavior)
    }

    /// Name of the active effect, if any.
    pub fn effect_name(&self) -> Option<&str> {
        self.state.effect.map(|id| self.effects.name(id))
    }

    pub fn apply_power(&mut self, on: bool) -> bool {
        let changed = self.state.power != on;
        self.state.power = on;
        if changed {
            debug!("Power {}", if on { "on" } else { "off" });
        }
        changed
    }

    pub fn apply_color(&mut self, color: Color) -> bool {
        let changed = self.state.color != color;
        self.state.color = color;
        if changed {
            debug!("Color {}", color);
        }
        changed
    }

    pub fn apply_white(&mut self, white: White) -> bool {
        let changed = self.state.white != white;
        self.state.white = white;
        if changed {
            debug!("White {}", white);
        }
        changed
    }

    pub fn apply_color_white(&mut self, color: Color, white: White) -> bool {
        let color_changed = self.apply_color(color);
        let white_changed = self.apply_white(white);
        color_changed || white_changed
    }

    /// Select an effect by name; `None` or an unknown name clears it.
    ///
    /// Every selection that resolves runs the effect's reset hook, including
    /// re-selecting the active one; only a different effect counts as a change.
    pub fn apply_effect(&mut self, name: Option<&str>) -> bool {
        let next = name.and_then(|n| self.effects.lookup(n));
        if let Some(id) = next {
            self.effects.activate(id);
        }
        if next == self.state.effect {
            return false;
        }
        self.state.effect = next;
        debug!("Effect {}", self.effect_name().unwrap_or("cleared"));
        true
    }

    /// Apply a decoded command; fields a structured command leaves out are kept.
    pub fn apply(&mut self, command: &Command) -> bool {
        match command {
            Command::Power(mode) => self.apply_power(mode.is_on()),
            Command::Color(color) => self.apply_color(*color),
            Command::White(white) => self.apply_white(*white),
            Command::Effect(name) => self.apply_effect(name.as_deref()),
            Command::Light(cmd) => {
                let mut changed = false;
                if let Some(mode) = cmd.power {
                    changed |= self.apply_power(mode.is_on());
                }
                let color = cmd.color.unwrap_or(self.state.color);
                let white = cmd.white.unwrap_or(self.state.white);
                changed |= self.apply_color_white(color, white);
                if let Some(name) = &cmd.effect {
                    changed |= self.apply_effect(Some(name.as_str()));
                }
                changed
            }
        }
    }

    /// Duty cycles for all four channels at `now`.
    pub fn render_frame(&self, now: u32) -> [DutyCycle; CHANNEL_COUNT] {
        if !self.state.power {
            return [DutyCycle::ZERO; CHANNEL_COUNT];
        }
        let intensities = match self.state.effect {
            Some(id) => self
                .effects
                .render_tick(id, elapsed(self.boot_millis, now)),
            None => {
                let [r, g, b] = self.state.color.components();
                [r, g, b, self.state.white.value()].map(|v| f32::from(v) / 255.0)
            }
        };
        self.mapper.frame(&intensities)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effect::RainbowEffect;
    use crate::payload::LightCommand;
    use crate::types::{Intensities, PowerMode};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn controller() -> LightController {
        LightController::new(EffectRegistry::default(), OutputMapper::new(255), 0)
    }

    #[test]
    fn test_boot_state() {
        let c = controller();
        assert_eq!(*c.state(), LightState::new());
        assert!(!c.state().power());
        assert_eq!(c.state().color(), Color::new());
        assert_eq!(c.state().white().value(), 0);
        assert!(c.state().effect().is_none());
    }

    #[test]
    fn test_mutators_report_change() {
        let mut c = controller();
        assert!(c.apply_power(true));
        assert!(!c.apply_power(true));
        assert!(c.apply_color_white(Color::rgb(1, 2, 3), White::new(4)));
        assert!(!c.apply_color_white(Color::rgb(1, 2, 3), White::new(4)));
        assert!(c.apply_color_white(Color::rgb(1, 2, 3), White::new(5)));
        assert!(c.apply_effect(Some("rainbow")));
        assert!(!c.apply_effect(Some("rainbow")));
        assert!(c.apply_effect(None));
        assert!(!c.apply_effect(Some("nope")));
    }

    #[test]
    fn test_reselecting_effect_resets_without_change() {
        struct Counted(Arc<AtomicUsize>);
        impl EffectBehavior for Counted {
            fn name(&self) -> &str {
                "counted"
            }
            fn reset(&mut self) {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
            fn render(&self, _elapsed_ms: u32) -> Intensities {
                [0.0; 4]
            }
        }

        let resets = Arc::new(AtomicUsize::new(0));
        let mut c = controller();
        c.register_effect(Box::new(Counted(Arc::clone(&resets))));
        assert!(c.apply_effect(Some("counted")));
        assert!(!c.apply_effect(Some("counted")));
        assert_eq!(resets.load(Ordering::SeqCst), 2);
        assert!(c.apply_effect(Some("unknown")));
        assert!(c.effect_name().is_none());
        assert_eq!(resets.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_off_renders_zero() {
        let mut c = controller();
        c.apply_color_white(Color::rgb(255, 255, 255), White::new(255));
        c.apply_effect(Some(RainbowEffect::NAME));
        assert_eq!(c.render_frame(1_234), [DutyCycle::ZERO; 4]);
    }

    #[test]
    fn test_static_render() {
        let mut c = controller();
        c.apply_power(true);
        c.apply_color_white(Color::rgb(255, 128, 0), White::new(64));
        assert_eq!(
            c.render_frame(0),
            [DutyCycle(255), DutyCycle(128), DutyCycle(0), DutyCycle(64)]
        );
    }

    #[test]
    fn test_effect_render_is_idempotent_and_keeps_color() {
        let mut c = controller();
        c.apply_power(true);
        c.apply_color_white(Color::rgb(10, 20, 30), White::new(40));
        c.apply_effect(Some("rainbow"));
        let first = c.render_frame(5_000);
        assert_eq!(first, c.render_frame(5_000));
        assert_eq!(first[3], DutyCycle::ZERO);
        assert_eq!(c.state().color(), Color::rgb(10, 20, 30));
    }

    #[test]
    fn test_unknown_effect_falls_back_to_static() {
        let mut c = controller();
        c.apply_power(true);
        c.apply_color_white(Color::rgb(1, 2, 3), White::new(4));
        c.apply_effect(Some("rainbow"));
        assert!(c.apply_effect(Some("disco")));
        assert!(c.state().effect().is_none());
        assert_eq!(
            c.render_frame(9_999),
            [DutyCycle(1), DutyCycle(2), DutyCycle(3), DutyCycle(4)]
        );
    }

    #[test]
    fn test_effect_time_is_relative_to_boot() {
        let mut late = LightController::new(EffectRegistry::default(), OutputMapper::default(), 1_000);
        late.apply_power(true);
        late.apply_effect(Some("rainbow"));
        let mut early = LightController::new(EffectRegistry::default(), OutputMapper::default(), 0);
        early.apply_power(true);
        early.apply_effect(Some("rainbow"));
        assert_eq!(late.render_frame(1_500), early.render_frame(500));
    }

    #[test]
    fn test_apply_structured_keeps_missing_fields() {
        let mut c = controller();
        c.apply_color_white(Color::rgb(9, 9, 9), White::new(9));
        let changed = c.apply(&Command::Light(LightCommand {
            power: Some(PowerMode::On),
            white: Some(White::new(1)),
            ..LightCommand::default()
        }));
        assert!(changed);
        assert!(c.state().power());
        assert_eq!(c.state().color(), Color::rgb(9, 9, 9));
        assert_eq!(c.state().white(), White::new(1));
    }

    #[test]
    fn test_apply_structured_none_effect_clears() {
        let mut c = controller();
        c.apply_effect(Some("rainbow"));
        assert!(c.apply(&Command::Light(LightCommand {
            effect: Some("none".into()),
            ..LightCommand::default()
        })));
        assert!(c.effect_name().is_none());
    }

    #[test]
    fn test_apply_plain_commands() {
        let mut c = controller();
        assert!(c.apply(&Command::Power(PowerMode::On)));
        assert!(c.apply(&Command::Color(Color::rgb(1, 1, 1))));
        assert!(!c.apply(&Command::White(White::new(0))));
        assert!(c.apply(&Command::Effect(Some("rainbow".into()))));
        assert_eq!(c.effect_name(), Some("rainbow"));
        assert!(c.apply(&Command::Effect(None)));
    }
}
