//! Named, time-driven animation behaviors.
//!
//! An effect overrides the static color and white values while it is active.
//! Behaviors are looked up by exact, case-sensitive name; an unknown name means
//! "no effect" rather than an error.

mod rainbow;

use std::fmt;

pub use rainbow::RainbowEffect;

use crate::types::Intensities;

/// An animated rendering behavior.
///
/// `render` takes `&self`: the output must depend on `elapsed_ms` only, so
/// replaying the same time always yields the same frame.
pub trait EffectBehavior: Send {
    /// Name used on the wire to select this effect.
    fn name(&self) -> &str;

    /// Called exactly once each time the effect is activated.
    fn reset(&mut self) {}

    /// Per-channel intensities at `elapsed_ms` milliseconds since boot.
    fn render(&self, elapsed_ms: u32) -> Intensities;
}

/// Handle to a registered effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectId(usize);

/// Lookup table of effect behaviors keyed by name.
pub struct EffectRegistry {
    effects: Vec<Box<dyn EffectBehavior>>,
}

impl Default for EffectRegistry {
    /// Registry with the built-in effects.
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(Box::new(RainbowEffect));
        registry
    }
}

impl fmt::Debug for EffectRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

impl EffectRegistry {
    pub fn empty() -> Self {
        EffectRegistry {
            effects: Vec::new(),
        }
    }

    /// Add a behavior, replacing any existing one with the same name.
    pub fn register(&mut self, behavior: Box<dyn EffectBehavior>) -> EffectId {
        if let Some(id) = self.lookup(behavior.name()) {
            self.effects[id.0] = behavior;
            return id;
        }
        self.effects.push(behavior);
        EffectId(self.effects.len() - 1)
    }

    /// Find an effect by exact name.
    ///
    /// # Examples
    ///
    /// ```
    /// use rgbw_strip_rs::EffectRegistry;
    ///
    /// let registry = EffectRegistry::default();
    /// assert!(registry.lookup("rainbow").is_some());
    /// assert!(registry.lookup("Rainbow").is_none());
    /// ```
    pub fn lookup(&self, name: &str) -> Option<EffectId> {
        self.effects
            .iter()
            .position(|effect| effect.name() == name)
            .map(EffectId)
    }

    pub fn name(&self, id: EffectId) -> &str {
        self.effects[id.0].name()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.effects.iter().map(|effect| effect.name())
    }

    /// Run the activation hook of `id`.
    pub fn activate(&mut self, id: EffectId) {
        self.effects[id.0].reset();
    }

    pub fn render_tick(&self, id: EffectId, elapsed_ms: u32) -> Intensities {
        self.effects[id.0].render(elapsed_ms)
    }
}
