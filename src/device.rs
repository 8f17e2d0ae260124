//! The device aggregate and its tick.

use log::info;
use serde_json::{Value, json};

use crate::clock::Clock;
use crate::config::Config;
use crate::controller::LightController;
use crate::effect::{EffectBehavior, EffectId, EffectRegistry};
use crate::indicator::StatusIndicator;
use crate::output::{ChannelWriter, write_frame};
use crate::session::Session;
use crate::types::{CHANNEL_COUNT, DutyCycle};

/// Everything the firmware owns, driven by one tick at a time.
///
/// # Example
///
/// ```ignore
/// let mut device = Device::new(&Config::default(), transport, pwm, clock);
/// loop {
///     device.tick();
/// }
/// ```
pub struct Device<T, W, C> {
    controller: LightController,
    session: Session,
    indicator: StatusIndicator,
    transport: T,
    writer: W,
    clock: C,
}

impl<T, W, C> Device<T, W, C>
where
    T: crate::session::Transport,
    W: ChannelWriter,
    C: Clock,
{
    /// Boot: light off, link down, built-in effects registered.
    pub fn new(config: &Config, transport: T, writer: W, clock: C) -> Self {
        let boot = clock.now_millis();
        info!("Booting {}", config.client_id);
        Device {
            controller: LightController::new(
                EffectRegistry::default(),
                config.output_mapper(),
                boot,
            ),
            session: Session::new(config),
            indicator: StatusIndicator::new(config.indicator, boot),
            transport,
            writer,
            clock,
        }
    }

    /// Run one cooperative step and return the frame written to the outputs.
    pub fn tick(&mut self) -> [DutyCycle; CHANNEL_COUNT] {
        let now = self.clock.now_millis();
        self.session
            .service(&mut self.transport, &mut self.controller, now);

        let lit = self.indicator.update(now);
        self.writer.set_indicator(lit);

        let frame = self.controller.render_frame(now);
        write_frame(&mut self.writer, &frame);
        frame
    }

    pub fn register_effect(&mut self, behavior: Box<dyn EffectBehavior>) -> EffectId {
        self.controller.register_effect(behavior)
    }

    pub fn controller(&self) -> &LightController {
        &self.controller
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Returns diagnostics including state, connection and history.
    pub fn diagnostics(&self) -> Value {
        let state = self.controller.state();
        let connection = self.session.connection();
        json!({
            "light": {
                "state": state.power_mode().as_str(),
                "color": state.color().to_string(),
                "white": state.white().value(),
                "effect": self.controller.effect_name(),
                "effects": self.controller.effects().names().collect::<Vec<_>>(),
            },
            "connection": {
                "phase": connection.phase.to_string(),
                "has_attempted_connect": connection.has_attempted_connect,
                "last_connect_attempt_at": connection.last_connect_attempt_at,
            },
            "topics": self.session.topics(),
            "payload_format": self.session.format(),
            "history": self.session.history().summary(),
            "indicator": self.indicator.is_lit(),
        })
    }
}
