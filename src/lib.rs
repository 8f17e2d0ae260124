//! # rgbw_strip_rs
//!
//! Device core for an RGBW LED strip driven over an MQTT-style broker.
//!
//! The crate owns the light state, decodes inbound commands, renders the four
//! PWM channels every tick and publishes retained status so that a home
//! automation controller always sees the current state. The broker client,
//! the PWM peripheral and the millisecond clock are supplied by the caller
//! through the [`Transport`], [`ChannelWriter`] and [`Clock`] traits.
//!
//! ## Quick Start
//!
//! ```ignore
//! use rgbw_strip_rs::{Config, Device};
//!
//! let config = Config::from_json(r#"{"broker": {"host": "10.0.0.2", "port": 1883}}"#)?;
//! let mut device = Device::new(&config, my_transport, my_pwm, my_clock);
//! loop {
//!     device.tick();
//! }
//! ```
//!
//! ## Topics
//!
//! With the default base `outdoor_ledstrip/`:
//!
//! | Topic | Direction | Payload |
//! |-------|-----------|---------|
//! | `status` | out | `online`, or `offline` as last will |
//! | `light/switch` / `light/status` | in / out | `ON` or `OFF` |
//! | `rgb/set` / `rgb/status` | in / out | `r,g,b` |
//! | `white/set` / `white/status` | in / out | `0`..`255` |
//! | `effect/set` / `effect/status` | in / out | effect name, empty clears |
//!
//! Every status publication is retained.
//!
//! ## Runtime Selection
//!
//! The [`runtime`] module paces a device from an async runtime. Select one
//! with feature flags:
//!
//! - `runtime-tokio` (default): Use the tokio async runtime
//! - `runtime-async-std`: Use the async-std runtime
//! - `runtime-smol`: Use the smol runtime
//!
//! Only one runtime feature should be enabled at a time.

pub mod clock;
mod config;
mod controller;
mod device;
mod effect;
mod errors;
mod history;
mod indicator;
mod output;
mod payload;
pub mod runtime;
mod session;
mod state;
pub mod status;
mod types;

#[cfg(test)]
mod testing;

// Re-export public API
pub use clock::Clock;
pub use config::{Availability, BrokerConfig, Config, IndicatorConfig, PayloadFormat, Topics};
pub use controller::LightController;
pub use device::Device;
pub use effect::{EffectBehavior, EffectId, EffectRegistry, RainbowEffect};
pub use errors::Error;
pub use history::{HistoryEntry, HistorySummary, MessageHistory, MessageType};
pub use indicator::StatusIndicator;
pub use output::{ChannelWriter, OutputMapper, write_frame};
pub use payload::{Command, CommandTopic, LightCommand};
pub use session::{ConnectOptions, ConnectionState, InboundMessage, Phase, Session, Transport};
pub use state::LightState;
pub use status::{StatusChannel, StatusMessage, StatusSnapshot};
pub use types::{CHANNEL_COUNT, Channel, Color, DutyCycle, Intensities, PowerMode, White};
