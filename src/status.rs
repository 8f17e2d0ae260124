//! Retained status publications.

use serde::Serialize;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter};

use crate::config::{PayloadFormat, Topics};
use crate::controller::LightController;
use crate::errors::Error;
use crate::payload::Command;
use crate::types::{Color, PowerMode, White};

type Result<T> = std::result::Result<T, Error>;

/// Effect value of the structured record when no effect is active.
pub const NO_EFFECT: &str = "none";

/// One retained status channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, Display)]
#[strum(serialize_all = "lowercase")]
pub enum StatusChannel {
    Light,
    Rgb,
    White,
    Effect,
}

impl StatusChannel {
    pub fn topic<'a>(&self, topics: &'a Topics) -> &'a str {
        match self {
            StatusChannel::Light => &topics.light_status,
            StatusChannel::Rgb => &topics.rgb_status,
            StatusChannel::White => &topics.white_status,
            StatusChannel::Effect => &topics.effect_status,
        }
    }

    /// Channels that must be republished after `command` was accepted.
    ///
    /// With the structured format the light record carries every field, so
    /// it is republished for any command.
    pub fn affected_by(command: &Command, format: PayloadFormat) -> Vec<StatusChannel> {
        let mut channels = match command {
            Command::Power(_) => vec![StatusChannel::Light],
            Command::Color(_) => vec![StatusChannel::Rgb],
            Command::White(_) => vec![StatusChannel::White],
            Command::Effect(_) => vec![StatusChannel::Effect],
            Command::Light(cmd) => {
                let mut channels = vec![StatusChannel::Light];
                if cmd.color.is_some() {
                    channels.push(StatusChannel::Rgb);
                }
                if cmd.white.is_some() {
                    channels.push(StatusChannel::White);
                }
                if cmd.effect.is_some() {
                    channels.push(StatusChannel::Effect);
                }
                channels
            }
        };
        if format == PayloadFormat::Json && !channels.contains(&StatusChannel::Light) {
            channels.insert(0, StatusChannel::Light);
        }
        channels
    }
}

/// Point-in-time view of the light used for encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusSnapshot<'a> {
    pub power: PowerMode,
    pub color: Color,
    pub white: White,
    pub effect: Option<&'a str>,
}

impl<'a> StatusSnapshot<'a> {
    pub fn of(controller: &'a LightController) -> Self {
        let state = controller.state();
        StatusSnapshot {
            power: state.power_mode(),
            color: state.color(),
            white: state.white(),
            effect: controller.effect_name(),
        }
    }
}

/// The structured light record.
#[derive(Debug, Serialize)]
struct LightRecord<'a> {
    state: &'static str,
    color: Color,
    white_value: u8,
    effect: &'a str,
}

/// A publication ready for the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub topic: String,
    pub payload: String,
}

/// Encode one status channel.
///
/// # Examples
///
/// ```
/// use rgbw_strip_rs::{Color, PayloadFormat, PowerMode, StatusChannel, StatusSnapshot, Topics, White};
/// use rgbw_strip_rs::status::encode;
///
/// let snapshot = StatusSnapshot {
///     power: PowerMode::On,
///     color: Color::rgb(1, 2, 3),
///     white: White::new(4),
///     effect: None,
/// };
/// let msg = encode(StatusChannel::Rgb, &snapshot, &Topics::default(), PayloadFormat::Plain).unwrap();
/// assert_eq!(msg.topic, "outdoor_ledstrip/rgb/status");
/// assert_eq!(msg.payload, "1,2,3");
/// ```
pub fn encode(
    channel: StatusChannel,
    snapshot: &StatusSnapshot<'_>,
    topics: &Topics,
    format: PayloadFormat,
) -> Result<StatusMessage> {
    let payload = match (channel, format) {
        (StatusChannel::Light, PayloadFormat::Plain) => snapshot.power.as_str().to_string(),
        (StatusChannel::Light, PayloadFormat::Json) => {
            let record = LightRecord {
                state: snapshot.power.as_str(),
                color: snapshot.color,
                white_value: snapshot.white.value(),
                effect: snapshot.effect.unwrap_or(NO_EFFECT),
            };
            serde_json::to_string(&record).map_err(Error::JsonDump)?
        }
        (StatusChannel::Rgb, _) => snapshot.color.to_string(),
        (StatusChannel::White, _) => snapshot.white.to_string(),
        (StatusChannel::Effect, _) => snapshot.effect.unwrap_or_default().to_string(),
    };
    Ok(StatusMessage {
        topic: channel.topic(topics).to_string(),
        payload,
    })
}

/// Encode every status channel, in [`StatusChannel`] order.
pub fn encode_all(
    snapshot: &StatusSnapshot<'_>,
    topics: &Topics,
    format: PayloadFormat,
) -> Result<Vec<StatusMessage>> {
    StatusChannel::iter()
        .map(|channel| encode(channel, snapshot, topics, format))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::LightCommand;
    use serde_json::{Value, json};

    fn snapshot(effect: Option<&str>) -> StatusSnapshot<'_> {
        StatusSnapshot {
            power: PowerMode::On,
            color: Color::rgb(255, 10, 0),
            white: White::new(200),
            effect,
        }
    }

    #[test]
    fn test_plain_channels() {
        let topics = Topics::default();
        let all = encode_all(&snapshot(Some("rainbow")), &topics, PayloadFormat::Plain).unwrap();
        let payloads: Vec<&str> = all.iter().map(|m| m.payload.as_str()).collect();
        assert_eq!(payloads, vec!["ON", "255,10,0", "200", "rainbow"]);
        assert_eq!(all[0].topic, topics.light_status);
        assert_eq!(all[3].topic, topics.effect_status);
    }

    #[test]
    fn test_cleared_effect_is_empty_string() {
        let msg = encode(
            StatusChannel::Effect,
            &snapshot(None),
            &Topics::default(),
            PayloadFormat::Plain,
        )
        .unwrap();
        assert_eq!(msg.payload, "");
    }

    #[test]
    fn test_structured_record() {
        let msg = encode(
            StatusChannel::Light,
            &snapshot(None),
            &Topics::default(),
            PayloadFormat::Json,
        )
        .unwrap();
        let value: Value = serde_json::from_str(&msg.payload).unwrap();
        assert_eq!(
            value,
            json!({
                "state": "ON",
                "color": {"r": 255, "g": 10, "b": 0},
                "white_value": 200,
                "effect": "none",
            })
        );
    }

    #[test]
    fn test_structured_record_decodes_as_command() {
        let msg = encode(
            StatusChannel::Light,
            &snapshot(Some("rainbow")),
            &Topics::default(),
            PayloadFormat::Json,
        )
        .unwrap();
        let cmd = LightCommand::from_json(&msg.payload).unwrap();
        assert_eq!(cmd.color, Some(Color::rgb(255, 10, 0)));
        assert_eq!(cmd.effect.as_deref(), Some("rainbow"));
    }

    #[test]
    fn test_affected_channels() {
        let plain = PayloadFormat::Plain;
        assert_eq!(
            StatusChannel::affected_by(&Command::White(White::new(1)), plain),
            vec![StatusChannel::White]
        );
        assert_eq!(
            StatusChannel::affected_by(&Command::White(White::new(1)), PayloadFormat::Json),
            vec![StatusChannel::Light, StatusChannel::White]
        );
        let doc = Command::Light(LightCommand {
            color: Some(Color::new()),
            effect: Some("x".into()),
            ..LightCommand::default()
        });
        assert_eq!(
            StatusChannel::affected_by(&doc, plain),
            vec![StatusChannel::Light, StatusChannel::Rgb, StatusChannel::Effect]
        );
    }
}
