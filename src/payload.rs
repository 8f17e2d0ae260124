//! Inbound command payloads.
//!
//! Each command topic has its own plain payload. The color topic, and the
//! light topic when the structured format is configured, also accept a JSON
//! document carrying several fields at once.

use serde::Deserialize;
use strum_macros::{Display, EnumIter};

use crate::config::{PayloadFormat, Topics};
use crate::errors::Error;
use crate::types::{Color, PowerMode, White, component};

type Result<T> = std::result::Result<T, Error>;

/// Which command topic a message arrived on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, Display)]
#[strum(serialize_all = "lowercase")]
pub enum CommandTopic {
    Power,
    Color,
    White,
    Effect,
}

impl CommandTopic {
    /// Route a topic name to its command, if it is one of ours.
    pub fn route(topics: &Topics, topic: &str) -> Option<Self> {
        if topic == topics.light_command {
            Some(CommandTopic::Power)
        } else if topic == topics.rgb_command {
            Some(CommandTopic::Color)
        } else if topic == topics.white_command {
            Some(CommandTopic::White)
        } else if topic == topics.effect_command {
            Some(CommandTopic::Effect)
        } else {
            None
        }
    }
}

/// A validated state mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Power(PowerMode),
    Color(Color),
    White(White),
    /// Effect name; `None` clears the effect.
    Effect(Option<String>),
    /// Several fields from one structured document.
    Light(LightCommand),
}

/// Fields of a structured command; absent fields keep their current value.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LightCommand {
    pub power: Option<PowerMode>,
    pub color: Option<Color>,
    pub white: Option<White>,
    pub effect: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LightDocument {
    state: Option<String>,
    color: Option<ColorDocument>,
    white_value: Option<i64>,
    effect: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ColorDocument {
    r: i64,
    g: i64,
    b: i64,
}

impl LightCommand {
    /// Parse and validate a structured document.
    ///
    /// Any out-of-range number rejects the whole document.
    ///
    /// # Examples
    ///
    /// ```
    /// use rgbw_strip_rs::{Color, LightCommand, PowerMode};
    ///
    /// let cmd = LightCommand::from_json(r#"{"state":"ON","color":{"r":1,"g":2,"b":3}}"#).unwrap();
    /// assert_eq!(cmd.power, Some(PowerMode::On));
    /// assert_eq!(cmd.color, Some(Color::rgb(1, 2, 3)));
    /// assert!(cmd.white.is_none());
    ///
    /// assert!(LightCommand::from_json(r#"{"white_value":300}"#).is_err());
    /// ```
    pub fn from_json(json: &str) -> Result<Self> {
        let doc: LightDocument = serde_json::from_str(json).map_err(Error::JsonLoad)?;
        let color = match doc.color {
            Some(c) => Some(Color::rgb(
                component("red", c.r)?,
                component("green", c.g)?,
                component("blue", c.b)?,
            )),
            None => None,
        };
        let white = match doc.white_value {
            Some(w) => Some(White::new(component("white", w)?)),
            None => None,
        };
        Ok(LightCommand {
            power: doc.state.as_deref().map(PowerMode::from_payload),
            color,
            white,
            effect: doc.effect,
        })
    }
}

fn is_document(payload: &str) -> bool {
    payload.trim_start().starts_with('{')
}

impl Command {
    /// Decode a payload received on `topic`.
    ///
    /// Power never fails: anything but `ON` or a valid structured document
    /// means off. Color and white reject malformed or out-of-range values.
    /// Effect names are passed through untouched; an unknown name clears the
    /// effect when applied.
    ///
    /// # Examples
    ///
    /// ```
    /// use rgbw_strip_rs::{Color, Command, CommandTopic, PayloadFormat, PowerMode};
    ///
    /// let fmt = PayloadFormat::Plain;
    /// assert_eq!(
    ///     Command::decode(CommandTopic::Color, "10,20,30", fmt).unwrap(),
    ///     Command::Color(Color::rgb(10, 20, 30))
    /// );
    /// assert_eq!(
    ///     Command::decode(CommandTopic::Power, "garbage", fmt).unwrap(),
    ///     Command::Power(PowerMode::Off)
    /// );
    /// assert!(Command::decode(CommandTopic::White, "999", fmt).is_err());
    /// ```
    pub fn decode(topic: CommandTopic, payload: &str, format: PayloadFormat) -> Result<Self> {
        match topic {
            // a broken document is still a power command, and not `ON`
            CommandTopic::Power if format == PayloadFormat::Json && is_document(payload) => {
                Ok(LightCommand::from_json(payload).map_or_else(
                    |_| Command::Power(PowerMode::from_payload(payload)),
                    Command::Light,
                ))
            }
            CommandTopic::Power => Ok(Command::Power(PowerMode::from_payload(payload))),
            CommandTopic::Color if is_document(payload) => {
                LightCommand::from_json(payload).map(Command::Light)
            }
            CommandTopic::Color => payload.parse().map(Command::Color),
            CommandTopic::White => payload.parse().map(Command::White),
            CommandTopic::Effect => Ok(Command::Effect(
                Some(payload)
                    .filter(|name| !name.is_empty())
                    .map(String::from),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAIN: PayloadFormat = PayloadFormat::Plain;
    const JSON: PayloadFormat = PayloadFormat::Json;

    #[test]
    fn test_route() {
        let topics = Topics::default();
        assert_eq!(
            CommandTopic::route(&topics, "outdoor_ledstrip/light/switch"),
            Some(CommandTopic::Power)
        );
        assert_eq!(
            CommandTopic::route(&topics, "outdoor_ledstrip/effect/set"),
            Some(CommandTopic::Effect)
        );
        assert_eq!(CommandTopic::route(&topics, "outdoor_ledstrip/rgb/status"), None);
    }

    #[test]
    fn test_power_is_total() {
        for (payload, expected) in [
            ("ON", PowerMode::On),
            ("OFF", PowerMode::Off),
            ("", PowerMode::Off),
            ("On", PowerMode::Off),
            (" ON", PowerMode::Off),
        ] {
            assert_eq!(
                Command::decode(CommandTopic::Power, payload, PLAIN).unwrap(),
                Command::Power(expected)
            );
        }
    }

    #[test]
    fn test_power_document_only_in_json_format() {
        let doc = r#"{"state":"ON","white_value":9}"#;
        assert_eq!(
            Command::decode(CommandTopic::Power, doc, PLAIN).unwrap(),
            Command::Power(PowerMode::Off)
        );
        assert_eq!(
            Command::decode(CommandTopic::Power, doc, JSON).unwrap(),
            Command::Light(LightCommand {
                power: Some(PowerMode::On),
                white: Some(White::new(9)),
                ..LightCommand::default()
            })
        );
        assert_eq!(
            Command::decode(CommandTopic::Power, "ON", JSON).unwrap(),
            Command::Power(PowerMode::On)
        );
    }

    #[test]
    fn test_color_csv_rejects_out_of_range() {
        assert_eq!(
            Command::decode(CommandTopic::Color, "0,0,256", PLAIN),
            Err(Error::out_of_range("blue", 256))
        );
        assert!(Command::decode(CommandTopic::Color, "a,b,c", PLAIN).is_err());
        assert!(Command::decode(CommandTopic::Color, "", PLAIN).is_err());
    }

    #[test]
    fn test_color_document() {
        let doc = r#"{"state":"OFF","color":{"r":255,"g":0,"b":7},"white_value":0,"effect":"rainbow"}"#;
        assert_eq!(
            Command::decode(CommandTopic::Color, doc, PLAIN).unwrap(),
            Command::Light(LightCommand {
                power: Some(PowerMode::Off),
                color: Some(Color::rgb(255, 0, 7)),
                white: Some(White::new(0)),
                effect: Some("rainbow".into()),
            })
        );
    }

    #[test]
    fn test_document_rejects_any_bad_field() {
        for doc in [
            r#"{"color":{"r":-1,"g":0,"b":0}}"#,
            r#"{"color":{"r":0,"g":0}}"#,
            r#"{"color":{"r":0,"g":0.5,"b":0}}"#,
            r#"{"white_value":256}"#,
            r#"{"state":"ON""#,
        ] {
            assert!(Command::decode(CommandTopic::Color, doc, PLAIN).is_err(), "{doc}");
        }
    }

    #[test]
    fn test_white() {
        assert_eq!(
            Command::decode(CommandTopic::White, "255", PLAIN).unwrap(),
            Command::White(White::new(255))
        );
        assert_eq!(
            Command::decode(CommandTopic::White, "-3", PLAIN),
            Err(Error::out_of_range("white", -3))
        );
    }

    #[test]
    fn test_effect_empty_clears() {
        assert_eq!(
            Command::decode(CommandTopic::Effect, "", PLAIN).unwrap(),
            Command::Effect(None)
        );
        assert_eq!(
            Command::decode(CommandTopic::Effect, "rainbow", PLAIN).unwrap(),
            Command::Effect(Some("rainbow".into()))
        );
    }

    #[test]
    fn test_effect_name_is_not_trimmed() {
        assert_eq!(
            Command::decode(CommandTopic::Effect, " rainbow\n", PLAIN).unwrap(),
            Command::Effect(Some(" rainbow\n".into()))
        );
    }

    #[test]
    fn test_broken_power_document_means_off() {
        for doc in ["{garbage", r#"{"state":"ON","white_value":300}"#] {
            assert_eq!(
                Command::decode(CommandTopic::Power, doc, JSON).unwrap(),
                Command::Power(PowerMode::Off),
                "{doc}"
            );
        }
    }
}
