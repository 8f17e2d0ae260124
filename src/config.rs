//! Device configuration.

use serde::{Deserialize, Serialize};

use crate::errors::Error;
use crate::output::OutputMapper;

type Result<T> = std::result::Result<T, Error>;

/// Wire format of the status and command payloads.
#[derive(Debug, Default, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PayloadFormat {
    /// One plain value per channel: `ON`/`OFF`, `r,g,b`, `w`, effect name.
    #[default]
    Plain,
    /// Plain channels plus a structured JSON record on the light topics.
    Json,
}

/// Messaging topics, one per channel role.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Topics {
    pub availability: String,
    pub light_status: String,
    pub light_command: String,
    pub rgb_status: String,
    pub rgb_command: String,
    pub white_status: String,
    pub white_command: String,
    pub effect_status: String,
    pub effect_command: String,
}

impl Default for Topics {
    fn default() -> Self {
        Self::with_base(Config::DEFAULT_BASE_TOPIC)
    }
}

impl Topics {
    /// Derive every topic from a common prefix.
    ///
    /// # Examples
    ///
    /// ```
    /// use rgbw_strip_rs::Topics;
    ///
    /// let topics = Topics::with_base("porch/");
    /// assert_eq!(topics.availability, "porch/status");
    /// assert_eq!(topics.rgb_command, "porch/rgb/set");
    /// ```
    pub fn with_base(base: &str) -> Self {
        let topic = |suffix: &str| format!("{base}{suffix}");
        Topics {
            availability: topic("status"),
            light_status: topic("light/status"),
            light_command: topic("light/switch"),
            rgb_status: topic("rgb/status"),
            rgb_command: topic("rgb/set"),
            white_status: topic("white/status"),
            white_command: topic("white/set"),
            effect_status: topic("effect/status"),
            effect_command: topic("effect/set"),
        }
    }

    /// Command topics in subscription order.
    pub fn commands(&self) -> [&str; 4] {
        [
            self.light_command.as_str(),
            self.rgb_command.as_str(),
            self.white_command.as_str(),
            self.effect_command.as_str(),
        ]
    }
}

/// Messaging broker address.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct BrokerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        BrokerConfig {
            host: "atom.home".into(),
            port: 1883,
        }
    }
}

/// Payloads published on the availability topic.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Availability {
    /// Published, retained, after every successful connect.
    pub online: String,
    /// Registered as the last will.
    pub offline: String,
}

impl Default for Availability {
    fn default() -> Self {
        Availability {
            online: "online".into(),
            offline: "offline".into(),
        }
    }
}

/// Heartbeat timing of the on-board status LED.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct IndicatorConfig {
    pub period_ms: u32,
    pub lit_ms: u32,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        IndicatorConfig {
            period_ms: 2200,
            lit_ms: 200,
        }
    }
}

/// Complete device configuration.
///
/// Every field has a default, so a JSON document only needs the values that
/// differ.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub broker: BrokerConfig,
    pub client_id: String,
    pub username: Option<String>,
    pub password: Option<String>,
    /// Prefix used when `topics` is not given explicitly.
    pub base_topic: Option<String>,
    pub topics: Option<Topics>,
    pub reconnect_interval_ms: u32,
    pub payload_format: PayloadFormat,
    pub max_duty: u16,
    pub availability: Availability,
    pub indicator: IndicatorConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            broker: BrokerConfig::default(),
            client_id: Self::DEFAULT_CLIENT_ID.into(),
            username: None,
            password: None,
            base_topic: None,
            topics: None,
            reconnect_interval_ms: Self::DEFAULT_RECONNECT_INTERVAL_MS,
            payload_format: PayloadFormat::default(),
            max_duty: OutputMapper::DEFAULT_MAX_DUTY,
            availability: Availability::default(),
            indicator: IndicatorConfig::default(),
        }
    }
}

impl Config {
    pub const DEFAULT_BASE_TOPIC: &'static str = "outdoor_ledstrip/";
    pub const DEFAULT_CLIENT_ID: &'static str = "outdoor_ledstrip";
    pub const DEFAULT_RECONNECT_INTERVAL_MS: u32 = 60_000;

    /// Load a configuration from JSON, filling in defaults.
    ///
    /// # Examples
    ///
    /// ```
    /// use rgbw_strip_rs::{Config, PayloadFormat};
    ///
    /// let config = Config::from_json(r#"{"base_topic": "deck/", "payload_format": "json"}"#).unwrap();
    /// assert_eq!(config.topics().light_command, "deck/light/switch");
    /// assert_eq!(config.payload_format, PayloadFormat::Json);
    /// assert_eq!(config.reconnect_interval_ms, 60_000);
    /// ```
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(Error::JsonLoad)
    }

    /// Resolved topics: explicit ones first, then the base topic, then defaults.
    pub fn topics(&self) -> Topics {
        match (&self.topics, &self.base_topic) {
            (Some(topics), _) => topics.clone(),
            (None, Some(base)) => Topics::with_base(base),
            (None, None) => Topics::default(),
        }
    }

    pub fn output_mapper(&self) -> OutputMapper {
        OutputMapper::new(self.max_duty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_board() {
        let config = Config::default();
        let topics = config.topics();
        assert_eq!(config.client_id, "outdoor_ledstrip");
        assert_eq!(config.broker.port, 1883);
        assert_eq!(config.max_duty, 1023);
        assert_eq!(topics.availability, "outdoor_ledstrip/status");
        assert_eq!(topics.light_status, "outdoor_ledstrip/light/status");
        assert_eq!(topics.light_command, "outdoor_ledstrip/light/switch");
        assert_eq!(topics.white_status, "outdoor_ledstrip/white/status");
        assert_eq!(topics.effect_command, "outdoor_ledstrip/effect/set");
    }

    #[test]
    fn test_empty_json_is_default() {
        assert_eq!(Config::from_json("{}").unwrap(), Config::default());
    }

    #[test]
    fn test_explicit_topics_win_over_base() {
        let mut topics = Topics::with_base("a/");
        topics.white_command = "custom/white".into();
        let config = Config {
            base_topic: Some("b/".into()),
            topics: Some(topics.clone()),
            ..Config::default()
        };
        assert_eq!(config.topics(), topics);
    }

    #[test]
    fn test_overrides_and_credentials() {
        let config = Config::from_json(
            r#"{
                "broker": {"host": "10.0.0.2", "port": 1884},
                "client_id": "deck",
                "username": "u",
                "password": "p",
                "max_duty": 255,
                "availability": {"online": "up", "offline": "down"}
            }"#,
        )
        .unwrap();
        assert_eq!(config.broker.host, "10.0.0.2");
        assert_eq!(config.username.as_deref(), Some("u"));
        assert_eq!(config.output_mapper().max_duty(), 255);
        assert_eq!(config.availability.offline, "down");
    }

    #[test]
    fn test_bad_json_is_error() {
        assert!(matches!(
            Config::from_json("{\"max_duty\": -1}"),
            Err(Error::JsonLoad(_))
        ));
    }

    #[test]
    fn test_command_topics_order() {
        let topics = Topics::default();
        assert_eq!(
            topics.commands(),
            [
                "outdoor_ledstrip/light/switch",
                "outdoor_ledstrip/rgb/set",
                "outdoor_ledstrip/white/set",
                "outdoor_ledstrip/effect/set",
            ]
        );
    }
}
