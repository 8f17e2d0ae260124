//! Messaging session: connection lifecycle and command handling.
//!
//! The session is polled once per tick. It never blocks waiting for the
//! broker; a failed connect is retried only after the reconnect interval has
//! passed since the previous attempt.

use log::{debug, error, info, warn};
use serde::Serialize;
use strum_macros::Display;

use crate::clock::time_at_or_after;
use crate::config::{Availability, BrokerConfig, Config, PayloadFormat, Topics};
use crate::controller::LightController;
use crate::errors::Error;
use crate::history::{MessageHistory, MessageType};
use crate::payload::{Command, CommandTopic};
use crate::status::{self, StatusChannel, StatusMessage, StatusSnapshot};

type Result<T> = std::result::Result<T, Error>;

/// A message delivered by the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub topic: String,
    pub payload: Vec<u8>,
}

impl InboundMessage {
    pub fn new(topic: impl Into<String>, payload: impl Into<Vec<u8>>) -> Self {
        InboundMessage {
            topic: topic.into(),
            payload: payload.into(),
        }
    }
}

/// Everything the transport needs to open a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectOptions<'a> {
    pub host: &'a str,
    pub port: u16,
    pub client_id: &'a str,
    pub username: Option<&'a str>,
    pub password: Option<&'a str>,
    /// Published by the broker, retained, if the link drops uncleanly.
    pub will_topic: &'a str,
    pub will_payload: &'a str,
}

/// Publish/subscribe client used by the session.
///
/// Implementations must return promptly from every call: a connect attempt
/// either succeeds or fails inside `connect`.
pub trait Transport {
    fn connect(&mut self, options: &ConnectOptions<'_>) -> Result<()>;

    fn is_connected(&self) -> bool;

    fn publish(&mut self, topic: &str, payload: &str, retained: bool) -> Result<()>;

    fn subscribe(&mut self, topic: &str) -> Result<()>;

    /// Service the link and drain the messages buffered so far.
    fn poll(&mut self) -> Vec<InboundMessage>;
}

/// Whether the session believes the link is up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
pub enum Phase {
    Disconnected,
    Connected,
}

/// Transport lifecycle bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ConnectionState {
    pub phase: Phase,
    pub last_connect_attempt_at: u32,
    pub has_attempted_connect: bool,
}

impl Default for ConnectionState {
    fn default() -> Self {
        ConnectionState {
            phase: Phase::Disconnected,
            last_connect_attempt_at: 0,
            has_attempted_connect: false,
        }
    }
}

impl ConnectionState {
    /// True when a new connect attempt is allowed at `now`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rgbw_strip_rs::ConnectionState;
    ///
    /// let mut conn = ConnectionState::default();
    /// assert!(conn.should_attempt(0, 60_000));
    ///
    /// conn.has_attempted_connect = true;
    /// conn.last_connect_attempt_at = 1_000;
    /// assert!(!conn.should_attempt(60_999, 60_000));
    /// assert!(conn.should_attempt(61_000, 60_000));
    /// ```
    pub fn should_attempt(&self, now: u32, interval_ms: u32) -> bool {
        self.phase == Phase::Disconnected
            && (!self.has_attempted_connect
                || time_at_or_after(self.last_connect_attempt_at.wrapping_add(interval_ms), now))
    }
}

/// Session and command layer.
#[derive(Debug)]
pub struct Session {
    topics: Topics,
    format: PayloadFormat,
    broker: BrokerConfig,
    client_id: String,
    username: Option<String>,
    password: Option<String>,
    availability: Availability,
    reconnect_interval_ms: u32,
    connection: ConnectionState,
    history: MessageHistory,
}

impl Session {
    pub fn new(config: &Config) -> Self {
        Session {
            topics: config.topics(),
            format: config.payload_format,
            broker: config.broker.clone(),
            client_id: config.client_id.clone(),
            username: config.username.clone(),
            password: config.password.clone(),
            availability: config.availability.clone(),
            reconnect_interval_ms: config.reconnect_interval_ms,
            connection: ConnectionState::default(),
            history: MessageHistory::new(),
        }
    }

    pub fn topics(&self) -> &Topics {
        &self.topics
    }

    pub fn format(&self) -> PayloadFormat {
        self.format
    }

    pub fn connection(&self) -> &ConnectionState {
        &self.connection
    }

    pub fn history(&self) -> &MessageHistory {
        &self.history
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    pub fn connect_options(&self) -> ConnectOptions<'_> {
        ConnectOptions {
            host: &self.broker.host,
            port: self.broker.port,
            client_id: &self.client_id,
            username: self.username.as_deref(),
            password: self.password.as_deref(),
            will_topic: &self.topics.availability,
            will_payload: &self.availability.offline,
        }
    }

    /// One session step: drain commands, track the link, reconnect if due.
    pub fn service<T: Transport + ?Sized>(
        &mut self,
        transport: &mut T,
        controller: &mut LightController,
        now: u32,
    ) {
        for message in transport.poll() {
            self.handle_message(transport, controller, &message, now);
        }

        if self.connection.phase == Phase::Connected && !transport.is_connected() {
            info!("Lost connection with broker");
            self.connection.phase = Phase::Disconnected;
        }

        if self.connection.should_attempt(now, self.reconnect_interval_ms) {
            self.connect(transport, controller, now);
        }
    }

    /// Decode and apply one inbound message.
    ///
    /// Returns true when the command was accepted.
    pub fn handle_message<T: Transport + ?Sized>(
        &mut self,
        transport: &mut T,
        controller: &mut LightController,
        message: &InboundMessage,
        now: u32,
    ) -> bool {
        let command = match self.decode(message) {
            Ok(command) => command,
            Err(e) => {
                let payload = String::from_utf8_lossy(&message.payload);
                warn!("Dropping message on {}: {}", message.topic, e);
                self.history
                    .record_rejected(&message.topic, &payload, &e.to_string(), now);
                return false;
            }
        };

        let payload = String::from_utf8_lossy(&message.payload);
        debug!("Topic: {}, payload: {}", message.topic, payload);
        self.history
            .record(MessageType::Receive, &message.topic, &payload, now);

        if !controller.apply(&command) {
            debug!("Command left state unchanged: {:?}", command);
        }
        let channels = StatusChannel::affected_by(&command, self.format);
        self.publish_status(transport, controller, &channels, now);
        true
    }

    fn decode(&self, message: &InboundMessage) -> Result<Command> {
        let route = CommandTopic::route(&self.topics, &message.topic)
            .ok_or_else(|| Error::UnknownTopic(message.topic.clone()))?;
        let text = match route {
            // power has no rejection path
            CommandTopic::Power => String::from_utf8_lossy(&message.payload).into_owned(),
            _ => String::from_utf8(message.payload.clone()).map_err(Error::Utf8Decode)?,
        };
        Command::decode(route, &text, self.format)
    }

    fn connect<T: Transport + ?Sized>(
        &mut self,
        transport: &mut T,
        controller: &LightController,
        now: u32,
    ) {
        self.connection.has_attempted_connect = true;
        self.connection.last_connect_attempt_at = now;

        info!(
            "Connecting to broker {}:{}...",
            self.broker.host, self.broker.port
        );
        let result = transport.connect(&self.connect_options());
        if let Err(e) = result {
            warn!("Failed to connect to broker: {}", e);
            self.history.record_error(&e.to_string());
            return;
        }

        self.connection.phase = Phase::Connected;
        info!("Connected to broker as {}", self.client_id);
        self.on_connected(transport, controller, now);
    }

    fn on_connected<T: Transport + ?Sized>(
        &mut self,
        transport: &mut T,
        controller: &LightController,
        now: u32,
    ) {
        let online = StatusMessage {
            topic: self.topics.availability.clone(),
            payload: self.availability.online.clone(),
        };
        self.publish(transport, &online, now);

        let snapshot = StatusSnapshot::of(controller);
        match status::encode_all(&snapshot, &self.topics, self.format) {
            Ok(messages) => {
                for message in &messages {
                    self.publish(transport, message, now);
                }
            }
            Err(e) => {
                error!("Failed to encode status: {}", e);
                self.history.record_error(&e.to_string());
            }
        }

        for topic in self.topics.commands() {
            if let Err(e) = transport.subscribe(topic) {
                error!("Failed to subscribe to {}: {}", topic, e);
                self.history.record_error(&e.to_string());
            }
        }
    }

    fn publish_status<T: Transport + ?Sized>(
        &mut self,
        transport: &mut T,
        controller: &LightController,
        channels: &[StatusChannel],
        now: u32,
    ) {
        let snapshot = StatusSnapshot::of(controller);
        for &channel in channels {
            match status::encode(channel, &snapshot, &self.topics, self.format) {
                Ok(message) => self.publish(transport, &message, now),
                Err(e) => {
                    error!("Failed to encode {} status: {}", channel, e);
                    self.history.record_error(&e.to_string());
                }
            }
        }
    }

    fn publish<T: Transport + ?Sized>(
        &mut self,
        transport: &mut T,
        message: &StatusMessage,
        now: u32,
    ) {
        match transport.publish(&message.topic, &message.payload, true) {
            Ok(()) => {
                debug!("Published {}: {}", message.topic, message.payload);
                self.history
                    .record(MessageType::Publish, &message.topic, &message.payload, now);
            }
            Err(e) => {
                error!("Failed to publish {}: {}", message.topic, e);
                self.history.record_error(&e.to_string());
            }
        }
    }
}
