//! In-crate fakes for the hardware, transport and clock traits.

use std::cell::Cell;

use crate::clock::Clock;
use crate::errors::Error;
use crate::output::ChannelWriter;
use crate::session::{ConnectOptions, InboundMessage, Transport};
use crate::types::{CHANNEL_COUNT, Channel, DutyCycle};

#[derive(Debug, Default)]
pub(crate) struct RecordingWriter {
    pub channels: [DutyCycle; CHANNEL_COUNT],
    pub writes: usize,
    pub indicator: bool,
}

impl ChannelWriter for RecordingWriter {
    fn write(&mut self, channel: Channel, duty: DutyCycle) {
        self.channels[channel.index()] = duty;
        self.writes += 1;
    }

    fn set_indicator(&mut self, lit: bool) {
        self.indicator = lit;
    }
}

#[derive(Debug, Default)]
pub(crate) struct ManualClock {
    now: Cell<u32>,
}

impl ManualClock {
    pub fn at(now: u32) -> Self {
        ManualClock {
            now: Cell::new(now),
        }
    }

    pub fn set(&self, now: u32) {
        self.now.set(now);
    }

    pub fn advance(&self, ms: u32) {
        self.now.set(self.now.get().wrapping_add(ms));
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> u32 {
        self.now.get()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Publication {
    pub topic: String,
    pub payload: String,
    pub retained: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RecordedOptions {
    pub client_id: String,
    pub username: Option<String>,
    pub password: Option<String>,
    pub will_topic: String,
    pub will_payload: String,
}

#[derive(Debug)]
pub(crate) struct FakeTransport {
    pub connected: bool,
    pub accept_connect: bool,
    pub connect_attempts: usize,
    pub last_options: Option<RecordedOptions>,
    pub published: Vec<Publication>,
    pub subscriptions: Vec<String>,
    pub inbox: Vec<InboundMessage>,
}

impl Default for FakeTransport {
    fn default() -> Self {
        FakeTransport {
            connected: false,
            accept_connect: true,
            connect_attempts: 0,
            last_options: None,
            published: Vec::new(),
            subscriptions: Vec::new(),
            inbox: Vec::new(),
        }
    }
}

impl FakeTransport {
    pub fn push(&mut self, topic: &str, payload: impl Into<Vec<u8>>) {
        self.inbox.push(InboundMessage::new(topic, payload));
    }

    pub fn published_payloads(&self) -> Vec<(&str, &str)> {
        self.published
            .iter()
            .map(|p| (p.topic.as_str(), p.payload.as_str()))
            .collect()
    }
}

impl Transport for FakeTransport {
    fn connect(&mut self, options: &ConnectOptions<'_>) -> Result<(), Error> {
        self.connect_attempts += 1;
        self.last_options = Some(RecordedOptions {
            client_id: options.client_id.to_string(),
            username: options.username.map(String::from),
            password: options.password.map(String::from),
            will_topic: options.will_topic.to_string(),
            will_payload: options.will_payload.to_string(),
        });
        if self.accept_connect {
            self.connected = true;
            Ok(())
        } else {
            Err(Error::transport("connect", "connection refused"))
        }
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    fn publish(&mut self, topic: &str, payload: &str, retained: bool) -> Result<(), Error> {
        if !self.connected {
            return Err(Error::transport("publish", "not connected"));
        }
        self.published.push(Publication {
            topic: topic.to_string(),
            payload: payload.to_string(),
            retained,
        });
        Ok(())
    }

    fn subscribe(&mut self, topic: &str) -> Result<(), Error> {
        self.subscriptions.push(topic.to_string());
        Ok(())
    }

    fn poll(&mut self) -> Vec<InboundMessage> {
        std::mem::take(&mut self.inbox)
    }
}
