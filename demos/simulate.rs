//! Simulated LED strip controller.
//!
//! Runs a device against an in-memory broker and prints the PWM outputs and
//! retained status it produces.
//!
//! Run with: cargo run --example simulate -- --help

use std::collections::BTreeMap;
use std::time::Duration;

use clap::{Parser, Subcommand};
use rgbw_strip_rs::runtime::{self, RuntimeClock};
use rgbw_strip_rs::{
    Channel, ChannelWriter, Config, ConnectOptions, Device, DutyCycle, Error, InboundMessage,
    PayloadFormat, Transport,
};

#[derive(Parser)]
#[command(name = "simulate")]
#[command(about = "Drive a simulated RGBW strip through an in-memory broker", long_about = None)]
struct Cli {
    /// Base topic for all channels
    #[arg(short, long, global = true, default_value = "outdoor_ledstrip/")]
    base: String,

    /// Use the structured JSON payload format
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the topics the device uses
    Topics,

    /// Run the device and inject commands
    Run {
        /// How long to run, in milliseconds
        #[arg(short, long, default_value = "1000")]
        duration: u64,

        /// Pause between ticks, in milliseconds
        #[arg(short, long, default_value = "10")]
        period: u64,

        /// Commands as `suffix=payload`, e.g. `rgb/set=255,0,0`
        #[arg(value_parser = parse_injection)]
        commands: Vec<(String, String)>,
    },
}

fn parse_injection(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(topic, payload)| (topic.to_string(), payload.to_string()))
        .ok_or_else(|| format!("expected `suffix=payload`, got `{}`", s))
}

/// Broker stand-in that loops commands back once subscribed.
#[derive(Default)]
struct LoopbackBroker {
    connected: bool,
    subscriptions: Vec<String>,
    pending: Vec<InboundMessage>,
    retained: BTreeMap<String, String>,
}

impl Transport for LoopbackBroker {
    fn connect(&mut self, options: &ConnectOptions<'_>) -> Result<(), Error> {
        println!(
            "connect {}:{} as {} (will: {}={})",
            options.host, options.port, options.client_id, options.will_topic, options.will_payload
        );
        self.connected = true;
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    fn publish(&mut self, topic: &str, payload: &str, retained: bool) -> Result<(), Error> {
        if !self.connected {
            return Err(Error::transport("publish", "not connected"));
        }
        println!("<- {} {:?}{}", topic, payload, if retained { " (retained)" } else { "" });
        if retained {
            self.retained.insert(topic.to_string(), payload.to_string());
        }
        Ok(())
    }

    fn subscribe(&mut self, topic: &str) -> Result<(), Error> {
        self.subscriptions.push(topic.to_string());
        Ok(())
    }

    fn poll(&mut self) -> Vec<InboundMessage> {
        if !self.connected {
            return Vec::new();
        }
        let (ready, waiting): (Vec<_>, Vec<_>) = std::mem::take(&mut self.pending)
            .into_iter()
            .partition(|m| self.subscriptions.contains(&m.topic));
        self.pending = waiting;
        for message in &ready {
            println!("-> {} {:?}", message.topic, String::from_utf8_lossy(&message.payload));
        }
        ready
    }
}

/// Prints a channel whenever its duty cycle changes.
#[derive(Default)]
struct ConsolePwm {
    last: [Option<DutyCycle>; 4],
}

impl ChannelWriter for ConsolePwm {
    fn write(&mut self, channel: Channel, duty: DutyCycle) {
        let slot = &mut self.last[channel.index()];
        if *slot != Some(duty) {
            println!("   pwm {:5} = {}", channel, duty.value());
            *slot = Some(duty);
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = Config {
        base_topic: Some(cli.base.clone()),
        payload_format: if cli.json {
            PayloadFormat::Json
        } else {
            PayloadFormat::Plain
        },
        ..Config::default()
    };

    match cli.command {
        Commands::Topics => {
            println!("{}", serde_json::to_string_pretty(&config.topics())?);
        }

        Commands::Run {
            duration,
            period,
            commands,
        } => {
            let mut broker = LoopbackBroker::default();
            for (suffix, payload) in commands {
                broker
                    .pending
                    .push(InboundMessage::new(format!("{}{}", cli.base, suffix), payload));
            }

            let mut device = Device::new(&config, broker, ConsolePwm::default(), RuntimeClock::new());
            let ticks = runtime::run_for(
                &mut device,
                Duration::from_millis(period),
                Duration::from_millis(duration),
            )
            .await;

            let unrouted = &device.transport().pending;
            if !unrouted.is_empty() {
                println!("\n{} command(s) never matched a subscription", unrouted.len());
            }
            println!("\nRan {} tick(s). Retained state:", ticks);
            for (topic, payload) in &device.transport().retained {
                println!("  {:32} {}", topic, payload);
            }
            println!(
                "\nDiagnostics:\n{}",
                serde_json::to_string_pretty(&device.diagnostics())?
            );
        }
    }

    Ok(())
}
