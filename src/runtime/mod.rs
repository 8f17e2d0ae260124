//! Runtime-agnostic async driver for a [`Device`].
//!
//! The device itself is synchronous; this module only paces its ticks and
//! supplies a monotonic clock from the selected async runtime.
//!
//! # Feature Flags
//!
//! Enable one of the following features to select your runtime:
//!
//! - `runtime-tokio` (default) - Use the tokio runtime
//! - `runtime-async-std` - Use the async-std runtime
//! - `runtime-smol` - Use the smol runtime
//!
//! # Example
//!
//! ```toml
//! [dependencies]
//! # Using smol
//! rgbw-strip-rs = { version = "0.1", default-features = false, features = ["runtime-smol"] }
//! ```

use std::future::Future;
use std::time::Duration;

use futures::future::{Either, select};
use futures::pin_mut;
use log::info;

use crate::clock::Clock;
use crate::device::Device;
use crate::output::ChannelWriter;
use crate::session::Transport;

#[cfg(feature = "runtime-tokio")]
mod tokio_impl;

#[cfg(feature = "runtime-async-std")]
mod async_std_impl;

#[cfg(feature = "runtime-smol")]
mod smol_impl;

// Re-export the active runtime's types
#[cfg(feature = "runtime-tokio")]
pub use tokio_impl::*;

#[cfg(feature = "runtime-async-std")]
pub use async_std_impl::*;

#[cfg(feature = "runtime-smol")]
pub use smol_impl::*;

/// Default pause between two ticks.
pub const DEFAULT_FRAME_PERIOD: Duration = Duration::from_millis(10);

/// Sleep for the specified duration.
pub async fn sleep(duration: Duration) {
    sleep_impl(duration).await
}

/// Run a future with a timeout.
///
/// Returns `Err(TimedOut)` if the timeout expires before the future completes.
pub async fn timeout<F, T>(duration: Duration, future: F) -> Result<T, TimedOut>
where
    F: Future<Output = T>,
{
    timeout_impl(duration, future).await
}

/// Error returned when a timeout expires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimedOut;

impl std::fmt::Display for TimedOut {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "operation timed out")
    }
}

impl std::error::Error for TimedOut {}

/// A measurement of monotonically increasing time.
#[derive(Debug, Clone, Copy)]
pub struct Instant(InstantInner);

impl Instant {
    /// Returns the current instant.
    pub fn now() -> Self {
        Instant(InstantInner::now())
    }

    /// Returns the duration elapsed since this instant was created.
    pub fn elapsed(&self) -> Duration {
        self.0.elapsed()
    }
}

/// Millisecond clock counting from its creation.
///
/// The count wraps at `u32::MAX`, like a microcontroller tick counter.
#[derive(Debug, Clone, Copy)]
pub struct RuntimeClock {
    start: Instant,
}

impl RuntimeClock {
    pub fn new() -> Self {
        RuntimeClock {
            start: Instant::now(),
        }
    }
}

impl Default for RuntimeClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for RuntimeClock {
    fn now_millis(&self) -> u32 {
        // truncation is the wraparound
        self.start.elapsed().as_millis() as u32
    }
}

/// Tick `device` every `frame_period` until `shutdown` resolves.
///
/// Returns the number of ticks that ran.
pub async fn run_until<T, W, C, F>(
    device: &mut Device<T, W, C>,
    frame_period: Duration,
    shutdown: F,
) -> u64
where
    T: Transport,
    W: ChannelWriter,
    C: Clock,
    F: Future<Output = ()>,
{
    let mut ticks = 0u64;
    {
        let ticking = async {
            loop {
                device.tick();
                ticks += 1;
                sleep(frame_period).await;
            }
        };
        pin_mut!(ticking);
        pin_mut!(shutdown);
        if let Either::Right(_) = select(ticking, shutdown).await {
            info!("Shutdown requested");
        }
    }
    ticks
}

/// Tick `device` for roughly `duration`.
pub async fn run_for<T, W, C>(
    device: &mut Device<T, W, C>,
    frame_period: Duration,
    duration: Duration,
) -> u64
where
    T: Transport,
    W: ChannelWriter,
    C: Clock,
{
    run_until(device, frame_period, sleep(duration)).await
}

// Compile-time check to ensure exactly one runtime is selected
#[cfg(not(any(
    feature = "runtime-tokio",
    feature = "runtime-async-std",
    feature = "runtime-smol"
)))]
compile_error!(
    "One of \"runtime-tokio\", \"runtime-async-std\", or \"runtime-smol\" features must be enabled"
);

#[cfg(all(feature = "runtime-tokio", feature = "runtime-async-std"))]
compile_error!("Features \"runtime-tokio\" and \"runtime-async-std\" are mutually exclusive");

#[cfg(all(feature = "runtime-tokio", feature = "runtime-smol"))]
compile_error!("Features \"runtime-tokio\" and \"runtime-smol\" are mutually exclusive");

#[cfg(all(feature = "runtime-async-std", feature = "runtime-smol"))]
compile_error!("Features \"runtime-async-std\" and \"runtime-smol\" are mutually exclusive");
