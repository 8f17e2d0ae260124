//! Intensity to duty-cycle mapping for the PWM outputs.

use strum::IntoEnumIterator;

use crate::types::{CHANNEL_COUNT, Channel, DutyCycle, Intensities};

/// Hardware side of the PWM outputs.
///
/// Implement this trait for the board's PWM peripheral. The device core is the
/// only writer and calls it once per channel on every tick.
pub trait ChannelWriter {
    /// Drive `channel` with the given duty cycle.
    fn write(&mut self, channel: Channel, duty: DutyCycle);

    /// Switch the on-board status LED.
    fn set_indicator(&mut self, _lit: bool) {}
}

/// Linear mapping from normalized intensity to duty cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputMapper {
    max_duty: u16,
}

impl Default for OutputMapper {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_DUTY)
    }
}

impl OutputMapper {
    /// 10-bit PWM range of the reference board.
    pub const DEFAULT_MAX_DUTY: u16 = 1023;

    pub fn new(max_duty: u16) -> Self {
        OutputMapper { max_duty }
    }

    pub fn max_duty(&self) -> u16 {
        self.max_duty
    }

    /// Map an intensity to a duty cycle.
    ///
    /// Input is clamped to `[0, 1]` first; NaN maps to zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use rgbw_strip_rs::OutputMapper;
    ///
    /// let mapper = OutputMapper::new(1023);
    /// assert_eq!(mapper.duty(0.5).value(), 512);
    /// assert_eq!(mapper.duty(2.0).value(), 1023);
    /// assert_eq!(mapper.duty(-1.0).value(), 0);
    /// ```
    pub fn duty(&self, intensity: f32) -> DutyCycle {
        let clamped = if intensity.is_nan() {
            0.0
        } else {
            intensity.clamp(0.0, 1.0)
        };
        DutyCycle((clamped * f32::from(self.max_duty)).round() as u16)
    }

    /// Map every channel of a frame.
    pub fn frame(&self, intensities: &Intensities) -> [DutyCycle; CHANNEL_COUNT] {
        intensities.map(|i| self.duty(i))
    }

    /// Map `intensity` and write it to `channel`.
    pub fn render<W: ChannelWriter + ?Sized>(&self, writer: &mut W, channel: Channel, intensity: f32) {
        writer.write(channel, self.duty(intensity));
    }
}

/// Write a full frame of duty cycles, one write per channel.
pub fn write_frame<W: ChannelWriter + ?Sized>(writer: &mut W, frame: &[DutyCycle; CHANNEL_COUNT]) {
    for channel in Channel::iter() {
        writer.write(channel, frame[channel.index()]);
    }
}
