//! Millisecond time source and wrap-tolerant comparisons.
//!
//! The board counter is a `u32` of milliseconds that wraps roughly every
//! 49.7 days. All ordering is done on signed differences so that a deadline
//! just after the wrap still compares as "later".

/// Monotonic millisecond counter.
pub trait Clock {
    fn now_millis(&self) -> u32;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_millis(&self) -> u32 {
        (**self).now_millis()
    }
}

/// True once `now` has reached or passed `deadline`.
///
/// # Examples
///
/// ```
/// use rgbw_strip_rs::clock::time_at_or_after;
///
/// assert!(time_at_or_after(100, 100));
/// assert!(!time_at_or_after(100, 99));
/// // deadline just past the wrap, now just before it
/// assert!(!time_at_or_after(5, u32::MAX - 5));
/// ```
pub fn time_at_or_after(deadline: u32, now: u32) -> bool {
    now.wrapping_sub(deadline) as i32 >= 0
}

/// Milliseconds from `since` to `now`, across at most one wrap.
pub fn elapsed(since: u32, now: u32) -> u32 {
    now.wrapping_sub(since)
}
