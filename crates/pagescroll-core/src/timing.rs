//! Time calculation utilities for scroll animations

use std::time::Duration;

use tokio::time::Instant;

/// Time needed to cover `distance` at `speed` positions per second
///
/// Returns `None` for a speed that cannot produce a finite duration.
#[inline]
pub fn duration_for_speed(distance: f64, speed: f64) -> Option<Duration> {
    if !speed.is_finite() || speed <= 0.0 {
        return None;
    }
    let millis = distance.abs() / speed * 1000.0;
    Duration::try_from_secs_f64(millis / 1000.0).ok()
}

/// Milliseconds elapsed between `start` and `now` (zero if `now` is earlier)
#[inline]
pub fn elapsed_ms(start: Instant, now: Instant) -> f64 {
    now.saturating_duration_since(start).as_secs_f64() * 1000.0
}

/// Check if an animation ending at `end` is over at `now`
#[inline]
pub fn is_complete(end: Instant, now: Instant) -> bool {
    now >= end
}

/// Round a computed position to the nearest whole scroll position
///
/// Halves round up, matching how scroll offsets are usually snapped.
#[inline]
pub fn round_position(position: f64) -> f64 {
    (position + 0.5).floor()
}
