//! Easing functions shaping the scroll position over time
//!
//! An easing maps `(elapsed, start, distance, duration)` to a position. The
//! named curves of [`EasingType`] are normalized `[0, 1] -> [0, 1]` shapes
//! lifted into that signature; any matching closure is an easing as well.

use std::fmt;

pub use crate::config::EasingType;

/// Position curve used by the tick loop
pub trait Easing: Send + Sync {
    /// Position after `elapsed` of `duration` (same unit), starting at `start`
    /// and covering `distance` in total
    fn ease(&self, elapsed: f64, start: f64, distance: f64, duration: f64) -> f64;
}

impl<F> Easing for F
where
    F: Fn(f64, f64, f64, f64) -> f64 + Send + Sync,
{
    #[inline]
    fn ease(&self, elapsed: f64, start: f64, distance: f64, duration: f64) -> f64 {
        self(elapsed, start, distance, duration)
    }
}

impl fmt::Debug for dyn Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Easing")
    }
}

impl Easing for EasingType {
    fn ease(&self, elapsed: f64, start: f64, distance: f64, duration: f64) -> f64 {
        if duration <= 0.0 {
            return start + distance;
        }
        start + distance * self.apply(elapsed / duration)
    }
}

/// Extension trait for EasingType with calculation methods
pub trait EasingTypeExt {
    /// Apply the easing function to a progress value
    ///
    /// # Arguments
    /// * `t` - Progress value in range [0, 1]
    ///
    /// # Returns
    /// Eased value in range [0, 1]
    fn apply(&self, t: f64) -> f64;
}

impl EasingTypeExt for EasingType {
    #[inline]
    fn apply(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            EasingType::None => if t < 1.0 { 0.0 } else { 1.0 },
            EasingType::Linear => t,
            EasingType::QuadInOut => quad_ease_in_out(t),
            EasingType::Cubic => cubic_ease_out(t),
            EasingType::Quintic => quintic_ease_out(t),
            EasingType::EaseOut => exponential_ease_out(t),
            EasingType::ExpoInOut => exponential_ease_in_out(t),
        }
    }
}

/// Quadratic ease-in-out: 2t² below the midpoint, mirrored above
#[inline]
fn quad_ease_in_out(t: f64) -> f64 {
    if t < 0.5 {
        2.0 * t * t
    } else {
        let inv = -2.0 * t + 2.0;
        1.0 - inv * inv / 2.0
    }
}

/// Cubic ease-out: f(t) = 1 - (1-t)³
#[inline]
fn cubic_ease_out(t: f64) -> f64 {
    let inv = 1.0 - t;
    1.0 - inv * inv * inv
}

/// Quintic ease-out: f(t) = 1 - (1-t)⁵
#[inline]
fn quintic_ease_out(t: f64) -> f64 {
    let inv = 1.0 - t;
    1.0 - inv * inv * inv * inv * inv
}

/// Exponential ease-out: f(t) = 1 - 2^(-10t)
#[inline]
fn exponential_ease_out(t: f64) -> f64 {
    if t >= 1.0 {
        1.0
    } else {
        1.0 - 2.0_f64.powf(-10.0 * t)
    }
}

/// Exponential ease-in-out, pinned at both ends
#[inline]
fn exponential_ease_in_out(t: f64) -> f64 {
    if t <= 0.0 {
        0.0
    } else if t >= 1.0 {
        1.0
    } else if t < 0.5 {
        2.0_f64.powf(20.0 * t - 10.0) / 2.0
    } else {
        (2.0 - 2.0_f64.powf(-20.0 * t + 10.0)) / 2.0
    }
}
