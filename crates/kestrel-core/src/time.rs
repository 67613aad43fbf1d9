//! Frame pacing for the Kestrel runtime
//!
//! The engine's default tick scheduler fires once per display-style frame.
//! `FramePacing` holds the validated target interval and the deadline math
//! used to stay synchronized with it.

use std::time::{Duration, Instant};

/// Errors from constructing a frame pacing configuration.
#[derive(Debug, Clone, thiserror::Error)]
pub enum PacingError {
    #[error("frame rate must be a positive, finite number of hz, got {0}")]
    InvalidRate(f32),
}

/// Target frame interval for frame-synchronized ticking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FramePacing {
    interval: Duration,
}

impl FramePacing {
    /// Create a pacing configuration from a frame rate in hz.
    pub fn from_hz(hz: f32) -> Result<Self, PacingError> {
        if !hz.is_finite() || hz <= 0.0 {
            return Err(PacingError::InvalidRate(hz));
        }
        Ok(Self {
            interval: Duration::from_secs_f32(1.0 / hz),
        })
    }

    /// Create a pacing configuration from an explicit interval.
    pub fn from_interval(interval: Duration) -> Self {
        Self { interval }
    }

    /// The target interval between frames.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// The next frame boundary after `prev`, clamped so it is never before
    /// `now` (a late frame fires immediately instead of trying to catch up).
    pub fn next_deadline(&self, prev: Instant, now: Instant) -> Instant {
        let target = prev + self.interval;
        if target < now {
            now
        } else {
            target
        }
    }
}

impl Default for FramePacing {
    /// 60 hz, the canonical display-frame rate.
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1) / 60,
        }
    }
}
