//! Pausable Timers
//!
//! Two layers of timing used by every timed behavior:
//! - Stopwatch: start/stop/pause bookkeeping over caller-supplied timestamps
//! - AnimationTimer: a stopwatch with a duration and an optional easing curve
//!
//! All times are milliseconds. Timers never read a clock themselves; the
//! world hands them its simulation time, so slow motion and pausing apply
//! to timers exactly as they apply to motion.

use std::f64::consts::PI;

use thiserror::Error;

/// Default animation duration in milliseconds.
pub const DEFAULT_DURATION: f64 = 1000.0;

/// Errors raised when building a timer.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum TimerError {
    /// Duration is zero, negative or not finite; progress ratios would be NaN.
    #[error("animation duration must be a positive finite number of milliseconds, got {0}")]
    InvalidDuration(f64),
}

// =============================================================================
// Stopwatch
// =============================================================================

/// Pausable stopwatch.
///
/// Every operation is guarded so repeated calls are harmless: pause/unpause
/// is broadcast to all behaviors, some of which own timers that are idle.
#[derive(Debug, Clone, Default)]
pub struct Stopwatch {
    start_time: f64,
    running: bool,
    /// Cached result of the last `stop`
    elapsed: f64,
    paused: bool,
    pause_start: f64,
    total_paused: f64,
}

impl Stopwatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self, now: f64) {
        self.start_time = now;
        self.running = true;
        self.paused = false;
        self.pause_start = 0.0;
        self.total_paused = 0.0;
    }

    pub fn stop(&mut self, now: f64) {
        if !self.running {
            return;
        }
        if self.paused {
            self.unpause(now);
        }
        self.elapsed = now - self.start_time - self.total_paused;
        self.running = false;
    }

    pub fn pause(&mut self, now: f64) {
        if self.paused || !self.running {
            return;
        }
        self.pause_start = now;
        self.paused = true;
    }

    pub fn unpause(&mut self, now: f64) {
        if !self.paused {
            return;
        }
        self.total_paused += now - self.pause_start;
        self.pause_start = 0.0;
        self.paused = false;
    }

    /// Elapsed milliseconds. Frozen at the pause instant while paused.
    pub fn elapsed(&self, now: f64) -> f64 {
        if !self.running {
            return self.elapsed;
        }
        let until = if self.paused { self.pause_start } else { now };
        until - self.start_time - self.total_paused
    }

    pub fn reset(&mut self, now: f64) {
        self.elapsed = 0.0;
        self.start_time = now;
        self.running = false;
        self.paused = false;
        self.pause_start = 0.0;
        self.total_paused = 0.0;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }
}

// =============================================================================
// Easing
// =============================================================================

/// Maps linear progress (0..=1) to eased progress.
#[derive(Debug, Clone, Copy)]
pub enum Easing {
    Linear,
    /// Fast start, slow finish: `1 - (1 - p)^(2 * strength)`
    EaseOut { strength: f64 },
    /// Slow start, fast finish: `p^(2 * strength)`
    EaseIn { strength: f64 },
    /// Sinusoidal bulge above linear in the first half, below in the second
    EaseOutIn,
    /// Mirror of `EaseOutIn`
    EaseInOut,
    /// Caller-supplied curve
    Custom(fn(f64) -> f64),
}

impl Easing {
    pub fn ease_out(strength: f64) -> Self {
        Easing::EaseOut { strength }
    }

    pub fn ease_in(strength: f64) -> Self {
        Easing::EaseIn { strength }
    }

    pub fn apply(&self, p: f64) -> f64 {
        match *self {
            Easing::Linear => p,
            Easing::EaseOut { strength } => 1.0 - (1.0 - p).powf(strength * 2.0),
            Easing::EaseIn { strength } => p.powf(strength * 2.0),
            Easing::EaseOutIn => p + (p * 2.0 * PI).sin() / (2.0 * PI),
            Easing::EaseInOut => p - (p * 2.0 * PI).sin() / (2.0 * PI),
            Easing::Custom(f) => f(p),
        }
    }
}

// =============================================================================
// AnimationTimer
// =============================================================================

/// Stopwatch with a fixed duration and optional easing.
#[derive(Debug, Clone)]
pub struct AnimationTimer {
    stopwatch: Stopwatch,
    duration: f64,
    easing: Option<Easing>,
}

impl AnimationTimer {
    /// Create a timer. Rejects durations that would make progress undefined.
    pub fn new(duration: f64, easing: Option<Easing>) -> Result<Self, TimerError> {
        if !duration.is_finite() || duration <= 0.0 {
            return Err(TimerError::InvalidDuration(duration));
        }
        Ok(Self {
            stopwatch: Stopwatch::new(),
            duration,
            easing,
        })
    }

    /// Linear timer with the default duration.
    pub fn with_default_duration() -> Self {
        Self {
            stopwatch: Stopwatch::new(),
            duration: DEFAULT_DURATION,
            easing: None,
        }
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn start(&mut self, now: f64) {
        self.stopwatch.start(now);
    }

    pub fn stop(&mut self, now: f64) {
        self.stopwatch.stop(now);
    }

    pub fn pause(&mut self, now: f64) {
        self.stopwatch.pause(now);
    }

    pub fn unpause(&mut self, now: f64) {
        self.stopwatch.unpause(now);
    }

    pub fn reset(&mut self, now: f64) {
        self.stopwatch.reset(now);
    }

    pub fn is_running(&self) -> bool {
        self.stopwatch.is_running()
    }

    pub fn is_paused(&self) -> bool {
        self.stopwatch.is_paused()
    }

    /// True once raw elapsed time passes the duration (not clamped).
    pub fn is_expired(&self, now: f64) -> bool {
        self.stopwatch.elapsed(now) > self.duration
    }

    /// Untransformed stopwatch time.
    pub fn raw_elapsed(&self, now: f64) -> f64 {
        self.stopwatch.elapsed(now)
    }

    /// Elapsed time warped by the easing curve.
    ///
    /// Scaled by `easing(p) / p`; past 100% the raw value is returned
    /// instead of extrapolating the curve.
    pub fn elapsed(&self, now: f64) -> f64 {
        let elapsed = self.stopwatch.elapsed(now);
        let percent = elapsed / self.duration;

        match self.easing {
            Some(easing) if percent != 0.0 && percent <= 1.0 => {
                elapsed * (easing.apply(percent) / percent)
            }
            _ => elapsed,
        }
    }

    /// Stop, reset and start again in one step.
    pub fn restart(&mut self, now: f64) {
        self.stop(now);
        self.reset(now);
        self.start(now);
    }
}
