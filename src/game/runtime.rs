//! Frame Clock
//!
//! Turns wall-clock frame timestamps into simulation time.
//!
//! Simulation time only advances while running and advances at
//! `wall_delta * time_rate`, so slow motion stretches every timer and every
//! velocity the same way. Paused wall time never reaches the simulation:
//! on resume the last wall timestamp is shifted forward by the pause length.

/// Normal playback speed.
pub const NORMAL_TIME_RATE: f64 = 1.0;

/// One simulation step, in simulation milliseconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameStep {
    pub now: f64,
    pub last_frame_time: f64,
    pub fps: f64,
}

impl FrameStep {
    pub fn delta_ms(&self) -> f64 {
        self.now - self.last_frame_time
    }

    pub fn delta_seconds(&self) -> f64 {
        self.delta_ms() / 1000.0
    }
}

#[derive(Debug, Clone)]
pub struct FrameClock {
    /// Wall timestamp of the previous frame (None before the first frame)
    last_wall: Option<f64>,
    sim_time: f64,
    time_rate: f64,
    paused: bool,
    /// Wall timestamp when the current pause began
    pause_started: f64,
    fps: f64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            last_wall: None,
            sim_time: 0.0,
            time_rate: NORMAL_TIME_RATE,
            paused: false,
            pause_started: 0.0,
            fps: 0.0,
        }
    }

    /// Advance to `wall_now`. Returns `None` while paused.
    ///
    /// The first frame has zero delta; simulation time starts at the first
    /// wall timestamp.
    pub fn advance(&mut self, wall_now: f64) -> Option<FrameStep> {
        if self.paused {
            return None;
        }

        let Some(last_wall) = self.last_wall else {
            self.last_wall = Some(wall_now);
            self.sim_time = wall_now;
            return Some(FrameStep {
                now: wall_now,
                last_frame_time: wall_now,
                fps: self.fps,
            });
        };

        // Clocks that step backwards count as a zero-length frame
        let wall_delta = (wall_now - last_wall).max(0.0);
        let last_frame_time = self.sim_time;
        self.sim_time += wall_delta * self.time_rate;
        self.last_wall = Some(wall_now);

        if wall_delta > 0.0 {
            self.fps = 1000.0 / wall_delta * self.time_rate;
        }

        Some(FrameStep {
            now: self.sim_time,
            last_frame_time,
            fps: self.fps,
        })
    }

    pub fn pause(&mut self, wall_now: f64) {
        if self.paused {
            return;
        }
        self.paused = true;
        self.pause_started = wall_now;
    }

    pub fn resume(&mut self, wall_now: f64) {
        if !self.paused {
            return;
        }
        self.paused = false;
        if let Some(last_wall) = self.last_wall {
            self.last_wall = Some(last_wall + (wall_now - self.pause_started));
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Current simulation time in milliseconds.
    pub fn sim_now(&self) -> f64 {
        self.sim_time
    }

    /// Simulation time corresponding to a wall timestamp between frames.
    ///
    /// While paused this is the instant the pause began, so pausing and
    /// resuming behaviors at these timestamps accumulates no paused time.
    pub fn sim_time_at(&self, wall_now: f64) -> f64 {
        let wall = if self.paused { self.pause_started } else { wall_now };
        match self.last_wall {
            Some(last_wall) => self.sim_time + (wall - last_wall).max(0.0) * self.time_rate,
            None => wall,
        }
    }

    pub fn time_rate(&self) -> f64 {
        self.time_rate
    }

    /// Negative or non-finite rates are ignored.
    pub fn set_time_rate(&mut self, rate: f64) {
        if rate.is_finite() && rate >= 0.0 {
            self.time_rate = rate;
        }
    }

    pub fn fps(&self) -> f64 {
        self.fps
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
