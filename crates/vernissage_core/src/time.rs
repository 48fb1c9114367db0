//! Frame timing utilities.
//!
//! `Time` is produced once per frame by the application runner and handed to
//! every draw call; shaders receive `elapsed` through the time uniform.

use std::time::Instant;

/// A snapshot of timing information for the current frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Time {
    /// Seconds elapsed since the previous frame, clamped to 0.1.
    pub delta: f32,

    /// Total seconds elapsed since the clock was created.
    pub elapsed: f64,

    /// Number of frames ticked so far (starts at 0 for the first frame).
    pub frame_count: u64,
}

impl Time {
    /// Elapsed time as the `f32` the time uniform expects.
    #[inline]
    pub fn shader_seconds(&self) -> f32 {
        self.elapsed as f32
    }
}

// ─── Clock (lives in the runner) ───────────────────────────────────────────

/// Stateful timer that produces [`Time`] snapshots.
pub struct TimeClock {
    start: Instant,
    last_tick: Instant,
    frame_count: u64,
}

impl TimeClock {
    /// Largest delta ever reported, to keep movement sane after a stall.
    pub const MAX_DELTA: f32 = 0.1;

    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last_tick: now,
            frame_count: 0,
        }
    }

    /// Return the current snapshot without advancing the frame counter.
    ///
    /// Used by callbacks that are not on the frame path (setup, resize).
    pub fn peek(&self) -> Time {
        self.snapshot(Instant::now())
    }

    /// Advance by one frame.
    pub fn tick(&mut self) -> Time {
        let now = Instant::now();
        let time = self.snapshot(now);
        if time.delta >= Self::MAX_DELTA {
            log::debug!("frame {} stalled; delta clamped to {}s", self.frame_count, Self::MAX_DELTA);
        }
        self.last_tick = now;
        self.frame_count += 1;
        time
    }

    fn snapshot(&self, now: Instant) -> Time {
        let raw_dt = (now - self.last_tick).as_secs_f32();
        Time {
            delta: raw_dt.min(Self::MAX_DELTA),
            elapsed: (now - self.start).as_secs_f64(),
            frame_count: self.frame_count,
        }
    }
}

impl Default for TimeClock {
    fn default() -> Self {
        Self::new()
    }
}
