use std::collections::VecDeque;
use std::time::{Duration, Instant};

use serde::Serialize;

/// Rolling window of frame durations.
#[derive(Debug, Clone)]
pub struct FrameTimer {
    window: usize,
    samples: VecDeque<Duration>,
    started: Option<Instant>,
    total_frames: u64,
}

/// Aggregate over the current window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct FrameStats {
    pub frames: u64,
    pub mean_us: f64,
    pub max_us: f64,
    pub last_us: f64,
}

impl FrameTimer {
    pub fn new(window: usize) -> Self {
        Self {
            window: window.max(1),
            samples: VecDeque::with_capacity(window.max(1)),
            started: None,
            total_frames: 0,
        }
    }

    pub fn begin(&mut self) {
        self.started = Some(Instant::now());
    }

    /// Close the frame opened by `begin`. Without a matching `begin` this is
    /// a no-op.
    pub fn end(&mut self) -> Option<Duration> {
        let elapsed = self.started.take()?.elapsed();
        self.record(elapsed);
        Some(elapsed)
    }

    pub fn record(&mut self, frame: Duration) {
        if self.samples.len() == self.window {
            self.samples.pop_front();
        }
        self.samples.push_back(frame);
        self.total_frames += 1;
    }

    pub fn stats(&self) -> FrameStats {
        let Some(last) = self.samples.back() else {
            return FrameStats::default();
        };
        let total: Duration = self.samples.iter().sum();
        let max = self.samples.iter().max().copied().unwrap_or_default();
        FrameStats {
            frames: self.total_frames,
            mean_us: total.as_secs_f64() * 1e6 / self.samples.len() as f64,
            max_us: max.as_secs_f64() * 1e6,
            last_us: last.as_secs_f64() * 1e6,
        }
    }
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self::new(120)
    }
}

impl std::fmt::Display for FrameStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "frames={} mean={:.1}us max={:.1}us last={:.1}us",
            self.frames, self.mean_us, self.max_us, self.last_us
        )
    }
}
