use std::collections::VecDeque;
use std::time::Duration;

/// What the last viewport update did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StreamStats {
    pub chunks_loaded: usize,
    pub chunks_unloaded: usize,
    pub entities_generated: usize,
    pub entities_destroyed: usize,
    pub total_loaded_chunks: usize,
    pub update_time: Duration,
}

/// Rolling window of per-frame tick costs.
#[derive(Debug, Clone)]
pub struct TickTimer {
    samples: VecDeque<Duration>,
    capacity: usize,
}

impl TickTimer {
    /// A window keeping the last `capacity` samples (at least one).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn record(&mut self, dt: Duration) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(dt);
    }

    pub fn average(&self) -> Duration {
        match self.samples.len() {
            0 => Duration::ZERO,
            n => self.samples.iter().sum::<Duration>() / n as u32,
        }
    }

    pub fn max(&self) -> Duration {
        self.samples.iter().copied().max().unwrap_or_default()
    }

    pub fn min(&self) -> Duration {
        self.samples.iter().copied().min().unwrap_or_default()
    }

    pub fn count(&self) -> usize {
        self.samples.len()
    }
}

impl Default for TickTimer {
    fn default() -> Self {
        Self::new(120)
    }
}
