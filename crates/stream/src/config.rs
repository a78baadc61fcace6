use serde::{Deserialize, Serialize};

use crate::error::{StreamError, StreamResult};

/// Streamer configuration: grid geometry, generation curve and effect motion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamerConfig {
    /// Side length of a chunk, which is also the spatial index cell size.
    pub grid_size: f32,
    /// Reward budget added per chunk row of depth.
    pub density_per_row: f32,
    /// Floor for a randomly rolled reward. Must be positive.
    pub min_reward: f32,
    /// Expected reward growth per world unit of depth.
    pub reward_depth_scale: f32,
    /// Largest distance an in-effect entity moves per tick.
    pub effect_speed: f32,
    /// Smallest slowdown radius used when easing toward the collector.
    pub effect_min_slowdown: f32,
    /// Distance is divided by this to get the slowdown radius.
    pub effect_slowdown_divisor: f32,
    /// In-effect entities at or within this distance of the collector are destroyed.
    pub collect_threshold: f32,
    /// RNG seed. `None` draws from the OS.
    pub seed: Option<u64>,
}

impl Default for StreamerConfig {
    fn default() -> Self {
        Self {
            grid_size: 100.0,
            density_per_row: 0.02,
            min_reward: 1.0,
            reward_depth_scale: 1.0 / 10_000.0,
            effect_speed: 2.0,
            effect_min_slowdown: 10.0,
            effect_slowdown_divisor: 5.0,
            collect_threshold: 10.0,
            seed: None,
        }
    }
}

impl StreamerConfig {
    pub fn with_grid_size(mut self, grid_size: f32) -> Self {
        self.grid_size = grid_size;
        self
    }

    pub fn with_density_per_row(mut self, density: f32) -> Self {
        self.density_per_row = density;
        self
    }

    pub fn with_effect_speed(mut self, speed: f32) -> Self {
        self.effect_speed = speed;
        self
    }

    pub fn with_collect_threshold(mut self, threshold: f32) -> Self {
        self.collect_threshold = threshold;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Reject values that would make generation unbounded or motion undefined.
    pub fn validate(&self) -> StreamResult<()> {
        if !(self.grid_size.is_finite() && self.grid_size > 0.0) {
            return Err(StreamError::InvalidGridSize(self.grid_size));
        }
        if !(self.min_reward.is_finite() && self.min_reward > 0.0) {
            return Err(StreamError::InvalidConfig(format!(
                "min_reward must be positive, got {}",
                self.min_reward
            )));
        }
        if !(self.effect_speed.is_finite() && self.effect_speed > 0.0) {
            return Err(StreamError::InvalidConfig(format!(
                "effect_speed must be positive, got {}",
                self.effect_speed
            )));
        }
        let non_negative = [
            ("density_per_row", self.density_per_row),
            ("reward_depth_scale", self.reward_depth_scale),
            ("effect_min_slowdown", self.effect_min_slowdown),
            ("collect_threshold", self.collect_threshold),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(StreamError::InvalidConfig(format!(
                    "{name} must be finite and non-negative, got {value}"
                )));
            }
        }
        if !(self.effect_slowdown_divisor.is_finite() && self.effect_slowdown_divisor > 0.0) {
            return Err(StreamError::InvalidConfig(format!(
                "effect_slowdown_divisor must be positive, got {}",
                self.effect_slowdown_divisor
            )));
        }
        Ok(())
    }
}
