//! Simulation configuration
//!
//! Consumed only at reset time. Persisted as JSON for the headless runner.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Reasons a configuration is rejected
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("agent count must be at least 1")]
    NoAgents,
    #[error("{field} must be a positive finite number (got {value})")]
    NotPositive { field: &'static str, value: f32 },
    #[error("plane {width}x{height} cannot hold an agent of radius {radius}")]
    PlaneTooSmall { width: f32, height: f32, radius: f32 },
    #[error("sample interval must be at least 1 tick")]
    ZeroSampleInterval,
    #[error("history capacity must be at least 1 sample")]
    ZeroHistoryCapacity,
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed config: {0}")]
    Json(#[from] serde_json::Error),
}

/// Simulation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Number of agents created at reset
    pub agent_count: u32,
    /// Agent radius (all agents share it)
    pub radius: f32,
    /// Initial speed, applied along a random heading
    pub speed: f32,
    /// Plane extent
    pub width: f32,
    pub height: f32,
    /// RNG seed for placement, headings and degenerate collision normals
    pub seed: u64,
    /// Ticks between population samples
    pub sample_interval: u64,
    /// Population history retention window
    pub history_capacity: usize,
    /// Assign types round-robin by id instead of at random
    pub even_distribution: bool,
    /// Resolve collisions physically (off: agents pass through each other)
    pub bounce_on_collision: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            agent_count: 30,
            radius: 15.0,
            speed: 2.0,
            width: MAX_CANVAS_WIDTH,
            height: MAX_CANVAS_HEIGHT,
            seed: 42,
            sample_interval: HISTORY_SAMPLE_INTERVAL,
            history_capacity: MAX_HISTORY_POINTS,
            even_distribution: true,
            bounce_on_collision: true,
        }
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { field, value })
    }
}

impl SimConfig {
    /// Check every field the core relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.agent_count == 0 {
            return Err(ConfigError::NoAgents);
        }
        positive("radius", self.radius)?;
        positive("speed", self.speed)?;
        positive("width", self.width)?;
        positive("height", self.height)?;
        if self.width < 2.0 * self.radius || self.height < 2.0 * self.radius {
            return Err(ConfigError::PlaneTooSmall {
                width: self.width,
                height: self.height,
                radius: self.radius,
            });
        }
        if self.sample_interval == 0 {
            return Err(ConfigError::ZeroSampleInterval);
        }
        if self.history_capacity == 0 {
            return Err(ConfigError::ZeroHistoryCapacity);
        }
        Ok(())
    }

    /// Size the plane to fit a container, leaving a margin and staying within
    /// the canvas bounds
    pub fn fit_to_container(&mut self, container_width: f32, container_height: f32) {
        self.width = (container_width - CANVAS_MARGIN).clamp(MIN_CANVAS_WIDTH, MAX_CANVAS_WIDTH);
        self.height =
            (container_height - CANVAS_MARGIN).clamp(MIN_CANVAS_HEIGHT, MAX_CANVAS_HEIGHT);
    }

    /// Load and validate a JSON config file; missing fields take defaults
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&json)?;
        config.validate()?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Write the config as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path.as_ref(), json)?;
        log::info!("Config saved to {}", path.as_ref().display());
        Ok(())
    }
}
