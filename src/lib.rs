//! RPS Arena - rock-paper-scissors particle simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (motion, collisions, conversion rules, history)
//! - `settings`: Simulation configuration and its validation
//!
//! Rendering and UI are consumers of `sim::SimState`; they read agents and
//! history and never mutate the core except through the documented override.

pub mod settings;
pub mod sim;

pub use settings::{ConfigError, SimConfig};
pub use sim::{Shape, SimError, SimPhase, SimState};

use glam::Vec2;

/// Simulation configuration constants
pub mod consts {
    /// Fixed simulation timestep (one tick per 60 Hz frame)
    pub const TICK_DT: f32 = 1.0 / 60.0;
    /// Maximum ticks per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame the clock will account for (seconds)
    pub const MAX_FRAME_TIME: f32 = 0.1;

    /// Population history retention window (samples)
    pub const MAX_HISTORY_POINTS: usize = 300;
    /// Ticks between population samples
    pub const HISTORY_SAMPLE_INTERVAL: u64 = 5;

    /// Placement attempts per agent when looking for a free spot at reset
    pub const MAX_PLACEMENT_ATTEMPTS: u32 = 100;

    /// Canvas sizing bounds used when fitting the plane to a container
    pub const CANVAS_MARGIN: f32 = 20.0;
    pub const MIN_CANVAS_WIDTH: f32 = 300.0;
    pub const MAX_CANVAS_WIDTH: f32 = 800.0;
    pub const MIN_CANVAS_HEIGHT: f32 = 200.0;
    pub const MAX_CANVAS_HEIGHT: f32 = 600.0;
}

/// Unit vector pointing along `angle` (radians)
#[inline]
pub fn heading(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// Clamp `value` into `[lo, hi]`, preferring `lo` if the range is inverted
#[inline]
pub fn clamp_span(value: f32, lo: f32, hi: f32) -> f32 {
    value.min(hi).max(lo)
}
