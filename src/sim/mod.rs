//! Deterministic simulation module
//!
//! All arena logic lives here. This module must be pure and deterministic:
//! - One tick at a time, each runs to completion
//! - Seeded RNG only
//! - Stable iteration order (by agent ID)
//! - No rendering or platform dependencies

pub mod collision;
pub mod contacts;
pub mod history;
pub mod motion;
pub mod rules;
pub mod shape;
pub mod state;
pub mod tick;

pub use collision::{Contact, resolve};
pub use contacts::{ContactTracker, PairKey};
pub use history::{Population, PopulationHistory};
pub use motion::advance;
pub use rules::apply_rule;
pub use shape::{Shape, UNKNOWN_COLOR, color_for_label};
pub use state::{Agent, SimError, SimPhase, SimState, spawn_agents};
pub use tick::{Conversion, FrameClock, TickReport, tick};
