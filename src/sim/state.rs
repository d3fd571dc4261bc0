//! Simulation state and lifecycle
//!
//! Everything a tick reads or writes lives in `SimState`. Renderers borrow it
//! read-only through the accessors; the only outside mutation is the manual
//! shape override, which is refused while the simulation is running.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::contacts::ContactTracker;
use super::history::{Population, PopulationHistory};
use super::motion;
use super::shape::Shape;
use crate::consts::MAX_PLACEMENT_ATTEMPTS;
use crate::heading;
use crate::settings::{ConfigError, SimConfig};

/// Errors surfaced by lifecycle and override operations
#[derive(Debug, Error)]
pub enum SimError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("agent shapes can only be edited while paused")]
    NotPaused,
    #[error("no agent with id {0}")]
    UnknownAgent(u32),
    #[error("agent id {0} appears more than once")]
    DuplicateAgent(u32),
}

/// Whether ticks are being applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimPhase {
    /// Frozen at the last completed tick
    Paused,
    /// Ticking
    Running,
}

/// A circular agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    /// Stable for the agent's lifetime, unique within a run
    pub id: u32,
    pub pos: Vec2,
    /// Displacement per tick
    pub vel: Vec2,
    pub radius: f32,
    pub shape: Shape,
}

impl Agent {
    pub fn new(id: u32, pos: Vec2, vel: Vec2, radius: f32, shape: Shape) -> Self {
        Self {
            id,
            pos,
            vel,
            radius,
            shape,
        }
    }

    /// Strict overlap: touching circles do not overlap
    #[inline]
    pub fn overlaps(&self, other: &Agent) -> bool {
        self.pos.distance(other.pos) < self.radius + other.radius
    }

    /// Hit-test for pointer selection (edge inclusive)
    #[inline]
    pub fn contains_point(&self, point: Vec2) -> bool {
        self.pos.distance(point) <= self.radius
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.vel.length()
    }
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct SimState {
    pub(crate) config: SimConfig,
    /// Sorted by id for deterministic iteration
    pub(crate) agents: Vec<Agent>,
    pub(crate) contacts: ContactTracker,
    pub(crate) history: PopulationHistory,
    pub(crate) rng: Pcg32,
    pub(crate) time_ticks: u64,
    pub(crate) phase: SimPhase,
}

impl SimState {
    /// Build a fresh, paused simulation from `config`
    pub fn new(config: SimConfig) -> Result<Self, SimError> {
        config.validate()?;
        let mut state = Self::empty(config);
        state.populate();
        Ok(state)
    }

    /// Build a paused simulation around hand-placed agents
    ///
    /// Agent count, radius and speed in `config` are ignored; the plane size,
    /// seed and history settings still apply.
    pub fn from_agents(config: SimConfig, mut agents: Vec<Agent>) -> Result<Self, SimError> {
        config.validate()?;
        agents.sort_by_key(|a| a.id);
        if let Some(dup) = agents.windows(2).find(|w| w[0].id == w[1].id) {
            return Err(SimError::DuplicateAgent(dup[0].id));
        }
        let mut state = Self::empty(config);
        state.agents = agents;
        state.history.sample(&state.agents);
        Ok(state)
    }

    fn empty(config: SimConfig) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(config.seed),
            contacts: ContactTracker::default(),
            history: PopulationHistory::with_capacity(config.history_capacity),
            agents: Vec::new(),
            time_ticks: 0,
            phase: SimPhase::Paused,
            config,
        }
    }

    /// Discard every agent, contact and history sample and rebuild from
    /// `config`. Leaves the simulation paused. On error nothing changes.
    pub fn reset(&mut self, config: SimConfig) -> Result<(), SimError> {
        config.validate()?;
        *self = Self::empty(config);
        self.populate();
        Ok(())
    }

    fn populate(&mut self) {
        self.agents = spawn_agents(&self.config, &mut self.rng);
        self.history.sample(&self.agents);
        log::info!(
            "Simulation reset: {} agents in {}x{} (seed {})",
            self.agents.len(),
            self.config.width,
            self.config.height,
            self.config.seed
        );
    }

    /// Start or continue ticking. An empty arena is reset first.
    pub fn resume(&mut self) -> Result<(), SimError> {
        if self.agents.is_empty() {
            self.reset(self.config.clone())?;
        }
        if self.phase != SimPhase::Running {
            self.phase = SimPhase::Running;
            log::info!("Resumed at tick {}", self.time_ticks);
        }
        Ok(())
    }

    /// Freeze at the last completed tick
    pub fn pause(&mut self) {
        if self.phase != SimPhase::Paused {
            self.phase = SimPhase::Paused;
            log::info!("Paused at tick {}", self.time_ticks);
        }
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.phase == SimPhase::Running
    }

    /// Manually set an agent's shape (paused only). Returns the old shape.
    ///
    /// This is not a contact: the tracker is left alone, so an agent that is
    /// already touching a neighbour does not convert again on the next tick.
    pub fn set_agent_shape(&mut self, id: u32, shape: Shape) -> Result<Shape, SimError> {
        if self.is_running() {
            return Err(SimError::NotPaused);
        }
        let agent = self
            .agents
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(SimError::UnknownAgent(id))?;
        let previous = std::mem::replace(&mut agent.shape, shape);
        log::info!("Agent {} manually set {} -> {}", id, previous, shape);
        Ok(previous)
    }

    /// First agent (by id) under `point`
    pub fn agent_at(&self, point: Vec2) -> Option<&Agent> {
        self.agents.iter().find(|a| a.contains_point(point))
    }

    /// Change the plane size and pull every agent back inside it
    pub fn resize(&mut self, width: f32, height: f32) -> Result<(), SimError> {
        let config = SimConfig {
            width,
            height,
            ..self.config.clone()
        };
        config.validate()?;
        self.config = config;
        let extent = self.extent();
        for agent in &mut self.agents {
            motion::clamp_into(agent, extent);
        }
        log::debug!("Plane resized to {}x{}", width, height);
        Ok(())
    }

    #[inline]
    pub fn extent(&self) -> Vec2 {
        Vec2::new(self.config.width, self.config.height)
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn agent(&self, id: u32) -> Option<&Agent> {
        self.agents.iter().find(|a| a.id == id)
    }

    pub fn history(&self) -> &PopulationHistory {
        &self.history
    }

    pub fn contacts(&self) -> &ContactTracker {
        &self.contacts
    }

    pub fn time_ticks(&self) -> u64 {
        self.time_ticks
    }

    pub fn phase(&self) -> SimPhase {
        self.phase
    }

    /// Current per-shape counts
    pub fn population(&self) -> Population {
        Population::count(&self.agents)
    }
}

fn random_position<R: Rng + ?Sized>(rng: &mut R, radius: f32, width: f32, height: f32) -> Vec2 {
    Vec2::new(
        rng.random_range(radius..=width - radius),
        rng.random_range(radius..=height - radius),
    )
}

/// Create `config.agent_count` agents with random positions and headings
///
/// Each agent gets a bounded number of tries to land clear of the agents
/// already placed; if none succeeds the last candidate is kept.
pub fn spawn_agents<R: Rng + ?Sized>(config: &SimConfig, rng: &mut R) -> Vec<Agent> {
    let radius = config.radius;
    let mut agents: Vec<Agent> = Vec::with_capacity(config.agent_count as usize);

    for id in 1..=config.agent_count {
        let mut pos = random_position(rng, radius, config.width, config.height);
        let blocked = |pos: Vec2| agents.iter().any(|a| a.pos.distance(pos) < a.radius + radius);
        let mut attempts = 1;
        while attempts < MAX_PLACEMENT_ATTEMPTS && blocked(pos) {
            pos = random_position(rng, radius, config.width, config.height);
            attempts += 1;
        }
        if blocked(pos) {
            log::trace!("Agent {} placed after exhausting free-spot search", id);
        }

        let angle = rng.random_range(0.0..std::f32::consts::TAU);
        let vel = heading(angle) * config.speed;

        let shape = if config.even_distribution {
            Shape::from_index(id)
        } else {
            Shape::from_index(rng.random_range(0..3))
        };

        agents.push(Agent::new(id, pos, vel, radius, shape));
    }

    agents
}
