//! Fixed timestep simulation tick
//!
//! One tick runs to completion: integrate every agent, one detect-and-resolve
//! pass over all pairs, convert shapes for pairs that just came into contact,
//! then sample the population on the configured cadence.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use super::collision;
use super::contacts::PairKey;
use super::motion;
use super::rules::apply_rule;
use super::shape::Shape;
use super::state::{Agent, SimState};
use crate::consts::*;

/// An agent's shape changed because of a contact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversion {
    pub id: u32,
    pub from: Shape,
    pub to: Shape,
    /// The contact that caused it
    pub pair: PairKey,
}

/// What happened during one tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    /// Overlapping pairs this tick
    pub contacts: usize,
    /// Pairs that were apart last tick
    pub new_contacts: Vec<PairKey>,
    pub conversions: Vec<Conversion>,
    /// Pairs that exchanged velocity
    pub bounces: usize,
    /// Whether a history sample was recorded
    pub sampled: bool,
}

/// Disjoint mutable borrows of two agents, `i < j`
#[inline]
fn pair_mut(agents: &mut [Agent], i: usize, j: usize) -> (&mut Agent, &mut Agent) {
    debug_assert!(i < j);
    let (head, tail) = agents.split_at_mut(j);
    (&mut head[i], &mut tail[0])
}

/// Advance the simulation by one tick. Does nothing while paused.
pub fn tick(state: &mut SimState) -> TickReport {
    if !state.is_running() {
        return TickReport::default();
    }

    state.time_ticks += 1;
    let extent = state.extent();

    for agent in &mut state.agents {
        motion::advance(agent, extent);
    }

    // Single pass: each pair is tested once, against positions that already
    // include every earlier separation this tick
    let bounce = state.config.bounce_on_collision;
    let mut current = BTreeSet::new();
    let mut bounces = 0;
    let n = state.agents.len();
    for i in 0..n {
        for j in (i + 1)..n {
            let (a, b) = pair_mut(&mut state.agents, i, j);
            if !a.overlaps(b) {
                continue;
            }
            if let Some(key) = PairKey::new(a.id, b.id) {
                current.insert(key);
            }
            if bounce {
                let contact = collision::resolve(a, b, &mut state.rng);
                if contact.hit && contact.impulse != 0.0 {
                    bounces += 1;
                }
                log::trace!(
                    "Resolved {}-{}: overlap {:.3}, impulse {:.3}",
                    a.id,
                    b.id,
                    contact.overlap,
                    contact.impulse
                );
            }
        }
    }

    let contacts = current.len();
    let new_contacts = state.contacts.advance(current);
    let conversions = convert(&mut state.agents, &new_contacts);

    let sampled = state.time_ticks % state.config.sample_interval == 0;
    if sampled {
        let pop = state.history.sample(&state.agents);
        log::trace!(
            "Tick {}: rock={} paper={} scissors={}",
            state.time_ticks,
            pop.rock,
            pop.paper,
            pop.scissors
        );
    }

    TickReport {
        contacts,
        new_contacts,
        conversions,
        bounces,
        sampled,
    }
}

/// Apply the conversion rule to each new contact, in key order
fn convert(agents: &mut [Agent], new_contacts: &[PairKey]) -> Vec<Conversion> {
    if new_contacts.is_empty() {
        return Vec::new();
    }

    let index: HashMap<u32, usize> = agents.iter().enumerate().map(|(i, a)| (a.id, i)).collect();
    let mut conversions = Vec::new();

    for &pair in new_contacts {
        let (Some(&ia), Some(&ib)) = (index.get(&pair.lo), index.get(&pair.hi)) else {
            continue;
        };
        let (a, b) = (agents[ia].shape, agents[ib].shape);
        let (new_a, new_b) = apply_rule(a, b);
        log::debug!("Contact {}: {} vs {}", pair, a, b);

        for (i, from, to) in [(ia, a, new_a), (ib, b, new_b)] {
            if from != to {
                agents[i].shape = to;
                conversions.push(Conversion {
                    id: agents[i].id,
                    from,
                    to,
                    pair,
                });
                log::debug!("Agent {} converted {} -> {}", agents[i].id, from, to);
            }
        }
    }

    conversions
}

/// Converts wall-clock frame time into whole ticks
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    accumulator: f32,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run as many ticks as `elapsed` seconds cover, capped at
    /// `MAX_SUBSTEPS`. Returns the number of ticks run.
    ///
    /// Banked time is dropped while paused, so a reset (which leaves the
    /// state paused) never replays frames from before it.
    pub fn advance(&mut self, state: &mut SimState, elapsed: f32) -> u32 {
        if !state.is_running() {
            self.accumulator = 0.0;
            return 0;
        }

        // max() maps NaN to 0
        self.accumulator += elapsed.max(0.0).min(MAX_FRAME_TIME);

        let mut substeps = 0;
        while self.accumulator >= TICK_DT && substeps < MAX_SUBSTEPS {
            tick(state);
            self.accumulator -= TICK_DT;
            substeps += 1;
        }
        substeps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::SimConfig;
    use crate::sim::SimPhase;
    use glam::Vec2;

    fn arena(agents: Vec<Agent>, bounce: bool) -> SimState {
        let config = SimConfig {
            width: 400.0,
            height: 300.0,
            sample_interval: 5,
            history_capacity: 10,
            bounce_on_collision: bounce,
            ..Default::default()
        };
        let mut state = SimState::from_agents(config, agents).unwrap();
        state.resume().unwrap();
        state
    }

    fn disc(id: u32, x: f32, y: f32, vx: f32, vy: f32, shape: Shape) -> Agent {
        Agent::new(id, Vec2::new(x, y), Vec2::new(vx, vy), 10.0, shape)
    }

    #[test]
    fn test_paused_tick_is_noop() {
        let mut state = arena(vec![disc(1, 100.0, 100.0, 1.0, 0.0, Shape::Rock)], true);
        state.pause();
        let report = tick(&mut state);
        assert_eq!(report, TickReport::default());
        assert_eq!(state.time_ticks(), 0);
        assert_eq!(state.agent(1).unwrap().pos, Vec2::new(100.0, 100.0));
    }

    #[test]
    fn test_collision_converts_and_separates() {
        let mut state = arena(
            vec![
                disc(1, 100.0, 100.0, 1.0, 0.0, Shape::Rock),
                disc(2, 115.0, 100.0, -1.0, 0.0, Shape::Scissors),
            ],
            true,
        );
        let report = tick(&mut state);
        assert_eq!(report.contacts, 1);
        assert_eq!(report.new_contacts, vec![PairKey { lo: 1, hi: 2 }]);
        assert_eq!(report.conversions.len(), 1);
        assert_eq!(report.conversions[0].id, 2);
        assert_eq!(report.conversions[0].to, Shape::Rock);
        assert_eq!(report.bounces, 1);

        let a = state.agent(1).unwrap();
        let b = state.agent(2).unwrap();
        assert_eq!((a.shape, b.shape), (Shape::Rock, Shape::Rock));
        assert!(a.pos.distance(b.pos) >= 20.0 - 1e-3);
        assert!(a.vel.x < 0.0 && b.vel.x > 0.0);
    }

    #[test]
    fn test_sustained_overlap_converts_once() {
        // No bounce: the pair drifts together, overlapping every tick
        let mut state = arena(
            vec![
                disc(1, 100.0, 100.0, 1.0, 0.5, Shape::Paper),
                disc(2, 110.0, 100.0, 1.0, 0.5, Shape::Rock),
            ],
            false,
        );
        let mut conversions = 0;
        for _ in 0..5 {
            let report = tick(&mut state);
            assert_eq!(report.contacts, 1);
            conversions += report.conversions.len();
        }
        assert_eq!(conversions, 1);
        assert_eq!(state.agent(2).unwrap().shape, Shape::Paper);
    }

    #[test]
    fn test_pinned_pair_with_bounce_converts_once() {
        // A 30x30 box is too small for two radius-10 discs to ever be apart
        // after integration, so they overlap every tick despite bouncing
        let config = SimConfig {
            width: 30.0,
            height: 30.0,
            bounce_on_collision: true,
            ..Default::default()
        };
        let agents = vec![
            disc(1, 12.0, 15.0, 1.0, 0.5, Shape::Rock),
            disc(2, 18.0, 15.0, -1.0, -0.5, Shape::Scissors),
        ];
        let mut state = SimState::from_agents(config, agents).unwrap();
        state.resume().unwrap();

        let mut conversions = 0;
        let mut new_contacts = 0;
        let mut bounces = 0;
        for _ in 0..5 {
            let report = tick(&mut state);
            assert_eq!(report.contacts, 1);
            conversions += report.conversions.len();
            new_contacts += report.new_contacts.len();
            bounces += report.bounces;
        }
        assert_eq!(new_contacts, 1);
        assert_eq!(conversions, 1);
        assert!(bounces >= 1);
        assert_eq!(state.population().rock, 2);
    }

    #[test]
    fn test_manual_override_is_not_a_contact() {
        let mut state = arena(
            vec![
                disc(1, 100.0, 100.0, 1.0, 0.0, Shape::Paper),
                disc(2, 110.0, 100.0, 1.0, 0.0, Shape::Rock),
            ],
            false,
        );
        tick(&mut state);
        assert_eq!(state.agent(2).unwrap().shape, Shape::Paper);

        state.pause();
        state.set_agent_shape(2, Shape::Rock).unwrap();
        state.resume().unwrap();

        // Still the same contact episode, so the override sticks
        let report = tick(&mut state);
        assert!(report.new_contacts.is_empty());
        assert_eq!(state.agent(2).unwrap().shape, Shape::Rock);
    }

    #[test]
    fn test_history_sampled_on_cadence() {
        let mut state = arena(vec![disc(1, 100.0, 100.0, 1.0, 1.0, Shape::Rock)], true);
        assert_eq!(state.history().len(), 1);
        let sampled: Vec<bool> = (0..10).map(|_| tick(&mut state).sampled).collect();
        assert_eq!(
            sampled,
            vec![false, false, false, false, true, false, false, false, false, true]
        );
        assert_eq!(state.history().len(), 3);
    }

    #[test]
    fn test_history_bounded_over_long_run() {
        let config = SimConfig {
            agent_count: 20,
            radius: 10.0,
            width: 300.0,
            height: 200.0,
            sample_interval: 1,
            history_capacity: 50,
            ..Default::default()
        };
        let mut state = SimState::new(config).unwrap();
        state.resume().unwrap();
        for _ in 0..200 {
            tick(&mut state);
        }
        let history = state.history();
        assert_eq!(history.len(), 50);
        for shape in Shape::ALL {
            assert_eq!(history.series(shape).len(), 50);
        }
        assert_eq!(history.latest().unwrap().total(), 20);
    }

    #[test]
    fn test_pause_resume_does_not_lose_state() {
        let config = SimConfig {
            agent_count: 15,
            seed: 777,
            ..Default::default()
        };
        let mut straight = SimState::new(config.clone()).unwrap();
        let mut interrupted = SimState::new(config).unwrap();
        straight.resume().unwrap();
        interrupted.resume().unwrap();

        for i in 0..60 {
            if i == 30 {
                interrupted.pause();
                tick(&mut interrupted);
                tick(&mut interrupted);
                interrupted.resume().unwrap();
            }
            tick(&mut straight);
            tick(&mut interrupted);
        }

        assert_eq!(straight.time_ticks(), interrupted.time_ticks());
        assert_eq!(straight.agents(), interrupted.agents());
        assert_eq!(
            straight.contacts().iter().collect::<Vec<_>>(),
            interrupted.contacts().iter().collect::<Vec<_>>()
        );
        assert_eq!(straight.history().len(), interrupted.history().len());
    }

    #[test]
    fn test_determinism() {
        let config = SimConfig {
            agent_count: 25,
            seed: 99999,
            even_distribution: false,
            ..Default::default()
        };
        let mut state1 = SimState::new(config.clone()).unwrap();
        let mut state2 = SimState::new(config).unwrap();
        state1.resume().unwrap();
        state2.resume().unwrap();

        for _ in 0..120 {
            tick(&mut state1);
            tick(&mut state2);
        }

        assert_eq!(state1.agents(), state2.agents());
        assert_eq!(state1.population(), state2.population());
    }

    #[test]
    fn test_frame_clock() {
        let mut state = arena(vec![disc(1, 100.0, 100.0, 1.0, 0.0, Shape::Rock)], true);
        let mut clock = FrameClock::new();

        assert_eq!(clock.advance(&mut state, TICK_DT * 0.5), 0);
        assert_eq!(clock.advance(&mut state, TICK_DT * 0.6), 1);
        // Long stalls are clamped, then capped
        let ran = clock.advance(&mut state, 5.0);
        assert!(ran <= MAX_SUBSTEPS);
        assert!(ran >= 5);

        state.pause();
        assert_eq!(state.phase(), SimPhase::Paused);
        let before = state.time_ticks();
        assert_eq!(clock.advance(&mut state, 1.0), 0);
        assert_eq!(state.time_ticks(), before);
    }

    #[test]
    fn test_frame_clock_survives_bad_frame_times() {
        let mut state = arena(vec![disc(1, 100.0, 100.0, 1.0, 0.0, Shape::Rock)], true);
        let mut clock = FrameClock::new();

        assert_eq!(clock.advance(&mut state, f32::NAN), 0);
        assert_eq!(clock.advance(&mut state, -3.0), 0);

        let ran: u32 = (0..60).map(|_| clock.advance(&mut state, TICK_DT)).sum();
        assert!(ran >= 59, "only {} ticks after a NaN frame", ran);
        assert_eq!(state.time_ticks(), ran as u64);
    }

    #[test]
    fn test_frame_clock_drops_banked_time_on_reset() {
        let config = SimConfig {
            agent_count: 4,
            ..Default::default()
        };
        let mut state = SimState::new(config.clone()).unwrap();
        state.resume().unwrap();
        let mut clock = FrameClock::new();

        // Bank most of a tick, then reset
        assert_eq!(clock.advance(&mut state, TICK_DT * 0.9), 0);
        state.reset(config).unwrap();
        assert_eq!(clock.advance(&mut state, TICK_DT * 0.9), 0);

        state.resume().unwrap();
        assert_eq!(clock.advance(&mut state, TICK_DT * 0.5), 0);
        assert_eq!(state.time_ticks(), 0);
    }
}
