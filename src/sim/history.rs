//! Rolling per-shape population counts for the graph
//!
//! Oldest samples are dropped first once the retention window is full.

use std::collections::VecDeque;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::shape::Shape;
use super::state::Agent;

/// Number of agents holding each shape
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Population {
    pub rock: u32,
    pub paper: u32,
    pub scissors: u32,
}

impl Population {
    pub fn count(agents: &[Agent]) -> Self {
        let mut pop = Self::default();
        for agent in agents {
            *pop.get_mut(agent.shape) += 1;
        }
        pop
    }

    pub fn get(&self, shape: Shape) -> u32 {
        match shape {
            Shape::Rock => self.rock,
            Shape::Paper => self.paper,
            Shape::Scissors => self.scissors,
        }
    }

    fn get_mut(&mut self, shape: Shape) -> &mut u32 {
        match shape {
            Shape::Rock => &mut self.rock,
            Shape::Paper => &mut self.paper,
            Shape::Scissors => &mut self.scissors,
        }
    }

    pub fn total(&self) -> u32 {
        self.rock + self.paper + self.scissors
    }

    /// The shape every agent holds, if the arena has settled on one
    pub fn winner(&self) -> Option<Shape> {
        let total = self.total();
        Shape::ALL
            .into_iter()
            .find(|&shape| total > 0 && self.get(shape) == total)
    }
}

/// Three parallel bounded series, one per shape
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PopulationHistory {
    capacity: usize,
    rock: VecDeque<u32>,
    paper: VecDeque<u32>,
    scissors: VecDeque<u32>,
}

impl PopulationHistory {
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            rock: VecDeque::with_capacity(capacity + 1),
            paper: VecDeque::with_capacity(capacity + 1),
            scissors: VecDeque::with_capacity(capacity + 1),
        }
    }

    /// Count `agents` and append the result
    pub fn sample(&mut self, agents: &[Agent]) -> Population {
        let pop = Population::count(agents);
        self.push(pop);
        pop
    }

    /// Append one sample, evicting the oldest from every series when full
    pub fn push(&mut self, pop: Population) {
        self.rock.push_back(pop.rock);
        self.paper.push_back(pop.paper);
        self.scissors.push_back(pop.scissors);
        if self.rock.len() > self.capacity {
            self.rock.pop_front();
            self.paper.pop_front();
            self.scissors.pop_front();
        }
    }

    pub fn series(&self, shape: Shape) -> &VecDeque<u32> {
        match shape {
            Shape::Rock => &self.rock,
            Shape::Paper => &self.paper,
            Shape::Scissors => &self.scissors,
        }
    }

    pub fn latest(&self) -> Option<Population> {
        Some(Population {
            rock: *self.rock.back()?,
            paper: *self.paper.back()?,
            scissors: *self.scissors.back()?,
        })
    }

    pub fn len(&self) -> usize {
        self.rock.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rock.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Graph line for one shape, scaled into a `width` x `height` box
    ///
    /// The x axis spans the full retention window so the line grows from the
    /// left; y is the shape's share of `total`, with 0 at the bottom edge.
    pub fn polyline(&self, shape: Shape, total: u32, width: f32, height: f32) -> Vec<Vec2> {
        if total == 0 {
            return Vec::new();
        }
        let span = (self.capacity - 1).max(1) as f32;
        self.series(shape)
            .iter()
            .enumerate()
            .map(|(i, &count)| {
                Vec2::new(
                    i as f32 / span * width,
                    height - count as f32 / total as f32 * height,
                )
            })
            .collect()
    }
}

impl Default for PopulationHistory {
    fn default() -> Self {
        Self::with_capacity(crate::consts::MAX_HISTORY_POINTS)
    }
}
