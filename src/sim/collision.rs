//! Pairwise collision detection and response
//!
//! Agents are equal-mass discs. An overlapping pair is pushed apart
//! symmetrically along the line between centers, then the velocity components
//! along that line are exchanged if the pair is approaching.

use glam::Vec2;
use rand::Rng;

use super::state::Agent;
use crate::heading;

/// Result of resolving a pair
#[derive(Debug, Clone, PartialEq)]
pub struct Contact {
    /// Whether the pair overlapped
    pub hit: bool,
    /// Unit normal pointing from b toward a
    pub normal: Vec2,
    /// Interpenetration depth before separation
    pub overlap: f32,
    /// Relative normal velocity exchanged (0 when the pair was already separating)
    pub impulse: f32,
}

impl Contact {
    pub fn miss() -> Self {
        Self {
            hit: false,
            normal: Vec2::ZERO,
            overlap: 0.0,
            impulse: 0.0,
        }
    }
}

/// Separate two overlapping agents and bounce them off each other
///
/// No-op when the centers are at least the sum of radii apart. Coincident
/// centers get a random normal drawn from `rng`.
pub fn resolve<R: Rng + ?Sized>(a: &mut Agent, b: &mut Agent, rng: &mut R) -> Contact {
    let delta = a.pos - b.pos;
    let distance = delta.length();
    let reach = a.radius + b.radius;

    if distance >= reach {
        return Contact::miss();
    }

    let normal = if distance > 0.0 {
        delta / distance
    } else {
        heading(rng.random_range(0.0..std::f32::consts::TAU))
    };

    let overlap = reach - distance;
    let shift = normal * (overlap / 2.0);
    a.pos += shift;
    b.pos -= shift;

    // Relative velocity along the normal; positive means already separating
    let dvn = (a.vel - b.vel).dot(normal);
    if dvn > 0.0 {
        return Contact {
            hit: true,
            normal,
            overlap,
            impulse: 0.0,
        };
    }

    a.vel -= normal * dvn;
    b.vel += normal * dvn;

    Contact {
        hit: true,
        normal,
        overlap,
        impulse: dvn,
    }
}
