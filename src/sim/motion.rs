//! Motion integration and wall reflection

use glam::{BVec2, Vec2};

use super::state::Agent;
use crate::clamp_span;

/// Reflect one axis if the agent's edge touched or crossed a wall
#[inline]
fn reflect_axis(pos: &mut f32, vel: &mut f32, radius: f32, extent: f32) -> bool {
    if *pos - radius <= 0.0 || *pos + radius >= extent {
        *vel = -*vel;
        *pos = clamp_span(*pos, radius, extent - radius);
        true
    } else {
        false
    }
}

/// Move the agent by one tick of velocity, then bounce off the plane edges
///
/// Axes are handled independently, so a corner hit flips both components.
/// Returns which axes reflected.
pub fn advance(agent: &mut Agent, extent: Vec2) -> BVec2 {
    agent.pos += agent.vel;
    let x = reflect_axis(&mut agent.pos.x, &mut agent.vel.x, agent.radius, extent.x);
    let y = reflect_axis(&mut agent.pos.y, &mut agent.vel.y, agent.radius, extent.y);
    BVec2::new(x, y)
}

/// Pull the agent inside the plane without touching its velocity
pub fn clamp_into(agent: &mut Agent, extent: Vec2) {
    agent.pos.x = clamp_span(agent.pos.x, agent.radius, extent.x - agent.radius);
    agent.pos.y = clamp_span(agent.pos.y, agent.radius, extent.y - agent.radius);
}
