//! Fixed timestep simulation tick
//!
//! One fast tick: integrate motion, resolve collisions, then correct stalled bodies.

use rand::Rng;

use super::collision::{self, Conversion};
use super::state::{Body, SimState, random_velocity};
use crate::settings::Tunables;

/// Outcome of one fast tick
#[derive(Debug, Clone, Default)]
pub struct TickReport {
    /// Kind changes, in the order they happened
    pub conversions: Vec<Conversion>,
    /// Number of anti-stall impulses injected
    pub impulses: usize,
}

/// Advance every body by `velocity * dt`. No forces, no drag.
pub fn integrate(bodies: &mut [Body], dt: f32) {
    for body in bodies {
        body.pos += body.vel * dt;
    }
}

/// Give every near-motionless body a fresh random velocity from the spawn range.
///
/// Elastic contacts can leave bodies with almost no velocity (head-on equal-speed
/// hits, corner pinning), which would let mixed kinds persist forever. Returns the
/// number of bodies kicked.
pub fn correct_stalls<R: Rng>(bodies: &mut [Body], tunables: &Tunables, rng: &mut R) -> usize {
    let threshold_sq = tunables.stall_epsilon * tunables.stall_epsilon;
    let mut kicked = 0;
    for body in bodies.iter_mut().filter(|b| b.vel.length_squared() < threshold_sq) {
        body.vel = random_velocity(rng, tunables.spawn_speed);
        log::trace!("anti-stall impulse on body {} -> {:?}", body.id, body.vel);
        kicked += 1;
    }
    kicked
}

/// Advance the state by one fixed step
pub fn tick(state: &mut SimState) -> TickReport {
    state.time_ticks += 1;
    let dt = state.tunables.dt;
    let tunables = state.tunables.clone();
    let walls = state.walls;

    let (bodies, rng) = state.bodies_and_rng();
    integrate(bodies, dt);
    let conversions = collision::resolve(bodies, &walls, &tunables);
    let impulses = correct_stalls(bodies, &tunables, rng);

    for c in &conversions {
        log::debug!(
            "tick {}: body {} converted {} -> {}",
            state.time_ticks,
            c.id,
            c.from,
            c.to
        );
    }

    TickReport {
        conversions,
        impulses,
    }
}
