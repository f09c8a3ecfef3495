//! Collision detection and response
//!
//! Bodies bounce elastically off each other and off the four boundary walls.
//! Contacts between differing kinds also convert the loser to the winner's kind,
//! in the same step as the bounce.

use glam::Vec2;

use super::dominance;
use super::state::{Body, BodyId, Kind, Wall};
use crate::consts::SEPARATION_PADDING;
use crate::settings::Tunables;

/// A kind change produced by a cross-kind contact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Conversion {
    pub id: BodyId,
    pub from: Kind,
    pub to: Kind,
}

/// Result of a body-body contact check
#[derive(Debug, Clone, Copy)]
pub struct Contact {
    /// Unit normal from the first body toward the second
    pub normal: Vec2,
    /// Overlap depth (zero when exactly touching)
    pub penetration: f32,
}

/// Check whether two bodies touch (center distance <= sum of radii)
pub fn body_contact(a: &Body, b: &Body) -> Option<Contact> {
    let delta = b.pos - a.pos;
    let reach = a.radius + b.radius;
    let dist_sq = delta.length_squared();
    if dist_sq > reach * reach {
        return None;
    }

    let dist = dist_sq.sqrt();
    // Coincident centers have no defined normal; any fixed axis separates them
    let normal = if dist > f32::EPSILON {
        delta / dist
    } else {
        Vec2::X
    };
    Some(Contact {
        normal,
        penetration: reach - dist,
    })
}

/// Reflect velocity off a surface with restitution `e`
///
/// v' = v - (1 + e)(v·n)n, which is the mirror reflection for e = 1
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2, restitution: f32) -> Vec2 {
    velocity - (1.0 + restitution) * velocity.dot(normal) * normal
}

/// Equal-mass bounce along the contact normal, then positional separation
fn bounce_pair(a: &mut Body, b: &mut Body, contact: Contact, restitution: f32) {
    let n = contact.normal;
    let approach = (a.vel - b.vel).dot(n);

    // Already separating bodies keep their velocities
    if approach > 0.0 {
        let impulse = approach * (1.0 + restitution) * 0.5;
        a.vel -= n * impulse;
        b.vel += n * impulse;
    }

    if contact.penetration > 0.0 {
        let sep = contact.penetration * 0.5 + SEPARATION_PADDING;
        a.pos -= n * sep;
        b.pos += n * sep;
    }
}

/// Resolve one body against one wall. Returns true on contact.
pub fn resolve_wall(body: &mut Body, wall: &Wall, restitution: f32) -> bool {
    if wall.distance(body.pos) >= body.radius {
        return false;
    }

    body.pos = wall.push_out(body.pos, body.radius);
    if body.vel.dot(wall.normal) < 0.0 {
        body.vel = reflect_velocity(body.vel, wall.normal, restitution);
    }
    true
}

/// Resolve all contacts for one fast tick.
///
/// Every unordered pair is examined once. Outcomes are decided from the kinds
/// held at the start of the pass and a body changes kind at most once, so a
/// conversion never propagates further within the same tick. Walls are resolved
/// last so every body ends the pass inside the arena.
pub fn resolve(bodies: &mut [Body], walls: &[Wall], tunables: &Tunables) -> Vec<Conversion> {
    let kinds: Vec<Kind> = bodies.iter().map(|b| b.kind).collect();
    let mut converted = vec![false; bodies.len()];
    let mut conversions = Vec::new();
    let n = bodies.len();

    for i in 0..n {
        for j in (i + 1)..n {
            let (left, right) = bodies.split_at_mut(j);
            let a = &mut left[i];
            let b = &mut right[0];

            let Some(contact) = body_contact(a, b) else {
                continue;
            };

            if kinds[i] != kinds[j] {
                let win = dominance::winner(kinds[i], kinds[j]);
                let (loser, loser_idx) = if win == kinds[i] { (b, j) } else { (a, i) };
                if !converted[loser_idx] {
                    converted[loser_idx] = true;
                    conversions.push(Conversion {
                        id: loser.id,
                        from: kinds[loser_idx],
                        to: win,
                    });
                    loser.kind = win;
                }
            }

            let (left, right) = bodies.split_at_mut(j);
            bounce_pair(&mut left[i], &mut right[0], contact, tunables.body_restitution);
        }
    }

    for body in bodies.iter_mut() {
        for wall in walls {
            resolve_wall(body, wall, tunables.wall_restitution);
        }
        clamp_speed(body, tunables.max_speed);
    }

    conversions
}

/// Keep speed at or below `max_speed` (restitution above 1 adds energy)
#[inline]
fn clamp_speed(body: &mut Body, max_speed: f32) {
    if body.vel.length_squared() > max_speed * max_speed {
        body.vel = body.vel.normalize_or_zero() * max_speed;
    }
}
