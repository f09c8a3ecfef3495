//! Simulation state and core types
//!
//! The body registry for one run: a fixed population whose kinds change but whose
//! membership never does.

use std::fmt;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::settings::{Settings, Tunables};

/// The three competing kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Kind {
    Rock,
    Paper,
    Scissors,
}

impl Kind {
    /// Every kind, in spawn order
    pub const ALL: [Kind; 3] = [Kind::Rock, Kind::Paper, Kind::Scissors];

    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::Rock => "rock",
            Kind::Paper => "paper",
            Kind::Scissors => "scissors",
        }
    }

    /// Render color (0xRRGGBB)
    pub fn color(&self) -> u32 {
        match self {
            Kind::Rock => 0x888888,
            Kind::Paper => 0xffffff,
            Kind::Scissors => 0xff0000,
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stable body identity, never reused within a run
pub type BodyId = u32;

/// A simulated body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub id: BodyId,
    pub kind: Kind,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
}

/// Per-tick render feed entry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodySnapshot {
    pub id: BodyId,
    pub kind: Kind,
    pub pos: Vec2,
}

impl From<&Body> for BodySnapshot {
    fn from(body: &Body) -> Self {
        Self {
            id: body.id,
            kind: body.kind,
            pos: body.pos,
        }
    }
}

/// Which edge a wall guards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WallSide {
    Top,
    Bottom,
    Left,
    Right,
}

/// A static, infinitely massive boundary slab just outside one arena edge
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Wall {
    pub side: WallSide,
    /// Unit normal pointing into the arena
    pub normal: Vec2,
    /// Position of the inner face along the normal axis
    pub face: f32,
    pub thickness: f32,
}

impl Wall {
    /// Signed distance from the inner face to `pos` (positive inside the arena)
    #[inline]
    pub fn distance(&self, pos: Vec2) -> f32 {
        pos.dot(self.normal) - self.face
    }

    /// Axis-aligned rectangle (min, max) covered by the wall, for renderers
    pub fn rect(&self, arena: &Arena) -> (Vec2, Vec2) {
        let t = self.thickness;
        let (w, h) = (arena.width, arena.height);
        match self.side {
            WallSide::Top => (Vec2::new(0.0, -t), Vec2::new(w, 0.0)),
            WallSide::Bottom => (Vec2::new(0.0, h), Vec2::new(w, h + t)),
            WallSide::Left => (Vec2::new(-t, 0.0), Vec2::new(0.0, h)),
            WallSide::Right => (Vec2::new(w, 0.0), Vec2::new(w + t, h)),
        }
    }

    /// Move `pos` along the normal so a body of `radius` just clears the face
    #[inline]
    pub fn push_out(&self, pos: Vec2, radius: f32) -> Vec2 {
        match self.side {
            WallSide::Top => Vec2::new(pos.x, self.face + radius),
            WallSide::Bottom => Vec2::new(pos.x, -self.face - radius),
            WallSide::Left => Vec2::new(self.face + radius, pos.y),
            WallSide::Right => Vec2::new(-self.face - radius, pos.y),
        }
    }
}

/// Rectangular arena with origin at the top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    pub width: f32,
    pub height: f32,
}

impl Arena {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// The four boundary walls
    pub fn walls(&self, thickness: f32) -> [Wall; 4] {
        [
            Wall {
                side: WallSide::Top,
                normal: Vec2::Y,
                face: 0.0,
                thickness,
            },
            Wall {
                side: WallSide::Bottom,
                normal: Vec2::NEG_Y,
                face: -self.height,
                thickness,
            },
            Wall {
                side: WallSide::Left,
                normal: Vec2::X,
                face: 0.0,
                thickness,
            },
            Wall {
                side: WallSide::Right,
                normal: Vec2::NEG_X,
                face: -self.width,
                thickness,
            },
        ]
    }

    /// Whether a body center lies in `[r, w-r] x [r, h-r]`
    pub fn contains(&self, pos: Vec2, radius: f32) -> bool {
        pos.x >= radius
            && pos.x <= self.width - radius
            && pos.y >= radius
            && pos.y <= self.height - radius
    }
}

/// Population count per kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KindCounts {
    pub rock: usize,
    pub paper: usize,
    pub scissors: usize,
}

impl KindCounts {
    pub fn from_bodies(bodies: &[Body]) -> Self {
        let mut counts = Self::default();
        for body in bodies {
            *counts.get_mut(body.kind) += 1;
        }
        counts
    }

    pub fn get(&self, kind: Kind) -> usize {
        match kind {
            Kind::Rock => self.rock,
            Kind::Paper => self.paper,
            Kind::Scissors => self.scissors,
        }
    }

    fn get_mut(&mut self, kind: Kind) -> &mut usize {
        match kind {
            Kind::Rock => &mut self.rock,
            Kind::Paper => &mut self.paper,
            Kind::Scissors => &mut self.scissors,
        }
    }

    pub fn total(&self) -> usize {
        self.rock + self.paper + self.scissors
    }

    /// Number of kinds with a nonzero population
    pub fn diversity(&self) -> usize {
        Kind::ALL.iter().filter(|&&k| self.get(k) > 0).count()
    }
}

/// Random velocity with each axis drawn uniformly from `[-speed, speed)`
pub fn random_velocity<R: Rng>(rng: &mut R, speed: f32) -> Vec2 {
    Vec2::new(
        rng.random_range(-speed..speed),
        rng.random_range(-speed..speed),
    )
}

/// Spawn `count_per_kind` bodies of each kind at uniform random interior positions.
///
/// Positions are inset by `radius` so no body starts inside a wall. Bodies may
/// overlap each other; the first collision pass separates them. Ids are assigned
/// sequentially from zero in spawn order.
pub fn create_population<R: Rng>(
    count_per_kind: u32,
    arena: &Arena,
    tunables: &Tunables,
    rng: &mut R,
) -> Vec<Body> {
    let radius = tunables.radius;
    let mut bodies = Vec::with_capacity(count_per_kind as usize * Kind::ALL.len());
    let mut next_id: BodyId = 0;

    for kind in Kind::ALL {
        for _ in 0..count_per_kind {
            let pos = Vec2::new(
                random_coordinate(rng, radius, arena.width - radius),
                random_coordinate(rng, radius, arena.height - radius),
            );
            bodies.push(Body {
                id: next_id,
                kind,
                pos,
                vel: random_velocity(rng, tunables.spawn_speed),
                radius,
            });
            next_id += 1;
        }
    }

    bodies
}

fn random_coordinate<R: Rng>(rng: &mut R, min: f32, max: f32) -> f32 {
    if max > min {
        rng.random_range(min..=max)
    } else {
        (min + max) * 0.5
    }
}

/// Complete state of one run (deterministic given its seed)
#[derive(Debug, Clone)]
pub struct SimState {
    /// Seed the run's RNG was created from
    pub seed: u64,
    pub arena: Arena,
    pub tunables: Tunables,
    pub walls: [Wall; 4],
    /// Bodies in id order; membership fixed for the whole run
    pub bodies: Vec<Body>,
    /// Fast ticks completed
    pub time_ticks: u64,
    /// Population at run start
    total: usize,
    rng: Pcg32,
}

impl SimState {
    /// Create a fresh population from validated settings
    pub fn new(settings: &Settings, seed: u64) -> Self {
        let arena = Arena::new(settings.arena_width, settings.arena_height);
        let mut rng = Pcg32::seed_from_u64(seed);
        let bodies = create_population(
            settings.bodies_per_kind,
            &arena,
            &settings.tunables,
            &mut rng,
        );
        Self::assemble(seed, arena, settings.tunables.clone(), bodies, rng)
    }

    /// Build a state around an explicit body set (scripted scenarios)
    pub fn from_bodies(
        arena: Arena,
        tunables: Tunables,
        mut bodies: Vec<Body>,
        seed: u64,
    ) -> Self {
        bodies.sort_by_key(|b| b.id);
        Self::assemble(seed, arena, tunables, bodies, Pcg32::seed_from_u64(seed))
    }

    fn assemble(
        seed: u64,
        arena: Arena,
        tunables: Tunables,
        bodies: Vec<Body>,
        rng: Pcg32,
    ) -> Self {
        let walls = arena.walls(tunables.wall_thickness);
        Self {
            seed,
            arena,
            tunables,
            walls,
            total: bodies.len(),
            bodies,
            time_ticks: 0,
            rng,
        }
    }

    /// Population fixed at run start
    pub fn total(&self) -> usize {
        self.total
    }

    pub fn counts(&self) -> KindCounts {
        KindCounts::from_bodies(&self.bodies)
    }

    pub fn snapshot(&self) -> Vec<BodySnapshot> {
        self.bodies.iter().map(BodySnapshot::from).collect()
    }

    /// Split borrow of the bodies and the run's RNG
    pub(crate) fn bodies_and_rng(&mut self) -> (&mut [Body], &mut Pcg32) {
        (&mut self.bodies, &mut self.rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_population_layout() {
        let arena = Arena::new(800.0, 600.0);
        let tunables = Tunables::default();
        let mut rng = Pcg32::seed_from_u64(7);
        let bodies = create_population(10, &arena, &tunables, &mut rng);

        assert_eq!(bodies.len(), 30);
        let counts = KindCounts::from_bodies(&bodies);
        assert_eq!((counts.rock, counts.paper, counts.scissors), (10, 10, 10));

        for (i, body) in bodies.iter().enumerate() {
            assert_eq!(body.id, i as BodyId);
            assert!(arena.contains(body.pos, body.radius));
            assert!(body.vel.x.abs() <= tunables.spawn_speed);
            assert!(body.vel.y.abs() <= tunables.spawn_speed);
        }
    }

    #[test]
    fn test_empty_population() {
        let arena = Arena::new(100.0, 100.0);
        let mut rng = Pcg32::seed_from_u64(1);
        assert!(create_population(0, &arena, &Tunables::default(), &mut rng).is_empty());
    }

    #[test]
    fn test_same_seed_same_population() {
        let settings = Settings::default();
        let a = SimState::new(&settings, 42);
        let b = SimState::new(&settings, 42);
        assert_eq!(a.bodies, b.bodies);
        assert_eq!(a.total(), 30);
    }

    #[test]
    fn test_walls_face_inward() {
        let arena = Arena::new(200.0, 100.0);
        let center = Vec2::new(100.0, 50.0);
        for wall in arena.walls(50.0) {
            assert!(wall.distance(center) > 0.0);
            let (min, max) = wall.rect(&arena);
            assert!(max.x - min.x >= 50.0 || max.y - min.y >= 50.0);
        }
        assert_eq!(arena.walls(50.0)[3].distance(Vec2::new(190.0, 50.0)), 10.0);
    }

    #[test]
    fn test_kind_counts_diversity() {
        let mut counts = KindCounts::default();
        assert_eq!(counts.diversity(), 0);
        counts.rock = 3;
        counts.paper = 1;
        assert_eq!(counts.diversity(), 2);
        assert_eq!(counts.total(), 4);
    }
}
