//! RPS Arena - rock-paper-scissors contest between bouncing bodies
//!
//! Core modules:
//! - `sim`: Deterministic simulation (motion, collisions, conversion, termination)
//! - `settings`: Run configuration and tunables
//! - `error`: Configuration error taxonomy

pub mod error;
pub mod settings;
pub mod sim;

pub use error::{ConfigError, SettingsError};
pub use settings::{Settings, Tunables};
pub use sim::{Kind, Run, RunObserver, RunPhase, Session, start};

/// Simulation configuration constants (defaults for `Tunables`)
pub mod consts {
    /// Bodies spawned per kind
    pub const BODIES_PER_KIND: u32 = 10;
    /// Arena dimensions
    pub const ARENA_WIDTH: f32 = 800.0;
    pub const ARENA_HEIGHT: f32 = 600.0;

    /// Body radius, identical for every body
    pub const BODY_RADIUS: f32 = 20.0;
    /// Per-axis spawn velocity range (units/step, symmetric around zero)
    pub const SPAWN_SPEED: f32 = 2.5;
    /// Speed clamp (wall restitution > 1 would otherwise accumulate energy)
    pub const MAX_SPEED: f32 = 6.0;

    /// Wall restitution, slightly above 1 to offset discretization losses
    pub const WALL_RESTITUTION: f32 = 1.02;
    /// Body-body restitution (1.0 = perfectly elastic)
    pub const BODY_RESTITUTION: f32 = 1.0;
    /// Wall thickness; far larger than any single step displacement
    pub const WALL_THICKNESS: f32 = 50.0;
    /// Extra gap left between separated bodies
    pub const SEPARATION_PADDING: f32 = 0.01;

    /// Speed below which a body receives an anti-stall impulse
    pub const STALL_EPSILON: f32 = 0.1;

    /// Integration step in simulation units (velocities are units/step)
    pub const SIM_DT: f32 = 1.0;
    /// Fast (physics) tick period in seconds
    pub const FAST_PERIOD: f32 = 1.0 / 60.0;
    /// Slow (termination) tick period in seconds
    pub const SLOW_PERIOD: f32 = 0.5;
    /// Host frame deltas are clamped to this to prevent spiral of death
    pub const MAX_FRAME_TIME: f32 = 0.1;

    /// Render-side pulse on conversion (scale factor, seconds)
    pub const PULSE_SCALE: f32 = 1.2;
    pub const PULSE_DURATION: f32 = 0.2;
}
