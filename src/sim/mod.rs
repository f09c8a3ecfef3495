//! Deterministic simulation module
//!
//! All contest logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only, passed explicitly
//! - Stable iteration order (by body ID)
//! - No rendering or platform dependencies

pub mod clock;
pub mod collision;
pub mod dominance;
pub mod run;
pub mod state;
pub mod termination;
pub mod tick;

pub use clock::{Activity, Periodic, SimClock};
pub use collision::{Conversion, reflect_velocity, resolve};
pub use dominance::winner;
pub use run::{Run, RunObserver, RunPhase, Session, start};
pub use state::{
    Arena, Body, BodyId, BodySnapshot, Kind, KindCounts, SimState, Wall, WallSide,
    create_population,
};
pub use termination::{Termination, check_termination};
pub use tick::{TickReport, correct_stalls, integrate, tick};
