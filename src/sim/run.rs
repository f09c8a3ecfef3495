//! Run lifecycle
//!
//! A run owns one body registry and one clock. Host code calls `advance` once per
//! frame; the run executes whatever fast and slow ticks fell due and reports to its
//! observer. The run ends when a winner is detected or the host calls `stop`.

use serde::{Deserialize, Serialize};

use super::clock::{Activity, SimClock};
use super::state::{BodyId, BodySnapshot, Kind, KindCounts, SimState};
use super::termination::Termination;
use super::tick::tick;
use crate::error::ConfigError;
use crate::settings::Settings;

/// Consumer of the signals a run produces. All methods default to no-ops.
pub trait RunObserver {
    /// Called after every fast tick with the committed positions and kinds
    fn on_snapshot(&mut self, _tick: u64, _bodies: &[BodySnapshot]) {}
    /// Called for each conversion (render-side pulse)
    fn on_convert(&mut self, _id: BodyId, _kind: Kind) {}
    /// Called exactly once per run, when a single kind remains
    fn on_winner(&mut self, _kind: Kind) {}
}

impl RunObserver for () {}

/// Lifecycle phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunPhase {
    /// Ticks are being scheduled
    Running,
    /// A winner was declared
    Terminated,
    /// Stopped externally before a winner was declared
    Cancelled,
}

/// Begin a run.
///
/// Fails synchronously on invalid settings. The seed comes from `settings.seed`
/// or, when absent, from the thread RNG (logged so the run can be replayed).
pub fn start<O: RunObserver>(settings: &Settings, observer: O) -> Result<Run<O>, ConfigError> {
    let seed = settings.seed.unwrap_or_else(rand::random);
    Run::with_seed(settings, seed, observer)
}

/// Handle to one run of the simulation
#[derive(Debug)]
pub struct Run<O: RunObserver> {
    state: SimState,
    clock: SimClock,
    termination: Termination,
    phase: RunPhase,
    observer: O,
}

impl<O: RunObserver> Run<O> {
    /// Begin a run with an explicit seed
    pub fn with_seed(settings: &Settings, seed: u64, observer: O) -> Result<Self, ConfigError> {
        settings.validate()?;
        let state = SimState::new(settings, seed);
        log::info!(
            "run started: seed={} bodies={} arena={}x{}",
            seed,
            state.total(),
            settings.arena_width,
            settings.arena_height
        );
        Ok(Self::from_state(state, observer))
    }

    /// Begin a run around a prepared state
    pub fn from_state(state: SimState, observer: O) -> Self {
        let t = &state.tunables;
        let mut clock = SimClock::new(t.fast_period, t.slow_period, t.max_frame_time);
        clock.start();
        Self {
            state,
            clock,
            termination: Termination::default(),
            phase: RunPhase::Running,
            observer,
        }
    }

    /// Feed elapsed host time (seconds) and run every activity that fell due
    pub fn advance(&mut self, elapsed: f32) {
        if self.phase != RunPhase::Running {
            return;
        }
        self.clock.advance(elapsed);
        while let Some(activity) = self.clock.next_due() {
            match activity {
                Activity::Fast => self.fast_tick(),
                Activity::Slow => self.slow_tick(),
            }
        }
    }

    fn fast_tick(&mut self) {
        let report = tick(&mut self.state);
        for c in &report.conversions {
            self.observer.on_convert(c.id, c.to);
        }
        let snapshot = self.state.snapshot();
        self.observer.on_snapshot(self.state.time_ticks, &snapshot);
    }

    fn slow_tick(&mut self) {
        if let Some(kind) = self.termination.sample(&self.state.bodies) {
            self.clock.stop();
            self.phase = RunPhase::Terminated;
            log::info!(
                "winner: {} after {} ticks (seed {})",
                kind,
                self.state.time_ticks,
                self.state.seed
            );
            self.observer.on_winner(kind);
        }
    }

    /// Cancel the run. Safe at any time and any number of times; after it
    /// returns, no further tick touches the registry.
    pub fn stop(&mut self) {
        self.clock.stop();
        if self.phase == RunPhase::Running {
            self.phase = RunPhase::Cancelled;
            log::info!("run cancelled after {} ticks", self.state.time_ticks);
        }
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    pub fn winner(&self) -> Option<Kind> {
        self.termination.winner()
    }

    pub fn is_running(&self) -> bool {
        self.phase == RunPhase::Running
    }

    pub fn state(&self) -> &SimState {
        &self.state
    }

    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    pub fn counts(&self) -> KindCounts {
        self.state.counts()
    }

    pub fn snapshot(&self) -> Vec<BodySnapshot> {
        self.state.snapshot()
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    /// Stop the run and hand back its observer
    pub fn into_observer(mut self) -> O {
        self.stop();
        self.observer
    }
}

/// Holds at most one run. A new run replaces the old one only after the old
/// one is stopped and dropped, so two registries never coexist.
#[derive(Debug)]
pub struct Session<O: RunObserver> {
    run: Option<Run<O>>,
}

impl<O: RunObserver> Default for Session<O> {
    fn default() -> Self {
        Self { run: None }
    }
}

impl<O: RunObserver> Session<O> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tear down any current run, then start a fresh one.
    ///
    /// The previous run is discarded even if the new settings are rejected.
    pub fn restart(
        &mut self,
        settings: &Settings,
        observer: O,
    ) -> Result<&mut Run<O>, ConfigError> {
        self.stop();
        let run = start(settings, observer)?;
        Ok(self.run.insert(run))
    }

    /// Stop and discard the current run, if any
    pub fn stop(&mut self) {
        if let Some(mut run) = self.run.take() {
            run.stop();
        }
    }

    pub fn advance(&mut self, elapsed: f32) {
        if let Some(run) = self.run.as_mut() {
            run.advance(elapsed);
        }
    }

    pub fn current(&self) -> Option<&Run<O>> {
        self.run.as_ref()
    }

    pub fn current_mut(&mut self) -> Option<&mut Run<O>> {
        self.run.as_mut()
    }
}
