//! Simulation clock
//!
//! Two independently cancellable periodic activities (fast physics tick and slow
//! termination sampling) driven by host frame time. The host reports elapsed wall
//! time with `advance`, then drains due activities with `next_due` in the order
//! their deadlines fell. Nothing runs on its own; a stopped clock yields nothing.

/// Which periodic activity is due
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activity {
    /// Integrator -> resolver -> anti-stall
    Fast,
    /// Termination sampling
    Slow,
}

/// One fixed-period activity with its own accumulator
#[derive(Debug, Clone)]
pub struct Periodic {
    period: f32,
    accumulator: f32,
    active: bool,
}

impl Periodic {
    pub fn new(period: f32) -> Self {
        Self {
            period,
            accumulator: 0.0,
            active: false,
        }
    }

    pub fn start(&mut self) {
        self.accumulator = 0.0;
        self.active = true;
    }

    /// Cancel and drop any pending time. Safe to repeat.
    pub fn cancel(&mut self) {
        self.active = false;
        self.accumulator = 0.0;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn period(&self) -> f32 {
        self.period
    }

    fn accumulate(&mut self, elapsed: f32) {
        if self.active {
            self.accumulator += elapsed;
        }
    }

    /// Time since this activity's earliest pending deadline, if one is due
    fn overdue(&self) -> Option<f32> {
        (self.active && self.accumulator >= self.period).then(|| self.accumulator - self.period)
    }

    fn consume(&mut self) {
        self.accumulator -= self.period;
    }
}

/// Drives the fast and slow activities of one run
#[derive(Debug, Clone)]
pub struct SimClock {
    fast: Periodic,
    slow: Periodic,
    max_frame_time: f32,
}

impl SimClock {
    pub fn new(fast_period: f32, slow_period: f32, max_frame_time: f32) -> Self {
        Self {
            fast: Periodic::new(fast_period),
            slow: Periodic::new(slow_period),
            max_frame_time,
        }
    }

    /// Begin both activities
    pub fn start(&mut self) {
        self.fast.start();
        self.slow.start();
    }

    /// Cancel both activities unconditionally. Idempotent.
    pub fn stop(&mut self) {
        self.fast.cancel();
        self.slow.cancel();
    }

    pub fn is_running(&self) -> bool {
        self.fast.is_active() || self.slow.is_active()
    }

    pub fn fast(&self) -> &Periodic {
        &self.fast
    }

    pub fn slow(&self) -> &Periodic {
        &self.slow
    }

    /// Report host time elapsed since the previous frame (seconds).
    ///
    /// Frame deltas are clamped to `max_frame_time` so a long stall (tab in the
    /// background, debugger) does not trigger a burst of catch-up ticks.
    pub fn advance(&mut self, elapsed: f32) {
        if !elapsed.is_finite() || elapsed <= 0.0 {
            return;
        }
        let elapsed = if elapsed > self.max_frame_time {
            log::warn!(
                "frame time {:.3}s clamped to {:.3}s",
                elapsed,
                self.max_frame_time
            );
            self.max_frame_time
        } else {
            elapsed
        };
        self.fast.accumulate(elapsed);
        self.slow.accumulate(elapsed);
    }

    /// Pop the next due activity, earliest deadline first (fast wins ties).
    pub fn next_due(&mut self) -> Option<Activity> {
        let activity = match (self.fast.overdue(), self.slow.overdue()) {
            (Some(f), Some(s)) if s > f => Activity::Slow,
            (Some(_), _) => Activity::Fast,
            (None, Some(_)) => Activity::Slow,
            (None, None) => return None,
        };
        match activity {
            Activity::Fast => self.fast.consume(),
            Activity::Slow => self.slow.consume(),
        }
        Some(activity)
    }
}
