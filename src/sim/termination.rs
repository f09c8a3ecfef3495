//! Termination detection
//!
//! Sampled on the slow cadence. Kind diversity never increases during a run, so a
//! late sample only delays the verdict, it never produces a false one.

use serde::{Deserialize, Serialize};

use super::state::{Body, Kind, KindCounts};

/// The surviving kind, if exactly one kind remains
pub fn check_termination(bodies: &[Body]) -> Option<Kind> {
    let counts = KindCounts::from_bodies(bodies);
    let mut alive = Kind::ALL.into_iter().filter(|&k| counts.get(k) > 0);
    match (alive.next(), alive.next()) {
        (Some(kind), None) => Some(kind),
        _ => None,
    }
}

/// Detector state machine: Running -> Terminated (absorbing)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Termination {
    #[default]
    Running,
    Terminated(Kind),
}

impl Termination {
    /// Sample the population. Returns the winner only on the transition into
    /// `Terminated`; later calls never re-examine the bodies.
    pub fn sample(&mut self, bodies: &[Body]) -> Option<Kind> {
        if let Termination::Terminated(_) = self {
            return None;
        }
        let winner = check_termination(bodies)?;
        *self = Termination::Terminated(winner);
        Some(winner)
    }

    pub fn winner(&self) -> Option<Kind> {
        match self {
            Termination::Running => None,
            Termination::Terminated(kind) => Some(*kind),
        }
    }

    pub fn is_terminated(&self) -> bool {
        matches!(self, Termination::Terminated(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn bodies_of(kinds: &[Kind]) -> Vec<Body> {
        kinds
            .iter()
            .enumerate()
            .map(|(i, &kind)| Body {
                id: i as u32,
                kind,
                pos: Vec2::new(30.0 + i as f32 * 50.0, 30.0),
                vel: Vec2::ONE,
                radius: 20.0,
            })
            .collect()
    }

    #[test]
    fn test_mixed_population_keeps_running() {
        let bodies = bodies_of(&[Kind::Rock, Kind::Paper, Kind::Rock]);
        assert_eq!(check_termination(&bodies), None);
    }

    #[test]
    fn test_single_kind_wins() {
        let bodies = bodies_of(&[Kind::Paper, Kind::Paper]);
        assert_eq!(check_termination(&bodies), Some(Kind::Paper));
    }

    #[test]
    fn test_empty_population_has_no_winner() {
        assert_eq!(check_termination(&[]), None);
    }

    #[test]
    fn test_terminated_is_absorbing() {
        let mut detector = Termination::default();
        assert_eq!(
            detector.sample(&bodies_of(&[Kind::Rock, Kind::Scissors])),
            None
        );
        assert!(!detector.is_terminated());

        assert_eq!(
            detector.sample(&bodies_of(&[Kind::Scissors])),
            Some(Kind::Scissors)
        );
        // Reported once, then stays put regardless of input
        assert_eq!(detector.sample(&bodies_of(&[Kind::Rock])), None);
        assert_eq!(detector.winner(), Some(Kind::Scissors));
    }
}
