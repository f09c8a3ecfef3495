//! Cyclic dominance between kinds

use super::state::Kind;

/// Winning kind of a cross-kind contact.
///
/// Rock beats scissors, scissors beats paper, paper beats rock. Symmetric in its
/// arguments. Only defined for differing kinds; callers check equality first.
pub fn winner(a: Kind, b: Kind) -> Kind {
    debug_assert_ne!(a, b, "dominance is undefined for equal kinds");
    if beats(a, b) { a } else { b }
}

/// Whether `a` converts `b` on contact
#[inline]
pub fn beats(a: Kind, b: Kind) -> bool {
    matches!(
        (a, b),
        (Kind::Rock, Kind::Scissors) | (Kind::Scissors, Kind::Paper) | (Kind::Paper, Kind::Rock)
    )
}
