mod types;

pub use types::{AgentId, Cell, Move, Side};

use rand::Rng;
use rand::seq::IndexedRandom;

// ============================================================================
// Helper functions
// ============================================================================

/// Uniform random choice among the candidates whose key equals the minimum.
/// Every move selection in the crate tie-breaks through here so that a
/// seeded rng makes the whole decision pipeline reproducible.
pub fn choose_min_by<T, K, R, F>(rng: &mut R, candidates: &[T], key: F) -> Option<T>
where
    T: Copy,
    K: PartialOrd + Copy,
    R: Rng + ?Sized,
    F: Fn(&T) -> K,
{
    let keyed: Vec<(T, K)> = candidates.iter().map(|c| (*c, key(c))).collect();
    let best = keyed
        .iter()
        .map(|(_, k)| *k)
        .reduce(|a, b| if b < a { b } else { a })?;
    let ties: Vec<T> = keyed
        .iter()
        .filter(|(_, k)| *k == best)
        .map(|(c, _)| *c)
        .collect();
    ties.choose(rng).copied()
}

/// Uniform random choice among the candidates whose key equals the maximum.
pub fn choose_max_by<T, K, R, F>(rng: &mut R, candidates: &[T], key: F) -> Option<T>
where
    T: Copy,
    K: PartialOrd + Copy,
    R: Rng + ?Sized,
    F: Fn(&T) -> K,
{
    let keyed: Vec<(T, K)> = candidates.iter().map(|c| (*c, key(c))).collect();
    let best = keyed
        .iter()
        .map(|(_, k)| *k)
        .reduce(|a, b| if b > a { b } else { a })?;
    let ties: Vec<T> = keyed
        .iter()
        .filter(|(_, k)| *k == best)
        .map(|(c, _)| *c)
        .collect();
    ties.choose(rng).copied()
}

/// Legal moves with `Halt` filtered out.
pub fn non_halt(moves: Vec<Move>) -> Vec<Move> {
    moves.into_iter().filter(|m| *m != Move::Halt).collect()
}
