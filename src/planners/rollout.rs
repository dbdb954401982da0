use rand::Rng;
use rand::seq::IndexedRandom;

use crate::infra::{AgentId, Move, Side, non_halt};
use crate::planners::features::{EvalMode, evaluate};
use crate::state::GameView;

pub const DEFAULT_REPETITIONS: u32 = 24;
pub const DEFAULT_DEPTH: u32 = 20;

/// Bounded-depth random-policy rollout planner. Each rollout walks the
/// moving agent `depth` random steps (avoiding immediate backtracking) and
/// scores the final state with the linear evaluator; `score` sums
/// `repetitions` such rollouts to estimate a candidate move's value.
///
/// This is a Monte Carlo estimate, not a search: opponents are never
/// expanded, only the mover's own stochastic continuations.
#[derive(Debug, Clone, Copy)]
pub struct RolloutPlanner {
    pub repetitions: u32,
    pub depth: u32,
}

impl Default for RolloutPlanner {
    fn default() -> Self {
        Self {
            repetitions: DEFAULT_REPETITIONS,
            depth: DEFAULT_DEPTH,
        }
    }
}

impl RolloutPlanner {
    pub fn new(repetitions: u32, depth: u32) -> Self {
        Self { repetitions, depth }
    }

    /// Aggregate value of `state` for the moving agent: the sum of
    /// `repetitions` independent rollouts.
    pub fn score<G, R>(
        &self,
        state: &G,
        agent: AgentId,
        side: Side,
        mode: EvalMode,
        rng: &mut R,
    ) -> f64
    where
        G: GameView,
        R: Rng + ?Sized,
    {
        (0..self.repetitions)
            .map(|_| self.simulate(state, agent, side, mode, rng))
            .sum()
    }

    fn simulate<G, R>(&self, state: &G, agent: AgentId, side: Side, mode: EvalMode, rng: &mut R) -> f64
    where
        G: GameView,
        R: Rng + ?Sized,
    {
        let mut current = state.clone();
        for _ in 0..self.depth {
            let Some(mv) = random_step(&current, agent, rng) else {
                break;
            };
            // Raw successor here; only the terminal evaluation goes through
            // the grid-aligned correction.
            current = current.apply_move(agent, mv);
        }
        evaluate(&current, agent, side, mode, Move::Halt)
    }
}

/// One step of the rollout policy: a uniform choice among the non-halt
/// legal moves, excluding the reverse of the current facing direction
/// unless it is the only option. `None` when the agent is sealed in.
fn random_step<G, R>(state: &G, agent: AgentId, rng: &mut R) -> Option<Move>
where
    G: GameView,
    R: Rng + ?Sized,
{
    let mut moves = non_halt(state.legal_moves(agent));
    if moves.is_empty() {
        return None;
    }
    if moves.len() == 1 {
        return Some(moves[0]);
    }
    let reverse = state.facing(agent).reverse();
    moves.retain(|m| *m != reverse);
    moves.choose(rng).copied()
}
