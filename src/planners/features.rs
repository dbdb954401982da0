use std::collections::HashMap;

use crate::infra::{AgentId, Move, Side};
use crate::state::{GameView, aligned_successor};

// Feature names shared by the extractor and the weight tables.
pub const SUCCESSOR_SCORE: &str = "successor_score";
pub const ON_ENEMY_HALF: &str = "on_enemy_half";
pub const FOOD_DISTANCE: &str = "food_distance";
pub const GHOST_DISTANCE: &str = "ghost_distance";

/// Sparse map from feature name to value, doubling as a weight table.
/// A key missing from either side contributes zero to the dot product.
#[derive(Debug, Clone, Default)]
pub struct FeatureMap {
    values: HashMap<&'static str, f64>,
}

impl FeatureMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: &'static str, value: f64) {
        self.values.insert(name, value);
    }

    pub fn get(&self, name: &'static str) -> f64 {
        self.values.get(name).copied().unwrap_or(0.0)
    }

    pub fn dot(&self, weights: &FeatureMap) -> f64 {
        self.values
            .iter()
            .map(|(name, value)| value * weights.get(name))
            .sum()
    }
}

/// Offensive mode flags that select the weight table.
#[derive(Debug, Clone, Copy, Default)]
pub struct EvalMode {
    pub committed_attack: bool,
    pub forced_return: bool,
}

/// Features of the successor state reached by `mv`, from `side`'s point of
/// view. Side-effect-free; never fails.
pub fn extract_features<G: GameView>(successor: &G, agent: AgentId, side: Side) -> FeatureMap {
    let mut features = FeatureMap::new();
    features.set(SUCCESSOR_SCORE, successor.score(side));

    let Some(position) = successor.agent_cell(agent) else {
        return features;
    };

    features.set(
        ON_ENEMY_HALF,
        if successor.is_infiltrator(agent) { 1.0 } else { 0.0 },
    );

    let food = successor.resources_for(side.opposite());
    if let Some(nearest) = food
        .iter()
        .map(|f| successor.maze_distance(position, *f))
        .min()
    {
        features.set(FOOD_DISTANCE, nearest as f64);
    }

    // Visible guards, scared or not; scared status only affects the weight.
    let guard_distances: Vec<i32> = successor
        .opponents_of(side)
        .into_iter()
        .filter(|&opp| !successor.is_infiltrator(opp))
        .filter_map(|opp| successor.agent_cell(opp))
        .map(|cell| successor.maze_distance(position, cell))
        .collect();

    if let Some(nearest) = guard_distances.into_iter().min() {
        // A guard inside 5 steps folds the score term into the distance
        // feature. Intentional quirk of the tuned controller; keep as-is.
        if nearest < 5 {
            features.set(GHOST_DISTANCE, nearest as f64 + successor.score(side));
        } else {
            features.set(GHOST_DISTANCE, 0.0);
        }
    }

    features
}

/// Mode-selected weight table. In the default-reflex mode the guard weight
/// drops to zero when the last-scanned visible guard is scared.
pub fn weights_for<G: GameView>(successor: &G, side: Side, mode: EvalMode) -> FeatureMap {
    let mut weights = FeatureMap::new();
    weights.set(SUCCESSOR_SCORE, 202.0);
    weights.set(FOOD_DISTANCE, -8.0);

    if mode.committed_attack {
        weights.set(ON_ENEMY_HALF, if mode.forced_return { 3010.0 } else { 0.0 });
        weights.set(GHOST_DISTANCE, 215.0);
    } else {
        weights.set(ON_ENEMY_HALF, 0.0);
        let visible_guards: Vec<AgentId> = successor
            .opponents_of(side)
            .into_iter()
            .filter(|&opp| !successor.is_infiltrator(opp) && successor.agent_cell(opp).is_some())
            .collect();
        let mut ghost_weight = 210.0;
        if let Some(&last) = visible_guards.last()
            && successor.scared_ticks(last) > 0
        {
            ghost_weight = 0.0;
        }
        weights.set(GHOST_DISTANCE, ghost_weight);
    }

    weights
}

/// Linear move evaluation: feature vector of the grid-aligned successor,
/// dotted with the mode's weights.
pub fn evaluate<G: GameView>(
    state: &G,
    agent: AgentId,
    side: Side,
    mode: EvalMode,
    mv: Move,
) -> f64 {
    let successor = aligned_successor(state, agent, mv);
    let features = extract_features(&successor, agent, side);
    let weights = weights_for(&successor, side, mode);
    features.dot(&weights)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::Cell;
    use crate::sim::GridGame;

    #[test]
    fn dot_product_ignores_unknown_features() {
        let mut features = FeatureMap::new();
        features.set(SUCCESSOR_SCORE, 2.0);
        features.set("made_up_feature", 1000.0);

        let mut weights = FeatureMap::new();
        weights.set(SUCCESSOR_SCORE, 3.0);
        weights.set(FOOD_DISTANCE, -8.0); // no matching feature

        assert_eq!(features.dot(&weights), 6.0);
    }

    #[test]
    fn committed_attack_weights_follow_the_retreat_flag() {
        let state = GridGame::parse(
            "%%%%%%%%\n\
             %0  . 1%\n\
             %2  . 3%\n\
             %%%%%%%%",
            None,
        );
        let attack = EvalMode {
            committed_attack: true,
            forced_return: true,
        };
        let weights = weights_for(&state, Side::Red, attack);
        assert_eq!(weights.get(ON_ENEMY_HALF), 3010.0);
        assert_eq!(weights.get(GHOST_DISTANCE), 215.0);

        let no_retreat = EvalMode {
            committed_attack: true,
            forced_return: false,
        };
        let weights = weights_for(&state, Side::Red, no_retreat);
        assert_eq!(weights.get(ON_ENEMY_HALF), 0.0);
        assert_eq!(weights.get(SUCCESSOR_SCORE), 202.0);
    }

    #[test]
    fn scared_guard_zeroes_the_default_ghost_weight() {
        // Red agent 0 sits next to the blue-side potion; eating it scares
        // the blue guards.
        let state = GridGame::parse(
            "%%%%%%%%\n\
             %   0o %\n\
             %    1 %\n\
             %%%%%%%%",
            None,
        );
        let before = weights_for(&state, Side::Red, EvalMode::default());
        assert_eq!(before.get(GHOST_DISTANCE), 210.0);

        let after = state.apply_move(0, Move::East);
        assert!(after.scared_ticks(1) > 0);
        let weights = weights_for(&after, Side::Red, EvalMode::default());
        assert_eq!(weights.get(GHOST_DISTANCE), 0.0);
    }

    #[test]
    fn nearby_guard_folds_score_into_the_distance_feature() {
        let state = GridGame::parse(
            "%%%%%%%%\n\
             %0   1 %\n\
             %   .  %\n\
             %%%%%%%%",
            None,
        );
        let features = extract_features(&state, 0, Side::Red);
        let guard_distance = state.maze_distance(Cell::new(1, 1), Cell::new(5, 1));
        assert_eq!(guard_distance, 4);
        assert_eq!(
            features.get(GHOST_DISTANCE),
            guard_distance as f64 + state.score(Side::Red)
        );
    }
}
