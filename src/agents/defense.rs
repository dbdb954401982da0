use std::collections::HashSet;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use tracing::debug;

use crate::infra::{AgentId, Cell, Move, Side, choose_min_by, non_halt};
use crate::state::{DefenseMemory, GameView};

/// Defensive role: keeps the home half free of infiltrators.
///
/// Target priority each turn: nearest visible invader, then the cell a
/// missing defended resource disappeared from, then (once the current
/// target is reached and cleared) a random high-priority resource when few
/// remain, or a random patrol cell on the center line.
pub struct DefenseAgent {
    index: AgentId,
    side: Side,
    memory: Option<DefenseMemory>,
    rng: StdRng,
}

impl DefenseAgent {
    pub fn new(index: AgentId, side: Side, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            index,
            side,
            memory: None,
            rng,
        }
    }

    pub fn index(&self) -> AgentId {
        self.index
    }

    pub fn memory(&self) -> Option<&DefenseMemory> {
        self.memory.as_ref()
    }

    /// Computes the patrol route and resets all per-game state.
    pub fn on_game_start<G: GameView>(&mut self, state: &G) {
        let route = patrol_route(state, self.side);
        debug!(?route, "defense initialized");
        self.memory = Some(DefenseMemory::new(route));
    }

    pub fn choose_move<G: GameView>(&mut self, state: &G) -> Move {
        let index = self.index;
        let side = self.side;
        let Some(mem) = self.memory.as_mut() else {
            return Move::Halt;
        };
        let Some(position) = state.agent_cell(index) else {
            return Move::Halt;
        };

        if mem.target == Some(position) {
            mem.target = None;
        }

        // Visible opposing agents on our half are invaders; chase the
        // nearest one (the last to tighten the running minimum wins).
        let mut invaders: Vec<Cell> = Vec::new();
        for opp in state.opponents_of(side) {
            if state.is_infiltrator(opp)
                && let Some(cell) = state.agent_cell(opp)
            {
                invaders.push(cell);
            }
        }

        let defended_now = state.resources_for(side);
        if !invaders.is_empty() {
            let mut best = i32::MAX;
            for cell in &invaders {
                let distance = state.maze_distance(*cell, position);
                if distance < best {
                    best = distance;
                    mem.target = Some(*cell);
                }
            }
            debug!(target = ?mem.target, "pursuing invader");
        } else if !mem.prev_defended_food.is_empty() && defended_now.len() < mem.prev_defended_food.len()
        {
            // No invader in sight but food went missing: investigate the
            // cell it disappeared from.
            let now: HashSet<Cell> = defended_now.iter().copied().collect();
            if let Some(eaten) = mem
                .prev_defended_food
                .iter()
                .find(|cell| !now.contains(cell))
            {
                debug!(?eaten, "investigating eaten resource");
                mem.target = Some(*eaten);
            }
        }
        mem.prev_defended_food = defended_now.clone();

        let target = match mem.target {
            Some(target) => target,
            None => {
                let picked = if defended_now.len() <= 4 {
                    let mut high_priority = defended_now;
                    high_priority.extend(state.capture_points_for(side));
                    high_priority.choose(&mut self.rng).copied()
                } else {
                    mem.patrol_route.choose(&mut self.rng).copied()
                };
                let target = picked.unwrap_or(position);
                debug!(?target, "falling back to patrol target");
                mem.target = Some(target);
                target
            }
        };

        // Candidate filtering: drop halt and the reverse of our facing,
        // then keep only moves that stay on our own half. An empty safe set
        // resets the oscillation counter; the reverse direction is
        // re-admitted at 0 and above 4, so a dead-end never traps us.
        let reverse = state.facing(index).reverse();
        let mut moves = non_halt(state.legal_moves(index));
        moves.retain(|mv| *mv != reverse);

        let mut safe: Vec<Move> = moves
            .into_iter()
            .filter(|mv| !state.apply_move(index, *mv).is_infiltrator(index))
            .collect();

        if safe.is_empty() {
            mem.oscillation = 0;
        } else {
            mem.oscillation += 1;
        }
        if mem.oscillation > 4 || mem.oscillation == 0 {
            safe.push(reverse);
        }

        choose_min_by(&mut self.rng, &safe, |mv| {
            let successor = state.apply_move(index, *mv);
            successor
                .agent_cell(index)
                .map(|cell| state.maze_distance(cell, target))
                .unwrap_or(i32::MAX)
        })
        .unwrap_or(Move::Halt)
    }
}

/// Open cells of the home-side center column, stripped from both ends
/// until at most two remain, favoring central patrol coverage.
fn patrol_route<G: GameView>(state: &G, side: Side) -> Vec<Cell> {
    let (width, height) = state.board_dimensions();
    let mut x = (width - 2) / 2;
    if side == Side::Blue {
        x += 1;
    }
    let mut route: Vec<Cell> = (1..height - 1)
        .map(|y| Cell::new(x, y))
        .filter(|cell| !state.has_wall(*cell))
        .collect();
    while route.len() > 2 {
        route.remove(0);
        route.pop();
    }
    route
}
