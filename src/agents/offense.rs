use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::debug;

use crate::infra::{AgentId, Cell, Move, Side, choose_max_by, choose_min_by, non_halt};
use crate::planners::{EvalMode, RolloutPlanner};
use crate::state::{GameView, OffenseMemory};

/// Offensive role: crosses into enemy territory to eat resources.
///
/// Mode logic, re-evaluated every turn:
/// - sortie: from spawn until the rally cell is reached, pure greedy
///   distance minimization toward the rally cell;
/// - potion-advantage: after eating an enemy potion, greedy foraging until
///   a threatening guard closes in; once five resources have been eaten or
///   none remain, the forage target flips to home;
/// - committed-attack: entered when the opposing resource count has been
///   stuck for more than 20 turns away from spawn, shifts the weight table;
/// - otherwise the move comes from Monte Carlo rollouts under the
///   default-reflex weights.
pub struct OffenseAgent {
    index: AgentId,
    side: Side,
    pub planner: RolloutPlanner,
    memory: Option<OffenseMemory>,
    rng: StdRng,
}

impl OffenseAgent {
    pub fn new(index: AgentId, side: Side, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            index,
            side,
            planner: RolloutPlanner::default(),
            memory: None,
            rng,
        }
    }

    pub fn index(&self) -> AgentId {
        self.index
    }

    pub fn memory(&self) -> Option<&OffenseMemory> {
        self.memory.as_ref()
    }

    /// Computes the rally cell and resets all per-game state.
    pub fn on_game_start<G: GameView>(&mut self, state: &G) {
        let spawn = state.initial_spawn_cell(self.index);
        let rally = rally_cell(state, self.side).unwrap_or(spawn);
        debug!(?spawn, ?rally, "offense initialized");
        self.memory = Some(OffenseMemory::new(spawn, rally));
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

        if position == mem.spawn {
            mem.on_sortie = true;
            mem.stall_counter = 0;
        }
        if position == mem.rally {
            mem.on_sortie = false;
        }

        if mem.on_sortie {
            let candidates = non_halt(state.legal_moves(index));
            let rally = mem.rally;
            debug!(?rally, "sortie toward rally cell");
            return choose_min_by(&mut self.rng, &candidates, |mv| {
                let successor = state.apply_move(index, *mv);
                successor
                    .agent_cell(index)
                    .map(|cell| state.maze_distance(cell, rally))
                    .unwrap_or(i32::MAX)
            })
            .unwrap_or(Move::Halt);
        }

        let enemy = side.opposite();
        let present_food = state.resources_for(enemy);
        let capsules_left = state.capture_points_for(enemy).len();
        let prev_capsules = mem.prev_capsules_left;
        let prev_food_len = mem.last_enemy_food.len();

        // Banked a resource last turn: frame the weights around retreating
        // until we are back on our own half.
        if present_food.len() < prev_food_len {
            mem.should_retreat = true;
        }
        mem.last_enemy_food = present_food.clone();
        mem.prev_capsules_left = capsules_left;
        if !state.is_infiltrator(index) {
            mem.should_retreat = false;
        }

        // Stall tracking: any change in the opposing resource count resets.
        if present_food.len() == mem.tracked_food_size {
            mem.stall_counter += 1;
        } else {
            mem.tracked_food_size = present_food.len();
            mem.stall_counter = 0;
        }
        mem.committed_attack = mem.stall_counter > 20;

        // Nearest visible, non-scared guard.
        let mut guard_distance = i32::MAX;
        for opp in state.opponents_of(side) {
            if !state.is_infiltrator(opp)
                && state.scared_ticks(opp) == 0
                && let Some(cell) = state.agent_cell(opp)
            {
                guard_distance = guard_distance.min(state.maze_distance(position, cell));
            }
        }

        if capsules_left < prev_capsules {
            debug!("potion eaten, entering potion-advantage mode");
            mem.capsule_power = true;
            mem.eaten_since_capsule = 0;
        }
        if guard_distance <= 5 {
            mem.capsule_power = false;
        }

        if mem.capsule_power {
            if !state.is_infiltrator(index) {
                mem.eaten_since_capsule = 0;
            }
            if present_food.len() < prev_food_len {
                mem.eaten_since_capsule += 1;
            }

            if present_food.is_empty() || mem.eaten_since_capsule >= 5 {
                mem.target = Some(mem.spawn);
            } else {
                let mut best = i32::MAX;
                for food in &present_food {
                    let distance = state.maze_distance(position, *food);
                    if distance < best {
                        best = distance;
                        mem.target = Some(*food);
                    }
                }
            }

            let target = mem.target.unwrap_or(mem.spawn);
            debug!(?target, "foraging under potion advantage");
            let candidates = non_halt(state.legal_moves(index));
            return choose_min_by(&mut self.rng, &candidates, |mv| {
                let successor = state.apply_move(index, *mv);
                successor
                    .agent_cell(index)
                    .map(|cell| state.maze_distance(cell, target))
                    .unwrap_or(i32::MAX)
            })
            .unwrap_or(Move::Halt);
        }

        mem.eaten_since_capsule = 0;
        let mode = EvalMode {
            committed_attack: mem.committed_attack,
            forced_return: mem.should_retreat,
        };
        debug!(
            committed = mode.committed_attack,
            retreat = mode.forced_return,
            "rollout evaluation"
        );

        let candidates = non_halt(state.legal_moves(index));
        let mut scored: Vec<(Move, f64)> = Vec::with_capacity(candidates.len());
        for mv in candidates {
            let next = state.apply_move(index, mv);
            let value = self.planner.score(&next, index, side, mode, &mut self.rng);
            scored.push((mv, value));
        }
        choose_max_by(&mut self.rng, &scored, |(_, value)| *value)
            .map(|(mv, _)| mv)
            .unwrap_or(Move::Halt)
    }
}

/// Open cell in the middle of the home-side center column; the midpoint of
/// the open cells favors central entry into enemy territory.
fn rally_cell<G: GameView>(state: &G, side: Side) -> Option<Cell> {
    let (width, height) = state.board_dimensions();
    let mut x = (width - 2) / 2;
    if side == Side::Blue {
        x += 1;
    }
    let open: Vec<Cell> = (1..height - 1)
        .map(|y| Cell::new(x, y))
        .filter(|cell| !state.has_wall(*cell))
        .collect();
    open.get(open.len() / 2).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::GridGame;

    // Width 10, alternating walls on the red center column (x = 4): the
    // open cells are (4, 2) and (4, 4), so the rally cell is (4, 4).
    const SORTIE_BOARD: &str = "%%%%%%%%%%\n\
                                %0  %   1%\n\
                                %        %\n\
                                %2  %   3%\n\
                                %        %\n\
                                %   %   .%\n\
                                %%%%%%%%%%";

    #[test]
    fn first_move_heads_for_the_rally_cell() {
        let state = GridGame::parse(SORTIE_BOARD, None);
        let mut agent = OffenseAgent::new(0, Side::Red, Some(5));
        agent.on_game_start(&state);
        assert_eq!(agent.memory().unwrap().rally, Cell::new(4, 4));

        for _ in 0..10 {
            let mv = agent.choose_move(&state);
            assert_ne!(mv, Move::Halt);
            // East and South tie on distance to (4, 4); both are 7 away.
            assert!(mv == Move::East || mv == Move::South);
        }
    }

    fn open_board() -> GridGame {
        GridGame::parse(
            "%%%%%%%%%%\n\
             %0     .1%\n\
             %2     .3%\n\
             %%%%%%%%%%",
            None,
        )
    }

    #[test]
    fn stall_counter_gates_committed_attack() {
        let state = open_board();
        let mut agent = OffenseAgent::new(0, Side::Red, Some(9));
        agent.planner = RolloutPlanner::new(2, 4);
        agent.on_game_start(&state);

        // Step off spawn so the sortie branch does not swallow the turn.
        let away = state.apply_move(0, Move::East);

        // First observation resets against the sentinel, the following 21
        // increment; the mode flips only once the counter exceeds 20.
        for expected in 0..=21 {
            agent.choose_move(&away);
            let mem = agent.memory().unwrap();
            assert_eq!(mem.stall_counter, expected);
            assert_eq!(mem.committed_attack, expected > 20);
        }

        // Returning to spawn resets the counter.
        agent.choose_move(&state);
        assert_eq!(agent.memory().unwrap().stall_counter, 0);
    }

    #[test]
    fn stall_counter_resets_when_food_count_changes() {
        let state = open_board();
        let mut agent = OffenseAgent::new(0, Side::Red, Some(9));
        agent.planner = RolloutPlanner::new(2, 4);
        agent.on_game_start(&state);

        let away = state.apply_move(0, Move::East);
        for _ in 0..5 {
            agent.choose_move(&away);
        }
        assert!(agent.memory().unwrap().stall_counter > 0);

        let fewer_food = GridGame::parse(
            "%%%%%%%%%%\n\
             % 0     1%\n\
             %2     .3%\n\
             %%%%%%%%%%",
            None,
        );
        agent.choose_move(&fewer_food);
        assert_eq!(agent.memory().unwrap().stall_counter, 0);
    }

    #[test]
    fn potion_advantage_ends_when_a_guard_closes_in() {
        let with_potion = GridGame::parse(
            "%%%%%%%%%%%%\n\
             % 0  .  o 1%\n\
             %2   .    3%\n\
             %%%%%%%%%%%%",
            None,
        );
        let mut agent = OffenseAgent::new(0, Side::Red, Some(2));
        agent.planner = RolloutPlanner::new(2, 4);
        agent.on_game_start(&with_potion);
        // Spawn is (2, 1) in this parse; the later observations place the
        // agent one cell east of it so the sortie branch stays out of play.
        let baseline = GridGame::parse(
            "%%%%%%%%%%%%\n\
             %  0 .  o 1%\n\
             %2   .    3%\n\
             %%%%%%%%%%%%",
            None,
        );
        agent.choose_move(&baseline);
        assert!(!agent.memory().unwrap().capsule_power);

        let potion_gone = GridGame::parse(
            "%%%%%%%%%%%%\n\
             %  0 .    1%\n\
             %2   .    3%\n\
             %%%%%%%%%%%%",
            None,
        );
        agent.choose_move(&potion_gone);
        assert!(agent.memory().unwrap().capsule_power);

        // A visible non-scared guard within maze distance 5 kills the mode
        // regardless of anything else.
        let guard_near = GridGame::parse(
            "%%%%%%%%%%%%\n\
             %  0 .  1  %\n\
             %2   .    3%\n\
             %%%%%%%%%%%%",
            None,
        );
        agent.choose_move(&guard_near);
        assert!(!agent.memory().unwrap().capsule_power);
    }

    // Width 12, half at x = 6. The blue agents sit in a walled-off pocket
    // so their maze distance to the forager stays above 5; the potion and
    // all food are on the blue half. The forager observations step east
    // along the top corridor, consuming food as they go.
    fn forage_board(row: &str) -> GridGame {
        GridGame::parse(
            &format!(
                "%%%%%%%%%%%%\n\
                 {row}\n\
                 %      %%%%%\n\
                 %2     %1 3%\n\
                 %%%%%%%%%%%%"
            ),
            None,
        )
    }

    #[test]
    fn potion_advantage_survives_food_eats_and_counts_them() {
        let start = forage_board("% 0   o....%");
        let mut agent = OffenseAgent::new(0, Side::Red, Some(6));
        agent.planner = RolloutPlanner::new(2, 4);
        agent.on_game_start(&start);

        // Off spawn, potion still present: mode not yet entered.
        agent.choose_move(&forage_board("%  0  o....%"));
        assert!(!agent.memory().unwrap().capsule_power);

        agent.choose_move(&forage_board("%  0   ....%"));
        let mem = agent.memory().unwrap();
        assert!(mem.capsule_power);
        assert_eq!(mem.eaten_since_capsule, 0);

        // Standing where food used to be, deep on the blue half: the mode
        // persists and the counter tracks each disappearance.
        agent.choose_move(&forage_board("%      0...%"));
        let mem = agent.memory().unwrap();
        assert!(mem.capsule_power);
        assert_eq!(mem.eaten_since_capsule, 1);

        agent.choose_move(&forage_board("%       0..%"));
        let mem = agent.memory().unwrap();
        assert!(mem.capsule_power);
        assert_eq!(mem.eaten_since_capsule, 2);
    }

    #[test]
    fn fifth_eat_under_potion_forces_the_return_home() {
        let start = forage_board("% 0   o....%");
        let mut agent = OffenseAgent::new(0, Side::Red, Some(6));
        agent.planner = RolloutPlanner::new(2, 4);
        agent.on_game_start(&start);

        agent.choose_move(&forage_board("%  0  o....%"));
        agent.choose_move(&forage_board("%  0   ....%"));
        agent.choose_move(&forage_board("%      0...%"));
        assert_eq!(agent.memory().unwrap().eaten_since_capsule, 1);

        let mut mem = agent.memory().unwrap().clone();
        mem.eaten_since_capsule = 4;
        agent.memory = Some(mem);

        // One more eat while food remains: the target flips to spawn and
        // the move heads back west.
        let mv = agent.choose_move(&forage_board("%       0..%"));
        let mem = agent.memory().unwrap();
        assert!(mem.capsule_power);
        assert_eq!(mem.eaten_since_capsule, 5);
        assert_eq!(mem.target, Some(mem.spawn));
        assert_eq!(mv, Move::West);
    }

    #[test]
    fn seeded_agents_agree_on_every_move() {
        let state = open_board();
        let away = state.apply_move(0, Move::East);

        let mut first = OffenseAgent::new(0, Side::Red, Some(42));
        let mut second = OffenseAgent::new(0, Side::Red, Some(42));
        first.on_game_start(&state);
        second.on_game_start(&state);

        for _ in 0..8 {
            assert_eq!(first.choose_move(&away), second.choose_move(&away));
        }
    }
}
