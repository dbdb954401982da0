//! Reference engine for the demo driver and the test suite.
//!
//! Implements just enough of the capture game to exercise every decision
//! path: walls, per-half food and potions, sensor-range visibility, scared
//! countdowns, and respawn on capture. The agents themselves only ever see
//! it through the `GameView` trait.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;

use crate::infra::{AgentId, Cell, Move, Side};
use crate::state::GameView;

/// Turns of scaredness granted by eating a potion.
pub const SCARED_TURNS: u32 = 40;

/// Distance reported for cell pairs with no connecting path.
pub const UNREACHABLE: i32 = 9999;

#[derive(Debug, Clone)]
struct SimAgent {
    side: Side,
    spawn: Cell,
    cell: Cell,
    facing: Move,
    scared: u32,
}

/// Board snapshot. Cloning is cheap enough for rollouts: the all-pairs
/// distance table is shared behind an `Arc`.
#[derive(Clone)]
pub struct GridGame {
    width: i32,
    height: i32,
    walls: HashSet<Cell>,
    food: HashSet<Cell>,
    capsules: Vec<Cell>,
    agents: Vec<SimAgent>,
    scores: [f64; 2],
    observer: Option<Side>,
    sensor_range: Option<i32>,
    distances: Arc<HashMap<(Cell, Cell), i32>>,
}

fn side_index(side: Side) -> usize {
    match side {
        Side::Red => 0,
        Side::Blue => 1,
    }
}

impl GridGame {
    /// Builds a board from a text layout: `%` wall, `.` food, `o` potion,
    /// digits agent spawns (even red, odd blue, contiguous from 0), space
    /// open floor. Cells own the side of the half they sit on. With
    /// `sensor_range` set, enemies farther than that from every observing
    /// agent read as unknown.
    pub fn parse(layout: &str, sensor_range: Option<i32>) -> GridGame {
        let lines: Vec<&str> = layout.lines().collect();
        let height = lines.len() as i32;
        let width = lines
            .iter()
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(0) as i32;

        let mut walls = HashSet::new();
        let mut food = HashSet::new();
        let mut capsules = Vec::new();
        let mut found: Vec<(usize, Cell)> = Vec::new();

        for (y, line) in lines.iter().enumerate() {
            for (x, ch) in line.chars().enumerate() {
                let cell = Cell::new(x as i32, y as i32);
                match ch {
                    '%' => {
                        walls.insert(cell);
                    }
                    '.' => {
                        food.insert(cell);
                    }
                    'o' => capsules.push(cell),
                    '0'..='9' => found.push((ch as usize - '0' as usize, cell)),
                    _ => {}
                }
            }
        }

        found.sort_by_key(|(id, _)| *id);
        let agents: Vec<SimAgent> = found
            .iter()
            .enumerate()
            .map(|(i, (id, cell))| {
                assert_eq!(i, *id, "layout agent ids must be contiguous from 0");
                SimAgent {
                    side: if id % 2 == 0 { Side::Red } else { Side::Blue },
                    spawn: *cell,
                    cell: *cell,
                    facing: Move::Halt,
                    scared: 0,
                }
            })
            .collect();

        let distances = Arc::new(all_pairs_distances(width, height, &walls));

        GridGame {
            width,
            height,
            walls,
            food,
            capsules,
            agents,
            scores: [0.0, 0.0],
            observer: None,
            sensor_range,
            distances,
        }
    }

    /// The per-side observation the engine hands an agent: identical board,
    /// with out-of-range enemies masked from `agent_cell`.
    pub fn as_seen_by(&self, side: Side) -> GridGame {
        let mut view = self.clone();
        view.observer = Some(side);
        view
    }

    pub fn num_agents(&self) -> usize {
        self.agents.len()
    }

    fn half_of(&self, cell: Cell) -> Side {
        if cell.x < self.width / 2 {
            Side::Red
        } else {
            Side::Blue
        }
    }

    fn open(&self, cell: Cell) -> bool {
        cell.x >= 0
            && cell.x < self.width
            && cell.y >= 0
            && cell.y < self.height
            && !self.walls.contains(&cell)
    }
}

impl GameView for GridGame {
    fn board_dimensions(&self) -> (i32, i32) {
        (self.width, self.height)
    }

    fn has_wall(&self, cell: Cell) -> bool {
        self.walls.contains(&cell)
    }

    fn legal_moves(&self, agent: AgentId) -> Vec<Move> {
        let Some(mover) = self.agents.get(agent) else {
            return vec![Move::Halt];
        };
        Move::ALL
            .into_iter()
            .filter(|mv| *mv == Move::Halt || self.open(mv.apply(mover.cell)))
            .collect()
    }

    fn apply_move(&self, agent: AgentId, mv: Move) -> Self {
        let mut next = self.clone();
        let Some(from) = next.agents.get(agent).map(|a| a.cell) else {
            return next;
        };
        let to = mv.apply(from);
        let landed = if next.open(to) { to } else { from };

        let mover = &mut next.agents[agent];
        mover.cell = landed;
        mover.facing = mv;
        if mover.scared > 0 {
            mover.scared -= 1;
        }
        let side = mover.side;
        let cell = mover.cell;

        let infiltrating = next.half_of(cell) != side;

        if infiltrating && next.food.remove(&cell) {
            next.scores[side_index(side)] += 1.0;
        }
        if infiltrating && let Some(i) = next.capsules.iter().position(|c| *c == cell) {
            next.capsules.remove(i);
            for other in &mut next.agents {
                if other.side != side {
                    other.scared = SCARED_TURNS;
                }
            }
        }

        // Collisions between opposing agents: the home-half agent is the
        // guard; a threatening guard sends the intruder back to spawn, a
        // scared one is captured itself.
        let count = next.agents.len();
        for i in 0..count {
            for j in (i + 1)..count {
                if next.agents[i].cell != next.agents[j].cell
                    || next.agents[i].side == next.agents[j].side
                {
                    continue;
                }
                let here = next.agents[i].cell;
                let home = next.half_of(here);
                let (guard, intruder) = if next.agents[i].side == home {
                    (i, j)
                } else {
                    (j, i)
                };
                let loser = if next.agents[guard].scared == 0 {
                    intruder
                } else {
                    next.agents[guard].scared = 0;
                    guard
                };
                next.agents[loser].cell = next.agents[loser].spawn;
                next.agents[loser].facing = Move::Halt;
            }
        }

        next
    }

    fn agent_cell(&self, agent: AgentId) -> Option<Cell> {
        let state = self.agents.get(agent)?;
        if let (Some(observer), Some(range)) = (self.observer, self.sensor_range)
            && state.side != observer
        {
            let visible = self
                .agents
                .iter()
                .filter(|other| other.side == observer)
                .any(|other| other.cell.manhattan(&state.cell) <= range);
            if !visible {
                return None;
            }
        }
        Some(state.cell)
    }

    fn facing(&self, agent: AgentId) -> Move {
        self.agents.get(agent).map(|a| a.facing).unwrap_or(Move::Halt)
    }

    fn is_infiltrator(&self, agent: AgentId) -> bool {
        self.agents
            .get(agent)
            .map(|a| self.half_of(a.cell) != a.side)
            .unwrap_or(false)
    }

    fn scared_ticks(&self, agent: AgentId) -> u32 {
        self.agents.get(agent).map(|a| a.scared).unwrap_or(0)
    }

    fn side_of(&self, agent: AgentId) -> Side {
        self.agents
            .get(agent)
            .map(|a| a.side)
            .unwrap_or(Side::Red)
    }

    fn opponents_of(&self, side: Side) -> Vec<AgentId> {
        self.agents
            .iter()
            .enumerate()
            .filter(|(_, a)| a.side != side)
            .map(|(i, _)| i)
            .collect()
    }

    fn resources_for(&self, side: Side) -> Vec<Cell> {
        let mut cells: Vec<Cell> = self
            .food
            .iter()
            .filter(|cell| self.half_of(**cell) == side)
            .copied()
            .collect();
        cells.sort_by_key(|cell| (cell.x, cell.y));
        cells
    }

    fn capture_points_for(&self, side: Side) -> Vec<Cell> {
        self.capsules
            .iter()
            .filter(|cell| self.half_of(**cell) == side)
            .copied()
            .collect()
    }

    fn score(&self, side: Side) -> f64 {
        self.scores[side_index(side)] - self.scores[side_index(side.opposite())]
    }

    fn maze_distance(&self, a: Cell, b: Cell) -> i32 {
        self.distances.get(&(a, b)).copied().unwrap_or(UNREACHABLE)
    }

    fn initial_spawn_cell(&self, agent: AgentId) -> Cell {
        self.agents
            .get(agent)
            .map(|a| a.spawn)
            .unwrap_or(Cell::new(0, 0))
    }
}

/// BFS from every open cell; the table doubles as the maze-distance oracle.
fn all_pairs_distances(
    width: i32,
    height: i32,
    walls: &HashSet<Cell>,
) -> HashMap<(Cell, Cell), i32> {
    let open: Vec<Cell> = (0..width)
        .flat_map(|x| (0..height).map(move |y| Cell::new(x, y)))
        .filter(|cell| !walls.contains(cell))
        .collect();

    let mut distances = HashMap::new();
    for &start in &open {
        let mut queue = VecDeque::new();
        queue.push_back((start, 0));
        distances.insert((start, start), 0);
        while let Some((current, d)) = queue.pop_front() {
            for neighbor in current.neighbors() {
                if neighbor.x < 0
                    || neighbor.x >= width
                    || neighbor.y < 0
                    || neighbor.y >= height
                    || walls.contains(&neighbor)
                    || distances.contains_key(&(start, neighbor))
                {
                    continue;
                }
                distances.insert((start, neighbor), d + 1);
                queue.push_back((neighbor, d + 1));
            }
        }
    }
    distances
}
