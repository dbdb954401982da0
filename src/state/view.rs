use crate::infra::{AgentId, Cell, Move, Side};

/// Read-only window onto the engine's game state.
///
/// The engine hands each team an observation snapshot per turn; everything
/// the agents know about the board goes through these queries. Applying a
/// move never mutates the receiver, it produces a fresh snapshot.
pub trait GameView: Clone {
    fn board_dimensions(&self) -> (i32, i32);
    fn has_wall(&self, cell: Cell) -> bool;

    /// Legal moves for the agent. The engine guarantees `Halt` is always
    /// among them.
    fn legal_moves(&self, agent: AgentId) -> Vec<Move>;

    /// Pure successor function.
    fn apply_move(&self, agent: AgentId, mv: Move) -> Self;

    /// `None` when the agent is outside the observer's sensor range.
    /// Own-side agents are always visible.
    fn agent_cell(&self, agent: AgentId) -> Option<Cell>;

    /// Whether the agent sits exactly on a grid cell. Engines with sub-cell
    /// movement granularity report `false` mid-step.
    fn cell_aligned(&self, agent: AgentId) -> bool {
        let _ = agent;
        true
    }

    /// Direction of the agent's last move (`Halt` before the first one).
    fn facing(&self, agent: AgentId) -> Move;

    /// True while the agent stands on the opposing half of the board.
    fn is_infiltrator(&self, agent: AgentId) -> bool;

    /// Remaining turns of the agent's scared countdown; 0 means threatening.
    fn scared_ticks(&self, agent: AgentId) -> u32;

    fn side_of(&self, agent: AgentId) -> Side;
    fn opponents_of(&self, side: Side) -> Vec<AgentId>;

    /// Resource cells the given side owns (and defends).
    fn resources_for(&self, side: Side) -> Vec<Cell>;

    /// Capture-point-protecting potion cells the given side defends.
    fn capture_points_for(&self, side: Side) -> Vec<Cell>;

    /// Score from the given side's perspective (positive is good for it).
    fn score(&self, side: Side) -> f64;

    /// Precomputed shortest legal path length between two open cells.
    fn maze_distance(&self, a: Cell, b: Cell) -> i32;

    fn initial_spawn_cell(&self, agent: AgentId) -> Cell;
}

/// Successor of `state` after `mv`, corrected to the next grid-aligned
/// position: when a move only covers half a grid step, it is applied a
/// second time. Maze distances and feature extraction assume aligned cells.
pub fn aligned_successor<G: GameView>(state: &G, agent: AgentId, mv: Move) -> G {
    let next = state.apply_move(agent, mv);
    if next.cell_aligned(agent) {
        next
    } else {
        next.apply_move(agent, mv)
    }
}
