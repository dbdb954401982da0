use crate::infra::Cell;

/// Per-agent mutable state for the offensive role. Lives for one game and
/// is reset wholesale by `on_game_start`; nothing here is shared between
/// agents.
#[derive(Debug, Clone)]
pub struct OffenseMemory {
    pub spawn: Cell,
    /// Single cell on the home side of the center line that guides the
    /// first sortie away from spawn. Computed once, never recomputed.
    pub rally: Cell,
    /// Opposing resource cells as of the previous turn.
    pub last_enemy_food: Vec<Cell>,
    /// Opposing potion count as of the previous turn.
    pub prev_capsules_left: usize,
    /// Food count the stall counter is tracking.
    pub tracked_food_size: usize,
    /// Turns without a change in the opposing resource count while away
    /// from spawn. Above 20 the agent commits to the attack.
    pub stall_counter: u32,
    pub committed_attack: bool,
    /// Set when a resource was banked last turn; forces the retreat framing
    /// of the committed-attack weights.
    pub should_retreat: bool,
    /// Potion-advantage mode flag.
    pub capsule_power: bool,
    pub eaten_since_capsule: u32,
    /// Cached potion-advantage target (nearest food or home).
    pub target: Option<Cell>,
    /// True from spawn until the rally cell is first reached.
    pub on_sortie: bool,
}

impl OffenseMemory {
    pub fn new(spawn: Cell, rally: Cell) -> Self {
        Self {
            spawn,
            rally,
            last_enemy_food: Vec::new(),
            prev_capsules_left: 0,
            // Sentinel above any real board's food count, so the first
            // observation resets the counter instead of incrementing it.
            tracked_food_size: usize::MAX,
            stall_counter: 0,
            committed_attack: false,
            should_retreat: false,
            capsule_power: false,
            eaten_since_capsule: 0,
            target: None,
            on_sortie: false,
        }
    }
}

/// Per-agent mutable state for the defensive role.
#[derive(Debug, Clone)]
pub struct DefenseMemory {
    /// Center-line patrol cells, computed once at game start.
    pub patrol_route: Vec<Cell>,
    /// Current pursuit or investigation target. Cleared when reached.
    pub target: Option<Cell>,
    /// Defended resource cells as of the previous turn, for eaten-cell
    /// inference.
    pub prev_defended_food: Vec<Cell>,
    /// Oscillation recovery counter. Resets to 0 when the safe move set is
    /// empty, increments otherwise; reversal is allowed at 0 and above 4.
    pub oscillation: u32,
}

impl DefenseMemory {
    pub fn new(patrol_route: Vec<Cell>) -> Self {
        Self {
            patrol_route,
            target: None,
            prev_defended_food: Vec::new(),
            oscillation: 0,
        }
    }
}
