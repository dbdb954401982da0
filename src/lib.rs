pub mod agents;
pub mod infra;
pub mod planners;
pub mod sim;
pub mod state;

// Re-export commonly used types for convenience
pub use agents::{Agent, DefenseAgent, OffenseAgent, create_team};
pub use infra::{AgentId, Cell, Move, Side};
pub use planners::{EvalMode, RolloutPlanner, evaluate};
pub use state::{GameView, aligned_successor};
