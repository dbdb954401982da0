mod defense;
mod offense;

pub use defense::DefenseAgent;
pub use offense::OffenseAgent;

use crate::infra::{AgentId, Move, Side};
use crate::state::GameView;

/// The two known roles, dispatched as a closed enum at team-setup time.
pub enum Agent {
    Offense(OffenseAgent),
    Defense(DefenseAgent),
}

impl Agent {
    pub fn index(&self) -> AgentId {
        match self {
            Agent::Offense(agent) => agent.index(),
            Agent::Defense(agent) => agent.index(),
        }
    }

    /// Called once before the first turn; computes the rally target or
    /// patrol route and resets the agent's memory.
    pub fn on_game_start<G: GameView>(&mut self, state: &G) {
        match self {
            Agent::Offense(agent) => agent.on_game_start(state),
            Agent::Defense(agent) => agent.on_game_start(state),
        }
    }

    /// Called once per turn; returns one legal move.
    pub fn choose_move<G: GameView>(&mut self, state: &G) -> Move {
        match self {
            Agent::Offense(agent) => agent.choose_move(state),
            Agent::Defense(agent) => agent.choose_move(state),
        }
    }
}

/// Standard team: the first agent attacks, the second defends. A seed makes
/// both agents' tie-breaking reproducible; each gets its own stream.
pub fn create_team(first: AgentId, second: AgentId, side: Side, seed: Option<u64>) -> (Agent, Agent) {
    (
        Agent::Offense(OffenseAgent::new(first, side, seed)),
        Agent::Defense(DefenseAgent::new(second, side, seed.map(|s| s.wrapping_add(1)))),
    )
}
