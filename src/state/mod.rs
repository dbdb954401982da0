mod memory;
mod view;

pub use memory::{DefenseMemory, OffenseMemory};
pub use view::{GameView, aligned_successor};
