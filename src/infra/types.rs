/// Index into the engine's agent table. Even indices are red, odd are blue
/// in the standard four-agent setup, but nothing here relies on that.
pub type AgentId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn manhattan(&self, other: &Cell) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    pub fn neighbors(&self) -> [Cell; 4] {
        [
            Cell::new(self.x, self.y - 1), // North
            Cell::new(self.x + 1, self.y), // East
            Cell::new(self.x, self.y + 1), // South
            Cell::new(self.x - 1, self.y), // West
        ]
    }
}

/// One turn's worth of movement. `Halt` stays put and is its own reverse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Move {
    North,
    East,
    South,
    West,
    Halt,
}

impl Move {
    pub const ALL: [Move; 5] = [Move::North, Move::East, Move::South, Move::West, Move::Halt];

    pub fn apply(self, cell: Cell) -> Cell {
        match self {
            Move::North => Cell::new(cell.x, cell.y - 1),
            Move::East => Cell::new(cell.x + 1, cell.y),
            Move::South => Cell::new(cell.x, cell.y + 1),
            Move::West => Cell::new(cell.x - 1, cell.y),
            Move::Halt => cell,
        }
    }

    pub fn reverse(self) -> Move {
        match self {
            Move::North => Move::South,
            Move::East => Move::West,
            Move::South => Move::North,
            Move::West => Move::East,
            Move::Halt => Move::Halt,
        }
    }
}

/// Team identity. Red owns the left half of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Red,
    Blue,
}

impl Side {
    pub fn opposite(self) -> Side {
        match self {
            Side::Red => Side::Blue,
            Side::Blue => Side::Red,
        }
    }
}
