use rand::Rng;

use crate::config::GRID_COUNT;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn center() -> Self {
        Self::new(GRID_COUNT / 2, GRID_COUNT / 2)
    }

    pub fn step(self, dir: Direction) -> Self {
        let (dx, dy) = dir.delta();
        Self::new(self.x + dx, self.y + dy)
    }

    /// Border cells are walls; everything strictly inside is playfield.
    pub fn is_wall(self) -> bool {
        self.x < 1 || self.y < 1 || self.x >= GRID_COUNT - 1 || self.y >= GRID_COUNT - 1
    }

    /// Folds an out-of-playfield cell back onto the opposite interior edge,
    /// each axis on its own.
    pub fn wrapped(self) -> Self {
        Self::new(wrap_axis(self.x), wrap_axis(self.y))
    }
}

fn wrap_axis(v: i32) -> i32 {
    if v < 1 {
        GRID_COUNT - 2
    } else if v >= GRID_COUNT - 1 {
        1
    } else {
        v
    }
}

/// Rejection-samples interior cells until `accept` passes.
pub fn random_interior_cell<R: Rng + ?Sized>(rng: &mut R, accept: impl Fn(Cell) -> bool) -> Cell {
    loop {
        let cell = Cell::new(rng.gen_range(1..GRID_COUNT - 1), rng.gen_range(1..GRID_COUNT - 1));
        if accept(cell) {
            return cell;
        }
    }
}
