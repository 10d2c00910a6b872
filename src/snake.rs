use std::collections::VecDeque;

use crate::grid::{Cell, Direction};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Collision {
    Wall,
    Body,
}

/// What a call to [`Snake::advance`] did.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Step {
    /// The movement interval has not elapsed yet.
    Idle,
    Moved,
    /// Moved through a wall on the shield.
    Wrapped,
    /// Died on this call.
    Collided(Collision),
    /// Already dead; nothing happens any more.
    Dead,
}

impl Step {
    pub fn is_alive(self) -> bool {
        matches!(self, Step::Idle | Step::Moved | Step::Wrapped)
    }

    pub fn moved(self) -> bool {
        matches!(self, Step::Moved | Step::Wrapped)
    }
}

#[derive(Debug, Clone)]
pub struct Snake {
    body: VecDeque<Cell>,
    direction: Direction,
    pending: Option<Direction>,
    grow: bool,
    dead: bool,
    shield: bool,
    speed_multiplier: f64,
    score_multiplier: u32,
    move_interval: f64,
    last_move_at: f64,
}

impl Snake {
    /// One cell in the middle of the grid, heading right.
    pub fn new(now: f64, move_interval: f64) -> Self {
        Self::from_body([Cell::center()], Direction::Right, now, move_interval)
    }

    /// A snake with an explicit body, head first.
    pub fn from_body(
        body: impl IntoIterator<Item = Cell>,
        direction: Direction,
        now: f64,
        move_interval: f64,
    ) -> Self {
        let body: VecDeque<Cell> = body.into_iter().collect();
        assert!(!body.is_empty(), "snake needs at least a head");
        Self {
            body,
            direction,
            pending: None,
            grow: false,
            dead: false,
            shield: false,
            speed_multiplier: 1.0,
            score_multiplier: 1,
            move_interval,
            last_move_at: now,
        }
    }

    pub fn head(&self) -> Cell {
        self.body[0]
    }

    pub fn body(&self) -> impl ExactSizeIterator<Item = &Cell> {
        self.body.iter()
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn occupies(&self, cell: Cell) -> bool {
        self.body.contains(&cell)
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn pending_direction(&self) -> Option<Direction> {
        self.pending
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }

    pub fn has_shield(&self) -> bool {
        self.shield
    }

    pub fn set_shield(&mut self, on: bool) {
        self.shield = on;
    }

    pub fn speed_multiplier(&self) -> f64 {
        self.speed_multiplier
    }

    pub fn set_speed_multiplier(&mut self, m: f64) {
        self.speed_multiplier = m.max(1.0);
    }

    pub fn score_multiplier(&self) -> u32 {
        self.score_multiplier
    }

    pub fn set_score_multiplier(&mut self, m: u32) {
        self.score_multiplier = m.max(1);
    }

    pub fn is_growing(&self) -> bool {
        self.grow
    }

    /// The next move keeps the tail, lengthening the body by one.
    pub fn grow(&mut self) {
        self.grow = true;
    }

    /// Drops `n` tail cells when at least three cells are present.
    /// Returns whether anything was removed.
    pub fn shrink(&mut self, n: usize) -> bool {
        if self.body.len() < 3 || n >= self.body.len() {
            return false;
        }
        self.body.truncate(self.body.len() - n);
        true
    }

    /// Seconds between moves at the current speed.
    pub fn effective_interval(&self) -> f64 {
        self.move_interval / self.speed_multiplier
    }

    /// Re-bases the move timer, e.g. when leaving pause.
    pub fn resume(&mut self, now: f64) {
        self.last_move_at = now;
    }

    /// Buffers a turn unless it reverses the committed direction.
    /// A later call overwrites an unconsumed turn.
    pub fn change_direction(&mut self, dir: Direction) {
        if dir != self.direction.opposite() {
            self.pending = Some(dir);
        }
    }

    /// Moves one cell if the movement interval has elapsed since the last move.
    ///
    /// A call moves at most once: if several intervals elapsed (a slow frame)
    /// the extra ones are dropped rather than replayed.
    pub fn advance(&mut self, now: f64) -> Step {
        if self.dead {
            return Step::Dead;
        }
        if now - self.last_move_at < self.effective_interval() {
            return Step::Idle;
        }

        if let Some(next) = self.pending.take() {
            if next != self.direction.opposite() {
                self.direction = next;
            }
        }

        let mut head = self.head().step(self.direction);
        let mut wrapped = false;
        if head.is_wall() {
            if !self.shield {
                self.dead = true;
                return Step::Collided(Collision::Wall);
            }
            self.shield = false;
            head = head.wrapped();
            wrapped = true;
        }

        if self.body.contains(&head) {
            self.dead = true;
            return Step::Collided(Collision::Body);
        }

        self.body.push_front(head);
        if self.grow {
            self.grow = false;
        } else {
            self.body.pop_back();
        }
        self.last_move_at = now;

        if wrapped { Step::Wrapped } else { Step::Moved }
    }
}
