//! Power-up spawning, collection and timed effects.

use rand::Rng;
use tracing::debug;

use crate::config::{POWER_UP_DURATION_TICKS, POWER_UP_SPAWN_TICKS, SCORE_BOOST, SPEED_BOOST};
use crate::grid::{Cell, random_interior_cell};
use crate::snake::Snake;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum PowerUpKind {
    /// Temporary speed boost
    Speed,
    /// One wall hit forgiven
    Shield,
    /// Temporary double points
    Score,
    /// Lose two tail cells
    Shrink,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 4] = [
        PowerUpKind::Speed,
        PowerUpKind::Shield,
        PowerUpKind::Score,
        PowerUpKind::Shrink,
    ];

    /// Whether the effect runs on a timer and reverts when it expires.
    pub fn is_timed(self) -> bool {
        match self {
            PowerUpKind::Speed | PowerUpKind::Score => true,
            PowerUpKind::Shield | PowerUpKind::Shrink => false,
        }
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }
}

/// A collectible lying on the playfield.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PowerUp {
    pub cell: Cell,
    pub kind: PowerUpKind,
}

/// A timed effect currently applied to the snake.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ActiveEffect {
    pub kind: PowerUpKind,
    pub elapsed: u32,
}

impl ActiveEffect {
    pub fn remaining(&self) -> u32 {
        POWER_UP_DURATION_TICKS.saturating_sub(self.elapsed)
    }
}

#[derive(Debug, Clone, Default)]
pub struct PowerUpManager {
    spawned: Vec<PowerUp>,
    effects: Vec<ActiveEffect>,
    spawn_timer: u32,
}

impl PowerUpManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawned(&self) -> &[PowerUp] {
        &self.spawned
    }

    pub fn effects(&self) -> &[ActiveEffect] {
        &self.effects
    }

    pub fn occupies(&self, cell: Cell) -> bool {
        self.spawned.iter().any(|p| p.cell == cell)
    }

    /// Counts one tick towards each timed effect and reverts the ones that
    /// have run their full duration. Returns the kinds that expired.
    pub fn tick_effects(&mut self, snake: &mut Snake) -> Vec<PowerUpKind> {
        let mut expired = Vec::new();
        self.effects.retain_mut(|effect| {
            effect.elapsed += 1;
            if effect.elapsed < POWER_UP_DURATION_TICKS {
                return true;
            }
            revert(effect.kind, snake);
            expired.push(effect.kind);
            false
        });
        for kind in &expired {
            debug!(?kind, "power-up expired");
        }
        expired
    }

    /// Advances the spawn timer; on reaching the threshold places a random
    /// power-up on a free interior cell and restarts the timer.
    pub fn tick_spawn<R: Rng + ?Sized>(&mut self, rng: &mut R, snake: &Snake, food: Cell) -> Option<PowerUp> {
        self.spawn_timer += 1;
        if self.spawn_timer < POWER_UP_SPAWN_TICKS {
            return None;
        }
        self.spawn_timer = 0;
        let power_up = self.spawn(rng, snake, food);
        Some(power_up)
    }

    pub fn spawn<R: Rng + ?Sized>(&mut self, rng: &mut R, snake: &Snake, food: Cell) -> PowerUp {
        let cell = random_interior_cell(rng, |c| c != food && !snake.occupies(c) && !self.occupies(c));
        let power_up = PowerUp {
            cell,
            kind: PowerUpKind::random(rng),
        };
        debug!(kind = ?power_up.kind, x = cell.x, y = cell.y, "power-up spawned");
        self.spawned.push(power_up);
        power_up
    }

    /// Applies and removes every power-up under the snake's head.
    pub fn collect(&mut self, snake: &mut Snake) -> Vec<PowerUpKind> {
        let head = snake.head();
        let mut collected = Vec::new();
        self.spawned.retain(|p| {
            if p.cell == head {
                collected.push(p.kind);
                false
            } else {
                true
            }
        });
        for &kind in &collected {
            self.apply(kind, snake);
        }
        collected
    }

    /// Puts a power-up's effect on the snake. Timed kinds start (or restart)
    /// their effect timer.
    pub fn apply(&mut self, kind: PowerUpKind, snake: &mut Snake) {
        debug!(?kind, "power-up applied");
        match kind {
            PowerUpKind::Speed => snake.set_speed_multiplier(SPEED_BOOST),
            PowerUpKind::Shield => snake.set_shield(true),
            PowerUpKind::Score => snake.set_score_multiplier(SCORE_BOOST),
            PowerUpKind::Shrink => {
                snake.shrink(2);
            }
        }
        if kind.is_timed() {
            match self.effects.iter_mut().find(|e| e.kind == kind) {
                Some(effect) => effect.elapsed = 0,
                None => self.effects.push(ActiveEffect { kind, elapsed: 0 }),
            }
        }
    }
}

fn revert(kind: PowerUpKind, snake: &mut Snake) {
    match kind {
        PowerUpKind::Speed => snake.set_speed_multiplier(1.0),
        PowerUpKind::Score => snake.set_score_multiplier(1),
        PowerUpKind::Shield | PowerUpKind::Shrink => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Direction;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn snake_at(cells: &[Cell]) -> Snake {
        Snake::from_body(cells.iter().copied(), Direction::Right, 0.0, 0.1)
    }

    #[test]
    fn speed_reverts_after_exact_duration() {
        let mut snake = Snake::new(0.0, 0.1);
        let mut manager = PowerUpManager::new();
        manager.apply(PowerUpKind::Speed, &mut snake);
        assert_eq!(snake.speed_multiplier(), SPEED_BOOST);

        for _ in 0..POWER_UP_DURATION_TICKS - 1 {
            assert!(manager.tick_effects(&mut snake).is_empty());
            assert_eq!(snake.speed_multiplier(), SPEED_BOOST);
        }
        assert_eq!(manager.tick_effects(&mut snake), vec![PowerUpKind::Speed]);
        assert_eq!(snake.speed_multiplier(), 1.0);
        assert!(manager.effects().is_empty());

        // reverts only once
        for _ in 0..10 {
            assert!(manager.tick_effects(&mut snake).is_empty());
        }
    }

    #[test]
    fn score_reverts_after_exact_duration() {
        let mut snake = Snake::new(0.0, 0.1);
        let mut manager = PowerUpManager::new();
        manager.apply(PowerUpKind::Score, &mut snake);
        assert_eq!(snake.score_multiplier(), 2);
        for _ in 0..POWER_UP_DURATION_TICKS - 1 {
            manager.tick_effects(&mut snake);
        }
        assert_eq!(snake.score_multiplier(), 2);
        manager.tick_effects(&mut snake);
        assert_eq!(snake.score_multiplier(), 1);
    }

    #[test]
    fn recollecting_restarts_timer() {
        let mut snake = Snake::new(0.0, 0.1);
        let mut manager = PowerUpManager::new();
        manager.apply(PowerUpKind::Speed, &mut snake);
        for _ in 0..100 {
            manager.tick_effects(&mut snake);
        }
        manager.apply(PowerUpKind::Speed, &mut snake);
        assert_eq!(manager.effects().len(), 1);
        assert_eq!(manager.effects()[0].remaining(), POWER_UP_DURATION_TICKS);
        for _ in 0..POWER_UP_DURATION_TICKS - 1 {
            manager.tick_effects(&mut snake);
        }
        assert_eq!(snake.speed_multiplier(), SPEED_BOOST);
    }

    #[test]
    fn shield_and_shrink_are_untimed() {
        let mut snake = snake_at(&[Cell::new(10, 5), Cell::new(9, 5), Cell::new(8, 5), Cell::new(7, 5)]);
        let mut manager = PowerUpManager::new();
        manager.apply(PowerUpKind::Shield, &mut snake);
        manager.apply(PowerUpKind::Shrink, &mut snake);
        assert!(snake.has_shield());
        assert_eq!(snake.len(), 2);
        assert!(manager.effects().is_empty());
    }

    #[test]
    fn shrink_on_short_snake_is_noop() {
        let mut snake = snake_at(&[Cell::new(10, 5), Cell::new(9, 5)]);
        PowerUpManager::new().apply(PowerUpKind::Shrink, &mut snake);
        assert_eq!(snake.len(), 2);
    }

    #[test]
    fn spawns_on_schedule_on_free_cells() {
        let mut rng = StdRng::seed_from_u64(11);
        let snake = snake_at(&[Cell::new(10, 5), Cell::new(9, 5)]);
        let food = Cell::new(3, 3);
        let mut manager = PowerUpManager::new();
        for _ in 0..POWER_UP_SPAWN_TICKS - 1 {
            assert!(manager.tick_spawn(&mut rng, &snake, food).is_none());
        }
        let p = manager.tick_spawn(&mut rng, &snake, food).unwrap();
        assert!(!p.cell.is_wall());
        assert_ne!(p.cell, food);
        assert!(!snake.occupies(p.cell));
        assert_eq!(manager.spawned(), &[p]);

        // timer restarted
        for _ in 0..POWER_UP_SPAWN_TICKS - 1 {
            assert!(manager.tick_spawn(&mut rng, &snake, food).is_none());
        }
        assert!(manager.tick_spawn(&mut rng, &snake, food).is_some());
        assert_eq!(manager.spawned().len(), 2);
    }

    #[test]
    fn spawned_cells_avoid_everything() {
        let mut rng = StdRng::seed_from_u64(5);
        let snake = snake_at(&[Cell::new(10, 5), Cell::new(9, 5), Cell::new(8, 5)]);
        let food = Cell::new(20, 20);
        let mut manager = PowerUpManager::new();
        for _ in 0..200 {
            manager.spawn(&mut rng, &snake, food);
        }
        let cells: std::collections::HashSet<Cell> = manager.spawned().iter().map(|p| p.cell).collect();
        assert_eq!(cells.len(), 200);
        assert!(!cells.contains(&food));
        assert!(snake.body().all(|c| !cells.contains(c)));
    }

    #[test]
    fn collection_applies_and_removes() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut snake = snake_at(&[Cell::new(10, 5)]);
        let mut manager = PowerUpManager::new();
        manager.spawned.push(PowerUp {
            cell: Cell::new(11, 5),
            kind: PowerUpKind::Score,
        });
        let far = manager.spawn(&mut rng, &snake, Cell::new(1, 1));

        assert!(manager.collect(&mut snake).is_empty());
        snake.advance(1.0);
        assert_eq!(manager.collect(&mut snake), vec![PowerUpKind::Score]);
        assert_eq!(snake.score_multiplier(), 2);
        assert_eq!(manager.spawned(), &[far]);
        assert_eq!(manager.effects().len(), 1);
    }
}
