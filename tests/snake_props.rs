use std::collections::HashSet;

use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

use famicom_snake::config::GRID_COUNT;
use famicom_snake::game::place_food;
use famicom_snake::grid::{Cell, Direction};
use famicom_snake::power_up::PowerUpManager;
use famicom_snake::snake::{Snake, Step};

fn direction() -> impl Strategy<Value = Direction> {
    prop_oneof![
        Just(Direction::Up),
        Just(Direction::Down),
        Just(Direction::Left),
        Just(Direction::Right),
    ]
}

proptest! {
    #[test]
    fn test_body_cells_stay_unique(turns in prop::collection::vec((direction(), any::<bool>()), 1..200)) {
        let mut snake = Snake::new(0.0, 0.1);
        for (i, (dir, grow)) in turns.into_iter().enumerate() {
            snake.change_direction(dir);
            if grow {
                snake.grow();
            }
            let step = snake.advance((i + 1) as f64 * 0.25);
            if !step.is_alive() {
                break;
            }
            let cells: HashSet<Cell> = snake.body().copied().collect();
            prop_assert_eq!(cells.len(), snake.len());
            prop_assert!(snake.body().all(|c| !c.is_wall()));
        }
    }

    #[test]
    fn test_reverse_never_commits(dir in direction()) {
        let mut snake = Snake::from_body([Cell::new(10, 10)], dir, 0.0, 0.1);
        snake.change_direction(dir.opposite());
        prop_assert_eq!(snake.advance(1.0), Step::Moved);
        prop_assert_eq!(snake.direction(), dir);
    }

    #[test]
    fn test_shield_absorbs_exactly_one_wall(y in 1..GRID_COUNT - 1) {
        let mut snake = Snake::from_body([Cell::new(GRID_COUNT - 2, y)], Direction::Right, 0.0, 0.1);
        snake.set_shield(true);
        prop_assert_eq!(snake.advance(1.0), Step::Wrapped);
        prop_assert_eq!(snake.head(), Cell::new(1, y));
        prop_assert!(!snake.has_shield());

        snake.change_direction(Direction::Left);
        // facing right, so the reverse is dropped and the snake keeps going
        prop_assert_eq!(snake.advance(2.0), Step::Moved);

        let mut edge = Snake::from_body([Cell::new(1, y)], Direction::Left, 0.0, 0.1);
        prop_assert!(matches!(edge.advance(1.0), Step::Collided(_)));
    }

    #[test]
    fn test_food_never_lands_on_snake(seed in any::<u64>(), len in 1usize..800, power_ups in 0usize..8) {
        let mut rng = StdRng::seed_from_u64(seed);
        // fill interior rows from the top, leaving at least 100 cells free
        let body: Vec<Cell> = (0..len as i32).map(|i| Cell::new(1 + i % 30, 1 + i / 30)).collect();
        let snake = Snake::from_body(body, Direction::Right, 0.0, 0.1);
        let mut manager = PowerUpManager::new();
        for _ in 0..power_ups {
            manager.spawn(&mut rng, &snake, Cell::new(30, 30));
        }

        let food = place_food(&mut rng, &snake, &manager);
        prop_assert!(!snake.occupies(food));
        prop_assert!(!manager.occupies(food));
        prop_assert!(!food.is_wall());
    }
}
