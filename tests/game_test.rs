use std::cell::RefCell;
use std::rc::Rc;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tempfile::tempdir;

use famicom_snake::audio::{AudioSink, HeadlessOutput};
use famicom_snake::game::{Flow, Game, Screen};
use famicom_snake::grid::{Cell, Direction};
use famicom_snake::input::{Command, InputContext, commands_for_keys};
use macroquad::input::KeyCode;
use famicom_snake::settings::{Difficulty, HighScoreStore, Settings};
use famicom_snake::snake::Snake;
use famicom_snake::synth::{Cue, SoundBank};

fn new_game(dir: &std::path::Path) -> (Game, Rc<RefCell<Vec<Cue>>>) {
    let output = HeadlessOutput::new();
    let played = output.played();
    let audio = AudioSink::new(Box::new(output), SoundBank::generate(), 0.5);
    let game = Game::new(
        Settings::new(0.5, false),
        HighScoreStore::load(dir.join("snake_high_scores.json")),
        audio,
        StdRng::seed_from_u64(7),
        dir.join("game_audio.wav"),
    );
    (game, played)
}

#[test]
fn test_five_moves_right() {
    let dir = tempdir().unwrap();
    let (mut game, played) = new_game(dir.path());
    game.handle(Command::Confirm, 0.0);
    game.session_mut().unwrap().food = Cell::new(2, 2);
    let start = game.session().unwrap().snake.head();

    for i in 1..=5 {
        game.update(i as f64 * 0.25);
    }

    let session = game.session().unwrap();
    assert_eq!(session.snake.head(), Cell::new(start.x + 5, start.y));
    assert_eq!(session.snake.len(), 1);
    let moves = played.borrow().iter().filter(|c| **c == Cue::Move).count();
    assert_eq!(moves, 5);
}

#[test]
fn test_eat_then_grow() {
    let dir = tempdir().unwrap();
    let (mut game, played) = new_game(dir.path());
    game.handle(Command::Confirm, 0.0);
    let food = game.session().unwrap().snake.head().step(Direction::Down);
    game.session_mut().unwrap().food = food;

    game.handle(Command::Move(Direction::Down), 0.0);
    game.update(0.25);
    {
        let session = game.session().unwrap();
        assert_eq!(session.score, 1);
        assert_ne!(session.food, food);
        assert_eq!(session.snake.len(), 1);
    }
    assert_eq!(played.borrow().last(), Some(&Cue::Eat));

    game.session_mut().unwrap().food = Cell::new(2, 2);
    game.update(0.5);
    assert_eq!(game.session().unwrap().snake.len(), 2);
}

#[test]
fn test_high_score_written_for_played_difficulty_only() {
    let dir = tempdir().unwrap();
    let (mut game, _) = new_game(dir.path());
    game.handle(Command::Confirm, 0.0);
    {
        let session = game.session_mut().unwrap();
        session.score = 10;
        session.snake = Snake::from_body([Cell::new(5, 1)], Direction::Up, 0.0, 0.1);
    }
    game.update(0.5);
    assert_eq!(game.screen(), Screen::GameOver);

    let store = HighScoreStore::load(dir.path().join("snake_high_scores.json"));
    assert_eq!(store.best(Difficulty::Normal), 10);
    for d in [Difficulty::Easy, Difficulty::Hard, Difficulty::Expert] {
        assert_eq!(store.best(d), 0);
    }
}

#[test]
fn test_capture_matches_played_sounds_in_order() {
    let dir = tempdir().unwrap();
    let (mut game, _) = new_game(dir.path());
    game.handle(Command::Confirm, 0.0);
    let food = game.session().unwrap().snake.head().step(Direction::Right);
    game.session_mut().unwrap().food = food;

    game.handle(Command::ToggleRecord, 0.0);
    // one move onto the food: Move then Eat
    game.update(0.25);
    game.session_mut().unwrap().food = Cell::new(2, 2);
    game.handle(Command::ToggleRecord, 0.25);

    let mut reader = hound::WavReader::open(dir.path().join("game_audio.wav")).unwrap();
    let samples: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();

    let bank = SoundBank::generate();
    let expected: Vec<i16> = bank
        .get(Cue::Move)
        .frames()
        .iter()
        .chain(bank.get(Cue::Eat).frames())
        .flat_map(|f| f.iter().copied())
        .collect();
    assert_eq!(samples, expected);
}

#[test]
fn test_pause_resume_and_quit() {
    let dir = tempdir().unwrap();
    let (mut game, _) = new_game(dir.path());
    game.handle(Command::Confirm, 0.0);
    game.handle(Command::Pause, 0.0);
    assert_eq!(game.screen(), Screen::Paused);
    game.handle(Command::Confirm, 3.0);
    assert_eq!(game.screen(), Screen::Playing);
    assert_eq!(game.handle(Command::Quit, 3.0), Flow::Exit);
}

#[test]
fn test_last_key_of_a_frame_wins() {
    let dir = tempdir().unwrap();
    let (mut game, _) = new_game(dir.path());
    game.handle(Command::Confirm, 0.0);
    game.session_mut().unwrap().food = Cell::new(2, 2);
    let start = game.session().unwrap().snake.head();

    for command in commands_for_keys(&[KeyCode::W, KeyCode::S], InputContext::Play) {
        game.handle(command, 0.0);
    }
    game.update(0.25);
    assert_eq!(game.session().unwrap().snake.head(), start.step(Direction::Down));
}
