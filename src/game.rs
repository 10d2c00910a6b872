//! Top-level game controller: screens, the play session and its per-tick update.

use std::path::PathBuf;

use rand::Rng;
use rand::rngs::StdRng;
use tracing::{debug, info, warn};

use crate::audio::AudioSink;
use crate::config::CURSOR_BLINK_FRAMES;
use crate::grid::{Cell, Direction, random_interior_cell};
use crate::input::{Command, InputContext};
use crate::power_up::PowerUpManager;
use crate::settings::{Difficulty, HighScoreStore, Settings};
use crate::snake::{Snake, Step};
use crate::synth::Cue;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Screen {
    Title,
    Playing,
    Paused,
    Settings,
    Credits,
    GameOver,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MenuEntry {
    StartGame,
    Settings,
    Credits,
    Exit,
}

impl MenuEntry {
    pub const ALL: [MenuEntry; 4] = [
        MenuEntry::StartGame,
        MenuEntry::Settings,
        MenuEntry::Credits,
        MenuEntry::Exit,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MenuEntry::StartGame => "Start Game",
            MenuEntry::Settings => "Settings",
            MenuEntry::Credits => "Credits",
            MenuEntry::Exit => "Exit",
        }
    }
}

#[derive(Debug, Clone)]
pub struct TitleMenu {
    selected: usize,
    blink_timer: u32,
    show_cursor: bool,
}

impl Default for TitleMenu {
    fn default() -> Self {
        Self {
            selected: 0,
            blink_timer: 0,
            show_cursor: true,
        }
    }
}

impl TitleMenu {
    pub fn selected(&self) -> MenuEntry {
        MenuEntry::ALL[self.selected]
    }

    pub fn show_cursor(&self) -> bool {
        self.show_cursor
    }

    fn step(&mut self, forward: bool) {
        let n = MenuEntry::ALL.len();
        self.selected = if forward {
            (self.selected + 1) % n
        } else {
            (self.selected + n - 1) % n
        };
    }

    fn blink(&mut self) {
        self.blink_timer += 1;
        if self.blink_timer >= CURSOR_BLINK_FRAMES {
            self.show_cursor = !self.show_cursor;
            self.blink_timer = 0;
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SettingsRow {
    Volume,
    Difficulty,
}

/// Everything that lives for one game, from start to game over.
#[derive(Debug, Clone)]
pub struct Session {
    pub snake: Snake,
    pub food: Cell,
    pub score: u32,
    pub power_ups: PowerUpManager,
    pub difficulty: Difficulty,
    best_recorded: bool,
    new_best: bool,
}

impl Session {
    fn new(now: f64, difficulty: Difficulty, rng: &mut StdRng) -> Self {
        let snake = Snake::new(now, difficulty.move_interval());
        let power_ups = PowerUpManager::new();
        let food = place_food(rng, &snake, &power_ups);
        Self {
            snake,
            food,
            score: 0,
            power_ups,
            difficulty,
            best_recorded: false,
            new_best: false,
        }
    }

    /// Whether this game set a new best for its difficulty.
    pub fn is_new_best(&self) -> bool {
        self.new_best
    }

    fn relocate_food(&mut self, rng: &mut StdRng) {
        self.food = place_food(rng, &self.snake, &self.power_ups);
    }
}

/// A random interior cell that is neither under the snake nor under a power-up.
pub fn place_food<R: Rng + ?Sized>(rng: &mut R, snake: &Snake, power_ups: &PowerUpManager) -> Cell {
    random_interior_cell(rng, |c| !snake.occupies(c) && !power_ups.occupies(c))
}

/// Whether the frame loop should keep going.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

pub struct Game {
    screen: Screen,
    settings: Settings,
    scores: HighScoreStore,
    menu: TitleMenu,
    settings_row: SettingsRow,
    session: Option<Session>,
    audio: AudioSink,
    rng: StdRng,
    capture_path: PathBuf,
}

impl Game {
    pub fn new(
        settings: Settings,
        scores: HighScoreStore,
        mut audio: AudioSink,
        rng: StdRng,
        capture_path: PathBuf,
    ) -> Self {
        audio.set_volume(settings.volume);
        Self {
            screen: Screen::Title,
            settings,
            scores,
            menu: TitleMenu::default(),
            settings_row: SettingsRow::Volume,
            session: None,
            audio,
            rng,
            capture_path,
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn scores(&self) -> &HighScoreStore {
        &self.scores
    }

    pub fn menu(&self) -> &TitleMenu {
        &self.menu
    }

    pub fn settings_row(&self) -> SettingsRow {
        self.settings_row
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn session_mut(&mut self) -> Option<&mut Session> {
        self.session.as_mut()
    }

    pub fn audio(&self) -> &AudioSink {
        &self.audio
    }

    pub fn is_recording(&self) -> bool {
        self.audio.is_capturing()
    }

    pub fn input_context(&self) -> InputContext {
        match self.screen {
            Screen::Playing | Screen::Paused => InputContext::Play,
            Screen::Title | Screen::Settings | Screen::Credits | Screen::GameOver => InputContext::Menu,
        }
    }

    fn cue(&mut self, cue: Cue) {
        // failures are already logged by the sink
        let _ = self.audio.play(cue);
    }

    /// Reacts to one input command.
    pub fn handle(&mut self, command: Command, now: f64) -> Flow {
        if command == Command::Quit {
            return Flow::Exit;
        }
        match self.screen {
            Screen::Title => return self.handle_title(command, now),
            Screen::Playing => self.handle_playing(command),
            Screen::Paused => self.handle_paused(command, now),
            Screen::Settings => self.handle_settings(command),
            Screen::Credits => {
                if matches!(command, Command::Confirm | Command::Cancel) {
                    self.screen = Screen::Title;
                }
            }
            Screen::GameOver => match command {
                Command::Confirm => self.start_new_game(now),
                Command::Cancel => self.to_title(),
                _ => {}
            },
        }
        Flow::Continue
    }

    fn handle_title(&mut self, command: Command, now: f64) -> Flow {
        match command {
            Command::Move(Direction::Up) => {
                self.menu.step(false);
                self.cue(Cue::Move);
            }
            Command::Move(Direction::Down) => {
                self.menu.step(true);
                self.cue(Cue::Move);
            }
            Command::CycleDifficulty => {
                self.settings.cycle_difficulty();
                debug!(difficulty = self.settings.difficulty.name(), "difficulty changed");
                self.cue(Cue::Move);
            }
            Command::Confirm => {
                // a new game's jingle goes out before the confirm blip
                let flow = self.activate(self.menu.selected(), now);
                self.cue(Cue::Eat);
                return flow;
            }
            _ => {}
        }
        Flow::Continue
    }

    fn activate(&mut self, entry: MenuEntry, now: f64) -> Flow {
        match entry {
            MenuEntry::StartGame => self.start_new_game(now),
            MenuEntry::Settings => {
                self.settings_row = SettingsRow::Volume;
                self.screen = Screen::Settings;
            }
            MenuEntry::Credits => self.screen = Screen::Credits,
            MenuEntry::Exit => return Flow::Exit,
        }
        Flow::Continue
    }

    fn handle_playing(&mut self, command: Command) {
        match command {
            Command::Move(dir) => {
                if let Some(session) = self.session.as_mut() {
                    session.snake.change_direction(dir);
                }
            }
            Command::Cancel => self.to_title(),
            Command::Pause => self.screen = Screen::Paused,
            Command::ToggleRecord => self.toggle_recording(),
            Command::Confirm | Command::CycleDifficulty | Command::Quit => {}
        }
    }

    fn handle_paused(&mut self, command: Command, now: f64) {
        match command {
            Command::Pause | Command::Confirm => {
                if let Some(session) = self.session.as_mut() {
                    session.snake.resume(now);
                }
                self.screen = Screen::Playing;
            }
            Command::Cancel => self.to_title(),
            _ => {}
        }
    }

    fn handle_settings(&mut self, command: Command) {
        match command {
            Command::Move(Direction::Up | Direction::Down) => {
                self.settings_row = match self.settings_row {
                    SettingsRow::Volume => SettingsRow::Difficulty,
                    SettingsRow::Difficulty => SettingsRow::Volume,
                };
                self.cue(Cue::Move);
            }
            Command::Move(dir @ (Direction::Left | Direction::Right)) => {
                let forward = dir == Direction::Right;
                match self.settings_row {
                    SettingsRow::Volume => {
                        self.settings.adjust_volume(if forward { 0.1 } else { -0.1 });
                        self.audio.set_volume(self.settings.volume);
                    }
                    SettingsRow::Difficulty => {
                        let d = self.settings.difficulty;
                        self.settings.difficulty = if forward { d.next() } else { d.prev() };
                    }
                }
                self.cue(Cue::Move);
            }
            Command::CycleDifficulty => {
                self.settings.cycle_difficulty();
                self.cue(Cue::Move);
            }
            Command::Confirm | Command::Cancel => self.screen = Screen::Title,
            _ => {}
        }
    }

    fn start_new_game(&mut self, now: f64) {
        info!(difficulty = self.settings.difficulty.name(), "game start");
        self.session = Some(Session::new(now, self.settings.difficulty, &mut self.rng));
        self.screen = Screen::Playing;
        self.cue(Cue::Title);
    }

    fn to_title(&mut self) {
        self.session = None;
        self.screen = Screen::Title;
    }

    fn toggle_recording(&mut self) {
        if !self.audio.is_capturing() {
            self.audio.start_capture();
            return;
        }
        if let Ok(frames) = self.audio.stop_capture(&self.capture_path) {
            if frames > 0 {
                info!(frames, "file saved");
            }
        }
    }

    /// Once-per-frame update.
    pub fn update(&mut self, now: f64) {
        match self.screen {
            Screen::Title => self.menu.blink(),
            Screen::Playing => self.tick(now),
            Screen::Paused | Screen::Settings | Screen::Credits | Screen::GameOver => {}
        }
    }

    /// One simulation tick of the play session.
    fn tick(&mut self, now: f64) {
        let Some(session) = self.session.as_mut() else {
            return;
        };

        session.power_ups.tick_effects(&mut session.snake);
        session.power_ups.tick_spawn(&mut self.rng, &session.snake, session.food);

        match session.snake.advance(now) {
            Step::Idle => {}
            Step::Moved | Step::Wrapped => {
                let _ = self.audio.play(Cue::Move);
            }
            Step::Collided(collision) => {
                debug!(?collision, score = session.score, "snake died");
                let _ = self.audio.play(Cue::GameOver);
                self.game_over();
                return;
            }
            Step::Dead => {
                self.game_over();
                return;
            }
        }

        session.power_ups.collect(&mut session.snake);

        if session.snake.head() == session.food {
            let _ = self.audio.play(Cue::Eat);
            session.snake.grow();
            session.score += session.snake.score_multiplier();
            session.relocate_food(&mut self.rng);
        }
    }

    fn game_over(&mut self) {
        self.screen = Screen::GameOver;
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if session.best_recorded {
            return;
        }
        session.best_recorded = true;
        match self.scores.record(session.difficulty, session.score) {
            Ok(new_best) => session.new_best = new_best,
            Err(e) => {
                // kept in memory; the store already logged the failure
                warn!("high score not saved: {e}");
                session.new_best = true;
            }
        }
    }

    /// Flushes a pending capture before the process goes away.
    pub fn shutdown(&mut self) {
        if self.audio.is_capturing() {
            let _ = self.audio.stop_capture(&self.capture_path);
        }
    }
}

impl Drop for Game {
    // also runs while unwinding from a panic in the frame loop
    fn drop(&mut self) {
        self.shutdown();
    }
}
