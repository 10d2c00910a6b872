//! Keyboard and controller input, folded into one logical command set.

use gilrs::{Axis, Button, EventType, GamepadId, Gilrs};
use macroquad::input::KeyCode;
use macroquad::input::utils::{register_input_subscriber, repeat_all_miniquad_input};
use macroquad::miniquad::{EventHandler, KeyMods};
use tracing::{debug, info, warn};

use crate::grid::Direction;

/// Stick deflection that counts as a press.
pub const AXIS_THRESHOLD: f32 = 0.5;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Command {
    /// Menu navigation or a turn, depending on the screen.
    Move(Direction),
    Confirm,
    Cancel,
    CycleDifficulty,
    ToggleRecord,
    Pause,
    Quit,
}

/// Which key layout applies: `D` cycles difficulty in menus but steers in play.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum InputContext {
    Menu,
    Play,
}

pub fn command_for_key(key: KeyCode, context: InputContext) -> Option<Command> {
    let command = match key {
        KeyCode::Up | KeyCode::W => Command::Move(Direction::Up),
        KeyCode::Down | KeyCode::S => Command::Move(Direction::Down),
        KeyCode::Left | KeyCode::A => Command::Move(Direction::Left),
        KeyCode::Right => Command::Move(Direction::Right),
        KeyCode::D => match context {
            InputContext::Menu => Command::CycleDifficulty,
            InputContext::Play => Command::Move(Direction::Right),
        },
        KeyCode::Enter | KeyCode::KpEnter | KeyCode::Space => Command::Confirm,
        KeyCode::Escape => Command::Cancel,
        KeyCode::R if context == InputContext::Play => Command::ToggleRecord,
        KeyCode::P if context == InputContext::Play => Command::Pause,
        _ => return None,
    };
    Some(command)
}

/// Maps keys in press order, so a later turn in the same frame overwrites
/// an earlier one once it reaches the snake's turn buffer.
pub fn commands_for_keys(keys: &[KeyCode], context: InputContext) -> Vec<Command> {
    keys.iter().filter_map(|&key| command_for_key(key, context)).collect()
}

/// Collects key-down events in arrival order; auto-repeat is dropped.
struct KeyLog<'a>(&'a mut Vec<KeyCode>);

impl EventHandler for KeyLog<'_> {
    fn update(&mut self) {}

    fn draw(&mut self) {}

    fn key_down_event(&mut self, keycode: KeyCode, _keymods: KeyMods, repeat: bool) {
        if !repeat {
            self.0.push(keycode);
        }
    }
}

/// Keyboard reader that keeps the order keys were pressed in.
pub struct Keyboard {
    subscriber: usize,
}

impl Keyboard {
    pub fn new() -> Self {
        Self {
            subscriber: register_input_subscriber(),
        }
    }

    /// Commands for every key pressed since the last poll, oldest first.
    pub fn poll(&mut self, context: InputContext) -> Vec<Command> {
        let mut keys = Vec::new();
        repeat_all_miniquad_input(&mut KeyLog(&mut keys), self.subscriber);
        commands_for_keys(&keys, context)
    }
}

impl Default for Keyboard {
    fn default() -> Self {
        Self::new()
    }
}

/// Turns a continuous axis into one press per excursion past the threshold.
#[derive(Debug, Default, Clone, Copy)]
pub struct AxisLatch {
    held: Option<bool>,
}

impl AxisLatch {
    /// Returns `Some(true)` on crossing +threshold, `Some(false)` on crossing
    /// -threshold, `None` otherwise.
    pub fn update(&mut self, value: f32) -> Option<bool> {
        let now = if value > AXIS_THRESHOLD {
            Some(true)
        } else if value < -AXIS_THRESHOLD {
            Some(false)
        } else {
            None
        };
        let fired = if now != self.held { now } else { None };
        self.held = now;
        fired
    }
}

fn button_command(button: Button, context: InputContext) -> Option<Command> {
    match button {
        Button::South => Some(match context {
            InputContext::Menu => Command::Confirm,
            InputContext::Play => Command::Pause,
        }),
        Button::East => Some(Command::Cancel),
        Button::Start => Some(Command::Pause).filter(|_| context == InputContext::Play),
        Button::DPadUp => Some(Command::Move(Direction::Up)),
        Button::DPadDown => Some(Command::Move(Direction::Down)),
        Button::DPadLeft => Some(Command::Move(Direction::Left)),
        Button::DPadRight => Some(Command::Move(Direction::Right)),
        _ => None,
    }
}

/// The first connected gamepad, read through gilrs.
pub struct Controller {
    gilrs: Option<Gilrs>,
    active: Option<GamepadId>,
    x: AxisLatch,
    y: AxisLatch,
}

impl Controller {
    /// Probes for gamepads once. Failure leaves the controller path disabled
    /// for the rest of the run.
    pub fn new() -> Self {
        let gilrs = match Gilrs::new() {
            Ok(g) => Some(g),
            Err(e) => {
                warn!("Failed to initialize gamepad support: {}", e);
                None
            }
        };
        let active = gilrs
            .as_ref()
            .and_then(|g| g.gamepads().next().map(|(id, pad)| {
                info!("Using controller: {}", pad.name());
                id
            }));
        Self {
            gilrs,
            active,
            x: AxisLatch::default(),
            y: AxisLatch::default(),
        }
    }

    pub fn is_present(&self) -> bool {
        self.active.is_some()
    }

    pub fn poll(&mut self, context: InputContext) -> Vec<Command> {
        let mut commands = Vec::new();
        let Some(gilrs) = self.gilrs.as_mut() else {
            return commands;
        };
        while let Some(event) = gilrs.next_event() {
            if self.active.is_none() {
                if let EventType::Connected = event.event {
                    debug!("controller connected");
                    self.active = Some(event.id);
                }
            }
            if self.active != Some(event.id) {
                continue;
            }
            match event.event {
                EventType::ButtonPressed(button, _) => {
                    commands.extend(button_command(button, context));
                }
                EventType::AxisChanged(Axis::LeftStickX, value, _) => {
                    if let Some(positive) = self.x.update(value) {
                        let dir = if positive { Direction::Right } else { Direction::Left };
                        commands.push(Command::Move(dir));
                    }
                }
                EventType::AxisChanged(Axis::LeftStickY, value, _) => {
                    // gilrs reports stick-up as positive
                    if let Some(positive) = self.y.update(value) {
                        let dir = if positive { Direction::Up } else { Direction::Down };
                        commands.push(Command::Move(dir));
                    }
                }
                EventType::Disconnected => {
                    debug!("controller disconnected");
                    self.active = None;
                }
                _ => {}
            }
        }
        commands
    }
}

impl Default for Controller {
    fn default() -> Self {
        Self::new()
    }
}
