//! Famicom-style Snake: simulation, synthesized sound, menus and high scores.

pub mod audio;
pub mod config;
pub mod error;
pub mod frame;
pub mod game;
pub mod grid;
pub mod input;
pub mod logging;
pub mod power_up;
pub mod render;
pub mod settings;
pub mod snake;
pub mod synth;
