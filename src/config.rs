use std::path::PathBuf;

use clap::Parser;

// Display geometry (Famicom-style logical framebuffer)
pub const WINDOW_SIZE: i32 = 256;
pub const TILE_SIZE: i32 = 8;
pub const GRID_COUNT: i32 = WINDOW_SIZE / TILE_SIZE;
pub const DEFAULT_SCALE: i32 = 3;

// Simulation timing
pub const FPS: u32 = 60;
/// Timed power-up effects last 10 seconds of simulation ticks.
pub const POWER_UP_DURATION_TICKS: u32 = 10 * FPS;
/// A new power-up spawns every 15 seconds of simulation ticks.
pub const POWER_UP_SPAWN_TICKS: u32 = 15 * FPS;
pub const SPEED_BOOST: f64 = 1.5;
pub const SCORE_BOOST: u32 = 2;
pub const CURSOR_BLINK_FRAMES: u32 = 15;

// Audio
pub const SAMPLE_RATE: u32 = 44_100;
pub const DEFAULT_VOLUME: f32 = 0.5;

pub const DEFAULT_SCORES_FILE: &str = "snake_high_scores.json";
pub const DEFAULT_CAPTURE_FILE: &str = "game_audio.wav";

/// Command-line options.
#[derive(Debug, Clone, Parser)]
#[command(name = "famicom-snake", about = "Famicom-style Snake with synthesized sound")]
pub struct Cli {
    /// High-score file (JSON).
    #[arg(long, env = "SNAKE_SCORES", default_value = DEFAULT_SCORES_FILE)]
    pub scores: PathBuf,

    /// Where audio captures are written when recording stops.
    #[arg(long, default_value = DEFAULT_CAPTURE_FILE)]
    pub capture_file: PathBuf,

    /// Playback volume, 0.0 to 1.0.
    #[arg(long, default_value_t = DEFAULT_VOLUME)]
    pub volume: f32,

    /// Start with audio disabled.
    #[arg(long)]
    pub mute: bool,

    /// Seed for food and power-up placement.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Frame-rate cap.
    #[arg(long, default_value_t = FPS)]
    pub fps: u32,

    /// Debug logging.
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn volume(&self) -> f32 {
        self.volume.clamp(0.0, 1.0)
    }
}
