use anyhow::Result;
use clap::Parser;
use macroquad::prelude::*;
use ::rand::SeedableRng;
use ::rand::rngs::StdRng;
use tracing::{debug, error, info, warn};

use famicom_snake::audio::{AudioSink, MacroquadOutput};
use famicom_snake::config::{Cli, DEFAULT_SCALE, WINDOW_SIZE};
use famicom_snake::frame::FramePacer;
use famicom_snake::game::{Flow, Game};
use famicom_snake::input::{Command, Controller, Keyboard};
use famicom_snake::logging::init_logging;
use famicom_snake::render::Renderer;
use famicom_snake::settings::{HighScoreStore, Settings};
use famicom_snake::synth::SoundBank;

fn window_conf() -> Conf {
    Conf {
        window_title: "Famicom Snake".to_owned(),
        window_width: WINDOW_SIZE * DEFAULT_SCALE,
        window_height: WINDOW_SIZE * DEFAULT_SCALE,
        window_resizable: true,
        ..Default::default()
    }
}

/// Exits with status 1 when dropped during a panic. Declared before the game
/// so the game's own drop (which flushes a pending capture) runs first.
struct ExitOnPanic;

impl Drop for ExitOnPanic {
    fn drop(&mut self) {
        if std::thread::panicking() {
            std::process::exit(1);
        }
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    std::panic::set_hook(Box::new(|info| {
        error!("{info}");
        eprintln!("famicom-snake: {info}");
    }));

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        error!("{e:#}");
        eprintln!("famicom-snake: {e:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let _exit_on_panic = ExitOnPanic;
    init_logging(cli.verbose)?;
    prevent_quit();

    let bank = SoundBank::generate();
    let audio = if cli.mute {
        info!("Audio muted");
        AudioSink::silent(bank)
    } else {
        let output = MacroquadOutput::load(&bank).await;
        match output {
            Ok(output) => AudioSink::new(Box::new(output), bank, cli.volume()),
            Err(e) => {
                warn!("Audio initialization failed: {e}");
                AudioSink::silent(bank)
            }
        }
    };

    let mut controller = Controller::new();
    let settings = Settings::new(cli.volume(), controller.is_present());
    let scores = HighScoreStore::load(&cli.scores);
    info!(path = %scores.path().display(), "high scores loaded");
    let rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut game = Game::new(settings, scores, audio, rng, cli.capture_file.clone());
    let renderer = Renderer::new();
    let mut pacer = FramePacer::new(cli.fps);
    debug!(budget_ms = pacer.budget().as_secs_f64() * 1000.0, "frame budget");
    let mut keyboard = Keyboard::new();

    loop {
        let now = pacer.begin_frame();

        let context = game.input_context();
        let mut commands = keyboard.poll(context);
        commands.extend(controller.poll(context));
        if is_quit_requested() {
            commands.push(Command::Quit);
        }

        let mut flow = Flow::Continue;
        for command in commands {
            if game.handle(command, now) == Flow::Exit {
                flow = Flow::Exit;
                break;
            }
        }
        if flow == Flow::Exit {
            break;
        }

        game.update(now);
        renderer.draw(&game);

        next_frame().await;
        pacer.wait();
    }

    game.shutdown();
    info!("Bye");
    Ok(())
}
