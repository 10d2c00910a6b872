//! Drawing into the 256x256 logical framebuffer and presenting it scaled.

use macroquad::prelude::*;

use crate::config::{FPS, TILE_SIZE, WINDOW_SIZE};
use crate::game::{Game, MenuEntry, Screen, Session, SettingsRow};
use crate::grid::Cell;
use crate::power_up::{ActiveEffect, PowerUpKind};

const fn nes(r: u8, g: u8, b: u8) -> Color {
    Color::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0)
}

// Famicom palette
pub const NES_BLACK: Color = nes(0, 0, 0);
pub const NES_GREEN: Color = nes(0, 204, 85);
pub const NES_RED: Color = nes(255, 51, 51);
pub const NES_GRAY: Color = nes(188, 188, 188);
pub const NES_BLUE: Color = nes(0, 117, 255);
pub const NES_YELLOW: Color = nes(255, 236, 39);
pub const NES_PURPLE: Color = nes(188, 0, 188);
pub const NES_CYAN: Color = nes(0, 188, 188);
pub const NES_WHITE: Color = nes(255, 255, 255);
pub const NES_ORANGE: Color = nes(255, 188, 0);

const SIZE: f32 = WINDOW_SIZE as f32;
const TILE: f32 = TILE_SIZE as f32;

pub fn power_up_color(kind: PowerUpKind) -> Color {
    match kind {
        PowerUpKind::Speed => NES_CYAN,
        PowerUpKind::Shield => NES_PURPLE,
        PowerUpKind::Score => NES_ORANGE,
        PowerUpKind::Shrink => NES_WHITE,
    }
}

/// Largest integer scale of the framebuffer that fits the window, centered.
pub fn present_rect(screen_w: f32, screen_h: f32) -> Rect {
    let scale = (screen_w.min(screen_h) / SIZE).floor().max(1.0);
    let size = SIZE * scale;
    Rect::new(
        ((screen_w - size) / 2.0).floor(),
        ((screen_h - size) / 2.0).floor(),
        size,
        size,
    )
}

/// A tile's pixel rect, shrunk by `inset` on each side.
pub fn tile_rect(cell: Cell, inset: f32) -> Rect {
    Rect::new(
        cell.x as f32 * TILE + inset,
        cell.y as f32 * TILE + inset,
        TILE - 2.0 * inset,
        TILE - 2.0 * inset,
    )
}

pub fn menu_line(entry: MenuEntry, selected: bool, show_cursor: bool) -> String {
    let marker = if selected && show_cursor { "> " } else { "  " };
    format!("{marker}{}", entry.label())
}

/// HUD tag for a running effect with its whole seconds left, rounded up.
pub fn effect_label(effect: &ActiveEffect) -> String {
    let tag = match effect.kind {
        PowerUpKind::Speed => "SPD",
        PowerUpKind::Score => "x2",
        PowerUpKind::Shield => "SHD",
        PowerUpKind::Shrink => "SHR",
    };
    format!("{tag} {}", effect.remaining().div_ceil(FPS))
}

fn fill(r: Rect, color: Color) {
    draw_rectangle(r.x, r.y, r.w, r.h, color);
}

fn text_centered(text: &str, y: f32, font_size: u16, color: Color) {
    let width = measure_text(text, None, font_size, 1.0).width;
    draw_text(text, ((SIZE - width) / 2.0).floor(), y, font_size as f32, color);
}

fn draw_border() {
    fill(Rect::new(0.0, 0.0, SIZE, TILE), NES_GRAY);
    fill(Rect::new(0.0, SIZE - TILE, SIZE, TILE), NES_GRAY);
    fill(Rect::new(0.0, 0.0, TILE, SIZE), NES_GRAY);
    fill(Rect::new(SIZE - TILE, 0.0, TILE, SIZE), NES_GRAY);
}

pub struct Renderer {
    target: RenderTarget,
    camera: Camera2D,
}

impl Renderer {
    pub fn new() -> Self {
        let target = render_target(WINDOW_SIZE as u32, WINDOW_SIZE as u32);
        target.texture.set_filter(FilterMode::Nearest);
        let mut camera = Camera2D::from_display_rect(Rect::new(0.0, 0.0, SIZE, SIZE));
        camera.render_target = Some(target.clone());
        Self { target, camera }
    }

    pub fn draw(&self, game: &Game) {
        set_camera(&self.camera);
        clear_background(NES_BLACK);
        draw_border();

        match game.screen() {
            Screen::Title => draw_title(game),
            Screen::Settings => draw_settings(game),
            Screen::Credits => draw_credits(),
            Screen::Playing => {
                if let Some(session) = game.session() {
                    draw_playfield(game, session);
                }
            }
            Screen::Paused => {
                if let Some(session) = game.session() {
                    draw_playfield(game, session);
                }
                draw_banner("PAUSED", &["P / ENTER: RESUME", "ESC: TITLE"]);
            }
            Screen::GameOver => {
                if let Some(session) = game.session() {
                    draw_playfield(game, session);
                    draw_game_over(session);
                }
            }
        }

        self.present();
    }

    fn present(&self) {
        set_default_camera();
        clear_background(NES_BLACK);
        let dest = present_rect(screen_width(), screen_height());
        draw_texture_ex(
            &self.target.texture,
            dest.x,
            dest.y,
            WHITE,
            DrawTextureParams {
                dest_size: Some(vec2(dest.w, dest.h)),
                flip_y: true,
                ..Default::default()
            },
        );
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

fn draw_title(game: &Game) {
    text_centered("FAMICOM SNAKE", 44.0, 24, NES_BLUE);

    let menu = game.menu();
    for (i, entry) in MenuEntry::ALL.iter().enumerate() {
        let selected = *entry == menu.selected();
        let color = if selected { NES_YELLOW } else { NES_GREEN };
        text_centered(&menu_line(*entry, selected, menu.show_cursor()), 100.0 + i as f32 * 30.0, 16, color);
    }

    let difficulty = game.settings().difficulty;
    text_centered(&format!("LEVEL: {}  (D)", difficulty.name()), 220.0, 12, NES_CYAN);
    text_centered(&format!("HI-SCORE: {}", game.scores().best(difficulty)), 236.0, 12, NES_ORANGE);
}

fn draw_settings(game: &Game) {
    text_centered("SETTINGS", 44.0, 24, NES_BLUE);

    let settings = game.settings();
    let rows = [
        (SettingsRow::Volume, format!("VOLUME: {:>3}%", (settings.volume * 100.0).round() as i32)),
        (SettingsRow::Difficulty, format!("LEVEL: {}", settings.difficulty.name())),
    ];
    for (i, (row, text)) in rows.iter().enumerate() {
        let color = if *row == game.settings_row() { NES_YELLOW } else { NES_GREEN };
        text_centered(text, 100.0 + i as f32 * 30.0, 16, color);
    }

    let pad = if settings.controller_present { "CONTROLLER: YES" } else { "CONTROLLER: NO" };
    text_centered(pad, 170.0, 12, NES_GRAY);
    if !game.audio().is_enabled() {
        text_centered("SOUND: OFF", 186.0, 12, NES_RED);
    }
    text_centered("LEFT/RIGHT: ADJUST", 210.0, 12, NES_GRAY);
    text_centered("ENTER/ESC: BACK", 226.0, 12, NES_GRAY);
}

fn draw_credits() {
    text_centered("CREDITS", 44.0, 24, NES_BLUE);
    let lines = [
        ("GAME DESIGN", NES_YELLOW),
        ("FAMICOM SNAKE TEAM", NES_GREEN),
        ("SOUND", NES_YELLOW),
        ("8-BIT SYNTH", NES_GREEN),
    ];
    for (i, (text, color)) in lines.iter().enumerate() {
        text_centered(text, 90.0 + i as f32 * 22.0, 14, *color);
    }
    text_centered("ENTER/ESC: BACK", 226.0, 12, NES_GRAY);
}

fn draw_playfield(game: &Game, session: &Session) {
    // food is one pixel smaller than a tile, centered
    fill(tile_rect(session.food, 0.5), NES_RED);

    for cell in session.snake.body() {
        fill(tile_rect(*cell, 1.0), NES_GREEN);
    }

    for p in session.power_ups.spawned() {
        fill(tile_rect(p.cell, 1.0), power_up_color(p.kind));
    }

    if session.snake.has_shield() {
        let r = tile_rect(session.snake.head(), 0.0);
        draw_rectangle_lines(r.x, r.y, r.w, r.h, 1.0, NES_PURPLE);
    }

    draw_hud(game, session);
}

fn draw_hud(game: &Game, session: &Session) {
    draw_text(&format!("SCORE:{}", session.score), 10.0, 18.0, 12.0, NES_YELLOW);
    let best = game.scores().best(session.difficulty);
    draw_text(&format!("HI-SCORE:{best}"), 10.0, 30.0, 12.0, NES_ORANGE);
    draw_text(&format!("LEVEL:{}", session.difficulty.name()), SIZE - 80.0, 18.0, 12.0, NES_CYAN);

    if game.is_recording() {
        draw_circle(SIZE - 74.0, 26.0, 2.5, NES_RED);
        draw_text("REC", SIZE - 68.0, 30.0, 12.0, NES_RED);
    }

    let mut x = 10.0;
    for effect in session.power_ups.effects() {
        let label = effect_label(effect);
        draw_text(&label, x, SIZE - 12.0, 12.0, power_up_color(effect.kind));
        x += measure_text(&label, None, 12, 1.0).width + 8.0;
    }
}

fn draw_banner(title: &str, hints: &[&str]) {
    fill(Rect::new(TILE * 4.0, 88.0, SIZE - TILE * 8.0, 80.0), NES_BLACK);
    draw_rectangle_lines(TILE * 4.0, 88.0, SIZE - TILE * 8.0, 80.0, 1.0, NES_GRAY);
    text_centered(title, 114.0, 24, NES_YELLOW);
    for (i, hint) in hints.iter().enumerate() {
        text_centered(hint, 136.0 + i as f32 * 14.0, 12, NES_WHITE);
    }
}

fn draw_game_over(session: &Session) {
    draw_banner("GAME OVER", &["ENTER: RETRY", "ESC: TITLE"]);
    text_centered(&format!("SCORE {}", session.score), 184.0, 14, NES_YELLOW);
    if session.is_new_best() {
        text_centered("NEW HI-SCORE!", 200.0, 14, NES_ORANGE);
    }
}
