//! Rendering layer.
//!
//! Draw dispatch works against the `Surface` trait in canvas pixels; the
//! terminal implementation scales canvas coordinates onto character cells.
//! No game logic is performed here; state is only translated into draw calls.
//!
//! Every visual element asks the asset catalog for its sprite and falls back
//! to a fixed placeholder (glyph, filled box or outline) when the sprite is
//! still pending or failed to load.

use std::io::{self, Write};

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal, QueueableCommand,
};

use crate::assets::{AssetCatalog, ImageKey, Sprite};
use crate::config::CanvasConfig;
use crate::entities::{Bullet, GameState, PowerUpKind, Rect};

// ── Colour palette ────────────────────────────────────────────────────────────

pub const C_BACKGROUND: Color = Color::Black;
pub const C_BACKGROUND_ART: Color = Color::DarkBlue;
pub const C_PLAYER: Color = Color::Green;
pub const C_DRONE: Color = Color::Red;
pub const C_BOSS: Color = Color::Magenta;
pub const C_BULLET_PLAYER: Color = Color::Cyan;
pub const C_BULLET_ENEMY: Color = Color::Rgb {
    r: 255,
    g: 165,
    b: 0,
};
pub const C_SHIELD: Color = Color::Cyan;
pub const C_BOMB: Color = Color::Yellow;
pub const C_EXPLOSION: Color = Color::Yellow;
pub const C_HUD: Color = Color::White;
pub const C_HINT: Color = Color::DarkGrey;
pub const C_GAME_OVER: Color = Color::Red;
pub const C_SCORE: Color = Color::Yellow;

pub const CONTROLS_HINT: &str = "[Enter] Start   [P] Pause   [Q] Quit";
pub const KEYS_HINT: &str = "↑↓ / W S : Move   SPACE : Fire   B : Bomb   P : Pause   Q : Quit";

// ── Surface ───────────────────────────────────────────────────────────────────

/// A fixed-size 2D drawing target addressed in canvas pixels.
pub trait Surface {
    fn canvas(&self) -> CanvasConfig;
    fn clear(&mut self, color: Color) -> io::Result<()>;
    fn fill_rect(&mut self, rect: Rect, color: Color) -> io::Result<()>;
    fn outline_rect(&mut self, rect: Rect, color: Color) -> io::Result<()>;
    /// Text centred inside `rect`.
    fn glyph(&mut self, rect: Rect, text: &str, color: Color) -> io::Result<()>;
    /// Text anchored at its top-left corner.
    fn text(&mut self, x: f32, y: f32, text: &str, color: Color) -> io::Result<()>;
    fn sprite(&mut self, rect: Rect, sprite: &Sprite, color: Color) -> io::Result<()>;
    fn present(&mut self) -> io::Result<()>;
}

/// What to draw when an image is not ready.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Placeholder<'a> {
    Glyph(&'a str),
    Fill,
    Outline,
}

/// Draw `key`'s sprite into `rect`, or the placeholder if it is not loaded.
pub fn draw_asset<S: Surface>(
    surface: &mut S,
    assets: &AssetCatalog,
    key: ImageKey,
    rect: Rect,
    color: Color,
    fallback: Placeholder,
) -> io::Result<()> {
    match assets.sprite(key) {
        Some(sprite) => surface.sprite(rect, sprite, color),
        None => match fallback {
            Placeholder::Glyph(text) => surface.glyph(rect, text, color),
            Placeholder::Fill => surface.fill_rect(rect, color),
            Placeholder::Outline => surface.outline_rect(rect, color),
        },
    }
}

fn full_canvas<S: Surface>(surface: &S) -> Rect {
    let canvas = surface.canvas();
    Rect::new(0.0, 0.0, canvas.width, canvas.height)
}

// ── Public entry points ───────────────────────────────────────────────────────

/// Render one complete frame of play.
pub fn render<S: Surface>(
    surface: &mut S,
    state: &GameState,
    assets: &AssetCatalog,
    controls_visible: bool,
) -> io::Result<()> {
    draw_background(surface, assets)?;
    draw_world(surface, state, assets)?;
    draw_hud(surface, state)?;
    draw_hint(surface, controls_visible)?;

    if state.is_over() {
        draw_game_over(surface, state)?;
    }

    surface.present()
}

/// Frozen frame with a pause banner on top.
pub fn render_paused<S: Surface>(
    surface: &mut S,
    state: &GameState,
    assets: &AssetCatalog,
) -> io::Result<()> {
    draw_background(surface, assets)?;
    draw_world(surface, state, assets)?;
    draw_hud(surface, state)?;
    let canvas = surface.canvas();
    let band = Rect::new(0.0, canvas.height / 2.0 - 20.0, canvas.width, 40.0);
    surface.glyph(band, "PAUSED  -  P to resume", C_HUD)?;
    surface.present()
}

/// Start screen shown before the first game.
pub fn render_title<S: Surface>(surface: &mut S, assets: &AssetCatalog) -> io::Result<()> {
    draw_background(surface, assets)?;
    let canvas = surface.canvas();
    let title = Rect::new(0.0, canvas.height / 2.0 - 60.0, canvas.width, 40.0);
    surface.glyph(title, "★  DRONE  SHOOTER  ★", C_BULLET_PLAYER)?;
    let keys = Rect::new(0.0, canvas.height / 2.0, canvas.width, 40.0);
    surface.glyph(keys, KEYS_HINT, C_HINT)?;
    draw_hint(surface, true)?;
    surface.present()
}

// ── World ─────────────────────────────────────────────────────────────────────

fn draw_background<S: Surface>(surface: &mut S, assets: &AssetCatalog) -> io::Result<()> {
    surface.clear(C_BACKGROUND)?;
    if let Some(sprite) = assets.sprite(ImageKey::Background) {
        let canvas = full_canvas(surface);
        surface.sprite(canvas, sprite, C_BACKGROUND_ART)?;
    }
    Ok(())
}

fn draw_world<S: Surface>(
    surface: &mut S,
    state: &GameState,
    assets: &AssetCatalog,
) -> io::Result<()> {
    draw_asset(
        surface,
        assets,
        ImageKey::Player,
        state.player.rect,
        C_PLAYER,
        Placeholder::Glyph("O"),
    )?;

    for drone in &state.enemies {
        draw_asset(
            surface,
            assets,
            ImageKey::Drone,
            drone.rect,
            C_DRONE,
            Placeholder::Glyph("X"),
        )?;
    }
    if let Some(boss) = &state.boss {
        draw_asset(
            surface,
            assets,
            ImageKey::Bomber,
            boss.rect,
            C_BOSS,
            Placeholder::Glyph("XX"),
        )?;
    }

    // Pickups have no art of their own; the shield and bomb images are full-size effects.
    for powerup in &state.powerups {
        let (glyph, color) = match powerup.kind {
            PowerUpKind::Shield => ("S", C_SHIELD),
            PowerUpKind::BombCharge => ("B", C_BOMB),
        };
        surface.glyph(powerup.rect, glyph, color)?;
    }

    for bullet in state.bullets.iter().chain(&state.enemy_bullets) {
        draw_bullet(surface, assets, bullet)?;
    }

    for explosion in &state.explosions {
        draw_asset(
            surface,
            assets,
            ImageKey::Explosion,
            explosion.rect,
            C_EXPLOSION,
            Placeholder::Glyph("*"),
        )?;
    }

    if state.shield_active {
        let p = state.player.rect;
        let aura = Rect::new(p.x - 10.0, p.y - 10.0, p.width + 20.0, p.height + 20.0);
        draw_asset(
            surface,
            assets,
            ImageKey::Shield,
            aura,
            C_SHIELD,
            Placeholder::Outline,
        )?;
    }

    if state.bomb_effect > 0 {
        let canvas = full_canvas(surface);
        draw_asset(
            surface,
            assets,
            ImageKey::Bomb,
            canvas,
            C_BOMB,
            Placeholder::Outline,
        )?;
    }

    Ok(())
}

fn draw_bullet<S: Surface>(
    surface: &mut S,
    assets: &AssetCatalog,
    bullet: &Bullet,
) -> io::Result<()> {
    let color = if bullet.hostile {
        C_BULLET_ENEMY
    } else {
        C_BULLET_PLAYER
    };
    draw_asset(
        surface,
        assets,
        ImageKey::Bullet,
        bullet.rect,
        color,
        Placeholder::Fill,
    )
}

// ── HUD ───────────────────────────────────────────────────────────────────────

pub fn hud_line(state: &GameState) -> String {
    let shield = if state.shield_active {
        let left = state.rules.shield_hits.saturating_sub(state.shield_hits);
        format!("ON ({} left)", left)
    } else {
        "off".to_string()
    };
    format!(
        "Score: {:>6}   Lives: {}   Bombs: {}   Shield: {}",
        state.score,
        "♥".repeat(state.lives as usize),
        state.bombs,
        shield
    )
}

fn draw_hud<S: Surface>(surface: &mut S, state: &GameState) -> io::Result<()> {
    surface.text(0.0, 0.0, &hud_line(state), C_HUD)
}

/// Bottom line: the start/pause/quit controls between games, key help during play.
fn draw_hint<S: Surface>(surface: &mut S, controls_visible: bool) -> io::Result<()> {
    let canvas = surface.canvas();
    let hint = if controls_visible {
        CONTROLS_HINT
    } else {
        KEYS_HINT
    };
    surface.text(0.0, canvas.height - 1.0, hint, C_HINT)
}

// ── Game-over overlay ─────────────────────────────────────────────────────────

fn draw_game_over<S: Surface>(surface: &mut S, state: &GameState) -> io::Result<()> {
    let canvas = surface.canvas();
    let mid = canvas.height / 2.0;
    surface.glyph(
        Rect::new(0.0, mid - 40.0, canvas.width, 40.0),
        "GAME OVER",
        C_GAME_OVER,
    )?;
    surface.glyph(
        Rect::new(0.0, mid, canvas.width, 40.0),
        &format!("Final Score: {}", state.score),
        C_SCORE,
    )
}

// ── Terminal surface ──────────────────────────────────────────────────────────

/// Maps the canvas onto a `cols × rows` character grid.
pub struct TerminalSurface<W: Write> {
    out: W,
    cols: u16,
    rows: u16,
    canvas: CanvasConfig,
}

/// Clipped cell span: columns `c0..c1`, rows `r0..r1`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Span {
    c0: u16,
    c1: u16,
    r0: u16,
    r1: u16,
}

impl<W: Write> TerminalSurface<W> {
    pub fn new(out: W, cols: u16, rows: u16, canvas: CanvasConfig) -> Self {
        Self {
            out,
            cols,
            rows,
            canvas,
        }
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.cols = cols;
        self.rows = rows;
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn writer(&mut self) -> &mut W {
        &mut self.out
    }

    fn col(&self, x: f32) -> i32 {
        (x / self.canvas.width * self.cols as f32).floor() as i32
    }

    fn row(&self, y: f32) -> i32 {
        (y / self.canvas.height * self.rows as f32).floor() as i32
    }

    /// Cells covered by `rect`, at least one cell wide and tall, or `None`
    /// when it lies entirely off screen.
    fn span(&self, rect: Rect) -> Option<Span> {
        let c0 = self.col(rect.x);
        let r0 = self.row(rect.y);
        let c1 = self.col(rect.right()).max(c0 + 1);
        let r1 = self.row(rect.bottom()).max(r0 + 1);
        let (cols, rows) = (self.cols as i32, self.rows as i32);
        if c1 <= 0 || r1 <= 0 || c0 >= cols || r0 >= rows {
            return None;
        }
        Some(Span {
            c0: c0.max(0) as u16,
            c1: c1.min(cols) as u16,
            r0: r0.max(0) as u16,
            r1: r1.min(rows) as u16,
        })
    }

    fn put(&mut self, col: u16, row: u16, text: &str, color: Color) -> io::Result<()> {
        let room = self.cols.saturating_sub(col) as usize;
        let clipped: String = text.chars().take(room).collect();
        if clipped.is_empty() {
            return Ok(());
        }
        self.out.queue(cursor::MoveTo(col, row))?;
        self.out.queue(style::SetForegroundColor(color))?;
        self.out.queue(Print(clipped))?;
        Ok(())
    }
}

impl<W: Write> Surface for TerminalSurface<W> {
    fn canvas(&self) -> CanvasConfig {
        self.canvas
    }

    fn clear(&mut self, color: Color) -> io::Result<()> {
        self.out.queue(style::SetBackgroundColor(color))?;
        self.out.queue(terminal::Clear(terminal::ClearType::All))?;
        Ok(())
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) -> io::Result<()> {
        let Some(span) = self.span(rect) else {
            return Ok(());
        };
        let bar = "█".repeat((span.c1 - span.c0) as usize);
        for row in span.r0..span.r1 {
            self.put(span.c0, row, &bar, color)?;
        }
        Ok(())
    }

    fn outline_rect(&mut self, rect: Rect, color: Color) -> io::Result<()> {
        let Some(span) = self.span(rect) else {
            return Ok(());
        };
        let inner = (span.c1 - span.c0).saturating_sub(2) as usize;
        let last_row = span.r1 - 1;
        self.put(span.c0, span.r0, &format!("┌{}┐", "─".repeat(inner)), color)?;
        if last_row > span.r0 {
            self.put(span.c0, last_row, &format!("└{}┘", "─".repeat(inner)), color)?;
        }
        for row in span.r0 + 1..last_row {
            self.put(span.c0, row, "│", color)?;
            self.put(span.c1 - 1, row, "│", color)?;
        }
        Ok(())
    }

    fn glyph(&mut self, rect: Rect, text: &str, color: Color) -> io::Result<()> {
        let Some(span) = self.span(rect) else {
            return Ok(());
        };
        let len = text.chars().count() as u16;
        let width = span.c1 - span.c0;
        let col = span.c0 + width.saturating_sub(len) / 2;
        let row = span.r0 + (span.r1 - span.r0 - 1) / 2;
        self.put(col, row, text, color)
    }

    fn text(&mut self, x: f32, y: f32, text: &str, color: Color) -> io::Result<()> {
        let col = self.col(x);
        let row = self.row(y);
        if col < 0 || row < 0 || col >= self.cols as i32 || row >= self.rows as i32 {
            return Ok(());
        }
        self.put(col as u16, row as u16, text, color)
    }

    fn sprite(&mut self, rect: Rect, sprite: &Sprite, color: Color) -> io::Result<()> {
        let Some(span) = self.span(rect) else {
            return Ok(());
        };
        let max_rows = (span.r1 - span.r0) as usize;
        let max_cols = (span.c1 - span.c0) as usize;
        for (dy, line) in sprite.rows.iter().take(max_rows).enumerate() {
            for (dx, ch) in line.chars().take(max_cols).enumerate() {
                if ch == ' ' {
                    continue; // transparent
                }
                let mut buf = [0u8; 4];
                self.put(
                    span.c0 + dx as u16,
                    span.r0 + dy as u16,
                    ch.encode_utf8(&mut buf),
                    color,
                )?;
            }
        }
        Ok(())
    }

    fn present(&mut self) -> io::Result<()> {
        self.out.queue(style::ResetColor)?;
        self.out
            .queue(cursor::MoveTo(0, self.rows.saturating_sub(1)))?;
        self.out.flush()
    }
}
