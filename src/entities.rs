//! All game entity types. Pure data, no logic.

use crate::config::Rules;

// ── Geometry ──────────────────────────────────────────────────────────────────

/// Axis-aligned box in canvas pixels, origin at the top-left corner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center_y(&self) -> f32 {
        self.y + self.height / 2.0
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum GameStatus {
    Playing,
    GameOver,
}

// ── Ships ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub rect: Rect,
    /// Vertical pixels per frame while a direction key is held.
    pub speed: f32,
}

/// Basic enemy: drifts left, never shoots.
#[derive(Clone, Debug, PartialEq)]
pub struct Drone {
    pub rect: Rect,
    pub speed: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Boss {
    pub rect: Rect,
    pub speed: f32,
    /// Frames between shots.
    pub fire_rate: u32,
    pub fire_timer: u32,
}

// ── Projectiles ───────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Bullet {
    pub rect: Rect,
    /// Signed horizontal velocity: positive for the player, negative for hostile fire.
    pub speed: f32,
    pub hostile: bool,
}

// ── Pickups & effects ─────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PowerUpKind {
    /// Raises the shield with a fresh hit counter.
    Shield,
    /// One extra bomb, up to `Rules::max_bombs`.
    BombCharge,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PowerUp {
    pub rect: Rect,
    pub speed: f32,
    pub kind: PowerUpKind,
}

/// Visual left behind by a destroyed enemy.
#[derive(Clone, Debug, PartialEq)]
pub struct Explosion {
    pub rect: Rect,
    /// Remaining frames to display.
    pub frames: u32,
}

// ── Master game state ─────────────────────────────────────────────────────────

/// The entire world.  Cloneable so the pure update functions can return a
/// new copy without touching the input state.
#[derive(Clone, Debug, PartialEq)]
pub struct GameState {
    pub player: Player,
    pub enemies: Vec<Drone>,
    /// Player bullets, travelling right.
    pub bullets: Vec<Bullet>,
    /// Boss bullets, travelling left.
    pub enemy_bullets: Vec<Bullet>,
    pub boss: Option<Boss>,
    /// Set the first time a boss enters; blocks respawning unless the rules allow it.
    pub boss_spawned: bool,
    pub powerups: Vec<PowerUp>,
    pub explosions: Vec<Explosion>,
    pub score: u32,
    pub lives: u32,
    pub shield_active: bool,
    /// Hits absorbed by the current shield, always below `Rules::shield_hits`.
    pub shield_hits: u32,
    pub bombs: u32,
    /// Frames left on the bomb flash.
    pub bomb_effect: u32,
    pub status: GameStatus,
    pub frame: u64,
    pub width: f32,
    pub height: f32,
    pub rules: Rules,
}

impl GameState {
    pub fn is_over(&self) -> bool {
        self.status == GameStatus::GameOver
    }
}
