//! Pure game-logic functions.
//!
//! Every public transition takes an immutable reference to the current
//! `GameState` (and, where needed, an RNG handle) and returns a brand-new
//! `GameState`.  Side effects are limited to the injected RNG; sounds are
//! reported back as cues for the caller to play.

use log::info;
use rand::Rng;

use crate::audio::SoundCue;
use crate::config::{CanvasConfig, Rules};
use crate::entities::{
    Boss, Bullet, Drone, Explosion, GameState, GameStatus, Player, PowerUp, PowerUpKind, Rect,
};
use crate::input::InputState;

// ── Entity tables ─────────────────────────────────────────────────────────────

pub const PLAYER_X: f32 = 100.0;
pub const PLAYER_SIZE: f32 = 80.0;
pub const PLAYER_SPEED: f32 = 5.0;

pub const DRONE_SIZE: f32 = 60.0;
pub const DRONE_SPEED: f32 = 3.0;

pub const BOSS_SIZE: f32 = 100.0;
pub const BOSS_SPEED: f32 = 2.0;
/// Frames between boss shots.
pub const BOSS_FIRE_RATE: u32 = 60;

pub const BULLET_WIDTH: f32 = 20.0;
pub const BULLET_HEIGHT: f32 = 10.0;
pub const BULLET_SPEED: f32 = 6.0;

pub const POWERUP_SIZE: f32 = 30.0;
pub const POWERUP_SPEED: f32 = 2.0;

/// Whether `tick` wants another frame scheduled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickSignal {
    Continue,
    Stop,
}

/// Result of one simulation step.
#[derive(Clone, Debug)]
pub struct TickOutcome {
    pub state: GameState,
    /// Sounds triggered during the step, in order.
    pub cues: Vec<SoundCue>,
    pub signal: TickSignal,
}

// ── Constructors ─────────────────────────────────────────────────────────────

/// Fresh world for a new game.
pub fn init_state(canvas: CanvasConfig, rules: Rules) -> GameState {
    GameState {
        player: create_player(canvas.height),
        enemies: Vec::new(),
        bullets: Vec::new(),
        enemy_bullets: Vec::new(),
        boss: None,
        boss_spawned: false,
        powerups: Vec::new(),
        explosions: Vec::new(),
        score: 0,
        lives: rules.starting_lives,
        shield_active: false,
        shield_hits: 0,
        bombs: rules.starting_bombs,
        bomb_effect: 0,
        status: GameStatus::Playing,
        frame: 0,
        width: canvas.width,
        height: canvas.height,
        rules,
    }
}

pub fn create_player(canvas_height: f32) -> Player {
    Player {
        rect: Rect::new(
            PLAYER_X,
            canvas_height / 2.0 - PLAYER_SIZE / 2.0,
            PLAYER_SIZE,
            PLAYER_SIZE,
        ),
        speed: PLAYER_SPEED,
    }
}

/// Random row along the right edge, keeping the whole body on the canvas.
fn spawn_y(rng: &mut impl Rng, canvas_height: f32, size: f32) -> f32 {
    rng.gen::<f32>() * (canvas_height - size).max(0.0)
}

pub fn create_drone(canvas_width: f32, canvas_height: f32, rng: &mut impl Rng) -> Drone {
    Drone {
        rect: Rect::new(
            canvas_width,
            spawn_y(rng, canvas_height, DRONE_SIZE),
            DRONE_SIZE,
            DRONE_SIZE,
        ),
        speed: DRONE_SPEED,
    }
}

pub fn create_boss(canvas_width: f32, canvas_height: f32, rng: &mut impl Rng) -> Boss {
    Boss {
        rect: Rect::new(
            canvas_width,
            spawn_y(rng, canvas_height, BOSS_SIZE),
            BOSS_SIZE,
            BOSS_SIZE,
        ),
        speed: BOSS_SPEED,
        fire_rate: BOSS_FIRE_RATE,
        fire_timer: 0,
    }
}

pub fn create_bullet(x: f32, y: f32, hostile: bool) -> Bullet {
    Bullet {
        rect: Rect::new(x, y, BULLET_WIDTH, BULLET_HEIGHT),
        speed: if hostile { -BULLET_SPEED } else { BULLET_SPEED },
        hostile,
    }
}

pub fn create_powerup(canvas_width: f32, canvas_height: f32, rng: &mut impl Rng) -> PowerUp {
    let kind = if rng.gen_bool(0.5) {
        PowerUpKind::Shield
    } else {
        PowerUpKind::BombCharge
    };
    PowerUp {
        rect: Rect::new(
            canvas_width,
            spawn_y(rng, canvas_height, POWERUP_SIZE),
            POWERUP_SIZE,
            POWERUP_SIZE,
        ),
        speed: POWERUP_SPEED,
        kind,
    }
}

// ── Collision ─────────────────────────────────────────────────────────────────

/// Axis-aligned overlap. Strict on all four sides: touching edges do not collide.
pub fn check_collision(a: &Rect, b: &Rect) -> bool {
    a.x < b.right() && a.right() > b.x && a.y < b.bottom() && a.bottom() > b.y
}

// ── Input-driven state transitions (pure) ───────────────────────────────────

pub fn move_player_up(state: &GameState) -> GameState {
    let mut next = state.clone();
    next.player.rect.y = (next.player.rect.y - next.player.speed).max(0.0);
    next
}

pub fn move_player_down(state: &GameState) -> GameState {
    let mut next = state.clone();
    let floor = (next.height - next.player.rect.height).max(0.0);
    next.player.rect.y = (next.player.rect.y + next.player.speed).min(floor);
    next
}

/// Fire from the player's nose, capped at `Rules::max_player_bullets` live bullets.
pub fn player_shoot(state: &GameState) -> GameState {
    if state.bullets.len() >= state.rules.max_player_bullets {
        return state.clone();
    }
    let p = &state.player.rect;
    let bullet = create_bullet(p.right(), p.center_y() - BULLET_HEIGHT / 2.0, false);
    let mut next = state.clone();
    next.bullets.push(bullet);
    next
}

/// Clear every drone (the boss and enemy fire survive). No-op without a charge.
pub fn detonate_bomb(state: &GameState) -> GameState {
    if state.bombs == 0 {
        return state.clone();
    }
    GameState {
        enemies: Vec::new(),
        bombs: state.bombs - 1,
        bomb_effect: state.rules.bomb_effect_frames,
        ..state.clone()
    }
}

/// Per-frame spawn probability. NaN counts as never.
fn spawn_chance(p: f64) -> f64 {
    if p.is_nan() {
        0.0
    } else {
        p.clamp(0.0, 1.0)
    }
}

fn collect_powerup(state: &mut GameState, kind: PowerUpKind) {
    match kind {
        PowerUpKind::Shield => {
            state.shield_active = true;
            state.shield_hits = 0;
        }
        PowerUpKind::BombCharge => {
            state.bombs = (state.bombs + 1).min(state.rules.max_bombs);
        }
    }
}

// ── Per-frame tick (RNG injected) ──────────────────────────────────────

/// Advance the simulation by one frame.  All randomness comes through `rng`
/// so callers control determinism (tests use a seeded RNG).
///
/// A finished game is returned unchanged with `TickSignal::Stop`.
pub fn tick(state: &GameState, input: &InputState, rng: &mut impl Rng) -> TickOutcome {
    if state.is_over() {
        return TickOutcome {
            state: state.clone(),
            cues: Vec::new(),
            signal: TickSignal::Stop,
        };
    }

    let mut cues = Vec::new();
    let mut s = state.clone();
    s.frame += 1;

    // ── 1. Age effects shown last frame ──────────────────────────────────────
    s.bomb_effect = s.bomb_effect.saturating_sub(1);
    for explosion in s.explosions.iter_mut() {
        explosion.frames = explosion.frames.saturating_sub(1);
    }
    s.explosions.retain(|e| e.frames > 0);

    // ── 2. Input ─────────────────────────────────────────────────────────────
    if input.up {
        s = move_player_up(&s);
    }
    if input.down {
        s = move_player_down(&s);
    }
    if input.fire {
        let before = s.bullets.len();
        s = player_shoot(&s);
        if s.bullets.len() > before {
            cues.push(SoundCue::Shoot);
        }
    }
    if input.bomb {
        s = detonate_bomb(&s);
    }

    // ── 3. Spawning ──────────────────────────────────────────────────────────
    let rules = s.rules;
    if rng.gen_bool(spawn_chance(rules.drone_spawn_chance)) {
        s.enemies.push(create_drone(s.width, s.height, rng));
    }
    let boss_allowed = !s.boss_spawned || rules.boss_respawn;
    if s.boss.is_none() && boss_allowed && s.score >= rules.boss_score_threshold {
        info!("boss enters at score {}", s.score);
        s.boss = Some(create_boss(s.width, s.height, rng));
        s.boss_spawned = true;
    }
    if rng.gen_bool(spawn_chance(rules.powerup_chance)) {
        s.powerups.push(create_powerup(s.width, s.height, rng));
    }

    // ── 4. Movement ──────────────────────────────────────────────────────────
    for enemy in s.enemies.iter_mut() {
        enemy.rect.x -= enemy.speed;
    }
    s.enemies.retain(|e| e.rect.right() > 0.0);

    for powerup in s.powerups.iter_mut() {
        powerup.rect.x -= powerup.speed;
    }
    s.powerups.retain(|p| p.rect.right() > 0.0);

    if let Some(boss) = s.boss.as_mut() {
        boss.rect.x -= boss.speed;
        boss.fire_timer += 1;
        if boss.fire_timer >= boss.fire_rate {
            let y = boss.rect.center_y() - BULLET_HEIGHT / 2.0;
            s.enemy_bullets.push(create_bullet(boss.rect.x, y, true));
            boss.fire_timer = 0;
        }
    }
    if s.boss.as_ref().is_some_and(|b| b.rect.right() <= 0.0) {
        s.boss = None;
    }

    for bullet in s.bullets.iter_mut().chain(s.enemy_bullets.iter_mut()) {
        bullet.rect.x += bullet.speed;
    }
    let width = s.width;
    s.bullets.retain(|b| b.rect.x < width);
    s.enemy_bullets.retain(|b| b.rect.x > 0.0);

    // ── 5. Collision: player bullets ↔ drones & boss ─────────────────────────
    // Bullets are not consumed by a hit.
    for bullet in &s.bullets {
        let mut downed = Vec::new();
        s.enemies.retain(|e| {
            let hit = check_collision(&bullet.rect, &e.rect);
            if hit {
                downed.push(e.rect);
            }
            !hit
        });
        for rect in downed {
            s.score += rules.drone_points;
            cues.push(SoundCue::Hit);
            s.explosions.push(Explosion {
                rect,
                frames: rules.explosion_frames,
            });
        }

        if let Some(boss) = s.boss.take() {
            if check_collision(&bullet.rect, &boss.rect) {
                s.score += rules.boss_points;
                cues.push(SoundCue::Hit);
                s.explosions.push(Explosion {
                    rect: boss.rect,
                    frames: rules.explosion_frames,
                });
            } else {
                s.boss = Some(boss);
            }
        }
    }

    // ── 6. Collision: pickups ↔ player ───────────────────────────────────────
    let player_rect = s.player.rect;
    let (caught, missed): (Vec<PowerUp>, Vec<PowerUp>) = s
        .powerups
        .drain(..)
        .partition(|p| check_collision(&p.rect, &player_rect));
    s.powerups = missed;
    for powerup in caught {
        collect_powerup(&mut s, powerup.kind);
        cues.push(SoundCue::Powerup);
    }

    // ── 7. Collision: enemy bullets ↔ player ─────────────────────────────────
    let mut i = 0;
    while i < s.enemy_bullets.len() {
        if !check_collision(&s.enemy_bullets[i].rect, &player_rect) {
            i += 1;
            continue;
        }
        s.enemy_bullets.remove(i);
        if s.shield_active {
            s.shield_hits += 1;
            if s.shield_hits >= rules.shield_hits {
                s.shield_active = false;
                s.shield_hits = 0;
            }
        } else {
            s.lives = s.lives.saturating_sub(1);
            cues.push(SoundCue::Hit);
            if s.lives == 0 {
                s.status = GameStatus::GameOver;
                break;
            }
        }
    }

    let signal = if s.is_over() {
        TickSignal::Stop
    } else {
        TickSignal::Continue
    };
    TickOutcome {
        state: s,
        cues,
        signal,
    }
}
