mod common;

use drone_shooter::audio::SoundCue;
use drone_shooter::compute::*;
use drone_shooter::config::{CanvasConfig, Rules};
use drone_shooter::entities::*;
use drone_shooter::input::InputState;

use common::{make_state, seeded_rng};

fn idle() -> InputState {
    InputState::default()
}

fn drone_at(x: f32, y: f32) -> Drone {
    Drone {
        rect: Rect::new(x, y, DRONE_SIZE, DRONE_SIZE),
        speed: DRONE_SPEED,
    }
}

fn boss_at(x: f32, y: f32) -> Boss {
    Boss {
        rect: Rect::new(x, y, BOSS_SIZE, BOSS_SIZE),
        speed: BOSS_SPEED,
        fire_rate: BOSS_FIRE_RATE,
        fire_timer: 0,
    }
}

/// A hostile bullet that lands on the default player position after one move.
fn incoming_bullet(y: f32) -> Bullet {
    create_bullet(150.0, y, true)
}

// ── init_state ────────────────────────────────────────────────────────────────

#[test]
fn init_state_player_position() {
    let s = init_state(CanvasConfig::default(), Rules::default());
    assert_eq!(s.player.rect, Rect::new(100.0, 160.0, 80.0, 80.0)); // height / 2 - 40
    assert_eq!(s.player.speed, 5.0);
    assert_eq!(s.lives, 3);
    assert_eq!(s.bombs, 1);
}

#[test]
fn init_state_empty_collections() {
    let s = init_state(CanvasConfig::default(), Rules::default());
    assert!(s.enemies.is_empty());
    assert!(s.bullets.is_empty());
    assert!(s.enemy_bullets.is_empty());
    assert!(s.boss.is_none());
    assert!(!s.boss_spawned);
    assert!(!s.shield_active);
    assert_eq!(s.shield_hits, 0);
    assert_eq!(s.score, 0);
    assert_eq!(s.frame, 0);
    assert_eq!(s.status, GameStatus::Playing);
}

#[test]
fn init_state_preserves_canvas() {
    let s = init_state(
        CanvasConfig {
            width: 640.0,
            height: 480.0,
        },
        Rules::default(),
    );
    assert_eq!(s.width, 640.0);
    assert_eq!(s.height, 480.0);
    assert_eq!(s.player.rect.y, 200.0);
}

// ── Factories ─────────────────────────────────────────────────────────────────

#[test]
fn drone_enters_at_right_edge_within_canvas() {
    let mut rng = seeded_rng();
    for _ in 0..50 {
        let d = create_drone(800.0, 400.0, &mut rng);
        assert_eq!(d.rect.x, 800.0);
        assert!(d.rect.y >= 0.0 && d.rect.y <= 340.0);
        assert_eq!(d.speed, 3.0);
    }
}

#[test]
fn boss_carries_fire_rate() {
    let b = create_boss(800.0, 400.0, &mut seeded_rng());
    assert_eq!(b.rect.x, 800.0);
    assert!(b.rect.y >= 0.0 && b.rect.y <= 300.0);
    assert_eq!(b.speed, 2.0);
    assert_eq!(b.fire_rate, 60);
    assert_eq!(b.fire_timer, 0);
}

#[test]
fn bullet_direction_follows_owner() {
    assert_eq!(create_bullet(0.0, 0.0, false).speed, 6.0);
    assert_eq!(create_bullet(0.0, 0.0, true).speed, -6.0);
    assert!(create_bullet(0.0, 0.0, true).hostile);
}

// ── check_collision ───────────────────────────────────────────────────────────

#[test]
fn collision_overlapping_boxes() {
    let a = Rect::new(0.0, 0.0, 10.0, 10.0);
    let b = Rect::new(5.0, 5.0, 10.0, 10.0);
    assert!(check_collision(&a, &b));
    assert!(check_collision(&b, &a));
}

#[test]
fn collision_touching_corner_is_not_a_hit() {
    let a = Rect::new(0.0, 0.0, 10.0, 10.0);
    let b = Rect::new(10.0, 10.0, 10.0, 10.0);
    assert!(!check_collision(&a, &b));
}

#[test]
fn collision_touching_one_edge_is_not_a_hit() {
    let a = Rect::new(0.0, 0.0, 10.0, 10.0);
    assert!(!check_collision(&a, &Rect::new(10.0, 0.0, 10.0, 10.0)));
    assert!(!check_collision(&a, &Rect::new(0.0, 10.0, 10.0, 10.0)));
}

// ── Player movement ───────────────────────────────────────────────────────────

#[test]
fn move_up_normal() {
    let s = make_state(); // y=160
    assert_eq!(move_player_up(&s).player.rect.y, 155.0);
}

#[test]
fn move_up_clamps_at_top() {
    let mut s = make_state();
    s.player.rect.y = 2.0;
    assert_eq!(move_player_up(&s).player.rect.y, 0.0);
    s.player.rect.y = 0.0;
    assert_eq!(move_player_up(&s).player.rect.y, 0.0);
}

#[test]
fn move_down_clamps_at_bottom() {
    let mut s = make_state();
    s.player.rect.y = 318.0;
    assert_eq!(move_player_down(&s).player.rect.y, 320.0); // height - 80
    s.player.rect.y = 320.0;
    assert_eq!(move_player_down(&s).player.rect.y, 320.0);
}

#[test]
fn move_does_not_mutate_original() {
    let s = make_state();
    let _ = move_player_up(&s);
    let _ = move_player_down(&s);
    assert_eq!(s.player.rect.y, 160.0);
}

// ── player_shoot ──────────────────────────────────────────────────────────────

#[test]
fn shoot_spawns_at_nose_vertically_centred() {
    let s = player_shoot(&make_state());
    assert_eq!(s.bullets.len(), 1);
    let b = &s.bullets[0];
    assert_eq!(b.rect.x, 180.0); // player.x + width
    assert_eq!(b.rect.y, 195.0); // player.y + height / 2 - 5
    assert!(!b.hostile);
}

#[test]
fn shoot_cap_at_ten_bullets() {
    let mut s = make_state();
    for _ in 0..10 {
        s.bullets.push(create_bullet(500.0, 10.0, false));
    }
    assert_eq!(player_shoot(&s).bullets.len(), 10);
}

#[test]
fn shoot_allows_tenth_bullet() {
    let mut s = make_state();
    for _ in 0..9 {
        s.bullets.push(create_bullet(500.0, 10.0, false));
    }
    assert_eq!(player_shoot(&s).bullets.len(), 10);
}

#[test]
fn enemy_bullets_do_not_count_toward_cap() {
    let mut s = make_state();
    for _ in 0..12 {
        s.enemy_bullets.push(create_bullet(500.0, 10.0, true));
    }
    assert_eq!(player_shoot(&s).bullets.len(), 1);
}

// ── Bomb ──────────────────────────────────────────────────────────────────────

#[test]
fn bomb_clears_enemies_and_starts_effect() {
    let mut s = make_state();
    s.enemies.push(drone_at(500.0, 10.0));
    s.enemies.push(drone_at(600.0, 200.0));
    let s2 = detonate_bomb(&s);
    assert!(s2.enemies.is_empty());
    assert_eq!(s2.bombs, 0);
    assert_eq!(s2.bomb_effect, 30);
}

#[test]
fn bomb_without_charge_has_no_effect() {
    let mut s = make_state();
    s.enemies.push(drone_at(500.0, 10.0));
    let mut spent = detonate_bomb(&s);
    assert_eq!(spent.bombs, 0);

    spent.enemies.push(drone_at(600.0, 10.0));
    let again = detonate_bomb(&spent);
    assert_eq!(again, spent);
    assert_eq!(again.enemies.len(), 1);
}

#[test]
fn bomb_spares_boss_and_enemy_fire() {
    let mut s = make_state();
    s.boss = Some(boss_at(600.0, 10.0));
    s.enemy_bullets.push(create_bullet(500.0, 10.0, true));
    let s2 = detonate_bomb(&s);
    assert!(s2.boss.is_some());
    assert_eq!(s2.enemy_bullets.len(), 1);
}

#[test]
fn tick_bomb_effect_counts_down_after_first_frame() {
    let mut s = make_state();
    s.enemies.push(drone_at(500.0, 10.0));
    let input = InputState {
        bomb: true,
        ..InputState::default()
    };
    let s2 = tick(&s, &input, &mut seeded_rng()).state;
    assert!(s2.enemies.is_empty());
    assert_eq!(s2.bomb_effect, 30);
    let s3 = tick(&s2, &idle(), &mut seeded_rng()).state;
    assert_eq!(s3.bomb_effect, 29);
}

// ── tick: frame counter, input & bullets ─────────────────────────────────────

#[test]
fn tick_increments_frame() {
    let mut s = make_state();
    s.frame = 5;
    let out = tick(&s, &idle(), &mut seeded_rng());
    assert_eq!(out.state.frame, 6);
    assert_eq!(out.signal, TickSignal::Continue);
    assert!(out.cues.is_empty());
}

#[test]
fn tick_moves_player_while_key_held() {
    let s = make_state();
    let up = InputState {
        up: true,
        ..InputState::default()
    };
    let down = InputState {
        down: true,
        ..InputState::default()
    };
    assert_eq!(tick(&s, &up, &mut seeded_rng()).state.player.rect.y, 155.0);
    assert_eq!(tick(&s, &down, &mut seeded_rng()).state.player.rect.y, 165.0);
}

#[test]
fn tick_fire_spawns_bullet_and_shoot_cue() {
    let fire = InputState {
        fire: true,
        ..InputState::default()
    };
    let out = tick(&make_state(), &fire, &mut seeded_rng());
    assert_eq!(out.state.bullets.len(), 1);
    assert_eq!(out.state.bullets[0].rect.x, 186.0); // spawned at 180, moved once
    assert_eq!(out.cues, vec![SoundCue::Shoot]);
}

#[test]
fn tick_fire_at_cap_is_silent() {
    let mut s = make_state();
    for i in 0..10 {
        s.bullets.push(create_bullet(400.0 + i as f32, 10.0, false));
    }
    let fire = InputState {
        fire: true,
        ..InputState::default()
    };
    let out = tick(&s, &fire, &mut seeded_rng());
    assert_eq!(out.state.bullets.len(), 10);
    assert!(!out.cues.contains(&SoundCue::Shoot));
}

#[test]
fn tick_bullets_move_in_opposite_directions() {
    let mut s = make_state();
    s.bullets.push(create_bullet(300.0, 20.0, false));
    s.enemy_bullets.push(create_bullet(300.0, 20.0, true));
    let s2 = tick(&s, &idle(), &mut seeded_rng()).state;
    assert_eq!(s2.bullets[0].rect.x, 306.0);
    assert_eq!(s2.enemy_bullets[0].rect.x, 294.0);
}

#[test]
fn tick_bullets_discarded_off_screen() {
    let mut s = make_state();
    s.bullets.push(create_bullet(795.0, 20.0, false)); // → 801, gone
    s.bullets.push(create_bullet(790.0, 20.0, false)); // → 796, kept
    s.enemy_bullets.push(create_bullet(5.0, 20.0, true)); // → -1, gone
    s.enemy_bullets.push(create_bullet(7.0, 20.0, true)); // → 1, kept
    let s2 = tick(&s, &idle(), &mut seeded_rng()).state;
    assert_eq!(s2.bullets.len(), 1);
    assert_eq!(s2.bullets[0].rect.x, 796.0);
    assert_eq!(s2.enemy_bullets.len(), 1);
    assert_eq!(s2.enemy_bullets[0].rect.x, 1.0);
}

// ── tick: drones ─────────────────────────────────────────────────────────────

#[test]
fn tick_drones_move_left() {
    let mut s = make_state();
    s.enemies.push(drone_at(500.0, 10.0));
    let s2 = tick(&s, &idle(), &mut seeded_rng()).state;
    assert_eq!(s2.enemies[0].rect.x, 497.0);
}

#[test]
fn tick_drone_purged_past_left_edge() {
    let mut s = make_state();
    s.enemies.push(drone_at(-57.0, 10.0)); // right edge → 0
    s.enemies.push(drone_at(-56.0, 10.0)); // right edge → 1
    let s2 = tick(&s, &idle(), &mut seeded_rng()).state;
    assert_eq!(s2.enemies.len(), 1);
    assert_eq!(s2.enemies[0].rect.x, -59.0);
}

#[test]
fn tick_spawns_drone_at_right_edge() {
    let mut s = make_state();
    s.rules.drone_spawn_chance = 1.0;
    let s2 = tick(&s, &idle(), &mut seeded_rng()).state;
    assert_eq!(s2.enemies.len(), 1);
    assert_eq!(s2.enemies[0].rect.x, 797.0); // spawned at width, moved once
}

#[test]
fn tick_no_spawn_when_chance_is_zero() {
    let mut s = make_state();
    let mut rng = seeded_rng();
    for _ in 0..100 {
        s = tick(&s, &idle(), &mut rng).state;
    }
    assert!(s.enemies.is_empty());
    assert!(s.powerups.is_empty());
}

#[test]
fn tick_nan_spawn_chances_never_spawn() {
    let mut s = make_state();
    s.rules.drone_spawn_chance = f64::NAN;
    s.rules.powerup_chance = f64::NAN;
    let mut rng = seeded_rng();
    for _ in 0..20 {
        s = tick(&s, &idle(), &mut rng).state;
    }
    assert!(s.enemies.is_empty());
    assert!(s.powerups.is_empty());
}

// ── tick: collision: player bullets ↔ drones & boss ─────────────────────────

#[test]
fn tick_bullet_downs_drone_for_ten_points() {
    let mut s = make_state();
    s.enemies.push(drone_at(300.0, 100.0)); // → 297
    s.bullets.push(create_bullet(280.0, 120.0, false)); // → 286
    let out = tick(&s, &idle(), &mut seeded_rng());
    assert!(out.state.enemies.is_empty());
    assert_eq!(out.state.score, 10);
    assert_eq!(out.cues, vec![SoundCue::Hit]);
    assert_eq!(out.state.explosions.len(), 1);
    assert_eq!(out.state.explosions[0].frames, 12);
}

#[test]
fn tick_bullet_is_not_consumed_by_hit() {
    let mut s = make_state();
    s.enemies.push(drone_at(300.0, 100.0));
    s.enemies.push(drone_at(310.0, 110.0));
    s.bullets.push(create_bullet(280.0, 120.0, false));
    let s2 = tick(&s, &idle(), &mut seeded_rng()).state;
    assert!(s2.enemies.is_empty());
    assert_eq!(s2.score, 20);
    assert_eq!(s2.bullets.len(), 1);
}

#[test]
fn tick_bullet_misses_drone_outside_box() {
    let mut s = make_state();
    s.enemies.push(drone_at(300.0, 100.0));
    s.bullets.push(create_bullet(280.0, 40.0, false)); // bottom edge at 50
    let s2 = tick(&s, &idle(), &mut seeded_rng()).state;
    assert_eq!(s2.enemies.len(), 1);
    assert_eq!(s2.score, 0);
}

#[test]
fn tick_bullet_downs_boss_for_fifty_points() {
    let mut s = make_state();
    s.boss = Some(boss_at(400.0, 100.0)); // → 398
    s.boss_spawned = true;
    s.bullets.push(create_bullet(390.0, 140.0, false)); // → 396
    let out = tick(&s, &idle(), &mut seeded_rng());
    assert!(out.state.boss.is_none());
    assert_eq!(out.state.score, 50);
    assert_eq!(out.cues, vec![SoundCue::Hit]);
}

// ── tick: boss ───────────────────────────────────────────────────────────────

#[test]
fn tick_boss_spawns_at_threshold() {
    let mut s = make_state();
    s.score = 100;
    let s2 = tick(&s, &idle(), &mut seeded_rng()).state;
    let boss = s2.boss.expect("boss should spawn at 100 points");
    assert_eq!(boss.rect.x, 798.0); // spawned at width, moved once
    assert_eq!(boss.fire_timer, 1);
    assert!(s2.boss_spawned);
}

#[test]
fn tick_no_boss_below_threshold() {
    let mut s = make_state();
    s.score = 90;
    let s2 = tick(&s, &idle(), &mut seeded_rng()).state;
    assert!(s2.boss.is_none());
}

#[test]
fn tick_single_boss_while_alive() {
    let mut s = make_state();
    s.score = 500;
    let mut rng = seeded_rng();
    for _ in 0..10 {
        s = tick(&s, &idle(), &mut rng).state;
    }
    assert!(s.boss.is_some());
    assert_eq!(s.boss.as_ref().map(|b| b.rect.x), Some(780.0));
}

#[test]
fn tick_boss_does_not_respawn_after_destroyed() {
    let mut s = make_state();
    s.score = 150;
    s.boss_spawned = true;
    let mut rng = seeded_rng();
    for _ in 0..5 {
        s = tick(&s, &idle(), &mut rng).state;
    }
    assert!(s.boss.is_none());
}

#[test]
fn tick_boss_respawns_when_rules_allow() {
    let mut s = make_state();
    s.score = 150;
    s.boss_spawned = true;
    s.rules.boss_respawn = true;
    let s2 = tick(&s, &idle(), &mut seeded_rng()).state;
    assert!(s2.boss.is_some());
}

#[test]
fn tick_boss_fires_when_timer_reaches_rate() {
    let mut s = make_state();
    let mut boss = boss_at(600.0, 50.0);
    boss.fire_timer = 59;
    s.boss = Some(boss);
    s.boss_spawned = true;
    let s2 = tick(&s, &idle(), &mut seeded_rng()).state;
    assert_eq!(s2.enemy_bullets.len(), 1);
    let b = &s2.enemy_bullets[0];
    assert!(b.hostile);
    assert_eq!(b.rect.x, 592.0); // boss.x 598, then moved once
    assert_eq!(b.rect.y, 95.0); // boss centre - 5
    assert_eq!(s2.boss.as_ref().map(|b| b.fire_timer), Some(0));
}

#[test]
fn tick_boss_holds_fire_between_shots() {
    let mut s = make_state();
    let mut boss = boss_at(600.0, 50.0);
    boss.fire_timer = 10;
    s.boss = Some(boss);
    s.boss_spawned = true;
    let s2 = tick(&s, &idle(), &mut seeded_rng()).state;
    assert!(s2.enemy_bullets.is_empty());
    assert_eq!(s2.boss.as_ref().map(|b| b.fire_timer), Some(11));
}

#[test]
fn tick_boss_removed_past_left_edge() {
    let mut s = make_state();
    s.boss = Some(boss_at(-99.0, 10.0));
    s.boss_spawned = true;
    let s2 = tick(&s, &idle(), &mut seeded_rng()).state;
    assert!(s2.boss.is_none());
}

// ── tick: collision: enemy bullets ↔ player ─────────────────────────────────

#[test]
fn tick_enemy_bullet_costs_a_life() {
    let mut s = make_state();
    s.enemy_bullets.push(incoming_bullet(190.0));
    let out = tick(&s, &idle(), &mut seeded_rng());
    assert_eq!(out.state.lives, 2);
    assert!(out.state.enemy_bullets.is_empty());
    assert_eq!(out.cues, vec![SoundCue::Hit]);
    assert_eq!(out.signal, TickSignal::Continue);
}

#[test]
fn tick_shield_absorbs_exactly_five_hits() {
    let mut s = make_state();
    s.shield_active = true;
    let mut rng = seeded_rng();
    for hit in 1..=5 {
        s.enemy_bullets.push(incoming_bullet(190.0));
        s = tick(&s, &idle(), &mut rng).state;
        if hit < 5 {
            assert!(s.shield_active, "shield dropped after {} hits", hit);
            assert_eq!(s.shield_hits, hit);
        }
    }
    assert!(!s.shield_active);
    assert_eq!(s.shield_hits, 0);
    assert_eq!(s.lives, 3);

    s.enemy_bullets.push(incoming_bullet(190.0));
    s = tick(&s, &idle(), &mut rng).state;
    assert_eq!(s.lives, 2);
}

#[test]
fn tick_game_over_when_lives_reach_zero() {
    let mut s = make_state();
    s.lives = 1;
    s.enemy_bullets.push(incoming_bullet(190.0));
    s.enemy_bullets.push(incoming_bullet(200.0));
    let out = tick(&s, &idle(), &mut seeded_rng());
    assert_eq!(out.state.lives, 0);
    assert_eq!(out.state.status, GameStatus::GameOver);
    assert_eq!(out.signal, TickSignal::Stop);
    // Remaining checks are skipped once the game ends.
    assert_eq!(out.state.enemy_bullets.len(), 1);
}

#[test]
fn tick_no_game_over_when_lives_above_zero() {
    let mut s = make_state();
    s.lives = 2;
    s.enemy_bullets.push(incoming_bullet(190.0));
    let out = tick(&s, &idle(), &mut seeded_rng());
    assert_eq!(out.state.lives, 1);
    assert_eq!(out.state.status, GameStatus::Playing);
}

#[test]
fn tick_finished_game_is_frozen() {
    let mut s = make_state();
    s.status = GameStatus::GameOver;
    s.lives = 0;
    s.enemy_bullets.push(incoming_bullet(190.0));
    let out = tick(&s, &idle(), &mut seeded_rng());
    assert_eq!(out.state, s);
    assert_eq!(out.signal, TickSignal::Stop);
    assert_eq!(out.state.lives, 0);
}

// ── tick: pickups & effects ─────────────────────────────────────────────────

#[test]
fn tick_shield_pickup_raises_shield() {
    let mut s = make_state();
    s.shield_hits = 3;
    s.powerups.push(PowerUp {
        rect: Rect::new(150.0, 180.0, POWERUP_SIZE, POWERUP_SIZE),
        speed: POWERUP_SPEED,
        kind: PowerUpKind::Shield,
    });
    let out = tick(&s, &idle(), &mut seeded_rng());
    assert!(out.state.shield_active);
    assert_eq!(out.state.shield_hits, 0);
    assert!(out.state.powerups.is_empty());
    assert_eq!(out.cues, vec![SoundCue::Powerup]);
}

#[test]
fn tick_bomb_pickup_is_capped() {
    let mut s = make_state();
    let pickup = PowerUp {
        rect: Rect::new(150.0, 180.0, POWERUP_SIZE, POWERUP_SIZE),
        speed: POWERUP_SPEED,
        kind: PowerUpKind::BombCharge,
    };
    s.powerups.push(pickup);
    assert_eq!(tick(&s, &idle(), &mut seeded_rng()).state.bombs, 2);

    s.bombs = 3;
    assert_eq!(tick(&s, &idle(), &mut seeded_rng()).state.bombs, 3);
}

#[test]
fn tick_pickups_drift_left() {
    let mut s = make_state();
    s.powerups.push(PowerUp {
        rect: Rect::new(500.0, 10.0, POWERUP_SIZE, POWERUP_SIZE),
        speed: POWERUP_SPEED,
        kind: PowerUpKind::Shield,
    });
    let s2 = tick(&s, &idle(), &mut seeded_rng()).state;
    assert_eq!(s2.powerups[0].rect.x, 498.0);
    assert!(!s2.shield_active);
}

#[test]
fn tick_explosions_fade() {
    let mut s = make_state();
    s.explosions.push(Explosion {
        rect: Rect::new(10.0, 10.0, 60.0, 60.0),
        frames: 1,
    });
    s.explosions.push(Explosion {
        rect: Rect::new(10.0, 10.0, 60.0, 60.0),
        frames: 5,
    });
    let s2 = tick(&s, &idle(), &mut seeded_rng()).state;
    assert_eq!(s2.explosions.len(), 1);
    assert_eq!(s2.explosions[0].frames, 4);
}

// ── Long-run properties ───────────────────────────────────────────────────────

#[test]
fn long_run_invariants_hold() {
    let mut s = init_state(CanvasConfig::default(), Rules::default());
    s.score = 100; // bring the boss in early
    let mut rng = seeded_rng();
    let fire = InputState {
        fire: true,
        ..InputState::default()
    };
    for _ in 0..2_000 {
        assert!(s.bullets.len() <= 10);
        let out = tick(&s, &fire, &mut rng);
        s = out.state;
        assert!(s.shield_hits < s.rules.shield_hits);
        assert!(s.bombs <= s.rules.max_bombs);
        if out.signal == TickSignal::Stop {
            assert_eq!(s.lives, 0);
            break;
        }
    }
}
