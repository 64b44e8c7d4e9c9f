#![allow(dead_code)]

use std::io;

use crossterm::style::Color;
use rand::rngs::StdRng;
use rand::SeedableRng;

use drone_shooter::assets::Sprite;
use drone_shooter::audio::{AudioOut, SoundCue};
use drone_shooter::compute::init_state;
use drone_shooter::config::{CanvasConfig, Rules};
use drone_shooter::display::Surface;
use drone_shooter::entities::{GameState, Rect};

/// Rules with random spawning switched off, so ticks are deterministic.
pub fn quiet_rules() -> Rules {
    Rules {
        drone_spawn_chance: 0.0,
        powerup_chance: 0.0,
        ..Rules::default()
    }
}

pub fn make_state() -> GameState {
    init_state(CanvasConfig::default(), quiet_rules())
}

pub fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

// ── Audio ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub enum AudioCall {
    Play(SoundCue),
    Pause(SoundCue),
    Rewind(SoundCue),
}

#[derive(Default)]
pub struct RecordingAudio {
    pub calls: Vec<AudioCall>,
}

impl RecordingAudio {
    pub fn plays(&self, cue: SoundCue) -> usize {
        self.calls
            .iter()
            .filter(|c| **c == AudioCall::Play(cue))
            .count()
    }
}

impl AudioOut for RecordingAudio {
    fn play(&mut self, cue: SoundCue) {
        self.calls.push(AudioCall::Play(cue));
    }
    fn pause(&mut self, cue: SoundCue) {
        self.calls.push(AudioCall::Pause(cue));
    }
    fn rewind(&mut self, cue: SoundCue) {
        self.calls.push(AudioCall::Rewind(cue));
    }
}

// ── Surface ───────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    Clear(Color),
    Fill(Rect, Color),
    Outline(Rect, Color),
    Glyph(Rect, String, Color),
    Text(String, Color),
    Sprite(Rect, Color),
    Present,
}

pub struct RecordingSurface {
    pub canvas: CanvasConfig,
    pub ops: Vec<DrawOp>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self {
            canvas: CanvasConfig::default(),
            ops: Vec::new(),
        }
    }

    pub fn glyphs(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Glyph(_, text, _) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn texts(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text(text, _) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Surface for RecordingSurface {
    fn canvas(&self) -> CanvasConfig {
        self.canvas
    }
    fn clear(&mut self, color: Color) -> io::Result<()> {
        self.ops.push(DrawOp::Clear(color));
        Ok(())
    }
    fn fill_rect(&mut self, rect: Rect, color: Color) -> io::Result<()> {
        self.ops.push(DrawOp::Fill(rect, color));
        Ok(())
    }
    fn outline_rect(&mut self, rect: Rect, color: Color) -> io::Result<()> {
        self.ops.push(DrawOp::Outline(rect, color));
        Ok(())
    }
    fn glyph(&mut self, rect: Rect, text: &str, color: Color) -> io::Result<()> {
        self.ops.push(DrawOp::Glyph(rect, text.to_string(), color));
        Ok(())
    }
    fn text(&mut self, _x: f32, _y: f32, text: &str, color: Color) -> io::Result<()> {
        self.ops.push(DrawOp::Text(text.to_string(), color));
        Ok(())
    }
    fn sprite(&mut self, rect: Rect, _sprite: &Sprite, color: Color) -> io::Result<()> {
        self.ops.push(DrawOp::Sprite(rect, color));
        Ok(())
    }
    fn present(&mut self) -> io::Result<()> {
        self.ops.push(DrawOp::Present);
        Ok(())
    }
}
