//! Frame scheduler and control surface.
//!
//! The engine owns the world and the run/pause flags. The host calls
//! `frame` once per frame and keeps scheduling only while it returns
//! `TickSignal::Continue`; start, pause and quit arrive from outside.

use std::io;

use log::info;
use rand::Rng;

use crate::assets::AssetCatalog;
use crate::audio::{AudioOut, SoundCue};
use crate::compute::{self, init_state};
pub use crate::compute::TickSignal;
use crate::config::GameConfig;
use crate::display::{self, Surface};
use crate::entities::{GameState, GameStatus};
use crate::input::{InputSource, InputState};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Before the first start.
    Idle,
    Running,
    Paused,
    GameOver,
}

pub struct Engine {
    config: GameConfig,
    state: GameState,
    phase: Phase,
}

impl Engine {
    pub fn new(config: GameConfig) -> Self {
        let state = init_state(config.canvas, config.rules);
        Self {
            config,
            state,
            phase: Phase::Idle,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Direct world access for scripted scenarios.
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Frames are only scheduled while running and not paused.
    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    /// Start / pause / quit controls are shown only between games.
    pub fn controls_visible(&self) -> bool {
        matches!(self.phase, Phase::Idle | Phase::GameOver)
    }

    // ── Control surface ──────────────────────────────────────────────────────

    /// Reset the world and begin scheduling.
    pub fn start<A: AudioOut>(&mut self, audio: &mut A) -> TickSignal {
        self.state = init_state(self.config.canvas, self.config.rules);
        self.phase = Phase::Running;
        audio.play(SoundCue::Start);
        audio.rewind(SoundCue::Music);
        audio.play(SoundCue::Music);
        info!("game started");
        TickSignal::Continue
    }

    /// Pause or resume. World state is untouched either way.
    pub fn toggle_pause<A: AudioOut>(&mut self, audio: &mut A) -> TickSignal {
        match self.phase {
            Phase::Running => {
                self.phase = Phase::Paused;
                audio.pause(SoundCue::Music);
                info!("paused at frame {}", self.state.frame);
                TickSignal::Stop
            }
            Phase::Paused => {
                self.phase = Phase::Running;
                audio.play(SoundCue::Music);
                info!("resumed at frame {}", self.state.frame);
                TickSignal::Continue
            }
            Phase::Idle | Phase::GameOver => TickSignal::Stop,
        }
    }

    /// Force the game-over path from a running or paused game.
    pub fn quit<A: AudioOut>(&mut self, audio: &mut A) -> TickSignal {
        if matches!(self.phase, Phase::Running | Phase::Paused) {
            self.end_game(audio);
        }
        TickSignal::Stop
    }

    fn end_game<A: AudioOut>(&mut self, audio: &mut A) {
        if self.phase == Phase::GameOver {
            return;
        }
        self.phase = Phase::GameOver;
        self.state.status = GameStatus::GameOver;
        audio.pause(SoundCue::Music);
        audio.play(SoundCue::GameOver);
        info!(
            "game over: score {}, frame {}",
            self.state.score, self.state.frame
        );
    }

    // ── Scheduling ───────────────────────────────────────────────────────────

    /// Run one update-then-render cycle. Does nothing unless running.
    pub fn frame<I, R, S, A>(
        &mut self,
        input: &I,
        rng: &mut R,
        surface: &mut S,
        assets: &AssetCatalog,
        audio: &mut A,
    ) -> io::Result<TickSignal>
    where
        I: InputSource + ?Sized,
        R: Rng,
        S: Surface,
        A: AudioOut,
    {
        if !self.is_running() {
            return Ok(TickSignal::Stop);
        }

        let input = InputState::sample(input);
        let outcome = compute::tick(&self.state, &input, rng);
        self.state = outcome.state;
        for cue in outcome.cues {
            audio.play(cue);
        }
        if outcome.signal == TickSignal::Stop {
            self.end_game(audio);
        }

        display::render(surface, &self.state, assets, self.controls_visible())?;
        Ok(outcome.signal)
    }

    /// Draw the screen for the current phase without advancing anything.
    pub fn redraw<S: Surface>(&self, surface: &mut S, assets: &AssetCatalog) -> io::Result<()> {
        match self.phase {
            Phase::Idle => display::render_title(surface, assets),
            Phase::Paused => display::render_paused(surface, &self.state, assets),
            Phase::Running | Phase::GameOver => {
                display::render(surface, &self.state, assets, self.controls_visible())
            }
        }
    }
}
