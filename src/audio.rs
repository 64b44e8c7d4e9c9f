//! Audio cues and playback.
//!
//! `SoundBank` reads and decodes every cue file once. A cue whose file is
//! missing or does not decode stays silent; it never stops the game.
//! `RodioAudio` plays through the default output device with one sink per
//! cue. `TerminalAudio` keeps the same transport state without a device and
//! can ring the bell instead; `AudioBackend::open` picks between them.

use std::collections::HashMap;
use std::io::{Cursor, Write};
use std::path::Path;
use std::sync::Arc;

use log::{info, trace, warn};
use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink, Source};

use crate::assets::LoadState;
use crate::error::{GameError, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SoundCue {
    Hit,
    Powerup,
    Start,
    Shoot,
    Music,
    GameOver,
}

impl SoundCue {
    pub const ALL: [SoundCue; 6] = [
        SoundCue::Hit,
        SoundCue::Powerup,
        SoundCue::Start,
        SoundCue::Shoot,
        SoundCue::Music,
        SoundCue::GameOver,
    ];

    pub fn file_name(&self) -> &'static str {
        match self {
            SoundCue::Hit => "hit.wav",
            SoundCue::Powerup => "powerup.wav",
            SoundCue::Start => "start.wav",
            SoundCue::Shoot => "shoot.wav",
            SoundCue::Music => "music.mp3",
            SoundCue::GameOver => "gameover.wav",
        }
    }
}

/// Playback controls the engine drives. Each cue is an independent channel.
pub trait AudioOut {
    fn play(&mut self, cue: SoundCue);
    fn pause(&mut self, cue: SoundCue);
    /// Reset the cue's playback position to the start.
    fn rewind(&mut self, cue: SoundCue);
}

// ── Sound bank ────────────────────────────────────────────────────────────────

type Clip = Arc<[u8]>;

/// Read `path` and check that it decodes as audio.
pub fn load_clip(cue: SoundCue, path: &Path) -> Result<Clip> {
    let asset_error = |reason: String| GameError::Asset {
        name: cue.file_name(),
        path: path.to_path_buf(),
        reason,
    };
    let bytes: Clip = std::fs::read(path)
        .map_err(|e| asset_error(e.to_string()))?
        .into();
    Decoder::new(Cursor::new(bytes.clone())).map_err(|e| asset_error(e.to_string()))?;
    Ok(bytes)
}

/// Encoded sound data for every cue that decoded successfully.
#[derive(Clone, Debug, Default)]
pub struct SoundBank {
    clips: HashMap<SoundCue, Clip>,
    states: HashMap<SoundCue, LoadState>,
}

impl SoundBank {
    pub fn load(sounds_dir: &Path) -> Self {
        let mut bank = Self::default();
        for cue in SoundCue::ALL {
            match load_clip(cue, &sounds_dir.join(cue.file_name())) {
                Ok(clip) => {
                    bank.clips.insert(cue, clip);
                    bank.states.insert(cue, LoadState::Ready);
                }
                Err(e) => {
                    warn!("sound {:?} unavailable: {}", cue, e);
                    bank.states.insert(cue, LoadState::Failed);
                }
            }
        }
        bank
    }

    pub fn load_state(&self, cue: SoundCue) -> LoadState {
        self.states.get(&cue).copied().unwrap_or(LoadState::Pending)
    }

    pub fn is_ready(&self, cue: SoundCue) -> bool {
        self.load_state(cue) == LoadState::Ready
    }

    /// A fresh decoder positioned at the start of the clip.
    fn decoder(&self, cue: SoundCue) -> Option<Decoder<Cursor<Clip>>> {
        let clip = self.clips.get(&cue)?;
        Decoder::new(Cursor::new(clip.clone())).ok()
    }
}

// ── Device playback ───────────────────────────────────────────────────────────

pub struct RodioAudio {
    _stream: OutputStream,
    sinks: HashMap<SoundCue, Sink>,
    bank: SoundBank,
}

impl RodioAudio {
    pub fn new(mut stream: OutputStream, bank: SoundBank) -> Self {
        // The terminal is in raw mode; keep the drop notice off stderr.
        stream.log_on_drop(false);
        let sinks = SoundCue::ALL
            .iter()
            .map(|&cue| (cue, Sink::connect_new(stream.mixer())))
            .collect();
        Self {
            _stream: stream,
            sinks,
            bank,
        }
    }
}

impl AudioOut for RodioAudio {
    fn play(&mut self, cue: SoundCue) {
        if !self.bank.is_ready(cue) {
            return;
        }
        let Some(sink) = self.sinks.get(&cue) else {
            return;
        };
        trace!("play {:?}", cue);
        if cue == SoundCue::Music {
            // Resume a paused loop; only queue a new one once rewound.
            if sink.empty() {
                if let Some(source) = self.bank.decoder(cue) {
                    sink.append(source.buffered().repeat_infinite());
                }
            }
        } else if let Some(source) = self.bank.decoder(cue) {
            sink.clear();
            sink.append(source);
        }
        sink.play();
    }

    fn pause(&mut self, cue: SoundCue) {
        trace!("pause {:?}", cue);
        if let Some(sink) = self.sinks.get(&cue) {
            sink.pause();
        }
    }

    fn rewind(&mut self, cue: SoundCue) {
        if let Some(sink) = self.sinks.get(&cue) {
            sink.clear();
        }
    }
}

// ── Deviceless playback ───────────────────────────────────────────────────────

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Channel {
    pub playing: bool,
    /// Frames played since the last rewind.
    pub position: u64,
}

/// Transport state only, for hosts without an output device.
pub struct TerminalAudio {
    bank: SoundBank,
    channels: HashMap<SoundCue, Channel>,
    bell: bool,
}

impl TerminalAudio {
    pub fn new(bank: SoundBank, bell: bool) -> Self {
        Self {
            bank,
            channels: HashMap::new(),
            bell,
        }
    }

    pub fn load_state(&self, cue: SoundCue) -> LoadState {
        self.bank.load_state(cue)
    }

    pub fn channel(&self, cue: SoundCue) -> Channel {
        self.channels.get(&cue).cloned().unwrap_or_default()
    }

    pub fn is_playing(&self, cue: SoundCue) -> bool {
        self.channel(cue).playing
    }

    /// Advance every playing channel by one frame. One-shot cues stop after
    /// their first frame; music loops until paused.
    pub fn advance(&mut self) {
        for (cue, channel) in self.channels.iter_mut() {
            if channel.playing {
                channel.position += 1;
                if *cue != SoundCue::Music {
                    channel.playing = false;
                }
            }
        }
    }
}

impl AudioOut for TerminalAudio {
    fn play(&mut self, cue: SoundCue) {
        if !self.bank.is_ready(cue) {
            return;
        }
        trace!("play {:?}", cue);
        self.channels.entry(cue).or_default().playing = true;
        if self.bell && matches!(cue, SoundCue::Hit | SoundCue::GameOver) {
            let mut out = std::io::stdout();
            let _ = out.write_all(b"\x07");
            let _ = out.flush();
        }
    }

    fn pause(&mut self, cue: SoundCue) {
        trace!("pause {:?}", cue);
        if let Some(channel) = self.channels.get_mut(&cue) {
            channel.playing = false;
        }
    }

    fn rewind(&mut self, cue: SoundCue) {
        if let Some(channel) = self.channels.get_mut(&cue) {
            channel.position = 0;
        }
    }
}

// ── Backend selection ─────────────────────────────────────────────────────────

pub enum AudioBackend {
    Device(RodioAudio),
    Silent(TerminalAudio),
}

impl AudioBackend {
    /// Decode the cue files and open the default output device, falling back
    /// to `TerminalAudio` when no device opens.
    pub fn open(sounds_dir: &Path, bell: bool) -> Self {
        let bank = SoundBank::load(sounds_dir);
        match OutputStreamBuilder::open_default_stream() {
            Ok(stream) => {
                info!("audio output opened");
                AudioBackend::Device(RodioAudio::new(stream, bank))
            }
            Err(e) => {
                warn!("no audio output device ({}), cues stay silent", e);
                AudioBackend::Silent(TerminalAudio::new(bank, bell))
            }
        }
    }

    /// Per-frame bookkeeping. Device sinks run on their own.
    pub fn advance(&mut self) {
        if let AudioBackend::Silent(terminal) = self {
            terminal.advance();
        }
    }
}

impl AudioOut for AudioBackend {
    fn play(&mut self, cue: SoundCue) {
        match self {
            AudioBackend::Device(device) => device.play(cue),
            AudioBackend::Silent(terminal) => terminal.play(cue),
        }
    }

    fn pause(&mut self, cue: SoundCue) {
        match self {
            AudioBackend::Device(device) => device.pause(cue),
            AudioBackend::Silent(terminal) => terminal.pause(cue),
        }
    }

    fn rewind(&mut self, cue: SoundCue) {
        match self {
            AudioBackend::Device(device) => device.rewind(cue),
            AudioBackend::Silent(terminal) => terminal.rewind(cue),
        }
    }
}
