//! Image assets and their load tracking.
//!
//! Sprites are plain text files (`<key>.txt`, one row per line) read on a
//! background thread. The catalog drains finished loads once per frame with
//! `try_recv`, so drawing never waits on the disk. Every key starts out
//! `Pending` and settles to `Ready` or `Failed`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use log::{debug, warn};

use crate::error::{GameError, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadState {
    Pending,
    Ready,
    Failed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ImageKey {
    Player,
    Drone,
    Bomber,
    Bullet,
    Shield,
    Explosion,
    Bomb,
    Background,
}

impl ImageKey {
    pub const ALL: [ImageKey; 8] = [
        ImageKey::Player,
        ImageKey::Drone,
        ImageKey::Bomber,
        ImageKey::Bullet,
        ImageKey::Shield,
        ImageKey::Explosion,
        ImageKey::Bomb,
        ImageKey::Background,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ImageKey::Player => "player",
            ImageKey::Drone => "drone",
            ImageKey::Bomber => "bomber",
            ImageKey::Bullet => "bullet",
            ImageKey::Shield => "shield",
            ImageKey::Explosion => "explosion",
            ImageKey::Bomb => "bomb",
            ImageKey::Background => "background",
        }
    }

    pub fn path_in(&self, images_dir: &Path) -> PathBuf {
        images_dir.join(format!("{}.txt", self.name()))
    }
}

// ── Sprites ───────────────────────────────────────────────────────────────────

/// Character art. Spaces are transparent when drawn.
#[derive(Clone, Debug, PartialEq)]
pub struct Sprite {
    pub rows: Vec<String>,
}

impl Sprite {
    /// Returns `None` when the text holds no visible characters.
    pub fn parse(text: &str) -> Option<Sprite> {
        let rows: Vec<String> = text.lines().map(|l| l.trim_end().to_string()).collect();
        if rows.iter().all(|r| r.trim().is_empty()) {
            return None;
        }
        Some(Sprite { rows })
    }

    pub fn width(&self) -> usize {
        self.rows.iter().map(|r| r.chars().count()).max().unwrap_or(0)
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }
}

pub fn load_sprite(key: ImageKey, images_dir: &Path) -> Result<Sprite> {
    let path = key.path_in(images_dir);
    let text = std::fs::read_to_string(&path).map_err(|e| GameError::Asset {
        name: key.name(),
        path: path.clone(),
        reason: e.to_string(),
    })?;
    Sprite::parse(&text).ok_or_else(|| GameError::Asset {
        name: key.name(),
        path,
        reason: "sprite is empty".to_string(),
    })
}

// ── Catalog ───────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
struct Slot {
    state: LoadState,
    sprite: Option<Sprite>,
}

type LoadResult = (ImageKey, Result<Sprite>);

pub struct AssetCatalog {
    slots: HashMap<ImageKey, Slot>,
    incoming: Option<Receiver<LoadResult>>,
}

impl Default for AssetCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl AssetCatalog {
    /// Every key pending, nothing loading. Fill it with `insert` / `mark_failed`.
    pub fn new() -> Self {
        let slots = ImageKey::ALL
            .iter()
            .map(|&key| {
                (
                    key,
                    Slot {
                        state: LoadState::Pending,
                        sprite: None,
                    },
                )
            })
            .collect();
        Self {
            slots,
            incoming: None,
        }
    }

    /// Start reading every sprite from `images_dir` on a worker thread.
    pub fn load_in_background(images_dir: PathBuf) -> Self {
        let (tx, rx) = mpsc::channel::<LoadResult>();
        thread::spawn(move || {
            for key in ImageKey::ALL {
                let result = load_sprite(key, &images_dir);
                if tx.send((key, result)).is_err() {
                    break; // catalog dropped
                }
            }
        });
        Self {
            incoming: Some(rx),
            ..Self::new()
        }
    }

    /// Apply finished loads without blocking.
    pub fn poll(&mut self) {
        let Some(rx) = self.incoming.as_ref() else {
            return;
        };
        let mut finished = Vec::new();
        let mut disconnected = false;
        loop {
            match rx.try_recv() {
                Ok(result) => finished.push(result),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    disconnected = true;
                    break;
                }
            }
        }
        for (key, result) in finished {
            match result {
                Ok(sprite) => {
                    debug!("image {} ready", key.name());
                    self.insert(key, sprite);
                }
                Err(e) => {
                    warn!("image {} could not be loaded: {}", key.name(), e);
                    self.mark_failed(key);
                }
            }
        }
        if disconnected {
            self.incoming = None;
        }
    }

    pub fn insert(&mut self, key: ImageKey, sprite: Sprite) {
        self.slots.insert(
            key,
            Slot {
                state: LoadState::Ready,
                sprite: Some(sprite),
            },
        );
    }

    pub fn mark_failed(&mut self, key: ImageKey) {
        self.slots.insert(
            key,
            Slot {
                state: LoadState::Failed,
                sprite: None,
            },
        );
    }

    pub fn state(&self, key: ImageKey) -> LoadState {
        self.slots
            .get(&key)
            .map(|s| s.state)
            .unwrap_or(LoadState::Pending)
    }

    /// The sprite, only once it loaded successfully.
    pub fn sprite(&self, key: ImageKey) -> Option<&Sprite> {
        self.slots
            .get(&key)
            .filter(|s| s.state == LoadState::Ready)
            .and_then(|s| s.sprite.as_ref())
    }

    /// True once no key is still pending.
    pub fn is_settled(&self) -> bool {
        ImageKey::ALL
            .iter()
            .all(|&k| self.state(k) != LoadState::Pending)
    }
}
