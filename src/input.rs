//! Keyboard input.
//!
//! The engine only sees `InputSource`: which of the five controls are down
//! right now. `KeyTracker` builds that view from crossterm key events.

use std::collections::{HashMap, HashSet};

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Control {
    Up,
    Down,
    Fire,
    Bomb,
    PauseToggle,
}

pub trait InputSource {
    fn is_down(&self, control: Control) -> bool;

    /// True only on the frame the control was pressed. Sources without
    /// press edges report the held state.
    fn was_pressed(&self, control: Control) -> bool {
        self.is_down(control)
    }
}

/// Snapshot of the controls taken at the top of a tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputState {
    pub up: bool,
    pub down: bool,
    pub fire: bool,
    /// Pressed this frame, not merely held: one press spends one charge.
    pub bomb: bool,
    pub pause: bool,
}

impl InputState {
    pub fn sample<I: InputSource + ?Sized>(source: &I) -> Self {
        Self {
            up: source.is_down(Control::Up),
            down: source.is_down(Control::Down),
            fire: source.is_down(Control::Fire),
            bomb: source.was_pressed(Control::Bomb),
            pause: source.is_down(Control::PauseToggle),
        }
    }
}

impl InputSource for InputState {
    fn is_down(&self, control: Control) -> bool {
        match control {
            Control::Up => self.up,
            Control::Down => self.down,
            Control::Fire => self.fire,
            Control::Bomb => self.bomb,
            Control::PauseToggle => self.pause,
        }
    }
}

/// Key bindings: ↑/W, ↓/S, Space, B, P.
pub fn control_for(code: &KeyCode) -> Option<Control> {
    match code {
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => Some(Control::Up),
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => Some(Control::Down),
        KeyCode::Char(' ') => Some(Control::Fire),
        KeyCode::Char('b') | KeyCode::Char('B') => Some(Control::Bomb),
        KeyCode::Char('p') | KeyCode::Char('P') => Some(Control::PauseToggle),
        _ => None,
    }
}

// ── Held-key tracking ─────────────────────────────────────────────────────────

/// A key counts as held if its last press/repeat event arrived within this
/// many frames. Terminals without release events only send OS key-repeats,
/// which arrive faster than this window expires.
pub const HOLD_WINDOW: u64 = 4;

/// Records the frame of the last press/repeat for every key.
///
/// * Keyboard-enhancement terminals (kitty protocol) send `Release`, and the
///   key is dropped immediately.
/// * Classic terminals only send `Press`; keys expire after `HOLD_WINDOW`
///   frames of silence.
#[derive(Debug, Default)]
pub struct KeyTracker {
    key_frame: HashMap<KeyCode, u64>,
    /// Controls freshly pressed since the last `next_frame`.
    pressed: HashSet<Control>,
    frame: u64,
}

impl KeyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_frame(&mut self) {
        self.frame += 1;
        self.pressed.clear();
    }

    /// Record one key event. Returns the control on a fresh press, for
    /// one-shot actions like the pause toggle.
    pub fn handle(&mut self, event: &KeyEvent) -> Option<Control> {
        match event.kind {
            KeyEventKind::Press => {
                self.key_frame.insert(event.code, self.frame);
                let control = control_for(&event.code);
                if let Some(c) = control {
                    self.pressed.insert(c);
                }
                control
            }
            KeyEventKind::Repeat => {
                self.key_frame.insert(event.code, self.frame);
                None
            }
            KeyEventKind::Release => {
                self.key_frame.remove(&event.code);
                None
            }
        }
    }

    pub fn is_held(&self, code: &KeyCode) -> bool {
        self.key_frame
            .get(code)
            .map(|&last| self.frame.saturating_sub(last) <= HOLD_WINDOW)
            .unwrap_or(false)
    }

    pub fn clear(&mut self) {
        self.key_frame.clear();
        self.pressed.clear();
    }
}

impl InputSource for KeyTracker {
    fn is_down(&self, control: Control) -> bool {
        self.key_frame
            .keys()
            .any(|code| control_for(code) == Some(control) && self.is_held(code))
    }

    fn was_pressed(&self, control: Control) -> bool {
        self.pressed.contains(&control)
    }
}
