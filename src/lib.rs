//! Side-scrolling drone shooter.
//!
//! The simulation (`entities`, `compute`) is pure data plus pure transitions.
//! `engine` schedules frames, `display` draws them, and `assets`, `audio` and
//! `input` are the collaborators the terminal host wires in.

pub mod assets;
pub mod audio;
pub mod compute;
pub mod config;
pub mod display;
pub mod engine;
pub mod entities;
pub mod error;
pub mod input;
