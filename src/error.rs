//! Error type shared by the host-facing parts of the crate.
//!
//! Gameplay itself has no failure modes. Only the terminal, the config file
//! and asset reads can fail, and asset failures are downgraded to a
//! placeholder draw instead of being propagated.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GameError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("failed to parse config {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to load asset {name} from {path}: {reason}")]
    Asset {
        name: &'static str,
        path: PathBuf,
        reason: String,
    },
}

pub type Result<T> = std::result::Result<T, GameError>;
