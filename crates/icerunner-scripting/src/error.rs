use std::path::PathBuf;

use thiserror::Error;

use crate::deck_loader::LoaderState;

/// Failures reported by [`DeckLoader`](crate::DeckLoader)
#[derive(Debug, Error)]
pub enum DeckError {
    #[error("failed to create script engine: {0}")]
    Engine(#[source] mlua::Error),

    #[error("failed to install the IceRunner interface: {0}")]
    Interface(#[source] mlua::Error),

    #[error("cannot open {}: {source}", path.display())]
    ScriptIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Script compile or runtime failure, carrying the engine's own message
    #[error("{0}")]
    Script(String),

    #[error("cannot {operation} while the deck loader is {state}")]
    InvalidState {
        operation: &'static str,
        state: LoaderState,
    },

    #[error("loading maps from the deck is not implemented")]
    LoadNotImplemented,
}
