use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Conventional location of the deck script, relative to the working directory
pub const DEFAULT_SCRIPT_PATH: &str = "scripts/config.lua";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeckConfig {
    /// Deck script to execute (default: scripts/config.lua)
    #[serde(default = "default_script")]
    pub script: PathBuf,
}

fn default_script() -> PathBuf {
    PathBuf::from(DEFAULT_SCRIPT_PATH)
}

impl Default for DeckConfig {
    fn default() -> Self {
        Self {
            script: default_script(),
        }
    }
}
