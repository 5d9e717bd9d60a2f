use std::cell::{Ref, RefCell};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use icerunner_core::config::{DeckConfig, DEFAULT_SCRIPT_PATH};
use icerunner_core::DeckSettings;
use mlua::Lua;
use tracing::{debug, info, warn};

use crate::engine::create_engine;
use crate::error::DeckError;
use crate::interface::export_config_interface;

/// Where a [`DeckLoader`] is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoaderState {
    /// No VM yet
    Uninitialized,
    /// VM created and the `IceRunner` interface installed
    Initialized,
    /// Deck script ran to completion
    Configured,
    /// Deck script failed; the VM is not reused
    Faulted,
}

impl fmt::Display for LoaderState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LoaderState::Uninitialized => "uninitialized",
            LoaderState::Initialized => "initialized",
            LoaderState::Configured => "configured",
            LoaderState::Faulted => "faulted",
        };
        f.write_str(name)
    }
}

/// Runs a deck script and keeps the difficulty registry it produces.
///
/// One loader is one load: `init` creates the VM, `configure` runs the script
/// once, and the registered factories stay readable through
/// [`deck_settings`](Self::deck_settings) after the VM is gone.
pub struct DeckLoader {
    script_path: PathBuf,
    lua: Option<Lua>,
    /// Shared with every script-side `DeckSettings` handle while the VM lives
    deck_settings: Rc<RefCell<DeckSettings>>,
    state: LoaderState,
    error: String,
}

impl DeckLoader {
    /// Loader for the conventional script path (`scripts/config.lua`)
    pub fn new() -> Self {
        Self::with_script_path(DEFAULT_SCRIPT_PATH)
    }

    pub fn with_script_path(script_path: impl Into<PathBuf>) -> Self {
        Self {
            script_path: script_path.into(),
            lua: None,
            deck_settings: Rc::new(RefCell::new(DeckSettings::new())),
            state: LoaderState::Uninitialized,
            error: String::new(),
        }
    }

    pub fn from_config(config: &DeckConfig) -> Self {
        Self::with_script_path(config.script.clone())
    }

    pub fn script_path(&self) -> &Path {
        &self.script_path
    }

    pub fn state(&self) -> LoaderState {
        self.state
    }

    /// Engine diagnostic from the last failed `configure`, empty otherwise
    pub fn error(&self) -> &str {
        &self.error
    }

    /// Registered factories. Still valid after [`shutdown`](Self::shutdown).
    pub fn deck_settings(&self) -> Ref<'_, DeckSettings> {
        self.deck_settings.borrow()
    }

    /// Create the VM and install the `IceRunner` interface.
    ///
    /// On failure no VM is kept and the loader stays uninitialized.
    pub fn init(&mut self) -> Result<(), DeckError> {
        self.expect_state("init", LoaderState::Uninitialized)?;

        let lua = create_engine()?;
        export_config_interface(&lua, Rc::clone(&self.deck_settings))
            .map_err(DeckError::Interface)?;

        debug!(target: "deck", "Deck script engine initialized");
        self.lua = Some(lua);
        self.state = LoaderState::Initialized;
        Ok(())
    }

    /// Run the deck script.
    ///
    /// A failed run leaves the engine's message in [`error`](Self::error) and
    /// moves the loader to [`LoaderState::Faulted`]; it cannot be retried.
    pub fn configure(&mut self) -> Result<(), DeckError> {
        self.expect_state("configure", LoaderState::Initialized)?;
        let Some(lua) = self.lua.as_ref() else {
            return Err(self.invalid_state("configure"));
        };

        info!(target: "deck", "Running deck script {}", self.script_path.display());

        let source = match fs::read_to_string(&self.script_path) {
            Ok(source) => source,
            Err(source) => {
                self.error = format!("cannot open {}", self.script_path.display());
                self.state = LoaderState::Faulted;
                warn!(target: "deck", "{}: {}", self.error, source);
                return Err(DeckError::ScriptIo {
                    path: self.script_path.clone(),
                    source,
                });
            }
        };

        let result = lua
            .load(source.as_str())
            .set_name(format!("@{}", self.script_path.display()))
            .exec();

        match result {
            Ok(()) => {
                self.state = LoaderState::Configured;
                info!(
                    target: "deck",
                    "Deck configured with {} map factories",
                    self.deck_settings.borrow().len()
                );
                Ok(())
            }
            Err(e) => {
                self.error = diagnostic_text(&e);
                self.state = LoaderState::Faulted;
                warn!(target: "deck", "Deck script failed: {}", self.error);
                Err(DeckError::Script(self.error.clone()))
            }
        }
    }

    /// Build playable maps from the configured deck. Not implemented yet, so
    /// this always fails.
    pub fn load(&mut self) -> Result<(), DeckError> {
        warn!(target: "deck", "Deck loading is not implemented (state: {})", self.state);
        Err(DeckError::LoadNotImplemented)
    }

    /// Close the VM. The registry only holds copies, so it is unaffected.
    pub fn shutdown(&mut self) {
        if self.lua.take().is_some() {
            debug!(target: "deck", "Deck script engine closed");
        }
    }

    /// Drop the VM and everything registered, ready for a fresh `init`
    pub fn reset(&mut self) {
        self.shutdown();
        self.deck_settings.borrow_mut().clear();
        self.error.clear();
        self.state = LoaderState::Uninitialized;
    }

    fn expect_state(&self, operation: &'static str, expected: LoaderState) -> Result<(), DeckError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(self.invalid_state(operation))
        }
    }

    fn invalid_state(&self, operation: &'static str) -> DeckError {
        DeckError::InvalidState {
            operation,
            state: self.state,
        }
    }
}

impl Default for DeckLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for DeckLoader {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// The message Lua itself produced, without mlua's prefixes or tracebacks
fn diagnostic_text(error: &mlua::Error) -> String {
    match error {
        mlua::Error::CallbackError { cause, .. } => diagnostic_text(cause),
        mlua::Error::SyntaxError { message, .. } => message.clone(),
        mlua::Error::RuntimeError(message) => without_traceback(message).to_string(),
        other => without_traceback(&other.to_string()).to_string(),
    }
}

fn without_traceback(message: &str) -> &str {
    message
        .split_once("\nstack traceback:")
        .map_or(message, |(text, _)| text)
}
