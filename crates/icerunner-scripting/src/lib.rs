//! Host runtime for Ice Runner deck scripts
//!
//! A deck script is Lua code that builds colors, map kits and map factories
//! through the `IceRunner` namespace and registers them by difficulty. This
//! crate owns the Lua VM, exposes the host types to it, and harvests the
//! registered factories into a [`DeckSettings`](icerunner_core::DeckSettings)
//! that survives the VM.

pub mod bridge;
pub mod deck_loader;
pub mod engine;
pub mod error;
pub mod interface;

pub use bridge::{extract, push_object, Embedded, ExtractError, HostObject, HostRef, ObjectTag};
pub use deck_loader::{DeckLoader, LoaderState};
pub use engine::create_engine;
pub use error::DeckError;
pub use interface::{export_config_interface, DeckSettingsHandle, NAMESPACE};
