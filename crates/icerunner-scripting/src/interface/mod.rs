//! The `IceRunner` namespace deck scripts are written against
//!
//! ```lua
//! local red  = IceRunner.General.RGB(1, 0, 0)
//! local kit  = IceRunner.MapTools.MapKit({ size = 8, walls = 4 })
//! local easy = IceRunner.DeckSettings.MapFactory({ map_color = red, player_color = red, kit = kit })
//! IceRunner.DeckSettings():set_factories({ easy })
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use icerunner_core::DeckSettings;
use mlua::{Lua, MultiValue};
use tracing::debug;

mod deck_settings;
mod general;
mod map_tools;

pub use deck_settings::DeckSettingsHandle;

/// Global table every interface lives under
pub const NAMESPACE: &str = "IceRunner";

/// Install the full `IceRunner` namespace into `lua`.
///
/// Factories registered through any `DeckSettings()` instance are copied
/// into `registry`.
pub fn export_config_interface(lua: &Lua, registry: Rc<RefCell<DeckSettings>>) -> mlua::Result<()> {
    let root = lua.create_table()?;

    deck_settings::export(lua, &root, registry)?;
    map_tools::export(lua, &root)?;
    general::export(lua, &root)?;

    // Reserved hook for scripts; does nothing yet
    root.set("configure", lua.create_function(|_, _: MultiValue| Ok(()))?)?;

    lua.globals().set(NAMESPACE, root)?;
    debug!(target: "deck", "Installed {} interface", NAMESPACE);
    Ok(())
}
