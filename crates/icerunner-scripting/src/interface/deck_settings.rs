use std::cell::RefCell;
use std::rc::Rc;

use icerunner_core::{Color, DeckSettings, Difficulty, MapFactory, MapKit};
use mlua::{Lua, MultiValue, Table, Value, Variadic};
use tracing::debug;

use crate::bridge::{
    self, export_callable, object_field, sealed, single_table_argument, HostObject, ObjectTag,
};

impl sealed::Sealed for MapFactory {}
impl HostObject for MapFactory {
    const TAG: ObjectTag = ObjectTag::MapFactory;
}

/// Script-side `DeckSettings` instance.
///
/// Every instance writes into the registry owned by the deck loader, so the
/// registered factories outlive the VM.
#[derive(Debug, Default)]
pub struct DeckSettingsHandle {
    registry: Rc<RefCell<DeckSettings>>,
}

impl DeckSettingsHandle {
    pub fn registry(&self) -> &Rc<RefCell<DeckSettings>> {
        &self.registry
    }
}

impl sealed::Sealed for DeckSettingsHandle {}
impl HostObject for DeckSettingsHandle {
    const TAG: ObjectTag = ObjectTag::DeckSettings;
}

/// `deck:set_factories({ easiest, ..., hardest })`
///
/// Walks the list from index 1 and registers each factory at the difficulty
/// equal to its index. Stops silently at the first entry that is not a
/// MapFactory; anything after it is ignored.
fn set_factories(_lua: &Lua, args: Variadic<Value>) -> mlua::Result<()> {
    if args.len() != 2 {
        return Err(mlua::Error::RuntimeError(format!(
            "set_factories expected 2 arguments, got {}.",
            args.len()
        )));
    }

    let registry = match bridge::extract::<DeckSettingsHandle>(&args[0]) {
        Ok(handle) => Rc::clone(handle.registry()),
        Err(_) => {
            return Err(mlua::Error::RuntimeError(
                "invalid first parameter to set_factories.".to_string(),
            ))
        }
    };
    let Value::Table(list) = &args[1] else {
        return Err(bridge::arg_error(
            2,
            "set_factories",
            format!("table expected, got {}", args[1].type_name()),
        ));
    };

    let mut deck = registry
        .try_borrow_mut()
        .map_err(|e| mlua::Error::RuntimeError(format!("deck settings are busy: {}", e)))?;

    let mut registered = 0;
    for level in 1..=u32::MAX {
        let Some(difficulty) = Difficulty::new(level) else {
            break;
        };
        let entry = list.get::<Value>(level)?;
        let Ok(mut factory) = bridge::extract::<MapFactory>(&entry) else {
            break;
        };

        factory.set_difficulty(difficulty);
        deck.set_factory_at(difficulty, **factory);
        registered += 1;
    }

    debug!(target: "deck", "Registered {} map factories", registered);
    Ok(())
}

/// `IceRunner.DeckSettings()`
fn new_deck_settings(
    lua: &Lua,
    registry: &Rc<RefCell<DeckSettings>>,
) -> mlua::Result<Table> {
    let members = [("set_factories", lua.create_function(set_factories)?)];
    bridge::push_object::<DeckSettingsHandle>(lua, &members, |handle| {
        handle.registry = Rc::clone(registry);
    })
}

/// `IceRunner.DeckSettings.MapFactory({ map_color = RGB, player_color = RGB, kit = MapKit })`
fn map_factory(lua: &Lua, (_callee, args): (Value, Variadic<Value>)) -> mlua::Result<Table> {
    let input = single_table_argument(&args, "MapFactory")?;
    let map_color = object_field::<Color>(&input, "map_color", "MapFactory")?;
    let player_color = object_field::<Color>(&input, "player_color", "MapFactory")?;
    let kit = object_field::<MapKit>(&input, "kit", "MapFactory")?;

    bridge::push_object::<MapFactory>(lua, &[], |factory| {
        factory.set_map_color(map_color);
        factory.set_player_color(player_color);
        factory.set_map_kit(kit);
    })
}

pub(super) fn export(
    lua: &Lua,
    root: &Table,
    registry: Rc<RefCell<DeckSettings>>,
) -> mlua::Result<()> {
    let constructor =
        lua.create_function(move |lua, _: MultiValue| new_deck_settings(lua, &registry))?;
    let deck_settings = export_callable(lua, root, "DeckSettings", constructor)?;
    export_callable(lua, &deck_settings, "MapFactory", lua.create_function(map_factory)?)?;
    Ok(())
}
