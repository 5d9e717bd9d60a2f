use icerunner_core::{Description, MapKit};
use mlua::{Lua, Table, Value, Variadic};

use crate::bridge::{
    self, export_callable, integer_field, sealed, single_table_argument, HostObject, ObjectTag,
};

impl sealed::Sealed for MapKit {}
impl HostObject for MapKit {
    const TAG: ObjectTag = ObjectTag::MapKit;
}

/// `IceRunner.MapTools.MapKit({ size = n, walls = n })`
///
/// Maps are always square: `size` sets both rows and columns.
fn map_kit(lua: &Lua, (_callee, args): (Value, Variadic<Value>)) -> mlua::Result<Table> {
    let input = single_table_argument(&args, "MapKit")?;
    let size = integer_field(lua, &input, "size", "MapKit")?;
    let walls = integer_field(lua, &input, "walls", "MapKit")?;

    bridge::push_object::<MapKit>(lua, &[], |kit| {
        kit.set_description(Description::square(size, walls));
    })
}

pub(super) fn export(lua: &Lua, root: &Table) -> mlua::Result<()> {
    let map_tools = lua.create_table()?;
    export_callable(lua, &map_tools, "MapKit", lua.create_function(map_kit)?)?;
    root.set("MapTools", map_tools)
}
