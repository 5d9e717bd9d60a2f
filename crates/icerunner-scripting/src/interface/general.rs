use icerunner_core::Color;
use mlua::{Lua, Table, Value, Variadic};

use crate::bridge::{self, export_callable, number_argument, sealed, HostObject, ObjectTag};

impl sealed::Sealed for Color {}
impl HostObject for Color {
    const TAG: ObjectTag = ObjectTag::Rgb;
}

/// `IceRunner.General.RGB(r, g, b)`
fn rgb(lua: &Lua, (_callee, args): (Value, Variadic<Value>)) -> mlua::Result<Table> {
    let r = number_argument(lua, &args, 1, "RGB")?;
    let g = number_argument(lua, &args, 2, "RGB")?;
    let b = number_argument(lua, &args, 3, "RGB")?;

    bridge::push_object::<Color>(lua, &[], |color| {
        *color = Color::new(r as f32, g as f32, b as f32);
    })
}

pub(super) fn export(lua: &Lua, root: &Table) -> mlua::Result<()> {
    let general = lua.create_table()?;
    export_callable(lua, &general, "RGB", lua.create_function(rgb)?)?;
    root.set("General", general)
}
