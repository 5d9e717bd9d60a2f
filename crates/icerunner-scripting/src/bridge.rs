//! Moving host objects across the Lua boundary
//!
//! A host object reaches a script as a proxy table:
//!
//! ```lua
//! { _id = <tag>, _instance = <userdata>, ...member functions }
//! ```
//!
//! `_instance` owns the Rust value. Lua's collector drops it (through the
//! userdata `__gc` handler) once nothing references the proxy any more.
//! `_id` says which host type is inside, and [`extract`] checks it before
//! touching the instance.

use std::fmt;
use std::ops::{Deref, DerefMut};

use mlua::{AnyUserData, Function, Integer, Lua, Table, UserData, UserDataRefMut, Value};
use thiserror::Error;
use tracing::debug;

const ID_FIELD: &str = "_id";
const INSTANCE_FIELD: &str = "_instance";

pub(crate) mod sealed {
    pub trait Sealed {}
}

/// Identifies which host type a proxy carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectTag {
    MapKit,
    MapFactory,
    Rgb,
    DeckSettings,
    /// Reserved for a difficulty-keyed factory table; no constructor yet
    FactoryMap,
}

impl ObjectTag {
    pub const ALL: [ObjectTag; 5] = [
        ObjectTag::MapKit,
        ObjectTag::MapFactory,
        ObjectTag::Rgb,
        ObjectTag::DeckSettings,
        ObjectTag::FactoryMap,
    ];

    /// Value stored in a proxy's `_id` field
    pub fn id(self) -> Integer {
        match self {
            ObjectTag::MapKit => 0,
            ObjectTag::MapFactory => 1,
            ObjectTag::Rgb => 2,
            ObjectTag::DeckSettings => 3,
            ObjectTag::FactoryMap => 4,
        }
    }

    /// Name scripts know the type by
    pub fn script_name(self) -> &'static str {
        match self {
            ObjectTag::MapKit => "MapKit",
            ObjectTag::MapFactory => "MapFactory",
            ObjectTag::Rgb => "RGB",
            ObjectTag::DeckSettings => "DeckSettings",
            ObjectTag::FactoryMap => "FactoryMap",
        }
    }
}

impl fmt::Display for ObjectTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.script_name())
    }
}

/// A host type that can live inside a proxy.
///
/// Sealed: the set of bridged types is fixed by this crate, one per
/// [`ObjectTag`].
pub trait HostObject: sealed::Sealed + Default + 'static {
    const TAG: ObjectTag;
}

/// Userdata cell holding a host object inside the VM
#[derive(Debug, Default)]
pub struct Embedded<T>(T);

impl<T: HostObject> UserData for Embedded<T> {}

impl<T> Deref for Embedded<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T> DerefMut for Embedded<T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.0
    }
}

/// Exclusive borrow of an object living in the VM. Holding it does not keep
/// the proxy alive and it must not outlive the current callback.
pub type HostRef<T> = UserDataRefMut<Embedded<T>>;

/// Why a value could not be extracted as a host object
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    #[error("expected {expected} object, got {found}")]
    NotATable {
        expected: ObjectTag,
        found: &'static str,
    },

    #[error(
        "invalid id: got {}, expected {} ({expected})",
        .found.map_or_else(|| "none".to_string(), |id| id.to_string()),
        .expected.id()
    )]
    TagMismatch {
        expected: ObjectTag,
        found: Option<Integer>,
    },

    #[error("{expected} object has no valid instance")]
    MissingInstance { expected: ObjectTag },
}

/// Borrow the `T` inside `value` if it is a proxy tagged `T::TAG`.
///
/// Never raises a Lua error; callers decide whether a miss is fatal.
pub fn extract<T: HostObject>(value: &Value) -> Result<HostRef<T>, ExtractError> {
    extract_inner::<T>(value).inspect_err(|e| {
        debug!(target: "deck", "Failed to extract object: {}", e);
    })
}

fn extract_inner<T: HostObject>(value: &Value) -> Result<HostRef<T>, ExtractError> {
    let Value::Table(proxy) = value else {
        return Err(ExtractError::NotATable {
            expected: T::TAG,
            found: value.type_name(),
        });
    };

    let found = match proxy.get::<Value>(ID_FIELD) {
        Ok(Value::Integer(id)) => Some(id),
        _ => None,
    };
    if found != Some(T::TAG.id()) {
        return Err(ExtractError::TagMismatch {
            expected: T::TAG,
            found,
        });
    }

    // The userdata type check backs up the tag, so a script that rewrites
    // `_id` still cannot get one type read as another.
    let missing = ExtractError::MissingInstance { expected: T::TAG };
    let instance = proxy
        .get::<AnyUserData>(INSTANCE_FIELD)
        .map_err(|_| missing.clone())?;
    instance.borrow_mut::<Embedded<T>>().map_err(|_| missing)
}

/// Default-construct a `T`, let `init` fill it in, and wrap it in a new
/// proxy carrying `members` as callable fields.
pub fn push_object<T: HostObject>(
    lua: &Lua,
    members: &[(&str, Function)],
    init: impl FnOnce(&mut T),
) -> mlua::Result<Table> {
    let mut object = T::default();
    init(&mut object);

    let proxy = lua.create_table()?;
    proxy.set(INSTANCE_FIELD, lua.create_userdata(Embedded(object))?)?;
    proxy.set(ID_FIELD, T::TAG.id())?;
    for (name, function) in members {
        proxy.set(*name, function.clone())?;
    }
    Ok(proxy)
}

/// Install `parent[name]` as a table that runs `call` when invoked.
///
/// Lua passes the table itself as the first argument to `call`. Returns the
/// table so more fields can be hung off it.
pub fn export_callable(
    lua: &Lua,
    parent: &Table,
    name: &str,
    call: Function,
) -> mlua::Result<Table> {
    let callable = lua.create_table()?;
    let metatable = lua.create_table()?;
    metatable.set("__call", call)?;
    callable.set_metatable(Some(metatable));
    parent.set(name, callable.clone())?;
    Ok(callable)
}

// ===== Argument checking =====

/// Error in the style of `luaL_argerror`
pub fn arg_error(position: usize, function: &str, message: impl fmt::Display) -> mlua::Error {
    mlua::Error::RuntimeError(format!(
        "bad argument #{} to '{}' ({})",
        position, function, message
    ))
}

/// The only argument of a constructor that takes a field table
pub fn single_table_argument(args: &[Value], function: &str) -> mlua::Result<Table> {
    if args.len() != 1 {
        return Err(mlua::Error::RuntimeError(format!(
            "{} expected 1 argument, got {}.",
            function,
            args.len()
        )));
    }
    match &args[0] {
        Value::Table(table) => Ok(table.clone()),
        other => Err(arg_error(
            1,
            function,
            format!("table expected, got {}", other.type_name()),
        )),
    }
}

/// Positional number argument (1-based), with Lua's string coercion
pub fn number_argument(
    lua: &Lua,
    args: &[Value],
    position: usize,
    function: &str,
) -> mlua::Result<f64> {
    let value = args.get(position - 1).cloned().unwrap_or(Value::Nil);
    let type_name = value.type_name();
    lua.coerce_number(value)?
        .ok_or_else(|| arg_error(position, function, format!("number expected, got {}", type_name)))
}

/// Non-negative integer field of an argument table
pub fn integer_field(lua: &Lua, table: &Table, field: &str, function: &str) -> mlua::Result<u32> {
    let value = table.get::<Value>(field)?;
    lua.coerce_integer(value)?
        .and_then(|n| u32::try_from(n).ok())
        .ok_or_else(|| arg_error(1, function, format!("Expected field of {} => Integer.", field)))
}

/// Copy a host object out of an argument table field
pub fn object_field<T: HostObject + Copy>(
    table: &Table,
    field: &str,
    function: &str,
) -> mlua::Result<T> {
    let value = table.get::<Value>(field)?;
    match extract::<T>(&value) {
        Ok(object) => Ok(**object),
        Err(_) => Err(arg_error(
            1,
            function,
            format!("Expected field of {} => {}", field, T::TAG),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use icerunner_core::{Color, DeckSettings, MapKit};

    use crate::interface::export_config_interface;

    thread_local! {
        static PROBE_DROPS: Cell<usize> = const { Cell::new(0) };
    }

    #[derive(Default)]
    struct Probe;

    impl Drop for Probe {
        fn drop(&mut self) {
            PROBE_DROPS.with(|drops| drops.set(drops.get() + 1));
        }
    }

    impl sealed::Sealed for Probe {}
    impl HostObject for Probe {
        const TAG: ObjectTag = ObjectTag::FactoryMap;
    }

    fn scripted() -> Lua {
        let lua = Lua::new();
        export_config_interface(&lua, Rc::new(RefCell::new(DeckSettings::new()))).unwrap();
        lua
    }

    #[test]
    fn test_tag_ids_are_stable() {
        let ids: Vec<Integer> = ObjectTag::ALL.iter().map(|tag| tag.id()).collect();
        assert_eq!(ids, vec![0, 1, 2, 3, 4]);
        assert_eq!(ObjectTag::Rgb.id(), 2);
    }

    #[test]
    fn test_rgb_extracts_same_components() {
        let lua = scripted();
        for (r, g, b) in [(0.0f32, 0.0, 0.0), (1.0, 0.5, 0.25), (-3.0, 200.0, 0.125)] {
            let value: Value = lua
                .load(format!("return IceRunner.General.RGB({r}, {g}, {b})"))
                .eval()
                .unwrap();
            let color = extract::<Color>(&value).unwrap();
            assert_eq!(**color, Color::new(r, g, b));
        }
    }

    #[test]
    fn test_wrong_tag_is_mismatch() {
        let lua = scripted();
        let value: Value = lua.load("return IceRunner.General.RGB(1, 1, 1)").eval().unwrap();

        let err = extract::<MapKit>(&value).unwrap_err();
        assert_eq!(
            err,
            ExtractError::TagMismatch {
                expected: ObjectTag::MapKit,
                found: Some(ObjectTag::Rgb.id()),
            }
        );
        assert!(err.to_string().contains("invalid id"));
    }

    #[test]
    fn test_non_table_is_rejected() {
        let err = extract::<Color>(&Value::Integer(7)).unwrap_err();
        assert_eq!(
            err,
            ExtractError::NotATable {
                expected: ObjectTag::Rgb,
                found: "integer",
            }
        );
        assert!(matches!(
            extract::<Color>(&Value::Nil),
            Err(ExtractError::NotATable { .. })
        ));
    }

    #[test]
    fn test_plain_table_without_id() {
        let lua = scripted();
        let value: Value = lua.load("return { r = 1, g = 1, b = 1 }").eval().unwrap();
        assert_eq!(
            extract::<Color>(&value).unwrap_err(),
            ExtractError::TagMismatch {
                expected: ObjectTag::Rgb,
                found: None,
            }
        );
    }

    #[test]
    fn test_tag_without_instance() {
        let lua = scripted();
        let value: Value = lua.load("return { _id = 2 }").eval().unwrap();
        assert_eq!(
            extract::<Color>(&value).unwrap_err(),
            ExtractError::MissingInstance {
                expected: ObjectTag::Rgb
            }
        );
    }

    #[test]
    fn test_forged_tag_cannot_reinterpret_instance() {
        let lua = scripted();
        let value: Value = lua
            .load(
                r#"
                local color = IceRunner.General.RGB(1, 2, 3)
                color._id = 0
                return color
                "#,
            )
            .eval()
            .unwrap();
        assert_eq!(
            extract::<MapKit>(&value).unwrap_err(),
            ExtractError::MissingInstance {
                expected: ObjectTag::MapKit
            }
        );
    }

    #[test]
    fn test_extracted_object_is_mutable_in_place() {
        let lua = scripted();
        let value: Value = lua.load("return IceRunner.General.RGB(0, 0, 0)").eval().unwrap();
        {
            let mut color = extract::<Color>(&value).unwrap();
            color.r = 0.75;
        }
        assert_eq!(extract::<Color>(&value).unwrap().r, 0.75);
    }

    #[test]
    fn test_collected_proxy_drops_host_object() {
        let lua = Lua::new();
        let proxy = push_object::<Probe>(&lua, &[], |_| {}).unwrap();
        lua.globals().set("probe", proxy).unwrap();
        lua.gc_collect().unwrap();
        assert_eq!(PROBE_DROPS.with(Cell::get), 0);

        lua.globals().set("probe", Value::Nil).unwrap();
        lua.gc_collect().unwrap();
        lua.gc_collect().unwrap();
        assert_eq!(PROBE_DROPS.with(Cell::get), 1);
    }

    #[test]
    fn test_members_are_installed() {
        let lua = Lua::new();
        let hello = lua.create_function(|_, ()| Ok("hello")).unwrap();
        let proxy = push_object::<Probe>(&lua, &[("greet", hello)], |_| {}).unwrap();
        lua.globals().set("probe", proxy).unwrap();

        let greeting: String = lua.load("return probe.greet()").eval().unwrap();
        assert_eq!(greeting, "hello");
        let id: Integer = lua.load("return probe._id").eval().unwrap();
        assert_eq!(id, ObjectTag::FactoryMap.id());
    }

    #[test]
    fn test_callable_table_receives_itself() {
        let lua = Lua::new();
        let globals = lua.globals();
        let call = lua
            .create_function(|_, (callee, n): (Value, i64)| Ok((matches!(callee, Value::Table(_)), n * 2)))
            .unwrap();
        export_callable(&lua, &globals, "Doubler", call).unwrap();

        let (was_table, doubled): (bool, i64) = lua.load("return Doubler(21)").eval().unwrap();
        assert!(was_table);
        assert_eq!(doubled, 42);
    }
}
