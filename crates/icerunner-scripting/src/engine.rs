use mlua::{Lua, LuaOptions, StdLib};

use crate::error::DeckError;

/// Libraries available to deck scripts. The base library is always present.
fn deck_libs() -> StdLib {
    StdLib::STRING | StdLib::TABLE | StdLib::MATH
}

/// Create the Lua VM that deck scripts run in
pub fn create_engine() -> Result<Lua, DeckError> {
    Lua::new_with(deck_libs(), LuaOptions::default()).map_err(DeckError::Engine)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_has_deck_libs() {
        let lua = create_engine().unwrap();
        let ok: bool = lua
            .load("return type(string.find) == 'function' and type(math.floor) == 'function' and type(pcall) == 'function'")
            .eval()
            .unwrap();
        assert!(ok);
    }

    #[test]
    fn test_engine_has_no_io() {
        let lua = create_engine().unwrap();
        let io_missing: bool = lua.load("return io == nil and os == nil").eval().unwrap();
        assert!(io_missing);
    }
}
