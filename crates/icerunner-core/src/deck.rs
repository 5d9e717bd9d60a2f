use crate::map::{Difficulty, MapFactory};

/// Registry of map factories indexed by difficulty.
///
/// Factories are stored by value. Nothing in here refers back into the
/// scripting VM that produced them, so the registry stays valid after the VM
/// is torn down.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeckSettings {
    slots: Vec<Option<MapFactory>>,
}

impl DeckSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `factory` at `difficulty`, replacing whatever was there
    pub fn set_factory_at(&mut self, difficulty: Difficulty, factory: MapFactory) {
        let index = difficulty.index();
        if self.slots.len() <= index {
            self.slots.resize(index + 1, None);
        }
        self.slots[index] = Some(factory);
    }

    pub fn factory_at(&self, difficulty: Difficulty) -> Option<&MapFactory> {
        self.slots.get(difficulty.index()).and_then(Option::as_ref)
    }

    /// Occupied slots in ascending difficulty order
    pub fn factories(&self) -> impl Iterator<Item = (Difficulty, &MapFactory)> + '_ {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            let factory = slot.as_ref()?;
            Some((Difficulty::from_index(index)?, factory))
        })
    }

    /// Number of registered factories
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }
}
