use std::fmt;
use std::num::NonZeroU32;

/// An RGB color with components in the host's float precision
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

/// Grid size of a map in cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Dimensions {
    pub num_rows: u32,
    pub num_columns: u32,
}

/// Layout of a map, independent of how it is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Description {
    pub dimensions: Dimensions,
    pub wall_count: u32,
}

impl Description {
    /// A `size` x `size` grid with `wall_count` walls
    pub fn square(size: u32, wall_count: u32) -> Self {
        Self {
            dimensions: Dimensions {
                num_rows: size,
                num_columns: size,
            },
            wall_count,
        }
    }
}

/// Geometry descriptor that a map factory generates maps from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MapKit {
    description: Description,
}

impl MapKit {
    pub fn new(description: Description) -> Self {
        Self { description }
    }

    pub fn set_description(&mut self, description: Description) {
        self.description = description;
    }

    pub fn dimensions(&self) -> Dimensions {
        self.description.dimensions
    }

    pub fn wall_count(&self) -> u32 {
        self.description.wall_count
    }
}

/// Difficulty level of a map. Levels start at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Difficulty(NonZeroU32);

impl Difficulty {
    /// The lowest difficulty a deck can hold
    pub const EASIEST: Difficulty = Difficulty(NonZeroU32::MIN);

    /// Returns `None` for level 0
    pub fn new(level: u32) -> Option<Self> {
        NonZeroU32::new(level).map(Self)
    }

    pub fn level(self) -> u32 {
        self.0.get()
    }

    /// Zero-based slot of this difficulty in a deck registry
    pub fn index(self) -> usize {
        (self.0.get() - 1) as usize
    }

    pub(crate) fn from_index(index: usize) -> Option<Self> {
        u32::try_from(index + 1).ok().and_then(Self::new)
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Colors and geometry bound together; produces maps at one difficulty.
///
/// A factory has no difficulty until a deck registers it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MapFactory {
    map_color: Color,
    player_color: Color,
    kit: MapKit,
    difficulty: Option<Difficulty>,
}

impl MapFactory {
    pub fn new(map_color: Color, player_color: Color, kit: MapKit) -> Self {
        Self {
            map_color,
            player_color,
            kit,
            difficulty: None,
        }
    }

    pub fn set_map_color(&mut self, color: Color) {
        self.map_color = color;
    }

    pub fn set_player_color(&mut self, color: Color) {
        self.player_color = color;
    }

    pub fn set_map_kit(&mut self, kit: MapKit) {
        self.kit = kit;
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.difficulty = Some(difficulty);
    }

    pub fn map_color(&self) -> Color {
        self.map_color
    }

    pub fn player_color(&self) -> Color {
        self.player_color
    }

    pub fn map_kit(&self) -> &MapKit {
        &self.kit
    }

    pub fn difficulty(&self) -> Option<Difficulty> {
        self.difficulty
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_square_description() {
        let desc = Description::square(5, 3);
        assert_eq!(desc.dimensions.num_rows, 5);
        assert_eq!(desc.dimensions.num_columns, 5);
        assert_eq!(desc.wall_count, 3);
    }

    #[test]
    fn test_difficulty_rejects_zero() {
        assert!(Difficulty::new(0).is_none());
        assert_eq!(Difficulty::new(1), Some(Difficulty::EASIEST));
    }

    #[test]
    fn test_difficulty_index() {
        let d = Difficulty::new(3).unwrap();
        assert_eq!(d.level(), 3);
        assert_eq!(d.index(), 2);
        assert_eq!(Difficulty::from_index(2), Some(d));
    }

    #[test]
    fn test_new_factory_has_no_difficulty() {
        let kit = MapKit::new(Description::square(4, 1));
        let mut factory = MapFactory::new(Color::new(1.0, 0.0, 0.0), Color::default(), kit);
        assert_eq!(factory.difficulty(), None);

        factory.set_difficulty(Difficulty::new(2).unwrap());
        assert_eq!(factory.difficulty().map(Difficulty::level), Some(2));
        assert_eq!(factory.map_kit().wall_count(), 1);
    }
}
