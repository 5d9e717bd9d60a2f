//! Host-side types for Ice Runner decks
//!
//! Everything here is plain Rust data with no scripting runtime attached.
//! The scripting crate builds these values from a designer's deck script and
//! copies them into a [`DeckSettings`] registry that outlives the script VM.

pub mod config;
pub mod deck;
pub mod map;
pub mod physics;

pub use deck::DeckSettings;
pub use map::{Color, Description, Difficulty, Dimensions, MapFactory, MapKit};
pub use physics::PhysicsManager;
