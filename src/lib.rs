//! plant-twin - A procedural potted plant that reacts to moisture and light

pub mod core;
pub mod math;
pub mod mesh;
pub mod scene;
pub mod plant;

pub use plant::{LeafColor, Plant, PlantConfig, health_score};
pub use plant_twin_states as states;
