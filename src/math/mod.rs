//! Mathematical utilities

pub mod aabb;
pub mod angle;

pub use aabb::Aabb;
pub use angle::{tilt_magnitude, wrapped_angle_distance};
