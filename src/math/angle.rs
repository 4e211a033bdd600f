//! Angle helpers for branch placement and posing.

use std::f32::consts::TAU;

use crate::core::types::Vec2;

/// Shortest distance between two azimuths on the circle, in `[0, π]`.
pub fn wrapped_angle_distance(a: f32, b: f32) -> f32 {
    let diff = (a - b).rem_euclid(TAU);
    diff.min(TAU - diff)
}

/// Combined tilt of an (x, z) rotation pair.
pub fn tilt_magnitude(rotation: Vec2) -> f32 {
    rotation.length()
}
