//! Environment-driven posing of stems and leaves.
//!
//! Every pose is computed absolutely from the current levels and, for side
//! branches, from the rest pose captured at creation. Applying the same
//! levels twice therefore gives the same scene.
//!
//! Branch order of operations: sway around the rest pose, lift the tilt back
//! up to the floor, then clamp each axis into the window around the rest
//! pose. The clamp runs last and can in principle undo part of the lift.

use std::f32::consts::FRAC_PI_2;

use glam::Vec2;

use crate::math::tilt_magnitude;
use crate::scene::SceneGraph;

use super::branch::Branch;
use super::config::AnimationConfig;
use super::stem::Stem;

/// Below this magnitude a tilt has no usable direction.
const DIRECTION_EPSILON: f32 = 1e-6;

/// How far the environment is from ideal, each in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnvironmentFactors {
    /// `1 - min(light, saturation) / saturation`.
    pub light: f32,
    /// `1 - moisture / 100`.
    pub moisture: f32,
}

impl EnvironmentFactors {
    /// Expects sanitized levels: moisture in `[0, 100]`, light `>= 0`.
    pub fn new(moisture: f32, light: f32, cfg: &AnimationConfig) -> Self {
        Self {
            light: 1.0 - light.min(cfg.light_saturation) / cfg.light_saturation,
            moisture: 1.0 - moisture / 100.0,
        }
    }
}

/// Main stem `(x, z)` lean.
pub fn main_stem_rotation(factors: EnvironmentFactors, cfg: &AnimationConfig) -> Vec2 {
    Vec2::new(
        factors.moisture * cfg.main_moisture_lean,
        factors.light * cfg.main_light_lean,
    )
}

/// Amplitude step for side branch `k` (1-based).
pub fn branch_variation(k: usize, cfg: &AnimationConfig) -> f32 {
    (k % 3) as f32 * cfg.variation_step
}

/// Rest pose plus environment sway, before any constraint.
pub fn swayed_branch_rotation(
    original: Vec2,
    k: usize,
    factors: EnvironmentFactors,
    cfg: &AnimationConfig,
) -> Vec2 {
    let amplitude = 1.0 + branch_variation(k, cfg);
    let x_sway = factors.moisture * cfg.branch_moisture_sway - cfg.branch_moisture_sway / 2.0;
    let z_sway = factors.light * cfg.branch_light_sway - cfg.branch_light_sway / 2.0;
    Vec2::new(original.x + x_sway * amplitude, original.y + z_sway * amplitude)
}

/// Rescale `rotation` up to `min_tilt` if it leans less than that.
///
/// A rotation with no direction is pushed along the rest pose instead.
pub fn enforce_min_tilt(rotation: Vec2, original: Vec2, min_tilt: f32) -> Vec2 {
    let magnitude = tilt_magnitude(rotation);
    if magnitude >= min_tilt {
        return rotation;
    }
    if magnitude > DIRECTION_EPSILON {
        return rotation * (min_tilt / magnitude);
    }
    original.try_normalize().unwrap_or(Vec2::X) * min_tilt
}

/// Clamp each axis to `original ± max_deviation`.
pub fn clamp_to_window(rotation: Vec2, original: Vec2, max_deviation: f32) -> Vec2 {
    rotation.clamp(original - max_deviation, original + max_deviation)
}

/// Full side branch pose for the given environment.
pub fn branch_rotation(
    original: Vec2,
    k: usize,
    factors: EnvironmentFactors,
    cfg: &AnimationConfig,
) -> Vec2 {
    let swayed = swayed_branch_rotation(original, k, factors, cfg);
    let lifted = enforce_min_tilt(swayed, original, cfg.min_tilt);
    clamp_to_window(lifted, original, cfg.max_deviation)
}

/// Blade `(x, z)` rotation for a moisture level.
pub fn leaf_droop(moisture: f32, cfg: &AnimationConfig) -> Vec2 {
    let droop = 1.0 - moisture / 100.0;
    Vec2::new(FRAC_PI_2 + droop * cfg.droop_x, -FRAC_PI_2 - droop * cfg.droop_z)
}

/// Pose the main stem and every side branch.
pub(crate) fn repose(
    graph: &mut SceneGraph,
    main: &Stem,
    branches: &[Branch],
    factors: EnvironmentFactors,
    cfg: &AnimationConfig,
) {
    let lean = main_stem_rotation(factors, cfg);
    if let Some(t) = graph.transform_mut(main.node()) {
        t.rotation.x = lean.x;
        t.rotation.z = lean.y;
    }

    for (i, branch) in branches.iter().enumerate() {
        let k = i + 1;
        let rotation = branch_rotation(branch.original_rotation(), k, factors, cfg);
        branch.set_rotation(graph, rotation);
        log::trace!(
            "Branch {} pose ({:.3}, {:.3}), tilt {:.3}",
            k,
            rotation.x,
            rotation.y,
            tilt_magnitude(rotation)
        );
    }
}

/// Set the droop of every leaf on the plant.
pub(crate) fn droop_leaves(
    graph: &mut SceneGraph,
    main: &Stem,
    branches: &[Branch],
    moisture: f32,
    cfg: &AnimationConfig,
) {
    let droop = leaf_droop(moisture, cfg);
    main.leaves.set_blade_rotation(graph, droop.x, droop.y);
    for branch in branches {
        branch.stem.leaves.set_blade_rotation(graph, droop.x, droop.y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> AnimationConfig {
        AnimationConfig::default()
    }

    #[test]
    fn test_environment_factors() {
        let f = EnvironmentFactors::new(100.0, 500.0, &cfg());
        assert_eq!(f.moisture, 0.0);
        assert_eq!(f.light, 0.0);

        let f = EnvironmentFactors::new(0.0, 0.0, &cfg());
        assert_eq!(f.moisture, 1.0);
        assert_eq!(f.light, 1.0);

        // light saturates at 500 for posing
        let f = EnvironmentFactors::new(50.0, 1500.0, &cfg());
        assert_eq!(f.light, 0.0);
        assert!((f.moisture - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_main_stem_rotation() {
        let f = EnvironmentFactors::new(25.0, 100.0, &cfg());
        let r = main_stem_rotation(f, &cfg());
        assert!((r.x - 0.75 * 0.3).abs() < 1e-6);
        assert!((r.y - 0.8 * 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_branch_variation_cycles() {
        let c = cfg();
        assert_eq!(branch_variation(1, &c), 0.2);
        assert_eq!(branch_variation(2, &c), 0.4);
        assert_eq!(branch_variation(3, &c), 0.0);
        assert_eq!(branch_variation(4, &c), 0.2);
    }

    #[test]
    fn test_sway_is_neutral_at_midpoint() {
        // moisture factor 0.5 and light factor 0.5 cancel the offsets
        let f = EnvironmentFactors::new(50.0, 250.0, &cfg());
        let original = Vec2::new(0.4, -0.6);
        let r = swayed_branch_rotation(original, 2, f, &cfg());
        assert!((r - original).length() < 1e-6);
    }

    #[test]
    fn test_sway_extremes() {
        let original = Vec2::new(0.0, -0.8);
        let dry_dark = EnvironmentFactors::new(0.0, 0.0, &cfg());
        let r = swayed_branch_rotation(original, 3, dry_dark, &cfg());
        assert!((r.x - 0.1).abs() < 1e-6);
        assert!((r.y - (-0.8 + 0.15)).abs() < 1e-6);

        let r = swayed_branch_rotation(original, 2, dry_dark, &cfg());
        assert!((r.x - 0.14).abs() < 1e-6);
        assert!((r.y - (-0.8 + 0.21)).abs() < 1e-6);
    }

    #[test]
    fn test_enforce_min_tilt_rescales() {
        let r = enforce_min_tilt(Vec2::new(0.3, 0.0), Vec2::new(0.6, 0.0), 0.52);
        assert!((r - Vec2::new(0.52, 0.0)).length() < 1e-6);

        let r = enforce_min_tilt(Vec2::new(0.2, -0.2), Vec2::ZERO, 0.52);
        assert!((tilt_magnitude(r) - 0.52).abs() < 1e-6);
        assert!(r.x > 0.0 && r.y < 0.0);
    }

    #[test]
    fn test_enforce_min_tilt_keeps_steep_rotations() {
        let r = Vec2::new(0.5, 0.5);
        assert_eq!(enforce_min_tilt(r, Vec2::ZERO, 0.52), r);
    }

    #[test]
    fn test_enforce_min_tilt_zero_uses_rest_direction() {
        let r = enforce_min_tilt(Vec2::ZERO, Vec2::new(0.0, -0.9), 0.52);
        assert!((r - Vec2::new(0.0, -0.52)).length() < 1e-6);
        assert!(r.is_finite());

        let r = enforce_min_tilt(Vec2::ZERO, Vec2::ZERO, 0.52);
        assert!((tilt_magnitude(r) - 0.52).abs() < 1e-6);
    }

    #[test]
    fn test_clamp_to_window() {
        let original = Vec2::new(0.5, -0.5);
        let r = clamp_to_window(Vec2::new(2.0, -2.0), original, 0.7);
        assert!((r - Vec2::new(1.2, -1.2)).length() < 1e-6);
        let inside = Vec2::new(0.6, -0.3);
        assert_eq!(clamp_to_window(inside, original, 0.7), inside);
    }

    #[test]
    fn test_branch_rotation_constraints_hold_over_grid() {
        let c = cfg();
        let originals = [
            Vec2::new(0.52, 0.0),
            Vec2::new(0.0, -0.52),
            Vec2::new(-0.37, 0.37),
            Vec2::new(0.7, -0.7),
            Vec2::new(-1.0, 0.1),
        ];
        for original in originals {
            for k in 1..=5 {
                for m in [0.0, 20.0, 50.0, 80.0, 100.0] {
                    for l in [0.0, 100.0, 250.0, 500.0, 2000.0] {
                        let f = EnvironmentFactors::new(m, l, &c);
                        let r = branch_rotation(original, k, f, &c);
                        assert!((r.x - original.x).abs() <= 0.7 + 1e-6);
                        assert!((r.y - original.y).abs() <= 0.7 + 1e-6);
                        assert!(tilt_magnitude(r) >= 0.52 - 1e-4, "{original:?} k={k} m={m} l={l}");
                    }
                }
            }
        }
    }

    #[test]
    fn test_leaf_droop() {
        let c = cfg();
        let wet = leaf_droop(100.0, &c);
        assert!((wet.x - FRAC_PI_2).abs() < 1e-6);
        assert!((wet.y + FRAC_PI_2).abs() < 1e-6);

        let dry = leaf_droop(0.0, &c);
        assert!((dry.x - (FRAC_PI_2 + 0.5)).abs() < 1e-6);
        assert!((dry.y - (-FRAC_PI_2 - 0.3)).abs() < 1e-6);
    }
}
