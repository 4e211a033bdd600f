//! Side branches attached around the main stem.
//!
//! Azimuths are kept apart by rejection sampling with a fixed attempt
//! budget. Each branch leans outward along its azimuth and remembers that
//! rest pose; animation always starts from it and never accumulates.

use std::f32::consts::TAU;

use glam::{Vec2, Vec3};

use crate::core::RandomSource;
use crate::math::{tilt_magnitude, wrapped_angle_distance};
use crate::scene::{LocalTransform, SceneGraph, SceneNodeId};

use super::Growth;
use super::placement::{place_flower, place_leaves};
use super::stem::{Stem, build_branch_stem};

/// Result of one azimuth draw.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AngleSample {
    pub angle: f32,
    /// True when every attempt collided and the last draw was kept anyway.
    pub exhausted: bool,
    pub attempts: u32,
}

/// Draw an azimuth at least `min_separation` from every angle in `used`.
///
/// After `max_attempts` rejected draws the last one is returned with
/// `exhausted` set.
pub fn sample_branch_angle(
    rng: &mut dyn RandomSource,
    used: &[f32],
    min_separation: f32,
    max_attempts: u32,
) -> AngleSample {
    let max_attempts = max_attempts.max(1);
    let mut angle = 0.0;
    for attempt in 1..=max_attempts {
        angle = rng.next_f32() * TAU;
        let clear = used
            .iter()
            .all(|&u| wrapped_angle_distance(u, angle) >= min_separation);
        if clear {
            return AngleSample {
                angle,
                exhausted: false,
                attempts: attempt,
            };
        }
    }
    AngleSample {
        angle,
        exhausted: true,
        attempts: max_attempts,
    }
}

/// A side branch: a stem plus its attachment on the main stem.
#[derive(Clone, Debug, PartialEq)]
pub struct Branch {
    pub stem: Stem,
    attach_segment: usize,
    angle: f32,
    tilt: f32,
    height_factor: f32,
    original_rotation: Vec2,
    separation_exhausted: bool,
}

impl Branch {
    /// The branch's group node, child of the main stem group.
    pub fn node(&self) -> SceneNodeId {
        self.stem.node()
    }

    /// Index of the main stem segment this branch grows from.
    pub fn attach_segment(&self) -> usize {
        self.attach_segment
    }

    /// Azimuth around the main stem (radians).
    pub fn angle(&self) -> f32 {
        self.angle
    }

    /// Initial outward tilt (radians).
    pub fn tilt(&self) -> f32 {
        self.tilt
    }

    /// Attachment height as a fraction of the host segment.
    pub fn height_factor(&self) -> f32 {
        self.height_factor
    }

    /// Rest pose as `(x, z)` Euler angles, fixed at creation.
    pub fn original_rotation(&self) -> Vec2 {
        self.original_rotation
    }

    /// Whether the azimuth was accepted without meeting the separation.
    pub fn separation_exhausted(&self) -> bool {
        self.separation_exhausted
    }

    /// Current `(x, z)` rotation of the branch group.
    pub fn rotation(&self, graph: &SceneGraph) -> Vec2 {
        graph
            .transform(self.node())
            .map(|t| Vec2::new(t.rotation.x, t.rotation.z))
            .unwrap_or(self.original_rotation)
    }

    /// Current combined tilt.
    pub fn tilt_magnitude(&self, graph: &SceneGraph) -> f32 {
        tilt_magnitude(self.rotation(graph))
    }

    /// Set the `(x, z)` rotation of the branch group, keeping its y rotation.
    pub fn set_rotation(&self, graph: &mut SceneGraph, rotation: Vec2) {
        if let Some(t) = graph.transform_mut(self.node()) {
            t.rotation.x = rotation.x;
            t.rotation.z = rotation.y;
        }
    }
}

/// Attach side branches to `main`, each with leaves and possibly a flower.
///
/// Per branch the draws are: host segment, azimuth, tilt, branch stem,
/// attachment height, leaf count and leaves, flower chance and flower.
/// Returns no branches if the main stem is too short to host any.
pub(crate) fn attach_branches(growth: &mut Growth<'_>, main: &Stem) -> Vec<Branch> {
    let config = growth.config;
    let cfg = &config.branches;

    if main.segment_count() < 2 {
        log::debug!("Main stem has {} segments, no room for branches", main.segment_count());
        return Vec::new();
    }

    let count_span = (cfg.max_count - cfg.min_count + 1) as usize;
    let count = cfg.min_count as usize + growth.rng.index(count_span);

    let mut used_angles: Vec<f32> = Vec::with_capacity(count);
    let mut branches = Vec::with_capacity(count);

    for k in 1..=count {
        // never the top segment
        let attach_segment = growth.rng.index(main.segment_count() - 1);

        let sample = sample_branch_angle(
            &mut *growth.rng,
            &used_angles,
            cfg.min_separation,
            cfg.max_attempts,
        );
        if sample.exhausted {
            log::warn!(
                "Branch {} azimuth {:.3} kept after {} attempts without {:.3} rad separation",
                k,
                sample.angle,
                sample.attempts,
                cfg.min_separation
            );
        }
        used_angles.push(sample.angle);
        let angle = sample.angle;

        let tilt = cfg.min_tilt + growth.rng.next_f32() * cfg.tilt_range;

        let mut stem = build_branch_stem(growth, main.node(), &format!("branch_{k}"));

        let height_factor = growth.rng.range(cfg.min_height_factor, cfg.max_height_factor);
        let host = &main.segments[attach_segment];
        let position = Vec3::new(
            angle.cos() * host.radius_top,
            host.center_y + height_factor * host.height - host.height / 2.0,
            angle.sin() * host.radius_top,
        );
        let original_rotation = Vec2::new(angle.sin() * tilt, -angle.cos() * tilt);
        growth.graph.set_transform(
            stem.node(),
            LocalTransform::from_position(position).with_rotation(Vec3::new(
                original_rotation.x,
                0.0,
                original_rotation.y,
            )),
        );

        let leaf_span = (cfg.max_leaves - cfg.min_leaves + 1) as usize;
        let leaf_count = cfg.min_leaves as usize + growth.rng.index(leaf_span);
        let leaf_max = stem.total_height() * cfg.leaf_max_fraction;
        place_leaves(growth, &mut stem, cfg.leaf_min_height, leaf_max, Some(leaf_count));

        if growth.rng.chance_above(cfg.flower_threshold) {
            place_flower(growth, &mut stem, cfg.flower_scale);
        }

        log::debug!(
            "Branch {}: segment {}, azimuth {:.3}, tilt {:.3}, {} segments, {} leaves, flower: {}",
            k,
            attach_segment,
            angle,
            tilt,
            stem.segment_count(),
            stem.leaf_count(),
            stem.has_flower()
        );

        branches.push(Branch {
            stem,
            attach_segment,
            angle,
            tilt,
            height_factor,
            original_rotation,
            separation_exhausted: sample.exhausted,
        });
    }

    branches
}
