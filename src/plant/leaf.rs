//! Leaves and the per-stem leaf group.

use std::f32::consts::{FRAC_PI_2, TAU};

use glam::Vec3;

use crate::scene::{LocalTransform, Material, SceneGraph, SceneNodeId};

use super::Growth;
use super::stem::Segment;

/// One leaf: a connector group on the stem surface holding the blade mesh.
#[derive(Clone, Debug, PartialEq)]
pub struct Leaf {
    /// Connector node, positioned on the stem and yawed to face outward.
    pub connector: SceneNodeId,
    /// Blade mesh node; its x/z rotation is what droop animates.
    pub blade: SceneNodeId,
    /// Index of the host segment on the stem.
    pub segment_index: usize,
    /// Outward azimuth around the stem.
    pub angle: f32,
    pub scale: f32,
}

/// The leaves of one stem, kept under a dedicated group node.
#[derive(Clone, Debug, PartialEq)]
pub struct LeafGroup {
    node: SceneNodeId,
    leaves: Vec<Leaf>,
}

impl LeafGroup {
    pub fn new(node: SceneNodeId) -> Self {
        Self {
            node,
            leaves: Vec::new(),
        }
    }

    pub fn node(&self) -> SceneNodeId {
        self.node
    }

    pub fn len(&self) -> usize {
        self.leaves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }

    pub fn leaves(&self) -> &[Leaf] {
        &self.leaves
    }

    /// Discard every leaf and its nodes.
    pub fn clear(&mut self, graph: &mut SceneGraph) {
        graph.clear_children(self.node);
        self.leaves.clear();
    }

    /// Replace all leaves with `count` fresh ones spread over
    /// `[min_height, max_height]` of the stem.
    ///
    /// Leaf `i` sits at `progress = i / count` of the range, on segment
    /// `floor(progress * segments)`. With no segments the group is left
    /// empty.
    pub(crate) fn regenerate(
        &mut self,
        growth: &mut Growth<'_>,
        segments: &[Segment],
        min_height: f32,
        max_height: f32,
        count: usize,
    ) {
        self.clear(growth.graph);

        if segments.is_empty() {
            log::debug!("Skipping {} leaves: stem has no segments", count);
            return;
        }

        let config = growth.config;
        let cfg = &config.leaves;
        let height_range = max_height - min_height;

        for i in 0..count {
            let scale = growth.rng.range(cfg.min_scale, cfg.max_scale);

            let progress = i as f32 / count as f32;
            let height_on_stem = min_height + progress * height_range;
            let segment_index = ((progress * segments.len() as f32) as usize).min(segments.len() - 1);
            let segment = &segments[segment_index];

            let local_height =
                height_on_stem - min_height - segment_index as f32 * segment.height / 2.0;
            let y = segment.bottom_y() + local_height;

            let angle = growth.rng.next_f32() * TAU;
            let radius = segment.radius_top;
            let connector = growth.graph.add_group(
                self.node,
                "leaf",
                LocalTransform::from_position(Vec3::new(
                    angle.cos() * radius,
                    y,
                    angle.sin() * radius,
                ))
                .with_rotation(Vec3::new(0.0, angle, 0.0)),
            );

            let rot_x = FRAC_PI_2 + growth.rng.jitter(cfg.orientation_jitter);
            let rot_z = -FRAC_PI_2 + growth.rng.jitter(cfg.orientation_jitter);
            let blade = growth.graph.add_mesh(
                connector,
                "blade",
                growth.organs.leaf_blade,
                Material::Foliage,
                LocalTransform::identity()
                    .with_rotation(Vec3::new(rot_x, 0.0, rot_z))
                    .with_uniform_scale(scale),
            );

            self.leaves.push(Leaf {
                connector,
                blade,
                segment_index,
                angle,
                scale,
            });
        }

        log::debug!("Regenerated {} leaves on group {:?}", self.leaves.len(), self.node);
    }

    /// Set every blade's x/z rotation, dropping any per-leaf jitter.
    pub fn set_blade_rotation(&self, graph: &mut SceneGraph, x: f32, z: f32) {
        for leaf in &self.leaves {
            if let Some(t) = graph.transform_mut(leaf.blade) {
                t.rotation.x = x;
                t.rotation.z = z;
            }
        }
    }
}
