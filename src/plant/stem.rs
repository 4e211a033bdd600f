//! Stem topology: stacks of tapered segments carrying leaves and a flower.
//!
//! A stem is a group node with three children, in order: the segment stack,
//! the leaf group and the flower group. Side branches are added to the main
//! stem's group after these.

use glam::Vec3;

use crate::core::color::Rgb;
use crate::mesh::primitives;
use crate::scene::{LocalTransform, Material, NodeContent, SceneNodeId};

use super::Growth;
use super::config::{BranchConfig, StemConfig};
use super::flower::FlowerGroup;
use super::leaf::LeafGroup;

/// How a segment's bottom radius relates to its top radius.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BottomRadius {
    /// Bottom radius is the next segment's top radius.
    ContinueTaper,
    /// Bottom radius is a fixed fraction of the top radius.
    RatioOfTop(f32),
}

/// Resolved geometry for one stem.
#[derive(Clone, Debug, PartialEq)]
pub struct StemParams {
    pub segment_count: u32,
    pub segment_height: f32,
    pub base_radius: f32,
    pub taper: f32,
    pub bottom: BottomRadius,
    pub tilt_spread: f32,
    pub radial_segments: u32,
    pub color: Rgb,
}

impl StemParams {
    /// Main stem geometry from the recipe.
    pub fn main(cfg: &StemConfig) -> Self {
        Self {
            segment_count: cfg.segments,
            segment_height: cfg.segment_height,
            base_radius: cfg.base_radius,
            taper: cfg.taper,
            bottom: BottomRadius::ContinueTaper,
            tilt_spread: cfg.tilt_spread,
            radial_segments: cfg.radial_segments,
            color: Rgb::from_hex(cfg.color),
        }
    }

    /// Branch geometry with an already drawn segment count and height.
    pub fn branch(cfg: &BranchConfig, color: Rgb, segment_count: u32, segment_height: f32) -> Self {
        Self {
            segment_count,
            segment_height,
            base_radius: cfg.base_radius,
            taper: cfg.taper,
            bottom: BottomRadius::RatioOfTop(cfg.bottom_ratio),
            tilt_spread: cfg.tilt_spread,
            radial_segments: cfg.radial_segments,
            color,
        }
    }

    pub fn radius_top(&self, index: u32) -> f32 {
        self.base_radius * (1.0 - index as f32 * self.taper)
    }

    pub fn radius_bottom(&self, index: u32) -> f32 {
        match self.bottom {
            BottomRadius::ContinueTaper => self.radius_top(index + 1),
            BottomRadius::RatioOfTop(ratio) => self.radius_top(index) * ratio,
        }
    }
}

/// One tapered cylinder of a stem, in the stem's local frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Segment {
    pub node: SceneNodeId,
    pub index: usize,
    pub center_y: f32,
    pub height: f32,
    pub radius_top: f32,
    pub radius_bottom: f32,
}

impl Segment {
    pub fn bottom_y(&self) -> f32 {
        self.center_y - self.height / 2.0
    }

    pub fn top_y(&self) -> f32 {
        self.center_y + self.height / 2.0
    }
}

/// A stem: segment stack plus its leaf and flower groups.
#[derive(Clone, Debug, PartialEq)]
pub struct Stem {
    node: SceneNodeId,
    segments_node: SceneNodeId,
    pub segments: Vec<Segment>,
    pub leaves: LeafGroup,
    pub flower: FlowerGroup,
}

impl Stem {
    /// The stem's group node; its transform poses the whole stem.
    pub fn node(&self) -> SceneNodeId {
        self.node
    }

    pub fn segments_node(&self) -> SceneNodeId {
        self.segments_node
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    pub fn top_segment(&self) -> Option<&Segment> {
        self.segments.last()
    }

    /// Sum of segment heights.
    pub fn total_height(&self) -> f32 {
        self.segments.iter().map(|s| s.height).sum()
    }

    pub fn leaf_count(&self) -> usize {
        self.leaves.len()
    }

    pub fn has_flower(&self) -> bool {
        self.flower.has_flower()
    }
}

/// Build a stem under `parent` with the stem group at the identity transform.
///
/// Segment `i` is centred at `h/2 + h*i`. Every segment but the first gets an
/// independent cosmetic tilt on z then x, drawn from `params.tilt_spread`.
pub(crate) fn build_stem(
    growth: &mut Growth<'_>,
    parent: SceneNodeId,
    name: &str,
    params: &StemParams,
) -> Stem {
    let node = growth.graph.add_child(parent, name, NodeContent::Group);
    let segments_node = growth.graph.add_child(node, "segments", NodeContent::Group);

    let h = params.segment_height;
    let mut segments = Vec::with_capacity(params.segment_count as usize);
    for i in 0..params.segment_count {
        let radius_top = params.radius_top(i);
        let radius_bottom = params.radius_bottom(i);
        let center_y = h / 2.0 + h * i as f32;

        let mut rotation = Vec3::ZERO;
        if i > 0 {
            rotation.z = growth.rng.jitter(params.tilt_spread);
            rotation.x = growth.rng.jitter(params.tilt_spread);
        }

        let mesh = growth.meshes.add(primitives::cylinder(
            radius_top,
            radius_bottom,
            h,
            params.radial_segments,
        ));
        let segment_node = growth.graph.add_mesh(
            segments_node,
            format!("segment_{i}"),
            mesh,
            Material::Fixed(params.color),
            LocalTransform::from_position(Vec3::new(0.0, center_y, 0.0)).with_rotation(rotation),
        );

        segments.push(Segment {
            node: segment_node,
            index: i as usize,
            center_y,
            height: h,
            radius_top,
            radius_bottom,
        });
    }

    let leaves = LeafGroup::new(growth.graph.add_child(node, "leaves", NodeContent::Group));
    let flower = FlowerGroup::new(growth.graph.add_child(node, "flower", NodeContent::Group));

    Stem {
        node,
        segments_node,
        segments,
        leaves,
        flower,
    }
}

/// Build the main stem and lift it onto the soil.
pub(crate) fn build_main_stem(growth: &mut Growth<'_>, parent: SceneNodeId) -> Stem {
    let config = growth.config;
    let params = StemParams::main(&config.stem);
    let base_height = config.stem.base_height;

    let stem = build_stem(growth, parent, "main_stem", &params);
    growth
        .graph
        .set_transform(stem.node, LocalTransform::from_position(Vec3::new(0.0, base_height, 0.0)));
    stem
}

/// Build a branch stem with a random segment count and height.
///
/// Draws the segment count, then the segment height, then the segment tilts.
pub(crate) fn build_branch_stem(growth: &mut Growth<'_>, parent: SceneNodeId, name: &str) -> Stem {
    let config = growth.config;
    let cfg = &config.branches;
    let span = (cfg.max_segments - cfg.min_segments + 1) as usize;
    let segment_count = cfg.min_segments + growth.rng.index(span) as u32;
    let segment_height = cfg.min_segment_height + growth.rng.next_f32() * cfg.segment_height_range;

    let params = StemParams::branch(
        cfg,
        Rgb::from_hex(config.stem.color),
        segment_count,
        segment_height,
    );
    build_stem(growth, parent, name, &params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ScriptedSource;
    use crate::plant::TestBed;

    #[test]
    fn test_main_params_taper() {
        let params = StemParams::main(&StemConfig::default());
        assert!((params.radius_top(0) - 0.05).abs() < 1e-6);
        assert!((params.radius_bottom(0) - 0.045).abs() < 1e-6);
        assert!((params.radius_top(4) - 0.03).abs() < 1e-6);
        assert!((params.radius_bottom(4) - 0.025).abs() < 1e-6);
    }

    #[test]
    fn test_branch_params_bottom_ratio() {
        let params = StemParams::branch(&BranchConfig::default(), Rgb::WHITE, 4, 0.2);
        assert!((params.radius_top(1) - 0.024).abs() < 1e-6);
        assert!((params.radius_bottom(1) - 0.0192).abs() < 1e-6);
    }

    #[test]
    fn test_build_stem_stacks_segments() {
        let mut bed = TestBed::new(ScriptedSource::constant(0.5));
        let mut growth = bed.growth();
        let root = growth.graph.root();
        let params = StemParams::main(&growth.config.stem);
        let stem = build_stem(&mut growth, root, "stem", &params);

        assert_eq!(stem.segment_count(), 5);
        for (i, seg) in stem.segments.iter().enumerate() {
            assert!((seg.center_y - (0.125 + 0.25 * i as f32)).abs() < 1e-6);
            assert_eq!(seg.index, i);
        }
        for pair in stem.segments.windows(2) {
            assert!((pair[0].top_y() - pair[1].bottom_y()).abs() < 1e-6);
            assert!(pair[1].radius_top < pair[0].radius_top);
        }
        assert!((stem.total_height() - 1.25).abs() < 1e-6);
        assert_eq!(growth.graph.children(stem.node()).count(), 3);
    }

    #[test]
    fn test_first_segment_untilted() {
        let mut bed = TestBed::new(ScriptedSource::constant(0.9));
        let mut growth = bed.growth();
        let root = growth.graph.root();
        let params = StemParams::main(&growth.config.stem);
        let stem = build_stem(&mut growth, root, "stem", &params);

        let first = growth.graph.transform(stem.segments[0].node).unwrap();
        assert_eq!(first.rotation, Vec3::ZERO);
        for seg in &stem.segments[1..] {
            let r = growth.graph.transform(seg.node).unwrap().rotation;
            // jitter(0.1) at 0.9 = 0.04
            assert!((r.x - 0.04).abs() < 1e-5);
            assert!((r.z - 0.04).abs() < 1e-5);
        }
    }

    #[test]
    fn test_tilt_draw_order_z_then_x() {
        let mut bed = TestBed::new(ScriptedSource::new(vec![1.0, 0.0]));
        let mut growth = bed.growth();
        let root = growth.graph.root();
        let params = StemParams::main(&growth.config.stem);
        let stem = build_stem(&mut growth, root, "stem", &params);

        let r = growth.graph.transform(stem.segments[1].node).unwrap().rotation;
        assert!(r.z > 0.0);
        assert!(r.x < 0.0);
    }

    #[test]
    fn test_main_stem_sits_on_soil() {
        let mut bed = TestBed::new(ScriptedSource::constant(0.5));
        let mut growth = bed.growth();
        let root = growth.graph.root();
        let stem = build_main_stem(&mut growth, root);
        let t = growth.graph.transform(stem.node()).unwrap();
        assert!((t.position.y - 0.65).abs() < 1e-6);
    }

    #[test]
    fn test_branch_stem_draws() {
        // count draw 0.99 -> 5 segments, height draw 0.5 -> 0.2
        let mut bed = TestBed::new(ScriptedSource::new(vec![0.99, 0.5, 0.5]));
        let mut growth = bed.growth();
        let root = growth.graph.root();
        let stem = build_branch_stem(&mut growth, root, "branch");

        assert_eq!(stem.segment_count(), 5);
        assert!((stem.segments[0].height - 0.2).abs() < 1e-6);
        assert!((stem.segments[0].radius_top - 0.03).abs() < 1e-6);
        assert!((stem.segments[0].radius_bottom - 0.024).abs() < 1e-6);
    }

    #[test]
    fn test_branch_segment_count_range() {
        for v in [0.0, 0.33, 0.34, 0.66, 0.67, 0.999] {
            let mut bed = TestBed::new(ScriptedSource::constant(v));
            let mut growth = bed.growth();
            let root = growth.graph.root();
            let stem = build_branch_stem(&mut growth, root, "branch");
            assert!((3..=5).contains(&stem.segment_count()));
        }
    }
}
