//! Flowers: two petal rings around a stamen column, sitting on a calyx.

use std::f32::consts::{FRAC_PI_2, TAU};

use glam::Vec3;

use crate::core::color::Rgb;
use crate::scene::{LocalTransform, Material, SceneGraph, SceneNodeId};

use super::Growth;
use super::shape::PetalRow;
use super::stem::Segment;

const CALYX_COLOR: u32 = 0x2E8B57;
const STAMEN_COLUMN_COLOR: u32 = 0xFF3300;
const ANTHER_COLOR: u32 = 0xFFDD00;
const STAMEN_COLOR: u32 = 0xFFAA00;
const STAMEN_TIP_COLOR: u32 = 0xFFFF00;

const STAMEN_COUNT: u32 = 5;
/// Petals lean back from upright by this much before jitter.
const PETAL_OPENING: f32 = 0.4;

/// One petal node and its jittered color.
#[derive(Clone, Debug, PartialEq)]
pub struct Petal {
    pub node: SceneNodeId,
    pub row: PetalRow,
    pub color: Rgb,
}

/// A built flower. Node handles point into the plant's scene graph.
#[derive(Clone, Debug, PartialEq)]
pub struct Flower {
    /// Flower center group at the top face of the stem.
    pub center: SceneNodeId,
    pub scale: f32,
    /// Palette color shared by every petal before jitter.
    pub base_color: Rgb,
    pub petals: Vec<Petal>,
    pub calyx: SceneNodeId,
    pub stamen_column: SceneNodeId,
    pub anther: SceneNodeId,
    /// `(stamen, tip)` node pairs.
    pub stamens: Vec<(SceneNodeId, SceneNodeId)>,
}

impl Flower {
    pub fn petal_count(&self) -> usize {
        self.petals.len()
    }

    pub fn petals_in(&self, row: PetalRow) -> impl Iterator<Item = &Petal> {
        self.petals.iter().filter(move |p| p.row == row)
    }
}

/// Holder for at most one flower per stem.
#[derive(Clone, Debug, PartialEq)]
pub struct FlowerGroup {
    node: SceneNodeId,
    flower: Option<Flower>,
}

impl FlowerGroup {
    pub fn new(node: SceneNodeId) -> Self {
        Self { node, flower: None }
    }

    pub fn node(&self) -> SceneNodeId {
        self.node
    }

    pub fn flower(&self) -> Option<&Flower> {
        self.flower.as_ref()
    }

    pub fn has_flower(&self) -> bool {
        self.flower.is_some()
    }

    /// Remove the flower, if any.
    pub fn clear(&mut self, graph: &mut SceneGraph) {
        graph.clear_children(self.node);
        self.flower = None;
    }

    /// Grow a flower on the top face of `top`, replacing any existing one.
    ///
    /// Draws the palette index, then per petal (lower ring first) the x and y
    /// orientation jitter followed by the hue and lightness jitter.
    pub(crate) fn bloom(&mut self, growth: &mut Growth<'_>, top: &Segment, scale: f32) {
        self.clear(growth.graph);

        let config = growth.config;
        let cfg = &config.flower;
        let organs = *growth.organs;
        let graph = &mut *growth.graph;
        let rng = &mut *growth.rng;

        let base_color = cfg
            .palette
            .get(rng.index(cfg.palette.len()))
            .map(|&hex| Rgb::from_hex(hex))
            .unwrap_or(Rgb::WHITE);

        let center = graph.add_group(
            self.node,
            "flower_center",
            LocalTransform::from_position(Vec3::new(0.0, top.top_y(), 0.0)).with_uniform_scale(scale),
        );

        let calyx = graph.add_mesh(
            center,
            "calyx",
            organs.calyx,
            Material::Fixed(Rgb::from_hex(CALYX_COLOR)),
            LocalTransform::from_position(Vec3::new(0.0, -0.02, 0.0)),
        );

        let per_row = cfg.petals_per_row;
        let mut petals = Vec::with_capacity(per_row as usize * 2);
        for row in [PetalRow::Lower, PetalRow::Upper] {
            for i in 0..per_row {
                let angle = row.petal_angle(i, per_row);
                let rot_x = FRAC_PI_2 - PETAL_OPENING + rng.jitter(cfg.tilt_jitter);
                let rot_y = rng.jitter(cfg.tilt_jitter);
                let color = base_color.offset_hsl(
                    rng.jitter(cfg.hue_jitter),
                    0.0,
                    rng.jitter(cfg.lightness_jitter),
                );

                let node = graph.add_mesh(
                    center,
                    "petal",
                    organs.petal(row),
                    Material::Fixed(color),
                    LocalTransform::from_position(Vec3::new(0.0, row.height(), 0.0))
                        .with_rotation(Vec3::new(rot_x, rot_y, angle)),
                );
                petals.push(Petal { node, row, color });
            }
        }

        let stamen_column = graph.add_mesh(
            center,
            "stamen_column",
            organs.stamen_column,
            Material::Fixed(Rgb::from_hex(STAMEN_COLUMN_COLOR)),
            LocalTransform::from_position(Vec3::new(0.0, 0.15, 0.0)),
        );
        let anther = graph.add_mesh(
            center,
            "anther",
            organs.anther,
            Material::Fixed(Rgb::from_hex(ANTHER_COLOR)),
            LocalTransform::from_position(Vec3::new(0.0, 0.3, 0.0)),
        );

        let mut stamens = Vec::with_capacity(STAMEN_COUNT as usize);
        for i in 0..STAMEN_COUNT {
            let angle = i as f32 / STAMEN_COUNT as f32 * TAU;
            let stamen = graph.add_mesh(
                center,
                "stamen",
                organs.stamen,
                Material::Fixed(Rgb::from_hex(STAMEN_COLOR)),
                LocalTransform::from_position(Vec3::new(
                    angle.cos() * 0.025,
                    0.27 + (i % 2) as f32 * 0.015,
                    angle.sin() * 0.025,
                ))
                .with_rotation(Vec3::new(FRAC_PI_2 - 0.3, angle, 0.0)),
            );
            let tip = graph.add_mesh(
                stamen,
                "stamen_tip",
                organs.stamen_tip,
                Material::Fixed(Rgb::from_hex(STAMEN_TIP_COLOR)),
                LocalTransform::from_position(Vec3::new(0.0, 0.035, 0.0)),
            );
            stamens.push((stamen, tip));
        }

        self.flower = Some(Flower {
            center,
            scale,
            base_color,
            petals,
            calyx,
            stamen_column,
            anther,
            stamens,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ScriptedSource;
    use crate::plant::stem::{StemParams, build_stem};
    use crate::plant::TestBed;

    fn bloom_on_fresh_stem(bed: &mut TestBed, scale: f32) -> (crate::plant::stem::Stem, SceneGraph) {
        let mut growth = bed.growth();
        let root = growth.graph.root();
        let params = StemParams::main(&growth.config.stem);
        let mut stem = build_stem(&mut growth, root, "stem", &params);
        let top = stem.segments[stem.segments.len() - 1].clone();
        stem.flower.bloom(&mut growth, &top, scale);
        let graph = growth.graph.clone();
        (stem, graph)
    }

    #[test]
    fn test_flower_has_ten_petals() {
        let mut bed = TestBed::new(ScriptedSource::new(vec![0.2, 0.8, 0.5, 0.1]));
        let (stem, graph) = bloom_on_fresh_stem(&mut bed, 1.0);
        let flower = stem.flower.flower().unwrap();

        assert_eq!(flower.petal_count(), 10);
        assert_eq!(flower.petals_in(PetalRow::Lower).count(), 5);
        assert_eq!(flower.petals_in(PetalRow::Upper).count(), 5);
        assert_eq!(flower.stamens.len(), 5);
        // calyx + 10 petals + column + anther + 5 stamens
        assert_eq!(graph.child_count(flower.center), 18);
        for (stamen, tip) in &flower.stamens {
            assert_eq!(graph.get(*tip).unwrap().parent, Some(*stamen));
        }
    }

    #[test]
    fn test_flower_at_stem_top_with_scale() {
        let mut bed = TestBed::new(ScriptedSource::constant(0.5));
        let (stem, graph) = bloom_on_fresh_stem(&mut bed, 0.8);
        let flower = stem.flower.flower().unwrap();
        let t = graph.transform(flower.center).unwrap();
        assert!((t.position.y - 1.25).abs() < 1e-6);
        assert_eq!(t.scale, Vec3::splat(0.8));
        assert_eq!(flower.scale, 0.8);
    }

    #[test]
    fn test_palette_choice() {
        // 0.5 -> index 2 (orange-red); zero jitter keeps petals on the base color
        let mut bed = TestBed::new(ScriptedSource::constant(0.5));
        let (stem, _) = bloom_on_fresh_stem(&mut bed, 1.0);
        let flower = stem.flower.flower().unwrap();
        assert_eq!(flower.base_color.to_hex(), 0xFF4500);
        for petal in &flower.petals {
            assert_eq!(petal.color.to_hex(), 0xFF4500);
        }
    }

    #[test]
    fn test_petal_orientation() {
        let mut bed = TestBed::new(ScriptedSource::constant(0.5));
        let (stem, graph) = bloom_on_fresh_stem(&mut bed, 1.0);
        let flower = stem.flower.flower().unwrap();

        let lower: Vec<&Petal> = flower.petals_in(PetalRow::Lower).collect();
        let upper: Vec<&Petal> = flower.petals_in(PetalRow::Upper).collect();
        let r0 = graph.transform(lower[0].node).unwrap();
        assert!((r0.rotation.x - (FRAC_PI_2 - 0.4)).abs() < 1e-6);
        assert_eq!(r0.rotation.y, 0.0);
        assert_eq!(r0.rotation.z, 0.0);
        assert!((r0.position.y - 0.03).abs() < 1e-6);

        let u0 = graph.transform(upper[0].node).unwrap();
        assert!((u0.rotation.z - TAU / 10.0).abs() < 1e-6);
        assert!((u0.position.y - 0.08).abs() < 1e-6);
    }

    #[test]
    fn test_petal_color_jitter_is_small() {
        let mut bed = TestBed::new(ScriptedSource::new(vec![0.0, 0.99, 0.13, 0.77, 0.4]));
        let (stem, _) = bloom_on_fresh_stem(&mut bed, 1.0);
        let flower = stem.flower.flower().unwrap();
        let (bh, _, bl) = flower.base_color.to_hsl();
        for petal in &flower.petals {
            let (h, _, l) = petal.color.to_hsl();
            let dh = (h - bh).abs().min(1.0 - (h - bh).abs());
            assert!(dh <= 0.026, "hue moved by {dh}");
            assert!((l - bl).abs() <= 0.051, "lightness moved by {}", (l - bl).abs());
        }
    }

    #[test]
    fn test_bloom_replaces_existing_flower() {
        let mut bed = TestBed::new(ScriptedSource::new(vec![0.1, 0.6, 0.3]));
        let mut growth = bed.growth();
        let root = growth.graph.root();
        let params = StemParams::main(&growth.config.stem);
        let mut stem = build_stem(&mut growth, root, "stem", &params);
        let top = stem.segments[4].clone();

        stem.flower.bloom(&mut growth, &top, 1.0);
        let first = stem.flower.flower().unwrap().center;
        let nodes = growth.graph.node_count();

        stem.flower.bloom(&mut growth, &top, 1.0);
        assert!(!growth.graph.contains(first));
        assert_eq!(growth.graph.node_count(), nodes);
        assert_eq!(growth.graph.child_count(stem.flower.node()), 1);
    }

    #[test]
    fn test_clear() {
        let mut bed = TestBed::new(ScriptedSource::constant(0.3));
        let mut growth = bed.growth();
        let root = growth.graph.root();
        let params = StemParams::main(&growth.config.stem);
        let mut stem = build_stem(&mut growth, root, "stem", &params);
        let top = stem.segments[4].clone();
        stem.flower.bloom(&mut growth, &top, 1.0);

        stem.flower.clear(growth.graph);
        assert!(!stem.flower.has_flower());
        assert_eq!(growth.graph.child_count(stem.flower.node()), 0);
    }
}
