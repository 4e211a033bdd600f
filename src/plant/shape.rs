//! Organ shapes: leaf blades, rippled petals and the small flower parts.
//!
//! Every organ of a kind has the same object-space geometry, so each shape is
//! built once per plant into the mesh library and shared through
//! [`OrganMeshes`]. Per-instance variation comes from node transforms.

use std::f32::consts::PI;

use crate::core::types::Vec2;
use crate::mesh::{ExtrudeSettings, MeshData, MeshId, MeshLibrary, Shape, extrude, primitives};

/// Width of the petal edge ripple.
const RIPPLE_AMPLITUDE: f32 = 0.015;
const RIPPLE_FREQUENCY: f32 = 4.0;
/// Edge samples along each side of a petal (t = 0, 0.1, ... 1.0).
const PETAL_EDGE_STEPS: u32 = 10;

/// Outline of a leaf blade: two mirrored quadratic arcs from the stem
/// attachment at the origin to the tip at `(0, 0.4)`.
pub fn leaf_blade_shape() -> Shape {
    let mut shape = Shape::new(Vec2::ZERO);
    shape
        .quadratic_curve_to(0.15, 0.2, 0.0, 0.4)
        .quadratic_curve_to(-0.15, 0.2, 0.0, 0.0);
    shape
}

pub fn leaf_blade_settings() -> ExtrudeSettings {
    ExtrudeSettings {
        depth: 0.03,
        steps: 1,
        bevel_thickness: 0.002,
        bevel_size: 0.005,
        bevel_segments: 1,
        curve_segments: 12,
    }
}

/// Shallow beveled leaf blade solid.
pub fn leaf_blade_mesh() -> MeshData {
    extrude(&leaf_blade_shape(), &leaf_blade_settings())
}

/// The two petal rings of a flower.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PetalRow {
    /// Wider, longer, flatter petals at the base.
    Lower,
    /// Narrower petals offset by half a step, sitting higher.
    Upper,
}

impl PetalRow {
    pub fn width(self) -> f32 {
        match self {
            PetalRow::Lower => 0.2,
            PetalRow::Upper => 0.18,
        }
    }

    pub fn length(self) -> f32 {
        match self {
            PetalRow::Lower => 0.45,
            PetalRow::Upper => 0.4,
        }
    }

    /// Peak out-of-plane bulge along the petal.
    pub fn curve(self) -> f32 {
        match self {
            PetalRow::Lower => 0.08,
            PetalRow::Upper => 0.06,
        }
    }

    /// Height of the ring above the flower center.
    pub fn height(self) -> f32 {
        match self {
            PetalRow::Lower => 0.03,
            PetalRow::Upper => 0.08,
        }
    }

    /// Angular offset of the ring, in petal steps.
    pub fn angle_offset(self) -> f32 {
        match self {
            PetalRow::Lower => 0.0,
            PetalRow::Upper => 0.5,
        }
    }

    /// Azimuth of petal `index` in a ring of `count`.
    pub fn petal_angle(self, index: u32, count: u32) -> f32 {
        (index as f32 + self.angle_offset()) / count.max(1) as f32 * 2.0 * PI
    }
}

fn upper_edge(t: f32, width: f32) -> f32 {
    width * (t * PI).sin() + (t * PI * RIPPLE_FREQUENCY).sin() * RIPPLE_AMPLITUDE
}

fn lower_edge(t: f32, width: f32) -> f32 {
    -(width * (t * PI).sin() + (t * PI * RIPPLE_FREQUENCY + 1.0).sin() * RIPPLE_AMPLITUDE)
}

/// Petal outline along +X with rippled edges and a rounded tip.
pub fn petal_shape(row: PetalRow) -> Shape {
    let (width, length) = (row.width(), row.length());
    let mut shape = Shape::new(Vec2::ZERO);

    let mut prev_x = 0.0;
    for k in 0..=PETAL_EDGE_STEPS {
        let t = k as f32 / PETAL_EDGE_STEPS as f32;
        let (x, y) = (t * length, upper_edge(t, width));
        if k == 0 {
            shape.line_to(x, y);
        } else {
            // controls stay ahead of the previous sample so the edge never loops back
            shape.bezier_curve_to((x - 0.05).max(prev_x), y - 0.01, x - 0.02, y + 0.01, x, y);
        }
        prev_x = x;
    }

    // rounded tip bridging to the first lower edge sample
    let (tip_upper, tip_lower) = (upper_edge(1.0, width), lower_edge(1.0, width));
    shape.bezier_curve_to(
        length + 0.02,
        tip_upper + 0.01,
        length + 0.02,
        tip_lower - 0.01,
        length,
        tip_lower,
    );

    for k in (1..PETAL_EDGE_STEPS).rev() {
        let t = k as f32 / PETAL_EDGE_STEPS as f32;
        let (x, y) = (t * length, lower_edge(t, width));
        shape.bezier_curve_to(x + 0.03, y - 0.01, x + 0.01, y + 0.01, x, y);
    }

    shape.line_to(0.0, 0.0);
    shape
}

pub fn petal_settings() -> ExtrudeSettings {
    ExtrudeSettings {
        depth: 0.02,
        steps: 2,
        bevel_thickness: 0.01,
        bevel_size: 0.01,
        bevel_segments: 3,
        curve_segments: 12,
    }
}

/// Extruded petal bent out of plane by `curve * sin(pi * x / length)`.
pub fn petal_mesh(row: PetalRow) -> MeshData {
    let length = row.length();
    let curve = row.curve();
    let mut mesh = extrude(&petal_shape(row), &petal_settings());
    mesh.displace(|mut p| {
        p.z += curve * (p.x / length * PI).sin();
        p
    });
    mesh.compute_vertex_normals();
    mesh
}

/// Shared meshes for every organ kind of one plant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrganMeshes {
    pub leaf_blade: MeshId,
    pub petal_lower: MeshId,
    pub petal_upper: MeshId,
    pub calyx: MeshId,
    pub stamen_column: MeshId,
    pub anther: MeshId,
    pub stamen: MeshId,
    pub stamen_tip: MeshId,
}

impl OrganMeshes {
    /// Build every organ mesh into `library`.
    pub fn build(library: &mut MeshLibrary) -> Self {
        Self {
            leaf_blade: library.add(leaf_blade_mesh()),
            petal_lower: library.add(petal_mesh(PetalRow::Lower)),
            petal_upper: library.add(petal_mesh(PetalRow::Upper)),
            calyx: library.add(primitives::cylinder(0.08, 0.05, 0.08, 8)),
            stamen_column: library.add(primitives::cylinder(0.015, 0.015, 0.3, 8)),
            anther: library.add(primitives::sphere(0.04, 12, 12)),
            stamen: library.add(primitives::cylinder(0.008, 0.008, 0.06, 4)),
            stamen_tip: library.add(primitives::sphere(0.01, 8, 8)),
        }
    }

    pub fn petal(&self, row: PetalRow) -> MeshId {
        match row {
            PetalRow::Lower => self.petal_lower,
            PetalRow::Upper => self.petal_upper,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::triangulate::{signed_area, triangulate};

    #[test]
    fn test_leaf_outline_is_symmetric() {
        let outline = leaf_blade_shape().outline(12);
        // start + 12 samples per arc, closing point dropped
        assert_eq!(outline.len(), 24);
        let max_x = outline.iter().map(|p| p.x).fold(f32::MIN, f32::max);
        let min_x = outline.iter().map(|p| p.x).fold(f32::MAX, f32::min);
        assert!((max_x + min_x).abs() < 1e-6);
        assert!((max_x - 0.075).abs() < 1e-3);
    }

    #[test]
    fn test_leaf_blade_bounds() {
        let mesh = leaf_blade_mesh();
        let b = mesh.bounds().unwrap();
        assert!((b.min.z + 0.002).abs() < 1e-6);
        assert!((b.max.z - 0.032).abs() < 1e-6);
        // the bevel pushes the outline out a few millimetres
        assert!(b.max.y > 0.4 && b.max.y < 0.42);
        assert!(b.min.y < 0.0 && b.min.y > -0.02);
    }

    #[test]
    fn test_petal_outline_reaches_tip() {
        for row in [PetalRow::Lower, PetalRow::Upper] {
            let outline = petal_shape(row).outline(12);
            let max_x = outline.iter().map(|p| p.x).fold(f32::MIN, f32::max);
            assert!((max_x - row.length()).abs() < 0.02);
            assert!(outline.iter().any(|p| p.y > 0.15));
            assert!(outline.iter().any(|p| p.y < -0.15));
        }
    }

    #[test]
    fn test_petal_upper_edge_never_doubles_back() {
        for row in [PetalRow::Lower, PetalRow::Upper] {
            let outline = petal_shape(row).outline(petal_settings().curve_segments);
            let upper: Vec<Vec2> = outline.into_iter().filter(|p| p.y > 0.02).collect();
            assert!(upper.len() > 50);
            for pair in upper.windows(2) {
                assert!(pair[1].x >= pair[0].x - 1e-6, "{row:?}: {pair:?}");
            }
        }
    }

    #[test]
    fn test_petal_cap_triangulates_cleanly() {
        for row in [PetalRow::Lower, PetalRow::Upper] {
            let outline = petal_shape(row).outline(petal_settings().curve_segments);
            let tris = triangulate(&outline);
            assert_eq!(tris.len(), outline.len() - 2);

            let mut area = 0.0;
            for t in &tris {
                let (a, b, c) = (outline[t[0]], outline[t[1]], outline[t[2]]);
                let twice = (b - a).perp_dot(c - a);
                assert!(twice > -1e-6, "{row:?}: folded triangle {t:?}");
                area += twice * 0.5;
            }
            assert!((area - signed_area(&outline).abs()).abs() < 1e-4);
        }
    }

    #[test]
    fn test_petal_mesh_is_curved() {
        let flat = extrude(&petal_shape(PetalRow::Lower), &petal_settings());
        let curved = petal_mesh(PetalRow::Lower);
        assert_eq!(flat.vertex_count(), curved.vertex_count());
        let flat_z = flat.bounds().unwrap().max.z;
        let curved_z = curved.bounds().unwrap().max.z;
        assert!(curved_z > flat_z + 0.05);
        assert!(curved.normals.iter().all(|n| n.is_finite()));
    }

    #[test]
    fn test_petal_angles() {
        let lower = PetalRow::Lower.petal_angle(1, 5);
        let upper = PetalRow::Upper.petal_angle(0, 5);
        assert!((lower - 2.0 * PI / 5.0).abs() < 1e-6);
        assert!((upper - PI / 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_organ_meshes_are_distinct_and_nonempty() {
        let mut library = MeshLibrary::new();
        let organs = OrganMeshes::build(&mut library);
        assert_eq!(library.len(), 8);
        assert_ne!(organs.petal(PetalRow::Lower), organs.petal(PetalRow::Upper));
        for (_, mesh) in library.iter() {
            assert!(!mesh.is_empty());
        }
    }
}
