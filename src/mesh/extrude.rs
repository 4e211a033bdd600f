//! Extrusion of a 2D [`Shape`] into a closed, optionally beveled solid.
//!
//! The outline is swept along +Z from `0` to `depth`. With a bevel the solid
//! grows by `bevel_thickness` on both ends and the side walls are pushed out
//! by up to `bevel_size`, following a quarter-circle profile.

use std::f32::consts::FRAC_PI_2;

use crate::core::types::{Vec2, Vec3};
use crate::mesh::MeshData;
use crate::mesh::shape::Shape;
use crate::mesh::triangulate::{signed_area, triangulate};

/// Extrusion parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExtrudeSettings {
    pub depth: f32,
    /// Subdivisions of the straight body along Z.
    pub steps: u32,
    pub bevel_thickness: f32,
    pub bevel_size: f32,
    /// 0 disables the bevel.
    pub bevel_segments: u32,
    /// Samples per curved path segment.
    pub curve_segments: u32,
}

impl Default for ExtrudeSettings {
    fn default() -> Self {
        Self {
            depth: 1.0,
            steps: 1,
            bevel_thickness: 0.2,
            bevel_size: 0.1,
            bevel_segments: 3,
            curve_segments: 12,
        }
    }
}

impl ExtrudeSettings {
    fn bevel_enabled(&self) -> bool {
        self.bevel_segments > 0 && (self.bevel_thickness > 0.0 || self.bevel_size > 0.0)
    }

    /// Z offset and outward inset of every ring, front to back.
    fn rings(&self) -> Vec<(f32, f32)> {
        let steps = self.steps.max(1);
        let mut rings = Vec::new();

        if self.bevel_enabled() {
            for b in 0..self.bevel_segments {
                let t = b as f32 / self.bevel_segments as f32;
                let z = self.bevel_thickness * (t * FRAC_PI_2).cos();
                let size = self.bevel_size * (t * FRAC_PI_2).sin();
                rings.push((-z, size));
            }
        }

        let body_size = if self.bevel_enabled() { self.bevel_size } else { 0.0 };
        for s in 0..=steps {
            rings.push((self.depth * s as f32 / steps as f32, body_size));
        }

        if self.bevel_enabled() {
            for b in (0..self.bevel_segments).rev() {
                let t = b as f32 / self.bevel_segments as f32;
                let z = self.bevel_thickness * (t * FRAC_PI_2).cos();
                let size = self.bevel_size * (t * FRAC_PI_2).sin();
                rings.push((self.depth + z, size));
            }
        }

        rings
    }
}

/// Extrude `shape` into a closed solid with smooth side normals.
///
/// Returns an empty mesh when the outline has fewer than three points.
pub fn extrude(shape: &Shape, settings: &ExtrudeSettings) -> MeshData {
    let mut contour = shape.outline(settings.curve_segments);
    let mut mesh = MeshData::new();
    if contour.len() < 3 {
        return mesh;
    }
    if signed_area(&contour) < 0.0 {
        contour.reverse();
    }

    let n = contour.len();
    let bevel_dirs = bevel_directions(&contour);
    let rings = settings.rings();

    // Side walls: one shared vertex ring per Z layer
    let mut ring_starts = Vec::with_capacity(rings.len());
    for &(z, size) in &rings {
        ring_starts.push(mesh.vertex_count() as u32);
        for (p, dir) in contour.iter().zip(&bevel_dirs) {
            let q = *p + *dir * size;
            mesh.push_vertex(Vec3::new(q.x, q.y, z));
        }
    }
    for pair in ring_starts.windows(2) {
        let (lower, upper) = (pair[0], pair[1]);
        for i in 0..n as u32 {
            let j = (i + 1) % n as u32;
            let (a, b, c, d) = (lower + i, lower + j, upper + j, upper + i);
            mesh.push_triangle(a, b, c);
            mesh.push_triangle(a, c, d);
        }
    }

    // Caps get their own vertices so their normals stay flat
    let triangles = triangulate(&contour);
    let (front_z, front_size) = rings[0];
    let (back_z, back_size) = rings[rings.len() - 1];

    let front_start = mesh.vertex_count() as u32;
    for (p, dir) in contour.iter().zip(&bevel_dirs) {
        let q = *p + *dir * front_size;
        mesh.push_vertex(Vec3::new(q.x, q.y, front_z));
    }
    for t in &triangles {
        // facing -Z
        mesh.push_triangle(
            front_start + t[0] as u32,
            front_start + t[2] as u32,
            front_start + t[1] as u32,
        );
    }

    let back_start = mesh.vertex_count() as u32;
    for (p, dir) in contour.iter().zip(&bevel_dirs) {
        let q = *p + *dir * back_size;
        mesh.push_vertex(Vec3::new(q.x, q.y, back_z));
    }
    for t in &triangles {
        mesh.push_triangle(
            back_start + t[0] as u32,
            back_start + t[1] as u32,
            back_start + t[2] as u32,
        );
    }

    mesh.compute_vertex_normals();
    mesh
}

/// Outward miter direction at each vertex of a counter-clockwise contour,
/// scaled so an inset of `s` moves each edge out by `s`.
fn bevel_directions(contour: &[Vec2]) -> Vec<Vec2> {
    let n = contour.len();
    (0..n)
        .map(|i| {
            let prev = contour[(i + n - 1) % n];
            let cur = contour[i];
            let next = contour[(i + 1) % n];
            let n_in = edge_normal(prev, cur);
            let n_out = edge_normal(cur, next);
            let miter = (n_in + n_out).try_normalize().unwrap_or(n_out);
            // limit spikes at very sharp corners
            let cos = miter.dot(n_out).max(0.25);
            miter / cos
        })
        .collect()
}

fn edge_normal(a: Vec2, b: Vec2) -> Vec2 {
    let d = b - a;
    Vec2::new(d.y, -d.x).try_normalize().unwrap_or(Vec2::ZERO)
}
