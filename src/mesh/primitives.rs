//! Parametric primitives: tapered cylinders, UV spheres and lathe solids.
//!
//! All primitives are centred on the Y axis the way the organ recipes expect:
//! cylinders span `[-height/2, height/2]`, spheres sit at the origin.

use std::f32::consts::{PI, TAU};

use crate::core::types::{Vec2, Vec3};
use crate::mesh::MeshData;

/// Closed tapered cylinder along Y, centred on the origin.
pub fn cylinder(radius_top: f32, radius_bottom: f32, height: f32, radial_segments: u32) -> MeshData {
    let segments = radial_segments.max(3);
    let half = height * 0.5;
    let mut mesh = MeshData::new();

    let ring = |radius: f32, y: f32, mesh: &mut MeshData| -> u32 {
        let start = mesh.vertex_count() as u32;
        for s in 0..segments {
            let theta = s as f32 / segments as f32 * TAU;
            mesh.push_vertex(Vec3::new(radius * theta.sin(), y, radius * theta.cos()));
        }
        start
    };

    // Side
    let top = ring(radius_top, half, &mut mesh);
    let bottom = ring(radius_bottom, -half, &mut mesh);
    for s in 0..segments {
        let t = (s + 1) % segments;
        mesh.push_triangle(top + s, bottom + s, bottom + t);
        mesh.push_triangle(top + s, bottom + t, top + t);
    }

    // Caps
    if radius_top > 0.0 {
        let centre = mesh.push_vertex(Vec3::new(0.0, half, 0.0));
        let rim = ring(radius_top, half, &mut mesh);
        for s in 0..segments {
            let t = (s + 1) % segments;
            mesh.push_triangle(centre, rim + s, rim + t);
        }
    }
    if radius_bottom > 0.0 {
        let centre = mesh.push_vertex(Vec3::new(0.0, -half, 0.0));
        let rim = ring(radius_bottom, -half, &mut mesh);
        for s in 0..segments {
            let t = (s + 1) % segments;
            mesh.push_triangle(centre, rim + t, rim + s);
        }
    }

    mesh.compute_vertex_normals();
    mesh
}

/// UV sphere centred on the origin.
pub fn sphere(radius: f32, width_segments: u32, height_segments: u32) -> MeshData {
    let width = width_segments.max(3);
    let height = height_segments.max(2);
    let mut mesh = MeshData::new();

    for iy in 0..=height {
        let v = iy as f32 / height as f32;
        for ix in 0..=width {
            let u = ix as f32 / width as f32;
            let phi = u * TAU;
            let theta = v * PI;
            mesh.push_vertex(Vec3::new(
                -radius * phi.cos() * theta.sin(),
                radius * theta.cos(),
                radius * phi.sin() * theta.sin(),
            ));
        }
    }

    let stride = width + 1;
    for iy in 0..height {
        for ix in 0..width {
            let a = iy * stride + ix + 1;
            let b = iy * stride + ix;
            let c = (iy + 1) * stride + ix;
            let d = (iy + 1) * stride + ix + 1;
            if iy != 0 {
                mesh.push_triangle(a, b, d);
            }
            if iy != height - 1 {
                mesh.push_triangle(b, c, d);
            }
        }
    }

    mesh.compute_vertex_normals();
    mesh
}

/// Revolve a profile of `(radius, y)` points around the Y axis.
pub fn lathe(profile: &[Vec2], segments: u32) -> MeshData {
    let segments = segments.max(3);
    let mut mesh = MeshData::new();
    if profile.len() < 2 {
        return mesh;
    }

    for s in 0..=segments {
        let phi = s as f32 / segments as f32 * TAU;
        let (sin, cos) = phi.sin_cos();
        for p in profile {
            mesh.push_vertex(Vec3::new(p.x * sin, p.y, p.x * cos));
        }
    }

    let rows = profile.len() as u32;
    for s in 0..segments {
        for j in 0..rows - 1 {
            let a = s * rows + j;
            let b = (s + 1) * rows + j;
            let c = (s + 1) * rows + j + 1;
            let d = s * rows + j + 1;
            mesh.push_triangle(a, b, d);
            mesh.push_triangle(b, c, d);
        }
    }

    mesh.compute_vertex_normals();
    mesh
}
