//! Flattened scene graph output.
//!
//! `FlatMeshEntry` is the result of walking the scene graph: one entry per
//! mesh node, with its composed world matrix and resolved color.
//! [`bake`] merges the entries into a single world-space vertex buffer.

use glam::Mat4;

use crate::core::Error;
use crate::core::color::Rgb;
use crate::core::types::Result;
use crate::math::Aabb;
use crate::mesh::{MeshId, MeshLibrary, Vertex};

use super::node::SceneNodeId;

/// One drawable entry in the flattened scene.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlatMeshEntry {
    /// Scene node this entry was produced from.
    pub node: SceneNodeId,
    /// Geometry in the plant's mesh library.
    pub mesh: MeshId,
    /// Object-to-world matrix.
    pub world_transform: Mat4,
    /// Material color after foliage resolution.
    pub color: Rgb,
}

/// Range of a [`BakedScene`] produced by one flattened entry.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BakedObject {
    pub node: SceneNodeId,
    pub color: Rgb,
    pub first_vertex: u32,
    pub vertex_count: u32,
    pub first_index: u32,
    pub index_count: u32,
}

/// World-space geometry of a whole scene in one indexed buffer.
///
/// Indices are absolute into `vertices`.
#[derive(Clone, Debug, Default)]
pub struct BakedScene {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    pub objects: Vec<BakedObject>,
}

impl BakedScene {
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn bounds(&self) -> Option<Aabb> {
        Aabb::from_points(self.vertices.iter().map(Vertex::position))
    }

    /// Vertices of one object.
    pub fn object_vertices(&self, object: &BakedObject) -> &[Vertex] {
        let start = object.first_vertex as usize;
        &self.vertices[start..start + object.vertex_count as usize]
    }

    /// Absolute indices of one object.
    pub fn object_indices(&self, object: &BakedObject) -> &[u32] {
        let start = object.first_index as usize;
        &self.indices[start..start + object.index_count as usize]
    }
}

/// Transform every entry's mesh into world space and merge the results.
///
/// Fails with [`Error::Export`] if an entry references a mesh missing from
/// `meshes`.
pub fn bake(entries: &[FlatMeshEntry], meshes: &MeshLibrary) -> Result<BakedScene> {
    let mut scene = BakedScene::default();

    for entry in entries {
        let mesh = meshes.get(entry.mesh).ok_or_else(|| {
            Error::Export(format!("mesh {} not found in library", entry.mesh.0))
        })?;

        let normal_matrix = entry.world_transform.inverse().transpose();
        let first_vertex = scene.vertices.len() as u32;
        let first_index = scene.indices.len() as u32;

        scene.vertices.extend(mesh.positions.iter().zip(&mesh.normals).map(|(p, n)| {
            Vertex::new(
                entry.world_transform.transform_point3(*p),
                normal_matrix.transform_vector3(*n).normalize_or_zero(),
            )
        }));
        scene.indices.extend(mesh.indices.iter().map(|i| i + first_vertex));

        scene.objects.push(BakedObject {
            node: entry.node,
            color: entry.color,
            first_vertex,
            vertex_count: mesh.vertex_count() as u32,
            first_index,
            index_count: mesh.indices.len() as u32,
        });
    }

    Ok(scene)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::primitives;
    use glam::Vec3;

    fn entry(mesh: MeshId, node: u64, transform: Mat4) -> FlatMeshEntry {
        FlatMeshEntry {
            node: SceneNodeId(node),
            mesh,
            world_transform: transform,
            color: Rgb::WHITE,
        }
    }

    #[test]
    fn test_bake_offsets_indices_per_object() {
        let mut meshes = MeshLibrary::new();
        let id = meshes.add(primitives::cylinder(0.1, 0.1, 0.5, 6));
        let (verts, idx) = {
            let m = meshes.get(id).unwrap();
            (m.vertex_count() as u32, m.indices.len() as u32)
        };

        let entries = [
            entry(id, 1, Mat4::IDENTITY),
            entry(id, 2, Mat4::from_translation(Vec3::X)),
        ];
        let baked = bake(&entries, &meshes).unwrap();

        assert_eq!(baked.vertices.len() as u32, verts * 2);
        assert_eq!(baked.objects.len(), 2);
        assert_eq!(baked.objects[1].first_vertex, verts);
        assert_eq!(baked.objects[1].first_index, idx);
        assert_eq!(*baked.indices.iter().max().unwrap(), verts * 2 - 1);
        assert!(baked.object_indices(&baked.objects[1]).iter().all(|&i| i >= verts));
    }

    #[test]
    fn test_bake_transforms_to_world() {
        let mut meshes = MeshLibrary::new();
        let id = meshes.add(primitives::sphere(1.0, 8, 6));
        let offset = Vec3::new(0.0, 5.0, 0.0);
        let entries = [entry(id, 1, Mat4::from_translation(offset))];

        let baked = bake(&entries, &meshes).unwrap();
        for v in baked.object_vertices(&baked.objects[0]) {
            assert!(((v.position() - offset).length() - 1.0).abs() < 1e-4);
            assert!((v.normal().length() - 1.0).abs() < 1e-4);
        }
        let bounds = baked.bounds().unwrap();
        assert!((bounds.min - Vec3::new(-1.0, 4.0, -1.0)).length() < 1e-4);
        assert!((bounds.max - Vec3::new(1.0, 6.0, 1.0)).length() < 1e-4);
    }

    #[test]
    fn test_bake_buffer_sizes() {
        let mut meshes = MeshLibrary::new();
        let id = meshes.add(primitives::cylinder(0.1, 0.2, 1.0, 5));
        let baked = bake(&[entry(id, 1, Mat4::IDENTITY)], &meshes).unwrap();

        assert_eq!(baked.vertex_bytes().len(), baked.vertices.len() * 24);
        assert_eq!(baked.index_bytes().len(), baked.indices.len() * 4);
        assert_eq!(baked.triangle_count(), meshes.get(id).unwrap().triangle_count());
    }

    #[test]
    fn test_bake_missing_mesh_is_export_error() {
        let meshes = MeshLibrary::new();
        let err = bake(&[entry(MeshId(4), 1, Mat4::IDENTITY)], &meshes).unwrap_err();
        assert!(matches!(err, Error::Export(_)));
    }

    #[test]
    fn test_bake_empty() {
        let baked = bake(&[], &MeshLibrary::new()).unwrap();
        assert!(baked.vertices.is_empty());
        assert!(baked.bounds().is_none());
    }
}
