//! Scene graph node types
//!
//! Core types for the plant's mesh hierarchy: node IDs, transforms, content
//! variants, materials, and nodes.

use glam::{Mat4, Quat, Vec3};

use crate::core::color::Rgb;
use crate::mesh::MeshId;

/// Unique identifier for a scene graph node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SceneNodeId(pub u64);

/// Local transform relative to the parent node.
///
/// Rotation is stored as XYZ Euler angles in radians so the animator can
/// read and clamp individual axes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LocalTransform {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Default for LocalTransform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl LocalTransform {
    /// Identity transform (no translation, rotation, or scaling).
    pub fn identity() -> Self {
        Self::default()
    }

    /// Create a translation-only transform.
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    pub fn with_rotation(mut self, rotation: Vec3) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_uniform_scale(mut self, scale: f32) -> Self {
        self.scale = Vec3::splat(scale);
        self
    }

    /// Rotation as a quaternion, composed `Rx * Ry * Rz`.
    pub fn quat(&self) -> Quat {
        Quat::from_rotation_x(self.rotation.x)
            * Quat::from_rotation_y(self.rotation.y)
            * Quat::from_rotation_z(self.rotation.z)
    }

    /// Convert to a 4x4 matrix.
    pub fn to_mat4(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.quat(), self.position)
    }
}

/// Surface appearance of a mesh node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Material {
    /// A color chosen when the node was built (stems, petals, flower parts).
    Fixed(Rgb),
    /// Foliage takes the plant's current health color at draw time.
    Foliage,
}

impl Material {
    /// Resolve to a concrete color given the current foliage color.
    pub fn resolve(self, foliage: Rgb) -> Rgb {
        match self {
            Material::Fixed(color) => color,
            Material::Foliage => foliage,
        }
    }
}

/// What a scene node contains.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum NodeContent {
    /// A grouping node with no geometry of its own.
    Group,

    /// A mesh from the plant's mesh library.
    Mesh { mesh: MeshId, material: Material },
}

/// A single node in the scene graph.
#[derive(Clone, Debug)]
pub struct SceneNode {
    pub id: SceneNodeId,
    pub name: String,
    pub parent: Option<SceneNodeId>,
    pub children: Vec<SceneNodeId>,
    pub local_transform: LocalTransform,
    pub content: NodeContent,
}

impl SceneNode {
    /// Create a new scene node.
    pub fn new(id: SceneNodeId, name: impl Into<String>, content: NodeContent) -> Self {
        Self {
            id,
            name: name.into(),
            parent: None,
            children: Vec::new(),
            local_transform: LocalTransform::identity(),
            content,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scene_node_id_equality() {
        let a = SceneNodeId(1);
        let b = SceneNodeId(1);
        let c = SceneNodeId(2);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_local_transform_identity() {
        let t = LocalTransform::identity();
        assert_eq!(t.position, Vec3::ZERO);
        assert_eq!(t.rotation, Vec3::ZERO);
        assert_eq!(t.scale, Vec3::ONE);
        assert_eq!(t.to_mat4(), Mat4::IDENTITY);
    }

    #[test]
    fn test_local_transform_from_position() {
        let pos = Vec3::new(10.0, 5.0, -3.0);
        let t = LocalTransform::from_position(pos);
        let (_, _, translation) = t.to_mat4().to_scale_rotation_translation();
        assert!((translation - pos).length() < 1e-5);
    }

    #[test]
    fn test_local_transform_to_mat4_with_scale() {
        let t = LocalTransform::from_position(Vec3::new(1.0, 2.0, 3.0)).with_uniform_scale(2.0);
        let (scale, _, translation) = t.to_mat4().to_scale_rotation_translation();
        assert!((scale - Vec3::splat(2.0)).length() < 1e-5);
        assert!((translation - Vec3::new(1.0, 2.0, 3.0)).length() < 1e-5);
    }

    #[test]
    fn test_euler_order_x_then_z() {
        // Rotating +Y by x = 90° gives +Z; composing z = 90° first gives -X.
        let t = LocalTransform::identity()
            .with_rotation(Vec3::new(std::f32::consts::FRAC_PI_2, 0.0, std::f32::consts::FRAC_PI_2));
        let v = t.to_mat4().transform_vector3(Vec3::Y);
        // Rx * Rz * Y = Rx * (-X) = -X
        assert!((v - Vec3::NEG_X).length() < 1e-5);
    }

    #[test]
    fn test_material_resolve() {
        let green = Rgb::from_hex(0x32CD32);
        let red = Rgb::from_hex(0xFF0000);
        assert_eq!(Material::Foliage.resolve(green), green);
        assert_eq!(Material::Fixed(red).resolve(green), red);
    }

    #[test]
    fn test_scene_node_new() {
        let node = SceneNode::new(SceneNodeId(0), "root", NodeContent::Group);
        assert_eq!(node.id, SceneNodeId(0));
        assert_eq!(node.name, "root");
        assert!(node.parent.is_none());
        assert!(node.children.is_empty());
    }
}
