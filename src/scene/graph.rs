//! Scene graph: CPU-side hierarchy of the plant's nodes.
//!
//! Groups carry transforms, meshes carry a [`MeshId`] and a [`Material`].
//! `flatten()` walks the tree, composes world matrices on the way down and
//! produces a flat `Vec<FlatMeshEntry>` a renderer can draw directly.

use std::collections::HashMap;

use glam::Mat4;

use crate::core::color::Rgb;
use crate::mesh::MeshId;

use super::flatten::FlatMeshEntry;
use super::node::{LocalTransform, Material, NodeContent, SceneNode, SceneNodeId};

/// CPU-side scene graph owned by a plant.
#[derive(Clone, Debug)]
pub struct SceneGraph {
    nodes: HashMap<SceneNodeId, SceneNode>,
    root: SceneNodeId,
    next_id: u64,
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new("root")
    }
}

impl SceneGraph {
    /// Create a new scene graph with a root Group node.
    pub fn new(root_name: impl Into<String>) -> Self {
        let root_id = SceneNodeId(0);
        let root_node = SceneNode::new(root_id, root_name, NodeContent::Group);

        let mut nodes = HashMap::new();
        nodes.insert(root_id, root_node);

        Self {
            nodes,
            root: root_id,
            next_id: 1,
        }
    }

    /// Get the root node ID.
    pub fn root(&self) -> SceneNodeId {
        self.root
    }

    fn alloc_id(&mut self) -> SceneNodeId {
        let id = SceneNodeId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Add a child node under `parent`. Returns the new node's ID.
    pub fn add_child(
        &mut self,
        parent: SceneNodeId,
        name: impl Into<String>,
        content: NodeContent,
    ) -> SceneNodeId {
        let id = self.alloc_id();
        let mut node = SceneNode::new(id, name, content);
        node.parent = Some(parent);

        self.nodes.insert(id, node);

        if let Some(parent_node) = self.nodes.get_mut(&parent) {
            parent_node.children.push(id);
        }

        id
    }

    /// Add an empty group under `parent` with the given transform.
    pub fn add_group(
        &mut self,
        parent: SceneNodeId,
        name: impl Into<String>,
        transform: LocalTransform,
    ) -> SceneNodeId {
        let id = self.add_child(parent, name, NodeContent::Group);
        self.set_transform(id, transform);
        id
    }

    /// Add a mesh node under `parent` with the given transform.
    pub fn add_mesh(
        &mut self,
        parent: SceneNodeId,
        name: impl Into<String>,
        mesh: MeshId,
        material: Material,
        transform: LocalTransform,
    ) -> SceneNodeId {
        let id = self.add_child(parent, name, NodeContent::Mesh { mesh, material });
        self.set_transform(id, transform);
        id
    }

    /// Remove a node and its entire subtree. Cannot remove the root.
    pub fn remove(&mut self, id: SceneNodeId) {
        if id == self.root {
            return;
        }

        // Collect subtree IDs (BFS)
        let mut to_remove = vec![id];
        let mut i = 0;
        while i < to_remove.len() {
            let current = to_remove[i];
            if let Some(node) = self.nodes.get(&current) {
                to_remove.extend_from_slice(&node.children);
            }
            i += 1;
        }

        if let Some(parent_id) = self.nodes.get(&id).and_then(|n| n.parent) {
            if let Some(parent) = self.nodes.get_mut(&parent_id) {
                parent.children.retain(|c| *c != id);
            }
        }

        for nid in to_remove {
            self.nodes.remove(&nid);
        }
    }

    /// Remove every descendant of `id`, keeping the node itself.
    pub fn clear_children(&mut self, id: SceneNodeId) {
        let children: Vec<SceneNodeId> = self.children(id).collect();
        for child in children {
            self.remove(child);
        }
    }

    /// Set the local transform of a node.
    pub fn set_transform(&mut self, id: SceneNodeId, transform: LocalTransform) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.local_transform = transform;
        }
    }

    /// Local transform of a node.
    pub fn transform(&self, id: SceneNodeId) -> Option<&LocalTransform> {
        self.nodes.get(&id).map(|n| &n.local_transform)
    }

    /// Mutable local transform of a node.
    pub fn transform_mut(&mut self, id: SceneNodeId) -> Option<&mut LocalTransform> {
        self.nodes.get_mut(&id).map(|n| &mut n.local_transform)
    }

    pub fn get(&self, id: SceneNodeId) -> Option<&SceneNode> {
        self.nodes.get(&id)
    }

    pub fn get_mut(&mut self, id: SceneNodeId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(&id)
    }

    pub fn contains(&self, id: SceneNodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Iterate over the children of a node.
    pub fn children(&self, id: SceneNodeId) -> impl Iterator<Item = SceneNodeId> + '_ {
        self.nodes
            .get(&id)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
            .iter()
            .copied()
    }

    /// Number of direct children of a node.
    pub fn child_count(&self, id: SceneNodeId) -> usize {
        self.nodes.get(&id).map_or(0, |n| n.children.len())
    }

    /// Total number of nodes in the graph.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// World matrix of a node, composed from the root down.
    pub fn world_transform(&self, id: SceneNodeId) -> Option<Mat4> {
        let mut node = self.nodes.get(&id)?;
        let mut world = node.local_transform.to_mat4();
        while let Some(parent_id) = node.parent {
            node = self.nodes.get(&parent_id)?;
            world = node.local_transform.to_mat4() * world;
        }
        Some(world)
    }

    /// Walk the tree and collect every mesh node with its world matrix.
    ///
    /// Foliage materials resolve to `foliage`. Entries come out in depth-first
    /// order, children in insertion order.
    pub fn flatten(&self, foliage: Rgb) -> Vec<FlatMeshEntry> {
        let mut out = Vec::new();
        self.collect_meshes(self.root, Mat4::IDENTITY, foliage, &mut out);
        out
    }

    fn collect_meshes(
        &self,
        node_id: SceneNodeId,
        parent_world: Mat4,
        foliage: Rgb,
        out: &mut Vec<FlatMeshEntry>,
    ) {
        let node = match self.nodes.get(&node_id) {
            Some(n) => n,
            None => return,
        };

        let world = parent_world * node.local_transform.to_mat4();

        match node.content {
            NodeContent::Group => {}
            NodeContent::Mesh { mesh, material } => {
                out.push(FlatMeshEntry {
                    node: node_id,
                    mesh,
                    world_transform: world,
                    color: material.resolve(foliage),
                });
            }
        }

        for &child in &node.children {
            self.collect_meshes(child, world, foliage, out);
        }
    }
}
