//! Scene graph holding the plant's mesh hierarchy

pub mod export;
pub mod flatten;
pub mod graph;
pub mod node;

pub use export::{save_obj, write_obj};
pub use flatten::{BakedObject, BakedScene, FlatMeshEntry, bake};
pub use graph::SceneGraph;
pub use node::{LocalTransform, Material, NodeContent, SceneNode, SceneNodeId};
