//! Scene graph collaborator contract
//!
//! Rendering is external. The core only needs to add and remove nodes,
//! compute world-space bounds and project nodes to screen space:
//!
//! ```text
//! Entities (panel / tracking proxy / model)
//!      ↓
//! SceneGraph (contract)
//!      ↓
//! Renderer (external)
//! ```

mod camera;
mod scene_graph;

pub use camera::Camera;
pub use scene_graph::{Aabb, NodeId, NodeKind, SceneGraph, SceneNode, SharedSceneGraph, SimpleSceneGraph};
