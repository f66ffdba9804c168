//! Scene graph trait and the in-memory implementation
//!
//! Provides the narrow node/bounds/projection contract the entity core
//! consumes. A real renderer plugs in its own [`SceneGraph`].

use super::Camera;
use crate::foundation::math::{Mat4, Point3, Transform, Vec2, Vec3};
use slotmap::{new_key_type, SlotMap};
use std::cell::RefCell;
use std::rc::Rc;

new_key_type! {
    /// Handle to a node in a scene graph
    pub struct NodeId;
}

/// Shared single-threaded handle to a scene graph
pub type SharedSceneGraph = Rc<RefCell<dyn SceneGraph>>;

/// Axis-Aligned Bounding Box for spatial queries
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner of the bounding box
    pub min: Vec3,
    /// Maximum corner of the bounding box
    pub max: Vec3,
}

impl Aabb {
    /// Create a new AABB from min and max points
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Create an AABB centered at a point with given extents
    pub fn from_center_extents(center: Vec3, extents: Vec3) -> Self {
        Self {
            min: center - extents,
            max: center + extents,
        }
    }

    /// Tightest box enclosing every point, `None` for an empty iterator
    pub fn from_points<I: IntoIterator<Item = Vec3>>(points: I) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        let mut bounds = Self::new(first, first);
        for point in points {
            bounds.min = bounds.min.inf(&point);
            bounds.max = bounds.max.sup(&point);
        }
        Some(bounds)
    }

    /// Get the center of the AABB
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Full size along each axis
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// The eight corners
    pub fn corners(&self) -> [Vec3; 8] {
        let (a, b) = (self.min, self.max);
        [
            Vec3::new(a.x, a.y, a.z),
            Vec3::new(b.x, a.y, a.z),
            Vec3::new(a.x, b.y, a.z),
            Vec3::new(b.x, b.y, a.z),
            Vec3::new(a.x, a.y, b.z),
            Vec3::new(b.x, a.y, b.z),
            Vec3::new(a.x, b.y, b.z),
            Vec3::new(b.x, b.y, b.z),
        ]
    }

    /// Tightest axis-aligned box enclosing this box after `matrix`
    pub fn transformed(&self, matrix: &Mat4) -> Self {
        let corners = self
            .corners()
            .map(|corner| matrix.transform_point(&Point3::from(corner)).coords);
        Self::from_points(corners).unwrap_or(*self)
    }
}

/// What a node represents
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodeKind {
    /// Loaded model (possibly skinned, expensive to query)
    Model {
        /// Number of meshes in the model
        mesh_count: usize,
        /// Whether the meshes cast shadows
        cast_shadow: bool,
    },
    /// Invisible box used only for screen-space tracking
    TrackingProxy {
        /// Box geometry size
        size: Vec3,
    },
    /// Inspection panel anchor following another node
    PanelAnchor {
        /// Node being tracked
        target: NodeId,
    },
}

/// One node of the scene
#[derive(Debug, Clone, PartialEq)]
pub struct SceneNode {
    /// Display name
    pub name: String,
    /// Kind-specific data
    pub kind: NodeKind,
    /// Placement in world space
    pub transform: Transform,
    /// Geometry bounds in local space, if the node has geometry
    pub local_bounds: Option<Aabb>,
    /// Rendered or not
    pub visible: bool,
}

impl SceneNode {
    /// A visible model node
    pub fn model(name: impl Into<String>, local_bounds: Aabb, mesh_count: usize) -> Self {
        Self {
            name: name.into(),
            kind: NodeKind::Model {
                mesh_count,
                cast_shadow: false,
            },
            transform: Transform::identity(),
            local_bounds: Some(local_bounds),
            visible: true,
        }
    }

    /// An invisible box of `bounds`' size centred on `bounds`
    pub fn tracking_proxy(name: impl Into<String>, bounds: &Aabb) -> Self {
        let size = bounds.size();
        Self {
            name: name.into(),
            kind: NodeKind::TrackingProxy { size },
            transform: Transform::from_position(bounds.center()),
            local_bounds: Some(Aabb::from_center_extents(Vec3::zeros(), size * 0.5)),
            visible: false,
        }
    }

    /// A panel anchor following `target`
    pub fn panel_anchor(name: impl Into<String>, target: NodeId) -> Self {
        Self {
            name: name.into(),
            kind: NodeKind::PanelAnchor { target },
            transform: Transform::identity(),
            local_bounds: None,
            visible: true,
        }
    }
}

/// Scene graph contract consumed by the entity core
pub trait SceneGraph {
    /// Add a node
    fn add(&mut self, node: SceneNode) -> NodeId;

    /// Detach a node, returning it
    fn remove(&mut self, id: NodeId) -> Option<SceneNode>;

    /// Detach a node and free its geometry/material resources
    fn dispose(&mut self, id: NodeId) -> bool;

    /// Look up a node
    fn node(&self, id: NodeId) -> Option<&SceneNode>;

    /// Look up a node mutably
    fn node_mut(&mut self, id: NodeId) -> Option<&mut SceneNode>;

    /// World-space bounds of a node
    fn world_bounds(&self, id: NodeId) -> Option<Aabb>;

    /// Screen-space position of a node
    fn project_to_screen(&self, id: NodeId) -> Option<Vec2>;

    /// Number of attached nodes
    fn len(&self) -> usize;

    /// Whether the graph has no nodes
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Flat in-memory scene graph
///
/// Nodes carry world transforms directly (no hierarchy). Used by headless
/// runs and tests.
#[derive(Debug, Default)]
pub struct SimpleSceneGraph {
    nodes: SlotMap<NodeId, SceneNode>,
    camera: Camera,
    disposed_resources: usize,
}

impl SimpleSceneGraph {
    /// Create an empty graph with the default camera
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap into a shared handle
    pub fn into_shared(self) -> SharedSceneGraph {
        Rc::new(RefCell::new(self))
    }

    /// Count of nodes whose resources were freed through [`SceneGraph::dispose`]
    pub fn disposed_resources(&self) -> usize {
        self.disposed_resources
    }

    fn bounds_of(&self, id: NodeId, depth: usize) -> Option<Aabb> {
        let node = self.nodes.get(id)?;
        match (node.kind, node.local_bounds) {
            (NodeKind::PanelAnchor { target }, _) if depth < 8 => self.bounds_of(target, depth + 1),
            (_, Some(local)) => Some(local.transformed(&node.transform.to_matrix())),
            (_, None) => Some(Aabb::new(node.transform.position, node.transform.position)),
        }
    }
}

impl SceneGraph for SimpleSceneGraph {
    fn add(&mut self, node: SceneNode) -> NodeId {
        log::trace!("Scene add '{}'", node.name);
        self.nodes.insert(node)
    }

    fn remove(&mut self, id: NodeId) -> Option<SceneNode> {
        self.nodes.remove(id)
    }

    fn dispose(&mut self, id: NodeId) -> bool {
        match self.nodes.remove(id) {
            Some(node) => {
                log::trace!("Scene dispose '{}'", node.name);
                self.disposed_resources += 1;
                true
            }
            None => false,
        }
    }

    fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(id)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(id)
    }

    fn world_bounds(&self, id: NodeId) -> Option<Aabb> {
        self.bounds_of(id, 0)
    }

    fn project_to_screen(&self, id: NodeId) -> Option<Vec2> {
        let bounds = self.world_bounds(id)?;
        self.camera.project(&Point3::from(bounds.center()))
    }

    fn len(&self) -> usize {
        self.nodes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_box() -> Aabb {
        Aabb::new(Vec3::new(-1.0, 0.0, -1.0), Vec3::new(1.0, 2.0, 1.0))
    }

    #[test]
    fn test_world_bounds_follow_transform() {
        let mut graph = SimpleSceneGraph::new();
        let mut model = SceneNode::model("fox", unit_box(), 1);
        model.transform.set_uniform_scale(0.5);
        model.transform.position = Vec3::new(2.0, 0.0, 0.0);
        let id = graph.add(model);

        let bounds = graph.world_bounds(id).unwrap();
        assert_relative_eq!(bounds.min, Vec3::new(1.5, 0.0, -0.5));
        assert_relative_eq!(bounds.max, Vec3::new(2.5, 1.0, 0.5));
    }

    #[test]
    fn test_tracking_proxy_matches_bounds() {
        let mut graph = SimpleSceneGraph::new();
        let bounds = Aabb::new(Vec3::new(1.0, 0.0, 1.0), Vec3::new(3.0, 4.0, 2.0));
        let proxy = SceneNode::tracking_proxy("proxy", &bounds);
        assert!(!proxy.visible);
        let id = graph.add(proxy);

        let world = graph.world_bounds(id).unwrap();
        assert_relative_eq!(world.min, bounds.min);
        assert_relative_eq!(world.max, bounds.max);
    }

    #[test]
    fn test_panel_anchor_projects_through_target() {
        let mut graph = SimpleSceneGraph::new();
        let target = graph.add(SceneNode::model("box", Aabb::from_center_extents(Vec3::zeros(), Vec3::repeat(0.5)), 1));
        let anchor = graph.add(SceneNode::panel_anchor("panel", target));

        assert_eq!(graph.project_to_screen(anchor), graph.project_to_screen(target));
        assert!(graph.project_to_screen(anchor).is_some());
    }

    #[test]
    fn test_dispose_counts_and_removes() {
        let mut graph = SimpleSceneGraph::new();
        let id = graph.add(SceneNode::model("m", unit_box(), 1));
        assert!(graph.dispose(id));
        assert!(!graph.dispose(id));
        assert_eq!(graph.disposed_resources(), 1);
        assert!(graph.is_empty());
    }

    #[test]
    fn test_from_points_empty() {
        assert!(Aabb::from_points(Vec::new()).is_none());
    }
}
