//! A small retained scene graph.
//!
//! Nodes live in an arena and reference each other by [`NodeId`]. Nodes are
//! only ever appended and a parent always exists before its children, so a
//! parent's index is always lower than any of its descendants'. World
//! transforms can therefore be resolved in one forward pass.

use crate::material::{Geometry, Material};
use glam::{Mat4, Quat, Vec3};

/// Index of a node inside a [`SceneGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Local translation, rotation and scale of a node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Transform {
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::IDENTITY
        }
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Renderable payload of a mesh node.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub geometry: Geometry,
    pub material: Material,
    /// Whether pointer rays can hit this mesh.
    pub pickable: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Group,
    Mesh(Mesh),
}

#[derive(Debug, Clone)]
pub struct Node {
    pub name: Option<String>,
    pub transform: Transform,
    pub kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    pub fn group(transform: Transform) -> Self {
        Self {
            name: None,
            transform,
            kind: NodeKind::Group,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn mesh(transform: Transform, mesh: Mesh) -> Self {
        Self {
            kind: NodeKind::Mesh(mesh),
            ..Self::group(transform)
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn as_mesh(&self) -> Option<&Mesh> {
        match &self.kind {
            NodeKind::Mesh(mesh) => Some(mesh),
            NodeKind::Group => None,
        }
    }
}

/// Arena-backed scene graph with a single root group.
#[derive(Debug, Clone)]
pub struct SceneGraph {
    nodes: Vec<Node>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::group(Transform::IDENTITY)],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Attach `node` under `parent` and return its id.
    pub fn add(&mut self, parent: NodeId, mut node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        node.parent = Some(parent);
        node.children.clear();
        self.nodes.push(node);
        self.nodes[parent.0].children.push(id);
        id
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    #[cfg(test)]
    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(NodeId)
    }

    /// Depth-first search for a node named `name`, starting at (and
    /// including) `from`.
    pub fn find_by_name(&self, from: NodeId, name: &str) -> Option<NodeId> {
        let mut stack = vec![from];
        while let Some(id) = stack.pop() {
            let node = &self.nodes[id.0];
            if node.name.as_deref() == Some(name) {
                return Some(id);
            }
            stack.extend(node.children.iter().rev().copied());
        }
        None
    }

    /// World matrix of a single node.
    pub fn world_matrix(&self, id: NodeId) -> Mat4 {
        let node = &self.nodes[id.0];
        let local = node.transform.matrix();
        match node.parent {
            Some(parent) => self.world_matrix(parent) * local,
            None => local,
        }
    }

    /// World matrices of every node, indexed by [`NodeId::index`].
    pub fn world_matrices(&self) -> Vec<Mat4> {
        let mut out: Vec<Mat4> = Vec::with_capacity(self.nodes.len());
        for node in &self.nodes {
            let local = node.transform.matrix();
            let world = match node.parent {
                Some(parent) => out[parent.0] * local,
                None => local,
            };
            out.push(world);
        }
        out
    }

    /// Transform a point from `id`'s local space into world space.
    pub fn local_to_world(&self, id: NodeId, point: Vec3) -> Vec3 {
        self.world_matrix(id).transform_point3(point)
    }

    /// World orientation of `id`, decomposed from its world matrix.
    pub fn world_rotation(&self, id: NodeId) -> Quat {
        let (_, rotation, _) = self.world_matrix(id).to_scale_rotation_translation();
        rotation
    }
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_find_by_name_searches_subtree() {
        let mut graph = SceneGraph::new();
        let a = graph.add(graph.root(), Node::group(Transform::IDENTITY).with_name("a"));
        let b = graph.add(a, Node::group(Transform::IDENTITY).with_name("b"));
        let c = graph.add(graph.root(), Node::group(Transform::IDENTITY).with_name("c"));

        assert_eq!(graph.find_by_name(graph.root(), "b"), Some(b));
        assert_eq!(graph.find_by_name(a, "a"), Some(a));
        assert_eq!(graph.find_by_name(a, "c"), None);
        assert_eq!(graph.find_by_name(c, "missing"), None);
        assert_eq!(graph.node(b).parent(), Some(a));
    }

    #[test]
    fn test_local_to_world_composes_parents() {
        let mut graph = SceneGraph::new();
        let stage = graph.add(
            graph.root(),
            Node::group(Transform::from_translation(Vec3::new(0.0, -0.5, 0.0))),
        );
        let turned = graph.add(
            stage,
            Node::group(
                Transform::from_translation(Vec3::new(1.0, 0.0, 0.0))
                    .with_rotation(Quat::from_rotation_y(FRAC_PI_2)),
            ),
        );

        let p = graph.local_to_world(turned, Vec3::new(0.0, 0.0, 1.0));
        assert!((p - Vec3::new(2.0, -0.5, 0.0)).length() < 1e-5);

        let q = graph.world_rotation(turned);
        assert!(q.angle_between(Quat::from_rotation_y(FRAC_PI_2)) < 1e-4);
    }

    #[test]
    fn test_world_matrices_match_single_lookup() {
        let mut graph = SceneGraph::new();
        let a = graph.add(
            graph.root(),
            Node::group(Transform::from_translation(Vec3::X).with_scale(Vec3::splat(2.0))),
        );
        let b = graph.add(a, Node::group(Transform::from_translation(Vec3::Y)));
        let all = graph.world_matrices();
        assert_eq!(all.len(), graph.len());
        assert!(all[b.index()].abs_diff_eq(graph.world_matrix(b), 1e-6));
    }
}
