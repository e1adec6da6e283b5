//! Retained-mode scene graph.
//!
//! Nodes live in an arena owned by [`SceneGraph`] and are addressed by
//! [`NodeId`]. A node carries a local transform (position plus Euler XYZ
//! rotation), a visibility flag, optional mesh, shadow flags, and children
//! that inherit its transform. Hiding a node hides its whole subtree.

use glam::{EulerRot, Mat4, Quat, Vec3};

use crate::render::mesh::{Geometry, Material, Mesh};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone)]
pub struct Node {
    pub position: Vec3,
    pub rotation: Vec3,
    pub visible: bool,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
    mesh: Option<Mesh>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    fn empty(mesh: Option<Mesh>) -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            visible: true,
            cast_shadow: false,
            receive_shadow: false,
            mesh,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn mesh(&self) -> Option<&Mesh> {
        self.mesh.as_ref()
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn local_matrix(&self) -> Mat4 {
        let rotation = Quat::from_euler(
            EulerRot::XYZ,
            self.rotation.x,
            self.rotation.y,
            self.rotation.z,
        );
        Mat4::from_rotation_translation(rotation, self.position)
    }
}

/// What a traversal hands out for each visible mesh node.
pub struct VisibleMesh<'a> {
    pub id: NodeId,
    pub mesh: &'a Mesh,
    pub world: Mat4,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
}

#[derive(Debug, Default)]
pub struct SceneGraph {
    nodes: Vec<Node>,
    roots: Vec<NodeId>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Creates a detached mesh node. Attach it with [`Self::add_to_root`] or
    /// [`Self::add_child`].
    pub fn create_mesh(&mut self, geometry: Geometry, material: Material) -> NodeId {
        self.push(Node::empty(Some(Mesh::new(geometry, material))))
    }

    /// Creates a detached, mesh-less grouping node.
    pub fn create_group(&mut self) -> NodeId {
        self.push(Node::empty(None))
    }

    fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    pub fn add_to_root(&mut self, id: NodeId) {
        self.detach(id);
        self.roots.push(id);
    }

    pub fn add_child(&mut self, parent: NodeId, child: NodeId) {
        debug_assert_ne!(parent, child, "a node cannot parent itself");
        self.detach(child);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    fn detach(&mut self, id: NodeId) {
        match self.nodes[id.0].parent.take() {
            Some(parent) => self.nodes[parent.0].children.retain(|c| *c != id),
            None => self.roots.retain(|r| *r != id),
        }
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    pub fn set_position(&mut self, id: NodeId, position: Vec3) {
        self.nodes[id.0].position = position;
    }

    pub fn set_rotation(&mut self, id: NodeId, rotation: Vec3) {
        self.nodes[id.0].rotation = rotation;
    }

    pub fn set_visible(&mut self, id: NodeId, visible: bool) {
        self.nodes[id.0].visible = visible;
    }

    pub fn is_visible(&self, id: NodeId) -> bool {
        self.nodes[id.0].visible
    }

    pub fn world_matrix(&self, id: NodeId) -> Mat4 {
        let node = &self.nodes[id.0];
        let local = node.local_matrix();
        match node.parent {
            Some(parent) => self.world_matrix(parent) * local,
            None => local,
        }
    }

    /// Walks every visible mesh reachable from the roots. Shadow casting is
    /// inherited from ancestor groups, receiving is not.
    pub fn visit_visible<F>(&self, mut visit: F)
    where
        F: FnMut(VisibleMesh<'_>),
    {
        let mut stack: Vec<(NodeId, Mat4, bool)> = self
            .roots
            .iter()
            .rev()
            .map(|id| (*id, Mat4::IDENTITY, false))
            .collect();

        while let Some((id, parent_world, parent_casts)) = stack.pop() {
            let node = &self.nodes[id.0];
            if !node.visible {
                continue;
            }

            let world = parent_world * node.local_matrix();
            let casts = parent_casts || node.cast_shadow;

            if let Some(mesh) = node.mesh.as_ref() {
                visit(VisibleMesh {
                    id,
                    mesh,
                    world,
                    cast_shadow: casts,
                    receive_shadow: node.receive_shadow,
                });
            }

            for child in node.children.iter().rev() {
                stack.push((*child, world, casts));
            }
        }
    }
}
