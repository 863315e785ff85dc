//! Scene Graph
//!
//! Hierarchical scene representation with:
//! - Transform parenting
//! - Cached world matrices
//! - Depth-first traversal for measurement passes
//! - Per-node mesh data and loader-provided attributes

use ahash::AHashMap;
use glam::{Mat4, Quat, Vec3};
use smallvec::SmallVec;

use crate::math::Aabb;
use crate::mesh::Mesh;

/// Transform component for scene nodes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Local position
    pub position: Vec3,
    /// Local rotation
    pub rotation: Quat,
    /// Local scale
    pub scale: Vec3,
}

impl Transform {
    /// Identity transform
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    /// Create a new transform with the given position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }

    /// Create a new transform from all components
    pub fn new(position: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self {
            position,
            rotation,
            scale,
        }
    }

    /// Get the local transformation matrix
    pub fn local_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Identifier of a node within a scene graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

impl NodeId {
    /// Get the raw id value
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// Loader-provided node metadata
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeAttributes {
    /// Draw color assigned in the source document (RGB, 0-255)
    pub draw_color: Option<[u8; 3]>,
    /// Free-form key/value pairs carried over from the source document
    pub user_strings: Vec<(String, String)>,
}

/// Scene graph node containing hierarchy information
#[derive(Debug, Clone)]
pub struct Node {
    /// Node id within the owning graph
    pub id: NodeId,
    /// Node name for identification and shape classification
    pub name: String,
    /// Local transform
    pub local_transform: Transform,
    /// Cached world matrix
    world_matrix: Mat4,
    /// Parent node
    pub parent: Option<NodeId>,
    /// Child nodes
    pub children: SmallVec<[NodeId; 8]>,
    /// Whether this node is visible
    pub visible: bool,
    /// Mesh geometry, if this node is renderable
    pub mesh: Option<Mesh>,
    /// Loader-provided attributes
    pub attributes: NodeAttributes,
}

impl Node {
    fn new(id: NodeId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            local_transform: Transform::IDENTITY,
            world_matrix: Mat4::IDENTITY,
            parent: None,
            children: SmallVec::new(),
            visible: true,
            mesh: None,
            attributes: NodeAttributes::default(),
        }
    }

    /// Get the cached world matrix
    pub fn world_matrix(&self) -> Mat4 {
        self.world_matrix
    }

    /// Check if this node carries mesh geometry
    pub fn is_mesh(&self) -> bool {
        self.mesh.is_some()
    }

    /// World-space bounds of this node's mesh, if any
    pub fn world_bounds(&self) -> Option<Aabb> {
        self.mesh.as_ref().and_then(|m| m.world_bounds(self.world_matrix))
    }

    fn add_child(&mut self, child: NodeId) {
        if !self.children.contains(&child) {
            self.children.push(child);
        }
    }

    fn remove_child(&mut self, child: NodeId) {
        self.children.retain(|c| *c != child);
    }
}

/// Scene graph managing the hierarchy of nodes
#[derive(Debug)]
pub struct SceneGraph {
    /// All nodes in the scene
    nodes: AHashMap<NodeId, Node>,
    /// Root nodes (no parent), in insertion order
    roots: Vec<NodeId>,
    /// Next id to allocate
    next_id: u64,
}

impl SceneGraph {
    /// Create a new empty scene graph
    pub fn new() -> Self {
        Self {
            nodes: AHashMap::new(),
            roots: Vec::new(),
            next_id: 0,
        }
    }

    /// Add a new node to the scene, returning its id
    pub fn add_node(&mut self, name: impl Into<String>) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(id, Node::new(id, name));
        self.roots.push(id);
        id
    }

    /// Remove a node from the scene
    pub fn remove_node(&mut self, id: NodeId) -> Option<Node> {
        let node = self.nodes.remove(&id)?;

        if let Some(parent_id) = node.parent {
            if let Some(parent) = self.nodes.get_mut(&parent_id) {
                parent.remove_child(id);
            }
        }
        self.roots.retain(|&e| e != id);

        // Orphan children (make them roots)
        for child in &node.children {
            if let Some(child_node) = self.nodes.get_mut(child) {
                child_node.parent = None;
                self.roots.push(*child);
            }
        }

        Some(node)
    }

    /// Get a node by id
    pub fn get_node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    /// Get a mutable node by id
    pub fn get_node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&id)
    }

    /// Set the parent of a node
    pub fn set_parent(&mut self, child: NodeId, parent: Option<NodeId>) {
        if let Some(child_node) = self.nodes.get(&child) {
            if let Some(old_parent) = child_node.parent {
                if let Some(old_parent_node) = self.nodes.get_mut(&old_parent) {
                    old_parent_node.remove_child(child);
                }
            }
        }

        if let Some(parent_id) = parent {
            if let Some(parent_node) = self.nodes.get_mut(&parent_id) {
                parent_node.add_child(child);
            }
            self.roots.retain(|&e| e != child);
        } else if !self.roots.contains(&child) {
            self.roots.push(child);
        }

        if let Some(child_node) = self.nodes.get_mut(&child) {
            child_node.parent = parent;
        }
    }

    /// Get root node ids
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Update cached world matrices for the whole graph
    pub fn update_transforms(&mut self) {
        let roots: Vec<_> = self.roots.clone();
        for root in roots {
            self.update_transform_recursive(root, Mat4::IDENTITY);
        }
    }

    fn update_transform_recursive(&mut self, id: NodeId, parent_world: Mat4) {
        let (world_matrix, children) = {
            let node = match self.nodes.get_mut(&id) {
                Some(n) => n,
                None => return,
            };

            let world_matrix = parent_world * node.local_transform.local_matrix();
            node.world_matrix = world_matrix;

            (world_matrix, node.children.clone())
        };

        for child in children {
            self.update_transform_recursive(child, world_matrix);
        }
    }

    /// Visit every node depth-first from the roots, in insertion order
    pub fn visit<'a>(&'a self, mut f: impl FnMut(&'a Node)) {
        for root in &self.roots {
            self.visit_recursive(*root, &mut f);
        }
    }

    fn visit_recursive<'a>(&'a self, id: NodeId, f: &mut impl FnMut(&'a Node)) {
        let Some(node) = self.nodes.get(&id) else {
            return;
        };
        f(node);
        for child in &node.children {
            self.visit_recursive(*child, f);
        }
    }

    /// Collect all mesh-carrying nodes in traversal order
    pub fn mesh_nodes(&self) -> Vec<&Node> {
        let mut meshes = Vec::new();
        self.visit(|node| {
            if node.is_mesh() {
                meshes.push(node);
            }
        });
        meshes
    }

    /// Find a node by name
    pub fn find_by_name(&self, name: &str) -> Option<NodeId> {
        let mut found = None;
        self.visit(|node| {
            if found.is_none() && node.name == name {
                found = Some(node.id);
            }
        });
        found
    }

    /// World-space bounds of all mesh nodes combined
    pub fn world_bounds(&self) -> Aabb {
        let mut bounds = Aabb::EMPTY;
        self.visit(|node| {
            if let Some(node_bounds) = node.world_bounds() {
                bounds = bounds.merge(&node_bounds);
            }
        });
        bounds
    }

    /// Get the number of nodes in the scene
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the scene is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Clear all nodes from the scene
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.roots.clear();
    }
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}
