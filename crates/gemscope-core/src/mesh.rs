//! Mesh Data
//!
//! Vertex/index storage for a scene node and the world-space bounding fold
//! the measurement pipeline is built on.

use glam::{Mat4, Vec3};

use crate::math::Aabb;

/// Triangle mesh owned by a scene node
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    /// Vertex positions in local space
    pub positions: Vec<Vec3>,
    /// Optional triangle index buffer
    pub indices: Option<Vec<u32>>,
}

impl Mesh {
    /// Create a mesh from positions and an optional index buffer
    pub fn new(positions: Vec<Vec3>, indices: Option<Vec<u32>>) -> Self {
        Self { positions, indices }
    }

    /// Create a mesh from a flat sequence of position triples
    ///
    /// Trailing components that do not form a full triple are ignored.
    pub fn from_flat_positions(flat: &[f32], indices: Option<Vec<u32>>) -> Self {
        let positions = flat
            .chunks_exact(3)
            .map(|c| Vec3::new(c[0], c[1], c[2]))
            .collect();
        Self { positions, indices }
    }

    /// Number of vertices
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of triangles: index count over three when indexed, vertex
    /// count over three otherwise, floored
    pub fn triangle_count(&self) -> usize {
        match &self.indices {
            Some(indices) => indices.len() / 3,
            None => self.positions.len() / 3,
        }
    }

    /// Check if the mesh has no vertices
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Fold the world-transformed vertices into an AABB
    ///
    /// Returns `None` when the vertex buffer is empty so callers can turn a
    /// degenerate mesh into an explicit error.
    pub fn world_bounds(&self, world: Mat4) -> Option<Aabb> {
        if self.positions.is_empty() {
            return None;
        }

        let mut bounds = Aabb::EMPTY;
        for position in &self.positions {
            bounds.expand_to_include(world.transform_point3(*position));
        }
        Some(bounds)
    }
}
