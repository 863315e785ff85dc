//! Dimension Calculator
//!
//! Computes the display dimensions of a single mesh node: world-space
//! bounding extents, shape-aware width/height, depth, and geometry counts.

use gemscope_core::Node;
use serde::Serialize;

use crate::{MeasureError, MeasureResult};

/// Round to the nearest tenth, half away from zero
///
/// Display formatting uses two decimals everywhere, so the second decimal
/// digit of a rounded dimension is always zero. The original viewer behaved
/// this way and downstream tooling compares against its output, so the
/// granularity is kept.
pub fn round_to_tenth(value: f64) -> f64 {
    (value.abs() * 10.0).round() / 10.0
}

/// Shape classification derived from the node name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeClass {
    /// Name contains "round": reported as a diameter
    Round,
    /// Name contains "emerald": width is the longer side
    Emerald,
    /// Anything else: raw width/height
    Generic,
}

impl ShapeClass {
    /// Classify by case-insensitive substring match on a node name
    ///
    /// "emerald" wins over "round" when a name contains both.
    pub fn classify(name: &str) -> Self {
        let lower = name.to_lowercase();
        if lower.contains("emerald") {
            Self::Emerald
        } else if lower.contains("round") {
            Self::Round
        } else {
            Self::Generic
        }
    }
}

/// Measured display dimensions of one mesh node
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DimensionResult {
    /// Displayed width, rounded to the nearest tenth
    pub width: f64,
    /// Displayed height, rounded to the nearest tenth
    pub height: f64,
    /// Depth (Z extent), rounded to the nearest tenth
    pub depth: f64,
    /// Shape classification
    pub shape: ShapeClass,
    /// Vertex count of the mesh
    pub vertex_count: usize,
    /// Triangle count of the mesh
    pub triangle_count: usize,
}

impl DimensionResult {
    /// Whether the node was classified as round (width equals height)
    pub fn is_round(&self) -> bool {
        self.shape == ShapeClass::Round
    }

    /// Grouping key: `"{width} x {height}"` with two decimals
    pub fn size_key(&self) -> String {
        format!("{:.2} x {:.2}", self.width, self.height)
    }
}

/// Measure a mesh node using its cached world matrix
///
/// Fails with [`MeasureError::EmptyMesh`] when the vertex buffer is empty
/// and [`MeasureError::MissingMesh`] when the node carries no geometry.
pub fn measure(node: &Node) -> MeasureResult<DimensionResult> {
    let mesh = node.mesh.as_ref().ok_or_else(|| MeasureError::MissingMesh {
        name: node.name.clone(),
    })?;

    let bounds = mesh
        .world_bounds(node.world_matrix())
        .ok_or_else(|| MeasureError::EmptyMesh {
            name: node.name.clone(),
        })?;

    let size = bounds.size();
    let raw_width = (size.x as f64).abs();
    let raw_height = (size.y as f64).abs();
    let raw_depth = (size.z as f64).abs();

    let shape = ShapeClass::classify(&node.name);
    let (width, height) = match shape {
        ShapeClass::Round => {
            let diameter = round_to_tenth(raw_width.max(raw_height));
            (diameter, diameter)
        }
        ShapeClass::Emerald => (
            round_to_tenth(raw_width.max(raw_height)),
            round_to_tenth(raw_width.min(raw_height)),
        ),
        ShapeClass::Generic => (round_to_tenth(raw_width), round_to_tenth(raw_height)),
    };

    Ok(DimensionResult {
        width,
        height,
        depth: round_to_tenth(raw_depth),
        shape,
        vertex_count: mesh.vertex_count(),
        triangle_count: mesh.triangle_count(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use gemscope_core::{Mesh, SceneGraph};
    use glam::Vec3;

    fn scene_with_box(name: &str, extents: Vec3) -> (SceneGraph, gemscope_core::NodeId) {
        let mut sg = SceneGraph::new();
        let id = sg.add_node(name);
        let half = extents * 0.5;
        sg.get_node_mut(id).unwrap().mesh = Some(Mesh::new(
            vec![
                Vec3::new(-half.x, -half.y, -half.z),
                Vec3::new(half.x, -half.y, -half.z),
                Vec3::new(half.x, half.y, half.z),
                Vec3::new(-half.x, half.y, half.z),
            ],
            Some(vec![0, 1, 2, 0, 2, 3]),
        ));
        sg.update_transforms();
        (sg, id)
    }

    #[test]
    fn test_round_to_tenth_basic() {
        assert_eq!(round_to_tenth(3.04), 3.0);
        assert_eq!(round_to_tenth(3.06), 3.1);
        assert_eq!(round_to_tenth(-3.06), 3.1);
        assert_eq!(round_to_tenth(0.0), 0.0);
    }

    #[test]
    fn test_rounded_value_second_decimal_is_zero() {
        for i in 0..500 {
            let value = i as f64 * 0.0137;
            let formatted = format!("{:.2}", round_to_tenth(value));
            assert!(formatted.ends_with('0'), "{} -> {}", value, formatted);
        }
    }

    #[test]
    fn test_classify() {
        assert_eq!(ShapeClass::classify("Diamond_Round_1"), ShapeClass::Round);
        assert_eq!(ShapeClass::classify("diamond_EMERALD_2"), ShapeClass::Emerald);
        assert_eq!(ShapeClass::classify("Diamond_7"), ShapeClass::Generic);
    }

    #[test]
    fn test_round_diameter_invariant() {
        // Circular footprint: raw width 3.04, raw height 3.06
        let (sg, id) = scene_with_box("Diamond_Round_1", Vec3::new(3.04, 3.06, 2.0));
        let dims = measure(sg.get_node(id).unwrap()).unwrap();

        assert!(dims.is_round());
        assert_eq!(dims.width, dims.height);
        // max(3.04, 3.06) = 3.06 rounds up to 3.1
        assert_eq!(dims.width, 3.1);
        assert_eq!(dims.size_key(), "3.10 x 3.10");
    }

    #[test]
    fn test_emerald_width_is_longer_side() {
        let (sg, id) = scene_with_box("Diamond_Emerald_3", Vec3::new(2.0, 4.0, 1.5));
        let dims = measure(sg.get_node(id).unwrap()).unwrap();

        assert_eq!(dims.shape, ShapeClass::Emerald);
        assert!(dims.width >= dims.height);
        assert_eq!(dims.width, 4.0);
        assert_eq!(dims.height, 2.0);
    }

    #[test]
    fn test_generic_keeps_axis_order() {
        let (sg, id) = scene_with_box("Diamond_9", Vec3::new(2.0, 4.0, 1.5));
        let dims = measure(sg.get_node(id).unwrap()).unwrap();

        assert_eq!(dims.width, 2.0);
        assert_eq!(dims.height, 4.0);
        assert_eq!(dims.depth, 1.5);
        assert!(!dims.is_round());
    }

    #[test]
    fn test_counts() {
        let (sg, id) = scene_with_box("Diamond_1", Vec3::ONE);
        let dims = measure(sg.get_node(id).unwrap()).unwrap();

        assert_eq!(dims.vertex_count, 4);
        assert_eq!(dims.triangle_count, 2);
    }

    #[test]
    fn test_world_transform_applied() {
        let mut sg = SceneGraph::new();
        let id = sg.add_node("Diamond_Round_1");
        {
            let node = sg.get_node_mut(id).unwrap();
            node.mesh = Some(Mesh::new(
                vec![Vec3::new(-0.5, -0.5, 0.0), Vec3::new(0.5, 0.5, 0.0)],
                None,
            ));
            node.local_transform.scale = Vec3::splat(3.0);
        }
        sg.update_transforms();

        let dims = measure(sg.get_node(id).unwrap()).unwrap();
        assert_eq!(dims.width, 3.0);
    }

    #[test]
    fn test_empty_mesh_is_error() {
        let mut sg = SceneGraph::new();
        let id = sg.add_node("Diamond_Empty");
        sg.get_node_mut(id).unwrap().mesh = Some(Mesh::default());
        sg.update_transforms();

        let err = measure(sg.get_node(id).unwrap()).unwrap_err();
        assert!(matches!(err, MeasureError::EmptyMesh { .. }));
    }

    #[test]
    fn test_missing_mesh_is_error() {
        let mut sg = SceneGraph::new();
        let id = sg.add_node("Group");

        let err = measure(sg.get_node(id).unwrap()).unwrap_err();
        assert!(matches!(err, MeasureError::MissingMesh { .. }));
    }
}
