//! Selection Inspector
//!
//! Builds the per-object report shown when a mesh is picked: raw
//! (non-grouped) measurements, geometry counts, material parameters, and
//! document user strings.

use std::fmt::Write;

use gemscope_core::Node;
use gemscope_measure::{MeasureError, MeasureResult};

use crate::material::Material;

/// Keys treated as size metadata and listed with the measurements
const SIZE_KEYS: [&str; 4] = ["size", "diameter", "width", "height"];

fn is_size_key(key: &str) -> bool {
    let lower = key.to_lowercase();
    SIZE_KEYS.iter().any(|k| lower.contains(k))
}

fn round_to_hundredth(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Raw measurements and properties of a single picked mesh
#[derive(Debug, Clone, PartialEq)]
pub struct InspectionReport {
    /// Node name
    pub name: String,
    /// Raw X extent, hundredth precision (no tenth rounding here)
    pub size_x: f64,
    /// Raw Y extent
    pub size_y: f64,
    /// Raw Z extent
    pub size_z: f64,
    /// Diameter, reported when X and Y extents are within 0.1 of each other
    pub diameter: Option<f64>,
    /// Vertex count
    pub vertex_count: usize,
    /// Triangle count
    pub triangle_count: usize,
    /// Material assigned to the node
    pub material: Material,
    /// User strings whose key looks size-related
    pub size_strings: Vec<(String, String)>,
    /// Remaining user strings
    pub other_strings: Vec<(String, String)>,
}

impl InspectionReport {
    /// Build a report for a mesh node and its assigned material
    pub fn for_node(node: &Node, material: Material) -> MeasureResult<Self> {
        let mesh = node.mesh.as_ref().ok_or_else(|| MeasureError::MissingMesh {
            name: node.name.clone(),
        })?;
        let bounds = mesh
            .world_bounds(node.world_matrix())
            .ok_or_else(|| MeasureError::EmptyMesh {
                name: node.name.clone(),
            })?;

        let size = bounds.size();
        let size_x = round_to_hundredth((size.x as f64).abs());
        let size_y = round_to_hundredth((size.y as f64).abs());
        let size_z = round_to_hundredth((size.z as f64).abs());

        let diameter = ((size_x - size_y).abs() < 0.1).then_some(size_x);

        let (size_strings, other_strings) = node
            .attributes
            .user_strings
            .iter()
            .cloned()
            .partition(|(key, _)| is_size_key(key));

        Ok(Self {
            name: node.name.clone(),
            size_x,
            size_y,
            size_z,
            diameter,
            vertex_count: mesh.vertex_count(),
            triangle_count: mesh.triangle_count(),
            material,
            size_strings,
            other_strings,
        })
    }

    /// Render the report as a text block
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Object Information");
        let _ = writeln!(out, "Name: {}", self.name);
        let _ = writeln!(out, "Vertices: {}", self.vertex_count);
        let _ = writeln!(out, "Triangles: {}", self.triangle_count);
        let _ = writeln!(out, "Size X: {:.2} mm", self.size_x);
        let _ = writeln!(out, "Size Y: {:.2} mm", self.size_y);
        let _ = writeln!(out, "Size Z: {:.2} mm", self.size_z);
        if let Some(diameter) = self.diameter {
            let _ = writeln!(out, "Diameter: {:.2} mm", diameter);
        }
        for (key, value) in &self.size_strings {
            let _ = writeln!(out, "Doc {}: {}", key, value);
        }

        let _ = writeln!(out, "Material Properties");
        let _ = writeln!(out, "Color: {}", self.material.color_hex());
        let _ = writeln!(out, "Metalness: {}", self.material.metallic);
        let _ = writeln!(out, "Roughness: {}", self.material.roughness);
        let _ = writeln!(out, "Opacity: {}", self.material.opacity);

        if !self.other_strings.is_empty() {
            let _ = writeln!(out, "Properties");
            for (key, value) in &self.other_strings {
                let _ = writeln!(out, "{}: {}", key, value);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gemscope_core::{Mesh, SceneGraph};
    use glam::Vec3;

    fn inspected_node() -> (SceneGraph, gemscope_core::NodeId) {
        let mut sg = SceneGraph::new();
        let id = sg.add_node("Diamond_Round_1");
        {
            let node = sg.get_node_mut(id).unwrap();
            node.mesh = Some(Mesh::new(
                vec![
                    Vec3::new(-1.52, -1.53, 0.0),
                    Vec3::new(1.52, 1.53, 2.0),
                ],
                None,
            ));
            node.attributes.user_strings = vec![
                (String::from("Size"), String::from("3mm")),
                (String::from("Clarity"), String::from("VS1")),
            ];
        }
        sg.update_transforms();
        (sg, id)
    }

    #[test]
    fn test_raw_sizes_not_tenth_rounded() {
        let (sg, id) = inspected_node();
        let report =
            InspectionReport::for_node(sg.get_node(id).unwrap(), Material::default_gem()).unwrap();

        assert_eq!(report.size_x, 3.04);
        assert_eq!(report.size_y, 3.06);
        assert_eq!(report.size_z, 2.0);
    }

    #[test]
    fn test_diameter_for_near_circular() {
        let (sg, id) = inspected_node();
        let report =
            InspectionReport::for_node(sg.get_node(id).unwrap(), Material::default_gem()).unwrap();

        // |3.04 - 3.06| < 0.1
        assert_eq!(report.diameter, Some(3.04));
    }

    #[test]
    fn test_user_string_partition() {
        let (sg, id) = inspected_node();
        let report =
            InspectionReport::for_node(sg.get_node(id).unwrap(), Material::default_gem()).unwrap();

        assert_eq!(report.size_strings.len(), 1);
        assert_eq!(report.size_strings[0].0, "Size");
        assert_eq!(report.other_strings.len(), 1);
        assert_eq!(report.other_strings[0].0, "Clarity");
    }

    #[test]
    fn test_render_sections() {
        let (sg, id) = inspected_node();
        let report =
            InspectionReport::for_node(sg.get_node(id).unwrap(), Material::default_gem()).unwrap();
        let text = report.render();

        assert!(text.contains("Name: Diamond_Round_1"));
        assert!(text.contains("Size X: 3.04 mm"));
        assert!(text.contains("Diameter: 3.04 mm"));
        assert!(text.contains("Color: #add8e6"));
        assert!(text.contains("Clarity: VS1"));
    }

    #[test]
    fn test_missing_mesh_rejected() {
        let mut sg = SceneGraph::new();
        let id = sg.add_node("Group");
        let err =
            InspectionReport::for_node(sg.get_node(id).unwrap(), Material::default_gem())
                .unwrap_err();
        assert!(matches!(err, MeasureError::MissingMesh { .. }));
    }
}
