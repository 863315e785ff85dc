//! JSON Scene Format
//!
//! Built-in loader for the Gemscope scene document: a flat list of meshes
//! with names, position triples, optional indices, an optional TRS
//! transform, and optional attributes. Binary CAD formats stay behind the
//! [`ModelLoader`](crate::ModelLoader) trait; this format is the reference
//! implementation used by the CLI and tests.

use gemscope_core::{Mesh, SceneGraph, Transform};
use glam::{Quat, Vec3};
use serde::Deserialize;

use crate::{LoadedModel, LoaderError, LoaderResult, ModelLoader};

#[derive(Debug, Deserialize)]
struct SceneDoc {
    meshes: Vec<MeshDoc>,
}

#[derive(Debug, Deserialize)]
struct MeshDoc {
    name: String,
    /// Flat sequence of vertex position triples
    positions: Vec<f32>,
    #[serde(default)]
    indices: Option<Vec<u32>>,
    #[serde(default)]
    position: Option<[f32; 3]>,
    /// Rotation quaternion, xyzw
    #[serde(default)]
    rotation: Option<[f32; 4]>,
    #[serde(default)]
    scale: Option<[f32; 3]>,
    #[serde(default)]
    draw_color: Option<[u8; 3]>,
    #[serde(default)]
    user_strings: Vec<(String, String)>,
}

/// Loader for the JSON scene document
#[derive(Debug, Default)]
pub struct JsonSceneLoader;

impl JsonSceneLoader {
    /// Create a new JSON scene loader
    pub fn new() -> Self {
        Self
    }
}

impl ModelLoader for JsonSceneLoader {
    fn extensions(&self) -> &[&str] {
        &["json", "gscene"]
    }

    fn load(&self, bytes: &[u8]) -> LoaderResult<LoadedModel> {
        let doc: SceneDoc = serde_json::from_slice(bytes)
            .map_err(|e| LoaderError::Parse(e.to_string()))?;

        let mut scene = SceneGraph::new();
        for mesh_doc in doc.meshes {
            if mesh_doc.positions.len() % 3 != 0 {
                return Err(LoaderError::Parse(format!(
                    "mesh '{}' has {} position components, not a multiple of 3",
                    mesh_doc.name,
                    mesh_doc.positions.len()
                )));
            }
            if let Some(indices) = &mesh_doc.indices {
                let vertex_count = (mesh_doc.positions.len() / 3) as u32;
                if indices.iter().any(|&i| i >= vertex_count) {
                    return Err(LoaderError::Parse(format!(
                        "mesh '{}' has an index out of range",
                        mesh_doc.name
                    )));
                }
            }

            let id = scene.add_node(&mesh_doc.name);
            let node = scene
                .get_node_mut(id)
                .ok_or_else(|| LoaderError::Parse(format!("node '{}' vanished", mesh_doc.name)))?;

            node.mesh = Some(Mesh::from_flat_positions(
                &mesh_doc.positions,
                mesh_doc.indices,
            ));
            node.local_transform = Transform::new(
                mesh_doc.position.map_or(Vec3::ZERO, Vec3::from),
                mesh_doc
                    .rotation
                    .map_or(Quat::IDENTITY, Quat::from_array),
                mesh_doc.scale.map_or(Vec3::ONE, Vec3::from),
            );
            node.attributes.draw_color = mesh_doc.draw_color;
            node.attributes.user_strings = mesh_doc.user_strings;
        }

        scene.update_transforms();
        log::info!("loaded json scene with {} nodes", scene.node_count());
        Ok(LoadedModel { scene })
    }
}
