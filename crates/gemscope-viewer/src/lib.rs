//! # Gemscope Viewer
//!
//! Application state for the Gemscope model viewer.
//!
//! ## Features
//! - Explicit load state machine (Idle -> Loading -> Ready/Failed)
//! - Per-node display materials with draw-color overrides
//! - Camera framing from model bounds
//! - Ray picking and single-object selection with material restore
//! - Summary presenters (text, HTML panel)
//!
//! All mutable viewer state lives in [`ViewerApp`], the single controller
//! object; there is no module-level state.

pub mod camera;
pub mod inspect;
pub mod material;
pub mod present;

pub use camera::CameraRig;
pub use inspect::InspectionReport;
pub use material::Material;
pub use present::{HtmlPresenter, Presenter, TextPresenter};

use ahash::AHashMap;
use gemscope_core::{NodeId, Ray, SceneGraph};
use gemscope_loader::{LoadProgress, LoadedModel};
use gemscope_measure::{aggregate, DiamondSummary, MeasureError};
use thiserror::Error;

/// Viewer errors
#[derive(Error, Debug)]
pub enum ViewerError {
    #[error("a model load is already in progress")]
    LoadInProgress,

    #[error("node not found: {0}")]
    NodeNotFound(String),

    #[error(transparent)]
    Measure(#[from] MeasureError),
}

/// Result type for viewer operations
pub type ViewerResult<T> = Result<T, ViewerError>;

/// Load state machine
///
/// A new load request is only accepted outside of `Loading`; overlapping
/// loads are rejected instead of racing each other.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState {
    /// No model loaded yet
    Idle,
    /// A load is in flight
    Loading {
        /// Loaded/total byte ratio in 0..=1
        progress: f32,
    },
    /// A model is loaded and presented
    Ready,
    /// The last load failed; the viewer accepts a new load
    Failed {
        /// User-visible failure message
        message: String,
    },
}

struct Selection {
    node: NodeId,
    original: Material,
}

/// Viewer controller owning the scene, materials, camera, and selection
pub struct ViewerApp {
    scene: SceneGraph,
    materials: AHashMap<NodeId, Material>,
    camera: CameraRig,
    state: LoadState,
    selection: Option<Selection>,
    summary: Option<DiamondSummary>,
}

impl ViewerApp {
    /// Create an idle viewer with no model
    pub fn new() -> Self {
        Self {
            scene: SceneGraph::new(),
            materials: AHashMap::new(),
            camera: CameraRig::default(),
            state: LoadState::Idle,
            selection: None,
            summary: None,
        }
    }

    /// Current load state
    pub fn state(&self) -> &LoadState {
        &self.state
    }

    /// Currently loaded scene
    pub fn scene(&self) -> &SceneGraph {
        &self.scene
    }

    /// Camera state
    pub fn camera(&self) -> &CameraRig {
        &self.camera
    }

    /// Aggregated summary of the current model, if one was produced
    pub fn summary(&self) -> Option<&DiamondSummary> {
        self.summary.as_ref()
    }

    /// Display material assigned to a node
    pub fn material(&self, node: NodeId) -> Option<&Material> {
        self.materials.get(&node)
    }

    /// Begin a model load
    ///
    /// Rejected with [`ViewerError::LoadInProgress`] while another load is
    /// in flight; accepted from `Idle`, `Ready`, and `Failed`.
    pub fn begin_load(&mut self, presenter: &mut dyn Presenter) -> ViewerResult<()> {
        if matches!(self.state, LoadState::Loading { .. }) {
            return Err(ViewerError::LoadInProgress);
        }
        self.state = LoadState::Loading { progress: 0.0 };
        self.summary = None;
        presenter.loading();
        Ok(())
    }

    /// Record byte progress for the in-flight load
    pub fn progress(&mut self, progress: LoadProgress) {
        if let LoadState::Loading { progress: current } = &mut self.state {
            *current = progress.ratio();
            log::debug!("{:.2}% loaded", progress.ratio() * 100.0);
        }
    }

    /// Complete the in-flight load with a parsed model
    ///
    /// Replaces the scene, assigns materials, frames the camera, aggregates
    /// diamonds, and presents the result. Presentation happens here, as an
    /// explicit completion signal. A measurement failure is presented as an
    /// error state; the scene stays loaded and the viewer remains usable.
    ///
    /// Only valid while `Loading`; a stale completion (no matching
    /// [`Self::begin_load`]) is dropped.
    pub fn complete_load(&mut self, model: LoadedModel, presenter: &mut dyn Presenter) {
        if !matches!(self.state, LoadState::Loading { .. }) {
            log::warn!("ignoring load completion outside of Loading state");
            return;
        }

        self.scene = model.scene;
        self.scene.update_transforms();
        self.selection = None;
        self.assign_materials();

        let bounds = self.scene.world_bounds();
        self.camera.frame(&bounds);

        match aggregate(&self.scene) {
            Ok(summary) if summary.is_empty() => {
                log::info!("model loaded, no diamonds found");
                presenter.empty();
                self.summary = Some(summary);
            }
            Ok(summary) => {
                log::info!(
                    "model loaded, {} diamonds in {} groups",
                    summary.total,
                    summary.groups.len()
                );
                presenter.summary(&summary);
                self.summary = Some(summary);
            }
            Err(e) => {
                log::error!("diamond summary failed: {e}");
                presenter.error(&e.to_string());
                self.summary = None;
            }
        }

        self.state = LoadState::Ready;
    }

    /// Fail the in-flight load
    ///
    /// The previous scene is kept; a subsequent [`Self::begin_load`] is
    /// accepted. Only valid while `Loading`; a stale failure is dropped.
    pub fn fail_load(&mut self, message: impl Into<String>, presenter: &mut dyn Presenter) {
        if !matches!(self.state, LoadState::Loading { .. }) {
            log::warn!("ignoring load failure outside of Loading state");
            return;
        }

        let message = message.into();
        log::error!("model load failed: {message}");
        presenter.error(&message);
        self.state = LoadState::Failed { message };
    }

    fn assign_materials(&mut self) {
        let mut assignments = Vec::new();
        self.scene.visit(|node| {
            if node.is_mesh() {
                assignments.push((node.id, node.attributes.draw_color));
            }
        });

        self.materials.clear();
        for (id, draw_color) in assignments {
            let material = match draw_color {
                Some(color) => Material::from_draw_color(color),
                None => Material::default_gem(),
            };
            self.materials.insert(id, material);
        }
    }

    /// Pick the nearest visible mesh node intersected by a ray
    pub fn pick(&self, ray: Ray) -> Option<NodeId> {
        let mut nearest: Option<(f32, NodeId)> = None;
        self.scene.visit(|node| {
            if !node.visible {
                return;
            }
            let Some(bounds) = node.world_bounds() else {
                return;
            };
            if let Some((t_enter, _)) = ray.intersect_aabb(&bounds) {
                if nearest.is_none_or(|(best, _)| t_enter < best) {
                    nearest = Some((t_enter, node.id));
                }
            }
        });
        nearest.map(|(_, id)| id)
    }

    /// Select a node: highlight it, restore the previous selection's
    /// material, and build its inspection report
    pub fn select(&mut self, node: NodeId) -> ViewerResult<InspectionReport> {
        let name = self
            .scene
            .get_node(node)
            .map(|n| n.name.clone())
            .ok_or_else(|| ViewerError::NodeNotFound(format!("{:?}", node)))?;

        self.clear_selection();

        let original = self
            .materials
            .get(&node)
            .cloned()
            .unwrap_or_else(Material::default_gem);
        self.materials.insert(node, Material::highlight());
        self.selection = Some(Selection { node, original: original.clone() });

        let report = self
            .scene
            .get_node(node)
            .ok_or(ViewerError::NodeNotFound(name))
            .and_then(|n| InspectionReport::for_node(n, original).map_err(ViewerError::from))?;
        Ok(report)
    }

    /// Clear the selection, restoring the highlighted node's material
    pub fn clear_selection(&mut self) {
        if let Some(selection) = self.selection.take() {
            self.materials.insert(selection.node, selection.original);
        }
    }
}

impl Default for ViewerApp {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gemscope_core::Mesh;
    use glam::Vec3;

    fn model_with(names: &[(&str, Vec3, Vec3)]) -> LoadedModel {
        let mut scene = SceneGraph::new();
        for (name, center, extents) in names {
            let id = scene.add_node(*name);
            let half = *extents * 0.5;
            let node = scene.get_node_mut(id).unwrap();
            node.mesh = Some(Mesh::new(
                vec![*center - half, *center + half],
                None,
            ));
        }
        scene.update_transforms();
        LoadedModel { scene }
    }

    fn sample_model() -> LoadedModel {
        model_with(&[
            ("Diamond_Round_1", Vec3::ZERO, Vec3::new(3.0, 3.0, 2.0)),
            ("Diamond_Round_2", Vec3::new(10.0, 0.0, 0.0), Vec3::new(3.0, 3.0, 2.0)),
            ("Band", Vec3::new(0.0, -5.0, 0.0), Vec3::new(20.0, 1.0, 1.0)),
        ])
    }

    #[test]
    fn test_load_state_machine() {
        let mut app = ViewerApp::new();
        let mut presenter = TextPresenter::new();
        assert_eq!(*app.state(), LoadState::Idle);

        app.begin_load(&mut presenter).unwrap();
        assert!(matches!(app.state(), LoadState::Loading { .. }));

        // Overlapping load is rejected
        let err = app.begin_load(&mut presenter).unwrap_err();
        assert!(matches!(err, ViewerError::LoadInProgress));

        app.complete_load(sample_model(), &mut presenter);
        assert_eq!(*app.state(), LoadState::Ready);

        // A new load is accepted once Ready
        app.begin_load(&mut presenter).unwrap();
        assert!(matches!(app.state(), LoadState::Loading { .. }));
    }

    #[test]
    fn test_stale_transitions_dropped() {
        let mut app = ViewerApp::new();
        let mut presenter = TextPresenter::new();

        // No begin_load: completion and failure are ignored
        app.complete_load(sample_model(), &mut presenter);
        assert_eq!(*app.state(), LoadState::Idle);
        assert!(app.summary().is_none());
        assert!(presenter.output().is_empty());

        app.fail_load("late error", &mut presenter);
        assert_eq!(*app.state(), LoadState::Idle);
        assert!(presenter.output().is_empty());

        // The same calls are honored once a load is in flight
        app.begin_load(&mut presenter).unwrap();
        app.complete_load(sample_model(), &mut presenter);
        assert_eq!(*app.state(), LoadState::Ready);
    }

    #[test]
    fn test_failed_load_allows_retry() {
        let mut app = ViewerApp::new();
        let mut presenter = TextPresenter::new();

        app.begin_load(&mut presenter).unwrap();
        app.fail_load("unreadable file", &mut presenter);

        assert!(matches!(app.state(), LoadState::Failed { .. }));
        assert!(presenter.output().contains("unreadable file"));

        app.begin_load(&mut presenter).unwrap();
        assert!(matches!(app.state(), LoadState::Loading { .. }));
    }

    #[test]
    fn test_complete_load_presents_summary() {
        let mut app = ViewerApp::new();
        let mut presenter = TextPresenter::new();

        app.begin_load(&mut presenter).unwrap();
        app.complete_load(sample_model(), &mut presenter);

        assert!(presenter.output().contains("Total diamonds: 2"));
        assert_eq!(app.summary().unwrap().total, 2);
    }

    #[test]
    fn test_complete_load_empty_state() {
        let mut app = ViewerApp::new();
        let mut presenter = TextPresenter::new();

        app.begin_load(&mut presenter).unwrap();
        app.complete_load(
            model_with(&[("Band", Vec3::ZERO, Vec3::ONE)]),
            &mut presenter,
        );

        assert!(presenter.output().contains("No diamonds found"));
        assert!(app.summary().unwrap().is_empty());
        assert_eq!(*app.state(), LoadState::Ready);
    }

    #[test]
    fn test_measure_failure_keeps_viewer_usable() {
        let mut scene = SceneGraph::new();
        let id = scene.add_node("Diamond_broken");
        scene.get_node_mut(id).unwrap().mesh = Some(Mesh::default());
        scene.update_transforms();

        let mut app = ViewerApp::new();
        let mut presenter = TextPresenter::new();
        app.begin_load(&mut presenter).unwrap();
        app.complete_load(LoadedModel { scene }, &mut presenter);

        assert!(presenter.output().starts_with("Error:"));
        assert_eq!(*app.state(), LoadState::Ready);
        assert!(app.summary().is_none());

        // Viewer accepts the next file
        app.begin_load(&mut presenter).unwrap();
    }

    #[test]
    fn test_camera_framed_on_load() {
        let mut app = ViewerApp::new();
        let mut presenter = TextPresenter::new();
        app.begin_load(&mut presenter).unwrap();
        app.complete_load(sample_model(), &mut presenter);

        // Target moved to the model center, off the default origin
        assert_ne!(app.camera().target, CameraRig::default().target);
    }

    #[test]
    fn test_pick_nearest() {
        let mut app = ViewerApp::new();
        let mut presenter = TextPresenter::new();
        app.begin_load(&mut presenter).unwrap();
        app.complete_load(
            model_with(&[
                ("Near", Vec3::new(2.0, 0.0, 0.0), Vec3::ONE),
                ("Far", Vec3::new(8.0, 0.0, 0.0), Vec3::ONE),
            ]),
            &mut presenter,
        );

        let ray = Ray::new(Vec3::new(-10.0, 0.0, 0.0), Vec3::X);
        let picked = app.pick(ray).unwrap();
        let name = &app.scene().get_node(picked).unwrap().name;
        assert_eq!(name, "Near");
    }

    #[test]
    fn test_pick_miss() {
        let mut app = ViewerApp::new();
        let mut presenter = TextPresenter::new();
        app.begin_load(&mut presenter).unwrap();
        app.complete_load(sample_model(), &mut presenter);

        let ray = Ray::new(Vec3::new(0.0, 100.0, 0.0), Vec3::Y);
        assert!(app.pick(ray).is_none());
    }

    #[test]
    fn test_selection_highlight_and_restore() {
        let mut app = ViewerApp::new();
        let mut presenter = TextPresenter::new();
        app.begin_load(&mut presenter).unwrap();
        app.complete_load(sample_model(), &mut presenter);

        let first = app.scene().find_by_name("Diamond_Round_1").unwrap();
        let second = app.scene().find_by_name("Diamond_Round_2").unwrap();

        let report = app.select(first).unwrap();
        assert_eq!(report.name, "Diamond_Round_1");
        // The report carries the pre-highlight material
        assert_eq!(report.material, Material::default_gem());
        assert_eq!(*app.material(first).unwrap(), Material::highlight());

        // Selecting another node restores the first one's material
        app.select(second).unwrap();
        assert_eq!(*app.material(first).unwrap(), Material::default_gem());
        assert_eq!(*app.material(second).unwrap(), Material::highlight());

        app.clear_selection();
        assert_eq!(*app.material(second).unwrap(), Material::default_gem());
    }
}
