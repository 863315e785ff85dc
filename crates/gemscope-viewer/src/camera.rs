//! Camera Rig
//!
//! Orbit-style camera state and model framing.

use gemscope_core::Aabb;
use glam::Vec3;

/// Viewer camera state
#[derive(Debug, Clone, PartialEq)]
pub struct CameraRig {
    /// Camera position
    pub position: Vec3,
    /// Orbit target
    pub target: Vec3,
    /// Field of view in degrees
    pub fov: f32,
    /// Near clip plane
    pub near: f32,
    /// Far clip plane
    pub far: f32,
}

impl Default for CameraRig {
    fn default() -> Self {
        Self {
            position: Vec3::new(10.0, 10.0, 10.0),
            target: Vec3::ZERO,
            fov: 65.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

impl CameraRig {
    /// Frame the camera on a bounding box: offset from the center by twice
    /// the largest extent on every axis, looking at the center
    pub fn frame(&mut self, bounds: &Aabb) {
        if bounds.is_empty() {
            return;
        }
        let center = bounds.center();
        let max_dim = bounds.max_extent();

        self.position = center + Vec3::splat(max_dim * 2.0);
        self.target = center;
    }
}
