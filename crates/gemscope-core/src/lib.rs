//! # Gemscope Core
//!
//! Scene-graph and geometry foundation for the Gemscope CAD analyzer.
//!
//! This crate provides the data the measurement pipeline operates on:
//! - **Scene Graph**: named nodes, transform parenting, cached world matrices
//! - **Mesh**: vertex/index buffers and the world-space bounding fold
//! - **Math**: AABB and ray primitives for framing and picking

pub mod math;
pub mod mesh;
pub mod scene;

pub use math::{Aabb, Ray};
pub use mesh::Mesh;
pub use scene::{Node, NodeAttributes, NodeId, SceneGraph, Transform};
