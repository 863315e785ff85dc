//! # Gemscope Measure
//!
//! Geometric measurement for the Gemscope CAD analyzer:
//! - **Dimension Calculator**: world-space bounding extents of a mesh node,
//!   shape-aware display sizes, vertex/triangle counts
//! - **Diamond Aggregator**: marker scan, duplicate-size grouping, counted
//!   summary sorted largest-first

pub mod aggregate;
pub mod dimension;

pub use aggregate::{aggregate, DiamondGroup, DiamondSummary, DIAMOND_MARKER};
pub use dimension::{measure, round_to_tenth, DimensionResult, ShapeClass};

use thiserror::Error;

/// Measurement errors
#[derive(Error, Debug)]
pub enum MeasureError {
    #[error("mesh '{name}' has an empty vertex buffer")]
    EmptyMesh { name: String },

    #[error("node '{name}' carries no mesh geometry")]
    MissingMesh { name: String },
}

/// Result type for measurement operations
pub type MeasureResult<T> = Result<T, MeasureError>;
