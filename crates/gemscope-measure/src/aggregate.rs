//! Diamond Aggregator
//!
//! Scans a loaded scene for meshes whose name carries the diamond marker,
//! measures each one, and groups duplicate sizes into counted entries.

use gemscope_core::{Node, SceneGraph};
use indexmap::IndexMap;
use serde::Serialize;

use crate::dimension::measure;
use crate::MeasureResult;

/// Case-insensitive substring selecting nodes for aggregation
pub const DIAMOND_MARKER: &str = "diamond";

/// A group of identically sized diamonds
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiamondGroup {
    /// Grouping key, `"{width} x {height}"` with two decimals
    pub key: String,
    /// Number of matched meshes with this size
    pub count: usize,
    /// Displayed width shared by the group
    pub width: f64,
    /// Displayed height shared by the group
    pub height: f64,
    /// Depth of the first mesh discovered for this size
    pub depth: f64,
    /// Name of the first mesh discovered for this size
    pub shape: String,
}

/// Aggregated diamond measurements for one loaded model
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiamondSummary {
    /// Groups sorted by descending width, discovery order for ties
    pub groups: Vec<DiamondGroup>,
    /// Total number of matched meshes; always the sum of group counts
    pub total: usize,
}

impl DiamondSummary {
    /// True when the model contained no diamond-marked meshes
    ///
    /// This is the "no diamonds found" informational state, distinct from a
    /// measurement error.
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

fn matches_marker(node: &Node) -> bool {
    node.is_mesh() && node.name.to_lowercase().contains(DIAMOND_MARKER)
}

/// Aggregate all diamond-marked meshes in a scene
///
/// Expects world transforms to be up to date. Grouping is order-independent:
/// any traversal order produces the same keys and counts, only the discovery
/// order of equal-width groups differs before the sort.
pub fn aggregate(scene: &SceneGraph) -> MeasureResult<DiamondSummary> {
    let mut matched = Vec::new();
    scene.visit(|node| {
        if matches_marker(node) {
            matched.push(node);
        }
    });

    let mut groups: IndexMap<String, DiamondGroup> = IndexMap::new();
    for node in &matched {
        let dims = measure(node)?;
        let key = dims.size_key();

        groups
            .entry(key.clone())
            .or_insert_with(|| DiamondGroup {
                key,
                count: 0,
                width: dims.width,
                height: dims.height,
                depth: dims.depth,
                shape: node.name.clone(),
            })
            .count += 1;
    }

    let mut groups: Vec<DiamondGroup> = groups.into_values().collect();
    // Stable sort: equal widths keep discovery order
    groups.sort_by(|a, b| b.width.total_cmp(&a.width));

    let summary = DiamondSummary {
        groups,
        total: matched.len(),
    };
    log::debug!(
        "aggregated {} diamonds into {} groups",
        summary.total,
        summary.groups.len()
    );
    Ok(summary)
}
