//! Descriptor consistency checks.
//!
//! This module inspects a raw-count descriptor against the layout that
//! produced it, reporting per-level counts and cell occupancy.

use crate::descriptor::Descriptor;
use crate::layout::PyramidLayout;

/// Per-level summary of a descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelReport {
    /// Sum of the level block.
    pub count: f64,

    /// Number of cells with at least one point.
    pub occupied_cells: usize,

    /// Total number of cells in the level.
    pub total_cells: usize,
}

/// Consistency report for a descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct DescriptorReport {
    /// Per-level summaries, in layout order.
    pub levels: Vec<LevelReport>,

    /// Whether the descriptor length matches the layout.
    pub length_matches: bool,

    /// Whether the descriptor passes all checks.
    pub is_consistent: bool,
}

/// Check a raw-count descriptor against its layout.
///
/// # Arguments
///
/// * `descriptor` - Descriptor to inspect
/// * `layout` - Layout it was built with
/// * `n_points` - Number of points that were encoded
///
/// # Consistency
///
/// - Length equals `layout.descriptor_size()`
/// - Level block sizes match the layout
/// - Every level sums to `n_points` (each point is counted once per level)
#[must_use]
pub fn check_descriptor(
    descriptor: &Descriptor,
    layout: &PyramidLayout,
    n_points: usize,
) -> DescriptorReport {
    let length_matches = descriptor.len() == layout.descriptor_size()
        && descriptor.level_sizes() == layout.level_sizes().as_slice();

    let k = layout.num_clusters();
    let levels: Vec<LevelReport> = layout
        .levels()
        .iter()
        .enumerate()
        .map(|(level, shape)| {
            let block = descriptor.level_block(level).unwrap_or_default();
            LevelReport {
                count: block.iter().sum(),
                occupied_cells: block
                    .chunks_exact(k)
                    .filter(|hist| hist.iter().any(|&c| c != 0.0))
                    .count(),
                total_cells: shape.num_cells(),
            }
        })
        .collect();

    // Counts are integral, exact comparison is safe
    let is_consistent = length_matches
        && levels
            .iter()
            .all(|l| l.count == n_points as f64 && l.occupied_cells <= n_points);

    DescriptorReport {
        levels,
        length_matches,
        is_consistent,
    }
}
