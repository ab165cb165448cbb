//! Spatial-pyramid histogram encoding.
//!
//! This module implements [`encode`], which bins labeled points into every
//! level of a [`PyramidLayout`] and concatenates the per-cell visual-word
//! histograms into one [`Descriptor`].
//!
//! # Pipeline Overview
//!
//! 1. Validate lengths, labels and point coordinates against the box
//! 2. Allocate a zeroed descriptor sized by the layout
//! 3. For each level, add one count per point to its cell histogram
//!
//! Counts are raw; no normalization or level weighting is applied.

use crate::descriptor::Descriptor;
use crate::error::{BofError, Result};
use crate::geometry::{BoundingBox, Point};
use crate::layout::{cell_of, PyramidLayout};

/// Encode labeled points into a spatial-pyramid descriptor.
///
/// # Arguments
///
/// * `points` - Point coordinates `[x, y]`, in any order
/// * `labels` - Visual-word label per point, each in `[0, K)`
/// * `bbox` - Box the grids are laid over; must contain every point
/// * `layout` - Pyramid layout
///
/// # Returns
///
/// A descriptor of length `layout.descriptor_size()`. Zero points yield an
/// all-zero descriptor.
///
/// # Errors
///
/// Returns a data error if:
/// - `points` and `labels` have different lengths
/// - a label is `>= K`
/// - a point has a non-finite coordinate
/// - a point lies outside `bbox` beyond the layout tolerance
///
/// Validation happens before any counting, so no partial result exists.
///
/// # Example
///
/// ```
/// use pyramid_bof::{encode, BoundingBox, PyramidLayout};
///
/// let layout = PyramidLayout::new([(2, 1)], 2)?;
/// let bbox = BoundingBox::new(0.0, 0.0, 1.0, 1.0)?;
/// let points = [[0.0, 0.0], [0.0, 0.0], [1.0, 1.0]];
/// let labels = [0, 1, 0];
///
/// let descriptor = encode(&points, &labels, &bbox, &layout)?;
/// assert_eq!(descriptor.as_slice(), &[1.0, 1.0, 1.0, 0.0]);
/// # Ok::<(), pyramid_bof::BofError>(())
/// ```
pub fn encode(
    points: &[Point],
    labels: &[usize],
    bbox: &BoundingBox,
    layout: &PyramidLayout,
) -> Result<Descriptor> {
    validate_inputs(points, labels, bbox, layout)?;

    let k = layout.num_clusters();
    let level_sizes = layout.level_sizes();
    let mut descriptor = Descriptor::zeros(level_sizes.clone());

    // Split the output into one disjoint block per level
    let mut rest = descriptor.as_mut_slice();
    for ((level, &shape), &size) in layout.levels().iter().enumerate().zip(&level_sizes) {
        let (block, tail) = std::mem::take(&mut rest).split_at_mut(size);
        rest = tail;

        // Cell histograms are the consecutive K-long chunks of the block
        for (&point, &label) in points.iter().zip(labels) {
            let cell = cell_of(shape, point, bbox);
            block[cell * k + label] += 1.0;
        }

        log::trace!(
            "level {}: {}x{} grid, {} occupied cells",
            level,
            shape.rows,
            shape.cols,
            block
                .chunks_exact(k)
                .filter(|hist| hist.iter().any(|&c| c > 0.0))
                .count()
        );
    }

    Ok(descriptor)
}

/// Validate encoder inputs.
fn validate_inputs(
    points: &[Point],
    labels: &[usize],
    bbox: &BoundingBox,
    layout: &PyramidLayout,
) -> Result<()> {
    if points.len() != labels.len() {
        return Err(BofError::length_mismatch(points.len(), labels.len()));
    }

    let k = layout.num_clusters();
    if let Some((index, &label)) = labels.iter().enumerate().find(|(_, l)| **l >= k) {
        return Err(BofError::label_out_of_range(index, label, k));
    }

    let tolerance = layout.tolerance();
    for (index, &p) in points.iter().enumerate() {
        if !(p[0].is_finite() && p[1].is_finite()) {
            return Err(BofError::non_finite_point(index, p));
        }
        if !bbox.contains(p, tolerance) {
            return Err(BofError::point_outside_bounds(index, p));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_box() -> BoundingBox {
        BoundingBox::new(0.0, 0.0, 1.0, 1.0).unwrap()
    }

    #[test]
    fn test_two_row_scenario() {
        let layout = PyramidLayout::new([(2, 1)], 2).unwrap();
        let points = vec![[0.0, 0.0], [0.0, 0.0], [1.0, 1.0]];
        let labels = vec![0, 1, 0];

        let d = encode(&points, &labels, &unit_box(), &layout).unwrap();
        assert_eq!(d.as_slice(), &[1.0, 1.0, 1.0, 0.0]);
    }

    #[test]
    fn test_multi_level_coverage() {
        let layout = PyramidLayout::new([(1, 1), (2, 2)], 1).unwrap();
        let points = vec![[0.1, 0.2], [0.7, 0.3], [0.9, 0.9], [0.2, 0.8], [0.6, 0.6]];
        let labels = vec![0; points.len()];

        let d = encode(&points, &labels, &unit_box(), &layout).unwrap();
        assert_eq!(d.len(), 5);
        assert_relative_eq!(d.as_slice()[0], 5.0);
        assert_eq!(&d.as_slice()[1..], &[1.0, 1.0, 1.0, 2.0]);
    }

    #[test]
    fn test_every_level_counts_every_point() {
        let layout = PyramidLayout::new([(1, 1), (3, 2), (2, 5), (4, 4)], 3).unwrap();
        let points: Vec<Point> = (0..40_u32)
            .map(|i| {
                let t = f64::from(i) / 39.0;
                [t, (7.0 * t).fract()]
            })
            .collect();
        let labels: Vec<usize> = (0..points.len()).map(|i| i % 3).collect();

        let d = encode(&points, &labels, &unit_box(), &layout).unwrap();
        assert_eq!(d.level_sizes(), layout.level_sizes().as_slice());
        for (level, sum) in d.level_sums().into_iter().enumerate() {
            assert_relative_eq!(sum, 40.0, epsilon = 1e-12);
            assert_eq!(d.level_block(level).unwrap().len(), layout.level_size(level).unwrap());
        }
    }

    #[test]
    fn test_empty_input_gives_zeros() {
        let layout = PyramidLayout::new([(6, 2), (3, 2)], 128).unwrap();
        let d = encode(&[], &[], &unit_box(), &layout).unwrap();

        assert_eq!(d.len(), layout.descriptor_size());
        assert!(d.as_slice().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_label_placement() {
        let layout = PyramidLayout::new([(1, 2)], 3).unwrap();
        let points = vec![[0.9, 0.5], [0.9, 0.5], [0.1, 0.5]];
        let labels = vec![2, 2, 1];

        let d = encode(&points, &labels, &unit_box(), &layout).unwrap();
        assert_eq!(d.as_slice(), &[0.0, 1.0, 0.0, 0.0, 0.0, 2.0]);
    }

    #[test]
    fn test_validation_length_mismatch() {
        let layout = PyramidLayout::new([(1, 1)], 2).unwrap();
        let result = encode(&[[0.0, 0.0]], &[0, 1], &unit_box(), &layout);
        assert!(matches!(
            result,
            Err(BofError::LengthMismatch { points: 1, labels: 2 })
        ));
    }

    #[test]
    fn test_validation_label_out_of_range() {
        let layout = PyramidLayout::new([(1, 1)], 4).unwrap();
        let points = vec![[0.0, 0.0], [0.5, 0.5], [1.0, 1.0]];
        let result = encode(&points, &[0, 3, 4], &unit_box(), &layout);
        assert!(matches!(
            result,
            Err(BofError::LabelOutOfRange { index: 2, label: 4, num_clusters: 4 })
        ));
    }

    #[test]
    fn test_validation_point_outside_box() {
        let layout = PyramidLayout::new([(2, 2)], 1).unwrap();
        let points = vec![[0.5, 0.5], [0.5, 1.1]];
        let result = encode(&points, &[0, 0], &unit_box(), &layout);
        assert!(matches!(
            result,
            Err(BofError::PointOutsideBounds { index: 1, .. })
        ));
    }

    #[test]
    fn test_validation_non_finite_point() {
        let layout = PyramidLayout::new([(2, 2)], 1).unwrap();
        let points = vec![[0.5, f64::INFINITY]];
        let result = encode(&points, &[0], &unit_box(), &layout);
        assert!(matches!(result, Err(BofError::NonFinitePoint { index: 0, .. })));
    }

    #[test]
    fn test_permutation_invariance() {
        let layout = PyramidLayout::new([(3, 2), (2, 2)], 3).unwrap();
        let points = vec![[0.1, 0.1], [0.8, 0.4], [0.5, 0.95], [0.3, 0.6]];
        let labels = vec![0, 2, 1, 2];

        let forward = encode(&points, &labels, &unit_box(), &layout).unwrap();

        let rev_points: Vec<_> = points.iter().rev().copied().collect();
        let rev_labels: Vec<_> = labels.iter().rev().copied().collect();
        let reversed = encode(&rev_points, &rev_labels, &unit_box(), &layout).unwrap();

        assert_eq!(forward, reversed);
    }
}
