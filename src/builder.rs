//! Descriptor construction from raw point/label sequences.
//!
//! [`build_descriptor`] computes the tight bounding box of a trajectory and
//! hands it to the encoder. [`DescriptorBuilder`] wraps a layout for repeated
//! use and adds batch construction into a [`DescriptorMatrix`].

use crate::descriptor::Descriptor;
use crate::encoder::encode;
use crate::error::{BofError, Result};
use crate::geometry::{BoundingBox, Point};
use crate::layout::PyramidLayout;

/// Upper bound on the values reserved up front by a batch build.
const MAX_BATCH_RESERVE: usize = 1 << 20;

/// Build the descriptor of one trajectory.
///
/// # Errors
///
/// Returns [`BofError::EmptyTrajectory`] if `points` is empty, plus any error
/// of [`encode`].
///
/// # Example
///
/// ```
/// use pyramid_bof::{build_descriptor, PyramidLayout};
///
/// let layout = PyramidLayout::new([(1, 1), (2, 2)], 1)?;
/// let points = [[0.0, 0.0], [3.0, 1.0], [1.0, 2.0]];
/// let descriptor = build_descriptor(&points, &[0, 0, 0], &layout)?;
///
/// assert_eq!(descriptor.as_slice()[0], 3.0);
/// # Ok::<(), pyramid_bof::BofError>(())
/// ```
pub fn build_descriptor(
    points: &[Point],
    labels: &[usize],
    layout: &PyramidLayout,
) -> Result<Descriptor> {
    let bbox = BoundingBox::from_points(points)?;
    log::debug!(
        "building descriptor of {} for {} points in box ({}, {}) {}x{}",
        layout.descriptor_size(),
        points.len(),
        bbox.origin_x,
        bbox.origin_y,
        bbox.width,
        bbox.height
    );
    encode(points, labels, &bbox, layout)
}

/// Reusable descriptor builder bound to one layout.
///
/// # Example
///
/// ```
/// use pyramid_bof::{DescriptorBuilder, PyramidConfig, PyramidLayout};
///
/// let layout = PyramidLayout::from_config(&PyramidConfig::handwriting())?;
/// let builder = DescriptorBuilder::new(layout);
///
/// let points = vec![[0.0, 0.0], [0.5, 2.0], [1.0, 4.0]];
/// let labels = vec![3, 17, 3];
/// let descriptor = builder.build(&points, &labels)?;
/// assert_eq!(descriptor.len(), builder.descriptor_size());
/// # Ok::<(), pyramid_bof::BofError>(())
/// ```
#[derive(Debug, Clone)]
pub struct DescriptorBuilder {
    layout: PyramidLayout,
}

impl DescriptorBuilder {
    /// Create a builder for `layout`.
    #[must_use]
    pub fn new(layout: PyramidLayout) -> Self {
        Self { layout }
    }

    /// The layout descriptors are built with.
    #[must_use]
    pub fn layout(&self) -> &PyramidLayout {
        &self.layout
    }

    /// Length of every descriptor this builder produces.
    #[must_use]
    pub fn descriptor_size(&self) -> usize {
        self.layout.descriptor_size()
    }

    /// Build the descriptor of one trajectory.
    ///
    /// # Errors
    ///
    /// See [`build_descriptor`].
    pub fn build(&self, points: &[Point], labels: &[usize]) -> Result<Descriptor> {
        build_descriptor(points, labels, &self.layout)
    }

    /// Build descriptors for many trajectories, one matrix row each.
    ///
    /// # Errors
    ///
    /// Stops at the first failing trajectory and returns
    /// [`BofError::Batch`] carrying its position and error.
    pub fn build_batch<'a, I>(&self, trajectories: I) -> Result<DescriptorMatrix>
    where
        I: IntoIterator<Item = (&'a [Point], &'a [usize])>,
    {
        let cols = self.descriptor_size();
        let trajectories = trajectories.into_iter();
        let reserve = trajectories
            .size_hint()
            .0
            .saturating_mul(cols)
            .min(MAX_BATCH_RESERVE);
        let mut data = Vec::with_capacity(reserve);
        let mut rows = 0;

        for (index, (points, labels)) in trajectories.enumerate() {
            let descriptor = self.build(points, labels).map_err(|e| {
                log::warn!("trajectory {} rejected: {}", index, e);
                BofError::batch(index, e)
            })?;
            data.extend_from_slice(descriptor.as_slice());
            rows += 1;
        }

        log::info!("accumulated {} descriptors of length {}", rows, cols);
        Ok(DescriptorMatrix { data, rows, cols })
    }
}

/// Row-major matrix of descriptors, one trajectory per row.
#[derive(Debug, Clone, PartialEq)]
pub struct DescriptorMatrix {
    data: Vec<f64>,
    rows: usize,
    cols: usize,
}

impl DescriptorMatrix {
    /// Number of descriptors.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Descriptor length.
    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// One descriptor.
    #[must_use]
    pub fn row(&self, i: usize) -> Option<&[f64]> {
        (i < self.rows).then(|| &self.data[i * self.cols..(i + 1) * self.cols])
    }

    /// Iterate over descriptors in batch order.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[f64]> {
        (0..self.rows).map(move |i| &self.data[i * self.cols..(i + 1) * self.cols])
    }

    /// Flat row-major data.
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Consume into flat row-major data.
    #[must_use]
    pub fn into_vec(self) -> Vec<f64> {
        self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn generate_stroke(n: usize, height: f64) -> Vec<Point> {
        (0..n)
            .map(|i| {
                let t = i as f64 / (n - 1) as f64;
                [0.3 * (6.0 * t).sin(), height * t]
            })
            .collect()
    }

    #[test]
    fn test_build_uses_tight_box() {
        let layout = PyramidLayout::new([(2, 1)], 2).unwrap();
        // Same configuration as the unit-box scenario, shifted and scaled
        let points = vec![[10.0, -4.0], [10.0, -4.0], [12.0, -2.0]];
        let d = build_descriptor(&points, &[0, 1, 0], &layout).unwrap();
        assert_eq!(d.as_slice(), &[1.0, 1.0, 1.0, 0.0]);
    }

    #[test]
    fn test_build_empty_trajectory() {
        let layout = PyramidLayout::new([(2, 2)], 4).unwrap();
        let result = build_descriptor(&[], &[], &layout);
        assert!(matches!(result, Err(BofError::EmptyTrajectory)));
    }

    #[test]
    fn test_build_single_point() {
        let layout = PyramidLayout::new([(6, 2), (3, 2)], 8).unwrap();
        let d = build_descriptor(&[[4.0, 4.0]], &[5], &layout).unwrap();

        // Degenerate box: first cell of every level
        assert_relative_eq!(d.as_slice()[5], 1.0);
        assert_relative_eq!(d.as_slice()[layout.level_offset(1).unwrap() + 5], 1.0);
        assert_relative_eq!(d.total(), 2.0);
    }

    #[test]
    fn test_count_conservation() {
        let layout = PyramidLayout::new([(6, 2), (3, 2)], 16).unwrap();
        let points = generate_stroke(200, 3.0);
        let labels: Vec<usize> = (0..points.len()).map(|i| (i * 7) % 16).collect();

        let d = DescriptorBuilder::new(layout).build(&points, &labels).unwrap();
        for sum in d.level_sums() {
            assert_relative_eq!(sum, 200.0);
        }
    }

    #[test]
    fn test_build_batch() {
        let layout = PyramidLayout::new([(2, 2)], 4).unwrap();
        let builder = DescriptorBuilder::new(layout);

        let a = generate_stroke(20, 1.0);
        let b = generate_stroke(50, 2.0);
        let la = vec![1; a.len()];
        let lb = vec![2; b.len()];

        let matrix = builder
            .build_batch([(a.as_slice(), la.as_slice()), (b.as_slice(), lb.as_slice())])
            .unwrap();

        assert_eq!(matrix.rows(), 2);
        assert_eq!(matrix.cols(), 16);
        assert_eq!(matrix.as_slice().len(), 32);

        let single = builder.build(&b, &lb).unwrap();
        assert_eq!(matrix.row(1).unwrap(), single.as_slice());
        assert!(matrix.row(2).is_none());

        let totals: Vec<f64> = matrix.iter_rows().map(|r| r.iter().sum()).collect();
        assert_eq!(totals, vec![20.0, 50.0]);
    }

    #[test]
    fn test_build_batch_empty() {
        let builder = DescriptorBuilder::new(PyramidLayout::new([(2, 2)], 4).unwrap());
        let matrix = builder.build_batch(std::iter::empty()).unwrap();
        assert_eq!(matrix.rows(), 0);
        assert_eq!(matrix.cols(), 16);
        assert!(matrix.into_vec().is_empty());
    }

    /// Yields its items but claims a lower bound far beyond them.
    struct Overstated<I>(I);

    impl<I: Iterator> Iterator for Overstated<I> {
        type Item = I::Item;

        fn next(&mut self) -> Option<Self::Item> {
            self.0.next()
        }

        fn size_hint(&self) -> (usize, Option<usize>) {
            (usize::MAX, None)
        }
    }

    #[test]
    fn test_build_batch_ignores_oversized_hint() {
        let builder = DescriptorBuilder::new(PyramidLayout::new([(6, 2), (3, 2)], 128).unwrap());
        let points = generate_stroke(10, 1.0);
        let labels = vec![5; points.len()];

        let matrix = builder
            .build_batch(Overstated(std::iter::once((points.as_slice(), labels.as_slice()))))
            .unwrap();
        assert_eq!(matrix.rows(), 1);
        assert_eq!(matrix.cols(), 2304);
        assert_relative_eq!(matrix.row(0).unwrap().iter().sum::<f64>(), 20.0);
    }

    #[test]
    fn test_build_batch_reports_failing_index() {
        let builder = DescriptorBuilder::new(PyramidLayout::new([(1, 1)], 2).unwrap());
        let good = vec![[0.0, 0.0], [1.0, 1.0]];
        let labels = vec![0, 1];
        let bad_labels = vec![0, 2];

        let result = builder.build_batch([
            (good.as_slice(), labels.as_slice()),
            (good.as_slice(), bad_labels.as_slice()),
        ]);

        match result {
            Err(BofError::Batch { index, source }) => {
                assert_eq!(index, 1);
                assert!(matches!(*source, BofError::LabelOutOfRange { .. }));
            }
            other => panic!("expected batch error, got {other:?}"),
        }
    }
}
