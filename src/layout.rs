//! Immutable pyramid layout: level shapes, codebook size and cell binning.
//!
//! # Descriptor Layout
//!
//! The descriptor is the concatenation of one block per level, in level
//! order. A level block holds one histogram of `K` counts per cell, with
//! cells in row-major order (`row * cols + col`). Row 0 covers the smallest
//! y values, column 0 the smallest x values.
//!
//! For the default `[(6, 2), (3, 2)]` layout with `K = 128`:
//!
//! | Range | Level | Cells | Length |
//! |-------|-------|-------|--------|
//! | 0:1536 | 0 | 6x2 | 12 * 128 |
//! | 1536:2304 | 1 | 3x2 | 6 * 128 |

use crate::config::{GridShape, PyramidConfig};
use crate::error::{BofError, Result};
use crate::geometry::{BoundingBox, Point};

/// Validated, read-only description of a spatial pyramid.
///
/// Built once and shared across any number of descriptor computations.
#[derive(Debug, Clone, PartialEq)]
pub struct PyramidLayout {
    levels: Vec<GridShape>,
    num_clusters: usize,
    tolerance: f64,
    /// Start of each level block in the descriptor, plus the total length.
    offsets: Vec<usize>,
}

impl PyramidLayout {
    /// Create a layout from level shapes and a codebook size.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `levels` is empty, a grid has a zero
    /// dimension or `num_clusters` is zero.
    ///
    /// # Example
    ///
    /// ```
    /// use pyramid_bof::PyramidLayout;
    ///
    /// let layout = PyramidLayout::new([(6, 2), (3, 2)], 128)?;
    /// assert_eq!(layout.descriptor_size(), 128 * (12 + 6));
    /// # Ok::<(), pyramid_bof::BofError>(())
    /// ```
    pub fn new<I, S>(levels: I, num_clusters: usize) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<GridShape>,
    {
        let config = PyramidConfig::new()
            .with_levels(levels)
            .with_num_clusters(num_clusters);
        Self::from_config(&config)
    }

    /// Create a layout from a configuration.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if [`PyramidConfig::validate`] fails,
    /// including when the descriptor length does not fit in `usize`.
    pub fn from_config(config: &PyramidConfig) -> Result<Self> {
        config.validate()?;

        // validate() has checked that every partial sum fits
        let mut offsets = Vec::with_capacity(config.levels.len() + 1);
        let mut offset = 0;
        offsets.push(offset);
        for shape in &config.levels {
            offset += shape.num_cells() * config.num_clusters;
            offsets.push(offset);
        }

        Ok(Self {
            levels: config.levels.clone(),
            num_clusters: config.num_clusters,
            tolerance: config.bounds_tolerance,
            offsets,
        })
    }

    /// Descriptor length: `K * sum(rows_i * cols_i)`.
    #[must_use]
    pub fn descriptor_size(&self) -> usize {
        self.offsets[self.levels.len()]
    }

    /// Codebook size K.
    #[must_use]
    pub fn num_clusters(&self) -> usize {
        self.num_clusters
    }

    /// Number of pyramid levels.
    #[must_use]
    pub fn num_levels(&self) -> usize {
        self.levels.len()
    }

    /// All level shapes in descriptor order.
    #[must_use]
    pub fn levels(&self) -> &[GridShape] {
        &self.levels
    }

    /// Shape of one level.
    #[must_use]
    pub fn level(&self, level: usize) -> Option<GridShape> {
        self.levels.get(level).copied()
    }

    /// Start of a level's block in the descriptor.
    #[must_use]
    pub fn level_offset(&self, level: usize) -> Option<usize> {
        (level < self.levels.len()).then(|| self.offsets[level])
    }

    /// Length of a level's block (`K * rows * cols`).
    #[must_use]
    pub fn level_size(&self, level: usize) -> Option<usize> {
        self.level(level)
            .map(|shape| shape.num_cells() * self.num_clusters)
    }

    /// Block lengths of every level, in order.
    #[must_use]
    pub fn level_sizes(&self) -> Vec<usize> {
        self.offsets.windows(2).map(|w| w[1] - w[0]).collect()
    }

    /// Relative bounds tolerance.
    #[must_use]
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Index of the cell containing `point` at `level`.
    ///
    /// Cells are numbered row-major. Intervals are half-open except the last
    /// row/column, which also takes points on the upper edge of the box. A
    /// zero-width (zero-height) box sends every point to column (row) 0.
    ///
    /// # Errors
    ///
    /// Returns [`BofError::LevelOutOfRange`] for an unknown level and
    /// [`BofError::PointOutsideBox`] if the point is outside the box by more
    /// than the layout tolerance.
    pub fn cell_index(&self, level: usize, point: Point, bbox: &BoundingBox) -> Result<usize> {
        let shape = self.level(level).ok_or(BofError::LevelOutOfRange {
            level,
            num_levels: self.levels.len(),
        })?;
        if !bbox.contains(point, self.tolerance) {
            return Err(BofError::point_outside_box(point));
        }
        Ok(cell_of(shape, point, bbox))
    }
}

/// Cell lookup for a point already known to be inside the box.
pub(crate) fn cell_of(shape: GridShape, point: Point, bbox: &BoundingBox) -> usize {
    let row = bin(point[1], bbox.origin_y, bbox.height, shape.rows);
    let col = bin(point[0], bbox.origin_x, bbox.width, shape.cols);
    row * shape.cols + col
}

/// Map a coordinate into one of `n` equal bins over `[origin, origin + extent]`.
fn bin(v: f64, origin: f64, extent: f64, n: usize) -> usize {
    if extent <= 0.0 {
        return 0;
    }
    let pos = ((v - origin) / extent * n as f64).floor();
    if pos <= 0.0 {
        0
    } else {
        (pos as usize).min(n - 1)
    }
}
