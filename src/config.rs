//! Configuration for spatial-pyramid descriptors.
//!
//! This module provides [`PyramidConfig`], which gathers the grid shapes of
//! every pyramid level, the codebook size and the bounds tolerance, along
//! with a few presets.
//!
//! # Example
//!
//! ```
//! use pyramid_bof::{GridShape, PyramidConfig};
//!
//! // 6x2 and 3x2 grids over a 128-word codebook
//! let config = PyramidConfig::default();
//! assert_eq!(config.levels, vec![GridShape::new(6, 2), GridShape::new(3, 2)]);
//!
//! // Square 1x1, 2x2, 4x4 pyramid
//! let classic = PyramidConfig::classic(3).with_num_clusters(64);
//! assert!(classic.validate().is_ok());
//! ```

use crate::error::{BofError, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default grid shapes `(rows, cols)` for handwriting trajectories.
pub const DEFAULT_LEVELS: [(usize, usize); 2] = [(6, 2), (3, 2)];

/// Default codebook size.
pub const DEFAULT_NUM_CLUSTERS: usize = 128;

/// Default relative tolerance for points on the bounding box edge.
pub const DEFAULT_BOUNDS_TOLERANCE: f64 = 1e-9;

/// Grid shape of one pyramid level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GridShape {
    /// Number of rows (cells along y).
    pub rows: usize,
    /// Number of columns (cells along x).
    pub cols: usize,
}

impl GridShape {
    /// Create a grid shape.
    #[must_use]
    pub const fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    /// Number of cells in the grid, saturating at `usize::MAX`.
    #[must_use]
    pub const fn num_cells(&self) -> usize {
        self.rows.saturating_mul(self.cols)
    }

    /// Number of cells in the grid, or `None` on overflow.
    #[must_use]
    pub const fn checked_num_cells(&self) -> Option<usize> {
        self.rows.checked_mul(self.cols)
    }
}

impl From<(usize, usize)> for GridShape {
    fn from((rows, cols): (usize, usize)) -> Self {
        Self::new(rows, cols)
    }
}

impl From<[usize; 2]> for GridShape {
    fn from([rows, cols]: [usize; 2]) -> Self {
        Self::new(rows, cols)
    }
}

/// Configuration for descriptor construction.
///
/// # Parameters
///
/// - `levels`: grid shape per level, coarse-to-fine or in any order; the
///   order fixes the descriptor layout.
/// - `num_clusters`: codebook size K; labels must lie in `[0, K)`.
/// - `bounds_tolerance`: relative slack allowed when checking that points lie
///   inside the bounding box.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PyramidConfig {
    /// Grid shape per level, in descriptor order.
    pub levels: Vec<GridShape>,

    /// Codebook size (number of visual words).
    pub num_clusters: usize,

    /// Relative tolerance for the bounding box containment check.
    pub bounds_tolerance: f64,
}

impl Default for PyramidConfig {
    fn default() -> Self {
        Self {
            levels: DEFAULT_LEVELS.iter().map(|&shape| shape.into()).collect(),
            num_clusters: DEFAULT_NUM_CLUSTERS,
            bounds_tolerance: DEFAULT_BOUNDS_TOLERANCE,
        }
    }
}

impl PyramidConfig {
    /// Create a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the level list is empty, a grid has a
    /// zero dimension, the codebook is empty, the descriptor length does not
    /// fit in `usize`, or the tolerance is negative or non-finite.
    pub fn validate(&self) -> Result<()> {
        if self.levels.is_empty() {
            return Err(BofError::EmptyLevels);
        }
        for (level, shape) in self.levels.iter().enumerate() {
            if shape.rows == 0 || shape.cols == 0 {
                return Err(BofError::invalid_grid(level, shape.rows, shape.cols));
            }
        }
        if self.num_clusters == 0 {
            return Err(BofError::EmptyCodebook);
        }
        self.descriptor_size()?;
        if !self.bounds_tolerance.is_finite() || self.bounds_tolerance < 0.0 {
            return Err(BofError::invalid_config(
                "bounds_tolerance must be finite and non-negative",
            ));
        }
        Ok(())
    }

    /// Descriptor length `K * sum(rows_i * cols_i)`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the length overflows `usize`.
    pub fn descriptor_size(&self) -> Result<usize> {
        self.levels
            .iter()
            .try_fold(0_usize, |total, shape| {
                shape
                    .checked_num_cells()
                    .and_then(|cells| cells.checked_mul(self.num_clusters))
                    .and_then(|size| total.checked_add(size))
            })
            .ok_or_else(|| BofError::invalid_config("descriptor length overflows usize"))
    }

    /// Preset for online handwriting: tall 6x2 and 3x2 grids, 128 words.
    #[must_use]
    pub fn handwriting() -> Self {
        Self::default()
    }

    /// Square pyramid with `depth` levels: 1x1, 2x2, 4x4, ...
    ///
    /// Sides that do not fit in `usize` saturate, so an overly deep pyramid
    /// fails [`validate`](Self::validate) instead of overflowing here.
    #[must_use]
    pub fn classic(depth: usize) -> Self {
        Self {
            levels: (0..depth)
                .map(|l| {
                    let side = u32::try_from(l)
                        .ok()
                        .and_then(|shift| 1_usize.checked_shl(shift))
                        .unwrap_or(usize::MAX);
                    GridShape::new(side, side)
                })
                .collect(),
            ..Self::default()
        }
    }

    /// Single-level grid (plain bag-of-features when `rows == cols == 1`).
    #[must_use]
    pub fn single_grid(rows: usize, cols: usize) -> Self {
        Self {
            levels: vec![GridShape::new(rows, cols)],
            ..Self::default()
        }
    }

    /// Set the level shapes.
    #[must_use]
    pub fn with_levels<I, S>(mut self, levels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<GridShape>,
    {
        self.levels = levels.into_iter().map(Into::into).collect();
        self
    }

    /// Set the codebook size.
    #[must_use]
    pub fn with_num_clusters(mut self, k: usize) -> Self {
        self.num_clusters = k;
        self
    }

    /// Set the bounds tolerance.
    #[must_use]
    pub fn with_bounds_tolerance(mut self, tolerance: f64) -> Self {
        self.bounds_tolerance = tolerance;
        self
    }

    /// Total number of cells across all levels, saturating at `usize::MAX`.
    #[must_use]
    pub fn total_cells(&self) -> usize {
        self.levels
            .iter()
            .map(GridShape::num_cells)
            .fold(0, usize::saturating_add)
    }
}
