//! Planar geometry primitives: points and axis-aligned bounding boxes.

use crate::error::{BofError, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A trajectory sample `[x, y]`.
pub type Point = [f64; 2];

/// Axis-aligned box enclosing a point set.
///
/// `width` and `height` are never negative. Either may be exactly zero when
/// every point shares the same coordinate on that axis.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BoundingBox {
    /// Minimum x coordinate.
    pub origin_x: f64,
    /// Minimum y coordinate.
    pub origin_y: f64,
    /// Extent along x (`max_x - min_x`).
    pub width: f64,
    /// Extent along y (`max_y - min_y`).
    pub height: f64,
}

impl BoundingBox {
    /// Create a box from its origin and extents.
    ///
    /// # Errors
    ///
    /// Returns an error if any value is non-finite or an extent is negative.
    pub fn new(origin_x: f64, origin_y: f64, width: f64, height: f64) -> Result<Self> {
        if !(origin_x.is_finite() && origin_y.is_finite() && width.is_finite() && height.is_finite())
        {
            return Err(BofError::invalid_bounding_box(
                "bounding box values must be finite",
            ));
        }
        if width < 0.0 || height < 0.0 {
            return Err(BofError::invalid_bounding_box(
                "bounding box extents must be non-negative",
            ));
        }
        Ok(Self {
            origin_x,
            origin_y,
            width,
            height,
        })
    }

    /// Tight box over `points` (min/max per axis).
    ///
    /// # Errors
    ///
    /// Returns [`BofError::EmptyTrajectory`] for an empty slice and
    /// [`BofError::NonFinitePoint`] if any coordinate is NaN or infinite.
    pub fn from_points(points: &[Point]) -> Result<Self> {
        let first = points.first().ok_or(BofError::EmptyTrajectory)?;

        let mut min = *first;
        let mut max = *first;
        for (index, p) in points.iter().enumerate() {
            if !(p[0].is_finite() && p[1].is_finite()) {
                return Err(BofError::non_finite_point(index, *p));
            }
            min[0] = min[0].min(p[0]);
            min[1] = min[1].min(p[1]);
            max[0] = max[0].max(p[0]);
            max[1] = max[1].max(p[1]);
        }

        Ok(Self {
            origin_x: min[0],
            origin_y: min[1],
            width: max[0] - min[0],
            height: max[1] - min[1],
        })
    }

    /// Maximum x coordinate.
    #[must_use]
    pub fn max_x(&self) -> f64 {
        self.origin_x + self.width
    }

    /// Maximum y coordinate.
    #[must_use]
    pub fn max_y(&self) -> f64 {
        self.origin_y + self.height
    }

    /// Whether `point` lies inside the box, allowing a relative slack of
    /// `tolerance` on each axis.
    #[must_use]
    pub fn contains(&self, point: Point, tolerance: f64) -> bool {
        within(point[0], self.origin_x, self.max_x(), tolerance)
            && within(point[1], self.origin_y, self.max_y(), tolerance)
    }
}

/// Interval test with slack scaled by the magnitude of the bounds.
fn within(v: f64, lo: f64, hi: f64, tolerance: f64) -> bool {
    let slack = tolerance * 1.0_f64.max(lo.abs()).max(hi.abs());
    v >= lo - slack && v <= hi + slack
}
