//! Error types for spatial-pyramid descriptor construction.
//!
//! Every failure is either a configuration problem (a malformed pyramid
//! layout) or a data problem (inputs that violate the encoder's contract).
//! [`BofError::kind`] tells the two apart.

use thiserror::Error;

/// Broad classification of a [`BofError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The pyramid layout or its configuration is malformed.
    Configuration,
    /// The points, labels or bounding box handed to the encoder are invalid.
    Data,
}

/// Main error type for descriptor construction.
#[derive(Error, Debug)]
pub enum BofError {
    /// Configuration validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The pyramid has no levels.
    #[error("Invalid configuration: pyramid must have at least one level")]
    EmptyLevels,

    /// A level has a zero-sized grid.
    #[error("Invalid configuration: level {level} has grid {rows}x{cols}, both dimensions must be positive")]
    InvalidGrid { level: usize, rows: usize, cols: usize },

    /// The codebook is empty.
    #[error("Invalid configuration: number of clusters must be positive")]
    EmptyCodebook,

    /// Points and labels have different lengths.
    #[error("Length mismatch: {points} points vs {labels} labels")]
    LengthMismatch { points: usize, labels: usize },

    /// A label is not a valid visual-word index.
    #[error("Label {label} at index {index} is out of range for a codebook of {num_clusters} clusters")]
    LabelOutOfRange {
        index: usize,
        label: usize,
        num_clusters: usize,
    },

    /// A point has a NaN or infinite coordinate.
    #[error("Point at index {index} has a non-finite coordinate ({x}, {y})")]
    NonFinitePoint { index: usize, x: f64, y: f64 },

    /// A point lies outside the bounding box by more than the tolerance.
    #[error("Point at index {index} ({x}, {y}) lies outside the bounding box")]
    PointOutsideBounds { index: usize, x: f64, y: f64 },

    /// A single point lies outside the bounding box, outside any sequence.
    #[error("Point ({x}, {y}) lies outside the bounding box")]
    PointOutsideBox { x: f64, y: f64 },

    /// A descriptor whose level sizes do not add up to its length.
    #[error("Invalid descriptor: {0}")]
    InvalidDescriptor(String),

    /// A bounding box with non-finite values or negative extents.
    #[error("Invalid bounding box: {0}")]
    InvalidBoundingBox(String),

    /// A level index past the end of the pyramid was requested.
    #[error("Level {level} does not exist in a pyramid of {num_levels} levels")]
    LevelOutOfRange { level: usize, num_levels: usize },

    /// No points were given, so no bounding box exists.
    #[error("Cannot build a descriptor from an empty trajectory")]
    EmptyTrajectory,

    /// A trajectory inside a batch failed.
    #[error("Trajectory {index} in batch failed: {source}")]
    Batch {
        index: usize,
        #[source]
        source: Box<BofError>,
    },
}

/// Result type alias for descriptor operations.
pub type Result<T> = std::result::Result<T, BofError>;

impl BofError {
    /// Create an invalid configuration error.
    #[must_use]
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create an invalid grid error.
    #[must_use]
    pub const fn invalid_grid(level: usize, rows: usize, cols: usize) -> Self {
        Self::InvalidGrid { level, rows, cols }
    }

    /// Create a length mismatch error.
    #[must_use]
    pub const fn length_mismatch(points: usize, labels: usize) -> Self {
        Self::LengthMismatch { points, labels }
    }

    /// Create a label out of range error.
    #[must_use]
    pub const fn label_out_of_range(index: usize, label: usize, num_clusters: usize) -> Self {
        Self::LabelOutOfRange {
            index,
            label,
            num_clusters,
        }
    }

    /// Create a point outside bounds error.
    #[must_use]
    pub const fn point_outside_bounds(index: usize, point: [f64; 2]) -> Self {
        Self::PointOutsideBounds {
            index,
            x: point[0],
            y: point[1],
        }
    }

    /// Create a point outside box error for a point with no sequence index.
    #[must_use]
    pub const fn point_outside_box(point: [f64; 2]) -> Self {
        Self::PointOutsideBox {
            x: point[0],
            y: point[1],
        }
    }

    /// Create a non-finite point error.
    #[must_use]
    pub const fn non_finite_point(index: usize, point: [f64; 2]) -> Self {
        Self::NonFinitePoint {
            index,
            x: point[0],
            y: point[1],
        }
    }

    /// Create an invalid bounding box error.
    #[must_use]
    pub fn invalid_bounding_box(msg: impl Into<String>) -> Self {
        Self::InvalidBoundingBox(msg.into())
    }

    /// Wrap the error of one batch entry.
    #[must_use]
    pub fn batch(index: usize, source: BofError) -> Self {
        Self::Batch {
            index,
            source: Box::new(source),
        }
    }

    /// Classify the error as a configuration or data problem.
    ///
    /// Batch errors take the kind of the failing entry.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidConfig(_)
            | Self::EmptyLevels
            | Self::InvalidGrid { .. }
            | Self::EmptyCodebook => ErrorKind::Configuration,
            Self::LengthMismatch { .. }
            | Self::LabelOutOfRange { .. }
            | Self::NonFinitePoint { .. }
            | Self::PointOutsideBounds { .. }
            | Self::PointOutsideBox { .. }
            | Self::InvalidDescriptor(_)
            | Self::InvalidBoundingBox(_)
            | Self::LevelOutOfRange { .. }
            | Self::EmptyTrajectory => ErrorKind::Data,
            Self::Batch { source, .. } => source.kind(),
        }
    }

    /// Whether this is a configuration error.
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        self.kind() == ErrorKind::Configuration
    }

    /// Whether this is a data error.
    #[must_use]
    pub fn is_data(&self) -> bool {
        self.kind() == ErrorKind::Data
    }
}
