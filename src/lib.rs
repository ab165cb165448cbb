//! Spatial-Pyramid Bag-of-Features
//!
//! Fixed-length descriptors for online handwriting trajectories.
//!
//! Each trajectory point carries a visual-word label produced by an upstream
//! quantizer. The plane around the trajectory is split into grids of
//! increasing resolution, and every grid cell gets a histogram of the labels
//! falling inside it. All histograms are concatenated into one vector that a
//! classifier can consume.
//!
//! # Features
//!
//! - **Fixed layout**: descriptor length depends only on the pyramid layout
//! - **Raw counts**: no hidden normalization; opt-in post-processing instead
//! - **Degenerate-safe**: flat or single-point trajectories are well defined
//! - **Batching**: build a descriptor matrix for many trajectories at once
//!
//! # Quick Start
//!
//! ```
//! use pyramid_bof::{build_descriptor, PyramidConfig, PyramidLayout};
//!
//! let points = vec![
//!     [0.0, 0.0],
//!     [0.2, 1.0],
//!     [0.5, 2.0],
//!     [0.8, 1.0],
//!     [1.0, 0.0],
//! ];
//! let labels = vec![4, 9, 9, 4, 120];
//!
//! let layout = PyramidLayout::from_config(&PyramidConfig::handwriting())?;
//! let descriptor = build_descriptor(&points, &labels, &layout)?;
//!
//! assert_eq!(descriptor.len(), layout.descriptor_size());
//! assert_eq!(descriptor.total(), 2.0 * points.len() as f64);
//! # Ok::<(), pyramid_bof::BofError>(())
//! ```
//!
//! # Descriptor Layout
//!
//! | Order | Component |
//! |-------|-----------|
//! | 1 | Level, in configuration order |
//! | 2 | Cell, row-major (`row * cols + col`) |
//! | 3 | Visual word `0..K` |
//!
//! # Logging
//!
//! Diagnostics go through the [`log`] facade; install any logger to see them.

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]

pub mod builder;
pub mod config;
pub mod descriptor;
pub mod encoder;
pub mod error;
pub mod geometry;
pub mod layout;
pub mod normalization;
pub mod validation;

// Re-exports for convenient access
pub use builder::{build_descriptor, DescriptorBuilder, DescriptorMatrix};
pub use config::{
    GridShape, PyramidConfig, DEFAULT_BOUNDS_TOLERANCE, DEFAULT_LEVELS, DEFAULT_NUM_CLUSTERS,
};
pub use descriptor::Descriptor;
pub use encoder::encode;
pub use error::{BofError, ErrorKind, Result};
pub use geometry::{BoundingBox, Point};
pub use layout::PyramidLayout;
pub use normalization::Normalization;
pub use validation::{check_descriptor, DescriptorReport, LevelReport};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
