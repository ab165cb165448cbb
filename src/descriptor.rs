//! Descriptor vectors produced by the spatial-pyramid encoder.
//!
//! A [`Descriptor`] owns its values and remembers the length of each level
//! block, so one level can be sliced out without the originating layout.

use crate::error::{BofError, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Fixed-length spatial-pyramid bag-of-features vector.
///
/// Values are raw visual-word counts unless the descriptor was explicitly
/// post-processed (see [`crate::normalization`]).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawDescriptor"))]
pub struct Descriptor {
    values: Vec<f64>,
    level_sizes: Vec<usize>,
}

/// Unchecked wire form of a [`Descriptor`].
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
pub struct RawDescriptor {
    /// Flat descriptor values.
    pub values: Vec<f64>,
    /// Length of each level block.
    pub level_sizes: Vec<usize>,
}

impl TryFrom<RawDescriptor> for Descriptor {
    type Error = BofError;

    fn try_from(raw: RawDescriptor) -> Result<Self> {
        let total = raw
            .level_sizes
            .iter()
            .try_fold(0_usize, |acc, &size| acc.checked_add(size));
        if total != Some(raw.values.len()) {
            return Err(BofError::InvalidDescriptor(format!(
                "level sizes {:?} do not add up to {} values",
                raw.level_sizes,
                raw.values.len()
            )));
        }
        Ok(Self {
            values: raw.values,
            level_sizes: raw.level_sizes,
        })
    }
}

impl Descriptor {
    /// Wrap raw values with their level block sizes.
    ///
    /// `level_sizes` must sum to `values.len()`.
    pub(crate) fn from_parts(values: Vec<f64>, level_sizes: Vec<usize>) -> Self {
        debug_assert_eq!(level_sizes.iter().sum::<usize>(), values.len());
        Self {
            values,
            level_sizes,
        }
    }

    /// All-zero descriptor with the given level block sizes.
    pub(crate) fn zeros(level_sizes: Vec<usize>) -> Self {
        let len = level_sizes.iter().sum();
        Self {
            values: vec![0.0; len],
            level_sizes,
        }
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the descriptor has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// View the values.
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Mutable view of the values.
    pub(crate) fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.values
    }

    /// Consume into the flat value vector.
    #[must_use]
    pub fn into_vec(self) -> Vec<f64> {
        self.values
    }

    /// Number of pyramid levels.
    #[must_use]
    pub fn num_levels(&self) -> usize {
        self.level_sizes.len()
    }

    /// Block lengths of every level.
    #[must_use]
    pub fn level_sizes(&self) -> &[usize] {
        &self.level_sizes
    }

    /// Values belonging to one level.
    #[must_use]
    pub fn level_block(&self, level: usize) -> Option<&[f64]> {
        let range = self.level_range(level)?;
        self.values.get(range)
    }

    /// Mutable values belonging to one level.
    pub(crate) fn level_block_mut(&mut self, level: usize) -> Option<&mut [f64]> {
        let range = self.level_range(level)?;
        self.values.get_mut(range)
    }

    /// Sum of each level block.
    ///
    /// For a raw-count descriptor every entry equals the number of encoded
    /// points.
    #[must_use]
    pub fn level_sums(&self) -> Vec<f64> {
        (0..self.num_levels())
            .filter_map(|l| self.level_block(l))
            .map(|block| block.iter().sum())
            .collect()
    }

    /// Sum of all entries.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.values.iter().sum()
    }

    fn level_range(&self, level: usize) -> Option<std::ops::Range<usize>> {
        let size = *self.level_sizes.get(level)?;
        let start = self.level_sizes[..level]
            .iter()
            .try_fold(0_usize, |acc, &s| acc.checked_add(s))?;
        Some(start..start.checked_add(size)?)
    }
}

impl AsRef<[f64]> for Descriptor {
    fn as_ref(&self) -> &[f64] {
        &self.values
    }
}

impl From<Descriptor> for Vec<f64> {
    fn from(descriptor: Descriptor) -> Self {
        descriptor.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn make_descriptor() -> Descriptor {
        Descriptor::from_parts(vec![1.0, 2.0, 0.0, 3.0, 4.0, 0.5], vec![4, 2])
    }

    #[test]
    fn test_level_blocks() {
        let d = make_descriptor();
        assert_eq!(d.len(), 6);
        assert_eq!(d.num_levels(), 2);
        assert_eq!(d.level_block(0).unwrap(), &[1.0, 2.0, 0.0, 3.0]);
        assert_eq!(d.level_block(1).unwrap(), &[4.0, 0.5]);
        assert!(d.level_block(2).is_none());
    }

    #[test]
    fn test_sums() {
        let d = make_descriptor();
        let sums = d.level_sums();
        assert_relative_eq!(sums[0], 6.0);
        assert_relative_eq!(sums[1], 4.5);
        assert_relative_eq!(d.total(), 10.5);
    }

    #[test]
    fn test_rejects_inconsistent_parts() {
        let raw = RawDescriptor {
            values: vec![1.0],
            level_sizes: vec![4],
        };
        assert!(matches!(
            Descriptor::try_from(raw),
            Err(BofError::InvalidDescriptor(_))
        ));

        let raw = RawDescriptor {
            values: vec![],
            level_sizes: vec![usize::MAX, 1],
        };
        assert!(Descriptor::try_from(raw).unwrap_err().is_data());

        let raw = RawDescriptor {
            values: vec![1.0, 2.0, 3.0],
            level_sizes: vec![1, 2],
        };
        let d = Descriptor::try_from(raw).unwrap();
        assert_eq!(d.level_block(1).unwrap(), &[2.0, 3.0]);
    }

    #[test]
    fn test_zeros() {
        let d = Descriptor::zeros(vec![3, 5]);
        assert_eq!(d.len(), 8);
        assert!(!d.is_empty());
        assert!(d.as_slice().iter().all(|&v| v == 0.0));
        assert_eq!(Vec::from(d).len(), 8);
    }
}
