//! Optional post-processing of raw-count descriptors.
//!
//! The encoder always emits raw counts. Anything applied here is an explicit
//! step taken by the caller, so a classifier trained on normalized vectors
//! must apply the same step at inference.

use crate::descriptor::Descriptor;
use crate::error::{BofError, Result};
use crate::layout::PyramidLayout;

/// Vector normalization scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Normalization {
    /// Leave raw counts untouched.
    #[default]
    None,
    /// Scale the whole descriptor to unit L1 norm.
    L1,
    /// Scale the whole descriptor to unit L2 norm.
    L2,
    /// Scale every level block to unit L1 norm independently.
    PerLevelL1,
}

impl Descriptor {
    /// Copy of the descriptor with `normalization` applied.
    #[must_use]
    pub fn normalized(&self, normalization: Normalization) -> Self {
        let mut out = self.clone();
        out.normalize_in_place(normalization);
        out
    }

    /// Apply `normalization` in place. Zero vectors and zero level blocks
    /// are left at zero.
    pub fn normalize_in_place(&mut self, normalization: Normalization) {
        match normalization {
            Normalization::None => {}
            Normalization::L1 => l1_normalize(self.as_mut_slice()),
            Normalization::L2 => l2_normalize(self.as_mut_slice()),
            Normalization::PerLevelL1 => {
                for level in 0..self.num_levels() {
                    if let Some(block) = self.level_block_mut(level) {
                        l1_normalize(block);
                    }
                }
            }
        }
    }

    /// Copy of the descriptor with each level block multiplied by its weight.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `weights` does not have one entry per
    /// level, or a weight is negative or non-finite.
    pub fn weighted(&self, weights: &[f64]) -> Result<Self> {
        if weights.len() != self.num_levels() {
            return Err(BofError::invalid_config(format!(
                "expected {} level weights, got {}",
                self.num_levels(),
                weights.len()
            )));
        }
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(BofError::invalid_config(
                "level weights must be finite and non-negative",
            ));
        }

        let mut values = Vec::with_capacity(self.len());
        for (level, &w) in weights.iter().enumerate() {
            if let Some(block) = self.level_block(level) {
                values.extend(block.iter().map(|v| v * w));
            }
        }
        Ok(Self::from_parts(values, self.level_sizes().to_vec()))
    }
}

impl PyramidLayout {
    /// Classic spatial-pyramid-matching level weights.
    ///
    /// With `L` levels, level 0 gets `1 / 2^(L-1)` and level `l >= 1` gets
    /// `1 / 2^(L-l)`, so finer levels count more. Only meaningful when levels
    /// are ordered coarse to fine.
    #[must_use]
    pub fn spm_level_weights(&self) -> Vec<f64> {
        let depth = self.num_levels();
        (0..depth)
            .map(|l| {
                let exp = if l == 0 { depth - 1 } else { depth - l };
                0.5_f64.powi(exp as i32)
            })
            .collect()
    }
}

/// Scale to unit L1 norm in place.
fn l1_normalize(values: &mut [f64]) {
    let sum: f64 = values.iter().map(|v| v.abs()).sum();
    if sum > 0.0 {
        let inv_sum = 1.0 / sum;
        for v in values.iter_mut() {
            *v *= inv_sum;
        }
    }
}

/// Scale to unit L2 norm in place.
fn l2_normalize(values: &mut [f64]) {
    let norm = values.iter().map(|v| v * v).sum::<f64>().sqrt();
    if norm > 0.0 {
        for v in values.iter_mut() {
            *v /= norm;
        }
    }
}
