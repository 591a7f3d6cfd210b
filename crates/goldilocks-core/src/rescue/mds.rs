//! # MDS Matrix
//!
//! Cauchy construction: `M[i][j] = 1 / (x_i - y_j)` with `x_i = i` and
//! `y_j = width + j`. The two sequences are disjoint and internally distinct,
//! so every square submatrix is non-singular and the matrix is MDS.

use super::MAX_WIDTH;
use crate::error::{FieldError, GoldilocksError, Result};
use crate::field::{FieldElement, ONE, ZERO, batch_inversion};
use alloc::vec;
use alloc::vec::Vec;

/// A square matrix over GF(p), stored row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MdsMatrix {
    width: usize,
    entries: Vec<FieldElement>,
}

impl MdsMatrix {
    /// Build the `width x width` Cauchy matrix.
    ///
    /// Fails with `InvalidParameters` when `width` is zero or above [`MAX_WIDTH`].
    pub fn cauchy(width: usize) -> Result<Self> {
        if width == 0 || width > MAX_WIDTH {
            return Err(GoldilocksError::InvalidParameters(
                "MDS width must be between 1 and MAX_WIDTH",
            ));
        }

        let mut denominators = Vec::with_capacity(width * width);
        for i in 0..width {
            for j in 0..width {
                let x = FieldElement::new(i as u64);
                let y = FieldElement::new((width + j) as u64);
                denominators.push(x - y);
            }
        }

        Ok(Self {
            width,
            entries: batch_inversion(&denominators),
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Entry at `row`, `col`, or `None` when out of range.
    pub fn get(&self, row: usize, col: usize) -> Option<FieldElement> {
        if row >= self.width || col >= self.width {
            return None;
        }
        self.entries.get(row * self.width + col).copied()
    }

    /// Iterate rows in order.
    pub fn rows(&self) -> impl Iterator<Item = &[FieldElement]> {
        self.entries.chunks_exact(self.width.max(1))
    }

    /// Replace `state` with `M * state`.
    pub fn apply(&self, state: &mut [FieldElement]) -> Result<()> {
        if state.len() != self.width {
            return Err(GoldilocksError::StateWidthMismatch {
                expected: self.width,
                actual: state.len(),
            });
        }

        self.mix(state);
        Ok(())
    }

    /// `apply` without the width check; `state.len()` must equal `width`.
    pub(crate) fn mix(&self, state: &mut [FieldElement]) {
        let mixed: Vec<FieldElement> = self
            .rows()
            .map(|row| row.iter().zip(state.iter()).map(|(m, s)| *m * *s).sum())
            .collect();
        state.copy_from_slice(&mixed);
    }

    /// Inverse matrix by Gauss-Jordan elimination.
    ///
    /// Fails with `ZeroInverse` if the matrix is singular, which cannot
    /// happen for a Cauchy matrix.
    pub fn inverse(&self) -> Result<Self> {
        let n = self.width;
        let mut left = self.entries.clone();
        let mut right = vec![ZERO; n * n];
        for i in 0..n {
            right[i * n + i] = ONE;
        }

        for col in 0..n {
            let pivot_row = (col..n)
                .find(|&row| !left[row * n + col].is_zero())
                .ok_or(GoldilocksError::Field(FieldError::ZeroInverse))?;
            if pivot_row != col {
                for k in 0..n {
                    left.swap(pivot_row * n + k, col * n + k);
                    right.swap(pivot_row * n + k, col * n + k);
                }
            }

            let scale = left[col * n + col].try_inv()?;
            for k in 0..n {
                left[col * n + k] *= scale;
                right[col * n + k] *= scale;
            }

            for row in 0..n {
                if row == col {
                    continue;
                }
                let factor = left[row * n + col];
                if factor.is_zero() {
                    continue;
                }
                for k in 0..n {
                    let l = left[col * n + k];
                    let r = right[col * n + k];
                    left[row * n + k] -= factor * l;
                    right[row * n + k] -= factor * r;
                }
            }
        }

        Ok(Self {
            width: n,
            entries: right,
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================
