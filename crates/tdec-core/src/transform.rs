//! 4×4 spatial transforms applied to structures at export time.
//!
//! The API ships transforms as a flat, row-major list of 16 numbers
//! (`ReferenceTransforms.transform`) and expects the same flat layout back in
//! export payloads. Inside tdec a transform is always 4 rows of 4.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct Transform([[f64; 4]; 4]);

impl Transform {
    pub const IDENTITY: Self = Self([
        [1.0, 0.0, 0.0, 0.0],
        [0.0, 1.0, 0.0, 0.0],
        [0.0, 0.0, 1.0, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ]);

    #[must_use]
    pub const fn from_rows(rows: [[f64; 4]; 4]) -> Self {
        Self(rows)
    }

    /// Reshape a flat row-major list into rows `[0:4]`, `[4:8]`, `[8:12]`,
    /// `[12:16]`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::TransformLength`] unless `values` has exactly 16
    /// elements.
    pub fn from_flat(values: &[f64]) -> Result<Self, CoreError> {
        if values.len() != 16 {
            return Err(CoreError::TransformLength(values.len()));
        }
        let mut rows = [[0.0; 4]; 4];
        for (row, chunk) in rows.iter_mut().zip(values.chunks_exact(4)) {
            row.copy_from_slice(chunk);
        }
        Ok(Self(rows))
    }

    /// Flatten back to the wire layout.
    #[must_use]
    pub fn to_flat(&self) -> [f64; 16] {
        let mut flat = [0.0; 16];
        for (chunk, row) in flat.chunks_exact_mut(4).zip(self.0.iter()) {
            chunk.copy_from_slice(row);
        }
        flat
    }

    #[must_use]
    pub const fn rows(&self) -> &[[f64; 4]; 4] {
        &self.0
    }

    #[must_use]
    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}
