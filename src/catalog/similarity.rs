//! Precomputed song-to-song similarity scores.

use super::DatasetError;
use anyhow::{Context, Result};
use std::path::Path;

#[cfg(not(feature = "no_checks"))]
const SYMMETRY_TOLERANCE: f32 = 1e-5;

/// Square matrix of similarity scores, stored row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct SimilarityMatrix {
    size: usize,
    scores: Vec<f32>,
}

impl SimilarityMatrix {
    /// Builds the matrix checking that it is square, finite and symmetric.
    pub fn from_rows(rows: Vec<Vec<f32>>) -> Result<SimilarityMatrix, DatasetError> {
        let size = rows.len();
        if size == 0 {
            return Err(DatasetError::EmptyMatrix);
        }

        let mut scores = Vec::with_capacity(size * size);
        for (row_index, row) in rows.into_iter().enumerate() {
            if row.len() != size {
                return Err(DatasetError::RaggedRow {
                    row: row_index,
                    expected: size,
                    actual: row.len(),
                });
            }
            if let Some(column) = row.iter().position(|v| !v.is_finite()) {
                return Err(DatasetError::NonFiniteScore {
                    row: row_index,
                    column,
                });
            }
            scores.extend(row);
        }

        let matrix = SimilarityMatrix { size, scores };

        #[cfg(not(feature = "no_checks"))]
        matrix.check_symmetry()?;

        Ok(matrix)
    }

    pub fn from_json_str(json: &str) -> Result<SimilarityMatrix> {
        let rows: Vec<Vec<f32>> = serde_json::from_str(json)?;
        Ok(SimilarityMatrix::from_rows(rows)?)
    }

    pub fn from_json_file(path: &Path) -> Result<SimilarityMatrix> {
        let file_text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read similarity file: {:?}", path))?;
        SimilarityMatrix::from_json_str(&file_text)
            .with_context(|| format!("Failed to parse similarity file: {:?}", path))
    }

    #[cfg(not(feature = "no_checks"))]
    fn check_symmetry(&self) -> Result<(), DatasetError> {
        for row in 0..self.size {
            for column in (row + 1)..self.size {
                let forward = self.get(row, column);
                let backward = self.get(column, row);
                if (forward - backward).abs() > SYMMETRY_TOLERANCE {
                    return Err(DatasetError::Asymmetric {
                        row,
                        column,
                        forward,
                        backward,
                    });
                }
            }
        }
        Ok(())
    }

    /// Number of rows, equal to the number of columns.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Panics if `index` is out of bounds.
    pub fn row(&self, index: usize) -> &[f32] {
        let start = index * self.size;
        &self.scores[start..start + self.size]
    }

    /// Panics if either index is out of bounds.
    pub fn get(&self, row: usize, column: usize) -> f32 {
        assert!(column < self.size, "column {} out of bounds", column);
        self.scores[row * self.size + column]
    }
}
