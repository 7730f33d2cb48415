use super::{Catalog, SimilarityMatrix};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("Similarity matrix has no rows")]
    EmptyMatrix,
    #[error("Similarity row {row} has {actual} entries, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        actual: usize,
    },
    #[error("Similarity score at ({row}, {column}) is not a finite number")]
    NonFiniteScore { row: usize, column: usize },
    #[error("Similarity matrix is not symmetric at ({row}, {column}): {forward} != {backward}")]
    Asymmetric {
        row: usize,
        column: usize,
        forward: f32,
        backward: f32,
    },
    #[error("Catalog has {songs} songs but the similarity matrix has {rows} rows")]
    SizeMismatch { songs: usize, rows: usize },
}

/// Catalog and similarity matrix, aligned 1:1 by index.
#[derive(Debug, Clone)]
pub struct Dataset {
    catalog: Catalog,
    similarity: SimilarityMatrix,
}

impl Dataset {
    pub fn new(catalog: Catalog, similarity: SimilarityMatrix) -> Result<Dataset, DatasetError> {
        if catalog.len() != similarity.size() {
            return Err(DatasetError::SizeMismatch {
                songs: catalog.len(),
                rows: similarity.size(),
            });
        }
        Ok(Dataset {
            catalog,
            similarity,
        })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn similarity(&self) -> &SimilarityMatrix {
        &self.similarity
    }

    pub fn into_parts(self) -> (Catalog, SimilarityMatrix) {
        (self.catalog, self.similarity)
    }

    pub fn build(catalog_path: &Path, similarity_path: &Path) -> DatasetBuildResult {
        let mut problems = Vec::new();

        let catalog = match Catalog::from_json_file(catalog_path) {
            Ok(catalog) => Some(catalog),
            Err(err) => {
                problems.push(Problem::Unreadable(format!("{:#}", err)));
                None
            }
        };
        let similarity = match SimilarityMatrix::from_json_file(similarity_path) {
            Ok(similarity) => Some(similarity),
            Err(err) => {
                problems.push(Problem::Unreadable(format!("{:#}", err)));
                None
            }
        };

        if let Some(catalog) = catalog.as_ref() {
            problems.append(&mut find_catalog_problems(catalog));
        }

        let dataset = match (catalog, similarity) {
            (Some(catalog), Some(similarity)) => match Dataset::new(catalog, similarity) {
                Ok(dataset) => Some(dataset),
                Err(err) => {
                    problems.push(Problem::Misaligned(err));
                    None
                }
            },
            _ => None,
        };

        DatasetBuildResult { dataset, problems }
    }
}

pub struct DatasetBuildResult {
    pub dataset: Option<Dataset>,
    pub problems: Vec<Problem>,
}

#[derive(Debug)]
pub enum Problem {
    /// A data file could not be read, parsed or validated.
    Unreadable(String),
    Misaligned(DatasetError),
    /// Only the first song with a given title can be recommended for.
    DuplicateTitle {
        title: String,
        first_index: usize,
        duplicate_index: usize,
    },
    EmptyField {
        index: usize,
        field: &'static str,
    },
}

impl Problem {
    pub fn is_fatal(&self) -> bool {
        matches!(self, Problem::Unreadable(_) | Problem::Misaligned(_))
    }
}

fn find_catalog_problems(catalog: &Catalog) -> Vec<Problem> {
    let mut problems = Vec::new();
    let mut first_seen: HashMap<&str, usize> = HashMap::new();

    for (index, song) in catalog.iter().enumerate() {
        if song.title.trim().is_empty() {
            problems.push(Problem::EmptyField {
                index,
                field: "song",
            });
        }
        if song.artist.trim().is_empty() {
            problems.push(Problem::EmptyField {
                index,
                field: "artist",
            });
        }
        match first_seen.get(song.title.as_str()) {
            Some(first_index) => problems.push(Problem::DuplicateTitle {
                title: song.title.clone(),
                first_index: *first_index,
                duplicate_index: index,
            }),
            None => {
                first_seen.insert(song.title.as_str(), index);
            }
        }
    }

    problems
}
