use crate::catalog::{Catalog, Dataset, SimilarityMatrix};
use serde::Serialize;
use std::cmp::Ordering;
use thiserror::Error;

pub const DEFAULT_RECOMMENDATIONS_COUNT: usize = 5;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum RecommendError {
    #[error("The song '{0}' is not in our dataset. Please try another song.")]
    SongNotFound(String),
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Recommendation {
    pub index: usize,
    pub song: String,
    pub artist: String,
    pub score: f32,
}

/// Read-only nearest-neighbour lookup over a loaded dataset.
///
/// Built once at startup and shared by reference, nothing in here changes
/// after construction.
#[derive(Debug)]
pub struct Recommender {
    catalog: Catalog,
    similarity: SimilarityMatrix,
    count: usize,
}

impl Recommender {
    pub fn new(dataset: Dataset) -> Recommender {
        Recommender::with_count(dataset, DEFAULT_RECOMMENDATIONS_COUNT)
    }

    pub fn with_count(dataset: Dataset, count: usize) -> Recommender {
        let (catalog, similarity) = dataset.into_parts();
        Recommender {
            catalog,
            similarity,
            count,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn find_song(&self, title: &str) -> Option<usize> {
        self.catalog.find_first(title)
    }

    /// The most similar songs to `title`, best first.
    ///
    /// Songs with equal scores are ordered by catalog position. The queried
    /// song is never part of the result, even when its self-similarity is
    /// not the row maximum.
    pub fn recommend(&self, title: &str) -> Result<Vec<Recommendation>, RecommendError> {
        let query_index = self
            .find_song(title)
            .ok_or_else(|| RecommendError::SongNotFound(title.to_string()))?;

        let mut ranked: Vec<(usize, f32)> = self
            .similarity
            .row(query_index)
            .iter()
            .copied()
            .enumerate()
            .filter(|(index, _)| *index != query_index)
            .collect();
        ranked.sort_by(compare_ranked);

        Ok(ranked
            .into_iter()
            .take(self.count)
            .filter_map(|(index, score)| {
                self.catalog.get(index).map(|song| Recommendation {
                    index,
                    song: song.title.clone(),
                    artist: song.artist.clone(),
                    score,
                })
            })
            .collect())
    }
}

// Descending score, then ascending index.
fn compare_ranked(a: &(usize, f32), b: &(usize, f32)) -> Ordering {
    b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0))
}
