mod dataset;
mod load;
mod similarity;
mod song;

pub use dataset::{Dataset, DatasetBuildResult, DatasetError, Problem as LoadDatasetProblem};
pub use load::load_dataset;
pub use similarity::SimilarityMatrix;
pub use song::{Catalog, Song};
