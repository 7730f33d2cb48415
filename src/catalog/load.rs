use super::Dataset;
use anyhow::{bail, Result};
use std::path::Path;
use tracing::{info, warn};

/// Builds the dataset logging every problem found, fails only on fatal ones.
pub fn load_dataset(catalog_path: &Path, similarity_path: &Path) -> Result<Dataset> {
    info!(
        "Loading catalog from {:?} and similarity matrix from {:?}...",
        catalog_path, similarity_path
    );
    let build_result = Dataset::build(catalog_path, similarity_path);
    let problems = build_result.problems;
    let dataset = build_result.dataset;

    if !problems.is_empty() {
        warn!("Found {} problems:", problems.len());
        for problem in problems.iter() {
            warn!("- {:?}", problem);
        }
    }

    match (&dataset, problems.is_empty()) {
        (Some(_), true) => info!("Dataset checked, no issues found."),
        (Some(_), false) => info!(
            "Dataset was built, but check the {} non-fatal issues above.",
            problems.len()
        ),
        (None, _) => {
            let fatal = problems.iter().filter(|p| p.is_fatal()).count();
            bail!(
                "Could not load dataset, {} of the {} problems above are fatal.",
                fatal,
                problems.len()
            );
        }
    }

    match dataset {
        Some(dataset) => {
            info!("Dataset has {} songs", dataset.catalog().len());
            Ok(dataset)
        }
        None => bail!("Could not load dataset"),
    }
}
