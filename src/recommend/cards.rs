use super::{RecommendError, Recommender};
use crate::enrichment::{resolve_enrichment, MetadataProvider, MetadataStatus};
use serde::Serialize;
use tracing::debug;

/// One rendered result: a recommended song plus its artwork and link.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RecommendationCard {
    pub title: String,
    pub artist: String,
    pub score: f32,
    pub cover_url: String,
    pub listening_url: Option<String>,
    pub metadata: MetadataStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

/// Runs a full interaction: the lookup, then one metadata call per result,
/// one after the other.
pub fn build_cards(
    recommender: &Recommender,
    provider: &dyn MetadataProvider,
    placeholder_url: &str,
    title: &str,
) -> Result<Vec<RecommendationCard>, RecommendError> {
    let recommendations = recommender.recommend(title)?;
    debug!(
        "Enriching {} recommendations for \"{}\"",
        recommendations.len(),
        title
    );

    Ok(recommendations
        .into_iter()
        .map(|recommendation| {
            let outcome = provider.lookup(&recommendation.song, &recommendation.artist);
            let enrichment = resolve_enrichment(outcome, placeholder_url);
            RecommendationCard {
                title: recommendation.song,
                artist: recommendation.artist,
                score: recommendation.score,
                cover_url: enrichment.cover_url,
                listening_url: enrichment.listening_url,
                metadata: enrichment.status,
                notice: enrichment.notice,
            }
        })
        .collect())
}
