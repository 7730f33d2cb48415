mod cards;
mod recommender;

pub use cards::{build_cards, RecommendationCard};
pub use recommender::{
    Recommendation, RecommendError, Recommender, DEFAULT_RECOMMENDATIONS_COUNT,
};
