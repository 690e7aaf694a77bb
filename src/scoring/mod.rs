mod scorer;
mod tiers;

pub use scorer::{RepositoryScore, ScoreTable, score_records};
pub use tiers::{
    FundingPriority, Tier, classify_ranked, funding_priorities, recommended_funding,
};
