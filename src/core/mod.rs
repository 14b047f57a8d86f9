// Core algorithm exports
pub mod filters;
pub mod recommender;
pub mod scoring;
pub mod similarity;

pub use filters::{encode_issues, is_contraindicated, matches_lexically, EncodedIssue};
pub use recommender::{RecommendError, Recommender, RecommenderSettings};
pub use scoring::{calculate_posture_score, round_score, ProfileEmbeddings};
pub use similarity::{cosine_similarity, exceeds_threshold};
