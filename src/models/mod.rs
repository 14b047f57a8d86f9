// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{UserProfile, PostureRecord, PostureText, ScoredRecommendation, ScoringWeights};
pub use requests::RecommendRequest;
pub use responses::{AsanaRecommendation, RecommendResponse, HealthResponse, ErrorResponse};
