use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;
use validator::Validate;

use crate::core::{RecommendError, Recommender};
use crate::models::{AsanaRecommendation, ErrorResponse, HealthResponse, RecommendRequest, RecommendResponse};
use crate::services::{CacheKey, RecommendationCache};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub recommender: Arc<Recommender>,
    pub cache: Arc<RecommendationCache>,
}

/// Configure recommendation routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/recommend/", web::post().to(recommend))
        .route("/recommend", web::post().to(recommend));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
        catalog_size: state.recommender.catalog().len(),
        embedding_provider: state.recommender.embedder_name().to_string(),
    })
}

/// Recommend postures endpoint
///
/// POST /recommend/
///
/// Request body:
/// ```json
/// {
///   "age": 30,
///   "height": 170,
///   "weight": 65,
///   "goals": ["flexibility"],
///   "physical_issues": ["back pain"],
///   "mental_issues": ["stress"],
///   "level": "beginner"
/// }
/// ```
async fn recommend(
    state: web::Data<AppState>,
    req: web::Json<RecommendRequest>,
) -> impl Responder {
    // Validate request
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for recommend request: {:?}", errors);
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let request_id = uuid::Uuid::new_v4();
    let profile = req.into_inner().into_profile();

    tracing::info!(
        %request_id,
        "Recommending for level={}, goals={}, physical_issues={}, mental_issues={}",
        profile.level,
        profile.goals.len(),
        profile.physical_issues.len(),
        profile.mental_issues.len()
    );

    let cache_key = CacheKey::recommendations(&profile);
    let recommendations = match state.cache.get(&cache_key).await {
        Some(cached) => {
            tracing::debug!(%request_id, "Serving cached recommendations");
            cached
        }
        None => match state.recommender.recommend(&profile) {
            Ok(recs) => {
                let recs = Arc::new(recs);
                state.cache.set(cache_key, recs.clone()).await;
                recs
            }
            Err(RecommendError::Encoding(e)) => {
                tracing::warn!(%request_id, "Failed to encode profile: {}", e);
                return HttpResponse::UnprocessableEntity().json(ErrorResponse {
                    error: "Failed to encode profile".to_string(),
                    message: e.to_string(),
                    status_code: 422,
                });
            }
        },
    };

    let response = RecommendResponse {
        recommended_asanas: recommendations
            .iter()
            .cloned()
            .map(AsanaRecommendation::from)
            .collect(),
    };

    tracing::info!(
        %request_id,
        "Returning {} recommendations",
        response.recommended_asanas.len()
    );

    HttpResponse::Ok().json(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_check_response() {
        let response = HealthResponse {
            status: "healthy".to_string(),
            version: "0.1.0".to_string(),
            timestamp: chrono::Utc::now(),
            catalog_size: 3,
            embedding_provider: "hashing".to_string(),
        };

        assert_eq!(response.status, "healthy");
        assert_eq!(response.catalog_size, 3);
    }
}
