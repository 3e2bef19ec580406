pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::apply::handlers as apply;
use crate::cv::handlers as cv;
use crate::insights::handlers as insights;
use crate::matching::handlers as matching;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Matching & auto-apply
        .route(
            "/api/v1/recommendations",
            get(matching::handle_recommendations),
        )
        .route("/api/v1/auto-apply", post(apply::handle_auto_apply))
        .route(
            "/api/v1/applications",
            get(apply::handle_list_applications),
        )
        // CV services
        .route("/api/v1/cv/parse", post(cv::handle_parse_cv))
        .route("/api/v1/cv/extract", post(cv::handle_extract_stored_cv))
        .route("/api/v1/cv/optimize", post(cv::handle_optimize_cv))
        // Insights
        .route(
            "/api/v1/interview-prep",
            post(insights::handle_interview_prep),
        )
        .route(
            "/api/v1/insights/hiring-score",
            post(insights::handle_hiring_score),
        )
        .route(
            "/api/v1/insights/skill-gap",
            post(insights::handle_skill_gap),
        )
        .with_state(state)
}
