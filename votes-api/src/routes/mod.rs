//! HTTP routes for voting on content.
//!
//! Every content kind is served by the same handlers; the first path segment
//! names the collection (`comments`, `answers`, `posts`, `questions`).
mod votes;

use axum::Router;
use axum::http::{HeaderName, HeaderValue, Method, header};
use axum::response::IntoResponse;
use axum::routing::{get, put};
use axum::Json;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use votes_pipeline::VoteService;

use crate::guard::VOTER_ID_HEADER;

pub use votes::{downvote, get_votes, upvote};

#[derive(Clone)]
pub struct AppState {
    pub service: VoteService,
}

impl AppState {
    pub fn new(service: VoteService) -> Self {
        Self { service }
    }
}

/// Builds the application router.
pub fn router(state: AppState, cors: CorsLayer) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/:collection/:id/upvote", put(upvote))
        .route("/:collection/:id/downvote", put(downvote))
        .route("/:collection/:id/votes", get(get_votes))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// CORS policy for the given browser origins.
pub fn cors_layer(origins: Vec<HeaderValue>) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::PUT, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static(VOTER_ID_HEADER),
        ])
        .allow_credentials(true)
}

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({ "success": true, "message": "Votes API is running" }))
}
