use axum::Json;
use axum::extract::{Path, State};
use uuid::Uuid;
use votes_shared::types::{ContentKind, ItemId, VotableItem, VoteDirection};

use super::AppState;
use crate::errors::ApiError;
use crate::guard::VoterIdentity;
use crate::response::ApiResponse;

type VoteResponse = Result<Json<ApiResponse<VotableItem>>, ApiError>;

fn resolve_target(collection: &str, id: &str) -> Result<(ContentKind, ItemId), ApiError> {
    let kind = ContentKind::from_collection(collection)
        .ok_or_else(|| ApiError::not_found(format!("Unknown collection '{collection}'")))?;
    let id = Uuid::parse_str(id).map_err(|_| ApiError::bad_request(format!("Invalid {kind} id")))?;
    Ok((kind, id))
}

async fn vote(
    state: &AppState,
    collection: &str,
    id: &str,
    voter: VoterIdentity,
    direction: VoteDirection,
) -> VoteResponse {
    let (kind, item_id) = resolve_target(collection, id)?;
    let item = state
        .service
        .apply_vote(kind, item_id, voter.0, direction)
        .await?;
    Ok(Json(ApiResponse::ok(item)))
}

/// `PUT /{collection}/{id}/upvote`
pub async fn upvote(
    State(state): State<AppState>,
    Path((collection, id)): Path<(String, String)>,
    voter: VoterIdentity,
) -> VoteResponse {
    vote(&state, &collection, &id, voter, VoteDirection::Up).await
}

/// `PUT /{collection}/{id}/downvote`
pub async fn downvote(
    State(state): State<AppState>,
    Path((collection, id)): Path<(String, String)>,
    voter: VoterIdentity,
) -> VoteResponse {
    vote(&state, &collection, &id, voter, VoteDirection::Down).await
}

/// `GET /{collection}/{id}/votes`
pub async fn get_votes(
    State(state): State<AppState>,
    Path((collection, id)): Path<(String, String)>,
) -> VoteResponse {
    let (kind, item_id) = resolve_target(&collection, &id)?;
    let item = state.service.get_item(kind, item_id).await?;
    Ok(Json(ApiResponse::ok(item)))
}
