//! Extracts the acting voter from the request.
//!
//! Authentication happens upstream; the authenticator forwards the verified
//! user id in the `x-voter-id` header.
use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use tracing::debug;
use uuid::Uuid;
use votes_shared::types::VoterId;

use crate::errors::ApiError;

pub const VOTER_ID_HEADER: &str = "x-voter-id";

/// The authenticated user casting a vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoterIdentity(pub VoterId);

#[async_trait]
impl<S> FromRequestParts<S> for VoterIdentity
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(header) = parts.headers.get(VOTER_ID_HEADER) else {
            debug!(uri = %parts.uri, "Missing voter identity");
            return Err(ApiError::unauthorized("Unauthorized"));
        };

        header
            .to_str()
            .ok()
            .and_then(|value| Uuid::parse_str(value.trim()).ok())
            .map(VoterIdentity)
            .ok_or_else(|| ApiError::unauthorized("Invalid voter identity"))
    }
}
