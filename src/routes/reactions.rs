use crate::{
    error::Result,
    models::{reaction::*, response::MessageResponse},
    state::AppState,
    utils::{
        access::parse_id,
        middleware::{AuthUser, JsonBody},
    },
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use std::sync::Arc;

/// GET /posts/:post_id/reactions
pub async fn get_reactions(
    State(state): State<Arc<AppState>>,
    Path(post_id): Path<String>,
) -> Result<Json<ReactionSummary>> {
    let post_id = parse_id(&post_id, "post")?;
    let summary = state.reaction_service.get_reactions(post_id)?;
    Ok(Json(summary))
}

/// POST /posts/:post_id/reactions
pub async fn react_to_post(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(post_id): Path<String>,
    JsonBody(request): JsonBody<ReactionRequest>,
) -> Result<(StatusCode, Json<MessageResponse>)> {
    let post_id = parse_id(&post_id, "post")?;
    state.reaction_service.react(post_id, user.id, request)?;

    Ok((StatusCode::CREATED, Json(MessageResponse::new("Reaction added"))))
}

/// DELETE /posts/:post_id/reactions
pub async fn remove_reaction(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(post_id): Path<String>,
) -> Result<Json<MessageResponse>> {
    let post_id = parse_id(&post_id, "post")?;
    state.reaction_service.remove_reaction(post_id, user.id)?;

    Ok(Json(MessageResponse::new("Reaction removed")))
}
