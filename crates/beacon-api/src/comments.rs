use axum::Json;
use axum::extract::{Query, State};
use serde::Deserialize;

use beacon_db::CampaignStore;
use beacon_types::api::{CommentResponse, CommentsResponse, CreateCommentRequest};

use crate::auth::AppState;
use crate::error::{ApiError, internal};
use crate::middleware::AuthUser;
use crate::validate::required;

#[derive(Debug, Deserialize)]
pub struct CommentQuery {
    pub campaign_id: Option<i64>,
}

/// Comments under one campaign, oldest first.
pub async fn list<S>(
    State(state): State<AppState<S>>,
    AuthUser(_user): AuthUser,
    Query(query): Query<CommentQuery>,
) -> Result<Json<CommentsResponse>, ApiError>
where
    S: CampaignStore + Send + Sync + 'static,
{
    let Some(campaign_id) = query.campaign_id else {
        return Err(ApiError::validation("Campaign ID is required"));
    };

    let comments = state
        .store
        .list_comments(campaign_id)
        .await
        .map_err(internal("comment listing failed"))?;

    Ok(Json(CommentsResponse { comments }))
}

pub async fn create<S>(
    State(state): State<AppState<S>>,
    AuthUser(user): AuthUser,
    Json(req): Json<CreateCommentRequest>,
) -> Result<Json<CommentResponse>, ApiError>
where
    S: CampaignStore + Send + Sync + 'static,
{
    let (Some(campaign_id), Some(content)) = (req.campaign_id, required(req.content)) else {
        return Err(ApiError::validation("Missing required fields"));
    };

    let comment = state
        .store
        .create_comment(campaign_id, user.user_id, &content)
        .await
        .map_err(internal("comment creation failed"))?;

    Ok(Json(CommentResponse { comment }))
}
