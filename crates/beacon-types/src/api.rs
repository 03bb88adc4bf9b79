use serde::{Deserialize, Serialize};

use crate::models::{CampaignWithMeta, CommentWithMeta, PublicUser};

// -- JWT Claims --

/// Token claims shared by the login handler (issuance) and the identity
/// gateway (verification). Canonical definition lives here in beacon-types
/// to eliminate duplication.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: i64,
    pub exp: usize,
}

// -- Auth --

/// Inbound bodies keep every field optional so handlers can answer missing
/// input with the domain's own 400 messages instead of a deserializer
/// rejection.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LogoutRequest {
    #[serde(rename = "userId")]
    pub user_id: Option<i64>,
}

/// Login reply: the user row minus its digest, with the bearer token
/// alongside at the top level.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    #[serde(flatten)]
    pub user: PublicUser,
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub success: bool,
}

// -- Campaigns --

#[derive(Debug, Deserialize)]
pub struct CreateCampaignRequest {
    pub title: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CampaignsResponse {
    pub campaigns: Vec<CampaignWithMeta>,
}

#[derive(Debug, Serialize)]
pub struct CampaignResponse {
    pub campaign: CampaignWithMeta,
}

// -- Comments --

#[derive(Debug, Deserialize)]
pub struct CreateCommentRequest {
    pub campaign_id: Option<i64>,
    pub content: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CommentsResponse {
    pub comments: Vec<CommentWithMeta>,
}

#[derive(Debug, Serialize)]
pub struct CommentResponse {
    pub comment: CommentWithMeta,
}
