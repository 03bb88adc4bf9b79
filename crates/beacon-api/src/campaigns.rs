use axum::Json;
use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum_extra::extract::Host;
use serde::Deserialize;
use tracing::error;

use beacon_db::CampaignStore;
use beacon_types::api::{CampaignResponse, CampaignsResponse, CreateCampaignRequest};

use crate::auth::AppState;
use crate::error::{ApiError, internal};
use crate::middleware::AuthUser;
use crate::validate::required;

#[derive(Debug, Deserialize)]
pub struct CampaignQuery {
    pub id: Option<i64>,
}

/// One campaign when `?id=` is given, otherwise all campaigns newest first.
pub async fn list<S>(
    State(state): State<AppState<S>>,
    AuthUser(_user): AuthUser,
    Query(query): Query<CampaignQuery>,
) -> Result<Json<CampaignsResponse>, ApiError>
where
    S: CampaignStore + Send + Sync + 'static,
{
    let campaigns = state
        .store
        .list_campaigns(query.id)
        .await
        .map_err(internal("campaign listing failed"))?;

    Ok(Json(CampaignsResponse { campaigns }))
}

/// Creates the campaign and its backlink in one transaction. The backlink
/// points back at the redirect endpoint on this host; the campaign id is
/// supplied as a query parameter at click time, so the URL itself never
/// encodes it.
pub async fn create<S>(
    State(state): State<AppState<S>>,
    AuthUser(user): AuthUser,
    Host(host): Host,
    headers: HeaderMap,
    Json(req): Json<CreateCampaignRequest>,
) -> Result<Json<CampaignResponse>, ApiError>
where
    S: CampaignStore + Send + Sync + 'static,
{
    let (title, description) = match (required(req.title), required(req.description)) {
        (Some(title), Some(description)) => (title, description),
        _ => return Err(ApiError::validation("Missing required fields")),
    };

    let scheme = headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("http");
    let destination_url = format!("{scheme}://{host}/campaigns/redirect");

    let campaign = state
        .store
        .create_campaign(user.user_id, &title, &description, &destination_url)
        .await
        .map_err(|err| {
            error!("campaign creation failed: {:#}", err);
            ApiError::internal("Failed to create campaign")
        })?;

    Ok(Json(CampaignResponse { campaign }))
}
