use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use tracing::error;

use beacon_db::CampaignStore;
use beacon_types::NewClick;

use crate::auth::AppState;
use crate::client;
use crate::error::ApiError;

/// Country lookup is out of scope; every click records this placeholder.
pub const COUNTRY_CODE_STUB: &str = "XX";

#[derive(Debug, Deserialize)]
pub struct RedirectQuery {
    pub id: Option<i64>,
}

/// Public redirect endpoint: resolves the campaign's backlink, records the
/// click, then redirects. The click insert comes first — when it fails the
/// visitor gets a 500 and no redirect, so recorded click counts stay
/// trustworthy at the cost of the odd lost visit.
pub async fn resolve<S>(
    State(state): State<AppState<S>>,
    Query(query): Query<RedirectQuery>,
    headers: HeaderMap,
) -> Result<Response, ApiError>
where
    S: CampaignStore + Send + Sync + 'static,
{
    let Some(campaign_id) = query.id else {
        return Err(ApiError::validation("Campaign ID is required"));
    };

    let target = state
        .store
        .resolve_redirect(campaign_id)
        .await
        .map_err(|err| {
            error!("redirect lookup failed: {:#}", err);
            ApiError::internal("Internal server error")
        })?
        .ok_or_else(|| ApiError::not_found("Campaign not found"))?;

    let click = NewClick {
        backlink_id: target.backlink_id,
        campaign_id: target.campaign_id,
        referrer_url: client::referrer(&headers),
        ip_address: client::client_ip(&headers),
        user_agent: client::user_agent(&headers),
        country_code: COUNTRY_CODE_STUB.to_owned(),
    };

    state.store.record_click(&click).await.map_err(|err| {
        error!("click recording failed: {:#}", err);
        ApiError::internal("Internal server error")
    })?;

    // 302 exactly; axum's Redirect::temporary would send 307.
    Ok((StatusCode::FOUND, [(header::LOCATION, target.destination_url)]).into_response())
}
