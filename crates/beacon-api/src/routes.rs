use axum::Router;
use axum::middleware;
use axum::routing::{get, post};

use beacon_db::{CampaignStore, UserStore};

use crate::auth::{self, AppState};
use crate::middleware::identity_gateway;
use crate::{campaigns, comments, redirect, users};

/// Full API router. The identity gateway runs on every route and never
/// rejects; enforcement lives in the handlers that extract
/// [`crate::middleware::AuthUser`]. The redirect endpoint stays public.
pub fn router<S>(state: AppState<S>) -> Router
where
    S: UserStore + CampaignStore + Send + Sync + 'static,
{
    Router::new()
        .route("/auth/register", post(auth::register::<S>))
        .route("/auth/login", post(auth::login::<S>))
        .route("/auth/logout", post(auth::logout::<S>))
        .route(
            "/campaigns",
            get(campaigns::list::<S>).post(campaigns::create::<S>),
        )
        .route(
            "/campaigns/comments",
            get(comments::list::<S>).post(comments::create::<S>),
        )
        .route("/campaigns/redirect", get(redirect::resolve::<S>))
        .route("/data", get(users::list::<S>))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            identity_gateway::<S>,
        ))
        .with_state(state)
}
