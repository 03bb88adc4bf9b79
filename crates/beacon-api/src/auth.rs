use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use tracing::error;

use beacon_db::{StoreError, UserStore};
use beacon_types::api::{
    LoginRequest, LoginResponse, LogoutRequest, LogoutResponse, RegisterRequest,
};
use beacon_types::models::PublicUser;

use crate::error::{ApiError, internal};
use crate::validate::{self, required};
use crate::{password, token};

pub type AppState<S> = Arc<AppStateInner<S>>;

pub struct AppStateInner<S> {
    pub store: S,
    pub jwt_secret: String,
}

/// Registration never issues a token: a new user logs in afterwards.
pub async fn register<S>(
    State(state): State<AppState<S>>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError>
where
    S: UserStore + Send + Sync + 'static,
{
    // Validate input
    let (name, email, password) = match (
        required(req.name),
        required(req.email),
        required(req.password),
    ) {
        (Some(name), Some(email), Some(password)) => (name, email, password),
        _ => {
            return Err(ApiError::validation(
                "Name, email and password are required",
            ));
        }
    };

    validate::name(&name)?;
    validate::email(&email)?;
    validate::password(&password)?;

    // Fast-path duplicate check; the unique constraint below is the
    // authoritative guard against races.
    if state
        .store
        .find_user_by_email(&email)
        .await
        .map_err(internal("registration lookup failed"))?
        .is_some()
    {
        return Err(ApiError::conflict("Email already registered"));
    }

    let digest = password::hash(&password).map_err(|err| {
        error!("password hashing failed: {:#}", err);
        ApiError::internal("Internal server error")
    })?;

    let user = match state.store.create_user(&name, &email, &digest, false).await {
        Ok(user) => user,
        Err(StoreError::Conflict) => {
            return Err(ApiError::conflict("Email already registered"));
        }
        Err(err) => return Err(internal("user creation failed")(err)),
    };

    Ok((StatusCode::CREATED, Json(PublicUser::from(user))))
}

pub async fn login<S>(
    State(state): State<AppState<S>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError>
where
    S: UserStore + Send + Sync + 'static,
{
    let (email, password) = match (required(req.email), required(req.password)) {
        (Some(email), Some(password)) => (email, password),
        _ => return Err(ApiError::validation("Email and password are required")),
    };

    // Unknown email and wrong password answer identically.
    let user = state
        .store
        .find_user_by_email(&email)
        .await
        .map_err(internal("login lookup failed"))?
        .ok_or_else(|| ApiError::auth("Invalid email or password"))?;

    if !password::verify(&password, &user.password) {
        return Err(ApiError::auth("Invalid email or password"));
    }

    // The response carries the row read above: `login` still holds the
    // previous login's timestamp (null on a first login).
    state
        .store
        .update_login_time(user.user_id)
        .await
        .map_err(internal("login bookkeeping failed"))?;

    let token = token::issue(&state.jwt_secret, user.user_id).map_err(|err| {
        error!("token issuance failed: {:#}", err);
        ApiError::internal("Internal server error")
    })?;

    Ok(Json(LoginResponse {
        user: user.into(),
        token,
    }))
}

/// Advisory bookkeeping only: trusts the client-supplied id, stamps the
/// logout time and does not revoke the bearer token.
pub async fn logout<S>(
    State(state): State<AppState<S>>,
    Json(req): Json<LogoutRequest>,
) -> Result<Json<LogoutResponse>, ApiError>
where
    S: UserStore + Send + Sync + 'static,
{
    let Some(user_id) = req.user_id else {
        return Err(ApiError::validation("User ID is required"));
    };

    state
        .store
        .update_logout_time(user_id)
        .await
        .map_err(internal("logout bookkeeping failed"))?;

    Ok(Json(LogoutResponse { success: true }))
}
