use axum::extract::{FromRequestParts, Request, State};
use axum::http::header;
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::Response;
use tracing::warn;

use crate::auth::AppState;
use crate::error::ApiError;
use crate::token;

/// Identity attached to a request whose bearer token verified.
#[derive(Debug, Clone, Copy)]
pub struct CurrentUser {
    pub user_id: i64,
}

/// Identity gateway. Reads the `Authorization` header and attaches
/// [`CurrentUser`] when a bearer token verifies. It never fails the request:
/// a missing header, a non-bearer scheme and a bad token all just leave the
/// identity unset and let the request proceed. Enforcement happens only at
/// endpoints that extract [`AuthUser`].
pub async fn identity_gateway<S>(
    State(state): State<AppState<S>>,
    mut req: Request,
    next: Next,
) -> Response
where
    S: Send + Sync + 'static,
{
    let bearer = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    if let Some(token) = bearer {
        match token::verify(&state.jwt_secret, token) {
            Ok(user_id) => {
                req.extensions_mut().insert(CurrentUser { user_id });
            }
            Err(err) => {
                warn!("token verification failed: {}", err);
            }
        }
    }

    next.run(req).await
}

/// Resource guard: turns an unset identity into a 401. Every endpoint that
/// reads or writes user-scoped data takes this extractor.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub CurrentUser);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .copied()
            .map(AuthUser)
            .ok_or_else(|| ApiError::auth("Unauthorized"))
    }
}
