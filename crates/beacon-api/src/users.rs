use axum::Json;
use axum::extract::State;

use beacon_db::UserStore;
use beacon_types::models::PublicUser;

use crate::auth::AppState;
use crate::error::{ApiError, internal};
use crate::middleware::AuthUser;

/// User directory, newest signup first. Digests never leave the server, so
/// rows are narrowed to [`PublicUser`] before serialization.
pub async fn list<S>(
    State(state): State<AppState<S>>,
    AuthUser(_user): AuthUser,
) -> Result<Json<Vec<PublicUser>>, ApiError>
where
    S: UserStore + Send + Sync + 'static,
{
    let users = state
        .store
        .list_users()
        .await
        .map_err(internal("user listing failed"))?;

    Ok(Json(users.into_iter().map(PublicUser::from).collect()))
}
