pub mod authenticate;
pub mod users;

use crate::state::AppState;
use axum::routing::{get, post};
use axum::Router;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Identity and permissions of a user, never the password hash
#[derive(Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct PrincipalResponse {
    /// Username of the user
    pub username: String,
    /// Permission names granted to the user, sorted
    pub permissions: Vec<String>,
}

/// Combines all credential routes into a single router
pub(super) fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/v1/authenticate",
            post(authenticate::authenticate_handler),
        )
        .route("/v1/users/{username}", get(users::get_user_handler))
}
