use crate::api::authn::PrincipalResponse;
use crate::errors::ApiError;
use crate::openapi::AUTHN_TAG;
use crate::state::AppState;
use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

#[utoipa::path(
    get,
    path = "/v1/users/{username}",
    tag = AUTHN_TAG,
    params(
        ("username" = String, Path, description = "Username to look up"),
        ("Authorization" = String, Header, description = "Authorization header"),
    ),
    responses(
        (status = 200, description = "User found", body = PrincipalResponse),
        (status = 400, description = "Empty username"),
        (status = 404, description = "No such user"),
        (status = 500, description = "Internal server error"),
        (status = 502, description = "Credential store unavailable")
    )
)]
pub(crate) async fn get_user_handler(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Response {
    match state.store().find_by_username(&username).await {
        Ok(Some(record)) => {
            let response = PrincipalResponse {
                username: record.username().to_string(),
                permissions: record.permissions().iter().cloned().collect(),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Ok(None) => ApiError::not_found("User not found").into_response(),
        Err(err) => ApiError::from(err).into_response(),
    }
}
