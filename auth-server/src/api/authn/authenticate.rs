use crate::api::authn::PrincipalResponse;
use crate::errors::ApiError;
use crate::openapi::AUTHN_TAG;
use crate::state::AppState;
use auth_core::AuthenticatedPrincipal;
use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use log::{error, warn};
use serde::Deserialize;
use std::fmt;
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct AuthenticateRequest {
    /// Username to authenticate
    pub username: String,
    /// Plaintext password, only held for the duration of the request
    pub password: String,
}

impl fmt::Debug for AuthenticateRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthenticateRequest")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl From<AuthenticatedPrincipal> for PrincipalResponse {
    fn from(principal: AuthenticatedPrincipal) -> Self {
        let (username, permissions) = principal.into_parts();
        Self {
            username,
            permissions: permissions.into_iter().collect(),
        }
    }
}

#[utoipa::path(
    post,
    path = "/v1/authenticate",
    tag = AUTHN_TAG,
    request_body = AuthenticateRequest,
    params(
        ("Authorization" = String, Header, description = "Authorization header"),
    ),
    responses(
        (status = 200, description = "Credentials verified", body = PrincipalResponse),
        (status = 400, description = "Empty username"),
        (status = 401, description = "Invalid username or password"),
        (status = 422, description = "Invalid request payload"),
        (status = 500, description = "Internal server error"),
        (status = 502, description = "Credential store unavailable"),
        (status = 503, description = "Authentication timed out")
    )
)]
pub(crate) async fn authenticate_handler(
    State(state): State<AppState>,
    Json(request): Json<AuthenticateRequest>,
) -> Response {
    let timeout = state.settings.authenticate_timeout();

    // The timeout covers waiting for a hashing permit as well as the hash itself
    let outcome = tokio::time::timeout(timeout, async {
        let _permit = state.hash_permits.acquire().await.map_err(|e| {
            error!("Hashing permits are unavailable: {}", e);
            ApiError::service_unavailable("Authentication unavailable")
        })?;
        state
            .verifier
            .authenticate(&request.username, &request.password)
            .await
            .map_err(ApiError::from)
    })
    .await;

    match outcome {
        Ok(Ok(principal)) => {
            (StatusCode::OK, Json(PrincipalResponse::from(principal))).into_response()
        }
        Ok(Err(err)) => err.into_response(),
        Err(_) => {
            warn!(
                "Authentication for user {:?} timed out after {:?}",
                request.username, timeout
            );
            ApiError::service_unavailable("Authentication timed out").into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::api::authn::PrincipalResponse;
    use crate::errors::INVALID_CREDENTIALS;
    use crate::create_app;
    use crate::state::tests::create_test_state;
    use crate::test_utils::TestFixture;
    use auth_core::{Argon2Config, Argon2Hasher, SecretHasher, UserRecord};
    use http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn test_authenticate_success() {
        let fixture = TestFixture::new().await;

        let response = fixture
            .post(
                "/v1/authenticate",
                &json!({"username": "alice", "password": "s3cret"}),
            )
            .await;

        let principal = response.assert_ok().json_as::<PrincipalResponse>();
        assert_eq!(
            principal,
            PrincipalResponse {
                username: "alice".to_string(),
                permissions: vec!["read".to_string()],
            }
        );
    }

    #[tokio::test]
    async fn test_rejections_are_indistinguishable() {
        let fixture = TestFixture::new().await;

        let wrong_secret = fixture
            .post(
                "/v1/authenticate",
                &json!({"username": "alice", "password": "wrong"}),
            )
            .await;
        let unknown_user = fixture
            .post(
                "/v1/authenticate",
                &json!({"username": "bob", "password": "anything"}),
            )
            .await;

        wrong_secret.assert_status(StatusCode::UNAUTHORIZED);
        unknown_user.assert_status(StatusCode::UNAUTHORIZED);
        assert_eq!(wrong_secret.json, unknown_user.json);
        assert_eq!(wrong_secret.json, json!({"detail": INVALID_CREDENTIALS}));
    }

    #[tokio::test]
    async fn test_empty_username_is_bad_request() {
        let fixture = TestFixture::new().await;

        let response = fixture
            .post(
                "/v1/authenticate",
                &json!({"username": "", "password": "s3cret"}),
            )
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_missing_password_is_rejected() {
        let fixture = TestFixture::new().await;

        let response = fixture
            .post("/v1/authenticate", &json!({"username": "alice"}))
            .await;

        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_duplicate_rows_are_an_internal_error() {
        let fixture = TestFixture::new().await;
        let hasher = Argon2Hasher::new(&Argon2Config::testing()).unwrap();
        let hash = hasher.hash("s3cret").unwrap();
        fixture
            .source
            .insert_row(UserRecord::new("alice", hash, ["admin"]).unwrap())
            .await;

        let response = fixture
            .post(
                "/v1/authenticate",
                &json!({"username": "alice", "password": "s3cret"}),
            )
            .await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.json, json!({"detail": "Internal server error"}));
    }

    #[tokio::test]
    async fn test_permission_changes_apply_to_next_login() {
        let fixture = TestFixture::new().await;
        let hasher = Argon2Hasher::new(&Argon2Config::testing()).unwrap();
        fixture
            .source
            .upsert(
                UserRecord::new("alice", hasher.hash("s3cret").unwrap(), ["read", "write"])
                    .unwrap(),
            )
            .await;

        let principal = fixture
            .post(
                "/v1/authenticate",
                &json!({"username": "alice", "password": "s3cret"}),
            )
            .await
            .assert_ok()
            .json_as::<PrincipalResponse>();

        assert_eq!(principal.permissions, vec!["read", "write"]);
    }

    #[tokio::test]
    async fn test_requires_api_key() {
        let fixture = TestFixture::new().await;

        let response = fixture
            .post_with_headers(
                "/v1/authenticate",
                &json!({"username": "alice", "password": "s3cret"}),
                &[("Authorization", "Bearer wrong")],
            )
            .await;

        response.assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_saturated_hashing_times_out() {
        let fixture = TestFixture::new().await;
        let mut settings = fixture.settings.clone();
        settings.authenticate_timeout_secs = 1;
        settings.hashing.max_concurrent = 1;
        let state = create_test_state(&settings, fixture.source.clone());
        let _held = state.hash_permits.clone().acquire_owned().await.unwrap();
        let fixture = TestFixture {
            app: create_app(state).await,
            ..fixture
        };

        let response = fixture
            .post(
                "/v1/authenticate",
                &json!({"username": "alice", "password": "s3cret"}),
            )
            .await;

        response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    }
}
