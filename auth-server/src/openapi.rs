use crate::api::authn::authenticate::AuthenticateRequest;
use crate::api::authn::PrincipalResponse;
use crate::api::health::Health;
use crate::state::AppState;
use axum::{routing::get, Json, Router};
use utoipa::OpenApi;

pub(crate) const HEALTH_TAG: &str = "Health API";
pub(crate) const AUTHN_TAG: &str = "Authentication API";

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::api::health::health_check,
        crate::api::health::ready_check,
        crate::api::authn::authenticate::authenticate_handler,
        crate::api::authn::users::get_user_handler,
    ),
    components(schemas(AuthenticateRequest, PrincipalResponse, Health)),
    tags(
        (name = HEALTH_TAG, description = "Health check endpoints"),
        (name = AUTHN_TAG, description = "Credential verification endpoints"),
    ),
    info(
        title = "Auth Server API",
        description = "Credential lookup and verification service",
        version = "0.1.0"
    )
)]
pub(crate) struct ApiDoc;

/// Handler for the OpenAPI JSON specification endpoint
async fn openapi_json_handler() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Creates a router for OpenAPI documentation routes
pub(crate) fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json_handler))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestFixture;

    #[test]
    fn test_openapi_lists_routes() {
        let doc = ApiDoc::openapi();
        for path in ["/health", "/ready", "/v1/authenticate", "/v1/users/{username}"] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }

    #[tokio::test]
    async fn test_openapi_json_endpoint() {
        let fixture = TestFixture::new().await;
        let response = fixture.get_unauthenticated("/openapi.json").await;

        response.assert_ok();
        assert_eq!(response.json["info"]["title"], "Auth Server API");
    }
}
