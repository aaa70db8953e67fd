use auth_core::{AuthError, StoreError};
use axum::response::IntoResponse;
use axum::Json;
use http::StatusCode;
use log::error;
use serde_json::json;

pub(crate) const INVALID_CREDENTIALS: &str = "Invalid username or password";
const INTERNAL_ERROR: &str = "Internal server error";
const STORE_UNAVAILABLE: &str = "Credential store unavailable";

#[derive(Debug, Clone)]
pub struct ApiError {
    pub detail: String,
    pub status_code: StatusCode,
}

impl ApiError {
    /// Create a new ApiError with a detail message and status code
    pub fn new<S: ToString>(detail: S, status_code: StatusCode) -> Self {
        Self {
            detail: detail.to_string(),
            status_code,
        }
    }

    /// Create new Internal Server Error (500) with a fixed detail message
    pub fn internal() -> Self {
        Self::new(INTERNAL_ERROR, StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Create new Bad Request Error (400) with a detail message
    pub fn bad_request<S: ToString>(detail: S) -> Self {
        Self::new(detail, StatusCode::BAD_REQUEST)
    }

    /// Create new Bad Gateway (502) with a fixed detail message
    pub fn bad_gateway() -> Self {
        Self::new(STORE_UNAVAILABLE, StatusCode::BAD_GATEWAY)
    }

    /// Create new Unauthorized (401), identical for every rejected login
    pub fn unauthorized() -> Self {
        Self::new(INVALID_CREDENTIALS, StatusCode::UNAUTHORIZED)
    }

    pub fn not_found<S: ToString>(detail: S) -> Self {
        Self::new(detail, StatusCode::NOT_FOUND)
    }

    pub fn service_unavailable<S: ToString>(detail: S) -> Self {
        Self::new(detail, StatusCode::SERVICE_UNAVAILABLE)
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::InvalidArgument(message) => Self::bad_request(message),
            StoreError::Backend(_) => Self::bad_gateway(),
            StoreError::DataIntegrityViolation { .. } | StoreError::Decode(_) => {
                error!("Credential lookup failed: {}", err);
                Self::internal()
            }
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Failed(_) => Self::unauthorized(),
            AuthError::Store(err) => Self::from(err),
            AuthError::Hash(err) => {
                error!("Password verification failed: {}", err);
                Self::internal()
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status_code = self.status_code;
        let body = json!({
            "detail": self.detail,
        });
        (status_code, Json(body)).into_response()
    }
}
