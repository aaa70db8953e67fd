use crate::state::AppState;
use axum::{
    body::Body,
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use log::warn;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

const FORBIDDEN_MESSAGE: &str =
    "You are not authorized to access this resource, please check your API key.";

pub(super) async fn authentication_middleware(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    // Extract the authorization header
    let auth_header = match request.headers().get(http::header::AUTHORIZATION) {
        Some(header) => header,
        None => {
            warn!("Missing Authorization header");
            return (StatusCode::UNAUTHORIZED, "Missing Authorization header").into_response();
        }
    };

    // Extract the token from the authorization header
    let api_key = match auth_header.to_str() {
        Ok(header_str) if has_bearer_prefix(header_str) => &header_str[7..],
        Ok(_) => {
            warn!("Invalid Authorization header format, missing 'Bearer ' prefix");
            return (StatusCode::FORBIDDEN, FORBIDDEN_MESSAGE).into_response();
        }
        Err(e) => {
            warn!("Failed to parse Authorization header to string: {}", e);
            return (StatusCode::FORBIDDEN, FORBIDDEN_MESSAGE).into_response();
        }
    };

    // Verify the API key
    if !api_key_matches(api_key, &state.settings.api_key) {
        warn!("Authentication failed: Invalid API key");
        return (StatusCode::FORBIDDEN, FORBIDDEN_MESSAGE).into_response();
    }
    next.run(request).await
}

fn has_bearer_prefix(header: &str) -> bool {
    header.len() > 7 && header[..7].eq_ignore_ascii_case("bearer ")
}

/// Compares SHA-256 digests so the comparison time does not depend on the key length
fn api_key_matches(presented: &str, expected: &str) -> bool {
    let presented = Sha256::digest(presented.as_bytes());
    let expected = Sha256::digest(expected.as_bytes());
    presented.as_slice().ct_eq(expected.as_slice()).into()
}
