use crate::config::Settings;
use crate::create_app;
use crate::state::tests::create_test_state;
use auth_core::{Argon2Config, Argon2Hasher, InMemorySource, SecretHasher, UserRecord};
use axum::body::Body;
use axum::Router;
use http::{Method, Request, StatusCode};
use http_body_util::BodyExt;
use log::LevelFilter;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tower::ServiceExt;

/// Test fixture for exercising the HTTP API against an in-memory store.
///
/// The store is seeded with a single user `alice` whose password is
/// `s3cret` and whose permissions are `{"read"}`. Tests can add, replace
/// or remove rows through `source` while the app is running.
///
/// # Examples
///
/// ```rust
/// #[tokio::test]
/// async fn test_endpoint() {
///     let fixture = TestFixture::new().await;
///
///     let response = fixture
///         .post("/v1/authenticate", &json!({"username": "alice", "password": "s3cret"}))
///         .await;
///
///     let principal = response.assert_ok().json_as::<PrincipalResponse>();
///     assert_eq!(principal.username, "alice");
/// }
/// ```
pub struct TestFixture {
    /// The application router
    pub app: Router,
    /// Configuration settings
    pub settings: Settings,
    /// Row table backing the app's credential store
    pub source: InMemorySource,
}

impl TestFixture {
    pub async fn new() -> Self {
        Self::setup_logger(LevelFilter::Debug);

        let settings = Settings::for_test();
        let source = InMemorySource::new();
        let hasher = Argon2Hasher::new(&Argon2Config::testing()).expect("valid test parameters");
        let alice = UserRecord::new(
            "alice",
            hasher.hash("s3cret").expect("Failed to hash test secret"),
            ["read"],
        )
        .expect("valid test record");
        source.insert_row(alice).await;

        let state = create_test_state(&settings, source.clone());
        let app = create_app(state).await;

        Self {
            app,
            settings,
            source,
        }
    }

    /// Initializes the test logger, ignoring repeated initialization
    pub fn setup_logger(level: LevelFilter) {
        let _ = env_logger::builder()
            .filter_level(level)
            .is_test(true)
            .try_init();
    }

    /// Creates a request builder carrying the test API key and a JSON content type
    pub fn request_builder(&self, method: Method, uri: impl AsRef<str>) -> http::request::Builder {
        Request::builder()
            .method(method)
            .uri(uri.as_ref())
            .header("Authorization", format!("Bearer {}", self.settings.api_key))
            .header("Content-Type", "application/json")
    }

    pub async fn get(&self, uri: impl AsRef<str>) -> TestResponse {
        let request = self
            .request_builder(Method::GET, uri)
            .body(Body::empty())
            .expect("Failed to build request");

        self.send(request).await
    }

    /// Sends a GET request without an Authorization header
    pub async fn get_unauthenticated(&self, uri: impl AsRef<str>) -> TestResponse {
        let request = Request::builder()
            .method(Method::GET)
            .uri(uri.as_ref())
            .body(Body::empty())
            .expect("Failed to build request");

        self.send(request).await
    }

    /// Sends a POST request with a JSON body to the specified URI.
    pub async fn post<T: Serialize>(&self, uri: impl AsRef<str>, body: &T) -> TestResponse {
        self.post_with_headers(uri, body, &[]).await
    }

    /// Sends a POST request with a JSON body and custom headers.
    ///
    /// Headers given here are set after the defaults, so an `Authorization`
    /// entry replaces the test API key.
    pub async fn post_with_headers<T: Serialize>(
        &self,
        uri: impl AsRef<str>,
        body: &T,
        headers: &[(&str, &str)],
    ) -> TestResponse {
        let json_body = serde_json::to_vec(body).expect("Failed to serialize body to JSON");
        let mut builder = self.request_builder(Method::POST, uri);

        if let Some(request_headers) = builder.headers_mut() {
            for (name, value) in headers {
                request_headers.insert(
                    http::HeaderName::from_bytes(name.as_bytes()).expect("valid header name"),
                    http::HeaderValue::from_str(value).expect("valid header value"),
                );
            }
        }

        let request = builder
            .body(Body::from(json_body))
            .expect("Failed to build request");

        self.send(request).await
    }

    /// Sends a request and returns a TestResponse.
    ///
    /// Non-JSON and empty bodies are reported as an empty JSON object.
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read response body")
            .to_bytes();

        let json = if !body.is_empty() {
            serde_json::from_slice(&body).unwrap_or_else(|_| serde_json::json!({}))
        } else {
            serde_json::json!({})
        };

        TestResponse { status, json }
    }
}

/// Response from a test request that provides convenient access to status and JSON body.
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Response body as JSON (if present and valid JSON)
    pub json: Value,
}

impl TestResponse {
    /// Asserts that the response has the expected status code.
    ///
    /// # Panics
    ///
    /// Panics if the status code doesn't match the expected value.
    pub fn assert_status(&self, expected: StatusCode) -> &Self {
        assert_eq!(
            self.status,
            expected,
            "Expected status {} but got {} with body: {}",
            expected,
            self.status,
            serde_json::to_string_pretty(&self.json).unwrap_or_default()
        );
        self
    }

    /// Asserts that the response status is OK (200).
    pub fn assert_ok(&self) -> &Self {
        self.assert_status(StatusCode::OK)
    }

    /// Converts the response body to the specified type.
    ///
    /// # Panics
    ///
    /// Panics if deserialization fails.
    pub fn json_as<T: DeserializeOwned>(&self) -> T {
        serde_json::from_value(self.json.clone()).expect("Failed to deserialize response JSON")
    }
}
