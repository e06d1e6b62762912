//! Configured HTTP transport: fixed base address, JSON content type by default,
//! and one cookie store shared by every call so the session cookie travels
//! automatically. No retry or auth logic lives here.

use super::{
    config::ClientConfig,
    error::ClientError,
    request::{ApiRequest, ApiResponse},
};
use reqwest::{
    cookie::{CookieStore, Jar},
    header::{HeaderMap, HeaderValue, CONTENT_TYPE},
    Client,
};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info_span, Instrument};
use url::Url;

/// Header carrying the request correlation id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

#[derive(Clone, Debug)]
pub struct Transport {
    http: Client,
    base_url: Url,
    cookies: Arc<Jar>,
}

impl Transport {
    /// Builds the reqwest client for `config`.
    ///
    /// # Errors
    /// Returns an error if the underlying client cannot be initialized.
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let cookies = Arc::new(Jar::default());

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let mut builder = Client::builder()
            .user_agent(config.user_agent.as_str())
            .default_headers(headers)
            .cookie_provider(Arc::clone(&cookies));

        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            base_url: config.api_base_url.clone(),
            cookies,
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Seeds the cookie store with an opaque `name=value; name2=value2` string
    /// scoped to the base address.
    pub fn seed_cookies(&self, raw: &str) {
        for pair in raw.split(';').map(str::trim).filter(|pair| !pair.is_empty()) {
            self.cookies.add_cookie_str(pair, &self.base_url);
        }
    }

    /// Current cookies for the base address, in `Cookie` header form.
    #[must_use]
    pub fn cookie_header(&self) -> Option<String> {
        self.cookies
            .cookies(&self.base_url)
            .and_then(|value| value.to_str().ok().map(str::to_string))
    }

    /// Resolves `path` against the base address. Absolute URLs pass through.
    ///
    /// # Errors
    /// Returns an error if the resulting URL is invalid.
    pub fn endpoint_url(&self, path: &str) -> Result<Url, ClientError> {
        let path = path.trim();
        if path.starts_with("http://") || path.starts_with("https://") {
            return Ok(Url::parse(path)?);
        }

        let base = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!(
            "{base}/{}",
            path.trim_start_matches('/')
        ))?)
    }

    /// Sends `request` once. Non-success statuses become [`ClientError::Http`].
    ///
    /// # Errors
    /// Returns an error if the request cannot be built, the network call fails,
    /// or the backend answers with a non-success status.
    pub async fn execute(&self, request: &ApiRequest) -> Result<ApiResponse, ClientError> {
        let url = self.endpoint_url(&request.path)?;
        let request_id = HeaderValue::from_str(&request.id.to_string())
            .map_err(|err| ClientError::Request(format!("Invalid request id: {err}")))?;

        let mut builder = self
            .http
            .request(request.method.clone(), url.clone())
            .headers(request.headers.clone())
            .header(REQUEST_ID_HEADER, request_id);

        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let span = info_span!(
            "http.request",
            http.method = %request.method,
            url = %url,
            request_id = %request.id
        );

        let response = builder.send().instrument(span).await?;
        let status = response.status();
        let final_url = response.url().clone();
        let body = response.bytes().await?.to_vec();

        debug!(status = status.as_u16(), url = %final_url, "response received");

        if status.is_success() {
            Ok(ApiResponse {
                status,
                url: final_url,
                body,
            })
        } else {
            Err(ClientError::Http {
                status,
                url: url.to_string(),
                body: decode_error_body(&body),
            })
        }
    }
}

/// JSON payload when parseable, otherwise the trimmed text, otherwise nothing.
fn decode_error_body(body: &[u8]) -> Option<Value> {
    if let Ok(value) = serde_json::from_slice::<Value>(body) {
        return Some(value);
    }

    let text = String::from_utf8_lossy(body);
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(Value::String(trimmed.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{bail, Result};
    use reqwest::StatusCode;
    use serde_json::json;
    use std::net::TcpListener;
    use wiremock::matchers::{body_json, header, header_exists, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn can_bind_localhost() -> bool {
        TcpListener::bind("127.0.0.1:0").is_ok()
    }

    fn transport(base: &str) -> Transport {
        let config = ClientConfig::with_base_url(Some(base)).unwrap();
        Transport::new(&config).unwrap()
    }

    #[test]
    fn endpoint_url_joins_base_and_path() {
        let transport = transport("http://localhost:8080/");
        assert_eq!(
            transport.endpoint_url("/api/auth/status").unwrap().as_str(),
            "http://localhost:8080/api/auth/status"
        );
        assert_eq!(
            transport.endpoint_url("api/auth/status").unwrap().as_str(),
            "http://localhost:8080/api/auth/status"
        );

        let prefixed = self::transport("https://example.com/backend");
        assert_eq!(
            prefixed.endpoint_url("/logout").unwrap().as_str(),
            "https://example.com/backend/logout"
        );
        assert_eq!(
            prefixed
                .endpoint_url("https://other.example/api")
                .unwrap()
                .as_str(),
            "https://other.example/api"
        );
    }

    #[test]
    fn decode_error_body_variants() {
        assert_eq!(
            decode_error_body(br#"{"error":"nope"}"#),
            Some(json!({ "error": "nope" }))
        );
        assert_eq!(
            decode_error_body(b" forbidden \n"),
            Some(Value::String("forbidden".to_string()))
        );
        assert_eq!(decode_error_body(b""), None);
    }

    #[tokio::test]
    async fn execute_sends_json_defaults_and_request_id() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/protected/action"))
            .and(header("content-type", "application/json"))
            .and(header_exists(REQUEST_ID_HEADER))
            .and(body_json(json!({ "action": "sync" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
            .expect(1)
            .mount(&server)
            .await;

        let transport = transport(&server.uri());
        let request = ApiRequest::post("/api/protected/action").json(&json!({ "action": "sync" }))?;
        let response = transport.execute(&request).await?;

        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.json::<Value>()?, json!({ "ok": true }));

        let Some(requests) = server.received_requests().await else {
            bail!("wiremock request recording is disabled");
        };
        let sent_id = requests[0]
            .headers
            .get(REQUEST_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        assert_eq!(sent_id, Some(request.id.to_string()));
        Ok(())
    }

    #[tokio::test]
    async fn execute_maps_error_status_with_payload() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/protected/data"))
            .respond_with(
                ResponseTemplate::new(403).set_body_json(json!({ "error": "insufficient_scope" })),
            )
            .mount(&server)
            .await;

        let transport = transport(&server.uri());
        let result = transport
            .execute(&ApiRequest::get("/api/protected/data"))
            .await;

        let Err(err) = result else {
            bail!("expected a 403 error");
        };
        assert_eq!(err.status(), Some(StatusCode::FORBIDDEN));
        assert_eq!(err.body(), Some(&json!({ "error": "insufficient_scope" })));
        Ok(())
    }

    #[tokio::test]
    async fn cookies_are_stored_and_sent_back() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("set-cookie", "jwt=issued; Path=/; HttpOnly")
                    .set_body_json(json!({ "success": true })),
            )
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/api/protected/data"))
            .and(header("cookie", "jwt=issued"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "ok" })))
            .expect(1)
            .mount(&server)
            .await;

        let transport = transport(&server.uri());
        transport.execute(&ApiRequest::post("/api/auth/login")).await?;
        let response = transport
            .execute(&ApiRequest::get("/api/protected/data"))
            .await?;
        assert_eq!(response.json::<Value>()?, json!({ "message": "ok" }));
        Ok(())
    }

    #[tokio::test]
    async fn seeded_cookies_are_sent() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/auth/status"))
            .and(header("cookie", "jwt=seeded"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "authenticated": true })))
            .expect(1)
            .mount(&server)
            .await;

        let transport = transport(&server.uri());
        transport.seed_cookies("jwt=seeded");
        assert_eq!(transport.cookie_header().as_deref(), Some("jwt=seeded"));
        transport.execute(&ApiRequest::get("/api/auth/status")).await?;
        Ok(())
    }

    #[tokio::test]
    async fn unreachable_backend_is_a_network_error() -> Result<()> {
        let port = match TcpListener::bind("127.0.0.1:0") {
            Ok(listener) => listener.local_addr()?.port(),
            Err(_) => {
                eprintln!("Skipping test: cannot bind localhost");
                return Ok(());
            }
        };

        let transport = transport(&format!("http://127.0.0.1:{port}"));
        let result = transport.execute(&ApiRequest::get("/api/public/health")).await;

        let Err(err) = result else {
            bail!("expected a network error");
        };
        assert!(matches!(err, ClientError::Network(_)));
        assert_eq!(err.status(), None);
        Ok(())
    }
}
