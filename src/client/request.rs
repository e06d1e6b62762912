use super::error::ClientError;
use reqwest::{
    header::{HeaderMap, HeaderName, HeaderValue},
    Method, StatusCode,
};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use ulid::Ulid;
use url::Url;

/// Outgoing request, kept independent of reqwest so it can be re-sent after a refresh.
#[derive(Clone, Debug)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub headers: HeaderMap,
    pub body: Option<Value>,
    pub id: Ulid,
}

impl ApiRequest {
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: HeaderMap::new(),
            body: None,
            id: Ulid::new(),
        }
    }

    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    #[must_use]
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// Attaches a JSON body.
    ///
    /// # Errors
    /// Returns an error if the body cannot be encoded as JSON.
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, ClientError> {
        let value = serde_json::to_value(body)
            .map_err(|err| ClientError::Request(format!("Failed to encode request: {err}")))?;
        self.body = Some(value);
        Ok(self)
    }

    /// Adds a header.
    ///
    /// # Errors
    /// Returns an error if the name or value is not a valid HTTP header.
    pub fn header(mut self, name: &str, value: &str) -> Result<Self, ClientError> {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|err| ClientError::Request(format!("Invalid header name {name}: {err}")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|err| ClientError::Request(format!("Invalid header value: {err}")))?;
        self.headers.insert(name, value);
        Ok(self)
    }

    /// Whether the path targets `endpoint`, ignoring the query string.
    #[must_use]
    pub fn targets(&self, endpoint: &str) -> bool {
        self.path
            .split(['?', '#'])
            .next()
            .is_some_and(|path| path.contains(endpoint))
    }
}

/// A request together with its "already retried once" marker.
#[derive(Clone, Debug)]
pub struct PendingRequest {
    pub request: ApiRequest,
    pub retried: bool,
}

impl PendingRequest {
    #[must_use]
    pub fn new(request: ApiRequest) -> Self {
        Self {
            request,
            retried: false,
        }
    }

    pub fn mark_retried(&mut self) {
        self.retried = true;
    }
}

/// Successful response with its body fully read.
#[derive(Clone, Debug)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub url: Url,
    pub body: Vec<u8>,
}

impl ApiResponse {
    /// Decodes the body as JSON.
    ///
    /// # Errors
    /// Returns an error if the body does not match `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ClientError> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.body.iter().all(u8::is_ascii_whitespace)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_builders() {
        let request = ApiRequest::post("/api/protected/action")
            .json(&json!({ "action": "sync" }))
            .unwrap()
            .header("x-trace", "abc")
            .unwrap();

        assert_eq!(request.method, Method::POST);
        assert_eq!(request.body, Some(json!({ "action": "sync" })));
        assert_eq!(
            request.headers.get("x-trace").map(HeaderValue::as_bytes),
            Some("abc".as_bytes())
        );
    }

    #[test]
    fn invalid_header_is_a_request_error() {
        let result = ApiRequest::get("/").header("bad header", "value");
        assert!(matches!(result, Err(ClientError::Request(_))));
    }

    #[test]
    fn targets_ignores_query() {
        let request = ApiRequest::get("/api/auth/status?probe=1");
        assert!(request.targets("/api/auth/status"));
        assert!(!request.targets("/api/auth/refresh"));

        let request = ApiRequest::get("/api/protected/data?next=/api/auth/refresh");
        assert!(!request.targets("/api/auth/refresh"));
    }

    #[test]
    fn pending_request_marker() {
        let mut pending = PendingRequest::new(ApiRequest::get("/api/protected/data"));
        assert!(!pending.retried);
        pending.mark_retried();
        assert!(pending.retried);
    }

    #[test]
    fn response_json_and_empty() {
        let response = ApiResponse {
            status: StatusCode::OK,
            url: Url::parse("http://localhost:8080/api/protected/data").unwrap(),
            body: br#"{"call":1}"#.to_vec(),
        };
        let value: Value = response.json().unwrap();
        assert_eq!(value, json!({ "call": 1 }));
        assert!(!response.is_empty());

        let empty = ApiResponse {
            body: Vec::new(),
            ..response
        };
        assert!(empty.is_empty());
        assert!(empty.json::<Value>().is_err());
    }
}
