//! Request and response payloads for the auth and protected endpoints. Field
//! names follow the backend's camelCase JSON. Passwords stay wrapped in
//! `SecretString` and are only exposed while serializing the request body.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

/// Authenticated user as reported by the backend.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub login: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

/// Response of `GET /api/auth/status`.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct AuthStatus {
    pub authenticated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
}

impl AuthStatus {
    #[must_use]
    pub fn unauthenticated() -> Self {
        Self::default()
    }
}

/// Response of `GET /api/protected/data`.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct ProtectedData {
    pub message: String,
    pub user: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<ProtectedPayload>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProtectedPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<i64>,
}

/// Response of `GET /api/public/health`.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct PublicData {
    pub status: String,
    pub message: String,
    pub timestamp: i64,
}

/// Entry of `GET /api/auth/providers`.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct OAuthProvider {
    pub key: String,
    pub name: String,
}

/// Arbitrary JSON object returned by `POST /api/protected/action`.
pub type ActionResult = Map<String, Value>;

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct ActionRequest {
    pub action: String,
}

impl ActionRequest {
    #[must_use]
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LoginRequest {
    pub email: String,
    #[serde(serialize_with = "expose_secret")]
    pub password: SecretString,
}

impl LoginRequest {
    #[must_use]
    pub fn new(email: impl Into<String>, password: SecretString) -> Self {
        Self {
            email: email.into(),
            password,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SignupRequest {
    pub email: String,
    #[serde(serialize_with = "expose_secret")]
    pub password: SecretString,
    pub name: String,
}

impl SignupRequest {
    #[must_use]
    pub fn new(email: impl Into<String>, password: SecretString, name: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password,
            name: name.into(),
        }
    }
}

fn expose_secret<S: Serializer>(secret: &SecretString, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(secret.expose_secret())
}
