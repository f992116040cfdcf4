//! Remote identity service contract.

use std::future::Future;

use serde::Deserialize;
use serde_json::{Map, Value};

use super::session::Session;
use super::validate::{Credentials, FieldErrors, RegistrationRequest};

/// Extension key carrying the form-level "invalid credentials" message.
pub const INVALID_CREDENTIALS_KEY: &str = "invalidCredentials";

/// Extension keys added by GraphQL servers that are not field errors.
const RESERVED_EXTENSION_KEYS: &[&str] = &["code", "stacktrace", "exception"];

/// User fields returned by a successful register/login.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteUser {
    pub id: String,
    pub email: String,
    pub fullname: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

impl RemoteUser {
    pub fn into_session(self) -> Session {
        Session {
            user_id: Some(self.id),
            fullname: self.fullname,
            email: self.email,
            avatar_url: self.avatar_url,
        }
    }
}

/// Structured rejection returned by the identity service.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rejection {
    pub fields: FieldErrors,
    pub invalid_credentials: Option<String>,
}

impl Rejection {
    /// Builds a rejection from a GraphQL error `extensions` object.
    ///
    /// Only string values are kept. `invalidCredentials` is split out of the
    /// field map; server bookkeeping keys are dropped.
    pub fn from_extensions(extensions: &Map<String, Value>) -> Self {
        let mut rejection = Rejection::default();
        for (key, value) in extensions {
            let Some(message) = value.as_str() else {
                continue;
            };
            if key == INVALID_CREDENTIALS_KEY {
                rejection.invalid_credentials = Some(message.to_string());
            } else if !RESERVED_EXTENSION_KEYS.contains(&key.as_str()) {
                rejection.fields.insert(key.as_str(), message);
            }
        }
        rejection
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    #[error("identity service rejected the request")]
    Rejected(Rejection),
    #[error("identity service unavailable: {0}")]
    Transport(String),
}

/// The remote system that verifies credentials and creates accounts.
///
/// Calls are never retried by the client.
pub trait IdentityService {
    fn register(
        &self,
        request: &RegistrationRequest,
    ) -> impl Future<Output = Result<RemoteUser, ServiceError>> + Send;

    fn login(
        &self,
        credentials: &Credentials,
    ) -> impl Future<Output = Result<RemoteUser, ServiceError>> + Send;

    fn logout(&self) -> impl Future<Output = Result<(), ServiceError>> + Send;
}
