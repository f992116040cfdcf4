//! GraphQL-over-HTTP identity service client.
//!
//! Each operation POSTs `{query, variables}` to a single endpoint. The HTTP
//! client keeps a cookie jar so the session cookie issued by `login` or
//! `register` accompanies the later `logout`. The jar lives in memory;
//! `session_cookie` and `restore_session_cookie` carry it across processes.
//!
//! ## Error Mapping
//!
//! - `errors[0].extensions` with field messages → `ServiceError::Rejected`
//! - errors without usable extensions, non-JSON bodies, HTTP failures,
//!   timeouts and connection errors → `ServiceError::Transport`

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::cookie::{CookieStore, Jar};
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use tracing::debug;
use url::Url;

use super::service::{IdentityService, Rejection, RemoteUser, ServiceError};
use super::validate::{Credentials, RegistrationRequest};
use crate::config::Config;

const REGISTER_MUTATION: &str = "mutation RegisterUser($fullname: String!, $email: String!, $password: String!, $confirmPassword: String!) {
  register(registerInput: { fullname: $fullname, email: $email, password: $password, confirmPassword: $confirmPassword }) {
    user { id fullname email }
  }
}";

const LOGIN_MUTATION: &str = "mutation LoginUser($email: String!, $password: String!) {
  login(loginInput: { email: $email, password: $password }) {
    user { id fullname email avatarUrl }
  }
}";

const LOGOUT_MUTATION: &str = "mutation LogoutUser { logout }";

#[derive(Serialize)]
struct GraphQlRequest<'a> {
    query: &'a str,
    variables: Value,
}

#[derive(Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Deserialize)]
struct GraphQlError {
    message: String,
    #[serde(default)]
    extensions: Option<Map<String, Value>>,
}

#[derive(Deserialize)]
struct AuthPayload {
    user: Option<RemoteUser>,
}

#[derive(Deserialize)]
struct RegisterData {
    register: AuthPayload,
}

#[derive(Deserialize)]
struct LoginData {
    login: AuthPayload,
}

#[derive(Deserialize)]
struct LogoutData {
    #[serde(rename = "logout")]
    _logout: IgnoredAny,
}

#[derive(Debug, Clone)]
pub struct GraphQlIdentityService {
    endpoint: Url,
    http: reqwest::Client,
    cookies: Arc<Jar>,
}

impl GraphQlIdentityService {
    /// Creates a client for `endpoint`. `None` disables the request timeout.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(endpoint: Url, timeout: Option<Duration>) -> Result<Self> {
        let cookies = Arc::new(Jar::default());
        let mut builder = reqwest::Client::builder().cookie_provider(Arc::clone(&cookies));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().context("Failed to build HTTP client")?;
        Ok(Self {
            endpoint,
            http,
            cookies,
        })
    }

    /// Creates a client from the configured endpoint and timeout.
    ///
    /// # Errors
    /// Returns an error if the endpoint is not a valid URL.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.identity_endpoint()?, config.request_timeout())
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Returns the `Cookie` header the endpoint would receive, if any.
    pub fn session_cookie(&self) -> Option<String> {
        let header = self.cookies.cookies(&self.endpoint)?;
        header.to_str().ok().map(str::to_string)
    }

    /// Seeds the jar from a header previously returned by `session_cookie`.
    pub fn restore_session_cookie(&self, header: &str) {
        for pair in header.split(';').map(str::trim).filter(|p| !p.is_empty()) {
            self.cookies.add_cookie_str(pair, &self.endpoint);
        }
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        operation: &str,
        query: &str,
        variables: Value,
    ) -> Result<T, ServiceError> {
        debug!(operation, endpoint = %self.endpoint, "sending identity request");

        let response = self
            .http
            .post(self.endpoint.clone())
            .json(&GraphQlRequest { query, variables })
            .send()
            .await
            .map_err(|err| ServiceError::Transport(describe_reqwest_error(&err)))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|err| ServiceError::Transport(describe_reqwest_error(&err)))?;

        let parsed: GraphQlResponse<T> = match serde_json::from_slice(&body) {
            Ok(parsed) => parsed,
            Err(_) if !status.is_success() => {
                return Err(ServiceError::Transport(format!("HTTP {status}")));
            }
            Err(err) => {
                return Err(ServiceError::Transport(format!("malformed response: {err}")));
            }
        };

        if let Some(first) = parsed.errors.into_iter().next() {
            debug!(operation, message = %first.message, "identity request returned errors");
            let rejection = first
                .extensions
                .as_ref()
                .map(Rejection::from_extensions)
                .unwrap_or_default();
            if rejection.fields.is_empty() && rejection.invalid_credentials.is_none() {
                return Err(ServiceError::Transport(first.message));
            }
            return Err(ServiceError::Rejected(rejection));
        }

        if !status.is_success() {
            return Err(ServiceError::Transport(format!("HTTP {status}")));
        }

        parsed
            .data
            .ok_or_else(|| ServiceError::Transport("response carried no data".to_string()))
    }
}

fn describe_reqwest_error(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        "request timed out".to_string()
    } else if err.is_connect() {
        "could not connect to identity service".to_string()
    } else {
        err.to_string()
    }
}

fn require_user(payload: AuthPayload) -> Result<RemoteUser, ServiceError> {
    payload
        .user
        .ok_or_else(|| ServiceError::Transport("response carried no user".to_string()))
}

impl IdentityService for GraphQlIdentityService {
    async fn register(&self, request: &RegistrationRequest) -> Result<RemoteUser, ServiceError> {
        let variables = json!({
            "fullname": request.fullname,
            "email": request.email,
            "password": request.password,
            "confirmPassword": request.confirm_password,
        });
        let data: RegisterData = self
            .execute("register", REGISTER_MUTATION, variables)
            .await?;
        require_user(data.register)
    }

    async fn login(&self, credentials: &Credentials) -> Result<RemoteUser, ServiceError> {
        let variables = json!({
            "email": credentials.email,
            "password": credentials.password,
        });
        let data: LoginData = self.execute("login", LOGIN_MUTATION, variables).await?;
        require_user(data.login)
    }

    async fn logout(&self) -> Result<(), ServiceError> {
        let _: LogoutData = self
            .execute("logout", LOGOUT_MUTATION, json!({}))
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    async fn service_for(server: &MockServer) -> GraphQlIdentityService {
        let endpoint = Url::parse(&format!("{}/graphql", server.uri())).unwrap();
        GraphQlIdentityService::new(endpoint, Some(Duration::from_secs(5))).unwrap()
    }

    fn creds() -> Credentials {
        Credentials::new("a@b.com", "secret")
    }

    #[tokio::test]
    async fn test_login_parses_user_with_avatar() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/graphql"))
            .and(body_partial_json(json!({
                "variables": { "email": "a@b.com", "password": "secret" }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": { "login": { "user": {
                    "id": "1", "email": "a@b.com", "fullname": "A", "avatarUrl": "x"
                } } }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let user = service_for(&server).await.login(&creds()).await.unwrap();

        assert_eq!(user.id, "1");
        assert_eq!(user.avatar_url.as_deref(), Some("x"));
    }

    #[tokio::test]
    async fn test_register_sends_all_four_fields() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({
                "variables": {
                    "fullname": "Alice",
                    "email": "a@b.com",
                    "password": "secret",
                    "confirmPassword": "secret"
                }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": { "register": { "user": {
                    "id": "9", "email": "a@b.com", "fullname": "Alice"
                } } }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let request = RegistrationRequest {
            fullname: "Alice".to_string(),
            email: "a@b.com".to_string(),
            password: "secret".to_string(),
            confirm_password: "secret".to_string(),
        };
        let user = service_for(&server).await.register(&request).await.unwrap();

        assert_eq!(user.id, "9");
        assert_eq!(user.avatar_url, None);
    }

    #[tokio::test]
    async fn test_error_extensions_become_rejection() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": null,
                "errors": [{
                    "message": "Invalid credentials",
                    "extensions": {
                        "code": "BAD_USER_INPUT",
                        "invalidCredentials": "Invalid email or password"
                    }
                }]
            })))
            .mount(&server)
            .await;

        let err = service_for(&server).await.login(&creds()).await.unwrap_err();

        let ServiceError::Rejected(rejection) = err else {
            panic!("expected rejection, got {err:?}");
        };
        assert!(rejection.fields.is_empty());
        assert_eq!(
            rejection.invalid_credentials.as_deref(),
            Some("Invalid email or password")
        );
    }

    #[tokio::test]
    async fn test_field_errors_survive_non_2xx_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "errors": [{
                    "message": "Bad input",
                    "extensions": { "email": "taken" }
                }]
            })))
            .mount(&server)
            .await;

        let err = service_for(&server).await.login(&creds()).await.unwrap_err();

        let ServiceError::Rejected(rejection) = err else {
            panic!("expected rejection, got {err:?}");
        };
        assert_eq!(rejection.fields.get("email"), Some("taken"));
    }

    #[tokio::test]
    async fn test_error_without_field_extensions_is_transport() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "errors": [{
                    "message": "Internal server error",
                    "extensions": { "code": "INTERNAL_SERVER_ERROR" }
                }]
            })))
            .mount(&server)
            .await;

        let err = service_for(&server).await.login(&creds()).await.unwrap_err();

        assert_eq!(
            err,
            ServiceError::Transport("Internal server error".to_string())
        );
    }

    #[tokio::test]
    async fn test_non_json_failure_is_transport() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
            .mount(&server)
            .await;

        let err = service_for(&server).await.logout().await.unwrap_err();

        assert!(matches!(err, ServiceError::Transport(msg) if msg.contains("502")));
    }

    #[tokio::test]
    async fn test_missing_user_is_transport() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "data": { "login": { "user": null } } })),
            )
            .mount(&server)
            .await;

        let err = service_for(&server).await.login(&creds()).await.unwrap_err();

        assert!(matches!(err, ServiceError::Transport(_)));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_transport() {
        let endpoint = Url::parse("http://127.0.0.1:9/graphql").unwrap();
        let service = GraphQlIdentityService::new(endpoint, Some(Duration::from_secs(2))).unwrap();

        let err = service.logout().await.unwrap_err();

        assert!(matches!(err, ServiceError::Transport(_)));
    }

    #[tokio::test]
    async fn test_logout_sends_session_cookie_from_login() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({ "variables": { "email": "a@b.com" } })))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("set-cookie", "sid=abc123; Path=/")
                    .set_body_json(json!({
                        "data": { "login": { "user": {
                            "id": "1", "email": "a@b.com", "fullname": "A"
                        } } }
                    })),
            )
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(header("cookie", "sid=abc123"))
            .and(body_partial_json(json!({ "query": LOGOUT_MUTATION })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "data": { "logout": true } })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let service = service_for(&server).await;
        service.login(&creds()).await.unwrap();
        assert_eq!(service.session_cookie().as_deref(), Some("sid=abc123"));
        service.logout().await.unwrap();
    }

    #[tokio::test]
    async fn test_restored_cookie_is_sent_by_fresh_client() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(header("cookie", "sid=abc123"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "data": { "logout": true } })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let service = service_for(&server).await;
        assert_eq!(service.session_cookie(), None);
        service.restore_session_cookie("sid=abc123");
        service.logout().await.unwrap();
    }
}
