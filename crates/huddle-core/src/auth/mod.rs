//! Client-side authentication kernel.
//!
//! ## Module Structure
//!
//! - `validate.rs`: pure field validation and form value types
//! - `session.rs`: Session Store (single writer: the controller)
//! - `ui.rs`: UI Visibility Store (independent flags)
//! - `task.rs`: in-flight request tokens
//! - `service.rs`: identity service contract
//! - `graphql.rs`: GraphQL-over-HTTP identity service client
//! - `cookies.rs`: session cookies persisted between CLI runs
//! - `controller.rs`: the auth state machine

pub mod controller;
pub mod cookies;
pub mod graphql;
pub mod service;
pub mod session;
pub mod task;
pub mod ui;
pub mod validate;

pub use controller::{AuthController, AuthFailure, Submission, TRANSPORT_FAILURE_NOTICE};
pub use cookies::CookieCache;
pub use graphql::GraphQlIdentityService;
pub use service::{IdentityService, Rejection, RemoteUser, ServiceError};
pub use session::{Session, SessionStore};
pub use task::RequestToken;
pub use ui::{UiFlag, UiStore};
pub use validate::{
    AuthForm, Credentials, Field, FieldErrors, FormKind, RegistrationRequest, validate,
};
