//! Auth controller.
//!
//! Orchestrates register/login/logout against an `IdentityService` and turns
//! the results into Session Store and UI Visibility Store updates.
//!
//! ## Overlay State Machine
//!
//! ```text
//! Closed ──open──▶ Open(Register|Login) ──submit──▶ Submitting
//!                        ▲                              │
//!                        └──── rejected / transport ◀───┤
//!                                                       └── success ──▶ Closed
//! ```
//!
//! ## Split API
//!
//! Each operation comes in two halves so an event-loop reducer can own the
//! controller while the remote call runs elsewhere:
//! - `begin_*` validates, issues a `RequestToken` and returns the request
//! - `complete_*` applies the remote result only if the token is still active
//!
//! `register`, `login` and `logout` chain both halves around the remote call.

use enum_map::EnumMap;
use tracing::{debug, info, warn};

use super::service::{IdentityService, RemoteUser, ServiceError};
use super::session::{Session, SessionStore};
use super::task::{InFlight, RequestSeq, RequestToken};
use super::ui::{UiFlag, UiStore};
use super::validate::{AuthForm, Credentials, FieldErrors, FormKind, RegistrationRequest, validate};

/// Form-level message shown when the identity service cannot be reached.
pub const TRANSPORT_FAILURE_NOTICE: &str = "Unable to reach the server. Please try again.";

/// Why a register/login attempt did not produce a session.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthFailure {
    /// Local validation or the identity service rejected one or more fields.
    #[error("validation failed")]
    ValidationFailed(FieldErrors),
    /// The identity service could not be reached or answered garbage.
    #[error("transport failed: {0}")]
    TransportFailed(String),
    /// A newer submission (or closing the overlay) made this response stale.
    #[error("response superseded by a newer request")]
    Superseded,
}

/// A validated request ready to be sent, tagged with its token.
#[derive(Debug, Clone)]
pub struct Submission<R> {
    pub token: RequestToken,
    pub request: R,
}

#[derive(Debug, Default, Clone)]
struct FormState {
    errors: FieldErrors,
    notice: Option<String>,
    in_flight: InFlight,
}

#[derive(Debug)]
pub struct AuthController {
    session: SessionStore,
    ui: UiStore,
    active_form: FormKind,
    forms: EnumMap<FormKind, FormState>,
    seq: RequestSeq,
}

impl Default for AuthController {
    fn default() -> Self {
        Self::new(SessionStore::new(), UiStore::new())
    }
}

impl AuthController {
    /// Creates a controller that owns the given stores.
    pub fn new(session: SessionStore, ui: UiStore) -> Self {
        Self {
            session,
            ui,
            active_form: FormKind::Register,
            forms: EnumMap::default(),
            seq: RequestSeq::default(),
        }
    }

    // ========================================================================
    // Readers
    // ========================================================================

    pub fn session(&self) -> &Session {
        self.session.read()
    }

    pub fn ui(&self) -> &UiStore {
        &self.ui
    }

    /// Mutable access for user-driven flag toggles.
    pub fn ui_mut(&mut self) -> &mut UiStore {
        &mut self.ui
    }

    pub fn is_overlay_open(&self) -> bool {
        self.ui.is_open(UiFlag::AuthOverlay)
    }

    pub fn active_form(&self) -> FormKind {
        self.active_form
    }

    pub fn errors(&self, kind: FormKind) -> &FieldErrors {
        &self.forms[kind].errors
    }

    pub fn notice(&self, kind: FormKind) -> Option<&str> {
        self.forms[kind].notice.as_deref()
    }

    pub fn is_submitting(&self, kind: FormKind) -> bool {
        self.forms[kind].in_flight.is_running()
    }

    // ========================================================================
    // Overlay transitions
    // ========================================================================

    pub fn open_overlay(&mut self, kind: FormKind) {
        self.active_form = kind;
        self.ui.set(UiFlag::AuthOverlay, true);
    }

    /// Closes the overlay. Responses still in flight will be discarded.
    pub fn close_overlay(&mut self) {
        self.ui.set(UiFlag::AuthOverlay, false);
        self.abandon_in_flight();
    }

    pub fn toggle_overlay(&mut self) {
        if self.is_overlay_open() {
            self.close_overlay();
        } else {
            self.open_overlay(self.active_form);
        }
    }

    /// Switches Register ↔ Login. Session and stored errors are untouched.
    pub fn switch_form(&mut self) -> FormKind {
        self.active_form = self.active_form.other();
        self.active_form
    }

    // ========================================================================
    // Register / Login
    // ========================================================================

    /// Validates and starts a registration.
    ///
    /// # Errors
    /// Returns `AuthFailure::ValidationFailed` when local validation fails.
    pub fn begin_register(
        &mut self,
        request: RegistrationRequest,
    ) -> Result<Submission<RegistrationRequest>, AuthFailure> {
        let token = self.begin(AuthForm::Register(&request))?;
        info!(token = token.0, "registration submitted");
        Ok(Submission { token, request })
    }

    /// Validates and starts a login.
    ///
    /// # Errors
    /// Returns `AuthFailure::ValidationFailed` when local validation fails.
    pub fn begin_login(
        &mut self,
        credentials: Credentials,
    ) -> Result<Submission<Credentials>, AuthFailure> {
        let token = self.begin(AuthForm::Login(&credentials))?;
        info!(token = token.0, "login submitted");
        Ok(Submission {
            token,
            request: credentials,
        })
    }

    /// Applies a registration response.
    ///
    /// # Errors
    /// Returns the failure kind when the response is stale or unsuccessful.
    pub fn complete_register(
        &mut self,
        token: RequestToken,
        result: Result<RemoteUser, ServiceError>,
    ) -> Result<Session, AuthFailure> {
        self.complete(FormKind::Register, token, result)
    }

    /// Applies a login response.
    ///
    /// # Errors
    /// Returns the failure kind when the response is stale or unsuccessful.
    pub fn complete_login(
        &mut self,
        token: RequestToken,
        result: Result<RemoteUser, ServiceError>,
    ) -> Result<Session, AuthFailure> {
        self.complete(FormKind::Login, token, result)
    }

    /// Registers a new account and signs it in.
    ///
    /// # Errors
    /// Returns `AuthFailure` when validation, the service or the transport fails.
    pub async fn register<S: IdentityService>(
        &mut self,
        service: &S,
        request: RegistrationRequest,
    ) -> Result<Session, AuthFailure> {
        let submission = self.begin_register(request)?;
        let result = service.register(&submission.request).await;
        self.complete_register(submission.token, result)
    }

    /// Signs in with existing credentials.
    ///
    /// # Errors
    /// Returns `AuthFailure` when validation, the service or the transport fails.
    pub async fn login<S: IdentityService>(
        &mut self,
        service: &S,
        credentials: Credentials,
    ) -> Result<Session, AuthFailure> {
        let submission = self.begin_login(credentials)?;
        let result = service.login(&submission.request).await;
        self.complete_login(submission.token, result)
    }

    // ========================================================================
    // Logout
    // ========================================================================

    /// Starts a logout. Pending register/login responses become stale.
    pub fn begin_logout(&mut self) {
        self.abandon_in_flight();
        info!("logout submitted");
    }

    /// Finishes a logout. The session is cleared whatever the remote outcome.
    pub fn complete_logout(&mut self, result: Result<(), ServiceError>) {
        if let Err(err) = result {
            warn!(error = %err, "remote logout failed; clearing local session anyway");
        }
        self.session.clear();
        self.ui.set(UiFlag::ProfileSettings, false);
        self.open_overlay(FormKind::Login);
    }

    /// Logs out remotely and clears the local session.
    pub async fn logout<S: IdentityService>(&mut self, service: &S) {
        self.begin_logout();
        let result = service.logout().await;
        self.complete_logout(result);
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn begin(&mut self, form: AuthForm<'_>) -> Result<RequestToken, AuthFailure> {
        let kind = form.kind();
        let errors = validate(form);
        let state = &mut self.forms[kind];
        state.notice = None;
        if !errors.is_empty() {
            debug!(form = ?kind, fields = errors.len(), "local validation failed");
            state.errors = errors.clone();
            return Err(AuthFailure::ValidationFailed(errors));
        }
        state.errors = FieldErrors::new();
        let token = self.seq.next_token();
        self.forms[kind].in_flight.on_started(token);
        Ok(token)
    }

    fn complete(
        &mut self,
        kind: FormKind,
        token: RequestToken,
        result: Result<RemoteUser, ServiceError>,
    ) -> Result<Session, AuthFailure> {
        if !self.forms[kind].in_flight.finish_if_active(token) {
            debug!(form = ?kind, token = token.0, "discarding stale response");
            return Err(AuthFailure::Superseded);
        }

        match result {
            Ok(user) => {
                let mut session = user.into_session();
                if kind == FormKind::Register {
                    session.avatar_url = None;
                }
                info!(form = ?kind, user_id = ?session.user_id, "authenticated");
                self.session.set_session(session.clone());
                self.forms[kind].errors = FieldErrors::new();
                self.close_overlay();
                Ok(session)
            }
            Err(ServiceError::Rejected(rejection)) => {
                info!(form = ?kind, fields = rejection.fields.len(), "identity service rejected request");
                let state = &mut self.forms[kind];
                state.errors = rejection.fields.clone();
                if kind == FormKind::Login {
                    state.notice = rejection.invalid_credentials;
                }
                self.open_overlay(kind);
                Err(AuthFailure::ValidationFailed(rejection.fields))
            }
            Err(ServiceError::Transport(reason)) => {
                warn!(form = ?kind, %reason, "identity service unreachable");
                let state = &mut self.forms[kind];
                state.errors = FieldErrors::new();
                state.notice = Some(TRANSPORT_FAILURE_NOTICE.to_string());
                self.open_overlay(kind);
                Err(AuthFailure::TransportFailed(reason))
            }
        }
    }

    fn abandon_in_flight(&mut self) {
        for state in self.forms.values_mut() {
            state.in_flight.clear();
        }
    }
}
