//! Register, login and logout command handlers.
//!
//! These drive the same `AuthController` as the TUI, so validation, error
//! mapping and session handling are identical. Each invocation is a separate
//! process, so the session cookie is kept in `CookieCache` between a
//! successful `register`/`login` and the next `logout`.

use anyhow::{Result, bail};
use huddle_core::auth::{
    AuthController, AuthFailure, CookieCache, Credentials, FieldErrors, FormKind,
    GraphQlIdentityService, RegistrationRequest, Session, TRANSPORT_FAILURE_NOTICE,
};
use huddle_core::config::Config;
use tracing::{debug, warn};

pub struct RegisterArgs {
    pub fullname: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

pub async fn register(config: &Config, args: RegisterArgs) -> Result<()> {
    let service = GraphQlIdentityService::from_config(config)?;
    debug!(endpoint = %service.endpoint(), "registering");

    let mut auth = AuthController::default();
    let request = RegistrationRequest {
        fullname: args.fullname,
        email: args.email,
        password: args.password,
        confirm_password: args.confirm_password,
    };
    let result = auth.register(&service, request).await;
    if result.is_ok() {
        remember_cookie(&service)?;
    }
    finish(&auth, FormKind::Register, result)
}

pub async fn login(config: &Config, email: String, password: String) -> Result<()> {
    let service = GraphQlIdentityService::from_config(config)?;
    debug!(endpoint = %service.endpoint(), "logging in");

    let mut auth = AuthController::default();
    let result = auth
        .login(&service, Credentials::new(email, password))
        .await;
    if result.is_ok() {
        remember_cookie(&service)?;
    }
    finish(&auth, FormKind::Login, result)
}

/// Logs out remotely with the stored session cookie, then forgets it.
/// A failed remote call is reported as a warning only.
pub async fn logout(config: &Config) -> Result<()> {
    let service = GraphQlIdentityService::from_config(config)?;
    let endpoint = service.endpoint().to_string();

    let mut cache = CookieCache::load().unwrap_or_else(|err| {
        warn!("Ignoring unreadable cookie cache: {err:#}");
        CookieCache::default()
    });
    match cache.get(&endpoint) {
        Some(cookie) => service.restore_session_cookie(cookie),
        None => debug!(%endpoint, "no stored session cookie"),
    }

    let mut auth = AuthController::default();
    auth.logout(&service).await;

    if cache.remove(&endpoint).is_some() {
        cache.save()?;
    }
    println!("Logged out");
    Ok(())
}

fn remember_cookie(service: &GraphQlIdentityService) -> Result<()> {
    let Some(cookie) = service.session_cookie() else {
        debug!("identity service set no session cookie");
        return Ok(());
    };
    let mut cache = CookieCache::load()?;
    cache.set(service.endpoint().as_str(), cookie);
    cache.save()
}

fn finish(
    auth: &AuthController,
    kind: FormKind,
    result: Result<Session, AuthFailure>,
) -> Result<()> {
    match result {
        Ok(session) => {
            println!("{}", serde_json::to_string_pretty(&session)?);
            Ok(())
        }
        Err(AuthFailure::ValidationFailed(errors)) => {
            report_field_errors(&errors);
            if let Some(notice) = auth.notice(kind) {
                eprintln!("{notice}");
            }
            bail!("{} failed", kind.title())
        }
        Err(AuthFailure::TransportFailed(reason)) => {
            bail!("{TRANSPORT_FAILURE_NOTICE} ({reason})")
        }
        Err(AuthFailure::Superseded) => bail!("{} was superseded", kind.title()),
    }
}

fn report_field_errors(errors: &FieldErrors) {
    for (field, message) in errors.iter() {
        eprintln!("{field}: {message}");
    }
}
