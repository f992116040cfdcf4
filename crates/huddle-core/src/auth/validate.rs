//! Field-level validation for the auth forms.
//!
//! Validation is pure: the same input always yields the same `FieldErrors`.
//! The controller runs it before any request leaves the client, and the
//! presentation layer runs it to render inline errors.

use std::collections::BTreeMap;
use std::fmt;

use enum_map::Enum;
use serde::{Deserialize, Serialize};

pub const INVALID_EMAIL: &str = "Invalid email";
pub const PASSWORD_TOO_SHORT: &str = "Password must be at least 3 characters";
pub const FULLNAME_TOO_SHORT: &str = "Username must be at least 3 characters";
pub const PASSWORDS_DO_NOT_MATCH: &str = "Passwords do not match";

/// Minimum trimmed length for names and passwords.
const MIN_LEN: usize = 3;

/// The two forms hosted by the auth overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Enum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormKind {
    Register,
    Login,
}

impl FormKind {
    /// Returns the other form (Register ↔ Login).
    pub fn other(self) -> Self {
        match self {
            FormKind::Register => FormKind::Login,
            FormKind::Login => FormKind::Register,
        }
    }

    /// Fields shown by this form, in display order.
    pub fn fields(self) -> &'static [Field] {
        match self {
            FormKind::Register => &[
                Field::Fullname,
                Field::Email,
                Field::Password,
                Field::ConfirmPassword,
            ],
            FormKind::Login => &[Field::Email, Field::Password],
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            FormKind::Register => "Register",
            FormKind::Login => "Login",
        }
    }
}

/// A named form field. `as_str` returns the wire name used by the identity service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Enum)]
pub enum Field {
    Fullname,
    Email,
    Password,
    ConfirmPassword,
}

impl Field {
    pub fn as_str(self) -> &'static str {
        match self {
            Field::Fullname => "fullname",
            Field::Email => "email",
            Field::Password => "password",
            Field::ConfirmPassword => "confirmPassword",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Field::Fullname => "Fullname",
            Field::Email => "Email",
            Field::Password => "Password",
            Field::ConfirmPassword => "Confirm Password",
        }
    }

    /// Returns true for fields whose value must be masked when displayed.
    pub fn is_secret(self) -> bool {
        matches!(self, Field::Password | Field::ConfirmPassword)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-field error messages, keyed by wire field name.
///
/// Produced either by local validation or by the identity service. A new
/// submission replaces the whole map; maps are never merged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.insert(field.into(), message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn for_field(&self, field: Field) -> Option<&str> {
        self.get(field.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FieldErrors {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Login form values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

/// Registration form values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationRequest {
    pub fullname: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

/// Borrowed view of a submitted form, tagged by kind.
#[derive(Debug, Clone, Copy)]
pub enum AuthForm<'a> {
    Login(&'a Credentials),
    Register(&'a RegistrationRequest),
}

impl AuthForm<'_> {
    pub fn kind(&self) -> FormKind {
        match self {
            AuthForm::Login(_) => FormKind::Login,
            AuthForm::Register(_) => FormKind::Register,
        }
    }
}

/// Validates a form and returns the errors for every failing field.
///
/// An empty map means the form may be submitted.
pub fn validate(form: AuthForm<'_>) -> FieldErrors {
    let mut errors = FieldErrors::new();
    match form {
        AuthForm::Login(creds) => {
            check_email(&mut errors, &creds.email);
            check_password(&mut errors, &creds.password);
        }
        AuthForm::Register(req) => {
            if !long_enough(&req.fullname) {
                errors.insert(Field::Fullname.as_str(), FULLNAME_TOO_SHORT);
            }
            check_email(&mut errors, &req.email);
            check_password(&mut errors, &req.password);
            if !long_enough(&req.confirm_password) || req.confirm_password != req.password {
                errors.insert(Field::ConfirmPassword.as_str(), PASSWORDS_DO_NOT_MATCH);
            }
        }
    }
    errors
}

fn check_email(errors: &mut FieldErrors, email: &str) {
    if !email.contains('@') {
        errors.insert(Field::Email.as_str(), INVALID_EMAIL);
    }
}

fn check_password(errors: &mut FieldErrors, password: &str) {
    if !long_enough(password) {
        errors.insert(Field::Password.as_str(), PASSWORD_TOO_SHORT);
    }
}

fn long_enough(value: &str) -> bool {
    value.trim().chars().count() >= MIN_LEN
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registration(fullname: &str, email: &str, pw: &str, confirm: &str) -> RegistrationRequest {
        RegistrationRequest {
            fullname: fullname.to_string(),
            email: email.to_string(),
            password: pw.to_string(),
            confirm_password: confirm.to_string(),
        }
    }

    #[test]
    fn test_valid_login_has_no_errors() {
        let creds = Credentials::new("a@b.com", "secret");
        assert!(validate(AuthForm::Login(&creds)).is_empty());
    }

    #[test]
    fn test_email_without_at_sign_is_rejected() {
        for email in ["", "plainaddress", "a.b.com", "   "] {
            let creds = Credentials::new(email, "secret");
            let errors = validate(AuthForm::Login(&creds));
            assert_eq!(errors.for_field(Field::Email), Some(INVALID_EMAIL), "{email:?}");
        }
    }

    #[test]
    fn test_password_is_trimmed_before_length_check() {
        let creds = Credentials::new("a@b.com", "  ab  ");
        let errors = validate(AuthForm::Login(&creds));
        assert_eq!(errors.for_field(Field::Password), Some(PASSWORD_TOO_SHORT));
        assert_eq!(errors.len(), 1);

        let creds = Credentials::new("a@b.com", " abc ");
        assert!(validate(AuthForm::Login(&creds)).is_empty());
    }

    #[test]
    fn test_login_ignores_registration_only_fields() {
        let creds = Credentials::new("nope", "x");
        let errors = validate(AuthForm::Login(&creds));
        assert!(errors.for_field(Field::Fullname).is_none());
        assert!(errors.for_field(Field::ConfirmPassword).is_none());
    }

    #[test]
    fn test_registration_short_fullname() {
        let req = registration(" al ", "a@b.com", "secret", "secret");
        let errors = validate(AuthForm::Register(&req));
        assert_eq!(errors.for_field(Field::Fullname), Some(FULLNAME_TOO_SHORT));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_registration_mismatched_confirmation() {
        let req = registration("Alice", "a@b.com", "secret", "secreT");
        let errors = validate(AuthForm::Register(&req));
        assert_eq!(
            errors.for_field(Field::ConfirmPassword),
            Some(PASSWORDS_DO_NOT_MATCH)
        );
    }

    #[test]
    fn test_registration_short_confirmation_reports_mismatch() {
        let req = registration("Alice", "a@b.com", "ab", "ab");
        let errors = validate(AuthForm::Register(&req));
        assert_eq!(errors.for_field(Field::Password), Some(PASSWORD_TOO_SHORT));
        assert_eq!(
            errors.for_field(Field::ConfirmPassword),
            Some(PASSWORDS_DO_NOT_MATCH)
        );
    }

    #[test]
    fn test_confirmation_compares_untrimmed_values() {
        let req = registration("Alice", "a@b.com", "secret", "secret ");
        let errors = validate(AuthForm::Register(&req));
        assert_eq!(
            errors.for_field(Field::ConfirmPassword),
            Some(PASSWORDS_DO_NOT_MATCH)
        );
    }

    #[test]
    fn test_all_registration_errors_reported_together() {
        let req = registration("", "", "", "x");
        let errors = validate(AuthForm::Register(&req));
        assert_eq!(errors.len(), 4);
    }

    #[test]
    fn test_validate_is_idempotent() {
        let req = registration("Al", "bad", "pw", "other");
        let first = validate(AuthForm::Register(&req));
        let second = validate(AuthForm::Register(&req));
        assert_eq!(first, second);
    }

    #[test]
    fn test_form_kind_other_and_fields() {
        assert_eq!(FormKind::Register.other(), FormKind::Login);
        assert_eq!(FormKind::Login.other(), FormKind::Register);
        assert_eq!(FormKind::Login.fields(), &[Field::Email, Field::Password]);
        assert_eq!(FormKind::Register.fields().len(), 4);
    }
}
