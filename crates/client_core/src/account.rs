//! Login and registration form state.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::Serialize;
use shared::{
    domain::FieldId,
    protocol::{AuthenticatedUser, LoginRequest, Notification, RegistrationRequest},
};
use thiserror::Error;
use tracing::{info, warn};
use wizard::{
    rules::{validate_field, validate_fields, FieldValues, ValidationError, TERMS_MESSAGE},
    validators::{password_strength, PasswordStrength},
};

pub const LOGIN_SUCCESS_MESSAGE: &str = "登录成功！";
pub const LOGIN_FAILURE_MESSAGE: &str = "登录失败，请检查邮箱和密码";
pub const REGISTER_SUCCESS_MESSAGE: &str = "注册成功！请登录";
pub const REGISTER_FAILURE_MESSAGE: &str = "注册失败，请重试";

const LOGIN_FIELDS: [FieldId; 2] = [FieldId::Email, FieldId::Password];
const REGISTRATION_FIELDS: [FieldId; 5] = [
    FieldId::RegName,
    FieldId::RegEmail,
    FieldId::RegPassword,
    FieldId::ConfirmPassword,
    FieldId::Institution,
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("an account already exists for {0}")]
    AlreadyRegistered(String),
    #[error("authentication backend unavailable")]
    Unavailable,
}

#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn login(&self, request: LoginRequest) -> Result<AuthenticatedUser, AuthError>;
    async fn register(&self, request: RegistrationRequest) -> Result<(), AuthError>;
}

pub struct MissingAuthenticator;

#[async_trait]
impl Authenticator for MissingAuthenticator {
    async fn login(&self, _request: LoginRequest) -> Result<AuthenticatedUser, AuthError> {
        Err(AuthError::Unavailable)
    }

    async fn register(&self, _request: RegistrationRequest) -> Result<(), AuthError> {
        Err(AuthError::Unavailable)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountMode {
    #[default]
    Login,
    Register,
}

impl AccountMode {
    pub fn toggled(self) -> Self {
        match self {
            AccountMode::Login => AccountMode::Register,
            AccountMode::Register => AccountMode::Login,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AccountError {
    #[error("{} field(s) failed validation", .0.len())]
    Invalid(Vec<ValidationError>),
    #[error("a request is already in flight")]
    InFlight,
    #[error("login rejected: {0}")]
    LoginRejected(#[source] AuthError),
    #[error("registration rejected: {0}")]
    RegistrationRejected(#[source] AuthError),
}

impl AccountError {
    /// Page-level message, if any. Validation failures are shown next to their fields instead.
    pub fn notification(&self) -> Option<Notification> {
        match self {
            AccountError::Invalid(_) | AccountError::InFlight => None,
            AccountError::LoginRejected(_) => Some(Notification::error(LOGIN_FAILURE_MESSAGE)),
            AccountError::RegistrationRejected(_) => {
                Some(Notification::error(REGISTER_FAILURE_MESSAGE))
            }
        }
    }
}

/// What the account page shows. Passwords never leave the form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountSnapshot {
    pub mode: AccountMode,
    pub errors: BTreeMap<FieldId, String>,
    pub remember_me: bool,
    pub agree_terms: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_strength: Option<PasswordStrength>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<AuthenticatedUser>,
}

pub struct AccountForms<A: Authenticator> {
    authenticator: A,
    mode: AccountMode,
    values: FieldValues,
    errors: BTreeMap<FieldId, String>,
    remember_me: bool,
    agree_terms: bool,
    in_flight: bool,
    user: Option<AuthenticatedUser>,
}

impl<A: Authenticator> AccountForms<A> {
    pub fn new(authenticator: A) -> Self {
        Self {
            authenticator,
            mode: AccountMode::default(),
            values: FieldValues::new(),
            errors: BTreeMap::new(),
            remember_me: false,
            agree_terms: false,
            in_flight: false,
            user: None,
        }
    }

    pub fn mode(&self) -> AccountMode {
        self.mode
    }

    pub fn user(&self) -> Option<&AuthenticatedUser> {
        self.user.as_ref()
    }

    pub fn errors(&self) -> &BTreeMap<FieldId, String> {
        &self.errors
    }

    pub fn error(&self, field: FieldId) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    pub fn toggle_mode(&mut self) -> AccountMode {
        self.mode = self.mode.toggled();
        self.errors.clear();
        self.mode
    }

    pub fn input(&mut self, field: FieldId, value: impl Into<String>) {
        self.values.insert(field, value.into());
        self.errors.remove(&field);
        if field == FieldId::RegPassword && self.values.contains_key(&FieldId::ConfirmPassword) {
            let _ = self.check(FieldId::ConfirmPassword);
        }
    }

    pub fn blur(&mut self, field: FieldId, value: impl Into<String>) -> Result<(), ValidationError> {
        self.values.insert(field, value.into());
        self.check(field)
    }

    pub fn set_remember_me(&mut self, remember: bool) {
        self.remember_me = remember;
    }

    pub fn set_agree_terms(&mut self, agreed: bool) {
        self.agree_terms = agreed;
        if agreed {
            self.errors.remove(&FieldId::AgreeTerms);
        }
    }

    /// Strength of the registration password, or `None` while it is empty.
    pub fn password_strength(&self) -> Option<PasswordStrength> {
        self.values
            .get(&FieldId::RegPassword)
            .filter(|password| !password.is_empty())
            .map(|password| password_strength(password))
    }

    pub fn snapshot(&self) -> AccountSnapshot {
        AccountSnapshot {
            mode: self.mode,
            errors: self.errors.clone(),
            remember_me: self.remember_me,
            agree_terms: self.agree_terms,
            password_strength: self.password_strength(),
            user: self.user.clone(),
        }
    }

    pub fn login_request(&mut self) -> Result<LoginRequest, AccountError> {
        self.validate(&LOGIN_FIELDS)?;
        Ok(LoginRequest {
            email: self.trimmed(FieldId::Email),
            password: self.raw(FieldId::Password),
            remember_me: self.remember_me,
        })
    }

    pub fn registration_request(&mut self) -> Result<RegistrationRequest, AccountError> {
        let mut errors = self.collect_errors(&REGISTRATION_FIELDS);
        if !self.agree_terms {
            self.errors
                .insert(FieldId::AgreeTerms, TERMS_MESSAGE.to_string());
            errors.push(ValidationError::new(FieldId::AgreeTerms, TERMS_MESSAGE));
        }
        if !errors.is_empty() {
            return Err(AccountError::Invalid(errors));
        }

        let institution = self.trimmed(FieldId::Institution);
        Ok(RegistrationRequest {
            name: self.trimmed(FieldId::RegName),
            email: self.trimmed(FieldId::RegEmail),
            password: self.raw(FieldId::RegPassword),
            institution: (!institution.is_empty()).then_some(institution),
        })
    }

    pub async fn login(&mut self) -> Result<Notification, AccountError> {
        if self.in_flight {
            return Err(AccountError::InFlight);
        }
        let request = self.login_request()?;
        let email = request.email.clone();

        self.in_flight = true;
        let outcome = self.authenticator.login(request).await;
        self.in_flight = false;

        match outcome {
            Ok(user) => {
                info!(email = %user.email, "login succeeded");
                self.user = Some(user);
                Ok(Notification::success(LOGIN_SUCCESS_MESSAGE))
            }
            Err(err) => {
                warn!(%email, error = %err, "login failed");
                Err(AccountError::LoginRejected(err))
            }
        }
    }

    /// Registers and, on success, switches the page back to the login form.
    pub async fn register(&mut self) -> Result<Notification, AccountError> {
        if self.in_flight {
            return Err(AccountError::InFlight);
        }
        let request = self.registration_request()?;
        let email = request.email.clone();

        self.in_flight = true;
        let outcome = self.authenticator.register(request).await;
        self.in_flight = false;

        match outcome {
            Ok(()) => {
                info!(%email, "registration succeeded");
                self.mode = AccountMode::Login;
                self.errors.clear();
                self.values.insert(FieldId::Email, email);
                Ok(Notification::success(REGISTER_SUCCESS_MESSAGE))
            }
            Err(err) => {
                warn!(%email, error = %err, "registration failed");
                Err(AccountError::RegistrationRejected(err))
            }
        }
    }

    fn raw(&self, field: FieldId) -> String {
        self.values.get(&field).cloned().unwrap_or_default()
    }

    fn trimmed(&self, field: FieldId) -> String {
        self.values
            .get(&field)
            .map(|value| value.trim().to_string())
            .unwrap_or_default()
    }

    fn check(&mut self, field: FieldId) -> Result<(), ValidationError> {
        match validate_field(field, &self.values) {
            Ok(()) => {
                self.errors.remove(&field);
                Ok(())
            }
            Err(err) => {
                self.errors.insert(field, err.message.clone());
                Err(err)
            }
        }
    }

    fn collect_errors(&mut self, fields: &[FieldId]) -> Vec<ValidationError> {
        let errors = validate_fields(fields, &self.values);
        for field in fields {
            self.errors.remove(field);
        }
        for err in &errors {
            self.errors.insert(err.field, err.message.clone());
        }
        errors
    }

    fn validate(&mut self, fields: &[FieldId]) -> Result<(), AccountError> {
        let errors = self.collect_errors(fields);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(AccountError::Invalid(errors))
        }
    }
}

#[cfg(test)]
#[path = "tests/account_tests.rs"]
mod tests;
