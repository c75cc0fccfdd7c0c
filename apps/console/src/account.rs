//! Drives the login and registration forms from the command line.

use client_core::{AccountForms, AccountSnapshot, Authenticator};
use serde::Serialize;
use shared::{domain::FieldId, error::ApiError, protocol::Notification};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountRequest {
    Login {
        email: String,
        password: String,
        remember_me: bool,
    },
    Register {
        name: String,
        email: String,
        password: String,
        confirm_password: String,
        institution: Option<String>,
        agree_terms: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountReport {
    pub account: AccountSnapshot,
    pub notifications: Vec<Notification>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,
}

pub async fn run_account<A: Authenticator>(
    authenticator: A,
    request: &AccountRequest,
) -> AccountReport {
    let mut forms = AccountForms::new(authenticator);
    let outcome = match request {
        AccountRequest::Login {
            email,
            password,
            remember_me,
        } => {
            forms.input(FieldId::Email, email.as_str());
            forms.input(FieldId::Password, password.as_str());
            forms.set_remember_me(*remember_me);
            forms.login().await
        }
        AccountRequest::Register {
            name,
            email,
            password,
            confirm_password,
            institution,
            agree_terms,
        } => {
            forms.toggle_mode();
            forms.input(FieldId::RegName, name.as_str());
            forms.input(FieldId::RegEmail, email.as_str());
            forms.input(FieldId::RegPassword, password.as_str());
            forms.input(FieldId::ConfirmPassword, confirm_password.as_str());
            if let Some(institution) = institution {
                forms.input(FieldId::Institution, institution.as_str());
            }
            forms.set_agree_terms(*agree_terms);
            forms.register().await
        }
    };

    let (notifications, error) = match outcome {
        Ok(notification) => (vec![notification], None),
        Err(err) => (err.notification().into_iter().collect(), Some(ApiError::from(err))),
    };
    AccountReport {
        account: forms.snapshot(),
        notifications,
        error,
    }
}
