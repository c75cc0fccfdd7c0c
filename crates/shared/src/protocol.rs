use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{FieldId, FilterDimension, RecordId, SortDirection, SortField};

/// Discrete events delivered by the page to the front-end core, in arrival order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum UiEvent {
    SearchTextChanged(String),
    FilterChanged {
        dimension: FilterDimension,
        value: String,
    },
    ClearFilters,
    SortChanged {
        field: SortField,
        direction: SortDirection,
    },
    SortColumnClicked(SortField),
    PageChanged(usize),
    PageSizeChanged(usize),
    ShowRecord(RecordId),
    WizardNext,
    WizardPrev,
    WizardSubmit,
    FieldInput {
        field: FieldId,
        value: String,
    },
    FieldBlurred {
        field: FieldId,
        value: String,
    },
    AgreeTermsToggled(bool),
}

impl UiEvent {
    pub fn name(&self) -> &'static str {
        match self {
            UiEvent::SearchTextChanged(_) => "search_text_changed",
            UiEvent::FilterChanged { .. } => "filter_changed",
            UiEvent::ClearFilters => "clear_filters",
            UiEvent::SortChanged { .. } => "sort_changed",
            UiEvent::SortColumnClicked(_) => "sort_column_clicked",
            UiEvent::PageChanged(_) => "page_changed",
            UiEvent::PageSizeChanged(_) => "page_size_changed",
            UiEvent::ShowRecord(_) => "show_record",
            UiEvent::WizardNext => "wizard_next",
            UiEvent::WizardPrev => "wizard_prev",
            UiEvent::WizardSubmit => "wizard_submit",
            UiEvent::FieldInput { .. } => "field_input",
            UiEvent::FieldBlurred { .. } => "field_blurred",
            UiEvent::AgreeTermsToggled(_) => "agree_terms_toggled",
        }
    }
}

/// Completed field values handed to the submission collaborator, keyed by markup field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionPayload {
    pub fields: BTreeMap<String, String>,
    pub agree_terms: bool,
}

impl SubmissionPayload {
    pub fn get(&self, field: FieldId) -> Option<&str> {
        self.fields.get(field.as_str()).map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionReceipt {
    pub reference: String,
    pub accepted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    pub remember_me: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrationRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub institution: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    pub email: String,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationLevel {
    Success,
    Error,
}

/// Transient message shown to the user outside of any field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
        }
    }
}
