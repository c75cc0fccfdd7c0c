//! Four-step dataset submission form.
//!
//! The wizard only moves forward when every field of the current step validates,
//! builds a [`ConfirmationSummary`] on reaching the last step, and hands the collected
//! values to the caller through an explicit `begin_submit` / `complete_submit` pair so
//! only one submission is ever in flight.

use std::collections::BTreeMap;

use serde::Serialize;
use shared::{
    domain::FieldId,
    error::{ApiError, ErrorCode, SubmissionFailure},
    protocol::{Notification, SubmissionPayload, SubmissionReceipt},
};
use thiserror::Error;
use tracing::{debug, info, warn};

pub mod rules;
pub mod summary;
pub mod validators;

pub use rules::{validate_field, validate_fields, FieldValues, ValidationError};
pub use summary::ConfirmationSummary;

pub const TOTAL_STEPS: u8 = 4;
pub const INCOMPLETE_STEP_MESSAGE: &str = "请填写所有必填字段";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    #[default]
    BasicInfo,
    DataInfo,
    Reproduction,
    Confirmation,
}

impl Step {
    pub const ALL: [Step; TOTAL_STEPS as usize] = [
        Step::BasicInfo,
        Step::DataInfo,
        Step::Reproduction,
        Step::Confirmation,
    ];

    pub fn number(self) -> u8 {
        match self {
            Step::BasicInfo => 1,
            Step::DataInfo => 2,
            Step::Reproduction => 3,
            Step::Confirmation => 4,
        }
    }

    pub fn from_number(number: u8) -> Option<Self> {
        Step::ALL.into_iter().find(|step| step.number() == number)
    }

    pub fn title(self) -> &'static str {
        match self {
            Step::BasicInfo => "基本信息",
            Step::DataInfo => "数据信息",
            Step::Reproduction => "复现信息",
            Step::Confirmation => "确认提交",
        }
    }

    pub fn fields(self) -> &'static [FieldId] {
        match self {
            Step::BasicInfo => &[
                FieldId::DatasetTitle,
                FieldId::AuthorName,
                FieldId::AuthorEmail,
                FieldId::PublicationYear,
                FieldId::Doi,
                FieldId::Journal,
            ],
            Step::DataInfo => &[
                FieldId::Species,
                FieldId::Platform,
                FieldId::SampleCount,
                FieldId::CellCount,
                FieldId::DataLink,
            ],
            Step::Reproduction => &[
                FieldId::ReproStatus,
                FieldId::CodeLink,
                FieldId::EnvRequirements,
                FieldId::ReproTime,
            ],
            Step::Confirmation => &[],
        }
    }

    /// The step a submission field is entered on. Account fields belong to no step.
    pub fn owning(field: FieldId) -> Option<Self> {
        Step::ALL
            .into_iter()
            .find(|step| step.fields().contains(&field))
    }

    pub fn next(self) -> Option<Self> {
        Step::from_number(self.number() + 1)
    }

    pub fn prev(self) -> Option<Self> {
        Step::from_number(self.number().checked_sub(1)?)
    }

    pub fn is_final(self) -> bool {
        self == Step::Confirmation
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionPhase {
    #[default]
    Editing,
    Submitting,
    Submitted,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum WizardError {
    #[error("{}", INCOMPLETE_STEP_MESSAGE)]
    StepInvalid {
        step: Step,
        errors: Vec<ValidationError>,
    },
    #[error("{}", rules::TERMS_MESSAGE)]
    TermsNotAccepted,
    #[error("submission is only possible from the confirmation step (on step {0})")]
    NotOnFinalStep(u8),
    #[error("a submission is already in flight")]
    SubmissionInFlight,
    #[error("the dataset has already been submitted")]
    AlreadySubmitted,
    #[error("no submission is in flight")]
    NoSubmissionInFlight,
    #[error("{0} is not part of the submission form")]
    UnknownField(FieldId),
    #[error(transparent)]
    Field(#[from] ValidationError),
    #[error(transparent)]
    Submission(#[from] SubmissionFailure),
}

impl From<WizardError> for ApiError {
    fn from(value: WizardError) -> Self {
        let code = match value {
            WizardError::Submission(_) => ErrorCode::SubmissionFailed,
            _ => ErrorCode::Validation,
        };
        ApiError::new(code, value.to_string())
    }
}

impl WizardError {
    /// Transient message for the page; field-level detail is in the wizard's error map.
    pub fn notification(&self) -> Notification {
        Notification::error(self.to_string())
    }
}

/// Everything a presenter needs to draw the form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WizardSnapshot {
    pub step: Step,
    pub step_number: u8,
    pub total_steps: u8,
    pub step_title: &'static str,
    pub values: BTreeMap<FieldId, String>,
    pub errors: BTreeMap<FieldId, String>,
    pub agree_terms: bool,
    pub phase: SubmissionPhase,
    pub can_go_back: bool,
    pub can_go_forward: bool,
    pub can_submit: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<ConfirmationSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receipt: Option<SubmissionReceipt>,
}

#[derive(Debug, Clone, Default)]
pub struct WizardForm {
    step: Step,
    values: FieldValues,
    errors: BTreeMap<FieldId, String>,
    agree_terms: bool,
    phase: SubmissionPhase,
    summary: Option<ConfirmationSummary>,
    receipt: Option<SubmissionReceipt>,
}

impl WizardForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn phase(&self) -> SubmissionPhase {
        self.phase
    }

    pub fn values(&self) -> &FieldValues {
        &self.values
    }

    pub fn value(&self, field: FieldId) -> Option<&str> {
        self.values.get(&field).map(String::as_str)
    }

    pub fn errors(&self) -> &BTreeMap<FieldId, String> {
        &self.errors
    }

    pub fn error(&self, field: FieldId) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    pub fn summary(&self) -> Option<&ConfirmationSummary> {
        self.summary.as_ref()
    }

    pub fn receipt(&self) -> Option<&SubmissionReceipt> {
        self.receipt.as_ref()
    }

    pub fn agree_terms(&self) -> bool {
        self.agree_terms
    }

    /// Whether `field` may change now: only submission fields, and only while editing.
    pub fn ensure_editable(&self, field: FieldId) -> Result<(), WizardError> {
        match self.phase {
            SubmissionPhase::Submitting => return Err(WizardError::SubmissionInFlight),
            SubmissionPhase::Submitted => return Err(WizardError::AlreadySubmitted),
            SubmissionPhase::Editing => {}
        }
        match Step::owning(field) {
            Some(_) => Ok(()),
            None => Err(WizardError::UnknownField(field)),
        }
    }

    /// Typing into a field stores the value and hides its error until the next check.
    /// Returns false when the edit was refused, see [`Self::ensure_editable`].
    pub fn input(&mut self, field: FieldId, value: impl Into<String>) -> bool {
        if let Err(err) = self.ensure_editable(field) {
            debug!(%field, error = %err, "wizard input ignored");
            return false;
        }
        self.store(field, value.into());
        self.errors.remove(&field);
        true
    }

    /// Leaving a field stores the value and runs that field's rule.
    pub fn blur(&mut self, field: FieldId, value: impl Into<String>) -> Result<(), WizardError> {
        self.ensure_editable(field)?;
        self.store(field, value.into());
        self.check(field)?;
        Ok(())
    }

    pub fn set_agree_terms(&mut self, agreed: bool) {
        if self.phase != SubmissionPhase::Editing {
            return;
        }
        self.agree_terms = agreed;
        self.values.insert(FieldId::AgreeTerms, agreed.to_string());
        if agreed {
            self.errors.remove(&FieldId::AgreeTerms);
        }
    }

    pub fn next(&mut self) -> Result<Step, WizardError> {
        match self.phase {
            SubmissionPhase::Submitting => return Err(WizardError::SubmissionInFlight),
            SubmissionPhase::Submitted => return Err(WizardError::AlreadySubmitted),
            SubmissionPhase::Editing => {}
        }
        self.validate_step(self.step)?;

        let Some(next) = self.step.next() else {
            return Ok(self.step);
        };
        self.step = next;
        debug!(step = next.number(), "wizard advanced");

        if next.is_final() {
            self.summary = Some(ConfirmationSummary::from_values(&self.values));
        }
        Ok(next)
    }

    /// Moves back one step without validation. Returns false on the first step
    /// and once a submission has started.
    pub fn prev(&mut self) -> bool {
        if self.phase != SubmissionPhase::Editing {
            return false;
        }
        let Some(prev) = self.step.prev() else {
            return false;
        };
        self.step = prev;
        debug!(step = prev.number(), "wizard went back");
        true
    }

    /// Validates the whole form and the terms flag, then marks a submission in flight.
    pub fn begin_submit(&mut self) -> Result<SubmissionPayload, WizardError> {
        match self.phase {
            SubmissionPhase::Submitting => return Err(WizardError::SubmissionInFlight),
            SubmissionPhase::Submitted => return Err(WizardError::AlreadySubmitted),
            SubmissionPhase::Editing => {}
        }
        if !self.step.is_final() {
            return Err(WizardError::NotOnFinalStep(self.step.number()));
        }
        for step in Step::ALL {
            self.validate_step(step)?;
        }
        if !self.agree_terms {
            self.errors
                .insert(FieldId::AgreeTerms, rules::TERMS_MESSAGE.to_string());
            return Err(WizardError::TermsNotAccepted);
        }

        self.phase = SubmissionPhase::Submitting;
        let payload = SubmissionPayload {
            fields: Step::ALL
                .iter()
                .flat_map(|step| step.fields())
                .filter_map(|field| {
                    let value = self.values.get(field)?;
                    Some((field.as_str().to_string(), value.trim().to_string()))
                })
                .collect(),
            agree_terms: self.agree_terms,
        };
        info!(fields = payload.fields.len(), "dataset submission started");
        Ok(payload)
    }

    /// Records the collaborator's answer. A failure returns the form to editing on the same step.
    pub fn complete_submit(
        &mut self,
        outcome: Result<SubmissionReceipt, SubmissionFailure>,
    ) -> Result<&SubmissionReceipt, WizardError> {
        if self.phase != SubmissionPhase::Submitting {
            return Err(WizardError::NoSubmissionInFlight);
        }
        match outcome {
            Ok(receipt) => {
                info!(reference = %receipt.reference, "dataset submission accepted");
                self.phase = SubmissionPhase::Submitted;
                Ok(&*self.receipt.insert(receipt))
            }
            Err(failure) => {
                warn!(detail = %failure.detail, "dataset submission rejected");
                self.phase = SubmissionPhase::Editing;
                Err(WizardError::Submission(failure))
            }
        }
    }

    pub fn snapshot(&self) -> WizardSnapshot {
        let editing = self.phase == SubmissionPhase::Editing;
        WizardSnapshot {
            step: self.step,
            step_number: self.step.number(),
            total_steps: TOTAL_STEPS,
            step_title: self.step.title(),
            values: self.values.clone(),
            errors: self.errors.clone(),
            agree_terms: self.agree_terms,
            phase: self.phase,
            can_go_back: editing && self.step.prev().is_some(),
            can_go_forward: editing && !self.step.is_final(),
            can_submit: editing && self.step.is_final(),
            summary: self.summary.clone(),
            receipt: self.receipt.clone(),
        }
    }

    /// Keeps the confirmation summary in step with values changed on the final step.
    fn store(&mut self, field: FieldId, value: String) {
        self.values.insert(field, value);
        if self.step.is_final() {
            self.summary = Some(ConfirmationSummary::from_values(&self.values));
        }
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

    fn validate_step(&mut self, step: Step) -> Result<(), WizardError> {
        let errors = validate_fields(step.fields(), &self.values);
        for field in step.fields() {
            self.errors.remove(field);
        }
        for err in &errors {
            self.errors.insert(err.field, err.message.clone());
        }
        if errors.is_empty() {
            return Ok(());
        }
        debug!(step = step.number(), invalid = errors.len(), "wizard step failed validation");
        Err(WizardError::StepInvalid { step, errors })
    }
}
