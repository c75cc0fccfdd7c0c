//! Front-end orchestration for the catalog pages.
//!
//! The engines in `catalog` and `wizard` are synchronous state machines. This crate owns
//! them together with their collaborators (record source, submitter, authenticator,
//! presenter) and turns [`UiEvent`]s into state changes and renders.

use std::time::Duration;

use catalog::{CatalogEngine, CatalogView, PageChange, SortSpec, ViewState};
use chrono::NaiveDate;
use record_store::{RecordSource, RELATED_LIMIT};
use serde::Serialize;
use shared::{
    domain::{DatasetRecord, RecordId},
    error::ApiError,
    protocol::{Notification, SubmissionPayload, SubmissionReceipt, UiEvent},
};
use tokio::time::Instant;
use tracing::{debug, info, warn};
use wizard::{WizardError, WizardForm, WizardSnapshot};

pub mod account;
pub mod submitter;

pub use account::{
    AccountError, AccountForms, AccountMode, AccountSnapshot, AuthError, Authenticator,
    MissingAuthenticator,
};
pub use submitter::{DelayedSubmitter, MissingSubmitter, Submitter, DEFAULT_SUBMIT_DELAY};

pub const SUBMISSION_SUCCESS_MESSAGE: &str = "提交成功！";

/// Receives everything the page shows. Implementations decide how to draw it.
pub trait Presenter: Send {
    fn render_catalog(&mut self, view: &CatalogView);
    fn render_wizard(&mut self, snapshot: &WizardSnapshot);
    fn render_detail(&mut self, detail: &RecordDetail);
    fn notify(&mut self, notification: Notification);
}

/// Detail page model: one record plus up to [`RELATED_LIMIT`] related entries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordDetail {
    pub record: DatasetRecord,
    pub doi_url: String,
    pub published_on: Option<NaiveDate>,
    pub has_code: bool,
    pub related: Vec<DatasetRecord>,
}

pub struct CatalogSession<R> {
    source: R,
    engine: CatalogEngine,
}

impl<R: RecordSource> CatalogSession<R> {
    pub fn new(source: R, state: ViewState) -> Self {
        let engine = CatalogEngine::with_state(source.records().to_vec(), state);
        Self { source, engine }
    }

    pub fn source(&self) -> &R {
        &self.source
    }

    pub fn engine(&self) -> &CatalogEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut CatalogEngine {
        &mut self.engine
    }

    pub fn view(&self) -> CatalogView {
        self.engine.view()
    }

    pub fn show_record(&self, id: RecordId) -> Result<RecordDetail, ApiError> {
        let record = self
            .source
            .find(id)
            .ok_or_else(|| ApiError::not_found(format!("record {id} not found")))?;
        Ok(RecordDetail {
            doi_url: record.doi_url(),
            published_on: record.published_on(),
            has_code: record.has_code(),
            related: self
                .source
                .related(id, RELATED_LIMIT)
                .into_iter()
                .cloned()
                .collect(),
            record: record.clone(),
        })
    }
}

/// Owns the wizard and the submission collaborator. `&mut self` on [`Self::finish`]
/// plus the wizard's phase keep at most one request in flight.
pub struct SubmissionSession<S> {
    form: WizardForm,
    submitter: S,
}

impl<S: Submitter> SubmissionSession<S> {
    pub fn new(submitter: S) -> Self {
        Self {
            form: WizardForm::new(),
            submitter,
        }
    }

    pub fn form(&self) -> &WizardForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut WizardForm {
        &mut self.form
    }

    pub fn snapshot(&self) -> WizardSnapshot {
        self.form.snapshot()
    }

    /// Validates the form and moves it to `Submitting`.
    pub fn begin(&mut self) -> Result<SubmissionPayload, WizardError> {
        self.form.begin_submit()
    }

    /// Hands a payload from [`Self::begin`] to the submitter and records the answer.
    pub async fn finish(
        &mut self,
        payload: SubmissionPayload,
    ) -> Result<SubmissionReceipt, WizardError> {
        let outcome = self.submitter.submit(payload).await;
        let receipt = self.form.complete_submit(outcome)?.clone();
        info!(reference = %receipt.reference, "submission receipt received");
        Ok(receipt)
    }

    pub async fn submit(&mut self) -> Result<SubmissionReceipt, WizardError> {
        let payload = self.begin()?;
        self.finish(payload).await
    }
}

/// Delays search text until typing pauses. A zero delay applies text immediately.
#[derive(Debug, Clone)]
pub struct SearchDebounce {
    delay: Duration,
    pending: Option<(String, Instant)>,
}

impl SearchDebounce {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Returns the text right away when there is no delay; otherwise holds it.
    pub fn push(&mut self, text: String, now: Instant) -> Option<String> {
        if self.delay.is_zero() {
            return Some(text);
        }
        self.pending = Some((text, now + self.delay));
        None
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, due)| *due)
    }

    pub fn take_due(&mut self, now: Instant) -> Option<String> {
        match self.deadline() {
            Some(due) if due <= now => self.take(),
            _ => None,
        }
    }

    pub fn take(&mut self) -> Option<String> {
        self.pending.take().map(|(text, _)| text)
    }
}

impl Default for SearchDebounce {
    fn default() -> Self {
        Self::new(Duration::ZERO)
    }
}

/// Routes page events to the catalog or the wizard and renders the result.
pub struct FrontEnd<R, S, P> {
    catalog: CatalogSession<R>,
    submission: SubmissionSession<S>,
    presenter: P,
    search: SearchDebounce,
}

impl<R, S, P> FrontEnd<R, S, P>
where
    R: RecordSource,
    S: Submitter,
    P: Presenter,
{
    pub fn new(catalog: CatalogSession<R>, submission: SubmissionSession<S>, presenter: P) -> Self {
        Self {
            catalog,
            submission,
            presenter,
            search: SearchDebounce::default(),
        }
    }

    pub fn with_search_debounce(mut self, delay: Duration) -> Self {
        self.search = SearchDebounce::new(delay);
        self
    }

    pub fn catalog(&self) -> &CatalogSession<R> {
        &self.catalog
    }

    pub fn submission(&self) -> &SubmissionSession<S> {
        &self.submission
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn into_presenter(self) -> P {
        self.presenter
    }

    /// Initial paint of both pages.
    pub fn render(&mut self) {
        self.presenter.render_catalog(&self.catalog.view());
        self.presenter.render_wizard(&self.submission.snapshot());
    }

    /// Applies one event. Recoverable rejections are also reported to the presenter.
    pub async fn dispatch(&mut self, event: UiEvent) -> Result<(), ApiError> {
        debug!(event = event.name(), "dispatching ui event");
        if let UiEvent::SearchTextChanged(text) = event {
            if let Some(text) = self.search.push(text, Instant::now()) {
                self.apply_search(text);
            }
            return Ok(());
        }

        // Held search text lands before anything that follows it.
        if let Some(text) = self.search.take() {
            self.apply_search(text);
        }

        match event {
            UiEvent::SearchTextChanged(_) => Ok(()),
            UiEvent::FilterChanged { dimension, value } => {
                self.catalog.engine_mut().set_filter(dimension, value);
                self.render_catalog();
                Ok(())
            }
            UiEvent::ClearFilters => {
                self.catalog.engine_mut().clear_filters();
                self.render_catalog();
                Ok(())
            }
            UiEvent::SortChanged { field, direction } => {
                self.catalog
                    .engine_mut()
                    .set_sort(Some(SortSpec::new(field, direction)));
                self.render_catalog();
                Ok(())
            }
            UiEvent::SortColumnClicked(field) => {
                self.catalog.engine_mut().click_column(field);
                self.render_catalog();
                Ok(())
            }
            UiEvent::PageChanged(page_index) => {
                if let PageChange::Moved(_) = self.catalog.engine_mut().go_to_page(page_index) {
                    self.render_catalog();
                }
                Ok(())
            }
            UiEvent::PageSizeChanged(page_size) => {
                self.catalog.engine_mut().set_page_size(page_size)?;
                self.render_catalog();
                Ok(())
            }
            UiEvent::ShowRecord(id) => match self.catalog.show_record(id) {
                Ok(detail) => {
                    self.presenter.render_detail(&detail);
                    Ok(())
                }
                Err(err) => {
                    warn!(%id, "record lookup failed");
                    self.presenter.notify(Notification::error(err.message.clone()));
                    Err(err)
                }
            },
            UiEvent::FieldInput { field, value } => {
                let form = self.submission.form_mut();
                let outcome = form.ensure_editable(field).map(|()| {
                    form.input(field, value);
                });
                self.finish_wizard_event(outcome)
            }
            UiEvent::FieldBlurred { field, value } => {
                let outcome = match self.submission.form_mut().blur(field, value) {
                    // Field errors live on the form and show up in the snapshot.
                    Err(WizardError::Field(_)) => Ok(()),
                    other => other,
                };
                self.finish_wizard_event(outcome)
            }
            UiEvent::AgreeTermsToggled(agreed) => {
                self.submission.form_mut().set_agree_terms(agreed);
                self.render_wizard();
                Ok(())
            }
            UiEvent::WizardNext => {
                let outcome = self.submission.form_mut().next().map(|_| ());
                self.finish_wizard_event(outcome)
            }
            UiEvent::WizardPrev => {
                self.submission.form_mut().prev();
                self.render_wizard();
                Ok(())
            }
            UiEvent::WizardSubmit => {
                let payload = match self.submission.begin() {
                    Ok(payload) => payload,
                    Err(err) => return self.finish_wizard_event(Err(err)),
                };
                // Submitting state is visible while the collaborator works.
                self.render_wizard();
                let outcome = self.submission.finish(payload).await;
                if outcome.is_ok() {
                    self.presenter
                        .notify(Notification::success(SUBMISSION_SUCCESS_MESSAGE));
                }
                self.finish_wizard_event(outcome.map(|_| ()))
            }
        }
    }

    /// Waits out a held search and applies it. No-op when nothing is pending.
    pub async fn settle(&mut self) {
        let Some(deadline) = self.search.deadline() else {
            return;
        };
        tokio::time::sleep_until(deadline).await;
        if let Some(text) = self.search.take_due(Instant::now()) {
            self.apply_search(text);
        }
    }

    fn apply_search(&mut self, text: String) {
        self.catalog.engine_mut().set_search(text);
        self.render_catalog();
    }

    fn render_catalog(&mut self) {
        let view = self.catalog.view();
        self.presenter.render_catalog(&view);
    }

    fn render_wizard(&mut self) {
        let snapshot = self.submission.snapshot();
        self.presenter.render_wizard(&snapshot);
    }

    fn finish_wizard_event(&mut self, outcome: Result<(), WizardError>) -> Result<(), ApiError> {
        self.render_wizard();
        outcome.map_err(|err| {
            self.presenter.notify(err.notification());
            ApiError::from(err)
        })
    }
}

impl From<AccountError> for ApiError {
    fn from(value: AccountError) -> Self {
        use shared::error::ErrorCode;

        let code = match value {
            AccountError::LoginRejected(_) => ErrorCode::Unauthorized,
            AccountError::RegistrationRejected(_) => ErrorCode::SubmissionFailed,
            AccountError::Invalid(_) | AccountError::InFlight => ErrorCode::Validation,
        };
        ApiError::new(code, value.to_string())
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
