use super::*;
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use async_trait::async_trait;
use record_store::StaticRecords;
use shared::{
    domain::{FieldId, FilterDimension, SortDirection, SortField},
    error::{ErrorCode, SubmissionFailure},
    protocol::{NotificationLevel, SubmissionPayload},
};
use wizard::{Step, SubmissionPhase};

#[derive(Default)]
struct RecordingPresenter {
    catalogs: Vec<CatalogView>,
    wizards: Vec<WizardSnapshot>,
    details: Vec<RecordDetail>,
    notifications: Vec<Notification>,
}

impl RecordingPresenter {
    fn last_ids(&self) -> Vec<i64> {
        self.catalogs.last().map(CatalogView::ids).unwrap_or_default()
    }

    fn last_wizard(&self) -> &WizardSnapshot {
        self.wizards.last().expect("wizard rendered")
    }

    fn last_notification(&self) -> &Notification {
        self.notifications.last().expect("notification")
    }
}

impl Presenter for RecordingPresenter {
    fn render_catalog(&mut self, view: &CatalogView) {
        self.catalogs.push(view.clone());
    }

    fn render_wizard(&mut self, snapshot: &WizardSnapshot) {
        self.wizards.push(snapshot.clone());
    }

    fn render_detail(&mut self, detail: &RecordDetail) {
        self.details.push(detail.clone());
    }

    fn notify(&mut self, notification: Notification) {
        self.notifications.push(notification);
    }
}

#[derive(Clone, Default)]
struct TestSubmitter {
    reject: bool,
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl Submitter for TestSubmitter {
    async fn submit(
        &self,
        payload: SubmissionPayload,
    ) -> Result<SubmissionReceipt, SubmissionFailure> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.reject {
            return Err(SubmissionFailure::new("backend said no"));
        }
        assert!(payload.agree_terms);
        Ok(SubmissionReceipt {
            reference: format!("TEST-{call}"),
            accepted_at: chrono::Utc::now(),
        })
    }
}

type TestFrontEnd = FrontEnd<StaticRecords, TestSubmitter, RecordingPresenter>;

fn front_end(submitter: TestSubmitter) -> TestFrontEnd {
    FrontEnd::new(
        CatalogSession::new(StaticRecords::builtin(), ViewState::default()),
        SubmissionSession::new(submitter),
        RecordingPresenter::default(),
    )
}

async fn fill_wizard(front: &mut TestFrontEnd) {
    let steps: [&[(FieldId, &str)]; 3] = [
        &[
            (FieldId::DatasetTitle, "人类大脑皮层单细胞转录组分析"),
            (FieldId::AuthorName, "Zhang et al."),
            (FieldId::AuthorEmail, "zhang@example.com"),
            (FieldId::PublicationYear, "2024"),
        ],
        &[
            (FieldId::Species, "人类"),
            (FieldId::Platform, "10X Genomics"),
            (FieldId::SampleCount, "12"),
            (FieldId::CellCount, "45000"),
            (FieldId::DataLink, "https://example.com/data1"),
        ],
        &[(FieldId::ReproStatus, "已复现")],
    ];
    for fields in steps {
        for (field, value) in fields {
            front
                .dispatch(UiEvent::FieldInput {
                    field: *field,
                    value: value.to_string(),
                })
                .await
                .expect("input");
        }
        front.dispatch(UiEvent::WizardNext).await.expect("next");
    }
    assert_eq!(front.presenter().last_wizard().step, Step::Confirmation);
}

#[tokio::test]
async fn catalog_events_render_the_derived_view() {
    let mut front = front_end(TestSubmitter::default());
    front.render();
    assert_eq!(front.presenter().last_ids(), vec![1, 2, 3, 4, 5]);

    front
        .dispatch(UiEvent::SearchTextChanged("小鼠".into()))
        .await
        .expect("search");
    assert_eq!(front.presenter().last_ids(), vec![2]);

    front.dispatch(UiEvent::ClearFilters).await.expect("clear");
    front
        .dispatch(UiEvent::FilterChanged {
            dimension: FilterDimension::Species,
            value: "人类".into(),
        })
        .await
        .expect("filter");
    assert_eq!(front.presenter().last_ids(), vec![1]);

    front.dispatch(UiEvent::ClearFilters).await.expect("clear");
    front
        .dispatch(UiEvent::SortChanged {
            field: SortField::Year,
            direction: SortDirection::Desc,
        })
        .await
        .expect("sort");
    assert_eq!(front.presenter().last_ids(), vec![1, 4, 2, 3, 5]);

    front
        .dispatch(UiEvent::PageSizeChanged(2))
        .await
        .expect("page size");
    front.dispatch(UiEvent::PageChanged(2)).await.expect("page");
    assert_eq!(front.presenter().last_ids(), vec![2, 3]);
}

#[tokio::test]
async fn out_of_range_page_is_ignored_without_render() {
    let mut front = front_end(TestSubmitter::default());
    front
        .dispatch(UiEvent::PageSizeChanged(2))
        .await
        .expect("page size");
    let renders = front.presenter().catalogs.len();

    front.dispatch(UiEvent::PageChanged(9)).await.expect("ignored");
    front.dispatch(UiEvent::PageChanged(0)).await.expect("ignored");
    assert_eq!(front.presenter().catalogs.len(), renders);
    assert_eq!(front.catalog().engine().state().page_index(), 1);
}

#[tokio::test]
async fn zero_page_size_is_a_validation_error() {
    let mut front = front_end(TestSubmitter::default());
    let err = front
        .dispatch(UiEvent::PageSizeChanged(0))
        .await
        .expect_err("rejected");
    assert_eq!(err.code, ErrorCode::Validation);
}

#[tokio::test]
async fn column_clicks_toggle_direction() {
    let mut front = front_end(TestSubmitter::default());
    front
        .dispatch(UiEvent::SortColumnClicked(SortField::Cells))
        .await
        .expect("click");
    let first = front.presenter().last_ids();
    front
        .dispatch(UiEvent::SortColumnClicked(SortField::Cells))
        .await
        .expect("click");
    let mut second = front.presenter().last_ids();
    second.reverse();
    assert_eq!(first, second);
}

#[tokio::test]
async fn show_record_renders_detail_with_related() {
    let mut front = front_end(TestSubmitter::default());
    front
        .dispatch(UiEvent::ShowRecord(RecordId(1)))
        .await
        .expect("detail");
    let detail = front.presenter().details.last().expect("detail rendered");
    assert_eq!(detail.record.id, RecordId(1));
    let related: Vec<RecordId> = detail.related.iter().map(|r| r.id).collect();
    assert_eq!(related, vec![RecordId(4)]);
    assert_eq!(detail.published_on, chrono::NaiveDate::from_ymd_opt(2024, 1, 15));
    assert!(detail.has_code);
}

#[tokio::test]
async fn detail_without_code_link_says_so() {
    let front = front_end(TestSubmitter::default());
    let detail = front.catalog().show_record(RecordId(3)).expect("detail");
    assert!(!detail.has_code);
}

#[tokio::test]
async fn missing_record_is_not_found() {
    let mut front = front_end(TestSubmitter::default());
    let err = front
        .dispatch(UiEvent::ShowRecord(RecordId(42)))
        .await
        .expect_err("missing");
    assert_eq!(err.code, ErrorCode::NotFound);
    assert_eq!(
        front.presenter().last_notification().level,
        NotificationLevel::Error
    );
    assert!(front.presenter().details.is_empty());
}

#[tokio::test]
async fn wizard_next_with_empty_title_stays_on_first_step() {
    let mut front = front_end(TestSubmitter::default());
    let err = front
        .dispatch(UiEvent::WizardNext)
        .await
        .expect_err("invalid step");
    assert_eq!(err.code, ErrorCode::Validation);

    let presenter = front.presenter();
    assert_eq!(presenter.last_notification().message, "请填写所有必填字段");
    let snapshot = presenter.last_wizard();
    assert_eq!(snapshot.step_number, 1);
    assert!(snapshot.errors.contains_key(&FieldId::DatasetTitle));
}

#[tokio::test]
async fn blur_surfaces_field_error_in_snapshot() {
    let mut front = front_end(TestSubmitter::default());
    front
        .dispatch(UiEvent::FieldBlurred {
            field: FieldId::AuthorEmail,
            value: "zhang@".into(),
        })
        .await
        .expect("blur");
    assert_eq!(
        front
            .presenter()
            .last_wizard()
            .errors
            .get(&FieldId::AuthorEmail)
            .map(String::as_str),
        Some("请输入有效的邮箱地址")
    );
}

#[tokio::test]
async fn submission_goes_through_submitting_to_submitted() {
    let submitter = TestSubmitter::default();
    let mut front = front_end(submitter.clone());
    fill_wizard(&mut front).await;

    let err = front
        .dispatch(UiEvent::WizardSubmit)
        .await
        .expect_err("terms missing");
    assert_eq!(err.code, ErrorCode::Validation);
    assert_eq!(submitter.calls.load(Ordering::SeqCst), 0);

    front
        .dispatch(UiEvent::AgreeTermsToggled(true))
        .await
        .expect("terms");
    front.dispatch(UiEvent::WizardSubmit).await.expect("submit");

    let presenter = front.presenter();
    let phases: Vec<SubmissionPhase> = presenter.wizards.iter().map(|s| s.phase).collect();
    assert!(phases.contains(&SubmissionPhase::Submitting));
    assert_eq!(presenter.last_wizard().phase, SubmissionPhase::Submitted);
    assert_eq!(
        presenter
            .last_wizard()
            .receipt
            .as_ref()
            .map(|r| r.reference.as_str()),
        Some("TEST-1")
    );
    assert_eq!(presenter.last_notification().message, SUBMISSION_SUCCESS_MESSAGE);

    let again = front
        .dispatch(UiEvent::WizardSubmit)
        .await
        .expect_err("already submitted");
    assert_eq!(again.code, ErrorCode::Validation);
    assert_eq!(submitter.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn rejected_submission_keeps_the_final_step() {
    let mut front = front_end(TestSubmitter {
        reject: true,
        ..TestSubmitter::default()
    });
    fill_wizard(&mut front).await;
    front
        .dispatch(UiEvent::AgreeTermsToggled(true))
        .await
        .expect("terms");

    let err = front
        .dispatch(UiEvent::WizardSubmit)
        .await
        .expect_err("rejected");
    assert_eq!(err.code, ErrorCode::SubmissionFailed);

    let presenter = front.presenter();
    assert_eq!(presenter.last_notification().message, "提交失败，请重试");
    let snapshot = presenter.last_wizard();
    assert_eq!(snapshot.step, Step::Confirmation);
    assert_eq!(snapshot.phase, SubmissionPhase::Editing);
}

#[tokio::test(start_paused = true)]
async fn delayed_submitter_waits_then_issues_sequential_references() {
    let submitter = DelayedSubmitter::new(Duration::from_millis(2000));
    let started = Instant::now();

    let first = submitter
        .submit(SubmissionPayload::default())
        .await
        .expect("accepted");
    assert!(started.elapsed() >= Duration::from_millis(2000));
    let second = submitter
        .submit(SubmissionPayload::default())
        .await
        .expect("accepted");

    assert_eq!(first.reference, "SUB-000001");
    assert_eq!(second.reference, "SUB-000002");
}

#[tokio::test]
async fn missing_submitter_always_fails() {
    let err = MissingSubmitter
        .submit(SubmissionPayload::default())
        .await
        .expect_err("unavailable");
    assert_eq!(err.to_string(), "提交失败，请重试");
}

#[tokio::test(start_paused = true)]
async fn debounced_search_applies_after_settle() {
    let mut front =
        front_end(TestSubmitter::default()).with_search_debounce(Duration::from_millis(300));
    front
        .dispatch(UiEvent::SearchTextChanged("小".into()))
        .await
        .expect("search");
    front
        .dispatch(UiEvent::SearchTextChanged("小鼠".into()))
        .await
        .expect("search");
    assert!(front.presenter().catalogs.is_empty());

    front.settle().await;
    assert_eq!(front.presenter().catalogs.len(), 1);
    assert_eq!(front.presenter().last_ids(), vec![2]);

    front.settle().await;
    assert_eq!(front.presenter().catalogs.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn held_search_lands_before_the_next_event() {
    let mut front =
        front_end(TestSubmitter::default()).with_search_debounce(Duration::from_millis(300));
    front
        .dispatch(UiEvent::SearchTextChanged("10x".into()))
        .await
        .expect("search");
    front
        .dispatch(UiEvent::FilterChanged {
            dimension: FilterDimension::Species,
            value: "斑马鱼".into(),
        })
        .await
        .expect("filter");

    assert_eq!(front.presenter().catalogs.len(), 2);
    assert_eq!(front.catalog().engine().state().search_query(), "10x");
    assert_eq!(front.presenter().last_ids(), vec![4]);
}

#[test]
fn search_debounce_only_releases_due_text() {
    let start = Instant::now();
    let mut debounce = SearchDebounce::new(Duration::from_millis(300));
    assert_eq!(debounce.push("a".into(), start), None);
    assert_eq!(debounce.take_due(start + Duration::from_millis(299)), None);
    assert_eq!(
        debounce.take_due(start + Duration::from_millis(300)),
        Some("a".to_string())
    );
    assert_eq!(debounce.deadline(), None);

    let mut immediate = SearchDebounce::default();
    assert_eq!(immediate.push("b".into(), start), Some("b".to_string()));
}

#[test]
fn session_submit_requires_final_step() {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .expect("runtime");
    runtime.block_on(async {
        let mut session = SubmissionSession::new(DelayedSubmitter::new(Duration::ZERO));
        let err = session.submit().await.expect_err("not on final step");
        assert_eq!(err, WizardError::NotOnFinalStep(1));
        assert_eq!(session.form().phase(), SubmissionPhase::Editing);
    });
}

fn fill_session<S: Submitter>(session: &mut SubmissionSession<S>) {
    let steps: [&[(FieldId, &str)]; 3] = [
        &[
            (FieldId::DatasetTitle, "人类大脑皮层单细胞转录组分析"),
            (FieldId::AuthorName, "Zhang et al."),
            (FieldId::AuthorEmail, "zhang@example.com"),
            (FieldId::PublicationYear, "2024"),
        ],
        &[
            (FieldId::Species, "人类"),
            (FieldId::Platform, "10X Genomics"),
            (FieldId::SampleCount, "12"),
            (FieldId::CellCount, "45000"),
            (FieldId::DataLink, "https://example.com/data1"),
        ],
        &[(FieldId::ReproStatus, "已复现")],
    ];
    let form = session.form_mut();
    for fields in steps {
        for (field, value) in fields {
            assert!(form.input(*field, *value));
        }
        form.next().expect("next");
    }
    form.set_agree_terms(true);
}

#[tokio::test]
async fn session_submit_returns_the_receipt() {
    let submitter = TestSubmitter::default();
    let mut session = SubmissionSession::new(submitter.clone());
    fill_session(&mut session);

    let receipt = session.submit().await.expect("accepted");
    assert_eq!(receipt.reference, "TEST-1");
    assert_eq!(session.form().phase(), SubmissionPhase::Submitted);
    assert_eq!(session.snapshot().receipt, Some(receipt));

    assert_eq!(session.submit().await, Err(WizardError::AlreadySubmitted));
    assert_eq!(submitter.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn session_submit_rejection_allows_retry() {
    let submitter = TestSubmitter {
        reject: true,
        ..TestSubmitter::default()
    };
    let mut session = SubmissionSession::new(submitter.clone());
    fill_session(&mut session);

    let err = session.submit().await.expect_err("rejected");
    assert!(matches!(err, WizardError::Submission(_)));
    assert_eq!(session.form().phase(), SubmissionPhase::Editing);
    assert_eq!(session.form().step(), Step::Confirmation);

    let payload = session.begin().expect("retry");
    assert_eq!(session.begin(), Err(WizardError::SubmissionInFlight));
    assert!(session.finish(payload).await.is_err());
    assert_eq!(submitter.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn field_events_after_submission_are_rejected() {
    let mut front = front_end(TestSubmitter::default());
    fill_wizard(&mut front).await;
    front
        .dispatch(UiEvent::AgreeTermsToggled(true))
        .await
        .expect("terms");
    front.dispatch(UiEvent::WizardSubmit).await.expect("submit");

    let err = front
        .dispatch(UiEvent::FieldInput {
            field: FieldId::DatasetTitle,
            value: "Changed".into(),
        })
        .await
        .expect_err("locked");
    assert_eq!(err.code, ErrorCode::Validation);
    front.dispatch(UiEvent::WizardPrev).await.expect("prev is a no-op");

    let snapshot = front.presenter().last_wizard();
    assert_eq!(snapshot.step, Step::Confirmation);
    assert_eq!(snapshot.phase, SubmissionPhase::Submitted);
    assert_eq!(
        snapshot.values.get(&FieldId::DatasetTitle).map(String::as_str),
        Some("人类大脑皮层单细胞转录组分析")
    );
}

#[tokio::test]
async fn account_fields_are_not_wizard_input() {
    let mut front = front_end(TestSubmitter::default());
    let err = front
        .dispatch(UiEvent::FieldBlurred {
            field: FieldId::Password,
            value: "hunter22".into(),
        })
        .await
        .expect_err("not a wizard field");
    assert_eq!(err.code, ErrorCode::Validation);
    assert!(front.presenter().last_wizard().values.is_empty());
}
