use catalog::CatalogView;
use client_core::{Presenter, RecordDetail};
use serde::Serialize;
use serde_json::Value;
use shared::protocol::Notification;
use tracing::warn;
use wizard::WizardSnapshot;

/// Keeps the latest frame of each page and every notification, then prints them as one JSON document.
#[derive(Debug, Default)]
pub struct JsonPresenter {
    catalog: Option<Value>,
    wizard: Option<Value>,
    detail: Option<Value>,
    notifications: Vec<Notification>,
    frames: usize,
}

#[derive(Serialize)]
struct Document<'a> {
    frames: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    catalog: Option<&'a Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    wizard: Option<&'a Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<&'a Value>,
    notifications: &'a [Notification],
}

impl JsonPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> usize {
        self.frames
    }

    pub fn to_json(&self) -> anyhow::Result<String> {
        let document = Document {
            frames: self.frames,
            catalog: self.catalog.as_ref(),
            wizard: self.wizard.as_ref(),
            detail: self.detail.as_ref(),
            notifications: &self.notifications,
        };
        Ok(serde_json::to_string_pretty(&document)?)
    }

    fn capture(slot: &mut Option<Value>, frames: &mut usize, what: &str, frame: &impl Serialize) {
        match serde_json::to_value(frame) {
            Ok(value) => {
                *slot = Some(value);
                *frames += 1;
            }
            Err(err) => warn!(what, error = %err, "failed to serialize frame"),
        }
    }
}

impl Presenter for JsonPresenter {
    fn render_catalog(&mut self, view: &CatalogView) {
        Self::capture(&mut self.catalog, &mut self.frames, "catalog", view);
    }

    fn render_wizard(&mut self, snapshot: &WizardSnapshot) {
        Self::capture(&mut self.wizard, &mut self.frames, "wizard", snapshot);
    }

    fn render_detail(&mut self, detail: &RecordDetail) {
        Self::capture(&mut self.detail, &mut self.frames, "detail", detail);
    }

    fn notify(&mut self, notification: Notification) {
        self.notifications.push(notification);
    }
}

#[cfg(test)]
mod tests {
    use catalog::CatalogEngine;
    use record_store::StaticRecords;
    use shared::protocol::NotificationLevel;
    use wizard::WizardForm;

    use super::*;

    #[test]
    fn document_holds_latest_frames_and_all_notifications() {
        let mut presenter = JsonPresenter::new();
        let mut engine = CatalogEngine::new(StaticRecords::builtin().into_records());
        presenter.render_catalog(&engine.view());
        engine.set_search("小鼠");
        presenter.render_catalog(&engine.view());
        presenter.render_wizard(&WizardForm::new().snapshot());
        presenter.notify(Notification::error("提交失败，请重试"));

        assert_eq!(presenter.frames(), 3);
        let json: Value = serde_json::from_str(&presenter.to_json().expect("json")).expect("parse");
        assert_eq!(json["catalog"]["result_count"], 1);
        assert_eq!(json["wizard"]["step_number"], 1);
        assert!(json.get("detail").is_none());
        assert_eq!(json["notifications"][0]["message"], "提交失败，请重试");
        assert_eq!(
            serde_json::to_value(NotificationLevel::Error).expect("level"),
            json["notifications"][0]["level"]
        );
    }
}
