use std::{
    sync::atomic::{AtomicU64, Ordering},
    time::Duration,
};

use async_trait::async_trait;
use chrono::Utc;
use shared::{
    error::SubmissionFailure,
    protocol::{SubmissionPayload, SubmissionReceipt},
};
use tracing::debug;

pub const DEFAULT_SUBMIT_DELAY: Duration = Duration::from_millis(2000);

/// Accepts or rejects a completed wizard payload. Pass/fail only.
#[async_trait]
pub trait Submitter: Send + Sync {
    async fn submit(&self, payload: SubmissionPayload)
        -> Result<SubmissionReceipt, SubmissionFailure>;
}

/// Stand-in backend: waits a fixed delay, then accepts everything with a sequential reference.
pub struct DelayedSubmitter {
    delay: Duration,
    issued: AtomicU64,
}

impl DelayedSubmitter {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            issued: AtomicU64::new(0),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl Default for DelayedSubmitter {
    fn default() -> Self {
        Self::new(DEFAULT_SUBMIT_DELAY)
    }
}

#[async_trait]
impl Submitter for DelayedSubmitter {
    async fn submit(
        &self,
        payload: SubmissionPayload,
    ) -> Result<SubmissionReceipt, SubmissionFailure> {
        debug!(
            delay_ms = self.delay.as_millis() as u64,
            fields = payload.fields.len(),
            "simulating submission"
        );
        tokio::time::sleep(self.delay).await;
        let sequence = self.issued.fetch_add(1, Ordering::Relaxed) + 1;
        Ok(SubmissionReceipt {
            reference: format!("SUB-{sequence:06}"),
            accepted_at: Utc::now(),
        })
    }
}

pub struct MissingSubmitter;

#[async_trait]
impl Submitter for MissingSubmitter {
    async fn submit(
        &self,
        _payload: SubmissionPayload,
    ) -> Result<SubmissionReceipt, SubmissionFailure> {
        Err(SubmissionFailure::new("submission backend unavailable"))
    }
}
