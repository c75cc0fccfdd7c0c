//! Read-only record source backing the catalog pages.

use std::{collections::HashSet, fs, path::Path};

use anyhow::Context;
use shared::domain::{DatasetRecord, RecordId};
use thiserror::Error;
use tracing::debug;

mod builtin;

pub const RELATED_LIMIT: usize = 3;

#[derive(Debug, Error)]
pub enum RecordStoreError {
    #[error("duplicate record id {0}")]
    DuplicateId(RecordId),
    #[error("malformed record collection: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Supplies the record collection loaded at startup. Implementations never mutate it.
pub trait RecordSource {
    fn records(&self) -> &[DatasetRecord];

    fn find(&self, id: RecordId) -> Option<&DatasetRecord> {
        self.records().iter().find(|record| record.id == id)
    }

    /// Records sharing the species or the platform of `id`, in source order.
    fn related(&self, id: RecordId, limit: usize) -> Vec<&DatasetRecord> {
        let Some(anchor) = self.find(id) else {
            return Vec::new();
        };
        self.records()
            .iter()
            .filter(|record| {
                record.id != anchor.id
                    && (record.species == anchor.species || record.platform == anchor.platform)
            })
            .take(limit)
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct StaticRecords {
    records: Vec<DatasetRecord>,
}

impl StaticRecords {
    pub fn new(records: Vec<DatasetRecord>) -> Result<Self, RecordStoreError> {
        let mut seen = HashSet::with_capacity(records.len());
        for record in &records {
            if !seen.insert(record.id) {
                return Err(RecordStoreError::DuplicateId(record.id));
            }
        }
        Ok(Self { records })
    }

    /// The five catalog entries the site ships with.
    pub fn builtin() -> Self {
        Self {
            records: builtin::records(),
        }
    }

    pub fn from_json_str(raw: &str) -> Result<Self, RecordStoreError> {
        let records: Vec<DatasetRecord> = serde_json::from_str(raw)?;
        Self::new(records)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read record file '{}'", path.display()))?;
        let store = Self::from_json_str(&raw)
            .with_context(|| format!("failed to load records from '{}'", path.display()))?;
        debug!(path = %path.display(), count = store.len(), "loaded record collection");
        Ok(store)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn into_records(self) -> Vec<DatasetRecord> {
        self.records
    }
}

impl RecordSource for StaticRecords {
    fn records(&self) -> &[DatasetRecord] {
        &self.records
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
