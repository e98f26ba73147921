//! Durable draft records and the storage abstraction they are written through.

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        RwLock,
    },
};

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use invite_domain::{EditorMode, FieldValue, TemplateId};
use serde::{Deserialize, Serialize};

use crate::CoreError;

pub const DRAFT_SCHEMA_VERSION: u32 = 1;

/// The persisted `{working values, touched set, mode}` triple for one template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftRecord {
    #[serde(default = "DraftRecord::default_schema_version")]
    pub schema_version: u32,
    pub template_id: TemplateId,
    /// Incremented on every successful save of the owning session.
    #[serde(default)]
    pub revision: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub working_values: IndexMap<String, FieldValue>,
    #[serde(default)]
    pub touched: Vec<String>,
    #[serde(default)]
    pub mode: EditorMode,
}

impl DraftRecord {
    pub fn new(template_id: TemplateId) -> Self {
        Self {
            schema_version: DRAFT_SCHEMA_VERSION,
            template_id,
            revision: 0,
            saved_at: None,
            working_values: IndexMap::new(),
            touched: Vec::new(),
            mode: EditorMode::default(),
        }
    }

    pub fn default_schema_version() -> u32 {
        DRAFT_SCHEMA_VERSION
    }

    /// Rejects records written by a newer schema than this build understands.
    pub fn ensure_supported(&self) -> Result<(), CoreError> {
        if self.schema_version > DRAFT_SCHEMA_VERSION {
            return Err(CoreError::Storage(format!(
                "draft for template `{}` uses schema v{} (supported: v{})",
                self.template_id, self.schema_version, DRAFT_SCHEMA_VERSION
            )));
        }
        Ok(())
    }
}

/// Abstraction over persistence backends keyed by template identity.
///
/// Concurrent sessions for the same template overwrite each other: the last
/// write wins.
pub trait DraftStorage: Send + Sync {
    /// Human-readable name for logging.
    fn name(&self) -> &str;
    /// Returns `Ok(None)` when no draft exists for `id`.
    fn load_draft(&self, id: &TemplateId) -> Result<Option<DraftRecord>, CoreError>;
    fn save_draft(&self, record: &DraftRecord) -> Result<(), CoreError>;
    fn delete_draft(&self, id: &TemplateId) -> Result<(), CoreError>;
    fn list_drafts(&self) -> Result<Vec<TemplateId>, CoreError>;
}

/// In-memory draft storage for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryDraftStorage {
    drafts: RwLock<HashMap<TemplateId, DraftRecord>>,
    saves: AtomicUsize,
}

impl MemoryDraftStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: impl IntoIterator<Item = DraftRecord>) -> Self {
        let drafts = records
            .into_iter()
            .map(|record| (record.template_id.clone(), record))
            .collect();
        Self {
            drafts: RwLock::new(drafts),
            saves: AtomicUsize::new(0),
        }
    }

    /// Number of successful `save_draft` calls.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

impl DraftStorage for MemoryDraftStorage {
    fn name(&self) -> &str {
        "MemoryDraftStorage"
    }

    fn load_draft(&self, id: &TemplateId) -> Result<Option<DraftRecord>, CoreError> {
        let guard = self
            .drafts
            .read()
            .map_err(|_| CoreError::Storage("draft store lock poisoned".into()))?;
        Ok(guard.get(id).cloned())
    }

    fn save_draft(&self, record: &DraftRecord) -> Result<(), CoreError> {
        let mut guard = self
            .drafts
            .write()
            .map_err(|_| CoreError::Storage("draft store lock poisoned".into()))?;
        guard.insert(record.template_id.clone(), record.clone());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn delete_draft(&self, id: &TemplateId) -> Result<(), CoreError> {
        let mut guard = self
            .drafts
            .write()
            .map_err(|_| CoreError::Storage("draft store lock poisoned".into()))?;
        guard.remove(id);
        Ok(())
    }

    fn list_drafts(&self) -> Result<Vec<TemplateId>, CoreError> {
        let guard = self
            .drafts
            .read()
            .map_err(|_| CoreError::Storage("draft store lock poisoned".into()))?;
        let mut ids: Vec<TemplateId> = guard.values().map(|record| record.template_id.clone()).collect();
        ids.sort_by_key(|id| id.to_string());
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_storage_keys_by_template_identity() {
        let storage = MemoryDraftStorage::new();
        let numeric = TemplateId::from(7);
        let named = TemplateId::from("7");

        storage.save_draft(&DraftRecord::new(numeric.clone())).unwrap();
        assert!(storage.load_draft(&named).unwrap().is_none());

        storage.save_draft(&DraftRecord::new(named.clone())).unwrap();
        storage.delete_draft(&named).unwrap();
        assert_eq!(
            storage.load_draft(&numeric).unwrap().map(|record| record.template_id),
            Some(numeric.clone())
        );
        assert_eq!(storage.list_drafts().unwrap(), vec![numeric]);
        assert_eq!(storage.save_count(), 2);
    }
}
