//! Debounced draft persistence.
//!
//! [`DraftSync`] is a small state machine driven by the owning session:
//!
//! ```text
//!   change            deadline reached          write done
//! idle ──────▶ pending ───────────────▶ saving ────────────▶ idle
//!               │  ▲ change (deadline restarts)
//!               └──┘
//!   flush: any state ──▶ saving ──▶ idle (deadline cancelled)
//! ```
//!
//! The timer is poll-driven: the host calls `tick` from its event loop with the
//! current time and the sync fires once the trailing-edge deadline has passed.
//! A failed write keeps the sync dirty so the next flush retries it; in-memory
//! state is never rolled back.

use chrono::{DateTime, Duration, Utc};
use tracing::{info, warn};

use crate::{
    storage::{DraftRecord, DraftStorage},
    CoreError,
};

/// Externally visible save state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncStatus {
    #[default]
    Idle,
    Pending,
    Saving,
}

#[derive(Debug, Clone)]
pub struct DraftSync {
    status: SyncStatus,
    window: Duration,
    deadline: Option<DateTime<Utc>>,
    dirty: bool,
    revision: u64,
    last_saved_at: Option<DateTime<Utc>>,
    last_error: Option<String>,
}

impl DraftSync {
    pub fn new(window: Duration) -> Self {
        Self {
            status: SyncStatus::Idle,
            window: window.max(Duration::zero()),
            deadline: None,
            dirty: false,
            revision: 0,
            last_saved_at: None,
            last_error: None,
        }
    }

    /// Continues numbering from a restored record.
    pub fn with_revision(mut self, revision: u64) -> Self {
        self.revision = revision;
        self
    }

    pub fn status(&self) -> SyncStatus {
        self.status
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn deadline(&self) -> Option<DateTime<Utc>> {
        self.deadline
    }

    /// `true` while a change has not been written successfully.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn last_saved_at(&self) -> Option<DateTime<Utc>> {
        self.last_saved_at
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Arms (or re-arms) the debounce deadline.
    pub fn note_change(&mut self, now: DateTime<Utc>) {
        self.dirty = true;
        self.status = SyncStatus::Pending;
        self.deadline = Some(now + self.window);
    }

    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.status == SyncStatus::Pending && self.deadline.is_some_and(|deadline| now >= deadline)
    }

    /// Remaining debounce delay, `None` when nothing is pending.
    pub fn time_until_save(&self, now: DateTime<Utc>) -> Option<Duration> {
        if self.status != SyncStatus::Pending {
            return None;
        }
        self.deadline
            .map(|deadline| (deadline - now).max(Duration::zero()))
    }

    /// Drops any pending save without writing.
    pub fn cancel(&mut self) {
        self.status = SyncStatus::Idle;
        self.deadline = None;
        self.dirty = false;
    }

    /// Writes `record` immediately, cancelling the pending deadline.
    ///
    /// Stamps the record with the next revision and `now`. On failure the error is
    /// kept in [`DraftSync::last_error`] and returned; the sync stays dirty.
    pub fn write(
        &mut self,
        storage: &dyn DraftStorage,
        mut record: DraftRecord,
        now: DateTime<Utc>,
    ) -> Result<(), CoreError> {
        self.status = SyncStatus::Saving;
        self.deadline = None;
        record.revision = self.revision + 1;
        record.saved_at = Some(now);

        let result = storage.save_draft(&record);
        self.status = SyncStatus::Idle;
        match &result {
            Ok(()) => {
                self.revision = record.revision;
                self.dirty = false;
                self.last_saved_at = Some(now);
                self.last_error = None;
                info!(
                    template = %record.template_id,
                    revision = record.revision,
                    storage = storage.name(),
                    touched = record.touched.len(),
                    "draft saved"
                );
            }
            Err(err) => {
                self.last_error = Some(err.to_string());
                warn!(
                    template = %record.template_id,
                    storage = storage.name(),
                    error = %err,
                    "draft save failed; keeping in-memory state"
                );
            }
        }
        result
    }
}
