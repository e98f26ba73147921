//! One editing session for one template.
//!
//! [`EditorSession`] wires the pipeline together: defaults resolution, the touched
//! store, mode filtering, the two-stage merge/transform and debounced persistence.
//! A session owns its state exclusively; hosts drive it from a single thread and
//! call [`EditorSession::tick`] from their event loop.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use indexmap::IndexMap;
use invite_domain::{EditorMode, FieldCatalog, FieldValue, TemplateDefinition};
use tracing::{debug, info, warn};

use crate::{
    defaults::{DefaultsService, InitialData},
    merge::{EffectiveData, MergeService},
    mode_filter::ModeFilter,
    persistence::{DraftSync, SyncStatus},
    sections::{FieldGroup, SectionService},
    storage::{DraftRecord, DraftStorage},
    time::Clock,
    touched::{FieldState, TouchedState},
    transform::{RenderProps, TransformService},
    CoreError,
};

pub const DEFAULT_DEBOUNCE_MS: i64 = 800;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptions {
    /// Quiet period after the last change before the draft is written.
    pub debounce: Duration,
    /// Mode used when no draft is restored.
    pub default_mode: EditorMode,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            debounce: Duration::milliseconds(DEFAULT_DEBOUNCE_MS),
            default_mode: EditorMode::Basic,
        }
    }
}

/// Summary numbers for a status line. Field counts cover visible fields only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionCounts {
    pub active_sections: usize,
    pub total_fields: usize,
    pub touched_fields: usize,
}

pub struct EditorSession {
    catalog: Arc<FieldCatalog>,
    template: TemplateDefinition,
    initial: InitialData,
    active: Vec<String>,
    state: TouchedState,
    filter: ModeFilter,
    sync: DraftSync,
    storage: Arc<dyn DraftStorage>,
    clock: Arc<dyn Clock>,
    restored: bool,
    closed: bool,
}

// State produced by loading a template, shared by `open` and `reload`.
struct Loaded {
    active: Vec<String>,
    state: TouchedState,
    mode: EditorMode,
    revision: u64,
    restored: bool,
}

impl EditorSession {
    /// Opens `template` for editing.
    ///
    /// A stored draft for the template takes priority over `initial`. When the
    /// draft cannot be read the session logs a warning and starts from the
    /// template and initial data instead.
    pub fn open(
        catalog: Arc<FieldCatalog>,
        template: TemplateDefinition,
        initial: InitialData,
        storage: Arc<dyn DraftStorage>,
        clock: Arc<dyn Clock>,
        options: SessionOptions,
    ) -> Self {
        let loaded = Self::load(&catalog, &template, &initial, storage.as_ref(), options.default_mode);
        info!(
            template = %template.id,
            sections = loaded.active.len(),
            restored = loaded.restored,
            mode = %loaded.mode,
            "editor session opened"
        );
        Self {
            catalog,
            template,
            initial,
            active: loaded.active,
            state: loaded.state,
            filter: ModeFilter::new(loaded.mode),
            sync: DraftSync::new(options.debounce).with_revision(loaded.revision),
            storage,
            clock,
            restored: loaded.restored,
            closed: false,
        }
    }

    fn load(
        catalog: &Arc<FieldCatalog>,
        template: &TemplateDefinition,
        initial: &InitialData,
        storage: &dyn DraftStorage,
        default_mode: EditorMode,
    ) -> Loaded {
        let active = SectionService::resolve_for(template);
        let resolution = DefaultsService::resolve(catalog, template, initial);
        let mut state = TouchedState::new(Arc::clone(catalog), resolution.defaults);

        let stored = storage.load_draft(&template.id).and_then(|record| match record {
            Some(record) => record.ensure_supported().map(|_| Some(record)),
            None => Ok(None),
        });

        match stored {
            Ok(Some(record)) => {
                state.restore(&record.working_values, &record.touched);
                debug!(
                    template = %template.id,
                    revision = record.revision,
                    touched = record.touched.len(),
                    "restored stored draft"
                );
                Loaded {
                    active,
                    state,
                    mode: record.mode,
                    revision: record.revision,
                    restored: true,
                }
            }
            Ok(None) => {
                state.seed(&resolution.seeded);
                Loaded {
                    active,
                    state,
                    mode: default_mode,
                    revision: 0,
                    restored: false,
                }
            }
            Err(err) => {
                warn!(
                    template = %template.id,
                    storage = storage.name(),
                    error = %err,
                    "could not read stored draft; starting from template data"
                );
                state.seed(&resolution.seeded);
                Loaded {
                    active,
                    state,
                    mode: default_mode,
                    revision: 0,
                    restored: false,
                }
            }
        }
    }

    pub fn catalog(&self) -> &FieldCatalog {
        &self.catalog
    }

    pub fn template(&self) -> &TemplateDefinition {
        &self.template
    }

    pub fn active_sections(&self) -> &[String] {
        &self.active
    }

    pub fn state(&self) -> &TouchedState {
        &self.state
    }

    /// Whether this session started from a stored draft.
    pub fn was_restored(&self) -> bool {
        self.restored
    }

    pub fn mode(&self) -> EditorMode {
        self.filter.mode()
    }

    /// Visible fields grouped under the active sections.
    pub fn fields(&self) -> Vec<FieldGroup<'_>> {
        let groups = SectionService::group_fields(&self.catalog, &self.active);
        self.filter.apply(&self.catalog, groups)
    }

    pub fn field_state(&self, key: &str) -> Option<FieldState> {
        self.state.field_state(key)
    }

    pub fn counts(&self) -> SessionCounts {
        let groups = self.fields();
        let visible = groups.iter().flat_map(|group| group.fields.iter());
        let (total_fields, touched_fields) = visible.fold((0, 0), |(total, touched), field| {
            (total + 1, touched + usize::from(self.state.is_touched(&field.key)))
        });
        SessionCounts {
            active_sections: groups.len(),
            total_fields,
            touched_fields,
        }
    }

    pub fn update_field(&mut self, key: &str, value: impl Into<FieldValue>) -> Result<(), CoreError> {
        self.state.update_field(key, value.into())?;
        self.changed();
        Ok(())
    }

    /// Bulk-sets working values without touching them. Returns the skipped unknown keys.
    pub fn update_fields(&mut self, partial: IndexMap<String, FieldValue>) -> Vec<String> {
        let submitted = partial.len();
        let skipped = self.state.update_fields(partial);
        if skipped.len() < submitted {
            self.changed();
        }
        skipped
    }

    pub fn reset_field(&mut self, key: &str) -> Result<(), CoreError> {
        self.state.reset_field(key)?;
        self.changed();
        Ok(())
    }

    pub fn reset_fields(&mut self) {
        self.state.reset_fields();
        self.changed();
    }

    /// Switches between basic and full mode. Field data is untouched.
    pub fn set_mode(&mut self, mode: EditorMode) {
        if self.filter.set_mode(mode) {
            debug!(template = %self.template.id, %mode, "editor mode changed");
            self.changed();
        }
    }

    pub fn effective_data(&self) -> EffectiveData {
        MergeService::effective(&self.state)
    }

    pub fn render_props(&self) -> RenderProps {
        TransformService::render(&self.catalog, &self.active, &self.effective_data())
    }

    /// Writes the draft when the debounce deadline has passed.
    ///
    /// Returns `true` when a save succeeded. A failed write is reported through
    /// [`EditorSession::last_error`] and retried one debounce window later.
    pub fn tick(&mut self) -> bool {
        let now = self.clock.now();
        if !self.sync.is_due(now) {
            return false;
        }
        if self.write(now).is_err() {
            self.sync.note_change(now);
            return false;
        }
        true
    }

    pub fn time_until_save(&self) -> Option<Duration> {
        self.sync.time_until_save(self.clock.now())
    }

    /// Writes any unsaved change now, skipping the debounce.
    pub fn flush(&mut self) -> Result<(), CoreError> {
        if !self.sync.is_dirty() {
            return Ok(());
        }
        let now = self.clock.now();
        self.write(now)
    }

    /// Flushes and ends the session.
    pub fn close(mut self) -> Result<(), CoreError> {
        let result = self.flush();
        self.closed = true;
        debug!(template = %self.template.id, "editor session closed");
        result
    }

    /// Deletes the stored draft and returns the session to the template's own state.
    pub fn discard_draft(&mut self) -> Result<(), CoreError> {
        self.storage.delete_draft(&self.template.id)?;
        self.sync.cancel();

        let resolution = DefaultsService::resolve(&self.catalog, &self.template, &self.initial);
        let mut state = TouchedState::new(Arc::clone(&self.catalog), resolution.defaults);
        state.seed(&resolution.seeded);
        self.state = state;
        self.restored = false;
        info!(template = %self.template.id, "draft discarded");
        Ok(())
    }

    /// Switches the session to another template.
    ///
    /// Unsaved changes for the current template are flushed first; when that
    /// write fails the session stays on the current template.
    pub fn reload(&mut self, template: TemplateDefinition, initial: InitialData) -> Result<(), CoreError> {
        self.flush()?;

        let loaded = Self::load(&self.catalog, &template, &initial, self.storage.as_ref(), self.filter.mode());
        let window = self.sync.window();
        info!(
            from = %self.template.id,
            to = %template.id,
            restored = loaded.restored,
            "editor session switched template"
        );
        self.template = template;
        self.initial = initial;
        self.active = loaded.active;
        self.state = loaded.state;
        self.filter = ModeFilter::new(loaded.mode);
        self.sync = DraftSync::new(window).with_revision(loaded.revision);
        self.restored = loaded.restored;
        Ok(())
    }

    pub fn status(&self) -> SyncStatus {
        self.sync.status()
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.sync.is_dirty()
    }

    /// Message of the most recent failed save, cleared by the next successful one.
    pub fn last_error(&self) -> Option<&str> {
        self.sync.last_error()
    }

    pub fn last_saved_at(&self) -> Option<DateTime<Utc>> {
        self.sync.last_saved_at()
    }

    pub fn revision(&self) -> u64 {
        self.sync.revision()
    }

    /// Snapshot of what a save would write.
    pub fn draft_record(&self) -> DraftRecord {
        let mut record = DraftRecord::new(self.template.id.clone());
        record.revision = self.sync.revision();
        record.working_values = self.state.working_values().clone();
        record.touched = self.state.touched().iter().cloned().collect();
        record.mode = self.filter.mode();
        record
    }

    fn changed(&mut self) {
        let now = self.clock.now();
        self.sync.note_change(now);
    }

    fn write(&mut self, now: DateTime<Utc>) -> Result<(), CoreError> {
        let record = self.draft_record();
        self.sync.write(self.storage.as_ref(), record, now)
    }
}

impl Drop for EditorSession {
    fn drop(&mut self) {
        if self.closed {
            return;
        }
        if let Err(err) = self.flush() {
            warn!(template = %self.template.id, error = %err, "draft lost on teardown");
        }
    }
}
