//! Basic/full visibility over the grouped field set.

use invite_domain::{EditorMode, FieldCatalog};

use crate::sections::FieldGroup;

/// Holds the current editor mode. Visibility only; never touches field data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ModeFilter {
    mode: EditorMode,
}

impl ModeFilter {
    pub fn new(mode: EditorMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    /// Returns `true` when the mode actually changed.
    pub fn set_mode(&mut self, mode: EditorMode) -> bool {
        let changed = self.mode != mode;
        self.mode = mode;
        changed
    }

    pub fn is_visible(&self, catalog: &FieldCatalog, key: &str) -> bool {
        match self.mode {
            EditorMode::Full => catalog.contains(key),
            EditorMode::Basic => catalog.is_basic(key),
        }
    }

    /// Narrows each group to the visible fields. Groups left empty stay listed.
    pub fn apply<'a>(&self, catalog: &FieldCatalog, groups: Vec<FieldGroup<'a>>) -> Vec<FieldGroup<'a>> {
        match self.mode {
            EditorMode::Full => groups,
            EditorMode::Basic => groups
                .into_iter()
                .map(|mut group| {
                    group.fields.retain(|field| catalog.is_basic(&field.key));
                    group
                })
                .collect(),
        }
    }
}
