//! Touched-state store: which fields the user edited, and the working value of each.

use std::sync::Arc;

use indexmap::{IndexMap, IndexSet};
use invite_domain::{FieldCatalog, FieldValue};
use tracing::{debug, warn};

use crate::{defaults::TemplateDefaults, CoreError};

/// Derived per-field view handed to the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldState {
    /// The user's value, or the empty value while the field is untouched.
    pub value: FieldValue,
    pub is_touched: bool,
    /// Whether the touched value differs from the template default.
    pub is_modified: bool,
    pub default_value: FieldValue,
    pub can_reset: bool,
}

/// Working values plus the touched key set for one editing session.
///
/// Template defaults are fixed at construction; only a new template load replaces them.
#[derive(Debug, Clone)]
pub struct TouchedState {
    catalog: Arc<FieldCatalog>,
    defaults: TemplateDefaults,
    working: IndexMap<String, FieldValue>,
    touched: IndexSet<String>,
}

impl TouchedState {
    pub fn new(catalog: Arc<FieldCatalog>, defaults: TemplateDefaults) -> Self {
        let working = catalog
            .fields()
            .iter()
            .map(|field| (field.key.clone(), FieldValue::empty(field.input_kind)))
            .collect();
        Self {
            catalog,
            defaults,
            working,
            touched: IndexSet::new(),
        }
    }

    pub fn catalog(&self) -> &FieldCatalog {
        &self.catalog
    }

    pub fn defaults(&self) -> &TemplateDefaults {
        &self.defaults
    }

    pub fn default_value(&self, key: &str) -> Option<&FieldValue> {
        self.defaults.get(key)
    }

    pub fn working_values(&self) -> &IndexMap<String, FieldValue> {
        &self.working
    }

    pub fn working_value(&self, key: &str) -> Option<&FieldValue> {
        self.working.get(key)
    }

    pub fn touched(&self) -> &IndexSet<String> {
        &self.touched
    }

    pub fn is_touched(&self, key: &str) -> bool {
        self.touched.contains(key)
    }

    /// Sets a working value and marks the field touched.
    pub fn update_field(&mut self, key: &str, value: FieldValue) -> Result<(), CoreError> {
        self.ensure_known(key)?;
        debug!(field = key, "field updated");
        self.working.insert(key.to_string(), value);
        self.touched.insert(key.to_string());
        Ok(())
    }

    /// Bulk-sets working values without marking anything touched.
    ///
    /// Unknown keys are skipped and returned.
    pub fn update_fields(&mut self, partial: IndexMap<String, FieldValue>) -> Vec<String> {
        let mut skipped = Vec::new();
        for (key, value) in partial {
            if self.catalog.contains(&key) {
                self.working.insert(key, value);
            } else {
                warn!(field = %key, "bulk update skipped unknown field");
                skipped.push(key);
            }
        }
        skipped
    }

    /// Puts the default back into the working value and clears the touched flag.
    pub fn reset_field(&mut self, key: &str) -> Result<(), CoreError> {
        self.ensure_known(key)?;
        let value = self.default_or_empty(key);
        self.working.insert(key.to_string(), value);
        self.touched.shift_remove(key);
        debug!(field = key, "field reset to default");
        Ok(())
    }

    /// Copies every default into the working values and clears all touched flags.
    pub fn reset_fields(&mut self) {
        let keys: Vec<String> = self.working.keys().cloned().collect();
        for key in keys {
            let value = self.default_or_empty(&key);
            self.working.insert(key, value);
        }
        self.touched.clear();
        debug!("all fields reset to defaults");
    }

    /// Marks `values` as touched user edits (initial-data bootstrapping).
    pub fn seed(&mut self, values: &IndexMap<String, FieldValue>) {
        for (key, value) in values {
            if self.catalog.contains(key) {
                self.working.insert(key.clone(), value.clone());
                self.touched.insert(key.clone());
            }
        }
    }

    /// Replaces working values and the touched set with a persisted snapshot.
    ///
    /// Keys the catalog no longer knows are dropped.
    pub fn restore(&mut self, working: &IndexMap<String, FieldValue>, touched: &[String]) {
        for field in self.catalog.fields() {
            let value = working
                .get(&field.key)
                .cloned()
                .unwrap_or_else(|| FieldValue::empty(field.input_kind));
            self.working.insert(field.key.clone(), value);
        }
        self.touched = touched
            .iter()
            .filter(|key| self.catalog.contains(key))
            .cloned()
            .collect();

        let dropped = working.keys().filter(|key| !self.catalog.contains(key)).count()
            + touched.iter().filter(|key| !self.catalog.contains(key)).count();
        if dropped > 0 {
            warn!(dropped, "restored draft referenced fields missing from the catalog");
        }
    }

    /// Touched value when touched, otherwise the default.
    pub fn effective_value(&self, key: &str) -> Option<&FieldValue> {
        if self.touched.contains(key) {
            self.working.get(key)
        } else {
            self.defaults.get(key)
        }
    }

    pub fn field_state(&self, key: &str) -> Option<FieldState> {
        let field = self.catalog.field(key)?;
        let empty = FieldValue::empty(field.input_kind);
        let default_value = self.defaults.get(key).cloned().unwrap_or_else(|| empty.clone());
        let is_touched = self.touched.contains(key);
        let value = if is_touched {
            self.working.get(key).cloned().unwrap_or(empty)
        } else {
            empty
        };
        Some(FieldState {
            is_modified: is_touched && value != default_value,
            value,
            is_touched,
            default_value,
            can_reset: is_touched,
        })
    }

    fn default_or_empty(&self, key: &str) -> FieldValue {
        match self.defaults.get(key) {
            Some(value) => value.clone(),
            None => self
                .catalog
                .field(key)
                .map(|field| FieldValue::empty(field.input_kind))
                .unwrap_or_else(|| FieldValue::text("")),
        }
    }

    fn ensure_known(&self, key: &str) -> Result<(), CoreError> {
        if self.catalog.contains(key) {
            Ok(())
        } else {
            warn!(field = key, domain = self.catalog.domain(), "rejected change to unknown field");
            Err(CoreError::UnknownField(key.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use invite_domain::FieldValue;

    use super::*;
    use crate::defaults::{DefaultsService, InitialData};
    use crate::tests::{sample_template, wedding};

    fn state() -> TouchedState {
        let catalog = wedding();
        let resolution = DefaultsService::resolve(&catalog, &sample_template(), &InitialData::new());
        TouchedState::new(catalog, resolution.defaults)
    }

    #[test]
    fn untouched_fields_start_empty() {
        let state = state();
        assert_eq!(state.working_value("groomName"), Some(&FieldValue::text("")));
        assert!(state.touched().is_empty());

        let field = state.field_state("groomName").expect("state");
        assert_eq!(field.value, FieldValue::text(""));
        assert_eq!(field.default_value, FieldValue::text("Carlos"));
        assert!(!field.can_reset);
        assert!(!field.is_modified);
    }

    #[test]
    fn update_marks_touched_and_is_idempotent() {
        let mut once = state();
        once.update_field("groomName", "Luis".into()).unwrap();
        let mut twice = state();
        twice.update_field("groomName", "Luis".into()).unwrap();
        twice.update_field("groomName", "Luis".into()).unwrap();

        assert_eq!(once.touched(), twice.touched());
        assert_eq!(once.working_values(), twice.working_values());
        let field = once.field_state("groomName").unwrap();
        assert!(field.is_touched && field.is_modified && field.can_reset);
    }

    #[test]
    fn touched_value_equal_to_default_is_not_modified() {
        let mut state = state();
        state.update_field("groomName", "Carlos".into()).unwrap();

        let field = state.field_state("groomName").unwrap();
        assert!(field.is_touched);
        assert!(!field.is_modified);
    }

    #[test]
    fn bulk_update_does_not_touch() {
        let mut state = state();
        let mut partial = IndexMap::new();
        partial.insert("brideName".to_string(), FieldValue::text("Ana"));
        partial.insert("nope".to_string(), FieldValue::text("x"));

        let skipped = state.update_fields(partial);
        assert_eq!(skipped, vec!["nope".to_string()]);
        assert_eq!(state.working_value("brideName"), Some(&FieldValue::text("Ana")));
        assert!(!state.is_touched("brideName"));
        assert_eq!(state.effective_value("brideName"), Some(&FieldValue::text("Maria")));
    }

    #[test]
    fn unknown_keys_are_rejected_without_side_effects() {
        let mut state = state();
        let err = state.update_field("confetti", "yes".into()).unwrap_err();

        assert!(matches!(err, CoreError::UnknownField(ref key) if key == "confetti"));
        assert!(state.touched().is_empty());
        assert!(state.working_value("confetti").is_none());
        assert!(state.reset_field("confetti").is_err());
    }

    #[test]
    fn reset_field_restores_default_and_clears_touch() {
        let mut state = state();
        state.update_field("groomName", "Luis".into()).unwrap();
        state.reset_field("groomName").unwrap();

        assert!(!state.is_touched("groomName"));
        assert_eq!(state.working_value("groomName"), Some(&FieldValue::text("Carlos")));
        assert_eq!(state.effective_value("groomName"), Some(&FieldValue::text("Carlos")));
    }

    #[test]
    fn reset_fields_clears_everything() {
        let mut state = state();
        state.update_field("groomName", "Luis".into()).unwrap();
        state.update_field("rsvpEnabled", false.into()).unwrap();
        state.reset_fields();

        assert!(state.touched().is_empty());
        assert_eq!(state.working_values(), state.defaults());
    }

    #[test]
    fn restore_drops_unknown_keys() {
        let mut state = state();
        let mut working = IndexMap::new();
        working.insert("groomName".to_string(), FieldValue::text("Pedro"));
        working.insert("retired".to_string(), FieldValue::text("old"));
        state.restore(&working, &["groomName".to_string(), "retired".to_string()]);

        assert!(state.is_touched("groomName"));
        assert!(!state.is_touched("retired"));
        assert!(state.working_value("retired").is_none());
        assert_eq!(state.effective_value("groomName"), Some(&FieldValue::text("Pedro")));
    }
}
