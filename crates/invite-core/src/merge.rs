//! Stage A of the pipeline: touched working values merged over template defaults.

use indexmap::IndexMap;
use invite_domain::FieldValue;

use crate::touched::TouchedState;

/// Flat, render-ready data: one value per catalog field.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EffectiveData(IndexMap<String, FieldValue>);

impl EffectiveData {
    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.0.get(key)
    }

    /// Text of a field, or `""` for missing and non-text values.
    pub fn text(&self, key: &str) -> &str {
        self.0.get(key).and_then(FieldValue::as_text).unwrap_or("")
    }

    pub fn is_blank(&self, key: &str) -> bool {
        self.0.get(key).map(FieldValue::is_blank).unwrap_or(true)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldValue)> {
        self.0.iter()
    }

    pub fn into_inner(self) -> IndexMap<String, FieldValue> {
        self.0
    }
}

impl From<IndexMap<String, FieldValue>> for EffectiveData {
    fn from(values: IndexMap<String, FieldValue>) -> Self {
        Self(values)
    }
}

impl FromIterator<(String, FieldValue)> for EffectiveData {
    fn from_iter<I: IntoIterator<Item = (String, FieldValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

pub struct MergeService;

impl MergeService {
    /// `touched ? working : default` for every catalog field, in catalog order.
    pub fn effective(state: &TouchedState) -> EffectiveData {
        state
            .catalog()
            .fields()
            .iter()
            .filter_map(|field| {
                state
                    .effective_value(&field.key)
                    .map(|value| (field.key.clone(), value.clone()))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::{DefaultsService, InitialData};
    use crate::tests::{sample_template, wedding};

    #[test]
    fn untouched_keys_mirror_defaults() {
        let catalog = wedding();
        let resolution = DefaultsService::resolve(&catalog, &sample_template(), &InitialData::new());
        let mut state = TouchedState::new(catalog, resolution.defaults.clone());
        state.update_field("brideName", "Ana".into()).unwrap();

        let effective = MergeService::effective(&state);
        for (key, value) in effective.iter() {
            if key == "brideName" {
                assert_eq!(value, &FieldValue::text("Ana"));
            } else {
                assert_eq!(Some(value), resolution.defaults.get(key));
            }
        }
        assert_eq!(effective.len(), resolution.defaults.len());
    }
}
