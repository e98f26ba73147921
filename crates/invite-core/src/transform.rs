//! Stage B of the pipeline: flat effective data reshaped into per-section props.

use std::collections::HashSet;

use indexmap::IndexMap;
use invite_domain::{FieldCatalog, PropRule, SlotSpec};
use serde_json::{Map, Value};

use crate::{merge::EffectiveData, sections::SectionService};

/// Render input per active section, in active-section order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RenderProps(IndexMap<String, Map<String, Value>>);

impl RenderProps {
    pub fn section(&self, name: &str) -> Option<&Map<String, Value>> {
        self.0.get(name)
    }

    pub fn prop(&self, section: &str, prop: &str) -> Option<&Value> {
        self.0.get(section)?.get(prop)
    }

    pub fn section_names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// JSON object keyed by section name.
    pub fn to_json(&self) -> Value {
        Value::Object(
            self.0
                .iter()
                .map(|(name, props)| (name.clone(), Value::Object(props.clone())))
                .collect(),
        )
    }
}

pub struct TransformService;

impl TransformService {
    /// Builds the nested props for `active` sections from `data`.
    ///
    /// Pure: the same input always yields the same output.
    pub fn render(catalog: &FieldCatalog, active: &[String], data: &EffectiveData) -> RenderProps {
        let mut output = IndexMap::new();
        for group in SectionService::group_fields(catalog, active) {
            let rules = catalog.render_rules(group.name());
            let consumed: HashSet<&str> = rules
                .iter()
                .filter(|rule| matches!(rule, PropRule::Slots { .. }))
                .flat_map(PropRule::field_keys)
                .collect();

            let mut props = Map::new();
            for field in &group.fields {
                if consumed.contains(field.key.as_str()) {
                    continue;
                }
                if let Some(value) = data.get(&field.key) {
                    props.insert(field.key.clone(), value.to_json());
                }
            }
            for rule in rules {
                props.insert(rule.prop().to_string(), Self::apply_rule(rule, data));
            }
            output.insert(group.name().to_string(), props);
        }
        RenderProps(output)
    }

    fn apply_rule(rule: &PropRule, data: &EffectiveData) -> Value {
        match rule {
            PropRule::Join {
                fields, separator, ..
            } => {
                let parts: Vec<&str> = fields
                    .iter()
                    .map(|key| data.text(key).trim())
                    .filter(|part| !part.is_empty())
                    .collect();
                Value::String(parts.join(separator))
            }
            PropRule::Copy { field, .. } => data
                .get(field)
                .map(|value| value.to_json())
                .unwrap_or(Value::Null),
            PropRule::Slots { primary, slots, .. } => {
                Value::Array(slots.iter().filter_map(|slot| Self::slot_item(slot, primary, data)).collect())
            }
        }
    }

    // A slot is emitted only when its primary item prop is non-blank; slot numbers
    // are carried through so sparse population never reindexes.
    fn slot_item(slot: &SlotSpec, primary: &str, data: &EffectiveData) -> Option<Value> {
        let primary_key = slot.fields.get(primary)?;
        if data.is_blank(primary_key) {
            return None;
        }
        let mut item = Map::new();
        item.insert("slot".into(), Value::from(slot.slot));
        for (prop, key) in &slot.fields {
            let value = data.get(key).map(|value| value.to_json()).unwrap_or(Value::Null);
            item.insert(prop.clone(), value);
        }
        Some(Value::Object(item))
    }
}
