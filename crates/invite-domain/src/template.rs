//! Template definitions as supplied by the template renderer.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::section::SectionToggle;

/// Opaque template identity used to key durable drafts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TemplateId {
    Numeric(u64),
    Named(String),
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateId::Numeric(id) => write!(f, "{id}"),
            TemplateId::Named(name) => f.write_str(name),
        }
    }
}

impl From<u64> for TemplateId {
    fn from(value: u64) -> Self {
        TemplateId::Numeric(value)
    }
}

impl From<&str> for TemplateId {
    fn from(value: &str) -> Self {
        TemplateId::Named(value.to_string())
    }
}

impl From<String> for TemplateId {
    fn from(value: String) -> Self {
        TemplateId::Named(value)
    }
}

/// A concrete template: which sections it enables, in which order, and the
/// example props each section ships with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateDefinition {
    pub id: TemplateId,
    #[serde(default)]
    pub name: String,
    /// Enabled map; iteration follows the order the entries were parsed in.
    #[serde(default)]
    pub sections: IndexMap<String, SectionToggle>,
    /// Authoritative `[name, toggle]` order as stored by the database.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section_order: Option<Vec<(String, SectionToggle)>>,
    /// Component-level default props per section name.
    #[serde(default)]
    pub section_defaults: IndexMap<String, Value>,
}

impl TemplateDefinition {
    pub fn new(id: impl Into<TemplateId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            sections: IndexMap::new(),
            section_order: None,
            section_defaults: IndexMap::new(),
        }
    }

    pub fn with_section(mut self, name: impl Into<String>, toggle: impl Into<SectionToggle>) -> Self {
        self.sections.insert(name.into(), toggle.into());
        self
    }

    pub fn with_section_order(mut self, order: Vec<(String, SectionToggle)>) -> Self {
        self.section_order = Some(order);
        self
    }

    pub fn with_defaults(mut self, section: impl Into<String>, props: Value) -> Self {
        self.section_defaults.insert(section.into(), props);
        self
    }

    /// Looks up a template-authored default through a JSON pointer into a section's props.
    pub fn section_default(&self, section: &str, pointer: &str) -> Option<&Value> {
        self.section_defaults.get(section)?.pointer(pointer)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn template_parses_ordered_pairs_and_defaults() {
        let raw = r#"{
            "id": 42,
            "name": "Garden",
            "sections": {"hero": true, "footer": true},
            "sectionOrder": [["footer", "x"], ["hero", "y"]],
            "sectionDefaults": {"hero": {"groomName": "Carlos"}}
        }"#;
        let template: TemplateDefinition = serde_json::from_str(raw).unwrap();

        assert_eq!(template.id, TemplateId::Numeric(42));
        let order = template.section_order.as_ref().expect("order list");
        assert_eq!(order[0].0, "footer");
        assert_eq!(template.section_default("hero", "/groomName"), Some(&json!("Carlos")));
        assert_eq!(template.section_default("hero", "/missing"), None);
    }

    #[test]
    fn template_ids_display_plainly() {
        assert_eq!(TemplateId::from(7).to_string(), "7");
        assert_eq!(TemplateId::from("rustic-garden").to_string(), "rustic-garden");
    }
}
