//! Section metadata and the enabled-flag shapes templates use to toggle them.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A named, orderable content block within a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionDefinition {
    pub name: String,
    pub label: String,
    #[serde(default)]
    pub icon: String,
}

impl SectionDefinition {
    pub fn new(name: impl Into<String>, label: impl Into<String>, icon: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            icon: icon.into(),
        }
    }
}

/// The value a template attaches to a section name in its enabled map.
///
/// A boolean, an options object, or a string naming the selected component variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SectionToggle {
    Flag(bool),
    Variant(String),
    Options(Map<String, Value>),
    Other(Value),
}

impl SectionToggle {
    pub fn is_enabled(&self) -> bool {
        match self {
            SectionToggle::Flag(enabled) => *enabled,
            SectionToggle::Variant(_) => true,
            SectionToggle::Options(options) => {
                !matches!(options.get("enabled"), Some(Value::Bool(false)))
            }
            SectionToggle::Other(_) => false,
        }
    }

    /// The selected component variant, when the toggle names one.
    pub fn variant(&self) -> Option<&str> {
        match self {
            SectionToggle::Variant(variant) => Some(variant),
            SectionToggle::Options(options) => options.get("variant").and_then(Value::as_str),
            _ => None,
        }
    }
}

impl From<bool> for SectionToggle {
    fn from(value: bool) -> Self {
        SectionToggle::Flag(value)
    }
}

impl From<&str> for SectionToggle {
    fn from(value: &str) -> Self {
        SectionToggle::Variant(value.to_string())
    }
}
