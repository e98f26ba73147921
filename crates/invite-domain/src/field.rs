//! Field definitions describing every customizable property of a template.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Enumerates the input controls a field can be edited with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InputKind {
    ShortText,
    LongText,
    Url,
    Color,
    Date,
    Time,
    DateTime,
    BooleanToggle,
    MultiImage,
}

impl InputKind {
    /// Returns `true` for kinds whose value is a plain string.
    pub fn is_text(self) -> bool {
        !matches!(self, InputKind::BooleanToggle | InputKind::MultiImage)
    }
}

impl fmt::Display for InputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            InputKind::ShortText => "short-text",
            InputKind::LongText => "long-text",
            InputKind::Url => "url",
            InputKind::Color => "color",
            InputKind::Date => "date",
            InputKind::Time => "time",
            InputKind::DateTime => "date-time",
            InputKind::BooleanToggle => "boolean-toggle",
            InputKind::MultiImage => "multi-image",
        };
        f.write_str(label)
    }
}

/// One section name, or an ordered list of section names a field may appear under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SectionSpan {
    One(String),
    Many(Vec<String>),
}

impl SectionSpan {
    pub fn names(&self) -> &[String] {
        match self {
            SectionSpan::One(name) => std::slice::from_ref(name),
            SectionSpan::Many(names) => names,
        }
    }

    pub fn contains(&self, section: &str) -> bool {
        self.names().iter().any(|name| name == section)
    }

    pub fn is_empty(&self) -> bool {
        self.names().is_empty()
    }
}

impl From<&str> for SectionSpan {
    fn from(value: &str) -> Self {
        SectionSpan::One(value.to_string())
    }
}

impl<const N: usize> From<[&str; N]> for SectionSpan {
    fn from(value: [&str; N]) -> Self {
        SectionSpan::Many(value.iter().map(|name| name.to_string()).collect())
    }
}

impl From<Vec<String>> for SectionSpan {
    fn from(value: Vec<String>) -> Self {
        SectionSpan::Many(value)
    }
}

/// Static description of a single customizable field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDefinition {
    pub key: String,
    pub label: String,
    pub input_kind: InputKind,
    pub section: SectionSpan,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
}

impl FieldDefinition {
    pub fn new(
        key: impl Into<String>,
        label: impl Into<String>,
        input_kind: InputKind,
        section: impl Into<SectionSpan>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            input_kind,
            section: section.into(),
            category: category.into(),
            placeholder: None,
        }
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    /// Returns `true` when the field is declared under `section`.
    pub fn belongs_to(&self, section: &str) -> bool {
        self.section.contains(section)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn section_span_accepts_string_or_list() {
        let one: SectionSpan = serde_json::from_str("\"hero\"").unwrap();
        let many: SectionSpan = serde_json::from_str("[\"hero\",\"footer\"]").unwrap();

        assert_eq!(one.names(), ["hero".to_string()]);
        assert!(many.contains("footer"));
        assert_eq!(many.names().len(), 2);
    }

    #[test]
    fn input_kind_uses_kebab_case() {
        let kind: InputKind = serde_json::from_str("\"boolean-toggle\"").unwrap();
        assert_eq!(kind, InputKind::BooleanToggle);
        assert_eq!(InputKind::DateTime.to_string(), "date-time");
        assert!(!InputKind::MultiImage.is_text());
    }
}
