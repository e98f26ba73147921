//! Field values and the gallery image type used by multi-image fields.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::field::InputKind;

/// A local file selected by the user that has not been uploaded yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingUpload {
    pub file_name: String,
    pub path: PathBuf,
}

/// A single image entry of a multi-image field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryImage {
    #[serde(default)]
    pub id: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pending_upload: Option<PendingUpload>,
}

impl GalleryImage {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            url: url.into(),
            alt: None,
            category: None,
            pending_upload: None,
        }
    }

    pub fn with_alt(mut self, alt: impl Into<String>) -> Self {
        self.alt = Some(alt.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Render-facing representation. Pending uploads stay local.
    pub fn to_json(&self) -> Value {
        let mut object = Map::new();
        object.insert("id".into(), Value::String(self.id.clone()));
        object.insert("url".into(), Value::String(self.url.clone()));
        if let Some(alt) = &self.alt {
            object.insert("alt".into(), Value::String(alt.clone()));
        }
        if let Some(category) = &self.category {
            object.insert("category".into(), Value::String(category.clone()));
        }
        Value::Object(object)
    }
}

/// The current value of a field: text, a toggle, or an ordered image list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Toggle(bool),
    Text(String),
    Images(Vec<GalleryImage>),
}

impl FieldValue {
    /// The zero value for a field of `kind`.
    pub fn empty(kind: InputKind) -> Self {
        match kind {
            InputKind::BooleanToggle => FieldValue::Toggle(false),
            InputKind::MultiImage => FieldValue::Images(Vec::new()),
            _ => FieldValue::Text(String::new()),
        }
    }

    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Text(value.into())
    }

    /// Returns `true` for whitespace-only text and empty image lists.
    /// Toggles always carry a meaningful value and are never blank.
    pub fn is_blank(&self) -> bool {
        match self {
            FieldValue::Toggle(_) => false,
            FieldValue::Text(text) => text.trim().is_empty(),
            FieldValue::Images(images) => images.is_empty(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Toggle(flag) => Some(*flag),
            _ => None,
        }
    }

    pub fn as_images(&self) -> Option<&[GalleryImage]> {
        match self {
            FieldValue::Images(images) => Some(images),
            _ => None,
        }
    }

    /// Interprets a template-authored JSON value as a value for a field of `kind`.
    ///
    /// Returns `None` when the JSON shape cannot represent the field.
    pub fn from_json(kind: InputKind, value: &Value) -> Option<Self> {
        match kind {
            InputKind::BooleanToggle => match value {
                Value::Bool(flag) => Some(FieldValue::Toggle(*flag)),
                Value::String(raw) => match raw.trim().to_ascii_lowercase().as_str() {
                    "true" | "yes" | "on" => Some(FieldValue::Toggle(true)),
                    "false" | "no" | "off" => Some(FieldValue::Toggle(false)),
                    _ => None,
                },
                _ => None,
            },
            InputKind::MultiImage => {
                let entries = value.as_array()?;
                let images = entries
                    .iter()
                    .enumerate()
                    .filter_map(|(index, entry)| image_from_json(index, entry))
                    .collect();
                Some(FieldValue::Images(images))
            }
            _ => match value {
                Value::String(text) => Some(FieldValue::Text(text.clone())),
                Value::Number(number) => Some(FieldValue::Text(number.to_string())),
                Value::Bool(flag) => Some(FieldValue::Text(flag.to_string())),
                _ => None,
            },
        }
    }

    /// Render-facing JSON representation.
    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::Toggle(flag) => Value::Bool(*flag),
            FieldValue::Text(text) => Value::String(text.clone()),
            FieldValue::Images(images) => {
                Value::Array(images.iter().map(GalleryImage::to_json).collect())
            }
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Toggle(value)
    }
}

impl From<Vec<GalleryImage>> for FieldValue {
    fn from(value: Vec<GalleryImage>) -> Self {
        FieldValue::Images(value)
    }
}

// Template-authored images often omit ids; derive a stable one from the position
// so repeated resolution of the same template yields identical values.
fn image_from_json(index: usize, entry: &Value) -> Option<GalleryImage> {
    let mut image = match entry {
        Value::String(url) => GalleryImage {
            id: String::new(),
            url: url.clone(),
            alt: None,
            category: None,
            pending_upload: None,
        },
        Value::Object(_) => serde_json::from_value(entry.clone()).ok()?,
        _ => return None,
    };
    if image.id.is_empty() {
        image.id = format!("default-{}", index + 1);
    }
    Some(image)
}
