//! Template documents read from disk.
//!
//! A document is a [`TemplateDefinition`] plus optional host initial data:
//!
//! ```json
//! {
//!   "id": 101,
//!   "name": "Jardín",
//!   "sections": { "hero": true, "gallery": false },
//!   "sectionDefaults": { "hero": { "groomName": "Carlos" } },
//!   "initialData": { "brideName": "Ana" }
//! }
//! ```

use std::{fs, path::Path};

use invite_core::InitialData;
use invite_domain::{FieldCatalog, FieldValue, TemplateDefinition};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::warn;

use crate::StudioError;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateDocument {
    #[serde(flatten)]
    pub template: TemplateDefinition,
    #[serde(default)]
    pub initial_data: Map<String, Value>,
}

impl TemplateDocument {
    pub fn load(path: &Path) -> Result<Self, StudioError> {
        let raw = fs::read_to_string(path)?;
        Self::parse(&raw).map_err(|message| StudioError::Template {
            path: path.display().to_string(),
            message,
        })
    }

    pub fn parse(raw: &str) -> Result<Self, String> {
        serde_json::from_str(raw).map_err(|err| err.to_string())
    }

    /// Initial data typed against `catalog`.
    ///
    /// Unknown keys and values of the wrong shape are dropped with a warning.
    pub fn initial_data(&self, catalog: &FieldCatalog) -> InitialData {
        let mut data = InitialData::new();
        for (key, raw) in &self.initial_data {
            let Some(field) = catalog.field(key) else {
                warn!(field = %key, template = %self.template.id, "initial data names an unknown field");
                continue;
            };
            match FieldValue::from_json(field.input_kind, raw) {
                Some(value) => {
                    data.insert(key.clone(), value);
                }
                None => warn!(
                    field = %key,
                    kind = %field.input_kind,
                    "initial data value has the wrong shape"
                ),
            }
        }
        data
    }
}
