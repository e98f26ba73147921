//! Template default resolution.
//!
//! Every field's default is looked up through a fixed priority:
//!
//! 1. the host-supplied initial data, when it differs from what the template ships;
//! 2. the template's section default props, through the catalog's accessor table;
//! 3. the field's placeholder text.
//!
//! Initial-data values that differ from the template-authored value also come back
//! as seeds, so a reopened draft starts with those fields already marked touched.

use indexmap::IndexMap;
use invite_domain::{FieldCatalog, FieldDefinition, FieldValue, TemplateDefinition};
use tracing::debug;

/// Resolved defaults for the currently loaded template, keyed by field.
pub type TemplateDefaults = IndexMap<String, FieldValue>;

/// Host-supplied values for a template, keyed by field.
pub type InitialData = IndexMap<String, FieldValue>;

/// Output of [`DefaultsService::resolve`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DefaultsResolution {
    pub defaults: TemplateDefaults,
    /// Initial-data values to pre-seed as touched.
    pub seeded: IndexMap<String, FieldValue>,
}

pub struct DefaultsService;

impl DefaultsService {
    /// The value the template itself ships for `field` (sources 2 and 3).
    pub fn template_value(
        catalog: &FieldCatalog,
        field: &FieldDefinition,
        template: &TemplateDefinition,
    ) -> FieldValue {
        for accessor in catalog.default_sources(&field.key) {
            let Some(raw) = template.section_default(&accessor.section, &accessor.pointer) else {
                continue;
            };
            match FieldValue::from_json(field.input_kind, raw) {
                Some(value) if !value.is_blank() => return value,
                Some(_) => {}
                None => debug!(
                    field = %field.key,
                    section = %accessor.section,
                    pointer = %accessor.pointer,
                    "template default has an unexpected shape"
                ),
            }
        }

        match (&field.placeholder, field.input_kind.is_text()) {
            (Some(placeholder), true) => FieldValue::Text(placeholder.clone()),
            _ => FieldValue::empty(field.input_kind),
        }
    }

    /// Resolves defaults for every catalog field. Pure and idempotent.
    pub fn resolve(
        catalog: &FieldCatalog,
        template: &TemplateDefinition,
        initial: &InitialData,
    ) -> DefaultsResolution {
        let mut resolution = DefaultsResolution::default();

        for field in catalog.fields() {
            let authored = Self::template_value(catalog, field, template);
            let supplied = initial
                .get(&field.key)
                .filter(|value| !value.is_blank() && **value != authored);

            match supplied {
                Some(value) => {
                    resolution.defaults.insert(field.key.clone(), value.clone());
                    resolution.seeded.insert(field.key.clone(), value.clone());
                }
                None => {
                    resolution.defaults.insert(field.key.clone(), authored);
                }
            }
        }

        for key in initial.keys().filter(|key| !catalog.contains(key)) {
            debug!(field = %key, template = %template.id, "ignoring initial data for unknown field");
        }

        debug!(
            template = %template.id,
            fields = resolution.defaults.len(),
            seeded = resolution.seeded.len(),
            "resolved template defaults"
        );
        resolution
    }
}

#[cfg(test)]
mod tests {
    use invite_domain::{InputKind, SectionDefinition};
    use serde_json::json;

    use super::*;

    fn catalog() -> FieldCatalog {
        FieldCatalog::builder("test")
            .section(SectionDefinition::new("hero", "Hero", ""))
            .field(FieldDefinition::new("groomName", "Groom", InputKind::ShortText, "hero", "c"))
            .field(
                FieldDefinition::new("subtitle", "Subtitle", InputKind::ShortText, "hero", "c")
                    .with_placeholder("We are getting married"),
            )
            .field(FieldDefinition::new("showMap", "Map", InputKind::BooleanToggle, "hero", "c"))
            .build()
            .unwrap()
    }

    fn template() -> TemplateDefinition {
        TemplateDefinition::new(1, "Test")
            .with_section("hero", true)
            .with_defaults("hero", json!({"groomName": "Carlos", "showMap": true}))
    }

    #[test]
    fn section_defaults_then_placeholder() {
        let resolution = DefaultsService::resolve(&catalog(), &template(), &InitialData::new());

        assert_eq!(resolution.defaults["groomName"], FieldValue::text("Carlos"));
        assert_eq!(resolution.defaults["subtitle"], FieldValue::text("We are getting married"));
        assert_eq!(resolution.defaults["showMap"], FieldValue::Toggle(true));
        assert!(resolution.seeded.is_empty());
    }

    #[test]
    fn differing_initial_data_wins_and_is_seeded() {
        let mut initial = InitialData::new();
        initial.insert("groomName".into(), FieldValue::text("Luis"));

        let resolution = DefaultsService::resolve(&catalog(), &template(), &initial);
        assert_eq!(resolution.defaults["groomName"], FieldValue::text("Luis"));
        assert_eq!(resolution.seeded.get("groomName"), Some(&FieldValue::text("Luis")));
    }

    #[test]
    fn initial_data_equal_to_template_value_is_ignored() {
        let mut initial = InitialData::new();
        initial.insert("groomName".into(), FieldValue::text("Carlos"));
        initial.insert("subtitle".into(), FieldValue::text(""));
        initial.insert("ghost".into(), FieldValue::text("boo"));

        let resolution = DefaultsService::resolve(&catalog(), &template(), &initial);
        assert!(resolution.seeded.is_empty());
        assert_eq!(resolution.defaults["subtitle"], FieldValue::text("We are getting married"));
        assert!(!resolution.defaults.contains_key("ghost"));
    }

    #[test]
    fn resolution_is_idempotent() {
        let mut initial = InitialData::new();
        initial.insert("showMap".into(), FieldValue::Toggle(false));

        let first = DefaultsService::resolve(&catalog(), &template(), &initial);
        let second = DefaultsService::resolve(&catalog(), &template(), &initial);
        assert_eq!(first, second);
        assert_eq!(first.seeded.get("showMap"), Some(&FieldValue::Toggle(false)));
    }

    #[test]
    fn unconfigured_template_falls_back_to_empty_values() {
        let bare = TemplateDefinition::new("bare", "Bare");
        let resolution = DefaultsService::resolve(&catalog(), &bare, &InitialData::new());

        assert_eq!(resolution.defaults["groomName"], FieldValue::text(""));
        assert_eq!(resolution.defaults["showMap"], FieldValue::Toggle(false));
    }
}
