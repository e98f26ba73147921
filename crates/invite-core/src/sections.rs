//! Section activation and field grouping.

use std::collections::HashSet;

use indexmap::IndexMap;
use invite_domain::{FieldCatalog, FieldDefinition, SectionDefinition, SectionToggle, TemplateDefinition};
use tracing::debug;

/// A section together with the fields shown under it, in catalog order.
#[derive(Debug, Clone)]
pub struct FieldGroup<'a> {
    pub section: &'a SectionDefinition,
    pub fields: Vec<&'a FieldDefinition>,
}

impl FieldGroup<'_> {
    pub fn name(&self) -> &str {
        &self.section.name
    }

    pub fn keys(&self) -> Vec<&str> {
        self.fields.iter().map(|field| field.key.as_str()).collect()
    }
}

/// Resolves which sections a template shows and which fields each one owns.
pub struct SectionService;

impl SectionService {
    /// Ordered names of the enabled sections.
    ///
    /// A non-empty `order` list is authoritative; otherwise the enabled map's own
    /// entry order is used. Names listed twice keep their first position.
    pub fn resolve(
        enabled: &IndexMap<String, SectionToggle>,
        order: Option<&[(String, SectionToggle)]>,
    ) -> Vec<String> {
        let entries: Vec<(&String, &SectionToggle)> = match order {
            Some(pairs) if !pairs.is_empty() => pairs.iter().map(|(name, toggle)| (name, toggle)).collect(),
            _ => enabled.iter().collect(),
        };

        let mut seen = HashSet::new();
        let mut active = Vec::new();
        for (name, toggle) in entries {
            if !seen.insert(name.as_str()) {
                debug!(section = %name, "ignoring repeated section in order list");
                continue;
            }
            if toggle.is_enabled() {
                active.push(name.clone());
            }
        }
        active
    }

    pub fn resolve_for(template: &TemplateDefinition) -> Vec<String> {
        Self::resolve(&template.sections, template.section_order.as_deref())
    }

    /// Groups catalog fields under the active sections.
    ///
    /// Sections without a catalog entry are skipped. A field spanning several
    /// sections is listed only under the first active one.
    pub fn group_fields<'a>(catalog: &'a FieldCatalog, active: &[String]) -> Vec<FieldGroup<'a>> {
        let mut claimed: HashSet<&str> = HashSet::new();
        let mut groups = Vec::with_capacity(active.len());
        for name in active {
            let Some(section) = catalog.section(name) else {
                debug!(section = %name, domain = catalog.domain(), "active section has no catalog entry");
                continue;
            };
            let fields = catalog
                .fields_in(&section.name)
                .filter(|field| claimed.insert(field.key.as_str()))
                .collect();
            groups.push(FieldGroup { section, fields });
        }
        groups
    }
}

#[cfg(test)]
mod tests {
    use invite_domain::{FieldDefinition, InputKind};

    use super::*;

    fn enabled(entries: &[(&str, SectionToggle)]) -> IndexMap<String, SectionToggle> {
        entries
            .iter()
            .map(|(name, toggle)| (name.to_string(), toggle.clone()))
            .collect()
    }

    #[test]
    fn explicit_order_wins_over_map_order() {
        let map = enabled(&[("hero", true.into()), ("footer", true.into())]);
        let order = vec![
            ("footer".to_string(), SectionToggle::from("x")),
            ("hero".to_string(), SectionToggle::from("y")),
        ];

        let active = SectionService::resolve(&map, Some(order.as_slice()));
        assert_eq!(active, vec!["footer", "hero"]);
    }

    #[test]
    fn map_order_is_used_without_order_list() {
        let map = enabled(&[
            ("welcome", true.into()),
            ("gallery", false.into()),
            ("hero", "classic".into()),
        ]);

        assert_eq!(SectionService::resolve(&map, None), vec!["welcome", "hero"]);
        assert_eq!(SectionService::resolve(&map, Some(&[][..])), vec!["welcome", "hero"]);
    }

    #[test]
    fn disabled_options_object_is_filtered() {
        let toggle: SectionToggle = serde_json::from_str(r#"{"enabled": false}"#).unwrap();
        let map = enabled(&[("rsvp", toggle), ("footer", SectionToggle::Flag(true))]);

        assert_eq!(SectionService::resolve(&map, None), vec!["footer"]);
    }

    #[test]
    fn empty_input_yields_no_sections() {
        assert!(SectionService::resolve(&IndexMap::new(), None).is_empty());
    }

    #[test]
    fn multi_section_field_is_grouped_once_under_first_active_section() {
        let catalog = FieldCatalog::builder("test")
            .section(SectionDefinition::new("hero", "Hero", ""))
            .section(SectionDefinition::new("footer", "Footer", ""))
            .field(FieldDefinition::new("name", "Name", InputKind::ShortText, ["hero", "footer"], "c"))
            .field(FieldDefinition::new("note", "Note", InputKind::LongText, "footer", "c"))
            .build()
            .unwrap();

        let groups = SectionService::group_fields(&catalog, &["hero".into(), "footer".into()]);
        assert_eq!(groups[0].keys(), vec!["name"]);
        assert_eq!(groups[1].keys(), vec!["note"]);

        let reversed = SectionService::group_fields(&catalog, &["footer".into(), "hero".into()]);
        assert_eq!(reversed[0].keys(), vec!["name", "note"]);
        assert!(reversed[1].fields.is_empty());
    }

    #[test]
    fn unknown_sections_are_skipped() {
        let catalog = FieldCatalog::wedding().expect("wedding catalog");
        let groups = SectionService::group_fields(&catalog, &["confetti".into(), "hero".into()]);

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].name(), "hero");
    }
}
