//! The field catalog: every customizable field of a product domain, the sections
//! they live in, the basic-mode allow-list, where each field finds its template
//! default, and how flat field values are reshaped into per-section render props.
//!
//! A catalog is an ordinary value. Build one per product domain at startup (in code
//! through [`CatalogBuilder`] or from JSON) and hand it to every editing session.

use std::{
    collections::{HashMap, HashSet},
    fmt,
};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{field::FieldDefinition, section::SectionDefinition};

/// Points at a template-authored value: a section's default props plus a JSON pointer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropAccessor {
    pub section: String,
    pub pointer: String,
}

impl PropAccessor {
    pub fn new(section: impl Into<String>, pointer: impl Into<String>) -> Self {
        Self {
            section: section.into(),
            pointer: pointer.into(),
        }
    }
}

/// One fixed slot of a repeated collection: item prop name to field key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotSpec {
    pub slot: u32,
    pub fields: IndexMap<String, String>,
}

/// Render-facing props that are not a plain copy of one grouped field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "camelCase")]
pub enum PropRule {
    /// Concatenates the non-blank text of `fields` with `separator`.
    Join {
        prop: String,
        fields: Vec<String>,
        separator: String,
    },
    /// Assembles fixed slots into an array, keeping only slots whose `primary`
    /// item prop is non-blank.
    Slots {
        prop: String,
        primary: String,
        slots: Vec<SlotSpec>,
    },
    /// Emits a field's value under a second section that also needs it.
    Copy { prop: String, field: String },
}

impl PropRule {
    pub fn prop(&self) -> &str {
        match self {
            PropRule::Join { prop, .. } | PropRule::Slots { prop, .. } | PropRule::Copy { prop, .. } => {
                prop
            }
        }
    }

    /// Field keys the rule reads.
    pub fn field_keys(&self) -> Vec<&str> {
        match self {
            PropRule::Join { fields, .. } => fields.iter().map(String::as_str).collect(),
            PropRule::Slots { slots, .. } => slots
                .iter()
                .flat_map(|slot| slot.fields.values().map(String::as_str))
                .collect(),
            PropRule::Copy { field, .. } => vec![field.as_str()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Inconsistencies detected while assembling a catalog.
pub enum CatalogError {
    DuplicateField(String),
    DuplicateSection(String),
    EmptySectionSpan(String),
    UnknownSection { field: String, section: String },
    UnknownField { context: &'static str, key: String },
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::DuplicateField(key) => write!(f, "field `{key}` is defined twice"),
            CatalogError::DuplicateSection(name) => write!(f, "section `{name}` is defined twice"),
            CatalogError::EmptySectionSpan(key) => {
                write!(f, "field `{key}` does not name any section")
            }
            CatalogError::UnknownSection { field, section } => {
                write!(f, "field `{field}` references unknown section `{section}`")
            }
            CatalogError::UnknownField { context, key } => {
                write!(f, "{context} references unknown field `{key}`")
            }
        }
    }
}

impl std::error::Error for CatalogError {}

/// Serialized shape of a catalog.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogSpec {
    pub domain: String,
    pub sections: Vec<SectionDefinition>,
    pub fields: Vec<FieldDefinition>,
    #[serde(default)]
    pub basic_fields: Vec<String>,
    #[serde(default)]
    pub default_sources: IndexMap<String, Vec<PropAccessor>>,
    #[serde(default)]
    pub render_rules: IndexMap<String, Vec<PropRule>>,
}

/// Validated, indexed field catalog for one product domain.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "CatalogSpec", into = "CatalogSpec")]
pub struct FieldCatalog {
    spec: CatalogSpec,
    field_index: HashMap<String, usize>,
    section_index: HashMap<String, usize>,
    basic: HashSet<String>,
}

impl FieldCatalog {
    pub fn builder(domain: impl Into<String>) -> CatalogBuilder {
        CatalogBuilder {
            spec: CatalogSpec {
                domain: domain.into(),
                ..CatalogSpec::default()
            },
        }
    }

    pub fn from_spec(spec: CatalogSpec) -> Result<Self, CatalogError> {
        let mut section_index = HashMap::new();
        for (position, section) in spec.sections.iter().enumerate() {
            if section_index.insert(section.name.clone(), position).is_some() {
                return Err(CatalogError::DuplicateSection(section.name.clone()));
            }
        }

        let mut field_index = HashMap::new();
        for (position, field) in spec.fields.iter().enumerate() {
            if field_index.insert(field.key.clone(), position).is_some() {
                return Err(CatalogError::DuplicateField(field.key.clone()));
            }
            if field.section.is_empty() {
                return Err(CatalogError::EmptySectionSpan(field.key.clone()));
            }
            if let Some(section) = field
                .section
                .names()
                .iter()
                .find(|name| !section_index.contains_key(name.as_str()))
            {
                return Err(CatalogError::UnknownSection {
                    field: field.key.clone(),
                    section: section.clone(),
                });
            }
        }

        let known = |context: &'static str, key: &str| {
            if field_index.contains_key(key) {
                Ok(())
            } else {
                Err(CatalogError::UnknownField {
                    context,
                    key: key.to_string(),
                })
            }
        };
        for key in &spec.basic_fields {
            known("basic field list", key)?;
        }
        for key in spec.default_sources.keys() {
            known("default source table", key)?;
        }
        for (section, rules) in &spec.render_rules {
            if !section_index.contains_key(section) {
                return Err(CatalogError::UnknownSection {
                    field: rules.first().map(|rule| rule.prop().to_string()).unwrap_or_default(),
                    section: section.clone(),
                });
            }
            for rule in rules {
                for key in rule.field_keys() {
                    known("render rule", key)?;
                }
            }
        }

        let basic = spec.basic_fields.iter().cloned().collect();
        Ok(Self {
            spec,
            field_index,
            section_index,
            basic,
        })
    }

    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    pub fn domain(&self) -> &str {
        &self.spec.domain
    }

    pub fn sections(&self) -> &[SectionDefinition] {
        &self.spec.sections
    }

    pub fn section(&self, name: &str) -> Option<&SectionDefinition> {
        self.section_index
            .get(name)
            .map(|position| &self.spec.sections[*position])
    }

    pub fn fields(&self) -> &[FieldDefinition] {
        &self.spec.fields
    }

    pub fn field(&self, key: &str) -> Option<&FieldDefinition> {
        self.field_index
            .get(key)
            .map(|position| &self.spec.fields[*position])
    }

    pub fn contains(&self, key: &str) -> bool {
        self.field_index.contains_key(key)
    }

    /// Fields declared under `section`, in catalog order.
    pub fn fields_in<'a>(&'a self, section: &'a str) -> impl Iterator<Item = &'a FieldDefinition> + 'a {
        self.spec
            .fields
            .iter()
            .filter(move |field| field.belongs_to(section))
    }

    pub fn is_basic(&self, key: &str) -> bool {
        self.basic.contains(key)
    }

    pub fn basic_fields(&self) -> &[String] {
        &self.spec.basic_fields
    }

    /// Ordered accessors consulted for a field's template default.
    ///
    /// Without an explicit table entry a field reads `/<key>` from each of its
    /// sections' default props, in declaration order.
    pub fn default_sources(&self, key: &str) -> Vec<PropAccessor> {
        if let Some(sources) = self.spec.default_sources.get(key) {
            return sources.clone();
        }
        self.field(key)
            .map(|field| {
                field
                    .section
                    .names()
                    .iter()
                    .map(|section| PropAccessor::new(section.clone(), format!("/{key}")))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn render_rules(&self, section: &str) -> &[PropRule] {
        self.spec
            .render_rules
            .get(section)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn spec(&self) -> &CatalogSpec {
        &self.spec
    }
}

impl TryFrom<CatalogSpec> for FieldCatalog {
    type Error = CatalogError;

    fn try_from(spec: CatalogSpec) -> Result<Self, Self::Error> {
        FieldCatalog::from_spec(spec)
    }
}

impl From<FieldCatalog> for CatalogSpec {
    fn from(catalog: FieldCatalog) -> Self {
        catalog.spec
    }
}

/// Incrementally assembles a [`FieldCatalog`].
#[derive(Debug, Clone)]
pub struct CatalogBuilder {
    spec: CatalogSpec,
}

impl CatalogBuilder {
    pub fn section(mut self, section: SectionDefinition) -> Self {
        self.spec.sections.push(section);
        self
    }

    pub fn field(mut self, field: FieldDefinition) -> Self {
        self.spec.fields.push(field);
        self
    }

    pub fn basic<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.spec.basic_fields.extend(keys.into_iter().map(Into::into));
        self
    }

    pub fn default_source(mut self, key: impl Into<String>, accessor: PropAccessor) -> Self {
        self.spec
            .default_sources
            .entry(key.into())
            .or_default()
            .push(accessor);
        self
    }

    pub fn rule(mut self, section: impl Into<String>, rule: PropRule) -> Self {
        self.spec
            .render_rules
            .entry(section.into())
            .or_default()
            .push(rule);
        self
    }

    pub fn build(self) -> Result<FieldCatalog, CatalogError> {
        FieldCatalog::from_spec(self.spec)
    }
}
