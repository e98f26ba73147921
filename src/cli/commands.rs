use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use invite_core::{
    CoreError, DraftStorage, EditorSession, FieldGroup, ModeFilter, SectionService, SystemClock,
};
use invite_domain::{FieldCatalog, FieldValue, GalleryImage, InputKind};
use invite_storage_json::JsonDraftStorage;
use serde_json::Value;

use super::{output, Commands};
use crate::{
    config::{self, Config},
    template::TemplateDocument,
    utils::build_info,
    StudioError,
};

/// Everything a command needs besides its own arguments.
pub struct CliContext {
    pub config: Config,
    pub catalog: Arc<FieldCatalog>,
    pub storage: Arc<JsonDraftStorage>,
}

impl CliContext {
    pub fn new(
        config: Config,
        drafts_dir: Option<PathBuf>,
        catalog_path: Option<&Path>,
    ) -> Result<Self, StudioError> {
        let catalog = match catalog_path {
            Some(path) => load_catalog(path)?,
            None => FieldCatalog::wedding()?,
        };
        let storage = config::open_draft_storage(&config, drafts_dir)?;
        Ok(Self {
            config,
            catalog: Arc::new(catalog),
            storage: Arc::new(storage),
        })
    }

    pub fn open_session(&self, path: &Path) -> Result<EditorSession, StudioError> {
        let document = TemplateDocument::load(path)?;
        let initial = document.initial_data(&self.catalog);
        let storage: Arc<dyn DraftStorage> = self.storage.clone();
        Ok(EditorSession::open(
            Arc::clone(&self.catalog),
            document.template,
            initial,
            storage,
            Arc::new(SystemClock),
            config::session_options(&self.config),
        ))
    }
}

fn load_catalog(path: &Path) -> Result<FieldCatalog, StudioError> {
    let raw = fs::read_to_string(path)?;
    FieldCatalog::from_json(&raw).map_err(|err| StudioError::InvalidInput(format!(
        "catalog `{}`: {err}",
        path.display()
    )))
}

pub fn dispatch(context: &CliContext, command: Commands) -> Result<(), StudioError> {
    match command {
        Commands::Sections { template } => with_session(context, &template, cmd_sections),
        Commands::Fields { template, mode } => with_session(context, &template, |session| {
            cmd_fields(session, mode.map(ModeFilter::new))
        }),
        Commands::Set {
            template,
            key,
            value,
        } => with_session(context, &template, |session| cmd_set(session, &key, &value)),
        Commands::Reset { template, key } => {
            with_session(context, &template, |session| cmd_reset(session, key.as_deref()))
        }
        Commands::Mode { template, mode } => with_session(context, &template, |session| {
            session.set_mode(mode);
            output::success(format!("Mode set to {mode}"));
            Ok(())
        }),
        Commands::Preview { template, section } => {
            with_session(context, &template, |session| cmd_preview(session, section.as_deref()))
        }
        Commands::Status { template } => with_session(context, &template, cmd_status),
        Commands::Discard { template } => with_session(context, &template, |session| {
            session.discard_draft()?;
            output::success(format!("Discarded draft for template {}", session.template().id));
            Ok(())
        }),
        Commands::Drafts => cmd_drafts(context),
    }
}

// Runs `action` against a fresh session and closes it, forcing the final save.
fn with_session<F>(context: &CliContext, template: &Path, action: F) -> Result<(), StudioError>
where
    F: FnOnce(&mut EditorSession) -> Result<(), StudioError>,
{
    let mut session = context.open_session(template)?;
    let result = action(&mut session);
    let closed = session.close();
    result?;
    closed?;
    Ok(())
}

fn cmd_sections(session: &mut EditorSession) -> Result<(), StudioError> {
    output::section(format!("Sections of {}", session.template().name));
    for (index, name) in session.active_sections().iter().enumerate() {
        let label = session
            .catalog()
            .section(name)
            .map(|section| section.label.as_str())
            .unwrap_or("(not in catalog)");
        println!("  {}. {name} - {label}", index + 1);
    }
    Ok(())
}

fn cmd_fields(session: &mut EditorSession, view: Option<ModeFilter>) -> Result<(), StudioError> {
    let groups: Vec<FieldGroup<'_>> = match view {
        Some(filter) => filter.apply(
            session.catalog(),
            SectionService::group_fields(session.catalog(), session.active_sections()),
        ),
        None => session.fields(),
    };
    let effective = session.effective_data();

    for group in &groups {
        output::section(format!("{} ({})", group.section.label, group.name()));
        if group.fields.is_empty() {
            println!("  (no fields in this mode)");
            continue;
        }
        for field in &group.fields {
            let touched = session.state().is_touched(&field.key);
            let value = effective
                .get(&field.key)
                .map(display_value)
                .unwrap_or_default();
            let value = if touched { value } else { format!("{value} (default)") };
            println!("{}", output::field_row(if touched { "*" } else { "" }, &field.key, &value));
        }
    }
    Ok(())
}

fn cmd_set(session: &mut EditorSession, key: &str, raw: &str) -> Result<(), StudioError> {
    let value = parse_value(session.catalog(), key, raw)?;
    session.update_field(key, value)?;
    output::success(format!("Updated {key}"));
    Ok(())
}

fn cmd_reset(session: &mut EditorSession, key: Option<&str>) -> Result<(), StudioError> {
    match key {
        Some(key) => {
            session.reset_field(key)?;
            output::success(format!("Reset {key} to the template default"));
        }
        None => {
            session.reset_fields();
            output::success("Reset every field to the template defaults");
        }
    }
    Ok(())
}

fn cmd_preview(session: &mut EditorSession, section: Option<&str>) -> Result<(), StudioError> {
    let props = session.render_props();
    let json = match section {
        Some(name) => props
            .section(name)
            .map(|props| Value::Object(props.clone()))
            .ok_or_else(|| StudioError::InvalidInput(format!("section `{name}` is not active")))?,
        None => props.to_json(),
    };
    let pretty = serde_json::to_string_pretty(&json).map_err(CoreError::from)?;
    println!("{pretty}");
    Ok(())
}

fn cmd_status(session: &mut EditorSession) -> Result<(), StudioError> {
    let counts = session.counts();
    let meta = build_info::current();
    output::section(format!("Template {} ({})", session.template().name, session.template().id));
    output::info(format!("Mode           : {}", session.mode()));
    output::info(format!("Sections       : {}", counts.active_sections));
    output::info(format!(
        "Fields         : {} visible, {} edited",
        counts.total_fields, counts.touched_fields
    ));
    output::info(format!(
        "Draft          : {}",
        if session.was_restored() {
            format!("revision {}", session.revision())
        } else {
            "none".to_string()
        }
    ));
    output::info(format!("Sync           : {:?}", session.status()));
    if let Some(err) = session.last_error() {
        output::warning(format!("Last save failed: {err}"));
    }
    output::info(format!("Build          : {}", meta.summary()));
    output::info(format!("Built at       : {} for {}", meta.timestamp, meta.target));
    Ok(())
}

fn cmd_drafts(context: &CliContext) -> Result<(), StudioError> {
    let drafts = context.storage.list_draft_metadata()?;
    output::section(format!("Drafts in {}", context.storage.drafts_dir().display()));
    if drafts.is_empty() {
        println!("  (none)");
        return Ok(());
    }
    for draft in drafts {
        let saved = draft
            .saved_at
            .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  {:<20} rev {:<4} {:>3} edited  {}  {}",
            draft.template_id.to_string(),
            draft.revision,
            draft.touched_count,
            draft.mode,
            saved
        );
    }
    Ok(())
}

/// Interprets a command-line string as a value for `key`.
pub fn parse_value(catalog: &FieldCatalog, key: &str, raw: &str) -> Result<FieldValue, StudioError> {
    let field = catalog
        .field(key)
        .ok_or_else(|| CoreError::UnknownField(key.to_string()))?;
    if field.input_kind == InputKind::MultiImage {
        // User-added images get fresh ids; positional ids belong to template defaults.
        let images = raw
            .split(',')
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map(GalleryImage::new)
            .collect::<Vec<_>>();
        return Ok(FieldValue::Images(images));
    }
    FieldValue::from_json(field.input_kind, &Value::String(raw.to_string())).ok_or_else(|| {
        StudioError::InvalidInput(format!("`{raw}` is not a valid {} value for {key}", field.input_kind))
    })
}

fn display_value(value: &FieldValue) -> String {
    match value {
        FieldValue::Toggle(flag) => flag.to_string(),
        FieldValue::Text(text) if text.is_empty() => "\"\"".to_string(),
        FieldValue::Text(text) => format!("{text:?}"),
        FieldValue::Images(images) => format!("{} image(s)", images.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_value_follows_input_kind() {
        let catalog = FieldCatalog::wedding().expect("wedding catalog");

        assert_eq!(parse_value(&catalog, "groomName", "Luis").unwrap(), FieldValue::text("Luis"));
        assert_eq!(parse_value(&catalog, "rsvpEnabled", "off").unwrap(), FieldValue::Toggle(false));
        let images = parse_value(&catalog, "galleryImages", "a.jpg, b.jpg,").unwrap();
        let images = images.as_images().expect("image list");
        assert_eq!(images.len(), 2);
        assert_eq!(images[1].url, "b.jpg");

        assert!(matches!(
            parse_value(&catalog, "rsvpEnabled", "perhaps"),
            Err(StudioError::InvalidInput(_))
        ));
        assert!(matches!(
            parse_value(&catalog, "confetti", "x"),
            Err(StudioError::Core(CoreError::UnknownField(_)))
        ));
    }

    #[test]
    fn user_images_do_not_reuse_template_ids() {
        let catalog = FieldCatalog::wedding().expect("wedding catalog");
        let value = parse_value(&catalog, "galleryImages", "a.jpg,b.jpg").unwrap();
        let images = value.as_images().expect("image list");

        assert!(images.iter().all(|image| !image.id.starts_with("default-")));
        assert_ne!(images[0].id, images[1].id);
    }

    #[test]
    fn display_value_is_compact() {
        assert_eq!(display_value(&FieldValue::Toggle(true)), "true");
        assert_eq!(display_value(&FieldValue::text("Ana")), "\"Ana\"");
        assert_eq!(display_value(&FieldValue::Images(Vec::new())), "0 image(s)");
    }
}
