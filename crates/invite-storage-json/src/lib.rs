use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Utc};
use invite_core::{CoreError, DraftRecord, DraftStorage};
use invite_domain::{EditorMode, TemplateId};
use tracing::{debug, warn};

const DRAFT_EXTENSION: &str = "json";
const TMP_SUFFIX: &str = "tmp";

/// Filesystem-backed JSON persistence for editor drafts, one file per template.
#[derive(Debug, Clone)]
pub struct JsonDraftStorage {
    drafts_dir: PathBuf,
}

impl JsonDraftStorage {
    pub fn new(drafts_dir: PathBuf) -> Result<Self, CoreError> {
        fs::create_dir_all(&drafts_dir)?;
        Ok(Self { drafts_dir })
    }

    pub fn drafts_dir(&self) -> &Path {
        &self.drafts_dir
    }

    pub fn draft_path(&self, id: &TemplateId) -> PathBuf {
        self.drafts_dir
            .join(format!("{}.{}", file_stem(id), DRAFT_EXTENSION))
    }

    /// Summaries of every readable draft, most recently saved first.
    pub fn list_draft_metadata(&self) -> Result<Vec<DraftMetadata>, CoreError> {
        let mut rows = Vec::new();
        for path in self.draft_files()? {
            match load_draft_from_path(&path) {
                Ok(record) => rows.push(DraftMetadata {
                    template_id: record.template_id,
                    path,
                    revision: record.revision,
                    saved_at: record.saved_at,
                    touched_count: record.touched.len(),
                    mode: record.mode,
                }),
                Err(err) => warn!(path = %path.display(), error = %err, "skipping unreadable draft"),
            }
        }
        rows.sort_by(|a, b| b.saved_at.cmp(&a.saved_at));
        Ok(rows)
    }

    fn draft_files(&self) -> Result<Vec<PathBuf>, CoreError> {
        if !self.drafts_dir.exists() {
            return Ok(Vec::new());
        }
        let mut files = Vec::new();
        for entry in fs::read_dir(&self.drafts_dir)? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            if path.extension().and_then(|ext| ext.to_str()) != Some(DRAFT_EXTENSION) {
                continue;
            }
            files.push(path);
        }
        files.sort();
        Ok(files)
    }
}

impl DraftStorage for JsonDraftStorage {
    fn name(&self) -> &str {
        "JsonDraftStorage"
    }

    fn load_draft(&self, id: &TemplateId) -> Result<Option<DraftRecord>, CoreError> {
        let path = self.draft_path(id);
        if !path.exists() {
            return Ok(None);
        }
        let record = load_draft_from_path(&path)?;
        // Hand-edited or renamed files can carry another template's record.
        if record.template_id != *id {
            warn!(
                requested = %id,
                stored = %record.template_id,
                path = %path.display(),
                "draft file belongs to a different template"
            );
            return Ok(None);
        }
        Ok(Some(record))
    }

    fn save_draft(&self, record: &DraftRecord) -> Result<(), CoreError> {
        let path = self.draft_path(&record.template_id);
        save_draft_to_path(record, &path)?;
        debug!(template = %record.template_id, path = %path.display(), "draft written");
        Ok(())
    }

    fn delete_draft(&self, id: &TemplateId) -> Result<(), CoreError> {
        let path = self.draft_path(id);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }

    fn list_drafts(&self) -> Result<Vec<TemplateId>, CoreError> {
        let mut ids = Vec::new();
        for path in self.draft_files()? {
            match load_draft_from_path(&path) {
                Ok(record) => ids.push(record.template_id),
                Err(err) => warn!(path = %path.display(), error = %err, "skipping unreadable draft"),
            }
        }
        ids.sort_by_key(|id| id.to_string());
        Ok(ids)
    }
}

/// Saves a draft record to an arbitrary path on disk.
pub fn save_draft_to_path(record: &DraftRecord, path: &Path) -> Result<(), CoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp = tmp_path(path);
    write_atomic(&tmp, &serialize_draft(record)?)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

/// Loads a draft record from the provided filesystem path.
pub fn load_draft_from_path(path: &Path) -> Result<DraftRecord, CoreError> {
    let data = fs::read_to_string(path)?;
    let record: DraftRecord =
        serde_json::from_str(&data).map_err(|err| CoreError::Serde(err.to_string()))?;
    record.ensure_supported()?;
    Ok(record)
}

#[derive(Debug, Clone)]
pub struct DraftMetadata {
    pub template_id: TemplateId,
    pub path: PathBuf,
    pub revision: u64,
    pub saved_at: Option<DateTime<Utc>>,
    pub touched_count: usize,
    pub mode: EditorMode,
}

/// File stem for a template's draft. Distinct ids always map to distinct stems:
/// numeric and named ids get their own prefix, and every character outside
/// `[a-z0-9-]` is written as `_<hex>_`.
fn file_stem(id: &TemplateId) -> String {
    match id {
        TemplateId::Numeric(id) => format!("n-{id}"),
        TemplateId::Named(name) => format!("s-{}", escape_name(name)),
    }
}

fn escape_name(name: &str) -> String {
    let mut escaped = String::with_capacity(name.len());
    for c in name.chars() {
        match c {
            'a'..='z' | '0'..='9' | '-' => escaped.push(c),
            _ => escaped.push_str(&format!("_{:x}_", c as u32)),
        }
    }
    escaped
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<(), CoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    file.sync_all()?;
    Ok(())
}

fn serialize_draft(record: &DraftRecord) -> Result<String, CoreError> {
    serde_json::to_string_pretty(record).map_err(|err| CoreError::Serde(err.to_string()))
}
