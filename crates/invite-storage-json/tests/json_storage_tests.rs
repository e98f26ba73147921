use std::{fs, sync::Arc};

use indexmap::IndexMap;
use invite_core::{DraftRecord, DraftStorage, EditorSession, InitialData, ManualClock, SessionOptions};
use invite_domain::{EditorMode, FieldCatalog, FieldValue, TemplateDefinition, TemplateId};
use invite_storage_json::{load_draft_from_path, JsonDraftStorage};
use serde_json::json;
use tempfile::tempdir;

fn record(id: impl Into<TemplateId>) -> DraftRecord {
    let mut record = DraftRecord::new(id.into());
    let mut values = IndexMap::new();
    values.insert("groomName".to_string(), FieldValue::text("Luis"));
    values.insert("rsvpEnabled".to_string(), FieldValue::Toggle(false));
    record.working_values = values;
    record.touched = vec!["groomName".into(), "rsvpEnabled".into()];
    record.mode = EditorMode::Full;
    record
}

#[test]
fn json_storage_can_save_and_load_draft() {
    let dir = tempdir().expect("tempdir");
    let storage = JsonDraftStorage::new(dir.path().join("drafts")).expect("create storage");

    let draft = record(101);
    storage.save_draft(&draft).expect("save draft");
    let loaded = storage
        .load_draft(&TemplateId::from(101))
        .expect("load draft")
        .expect("draft present");

    assert_eq!(loaded, draft);
    let path = storage.draft_path(&TemplateId::from(101));
    assert_eq!(path.extension().and_then(|ext| ext.to_str()), Some("json"));
    assert!(path.exists());
    assert!(!path.with_extension("json.tmp").exists());
}

#[test]
fn json_storage_returns_none_for_missing_draft() {
    let dir = tempdir().expect("tempdir");
    let storage = JsonDraftStorage::new(dir.path().to_path_buf()).expect("create storage");

    assert!(storage.load_draft(&TemplateId::from("nope")).unwrap().is_none());
    storage.delete_draft(&TemplateId::from("nope")).expect("delete is idempotent");
}

#[test]
fn json_storage_lists_and_deletes_drafts() {
    let dir = tempdir().expect("tempdir");
    let storage = JsonDraftStorage::new(dir.path().to_path_buf()).expect("create storage");

    storage.save_draft(&record("rustic-barn")).unwrap();
    storage.save_draft(&record(7)).unwrap();
    fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

    let ids = storage.list_drafts().expect("list drafts");
    assert_eq!(ids, vec![TemplateId::from(7), TemplateId::from("rustic-barn")]);

    storage.delete_draft(&TemplateId::from(7)).unwrap();
    assert_eq!(storage.list_drafts().unwrap(), vec![TemplateId::from("rustic-barn")]);
}

#[test]
fn json_storage_skips_corrupt_files_when_listing() {
    let dir = tempdir().expect("tempdir");
    let storage = JsonDraftStorage::new(dir.path().to_path_buf()).expect("create storage");
    storage.save_draft(&record(1)).unwrap();
    fs::write(dir.path().join("broken.json"), "{ not json").unwrap();

    assert_eq!(storage.list_drafts().unwrap(), vec![TemplateId::from(1)]);
    let metadata = storage.list_draft_metadata().unwrap();
    assert_eq!(metadata.len(), 1);
    assert_eq!(metadata[0].touched_count, 2);
    assert_eq!(metadata[0].mode, EditorMode::Full);
}

#[test]
fn json_storage_reports_corrupt_draft_on_load() {
    let dir = tempdir().expect("tempdir");
    let storage = JsonDraftStorage::new(dir.path().to_path_buf()).expect("create storage");
    fs::write(storage.draft_path(&TemplateId::from(5)), "{ not json").unwrap();

    assert!(storage.load_draft(&TemplateId::from(5)).is_err());
}

#[test]
fn json_storage_loads_legacy_records_without_revision() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("42.json");
    fs::write(
        &path,
        json!({
            "templateId": 42,
            "workingValues": {"brideName": "Ana"},
            "touched": ["brideName"]
        })
        .to_string(),
    )
    .unwrap();

    let record = load_draft_from_path(&path).expect("legacy record");
    assert_eq!(record.template_id, TemplateId::from(42));
    assert_eq!(record.revision, 0);
    assert_eq!(record.saved_at, None);
    assert_eq!(record.mode, EditorMode::Basic);
    assert_eq!(record.working_values["brideName"], FieldValue::text("Ana"));
}

#[test]
fn json_storage_rejects_newer_schema() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("9.json");
    fs::write(&path, json!({"schemaVersion": 99, "templateId": 9}).to_string()).unwrap();

    assert!(load_draft_from_path(&path).is_err());
}

#[test]
fn json_storage_keeps_lookalike_templates_apart() {
    let dir = tempdir().expect("tempdir");
    let storage = JsonDraftStorage::new(dir.path().to_path_buf()).expect("create storage");
    let accented = TemplateId::from("Jardín");
    let plain = TemplateId::from("jard_n");

    let mut first = record(accented.clone());
    first.working_values.insert("groomName".into(), FieldValue::text("A"));
    let mut second = record(plain.clone());
    second.working_values.insert("groomName".into(), FieldValue::text("B"));

    storage.save_draft(&first).unwrap();
    storage.save_draft(&second).unwrap();
    assert_ne!(storage.draft_path(&accented), storage.draft_path(&plain));
    assert_eq!(storage.load_draft(&accented).unwrap(), Some(first.clone()));
    assert_eq!(storage.load_draft(&plain).unwrap(), Some(second));

    storage.delete_draft(&plain).unwrap();
    assert_eq!(storage.load_draft(&accented).unwrap(), Some(first));
    assert!(storage.load_draft(&plain).unwrap().is_none());
}

#[test]
fn json_storage_separates_numeric_and_named_ids() {
    let dir = tempdir().expect("tempdir");
    let storage = JsonDraftStorage::new(dir.path().to_path_buf()).expect("create storage");

    storage.save_draft(&record(7)).unwrap();
    assert!(storage.load_draft(&TemplateId::from("7")).unwrap().is_none());

    storage.save_draft(&record("7")).unwrap();
    storage.delete_draft(&TemplateId::from("7")).unwrap();
    assert!(storage.load_draft(&TemplateId::from(7)).unwrap().is_some());
}

#[test]
fn json_storage_ignores_records_filed_under_another_id() {
    let dir = tempdir().expect("tempdir");
    let storage = JsonDraftStorage::new(dir.path().to_path_buf()).expect("create storage");
    storage.save_draft(&record(1)).unwrap();
    fs::copy(
        storage.draft_path(&TemplateId::from(1)),
        storage.draft_path(&TemplateId::from(2)),
    )
    .unwrap();

    assert!(storage.load_draft(&TemplateId::from(2)).unwrap().is_none());
}

#[test]
fn session_round_trips_through_json_storage() {
    let dir = tempdir().expect("tempdir");
    let storage: Arc<dyn DraftStorage> =
        Arc::new(JsonDraftStorage::new(dir.path().to_path_buf()).expect("create storage"));
    let catalog = Arc::new(FieldCatalog::wedding().expect("wedding catalog"));
    let template = TemplateDefinition::new(3, "Clásica")
        .with_section("hero", true)
        .with_defaults("hero", json!({"groomName": "Carlos", "brideName": "Maria"}));
    let clock = ManualClock::default();

    let mut session = EditorSession::open(
        Arc::clone(&catalog),
        template.clone(),
        InitialData::new(),
        Arc::clone(&storage),
        Arc::new(clock.clone()),
        SessionOptions::default(),
    );
    session.update_field("brideName", "Ana").unwrap();
    session.set_mode(EditorMode::Full);
    session.close().expect("close flushes");

    let reopened = EditorSession::open(
        catalog,
        template,
        InitialData::new(),
        storage,
        Arc::new(clock),
        SessionOptions::default(),
    );
    assert!(reopened.was_restored());
    assert_eq!(reopened.mode(), EditorMode::Full);
    assert_eq!(
        reopened.render_props().prop("hero", "coupleDisplayName"),
        Some(&json!("Carlos & Ana"))
    );
}
