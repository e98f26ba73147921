mod common;

use assert_fs::prelude::*;
use predicates::prelude::*;
use predicates::str::contains;

use common::{garden_template, StudioEnv};

#[test]
fn sections_lists_active_sections_in_order() {
    let env = StudioEnv::new();
    env.cli()
        .arg("sections")
        .arg(garden_template())
        .assert()
        .success()
        .stdout(contains("1. hero - Portada"))
        .stdout(contains("2. story"))
        .stdout(contains("4. footer"))
        .stdout(contains("gallery").not());
}

#[test]
fn set_persists_and_preview_reflects_the_edit() {
    let env = StudioEnv::new();
    env.cli()
        .args(["set"])
        .arg(garden_template())
        .args(["brideName", "Ana"])
        .assert()
        .success()
        .stdout(contains("Updated brideName"));

    env.cli()
        .arg("preview")
        .arg(garden_template())
        .args(["--section", "hero"])
        .assert()
        .success()
        .stdout(contains("\"coupleDisplayName\": \"Carlos & Ana\""));

    env.cli()
        .arg("reset")
        .arg(garden_template())
        .arg("brideName")
        .assert()
        .success();

    env.cli()
        .arg("preview")
        .arg(garden_template())
        .assert()
        .success()
        .stdout(contains("Carlos & Maria"));
}

#[test]
fn unknown_field_is_rejected() {
    let env = StudioEnv::new();
    env.cli()
        .arg("set")
        .arg(garden_template())
        .args(["confetti", "yes"])
        .assert()
        .failure()
        .stderr(contains("Unknown field: confetti"));
}

#[test]
fn fields_marks_edits_and_respects_mode() {
    let env = StudioEnv::new();
    env.cli()
        .arg("set")
        .arg(garden_template())
        .args(["rsvpEnabled", "false"])
        .assert()
        .success();

    env.cli()
        .arg("fields")
        .arg(garden_template())
        .assert()
        .success()
        .stdout(contains("groomName = \"Carlos\" (default)"))
        .stdout(contains("rsvpEnabled").not());

    env.cli()
        .arg("fields")
        .arg(garden_template())
        .args(["--mode", "full"])
        .assert()
        .success()
        .stdout(contains("* rsvpEnabled = false"));
}

#[test]
fn mode_status_and_drafts_report_session_state() {
    let env = StudioEnv::new();
    env.cli()
        .arg("mode")
        .arg(garden_template())
        .arg("full")
        .assert()
        .success()
        .stdout(contains("Mode set to full"));

    env.cli()
        .arg("status")
        .arg(garden_template())
        .assert()
        .success()
        .stdout(contains("Mode           : full"))
        .stdout(contains("revision 1"))
        .stdout(contains(format!("Build          : {}", env!("CARGO_PKG_VERSION"))));

    env.cli()
        .arg("drafts")
        .assert()
        .success()
        .stdout(contains("101"));

    env.cli()
        .arg("discard")
        .arg(garden_template())
        .assert()
        .success();

    env.cli().arg("drafts").assert().success().stdout(contains("(none)"));
}

#[test]
fn invalid_template_file_reports_its_path() {
    let env = StudioEnv::new();
    let broken = assert_fs::NamedTempFile::new("broken.json").unwrap();
    broken.write_str("{ \"name\": \"no id\" }").unwrap();

    env.cli()
        .arg("preview")
        .arg(broken.path())
        .assert()
        .failure()
        .stderr(contains("Invalid template").and(contains("broken.json")));
}

#[test]
fn last_opened_template_is_recorded_in_config() {
    let env = StudioEnv::new();
    env.cli().arg("sections").arg(garden_template()).assert().success();

    let config = std::fs::read_to_string(env.config_dir().join("config").join("config.json"))
        .expect("config written");
    assert!(config.contains("garden_template.json"));
}
