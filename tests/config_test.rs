//! Integration tests for Settings config loading with layered merge semantics.
//!
//! Note: These tests run without a global config (temp directories only),
//! so they effectively test local config merging with defaults.

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use claimdoc::config::{local_config_path, Settings, LOCAL_CONFIG_FILE};

#[test]
fn given_no_local_config_when_load_then_defaults() {
    let project = TempDir::new().unwrap();

    let settings = Settings::load(Some(project.path())).expect("load settings");

    assert_eq!(settings, Settings::default());
}

#[test]
fn given_local_config_when_load_then_overrides_only_given_keys() {
    let project = TempDir::new().unwrap();
    fs::write(
        project.path().join(LOCAL_CONFIG_FILE),
        "[render]\npretty = true\nindent = 4\n",
    )
    .unwrap();

    let settings = Settings::load(Some(project.path())).expect("load settings");

    assert!(settings.render.pretty);
    assert_eq!(settings.render.indent, 4);
    assert!(settings.render.xml_declaration, "unspecified key keeps default");
    assert!(settings.schema.is_none());
}

#[test]
fn given_relative_schema_in_local_config_when_load_then_anchored_at_project_dir() {
    let project = TempDir::new().unwrap();
    fs::write(
        local_config_path(project.path()),
        "schema = \"schemas/claim.toml\"\n",
    )
    .unwrap();

    let settings = Settings::load(Some(project.path())).expect("load settings");

    assert_eq!(
        settings.schema,
        Some(project.path().join("schemas/claim.toml"))
    );
}

#[test]
fn given_absolute_schema_in_local_config_when_load_then_kept_as_is() {
    let project = TempDir::new().unwrap();
    fs::write(
        local_config_path(project.path()),
        "schema = \"/srv/claim.toml\"\n",
    )
    .unwrap();

    let settings = Settings::load(Some(project.path())).expect("load settings");

    assert_eq!(settings.schema, Some(PathBuf::from("/srv/claim.toml")));
}

#[test]
fn given_invalid_local_config_when_load_then_config_error() {
    let project = TempDir::new().unwrap();
    fs::write(
        local_config_path(project.path()),
        "[render]\npretty = \"very\"\n",
    )
    .unwrap();

    let err = Settings::load(Some(project.path())).expect_err("should fail");

    assert!(err.to_string().starts_with("config error:"), "{err}");
}
