use std::fs;
use std::path::{Path, PathBuf};

use stagekit_core::config::{Config, CONFIG_FILE};
use stagekit_core::error::Error;
use stagekit_core::variant::RuntimeVariant;
use tempfile::TempDir;

#[test]
fn test_missing_config_file_yields_defaults() {
    let temp = TempDir::new().unwrap();
    let config = Config::load(temp.path()).unwrap();

    assert_eq!(config, Config::default());
    assert_eq!(config.workspace.dist_dir, PathBuf::from("dist"));
    assert_eq!(config.workspace.projects, vec!["multi", "trails"]);
    assert_eq!(config.workspace.native_entry, PathBuf::from("main.go"));
    assert_eq!(config.toolchain.native, "go");
    assert_eq!(config.toolchain.wasm, "odin");
    assert!(!config.runtime.strict_anchors);
    assert_eq!(
        config.runtime.extensions.for_variant(RuntimeVariant::Gamepad),
        Some(Path::new("input/public/gamepad.js"))
    );
    assert_eq!(
        config.runtime.extensions.for_variant(RuntimeVariant::MousePosition),
        Some(Path::new("synth_keyboard/public/mouse-pos.js"))
    );
    assert_eq!(config.runtime.extensions.for_variant(RuntimeVariant::Default), None);
}

#[test]
fn test_partial_config_keeps_other_defaults() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join(CONFIG_FILE),
        r#"
[workspace]
projects = ["trails"]
default_parallel = 4

[runtime]
strict_anchors = true

[runtime.extensions]
gamepad = "shared/gamepad.js"
"#,
    )
    .unwrap();

    let config = Config::load(temp.path()).unwrap();

    assert_eq!(config.workspace.projects, vec!["trails"]);
    assert_eq!(config.workspace.default_parallel, Some(4));
    assert_eq!(config.workspace.dist_dir, PathBuf::from("dist"));
    assert_eq!(config.toolchain.wasm, "odin");
    assert!(config.runtime.strict_anchors);
    assert_eq!(
        config.runtime.extensions.gamepad,
        PathBuf::from("shared/gamepad.js")
    );
    assert_eq!(
        config.runtime.extensions.mouse_position,
        PathBuf::from("synth_keyboard/public/mouse-pos.js")
    );
}

#[test]
fn test_malformed_config_reports_path() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join(CONFIG_FILE);
    fs::write(&path, "[workspace\nprojects = 3").unwrap();

    match Config::load(temp.path()) {
        Err(Error::Toml { path: reported, .. }) => assert_eq!(reported, path),
        other => panic!("expected Toml error, got {:?}", other),
    }
}

#[test]
fn test_empty_toolchain_name_is_rejected() {
    let result = Config::parse("[toolchain]\nwasm = \"  \"\n", Path::new(CONFIG_FILE));
    assert!(matches!(result, Err(Error::Config(_))));
}

#[test]
fn test_zero_parallelism_is_rejected() {
    let result = Config::parse("[workspace]\ndefault_parallel = 0\n", Path::new(CONFIG_FILE));
    assert!(matches!(result, Err(Error::Config(_))));
}

#[test]
fn test_dist_dir_must_stay_inside_workspace() {
    for dist_dir in ["", ".", "./dist", "..", "../dist", "dist/../..", "/tmp/dist"] {
        let content = format!("[workspace]\ndist_dir = \"{}\"\n", dist_dir);
        let result = Config::parse(&content, Path::new(CONFIG_FILE));
        assert!(
            matches!(result, Err(Error::Config(_))),
            "dist_dir {:?} should be rejected",
            dist_dir
        );
    }
}

#[test]
fn test_nested_dist_dir_is_accepted() {
    let config = Config::parse("[workspace]\ndist_dir = \"out/site\"\n", Path::new(CONFIG_FILE))
        .unwrap();
    assert_eq!(config.workspace.dist_dir, PathBuf::from("out/site"));
}
