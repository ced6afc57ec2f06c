#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

const VENDOR_RUNTIME: &str = "\"use strict\";\n\texports._start();\n\t\tconst step = (currTimeStamp) => {\n\t\t};\n";

fn write_script(path: &Path, body: &str) {
    fs::write(path, format!("#!/bin/sh\n{}\n", body)).unwrap();
    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
}

/// Lays out a workspace whose compilers are shell scripts.
fn create_workspace(dir: &Path) -> PathBuf {
    let root = dir.join("workspace");
    let toolchain = dir.join("odin");
    let bin = dir.join("bin");
    fs::create_dir_all(toolchain.join("vendor/wasm/js")).unwrap();
    fs::write(toolchain.join("vendor/wasm/js/runtime.js"), VENDOR_RUNTIME).unwrap();
    fs::create_dir_all(&bin).unwrap();

    write_script(&bin.join("go"), r#"printf server > "$3""#);
    write_script(
        &bin.join("odin"),
        &format!(
            "if [ \"$1\" = root ]; then echo {}; exit 0; fi\nprintf wasm > \"${{3#-out:}}\"",
            toolchain.display()
        ),
    );

    for (project, runtime) in [("multi", "runtime.js"), ("trails", "runtime-2.js")] {
        let public = root.join(project).join("public");
        fs::create_dir_all(&public).unwrap();
        fs::write(
            public.join("index.html"),
            format!("<script src=\"{}\"></script>\n", runtime),
        )
        .unwrap();
    }
    fs::create_dir_all(root.join("public")).unwrap();
    fs::write(root.join("public/index.html"), "<h1>projects</h1>\n").unwrap();
    fs::create_dir_all(root.join("input/public")).unwrap();
    fs::write(root.join("input/public/gamepad.js"), "export function setup() {}\n").unwrap();

    fs::write(
        root.join("stagekit.toml"),
        format!(
            "[toolchain]\nnative = \"{}\"\nwasm = \"{}\"\n",
            bin.join("go").display(),
            bin.join("odin").display()
        ),
    )
    .unwrap();

    root
}

fn get_stagekit_binary() -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.pop();
    path.join("target").join("debug").join("stagekit")
}

#[test]
#[ignore]
fn test_build_command() {
    let temp_dir = TempDir::new().unwrap();
    let root = create_workspace(temp_dir.path());

    let output = Command::new(get_stagekit_binary())
        .arg("--root")
        .arg(&root)
        .arg("build")
        .arg("trails")
        .output()
        .expect("Failed to execute stagekit build");

    assert!(output.status.success());
    let public = root.join("trails/public");
    assert!(public.join("main.exe").is_file());
    assert!(public.join("_main.wasm").is_file());
    assert!(public.join("gamepad-copy.js").is_file());
    assert!(public.join("runtime-2.js").is_file());
}

#[test]
#[ignore]
fn test_publish_command_json() {
    let temp_dir = TempDir::new().unwrap();
    let root = create_workspace(temp_dir.path());

    let output = Command::new(get_stagekit_binary())
        .arg("--root")
        .arg(&root)
        .arg("publish")
        .arg("--json")
        .output()
        .expect("Failed to execute stagekit publish");

    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["staged"].as_array().unwrap().len(), 2);
    assert!(root.join("dist/multi/_main.wasm").is_file());
    assert!(root.join("dist/trails/runtime-2.js").is_file());
    assert!(root.join("dist/main.exe").is_file());
}

#[test]
#[ignore]
fn test_unknown_project_fails() {
    let temp_dir = TempDir::new().unwrap();
    let root = create_workspace(temp_dir.path());

    let output = Command::new(get_stagekit_binary())
        .arg("--root")
        .arg(&root)
        .arg("build")
        .arg("missing")
        .output()
        .expect("Failed to execute stagekit build");

    assert!(!output.status.success());
}

#[test]
#[ignore]
fn test_relative_root_build_and_publish() {
    let temp_dir = TempDir::new().unwrap();
    let root = create_workspace(temp_dir.path());

    let output = Command::new(get_stagekit_binary())
        .current_dir(temp_dir.path())
        .args(["--root", "workspace", "build", "multi"])
        .output()
        .expect("Failed to execute stagekit build");
    assert!(output.status.success());
    assert!(root.join("multi/public/main.exe").is_file());

    let output = Command::new(get_stagekit_binary())
        .current_dir(temp_dir.path())
        .args(["--root", "workspace", "publish"])
        .output()
        .expect("Failed to execute stagekit publish");
    assert!(output.status.success());
    assert!(root.join("dist/main.exe").is_file());
}

#[test]
#[ignore]
fn test_serve_with_default_root() {
    let temp_dir = TempDir::new().unwrap();
    let root = create_workspace(temp_dir.path());
    let public = root.join("multi/public");
    write_script(&public.join("main.exe"), "pwd > served.txt");

    let output = Command::new(get_stagekit_binary())
        .current_dir(&root)
        .args(["serve", "multi"])
        .output()
        .expect("Failed to execute stagekit serve");

    assert!(output.status.success());
    let served = fs::read_to_string(public.join("served.txt")).unwrap();
    assert_eq!(
        fs::canonicalize(served.trim()).unwrap(),
        fs::canonicalize(&public).unwrap()
    );
}

#[test]
#[ignore]
fn test_unsafe_dist_dir_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let root = create_workspace(temp_dir.path());
    let config = fs::read_to_string(root.join("stagekit.toml")).unwrap();
    fs::write(
        root.join("stagekit.toml"),
        format!("[workspace]\ndist_dir = \".\"\n\n{}", config),
    )
    .unwrap();

    let output = Command::new(get_stagekit_binary())
        .current_dir(&root)
        .arg("publish")
        .output()
        .expect("Failed to execute stagekit publish");

    assert!(!output.status.success());
    assert!(root.join("multi/public/index.html").is_file());
}
