//! Single-project build and dev-server commands.

use std::time::Instant;

use anyhow::Result;
use stagekit_core::{
    run_dev_server, ArtifactKind, BuildOptions, Interrupt, OptLevel, ServeOutcome,
};

use crate::formatting::{
    format_duration, print_info, print_key_value, print_section_header, print_success,
    print_warning,
};

use super::Workspace;

pub fn cmd_build(
    workspace: &Workspace,
    project_id: &str,
    force_native: bool,
    force_wasm: bool,
    release: bool,
    run: bool,
    interrupt: &Interrupt,
) -> Result<()> {
    let start = Instant::now();
    let builder = workspace.builder();
    let project = builder.project(project_id);

    let options = BuildOptions {
        force_native,
        force_wasm,
        opt_level: OptLevel::from_optimized(release),
    };
    let report = interrupt.classify(builder.build(&project, &options))?;

    print_section_header(&format!("Built {}", report.project));
    print_key_value("Public", &report.public_dir.display().to_string());
    if report.rebuilt.is_empty() {
        print_key_value("Artifacts", "up to date");
    } else {
        let rebuilt: Vec<&str> = report.rebuilt.iter().map(|k| k.as_str()).collect();
        print_key_value("Rebuilt", &rebuilt.join(", "));
    }
    print_key_value("Runtime", report.runtime.variant.as_str());
    for file in &report.runtime.written {
        print_info(&format!("wrote {}", file.display()));
    }
    for anchor in &report.runtime.missing_anchors {
        print_warning(&format!("runtime anchor not found: {}", anchor));
    }
    print_success(&format!(
        "Done in {}",
        format_duration(start.elapsed().as_secs_f64())
    ));

    if run {
        println!();
        cmd_serve(workspace, project_id, &[], interrupt)?;
    }

    Ok(())
}

pub fn cmd_serve(
    workspace: &Workspace,
    project_id: &str,
    args: &[String],
    interrupt: &Interrupt,
) -> Result<()> {
    let project = workspace.builder().project(project_id);
    let binary = project.artifact(ArtifactKind::ServerBinary).path;

    println!("  Press Ctrl+C to stop");
    match run_dev_server(&binary, &project.public_dir(), args, interrupt)? {
        ServeOutcome::Interrupted => print_warning("Server stopped"),
        ServeOutcome::Exited => print_success("Server exited"),
    }

    Ok(())
}
