//! Publish command: aggregate every project into the distribution tree.

use std::time::Instant;

use anyhow::Result;
use owo_colors::OwoColorize;
use stagekit_core::{Interrupt, PublishOptions, Publisher};

use crate::formatting::{
    format_duration, print_key_value, print_section_header, print_success, print_summary_box,
    print_warning,
};

use super::Workspace;

/// Command-line switches of `stagekit publish`.
pub struct PublishFlags {
    pub optimized: bool,
    pub force_native: bool,
    pub build_dev_server: bool,
    pub parallel: Option<usize>,
    pub json: bool,
}

pub fn cmd_publish(
    workspace: &Workspace,
    projects: Vec<String>,
    flags: PublishFlags,
    interrupt: &Interrupt,
) -> Result<()> {
    let start = Instant::now();
    let projects = if projects.is_empty() {
        workspace.config.workspace.projects.clone()
    } else {
        projects
    };
    if projects.is_empty() {
        print_warning("No projects to publish");
        return Ok(());
    }

    let options = PublishOptions {
        optimized: flags.optimized,
        build_dev_server: flags.build_dev_server,
        force_native: flags.force_native,
        jobs: flags.parallel.or(workspace.config.workspace.default_parallel),
    };

    let dist_root = workspace.root.join(&workspace.config.workspace.dist_dir);
    let publisher = Publisher::new(workspace.builder(), dist_root).with_interrupt(interrupt.clone());
    let report = publisher.publish(&projects, &options)?;

    if flags.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_section_header("Published projects");
    for staged in &report.staged {
        print_key_value(&staged.stage_name, &staged.directory.display().to_string());
        for file in &staged.files {
            if let Some(name) = file.file_name() {
                println!("    {}", name.to_string_lossy().bright_black());
            }
        }
    }
    println!();

    let duration = format_duration(start.elapsed().as_secs_f64());
    let count = report.staged.len().to_string();
    print_summary_box(
        "Summary",
        &[
            ("Projects", &count),
            ("Output", &report.dist_root.display().to_string()),
            ("Duration", &duration),
        ],
    );
    println!();

    if let Some(server) = &report.dev_server {
        print_success(&format!("Dev server built at {}", server.display()));
        let binary = server
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        println!("To run dev server:");
        println!("\tcd {}", report.dist_root.display());
        println!("\t./{} -no-watch -no-build", binary);
    }

    Ok(())
}
