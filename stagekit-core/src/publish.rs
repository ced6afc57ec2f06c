//! Publishing many projects into one distribution tree.

use std::collections::HashMap;
use std::fs;
use std::path::{Component, Path, PathBuf};

use rayon::prelude::*;
use serde::Serialize;
use tracing::info;

use crate::artifact::SERVER_BINARY;
use crate::builder::{BuildOptions, BuildReport, ProjectBuilder};
use crate::error::{Error, Result};
use crate::interrupt::Interrupt;
use crate::manifest::DistributionManifest;
use crate::project::{Project, ENTRY_DOCUMENT, PUBLIC_DIR};
use crate::staleness::clean;
use crate::staging::stage_manifest;
use crate::toolchain::OptLevel;

/// Publish-wide policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublishOptions {
    pub optimized: bool,
    pub build_dev_server: bool,
    /// Also force the native server binaries to be rebuilt.
    pub force_native: bool,
    /// Number of projects built concurrently. `None` or `Some(1)` builds
    /// sequentially.
    pub jobs: Option<usize>,
}

impl Default for PublishOptions {
    fn default() -> Self {
        Self {
            optimized: true,
            build_dev_server: true,
            force_native: false,
            jobs: None,
        }
    }
}

/// One project's subtree in the distribution directory.
#[derive(Debug, Clone, Serialize)]
pub struct StagedProject {
    pub project: String,
    pub stage_name: String,
    pub directory: PathBuf,
    pub files: Vec<PathBuf>,
}

/// Outcome of a publish run.
#[derive(Debug, Clone, Serialize)]
pub struct PublishReport {
    pub dist_root: PathBuf,
    pub builds: Vec<BuildReport>,
    pub staged: Vec<StagedProject>,
    pub dev_server: Option<PathBuf>,
}

/// Makes `path` absolute and resolves `.` and `..` lexically.
fn normalize(path: &Path) -> Result<PathBuf> {
    let absolute = std::path::absolute(path).map_err(|e| Error::fs("resolve", path, e))?;
    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }
    Ok(normalized)
}

/// Builds a list of projects and assembles their outputs under `dist_root`.
pub struct Publisher {
    builder: ProjectBuilder,
    dist_root: PathBuf,
    interrupt: Interrupt,
}

impl Publisher {
    pub fn new(builder: ProjectBuilder, dist_root: impl Into<PathBuf>) -> Self {
        Self {
            builder,
            dist_root: dist_root.into(),
            interrupt: Interrupt::new(),
        }
    }

    /// Uses `interrupt` to stop between projects.
    pub fn with_interrupt(mut self, interrupt: Interrupt) -> Self {
        self.interrupt = interrupt;
        self
    }

    pub fn dist_root(&self) -> &Path {
        &self.dist_root
    }

    /// Resolves project ids and their stage names, rejecting collisions.
    fn resolve(&self, project_ids: &[String]) -> Result<Vec<(Project, String)>> {
        let mut seen: HashMap<String, String> = HashMap::new();
        let mut resolved = Vec::with_capacity(project_ids.len());

        for id in project_ids {
            let project = self.builder.project(id);
            let stage_name = project.stage_name()?;
            if let Some(first) = seen.insert(stage_name.clone(), id.clone()) {
                return Err(Error::DuplicateStageName {
                    name: stage_name,
                    first,
                    second: id.clone(),
                });
            }
            resolved.push((project, stage_name));
        }

        Ok(resolved)
    }

    /// Rejects a distribution root whose reset would remove the workspace,
    /// its entry document or any project directory.
    fn guard_dist_root(&self, projects: &[(Project, String)]) -> Result<()> {
        let dist = normalize(&self.dist_root)?;
        let unsafe_root = |reason: String| Error::UnsafeDistRoot {
            path: self.dist_root.clone(),
            reason,
        };

        let root = normalize(self.builder.root())?;
        if root.starts_with(&dist) {
            return Err(unsafe_root("it contains the workspace root".to_string()));
        }
        if root.join(PUBLIC_DIR).starts_with(&dist) {
            return Err(unsafe_root(
                "it contains the workspace public folder".to_string(),
            ));
        }
        for (project, _) in projects {
            let path = normalize(&project.path)?;
            if path.starts_with(&dist) || dist.starts_with(&path) {
                return Err(unsafe_root(format!("it overlaps project {}", project.id)));
            }
        }
        Ok(())
    }

    fn build_all(
        &self,
        projects: &[(Project, String)],
        options: &BuildOptions,
        jobs: Option<usize>,
    ) -> Result<Vec<BuildReport>> {
        let build_one = |project: &Project| -> Result<BuildReport> {
            self.interrupt.check()?;
            self.interrupt.classify(self.builder.build(project, options))
        };

        match jobs {
            Some(jobs) if jobs > 1 && projects.len() > 1 => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(jobs)
                    .thread_name(|i| format!("stagekit-worker-{}", i))
                    .build()
                    .map_err(|e| Error::Config(format!("failed to start build pool: {}", e)))?;
                pool.install(|| {
                    projects
                        .par_iter()
                        .map(|(project, _)| build_one(project))
                        .collect()
                })
            }
            _ => projects
                .iter()
                .map(|(project, _)| build_one(project))
                .collect(),
        }
    }

    /// Removes and recreates the distribution root, then copies the
    /// workspace entry document into it.
    fn reset_dist_root(&self) -> Result<()> {
        clean(&self.dist_root)?;
        fs::create_dir_all(&self.dist_root)
            .map_err(|e| Error::fs("create", &self.dist_root, e))?;

        let root_entry = self.builder.root().join(PUBLIC_DIR).join(ENTRY_DOCUMENT);
        if !root_entry.is_file() {
            return Err(Error::MissingEntry(root_entry));
        }
        let dst = self.dist_root.join(ENTRY_DOCUMENT);
        fs::copy(&root_entry, &dst).map_err(|e| Error::fs("copy", &root_entry, e))?;
        Ok(())
    }

    /// Builds every project, stages each into `<dist>/<stage name>/` and
    /// optionally builds the dev server at the distribution root.
    ///
    /// Wasm modules are always rebuilt. Nothing is staged unless every
    /// project built successfully.
    pub fn publish(&self, project_ids: &[String], options: &PublishOptions) -> Result<PublishReport> {
        let projects = self.resolve(project_ids)?;
        self.guard_dist_root(&projects)?;

        let build_options = BuildOptions {
            force_native: options.force_native,
            force_wasm: true,
            opt_level: OptLevel::from_optimized(options.optimized),
        };
        let builds = self.build_all(&projects, &build_options, options.jobs)?;

        self.interrupt.check()?;
        self.reset_dist_root()?;

        let mut staged = Vec::with_capacity(builds.len());
        for ((project, stage_name), build) in projects.iter().zip(&builds) {
            self.interrupt.check()?;

            let manifest = DistributionManifest::collect(&build.public_dir)?;
            let directory = self.dist_root.join(stage_name);
            info!("{}", build.public_dir.display());
            let files = stage_manifest(&manifest, &directory)?;

            staged.push(StagedProject {
                project: project.id.clone(),
                stage_name: stage_name.clone(),
                directory,
                files,
            });
        }

        let dev_server = if options.build_dev_server {
            self.interrupt.check()?;
            let output = self.dist_root.join(SERVER_BINARY);
            info!("building dev server...");
            self.interrupt
                .classify(self.builder.build_dev_server(&output))?;
            Some(output)
        } else {
            None
        };

        Ok(PublishReport {
            dist_root: self.dist_root.clone(),
            builds,
            staged,
            dev_server,
        })
    }
}
