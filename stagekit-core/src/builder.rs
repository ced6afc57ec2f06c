//! Building a single project: artifacts first, then the runtime shim.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use once_cell::sync::OnceCell;
use serde::Serialize;
use tracing::{debug, info};

use crate::artifact::ArtifactKind;
use crate::config::{Config, ExtensionSources};
use crate::error::{Error, Result};
use crate::project::Project;
use crate::runtime::{materialize_runtime, AnchorPolicy, MaterializedRuntime};
use crate::staleness::{clean, prepare_rebuild};
use crate::toolchain::{NativeCompiler, OptLevel, WasmCompiler};
use crate::variant::select_variant;

/// Per-build policy supplied by the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildOptions {
    /// Rebuild the server binary even if it exists.
    pub force_native: bool,
    /// Rebuild the wasm module even if it exists.
    pub force_wasm: bool,
    pub opt_level: OptLevel,
}

/// Outcome of building one project.
#[derive(Debug, Clone, Serialize)]
pub struct BuildReport {
    pub project: String,
    pub public_dir: PathBuf,
    /// Artifacts the compilers were invoked for, in build order.
    pub rebuilt: Vec<ArtifactKind>,
    pub runtime: MaterializedRuntime,
}

/// Builds projects of one workspace with a fixed pair of compilers.
pub struct ProjectBuilder {
    root: PathBuf,
    native: Arc<dyn NativeCompiler>,
    wasm: Arc<dyn WasmCompiler>,
    native_entry: PathBuf,
    extensions: ExtensionSources,
    anchor_policy: AnchorPolicy,
    vendor_runtime: OnceCell<PathBuf>,
}

impl ProjectBuilder {
    pub fn new(
        root: impl Into<PathBuf>,
        native: Arc<dyn NativeCompiler>,
        wasm: Arc<dyn WasmCompiler>,
    ) -> Self {
        Self {
            root: root.into(),
            native,
            wasm,
            native_entry: PathBuf::from("main.go"),
            extensions: ExtensionSources::default(),
            anchor_policy: AnchorPolicy::default(),
            vendor_runtime: OnceCell::new(),
        }
    }

    /// Creates a builder configured from `stagekit.toml` settings.
    pub fn from_config(
        root: impl Into<PathBuf>,
        config: &Config,
        native: Arc<dyn NativeCompiler>,
        wasm: Arc<dyn WasmCompiler>,
    ) -> Self {
        Self::new(root, native, wasm)
            .with_native_entry(&config.workspace.native_entry)
            .with_extensions(config.runtime.extensions.clone())
            .with_anchor_policy(AnchorPolicy::from_strict(config.runtime.strict_anchors))
    }

    pub fn with_native_entry(mut self, entry: impl Into<PathBuf>) -> Self {
        self.native_entry = entry.into();
        self
    }

    pub fn with_extensions(mut self, extensions: ExtensionSources) -> Self {
        self.extensions = extensions;
        self
    }

    pub fn with_anchor_policy(mut self, policy: AnchorPolicy) -> Self {
        self.anchor_policy = policy;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn project(&self, id: &str) -> Project {
        Project::new(&self.root, id)
    }

    /// Resolves the vendor runtime once per builder.
    fn vendor_runtime(&self) -> Result<PathBuf> {
        self.vendor_runtime
            .get_or_try_init(|| self.wasm.vendor_runtime())
            .cloned()
    }

    /// Builds `project` and returns its public root along with what was done.
    ///
    /// # Errors
    ///
    /// Fails if the public root is missing, a compiler exits non-zero, the
    /// entry document cannot be read, or the runtime files cannot be written.
    pub fn build(&self, project: &Project, options: &BuildOptions) -> Result<BuildReport> {
        let public_dir = project.public_dir();
        if !public_dir.is_dir() {
            return Err(Error::MissingPublicDir {
                project: project.id.clone(),
                path: public_dir,
            });
        }

        let mut rebuilt = Vec::with_capacity(2);

        let server = project.artifact(ArtifactKind::ServerBinary);
        if prepare_rebuild(&server, options.force_native)? {
            info!("[{}] building server...", project.id);
            self.native
                .build_native(&self.root, &self.native_entry, &server.path)?;
            rebuilt.push(server.kind);
        }

        let wasm = project.artifact(ArtifactKind::WasmModule);
        if prepare_rebuild(&wasm, options.force_wasm)? {
            info!(
                "[{}] building wasm ({})...",
                project.id,
                options.opt_level.as_str()
            );
            self.wasm
                .build_wasm(&project.path, &wasm.path, options.opt_level)?;
            rebuilt.push(wasm.kind);
        }

        let entry = project.entry_document();
        let document = fs::read_to_string(&entry).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::MissingEntry(entry.clone())
            } else {
                Error::fs("read", &entry, e)
            }
        })?;
        let variant = select_variant(&document);
        debug!("[{}] runtime variant: {}", project.id, variant);

        let extension_source = self
            .extensions
            .for_variant(variant)
            .map(|source| self.root.join(source));
        let runtime = materialize_runtime(
            variant,
            || self.vendor_runtime(),
            extension_source.as_deref(),
            &public_dir,
            self.anchor_policy,
        )?;

        Ok(BuildReport {
            project: project.id.clone(),
            public_dir,
            rebuilt,
            runtime,
        })
    }

    /// Builds the dev server binary at `output`, replacing anything there.
    pub fn build_dev_server(&self, output: &Path) -> Result<()> {
        clean(output)?;
        self.native
            .build_native(&self.root, &self.native_entry, output)
    }
}
