//! Command implementations for the CLI.

mod build;
mod publish;

pub use build::{cmd_build, cmd_serve};
pub use publish::{cmd_publish, PublishFlags};

use std::path::PathBuf;

use anyhow::{Context, Result};
use stagekit_core::{Config, ProjectBuilder};

/// A workspace root together with its loaded configuration.
pub struct Workspace {
    pub root: PathBuf,
    pub config: Config,
}

impl Workspace {
    pub fn load(root: PathBuf) -> Result<Self> {
        if !root.is_dir() {
            anyhow::bail!("Workspace root not found: {}", root.display());
        }
        // Compilers and the dev server run in other directories.
        let root = root
            .canonicalize()
            .with_context(|| format!("Failed to resolve workspace root {}", root.display()))?;
        let config = Config::load(&root)
            .with_context(|| format!("Failed to load configuration from {}", root.display()))?;
        Ok(Self { root, config })
    }

    pub fn builder(&self) -> ProjectBuilder {
        let (native, wasm) = stagekit_toolchains::from_config(&self.config.toolchain);
        ProjectBuilder::from_config(&self.root, &self.config, native, wasm)
    }
}
