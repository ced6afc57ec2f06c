//! Project data model.

use std::path::{Path, PathBuf};

use crate::artifact::{Artifact, ArtifactKind};
use crate::error::{Error, Result};

/// Name of the per-project output directory.
pub const PUBLIC_DIR: &str = "public";
/// Entry document inside the public root.
pub const ENTRY_DOCUMENT: &str = "index.html";

/// A project directory producing a server binary and a wasm module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    /// Identifier as given by the operator, e.g. `multi`.
    pub id: String,
    /// Project directory, as passed to the wasm compiler.
    pub path: PathBuf,
}

impl Project {
    /// Resolves `id` relative to the workspace `root`.
    pub fn new(root: &Path, id: impl Into<String>) -> Self {
        let id = id.into();
        let path = root.join(&id);
        Self { id, path }
    }

    /// The public root holding every build input and output.
    pub fn public_dir(&self) -> PathBuf {
        self.path.join(PUBLIC_DIR)
    }

    pub fn entry_document(&self) -> PathBuf {
        self.public_dir().join(ENTRY_DOCUMENT)
    }

    pub fn artifact(&self, kind: ArtifactKind) -> Artifact {
        Artifact::new(kind, &self.public_dir())
    }

    /// Name of this project's subtree in the distribution directory.
    pub fn stage_name(&self) -> Result<String> {
        stage_name(&self.public_dir())
    }
}

/// Derives the stage name of a public root: its parent directory's name.
pub fn stage_name(public_dir: &Path) -> Result<String> {
    public_dir
        .parent()
        .and_then(|parent| parent.file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| {
            Error::Config(format!(
                "cannot derive a stage name from {}",
                public_dir.display()
            ))
        })
}
