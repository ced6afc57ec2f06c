//! Build artifacts tracked inside a project's public root.

use std::path::{Path, PathBuf};

use serde::Serialize;

/// File name of the native dev-server binary.
pub const SERVER_BINARY: &str = "main.exe";
/// File name of the compiled wasm module.
pub const WASM_MODULE: &str = "_main.wasm";

/// The two compiled outputs every project owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    ServerBinary,
    WasmModule,
}

impl ArtifactKind {
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactKind::ServerBinary => "server binary",
            ArtifactKind::WasmModule => "wasm module",
        }
    }

    #[inline]
    pub fn file_name(&self) -> &'static str {
        match self {
            ArtifactKind::ServerBinary => SERVER_BINARY,
            ArtifactKind::WasmModule => WASM_MODULE,
        }
    }
}

/// A named build output located under a project's public root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub kind: ArtifactKind,
    pub path: PathBuf,
}

impl Artifact {
    pub fn new(kind: ArtifactKind, public_dir: &Path) -> Self {
        Self {
            kind,
            path: public_dir.join(kind.file_name()),
        }
    }

    /// Whether anything at all occupies the target path.
    pub fn exists(&self) -> bool {
        crate::staleness::occupied(&self.path)
    }
}
