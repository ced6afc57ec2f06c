//! Compiler traits for the two artifacts every project produces.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Location of the vendored runtime script relative to the wasm toolchain root.
pub const VENDOR_RUNTIME_PATH: &str = "vendor/wasm/js/runtime.js";

/// Optimization policy for wasm builds.
///
/// Both levels must produce a functionally equivalent module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptLevel {
    /// Debug-friendly, safety checks retained.
    #[default]
    Minimal,
    /// Aggressive optimization with assertions and bounds checks disabled.
    Aggressive,
}

impl OptLevel {
    pub fn from_optimized(optimized: bool) -> Self {
        if optimized {
            OptLevel::Aggressive
        } else {
            OptLevel::Minimal
        }
    }

    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            OptLevel::Minimal => "minimal",
            OptLevel::Aggressive => "aggressive",
        }
    }
}

/// Builds the native server binary.
///
/// Implementations block until the compiler exits and return an error for
/// any non-zero exit status.
pub trait NativeCompiler: Send + Sync {
    fn name(&self) -> &str;

    /// Compiles `source_entry` into `output`, running inside `working_dir`.
    ///
    /// `source_entry` is relative to `working_dir`. A relative `output` is
    /// relative to the calling process's directory.
    fn build_native(&self, working_dir: &Path, source_entry: &Path, output: &Path) -> Result<()>;
}

/// Builds the wasm module and locates the vendored runtime.
pub trait WasmCompiler: Send + Sync {
    fn name(&self) -> &str;

    /// Compiles the project at `project_path` into `output` for 32-bit wasm.
    fn build_wasm(&self, project_path: &Path, output: &Path, opt_level: OptLevel) -> Result<()>;

    /// Returns the toolchain root directory.
    fn root(&self) -> Result<PathBuf>;

    /// Path of the unpatched vendor runtime script.
    fn vendor_runtime(&self) -> Result<PathBuf> {
        Ok(self.root()?.join(VENDOR_RUNTIME_PATH))
    }
}
