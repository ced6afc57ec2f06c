//! The set of files published from a project's public root.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::artifact::WASM_MODULE;
use crate::error::{Error, Result};
use crate::project::ENTRY_DOCUMENT;

/// Optional stylesheet published next to the entry document.
pub const STYLESHEET: &str = "style.css";

/// Files with fixed names, in publish order.
pub const FIXED_FILES: [&str; 3] = [ENTRY_DOCUMENT, WASM_MODULE, STYLESHEET];

/// Files to copy from one public root into the distribution tree.
///
/// Only files that exist at collection time are listed; fixed names come
/// first, followed by every top-level `*.js` file in name order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistributionManifest {
    pub source_dir: PathBuf,
    pub files: Vec<PathBuf>,
}

impl DistributionManifest {
    pub fn collect(source_dir: &Path) -> Result<Self> {
        let mut files: Vec<PathBuf> = FIXED_FILES
            .iter()
            .map(|name| source_dir.join(name))
            .filter(|path| path.is_file())
            .collect();

        for entry in WalkDir::new(source_dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| Error::fs("list", source_dir, e.into()))?;
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "js") && path.is_file() {
                files.push(path.to_path_buf());
            }
        }

        Ok(Self {
            source_dir: source_dir.to_path_buf(),
            files,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}
