//! Rebuild decisions for artifacts.
//!
//! An artifact is stale when the caller forces it or when nothing exists at
//! its target path. Before a stale artifact is rebuilt, whatever occupies the
//! target (a file, a symlink or a whole directory) is removed, so the compiler
//! always writes into a clean location.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::artifact::Artifact;
use crate::error::{Error, Result};

/// Returns true if something (including a dangling symlink) exists at `path`.
pub fn occupied(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

/// Decides whether the artifact at `path` must be rebuilt.
#[inline]
pub fn needs_rebuild(path: &Path, forced: bool) -> bool {
    forced || !occupied(path)
}

/// Removes the file, symlink or directory at `path`. Missing paths are fine.
pub fn clean(path: &Path) -> Result<()> {
    let metadata = match fs::symlink_metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(Error::fs("inspect", path, e)),
    };

    if metadata.is_dir() {
        fs::remove_dir_all(path).map_err(|e| Error::fs("remove directory", path, e))
    } else {
        fs::remove_file(path).map_err(|e| Error::fs("remove file", path, e))
    }
}

/// Resolves staleness for `artifact` and clears its target on a positive
/// decision.
///
/// Returns `true` when the caller must invoke the compiler.
pub fn prepare_rebuild(artifact: &Artifact, forced: bool) -> Result<bool> {
    if !needs_rebuild(&artifact.path, forced) {
        debug!(
            "{} is up to date at {}",
            artifact.kind.as_str(),
            artifact.path.display()
        );
        return Ok(false);
    }

    clean(&artifact.path)?;
    Ok(true)
}
