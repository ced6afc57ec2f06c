//! Atomic staging of a manifest into the distribution tree.
//!
//! Files are copied into a temporary sibling of the destination, which is
//! then renamed into place. A previous destination is moved aside first and
//! removed after the swap, so the destination is either the old tree or the
//! complete new one.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Error, Result};
use crate::manifest::DistributionManifest;
use crate::staleness::occupied;

fn temp_sibling(parent: &Path, prefix: &str) -> Result<tempfile::TempDir> {
    tempfile::Builder::new()
        .prefix(prefix)
        .tempdir_in(parent)
        .map_err(|e| Error::fs("create staging directory in", parent, e))
}

/// Replaces `dest` with a directory holding exactly the manifest's files.
///
/// Returns the staged file paths under `dest`.
pub fn stage_manifest(manifest: &DistributionManifest, dest: &Path) -> Result<Vec<PathBuf>> {
    let parent = dest
        .parent()
        .ok_or_else(|| Error::Config(format!("cannot stage into {}", dest.display())))?;
    let name = dest
        .file_name()
        .ok_or_else(|| Error::Config(format!("cannot stage into {}", dest.display())))?;

    let staging = temp_sibling(parent, ".stage-")?;
    // Temporary directories are created private; published trees are not.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(staging.path(), fs::Permissions::from_mode(0o755))
            .map_err(|e| Error::fs("set permissions on", staging.path(), e))?;
    }
    let mut staged = Vec::with_capacity(manifest.files.len());

    for src in &manifest.files {
        let Some(file_name) = src.file_name() else {
            continue;
        };
        let tmp_dst = staging.path().join(file_name);
        debug!("    {} -> {}", src.display(), dest.join(file_name).display());
        fs::copy(src, &tmp_dst).map_err(|e| Error::fs("copy", src, e))?;
        staged.push(dest.join(file_name));
    }

    // Dropping `retired` removes the previous tree.
    let retired = temp_sibling(parent, ".retired-")?;
    if occupied(dest) {
        let aside = retired.path().join(name);
        fs::rename(dest, &aside).map_err(|e| Error::fs("move aside", dest, e))?;
    }

    fs::rename(staging.path(), dest).map_err(|e| Error::fs("rename staging directory to", dest, e))?;
    // The staging path no longer exists, so its drop has nothing to remove.
    drop(staging);
    drop(retired);

    Ok(staged)
}
