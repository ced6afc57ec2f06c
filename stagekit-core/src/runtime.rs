//! Materialization of runtime shim files into a project's public root.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::patch::{apply_hooks, PatchHook};
use crate::variant::RuntimeVariant;

/// An extension script that a patched runtime imports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtensionModule {
    /// Namespace the injected statements bind the module to.
    pub namespace: &'static str,
    /// File name of the module copy inside the public root.
    pub file_name: &'static str,
}

impl ExtensionModule {
    pub fn for_variant(variant: RuntimeVariant) -> Option<Self> {
        match variant {
            RuntimeVariant::Default => None,
            RuntimeVariant::Gamepad => Some(Self {
                namespace: "gamepad",
                file_name: "gamepad-copy.js",
            }),
            RuntimeVariant::MousePosition => Some(Self {
                namespace: "mouse_pos",
                file_name: "mouse-pos-copy.js",
            }),
        }
    }

    pub fn hooks(&self) -> Vec<PatchHook> {
        PatchHook::for_module(self.namespace, self.file_name)
    }
}

/// What to do when the vendor script lacks an anchor line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnchorPolicy {
    /// Skip the injection and log a warning.
    #[default]
    Skip,
    /// Refuse to write the patched runtime.
    Strict,
}

impl AnchorPolicy {
    pub fn from_strict(strict: bool) -> Self {
        if strict {
            AnchorPolicy::Strict
        } else {
            AnchorPolicy::Skip
        }
    }
}

/// Files produced by one materialization.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MaterializedRuntime {
    pub variant: RuntimeVariant,
    /// Files created by this call. Empty when everything already existed.
    pub written: Vec<PathBuf>,
    /// Anchors that were skipped while patching.
    pub missing_anchors: Vec<String>,
}

/// Writes `contents` to `path` unless a file is already there.
///
/// Returns `false` without touching the file when it already exists.
fn write_new(path: &Path, contents: &[u8]) -> Result<bool> {
    let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => return Ok(false),
        Err(e) => return Err(Error::fs("create", path, e)),
    };
    file.write_all(contents)
        .map_err(|e| Error::fs("write", path, e))?;
    Ok(true)
}

fn read_script(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|e| Error::fs("read", path, e))
}

/// Places the runtime files for `variant` into `dest_dir`.
///
/// The default variant gets a verbatim copy of the vendor script. Extended
/// variants get a copy of their extension module plus a patched vendor
/// script. Existing files are never overwritten, and `vendor_script` is only
/// called when a runtime file actually has to be written.
pub fn materialize_runtime<F>(
    variant: RuntimeVariant,
    vendor_script: F,
    extension_source: Option<&Path>,
    dest_dir: &Path,
    policy: AnchorPolicy,
) -> Result<MaterializedRuntime>
where
    F: FnOnce() -> Result<PathBuf>,
{
    let mut report = MaterializedRuntime {
        variant,
        ..Default::default()
    };
    let runtime_dst = dest_dir.join(variant.runtime_file());

    let Some(module) = ExtensionModule::for_variant(variant) else {
        if !runtime_dst.is_file() {
            let vendor = vendor_script()?;
            debug!("Copying {} -> {}", vendor.display(), runtime_dst.display());
            if write_new(&runtime_dst, &read_script(&vendor)?)? {
                report.written.push(runtime_dst);
            }
        }
        return Ok(report);
    };

    let module_dst = dest_dir.join(module.file_name);
    if !module_dst.is_file() {
        let source = extension_source.ok_or_else(|| {
            Error::Config(format!(
                "no extension script configured for the {} runtime",
                variant
            ))
        })?;
        debug!("Copying {} -> {}", source.display(), module_dst.display());
        if write_new(&module_dst, &read_script(source)?)? {
            report.written.push(module_dst);
        }
    }

    if runtime_dst.is_file() {
        return Ok(report);
    }

    let vendor = vendor_script()?;
    let vendor_text =
        fs::read_to_string(&vendor).map_err(|e| Error::fs("read", &vendor, e))?;
    let outcome = apply_hooks(&vendor_text, &module.hooks());

    if !outcome.is_complete() {
        match policy {
            AnchorPolicy::Strict => {
                return Err(Error::MissingAnchors {
                    script: vendor,
                    anchors: outcome.missing.iter().map(|a| a.to_string()).collect(),
                });
            }
            AnchorPolicy::Skip => {
                for anchor in &outcome.missing {
                    warn!(
                        "Anchor `{}` not found in {}, {} hook skipped",
                        anchor,
                        vendor.display(),
                        module.namespace
                    );
                }
            }
        }
    }

    if write_new(&runtime_dst, outcome.text.as_bytes())? {
        info!(
            "Patched {} with {} ({} hooks)",
            runtime_dst.display(),
            module.namespace,
            outcome.inserted
        );
        report.written.push(runtime_dst);
    }
    report.missing_anchors = outcome.missing.iter().map(|a| a.to_string()).collect();

    Ok(report)
}
