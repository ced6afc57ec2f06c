//! TOML configuration for a stagekit workspace.

use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::variant::RuntimeVariant;

/// Name of the optional configuration file at the workspace root.
pub const CONFIG_FILE: &str = "stagekit.toml";

/// Workspace configuration as defined in `stagekit.toml`.
///
/// Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub workspace: WorkspaceConfig,
    pub toolchain: ToolchainConfig,
    pub runtime: RuntimeConfig,
}

/// Workspace layout and publish list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkspaceConfig {
    /// Distribution directory, relative to the workspace root.
    pub dist_dir: PathBuf,
    /// Projects published by `stagekit publish`, in order.
    pub projects: Vec<String>,
    /// Source entry of the native dev server, relative to the workspace root.
    pub native_entry: PathBuf,
    /// Default number of parallel project builds.
    pub default_parallel: Option<usize>,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            dist_dir: PathBuf::from("dist"),
            projects: vec!["multi".to_string(), "trails".to_string()],
            native_entry: PathBuf::from("main.go"),
            default_parallel: None,
        }
    }
}

/// External compiler executables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolchainConfig {
    pub native: String,
    pub wasm: String,
}

impl Default for ToolchainConfig {
    fn default() -> Self {
        Self {
            native: "go".to_string(),
            wasm: "odin".to_string(),
        }
    }
}

/// Runtime shim settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Fail instead of skipping when the vendor script lacks an anchor line.
    pub strict_anchors: bool,
    pub extensions: ExtensionSources,
}

/// Source scripts of the extension modules, relative to the workspace root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtensionSources {
    pub gamepad: PathBuf,
    pub mouse_position: PathBuf,
}

impl Default for ExtensionSources {
    fn default() -> Self {
        Self {
            gamepad: PathBuf::from("input/public/gamepad.js"),
            mouse_position: PathBuf::from("synth_keyboard/public/mouse-pos.js"),
        }
    }
}

impl ExtensionSources {
    pub fn for_variant(&self, variant: RuntimeVariant) -> Option<&Path> {
        match variant {
            RuntimeVariant::Default => None,
            RuntimeVariant::Gamepad => Some(&self.gamepad),
            RuntimeVariant::MousePosition => Some(&self.mouse_position),
        }
    }
}

/// `dist_dir` is removed on every publish. It must be a relative path made of
/// plain components.
fn validate_dist_dir(dist_dir: &Path) -> Result<()> {
    if dist_dir.as_os_str().is_empty() {
        return Err(Error::Config("dist_dir cannot be empty".to_string()));
    }
    if !dist_dir
        .components()
        .all(|c| matches!(c, Component::Normal(_)))
    {
        return Err(Error::Config(format!(
            "dist_dir must be a relative path without `.` or `..` components, got {}",
            dist_dir.display()
        )));
    }
    Ok(())
}

impl Config {
    /// Parses configuration from TOML text. `path` is only used for errors.
    pub fn parse(content: &str, path: &Path) -> Result<Self> {
        let config: Config = toml::from_str(content).map_err(|error| Error::Toml {
            error,
            path: path.to_path_buf(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `stagekit.toml` from `root`, falling back to defaults when the
    /// file does not exist.
    pub fn load(root: &Path) -> Result<Self> {
        let path = root.join(CONFIG_FILE);
        match std::fs::read_to_string(&path) {
            Ok(content) => Self::parse(&content, &path),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(Error::fs("read", path, e)),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.toolchain.native.trim().is_empty() || self.toolchain.wasm.trim().is_empty() {
            return Err(Error::Config(
                "toolchain executables cannot be empty".to_string(),
            ));
        }
        validate_dist_dir(&self.workspace.dist_dir)?;
        if self.workspace.default_parallel == Some(0) {
            return Err(Error::Config(
                "default_parallel must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
