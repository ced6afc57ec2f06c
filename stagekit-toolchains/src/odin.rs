use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

use stagekit_core::error::{Error, Result};
use stagekit_core::process::{capture_checked, run_checked};
use stagekit_core::toolchain::{OptLevel, WasmCompiler};
use tracing::debug;

/// Wasm target passed to every build.
pub const WASM_TARGET: &str = "js_wasm32";

/// Builds wasm modules with `odin build` and reports `odin root`.
pub struct OdinCompiler {
    program: PathBuf,
}

impl Default for OdinCompiler {
    fn default() -> Self {
        Self::new("odin")
    }
}

impl OdinCompiler {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Optimization flags for `opt_level`.
    pub fn opt_flags(opt_level: OptLevel) -> &'static [&'static str] {
        match opt_level {
            OptLevel::Aggressive => &["-o:aggressive", "-disable-assert", "-no-bounds-check"],
            OptLevel::Minimal => &["-o:minimal"],
        }
    }

    /// Arguments passed to the compiler for one build.
    pub fn build_args(project_path: &Path, output: &Path, opt_level: OptLevel) -> Vec<OsString> {
        let mut out_flag = OsString::from("-out:");
        out_flag.push(output.as_os_str());

        let mut args: Vec<OsString> = vec![
            "build".into(),
            project_path.as_os_str().to_owned(),
            out_flag,
            format!("-target:{}", WASM_TARGET).into(),
        ];
        args.extend(Self::opt_flags(opt_level).iter().map(OsString::from));
        args
    }
}

impl WasmCompiler for OdinCompiler {
    fn name(&self) -> &str {
        "odin"
    }

    fn build_wasm(&self, project_path: &Path, output: &Path, opt_level: OptLevel) -> Result<()> {
        let mut cmd = Command::new(&self.program);
        cmd.args(Self::build_args(project_path, output, opt_level));
        run_checked(self.name(), &mut cmd)
    }

    fn root(&self) -> Result<PathBuf> {
        let mut cmd = Command::new(&self.program);
        cmd.arg("root");
        let stdout = capture_checked(self.name(), &mut cmd)?;
        let root = stdout.trim();
        if root.is_empty() {
            return Err(Error::ToolFailed {
                tool: self.name().to_string(),
                status: "empty output".to_string(),
                command: format!("{} root", self.program.display()),
            });
        }
        debug!("{} root: {}", self.name(), root);
        Ok(PathBuf::from(root))
    }
}
