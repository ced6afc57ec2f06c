use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

use stagekit_core::error::{Error, Result};
use stagekit_core::process::run_checked;
use stagekit_core::toolchain::NativeCompiler;

/// Builds the dev server with `go build`.
pub struct GoCompiler {
    program: PathBuf,
}

impl Default for GoCompiler {
    fn default() -> Self {
        Self::new("go")
    }
}

impl GoCompiler {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Arguments passed to the compiler for one build.
    pub fn build_args(source_entry: &Path, output: &Path) -> Vec<OsString> {
        vec![
            "build".into(),
            "-o".into(),
            output.as_os_str().to_owned(),
            source_entry.as_os_str().to_owned(),
        ]
    }
}

impl NativeCompiler for GoCompiler {
    fn name(&self) -> &str {
        "go"
    }

    fn build_native(&self, working_dir: &Path, source_entry: &Path, output: &Path) -> Result<()> {
        let output = std::path::absolute(output).map_err(|e| Error::fs("resolve", output, e))?;
        // A bare name is looked up on PATH; anything else is a path.
        let program = if self.program.components().count() > 1 {
            std::path::absolute(&self.program)
                .map_err(|e| Error::fs("resolve", &self.program, e))?
        } else {
            self.program.clone()
        };
        let mut cmd = Command::new(program);
        cmd.args(Self::build_args(source_entry, &output))
            .current_dir(working_dir);
        run_checked(self.name(), &mut cmd)
    }
}
