#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use stagekit_core::error::{Error, Result};
use stagekit_core::toolchain::{NativeCompiler, OptLevel, WasmCompiler};
use stagekit_core::ProjectBuilder;
use tempfile::TempDir;

pub const VENDOR_RUNTIME: &str = "\"use strict\";

(function() {

function getElement(name) {
\tif (name) {
\t\treturn document.getElementById(name);
\t}
\treturn undefined;
}

async function runWasm(wasmPath, consoleElement, extraForeignImports, wasmMemoryInterface, intSize=4) {
\tconst exports = wasm.instance.exports;
\twasmMemoryInterface.setExports(exports);

\texports._start();

\tif (exports.step) {
\t\tlet prevTimeStamp = undefined;
\t\tconst step = (currTimeStamp) => {
\t\t\tif (prevTimeStamp == undefined) {
\t\t\t\tprevTimeStamp = currTimeStamp;
\t\t\t}
\t\t\twindow.requestAnimationFrame(step);
\t\t};
\t\twindow.requestAnimationFrame(step);
\t}
}

window.odin = { runWasm: runWasm };
})();
";

pub const GAMEPAD_JS: &str = "export function setup(wasmMemoryInterface, exports) {}\nexport function step(wasmMemoryInterface, exports) {}\n";
pub const MOUSE_POS_JS: &str = "export function setup(wasmMemoryInterface, exports) {}\n// mouse\nexport function step(wasmMemoryInterface, exports) {}\n";

/// One recorded compiler invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    pub source: PathBuf,
    pub output: PathBuf,
    pub working_dir: Option<PathBuf>,
    pub opt_level: Option<OptLevel>,
    /// Whether anything existed at `output` when the compiler was called.
    pub output_existed: bool,
}

#[derive(Default)]
pub struct FakeNative {
    pub calls: Mutex<Vec<Invocation>>,
    pub fail: bool,
}

impl FakeNative {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.lock().unwrap().clone()
    }
}

impl NativeCompiler for FakeNative {
    fn name(&self) -> &str {
        "fake-go"
    }

    fn build_native(&self, working_dir: &Path, source_entry: &Path, output: &Path) -> Result<()> {
        self.calls.lock().unwrap().push(Invocation {
            source: source_entry.to_path_buf(),
            output: output.to_path_buf(),
            working_dir: Some(working_dir.to_path_buf()),
            opt_level: None,
            output_existed: fs::symlink_metadata(output).is_ok(),
        });
        if self.fail {
            return Err(Error::ToolFailed {
                tool: "fake-go".to_string(),
                status: "exit status 2".to_string(),
                command: "fake-go build".to_string(),
            });
        }
        fs::write(output, b"server binary")?;
        Ok(())
    }
}

pub struct FakeWasm {
    pub root: PathBuf,
    pub calls: Mutex<Vec<Invocation>>,
    pub root_queries: AtomicUsize,
    pub fail: bool,
}

impl FakeWasm {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            calls: Mutex::new(Vec::new()),
            root_queries: AtomicUsize::new(0),
            fail: false,
        }
    }

    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.lock().unwrap().clone()
    }

    pub fn root_queries(&self) -> usize {
        self.root_queries.load(Ordering::SeqCst)
    }
}

impl WasmCompiler for FakeWasm {
    fn name(&self) -> &str {
        "fake-odin"
    }

    fn build_wasm(&self, project_path: &Path, output: &Path, opt_level: OptLevel) -> Result<()> {
        self.calls.lock().unwrap().push(Invocation {
            source: project_path.to_path_buf(),
            output: output.to_path_buf(),
            working_dir: None,
            opt_level: Some(opt_level),
            output_existed: fs::symlink_metadata(output).is_ok(),
        });
        if self.fail {
            return Err(Error::ToolFailed {
                tool: "fake-odin".to_string(),
                status: "exit status 1".to_string(),
                command: "fake-odin build".to_string(),
            });
        }
        let name = project_path.file_name().unwrap().to_string_lossy();
        fs::write(output, format!("wasm:{}:{}", name, opt_level.as_str()))?;
        Ok(())
    }

    fn root(&self) -> Result<PathBuf> {
        self.root_queries.fetch_add(1, Ordering::SeqCst);
        Ok(self.root.clone())
    }
}

pub fn index_html(runtime_file: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<body>\n<canvas id=\"canvas-1\"></canvas>\n<script src=\"{}\"></script>\n</body>\n</html>\n",
        runtime_file
    )
}

/// A temporary workspace with fake compilers and a fake toolchain root.
pub struct Fixture {
    pub temp: TempDir,
    pub root: PathBuf,
    pub native: Arc<FakeNative>,
    pub wasm: Arc<FakeWasm>,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_native(FakeNative::default())
    }

    pub fn with_native(native: FakeNative) -> Self {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("workspace");
        let toolchain = temp.path().join("odin");

        let vendor_dir = toolchain.join("vendor/wasm/js");
        fs::create_dir_all(&vendor_dir).unwrap();
        fs::write(vendor_dir.join("runtime.js"), VENDOR_RUNTIME).unwrap();

        fs::create_dir_all(root.join("public")).unwrap();
        fs::write(root.join("public/index.html"), "<h1>projects</h1>\n").unwrap();
        fs::write(root.join("main.go"), "package main\n").unwrap();

        fs::create_dir_all(root.join("input/public")).unwrap();
        fs::write(root.join("input/public/gamepad.js"), GAMEPAD_JS).unwrap();
        fs::create_dir_all(root.join("synth_keyboard/public")).unwrap();
        fs::write(root.join("synth_keyboard/public/mouse-pos.js"), MOUSE_POS_JS).unwrap();

        Self {
            temp,
            root,
            native: Arc::new(native),
            wasm: Arc::new(FakeWasm::new(toolchain)),
        }
    }

    pub fn with_failing_wasm() -> Self {
        let mut fixture = Self::new();
        let mut wasm = FakeWasm::new(fixture.wasm.root.clone());
        wasm.fail = true;
        fixture.wasm = Arc::new(wasm);
        fixture
    }

    /// Creates `<root>/<id>/public/index.html` loading `runtime_file`.
    pub fn add_project(&self, id: &str, runtime_file: &str) -> PathBuf {
        let public = self.root.join(id).join("public");
        fs::create_dir_all(&public).unwrap();
        fs::write(public.join("index.html"), index_html(runtime_file)).unwrap();
        public
    }

    pub fn builder(&self) -> ProjectBuilder {
        ProjectBuilder::new(
            &self.root,
            self.native.clone() as Arc<dyn NativeCompiler>,
            self.wasm.clone() as Arc<dyn WasmCompiler>,
        )
    }

    pub fn dist(&self) -> PathBuf {
        self.root.join("dist")
    }
}
