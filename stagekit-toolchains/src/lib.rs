//! Compiler invokers backing the core's toolchain traits.

pub mod go;
pub mod odin;

pub use go::GoCompiler;
pub use odin::OdinCompiler;

use std::sync::Arc;

use stagekit_core::config::ToolchainConfig;
use stagekit_core::toolchain::{NativeCompiler, WasmCompiler};

/// Instantiates the configured native and wasm compilers.
pub fn from_config(config: &ToolchainConfig) -> (Arc<dyn NativeCompiler>, Arc<dyn WasmCompiler>) {
    (
        Arc::new(GoCompiler::new(&config.native)),
        Arc::new(OdinCompiler::new(&config.wasm)),
    )
}
