//! Core library for building and publishing wasm projects.

pub mod artifact;
pub mod builder;
pub mod config;
pub mod error;
pub mod interrupt;
pub mod manifest;
pub mod patch;
pub mod process;
pub mod project;
pub mod publish;
pub mod runtime;
pub mod server;
pub mod staging;
pub mod staleness;
pub mod toolchain;
pub mod variant;

pub use artifact::{Artifact, ArtifactKind};
pub use builder::{BuildOptions, BuildReport, ProjectBuilder};
pub use config::{Config, ExtensionSources};
pub use error::{Error, Result};
pub use interrupt::Interrupt;
pub use manifest::DistributionManifest;
pub use patch::{apply_hooks, PatchHook, PatchOutcome};
pub use project::Project;
pub use publish::{PublishOptions, PublishReport, Publisher, StagedProject};
pub use runtime::{materialize_runtime, AnchorPolicy, ExtensionModule, MaterializedRuntime};
pub use server::{run_dev_server, ServeOutcome};
pub use staleness::{needs_rebuild, prepare_rebuild};
pub use toolchain::{NativeCompiler, OptLevel, WasmCompiler};
pub use variant::{select_variant, RuntimeVariant};
