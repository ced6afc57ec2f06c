//! Anchor-based patching of the vendor runtime script.
//!
//! An extension module hooks into the runtime through three statements, each
//! inserted directly after a fixed anchor line of the vendor script. Anchors
//! match by trimmed-line equality. Every other line, including its original
//! line terminator, passes through untouched.

/// Strict-mode prologue at the top of the runtime.
pub const ANCHOR_STRICT_MODE: &str = "\"use strict\";";
/// The statement that starts the wasm program.
pub const ANCHOR_START_CALL: &str = "exports._start();";
/// Opening line of the animation-step callback.
pub const ANCHOR_STEP_CALLBACK: &str = "const step = (currTimeStamp) => {";

/// All anchors, in the order they appear in the vendor script.
pub const ANCHORS: [&str; 3] = [ANCHOR_STRICT_MODE, ANCHOR_START_CALL, ANCHOR_STEP_CALLBACK];

/// A statement injected immediately after an anchor line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchHook {
    pub anchor: &'static str,
    pub statement: String,
}

impl PatchHook {
    pub fn new(anchor: &'static str, statement: impl Into<String>) -> Self {
        Self {
            anchor,
            statement: statement.into(),
        }
    }

    /// The three hooks binding an extension module into the runtime: module
    /// import, setup after start, and a per-frame step.
    pub fn for_module(namespace: &str, module_file: &str) -> Vec<PatchHook> {
        vec![
            PatchHook::new(
                ANCHOR_STRICT_MODE,
                format!("import * as {} from './{}';", namespace, module_file),
            ),
            PatchHook::new(
                ANCHOR_START_CALL,
                format!("{}.setup(wasmMemoryInterface, exports);", namespace),
            ),
            PatchHook::new(
                ANCHOR_STEP_CALLBACK,
                format!("{}.step(wasmMemoryInterface, exports);", namespace),
            ),
        ]
    }
}

/// Result of applying hooks to a script.
#[derive(Debug, Clone)]
pub struct PatchOutcome {
    pub text: String,
    /// Number of statements inserted.
    pub inserted: usize,
    /// Anchors that never matched a line, in hook order.
    pub missing: Vec<&'static str>,
}

impl PatchOutcome {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

fn split_terminator(segment: &str) -> (&str, &str) {
    if let Some(content) = segment.strip_suffix("\r\n") {
        (content, "\r\n")
    } else if let Some(content) = segment.strip_suffix('\n') {
        (content, "\n")
    } else {
        (segment, "")
    }
}

/// Inserts each hook's statement after every line matching its anchor.
pub fn apply_hooks(source: &str, hooks: &[PatchHook]) -> PatchOutcome {
    let mut text = String::with_capacity(source.len() + hooks.len() * 64);
    let mut matched = vec![false; hooks.len()];
    let mut inserted = 0;

    for segment in source.split_inclusive('\n') {
        text.push_str(segment);

        let (content, terminator) = split_terminator(segment);
        let trimmed = content.trim();

        for (idx, hook) in hooks.iter().enumerate() {
            if trimmed != hook.anchor {
                continue;
            }
            // Last line without a terminator: the statement goes on a new line
            // and the file keeps ending without one.
            if terminator.is_empty() {
                text.push('\n');
                text.push_str(&hook.statement);
            } else {
                text.push_str(&hook.statement);
                text.push_str(terminator);
            }
            matched[idx] = true;
            inserted += 1;
        }
    }

    let missing = hooks
        .iter()
        .zip(&matched)
        .filter(|(_, hit)| !**hit)
        .map(|(hook, _)| hook.anchor)
        .collect();

    PatchOutcome {
        text,
        inserted,
        missing,
    }
}
