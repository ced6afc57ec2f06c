//! Runtime shim variants and their detection from the entry document.

use std::fmt;

use serde::Serialize;

/// The flavor of runtime shim a project loads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RuntimeVariant {
    /// Unpatched vendor runtime.
    #[default]
    Default,
    /// Runtime patched with the gamepad extension module.
    Gamepad,
    /// Runtime patched with the mouse-position extension module.
    MousePosition,
}

/// Marker substrings, in priority order. The first marker present in the
/// entry document selects its variant.
pub const VARIANT_MARKERS: &[(&str, RuntimeVariant)] = &[
    ("runtime-2.js", RuntimeVariant::Gamepad),
    ("runtime-3.js", RuntimeVariant::MousePosition),
];

impl RuntimeVariant {
    /// File name of the runtime script this variant is served as.
    pub fn runtime_file(&self) -> &'static str {
        match self {
            RuntimeVariant::Default => "runtime.js",
            RuntimeVariant::Gamepad => "runtime-2.js",
            RuntimeVariant::MousePosition => "runtime-3.js",
        }
    }

    pub fn is_extended(&self) -> bool {
        !matches!(self, RuntimeVariant::Default)
    }

    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            RuntimeVariant::Default => "default",
            RuntimeVariant::Gamepad => "gamepad",
            RuntimeVariant::MousePosition => "mouse-position",
        }
    }
}

impl fmt::Display for RuntimeVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Picks the runtime variant for an entry document.
pub fn select_variant(entry_document: &str) -> RuntimeVariant {
    VARIANT_MARKERS
        .iter()
        .find(|(marker, _)| entry_document.contains(marker))
        .map(|(_, variant)| *variant)
        .unwrap_or_default()
}
