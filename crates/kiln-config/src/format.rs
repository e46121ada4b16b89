//! Output format classification.
//!
//! Formats are parsed once into [`FormatKind`] and classified through
//! capability queries from then on; nothing downstream re-derives meaning
//! from the format's name. The runtime-only counterparts exist for the
//! esm-bundler, esm-browser, and global formats - consumers who precompile
//! templates ahead of time load those to drop the compiler subsystem.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::Serialize;

use crate::error::ConfigError;

/// One requested output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FormatKind {
    /// ES module consumed by downstream bundlers (live `__DEV__` checks).
    EsmBundler,
    /// ES module loaded directly by browsers via `<script type="module">`.
    EsmBrowser,
    /// CommonJS for Node.
    Cjs,
    /// Browser IIFE exposing a single global.
    Global,
    /// Runtime-only counterpart of [`FormatKind::EsmBundler`].
    EsmBundlerRuntime,
    /// Runtime-only counterpart of [`FormatKind::EsmBrowser`].
    EsmBrowserRuntime,
    /// Runtime-only counterpart of [`FormatKind::Global`].
    GlobalRuntime,
}

/// Module format string handed to the emit sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleFormat {
    Es,
    Cjs,
    Iife,
}

impl ModuleFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModuleFormat::Es => "es",
            ModuleFormat::Cjs => "cjs",
            ModuleFormat::Iife => "iife",
        }
    }
}

impl FormatKind {
    /// All formats, in canonical order.
    pub const ALL: &'static [FormatKind] = &[
        FormatKind::EsmBundler,
        FormatKind::EsmBrowser,
        FormatKind::Cjs,
        FormatKind::Global,
        FormatKind::EsmBundlerRuntime,
        FormatKind::EsmBrowserRuntime,
        FormatKind::GlobalRuntime,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            FormatKind::EsmBundler => "esm-bundler",
            FormatKind::EsmBrowser => "esm-browser",
            FormatKind::Cjs => "cjs",
            FormatKind::Global => "global",
            FormatKind::EsmBundlerRuntime => "esm-bundler-runtime",
            FormatKind::EsmBrowserRuntime => "esm-browser-runtime",
            FormatKind::GlobalRuntime => "global-runtime",
        }
    }

    /// Fragment between the file stem and `.js` in the output name.
    pub fn file_infix(&self) -> &'static str {
        match self {
            FormatKind::EsmBundler => "esm-bundler",
            FormatKind::EsmBrowser => "esm-browser",
            FormatKind::Cjs => "cjs",
            FormatKind::Global => "global",
            FormatKind::EsmBundlerRuntime => "runtime.esm-bundler",
            FormatKind::EsmBrowserRuntime => "runtime.esm-browser",
            FormatKind::GlobalRuntime => "runtime.global",
        }
    }

    pub fn module_format(&self) -> ModuleFormat {
        match self {
            FormatKind::EsmBundler
            | FormatKind::EsmBrowser
            | FormatKind::EsmBundlerRuntime
            | FormatKind::EsmBrowserRuntime => ModuleFormat::Es,
            FormatKind::Cjs => ModuleFormat::Cjs,
            FormatKind::Global | FormatKind::GlobalRuntime => ModuleFormat::Iife,
        }
    }

    pub fn is_esm(&self) -> bool {
        matches!(self.module_format(), ModuleFormat::Es)
    }

    pub fn is_bundler_esm(&self) -> bool {
        matches!(self, FormatKind::EsmBundler | FormatKind::EsmBundlerRuntime)
    }

    pub fn is_browser_esm(&self) -> bool {
        matches!(self, FormatKind::EsmBrowser | FormatKind::EsmBrowserRuntime)
    }

    pub fn is_global(&self) -> bool {
        matches!(self, FormatKind::Global | FormatKind::GlobalRuntime)
    }

    pub fn is_cjs(&self) -> bool {
        matches!(self, FormatKind::Cjs)
    }

    /// Runtime-only builds exclude the template-compilation subsystem.
    pub fn is_runtime_only(&self) -> bool {
        matches!(
            self,
            FormatKind::EsmBundlerRuntime
                | FormatKind::EsmBrowserRuntime
                | FormatKind::GlobalRuntime
        )
    }

    /// Output path for this format: `dist/<stem>.<infix>[.prod].js`.
    pub fn output_file(&self, stem: &str, production: bool) -> PathBuf {
        let suffix = if production { ".prod" } else { "" };
        PathBuf::from(format!("dist/{}.{}{}.js", stem, self.file_infix(), suffix))
    }
}

impl FromStr for FormatKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FormatKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| ConfigError::UnknownFormat(s.to_string()))
    }
}

impl fmt::Display for FormatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
