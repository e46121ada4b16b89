//! Entry point selection.

use std::path::PathBuf;

use crate::format::FormatKind;

/// Pick the source entry file a build unit compiles from.
///
/// Runtime-only variants compile the runtime entry; everything else the full
/// entry. Compat packages must export both a default binding and named
/// bindings, which is only expressible without warnings from dedicated ESM
/// entry files, so their ESM variants switch to those.
pub fn select_entry(format: FormatKind, compat: bool) -> PathBuf {
    let esm = format.is_bundler_esm() || format.is_browser_esm();
    let file = match (compat && esm, format.is_runtime_only()) {
        (true, true) => "src/esm-runtime.ts",
        (true, false) => "src/esm-index.ts",
        (false, true) => "src/runtime.ts",
        (false, false) => "src/index.ts",
    };
    PathBuf::from(file)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_and_runtime_entries() {
        assert_eq!(
            select_entry(FormatKind::EsmBundler, false),
            PathBuf::from("src/index.ts")
        );
        assert_eq!(
            select_entry(FormatKind::GlobalRuntime, false),
            PathBuf::from("src/runtime.ts")
        );
    }

    #[test]
    fn compat_switches_esm_entries_only() {
        assert_eq!(
            select_entry(FormatKind::EsmBrowser, true),
            PathBuf::from("src/esm-index.ts")
        );
        assert_eq!(
            select_entry(FormatKind::EsmBundlerRuntime, true),
            PathBuf::from("src/esm-runtime.ts")
        );
        // Non-ESM formats keep the standard entries even for compat packages.
        assert_eq!(
            select_entry(FormatKind::Cjs, true),
            PathBuf::from("src/index.ts")
        );
        assert_eq!(
            select_entry(FormatKind::Global, true),
            PathBuf::from("src/index.ts")
        );
    }
}
