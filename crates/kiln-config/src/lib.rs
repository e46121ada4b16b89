//! kiln-config: the build-matrix resolution engine.
//!
//! Given a target package, a set of requested output formats, and the build
//! environment, this crate resolves one [`BuildUnitDescriptor`] per
//! (format, environment) pair: entry file, output path, module format,
//! external module set, ordered transform steps, and the compile-time
//! constant table. The descriptors are consumed by an external
//! compile/bundle/emit sink; this crate never touches the filesystem or
//! runs a transform itself.

pub mod constants;
pub mod descriptor;
pub mod entry;
pub mod env;
pub mod error;
pub mod expand;
pub mod externals;
pub mod format;
pub mod metadata;

pub use constants::{ConstantTable, ConstantValue};
pub use descriptor::{
    BuildFlags, BuildUnitDescriptor, MinifyOptions, Resolver, RunContext, TransformStep,
};
pub use env::Environment;
pub use error::{ConfigError, Result};
pub use expand::{expand, requested_formats, DEFAULT_FORMATS};
pub use format::{FormatKind, ModuleFormat};
pub use metadata::{BuildOptions, PackageMetadata};
