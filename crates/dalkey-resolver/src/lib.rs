#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

//! Browser-profile module specifier resolver.
//!
//! Given a request string (`./foo`, `react`, `@scope/pkg/sub`) and the
//! absolute path of the importing file, returns the absolute path that
//! request denotes. Implements the layered algorithm used by bundlers
//! targeting browsers: relative/absolute resolution with extension
//! probing and directory-index fallback, `node_modules` lookup walking
//! parent directories, and manifest-driven redirection through entry
//! fields, `browser`/`alias` maps, and conditional `exports` subpath
//! maps.
//!
//! Every filesystem touch goes through the injected [`FileSystem`]
//! capability, so the resolver runs unchanged over the real disk or an
//! in-memory overlay:
//!
//! ```
//! use dalkey_resolver::{MemoryFileSystem, Resolver, ResolverConfig};
//! use std::sync::Arc;
//!
//! let mut fs = MemoryFileSystem::new();
//! fs.add_file("/app.js", "");
//! fs.add_file("/node_modules/dep/index.js", "");
//!
//! let resolver = Resolver::with_config(
//!     Arc::new(fs),
//!     ResolverConfig::default().with_extensions([".js"]),
//! );
//! assert_eq!(
//!     resolver.resolve("dep", "/app.js").unwrap(),
//!     "/node_modules/dep/index.js"
//! );
//! ```

pub mod alias;
pub mod error;
pub mod exports;
pub mod fs;
pub mod manifest;
pub mod paths;
mod probe;
pub mod resolver;
pub mod specifier;

pub use alias::{AliasEntry, AliasKey, AliasMatch, AliasValue};
pub use error::ResolveError;
pub use exports::{ExportsMatch, ExportsTarget, ExportsTree, SubpathKey};
pub use fs::{FileSystem, MemoryFileSystem, OsFileSystem};
pub use manifest::{
    process_package_json, ManifestCache, MemoryManifestCache, NoManifestCache, ProcessedManifest,
};
pub use paths::parent_directories;
pub use resolver::{
    Resolver, ResolverConfig, DEFAULT_CONDITIONS, DEFAULT_EXTENSIONS, EMPTY_MODULE,
};
pub use specifier::{classify, normalize_module_specifier, Specifier};
