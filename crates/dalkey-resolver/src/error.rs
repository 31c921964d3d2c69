use std::io;
use thiserror::Error;

/// Resolution error.
///
/// Alias and exports misses are not errors; they fall through inside the
/// algorithm. A `ModuleNotFound` is only raised once every candidate is
/// exhausted.
#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("cannot resolve '{specifier}' from '{importer}'")]
    ModuleNotFound { specifier: String, importer: String },

    #[error("malformed manifest at {path}: {reason}")]
    MalformedManifest { path: String, reason: String },

    #[error("failed to read {path}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
}

impl ResolveError {
    pub(crate) fn malformed(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedManifest {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
