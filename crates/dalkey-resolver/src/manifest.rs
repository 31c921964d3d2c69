//! Package manifest preprocessing.
//!
//! A raw `package.json` is parsed once and folded into a
//! [`ProcessedManifest`]: the chosen entry file, one merged alias table
//! (from the `browser` object and `alias` fields), and a compiled
//! `exports` tree. All downstream matching works on the processed form;
//! the raw manifest is discarded.

use rustc_hash::FxHashMap;
use serde_json::Value;
use std::sync::{Arc, RwLock};

use crate::alias::{AliasEntry, AliasKey, AliasValue};
use crate::error::ResolveError;
use crate::exports::{self, ExportsTree};
use crate::fs::FileSystem;
use crate::paths;

/// Normalized view of one package manifest.
///
/// A pure function of the manifest contents and `pkg_dir`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedManifest {
    /// Directory containing the manifest.
    pub pkg_dir: String,
    /// Entry file, chosen by field precedence: `browser` (string form),
    /// then `module`, then `main`. Stored verbatim.
    pub entry: Option<String>,
    /// Merged alias table; insertion order is match priority.
    pub aliases: Vec<AliasEntry>,
    /// Compiled `exports` field, when present.
    pub exports: Option<ExportsTree>,
}

/// Process a parsed manifest into its normalized form.
///
/// # Errors
/// `MalformedManifest` when the `exports` field mixes subpath and
/// condition keys at one level, or uses an unsupported shape.
pub fn process_package_json(
    manifest: &Value,
    pkg_dir: &str,
) -> Result<ProcessedManifest, ResolveError> {
    let entry = select_entry(manifest);

    let mut aliases = Vec::new();
    if let Some(Value::Object(browser)) = manifest.get("browser") {
        append_alias_entries(&mut aliases, browser, false);
    }
    if let Some(Value::Object(alias)) = manifest.get("alias") {
        append_alias_entries(&mut aliases, alias, true);
    }

    let exports = match manifest.get("exports") {
        Some(Value::Null) | None => None,
        Some(raw) => Some(exports::compile(raw).map_err(|reason| {
            ResolveError::malformed(paths::join(pkg_dir, "package.json"), reason)
        })?),
    };

    Ok(ProcessedManifest {
        pkg_dir: pkg_dir.to_string(),
        entry,
        aliases,
        exports,
    })
}

/// First present of `browser` (string form), `module`, `main`.
fn select_entry(manifest: &Value) -> Option<String> {
    if let Some(Value::String(browser)) = manifest.get("browser") {
        return Some(browser.clone());
    }
    for field in ["module", "main"] {
        if let Some(Value::String(entry)) = manifest.get(field) {
            return Some(entry.clone());
        }
    }
    None
}

/// Fold one manifest object into alias entries, preserving declaration
/// order. Earlier entries win, so `browser` keys shadow `alias` keys.
fn append_alias_entries(
    aliases: &mut Vec<AliasEntry>,
    map: &serde_json::Map<String, Value>,
    globs: bool,
) {
    for (key, value) in map {
        let value = match value {
            Value::Bool(false) => AliasValue::Empty,
            Value::String(target) => AliasValue::Redirect(target.clone()),
            _ => continue,
        };

        // Relative keys are canonicalized to their `./…` spelling; bare
        // keys (module names) are kept verbatim.
        let normalized = paths::normalize(key);
        let key = if globs {
            AliasKey::parse(&normalized)
        } else {
            AliasKey::Exact(normalized)
        };
        aliases.push(AliasEntry { key, value });
    }
}

/// Load and process the manifest of `pkg_dir`, if one exists.
///
/// # Errors
/// `Io` when `package.json` exists but cannot be read, `MalformedManifest`
/// when it is not valid JSON or its `exports` field is structurally
/// invalid.
pub fn load_manifest(
    fs: &dyn FileSystem,
    pkg_dir: &str,
) -> Result<Option<ProcessedManifest>, ResolveError> {
    let manifest_path = paths::join(pkg_dir, "package.json");
    if !fs.is_file(&manifest_path) {
        return Ok(None);
    }

    let text = fs.read_file(&manifest_path).map_err(|source| ResolveError::Io {
        path: manifest_path.clone(),
        source,
    })?;
    let manifest: Value = serde_json::from_str(&text)
        .map_err(|err| ResolveError::malformed(&manifest_path, err.to_string()))?;

    process_package_json(&manifest, pkg_dir).map(Some)
}

/// Memoization seam for processed manifests, keyed by package directory.
///
/// Processing is a pure function of the manifest text, so any entry is
/// valid for as long as the underlying file is; the resolver itself only
/// caches within a single call.
pub trait ManifestCache: Send + Sync {
    fn get(&self, pkg_dir: &str) -> Option<Arc<ProcessedManifest>>;
    fn set(&self, pkg_dir: &str, manifest: Arc<ProcessedManifest>);
}

/// No-op cache: always misses, never stores.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoManifestCache;

impl ManifestCache for NoManifestCache {
    fn get(&self, _pkg_dir: &str) -> Option<Arc<ProcessedManifest>> {
        None
    }

    fn set(&self, _pkg_dir: &str, _manifest: Arc<ProcessedManifest>) {}
}

/// Map-backed cache. The resolver creates one per call; callers that
/// memoize across calls own the invalidation story.
#[derive(Debug, Default)]
pub struct MemoryManifestCache {
    entries: RwLock<FxHashMap<String, Arc<ProcessedManifest>>>,
}

impl MemoryManifestCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl ManifestCache for MemoryManifestCache {
    fn get(&self, pkg_dir: &str) -> Option<Arc<ProcessedManifest>> {
        self.entries.read().unwrap().get(pkg_dir).cloned()
    }

    fn set(&self, pkg_dir: &str, manifest: Arc<ProcessedManifest>) {
        self.entries
            .write()
            .unwrap()
            .insert(pkg_dir.to_string(), manifest);
    }
}
