//! Top-level resolution driver.
//!
//! Composes classification, manifest preprocessing, alias and exports
//! matching, and filesystem probing into the layered algorithm:
//! relative/absolute resolution with extension and directory fallback,
//! and `node_modules` lookup walking parent directories for bare
//! specifiers. Aliases always apply before any filesystem probe.

use std::sync::Arc;
use tracing::{debug, trace};

use crate::alias::{match_alias_forms, relative_form, AliasMatch};
use crate::error::ResolveError;
use crate::exports::{match_exports, ExportsMatch};
use crate::fs::FileSystem;
use crate::manifest::{self, ManifestCache, MemoryManifestCache, ProcessedManifest};
use crate::paths;
use crate::probe::{probe, probe_directory};
use crate::specifier::{classify, normalize_module_specifier, Specifier};

/// The shared empty-module sentinel, returned verbatim for excluded
/// (`false`/`null`) aliases and exports.
pub const EMPTY_MODULE: &str = "//empty.js";

/// Default extensions for probing.
pub const DEFAULT_EXTENSIONS: &[&str] = &[".ts", ".tsx", ".js", ".jsx", ".mjs", ".cjs", ".json"];

/// Default active export conditions: the browser profile.
pub const DEFAULT_CONDITIONS: &[&str] = &["browser", "import", "default"];

/// Resolver configuration.
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Extensions to probe, in order. Each begins with `.`.
    pub extensions: Vec<String>,
    /// Active export conditions, tried against each condition map in the
    /// map's declaration order.
    pub conditions: Vec<String>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            extensions: DEFAULT_EXTENSIONS.iter().map(ToString::to_string).collect(),
            conditions: DEFAULT_CONDITIONS.iter().map(ToString::to_string).collect(),
        }
    }
}

impl ResolverConfig {
    /// Replace the probed extension list.
    #[must_use]
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions.into_iter().map(Into::into).collect();
        self
    }
}

/// Module specifier resolver over an injected filesystem.
///
/// Stateless across calls: each call walks manifests afresh (memoized at
/// most per call unless a caller-owned [`ManifestCache`] is attached).
#[derive(Clone)]
pub struct Resolver {
    config: ResolverConfig,
    fs: Arc<dyn FileSystem>,
    cache: Option<Arc<dyn ManifestCache>>,
}

/// Per-call view handed to the probing and manifest layers.
pub(crate) struct ResolveCtx<'a> {
    pub fs: &'a dyn FileSystem,
    pub extensions: &'a [String],
    pub conditions: &'a [String],
    pub cache: &'a dyn ManifestCache,
}

impl ResolveCtx<'_> {
    /// Processed manifest of `pkg_dir`, if one exists.
    pub fn manifest_for(
        &self,
        pkg_dir: &str,
    ) -> Result<Option<Arc<ProcessedManifest>>, ResolveError> {
        if let Some(cached) = self.cache.get(pkg_dir) {
            return Ok(Some(cached));
        }

        match manifest::load_manifest(self.fs, pkg_dir)? {
            Some(processed) => {
                let processed = Arc::new(processed);
                self.cache.set(pkg_dir, Arc::clone(&processed));
                Ok(Some(processed))
            }
            None => Ok(None),
        }
    }

    /// Manifest of the nearest enclosing package of `dir`.
    fn enclosing_package(
        &self,
        dir: &str,
    ) -> Result<Option<Arc<ProcessedManifest>>, ResolveError> {
        for parent in paths::parent_directories(dir, None) {
            if let Some(found) = self.manifest_for(&parent)? {
                return Ok(Some(found));
            }
        }
        Ok(None)
    }
}

impl Resolver {
    /// Create a resolver with the default configuration.
    #[must_use]
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self::with_config(fs, ResolverConfig::default())
    }

    #[must_use]
    pub fn with_config(fs: Arc<dyn FileSystem>, config: ResolverConfig) -> Self {
        Self {
            config,
            fs,
            cache: None,
        }
    }

    /// Attach a caller-owned manifest cache shared across calls.
    #[must_use]
    pub fn with_manifest_cache(mut self, cache: Arc<dyn ManifestCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Resolve `specifier` as imported from `importer`.
    ///
    /// Returns the absolute resolved path, or the [`EMPTY_MODULE`]
    /// sentinel when an alias or export excludes the request.
    ///
    /// # Errors
    /// `ModuleNotFound` once every candidate is exhausted;
    /// `MalformedManifest`/`Io` surface unchanged from manifest loading.
    pub fn resolve(&self, specifier: &str, importer: &str) -> Result<String, ResolveError> {
        let per_call = MemoryManifestCache::new();
        let cache: &dyn ManifestCache = match &self.cache {
            Some(shared) => &**shared,
            None => &per_call,
        };
        let ctx = ResolveCtx {
            fs: &*self.fs,
            extensions: &self.config.extensions,
            conditions: &self.config.conditions,
            cache,
        };

        debug!(specifier, importer, "resolving");
        match resolve_inner(&ctx, specifier, importer)? {
            Some(resolved) => Ok(resolved),
            None => Err(ResolveError::ModuleNotFound {
                specifier: specifier.to_string(),
                importer: importer.to_string(),
            }),
        }
    }

    /// Asynchronous driver with the same contract as [`Resolver::resolve`].
    ///
    /// The algorithm is written once against the synchronous capability;
    /// this entry relocates the call onto the blocking pool.
    pub async fn resolve_async(
        &self,
        specifier: &str,
        importer: &str,
    ) -> Result<String, ResolveError> {
        let resolver = self.clone();
        let specifier = specifier.to_string();
        let importer = importer.to_string();

        tokio::task::spawn_blocking(move || resolver.resolve(&specifier, &importer))
            .await
            .expect("resolver worker panicked")
    }
}

fn resolve_inner(
    ctx: &ResolveCtx<'_>,
    specifier: &str,
    importer: &str,
) -> Result<Option<String>, ResolveError> {
    if specifier.is_empty() {
        return Ok(None);
    }

    let mut specifier = normalize_module_specifier(specifier);
    let importer_dir = paths::dirname(importer).to_string();

    // The importer's enclosing package gets first say: its alias table
    // rewrites bare and relative requests before anything is probed on
    // disk.
    if !specifier.starts_with('/') {
        if let Some(scope) = ctx.enclosing_package(&importer_dir)? {
            match match_alias_forms(&scope.aliases, &[specifier.as_str()]) {
                Some(AliasMatch::Empty) => return Ok(Some(EMPTY_MODULE.to_string())),
                Some(AliasMatch::Redirect(target)) => {
                    debug!(from = %specifier, to = %target, "alias rewrite");
                    specifier = normalize_module_specifier(&target);
                }
                None => {}
            }
        }
    }

    match classify(&specifier) {
        Specifier::Relative(rel) => {
            let candidate = paths::join(&importer_dir, &rel);
            trace!(candidate = %candidate, "probing relative");
            probe(ctx, &candidate)
        }
        Specifier::Absolute(abs) => {
            trace!(candidate = %abs, "probing absolute");
            probe(ctx, &abs)
        }
        Specifier::Bare { name, subpath } => resolve_bare(ctx, &name, &subpath, &importer_dir),
    }
}

/// Walk parent directories looking for `node_modules/<name>`.
///
/// A package with a manifest is definitive: failure inside it stops the
/// walk. Without a manifest the package is only observable through a
/// successful probe, so a miss continues outward.
fn resolve_bare(
    ctx: &ResolveCtx<'_>,
    name: &str,
    subpath: &str,
    importer_dir: &str,
) -> Result<Option<String>, ResolveError> {
    for dir in paths::parent_directories(importer_dir, None) {
        let root = paths::join(&dir, &format!("node_modules/{name}"));

        let Some(pkg) = ctx.manifest_for(&root)? else {
            let found = if subpath.is_empty() {
                probe_directory(ctx, &root)?
            } else {
                probe(ctx, &paths::join(&root, subpath))?
            };
            if found.is_some() {
                return Ok(found);
            }
            continue;
        };

        debug!(package = name, root = %root, "found package manifest");

        // Exports are authoritative: no main/index fallback for a
        // subpath the tree does not carry.
        if let Some(tree) = &pkg.exports {
            let request = if subpath.is_empty() {
                ".".to_string()
            } else {
                relative_form(subpath)
            };
            return match match_exports(tree, &request, ctx.conditions) {
                Some(ExportsMatch::Target(target)) => {
                    trace!(request = %request, target = %target, "exports match");
                    probe(ctx, &paths::join(&root, &target))
                }
                Some(ExportsMatch::Empty) => Ok(Some(EMPTY_MODULE.to_string())),
                None => Ok(None),
            };
        }

        if subpath.is_empty() {
            return probe_directory(ctx, &root);
        }

        let subpath = match match_alias_forms(&pkg.aliases, &[subpath, &relative_form(subpath)]) {
            Some(AliasMatch::Empty) => return Ok(Some(EMPTY_MODULE.to_string())),
            Some(AliasMatch::Redirect(target)) => target,
            None => subpath.to_string(),
        };
        return probe(ctx, &paths::join(&root, &subpath));
    }

    Ok(None)
}
