//! End-to-end resolution scenarios over an in-memory module tree.
//!
//! One fixture filesystem covers the full feature surface: plain
//! relative/absolute requests, `node_modules` walking, entry-field
//! precedence, `browser`/`alias` maps (exact and glob), and conditional
//! `exports` with patterns, nested conditions, and `null` exclusions.

use dalkey_resolver::{
    FileSystem, MemoryFileSystem, ResolveError, Resolver, ResolverConfig, EMPTY_MODULE,
};
use serde_json::json;
use std::sync::{Arc, Mutex};

fn fixture() -> MemoryFileSystem {
    let mut fs = MemoryFileSystem::new();

    // Project files.
    fs.add_file("/package.json", json!({ "alias": { "aliased-file": "./bar" } }).to_string());
    fs.add_file("/foo.js", "");
    fs.add_file("/bar.js", "");
    fs.add_file("/packages/source/dist.js", "");
    fs.add_file("/packages/source-alias/other.js", "");
    fs.add_file("/nested/test.js", "");
    fs.add_file("/nested/index.js", "");

    // A package with no manifest at all.
    fs.add_file("/node_modules/foo/index.js", "");

    fs.add_file(
        "/node_modules/package-main/package.json",
        json!({ "main": "main.js" }).to_string(),
    );
    fs.add_file("/node_modules/package-main/main.js", "");

    fs.add_file(
        "/node_modules/package-browser/package.json",
        json!({ "main": "main.js", "browser": "browser.js" }).to_string(),
    );
    fs.add_file("/node_modules/package-browser/main.js", "");
    fs.add_file("/node_modules/package-browser/browser.js", "");

    fs.add_file(
        "/node_modules/package-browser-alias/package.json",
        json!({ "browser": { "./foo": "./bar" } }).to_string(),
    );
    fs.add_file("/node_modules/package-browser-alias/bar.js", "");

    fs.add_file(
        "/node_modules/package-alias/package.json",
        json!({ "alias": { "./foo": "./bar" } }).to_string(),
    );
    // `foo.js` exists so a missed alias would still resolve; the alias
    // must win before any probe sees it.
    fs.add_file("/node_modules/package-alias/foo.js", "");
    fs.add_file("/node_modules/package-alias/bar.js", "");

    fs.add_file(
        "/node_modules/package-alias-glob/package.json",
        json!({ "alias": { "./lib/*": "./src/*" } }).to_string(),
    );
    fs.add_file("/node_modules/package-alias-glob/index.js", "");
    fs.add_file("/node_modules/package-alias-glob/src/test.js", "");

    fs.add_file(
        "/node_modules/package-browser-exclude/package.json",
        json!({ "main": "index.js", "browser": { "./index.js": false } }).to_string(),
    );
    fs.add_file("/node_modules/package-browser-exclude/index.js", "");

    fs.add_file(
        "/node_modules/package-exports/package.json",
        json!({
            "main": "legacy.js",
            "exports": {
                ".": "./module.js",
                "./components/*": "./src//components/*.js",
                "./utils/*": { "browser": "./src/utils/*.js" },
                "./internal": null
            }
        })
        .to_string(),
    );
    fs.add_file("/node_modules/package-exports/legacy.js", "");
    fs.add_file("/node_modules/package-exports/module.js", "");
    fs.add_file("/node_modules/package-exports/src/components/a.js", "");
    fs.add_file("/node_modules/package-exports/src/utils/path.js", "");
    fs.add_file("/node_modules/package-exports/nope.js", "");

    fs.add_file("/node_modules/@scope/pkg/foo/bar.js", "");

    fs
}

fn resolver_with(fs: impl FileSystem + 'static, extensions: &[&str]) -> Resolver {
    Resolver::with_config(
        Arc::new(fs),
        ResolverConfig::default().with_extensions(extensions.iter().copied()),
    )
}

fn resolve(specifier: &str, importer: &str) -> Result<String, ResolveError> {
    resolver_with(fixture(), &[".js"]).resolve(specifier, importer)
}

#[test]
fn relative_with_parent_segment() {
    assert_eq!(
        resolve("../source/dist.js", "/packages/source-alias/other.js").unwrap(),
        "/packages/source/dist.js"
    );
}

#[test]
fn relative_with_extension_probing() {
    assert_eq!(resolve("./bar", "/foo.js").unwrap(), "/bar.js");
}

#[test]
fn absolute_directory_index() {
    let r = resolver_with(fixture(), &[".ts", ".tsx", ".js", ".jsx"]);
    assert_eq!(
        r.resolve("/nested", "/nested/test.js").unwrap(),
        "/nested/index.js"
    );
}

#[test]
fn bare_package_without_manifest() {
    assert_eq!(resolve("foo", "/foo.js").unwrap(), "/node_modules/foo/index.js");
}

#[test]
fn bare_package_main_field() {
    assert_eq!(
        resolve("package-main", "/foo.js").unwrap(),
        "/node_modules/package-main/main.js"
    );
}

#[test]
fn browser_string_beats_main() {
    assert_eq!(
        resolve("package-browser", "/foo.js").unwrap(),
        "/node_modules/package-browser/browser.js"
    );
}

#[test]
fn browser_object_rewrites_subpath() {
    assert_eq!(
        resolve("package-browser-alias/foo", "/foo.js").unwrap(),
        "/node_modules/package-browser-alias/bar.js"
    );
}

#[test]
fn alias_field_rewrites_subpath() {
    assert_eq!(
        resolve("package-alias/foo", "/foo.js").unwrap(),
        "/node_modules/package-alias/bar.js"
    );
}

#[test]
fn alias_glob_rewrites_relative_request() {
    assert_eq!(
        resolve("./lib/test", "/node_modules/package-alias-glob/index.js").unwrap(),
        "/node_modules/package-alias-glob/src/test.js"
    );
}

#[test]
fn root_package_aliases_bare_name() {
    assert_eq!(resolve("aliased-file", "/foo.js").unwrap(), "/bar.js");
}

#[test]
fn browser_exclusion_of_own_main() {
    assert_eq!(
        resolve("package-browser-exclude", "/foo.js").unwrap(),
        EMPTY_MODULE
    );
}

#[test]
fn exports_root() {
    assert_eq!(
        resolve("package-exports", "/foo.js").unwrap(),
        "/node_modules/package-exports/module.js"
    );
}

#[test]
fn exports_pattern_subpath() {
    assert_eq!(
        resolve("package-exports/components/a", "/foo.js").unwrap(),
        "/node_modules/package-exports/src/components/a.js"
    );
}

#[test]
fn exports_conditional_pattern_with_trailing_slash() {
    assert_eq!(
        resolve("package-exports/utils/path/", "/foo.js").unwrap(),
        "/node_modules/package-exports/src/utils/path.js"
    );
}

#[test]
fn exports_null_is_empty_sentinel() {
    assert_eq!(
        resolve("package-exports/internal", "/foo.js").unwrap(),
        EMPTY_MODULE
    );
}

#[test]
fn unknown_module_fails_with_context() {
    let err = resolve("unknown-module/test.js", "/nested/test.js").unwrap_err();
    match err {
        ResolveError::ModuleNotFound { specifier, importer } => {
            assert_eq!(specifier, "unknown-module/test.js");
            assert_eq!(importer, "/nested/test.js");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn scoped_package_subpath() {
    assert_eq!(
        resolve("@scope/pkg/foo/bar", "/foo.js").unwrap(),
        "/node_modules/@scope/pkg/foo/bar.js"
    );
}

// Universal properties.

#[test]
fn exports_are_authoritative() {
    // `nope.js` exists on disk but the exports tree has no entry for it.
    let err = resolve("package-exports/nope", "/foo.js").unwrap_err();
    assert!(matches!(err, ResolveError::ModuleNotFound { .. }));
}

#[test]
fn identical_calls_are_deterministic() {
    let r = resolver_with(fixture(), &[".js"]);
    for _ in 0..3 {
        assert_eq!(
            r.resolve("package-exports/components/a", "/foo.js").unwrap(),
            "/node_modules/package-exports/src/components/a.js"
        );
    }
}

/// Records every existence probe so tests can assert what was *not*
/// touched.
struct RecordingFs {
    inner: MemoryFileSystem,
    probed: Mutex<Vec<String>>,
}

impl FileSystem for RecordingFs {
    fn is_file(&self, path: &str) -> bool {
        self.probed.lock().unwrap().push(path.to_string());
        self.inner.is_file(path)
    }

    fn read_file(&self, path: &str) -> std::io::Result<String> {
        self.inner.read_file(path)
    }
}

#[test]
fn aliased_request_is_never_probed_unrewritten() {
    let probed = {
        let fs = RecordingFs {
            inner: fixture(),
            probed: Mutex::new(Vec::new()),
        };
        let probed_handle = Arc::new(fs);
        let r = Resolver::with_config(
            Arc::clone(&probed_handle) as Arc<dyn FileSystem>,
            ResolverConfig::default().with_extensions([".js"]),
        );
        assert_eq!(
            r.resolve("package-alias/foo", "/foo.js").unwrap(),
            "/node_modules/package-alias/bar.js"
        );
        let probed = probed_handle.probed.lock().unwrap().clone();
        probed
    };

    assert!(!probed.contains(&"/node_modules/package-alias/foo".to_string()));
    assert!(!probed.contains(&"/node_modules/package-alias/foo.js".to_string()));
}

#[tokio::test]
async fn async_driver_matches_sync() {
    let r = resolver_with(fixture(), &[".js"]);
    let sync = r.resolve("package-exports", "/foo.js").unwrap();
    let asynced = r.resolve_async("package-exports", "/foo.js").await.unwrap();
    assert_eq!(sync, asynced);

    let err = r.resolve_async("unknown-module", "/foo.js").await.unwrap_err();
    assert!(matches!(err, ResolveError::ModuleNotFound { .. }));
}
