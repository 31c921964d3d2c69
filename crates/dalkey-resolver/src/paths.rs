//! Posix path utilities for virtual resolver paths.
//!
//! The resolver operates on posix path strings, never `std::path::Path`:
//! the paths it sees describe a (possibly virtual) module filesystem, so
//! the host separator is irrelevant. Callers normalize before entry.

/// Collapse runs of `/` and strip a trailing `/`.
///
/// A leading `./` or `../` is preserved. `/` itself stays `/`.
#[must_use]
pub fn normalize(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut prev_slash = false;

    for c in path.chars() {
        if c == '/' {
            if !prev_slash {
                out.push('/');
            }
            prev_slash = true;
        } else {
            out.push(c);
            prev_slash = false;
        }
    }

    if out.len() > 1 && out.ends_with('/') {
        out.pop();
    }

    out
}

/// Join `rel` onto `base`, resolving `.` and `..` segments.
///
/// An absolute `rel` replaces `base`. The result is normalized: no `..`,
/// no `//`. `..` never pops past the root.
#[must_use]
pub fn join(base: &str, rel: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();

    let base = if rel.starts_with('/') { "" } else { base };

    for part in base.split('/').chain(rel.split('/')) {
        match part {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            seg => segments.push(seg),
        }
    }

    let mut out = String::with_capacity(rel.len() + base.len());
    out.push('/');
    out.push_str(&segments.join("/"));
    out
}

/// Parent directory of `path`, posix semantics.
///
/// `dirname("/a/b")` is `/a`; `dirname("/a")` and `dirname("/")` are `/`.
#[must_use]
pub fn dirname(path: &str) -> &str {
    match path.rfind('/') {
        Some(0) => "/",
        Some(idx) => &path[..idx],
        None => ".",
    }
}

/// Final component of `path`, posix semantics.
#[must_use]
pub fn basename(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) => &path[idx + 1..],
        None => path,
    }
}

/// The chain `[p, dirname(p), ...]`, ending at `/`.
///
/// When `root_dir` is given the chain ends there instead (inclusive of
/// `root_dir`, exclusive of its parent). The sequence is finite and
/// duplicate-free.
#[must_use]
pub fn parent_directories(path: &str, root_dir: Option<&str>) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = normalize(path);

    loop {
        out.push(current.clone());
        if current == "/" {
            break;
        }
        if root_dir == Some(current.as_str()) {
            break;
        }
        let parent = dirname(&current).to_string();
        if parent == current {
            break;
        }
        current = parent;
    }

    out
}
