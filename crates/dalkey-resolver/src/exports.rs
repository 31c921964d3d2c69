//! Conditional `exports` map compilation and matching.
//!
//! The manifest's `exports` field is compiled once into an [`ExportsTree`]
//! and matched against request subpaths with condition selection. Exports
//! are authoritative: when a package carries the field, an unmatched
//! subpath fails without falling back to `main`/`index` resolution.

use serde_json::Value;

/// A subpath key of the exports map: exact, or a pattern with one `*`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubpathKey {
    Exact(String),
    Pattern { prefix: String, suffix: String },
}

impl SubpathKey {
    fn parse(key: &str) -> Self {
        // The empty subpath and "." both denote the package itself.
        let key = if key.is_empty() { "." } else { key };
        match key.find('*') {
            Some(idx) => Self::Pattern {
                prefix: key[..idx].to_string(),
                suffix: key[idx + 1..].to_string(),
            },
            None => Self::Exact(key.to_string()),
        }
    }
}

/// A target inside the exports tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportsTarget {
    /// A package-relative path, possibly containing one `*`.
    Path(String),
    /// Condition name → target, in declaration order.
    Conditions(Vec<(String, ExportsTarget)>),
    /// `null`: the subpath resolves to the empty-module sentinel.
    Null,
}

/// Compiled form of the `exports` field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportsTree {
    /// A bare string or a root-level conditions object: the package
    /// itself, nothing else.
    Root(ExportsTarget),
    /// Subpath map, in declaration order.
    Subpaths(Vec<(SubpathKey, ExportsTarget)>),
}

/// Outcome of matching a subpath against the tree.
///
/// A miss is represented by `Option::None` at the call site; it is a
/// controlled fall-through, never an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportsMatch {
    /// Package-relative path to probe.
    Target(String),
    /// Explicit `null`: resolve to the empty-module sentinel.
    Empty,
}

/// Compile a raw `exports` value.
///
/// An object whose keys all begin with `.` (or are empty) is a subpath
/// map; an object with no such key is a conditions map for the package
/// root. Mixing the two at one level is malformed.
pub fn compile(exports: &Value) -> Result<ExportsTree, String> {
    match exports {
        Value::String(target) => Ok(ExportsTree::Root(ExportsTarget::Path(target.clone()))),
        Value::Object(map) => {
            let subpath_keys = map.keys().filter(|k| k.is_empty() || k.starts_with('.')).count();
            if subpath_keys == map.len() {
                let mut entries = Vec::with_capacity(map.len());
                for (key, value) in map {
                    entries.push((SubpathKey::parse(key), compile_target(value)?));
                }
                Ok(ExportsTree::Subpaths(entries))
            } else if subpath_keys == 0 {
                Ok(ExportsTree::Root(compile_target(exports)?))
            } else {
                Err("exports object mixes subpath and condition keys".to_string())
            }
        }
        other => Err(format!("unsupported exports shape: {other}")),
    }
}

fn compile_target(value: &Value) -> Result<ExportsTarget, String> {
    match value {
        Value::String(target) => Ok(ExportsTarget::Path(target.clone())),
        Value::Null => Ok(ExportsTarget::Null),
        Value::Object(map) => {
            let mut conditions = Vec::with_capacity(map.len());
            for (name, target) in map {
                if name.is_empty() || name.starts_with('.') {
                    return Err("exports object mixes subpath and condition keys".to_string());
                }
                conditions.push((name.clone(), compile_target(target)?));
            }
            Ok(ExportsTarget::Conditions(conditions))
        }
        other => Err(format!("unsupported exports target: {other}")),
    }
}

/// Match `subpath` (`.` or `./…`) against the tree under the active
/// condition set.
#[must_use]
pub fn match_exports(
    tree: &ExportsTree,
    subpath: &str,
    conditions: &[String],
) -> Option<ExportsMatch> {
    match tree {
        ExportsTree::Root(target) => {
            if subpath == "." {
                resolve_target(target, conditions, None)
            } else {
                None
            }
        }
        ExportsTree::Subpaths(entries) => {
            // Exact keys beat patterns.
            for (key, target) in entries {
                if matches!(key, SubpathKey::Exact(k) if k == subpath) {
                    return resolve_target(target, conditions, None);
                }
            }

            // Most specific pattern: longest prefix, ties by longest suffix.
            let mut best: Option<(&str, &str, &ExportsTarget)> = None;
            for (key, target) in entries {
                let SubpathKey::Pattern { prefix, suffix } = key else {
                    continue;
                };
                if subpath.len() < prefix.len() + suffix.len()
                    || !subpath.starts_with(prefix.as_str())
                    || !subpath.ends_with(suffix.as_str())
                {
                    continue;
                }
                let more_specific = match best {
                    None => true,
                    Some((bp, bs, _)) => {
                        prefix.len() > bp.len() || (prefix.len() == bp.len() && suffix.len() > bs.len())
                    }
                };
                if more_specific {
                    best = Some((prefix, suffix, target));
                }
            }

            let (prefix, suffix, target) = best?;
            let captured = &subpath[prefix.len()..subpath.len() - suffix.len()];
            resolve_target(target, conditions, Some(captured))
        }
    }
}

/// Descend through condition maps, in declaration order, selecting the
/// first condition in the active set (or `default`).
fn resolve_target(
    target: &ExportsTarget,
    conditions: &[String],
    captured: Option<&str>,
) -> Option<ExportsMatch> {
    match target {
        ExportsTarget::Null => Some(ExportsMatch::Empty),
        ExportsTarget::Path(path) => {
            let resolved = match captured {
                Some(mid) if path.contains('*') => path.replacen('*', mid, 1),
                _ => path.clone(),
            };
            Some(ExportsMatch::Target(resolved))
        }
        ExportsTarget::Conditions(entries) => {
            for (name, sub) in entries {
                if name == "default" || conditions.iter().any(|c| c == name) {
                    return resolve_target(sub, conditions, captured);
                }
            }
            None
        }
    }
}
