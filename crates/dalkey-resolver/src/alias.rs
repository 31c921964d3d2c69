//! Alias table matching.
//!
//! The merged alias table (see [`crate::manifest`]) maps request keys to
//! rewrites. Entries are ordered; the first matching entry wins. Keys are
//! either exact strings or globs with a single `*`; values are either a
//! redirect (optionally substituting the captured `*` segment) or the
//! empty-module sentinel.

/// Alias table key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AliasKey {
    Exact(String),
    /// A pattern with exactly one `*`, split at the star.
    Glob { prefix: String, suffix: String },
}

impl AliasKey {
    /// Parse a raw manifest key: a `*` makes it a glob, otherwise exact.
    #[must_use]
    pub fn parse(key: &str) -> Self {
        match key.find('*') {
            Some(idx) => Self::Glob {
                prefix: key[..idx].to_string(),
                suffix: key[idx + 1..].to_string(),
            },
            None => Self::Exact(key.to_string()),
        }
    }

    /// Match `request` against this key. The outer `Option` is the match;
    /// the inner one carries the captured middle for glob keys.
    fn matches<'r>(&self, request: &'r str) -> Option<Option<&'r str>> {
        match self {
            Self::Exact(key) => (key == request).then_some(None),
            Self::Glob { prefix, suffix } => {
                if request.len() >= prefix.len() + suffix.len()
                    && request.starts_with(prefix.as_str())
                    && request.ends_with(suffix.as_str())
                {
                    Some(Some(&request[prefix.len()..request.len() - suffix.len()]))
                } else {
                    None
                }
            }
        }
    }
}

/// Alias table value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AliasValue {
    /// Rewrite to another specifier; a `*` in the text is replaced with
    /// the captured glob segment.
    Redirect(String),
    /// `false` in the manifest: resolve to the empty-module sentinel.
    Empty,
}

/// One entry of the merged alias table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasEntry {
    pub key: AliasKey,
    pub value: AliasValue,
}

/// Outcome of a successful alias lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AliasMatch {
    Redirect(String),
    Empty,
}

/// Look up `request` in the table. First matching entry wins.
#[must_use]
pub fn match_alias(entries: &[AliasEntry], request: &str) -> Option<AliasMatch> {
    match_alias_forms(entries, &[request])
}

/// Look up several spellings of the same request.
///
/// Package-relative files can be asked for as `foo` (a subpath), `./foo`
/// (a relative request or a `browser` map key), or a verbatim manifest
/// entry like `index.js`. Entry order still dominates: every form is
/// offered to an entry before the next entry is considered.
#[must_use]
pub fn match_alias_forms(entries: &[AliasEntry], forms: &[&str]) -> Option<AliasMatch> {
    for entry in entries {
        for form in forms {
            if let Some(captured) = entry.key.matches(form) {
                return Some(match &entry.value {
                    AliasValue::Empty => AliasMatch::Empty,
                    AliasValue::Redirect(target) => AliasMatch::Redirect(match captured {
                        Some(mid) if target.contains('*') => target.replacen('*', mid, 1),
                        _ => target.clone(),
                    }),
                });
            }
        }
    }
    None
}

/// The `./…` spelling of a package-relative path.
#[must_use]
pub fn relative_form(path: &str) -> String {
    if path.starts_with("./") || path.starts_with("../") {
        path.to_string()
    } else {
        format!("./{path}")
    }
}
