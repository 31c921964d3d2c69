//! Specifier classification.
//!
//! Splits a request string into one of three shapes:
//! - Relative: `./utils`, `../lib/foo`
//! - Absolute: `/abs/path/to/module`
//! - Bare: `lodash`, `@scope/pkg`, `react/jsx-runtime`

use crate::paths;

/// A classified module specifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Specifier {
    /// Starts with `./` or `../`.
    Relative(String),
    /// Starts with `/`.
    Absolute(String),
    /// Anything else: a package name plus an optional subpath.
    Bare {
        /// Package name; two segments when scoped (`@scope/pkg`).
        name: String,
        /// Remainder after the name, without a leading `/`. Empty when absent.
        subpath: String,
    },
}

/// Collapse internal `//` runs and strip a trailing `/`.
///
/// Applied to user input before classification. Idempotent.
#[must_use]
pub fn normalize_module_specifier(specifier: &str) -> String {
    paths::normalize(specifier)
}

/// Classify a normalized specifier.
#[must_use]
pub fn classify(specifier: &str) -> Specifier {
    if specifier.starts_with("./") || specifier.starts_with("../") {
        return Specifier::Relative(specifier.to_string());
    }

    if specifier.starts_with('/') {
        return Specifier::Absolute(specifier.to_string());
    }

    let (name, subpath) = split_bare(specifier);
    Specifier::Bare {
        name: name.to_string(),
        subpath: subpath.to_string(),
    }
}

/// Split a bare specifier into package name and subpath.
///
/// The name runs to the first `/`, or through the second `/` for scoped
/// packages. The subpath is returned without its leading `/`.
fn split_bare(specifier: &str) -> (&str, &str) {
    if specifier.starts_with('@') {
        let mut slashes = 0;
        for (idx, c) in specifier.char_indices() {
            if c == '/' {
                slashes += 1;
                if slashes == 2 {
                    return (&specifier[..idx], &specifier[idx + 1..]);
                }
            }
        }
        return (specifier, "");
    }

    match specifier.find('/') {
        Some(idx) => (&specifier[..idx], &specifier[idx + 1..]),
        None => (specifier, ""),
    }
}
