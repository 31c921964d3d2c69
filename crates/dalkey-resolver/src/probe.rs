//! Filesystem candidate probing.
//!
//! A candidate path is tried as a file, then with each configured
//! extension appended, then as a directory: the directory's manifest
//! entry (routed through its alias table first), then `index.<ext>`.

use crate::alias::{match_alias_forms, relative_form, AliasMatch};
use crate::error::ResolveError;
use crate::paths;
use crate::resolver::{ResolveCtx, EMPTY_MODULE};

/// Probe `candidate` as file, file-with-extension, then directory.
pub(crate) fn probe(
    ctx: &ResolveCtx<'_>,
    candidate: &str,
) -> Result<Option<String>, ResolveError> {
    if ctx.fs.is_file(candidate) {
        return Ok(Some(candidate.to_string()));
    }

    for ext in ctx.extensions {
        let with_ext = format!("{candidate}{ext}");
        if ctx.fs.is_file(&with_ext) {
            return Ok(Some(with_ext));
        }
    }

    probe_directory(ctx, candidate)
}

/// Probe `dir` as a directory: aliased manifest entry, then `index.<ext>`.
///
/// Index candidates are offered to the directory's alias table in their
/// `./index<ext>` spelling before touching the filesystem, so a `browser`
/// map can exclude or redirect a package's own index.
pub(crate) fn probe_directory(
    ctx: &ResolveCtx<'_>,
    dir: &str,
) -> Result<Option<String>, ResolveError> {
    let manifest = ctx.manifest_for(dir)?;

    if let Some(manifest) = &manifest {
        if let Some(entry) = &manifest.entry {
            let entry = match match_alias_forms(
                &manifest.aliases,
                &[entry.as_str(), &relative_form(entry)],
            ) {
                Some(AliasMatch::Empty) => return Ok(Some(EMPTY_MODULE.to_string())),
                Some(AliasMatch::Redirect(target)) => target,
                None => entry.clone(),
            };

            let target = paths::join(dir, &entry);
            // An entry pointing back at its own directory would recurse
            // forever; skip it and fall through to index probing.
            if target != dir {
                if let Some(found) = probe(ctx, &target)? {
                    return Ok(Some(found));
                }
            }
        }
    }

    for ext in ctx.extensions {
        let index_rel = format!("index{ext}");

        if let Some(manifest) = &manifest {
            match match_alias_forms(&manifest.aliases, &[&relative_form(&index_rel)]) {
                Some(AliasMatch::Empty) => return Ok(Some(EMPTY_MODULE.to_string())),
                Some(AliasMatch::Redirect(target)) => {
                    if let Some(found) = probe(ctx, &paths::join(dir, &target))? {
                        return Ok(Some(found));
                    }
                    continue;
                }
                None => {}
            }
        }

        let index_path = paths::join(dir, &index_rel);
        if ctx.fs.is_file(&index_path) {
            return Ok(Some(index_path));
        }
    }

    Ok(None)
}
