use std::fs::Metadata;
use std::io;
use std::path::{Component, Path, PathBuf};

use crate::error::ResolveError;

/// Joins `target` onto `doc_root` and normalises `.` and `..` lexically.
///
/// The result must stay inside `doc_root`, compared component by component so
/// that a root of `/srv/a` does not admit `/srv/ab`. Both sides are
/// normalised the same way, so `doc_root` need not be canonical. The
/// filesystem is not consulted.
pub fn resolve_path(doc_root: &Path, target: &str) -> Result<PathBuf, ResolveError> {
    let root = normalize(doc_root);
    let resolved = normalize(&root.join(target.trim_start_matches('/')));

    if resolved.starts_with(&root) {
        Ok(resolved)
    } else {
        Err(ResolveError::PathOutsideRoot)
    }
}

fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Resolves `target` and stats it, accepting only regular files.
///
/// Directories, missing paths and any other stat failure are all reported as
/// [`ResolveError::FileNotFound`].
pub async fn locate(doc_root: &Path, target: &str) -> Result<(PathBuf, Metadata), ResolveError> {
    let path = resolve_path(doc_root, target)?;

    match tokio::fs::metadata(&path).await {
        Ok(meta) if meta.is_file() => Ok((path, meta)),
        Ok(_) => Err(ResolveError::FileNotFound),
        Err(e) => {
            if e.kind() != io::ErrorKind::NotFound {
                tracing::debug!(path = %path.display(), error = %e, "stat failed");
            }
            Err(ResolveError::FileNotFound)
        }
    }
}
