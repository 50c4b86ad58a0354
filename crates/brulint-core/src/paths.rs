//! Probe chain resolution
//!
//! Computes which directories are asked for a configuration when a file is
//! linted: every directory from the root boundary down to the file's own
//! directory, outermost first.

use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// Make a path absolute and resolve `.` and `..` lexically
///
/// Symlinks are not followed and the path does not need to exist.
pub fn normalize_path(path: &Path) -> PathBuf {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());

    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => normalized.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            Component::Normal(part) => normalized.push(part),
        }
    }
    normalized
}

/// True for `/` (or a drive root such as `C:\`)
pub fn is_filesystem_root(path: &Path) -> bool {
    path.has_root() && path.parent().is_none()
}

/// Directories to probe for configuration, outermost first
///
/// Returns an empty chain when `file_path` is not under `root`; the caller
/// then lints with the base configuration only.
///
/// The root itself is the first entry, except when the root is the
/// filesystem root: then only directories strictly below it are listed.
pub fn resolve_probe_chain(root: &Path, file_path: &Path) -> Vec<PathBuf> {
    let root = normalize_path(root);
    let file_path = normalize_path(file_path);

    let Ok(relative) = file_path.strip_prefix(&root) else {
        debug!(
            "{} is outside {}, using base config only",
            file_path.display(),
            root.display()
        );
        return Vec::new();
    };

    let mut dirs: Vec<_> = relative.components().map(|c| c.as_os_str()).collect();
    // The file name itself is not a probe target.
    if dirs.pop().is_none() {
        return Vec::new();
    }

    let mut chain = Vec::with_capacity(dirs.len() + 1);
    if !is_filesystem_root(&root) {
        chain.push(root.clone());
    }

    let mut current = root;
    for dir in dirs {
        current = current.join(dir);
        chain.push(current.clone());
    }

    debug!("Probe chain for {}: {:?}", file_path.display(), chain);
    chain
}
