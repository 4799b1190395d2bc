//! Lexical path checks used before touching the filesystem.

use std::path::{Component, Path, PathBuf};

/// Resolve `.` and `..` components without consulting the filesystem.
pub(crate) fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                match out.components().next_back() {
                    Some(Component::Normal(_)) => {
                        out.pop();
                    }
                    // `..` above the root is the root itself
                    Some(Component::RootDir | Component::Prefix(_)) => {}
                    _ => out.push(".."),
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// True when `candidate`, relative to `root`, would start with `..` or be absolute.
pub(crate) fn escapes_root(root: &Path, candidate: &Path) -> bool {
    normalize(candidate).strip_prefix(normalize(root)).is_err()
}

/// A user folder must be a non-empty relative path without parent components.
pub fn is_safe_relative(ruta: &str) -> bool {
    let path = Path::new(ruta);
    !ruta.trim().is_empty()
        && path
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}
