use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};

/// An entry path vetted for extraction.
#[derive(Clone, Debug)]
pub struct SanitizedPath {
    /// Normalized path relative to the extraction root.
    pub relative: PathBuf,
    /// Absolute destination, `root` joined with `relative`.
    pub resolved: PathBuf,
}

/// Validate an archive entry path against the extraction root.
///
/// Absolute entries and entries whose parent-directory components climb
/// above the root are rejected with [`Error::PathEscape`]. `.` components
/// are dropped, so `./app/bin` and `app/bin` resolve identically. An
/// entry naming the root itself (`./`) yields an empty relative path.
pub fn sanitize_entry_path(entry_path: &Path, root: &Path) -> Result<SanitizedPath> {
    let escape = || Error::PathEscape {
        entry: entry_path.to_path_buf(),
    };

    if entry_path.is_absolute() {
        return Err(escape());
    }

    let relative = normalize_path(entry_path).ok_or_else(escape)?;

    let resolved = root.join(&relative);
    if !resolved.starts_with(root) {
        return Err(escape());
    }

    Ok(SanitizedPath { relative, resolved })
}

/// Resolve `.` and `..` components lexically, without touching the
/// filesystem. `None` means the path climbed above its starting point.
fn normalize_path(path: &Path) -> Option<PathBuf> {
    let mut result = PathBuf::new();

    for component in path.components() {
        match component {
            Component::ParentDir => {
                if !result.pop() {
                    return None;
                }
            }
            Component::Normal(part) => result.push(part),
            Component::CurDir => {}
            Component::RootDir | Component::Prefix(_) => return None,
        }
    }

    Some(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root() -> &'static Path {
        if cfg!(windows) {
            Path::new("C:/srv/unpack")
        } else {
            Path::new("/srv/unpack")
        }
    }

    #[test]
    fn relative_entry_resolves_under_root() {
        let sanitized = sanitize_entry_path(Path::new("app/bin/server"), root()).unwrap();
        assert_eq!(sanitized.relative, Path::new("app/bin/server"));
        assert_eq!(sanitized.resolved, root().join("app/bin/server"));
    }

    #[test]
    fn leading_dot_is_dropped() {
        let sanitized = sanitize_entry_path(Path::new("./app/config"), root()).unwrap();
        assert_eq!(sanitized.relative, Path::new("app/config"));
    }

    #[test]
    fn root_entry_yields_empty_relative_path() {
        let sanitized = sanitize_entry_path(Path::new("./"), root()).unwrap();
        assert!(sanitized.relative.as_os_str().is_empty());
        assert_eq!(sanitized.resolved, root());
    }

    #[test]
    fn interior_parent_components_collapse() {
        let sanitized = sanitize_entry_path(Path::new("app/tmp/../data"), root()).unwrap();
        assert_eq!(sanitized.relative, Path::new("app/data"));
    }

    #[test]
    fn leading_parent_component_rejected() {
        let result = sanitize_entry_path(Path::new("../evil"), root());
        assert!(matches!(result, Err(Error::PathEscape { .. })));
    }

    #[test]
    fn deep_traversal_rejected() {
        let result = sanitize_entry_path(Path::new("app/../../evil"), root());
        assert!(matches!(result, Err(Error::PathEscape { .. })));
    }

    #[test]
    fn absolute_entry_rejected() {
        let malicious = if cfg!(windows) {
            "C:\\etc\\passwd"
        } else {
            "/etc/passwd"
        };
        let result = sanitize_entry_path(Path::new(malicious), root());
        assert!(matches!(result, Err(Error::PathEscape { .. })));
    }
}
