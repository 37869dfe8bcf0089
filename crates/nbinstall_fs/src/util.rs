use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use filetime::FileTime;
use globset::{Glob, GlobSet, GlobSetBuilder};

use crate::report::ReportCopyBuilder;
use crate::spec::CopyTreeError;

////////////////////////////////////////////////////////////////////////////////
// #region PatternMatching

#[derive(Debug, Clone, Default)]
pub(crate) struct SpecCopyPatterns {
    pub(crate) patterns_ignore: Option<GlobSet>,
}

impl SpecCopyPatterns {
    pub(crate) fn from_raw(patterns_ignore: &[String]) -> Result<Self, CopyTreeError> {
        Ok(Self {
            patterns_ignore: _compile(patterns_ignore)?,
        })
    }

    /// Whether an entry basename matches any ignore glob.
    pub(crate) fn is_ignored(&self, name: &str) -> bool {
        match &self.patterns_ignore {
            None => false,
            Some(set_glob) => set_glob.is_match(name),
        }
    }
}

fn _compile(patterns: &[String]) -> Result<Option<GlobSet>, CopyTreeError> {
    if patterns.is_empty() {
        return Ok(None);
    }

    let mut builder_glob = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|e| {
            CopyTreeError::InvalidPattern(format!("Invalid ignore pattern `{pattern}`: {e}"))
        })?;
        builder_glob.add(glob);
    }
    let set_glob = builder_glob.build().map_err(|e| {
        CopyTreeError::InvalidPattern(format!("Failed to build ignore patterns: {e}"))
    })?;
    Ok(Some(set_glob))
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region PathUtilities

/// Make `path` absolute against the current directory and fold `.`/`..`
/// components lexically. Symlinks are not resolved.
pub fn absolutize_path(path: &Path) -> PathBuf {
    let path_abs = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("/"))
            .join(path)
    };

    let mut path_out = PathBuf::new();
    for component in path_abs.components() {
        match component {
            Component::CurDir => {}
            // `/..` stays `/`: popping the root is a no-op.
            Component::ParentDir => {
                path_out.pop();
            }
            other => path_out.push(other.as_os_str()),
        }
    }
    path_out
}

fn _normalize_path(path: &Path) -> PathBuf {
    if let Ok(resolved) = fs::canonicalize(path) {
        return resolved;
    }
    // A destination that does not exist yet: resolve its nearest existing
    // ancestor so `/tmp/../tmp/x` and `/tmp/x` compare equal.
    let path_abs = absolutize_path(path);
    let mut path_cursor = path_abs.as_path();
    let mut l_tail = Vec::new();
    while let Some(path_parent) = path_cursor.parent() {
        if let Some(name) = path_cursor.file_name() {
            l_tail.push(name.to_os_string());
        }
        if let Ok(resolved) = fs::canonicalize(path_parent) {
            return l_tail
                .into_iter()
                .rev()
                .fold(resolved, |acc, name| acc.join(name));
        }
        path_cursor = path_parent;
    }
    path_abs
}

/// Whether `src` and `dst` are the same tree or one contains the other, with
/// symlinks in their existing ancestors resolved.
pub fn is_overlap(src: &Path, dst: &Path) -> bool {
    let src_resolved = _normalize_path(src);
    let dst_resolved = _normalize_path(dst);
    dst_resolved.starts_with(&src_resolved) || src_resolved.starts_with(&dst_resolved)
}

pub(crate) fn validate_destination_path_safety(
    path_dst_item: &Path,
    path_dir_dst_root: &Path,
) -> Result<(), String> {
    let path_dir_dst_root_abs = absolutize_path(path_dir_dst_root);
    let path_dst_item_abs = absolutize_path(path_dst_item);

    if !path_dst_item_abs.starts_with(&path_dir_dst_root_abs) {
        return Err(format!(
            "Unsafe destination path escapes destination root: {} (root={})",
            path_dst_item.display(),
            path_dir_dst_root.display()
        ));
    }

    let path_parent_dst = path_dst_item_abs.parent().ok_or_else(|| {
        format!(
            "Failed to derive parent directory: {}",
            path_dst_item.display()
        )
    })?;
    let path_parent_rel = path_parent_dst
        .strip_prefix(&path_dir_dst_root_abs)
        .map_err(|_| {
            format!(
                "Unsafe destination parent escapes destination root: {} (root={})",
                path_dst_item.display(),
                path_dir_dst_root.display()
            )
        })?;

    let mut path_cursor = path_dir_dst_root_abs.clone();
    for part_rel in path_parent_rel.components() {
        path_cursor.push(part_rel.as_os_str());
        match fs::symlink_metadata(&path_cursor) {
            Ok(meta_cursor) => {
                if meta_cursor.file_type().is_symlink() {
                    return Err(format!(
                        "Unsafe destination path traverses symlink component: {}",
                        path_cursor.display()
                    ));
                }
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(format!(
                    "Failed to inspect destination path component {} ({e})",
                    path_cursor.display()
                ));
            }
        }
    }

    match fs::symlink_metadata(&path_dst_item_abs) {
        Ok(_) => Err(format!(
            "Destination entry already exists: {}",
            path_dst_item.display()
        )),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(format!(
            "Failed to inspect destination path {} ({e})",
            path_dst_item.display()
        )),
    }
}

/// Recreate the symlink at `path_src` as `path_dst`, keeping its target text.
pub(crate) fn create_symbolic_link(
    path_src: &Path,
    path_dst: &Path,
    builder_cp_report: &mut ReportCopyBuilder,
) {
    let target = match fs::read_link(path_src) {
        Ok(v) => v,
        Err(e) => {
            builder_cp_report.add_error(path_src.to_path_buf(), e.to_string());
            return;
        }
    };

    #[cfg(unix)]
    let res_link = std::os::unix::fs::symlink(&target, path_dst);
    #[cfg(windows)]
    let res_link = if path_src.is_dir() {
        std::os::windows::fs::symlink_dir(&target, path_dst)
    } else {
        std::os::windows::fs::symlink_file(&target, path_dst)
    };
    #[cfg(not(any(unix, windows)))]
    let res_link: io::Result<()> = {
        let _ = target;
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "Symbolic links are unsupported on this platform",
        ))
    };

    match res_link {
        Ok(()) => {
            copy_symlink_times(path_src, path_dst);
            builder_cp_report.add_symlink();
        }
        Err(e) => builder_cp_report.add_error(path_dst.to_path_buf(), e.to_string()),
    }
}

// Best effort: some filesystems refuse timestamps on links.
fn copy_symlink_times(path_src: &Path, path_dst: &Path) {
    if let Ok(stat_src) = fs::symlink_metadata(path_src) {
        let _ = filetime::set_symlink_file_times(
            path_dst,
            FileTime::from_last_access_time(&stat_src),
            FileTime::from_last_modification_time(&stat_src),
        );
    }
}

pub(crate) fn copy_file_with_metadata(
    path_file_src: &Path,
    path_file_dst: &Path,
) -> Result<(), io::Error> {
    fs::copy(path_file_src, path_file_dst)?;
    apply_metadata(path_file_src, path_file_dst)?;
    #[cfg(target_os = "linux")]
    {
        copy_xattrs_linux(path_file_src, path_file_dst);
    }
    Ok(())
}

/// Copy permission bits and access/modification times from `path_src`
/// (followed if it is a link) onto `path_dst`.
pub(crate) fn apply_metadata(path_src: &Path, path_dst: &Path) -> Result<(), io::Error> {
    let stat_src = fs::metadata(path_src)?;
    let file_time_access = FileTime::from_last_access_time(&stat_src);
    let file_time_modify = FileTime::from_last_modification_time(&stat_src);
    filetime::set_file_times(path_dst, file_time_access, file_time_modify)?;
    fs::set_permissions(path_dst, stat_src.permissions())?;
    Ok(())
}

#[cfg(target_os = "linux")]
fn copy_xattrs_linux(path_file_src: &Path, path_file_dst: &Path) {
    let iter_xattr_names = match xattr::list(path_file_src) {
        Ok(v) => v,
        Err(_) => return,
    };

    for name in iter_xattr_names {
        let Some(raw_value) = xattr::get(path_file_src, &name).ok().flatten() else {
            continue;
        };
        let _ = xattr::set(path_file_dst, &name, &raw_value);
    }
}

pub(crate) fn derive_destination_path(
    path_src: &Path,
    path_item_name: &str,
    path_dir_src: &Path,
    path_dir_dst: &Path,
) -> PathBuf {
    path_dir_dst.join(
        path_src
            .strip_prefix(path_dir_src)
            .unwrap_or(Path::new(path_item_name)),
    )
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
