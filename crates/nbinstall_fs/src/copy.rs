//! Filesystem tree traversal and copy orchestration.

use std::fs;
use std::path::{Path, PathBuf};

use crate::report::{ReportCopy, ReportCopyBuilder};
use crate::spec::{CopyTreeError, SpecCopyOptions};
use crate::util::{
    SpecCopyPatterns, apply_metadata, copy_file_with_metadata, create_symbolic_link,
    derive_destination_path, is_overlap, validate_destination_path_safety,
};

#[derive(Debug, Clone)]
struct SpecDirEntry {
    path_dir_src_sub: PathBuf,
    name_dir: String,
}

#[derive(Debug, Clone)]
struct SpecFileEntry {
    path_file_src: PathBuf,
    name_file: String,
    if_is_symlink: bool,
}

#[derive(Debug)]
struct SpecCopyContext {
    path_dir_src: PathBuf,
    path_dir_dst: PathBuf,
    spec_cp_pats: SpecCopyPatterns,
    builder_cp_report: ReportCopyBuilder,
}

/// Copy a directory tree from `dir_source` into a new `dir_destination`.
///
/// Entries whose basename matches an ignore glob of [`SpecCopyOptions`] are
/// skipped, and ignored directories are not descended into. Symlinks are
/// recreated as links with the same target text and never followed.
///
/// Regular files keep their permission bits and timestamps; directories get
/// theirs once their children are copied.
///
/// The destination must not exist yet; its missing parents are created.
/// Returns [`ReportCopy`] when the walk completes, with per-entry failures
/// stored in the report (the walk does not stop at the first one). Returns
/// [`CopyTreeError`] only for setup and validation failures, before anything
/// is written.
pub fn copy_tree<P, Q>(
    dir_source: P,
    dir_destination: Q,
    spec_cp_options: SpecCopyOptions,
) -> Result<ReportCopy, CopyTreeError>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let path_dir_src = dir_source.as_ref().to_path_buf();
    let path_dir_dst = dir_destination.as_ref().to_path_buf();

    if !path_dir_src.is_dir() {
        return Err(CopyTreeError::SourceNotDirectory(path_dir_src));
    }
    if fs::symlink_metadata(&path_dir_dst).is_ok() {
        return Err(CopyTreeError::DestinationExists(path_dir_dst));
    }
    if is_overlap(&path_dir_src, &path_dir_dst) {
        return Err(CopyTreeError::SourceDestinationOverlap {
            source: path_dir_src,
            destination: path_dir_dst,
        });
    }
    let spec_cp_pats = SpecCopyPatterns::from_raw(&spec_cp_options.patterns_ignore)?;

    fs::create_dir_all(&path_dir_dst).map_err(|e| CopyTreeError::DestinationInitFailed {
        path: path_dir_dst.clone(),
        message: e.to_string(),
    })?;

    let mut spec_cp_ctx = SpecCopyContext {
        path_dir_src: path_dir_src.clone(),
        path_dir_dst: path_dir_dst.clone(),
        spec_cp_pats,
        builder_cp_report: ReportCopyBuilder::default(),
    };

    walk_directory(&path_dir_src, &mut spec_cp_ctx);
    if let Err(e) = apply_metadata(&path_dir_src, &path_dir_dst) {
        spec_cp_ctx
            .builder_cp_report
            .add_error(path_dir_dst, e.to_string());
    }
    Ok(spec_cp_ctx.builder_cp_report.build())
}

fn should_error_unsafe_destination_path(
    path_dst: &Path,
    spec_cp_ctx: &mut SpecCopyContext,
) -> bool {
    if let Err(message) = validate_destination_path_safety(path_dst, &spec_cp_ctx.path_dir_dst) {
        spec_cp_ctx
            .builder_cp_report
            .add_error(path_dst.to_path_buf(), message);
        return true;
    }
    false
}

fn walk_directory(path_root: &Path, spec_cp_ctx: &mut SpecCopyContext) {
    let mut l_dirs: Vec<SpecDirEntry> = Vec::new();
    let mut l_files: Vec<SpecFileEntry> = Vec::new();

    let iter_entries = match fs::read_dir(path_root) {
        Ok(iter) => iter,
        Err(e) => {
            spec_cp_ctx.builder_cp_report.add_error(
                path_root.to_path_buf(),
                format!("Failed to read directory ({e})"),
            );
            return;
        }
    };

    for _entry_res in iter_entries {
        let entry = match _entry_res {
            Ok(v) => v,
            Err(e) => {
                spec_cp_ctx.builder_cp_report.add_error(
                    path_root.to_path_buf(),
                    format!("Failed to read directory entry ({e})"),
                );
                continue;
            }
        };

        let path_entry = entry.path();
        let c_name = entry.file_name().to_string_lossy().to_string();
        spec_cp_ctx.builder_cp_report.add_scanned();
        if spec_cp_ctx.spec_cp_pats.is_ignored(&c_name) {
            spec_cp_ctx.builder_cp_report.add_ignored();
            continue;
        }

        let cfg_file_type = match entry.file_type() {
            Ok(v) => v,
            Err(e) => {
                spec_cp_ctx
                    .builder_cp_report
                    .add_error(path_entry, format!("Failed to inspect entry ({e})"));
                continue;
            }
        };

        // `file_type` does not follow links: a link to a directory is a file entry.
        if cfg_file_type.is_dir() {
            l_dirs.push(SpecDirEntry {
                path_dir_src_sub: path_entry,
                name_dir: c_name,
            });
        } else {
            l_files.push(SpecFileEntry {
                path_file_src: path_entry,
                name_file: c_name,
                if_is_symlink: cfg_file_type.is_symlink(),
            });
        }
    }

    l_dirs.sort_by(|a, b| a.name_dir.cmp(&b.name_dir));
    l_files.sort_by(|a, b| a.name_file.cmp(&b.name_file));

    for _dir_entry in l_dirs {
        handle_dir_entry(_dir_entry, spec_cp_ctx);
    }

    for _file_entry in l_files {
        handle_file_entry(_file_entry, spec_cp_ctx);
    }
}

fn handle_dir_entry(spec_dir_entry: SpecDirEntry, spec_cp_ctx: &mut SpecCopyContext) {
    let path_dir_dst_sub = derive_destination_path(
        &spec_dir_entry.path_dir_src_sub,
        &spec_dir_entry.name_dir,
        &spec_cp_ctx.path_dir_src,
        &spec_cp_ctx.path_dir_dst,
    );
    if should_error_unsafe_destination_path(&path_dir_dst_sub, spec_cp_ctx) {
        return;
    }

    if let Err(e) = fs::create_dir(&path_dir_dst_sub) {
        spec_cp_ctx
            .builder_cp_report
            .add_error(path_dir_dst_sub, e.to_string());
        return;
    }
    spec_cp_ctx.builder_cp_report.add_copied();

    walk_directory(&spec_dir_entry.path_dir_src_sub, spec_cp_ctx);

    if let Err(e) = apply_metadata(&spec_dir_entry.path_dir_src_sub, &path_dir_dst_sub) {
        spec_cp_ctx
            .builder_cp_report
            .add_error(path_dir_dst_sub, e.to_string());
    }
}

fn handle_file_entry(spec_file_entry: SpecFileEntry, spec_cp_ctx: &mut SpecCopyContext) {
    let path_file_dst = derive_destination_path(
        &spec_file_entry.path_file_src,
        &spec_file_entry.name_file,
        &spec_cp_ctx.path_dir_src,
        &spec_cp_ctx.path_dir_dst,
    );
    if should_error_unsafe_destination_path(&path_file_dst, spec_cp_ctx) {
        return;
    }

    if spec_file_entry.if_is_symlink {
        create_symbolic_link(
            &spec_file_entry.path_file_src,
            &path_file_dst,
            &mut spec_cp_ctx.builder_cp_report,
        );
        return;
    }

    let meta_file_src = match fs::symlink_metadata(&spec_file_entry.path_file_src) {
        Ok(v) => v,
        Err(e) => {
            spec_cp_ctx
                .builder_cp_report
                .add_error(spec_file_entry.path_file_src, e.to_string());
            return;
        }
    };
    if !meta_file_src.file_type().is_file() {
        spec_cp_ctx.builder_cp_report.add_error(
            spec_file_entry.path_file_src.clone(),
            format!(
                "Cannot copy special file: {}",
                spec_file_entry.path_file_src.display()
            ),
        );
        return;
    }

    #[cfg(target_os = "linux")]
    {
        use std::os::unix::fs::MetadataExt;

        if meta_file_src.nlink() > 1 {
            spec_cp_ctx.builder_cp_report.add_warning(format!(
                "Hard link detected: {}",
                spec_file_entry.path_file_src.display()
            ));
        }
    }

    match copy_file_with_metadata(&spec_file_entry.path_file_src, &path_file_dst) {
        Ok(()) => spec_cp_ctx.builder_cp_report.add_copied(),
        Err(e) => spec_cp_ctx
            .builder_cp_report
            .add_error(path_file_dst, e.to_string()),
    }
}
