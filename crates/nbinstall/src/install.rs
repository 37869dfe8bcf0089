//! The install sequence: destination checks, source check, optional forced
//! removal, then a filtered tree copy.

use std::fs;
use std::path::Path;

use nbinstall_fs::{
    CopyTreeError, ReportCopy, SpecCopyOptions, absolutize_path, copy_tree, is_overlap,
};
use tracing::{debug, info, warn};

use crate::config::InstallSettings;
use crate::error::InstallError;

/// What the resolved destination currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DestinationState {
    Absent,
    Directory,
}

/// Run one install.
///
/// Both paths are made absolute without resolving symlinks. The destination
/// is checked first (file, or directory without `if_force`, is fatal), then
/// the source. Only once every precondition holds is an existing destination
/// removed, so a failed run never destroys the user's copy.
///
/// On success the copy report is returned; any per-entry copy failure makes
/// the whole run a [`InstallError::CopyFailure`] and the partial destination
/// is left in place.
pub fn run(settings: &InstallSettings) -> Result<ReportCopy, InstallError> {
    let path_dir_dst = absolutize_path(&settings.dir_destination);
    debug!(app = %settings.app_name, destination = %path_dir_dst.display(), "resolved destination");

    let state_dst = inspect_destination(&path_dir_dst, settings.if_force)?;

    let path_dir_src = absolutize_path(&settings.dir_source);
    if !path_dir_src.is_dir() {
        return Err(InstallError::SourceMissing(path_dir_src));
    }
    // Resolves symlinked ancestors: `--force` must never remove the source.
    if is_overlap(&path_dir_src, &path_dir_dst) {
        return Err(CopyTreeError::SourceDestinationOverlap {
            source: path_dir_src,
            destination: path_dir_dst,
        }
        .into());
    }

    if state_dst == DestinationState::Directory {
        info!(
            "Destination directory {} already exists, force removing it.",
            path_dir_dst.display()
        );
        fs::remove_dir_all(&path_dir_dst).map_err(|source| {
            InstallError::DestinationRemoveFailed {
                path: path_dir_dst.clone(),
                source,
            }
        })?;
    }

    let report = copy_tree(&path_dir_src, &path_dir_dst, SpecCopyOptions::notebook())?;
    for warning in &report.warnings {
        warn!("{warning}");
    }
    debug!("{report}");
    if !report.is_success() {
        return Err(InstallError::from_report(&report));
    }

    info!(
        "Notebook files under {} are copied to {}.",
        path_dir_src.display(),
        path_dir_dst.display()
    );
    Ok(report)
}

fn inspect_destination(
    path_dir_dst: &Path,
    if_force: bool,
) -> Result<DestinationState, InstallError> {
    // Follows symlinks: a link to a directory counts as a directory, a
    // dangling link as absent (the copy then fails on it).
    let Ok(meta_dst) = fs::metadata(path_dir_dst) else {
        return Ok(DestinationState::Absent);
    };
    if meta_dst.is_file() {
        return Err(InstallError::DestinationIsFile(path_dir_dst.to_path_buf()));
    }
    if !if_force {
        return Err(InstallError::DestinationExistsNoForce(
            path_dir_dst.to_path_buf(),
        ));
    }
    Ok(DestinationState::Directory)
}
