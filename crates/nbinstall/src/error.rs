//! Installer error taxonomy.
//!
//! Every variant is fatal: the binary prints it once on stderr and exits
//! non-zero. A failed copy may leave a partially populated destination.

use std::io;
use std::path::PathBuf;

use nbinstall_fs::{CopyTreeError, ReportCopy};
use thiserror::Error;

/// Errors returned by [`crate::install::run`].
#[derive(Error, Debug)]
pub enum InstallError {
    /// The resolved destination is an existing regular file.
    #[error("Destination directory {} is an existing file.", .0.display())]
    DestinationIsFile(PathBuf),

    /// The resolved destination is an existing directory and `--force` is off.
    #[error(
        "Destination directory {} already exists, please use another dirname or use '--force' option.",
        .0.display()
    )]
    DestinationExistsNoForce(PathBuf),

    /// The system notebook directory is missing; the host install is broken.
    #[error("Predefined system notebook directory {} doesn't exist.", .0.display())]
    SourceMissing(PathBuf),

    /// `--force` could not remove the existing destination.
    #[error("Failed to remove existing destination directory {}.", .path.display())]
    DestinationRemoveFailed {
        /// Destination that was being removed.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The tree copy failed to start or recorded per-entry failures.
    #[error("An exception occurred: {0}")]
    CopyFailure(String),
}

impl From<CopyTreeError> for InstallError {
    fn from(error: CopyTreeError) -> Self {
        Self::CopyFailure(error.to_string())
    }
}

impl InstallError {
    /// Fold the per-entry errors of a finished copy into one message.
    pub fn from_report(report: &ReportCopy) -> Self {
        let c_causes = report
            .errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ");
        Self::CopyFailure(format!(
            "{} entries failed to copy: {c_causes}",
            report.error_count()
        ))
    }
}
