//! Copy specification models and top-level error types.

use std::fmt;
use std::path::PathBuf;

////////////////////////////////////////////////////////////////////////////////
// #region ConstantsInit

/// Basename globs never copied into a notebook install: Jupyter checkpoint
/// folders, compiled Python bytecode and editor backup files.
pub const NOTEBOOK_IGNORE_PATTERNS: [&str; 3] = [".ipynb_checkpoints", "*.pyc", "*~"];

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region StructsAndErrors

/// Input options for `copy_tree`.
#[derive(Debug, Clone, Default)]
pub struct SpecCopyOptions {
    /// Glob patterns applied to the basename of every entry.
    /// A matching directory is not descended into.
    pub patterns_ignore: Vec<String>,
}

impl SpecCopyOptions {
    /// Options used to install a notebook tree: ignore
    /// [`NOTEBOOK_IGNORE_PATTERNS`].
    pub fn notebook() -> Self {
        Self {
            patterns_ignore: NOTEBOOK_IGNORE_PATTERNS
                .iter()
                .map(|p| p.to_string())
                .collect(),
        }
    }
}

/// One copy failure item with path + error text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecCopyError {
    /// Failed source or destination path.
    pub path: PathBuf,
    /// User-facing error text.
    pub exception: String,
}

impl fmt::Display for SpecCopyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path.display(), self.exception)
    }
}

/// "Top-level call failed" errors (input validation / setup stage).
#[derive(Debug)]
pub enum CopyTreeError {
    /// Invalid ignore pattern.
    InvalidPattern(String),
    /// Source path is missing or not a directory.
    SourceNotDirectory(PathBuf),
    /// Source and destination overlap (`src` contains `dst` or vice versa).
    SourceDestinationOverlap {
        /// Normalized source directory.
        source: PathBuf,
        /// Normalized destination directory.
        destination: PathBuf,
    },
    /// Destination path is already present; the engine never merges.
    DestinationExists(PathBuf),
    /// Destination directory initialization failed.
    DestinationInitFailed {
        /// Destination path that failed initialization.
        path: PathBuf,
        /// Underlying IO error text.
        message: String,
    },
}

impl fmt::Display for CopyTreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPattern(msg) => write!(f, "{msg}"),
            Self::SourceNotDirectory(path) => {
                write!(f, "Source is not a directory: {}", path.display())
            }
            Self::SourceDestinationOverlap {
                source,
                destination,
            } => write!(
                f,
                "Source and destination directories overlap: {} <-> {}",
                source.display(),
                destination.display()
            ),
            Self::DestinationExists(path) => {
                write!(f, "Destination already exists: {}", path.display())
            }
            Self::DestinationInitFailed { path, message } => {
                write!(
                    f,
                    "Failed to initialize destination {}: {message}",
                    path.display()
                )
            }
        }
    }
}

impl std::error::Error for CopyTreeError {}

// #endregion
////////////////////////////////////////////////////////////////////////////////
