//! Fixed install roots and the resolved settings of one run.
//!
//! There is no configuration file and no environment lookup: the system
//! and user roots are constants, only `--dir` and `--force` vary.

use std::path::{Path, PathBuf};

use crate::cli::Cli;

/// Application whose notebooks the `smartcam-install` binary installs.
pub const APP_NAME: &str = "smartcam";

/// Share directory holding each application's notebooks.
pub const SYSTEM_NOTEBOOK_ROOT: &str = "/opt/xilinx/share/notebooks";

/// User notebook directory the default destination lives under.
pub const USER_NOTEBOOK_ROOT: &str = "/home/petalinux/notebooks";

/// `<SYSTEM_NOTEBOOK_ROOT>/<app_name>`.
pub fn system_notebook_dir(app_name: &str) -> PathBuf {
    Path::new(SYSTEM_NOTEBOOK_ROOT).join(app_name)
}

/// `<USER_NOTEBOOK_ROOT>/<app_name>`.
pub fn default_destination(app_name: &str) -> PathBuf {
    Path::new(USER_NOTEBOOK_ROOT).join(app_name)
}

/// Inputs of [`crate::install::run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallSettings {
    pub app_name: String,
    /// Notebook tree to copy from; resolved to an absolute path at run time.
    pub dir_source: PathBuf,
    /// Destination directory; resolved to an absolute path at run time.
    pub dir_destination: PathBuf,
    /// Replace an existing destination directory.
    pub if_force: bool,
}

impl InstallSettings {
    pub fn from_cli(app_name: &str, cli: &Cli) -> Self {
        Self {
            app_name: app_name.to_string(),
            dir_source: system_notebook_dir(app_name),
            dir_destination: cli
                .dir
                .clone()
                .unwrap_or_else(|| default_destination(app_name)),
            if_force: cli.force,
        }
    }
}
