use std::ffi::OsString;
use std::path::PathBuf;

use clap::{CommandFactory, FromArgMatches, Parser};

use crate::config::default_destination;

// Command-line arguments of `<app>-install`. Program name, about text and the
// `--dir` default depend on the application and are set in `command_for`.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
pub struct Cli {
    /// Install the Jupyter notebook to the specified directory.
    #[arg(short, long, value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Force to install the Jupyter notebook even if the destination directory exists.
    #[arg(short, long)]
    pub force: bool,
}

impl Cli {
    /// Clap command for `app_name`, named `<app_name>-install`.
    pub fn command_for(app_name: &str) -> clap::Command {
        let c_prog = format!("{app_name}-install");
        let c_about = format!("Script to copy {app_name} Jupyter notebook to user directory");
        let c_dir_default = default_destination(app_name).display().to_string();
        Self::command()
            .name(c_prog.clone())
            .bin_name(c_prog)
            .about(c_about.clone())
            .long_about(c_about)
            .mut_arg("dir", |arg| arg.default_value(c_dir_default))
    }

    /// Parse `args` (program name first) without exiting on error.
    pub fn try_parse_for<I, T>(app_name: &str, args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let mut matches = Self::command_for(app_name).try_get_matches_from(args)?;
        Self::from_arg_matches_mut(&mut matches)
    }

    /// Parse the process arguments; prints usage/help and exits on error.
    pub fn parse_for(app_name: &str) -> Self {
        match Self::try_parse_for(app_name, std::env::args_os()) {
            Ok(cli) => cli,
            Err(e) => e.exit(),
        }
    }
}
