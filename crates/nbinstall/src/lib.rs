//! `nbinstall`:
//! Installer that copies the system Jupyter notebooks of one application
//! into a user directory.
//!
//! - `cli`     : argument model (`<app>-install`)
//! - `config`  : fixed install roots and resolved settings
//! - `error`   : installer error taxonomy
//! - `install` : precondition checks, forced removal and tree copy
//! - `logging` : tracing subscriber setup

pub mod cli;
pub mod config;
pub mod error;
pub mod install;
pub mod logging;

pub use cli::Cli;
pub use config::{APP_NAME, InstallSettings};
pub use error::InstallError;
pub use install::run;
