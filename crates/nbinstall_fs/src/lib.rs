//! `nbinstall_fs`:
//! Rust-side filesystem tree copy engine behind the notebook installers.
//!
//! Modules:
//! - `copy`   : traversal and copy orchestration
//! - `spec`   : enums/options/errors
//! - `report` : run-time report model
//! - `util`   : shared helper functions

pub mod copy;
pub mod report;
pub mod spec;
mod util;

pub use copy::copy_tree;
pub use report::{ReportCopy, ReportCopyBuilder};
pub use spec::{CopyTreeError, NOTEBOOK_IGNORE_PATTERNS, SpecCopyError, SpecCopyOptions};
pub use util::{absolutize_path, is_overlap};
