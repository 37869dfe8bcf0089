//! Copy report models and mutable report builder.

use std::fmt;
use std::path::PathBuf;

use crate::spec::SpecCopyError;

/// Aggregate counters and diagnostics for one `copy_tree` run.
#[derive(Debug, Default, Clone)]
pub struct ReportCopy {
    /// Total scanned directory/file/symlink entries below the source root.
    pub cnt_scanned: u64,
    /// Number of directories and files successfully committed.
    pub cnt_copied: u64,
    /// Number of entries dropped by an ignore pattern.
    pub cnt_ignored: u64,
    /// Number of symbolic links recreated as links.
    pub cnt_symlinks: u64,
    /// Non-fatal warnings collected during traversal/copy.
    pub warnings: Vec<String>,
    /// Per-entry failures.
    pub errors: Vec<SpecCopyError>,
}

impl ReportCopy {
    /// Number of collected hard errors.
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// Number of collected warnings.
    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }

    /// `true` when no per-entry error was recorded.
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }

    /// Human-readable one-line summary.
    pub fn format(&self, prefix: &str) -> String {
        format!(
            "{prefix} scanned={} copied={} ignored={} symlinks={} errors={} warnings={}",
            self.cnt_scanned,
            self.cnt_copied,
            self.cnt_ignored,
            self.cnt_symlinks,
            self.error_count(),
            self.warning_count()
        )
    }
}

impl fmt::Display for ReportCopy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format("[COPY]"))
    }
}

/// Mutable accumulator for copy statistics.
#[derive(Debug, Default, Clone)]
pub struct ReportCopyBuilder {
    cnt_scanned: u64,
    cnt_copied: u64,
    cnt_ignored: u64,
    cnt_symlinks: u64,
    errors: Vec<SpecCopyError>,
    warnings: Vec<String>,
}

impl ReportCopyBuilder {
    pub fn add_scanned(&mut self) {
        self.cnt_scanned += 1;
    }

    pub fn add_copied(&mut self) {
        self.cnt_copied += 1;
    }

    pub fn add_ignored(&mut self) {
        self.cnt_ignored += 1;
    }

    pub fn add_symlink(&mut self) {
        self.cnt_symlinks += 1;
    }

    /// Add warning message.
    pub fn add_warning(&mut self, warning: String) {
        self.warnings.push(warning);
    }

    /// Add one path-scoped error.
    pub fn add_error(&mut self, path: PathBuf, exception: String) {
        self.errors.push(SpecCopyError { path, exception });
    }

    /// Finalize builder into immutable report.
    pub fn build(self) -> ReportCopy {
        ReportCopy {
            cnt_scanned: self.cnt_scanned,
            cnt_copied: self.cnt_copied,
            cnt_ignored: self.cnt_ignored,
            cnt_symlinks: self.cnt_symlinks,
            errors: self.errors,
            warnings: self.warnings,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::{ReportCopy, ReportCopyBuilder};

    #[test]
    fn report_copy_format() {
        let report = ReportCopy {
            cnt_scanned: 8,
            cnt_copied: 5,
            cnt_ignored: 2,
            cnt_symlinks: 1,
            warnings: vec!["w".to_string()],
            errors: vec![],
        };

        let txt = report.format("[COPY]");
        assert_eq!(
            txt,
            "[COPY] scanned=8 copied=5 ignored=2 symlinks=1 errors=0 warnings=1"
        );
        assert_eq!(report.to_string(), txt);
        assert!(report.is_success());
    }

    #[test]
    fn builder_collects_errors() {
        let mut builder = ReportCopyBuilder::default();
        builder.add_scanned();
        builder.add_error(PathBuf::from("/tmp/x"), "denied".to_string());

        let report = builder.build();
        assert_eq!(report.cnt_scanned, 1);
        assert!(!report.is_success());
        assert_eq!(report.errors[0].to_string(), "/tmp/x: denied");
    }
}
