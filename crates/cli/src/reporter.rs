use std::io::Write;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use kernel::analysis::diff::TransformResult;
use kernel::model::common::OutputFormat;
use serde::Serialize;

#[derive(Copy, Clone, Debug, Serialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Unchanged,
    Changed,
    Error,
}

/// What happened to one file.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct FileReport {
    pub path: String,
    pub status: FileStatus,
    pub lines_removed: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// The outcome of a run. `files` is sorted by path.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct RunReport {
    pub mode: String,
    pub total: usize,
    pub changed: usize,
    pub errors: usize,
    pub files: Vec<FileReport>,
}

#[derive(Copy, Clone, Debug, Default)]
pub struct ReporterOptions {
    pub format: OutputFormat,
    pub apply: bool,
    pub quiet: bool,
    pub verbose: bool,
    pub show_diff: bool,
}

/// Writes per-file results as workers produce them, then the summary. Lines from different
/// workers never interleave.
pub struct Reporter<W: Write> {
    writer: Mutex<W>,
    options: ReporterOptions,
}

impl<W: Write> Reporter<W> {
    pub fn new(writer: W, options: ReporterOptions) -> Self {
        Self {
            writer: Mutex::new(writer),
            options,
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn lock(&self) -> MutexGuard<'_, W> {
        self.writer
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn is_text(&self) -> bool {
        self.options.format == OutputFormat::Text
    }

    fn write_text(&self, text: &str) {
        if let Err(e) = self.lock().write_all(text.as_bytes()) {
            tracing::warn!("cannot write report: {e}");
        }
    }

    pub fn file_changed(&self, result: &TransformResult) {
        if !self.is_text() || self.options.quiet {
            return;
        }
        let action = if self.options.apply {
            "removed"
        } else {
            "would remove"
        };
        let removed = result.lines_removed();
        let noun = if removed == 1 { "line" } else { "lines" };
        let mut text = format!(
            "  {action}  {removed} comment {noun} from {}\n",
            result.path.display()
        );
        if self.options.show_diff {
            text.push_str(&result.unified_diff());
        }
        self.write_text(&text);
    }

    pub fn file_unchanged(&self, path: &Path) {
        if !self.is_text() || self.options.quiet || !self.options.verbose {
            return;
        }
        self.write_text(&format!("  unchanged  {}\n", path.display()));
    }

    pub fn file_error(&self, path: &Path, error: &dyn std::error::Error) {
        if !self.is_text() {
            return;
        }
        self.write_text(&format!("  error  {}: {}\n", path.display(), error));
    }

    /// The final line of a text report, or the whole JSON document.
    pub fn summary(&self, report: &RunReport) -> anyhow::Result<()> {
        let mut writer = self.lock();
        match self.options.format {
            OutputFormat::Text => {
                writer.write_all(summary_line(report, self.options.apply).as_bytes())?
            }
            OutputFormat::Json => write_json_report(report, &mut *writer)?,
        }
        writer.flush()?;
        Ok(())
    }
}

pub fn summary_line(report: &RunReport, apply: bool) -> String {
    let action = if apply {
        "modified"
    } else {
        "would be modified"
    };
    let mut line = format!("\n{}/{} files {}", report.changed, report.total, action);
    if report.errors > 0 {
        line.push_str(&format!(", {} errors", report.errors));
    }
    line.push('\n');
    line
}

pub fn write_json_report<W: Write>(report: &RunReport, mut writer: W) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut writer, report)?;
    writeln!(writer)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use kernel::analysis::diff::compute;

    fn output(reporter: Reporter<Vec<u8>>) -> String {
        String::from_utf8(reporter.into_inner()).unwrap()
    }

    fn changed_result() -> TransformResult {
        compute(
            "src/main.go",
            b"package main\n// a\n// b\n".to_vec(),
            b"package main\n".to_vec(),
        )
    }

    fn report(changed: usize, errors: usize) -> RunReport {
        RunReport {
            mode: "dry-run".to_string(),
            total: 3,
            changed,
            errors,
            files: vec![FileReport {
                path: "a.py".to_string(),
                status: FileStatus::Changed,
                lines_removed: 2,
                error: None,
            }],
        }
    }

    #[test]
    fn changed_file_dry_run() {
        let reporter = Reporter::new(vec![], ReporterOptions::default());
        reporter.file_changed(&changed_result());
        assert_eq!(
            output(reporter),
            "  would remove  2 comment lines from src/main.go\n"
        );
    }

    #[test]
    fn changed_file_apply_singular_with_diff() {
        let reporter = Reporter::new(
            vec![],
            ReporterOptions {
                apply: true,
                show_diff: true,
                ..Default::default()
            },
        );
        reporter.file_changed(&compute(
            "x.py",
            b"# c\nx = 1\n".to_vec(),
            b"x = 1\n".to_vec(),
        ));
        assert_eq!(
            output(reporter),
            "  removed  1 comment line from x.py\n--- x.py\n+++ x.py\n-# c\n+x = 1\n-x = 1\n"
        );
    }

    #[test]
    fn unchanged_only_when_verbose() {
        let reporter = Reporter::new(vec![], ReporterOptions::default());
        reporter.file_unchanged(Path::new("a.go"));
        assert_eq!(output(reporter), "");

        let reporter = Reporter::new(
            vec![],
            ReporterOptions {
                verbose: true,
                ..Default::default()
            },
        );
        reporter.file_unchanged(Path::new("a.go"));
        assert_eq!(output(reporter), "  unchanged  a.go\n");
    }

    #[test]
    fn quiet_keeps_errors_and_summary() {
        let reporter = Reporter::new(
            vec![],
            ReporterOptions {
                quiet: true,
                verbose: true,
                ..Default::default()
            },
        );
        reporter.file_changed(&changed_result());
        reporter.file_unchanged(Path::new("b.go"));
        let error = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        reporter.file_error(Path::new("c.go"), &error);
        reporter.summary(&report(1, 1)).unwrap();
        assert_eq!(
            output(reporter),
            "  error  c.go: no such file\n\n1/3 files would be modified, 1 errors\n"
        );
    }

    #[test]
    fn summary_lines() {
        assert_eq!(
            summary_line(&report(2, 0), false),
            "\n2/3 files would be modified\n"
        );
        assert_eq!(summary_line(&report(2, 0), true), "\n2/3 files modified\n");
    }

    #[test]
    fn json_report() {
        let reporter = Reporter::new(
            vec![],
            ReporterOptions {
                format: OutputFormat::Json,
                ..Default::default()
            },
        );
        reporter.file_changed(&changed_result());
        reporter.summary(&report(1, 0)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output(reporter)).unwrap();
        assert_eq!(value["mode"], "dry-run");
        assert_eq!(value["total"], 3);
        assert_eq!(value["changed"], 1);
        assert_eq!(value["files"][0]["status"], "changed");
        assert_eq!(value["files"][0]["lines_removed"], 2);
        assert!(value["files"][0].get("error").is_none());
    }
}
