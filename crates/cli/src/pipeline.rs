use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::thread;

use derive_builder::Builder;
use rayon::prelude::*;

use kernel::analysis::diff::TransformResult;
use kernel::analysis::locate::{CommentLocator, ParseError};
use kernel::analysis::transform::transform_source;
use kernel::model::common::Language;

use crate::reporter::{FileReport, FileStatus, Reporter, RunReport};

/// A file to process, with the language its extension maps to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileJob {
    pub path: PathBuf,
    pub language: Language,
}

/// Everything that can go wrong with a single file. None of these stop the run.
#[derive(Debug, thiserror::Error)]
pub enum FileError {
    #[error("cannot read file: {0}")]
    Read(#[source] std::io::Error),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("cannot write file: {0}")]
    Write(#[source] std::io::Error),
}

#[derive(Clone, Debug, Builder)]
#[builder(build_fn(validate = "Self::validate"))]
pub struct PipelineOptions {
    /// Number of worker threads.
    #[builder(default = "num_cpus::get()")]
    pub num_workers: usize,
    /// Write changed files back instead of only reporting them.
    #[builder(default)]
    pub apply: bool,
}

impl PipelineOptionsBuilder {
    fn validate(&self) -> Result<(), String> {
        if self.num_workers == Some(0) {
            return Err("the pipeline needs at least one worker".to_string());
        }
        Ok(())
    }
}

impl PipelineOptions {
    pub fn mode(&self) -> &'static str {
        if self.apply {
            "write"
        } else {
            "dry-run"
        }
    }
}

#[derive(Default)]
struct Counters {
    total: AtomicUsize,
    changed: AtomicUsize,
    errors: AtomicUsize,
}

/// Strip the comments of every job.
///
/// A producer thread feeds the jobs into a bounded queue that a pool of `num_workers` threads
/// drains. Every worker owns its [`CommentLocator`], so parsers are never shared. The function
/// returns once the queue is closed and empty and every worker is done.
///
/// Per-file failures are reported and counted; only failing to build the pool is an error.
pub fn run_pipeline<I, W>(
    jobs: I,
    options: &PipelineOptions,
    reporter: &Reporter<W>,
) -> anyhow::Result<RunReport>
where
    I: IntoIterator<Item = FileJob>,
    I::IntoIter: Send,
    W: Write + Send,
{
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(options.num_workers)
        .thread_name(|index| format!("remove-comments-{index}"))
        .build()?;
    let counters = Counters::default();
    let jobs = jobs.into_iter();
    let (sender, receiver) = mpsc::sync_channel::<FileJob>(options.num_workers * 2);

    let mut files: Vec<FileReport> = thread::scope(|scope| {
        scope.spawn(move || {
            for job in jobs {
                if sender.send(job).is_err() {
                    break;
                }
            }
            // dropping the sender closes the queue
        });

        pool.install(|| {
            receiver
                .into_iter()
                .par_bridge()
                .map_init(CommentLocator::new, |locator, job| {
                    process_job(locator, job, options, reporter, &counters)
                })
                .collect()
        })
    });
    files.sort_by(|a, b| a.path.cmp(&b.path));

    let report = RunReport {
        mode: options.mode().to_string(),
        total: counters.total.load(Ordering::SeqCst),
        changed: counters.changed.load(Ordering::SeqCst),
        errors: counters.errors.load(Ordering::SeqCst),
        files,
    };
    tracing::info!(
        "{} files processed, {} changed, {} errors",
        report.total,
        report.changed,
        report.errors
    );
    Ok(report)
}

fn process_job<W: Write>(
    locator: &mut CommentLocator,
    job: FileJob,
    options: &PipelineOptions,
    reporter: &Reporter<W>,
    counters: &Counters,
) -> FileReport {
    counters.total.fetch_add(1, Ordering::SeqCst);
    let path = job.path.display().to_string();

    match transform_file(locator, &job, options) {
        Ok(result) if result.changed => {
            counters.changed.fetch_add(1, Ordering::SeqCst);
            reporter.file_changed(&result);
            FileReport {
                path,
                status: FileStatus::Changed,
                lines_removed: result.lines_removed(),
                error: None,
            }
        }
        Ok(_) => {
            reporter.file_unchanged(&job.path);
            FileReport {
                path,
                status: FileStatus::Unchanged,
                lines_removed: 0,
                error: None,
            }
        }
        Err(e) => {
            counters.errors.fetch_add(1, Ordering::SeqCst);
            tracing::debug!("{path}: {e:?}");
            reporter.file_error(&job.path, &e);
            FileReport {
                path,
                status: FileStatus::Error,
                lines_removed: 0,
                error: Some(e.to_string()),
            }
        }
    }
}

fn transform_file(
    locator: &mut CommentLocator,
    job: &FileJob,
    options: &PipelineOptions,
) -> Result<TransformResult, FileError> {
    let source = fs::read(&job.path).map_err(FileError::Read)?;
    let result = transform_source(locator, &job.path, source, &job.language)?;
    if options.apply && result.changed {
        persist(&job.path, &result.after).map_err(FileError::Write)?;
    }
    Ok(result)
}

// Write to a temporary file next to the target, then rename it over the target. The target is
// either fully replaced or untouched.
fn persist(path: &Path, content: &[u8]) -> std::io::Result<()> {
    let permissions = fs::metadata(path)?.permissions();
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut file = tempfile::NamedTempFile::new_in(directory)?;
    file.write_all(content)?;
    file.as_file().sync_all()?;
    fs::set_permissions(file.path(), permissions)?;
    file.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporter::ReporterOptions;
    use std::fs::{create_dir_all, read_to_string, write};
    use tempfile::{tempdir, TempDir};

    const GO_SOURCE: &str = "package main\n\n// Greet says hi.\n// It is exported.\nfunc Greet() string {\n\treturn \"// hi\" // trailing\n}\n";
    const GO_EXPECTED: &str =
        "package main\n\nfunc Greet() string {\n\treturn \"// hi\"\n}\n";
    const PY_SOURCE: &str = "#!/usr/bin/env python3\n# comment\nx = 1  # one\n";
    const PY_EXPECTED: &str = "#!/usr/bin/env python3\nx = 1\n";
    const JS_SOURCE: &str = "const a = 1;\n";

    fn create_tree() -> (TempDir, Vec<FileJob>) {
        let dir = tempdir().unwrap();
        let mut jobs = vec![];
        for i in 0..6 {
            for (name, content, language) in [
                ("main.go", GO_SOURCE, Language::Go),
                ("script.py", PY_SOURCE, Language::Python),
                ("clean.js", JS_SOURCE, Language::JavaScript),
            ] {
                let path = dir.path().join(format!("pkg{i}")).join(name);
                create_dir_all(path.parent().unwrap()).unwrap();
                write(&path, content).unwrap();
                jobs.push(FileJob { path, language });
            }
        }
        (dir, jobs)
    }

    fn options(num_workers: usize, apply: bool) -> PipelineOptions {
        PipelineOptionsBuilder::default()
            .num_workers(num_workers)
            .apply(apply)
            .build()
            .unwrap()
    }

    fn run(jobs: Vec<FileJob>, options: &PipelineOptions) -> (RunReport, String) {
        let reporter = Reporter::new(
            vec![],
            ReporterOptions {
                apply: options.apply,
                ..Default::default()
            },
        );
        let report = run_pipeline(jobs, options, &reporter).unwrap();
        (report, String::from_utf8(reporter.into_inner()).unwrap())
    }

    #[test]
    fn zero_workers_is_rejected() {
        assert!(PipelineOptionsBuilder::default()
            .num_workers(0)
            .build()
            .is_err());
        assert!(PipelineOptionsBuilder::default().build().is_ok());
    }

    #[test]
    fn dry_run_reports_without_writing() {
        let (dir, jobs) = create_tree();
        let (report, output) = run(jobs, &options(2, false));

        assert_eq!(report.mode, "dry-run");
        assert_eq!(report.total, 18);
        assert_eq!(report.changed, 12);
        assert_eq!(report.errors, 0);
        assert!(output.contains("would remove  2 comment lines from"));
        assert!(output.contains("would remove  1 comment line from"));
        assert_eq!(
            read_to_string(dir.path().join("pkg0/main.go")).unwrap(),
            GO_SOURCE
        );
    }

    #[test]
    fn results_do_not_depend_on_worker_count() {
        let (_dir, jobs) = create_tree();
        let mut reversed = jobs.clone();
        reversed.reverse();

        let (single, _) = run(jobs, &options(1, false));
        let (many, _) = run(reversed, &options(4, false));
        assert_eq!(single, many);
        assert!(single.files.windows(2).all(|w| w[0].path <= w[1].path));
    }

    #[test]
    fn apply_then_rerun_changes_nothing() {
        let (dir, jobs) = create_tree();
        let (first, output) = run(jobs.clone(), &options(3, true));
        assert_eq!(first.mode, "write");
        assert_eq!(first.changed, 12);
        assert!(output.contains("removed  2 comment lines from"));
        assert_eq!(
            read_to_string(dir.path().join("pkg3/main.go")).unwrap(),
            GO_EXPECTED
        );
        assert_eq!(
            read_to_string(dir.path().join("pkg3/script.py")).unwrap(),
            PY_EXPECTED
        );
        assert_eq!(
            read_to_string(dir.path().join("pkg3/clean.js")).unwrap(),
            JS_SOURCE
        );

        let (second, _) = run(jobs, &options(3, true));
        assert_eq!(second.total, 18);
        assert_eq!(second.changed, 0);
        assert!(second
            .files
            .iter()
            .all(|f| f.status == FileStatus::Unchanged));
    }

    #[test]
    fn unreadable_file_does_not_stop_the_run() {
        let (dir, mut jobs) = create_tree();
        jobs.insert(
            3,
            FileJob {
                path: dir.path().join("missing.go"),
                language: Language::Go,
            },
        );
        let (report, output) = run(jobs, &options(2, true));
        assert_eq!(report.total, 19);
        assert_eq!(report.changed, 12);
        assert_eq!(report.errors, 1);
        assert!(output.contains("  error  "));
        assert!(output.contains("missing.go: cannot read file"));

        let failed = report
            .files
            .iter()
            .find(|f| f.status == FileStatus::Error)
            .unwrap();
        assert!(failed.path.ends_with("missing.go"));
        assert!(failed.error.is_some());
    }

    #[cfg(unix)]
    #[test]
    fn unwritable_directory_does_not_stop_the_run() {
        use std::os::unix::fs::PermissionsExt;

        let (dir, mut jobs) = create_tree();
        let locked = dir.path().join("locked");
        create_dir_all(&locked).unwrap();
        let path = locked.join("main.go");
        write(&path, GO_SOURCE).unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o555)).unwrap();

        // permission bits do not bind root
        if write(locked.join("canary"), "").is_ok() {
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        jobs.insert(
            5,
            FileJob {
                path: path.clone(),
                language: Language::Go,
            },
        );
        let (report, output) = run(jobs, &options(2, true));
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        assert_eq!(report.total, 19);
        assert_eq!(report.changed, 12);
        assert_eq!(report.errors, 1);
        assert!(output.contains("main.go: cannot write file"));
        assert_eq!(read_to_string(&path).unwrap(), GO_SOURCE);
        assert_eq!(
            read_to_string(dir.path().join("pkg0/main.go")).unwrap(),
            GO_EXPECTED
        );

        let failed = report
            .files
            .iter()
            .find(|f| f.status == FileStatus::Error)
            .unwrap();
        assert!(failed.path.ends_with("locked/main.go"));
    }

    #[test]
    fn parse_errors_keep_their_message() {
        let error = FileError::from(ParseError::NoTree(Language::Go));
        assert!(matches!(error, FileError::Parse(_)));
        assert_eq!(
            error.to_string(),
            ParseError::NoTree(Language::Go).to_string()
        );
    }

    #[test]
    fn no_jobs() {
        let (report, _) = run(vec![], &options(2, false));
        assert_eq!(report.total, 0);
        assert!(report.files.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn apply_keeps_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let path = dir.path().join("run.sh");
        write(&path, "#!/bin/sh\n# say hi\necho hi\n").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o750)).unwrap();

        let jobs = vec![FileJob {
            path: path.clone(),
            language: Language::Bash,
        }];
        let (report, _) = run(jobs, &options(1, true));
        assert_eq!(report.changed, 1);
        assert_eq!(read_to_string(&path).unwrap(), "#!/bin/sh\necho hi\n");
        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o750);
    }
}
