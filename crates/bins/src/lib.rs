use std::fs::File;
use std::io::Write;
use std::path::Path;

use anyhow::Context;
use getopts::{Matches, Options};
use itertools::Itertools;

use cli::config_file::{read_config_file, ConfigFileError};
use cli::constants::{
    DEFAULT_MAX_FILE_SIZE_BYTES, EXIT_CODE_INVALID_ARGUMENTS, EXIT_CODE_INVALID_CONFIGURATION,
    EXIT_CODE_INVALID_DIRECTORY, EXIT_CODE_UNSAFE_SUBDIRECTORIES,
};
use cli::file_utils::{
    are_subdirectories_safe, filter_files_by_size, get_file_jobs, get_files,
    gitignore_entry_to_patterns, read_files_from_gitignore,
};
use cli::model::cli_configuration::CliConfiguration;
use cli::model::path_config::PathConfig;
use cli::pipeline::{run_pipeline, FileJob};
use cli::reporter::{write_json_report, Reporter, RunReport};
use cli::utils::choose_cpu_count;
use kernel::analysis::languages::get_language_config;
use kernel::model::common::{Language, OutputFormat, ALL_LANGUAGES};

/// Errors that stop the program before any file is processed.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("{0} is not a valid file or directory")]
    InvalidDirectory(String),
    #[error("sub-directories are not safe and point outside of the repository")]
    UnsafeSubdirectories,
    #[error("error reading configuration file from {directory}:\n  {source}")]
    InvalidConfiguration {
        directory: String,
        #[source]
        source: ConfigFileError,
    },
    #[error("cannot read .gitignore: {0}")]
    Gitignore(String),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::InvalidArgument(_) => EXIT_CODE_INVALID_ARGUMENTS,
            CliError::InvalidDirectory(_) => EXIT_CODE_INVALID_DIRECTORY,
            CliError::UnsafeSubdirectories => EXIT_CODE_UNSAFE_SUBDIRECTORIES,
            CliError::InvalidConfiguration { .. } | CliError::Gitignore(_) => {
                EXIT_CODE_INVALID_CONFIGURATION
            }
        }
    }
}

pub fn get_options() -> Options {
    let mut opts = Options::new();
    opts.optopt(
        "i",
        "directory",
        "directory or file to process (default: current directory)",
        "/path/to/code",
    );
    opts.optmulti(
        "u",
        "subdirectory",
        "subdirectory to process within the directory",
        "sub/directory",
    );
    opts.optflag("w", "write", "write the changes back (default: dry-run)");
    opts.optflag("d", "diff", "show a diff of every changed file");
    opts.optflag("q", "quiet", "only print errors and the summary");
    opts.optflag("v", "verbose", "also report files without comments");
    opts.optopt("", "lang", "only process files of this language", "go");
    opts.optopt(
        "c",
        "cpus",
        "allow N CPUs at once; if unspecified, defaults to the number of logical cores on the platform",
        "--cpus 5",
    );
    opts.optopt(
        "",
        "max-file-size",
        format!(
            "skip files larger than this size in bytes, 0 for no limit (default: {})",
            DEFAULT_MAX_FILE_SIZE_BYTES
        )
        .as_str(),
        "BYTES",
    );
    opts.optmulti(
        "p",
        "ignore-path",
        "path to ignore - the value is a glob or a path prefix",
        "**/test*.py (multiple values possible)",
    );
    opts.optmulti(
        "",
        "only-path",
        "only process this path - the value is a glob or a path prefix",
        "src (multiple values possible)",
    );
    opts.optflag("", "ignore-gitignore", "do not use the .gitignore file");
    opts.optopt("f", "format", "format of the report", "text/json");
    opts.optopt("o", "output", "write the json report to this file", "report.json");
    opts.optflag("", "list-languages", "list the supported languages and exit");
    opts.optflag("", "debug", "print debugging information");
    opts.optflag("h", "help", "print this help");
    opts.optflag("", "version", "shows the tool version");
    opts
}

pub fn print_usage(program: &str, opts: &Options) {
    let brief = format!("Usage: {} [options]", program);
    print!("{}", opts.usage(&brief));
}

pub fn print_languages() {
    for language in ALL_LANGUAGES {
        let config = get_language_config(language);
        println!(
            "{:<12}{}",
            language.to_string(),
            config.extensions.iter().map(|e| format!(".{e}")).join(" ")
        );
    }
}

fn parse_number<T: std::str::FromStr>(
    matches: &Matches,
    name: &str,
) -> Result<Option<T>, CliError> {
    matches
        .opt_str(name)
        .map(|value| {
            value.parse::<T>().map_err(|_| {
                CliError::InvalidArgument(format!("{name} must be a number, got {value}"))
            })
        })
        .transpose()
}

/// Merge the command line with the configuration file found in the directory.
/// Command-line values extend (paths) or override (everything else) the file's values.
pub fn build_configuration(matches: &Matches) -> Result<CliConfiguration, CliError> {
    let use_debug = matches.opt_present("debug");
    let directory = matches.opt_str("i").unwrap_or_else(|| ".".to_string());
    let subdirectories = matches.opt_strs("u");
    let directory_path = Path::new(&directory);

    if !directory_path.exists() {
        return Err(CliError::InvalidDirectory(directory));
    }
    let is_directory = directory_path.is_dir();
    if !is_directory && !subdirectories.is_empty() {
        return Err(CliError::InvalidArgument(
            "subdirectories require a directory".to_string(),
        ));
    }
    if is_directory
        && !are_subdirectories_safe(directory_path, &subdirectories)
            .map_err(|e| CliError::InvalidDirectory(format!("{e:#}")))?
    {
        return Err(CliError::UnsafeSubdirectories);
    }

    let output_format = match matches.opt_str("f") {
        Some(f) => OutputFormat::try_from(f.as_str())
            .map_err(|e| CliError::InvalidArgument(format!("{e}: {f}")))?,
        None => OutputFormat::Text,
    };
    let output_file = matches.opt_str("o");
    if output_file.is_some() && output_format != OutputFormat::Json {
        return Err(CliError::InvalidArgument(
            "an output file requires the json format".to_string(),
        ));
    }

    let configuration_file = if is_directory {
        read_config_file(directory_path).map_err(|source| CliError::InvalidConfiguration {
            directory: directory.clone(),
            source,
        })?
    } else {
        None
    };
    let use_configuration_file = configuration_file.is_some();
    let configuration_file = configuration_file.unwrap_or_default();

    let mut path_config = PathConfig::default();
    path_config.ignore.extend(
        configuration_file
            .ignore_paths
            .unwrap_or_default()
            .into_iter()
            .map(Into::into),
    );
    path_config
        .ignore
        .extend(matches.opt_strs("p").into_iter().map(Into::into));
    let only_paths = matches.opt_strs("only-path");
    path_config.only = if !only_paths.is_empty() {
        Some(only_paths.into_iter().map(Into::into).collect())
    } else {
        configuration_file
            .only_paths
            .map(|paths| paths.into_iter().map(Into::into).collect())
    };

    let use_gitignore = !matches.opt_present("ignore-gitignore")
        && configuration_file.use_gitignore.unwrap_or(true);
    if use_gitignore && is_directory {
        let entries = read_files_from_gitignore(&directory)
            .map_err(|e| CliError::Gitignore(format!("{e:#}")))?;
        path_config
            .ignore
            .extend(entries.iter().flat_map(|e| gitignore_entry_to_patterns(e)));
    }

    let languages = match matches.opt_str("lang") {
        Some(name) => vec![Language::try_from(name.as_str())
            .map_err(|e| CliError::InvalidArgument(format!("{e}: {name}")))?],
        None => configuration_file.languages.unwrap_or_default(),
    };

    let max_file_size_bytes = match parse_number::<u64>(matches, "max-file-size")? {
        Some(bytes) => bytes,
        None => configuration_file
            .max_file_size_kb
            .map(|kb| kb.saturating_mul(1024))
            .unwrap_or(DEFAULT_MAX_FILE_SIZE_BYTES),
    };
    let num_cpus = choose_cpu_count(parse_number::<usize>(matches, "cpus")?);

    Ok(CliConfiguration {
        use_debug,
        use_configuration_file,
        use_gitignore,
        source_directory: directory,
        source_subdirectories: subdirectories,
        path_config,
        languages,
        apply: matches.opt_present("w"),
        show_diff: matches.opt_present("d"),
        quiet: matches.opt_present("q"),
        verbose: matches.opt_present("v"),
        output_format,
        output_file,
        num_cpus,
        max_file_size_bytes,
    })
}

/// The files to process, each with its language.
pub fn collect_file_jobs(configuration: &CliConfiguration) -> anyhow::Result<Vec<FileJob>> {
    let files = get_files(
        &configuration.source_directory,
        configuration.source_subdirectories.clone(),
        &configuration.path_config,
    )
    .context("unable to get the list of files to process")?;
    let files = filter_files_by_size(&files, configuration.max_file_size_bytes);
    let jobs = get_file_jobs(&files, &configuration.languages);
    tracing::debug!("{} files found, {} to process", files.len(), jobs.len());
    Ok(jobs)
}

/// Process every file and write the report to `writer`, or the JSON report to the output file
/// when there is one.
pub fn run<W: Write + Send>(
    configuration: &CliConfiguration,
    writer: W,
) -> anyhow::Result<RunReport> {
    let jobs = collect_file_jobs(configuration)?;
    let pipeline_options = configuration.pipeline_options()?;

    let mut reporter_options = configuration.reporter_options();
    if configuration.output_file.is_some() {
        // the JSON goes to the file, the terminal gets the text report
        reporter_options.format = OutputFormat::Text;
    }
    let reporter = Reporter::new(writer, reporter_options);

    let report = run_pipeline(jobs, &pipeline_options, &reporter)?;
    reporter.summary(&report)?;

    if let Some(output_file) = &configuration.output_file {
        let file = File::create(output_file)
            .with_context(|| format!("cannot create output file {output_file}"))?;
        write_json_report(&report, file)?;
    }
    Ok(report)
}
