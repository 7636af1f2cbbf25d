use kernel::model::common::{Language, OutputFormat};

use crate::model::path_config::PathConfig;
use crate::pipeline::{PipelineOptions, PipelineOptionsBuilder};
use crate::reporter::ReporterOptions;

/// represents the CLI configuration
#[derive(Clone, Debug)]
pub struct CliConfiguration {
    pub use_debug: bool,
    pub use_configuration_file: bool,
    pub use_gitignore: bool,
    pub source_directory: String,
    pub source_subdirectories: Vec<String>,
    pub path_config: PathConfig,
    pub languages: Vec<Language>, // empty means every registered language
    pub apply: bool,
    pub show_diff: bool,
    pub quiet: bool,
    pub verbose: bool,
    pub output_format: OutputFormat,
    pub output_file: Option<String>,
    pub num_cpus: usize, // workers in the pipeline pool
    pub max_file_size_bytes: u64,
}

impl CliConfiguration {
    pub fn mode(&self) -> &'static str {
        if self.apply {
            "write"
        } else {
            "dry-run"
        }
    }

    pub fn pipeline_options(&self) -> anyhow::Result<PipelineOptions> {
        Ok(PipelineOptionsBuilder::default()
            .num_workers(self.num_cpus)
            .apply(self.apply)
            .build()?)
    }

    pub fn reporter_options(&self) -> ReporterOptions {
        ReporterOptions {
            format: self.output_format,
            apply: self.apply,
            quiet: self.quiet,
            verbose: self.verbose,
            show_diff: self.show_diff,
        }
    }
}
