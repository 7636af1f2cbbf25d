use crate::model::cli_configuration::CliConfiguration;
use itertools::Itertools;
use kernel::constants::{CARGO_VERSION, VERSION};

/// Returns the user's requested core count, clamped to the number of logical cores on the system.
/// If unspecified, every logical core is used.
pub fn choose_cpu_count(user_input: Option<usize>) -> usize {
    let logical_cores = num_cpus::get();
    let cores = user_input.unwrap_or(logical_cores);
    usize::min(logical_cores, cores).max(1)
}

pub fn print_configuration(configuration: &CliConfiguration) {
    let languages_str = if configuration.languages.is_empty() {
        "all languages".to_string()
    } else {
        configuration.languages.iter().join(",")
    };
    let ignore_paths_str = if configuration.path_config.ignore.is_empty() {
        "no ignore path".to_string()
    } else {
        configuration.path_config.ignore.iter().join(",")
    };
    let only_paths_str = match &configuration.path_config.only {
        Some(x) => x.iter().join(","),
        None => "all paths".to_string(),
    };
    let max_file_size_str = if configuration.max_file_size_bytes == 0 {
        "unlimited".to_string()
    } else {
        format!("{} bytes", configuration.max_file_size_bytes)
    };

    eprintln!("Configuration");
    eprintln!("=============");
    eprintln!("version                 : {}", CARGO_VERSION);
    eprintln!("revision                : {}", VERSION);
    eprintln!(
        "config file             : {}",
        configuration.use_configuration_file
    );
    eprintln!("cores available         : {}", num_cpus::get());
    eprintln!("cores used              : {}", configuration.num_cpus);
    eprintln!(
        "source directory        : {}",
        configuration.source_directory
    );
    eprintln!(
        "subdirectories          : {}",
        configuration.source_subdirectories.join(",")
    );
    eprintln!("mode                    : {}", configuration.mode());
    eprintln!("show diff               : {}", configuration.show_diff);
    eprintln!("output format           : {}", configuration.output_format);
    eprintln!(
        "output file             : {}",
        configuration.output_file.as_deref().unwrap_or("stdout")
    );
    eprintln!("languages               : {}", languages_str);
    eprintln!("ignore paths            : {}", ignore_paths_str);
    eprintln!("only paths              : {}", only_paths_str);
    eprintln!("use gitignore           : {}", configuration.use_gitignore);
    eprintln!("max file size           : {}", max_file_size_str);
}
