pub mod cli_configuration;
pub mod config_file;
pub mod path_config;
