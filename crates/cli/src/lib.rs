pub mod config_file;
pub mod constants;
pub mod file_utils;
pub mod model;
pub mod pipeline;
pub mod reporter;
pub mod utils;
