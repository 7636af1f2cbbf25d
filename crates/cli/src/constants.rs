pub static CONFIG_FILE_WITHOUT_SUFFIX: &str = "remove-comments";
pub static GITIGNORE_FILE: &str = ".gitignore";
pub static DEFAULT_MAX_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;

// never walked into, whatever the path configuration says
pub static EXCLUDED_DIRECTORIES: &[&str] = &[".git", "node_modules", "vendor", ".idea", ".vscode"];

// application error: greater or equal to 10 and less than 50
pub static EXIT_CODE_RUN_FAILED: i32 = 10;

// user errors, all more than 50
pub static EXIT_CODE_INVALID_CONFIGURATION: i32 = 50;
pub static EXIT_CODE_INVALID_ARGUMENTS: i32 = 51;
pub static EXIT_CODE_INVALID_DIRECTORY: i32 = 56;
pub static EXIT_CODE_UNSAFE_SUBDIRECTORIES: i32 = 57;
