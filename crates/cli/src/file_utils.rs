use std::fs;
use std::fs::read_to_string;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use walkdir::{DirEntry, WalkDir};

use kernel::analysis::languages::get_language_for_extension;
use kernel::model::common::Language;

use crate::constants::{EXCLUDED_DIRECTORIES, GITIGNORE_FILE};
use crate::model::path_config::{PathConfig, PathPattern};
use crate::pipeline::FileJob;

// Read the .gitignore file in a directory and return the lines that are not commented
// or empty.
// We ignore pattern that start with # (comments) or contains ! (negations would re-include
// files the walker already skipped).
pub fn read_files_from_gitignore_internal(path: &Path) -> Result<Vec<String>> {
    if path.exists() {
        let lines: Vec<String> = read_to_string(path)?
            .lines()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.starts_with('#'))
            .filter(|v| !v.contains('!'))
            .filter(|v| !v.is_empty())
            .collect();
        return Ok(lines);
    }
    Ok(vec![])
}

pub fn read_files_from_gitignore(source_directory: &str) -> Result<Vec<String>> {
    let gitignore_path = Path::new(source_directory).join(GITIGNORE_FILE);
    read_files_from_gitignore_internal(&gitignore_path)
}

/// Turn a .gitignore entry into ignore patterns relative to the root.
///  - `/build` or `docs/generated` only match from the root
///  - `*.log` or `dist/` match at any depth, including everything below a matching directory
pub fn gitignore_entry_to_patterns(entry: &str) -> Vec<PathPattern> {
    let entry = entry.trim_end_matches('/');
    if entry.is_empty() {
        return vec![];
    }
    if let Some(anchored) = entry.strip_prefix('/') {
        return vec![anchored.into(), format!("{}/**", anchored).into()];
    }
    if entry.contains('/') {
        return vec![entry.into(), format!("{}/**", entry).into()];
    }
    vec![
        format!("**/{}", entry).into(),
        format!("**/{}/**", entry).into(),
    ]
}

fn is_excluded_directory(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| EXCLUDED_DIRECTORIES.contains(&name))
}

/// get the files to process from the directory. This function walks the directory
/// recursively and gets all the files.
/// if passed, subdirectories_to_analyze are subdirectories within the directory.
/// When `directory` is a file, it is returned on its own.
pub fn get_files(
    directory: &str,
    subdirectories_to_analyze: Vec<String>,
    path_config: &PathConfig,
) -> Result<Vec<PathBuf>> {
    let root = Path::new(directory);
    let metadata =
        fs::metadata(root).with_context(|| format!("cannot access {}", root.display()))?;
    if metadata.is_file() {
        return Ok(vec![root.to_path_buf()]);
    }

    let directories_to_walk: Vec<PathBuf> = if !subdirectories_to_analyze.is_empty() {
        subdirectories_to_analyze
            .iter()
            .map(|p| root.join(p))
            .collect()
    } else {
        vec![root.to_path_buf()]
    };

    let mut files_to_return: Vec<PathBuf> = vec![];
    for directory_to_walk in directories_to_walk {
        // symlinks are never followed: a link could point outside the repository
        let walker = WalkDir::new(&directory_to_walk)
            .follow_links(false)
            .into_iter()
            .filter_entry(|e| !is_excluded_directory(e));

        for entry in walker {
            let dir_entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    tracing::warn!("skipping unreadable entry: {e}");
                    continue;
                }
            };
            if !dir_entry.file_type().is_file() {
                continue;
            }

            let path = dir_entry.path();
            let relative_path = path.strip_prefix(root).unwrap_or(path).to_string_lossy();

            // check if the path is allowed by the configuration.
            if !path_config.allows_file(&relative_path) {
                tracing::debug!("{relative_path} excluded by the path configuration");
                continue;
            }
            files_to_return.push(path.to_path_buf());
        }
    }
    Ok(files_to_return)
}

/// try to find if one of the subdirectory used to scan a repository is going outside the
/// repository directory. If yes, this is unsafe and should not run.
pub fn are_subdirectories_safe(directory_path: &Path, subdirectories: &[String]) -> Result<bool> {
    let directory_canonicalized = directory_path
        .canonicalize()
        .context("cannot canonicalize repository directory")?;
    for subdirectory in subdirectories {
        let new_path = directory_path
            .join(subdirectory)
            .canonicalize()
            .with_context(|| format!("error when checking directory {}", subdirectory))?;
        if !new_path.starts_with(&directory_canonicalized) {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Drop the files larger than `max_file_size_bytes`. A limit of 0 keeps every file.
pub fn filter_files_by_size(files: &[PathBuf], max_file_size_bytes: u64) -> Vec<PathBuf> {
    files
        .iter()
        .filter(|f| {
            if max_file_size_bytes == 0 {
                return true;
            }
            match fs::metadata(f) {
                Ok(metadata) if metadata.len() > max_file_size_bytes => {
                    tracing::debug!(
                        "file {} too big (size {} bytes, max size {} bytes)",
                        f.display(),
                        metadata.len(),
                        max_file_size_bytes
                    );
                    false
                }
                // unreadable files are kept so the pipeline reports them
                _ => true,
            }
        })
        .cloned()
        .collect()
}

pub fn get_language_for_file(path: &Path) -> Option<Language> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .and_then(get_language_for_extension)
}

/// Map every file to its language. Files without a registered language, or whose language is
/// not in `languages` (when non-empty), are dropped.
pub fn get_file_jobs(files: &[PathBuf], languages: &[Language]) -> Vec<FileJob> {
    files
        .iter()
        .filter_map(|path| {
            let language = get_language_for_file(path)?;
            if !languages.is_empty() && !languages.contains(&language) {
                return None;
            }
            Some(FileJob {
                path: path.clone(),
                language,
            })
        })
        .collect()
}
