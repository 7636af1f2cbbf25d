use crate::constants;
use crate::model::config_file::ConfigFile;
use std::fs::File;
use std::io::Read;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum ConfigFileError {
    #[error("cannot open config file {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("error when reading the configuration file: {0}")]
    Read(#[source] std::io::Error),
    #[error("the config file is empty")]
    Empty,
    #[error("invalid configuration file: {0}")]
    Parse(#[from] serde_yaml::Error),
}

fn get_config_file(path: &Path) -> Result<Option<File>, ConfigFileError> {
    for suffix in ["yml", "yaml"] {
        let file_path = path.join(format!(
            "{}.{}",
            constants::CONFIG_FILE_WITHOUT_SUFFIX,
            suffix
        ));
        match File::open(&file_path) {
            Ok(f) => return Ok(Some(f)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
            Err(source) => {
                return Err(ConfigFileError::Open {
                    path: file_path.display().to_string(),
                    source,
                })
            }
        }
    }
    Ok(None)
}

// Parses the provided YAML text, returning a ConfigFile.
pub fn parse_config_file(config_contents: &str) -> Result<ConfigFile, ConfigFileError> {
    Ok(serde_yaml::from_str(config_contents)?)
}

// We first try to read remove-comments.yml
// If it fails, we try to read remove-comments.yaml
// If the file does not exist, we return a Ok(None).
// If there is an error reading the file, we return a failure
pub fn read_config_file(path: &Path) -> Result<Option<ConfigFile>, ConfigFileError> {
    let Some(mut file) = get_config_file(path)? else {
        return Ok(None);
    };
    let mut contents = String::new();
    let size_read = file
        .read_to_string(&mut contents)
        .map_err(ConfigFileError::Read)?;
    if size_read == 0 {
        return Err(ConfigFileError::Empty);
    }
    parse_config_file(&contents).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kernel::model::common::Language;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn parse_full_config() {
        let config = parse_config_file(
            r#"
only-paths:
  - src
ignore-paths:
  - "**/*.min.js"
  - generated
use-gitignore: false
max-file-size-kb: 512
languages:
  - go
  - python
"#,
        )
        .unwrap();
        assert_eq!(
            config,
            ConfigFile {
                only_paths: Some(vec!["src".to_string()]),
                ignore_paths: Some(vec!["**/*.min.js".to_string(), "generated".to_string()]),
                use_gitignore: Some(false),
                max_file_size_kb: Some(512),
                languages: Some(vec![Language::Go, Language::Python]),
            }
        );
    }

    #[test]
    fn parse_partial_config() {
        let config = parse_config_file("ignore-paths:\n  - vendor2\n").unwrap();
        assert_eq!(config.ignore_paths, Some(vec!["vendor2".to_string()]));
        assert!(config.only_paths.is_none());
        assert!(config.use_gitignore.is_none());
    }

    #[test]
    fn parse_rejects_unknown_fields() {
        assert!(matches!(
            parse_config_file("rulesets:\n  - python-security\n"),
            Err(ConfigFileError::Parse(_))
        ));
    }

    #[test]
    fn parse_rejects_unknown_language() {
        assert!(parse_config_file("languages:\n  - cobol\n").is_err());
    }

    #[test]
    fn read_missing_config_file() {
        let dir = tempdir().unwrap();
        assert!(read_config_file(dir.path()).unwrap().is_none());
    }

    #[test]
    fn read_yaml_suffix_and_empty_file() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("remove-comments.yaml"),
            "use-gitignore: true\n",
        )
        .unwrap();
        let config = read_config_file(dir.path()).unwrap().unwrap();
        assert_eq!(config.use_gitignore, Some(true));

        fs::write(dir.path().join("remove-comments.yml"), "").unwrap();
        assert!(matches!(
            read_config_file(dir.path()),
            Err(ConfigFileError::Empty)
        ));
    }
}
