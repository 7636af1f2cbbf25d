use std::fmt;

use kernel::model::common::Language;
use serde::{Deserialize, Serialize};

// the configuration file from the repository
#[derive(Deserialize, Debug, Serialize, PartialEq, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ConfigFile {
    pub only_paths: Option<Vec<String>>,
    pub ignore_paths: Option<Vec<String>>,
    pub use_gitignore: Option<bool>,
    pub max_file_size_kb: Option<u64>,
    pub languages: Option<Vec<Language>>,
}

impl fmt::Display for ConfigFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let only_paths_string = match &self.only_paths {
            Some(i) => i.join(","),
            None => "".to_string(),
        };
        let ignore_paths_string = match &self.ignore_paths {
            Some(i) => i.join(","),
            None => "".to_string(),
        };
        let languages_string = match &self.languages {
            Some(l) => l.iter().map(|l| l.to_string()).collect::<Vec<_>>().join(","),
            None => "".to_string(),
        };
        write!(
            f,
            "only paths: {}, ignore paths: {}, use .gitignore: {}, languages: {}",
            only_paths_string,
            ignore_paths_string,
            self.use_gitignore
                .map(|v| v.to_string())
                .unwrap_or("undefined".to_string()),
            languages_string,
        )
    }
}
