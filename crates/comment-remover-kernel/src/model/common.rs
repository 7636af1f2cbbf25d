// Unless explicitly stated otherwise all files in this repository are licensed under the Apache License, Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026 Datadog, Inc.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Copy, Clone, Deserialize, Debug, Serialize, Eq, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Text => "text",
            Self::Json => "json",
        };
        write!(f, "{s}")
    }
}

impl TryFrom<&str> for OutputFormat {
    type Error = &'static str;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err("unknown output format"),
        }
    }
}

/// A language with a registered comment locator.
#[derive(Copy, Clone, Deserialize, Debug, Serialize, Eq, Hash, PartialEq, Ord, PartialOrd)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Bash,
    C,
    Cpp,
    Csharp,
    Css,
    Go,
    Html,
    Java,
    JavaScript,
    Lua,
    Python,
    Ruby,
    Rust,
    Toml,
    Tsx,
    TypeScript,
    Yaml,
}

pub static ALL_LANGUAGES: &[Language] = &[
    Language::Bash,
    Language::C,
    Language::Cpp,
    Language::Csharp,
    Language::Css,
    Language::Go,
    Language::Html,
    Language::Java,
    Language::JavaScript,
    Language::Lua,
    Language::Python,
    Language::Ruby,
    Language::Rust,
    Language::Toml,
    Language::Tsx,
    Language::TypeScript,
    Language::Yaml,
];

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Bash => "bash",
            Self::C => "c",
            Self::Cpp => "cpp",
            Self::Csharp => "csharp",
            Self::Css => "css",
            Self::Go => "go",
            Self::Html => "html",
            Self::Java => "java",
            Self::JavaScript => "javascript",
            Self::Lua => "lua",
            Self::Python => "python",
            Self::Ruby => "ruby",
            Self::Rust => "rust",
            Self::Toml => "toml",
            Self::Tsx => "tsx",
            Self::TypeScript => "typescript",
            Self::Yaml => "yaml",
        };
        write!(f, "{s}")
    }
}

impl TryFrom<&str> for Language {
    type Error = &'static str;

    /// Accepts the canonical name (as printed by [`fmt::Display`]) and a few common aliases.
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_ascii_lowercase().as_str() {
            "bash" | "sh" | "shell" => Ok(Self::Bash),
            "c" => Ok(Self::C),
            "cpp" | "c++" => Ok(Self::Cpp),
            "csharp" | "c#" | "cs" => Ok(Self::Csharp),
            "css" => Ok(Self::Css),
            "go" | "golang" => Ok(Self::Go),
            "html" => Ok(Self::Html),
            "java" => Ok(Self::Java),
            "javascript" | "js" => Ok(Self::JavaScript),
            "lua" => Ok(Self::Lua),
            "python" | "py" => Ok(Self::Python),
            "ruby" | "rb" => Ok(Self::Ruby),
            "rust" | "rs" => Ok(Self::Rust),
            "toml" => Ok(Self::Toml),
            "tsx" => Ok(Self::Tsx),
            "typescript" | "ts" => Ok(Self::TypeScript),
            "yaml" | "yml" => Ok(Self::Yaml),
            _ => Err("unknown language"),
        }
    }
}
