// Unless explicitly stated otherwise all files in this repository are licensed under the Apache License, Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026 Datadog, Inc.

use crate::model::common::{Language, ALL_LANGUAGES};

/// What the comment locator needs to know about a language: how to get its grammar,
/// which nodes are comments, and which files it applies to.
#[derive(Debug)]
pub struct LanguageConfig {
    pub language: Language,
    /// File extensions, lowercase and without the leading dot.
    pub extensions: &'static [&'static str],
    /// A tree-sitter query capturing every comment node as `@comment`.
    pub comment_query: &'static str,
    grammar: fn() -> tree_sitter::Language,
}

impl LanguageConfig {
    pub fn grammar(&self) -> tree_sitter::Language {
        (self.grammar)()
    }
}

const COMMENT_QUERY: &str = "(comment) @comment";
const LINE_AND_BLOCK_COMMENT_QUERY: &str = "(line_comment) @comment (block_comment) @comment";

static BASH: LanguageConfig = LanguageConfig {
    language: Language::Bash,
    extensions: &["sh", "bash"],
    comment_query: COMMENT_QUERY,
    grammar: bash_grammar,
};

static C: LanguageConfig = LanguageConfig {
    language: Language::C,
    extensions: &["c", "h"],
    comment_query: COMMENT_QUERY,
    grammar: c_grammar,
};

static CPP: LanguageConfig = LanguageConfig {
    language: Language::Cpp,
    extensions: &["cpp", "cc", "cxx", "hpp", "hh"],
    comment_query: COMMENT_QUERY,
    grammar: cpp_grammar,
};

static CSHARP: LanguageConfig = LanguageConfig {
    language: Language::Csharp,
    extensions: &["cs"],
    comment_query: COMMENT_QUERY,
    grammar: csharp_grammar,
};

static CSS: LanguageConfig = LanguageConfig {
    language: Language::Css,
    extensions: &["css"],
    comment_query: COMMENT_QUERY,
    grammar: css_grammar,
};

static GO: LanguageConfig = LanguageConfig {
    language: Language::Go,
    extensions: &["go"],
    comment_query: COMMENT_QUERY,
    grammar: go_grammar,
};

static HTML: LanguageConfig = LanguageConfig {
    language: Language::Html,
    extensions: &["html", "htm"],
    comment_query: COMMENT_QUERY,
    grammar: html_grammar,
};

static JAVA: LanguageConfig = LanguageConfig {
    language: Language::Java,
    extensions: &["java"],
    comment_query: LINE_AND_BLOCK_COMMENT_QUERY,
    grammar: java_grammar,
};

static JAVASCRIPT: LanguageConfig = LanguageConfig {
    language: Language::JavaScript,
    extensions: &["js", "mjs", "cjs", "jsx"],
    comment_query: COMMENT_QUERY,
    grammar: javascript_grammar,
};

static LUA: LanguageConfig = LanguageConfig {
    language: Language::Lua,
    extensions: &["lua"],
    comment_query: COMMENT_QUERY,
    grammar: lua_grammar,
};

static PYTHON: LanguageConfig = LanguageConfig {
    language: Language::Python,
    extensions: &["py", "py3"],
    comment_query: COMMENT_QUERY,
    grammar: python_grammar,
};

static RUBY: LanguageConfig = LanguageConfig {
    language: Language::Ruby,
    extensions: &["rb"],
    comment_query: COMMENT_QUERY,
    grammar: ruby_grammar,
};

static RUST: LanguageConfig = LanguageConfig {
    language: Language::Rust,
    extensions: &["rs"],
    comment_query: LINE_AND_BLOCK_COMMENT_QUERY,
    grammar: rust_grammar,
};

static TOML: LanguageConfig = LanguageConfig {
    language: Language::Toml,
    extensions: &["toml"],
    comment_query: COMMENT_QUERY,
    grammar: toml_grammar,
};

static TSX: LanguageConfig = LanguageConfig {
    language: Language::Tsx,
    extensions: &["tsx"],
    comment_query: COMMENT_QUERY,
    grammar: tsx_grammar,
};

static TYPESCRIPT: LanguageConfig = LanguageConfig {
    language: Language::TypeScript,
    extensions: &["ts", "mts", "cts"],
    comment_query: COMMENT_QUERY,
    grammar: typescript_grammar,
};

static YAML: LanguageConfig = LanguageConfig {
    language: Language::Yaml,
    extensions: &["yaml", "yml"],
    comment_query: COMMENT_QUERY,
    grammar: yaml_grammar,
};

fn bash_grammar() -> tree_sitter::Language {
    tree_sitter_bash::LANGUAGE.into()
}

fn c_grammar() -> tree_sitter::Language {
    tree_sitter_c::LANGUAGE.into()
}

fn cpp_grammar() -> tree_sitter::Language {
    tree_sitter_cpp::LANGUAGE.into()
}

fn csharp_grammar() -> tree_sitter::Language {
    tree_sitter_c_sharp::LANGUAGE.into()
}

fn css_grammar() -> tree_sitter::Language {
    tree_sitter_css::LANGUAGE.into()
}

fn go_grammar() -> tree_sitter::Language {
    tree_sitter_go::LANGUAGE.into()
}

fn html_grammar() -> tree_sitter::Language {
    tree_sitter_html::LANGUAGE.into()
}

fn java_grammar() -> tree_sitter::Language {
    tree_sitter_java::LANGUAGE.into()
}

fn javascript_grammar() -> tree_sitter::Language {
    tree_sitter_javascript::LANGUAGE.into()
}

fn lua_grammar() -> tree_sitter::Language {
    tree_sitter_lua::LANGUAGE.into()
}

fn python_grammar() -> tree_sitter::Language {
    tree_sitter_python::LANGUAGE.into()
}

fn ruby_grammar() -> tree_sitter::Language {
    tree_sitter_ruby::LANGUAGE.into()
}

fn rust_grammar() -> tree_sitter::Language {
    tree_sitter_rust::LANGUAGE.into()
}

fn toml_grammar() -> tree_sitter::Language {
    tree_sitter_toml_ng::LANGUAGE.into()
}

fn tsx_grammar() -> tree_sitter::Language {
    tree_sitter_typescript::LANGUAGE_TSX.into()
}

fn typescript_grammar() -> tree_sitter::Language {
    tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into()
}

fn yaml_grammar() -> tree_sitter::Language {
    tree_sitter_yaml::LANGUAGE.into()
}

pub fn get_language_config(language: &Language) -> &'static LanguageConfig {
    match language {
        Language::Bash => &BASH,
        Language::C => &C,
        Language::Cpp => &CPP,
        Language::Csharp => &CSHARP,
        Language::Css => &CSS,
        Language::Go => &GO,
        Language::Html => &HTML,
        Language::Java => &JAVA,
        Language::JavaScript => &JAVASCRIPT,
        Language::Lua => &LUA,
        Language::Python => &PYTHON,
        Language::Ruby => &RUBY,
        Language::Rust => &RUST,
        Language::Toml => &TOML,
        Language::Tsx => &TSX,
        Language::TypeScript => &TYPESCRIPT,
        Language::Yaml => &YAML,
    }
}

/// Returns the language registered for a file extension (without the leading dot).
/// Matching is case-insensitive.
pub fn get_language_for_extension(extension: &str) -> Option<Language> {
    let extension = extension.to_ascii_lowercase();
    ALL_LANGUAGES.iter().copied().find(|language| {
        get_language_config(language)
            .extensions
            .contains(&extension.as_str())
    })
}
