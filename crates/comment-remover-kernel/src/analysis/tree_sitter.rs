// Unless explicitly stated otherwise all files in this repository are licensed under the Apache License, Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026 Datadog, Inc.

use std::collections::HashSet;

use streaming_iterator::StreamingIterator;
use thiserror::Error;

use crate::analysis::languages::get_language_config;
use crate::model::common::Language;

/// The grammar could not give us a usable tree or query for a file.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("cannot load the {language} grammar")]
    Grammar {
        language: Language,
        #[source]
        source: tree_sitter::LanguageError,
    },
    #[error("invalid comment query for {language}")]
    Query {
        language: Language,
        #[source]
        source: tree_sitter::QueryError,
    },
    #[error("the {0} parser did not produce a syntax tree")]
    NoTree(Language),
}

pub fn get_tree_sitter_language(language: &Language) -> tree_sitter::Language {
    get_language_config(language).grammar()
}

/// Parses `source` with a caller-owned parser. The parser is switched to `language` first,
/// so the same parser can be reused across files of different languages.
pub fn parse_source(
    parser: &mut tree_sitter::Parser,
    source: &[u8],
    language: &Language,
) -> Result<tree_sitter::Tree, ParseError> {
    parser
        .set_language(&get_tree_sitter_language(language))
        .map_err(|source| ParseError::Grammar {
            language: *language,
            source,
        })?;
    parser
        .parse(source, None)
        .ok_or(ParseError::NoTree(*language))
}

// get the tree-sitter tree
pub fn get_tree(source: &[u8], language: &Language) -> Result<tree_sitter::Tree, ParseError> {
    let mut parser = tree_sitter::Parser::new();
    parse_source(&mut parser, source, language)
}

// build the comment query for a language
pub fn get_comment_query(language: &Language) -> Result<tree_sitter::Query, ParseError> {
    let config = get_language_config(language);
    tree_sitter::Query::new(&config.grammar(), config.comment_query).map_err(|source| {
        ParseError::Query {
            language: *language,
            source,
        }
    })
}

/// Returns the range of every node captured by `query`, ordered by start byte.
///
/// A node captured by more than one pattern is only reported once.
pub fn get_captured_ranges(
    cursor: &mut tree_sitter::QueryCursor,
    query: &tree_sitter::Query,
    tree: &tree_sitter::Tree,
    source: &[u8],
) -> Vec<tree_sitter::Range> {
    let mut seen = HashSet::new();
    let mut ranges = vec![];
    let mut matches = cursor.matches(query, tree.root_node(), source);
    while let Some(query_match) = matches.next() {
        for capture in query_match.captures {
            if seen.insert(capture.node.id()) {
                ranges.push(capture.node.range());
            }
        }
    }
    ranges.sort_by_key(|range| (range.start_byte, range.end_byte));
    ranges
}
