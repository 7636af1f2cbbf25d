// Unless explicitly stated otherwise all files in this repository are licensed under the Apache License, Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026 Datadog, Inc.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::analysis::lines::{split_lines, Line};
use crate::analysis::tree_sitter::{get_captured_ranges, get_comment_query, parse_source};
use crate::model::comment::CommentSpan;
use crate::model::common::Language;

pub use crate::analysis::tree_sitter::ParseError;

/// Finds the comments of a file using the language's grammar.
///
/// A locator owns a tree-sitter parser, which must not be used from two threads at once:
/// every worker builds its own locator. Compiled comment queries are cached per language.
pub struct CommentLocator {
    parser: tree_sitter::Parser,
    cursor: tree_sitter::QueryCursor,
    queries: HashMap<Language, tree_sitter::Query>,
}

impl Default for CommentLocator {
    fn default() -> Self {
        Self::new()
    }
}

impl CommentLocator {
    pub fn new() -> Self {
        Self {
            parser: tree_sitter::Parser::new(),
            cursor: tree_sitter::QueryCursor::new(),
            queries: HashMap::new(),
        }
    }

    /// Returns the comments of `source`, ordered by position.
    ///
    /// Text that only looks like a comment (e.g. inside a string literal) is never reported:
    /// only nodes the grammar classifies as comments are. Source with syntax errors still
    /// returns the comments of the recovered tree.
    pub fn locate(
        &mut self,
        source: &[u8],
        language: &Language,
    ) -> Result<Vec<CommentSpan>, ParseError> {
        let tree = parse_source(&mut self.parser, source, language)?;
        if tree.root_node().has_error() {
            tracing::debug!("{language} source has syntax errors, using the recovered tree");
        }

        let query = match self.queries.entry(*language) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(get_comment_query(language)?),
        };

        let lines = split_lines(source);
        let spans = get_captured_ranges(&mut self.cursor, query, &tree, source)
            .into_iter()
            .filter(|range| !is_shebang(source, range))
            .map(|range| to_comment_span(&range, &lines))
            .collect();
        Ok(spans)
    }
}

/// Locates the comments of `source` with a parser built for this call only.
pub fn locate(source: &[u8], language: &Language) -> Result<Vec<CommentSpan>, ParseError> {
    CommentLocator::new().locate(source, language)
}

// `#!` on the first line is an interpreter directive, even when the grammar calls it a comment.
fn is_shebang(source: &[u8], range: &tree_sitter::Range) -> bool {
    range.start_byte == 0 && source.starts_with(b"#!")
}

fn to_comment_span(range: &tree_sitter::Range, lines: &[Line]) -> CommentSpan {
    let line_len = |row: usize| lines.get(row).map(Line::len).unwrap_or(0);

    let start = range.start_point;
    let mut end = range.end_point;
    // Some grammars fold the line terminator into the comment token, which puts the end at
    // column 0 of the next row. Pull it back to the end of the last row the comment is on.
    if end.row > start.row && end.column == 0 {
        end.row -= 1;
        end.column = line_len(end.row);
    }

    CommentSpan::classify(
        start.row,
        start.column,
        end.row,
        end.column,
        line_len(start.row),
    )
}
