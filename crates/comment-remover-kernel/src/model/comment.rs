// Unless explicitly stated otherwise all files in this repository are licensed under the Apache License, Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026 Datadog, Inc.

use serde::{Deserialize, Serialize};

/// A comment node reported by the grammar, in tree-sitter coordinates: 0-based rows,
/// byte columns, end-exclusive.
#[derive(Copy, Clone, Debug, Deserialize, Serialize, Eq, PartialEq, Hash)]
pub struct CommentSpan {
    pub start_row: usize,
    pub start_col: usize,
    pub end_row: usize,
    pub end_col: usize,
    /// The comment covers the whole row, from column 0 to the end of the content.
    pub is_full_line: bool,
    /// The comment ends on a later row than it starts.
    pub is_multi_line: bool,
}

impl CommentSpan {
    /// Builds a span and classifies it. `start_line_len` is the length in bytes of the start row,
    /// excluding its line terminator.
    pub fn classify(
        start_row: usize,
        start_col: usize,
        end_row: usize,
        end_col: usize,
        start_line_len: usize,
    ) -> Self {
        let is_multi_line = end_row > start_row;
        let is_full_line = !is_multi_line && start_col == 0 && end_col >= start_line_len;
        Self {
            start_row,
            start_col,
            end_row,
            end_col,
            is_full_line,
            is_multi_line,
        }
    }

    pub fn is_inline(&self) -> bool {
        !self.is_full_line && !self.is_multi_line
    }
}
