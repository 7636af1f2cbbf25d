// Unless explicitly stated otherwise all files in this repository are licensed under the Apache License, Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026 Datadog, Inc.

/// A physical line of a buffer. Row `n` of the returned list is row `n` in tree-sitter's
/// coordinates, and `content` is what its columns index into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line<'a> {
    /// The bytes of the line, without the terminator.
    pub content: &'a [u8],
    /// `\n`, `\r\n`, or empty for a last line that has no terminator.
    pub terminator: &'a [u8],
}

impl Line<'_> {
    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

/// Splits a buffer into its physical lines. Concatenating every `content` and `terminator`
/// gives back the original buffer. An empty buffer has no lines.
pub fn split_lines(source: &[u8]) -> Vec<Line<'_>> {
    let mut lines = vec![];
    let mut start = 0;
    for (index, byte) in source.iter().enumerate() {
        if *byte != b'\n' {
            continue;
        }
        let content_end = if index > start && source[index - 1] == b'\r' {
            index - 1
        } else {
            index
        };
        lines.push(Line {
            content: &source[start..content_end],
            terminator: &source[content_end..=index],
        });
        start = index + 1;
    }
    if start < source.len() {
        lines.push(Line {
            content: &source[start..],
            terminator: &[],
        });
    }
    lines
}
