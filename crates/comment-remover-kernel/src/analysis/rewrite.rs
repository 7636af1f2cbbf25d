// Unless explicitly stated otherwise all files in this repository are licensed under the Apache License, Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026 Datadog, Inc.

use itertools::Itertools;

use crate::analysis::lines::split_lines;
use crate::model::edit::{EditPlan, InlineEdit};

/// Applies an [`EditPlan`] to a buffer, line by line.
///
/// Deleted rows disappear with their terminator. Rows with inline edits lose the excised
/// bytes and any trailing spaces or tabs; if nothing is left, the row disappears as well
/// instead of becoming a blank line. Every other row is copied as is, terminator included.
pub fn rewrite(source: &[u8], plan: &EditPlan) -> Vec<u8> {
    if plan.is_empty() {
        return source.to_vec();
    }

    let edits_by_row = plan.inline_edits.iter().into_group_map_by(|edit| edit.row);

    let mut output = Vec::with_capacity(source.len());
    for (row, line) in split_lines(source).into_iter().enumerate() {
        if plan.is_row_deleted(row) {
            continue;
        }
        let Some(edits) = edits_by_row.get(&row) else {
            output.extend_from_slice(line.content);
            output.extend_from_slice(line.terminator);
            continue;
        };

        let kept = excise(line.content, edits);
        let kept = trim_trailing_blanks(&kept);
        if kept.is_empty() {
            continue;
        }
        output.extend_from_slice(kept);
        output.extend_from_slice(line.terminator);
    }
    output
}

// keep the bytes not covered by any edit; overlapping edits remove a byte once
fn excise(content: &[u8], edits: &[&InlineEdit]) -> Vec<u8> {
    content
        .iter()
        .enumerate()
        .filter(|(col, _)| !edits.iter().any(|edit| edit.covers(*col)))
        .map(|(_, byte)| *byte)
        .collect()
}

fn trim_trailing_blanks(content: &[u8]) -> &[u8] {
    let end = content
        .iter()
        .rposition(|byte| *byte != b' ' && *byte != b'\t')
        .map_or(0, |index| index + 1);
    &content[..end]
}
