// Unless explicitly stated otherwise all files in this repository are licensed under the Apache License, Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026 Datadog, Inc.

use std::collections::BTreeSet;

use crate::model::comment::CommentSpan;
use crate::model::edit::{EditPlan, InlineEdit};

/// Turns the comments of a file into the edits to apply to it.
///
///  - a multi-line comment deletes every row from its start row to its end row
///  - a full-line comment deletes its row
///  - any other comment is excised from its row
///
/// Inline edits that land on a deleted row are dropped, so the result does not depend on the
/// order of `spans`.
pub fn plan(spans: &[CommentSpan]) -> EditPlan {
    let mut deleted_rows = BTreeSet::new();
    let mut inline_edits = vec![];

    for span in spans {
        if span.is_multi_line {
            deleted_rows.extend(span.start_row..=span.end_row);
        } else if span.is_full_line {
            deleted_rows.insert(span.start_row);
        } else {
            inline_edits.push(InlineEdit {
                row: span.start_row,
                start_col: span.start_col,
                end_col: span.end_col,
            });
        }
    }

    inline_edits.retain(|edit| !deleted_rows.contains(&edit.row));

    EditPlan {
        deleted_rows,
        inline_edits,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_line(row: usize, len: usize) -> CommentSpan {
        CommentSpan::classify(row, 0, row, len, len)
    }

    fn inline(row: usize, start: usize, end: usize) -> CommentSpan {
        CommentSpan::classify(row, start, row, end, end + 10)
    }

    fn multi_line(start_row: usize, end_row: usize) -> CommentSpan {
        CommentSpan::classify(start_row, 0, end_row, 2, 2)
    }

    #[test]
    fn empty_spans_give_empty_plan() {
        assert!(plan(&[]).is_empty());
    }

    #[test]
    fn full_line_and_multi_line_rows_are_deleted() {
        let edit_plan = plan(&[full_line(1, 4), multi_line(3, 5)]);
        assert_eq!(
            edit_plan.deleted_rows.iter().copied().collect::<Vec<_>>(),
            vec![1, 3, 4, 5]
        );
        assert!(edit_plan.inline_edits.is_empty());
    }

    #[test]
    fn inline_spans_become_inline_edits() {
        let edit_plan = plan(&[inline(0, 10, 14), inline(0, 2, 4)]);
        assert!(edit_plan.deleted_rows.is_empty());
        assert_eq!(
            edit_plan.inline_edits,
            vec![
                InlineEdit {
                    row: 0,
                    start_col: 10,
                    end_col: 14
                },
                InlineEdit {
                    row: 0,
                    start_col: 2,
                    end_col: 4
                },
            ]
        );
    }

    #[test]
    fn deleted_row_subsumes_inline_edit() {
        // "x /* a */ /* b\n c */": the inline comment shares its row with a multi-line one
        let spans = [inline(0, 2, 9), multi_line(0, 1)];
        let forward = plan(&spans);
        let mut reversed_spans = spans;
        reversed_spans.reverse();
        let backward = plan(&reversed_spans);

        assert!(forward.inline_edits.is_empty());
        assert!(forward.is_row_deleted(0));
        assert!(forward.is_row_deleted(1));
        assert_eq!(forward, backward);
    }
}
