// Unless explicitly stated otherwise all files in this repository are licensed under the Apache License, Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026 Datadog, Inc.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A byte range `[start_col, end_col)` to excise from a row that is kept.
#[derive(Copy, Clone, Debug, Deserialize, Serialize, Eq, PartialEq, Hash)]
pub struct InlineEdit {
    pub row: usize,
    pub start_col: usize,
    pub end_col: usize,
}

impl InlineEdit {
    pub fn covers(&self, col: usize) -> bool {
        self.start_col <= col && col < self.end_col
    }
}

/// The edits to apply to one file.
///
/// A row is never both in `deleted_rows` and the target of an [`InlineEdit`].
#[derive(Clone, Debug, Default, Deserialize, Serialize, Eq, PartialEq)]
pub struct EditPlan {
    pub deleted_rows: BTreeSet<usize>,
    pub inline_edits: Vec<InlineEdit>,
}

impl EditPlan {
    pub fn is_empty(&self) -> bool {
        self.deleted_rows.is_empty() && self.inline_edits.is_empty()
    }

    pub fn is_row_deleted(&self, row: usize) -> bool {
        self.deleted_rows.contains(&row)
    }
}
