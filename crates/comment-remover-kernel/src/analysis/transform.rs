// Unless explicitly stated otherwise all files in this repository are licensed under the Apache License, Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026 Datadog, Inc.

use std::path::Path;

use crate::analysis::diff::{compute, TransformResult};
use crate::analysis::locate::{CommentLocator, ParseError};
use crate::analysis::plan::plan;
use crate::analysis::rewrite::rewrite;
use crate::model::common::Language;

/// Strips the comments of one file held in memory: locate, plan, rewrite, then compare.
pub fn transform_source(
    locator: &mut CommentLocator,
    path: &Path,
    source: Vec<u8>,
    language: &Language,
) -> Result<TransformResult, ParseError> {
    let spans = locator.locate(&source, language)?;
    let edit_plan = plan(&spans);
    let after = rewrite(&source, &edit_plan);
    tracing::trace!(
        "{}: {} comment(s), {} row(s) deleted, {} inline edit(s)",
        path.display(),
        spans.len(),
        edit_plan.deleted_rows.len(),
        edit_plan.inline_edits.len()
    );
    Ok(compute(path, source, after))
}
