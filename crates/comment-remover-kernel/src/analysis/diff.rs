// Unless explicitly stated otherwise all files in this repository are licensed under the Apache License, Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026 Datadog, Inc.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

/// The outcome of transforming one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformResult {
    pub path: PathBuf,
    pub before: Vec<u8>,
    pub after: Vec<u8>,
    pub changed: bool,
}

/// Compares the original and the transformed content of a file.
pub fn compute(path: impl AsRef<Path>, before: Vec<u8>, after: Vec<u8>) -> TransformResult {
    let changed = before != after;
    TransformResult {
        path: path.as_ref().to_path_buf(),
        before,
        after,
        changed,
    }
}

impl TransformResult {
    /// How many lines the transformation removed. Removing comments never adds lines.
    pub fn lines_removed(&self) -> usize {
        count_lines(&self.before).saturating_sub(count_lines(&self.after))
    }

    /// A line diff between the two versions, or an empty string when nothing changed.
    ///
    /// Both versions are walked together: equal lines are skipped, and on a mismatch the
    /// current line of each side is reported (`-` then `+`) before both move on. This is
    /// not a minimal diff, but it is exact for the isolated removals comment stripping makes.
    pub fn unified_diff(&self) -> String {
        if !self.changed {
            return String::new();
        }
        let before = diff_lines(&self.before);
        let after = diff_lines(&self.after);

        let path = self.path.display();
        let mut out = format!("--- {path}\n+++ {path}\n");
        let (mut bi, mut ai) = (0, 0);
        while bi < before.len() || ai < after.len() {
            if bi < before.len() && ai < after.len() && before[bi] == after[ai] {
                bi += 1;
                ai += 1;
                continue;
            }
            if let Some(line) = before.get(bi) {
                out.push_str(&format!("-{line}\n"));
                bi += 1;
            }
            if let Some(line) = after.get(ai) {
                out.push_str(&format!("+{line}\n"));
                ai += 1;
            }
        }
        out
    }
}

/// The number of `\n` bytes, plus one for a last line without a terminator.
pub fn count_lines(content: &[u8]) -> usize {
    let newlines = content.iter().filter(|b| **b == b'\n').count();
    match content.last() {
        None => 0,
        Some(b'\n') => newlines,
        Some(_) => newlines + 1,
    }
}

fn diff_lines(content: &[u8]) -> Vec<Cow<'_, str>> {
    if content.is_empty() {
        return vec![];
    }
    let mut lines: Vec<Cow<str>> = content
        .split(|b| *b == b'\n')
        .map(String::from_utf8_lossy)
        .collect();
    if lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_lines_cases() {
        assert_eq!(count_lines(b""), 0);
        assert_eq!(count_lines(b"a"), 1);
        assert_eq!(count_lines(b"a\n"), 1);
        assert_eq!(count_lines(b"a\nb"), 2);
        assert_eq!(count_lines(b"\n\n"), 2);
    }

    #[test]
    fn unchanged_has_no_diff() {
        let result = compute("a.go", b"x\n".to_vec(), b"x\n".to_vec());
        assert!(!result.changed);
        assert_eq!(result.lines_removed(), 0);
        assert_eq!(result.unified_diff(), "");
    }

    #[test]
    fn changed_is_byte_inequality() {
        let result = compute("a.go", b"x  \n".to_vec(), b"x\n".to_vec());
        assert!(result.changed);
        assert_eq!(result.lines_removed(), 0);
        assert!(!result.unified_diff().is_empty());
    }

    #[test]
    fn removed_lines_are_counted() {
        let result = compute(
            "main.go",
            b"package main\n// c\nfunc f(){}\n".to_vec(),
            b"package main\nfunc f(){}\n".to_vec(),
        );
        assert!(result.changed);
        assert_eq!(result.lines_removed(), 1);
    }

    #[test]
    fn removal_to_empty_counts_every_line() {
        let result = compute("c.py", b"# a\n# b".to_vec(), vec![]);
        assert_eq!(result.lines_removed(), 2);
    }

    #[test]
    fn inline_change_diff() {
        let result = compute(
            "x.go",
            b"a\nx := 1 // c\nb\n".to_vec(),
            b"a\nx := 1\nb\n".to_vec(),
        );
        assert_eq!(
            result.unified_diff(),
            "--- x.go\n+++ x.go\n-x := 1 // c\n+x := 1\n"
        );
    }

    #[test]
    fn greedy_diff_of_a_removed_line() {
        let result = compute(
            "main.go",
            b"package main\n// c\nfunc f(){}\n".to_vec(),
            b"package main\nfunc f(){}\n".to_vec(),
        );
        assert_eq!(
            result.unified_diff(),
            "--- main.go\n+++ main.go\n-// c\n+func f(){}\n-func f(){}\n"
        );
    }
}
