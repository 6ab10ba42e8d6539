//! Coverage report model and JSON loading.
//!
//! The accepted format is the per-file JSON emitted by SlipCover and
//! coverage.py: a top-level `files` object keyed by source path, each entry
//! carrying `executed_lines` and `missing_lines`, and optionally
//! `executed_branches` / `missing_branches` as `[source, dest]` pairs.
//! Unknown keys (`meta`, `summary`, `totals`, ...) are ignored.

use crate::error::{Result, SegmentError};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::Path;

/// Coverage for every file named in a report
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CoverageReport {
    /// Per-file coverage keyed by the path as written in the report
    pub files: BTreeMap<String, FileCoverage>,
}

impl CoverageReport {
    /// Load a report from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let display = path.display().to_string();
        let content =
            std::fs::read_to_string(path).map_err(|e| SegmentError::report_load(&display, e))?;
        Self::parse(&content, &display)
    }

    /// Parse a report from JSON text
    pub fn from_json(json: &str) -> Result<Self> {
        Self::parse(json, "<inline>")
    }

    fn parse(json: &str, origin: &str) -> Result<Self> {
        let report: Self =
            serde_json::from_str(json).map_err(|e| SegmentError::report_load(origin, e))?;
        log::debug!("loaded coverage for {} file(s) from {origin}", report.files.len());
        Ok(report)
    }

    /// Coverage of a single file, if present
    #[must_use]
    pub fn file(&self, name: &str) -> Option<&FileCoverage> {
        self.files.get(name)
    }
}

/// Line and branch coverage of one source file
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct FileCoverage {
    /// Lines that ran at least once
    pub executed_lines: BTreeSet<usize>,

    /// Executable lines that never ran
    pub missing_lines: BTreeSet<usize>,

    /// Branch edges that were taken
    #[serde(default)]
    pub executed_branches: BTreeSet<BranchEdge>,

    /// Branch edges that were never taken
    #[serde(default)]
    pub missing_branches: BTreeSet<BranchEdge>,
}

impl FileCoverage {
    /// Whether any line or branch gap exists in the file
    #[must_use]
    pub fn has_gaps(&self) -> bool {
        !self.missing_lines.is_empty() || !self.missing_branches.is_empty()
    }

    /// Whether a line or branch gap starts within `begin..=end`
    #[must_use]
    pub fn has_gap_in(&self, begin: usize, end: usize) -> bool {
        self.missing_in(begin, end).next().is_some()
            || self.missing_branches_in(begin, end).next().is_some()
    }

    /// Missing lines within `begin..=end`
    pub fn missing_in(&self, begin: usize, end: usize) -> impl Iterator<Item = usize> + '_ {
        lines_in(&self.missing_lines, begin, end)
    }

    /// Executed lines within `begin..=end`
    pub fn executed_in(&self, begin: usize, end: usize) -> impl Iterator<Item = usize> + '_ {
        lines_in(&self.executed_lines, begin, end)
    }

    /// Missing branches whose source line lies within `begin..=end`
    pub fn missing_branches_in(
        &self,
        begin: usize,
        end: usize,
    ) -> impl Iterator<Item = BranchEdge> + '_ {
        let range = (begin <= end)
            .then(|| BranchEdge(begin, i64::MIN)..=BranchEdge(end, i64::MAX))
            .map(|r| self.missing_branches.range(r));
        range.into_iter().flatten().copied()
    }

    /// Every line a gap is attributed to: missing lines and missing-branch sources
    #[must_use]
    pub fn gap_lines(&self) -> BTreeSet<usize> {
        self.missing_lines
            .iter()
            .copied()
            .chain(self.missing_branches.iter().map(BranchEdge::source))
            .collect()
    }
}

fn lines_in(lines: &BTreeSet<usize>, begin: usize, end: usize) -> impl Iterator<Item = usize> + '_ {
    (begin <= end)
        .then(|| lines.range(begin..=end))
        .into_iter()
        .flatten()
        .copied()
}

/// Control-flow edge `(source, dest)` between two lines.
///
/// A destination of `0` (SlipCover) or a negative number (coverage.py)
/// stands for leaving the enclosing scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BranchEdge(pub usize, pub i64);

impl BranchEdge {
    /// Line the branch originates from
    #[must_use]
    pub const fn source(&self) -> usize {
        self.0
    }

    /// Line the branch jumps to, or `None` for an exit
    #[must_use]
    pub fn dest(&self) -> Option<usize> {
        usize::try_from(self.1).ok().filter(|&line| line > 0)
    }

    /// Whether this edge leaves the enclosing scope
    #[must_use]
    pub fn is_exit(&self) -> bool {
        self.dest().is_none()
    }
}

impl fmt::Display for BranchEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.dest() {
            Some(dest) => write!(f, "{}->{dest}", self.0),
            None => write!(f, "{}->exit", self.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const REPORT: &str = r#"{
        "meta": {"software": "slipcover"},
        "files": {
            "pkg/mod.py": {
                "executed_lines": [1, 2, 5],
                "missing_lines": [3, 4, 9],
                "executed_branches": [[2, 3]],
                "missing_branches": [[2, 5], [5, 0], [7, -1]],
                "summary": {"percent_covered": 40.0}
            },
            "pkg/clean.py": {
                "executed_lines": [1],
                "missing_lines": []
            }
        }
    }"#;

    #[test]
    fn test_parse_report() {
        let report = CoverageReport::from_json(REPORT).unwrap();
        assert_eq!(report.files.len(), 2);

        let cov = report.file("pkg/mod.py").unwrap();
        assert_eq!(cov.missing_lines, BTreeSet::from([3, 4, 9]));
        assert_eq!(
            cov.missing_branches,
            BTreeSet::from([BranchEdge(2, 5), BranchEdge(5, 0), BranchEdge(7, -1)])
        );

        let clean = report.file("pkg/clean.py").unwrap();
        assert!(clean.missing_branches.is_empty());
        assert!(!clean.has_gaps());
    }

    #[test]
    fn test_missing_line_data_is_rejected() {
        let json = r#"{"files": {"a.py": {"executed_lines": [1]}}}"#;
        let err = CoverageReport::from_json(json).unwrap_err();
        assert!(matches!(err, SegmentError::ReportLoad { .. }));
    }

    #[test]
    fn test_load_missing_file() {
        let err = CoverageReport::load("/nonexistent/coverage.json").unwrap_err();
        assert!(matches!(err, SegmentError::ReportLoad { .. }));
    }

    #[test]
    fn test_range_queries() {
        let cov = CoverageReport::from_json(REPORT).unwrap().files["pkg/mod.py"].clone();
        assert_eq!(cov.missing_in(3, 8).collect::<Vec<_>>(), vec![3, 4]);
        assert_eq!(cov.executed_in(1, 2).collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(
            cov.missing_branches_in(5, 7).collect::<Vec<_>>(),
            vec![BranchEdge(5, 0), BranchEdge(7, -1)]
        );
        assert!(cov.has_gap_in(6, 8));
        assert!(!cov.has_gap_in(10, 20));
        assert_eq!(cov.missing_in(8, 3).count(), 0);
        assert!(!cov.has_gap_in(8, 3));
        assert_eq!(cov.gap_lines(), BTreeSet::from([2, 3, 4, 5, 7, 9]));
    }

    #[test]
    fn test_branch_display() {
        assert_eq!(BranchEdge(12, 15).to_string(), "12->15");
        assert_eq!(BranchEdge(38, 0).to_string(), "38->exit");
        assert_eq!(BranchEdge(7, -3).to_string(), "7->exit");
        assert!(BranchEdge(7, -3).is_exit());
        assert_eq!(BranchEdge(12, 15).dest(), Some(15));
    }
}
