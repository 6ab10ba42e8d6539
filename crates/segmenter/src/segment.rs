use crate::error::{Result, SegmentError};
use crate::report::{BranchEdge, FileCoverage};
use covgap_structure::NodeKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

/// Width of the line-number gutter in annotated excerpts
const GUTTER_WIDTH: usize = 10;

/// A contiguous region of source holding uncovered behavior
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CodeSegment {
    /// Source file the segment belongs to
    pub filename: PathBuf,

    /// Name of the owning definition (empty for module-level statements)
    pub name: String,

    /// Kind of the owning definition
    pub kind: NodeKind,

    /// Whether this segment groups statements of the owner's body that lie
    /// outside its nested definitions
    #[serde(default)]
    pub residual: bool,

    /// First reported line (1-indexed, may be a decorator line)
    pub begin: usize,

    /// Last reported line (1-indexed, inclusive)
    pub end: usize,

    /// Missing lines within the span
    pub missing_lines: BTreeSet<usize>,

    /// Missing branches whose source line lies within the span
    pub missing_branches: BTreeSet<BranchEdge>,

    /// Executed lines within the span
    #[serde(default)]
    pub executed_lines: BTreeSet<usize>,

    /// Header spans `(first, last)` of enclosing definitions, outermost first
    #[serde(default)]
    pub context: Vec<(usize, usize)>,
}

impl CodeSegment {
    /// Create a segment with no coverage attached
    #[must_use]
    pub fn new(
        filename: impl Into<PathBuf>,
        name: impl Into<String>,
        kind: NodeKind,
        begin: usize,
        end: usize,
    ) -> Self {
        Self {
            filename: filename.into(),
            name: name.into(),
            kind,
            residual: false,
            begin,
            end: end.max(begin),
            missing_lines: BTreeSet::new(),
            missing_branches: BTreeSet::new(),
            executed_lines: BTreeSet::new(),
            context: Vec::new(),
        }
    }

    /// Builder: attach the coverage that falls within the span
    #[must_use]
    pub fn with_coverage(mut self, coverage: &FileCoverage) -> Self {
        self.missing_lines = coverage.missing_in(self.begin, self.end).collect();
        self.missing_branches = coverage.missing_branches_in(self.begin, self.end).collect();
        self.executed_lines = coverage.executed_in(self.begin, self.end).collect();
        self
    }

    /// Builder: set enclosing header spans
    #[must_use]
    pub fn with_context(mut self, context: Vec<(usize, usize)>) -> Self {
        self.context = context;
        self
    }

    /// Builder: mark as a residual segment
    #[must_use]
    pub fn residual(mut self) -> Self {
        self.residual = true;
        self
    }

    /// `filename:begin-end`
    #[must_use]
    pub fn identify(&self) -> String {
        format!("{}:{}-{}", self.filename.display(), self.begin, self.end)
    }

    /// Get the number of lines in this segment
    #[must_use]
    pub const fn line_count(&self) -> usize {
        self.end.saturating_sub(self.begin) + 1
    }

    /// Check if segment contains a specific line
    #[must_use]
    pub const fn contains_line(&self, line: usize) -> bool {
        line >= self.begin && line <= self.end
    }

    /// Number of missing lines plus missing branches
    #[must_use]
    pub fn missing_count(&self) -> usize {
        self.missing_lines.len() + self.missing_branches.len()
    }

    /// Missing lines together with the source lines of missing branches
    #[must_use]
    pub fn lines_of_interest(&self) -> BTreeSet<usize> {
        self.missing_lines
            .iter()
            .copied()
            .chain(self.missing_branches.iter().map(BranchEdge::source))
            .collect()
    }

    /// Read the source file and return lines `begin..=end`
    pub fn excerpt(&self) -> Result<String> {
        Ok(self.excerpt_from(&self.read_source()?))
    }

    /// Lines `begin..=end` of already loaded source text
    #[must_use]
    pub fn excerpt_from(&self, source: &str) -> String {
        source_lines(source)
            .skip(self.begin.saturating_sub(1))
            .take(self.line_count())
            .collect()
    }

    /// Read the source file and return the annotated excerpt
    pub fn annotated_excerpt(&self) -> Result<String> {
        Ok(self.annotated_excerpt_from(&self.read_source()?))
    }

    /// Enclosing headers followed by the segment's lines, each behind a
    /// gutter that carries the line number of lines of interest
    #[must_use]
    pub fn annotated_excerpt_from(&self, source: &str) -> String {
        let lines: Vec<String> = source_lines(source).collect();
        let line_at = |number: usize| {
            number
                .checked_sub(1)
                .and_then(|i| lines.get(i))
                .map(String::as_str)
        };
        let blank = " ".repeat(GUTTER_WIDTH + 2);
        let interest = self.lines_of_interest();
        let mut excerpt = String::new();

        for &(first, last) in &self.context {
            for text in (first..=last).filter_map(line_at) {
                excerpt.push_str(&blank);
                excerpt.push_str(text);
            }
        }

        let never_ran = self.executed_lines.is_empty();
        for number in self.begin..=self.end {
            let Some(text) = line_at(number) else { break };
            if !never_ran && interest.contains(&number) {
                excerpt.push_str(&format!("{number:>GUTTER_WIDTH$}: "));
            } else {
                excerpt.push_str(&blank);
            }
            excerpt.push_str(text);
        }

        excerpt
    }

    /// Plain-English account of what never ran, e.g.
    /// `"lines 7-10 and branch 12->15 do not execute"`
    #[must_use]
    pub fn describe_missing(&self) -> String {
        if self.executed_lines.is_empty() {
            return "it does not execute".to_string();
        }

        let mut parts = Vec::new();
        if !self.missing_lines.is_empty() {
            let noun = if self.missing_lines.len() == 1 { "line" } else { "lines" };
            parts.push(format!(
                "{noun} {}",
                format_ranges(&self.missing_lines, &self.executed_lines)
            ));
        }
        if !self.missing_branches.is_empty() {
            let noun = if self.missing_branches.len() == 1 { "branch" } else { "branches" };
            let branches: Vec<_> = self.missing_branches.iter().map(ToString::to_string).collect();
            parts.push(format!("{noun} {}", branches.join(", ")));
        }

        let verb = if self.missing_count() == 1 { "does" } else { "do" };
        format!("{} {verb} not execute", parts.join(" and "))
    }

    fn read_source(&self) -> Result<String> {
        read_source(&self.filename)
    }
}

impl fmt::Display for CodeSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.identify())
    }
}

pub(crate) fn read_source(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| SegmentError::source_io(path, e))
}

/// Source lines, each terminated by a newline
fn source_lines(source: &str) -> impl Iterator<Item = String> + '_ {
    source.lines().map(|line| format!("{line}\n"))
}

/// Compress sorted line numbers into ranges like `3, 7-10`.
///
/// Two missing lines join the same range when no executed line sits between
/// them, so blank lines and comments do not break a range apart.
fn format_ranges(lines: &BTreeSet<usize>, executed: &BTreeSet<usize>) -> String {
    let mut ranges: Vec<(usize, usize)> = Vec::new();
    for &line in lines {
        match ranges.last_mut() {
            Some((_, last)) if executed.range(*last..line).next().is_none() => *last = line,
            _ => ranges.push((line, line)),
        }
    }

    ranges
        .iter()
        .map(|&(first, last)| {
            if first == last {
                first.to_string()
            } else {
                format!("{first}-{last}")
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}
