//! Coarsen-or-split over a structure tree.
//!
//! Every definition with a gap is either reported whole (leaves always, and
//! composites whose decorated span fits within `line_limit`) or split into
//! its children plus residual segments covering the statements of its body
//! that lie between those children. The module is always split.

use crate::config::SegmenterConfig;
use crate::report::FileCoverage;
use crate::segment::CodeSegment;
use covgap_structure::{NodeKind, StructureNode};
use std::path::Path;

/// Result of folding one structure node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Coarsened {
    /// No gap anywhere in the node's span
    Pruned,
    /// The whole subtree reported as one segment
    Merged(CodeSegment),
    /// Child and residual segments in source order
    Split(Vec<CodeSegment>),
}

impl Coarsened {
    /// Flatten into segments
    #[must_use]
    pub fn into_segments(self) -> Vec<CodeSegment> {
        match self {
            Self::Pruned => Vec::new(),
            Self::Merged(segment) => vec![segment],
            Self::Split(segments) => segments,
        }
    }
}

/// Segmentation of a single file
pub struct SegmentationEngine<'a> {
    filename: &'a Path,
    coverage: &'a FileCoverage,
    line_limit: usize,
    module_residuals: bool,
}

impl<'a> SegmentationEngine<'a> {
    /// Create an engine for one file's coverage
    #[must_use]
    pub fn new(filename: &'a Path, coverage: &'a FileCoverage, config: &SegmenterConfig) -> Self {
        Self {
            filename,
            coverage,
            line_limit: config.line_limit,
            module_residuals: config.module_residuals,
        }
    }

    /// Segments of the whole tree rooted at `root`, in source order
    #[must_use]
    pub fn segment(&self, root: &StructureNode) -> Vec<CodeSegment> {
        self.warn_out_of_span(root);
        let mut context = Vec::new();
        self.coarsen(root, &mut context).into_segments()
    }

    /// Fold one node; `context` holds the header spans of split ancestors
    pub fn coarsen(&self, node: &StructureNode, context: &mut Vec<(usize, usize)>) -> Coarsened {
        if !self.coverage.has_gap_in(node.decorator_begin, node.end) {
            return Coarsened::Pruned;
        }

        let mergeable = node.kind != NodeKind::Module
            && (node.is_leaf() || node.size() <= self.line_limit);

        if mergeable {
            log::debug!(
                "{}: {} '{}' {}-{} reported whole",
                self.filename.display(),
                node.kind.as_str(),
                node.name,
                node.decorator_begin,
                node.end
            );
            let segment = CodeSegment::new(
                self.filename,
                node.name.as_str(),
                node.kind,
                node.decorator_begin,
                node.end,
            )
            .with_coverage(self.coverage)
            .with_context(context.clone());
            return Coarsened::Merged(segment);
        }

        Coarsened::Split(self.split(node, context))
    }

    fn split(&self, node: &StructureNode, context: &mut Vec<(usize, usize)>) -> Vec<CodeSegment> {
        let residuals = node.kind != NodeKind::Module || self.module_residuals;
        let header = (node.kind != NodeKind::Module).then_some((node.decorator_begin, node.begin));
        let mut segments = Vec::new();
        let mut cursor = node.decorator_begin;

        for child in &node.children {
            if residuals {
                if let Some(end) = child.decorator_begin.checked_sub(1) {
                    segments.extend(self.residual(node, cursor, end, context));
                }
            }

            context.extend(header);
            segments.extend(self.coarsen(child, context).into_segments());
            if header.is_some() {
                context.pop();
            }

            cursor = cursor.max(child.end + 1);
        }

        if residuals {
            segments.extend(self.residual(node, cursor, node.end, context));
        }

        segments
    }

    /// Residual segment for the body lines `begin..=end` of `node`, if any gap lies there
    fn residual(
        &self,
        node: &StructureNode,
        begin: usize,
        end: usize,
        context: &[(usize, usize)],
    ) -> Option<CodeSegment> {
        if begin > end || !self.coverage.has_gap_in(begin, end) {
            return None;
        }

        let mut context = context.to_vec();
        if node.kind != NodeKind::Module && begin > node.begin {
            context.push((node.decorator_begin, node.begin));
        }

        log::debug!(
            "{}: residual of '{}' at {begin}-{end}",
            self.filename.display(),
            node.name
        );

        Some(
            CodeSegment::new(self.filename, node.name.as_str(), node.kind, begin, end)
                .with_coverage(self.coverage)
                .with_context(context)
                .residual(),
        )
    }

    fn warn_out_of_span(&self, root: &StructureNode) {
        for line in self.coverage.gap_lines() {
            if !root.contains_line(line) {
                log::warn!(
                    "{}: gap at line {line} lies outside lines {}-{}; ignored",
                    self.filename.display(),
                    root.decorator_begin,
                    root.end
                );
            }
        }
    }
}
