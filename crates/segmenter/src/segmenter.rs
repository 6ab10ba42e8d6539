use crate::config::SegmenterConfig;
use crate::engine::SegmentationEngine;
use crate::error::{Result, SegmentError};
use crate::report::{CoverageReport, FileCoverage};
use crate::segment::{read_source, CodeSegment};
use covgap_structure::{Language, StructureNode, StructureParser};
use std::path::Path;

/// Main interface: coverage report in, code segments out
pub struct Segmenter {
    config: SegmenterConfig,
}

impl Segmenter {
    /// Create a new segmenter, rejecting invalid configuration
    pub fn new(config: SegmenterConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Active configuration
    #[must_use]
    pub fn config(&self) -> &SegmenterConfig {
        &self.config
    }

    /// Load a JSON coverage report and segment every file it names
    pub fn missing_coverage(&self, report_path: impl AsRef<Path>) -> Result<Vec<CodeSegment>> {
        let report = CoverageReport::load(report_path)?;
        self.segment_report(&report)
    }

    /// Segment every file of an already loaded report, in path order
    pub fn segment_report(&self, report: &CoverageReport) -> Result<Vec<CodeSegment>> {
        let mut segments = Vec::new();

        for (name, coverage) in &report.files {
            if !coverage.has_gaps() {
                log::debug!("{name}: fully covered");
                continue;
            }

            let path = self.config.resolve(name);
            let language = Language::from_path(&path);
            if !language.supports_structure() {
                log::warn!("{name}: no structure parser for this file type; skipped");
                continue;
            }

            let structure = load_structure(&path, language)?;
            let found = self.segment_file(&path, &structure, coverage);
            log::debug!("{name}: {} segment(s)", found.len());
            segments.extend(found);
        }

        Ok(segments)
    }

    /// Segment one file given its structure tree and coverage
    #[must_use]
    pub fn segment_file(
        &self,
        filename: &Path,
        structure: &StructureNode,
        coverage: &FileCoverage,
    ) -> Vec<CodeSegment> {
        SegmentationEngine::new(filename, coverage, &self.config).segment(structure)
    }
}

fn load_structure(path: &Path, language: Language) -> Result<StructureNode> {
    let content = read_source(path)?;
    let structure_error = |source| SegmentError::Structure {
        path: path.to_path_buf(),
        source,
    };

    StructureParser::new(language)
        .and_then(|mut parser| parser.parse(&content))
        .map_err(structure_error)
}
