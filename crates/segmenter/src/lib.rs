//! # Covgap Segmenter
//!
//! Turns a per-file coverage report into ordered, non-overlapping code
//! segments: classes, functions, or runs of body statements that hold lines
//! or branches no test has exercised.
//!
//! ## Architecture
//!
//! ```text
//! coverage.json
//!     │
//!     ├──> CoverageReport (executed/missing lines and branches per file)
//!     │
//!     ├──> StructureNode tree per file (covgap-structure)
//!     │
//!     └──> Coarsen-or-split
//!          ├─> prune definitions without gaps
//!          ├─> report leaves and small composites whole
//!          ├─> split larger composites into children + residuals
//!          └─> emit CodeSegment[] in source order
//! ```
//!
//! ## Example
//!
//! ```rust
//! use covgap_segmenter::{CoverageReport, Segmenter, SegmenterConfig};
//! use covgap_structure::{Language, StructureParser};
//! use std::path::Path;
//!
//! let code = "def f(x):\n    if x:\n        return 1\n    return 2\n";
//! let report = CoverageReport::from_json(
//!     r#"{"files": {"f.py": {"executed_lines": [1, 2, 3], "missing_lines": [4]}}}"#,
//! )
//! .unwrap();
//!
//! let structure = StructureParser::new(Language::Python).unwrap().parse(code).unwrap();
//! let segmenter = Segmenter::new(SegmenterConfig::default()).unwrap();
//! let segments = segmenter.segment_file(Path::new("f.py"), &structure, &report.files["f.py"]);
//!
//! assert_eq!(segments.len(), 1);
//! assert_eq!(segments[0].name, "f");
//! assert_eq!(segments[0].describe_missing(), "line 4 does not execute");
//! ```

mod config;
mod engine;
mod error;
mod report;
mod segment;
mod segmenter;

pub use config::{SegmenterConfig, CONFIG_FILE_NAME};
pub use engine::{Coarsened, SegmentationEngine};
pub use error::{Result, SegmentError};
pub use report::{BranchEdge, CoverageReport, FileCoverage};
pub use segment::CodeSegment;
pub use segmenter::Segmenter;

pub use covgap_structure::{NodeKind, StructureNode};

use std::path::Path;

/// Segment every file of the coverage report at `report_path` with merge
/// budget `line_limit`
pub fn get_missing_coverage(
    report_path: impl AsRef<Path>,
    line_limit: usize,
) -> Result<Vec<CodeSegment>> {
    let config = SegmenterConfig::default().with_line_limit(line_limit);
    Segmenter::new(config)?.missing_coverage(report_path)
}
