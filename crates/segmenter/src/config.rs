use crate::error::{Result, SegmentError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name looked up in the working directory by [`SegmenterConfig::discover`]
pub const CONFIG_FILE_NAME: &str = "covgap.toml";

/// Configuration for segmentation behavior
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SegmenterConfig {
    /// Largest span (in lines) a class or function may have and still be
    /// reported as one segment together with everything nested in it
    pub line_limit: usize,

    /// Report top-level statements outside any definition as residual
    /// segments of the module
    pub module_residuals: bool,

    /// Directory that relative paths in the report are resolved against
    pub source_root: Option<PathBuf>,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            line_limit: 50,
            module_residuals: true,
            source_root: None,
        }
    }
}

impl SegmenterConfig {
    /// Builder: set the merge budget
    #[must_use]
    pub fn with_line_limit(mut self, line_limit: usize) -> Self {
        self.line_limit = line_limit;
        self
    }

    /// Builder: set the source root
    #[must_use]
    pub fn with_source_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.source_root = Some(root.into());
        self
    }

    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| SegmentError::invalid_config(format!("{}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    /// Load `covgap.toml` from `dir` if present, defaults otherwise
    pub fn discover(dir: impl AsRef<Path>) -> Result<Self> {
        let candidate = dir.as_ref().join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            log::debug!("using configuration from {}", candidate.display());
            Self::load(candidate)
        } else {
            Ok(Self::default())
        }
    }

    /// Resolve a path as written in a coverage report
    #[must_use]
    pub fn resolve(&self, report_path: &str) -> PathBuf {
        match &self.source_root {
            Some(root) => root.join(report_path),
            None => PathBuf::from(report_path),
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.line_limit == 0 {
            return Err(SegmentError::invalid_argument("line_limit must be >= 1"));
        }

        Ok(())
    }
}
