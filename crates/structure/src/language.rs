use crate::error::{Result, StructureError};
use std::path::Path;

/// Source language of a file named in a coverage report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    Python,
    Unknown,
}

impl Language {
    /// Detect language from file extension
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "py" | "pyw" | "pyi" => Language::Python,
            _ => Language::Unknown,
        }
    }

    /// Detect language from file path
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .map(Self::from_extension)
            .unwrap_or(Language::Unknown)
    }

    /// Get language name as string
    pub fn as_str(self) -> &'static str {
        match self {
            Language::Python => "python",
            Language::Unknown => "unknown",
        }
    }

    /// Check if a structure tree can be built for this language
    pub fn supports_structure(self) -> bool {
        matches!(self, Language::Python)
    }

    /// Get Tree-sitter language instance
    pub fn tree_sitter_language(self) -> Result<tree_sitter::Language> {
        match self {
            Language::Python => Ok(tree_sitter_python::LANGUAGE.into()),
            Language::Unknown => Err(StructureError::unsupported_language(self.as_str())),
        }
    }

    /// Node kinds that introduce a function scope
    pub(crate) fn function_kinds(self) -> &'static [&'static str] {
        match self {
            Language::Python => &["function_definition"],
            Language::Unknown => &[],
        }
    }

    /// Node kinds that introduce a class scope
    pub(crate) fn class_kinds(self) -> &'static [&'static str] {
        match self {
            Language::Python => &["class_definition"],
            Language::Unknown => &[],
        }
    }

    /// Node kind wrapping a definition together with its decorators
    pub(crate) fn decorated_kind(self) -> Option<&'static str> {
        match self {
            Language::Python => Some("decorated_definition"),
            Language::Unknown => None,
        }
    }
}
