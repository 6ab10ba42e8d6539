//! # Covgap Structure
//!
//! Structural outline of a source file: the module, its classes and functions,
//! and every nested definition, each with a line span and decorator span.
//!
//! ## Architecture
//!
//! ```text
//! Source Code
//!     │
//!     ├──> Language Detection (from extension)
//!     │
//!     ├──> Tree-sitter Parsing → AST
//!     │
//!     └──> Definition Walk
//!          ├─> class/function definitions at any depth
//!          ├─> decorator lines folded into decorator_begin
//!          └─> StructureNode tree rooted at the module
//! ```
//!
//! ## Example
//!
//! ```rust
//! use covgap_structure::{Language, NodeKind, StructureParser};
//!
//! let mut parser = StructureParser::new(Language::Python).unwrap();
//! let code = "@cache\ndef compute(x):\n    return x * 2\n";
//!
//! let module = parser.parse(code).unwrap();
//! let compute = &module.children[0];
//! assert_eq!(compute.kind, NodeKind::Function);
//! assert_eq!(compute.decorator_begin, 1);
//! assert_eq!((compute.begin, compute.end), (2, 3));
//! ```

mod error;
mod language;
mod parser;
mod types;

pub use error::{Result, StructureError};
pub use language::Language;
pub use parser::StructureParser;
pub use types::{NodeKind, StructureNode};
