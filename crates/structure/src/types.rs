use serde::{Deserialize, Serialize};

/// A structural element of a source file: the module itself, a class, or a function
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StructureNode {
    /// Identifier of the definition (empty for the module scope)
    pub name: String,

    /// What kind of scope this node introduces
    pub kind: NodeKind,

    /// First line of the definition header (1-indexed, decorators excluded)
    pub begin: usize,

    /// Last line of the definition (1-indexed, inclusive)
    pub end: usize,

    /// First decorator line, or `begin` when the definition is undecorated
    pub decorator_begin: usize,

    /// Nested definitions in source order
    #[serde(default)]
    pub children: Vec<StructureNode>,
}

impl StructureNode {
    /// Create the root node for a module with `line_count` lines
    #[must_use]
    pub fn module(line_count: usize) -> Self {
        Self {
            name: String::new(),
            kind: NodeKind::Module,
            begin: 1,
            end: line_count.max(1),
            decorator_begin: 1,
            children: Vec::new(),
        }
    }

    /// Create a definition node without children
    #[must_use]
    pub fn definition(
        name: impl Into<String>,
        kind: NodeKind,
        decorator_begin: usize,
        begin: usize,
        end: usize,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            begin,
            end,
            decorator_begin: decorator_begin.min(begin),
            children: Vec::new(),
        }
    }

    /// Builder: append a nested definition
    #[must_use]
    pub fn with_child(mut self, child: StructureNode) -> Self {
        self.children.push(child);
        self
    }

    /// Number of lines spanned, decorators included
    #[must_use]
    pub const fn size(&self) -> usize {
        self.end.saturating_sub(self.decorator_begin) + 1
    }

    /// Whether this node has no nested definitions
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Check if the decorated span contains a specific line
    #[must_use]
    pub const fn contains_line(&self, line: usize) -> bool {
        line >= self.decorator_begin && line <= self.end
    }

    /// Depth-first iterator over this node and all of its descendants
    pub fn walk(&self) -> impl Iterator<Item = &StructureNode> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.children.iter().rev());
            Some(node)
        })
    }

    /// Innermost node whose decorated span contains `line`
    #[must_use]
    pub fn innermost_at(&self, line: usize) -> Option<&StructureNode> {
        if !self.contains_line(line) {
            return None;
        }
        self.children
            .iter()
            .find_map(|child| child.innermost_at(line))
            .or(Some(self))
    }
}

/// Type of scope a structure node introduces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// Whole-file scope
    Module,
    /// Class definition
    Class,
    /// Function or method definition
    Function,
}

impl NodeKind {
    /// Get human-readable name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Module => "module",
            Self::Class => "class",
            Self::Function => "function",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> StructureNode {
        StructureNode::module(30)
            .with_child(
                StructureNode::definition("Outer", NodeKind::Class, 2, 3, 12)
                    .with_child(StructureNode::definition("method", NodeKind::Function, 5, 5, 8)),
            )
            .with_child(StructureNode::definition("free", NodeKind::Function, 14, 14, 20))
    }

    #[test]
    fn test_size_includes_decorators() {
        let node = StructureNode::definition("f", NodeKind::Function, 10, 12, 15);
        assert_eq!(node.size(), 6);
    }

    #[test]
    fn test_decorator_begin_never_after_begin() {
        let node = StructureNode::definition("f", NodeKind::Function, 20, 12, 15);
        assert_eq!(node.decorator_begin, 12);
    }

    #[test]
    fn test_contains_line() {
        let node = StructureNode::definition("f", NodeKind::Function, 10, 12, 15);
        assert!(node.contains_line(10));
        assert!(node.contains_line(15));
        assert!(!node.contains_line(9));
        assert!(!node.contains_line(16));
    }

    #[test]
    fn test_walk_is_source_ordered() {
        let names: Vec<_> = sample().walk().map(|n| n.name.clone()).collect();
        assert_eq!(names, vec!["", "Outer", "method", "free"]);
    }

    #[test]
    fn test_innermost_at() {
        let root = sample();
        assert_eq!(root.innermost_at(6).map(|n| n.name.as_str()), Some("method"));
        assert_eq!(root.innermost_at(2).map(|n| n.name.as_str()), Some("Outer"));
        assert_eq!(root.innermost_at(13).map(|n| n.kind), Some(NodeKind::Module));
        assert!(root.innermost_at(31).is_none());
    }
}
