use crate::error::{Result, StructureError};
use crate::language::Language;
use crate::types::{NodeKind, StructureNode};
use std::path::Path;
use tree_sitter::{Node, Parser, Point};

/// AST-based builder of structure trees
pub struct StructureParser {
    parser: Parser,
    language: Language,
}

impl StructureParser {
    /// Create new structure parser for a language
    pub fn new(language: Language) -> Result<Self> {
        if !language.supports_structure() {
            return Err(StructureError::unsupported_language(language.as_str()));
        }

        let ts_language = language.tree_sitter_language()?;
        let mut parser = Parser::new();
        parser
            .set_language(&ts_language)
            .map_err(|e| StructureError::tree_sitter(format!("Failed to set language: {e}")))?;

        Ok(Self { parser, language })
    }

    /// Create a parser for the language of `path`
    pub fn for_path(path: impl AsRef<Path>) -> Result<Self> {
        Self::new(Language::from_path(path))
    }

    /// Language this parser was configured for
    pub fn language(&self) -> Language {
        self.language
    }

    /// Parse source text into a module-rooted structure tree
    pub fn parse(&mut self, content: &str) -> Result<StructureNode> {
        let tree = self
            .parser
            .parse(content, None)
            .ok_or_else(|| StructureError::parse("Failed to parse source code"))?;

        let root = tree.root_node();
        if root.has_error() {
            log::debug!("source contains syntax errors; structure may be partial");
        }

        let mut module = StructureNode::module(content.lines().count());
        self.collect_definitions(content.as_bytes(), root, &mut module.children);
        Ok(module)
    }

    /// Read and parse a file
    pub fn parse_file(&mut self, path: impl AsRef<Path>) -> Result<StructureNode> {
        let content = std::fs::read_to_string(path)?;
        self.parse(&content)
    }

    /// Push every outermost definition below `node` into `out`
    fn collect_definitions(&self, source: &[u8], node: Node, out: &mut Vec<StructureNode>) {
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            match self.definition(source, child) {
                Some(definition) => out.push(definition),
                None => self.collect_definitions(source, child, out),
            }
        }
    }

    /// Convert a definition node (possibly decorated) into a structure node
    fn definition(&self, source: &[u8], node: Node) -> Option<StructureNode> {
        let (decorator_begin, def_node) = if Some(node.kind()) == self.language.decorated_kind() {
            (start_line(node), node.child_by_field_name("definition")?)
        } else {
            (start_line(node), node)
        };

        let kind = if self.language.function_kinds().contains(&def_node.kind()) {
            NodeKind::Function
        } else if self.language.class_kinds().contains(&def_node.kind()) {
            NodeKind::Class
        } else {
            return None;
        };

        let name = def_node
            .child_by_field_name("name")
            .and_then(|n| n.utf8_text(source).ok())
            .unwrap_or_default();

        let mut structure = StructureNode::definition(
            name,
            kind,
            decorator_begin,
            start_line(def_node),
            end_line(def_node),
        );

        if let Some(body) = def_node.child_by_field_name("body") {
            self.collect_definitions(source, body, &mut structure.children);
        }

        Some(structure)
    }
}

fn start_line(node: Node) -> usize {
    node.start_position().row + 1
}

/// Last line holding a character of `node`
fn end_line(node: Node) -> usize {
    let Point { row, column } = node.end_position();
    if column == 0 && row > node.start_position().row {
        row
    } else {
        row + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(code: &str) -> StructureNode {
        let mut parser = StructureParser::new(Language::Python).unwrap();
        parser.parse(code).unwrap()
    }

    #[test]
    fn test_module_root() {
        let module = parse("x = 1\ny = 2\n");
        assert_eq!(module.kind, NodeKind::Module);
        assert_eq!(module.name, "");
        assert_eq!((module.begin, module.end), (1, 2));
        assert!(module.is_leaf());
    }

    #[test]
    fn test_empty_source() {
        let module = parse("");
        assert_eq!((module.begin, module.end), (1, 1));
    }

    #[test]
    fn test_class_with_methods() {
        let code = r#"class Foo:
    x = 0

    @staticmethod
    def foo():
        pass

    async def bar(self):
        return 1
"#;
        let module = parse(code);
        assert_eq!(module.children.len(), 1);

        let class = &module.children[0];
        assert_eq!(class.name, "Foo");
        assert_eq!(class.kind, NodeKind::Class);
        assert_eq!((class.decorator_begin, class.begin, class.end), (1, 1, 9));

        let methods: Vec<_> = class
            .children
            .iter()
            .map(|m| (m.name.as_str(), m.decorator_begin, m.begin, m.end))
            .collect();
        assert_eq!(methods, vec![("foo", 4, 5, 6), ("bar", 8, 8, 9)]);
    }

    #[test]
    fn test_nested_definitions_inside_blocks() {
        let code = r#"def outer(flag):
    if flag:
        def inner():
            return 1
    else:
        class Local:
            pass
    return flag
"#;
        let module = parse(code);
        let outer = &module.children[0];
        let names: Vec<_> = outer.children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["inner", "Local"]);
        assert_eq!(outer.children[1].kind, NodeKind::Class);
    }

    #[test]
    fn test_unsupported_language() {
        assert!(StructureParser::new(Language::Unknown).is_err());
        assert!(StructureParser::for_path("lib.rs").is_err());
    }
}
