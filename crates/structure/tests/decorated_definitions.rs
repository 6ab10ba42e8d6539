use covgap_structure::{Language, NodeKind, StructureNode, StructureParser};
use std::fs;
use tempfile::tempdir;

fn parse(code: &str) -> StructureNode {
    let mut parser = StructureParser::new(Language::Python).expect("python parser");
    parser.parse(code).expect("parse failed")
}

#[test]
fn multi_decorator_span_starts_at_first_decorator() {
    let code = r#"import functools


@functools.lru_cache(maxsize=None)
@other(
    "arg",
)
def cached(x):
    return x
"#;

    let module = parse(code);
    let cached = &module.children[0];
    assert_eq!(cached.name, "cached");
    assert_eq!(cached.decorator_begin, 4);
    assert_eq!(cached.begin, 8);
    assert_eq!(cached.end, 9);
    assert_eq!(cached.size(), 6);
}

#[test]
fn children_are_disjoint_and_ordered() {
    let code = r#"class A:
    @property
    def a(self):
        return 1

    class B:
        def b(self):
            def c():
                pass
            return c

def top():
    pass
"#;

    let module = parse(code);
    for node in module.walk() {
        for pair in node.children.windows(2) {
            assert!(pair[0].end < pair[1].decorator_begin, "overlap in {:?}", node.name);
        }
        for child in &node.children {
            assert!(child.decorator_begin >= node.decorator_begin);
            assert!(child.end <= node.end);
        }
    }

    let kinds: Vec<_> = module.walk().map(|n| (n.name.as_str(), n.kind)).collect();
    assert_eq!(
        kinds,
        vec![
            ("", NodeKind::Module),
            ("A", NodeKind::Class),
            ("a", NodeKind::Function),
            ("B", NodeKind::Class),
            ("b", NodeKind::Function),
            ("c", NodeKind::Function),
            ("top", NodeKind::Function),
        ]
    );
}

#[test]
fn parse_file_reads_from_disk() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("mod.py");
    fs::write(&path, "def f():\n    return 1\n").unwrap();

    let mut parser = StructureParser::for_path(&path).expect("python parser");
    let module = parser.parse_file(&path).expect("parse file");
    assert_eq!(module.children[0].name, "f");

    let missing = parser.parse_file(dir.path().join("absent.py"));
    assert!(missing.is_err());
}

#[test]
fn structure_tree_serializes_as_json() {
    let module = parse("def f():\n    pass\n");
    let json = serde_json::to_value(&module).unwrap();
    assert_eq!(json["kind"], "module");
    assert_eq!(json["children"][0]["kind"], "function");
    assert_eq!(json["children"][0]["name"], "f");
}
