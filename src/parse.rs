//! Parse Façade (spec §4.1). Parses source bytes for the selected language
//! and locates a target function's declaration + body subtree.
//!
//! Tree ownership follows spec §9's "tree ownership" note: a
//! `ParsedFunction` borrows the source buffer and the `tree_sitter::Tree`
//! together and is dropped at the end of the caller's `extract_*` call on
//! every exit path, mirroring the teacher's thread-local-parser pattern in
//! `ast.rs` but scoped per call instead of reused across a scan.

use crate::errors::{AnalysisError, AnalysisResult};
use crate::lang::{Grammar, Language};
use std::path::Path;
use tree_sitter::{Node, Parser, Tree};

pub struct ParsedFunction {
    pub source: Vec<u8>,
    pub tree: Tree,
    pub grammar: &'static Grammar,
    function_node_id: usize,
    body_node_id: usize,
}

impl ParsedFunction {
    pub fn function_node(&self) -> Node<'_> {
        find_by_id(self.tree.root_node(), self.function_node_id)
            .expect("function node id recorded during parse")
    }

    pub fn body_node(&self) -> Node<'_> {
        find_by_id(self.tree.root_node(), self.body_node_id)
            .expect("body node id recorded during parse")
    }
}

fn find_by_id(node: Node, id: usize) -> Option<Node> {
    if node.id() == id {
        return Some(node);
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if let Some(found) = find_by_id(child, id) {
            return Some(found);
        }
    }
    None
}

pub fn text_of<'a>(node: Node, code: &'a [u8]) -> &'a str {
    std::str::from_utf8(&code[node.start_byte()..node.end_byte()]).unwrap_or("")
}

/// Resolve a function's printable identifier even when `function_name_field`
/// points at a compound declarator (C/C++ pointer/array declarators nest the
/// identifier several levels deep).
fn declared_name<'a>(node: Node, code: &'a [u8]) -> Option<&'a str> {
    if node.kind() == "identifier" || node.kind() == "name" {
        return Some(text_of(node, code));
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if let Some(name) = declared_name(child, code) {
            return Some(name);
        }
    }
    None
}

fn find_function_decl<'a>(
    node: Node<'a>,
    grammar: &Grammar,
    code: &[u8],
    target: &str,
) -> Option<Node<'a>> {
    if grammar.function_decl_kinds.contains(&node.kind()) {
        if let Some(name_field) = node.child_by_field_name(grammar.function_name_field) {
            if declared_name(name_field, code) == Some(target) {
                return Some(node);
            }
        }
        // TS: `const name = (...) => {...}` — spec §4.1.
        if grammar.arrow_const_binding && node.kind() == "arrow_function" {
            if let Some(decl) = find_arrow_binding(node, code, target) {
                return Some(decl);
            }
        }
    }

    // §4.1: "For Java/Ruby/PHP/C++, descends into class/interface bodies" —
    // the recursive walk below reaches those bodies without needing to
    // special-case `grammar.class_like_kinds` separately.
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if let Some(found) = find_function_decl(child, grammar, code, target) {
            return Some(found);
        }
    }
    None
}

/// TS arrow-function-bound-to-const recognition: `const f = (...) => {...}`.
/// The arrow function itself has no name; the name lives on the enclosing
/// `variable_declarator`.
fn find_arrow_binding<'a>(arrow: Node<'a>, code: &[u8], target: &str) -> Option<Node<'a>> {
    let parent = arrow.parent()?;
    if parent.kind() != "variable_declarator" {
        return None;
    }
    let name = parent.child_by_field_name("name")?;
    if declared_name(name, code) == Some(target) {
        Some(arrow)
    } else {
        None
    }
}

pub fn parse_function(
    path: &Path,
    function_name: &str,
) -> AnalysisResult<ParsedFunction> {
    let source = std::fs::read(path).map_err(|source| AnalysisError::FileRead {
        path: path.to_owned(),
        source,
    })?;

    let language = Language::from_path(path).ok_or_else(|| AnalysisError::UnsupportedLanguage {
        path: path.to_owned(),
    })?;
    let grammar = language.grammar();

    tracing::debug!(file = %path.display(), lang = grammar.name, function = function_name, "parsing");

    let mut parser = Parser::new();
    parser.set_language(&(grammar.ts_language)())?;
    let tree = parser
        .parse(&source, None)
        .expect("tree-sitter parse never returns None for non-empty language setup");

    let function_node_id = find_function_decl(tree.root_node(), grammar, &source, function_name)
        .map(|n| n.id())
        .ok_or_else(|| AnalysisError::FunctionNotFound {
            path: path.to_owned(),
            function: function_name.to_owned(),
        })?;

    let function_node = find_by_id(tree.root_node(), function_node_id).unwrap();
    let body_node_id = function_node
        .child_by_field_name(grammar.body_field)
        .map(|n| n.id())
        .ok_or_else(|| AnalysisError::BodyNotFound {
            path: path.to_owned(),
            function: function_name.to_owned(),
        })?;

    Ok(ParsedFunction {
        source,
        tree,
        grammar,
        function_node_id,
        body_node_id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_tmp(contents: &str, suffix: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        f.flush().unwrap();
        f
    }

    #[test]
    fn finds_python_function_by_name() {
        let f = write_tmp("def f():\n    pass\n", ".py");
        let parsed = parse_function(f.path(), "f").expect("parse ok");
        assert_eq!(parsed.grammar.name, "python");
    }

    #[test]
    fn unsupported_extension_errors() {
        let f = write_tmp("irrelevant", ".xyz");
        let err = parse_function(f.path(), "f").unwrap_err();
        assert!(matches!(err, AnalysisError::UnsupportedLanguage { .. }));
    }

    #[test]
    fn missing_function_errors() {
        let f = write_tmp("def g():\n    pass\n", ".py");
        let err = parse_function(f.path(), "f").unwrap_err();
        assert!(matches!(err, AnalysisError::FunctionNotFound { .. }));
    }
}
