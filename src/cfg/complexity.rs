//! Cyclomatic complexity: a second, independent top-down AST walk over the
//! function body counting decision points, per spec §4.2's table.

use crate::lang::{lookup, Kind};
use crate::parse::{text_of, ParsedFunction};
use tree_sitter::Node;

const SHORT_CIRCUIT_OPS: [&str; 4] = ["&&", "||", "and", "or"];

pub fn compute(parsed: &ParsedFunction) -> u32 {
    let mut decision_points = 0u32;
    count(
        parsed.body_node(),
        parsed.grammar,
        &parsed.source,
        &mut decision_points,
    );
    decision_points + 1
}

fn count(node: Node, grammar: &'static crate::lang::Grammar, code: &[u8], out: &mut u32) {
    match lookup(grammar, node.kind()) {
        Kind::If => *out += 1,
        Kind::For | Kind::While | Kind::DoWhile | Kind::InfiniteLoop => *out += 1,
        Kind::CaseClause => *out += 1,
        Kind::Catch => *out += 1,
        _ => {}
    }

    if is_ternary(node.kind()) {
        *out += 1;
    }
    if is_binary_short_circuit(node, code) {
        *out += 1;
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        count(child, grammar, code, out);
    }
}

fn is_ternary(kind: &str) -> bool {
    matches!(
        kind,
        "conditional_expression" | "ternary_expression" | "conditional"
    )
}

fn is_binary_short_circuit(node: Node, code: &[u8]) -> bool {
    let kind = node.kind();
    if !matches!(
        kind,
        "binary_expression" | "boolean_operator" | "binary_operator"
    ) {
        return false;
    }
    let Some(op) = node.child_by_field_name("operator") else {
        return false;
    };
    SHORT_CIRCUIT_OPS.contains(&text_of(op, code))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_function;
    use std::io::Write;

    fn write_tmp(contents: &str, suffix: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        f.flush().unwrap();
        f
    }

    #[test]
    fn no_decision_points_is_one() {
        let f = write_tmp("def f():\n    pass\n", ".py");
        let parsed = parse_function(f.path(), "f").unwrap();
        assert_eq!(compute(&parsed), 1);
    }

    #[test]
    fn if_else_is_two() {
        let src = "def f(a, b):\n    if a > 0:\n        r = a\n    else:\n        r = b\n    return r\n";
        let f = write_tmp(src, ".py");
        let parsed = parse_function(f.path(), "f").unwrap();
        assert_eq!(compute(&parsed), 2);
    }
}
