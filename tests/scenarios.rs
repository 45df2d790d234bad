//! End-to-end scenarios against the public library surface.

use flowlens::{BlockType, EdgeType, RefType};
use std::io::Write;
use tempfile::NamedTempFile;

fn write_src(contents: &str, suffix: &str) -> NamedTempFile {
    let mut f = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    f.write_all(contents.as_bytes()).unwrap();
    f.flush().unwrap();
    f
}

/// S1. Empty Python function: entry -> plain("pass") -> exit, complexity 1.
#[test]
fn s1_empty_python_function() {
    let f = write_src("def f():\n    pass\n", ".py");
    let cfg = flowlens::extract_cfg(f.path(), "f").unwrap();

    assert_eq!(cfg.cyclomatic_complexity, 1);
    assert_eq!(cfg.blocks.get(&cfg.entry_block_id).unwrap().block_type, BlockType::Entry);
    assert_eq!(cfg.exit_block_ids.len(), 1);
    let exit_id = &cfg.exit_block_ids[0];
    assert_eq!(cfg.blocks.get(exit_id).unwrap().block_type, BlockType::Exit);

    let plain = cfg
        .blocks
        .values()
        .find(|b| b.block_type == BlockType::Plain)
        .expect("a plain block holding `pass`");
    assert!(plain.statements.iter().any(|s| s.contains("pass")));

    let entry_to_plain = cfg
        .edges
        .iter()
        .find(|e| &e.source_id == &cfg.entry_block_id)
        .expect("entry has an outgoing edge");
    assert_eq!(entry_to_plain.target_id, plain.id);
    assert_eq!(entry_to_plain.edge_type, EdgeType::Unconditional);

    let plain_to_exit = cfg
        .edges
        .iter()
        .find(|e| e.source_id == plain.id)
        .expect("plain block has an outgoing edge");
    assert_eq!(&plain_to_exit.target_id, exit_id);
    assert_eq!(plain_to_exit.edge_type, EdgeType::Unconditional);
}

/// S2. Linear assignment + use: def/use order and dataflow edges.
#[test]
fn s2_linear_assignment_and_use() {
    let f = write_src("def f():\n    x = 1\n    y = x + 1\n    return y\n", ".py");
    let dfg = flowlens::extract_dfg(f.path(), "f").unwrap();

    let refs: Vec<(&str, RefType, usize, usize)> = dfg
        .var_refs
        .iter()
        .map(|r| (r.name.as_str(), r.ref_type, r.line, r.column))
        .collect();

    assert_eq!(
        refs,
        vec![
            ("x", RefType::Definition, 2, 5),
            ("y", RefType::Definition, 3, 5),
            ("x", RefType::Use, 3, 9),
            ("y", RefType::Use, 4, 12),
        ]
    );

    assert_eq!(dfg.dataflow_edges.len(), 2);
    assert!(dfg
        .dataflow_edges
        .iter()
        .any(|e| e.var_name == "x" && e.def_ref.line == 2 && e.use_ref.line == 3));
    assert!(dfg
        .dataflow_edges
        .iter()
        .any(|e| e.var_name == "y" && e.def_ref.line == 3 && e.use_ref.line == 4));
}

/// S3. If/else: both branches reach the shared return, complexity 2.
#[test]
fn s3_if_else_complexity_and_slice() {
    let src = "def f(a, b):\n    if a > 0:\n        r = a\n    else:\n        r = b\n    return r\n";
    let f = write_src(src, ".py");
    let cfg = flowlens::extract_cfg(f.path(), "f").unwrap();
    assert_eq!(cfg.cyclomatic_complexity, 2);

    let pdg = flowlens::extract_pdg(f.path(), "f").unwrap();
    let lines = flowlens::backward_slice(&pdg, 6, None);
    for expected in [2, 3, 5, 6] {
        assert!(lines.contains(&expected), "slice missing line {expected}: {lines:?}");
    }
}

/// S4. While loop: header/body shape and the back edge.
#[test]
fn s4_while_loop_back_edge() {
    let src = "def f(n):\n    i = 0\n    while i < n:\n        i = i + 1\n    return i\n";
    let f = write_src(src, ".py");
    let cfg = flowlens::extract_cfg(f.path(), "f").unwrap();
    assert_eq!(cfg.cyclomatic_complexity, 2);

    let header = cfg
        .blocks
        .values()
        .find(|b| b.block_type == BlockType::Branch && b.start_line <= 3 && b.end_line >= 3)
        .expect("a branch block at the loop header");
    let body = cfg
        .blocks
        .values()
        .find(|b| b.block_type == BlockType::LoopBody)
        .expect("a loop_body block");

    assert!(cfg
        .edges
        .iter()
        .any(|e| e.source_id == header.id && e.target_id == body.id && e.edge_type == EdgeType::True));
    assert!(cfg
        .edges
        .iter()
        .any(|e| e.source_id == body.id && e.target_id == header.id && e.edge_type == EdgeType::BackEdge));
}

/// S5. Variable-filtered slice narrows to the filtered variable's chain.
#[test]
fn s5_variable_filtered_slice() {
    let src = "def f():\n    x = 1\n    y = 2\n    z = x + y\n    return z\n";
    let f = write_src(src, ".py");
    let pdg = flowlens::extract_pdg(f.path(), "f").unwrap();

    let filtered = flowlens::backward_slice(&pdg, 4, Some("x"));
    assert!(filtered.contains(&2));
    assert!(!filtered.contains(&3));

    let unfiltered = flowlens::backward_slice(&pdg, 4, None);
    assert!(unfiltered.contains(&2));
    assert!(unfiltered.contains(&3));
}

/// S6. Cross-language smoke: same-shape return-only function in three languages.
#[test]
fn s6_cross_language_smoke() {
    let cases = [
        ("func f() int {\n\treturn 0\n}\n", ".go"),
        ("class C {\n    int f() { return 0; }\n}\n", ".java"),
        ("fn f() -> i32 {\n    0\n}\n", ".rs"),
    ];

    for (src, suffix) in cases {
        let f = write_src(src, suffix);
        let cfg = flowlens::extract_cfg(f.path(), "f").unwrap();
        assert_eq!(cfg.cyclomatic_complexity, 1, "complexity mismatch for {suffix}");

        let between = cfg
            .blocks
            .values()
            .filter(|b| b.block_type != BlockType::Entry && b.block_type != BlockType::Exit)
            .count();
        assert_eq!(between, 1, "expected exactly one block between entry and exit for {suffix}");
    }
}
