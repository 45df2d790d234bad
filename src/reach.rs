//! Reaching-Definitions Engine (spec §4.4). Language-agnostic worklist
//! fixed-point over a `CFGInfo` and the `VarRef` stream the per-language
//! extractor in `dfg.rs` produces; turns `definition`/`update` sites that
//! reach a later `use` into `DataflowEdge`s.
//!
//! Grounded in the reaching-definitions shape of the teacher's `cfg.rs`
//! dataflow pass, re-specified to this crate's gen/kill/in/out algorithm —
//! not the teacher's dominance-frontier approach, which solved a different
//! problem (taint propagation, not def-use chains).

use crate::model::{BlockType, CFGInfo, DataflowEdge, RefType, VarRef};
use std::collections::{HashMap, HashSet, VecDeque};

type DefId = usize;

fn block_containing(cfg: &CFGInfo, line: usize) -> Option<&str> {
    cfg.blocks
        .values()
        .find(|b| line >= b.start_line && line <= b.end_line)
        .map(|b| b.id.as_str())
}

/// `kill(b)` is derived purely from this block's own `gen` set — a
/// definition of `x` anywhere in `b` kills every other definition of `x`
/// reaching `b` from outside. The spec explicitly allows omitting the
/// legacy text-scan heuristic (`=` sign matching over statement text); this
/// engine never inspects block statement text at all.
fn compute_gen_kill<'v>(
    cfg: &CFGInfo,
    defs: &[&'v VarRef],
) -> (
    HashMap<String, HashSet<DefId>>,
    HashMap<String, HashSet<String>>,
) {
    let mut gen: HashMap<String, HashSet<DefId>> =
        cfg.blocks.keys().map(|id| (id.clone(), HashSet::new())).collect();
    let mut kill: HashMap<String, HashSet<String>> =
        cfg.blocks.keys().map(|id| (id.clone(), HashSet::new())).collect();

    for (def_id, d) in defs.iter().enumerate() {
        if let Some(bid) = block_containing(cfg, d.line) {
            gen.get_mut(bid).unwrap().insert(def_id);
            kill.get_mut(bid).unwrap().insert(d.name.clone());
        }
    }
    (gen, kill)
}

fn run_worklist(
    cfg: &CFGInfo,
    gen: &HashMap<String, HashSet<DefId>>,
    kill: &HashMap<String, HashSet<String>>,
    defs: &[&VarRef],
) -> (
    HashMap<String, HashSet<DefId>>,
    HashMap<String, HashSet<DefId>>,
) {
    let mut in_: HashMap<String, HashSet<DefId>> =
        cfg.blocks.keys().map(|id| (id.clone(), HashSet::new())).collect();
    let mut out_: HashMap<String, HashSet<DefId>> =
        cfg.blocks.keys().map(|id| (id.clone(), HashSet::new())).collect();

    let mut queue: VecDeque<String> = cfg.blocks.keys().cloned().collect();
    let mut queued: HashSet<String> = queue.iter().cloned().collect();

    while let Some(b) = queue.pop_front() {
        queued.remove(&b);

        let mut new_in: HashSet<DefId> = HashSet::new();
        for p in cfg.predecessors(&b) {
            if let Some(o) = out_.get(p) {
                new_in.extend(o.iter().copied());
            }
        }

        let gen_b = &gen[&b];
        let kill_b = &kill[&b];
        let mut new_out: HashSet<DefId> = gen_b.clone();
        for d in &new_in {
            if !kill_b.contains(&defs[*d].name) {
                new_out.insert(*d);
            }
        }

        in_.insert(b.clone(), new_in);

        let changed = out_.get(&b) != Some(&new_out);
        if changed {
            out_.insert(b.clone(), new_out);
            for s in cfg.successors(&b) {
                if queued.insert(s.clone()) {
                    queue.push_back(s.clone());
                }
            }
        }
    }

    (in_, out_)
}

fn try_push(
    seen: &mut HashSet<(usize, usize, usize, usize)>,
    edges: &mut Vec<DataflowEdge>,
    def: &VarRef,
    use_ref: &VarRef,
) {
    let key = (def.line, def.column, use_ref.line, use_ref.column);
    if seen.insert(key) {
        edges.push(DataflowEdge {
            def_ref: def.clone(),
            use_ref: use_ref.clone(),
            var_name: def.name.clone(),
        });
    }
}

pub fn compute(cfg: &CFGInfo, var_refs: &[VarRef]) -> Vec<DataflowEdge> {
    if var_refs.is_empty() || cfg.blocks.is_empty() {
        return Vec::new();
    }

    let defs: Vec<&VarRef> = var_refs
        .iter()
        .filter(|r| matches!(r.ref_type, RefType::Definition | RefType::Update))
        .collect();
    if defs.is_empty() {
        return Vec::new();
    }

    let (gen, kill) = compute_gen_kill(cfg, &defs);
    let (in_, out_) = run_worklist(cfg, &gen, &kill, &defs);

    let mut edges = Vec::new();
    let mut seen = HashSet::new();

    for (id, block) in &cfg.blocks {
        let uses: Vec<&VarRef> = var_refs
            .iter()
            .filter(|r| {
                r.ref_type == RefType::Use && r.line >= block.start_line && r.line <= block.end_line
            })
            .collect();
        if uses.is_empty() {
            continue;
        }

        let in_b = &in_[id];
        let gen_b = &gen[id];

        for u in &uses {
            for d in in_b {
                if defs[*d].name == u.name {
                    try_push(&mut seen, &mut edges, defs[*d], u);
                }
            }
            for d in gen_b {
                if defs[*d].name == u.name && defs[*d].line < u.line {
                    try_push(&mut seen, &mut edges, defs[*d], u);
                }
            }
        }

        // Belt-and-braces merge-block pass (§4.4): redundant with the
        // worklist's own fixed point, kept only because the spec calls for
        // it explicitly; `try_push`'s dedup makes it a no-op in practice.
        let preds = cfg.predecessors(id);
        if preds.len() > 1 && matches!(block.block_type, BlockType::Plain | BlockType::LoopBody) {
            let mut reaching: HashSet<DefId> = HashSet::new();
            for p in preds {
                if let Some(o) = out_.get(p) {
                    reaching.extend(o.iter().copied());
                }
            }
            for u in &uses {
                for d in &reaching {
                    if defs[*d].name == u.name {
                        try_push(&mut seen, &mut edges, defs[*d], u);
                    }
                }
            }
        }
    }

    edges.sort_by(|a, b| {
        (a.def_ref.line, a.def_ref.column, a.use_ref.line, a.use_ref.column).cmp(&(
            b.def_ref.line,
            b.def_ref.column,
            b.use_ref.line,
            b.use_ref.column,
        ))
    });
    edges
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cfg::build_cfg;
    use crate::dfg::extract_dfg;
    use crate::parse::parse_function;
    use std::io::Write;

    fn write_tmp(contents: &str, suffix: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        f.flush().unwrap();
        f
    }

    #[test]
    fn straight_line_def_reaches_use() {
        let src = "def f():\n    x = 1\n    y = x + 1\n    return y\n";
        let f = write_tmp(src, ".py");
        let parsed = parse_function(f.path(), "f").unwrap();
        let cfg = build_cfg(&parsed, "f");
        let dfg = extract_dfg(&parsed, "f");
        let edges = compute(&cfg, &dfg.var_refs);
        assert!(edges
            .iter()
            .any(|e| e.var_name == "x" && e.def_ref.line == 2 && e.use_ref.line == 3));
    }

    #[test]
    fn if_else_both_branches_reach_shared_return() {
        let src = "def f(a, b):\n    if a > 0:\n        r = a\n    else:\n        r = b\n    return r\n";
        let f = write_tmp(src, ".py");
        let parsed = parse_function(f.path(), "f").unwrap();
        let cfg = build_cfg(&parsed, "f");
        let dfg = extract_dfg(&parsed, "f");
        let edges = compute(&cfg, &dfg.var_refs);
        let r_edges: Vec<_> = edges.iter().filter(|e| e.var_name == "r").collect();
        assert_eq!(r_edges.len(), 2);
        assert!(r_edges.iter().any(|e| e.def_ref.line == 3));
        assert!(r_edges.iter().any(|e| e.def_ref.line == 5));
    }

    #[test]
    fn empty_refs_yield_empty_edges() {
        let src = "def f():\n    pass\n";
        let f = write_tmp(src, ".py");
        let parsed = parse_function(f.path(), "f").unwrap();
        let cfg = build_cfg(&parsed, "f");
        assert!(compute(&cfg, &[]).is_empty());
    }
}
