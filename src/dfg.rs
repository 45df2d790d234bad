//! Def/Use Extractor (spec §4.3). Walks the same function subtree the CFG
//! Builder walks and produces a source-order stream of `VarRef`s: one
//! per-language recursive descent driven entirely by the `Grammar` table,
//! no per-language copy of the walk itself.
//!
//! Grounded in the teacher's `cfg.rs` `collect_idents`/`def_use` pass, which
//! already distinguished definition vs. use sites off a single identifier
//! walk; generalized here across all nine grammars and extended with the
//! Python scope stack spec §4.3 calls out as the one language-specific
//! wrinkle.

use crate::lang::{DunderRule, Grammar};
use crate::model::{DFGInfo, RefType, VarRef};
use crate::parse::{text_of, ParsedFunction};
use std::collections::{BTreeMap, HashSet};
use tree_sitter::Node;

struct Extractor<'a> {
    grammar: &'static Grammar,
    code: &'a [u8],
    refs: Vec<VarRef>,
    /// Source positions already emitted as `definition`/`update`, so a later
    /// recursive `use` pass over the same subtree doesn't re-emit them.
    bound_positions: HashSet<(usize, usize)>,
    /// Names already seen bound by a folded let/assignment node kind, used
    /// to decide first-binding (`definition`) vs. reassignment (`update`)
    /// for grammars that don't syntactically distinguish the two (§4.3).
    seen_assignment_names: HashSet<String>,
    /// Python only: stack of locally-bound name sets, innermost last.
    scopes: Vec<HashSet<String>>,
}

fn pos(node: Node) -> (usize, usize) {
    let p = node.start_position();
    (p.row + 1, p.column + 1)
}

impl<'a> Extractor<'a> {
    fn new(grammar: &'static Grammar, code: &'a [u8]) -> Self {
        Extractor {
            grammar,
            code,
            refs: Vec::new(),
            bound_positions: HashSet::new(),
            seen_assignment_names: HashSet::new(),
            scopes: if grammar.has_scope_stack {
                vec![HashSet::new()]
            } else {
                Vec::new()
            },
        }
    }

    fn text(&self, node: Node) -> &'a str {
        text_of(node, self.code)
    }

    fn is_builtin(&self, name: &str) -> bool {
        if self.grammar.builtins.contains(name) {
            return true;
        }
        match self.grammar.suppress_dunder {
            DunderRule::None => false,
            DunderRule::Surrounding => {
                name.len() > 4 && name.starts_with("__") && name.ends_with("__")
            }
            DunderRule::Leading => name.starts_with("__"),
        }
    }

    fn bind_scope(&mut self, name: &str) {
        if let Some(top) = self.scopes.last_mut() {
            top.insert(name.to_owned());
        }
    }

    /// True if `name` is already bound within the *current* (innermost)
    /// scope frame. Deliberately checks only the top frame, not every
    /// enclosing one: that's what makes a lambda's or comprehension's own
    /// parameter a fresh `definition` even when an outer scope already
    /// binds the same name (§4.3's capture-vs-fresh-local distinction).
    fn is_locally_bound(&self, name: &str) -> bool {
        self.scopes.last().map(|s| s.contains(name)).unwrap_or(false)
    }

    fn emit(&mut self, node: Node, ref_type: RefType) {
        let name = self.text(node).to_owned();
        if name.is_empty() || self.is_builtin(&name) {
            return;
        }
        let (line, column) = pos(node);
        if matches!(ref_type, RefType::Definition | RefType::Update) {
            self.bound_positions.insert((line, column));
            self.bind_scope(&name);
        }
        self.refs.push(VarRef {
            name,
            ref_type,
            line,
            column,
        });
    }

    fn is_identifier(&self, node: Node) -> bool {
        node.kind() == self.grammar.identifier_kind
    }

    /// Parameters: plain identifiers, destructured patterns, `self`/`this`
    /// receivers, rest/variadic — all emitted as `definition` (§4.3).
    fn walk_parameters(&mut self, fn_node: Node<'a>) {
        let Some(field) = self.grammar.parameters_field else {
            return;
        };
        let Some(params) = fn_node.child_by_field_name(field) else {
            return;
        };
        let mut cursor = params.walk();
        for param in params.named_children(&mut cursor) {
            self.walk_parameter(param);
        }
    }

    fn walk_parameter(&mut self, node: Node<'a>) {
        if self.is_identifier(node) {
            // Routed through `bind_name` (not a direct `emit`) so the name
            // enters `seen_assignment_names` — otherwise a later plain
            // reassignment of this parameter would be misread as its first
            // binding and emitted as `definition` instead of `update`.
            self.bind_name(node);
            return;
        }
        if self
            .grammar
            .parameter_kinds
            .contains(&node.kind())
        {
            let mut cursor = node.walk();
            for child in node.children(&mut cursor) {
                if self.is_identifier(child) {
                    self.bind_name(child);
                } else {
                    self.walk_parameter(child);
                }
            }
            return;
        }
        // Destructured / typed patterns: recurse, binding every identifier
        // that is not itself the type annotation. We can't tell a type node
        // from a binding node generically, so we bind every identifier we
        // reach — type annotation identifiers never get `use`s anyway
        // (nothing walks into them again), and any false positive here is
        // harmless since the variable is, at worst, recorded as unused.
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            self.walk_parameter(child);
        }
    }

    fn walk_body(&mut self, node: Node<'a>) {
        self.walk_stmt(node);
    }

    fn walk_stmt(&mut self, node: Node<'a>) {
        let kind = node.kind();

        // Import statements are collected separately into `DFGInfo.imports`
        // (Python only, §3); the module/symbol names they name are not
        // def/use sites and must not surface as `VarRef`s.
        if self.grammar.import_kinds.contains(&kind) {
            return;
        }
        if self.grammar.let_like_kinds.contains(&kind) {
            self.walk_let_like(node);
            return;
        }
        // Checked ahead of `compound_assignment_kinds`: some grammars (Go's
        // `inc_statement`/`dec_statement`) list the same node kind in both
        // tables, but only carry a bare operand — no `left`/`right` fields —
        // so the generic identifier-child scan is the one that actually
        // applies.
        if self.grammar.update_expr_kinds.contains(&kind) {
            self.walk_update_expr(node);
            return;
        }
        // Checked ahead of `compound_assignment_kinds`: Java/C/C++ fold `=`
        // and `+=` into the same node kind, distinguished only by
        // `assignment_operator_field` — `walk_assignment` already consults
        // that field. Only when a grammar gives compound assignment its own
        // distinct node kind (Rust, Python, TS, Go, Ruby, PHP) does this
        // node kind fail to appear in `assignment_kinds` at all, and the
        // next branch below takes over.
        if self.grammar.assignment_kinds.contains(&kind) {
            self.walk_assignment(node);
            return;
        }
        if self.grammar.compound_assignment_kinds.contains(&kind) {
            self.walk_compound_assignment(node);
            return;
        }
        if self.grammar.has_scope_stack && is_python_scope_boundary(kind) {
            self.walk_scope_boundary(node);
            return;
        }
        if self.grammar.member_access_kind == Some(kind) {
            self.walk_member_access(node);
            return;
        }
        if self.is_identifier(node) {
            self.walk_bare_identifier(node);
            return;
        }

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            self.walk_stmt(child);
        }
    }

    fn walk_bare_identifier(&mut self, node: Node<'a>) {
        if self.bound_positions.contains(&pos(node)) {
            return;
        }
        self.emit(node, RefType::Use);
    }

    fn walk_member_access(&mut self, node: Node<'a>) {
        if self.grammar.full_member_access {
            self.emit(node, RefType::Use);
            return;
        }
        // Base identifier only: the leftmost child that is itself an
        // identifier (or another member access, recursed into).
        let mut cursor = node.walk();
        if let Some(base) = node.children(&mut cursor).next() {
            self.walk_stmt(base);
        }
    }

    fn walk_let_like(&mut self, node: Node<'a>) {
        let pattern = node.child_by_field_name(self.grammar.pattern_field);

        // C-style `declaration` nodes delegate through the same field name
        // to a nested `init_declarator`, itself a let-like kind carrying its
        // own `declarator`/`value` fields — recurse through the dispatcher
        // rather than binding it as a pattern, or the initializer would be
        // swept up as bound names alongside the real target.
        if let Some(p) = pattern {
            if self.grammar.let_like_kinds.contains(&p.kind()) {
                self.walk_stmt(p);
                return;
            }
        }

        let init = node.child_by_field_name(self.grammar.init_value_field);
        if let Some(init) = init {
            self.walk_stmt(init);
        }

        if let Some(pattern) = pattern {
            self.bind_pattern(pattern);
        } else {
            // languages without a discrete pattern field (folded grammars):
            // fall back to scanning immediate identifier children.
            let mut cursor = node.walk();
            for child in node.children(&mut cursor) {
                if self.is_identifier(child) {
                    self.bind_name(child);
                }
            }
        }
    }

    fn walk_assignment(&mut self, node: Node<'a>) {
        let left = node.child_by_field_name(self.grammar.assignment_left_field);
        let right = node.child_by_field_name(self.grammar.assignment_right_field);

        if let Some(right) = right {
            self.walk_stmt(right);
        }

        let is_compound_by_operator = self
            .grammar
            .assignment_operator_field
            .and_then(|f| node.child_by_field_name(f))
            .map(|op| self.text(op) != "=")
            .unwrap_or(false);

        if let Some(left) = left {
            if is_compound_by_operator {
                self.bind_pattern_as(left, RefType::Update);
            } else {
                self.bind_pattern(left);
            }
        }
    }

    fn walk_compound_assignment(&mut self, node: Node<'a>) {
        let left = node.child_by_field_name(self.grammar.assignment_left_field);
        let right = node.child_by_field_name(self.grammar.assignment_right_field);
        if let Some(right) = right {
            self.walk_stmt(right);
        }
        if let Some(left) = left {
            self.bind_pattern_as(left, RefType::Update);
        }
    }

    fn walk_update_expr(&mut self, node: Node<'a>) {
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            if self.is_identifier(child) {
                self.emit(child, RefType::Update);
            }
        }
    }

    /// Bind every identifier in a (possibly destructured) pattern as
    /// `definition` on first sight of that name within the walk, `update`
    /// thereafter — the rule spec §4.3 gives for grammars that don't
    /// syntactically distinguish first-binding from reassignment.
    fn bind_pattern(&mut self, node: Node<'a>) {
        if self.is_identifier(node) {
            self.bind_name(node);
            return;
        }
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            self.bind_pattern(child);
        }
    }

    fn bind_pattern_as(&mut self, node: Node<'a>, ref_type: RefType) {
        if self.is_identifier(node) {
            self.emit(node, ref_type);
            return;
        }
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            self.bind_pattern_as(child, ref_type);
        }
    }

    /// First-binding (`definition`) vs. reassignment (`update`) decision
    /// (§4.3). Scoped per-frame for grammars with a scope stack (Python):
    /// each lambda/comprehension pushes a fresh frame in
    /// `walk_scope_boundary`, so a parameter name already bound in an outer
    /// scope is still a `definition` the first time it's bound inside the
    /// nested frame. Grammars without a scope stack fall back to a single
    /// function-wide seen-names set, since they have no nested-scope
    /// constructs this extractor descends into.
    fn bind_name(&mut self, node: Node<'a>) {
        let name = self.text(node).to_owned();
        let already_bound = if self.grammar.has_scope_stack {
            self.is_locally_bound(&name)
        } else {
            !self.seen_assignment_names.insert(name.clone())
        };
        let ref_type = if already_bound {
            RefType::Update
        } else {
            RefType::Definition
        };
        self.emit(node, ref_type);
    }

    fn walk_scope_boundary(&mut self, node: Node<'a>) {
        self.scopes.push(HashSet::new());
        // Bind any parameters the comprehension/lambda introduces before
        // walking its body, so references to them inside the body resolve
        // as local rather than a capture of an outer definition.
        if let Some(params_field) = self.grammar.parameters_field {
            if let Some(params) = node.child_by_field_name(params_field) {
                let mut cursor = params.walk();
                for p in params.named_children(&mut cursor) {
                    self.walk_parameter(p);
                }
            }
        }
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            self.walk_stmt(child);
        }
        self.scopes.pop();
    }
}

fn is_python_scope_boundary(kind: &str) -> bool {
    matches!(
        kind,
        "lambda"
            | "list_comprehension"
            | "set_comprehension"
            | "dictionary_comprehension"
            | "generator_expression"
            | "function_definition"
    )
}

/// Collects the symbols bound into scope by `import`/`from...import`
/// statements anywhere in the source tree (module-level or function-local).
/// Only called for grammars with a non-empty `import_kinds` (Python). Walks
/// the whole file's tree, not just the function body, since `DFGInfo.imports`
/// is documented as describing the file's imports, not only the ones local
/// to the extracted function.
fn collect_imports(root: Node, grammar: &Grammar, code: &[u8]) -> Vec<String> {
    let mut names = Vec::new();
    collect_imports_rec(root, grammar, code, &mut names);
    names
}

fn collect_imports_rec(node: Node, grammar: &Grammar, code: &[u8], out: &mut Vec<String>) {
    if grammar.import_kinds.contains(&node.kind()) {
        let mut cursor = node.walk();
        for named in node.children_by_field_name("name", &mut cursor) {
            push_import_name(named, code, out);
        }
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_imports_rec(child, grammar, code, out);
    }
}

/// A `name` field on an import clause is either a bare `dotted_name` (no
/// alias — the symbol is the dotted path itself) or an `aliased_import`
/// (`x as y` — the symbol actually bound locally is the alias).
fn push_import_name(node: Node, code: &[u8], out: &mut Vec<String>) {
    let text = if node.kind() == "aliased_import" {
        match node.child_by_field_name("alias") {
            Some(alias) => text_of(alias, code),
            None => text_of(node, code),
        }
    } else {
        text_of(node, code)
    };
    let name = text.to_owned();
    if !out.contains(&name) {
        out.push(name);
    }
}

pub fn extract_dfg(parsed: &ParsedFunction, function_name: &str) -> DFGInfo {
    let mut ex = Extractor::new(parsed.grammar, &parsed.source);

    ex.walk_parameters(parsed.function_node());
    ex.walk_body(parsed.body_node());

    let mut refs = ex.refs;
    refs.sort_by_key(|r| (r.line, r.column));

    let mut variables: BTreeMap<String, Vec<VarRef>> = BTreeMap::new();
    for r in &refs {
        variables.entry(r.name.clone()).or_default().push(r.clone());
    }

    let imports = if parsed.grammar.import_kinds.is_empty() {
        None
    } else {
        Some(collect_imports(
            parsed.tree.root_node(),
            parsed.grammar,
            &parsed.source,
        ))
    };

    DFGInfo {
        function_name: function_name.to_owned(),
        var_refs: refs,
        dataflow_edges: Vec::new(),
        variables,
        imports,
    }
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
    fn parameter_and_reassignment_python() {
        let src = "def f(a):\n    x = a\n    x = x + 1\n    return x\n";
        let f = write_tmp(src, ".py");
        let parsed = parse_function(f.path(), "f").unwrap();
        let dfg = extract_dfg(&parsed, "f");

        let a_refs = &dfg.variables["a"];
        assert_eq!(a_refs[0].ref_type, RefType::Definition);

        let x_refs = &dfg.variables["x"];
        assert_eq!(x_refs[0].ref_type, RefType::Definition);
        assert!(x_refs[1..].iter().any(|r| r.ref_type == RefType::Use));
        assert!(x_refs.iter().any(|r| r.ref_type == RefType::Update));
    }

    #[test]
    fn lambda_parameter_shadows_outer_definition() {
        let src = "def f():\n    x = 1\n    g = lambda x: x + 1\n    return g(2) + x\n";
        let f = write_tmp(src, ".py");
        let parsed = parse_function(f.path(), "f").unwrap();
        let dfg = extract_dfg(&parsed, "f");

        let x_refs = &dfg.variables["x"];
        // outer `x = 1`, then the lambda's own parameter `x` — both first
        // bindings in their own scope, so both `definition`, never `update`.
        let definitions = x_refs.iter().filter(|r| r.ref_type == RefType::Definition).count();
        assert_eq!(definitions, 2);
        assert!(!x_refs.iter().any(|r| r.ref_type == RefType::Update));
        // the lambda body's `x` and the trailing `+ x` are both uses.
        assert_eq!(x_refs.iter().filter(|r| r.ref_type == RefType::Use).count(), 2);
    }

    #[test]
    fn python_imports_are_collected() {
        let src = "import os\nimport os.path as p\nfrom sys import argv, exit as quit\n\ndef f():\n    return argv\n";
        let f = write_tmp(src, ".py");
        let parsed = parse_function(f.path(), "f").unwrap();
        let dfg = extract_dfg(&parsed, "f");
        let imports = dfg.imports.expect("python always populates imports");
        assert_eq!(imports, vec!["os", "p", "argv", "quit"]);
        // import-bound names are not var refs of the function itself.
        assert!(!dfg.variables.contains_key("os"));
    }

    #[test]
    fn non_python_imports_are_none() {
        let f = write_tmp("fn f() -> i32 {\n    0\n}\n", ".rs");
        let parsed = parse_function(f.path(), "f").unwrap();
        let dfg = extract_dfg(&parsed, "f");
        assert!(dfg.imports.is_none());
    }

    #[test]
    fn builtins_are_not_emitted() {
        let src = "def f():\n    print(True)\n";
        let f = write_tmp(src, ".py");
        let parsed = parse_function(f.path(), "f").unwrap();
        let dfg = extract_dfg(&parsed, "f");
        assert!(!dfg.variables.contains_key("print"));
        assert!(!dfg.variables.contains_key("True"));
    }

    #[test]
    fn var_refs_are_in_source_order() {
        let src = "def f(a, b):\n    y = a + b\n    return y\n";
        let f = write_tmp(src, ".py");
        let parsed = parse_function(f.path(), "f").unwrap();
        let dfg = extract_dfg(&parsed, "f");
        let mut sorted = dfg.var_refs.clone();
        sorted.sort_by_key(|r| (r.line, r.column));
        assert_eq!(dfg.var_refs, sorted);
    }
}
