use super::{DunderRule, Grammar, Kind};
use phf::{phf_map, phf_set};

pub static KINDS: phf::Map<&'static str, Kind> = phf_map! {
    "if_statement" => Kind::If,
    "expression_switch_statement" => Kind::Switch,
    "type_switch_statement" => Kind::Switch,
    "expression_case" => Kind::CaseClause,
    "type_case" => Kind::CaseClause,
    "select_statement" => Kind::Switch,
    "communication_case" => Kind::CaseClause,
    "for_statement" => Kind::For,
    "return_statement" => Kind::Return,
    "break_statement" => Kind::Break,
    "continue_statement" => Kind::Continue,
    "goto_statement" => Kind::Goto,
    "labeled_statement" => Kind::Block,
    "source_file" => Kind::SourceFile,
    "block" => Kind::Block,
    "function_declaration" => Kind::FunctionDecl,
    "method_declaration" => Kind::FunctionDecl,
    "func_literal" => Kind::FunctionDecl,
    "comment" => Kind::Trivia,
};

pub static BUILTINS: phf::Set<&'static str> = phf_set! {
    "true", "false", "nil", "iota",
    "int", "int8", "int16", "int32", "int64",
    "uint", "uint8", "uint16", "uint32", "uint64", "uintptr",
    "float32", "float64", "complex64", "complex128",
    "string", "bool", "byte", "rune", "error",
    "len", "cap", "make", "new", "append", "panic", "recover",
};

static GRAMMAR: Grammar = Grammar {
    name: "go",
    ts_language: || tree_sitter::Language::from(tree_sitter_go::LANGUAGE),
    kinds: &KINDS,
    function_decl_kinds: &["function_declaration", "method_declaration"],
    function_name_field: "name",
    body_field: "body",
    parameters_field: Some("parameters"),
    parameter_kinds: &["parameter_declaration", "variadic_parameter_declaration"],
    class_like_kinds: &[],
    class_body_field: "body",
    arrow_const_binding: false,
    let_like_kinds: &["short_var_declaration", "var_declaration"],
    pattern_field: "left",
    init_value_field: "right",
    assignment_kinds: &["assignment_statement"],
    assignment_left_field: "left",
    assignment_right_field: "right",
    compound_assignment_kinds: &["inc_statement", "dec_statement"],
    assignment_operator_field: None,
    update_expr_kinds: &["inc_statement", "dec_statement"],
    member_access_kind: Some("selector_expression"),
    full_member_access: false,
    identifier_kind: "identifier",
    builtins: &BUILTINS,
    suppress_dunder: DunderRule::None,
    has_scope_stack: false,
    import_kinds: &[],
};

pub fn grammar() -> &'static Grammar {
    &GRAMMAR
}
