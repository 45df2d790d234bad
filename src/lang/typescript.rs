use super::{DunderRule, Grammar, Kind};
use phf::{phf_map, phf_set};

pub static KINDS: phf::Map<&'static str, Kind> = phf_map! {
    "if_statement" => Kind::If,
    "switch_statement" => Kind::Switch,
    "switch_case" => Kind::CaseClause,
    "switch_default" => Kind::CaseClause,
    "for_statement" => Kind::For,
    "for_in_statement" => Kind::For,
    "while_statement" => Kind::While,
    "do_statement" => Kind::DoWhile,
    "return_statement" => Kind::Return,
    "throw_statement" => Kind::Return,
    "break_statement" => Kind::Break,
    "continue_statement" => Kind::Continue,
    "try_statement" => Kind::Try,
    "catch_clause" => Kind::Catch,
    "finally_clause" => Kind::Finally,
    "program" => Kind::SourceFile,
    "statement_block" => Kind::Block,
    "function_declaration" => Kind::FunctionDecl,
    "method_definition" => Kind::FunctionDecl,
    "arrow_function" => Kind::FunctionDecl,
    "function_expression" => Kind::FunctionDecl,
    "comment" => Kind::Trivia,
};

pub static BUILTINS: phf::Set<&'static str> = phf_set! {
    "this", "super", "true", "false", "null", "undefined",
    "console", "Object", "Array", "String", "Number", "Boolean",
    "Promise", "Map", "Set", "JSON", "Math",
};

static GRAMMAR: Grammar = Grammar {
    name: "typescript",
    ts_language: || {
        tree_sitter::Language::from(tree_sitter_typescript::LANGUAGE_TYPESCRIPT)
    },
    kinds: &KINDS,
    function_decl_kinds: &["function_declaration", "method_definition", "arrow_function"],
    function_name_field: "name",
    body_field: "body",
    parameters_field: Some("parameters"),
    parameter_kinds: &[
        "required_parameter",
        "optional_parameter",
        "rest_pattern",
        "object_pattern",
        "array_pattern",
        "identifier",
    ],
    class_like_kinds: &["class_declaration", "class_body"],
    class_body_field: "body",
    arrow_const_binding: true,
    let_like_kinds: &["variable_declarator"],
    pattern_field: "name",
    init_value_field: "value",
    assignment_kinds: &["assignment_expression"],
    assignment_left_field: "left",
    assignment_right_field: "right",
    compound_assignment_kinds: &["augmented_assignment_expression"],
    assignment_operator_field: None,
    update_expr_kinds: &["update_expression"],
    member_access_kind: Some("member_expression"),
    full_member_access: false,
    identifier_kind: "identifier",
    builtins: &BUILTINS,
    suppress_dunder: DunderRule::Surrounding,
    has_scope_stack: false,
    import_kinds: &[],
};

pub fn grammar() -> &'static Grammar {
    &GRAMMAR
}
