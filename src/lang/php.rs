use super::{DunderRule, Grammar, Kind};
use phf::{phf_map, phf_set};

pub static KINDS: phf::Map<&'static str, Kind> = phf_map! {
    "if_statement" => Kind::If,
    "else_if_clause" => Kind::If,
    "switch_statement" => Kind::Switch,
    "case_statement" => Kind::CaseClause,
    "default_statement" => Kind::CaseClause,
    "foreach_statement" => Kind::For,
    "for_statement" => Kind::For,
    "while_statement" => Kind::While,
    "do_statement" => Kind::DoWhile,
    "return_statement" => Kind::Return,
    "throw_statement" => Kind::Return,
    "break_statement" => Kind::Break,
    "continue_statement" => Kind::Continue,
    "goto_statement" => Kind::Goto,
    "named_label_statement" => Kind::Block,
    "try_statement" => Kind::Try,
    "catch_clause" => Kind::Catch,
    "finally_clause" => Kind::Finally,
    "program" => Kind::SourceFile,
    "compound_statement" => Kind::Block,
    "function_definition" => Kind::FunctionDecl,
    "method_declaration" => Kind::FunctionDecl,
    "comment" => Kind::Trivia,
};

pub static BUILTINS: phf::Set<&'static str> = phf_set! {
    "this", "self", "parent", "static",
    "true", "false", "null",
    "array", "string", "int", "float", "bool", "object", "mixed", "void",
    "echo", "print", "isset", "unset", "empty",
};

static GRAMMAR: Grammar = Grammar {
    name: "php",
    ts_language: || tree_sitter::Language::from(tree_sitter_php::LANGUAGE_PHP),
    kinds: &KINDS,
    function_decl_kinds: &["function_definition", "method_declaration"],
    function_name_field: "name",
    body_field: "body",
    parameters_field: Some("parameters"),
    parameter_kinds: &["simple_parameter", "variadic_parameter", "property_promotion_parameter"],
    class_like_kinds: &["class_declaration", "interface_declaration", "trait_declaration"],
    class_body_field: "body",
    arrow_const_binding: false,
    let_like_kinds: &["assignment_expression"],
    pattern_field: "left",
    init_value_field: "right",
    assignment_kinds: &["assignment_expression"],
    assignment_left_field: "left",
    assignment_right_field: "right",
    compound_assignment_kinds: &["augmented_assignment_expression"],
    assignment_operator_field: None,
    update_expr_kinds: &["update_expression"],
    member_access_kind: Some("member_access_expression"),
    full_member_access: false,
    identifier_kind: "name",
    builtins: &BUILTINS,
    suppress_dunder: DunderRule::None,
    has_scope_stack: false,
    import_kinds: &[],
};

pub fn grammar() -> &'static Grammar {
    &GRAMMAR
}
