use super::{DunderRule, Grammar, Kind};
use phf::{phf_map, phf_set};

pub static KINDS: phf::Map<&'static str, Kind> = phf_map! {
    "if_statement" => Kind::If,
    "switch_expression" => Kind::Switch,
    "switch_statement" => Kind::Switch,
    "switch_block_statement_group" => Kind::CaseClause,
    "switch_rule" => Kind::CaseClause,
    "for_statement" => Kind::For,
    "enhanced_for_statement" => Kind::For,
    "while_statement" => Kind::While,
    "do_statement" => Kind::DoWhile,
    "return_statement" => Kind::Return,
    "throw_statement" => Kind::Return,
    "break_statement" => Kind::Break,
    "continue_statement" => Kind::Continue,
    "try_statement" => Kind::Try,
    "catch_clause" => Kind::Catch,
    "finally_clause" => Kind::Finally,
    "synchronized_statement" => Kind::WrapperBlock,
    "program" => Kind::SourceFile,
    "block" => Kind::Block,
    "method_declaration" => Kind::FunctionDecl,
    "constructor_declaration" => Kind::FunctionDecl,
    "line_comment" => Kind::Trivia,
    "block_comment" => Kind::Trivia,
};

pub static BUILTINS: phf::Set<&'static str> = phf_set! {
    "this", "super", "true", "false", "null",
    "int", "long", "short", "byte", "float", "double", "boolean", "char",
    "String", "Object", "Integer", "Long", "Double", "Boolean",
    "System", "Math", "List", "Map", "Set",
};

static GRAMMAR: Grammar = Grammar {
    name: "java",
    ts_language: || tree_sitter::Language::from(tree_sitter_java::LANGUAGE),
    kinds: &KINDS,
    function_decl_kinds: &["method_declaration", "constructor_declaration"],
    function_name_field: "name",
    body_field: "body",
    parameters_field: Some("parameters"),
    parameter_kinds: &["formal_parameter", "spread_parameter", "receiver_parameter"],
    class_like_kinds: &["class_declaration", "interface_declaration", "enum_declaration"],
    class_body_field: "body",
    arrow_const_binding: false,
    let_like_kinds: &["local_variable_declaration", "variable_declarator"],
    pattern_field: "name",
    init_value_field: "value",
    assignment_kinds: &["assignment_expression"],
    assignment_left_field: "left",
    assignment_right_field: "right",
    compound_assignment_kinds: &["assignment_expression"],
    assignment_operator_field: Some("operator"),
    update_expr_kinds: &["update_expression"],
    member_access_kind: Some("field_access"),
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
