use super::{DunderRule, Grammar, Kind};
use phf::{phf_map, phf_set};

pub static KINDS: phf::Map<&'static str, Kind> = phf_map! {
    "if_statement" => Kind::If,
    "switch_statement" => Kind::Switch,
    "case_statement" => Kind::CaseClause,
    "for_statement" => Kind::For,
    "for_range_loop" => Kind::For,
    "while_statement" => Kind::While,
    "do_statement" => Kind::DoWhile,
    "return_statement" => Kind::Return,
    "throw_statement" => Kind::Return,
    "break_statement" => Kind::Break,
    "continue_statement" => Kind::Continue,
    "goto_statement" => Kind::Goto,
    "labeled_statement" => Kind::Block,
    "try_statement" => Kind::Try,
    "catch_clause" => Kind::Catch,
    "translation_unit" => Kind::SourceFile,
    "compound_statement" => Kind::Block,
    "function_definition" => Kind::FunctionDecl,
    "comment" => Kind::Trivia,
};

pub static BUILTINS: phf::Set<&'static str> = phf_set! {
    "nullptr", "true", "false", "this",
    "int", "long", "short", "char", "float", "double", "void", "unsigned",
    "signed", "bool", "auto", "size_t",
    "std", "string", "vector", "map", "set",
};

static GRAMMAR: Grammar = Grammar {
    name: "cpp",
    ts_language: || tree_sitter::Language::from(tree_sitter_cpp::LANGUAGE),
    kinds: &KINDS,
    function_decl_kinds: &["function_definition"],
    function_name_field: "declarator",
    body_field: "body",
    parameters_field: Some("parameters"),
    parameter_kinds: &["parameter_declaration", "optional_parameter_declaration"],
    class_like_kinds: &["class_specifier", "struct_specifier", "namespace_definition"],
    class_body_field: "body",
    arrow_const_binding: false,
    let_like_kinds: &["declaration", "init_declarator"],
    pattern_field: "declarator",
    init_value_field: "value",
    assignment_kinds: &["assignment_expression"],
    assignment_left_field: "left",
    assignment_right_field: "right",
    compound_assignment_kinds: &["assignment_expression"],
    assignment_operator_field: Some("operator"),
    update_expr_kinds: &["update_expression"],
    member_access_kind: Some("field_expression"),
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
