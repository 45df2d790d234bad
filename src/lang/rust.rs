use super::{DunderRule, Grammar, Kind};
use phf::{phf_map, phf_set};

pub static KINDS: phf::Map<&'static str, Kind> = phf_map! {
    "if_expression" => Kind::If,
    "if_let_expression" => Kind::If,
    "match_expression" => Kind::Switch,
    "match_arm" => Kind::CaseClause,
    "loop_expression" => Kind::InfiniteLoop,
    "while_expression" => Kind::While,
    "while_let_expression" => Kind::While,
    "for_expression" => Kind::For,
    "return_expression" => Kind::Return,
    "break_expression" => Kind::Break,
    "continue_expression" => Kind::Continue,
    "source_file" => Kind::SourceFile,
    "block" => Kind::Block,
    "function_item" => Kind::FunctionDecl,
    "try_expression" => Kind::WrapperBlock,
    "unsafe_block" => Kind::WrapperBlock,
    "line_comment" => Kind::Trivia,
    "block_comment" => Kind::Trivia,
};

pub static BUILTINS: phf::Set<&'static str> = phf_set! {
    "self", "Self", "super", "crate",
    "true", "false", "None", "Some", "Ok", "Err",
    "i8", "i16", "i32", "i64", "i128", "isize",
    "u8", "u16", "u32", "u64", "u128", "usize",
    "f32", "f64", "bool", "char", "str", "String",
    "Vec", "Box", "Option", "Result",
};

static GRAMMAR: Grammar = Grammar {
    name: "rust",
    ts_language: || tree_sitter::Language::from(tree_sitter_rust::LANGUAGE),
    kinds: &KINDS,
    function_decl_kinds: &["function_item"],
    function_name_field: "name",
    body_field: "body",
    parameters_field: Some("parameters"),
    parameter_kinds: &["parameter", "self_parameter"],
    class_like_kinds: &["impl_item", "trait_item", "mod_item"],
    class_body_field: "body",
    arrow_const_binding: false,
    let_like_kinds: &["let_declaration"],
    pattern_field: "pattern",
    init_value_field: "value",
    assignment_kinds: &["assignment_expression"],
    assignment_left_field: "left",
    assignment_right_field: "right",
    compound_assignment_kinds: &["compound_assignment_expr"],
    assignment_operator_field: None,
    update_expr_kinds: &[],
    member_access_kind: Some("field_expression"),
    full_member_access: false,
    identifier_kind: "identifier",
    builtins: &BUILTINS,
    suppress_dunder: DunderRule::Leading,
    has_scope_stack: false,
    import_kinds: &[],
};

pub fn grammar() -> &'static Grammar {
    &GRAMMAR
}
