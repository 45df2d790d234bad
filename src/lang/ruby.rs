use super::{DunderRule, Grammar, Kind};
use phf::{phf_map, phf_set};

pub static KINDS: phf::Map<&'static str, Kind> = phf_map! {
    "if" => Kind::If,
    "elsif" => Kind::If,
    "unless" => Kind::If,
    "case" => Kind::Switch,
    "when" => Kind::CaseClause,
    "for" => Kind::For,
    "while" => Kind::While,
    "until" => Kind::While,
    "return" => Kind::Return,
    "break" => Kind::Break,
    "next" => Kind::Continue,
    "begin" => Kind::Try,
    "rescue" => Kind::Catch,
    "ensure" => Kind::Finally,
    "program" => Kind::SourceFile,
    "body_statement" => Kind::Block,
    "do_block" => Kind::Block,
    "method" => Kind::FunctionDecl,
    "singleton_method" => Kind::FunctionDecl,
    "comment" => Kind::Trivia,
};

pub static BUILTINS: phf::Set<&'static str> = phf_set! {
    "self", "nil", "true", "false",
    "puts", "print", "require", "require_relative", "attr_accessor",
    "Integer", "Float", "String", "Array", "Hash", "Symbol",
};

static GRAMMAR: Grammar = Grammar {
    name: "ruby",
    ts_language: || tree_sitter::Language::from(tree_sitter_ruby::LANGUAGE),
    kinds: &KINDS,
    function_decl_kinds: &["method", "singleton_method"],
    function_name_field: "name",
    body_field: "body",
    parameters_field: Some("parameters"),
    parameter_kinds: &[
        "identifier",
        "splat_parameter",
        "hash_splat_parameter",
        "optional_parameter",
        "keyword_parameter",
        "block_parameter",
    ],
    class_like_kinds: &["class", "module", "singleton_class"],
    class_body_field: "body",
    arrow_const_binding: false,
    let_like_kinds: &["assignment"],
    pattern_field: "left",
    init_value_field: "right",
    assignment_kinds: &["assignment"],
    assignment_left_field: "left",
    assignment_right_field: "right",
    compound_assignment_kinds: &["operator_assignment"],
    assignment_operator_field: None,
    update_expr_kinds: &[],
    member_access_kind: Some("call"),
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
