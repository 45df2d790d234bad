use super::{DunderRule, Grammar, Kind};
use phf::{phf_map, phf_set};

pub static KINDS: phf::Map<&'static str, Kind> = phf_map! {
    "if_statement" => Kind::If,
    "elif_clause" => Kind::If,
    "else_clause" => Kind::Block,
    "match_statement" => Kind::Switch,
    "case_clause" => Kind::CaseClause,
    "for_statement" => Kind::For,
    "while_statement" => Kind::While,
    "return_statement" => Kind::Return,
    "raise_statement" => Kind::Return,
    "break_statement" => Kind::Break,
    "continue_statement" => Kind::Continue,
    "try_statement" => Kind::Try,
    "except_clause" => Kind::Catch,
    "finally_clause" => Kind::Finally,
    "with_statement" => Kind::WrapperBlock,
    "module" => Kind::SourceFile,
    "block" => Kind::Block,
    "function_definition" => Kind::FunctionDecl,
    "comment" => Kind::Trivia,
};

pub static BUILTINS: phf::Set<&'static str> = phf_set! {
    "self", "cls", "True", "False", "None",
    "int", "float", "str", "bool", "list", "dict", "set", "tuple", "bytes",
    "print", "len", "range", "super", "isinstance", "type",
};

static GRAMMAR: Grammar = Grammar {
    name: "python",
    ts_language: || tree_sitter::Language::from(tree_sitter_python::LANGUAGE),
    kinds: &KINDS,
    function_decl_kinds: &["function_definition"],
    function_name_field: "name",
    body_field: "body",
    parameters_field: Some("parameters"),
    parameter_kinds: &[
        "identifier",
        "typed_parameter",
        "default_parameter",
        "typed_default_parameter",
        "list_splat_pattern",
        "dictionary_splat_pattern",
        "tuple_pattern",
    ],
    class_like_kinds: &["class_definition"],
    class_body_field: "body",
    arrow_const_binding: false,
    let_like_kinds: &["assignment"],
    pattern_field: "left",
    init_value_field: "right",
    assignment_kinds: &["assignment"],
    assignment_left_field: "left",
    assignment_right_field: "right",
    compound_assignment_kinds: &["augmented_assignment"],
    assignment_operator_field: None,
    update_expr_kinds: &[],
    member_access_kind: Some("attribute"),
    full_member_access: true,
    identifier_kind: "identifier",
    builtins: &BUILTINS,
    suppress_dunder: DunderRule::Surrounding,
    has_scope_stack: true,
    import_kinds: &["import_statement", "import_from_statement"],
};

pub fn grammar() -> &'static Grammar {
    &GRAMMAR
}
