//! Language dispatch layer. Completes the teacher's half-finished
//! `labels::CLASSIFIERS` pattern (Rust wired up, eight languages left as
//! `// todo: add more languages`) for all nine languages the spec requires.

pub mod c;
pub mod cpp;
pub mod go;
pub mod java;
pub mod php;
pub mod python;
pub mod ruby;
pub mod rust;
pub mod typescript;

use std::path::Path;

/// The structured-statement classification the CFG Builder dispatches on.
/// Generalizes the teacher's `labels::Kind` (which only distinguished
/// enough variants for taint-flow, not full structured lowering) with the
/// shapes spec §4.2 actually needs: switch/case, try/catch/finally, goto,
/// and a catch-all "wrapper block" for synchronized/with/using/unsafe/defer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    If,
    Switch,
    CaseClause,
    For,
    While,
    DoWhile,
    InfiniteLoop,
    Break,
    Continue,
    Return,
    Goto,
    Try,
    Catch,
    Finally,
    WrapperBlock,
    FunctionDecl,
    Block,
    SourceFile,
    Trivia,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    Python,
    Go,
    TypeScript,
    Rust,
    Java,
    C,
    Cpp,
    Ruby,
    Php,
}

impl Language {
    pub fn tag(self) -> &'static str {
        match self {
            Language::Python => "python",
            Language::Go => "go",
            Language::TypeScript => "typescript",
            Language::Rust => "rust",
            Language::Java => "java",
            Language::C => "c",
            Language::Cpp => "cpp",
            Language::Ruby => "ruby",
            Language::Php => "php",
        }
    }

    /// Language selection by file extension (spec §6, closed set). `.js`/
    /// `.jsx` are treated as TypeScript, as spec.md §6 states explicitly.
    pub fn from_path(path: &Path) -> Option<Language> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        Some(match ext.as_str() {
            "py" => Language::Python,
            "go" => Language::Go,
            "ts" | "tsx" | "js" | "jsx" => Language::TypeScript,
            "rs" => Language::Rust,
            "java" => Language::Java,
            "c" | "h" => Language::C,
            "cpp" | "cc" | "cxx" | "hpp" => Language::Cpp,
            "rb" => Language::Ruby,
            "php" => Language::Php,
            _ => return None,
        })
    }

    pub fn grammar(self) -> &'static Grammar {
        match self {
            Language::Python => python::grammar(),
            Language::Go => go::grammar(),
            Language::TypeScript => typescript::grammar(),
            Language::Rust => rust::grammar(),
            Language::Java => java::grammar(),
            Language::C => c::grammar(),
            Language::Cpp => cpp::grammar(),
            Language::Ruby => ruby::grammar(),
            Language::Php => php::grammar(),
        }
    }
}

/// One language's node-kind vocabulary and binding-site shapes. Nine
/// instances of this (one per module above) replace what spec §9 calls
/// "nine parallel extractors... duplicat[ing] an identical skeleton" with a
/// shared engine (`crate::cfg`, `crate::dfg`) plus nine small tables.
pub struct Grammar {
    pub name: &'static str,
    pub ts_language: fn() -> tree_sitter::Language,

    /// node-kind string -> structural `Kind`, used by the CFG Builder.
    pub kinds: &'static phf::Map<&'static str, Kind>,

    /// Node kinds that declare a function/method (§4.1).
    pub function_decl_kinds: &'static [&'static str],
    /// Field name holding the function's identifier.
    pub function_name_field: &'static str,
    /// Field name holding the function's block body.
    pub body_field: &'static str,
    /// Field name holding the parameter list, if any.
    pub parameters_field: Option<&'static str>,
    /// Node kinds for a single parameter (possibly destructured).
    pub parameter_kinds: &'static [&'static str],

    /// Node kinds whose bodies must be descended into to find a function
    /// declared inside a class/interface (§4.1: Java/Ruby/PHP/C++).
    pub class_like_kinds: &'static [&'static str],
    pub class_body_field: &'static str,

    /// TS-only: recognize `const name = (...) => {...}` as a function.
    pub arrow_const_binding: bool,

    /// Declarations with initializer: `let`/`const`/`var`/typed declarators.
    pub let_like_kinds: &'static [&'static str],
    pub pattern_field: &'static str,
    pub init_value_field: &'static str,

    /// Plain assignment (reassignment emits `update`).
    pub assignment_kinds: &'static [&'static str],
    pub assignment_left_field: &'static str,
    pub assignment_right_field: &'static str,

    /// `+=`, `<<=`, … always emit `update`.
    pub compound_assignment_kinds: &'static [&'static str],
    /// Field on `assignment_kinds` nodes holding the operator text, for
    /// grammars (Java) that fold `=` and `+=` into one node kind
    /// distinguished only by the operator token.
    pub assignment_operator_field: Option<&'static str>,
    /// `x++`, `--y`.
    pub update_expr_kinds: &'static [&'static str],

    /// Member/attribute access node kind, e.g. `attribute`, `field_expression`.
    pub member_access_kind: Option<&'static str>,
    /// Python emits the whole dotted expression as one `use`; other
    /// languages emit only the base identifier (§4.3).
    pub full_member_access: bool,

    pub identifier_kind: &'static str,
    pub builtins: &'static phf::Set<&'static str>,
    /// Suppress identifiers matching `__<...>__` (Python, TypeScript) or a
    /// leading double underscore (Rust).
    pub suppress_dunder: DunderRule,

    /// True only for Python: extractor maintains an explicit scope stack.
    pub has_scope_stack: bool,

    /// Import-statement node kinds (non-empty only for Python; spec.md §3's
    /// `DFGInfo.imports` is "used only by Python"). Listed here rather than
    /// hardcoded in `dfg.rs` so the def/use walk can skip over them
    /// uniformly without a per-language special case.
    pub import_kinds: &'static [&'static str],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DunderRule {
    None,
    /// `__x__` suppressed.
    Surrounding,
    /// leading `__` suppressed.
    Leading,
}

pub fn lookup(grammar: &Grammar, raw: &str) -> Kind {
    grammar.kinds.get(raw).copied().unwrap_or(Kind::Other)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn js_and_jsx_map_to_typescript() {
        assert_eq!(
            Language::from_path(Path::new("a.js")),
            Some(Language::TypeScript)
        );
        assert_eq!(
            Language::from_path(Path::new("a.jsx")),
            Some(Language::TypeScript)
        );
    }

    #[test]
    fn unknown_extension_is_none() {
        assert_eq!(Language::from_path(Path::new("a.txt")), None);
    }

    #[test]
    fn all_languages_round_trip_tag() {
        for lang in [
            Language::Python,
            Language::Go,
            Language::TypeScript,
            Language::Rust,
            Language::Java,
            Language::C,
            Language::Cpp,
            Language::Ruby,
            Language::Php,
        ] {
            assert!(!lang.tag().is_empty());
            assert_eq!(lang.grammar().name, lang.tag());
        }
    }
}
