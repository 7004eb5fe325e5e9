//! Classification of tree-sitter C node kinds.

use crate::source::StmtKind;

/// What lowering does with a tree-sitter node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Lowering {
    /// Becomes a statement node of the given kind.
    Node(StmtKind),
    /// A `case` or `default` label. Only the label text becomes a node; the
    /// arm's statements attach to the enclosing switch body.
    CaseHeader,
    /// Not represented; its children attach to the nearest lowered ancestor.
    Transparent,
    /// Dropped together with its subtree.
    Skip,
}

pub(crate) fn classify(kind: &str) -> Lowering {
    match kind {
        "compound_statement" => Lowering::Node(StmtKind::Compound),
        "labeled_statement" => Lowering::Node(StmtKind::Label),
        "declaration" | "type_definition" | "function_definition" => {
            Lowering::Node(StmtKind::Declaration)
        }
        "if_statement" | "while_statement" | "do_statement" | "for_statement"
        | "switch_statement" | "return_statement" | "break_statement" | "continue_statement"
        | "goto_statement" | "attributed_statement" | "seh_try_statement"
        | "seh_leave_statement" => Lowering::Node(StmtKind::Other),
        "case_statement" => Lowering::CaseHeader,
        "expression_statement"
        | "assignment_expression"
        | "binary_expression"
        | "unary_expression"
        | "update_expression"
        | "cast_expression"
        | "pointer_expression"
        | "sizeof_expression"
        | "alignof_expression"
        | "offsetof_expression"
        | "generic_expression"
        | "subscript_expression"
        | "call_expression"
        | "field_expression"
        | "compound_literal_expression"
        | "parenthesized_expression"
        | "conditional_expression"
        | "comma_expression"
        | "gnu_asm_expression"
        | "extension_expression"
        | "initializer_list"
        | "identifier"
        | "number_literal"
        | "string_literal"
        | "concatenated_string"
        | "char_literal"
        | "true"
        | "false"
        | "null" => Lowering::Node(StmtKind::Expression),
        "comment" => Lowering::Skip,
        "preproc_if" | "preproc_ifdef" | "preproc_else" | "preproc_elif" | "preproc_elifdef" => {
            Lowering::Transparent
        }
        k if k.starts_with("preproc_") => Lowering::Skip,
        _ => Lowering::Transparent,
    }
}

/// Whether the child in `field` of a `parent` node is left out of the tree.
///
/// Types, declarators and label names carry no statements, and conditional
/// compilation tests are not program text the pass may delete.
pub(crate) fn skips_field(parent: &str, field: Option<&str>) -> bool {
    match field {
        Some("type" | "declarator" | "label") => true,
        Some("condition" | "name") => parent.starts_with("preproc_"),
        _ => false,
    }
}
